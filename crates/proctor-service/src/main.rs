//! Replays recorded webcam frames of one exam session through the
//! proctoring pipeline and prints events and the final risk as JSON.
//!
//! Usage: proctor-replay <session_id> [--fps N] [--config PATH] <frame>...

use anyhow::{bail, Context, Result};
use proctor::{Clock, ManualClock, SessionId, SystemClock};
use proctor_service::{init_logging, ProctorService, Settings};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

struct Args {
    session_id: SessionId,
    frame_interval: Option<Duration>,
    config: Option<String>,
    frames: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let session_id = args
        .next()
        .context("usage: proctor-replay <session_id> [--fps N] [--config PATH] <frame>...")?
        .parse()
        .context("session_id must be an integer")?;

    let mut parsed = Args {
        session_id,
        frame_interval: None,
        config: None,
        frames: Vec::new(),
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fps" => {
                let fps: f64 = args.next().context("--fps needs a value")?.parse()?;
                parsed.frame_interval = Some(frame_interval(fps)?);
            }
            "--config" => parsed.config = Some(args.next().context("--config needs a path")?),
            _ => parsed.frames.push(arg),
        }
    }
    if parsed.frames.is_empty() {
        bail!("no frames given");
    }
    Ok(parsed)
}

/// Simulated time between two frames at `fps`
fn frame_interval(fps: f64) -> Result<Duration> {
    if !(fps.is_finite() && fps > 0.0) {
        bail!("--fps must be positive");
    }
    let interval = Duration::try_from_secs_f64(1.0 / fps)
        .with_context(|| format!("--fps {} is too small", fps))?;
    if interval.is_zero() {
        bail!("--fps {} is too large", fps);
    }
    Ok(interval)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    let settings = Settings::load(args.config.as_deref())?;
    init_logging(&settings.service.log_level)?;

    info!("=== Proctor replay v{} ===", env!("CARGO_PKG_VERSION"));

    let manual = args
        .frame_interval
        .map(|_| Arc::new(ManualClock::new(SystemClock.now())));
    let clock: Arc<dyn Clock> = match &manual {
        Some(m) => m.clone() as Arc<dyn Clock>,
        None => Arc::new(SystemClock),
    };

    let service = Arc::new(ProctorService::from_settings(&settings, clock)?);
    let eviction = service.spawn_eviction_task(Duration::from_secs(
        settings.service.eviction_interval_secs.max(1),
    ));

    for path in &args.frames {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path))?;
        let events = service.submit_frame(args.session_id, bytes).await?;
        println!("{}", json!({ "frame": path, "events": events }));

        if let (Some(clock), Some(interval)) = (&manual, args.frame_interval) {
            clock.advance(interval);
        }
    }

    let risk = service.session_risk(args.session_id)?;
    println!("{}", json!({ "session_id": args.session_id, "risk": risk }));

    eviction.abort();
    Ok(())
}
