//! Show a recorded session.

use std::path::PathBuf;

use snapbooth_render_engine::SESSION_FILE;
use snapbooth_session_model::{AttemptStatus, SessionRecord};

pub fn run(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let record_path = if path.is_dir() {
        path.join(SESSION_FILE)
    } else {
        path
    };
    let record = SessionRecord::load(&record_path)
        .map_err(|e| anyhow::anyhow!("Failed to load session: {e}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("Session: {}", record.id);
    println!("  Camera: {}", record.camera);
    println!("  Started: {}", record.started_at);
    println!("  Finished: {}", record.finished_at);
    println!();

    println!("Settings:");
    println!("  Photos requested: {}", record.requested_photos);
    println!(
        "  Countdown: {}s ({}ms ticks)",
        record.countdown_secs, record.tick_interval_ms
    );
    println!(
        "  Grid: {} columns, {}px gap, {}px padding",
        record.layout.columns, record.layout.gap, record.layout.padding
    );
    println!();

    println!("Attempts ({} captured):", record.captured_photos);
    for attempt in &record.attempts {
        match attempt.status {
            AttemptStatus::Captured => println!(
                "  #{}: captured -> {}",
                attempt.index + 1,
                attempt.shot.as_deref().unwrap_or("?")
            ),
            AttemptStatus::Failed => println!(
                "  #{}: failed ({})",
                attempt.index + 1,
                attempt.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
    println!();

    match &record.collage {
        Some(c) => println!("Collage: {} ({}x{})", c.path, c.width, c.height),
        None => println!("Collage: none"),
    }

    Ok(())
}
