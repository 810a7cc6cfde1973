//! Run a booth session.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

use snapbooth_booth_core::{
    AttemptConfig, BoothProgress, CaptureOrchestrator, CountdownState, ProgressCallback,
    SequencePlan,
};
use snapbooth_capture_engine::{BoothCapturer, CameraSelection, CameraSession};
use snapbooth_common::config::AppConfig;
use snapbooth_render_engine::{
    load_layout_assets, CollageComposer, ResolvedLayout, SessionBundle, COLLAGE_FILE,
};
use snapbooth_session_model::{
    AttemptRecord, AttemptStatus, CollageLayout, CollageRef, SessionRecord,
};

/// `run` flags; `None` falls back to the loaded [`AppConfig`].
pub struct RunArgs {
    pub name: Option<String>,
    pub output: Option<PathBuf>,
    pub photos: Option<u32>,
    pub columns: Option<u32>,
    pub countdown: Option<u32>,
    pub tick_ms: Option<u64>,
    pub camera: String,
    pub device: Option<String>,
    pub width: u32,
    pub height: u32,
    pub background: Option<PathBuf>,
    pub frame: Option<PathBuf>,
    pub quality: Option<u8>,
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = AppConfig::load();

    let photos = args.photos.unwrap_or(config.booth.photo_count);
    let columns = args.columns.unwrap_or(config.booth.grid_columns);
    let countdown = args.countdown.unwrap_or(config.booth.countdown_secs);
    let tick_ms = args.tick_ms.unwrap_or(config.booth.tick_interval_ms).max(1);
    let quality = args.quality.unwrap_or(config.booth.jpeg_quality);
    let sessions_dir = args.output.unwrap_or(config.sessions_dir);

    if !matches!(photos, 2 | 4 | 9) {
        anyhow::bail!("Photo count must be 2, 4, or 9 (got {photos})");
    }
    if !matches!(columns, 2 | 3) {
        anyhow::bail!("Grid columns must be 2 or 3 (got {columns})");
    }

    let selection = match args.camera.as_str() {
        "synthetic" => CameraSelection::Synthetic {
            width: args.width,
            height: args.height,
        },
        "device" => CameraSelection::Device {
            device: args.device.clone(),
        },
        other => anyhow::bail!("Unknown camera: {other}. Use: synthetic, device"),
    };

    let layout = CollageLayout {
        columns,
        gap: config.booth.gap_px,
        padding: config.booth.padding_px,
        background_color: config.booth.background_color.clone(),
        background_image: args.background.or(config.booth.background_image),
        frame_overlay: args.frame.or(config.booth.frame_overlay),
        cell_size: None,
    };

    let mut session = CameraSession::open(&selection)
        .map_err(|e| anyhow::anyhow!("Failed to open camera: {e}"))?;
    let camera_name = session.backend_name().to_string();
    let opened_at = session.opened_at().to_string();

    let mut record = SessionRecord::new(
        camera_name.clone(),
        opened_at,
        photos,
        countdown,
        tick_ms,
        layout.clone(),
    );
    let name = args
        .name
        .unwrap_or_else(|| format!("booth-{}", &record.id[..8]));

    println!("Starting booth session: {name}");
    println!("  Camera: {camera_name}");
    println!("  Photos: {photos} ({columns} columns)");
    println!("  Countdown: {countdown}s ({tick_ms}ms ticks)");
    println!();

    let assets = load_layout_assets(&layout).await;
    let resolved = ResolvedLayout::new(&layout, assets)
        .map_err(|e| anyhow::anyhow!("Invalid layout: {e}"))?;
    let mut composer = CollageComposer::new(resolved, quality);

    let orchestrator = CaptureOrchestrator::new(SequencePlan {
        photo_count: photos,
        attempt: AttemptConfig {
            countdown_secs: countdown,
            tick_interval: Duration::from_millis(tick_ms),
        },
    });

    // Ctrl+C stops between attempts; the current countdown still finishes.
    let stop = orchestrator.stop_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nStopping after the current photo...");
            stop.store(true, Ordering::SeqCst);
        }
    });

    let progress: ProgressCallback = Box::new(|p: BoothProgress| {
        let attempt = p.attempt + 1;
        match p.state {
            CountdownState::CountingDown { seconds_remaining } => {
                print!("\r  Photo {attempt}/{}: {seconds_remaining}...  ", p.total);
                let _ = std::io::stdout().flush();
            }
            CountdownState::Capturing => {
                print!("\r  Photo {attempt}/{}: *click*     ", p.total);
                let _ = std::io::stdout().flush();
            }
            CountdownState::Done => {
                println!("\r  Photo {attempt}/{}: captured    ", p.total);
            }
            CountdownState::Failed => {
                println!("\r  Photo {attempt}/{}: failed, skipping", p.total);
            }
            CountdownState::Idle => {}
        }
    });

    let outcome = {
        let mut producer = BoothCapturer::new(&mut session, quality);
        orchestrator
            .run_booth(&mut producer, &mut composer, Some(progress))
            .await
    };
    if let Err(e) = session.close() {
        tracing::warn!(error = %e, "Camera release failed");
    }
    let booth = outcome.map_err(|e| anyhow::anyhow!("Booth run failed: {e}"))?;

    let bundle = SessionBundle::create(&sessions_dir, &name)
        .map_err(|e| anyhow::anyhow!("Failed to create session directory: {e}"))?;

    for (frame, attempt) in booth
        .report
        .frames
        .iter()
        .zip(booth.report.captured_attempts())
    {
        let shot = bundle
            .write_shot(attempt, frame)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to save shot: {e}"))?;
        record.attempts.push(AttemptRecord {
            index: attempt,
            status: AttemptStatus::Captured,
            error: None,
            shot: Some(shot),
        });
    }
    for failure in &booth.report.failures {
        record.attempts.push(AttemptRecord {
            index: failure.attempt,
            status: AttemptStatus::Failed,
            error: Some(failure.error.clone()),
            shot: None,
        });
    }
    record.attempts.sort_by_key(|a| a.index);
    record.captured_photos = booth.report.frames.len() as u32;

    bundle
        .write_collage(&booth.collage)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to save collage: {e}"))?;
    record.collage = Some(CollageRef {
        path: COLLAGE_FILE.to_string(),
        width: booth.collage.width,
        height: booth.collage.height,
    });
    record.finish();
    bundle
        .write_record(&record)
        .map_err(|e| anyhow::anyhow!("Failed to save session record: {e}"))?;

    println!();
    if booth.report.cancelled {
        println!("Session stopped early.");
    }
    println!(
        "Captured {}/{} photos ({} failed).",
        booth.report.frames.len(),
        photos,
        booth.report.failures.len()
    );
    println!(
        "Collage: {} ({}x{})",
        bundle.collage_path().display(),
        booth.collage.width,
        booth.collage.height
    );
    println!("Session saved to: {}", bundle.root().display());

    Ok(())
}
