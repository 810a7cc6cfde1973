use std::path::PathBuf;
use std::time::Duration;

use image::{Rgba, RgbaImage};

use snapbooth_booth_core::{AttemptConfig, CaptureOrchestrator, SequencePlan};
use snapbooth_capture_engine::{BoothCapturer, CameraSelection, CameraSession};
use snapbooth_render_engine::{
    load_layout_assets, render, CollageComposer, LayoutAssets, ResolvedLayout, SessionBundle,
    COLLAGE_FILE,
};
use snapbooth_session_model::{
    AttemptRecord, AttemptStatus, CollageLayout, CollageRef, SessionRecord,
};

fn fast_plan(photo_count: u32, countdown_secs: u32) -> SequencePlan {
    SequencePlan {
        photo_count,
        attempt: AttemptConfig {
            countdown_secs,
            tick_interval: Duration::from_millis(5),
        },
    }
}

#[tokio::test(start_paused = true)]
async fn test_booth_run_produces_grid_collage() {
    let mut session = CameraSession::open(&CameraSelection::Synthetic {
        width: 64,
        height: 48,
    })
    .unwrap();
    let layout = ResolvedLayout::new(&CollageLayout::default(), LayoutAssets::default()).unwrap();
    let mut composer = CollageComposer::new(layout, 92);
    let orchestrator = CaptureOrchestrator::new(fast_plan(4, 1));

    let run = {
        let mut producer = BoothCapturer::new(&mut session, 92);
        orchestrator
            .run_booth(&mut producer, &mut composer, None)
            .await
            .unwrap()
    };
    session.close().unwrap();

    assert_eq!(run.report.frames.len(), 4);
    assert!(run.report.failures.is_empty());

    // 2x2 grid of 64x48 cells with 20px gap and 40px padding.
    assert_eq!(run.collage.width, 2 * 64 + 20 + 80);
    assert_eq!(run.collage.height, 2 * 48 + 20 + 80);

    let decoded = image::load_from_memory(&run.collage.jpeg).unwrap().to_rgb8();

    // Padding keeps the dark canvas fill.
    let corner = decoded.get_pixel(5, 5);
    assert!(
        corner[0] < 60 && corner[1] < 60 && corner[2] < 60,
        "padding not background: {corner:?}"
    );

    // The pattern's red top-left marker lands top-right once mirrored.
    // First cell spans x 40..104, y 40..88; its marker is 6px square.
    let marker = decoded.get_pixel(101, 43);
    assert!(marker[0] > 150, "expected mirrored red marker, got {marker:?}");
    assert!(marker[1] < 120, "expected mirrored red marker, got {marker:?}");
}

#[tokio::test]
async fn test_missing_assets_degrade_to_plain_render() {
    let layout = CollageLayout {
        background_image: Some(PathBuf::from("/nonexistent/snapbooth-bg.png")),
        frame_overlay: Some(PathBuf::from("/nonexistent/snapbooth-frame.png")),
        ..Default::default()
    };
    let assets = load_layout_assets(&layout).await;
    let degraded = ResolvedLayout::new(&layout, assets).unwrap();
    let plain = ResolvedLayout::new(&CollageLayout::default(), LayoutAssets::default()).unwrap();

    let photos = vec![RgbaImage::from_pixel(40, 30, Rgba([90, 140, 90, 255])); 2];
    let with_missing = render(&photos, &degraded).unwrap();
    let without = render(&photos, &plain).unwrap();
    assert_eq!(with_missing.as_raw(), without.as_raw());
}

#[tokio::test]
async fn test_session_bundle_layout_on_disk() {
    let parent = std::env::temp_dir().join("snapbooth_test_pipeline");
    let _ = std::fs::remove_dir_all(&parent);

    let mut session = CameraSession::open(&CameraSelection::Synthetic {
        width: 48,
        height: 36,
    })
    .unwrap();
    let camera = session.backend_name().to_string();
    let opened_at = session.opened_at().to_string();

    let layout = CollageLayout::default();
    let resolved = ResolvedLayout::new(&layout, LayoutAssets::default()).unwrap();
    let mut composer = CollageComposer::new(resolved, 90);
    let orchestrator = CaptureOrchestrator::new(fast_plan(2, 0));

    let run = {
        let mut producer = BoothCapturer::new(&mut session, 90);
        orchestrator
            .run_booth(&mut producer, &mut composer, None)
            .await
            .unwrap()
    };
    session.close().unwrap();

    let bundle = SessionBundle::create(&parent, "booth-it").unwrap();
    let mut record = SessionRecord::new(camera, opened_at, 2, 0, 5, layout);
    for (frame, attempt) in run.report.frames.iter().zip(run.report.captured_attempts()) {
        let shot = bundle.write_shot(attempt, frame).await.unwrap();
        record.attempts.push(AttemptRecord {
            index: attempt,
            status: AttemptStatus::Captured,
            error: None,
            shot: Some(shot),
        });
    }
    record.captured_photos = run.report.frames.len() as u32;
    let collage_path = bundle.write_collage(&run.collage).await.unwrap();
    record.collage = Some(CollageRef {
        path: COLLAGE_FILE.to_string(),
        width: run.collage.width,
        height: run.collage.height,
    });
    record.finish();
    bundle.write_record(&record).unwrap();

    assert!(bundle.shot_path(0).exists());
    assert!(bundle.shot_path(1).exists());
    assert!(collage_path.exists());

    let loaded = SessionRecord::load(bundle.record_path()).unwrap();
    assert_eq!(loaded.captured_photos, 2);
    assert_eq!(loaded.attempts.len(), 2);
    assert_eq!(loaded.attempts[0].shot.as_deref(), Some("shot-01.jpg"));
    assert_eq!(loaded.attempts[1].shot.as_deref(), Some("shot-02.jpg"));
    assert_eq!(
        loaded.collage.as_ref().map(|c| c.path.as_str()),
        Some(COLLAGE_FILE)
    );

    std::fs::remove_dir_all(&parent).ok();
}
