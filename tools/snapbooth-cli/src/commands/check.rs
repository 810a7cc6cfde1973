//! Check camera backends and configuration.

use snapbooth_capture_engine::backend_report;
use snapbooth_common::config::{config_file_path, AppConfig};
use snapbooth_render_engine::{load, ImageSource};

pub async fn run() -> anyhow::Result<()> {
    println!("Snapbooth System Check");
    println!("{}", "=".repeat(50));

    // Camera backends
    let backends = backend_report();
    for backend in &backends {
        if backend.available {
            println!("[OK] Camera backend: {} ({})", backend.name, backend.detail);
        } else {
            println!(
                "[WARN] Camera backend: {} ({})",
                backend.name, backend.detail
            );
        }
    }
    println!();

    // Configuration
    let config_path = config_file_path();
    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!(
            "[OK] Config: defaults ({} not present)",
            config_path.display()
        );
    }
    let config = AppConfig::load();
    println!(
        "     Booth: {} photos, {} columns, {}s countdown, quality {}",
        config.booth.photo_count,
        config.booth.grid_columns,
        config.booth.countdown_secs,
        config.booth.jpeg_quality
    );
    println!("     Sessions dir: {}", config.sessions_dir.display());
    println!();

    // Configured assets
    let assets = [
        ("Background", &config.booth.background_image),
        ("Frame overlay", &config.booth.frame_overlay),
    ];
    for (label, path) in assets {
        match path {
            Some(p) => match load(&ImageSource::Path(p.clone())).await {
                Ok(img) => println!(
                    "[OK] {label}: {} ({}x{})",
                    p.display(),
                    img.width(),
                    img.height()
                ),
                Err(e) => println!("[WARN] {label}: {} ({e})", p.display()),
            },
            None => println!("[OK] {label}: not configured"),
        }
    }

    println!();
    if backends.iter().any(|b| b.available) {
        println!("At least one camera backend is available. Snapbooth is ready.");
    } else {
        println!("No camera backend is available. See above for details.");
    }

    Ok(())
}
