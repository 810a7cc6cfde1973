//! Snapbooth CLI — Command-line photo booth.
//!
//! Usage:
//!   snapbooth run [OPTIONS]        Run a booth session (countdown, shots, collage)
//!   snapbooth compose <IMAGES>...  Compose existing images into a collage
//!   snapbooth info <PATH>          Show a recorded session
//!   snapbooth check                Check camera backends and configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "snapbooth",
    about = "Camera photo booth: countdown, capture, collage",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a booth session: countdown per photo, then render the collage
    Run {
        /// Session name (default: booth-<session id>)
        #[arg(short, long)]
        name: Option<String>,

        /// Directory session bundles are written under
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Photos to capture: 2, 4, or 9
        #[arg(short, long)]
        photos: Option<u32>,

        /// Collage grid columns: 2 or 3
        #[arg(short, long)]
        columns: Option<u32>,

        /// Countdown seconds before each shot (0 captures immediately)
        #[arg(long)]
        countdown: Option<u32>,

        /// Countdown tick interval in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Camera backend: synthetic or device
        #[arg(long, default_value = "synthetic")]
        camera: String,

        /// Device path for the device backend (e.g. /dev/video0)
        #[arg(long)]
        device: Option<String>,

        /// Synthetic camera width
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Synthetic camera height
        #[arg(long, default_value = "720")]
        height: u32,

        /// Background image for the collage
        #[arg(long)]
        background: Option<PathBuf>,

        /// Decorative frame drawn over each photo
        #[arg(long)]
        frame: Option<PathBuf>,

        /// JPEG quality for shots and collage (1-100)
        #[arg(long)]
        quality: Option<u8>,
    },

    /// Compose existing images into a collage, no camera involved
    Compose {
        /// Input images: file paths or data: URIs
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output collage path
        #[arg(short, long, default_value = "photobooth.jpg")]
        output: PathBuf,

        /// Grid columns
        #[arg(short, long, default_value = "2")]
        columns: u32,

        /// Pixel gap between cells
        #[arg(long, default_value = "20")]
        gap: u32,

        /// Pixel padding around the grid
        #[arg(long, default_value = "40")]
        padding: u32,

        /// Background color (CSS-style hex)
        #[arg(long, default_value = "#111")]
        background_color: String,

        /// Background image stretched behind the grid
        #[arg(long)]
        background: Option<PathBuf>,

        /// Decorative frame drawn over each photo
        #[arg(long)]
        frame: Option<PathBuf>,

        /// JPEG quality (1-100)
        #[arg(long, default_value = "92")]
        quality: u8,
    },

    /// Show a recorded session
    Info {
        /// Session directory or session.json path
        path: PathBuf,

        /// Print the raw session record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check camera backends and configuration
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    snapbooth_common::logging::init_logging(&snapbooth_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Run {
            name,
            output,
            photos,
            columns,
            countdown,
            tick_ms,
            camera,
            device,
            width,
            height,
            background,
            frame,
            quality,
        } => {
            commands::run::run(commands::run::RunArgs {
                name,
                output,
                photos,
                columns,
                countdown,
                tick_ms,
                camera,
                device,
                width,
                height,
                background,
                frame,
                quality,
            })
            .await
        }
        Commands::Compose {
            inputs,
            output,
            columns,
            gap,
            padding,
            background_color,
            background,
            frame,
            quality,
        } => {
            commands::compose::run(
                inputs,
                output,
                columns,
                gap,
                padding,
                background_color,
                background,
                frame,
                quality,
            )
            .await
        }
        Commands::Info { path, json } => commands::info::run(path, json),
        Commands::Check => commands::check::run().await,
    }
}
