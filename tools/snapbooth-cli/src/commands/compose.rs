//! Compose existing images into a collage.

use std::path::PathBuf;

use snapbooth_render_engine::{
    encode_collage, load, load_layout_assets, render, ImageSource, ResolvedLayout,
};
use snapbooth_session_model::CollageLayout;

pub async fn run(
    inputs: Vec<String>,
    output: PathBuf,
    columns: u32,
    gap: u32,
    padding: u32,
    background_color: String,
    background: Option<PathBuf>,
    frame: Option<PathBuf>,
    quality: u8,
) -> anyhow::Result<()> {
    if columns == 0 {
        anyhow::bail!("Grid columns must be at least 1");
    }

    println!("Composing {} images ({columns} columns)", inputs.len());

    let mut bitmaps = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let source = ImageSource::infer(input);
        let bitmap = load(&source)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {e}", source.describe()))?;
        println!(
            "  {} ({}x{})",
            source.describe(),
            bitmap.width(),
            bitmap.height()
        );
        bitmaps.push(bitmap);
    }

    let layout = CollageLayout {
        columns,
        gap,
        padding,
        background_color,
        background_image: background,
        frame_overlay: frame,
        cell_size: None,
    };
    let assets = load_layout_assets(&layout).await;
    let resolved =
        ResolvedLayout::new(&layout, assets).map_err(|e| anyhow::anyhow!("Invalid layout: {e}"))?;

    let canvas =
        render(&bitmaps, &resolved).map_err(|e| anyhow::anyhow!("Composition failed: {e}"))?;
    let collage =
        encode_collage(canvas, quality).map_err(|e| anyhow::anyhow!("Encoding failed: {e}"))?;
    collage
        .save(&output)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;

    println!();
    println!(
        "Collage: {} ({}x{})",
        output.display(),
        collage.width,
        collage.height
    );

    Ok(())
}
