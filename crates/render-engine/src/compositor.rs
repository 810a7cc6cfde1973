//! Collage compositor: places photos on a grid canvas.
//!
//! All placement math comes from [`GridGeometry`]; this module only
//! paints. Photos are mirrored and JPEG-encoded upstream, so inputs
//! here are plain RGBA bitmaps in capture order.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use snapbooth_common::error::{BoothError, BoothResult};
use snapbooth_session_model::{parse_hex_color, CellSize, CollageLayout, GridGeometry};

use crate::loader::LayoutAssets;

/// How far the decorative frame extends past each cell edge.
pub const FRAME_OVERLAY_INSET_PX: u32 = 5;

/// Layout with colors parsed and assets decoded, ready to paint.
#[derive(Debug)]
pub struct ResolvedLayout {
    /// Number of grid columns.
    pub columns: u32,

    /// Pixel gap between adjacent cells.
    pub gap: u32,

    /// Pixel padding between the grid and the canvas edge.
    pub padding: u32,

    /// Canvas fill when no background image is set.
    pub background_color: Rgba<u8>,

    /// Fixed cell size; `None` lets the first photo decide.
    pub cell_size: Option<CellSize>,

    /// Background image stretched to the canvas.
    pub background: Option<RgbaImage>,

    /// Frame drawn over each photo cell.
    pub frame_overlay: Option<RgbaImage>,
}

impl ResolvedLayout {
    /// Resolve a user-facing layout against its loaded assets.
    pub fn new(layout: &CollageLayout, assets: LayoutAssets) -> BoothResult<Self> {
        let color = parse_hex_color(&layout.background_color).ok_or_else(|| {
            BoothError::config(format!(
                "invalid background color {:?} (expected #rgb or #rrggbb)",
                layout.background_color
            ))
        })?;
        Ok(Self {
            columns: layout.columns,
            gap: layout.gap,
            padding: layout.padding,
            background_color: Rgba(color),
            cell_size: layout.cell_size,
            background: assets.background,
            frame_overlay: assets.frame_overlay,
        })
    }
}

/// Compose the photos into a single collage canvas.
///
/// Photo `i` goes to grid slot `(i % columns, i / columns)`. Photos that
/// do not match the cell size are rescaled; slots past the last photo
/// stay background.
pub fn render(bitmaps: &[RgbaImage], layout: &ResolvedLayout) -> BoothResult<RgbaImage> {
    if bitmaps.is_empty() {
        return Err(BoothError::composition("nothing to compose: no photos"));
    }

    // Cell size: fixed by the layout, otherwise the first photo decides.
    let cell = layout
        .cell_size
        .unwrap_or_else(|| CellSize::new(bitmaps[0].width(), bitmaps[0].height()));
    let geo = GridGeometry::for_photos(
        bitmaps.len() as u32,
        layout.columns,
        cell,
        layout.gap,
        layout.padding,
    );
    let (canvas_w, canvas_h) = (geo.canvas_width(), geo.canvas_height());

    // Background image stretches to cover; otherwise a flat fill.
    let mut canvas = match &layout.background {
        Some(bg) => imageops::resize(bg, canvas_w, canvas_h, FilterType::Lanczos3),
        None => RgbaImage::from_pixel(canvas_w, canvas_h, layout.background_color),
    };

    // The frame asset is scaled once; every occupied cell gets the same copy.
    let frame = layout.frame_overlay.as_ref().map(|f| {
        imageops::resize(
            f,
            cell.width + 2 * FRAME_OVERLAY_INSET_PX,
            cell.height + 2 * FRAME_OVERLAY_INSET_PX,
            FilterType::Lanczos3,
        )
    });

    for (i, photo) in bitmaps.iter().enumerate() {
        let (x, y) = geo.cell_origin(i as u32);

        let scaled;
        let photo = if photo.dimensions() == (cell.width, cell.height) {
            photo
        } else {
            scaled = imageops::resize(photo, cell.width, cell.height, FilterType::Lanczos3);
            &scaled
        };
        imageops::overlay(&mut canvas, photo, x as i64, y as i64);

        if let Some(frame) = &frame {
            imageops::overlay(
                &mut canvas,
                frame,
                x as i64 - FRAME_OVERLAY_INSET_PX as i64,
                y as i64 - FRAME_OVERLAY_INSET_PX as i64,
            );
        }
    }

    tracing::debug!(
        photos = bitmaps.len(),
        columns = geo.columns,
        rows = geo.rows,
        width = canvas_w,
        height = canvas_h,
        "Composed collage"
    );

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    fn plain_layout() -> ResolvedLayout {
        ResolvedLayout::new(&CollageLayout::default(), LayoutAssets::default()).unwrap()
    }

    /// Resized pixels can drift by a rounding step.
    fn assert_close(px: &Rgba<u8>, want: [u8; 3]) {
        for c in 0..3 {
            assert!(
                (px.0[c] as i32 - want[c] as i32).abs() <= 2,
                "channel {c}: got {:?}, want {:?}",
                px.0,
                want
            );
        }
    }

    #[test]
    fn test_canvas_dimensions_follow_grid() {
        let photos = vec![solid(100, 80, [200, 0, 0]); 4];
        let canvas = render(&photos, &plain_layout()).unwrap();
        // 2 columns of 100px + 20px gap + 40px padding each side.
        assert_eq!(canvas.dimensions(), (300, 260));
    }

    #[test]
    fn test_fixed_cell_size_overrides_photo_dimensions() {
        let layout = CollageLayout {
            cell_size: Some(CellSize::new(60, 50)),
            ..Default::default()
        };
        let resolved = ResolvedLayout::new(&layout, LayoutAssets::default()).unwrap();
        let canvas = render(&[solid(100, 80, [0, 200, 0])], &resolved).unwrap();
        assert_eq!(canvas.dimensions(), (2 * 60 + 20 + 80, 50 + 80));
    }

    #[test]
    fn test_photos_land_in_their_cells_row_major() {
        let colors = [[200, 0, 0], [0, 200, 0], [0, 0, 200], [255, 255, 255]];
        let photos: Vec<_> = colors.iter().map(|&c| solid(100, 80, c)).collect();
        let canvas = render(&photos, &plain_layout()).unwrap();

        // Centers of the four cells, in slot order.
        let centers = [(90, 80), (210, 80), (90, 180), (210, 180)];
        for (center, color) in centers.iter().zip(colors) {
            let px = canvas.get_pixel(center.0, center.1);
            assert_eq!(px.0[..3], color, "at {center:?}");
        }

        // The gap between the first two cells stays background.
        assert_eq!(canvas.get_pixel(150, 80).0, [17, 17, 17, 255]);
    }

    #[test]
    fn test_partial_last_row_keeps_background() {
        let photos = vec![solid(100, 80, [200, 0, 0]); 3];
        let canvas = render(&photos, &plain_layout()).unwrap();
        // Fourth slot is empty; its center shows the canvas fill.
        assert_eq!(canvas.get_pixel(210, 180).0, [17, 17, 17, 255]);
        // Third photo did land in the second row.
        assert_eq!(canvas.get_pixel(90, 180).0, [200, 0, 0, 255]);
    }

    #[test]
    fn test_render_is_deterministic() {
        let photos = vec![
            solid(64, 48, [10, 20, 30]),
            solid(64, 48, [40, 50, 60]),
            solid(64, 48, [70, 80, 90]),
            solid(64, 48, [100, 110, 120]),
        ];
        let a = render(&photos, &plain_layout()).unwrap();
        let b = render(&photos, &plain_layout()).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            render(&[], &plain_layout()),
            Err(BoothError::Composition { .. })
        ));
    }

    #[test]
    fn test_mismatched_photo_is_scaled_to_cell() {
        // First photo fixes the cell at 100x80; the second is smaller
        // and gets stretched to fit.
        let photos = vec![solid(100, 80, [200, 0, 0]), solid(50, 40, [0, 200, 0])];
        let canvas = render(&photos, &plain_layout()).unwrap();
        assert_close(canvas.get_pixel(210, 80), [0, 200, 0]);
    }

    #[test]
    fn test_frame_overlay_covers_cell_and_bleeds_past_it() {
        let assets = LayoutAssets {
            background: None,
            frame_overlay: Some(solid(40, 40, [250, 0, 250])),
        };
        let resolved = ResolvedLayout::new(&CollageLayout::default(), assets).unwrap();
        let photos = vec![solid(100, 80, [200, 0, 0]); 3];
        let canvas = render(&photos, &resolved).unwrap();

        // Opaque frame wins over the photo inside the cell.
        assert_close(canvas.get_pixel(90, 80), [250, 0, 250]);
        // It extends a few pixels past the cell edge...
        assert_close(canvas.get_pixel(37, 37), [250, 0, 250]);
        // ...but not past the inset.
        assert_eq!(canvas.get_pixel(34, 34).0, [17, 17, 17, 255]);
        // The empty fourth slot gets no frame.
        assert_eq!(canvas.get_pixel(210, 180).0, [17, 17, 17, 255]);
    }

    #[test]
    fn test_background_image_is_stretched_over_canvas() {
        let assets = LayoutAssets {
            background: Some(solid(10, 10, [0, 0, 220])),
            frame_overlay: None,
        };
        let resolved = ResolvedLayout::new(&CollageLayout::default(), assets).unwrap();
        let photos = vec![solid(100, 80, [200, 0, 0]); 2];
        let canvas = render(&photos, &resolved).unwrap();
        // Padding area shows the stretched background, not the flat fill.
        assert_close(canvas.get_pixel(5, 5), [0, 0, 220]);
    }

    #[test]
    fn test_bad_hex_color_is_config_error() {
        let layout = CollageLayout {
            background_color: "teal".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ResolvedLayout::new(&layout, LayoutAssets::default()),
            Err(BoothError::Config { .. })
        ));
    }
}
