//! Collage layout parameters and grid geometry.
//!
//! Photos are placed row-major on a grid: photo `i` lands in column
//! `i % columns`, row `i / columns`. All pixel math lives here so the
//! compositor and its tests agree on one set of formulas.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User-facing collage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollageLayout {
    /// Number of grid columns.
    pub columns: u32,

    /// Pixel gap between adjacent cells.
    pub gap: u32,

    /// Pixel padding between the grid and the canvas edge.
    pub padding: u32,

    /// Background color as CSS-style hex (`#111` or `#1a1a1a`).
    pub background_color: String,

    /// Optional background image stretched to cover the canvas.
    #[serde(default)]
    pub background_image: Option<PathBuf>,

    /// Optional decorative frame drawn over every photo cell.
    #[serde(default)]
    pub frame_overlay: Option<PathBuf>,

    /// Fixed cell size. When `None`, the first photo's dimensions are used.
    #[serde(default)]
    pub cell_size: Option<CellSize>,
}

impl Default for CollageLayout {
    fn default() -> Self {
        Self {
            columns: 2,
            gap: 20,
            padding: 40,
            background_color: "#111".to_string(),
            background_image: None,
            frame_overlay: None,
            cell_size: None,
        }
    }
}

/// Pixel dimensions of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

/// Grid geometry resolved for a concrete photo count.
///
/// Every coordinate the compositor paints at is derived from this type,
/// and from nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    pub photo_count: u32,
    pub columns: u32,
    pub rows: u32,
    pub cell: CellSize,
    pub gap: u32,
    pub padding: u32,
}

impl GridGeometry {
    /// Resolve the grid for `photo_count` photos.
    /// `photo_count` and `columns` are clamped to at least 1.
    pub fn for_photos(
        photo_count: u32,
        columns: u32,
        cell: CellSize,
        gap: u32,
        padding: u32,
    ) -> Self {
        let photo_count = photo_count.max(1);
        let columns = columns.max(1);
        Self {
            photo_count,
            columns,
            rows: photo_count.div_ceil(columns),
            cell,
            gap,
            padding,
        }
    }

    /// Total canvas width in pixels.
    pub fn canvas_width(&self) -> u32 {
        self.columns * self.cell.width + (self.columns - 1) * self.gap + 2 * self.padding
    }

    /// Total canvas height in pixels.
    pub fn canvas_height(&self) -> u32 {
        self.rows * self.cell.height + (self.rows - 1) * self.gap + 2 * self.padding
    }

    /// Grid slot `(column, row)` for photo `index`.
    pub fn slot(&self, index: u32) -> (u32, u32) {
        (index % self.columns, index / self.columns)
    }

    /// Top-left canvas pixel of the cell for photo `index`.
    pub fn cell_origin(&self, index: u32) -> (u32, u32) {
        let (col, row) = self.slot(index);
        (
            self.padding + col * (self.cell.width + self.gap),
            self.padding + row * (self.cell.height + self.gap),
        )
    }
}

/// Parse a CSS-style hex color (`#rgb` or `#rrggbb`) into RGBA bytes.
/// Alpha is always opaque.
pub fn parse_hex_color(s: &str) -> Option<[u8; 4]> {
    let hex = s.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let mut out = [0u8, 0, 0, 255];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 16 + v;
            }
            Some(out)
        }
        6 => {
            let mut out = [0u8, 0, 0, 255];
            for i in 0..3 {
                out[i] = u8::from_str_radix(hex.get(i * 2..i * 2 + 2)?, 16).ok()?;
            }
            Some(out)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_four_photos_two_columns() {
        let geo = GridGeometry::for_photos(4, 2, CellSize::new(640, 480), 20, 40);
        assert_eq!(geo.rows, 2);
        assert_eq!(geo.canvas_width(), 2 * 640 + 20 + 80);
        assert_eq!(geo.canvas_height(), 2 * 480 + 20 + 80);
    }

    #[test]
    fn test_nine_photos_three_columns() {
        let geo = GridGeometry::for_photos(9, 3, CellSize::new(100, 100), 10, 5);
        assert_eq!(geo.rows, 3);
        assert_eq!(geo.canvas_width(), 3 * 100 + 2 * 10 + 2 * 5);
        assert_eq!(geo.canvas_height(), 3 * 100 + 2 * 10 + 2 * 5);
    }

    #[test]
    fn test_partial_last_row() {
        // 5 photos in 2 columns leave the sixth slot empty but still
        // reserve the full third row.
        let geo = GridGeometry::for_photos(5, 2, CellSize::new(50, 50), 4, 8);
        assert_eq!(geo.rows, 3);
        assert_eq!(geo.slot(4), (0, 2));
        assert_eq!(geo.canvas_height(), 3 * 50 + 2 * 4 + 2 * 8);
    }

    #[test]
    fn test_row_major_slots() {
        let geo = GridGeometry::for_photos(6, 3, CellSize::new(10, 10), 0, 0);
        assert_eq!(geo.slot(0), (0, 0));
        assert_eq!(geo.slot(2), (2, 0));
        assert_eq!(geo.slot(3), (0, 1));
        assert_eq!(geo.slot(5), (2, 1));
    }

    #[test]
    fn test_cell_origin() {
        let geo = GridGeometry::for_photos(4, 2, CellSize::new(640, 480), 20, 40);
        assert_eq!(geo.cell_origin(0), (40, 40));
        assert_eq!(geo.cell_origin(1), (40 + 640 + 20, 40));
        assert_eq!(geo.cell_origin(2), (40, 40 + 480 + 20));
        assert_eq!(geo.cell_origin(3), (40 + 640 + 20, 40 + 480 + 20));
    }

    #[test]
    fn test_clamps_degenerate_inputs() {
        let geo = GridGeometry::for_photos(0, 0, CellSize::new(10, 10), 2, 2);
        assert_eq!(geo.photo_count, 1);
        assert_eq!(geo.columns, 1);
        assert_eq!(geo.rows, 1);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#111"), Some([17, 17, 17, 255]));
        assert_eq!(parse_hex_color("#000"), Some([0, 0, 0, 255]));
        assert_eq!(parse_hex_color("#ff8800"), Some([255, 136, 0, 255]));
        assert_eq!(parse_hex_color("#1a1a1a"), Some([26, 26, 26, 255]));
        assert_eq!(parse_hex_color("111"), None);
        assert_eq!(parse_hex_color("#12"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
    }

    proptest! {
        /// Every cell lies fully inside the canvas, padding included.
        #[test]
        fn prop_cells_inside_canvas(
            n in 1u32..=64,
            columns in 1u32..=8,
            cw in 1u32..=320,
            ch in 1u32..=240,
            gap in 0u32..=40,
            padding in 0u32..=60,
        ) {
            let geo = GridGeometry::for_photos(n, columns, CellSize::new(cw, ch), gap, padding);
            for i in 0..n {
                let (x, y) = geo.cell_origin(i);
                prop_assert!(x + geo.cell.width + padding <= geo.canvas_width());
                prop_assert!(y + geo.cell.height + padding <= geo.canvas_height());
            }
        }

        /// Distinct photos never share pixels: cells in the same row are
        /// separated horizontally, cells in different rows vertically.
        #[test]
        fn prop_cells_never_overlap(
            n in 2u32..=32,
            columns in 1u32..=6,
            cw in 1u32..=160,
            ch in 1u32..=120,
            gap in 0u32..=20,
            padding in 0u32..=30,
        ) {
            let geo = GridGeometry::for_photos(n, columns, CellSize::new(cw, ch), gap, padding);
            for i in 0..n {
                for j in (i + 1)..n {
                    let (xi, yi) = geo.cell_origin(i);
                    let (xj, yj) = geo.cell_origin(j);
                    let disjoint_x = xi + geo.cell.width <= xj || xj + geo.cell.width <= xi;
                    let disjoint_y = yi + geo.cell.height <= yj || yj + geo.cell.height <= yi;
                    prop_assert!(disjoint_x || disjoint_y);
                }
            }
        }
    }
}
