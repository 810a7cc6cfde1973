//! Snapbooth Render Engine
//!
//! Turns a set of captured photos into the finished collage and writes
//! the session bundle to disk.
//!
//! # Pipeline Architecture
//!
//! ```text
//! shots (JPEG) ──▶ decode ──┐
//!                           ├── grid placement ──▶ canvas
//! background.png ──▶ load ──┤        │
//! frame.png ──────▶ load ───┘        ▼
//!                              encode (JPEG)
//!                                    │
//!                         ┌──────────┴──────────┐
//!                         ▼                     ▼
//!                  photobooth.jpg        data:image/jpeg;base64,...
//! ```
//!
//! Composition itself is pure pixel math; decoding and disk output live
//! at the edges.

pub mod compositor;
pub mod export;
pub mod loader;

pub use compositor::{render, ResolvedLayout, FRAME_OVERLAY_INSET_PX};
pub use export::*;
pub use loader::{load, load_layout_assets, ImageSource, LayoutAssets};
