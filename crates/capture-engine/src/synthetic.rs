//! Synthetic camera backend.
//!
//! Produces a deterministic animated test pattern: four distinct corner
//! markers over a scrolling horizontal gradient. The pattern is
//! horizontally asymmetric on purpose, which lets capture tests verify
//! that photos are mirrored.

use image::{ImageBuffer, Rgb, RgbImage};

use snapbooth_common::clock::{SessionClock, TickGate};
use snapbooth_common::error::{BoothError, BoothResult};

use crate::stream::{CameraStream, VideoFrame};

/// Deterministic test-pattern camera. No device, no system libraries.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    sequence: u64,
    clock: SessionClock,
    gate: TickGate,
    live: bool,
}

impl SyntheticCamera {
    /// A camera animating its pattern at 30 fps.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_fps(width, height, 30)
    }

    pub fn with_fps(width: u32, height: u32, fps: u32) -> Self {
        Self {
            width: width.max(8),
            height: height.max(8),
            sequence: 0,
            clock: SessionClock::start(),
            gate: TickGate::from_hz(fps),
            live: true,
        }
    }

    /// Render the pattern for a given frame number.
    pub fn render_pattern(&self, sequence: u64) -> RgbImage {
        let mut img = ImageBuffer::from_pixel(self.width, self.height, Rgb([40, 40, 50]));

        // Green gradient that scrolls with the frame number.
        let shift = (sequence * 4 % u64::from(self.width)) as u32;
        for y in 0..self.height {
            for x in 0..self.width {
                let g = (((x + shift) % self.width) * 255 / self.width) as u8;
                img.put_pixel(x, y, Rgb([40, g, 50]));
            }
        }

        // Corner markers: red top-left, blue top-right, yellow bottom-left,
        // cyan bottom-right. Left and right never share a color.
        let marker = (self.width.min(self.height) / 8).max(1);
        fill_rect(&mut img, 0, 0, marker, marker, Rgb([220, 40, 40]));
        fill_rect(&mut img, self.width - marker, 0, marker, marker, Rgb([40, 40, 220]));
        fill_rect(
            &mut img,
            0,
            self.height - marker,
            marker,
            marker,
            Rgb([220, 220, 40]),
        );
        fill_rect(
            &mut img,
            self.width - marker,
            self.height - marker,
            marker,
            marker,
            Rgb([40, 220, 220]),
        );

        img
    }
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

impl CameraStream for SyntheticCamera {
    fn current_frame(&mut self) -> BoothResult<VideoFrame> {
        if !self.live {
            return Err(BoothError::capture("synthetic stream is stopped"));
        }
        // Advance the animation only when its frame interval elapsed, so
        // rapid sampling sees a stable image.
        if self.gate.should_tick(self.clock.elapsed_ms()) {
            self.sequence += 1;
        }
        Ok(VideoFrame {
            sequence: self.sequence,
            image: self.render_pattern(self.sequence),
        })
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn stop(&mut self) -> BoothResult<()> {
        self.live = false;
        Ok(())
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
