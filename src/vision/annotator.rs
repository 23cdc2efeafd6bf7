// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounding-box and label rendering for analyzed photos

use std::path::Path;

use ab_glyph::{FontRef, InvalidFont, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use tracing::warn;

use crate::analysis::Detection;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LABEL_BG: Rgb<u8> = Rgb([0, 0, 0]);
const LABEL_FG: Rgb<u8> = Rgb([255, 255, 255]);

// Bundled label face; the image crate has no text primitives of its own.
const LABEL_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans-Bold.ttf");

/// Renders detection overlays sized relative to image dimensions
pub struct Annotator {
    font: FontRef<'static>,
}

impl Annotator {
    /// Create an annotator, parsing the bundled label font
    pub fn new() -> Result<Self, InvalidFont> {
        let font = FontRef::try_from_slice(LABEL_FONT)?;
        Ok(Self { font })
    }

    /// Draw boxes and labels for every detection onto a copy of the image
    ///
    /// Stroke width (`max(3, width/300)`) and label size scale with image
    /// width so overlays stay legible on large photos. The innermost ring of
    /// each box sits exactly on the detection coordinates; extra thickness
    /// grows outward and is clipped at the canvas edge.
    pub fn draw_detections(&self, image: &RgbImage, detections: &[Detection]) -> RgbImage {
        let mut canvas = image.clone();
        let width = canvas.width();
        let thickness = (width as i32 / 300).max(3);
        let scale = PxScale::from((width as f32 / 1200.0).max(0.6) * 22.0);

        for detection in detections {
            let [x1, y1, x2, y2] = detection.bbox;
            // Edges land on both corners inclusive, like the API reports them
            let box_w = (x2 - x1 + 1).max(1) as u32;
            let box_h = (y2 - y1 + 1).max(1) as u32;

            for i in 0..thickness {
                let ring = Rect::at(x1 - i, y1 - i)
                    .of_size(box_w + 2 * i as u32, box_h + 2 * i as u32);
                draw_hollow_rect_mut(&mut canvas, ring, BOX_COLOR);
            }

            let label = detection.label();
            let (text_w, text_h) = text_size(scale, &self.font, &label);

            // Label sits just above the box, clamped inside the top edge.
            let baseline = (y1 - 10).max(text_h as i32 + 10);
            let background = Rect::at(x1, baseline - text_h as i32 - 5)
                .of_size(text_w.max(1), text_h + 10);
            draw_filled_rect_mut(&mut canvas, background, LABEL_BG);
            draw_text_mut(
                &mut canvas,
                LABEL_FG,
                x1,
                baseline - text_h as i32,
                scale,
                &self.font,
                &label,
            );
        }

        canvas
    }

    /// Annotate the image stored at `path`
    ///
    /// Returns `None` when the source cannot be read or decoded; the caller
    /// skips display in that case.
    pub fn annotate_file(&self, path: &Path, detections: &[Detection]) -> Option<RgbImage> {
        let image = match image::open(path) {
            Ok(img) => img.to_rgb8(),
            Err(e) => {
                warn!("cannot read {} for annotation: {}", path.display(), e);
                return None;
            }
        };

        Some(self.draw_detections(&image, detections))
    }
}
