//! Evidence-frame rendering.
//!
//! On a violation the triggering frame is annotated (person box plus a
//! `MISS:<items>` label) and written as a JPEG next to the event log, so
//! a reviewer can see what the detector saw.

use ab_glyph::{FontRef, PxScale};
use anyhow::Context;
use chrono::Local;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use siteguard_core::ViolationEvent;
use std::path::{Path, PathBuf};

use crate::Result;

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const LABEL_SCALE: f32 = 18.0;
const BOX_THICKNESS: i32 = 2;

/// Writes annotated violation frames into an output directory.
pub struct EvidenceWriter {
    out_dir: PathBuf,
    font: Option<FontRef<'static>>,
}

impl EvidenceWriter {
    /// Create the writer and its output directory.
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Result<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create evidence dir: {:?}", out_dir))?;
        Ok(Self {
            out_dir,
            font: None,
        })
    }

    /// Load a TTF font for the text label.
    ///
    /// Without a font only the box is drawn; annotation never becomes a
    /// reason to drop evidence.
    pub fn with_font<P: AsRef<Path>>(mut self, path: P) -> Self {
        match std::fs::read(path.as_ref()) {
            Ok(bytes) => {
                // The font outlives the writer; leak once at startup.
                let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                match FontRef::try_from_slice(bytes) {
                    Ok(font) => self.font = Some(font),
                    Err(e) => log::warn!("unusable font {:?}: {}", path.as_ref(), e),
                }
            }
            Err(e) => log::warn!("could not read font {:?}: {}", path.as_ref(), e),
        }
        self
    }

    /// Annotate a copy of `frame` for `event` and save it as a JPEG.
    ///
    /// Returns the written path, e.g. `ev_20250131_142501_helmet-vest.jpg`.
    pub fn save(&self, frame: &RgbImage, event: &ViolationEvent) -> Result<PathBuf> {
        let mut img = frame.clone();
        let bbox = event.bbox.clamp_to(img.width(), img.height());

        if bbox.is_valid() {
            for inset in 0..BOX_THICKNESS {
                let width = bbox.width() - 2 * inset;
                let height = bbox.height() - 2 * inset;
                if width <= 0 || height <= 0 {
                    break;
                }
                draw_hollow_rect_mut(
                    &mut img,
                    Rect::at(bbox.x1 + inset, bbox.y1 + inset)
                        .of_size(width as u32, height as u32),
                    BOX_COLOR,
                );
            }

            if let Some(font) = &self.font {
                let label = format!("MISS:{}", event.missing_tag());
                let y = (bbox.y1 - LABEL_SCALE as i32 - 2).max(0);
                draw_text_mut(
                    &mut img,
                    BOX_COLOR,
                    bbox.x1,
                    y,
                    PxScale::from(LABEL_SCALE),
                    font,
                    &label,
                );
            }
        }

        let filename = format!(
            "ev_{}_{}.jpg",
            Local::now().format("%Y%m%d_%H%M%S"),
            event.missing_tag()
        );
        let path = self.out_dir.join(filename);
        img.save(&path)
            .with_context(|| format!("Failed to save evidence image: {:?}", path))?;

        log::info!("evidence saved -> {:?}", path);
        Ok(path)
    }
}
