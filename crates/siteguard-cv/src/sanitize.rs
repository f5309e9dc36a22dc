//! Detector-output sanitation.
//!
//! Raw model output is noisy: boxes poke past the frame, and zero-area
//! boxes show up on bad frames. Tracking must never halt on them, so they
//! are clipped or dropped here, before the engine sees anything.

use image::{imageops, RgbImage};
use siteguard_core::BoundingBox;

/// Clamp raw detector boxes to the frame and drop degenerate ones.
pub fn clamp_detections(boxes: &[BoundingBox], width: u32, height: u32) -> Vec<BoundingBox> {
    boxes
        .iter()
        .map(|b| b.clamp_to(width, height))
        .filter(|b| b.is_valid())
        .collect()
}

/// Cut a person crop with `pad` pixels of margin, clamped to the frame.
///
/// Returns None when the padded region collapses to nothing, e.g. for a
/// box that lies entirely outside the frame.
pub fn person_crop(frame: &RgbImage, bbox: &BoundingBox, pad: i32) -> Option<RgbImage> {
    let x1 = (bbox.x1 - pad).max(0);
    let y1 = (bbox.y1 - pad).max(0);
    let x2 = (bbox.x2 + pad).min(frame.width() as i32);
    let y2 = (bbox.y2 + pad).min(frame.height() as i32);

    if x2 <= x1 || y2 <= y1 {
        return None;
    }

    let crop = imageops::crop_imm(
        frame,
        x1 as u32,
        y1 as u32,
        (x2 - x1) as u32,
        (y2 - y1) as u32,
    );
    Some(crop.to_image())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_keeps_inside_boxes() {
        let boxes = vec![BoundingBox::new(10, 10, 100, 200)];
        let clean = clamp_detections(&boxes, 1280, 720);
        assert_eq!(clean, boxes);
    }

    #[test]
    fn test_clamp_clips_overhanging_box() {
        let boxes = vec![BoundingBox::new(-20, 600, 300, 900)];
        let clean = clamp_detections(&boxes, 1280, 720);
        assert_eq!(clean, vec![BoundingBox::new(0, 600, 300, 719)]);
    }

    #[test]
    fn test_clamp_drops_degenerate_box() {
        let boxes = vec![
            BoundingBox::new(50, 50, 50, 80),     // zero width
            BoundingBox::new(2000, 100, 2100, 200), // fully outside
        ];
        assert!(clamp_detections(&boxes, 1280, 720).is_empty());
    }

    #[test]
    fn test_person_crop_is_padded_and_clamped() {
        let frame = RgbImage::new(200, 200);

        let crop = person_crop(&frame, &BoundingBox::new(10, 10, 50, 90), 4).unwrap();
        assert_eq!((crop.width(), crop.height()), (48, 88));

        // Padding cannot escape the frame at the origin.
        let crop = person_crop(&frame, &BoundingBox::new(0, 0, 20, 20), 4).unwrap();
        assert_eq!((crop.width(), crop.height()), (24, 24));
    }

    #[test]
    fn test_person_crop_outside_frame() {
        let frame = RgbImage::new(100, 100);
        assert!(person_crop(&frame, &BoundingBox::new(300, 300, 400, 400), 4).is_none());
    }
}
