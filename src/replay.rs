//! Recorded detector output as a frame source.
//!
//! A recording is JSONL: one frame per line, carrying the capture time,
//! the stage-A person boxes and, on frames where the recorder ran the
//! equipment model, the present-equipment class ids per person.

use anyhow::{Context, Result};
use serde::Deserialize;
use siteguard_core::BoundingBox;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One recorded frame.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayFrame {
    /// Monotonic capture time in seconds
    pub t: f64,
    /// Person boxes as [x1, y1, x2, y2]
    #[serde(default)]
    pub persons: Vec<[i32; 4]>,
    /// Present-equipment class ids per person; absent on frames where the
    /// equipment model did not run
    #[serde(default)]
    pub items: Option<Vec<Vec<usize>>>,
    /// Captured frame image, when the recorder kept pixels
    #[serde(default)]
    pub image: Option<PathBuf>,
}

impl ReplayFrame {
    pub fn person_boxes(&self) -> Vec<BoundingBox> {
        self.persons.iter().map(|&b| BoundingBox::from(b)).collect()
    }
}

/// Load a recording; malformed lines are logged and skipped.
pub fn load_recording(path: &Path) -> Result<Vec<ReplayFrame>> {
    let file = File::open(path).with_context(|| format!("Failed to open recording: {:?}", path))?;
    let reader = BufReader::new(file);

    let mut frames = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line
            .with_context(|| format!("Failed to read line {} from {:?}", line_num + 1, path))?;

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ReplayFrame>(&line) {
            Ok(frame) => frames.push(frame),
            Err(e) => log::warn!(
                "skipping malformed frame at line {}: {}",
                line_num + 1,
                e
            ),
        }
    }

    log::info!("loaded {} frames from {:?}", frames.len(), path);
    Ok(frames)
}
