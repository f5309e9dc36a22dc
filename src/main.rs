//! Replay-driven compliance monitor.
//!
//! Feeds a recorded detector stream through the decision engine with the
//! same frame loop a live deployment runs: silence gate, association,
//! sampled equipment observation, emitters.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use siteguard_core::{ComplianceEngine, EngineConfig, EquipmentItem};
use siteguard_cv::{sanitize, EvidenceWriter, LabelMap};
use std::collections::HashSet;
use std::path::Path;

mod replay;
mod sinks;

const HEARTBEAT_SECS: f64 = 5.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Protective-equipment compliance monitor", long_about = None)]
struct Args {
    /// Run configuration (JSON)
    #[arg(short, long, default_value = "config/siteguard.json")]
    config: String,

    /// Recorded detector output (JSONL, one frame per line)
    #[arg(short, long)]
    input: String,

    /// Violation event log
    #[arg(long, default_value = "events/events.jsonl")]
    events: String,

    /// Directory for annotated evidence frames
    #[arg(long, default_value = "events/images")]
    evidence_dir: String,

    /// Backend URL to notify on each violation
    #[arg(long)]
    notify_url: Option<String>,

    /// TTF font used for evidence labels
    #[arg(long)]
    font: Option<String>,
}

/// Pipeline settings around the engine.
#[derive(Debug, Clone, Deserialize)]
struct RunConfig {
    engine: EngineConfig,
    /// Run the equipment check every Nth evaluated frame (1 = every
    /// sampled frame in the recording)
    check_every: u64,
    /// Equipment model class-name table, resolved through LabelMap
    class_names: Vec<String>,
    frame_width: u32,
    frame_height: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            check_every: 1,
            class_names: EquipmentItem::ALL
                .iter()
                .map(|i| i.as_str().to_string())
                .collect(),
            frame_width: 1280,
            frame_height: 720,
        }
    }
}

fn load_run_config(path: &str) -> Result<RunConfig> {
    if !Path::new(path).exists() {
        log::info!("no config at {}, using built-in defaults", path);
        return Ok(RunConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid config: {}", path))
}

fn run(args: &Args) -> Result<()> {
    let config = load_run_config(&args.config)?;
    let frames = replay::load_recording(Path::new(&args.input))?;
    let labels = LabelMap::from_class_names(&config.class_names);

    let mut evidence = EvidenceWriter::new(&args.evidence_dir)?;
    if let Some(font) = &args.font {
        evidence = evidence.with_font(font);
    }
    let mut emitters = sinks::EmitterStack::new(
        Some(evidence),
        Some(sinks::JsonlSink::new(&args.events)?),
        args.notify_url.clone().map(sinks::HttpSink::new),
    );

    let mut engine = ComplianceEngine::new(config.engine.clone());

    let mut frame_id: u64 = 0;
    let mut last_heartbeat: Option<f64> = None;
    let mut total_events = 0usize;

    for frame in &frames {
        let now = frame.t;
        let boxes = sanitize::clamp_detections(
            &frame.person_boxes(),
            config.frame_width,
            config.frame_height,
        );

        let report = engine.process_frame(&boxes, now);
        if report.silence_active {
            log::debug!("system silent ({:.0}s left)", report.silence_remaining);
            continue;
        }
        frame_id += 1;

        let do_check = config.check_every > 0 && frame_id % config.check_every == 0;
        if let (true, Some(items)) = (do_check, frame.items.as_ref()) {
            emitters.set_frame(frame.image.as_deref().and_then(load_frame_image));

            for (det_idx, class_ids) in items.iter().enumerate() {
                let Some(track_id) = report.assignments.get(det_idx).copied().flatten() else {
                    continue;
                };
                let present: HashSet<EquipmentItem> = class_ids
                    .iter()
                    .filter_map(|&id| labels.item_for_id(id))
                    .collect();

                if let Some(event) =
                    engine.observe_equipment(track_id, &present, now, &mut emitters)
                {
                    total_events += 1;
                    log::info!(
                        "violation: track {} missing {}",
                        event.track_id,
                        event.missing_tag()
                    );
                }
            }
        }

        if last_heartbeat.map_or(true, |t| now - t >= HEARTBEAT_SECS) {
            log::info!(
                "t={:.1}s persons={} events={}",
                now,
                report.active_tracks().len(),
                total_events
            );
            last_heartbeat = Some(now);
        }
    }

    log::info!(
        "replay complete: {} frames, {} violation events",
        frames.len(),
        total_events
    );
    Ok(())
}

fn load_frame_image(path: &Path) -> Option<image::RgbImage> {
    match image::open(path) {
        Ok(img) => Some(img.to_rgb8()),
        Err(e) => {
            log::warn!("could not load frame image {:?}: {}", path, e);
            None
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
