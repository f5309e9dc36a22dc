//! Concrete event emitters behind the engine's sink interface.

use anyhow::{Context, Result};
use chrono::Local;
use image::RgbImage;
use serde::Serialize;
use siteguard_core::traits::EventSink;
use siteguard_core::ViolationEvent;
use siteguard_cv::EvidenceWriter;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Append-only event log, one JSON record per line, never rewritten.
pub struct JsonlSink {
    path: PathBuf,
}

#[derive(Serialize)]
struct EventRecord<'a> {
    timestamp: String,
    stream_time: f64,
    track_id: u64,
    missing: Vec<&'static str>,
    person_box: [i32; 4],
    evidence: Option<&'a str>,
}

impl JsonlSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create event log dir: {:?}", parent))?;
        }
        Ok(Self { path })
    }

    pub fn append(&mut self, event: &ViolationEvent, evidence: Option<&Path>) -> Result<()> {
        let record = EventRecord {
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            stream_time: event.timestamp,
            track_id: event.track_id,
            missing: event.missing.iter().map(|item| item.as_str()).collect(),
            person_box: event.bbox.to_array(),
            evidence: evidence.and_then(|p| p.to_str()),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open event log: {:?}", self.path))?;
        let line = serde_json::to_string(&record).context("Failed to serialize event record")?;
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to append event to {:?}", self.path))?;
        Ok(())
    }
}

impl EventSink for JsonlSink {
    fn emit(&mut self, event: &ViolationEvent) -> siteguard_core::Result<()> {
        self.append(event, None)
    }
}

/// Posts violation codes to the backend.
pub struct HttpSink {
    url: String,
    agent: ureq::Agent,
}

impl HttpSink {
    pub fn new(url: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();
        Self { url, agent }
    }
}

impl EventSink for HttpSink {
    fn emit(&mut self, event: &ViolationEvent) -> siteguard_core::Result<()> {
        let body = serde_json::json!({
            "kinds": event.violation_codes(),
            "track_id": event.track_id,
            "captured_at": Local::now().to_rfc3339(),
        });

        let response = self
            .agent
            .post(&self.url)
            .send_json(body)
            .with_context(|| format!("Failed to post violation to {}", self.url))?;
        log::info!("violation upload -> {}", response.status());
        Ok(())
    }
}

/// Fan-out emitter: evidence image, event log, backend notification.
///
/// Each stage is fire-and-forget; one failing collaborator must never
/// block the others or reach back into the engine, so failures stop at a
/// warning here.
pub struct EmitterStack {
    evidence: Option<EvidenceWriter>,
    frame: Option<RgbImage>,
    jsonl: Option<JsonlSink>,
    http: Option<HttpSink>,
}

impl EmitterStack {
    pub fn new(
        evidence: Option<EvidenceWriter>,
        jsonl: Option<JsonlSink>,
        http: Option<HttpSink>,
    ) -> Self {
        Self {
            evidence,
            frame: None,
            jsonl,
            http,
        }
    }

    /// Hand over the pixels of the frame about to be evaluated, so an
    /// event fired from it can be rendered as evidence.
    pub fn set_frame(&mut self, frame: Option<RgbImage>) {
        self.frame = frame;
    }
}

impl EventSink for EmitterStack {
    fn emit(&mut self, event: &ViolationEvent) -> siteguard_core::Result<()> {
        let evidence_path = match (&self.evidence, &self.frame) {
            (Some(writer), Some(frame)) => match writer.save(frame, event) {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("evidence rendering failed: {:#}", e);
                    None
                }
            },
            _ => None,
        };

        if let Some(jsonl) = &mut self.jsonl {
            if let Err(e) = jsonl.append(event, evidence_path.as_deref()) {
                log::warn!("event log append failed: {:#}", e);
            }
        }

        if let Some(http) = &mut self.http {
            if let Err(e) = http.emit(event) {
                log::warn!("violation upload failed: {:#}", e);
            }
        }

        Ok(())
    }
}
