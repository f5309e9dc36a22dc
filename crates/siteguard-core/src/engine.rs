//! Per-frame compliance engine facade.

use crate::config::EngineConfig;
use crate::cooldown::GlobalCooldown;
use crate::events::ViolationEvent;
use crate::geometry::BoundingBox;
use crate::items::EquipmentItem;
use crate::registry::TrackRegistry;
use crate::traits::EventSink;
use std::collections::HashSet;

/// Outcome of one processed frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// True while the global silence window suppresses evaluation
    pub silence_active: bool,
    /// Seconds left in the silence window, 0 when inactive
    pub silence_remaining: f64,
    /// Set on the frame the silence window ended and all tracks were dropped
    pub tracks_reset: bool,
    /// Matched track id per input detection; None for excluded boxes.
    /// Empty while silence is active (frames are observed, not evaluated).
    pub assignments: Vec<Option<u64>>,
}

impl FrameReport {
    /// Ids of the tracks matched this frame
    pub fn active_tracks(&self) -> Vec<u64> {
        self.assignments.iter().copied().flatten().collect()
    }
}

/// Turns per-frame detection results into stable, rate-limited violation
/// events.
///
/// Single-threaded by design: every method must be called from the one
/// thread that owns the frame loop, with a monotonic `now` in seconds.
/// Wall-clock sources that can move backward break the window invariants.
pub struct ComplianceEngine {
    config: EngineConfig,
    registry: TrackRegistry,
    cooldown: GlobalCooldown,
    /// Silence gate sampled once at the top of each frame. A violation
    /// fired mid-frame opens the cooldown for the next frame but does not
    /// suppress the remaining tracks of the current one.
    evaluating: bool,
}

impl ComplianceEngine {
    pub fn new(config: EngineConfig) -> Self {
        let registry = TrackRegistry::new(config.association_overlap, config.track_timeout_secs);
        let cooldown = GlobalCooldown::new(config.global_silence_secs);
        Self {
            config,
            registry,
            cooldown,
            evaluating: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    pub fn cooldown(&self) -> &GlobalCooldown {
        &self.cooldown
    }

    /// Advance one frame: cooldown gate first, then association.
    ///
    /// While the global silence window is open no track is touched; on the
    /// frame it closes every track is discarded, because identities that
    /// idled through the silent period cannot be trusted to resume voting.
    pub fn process_frame(&mut self, detections: &[BoundingBox], now: f64) -> FrameReport {
        let tracks_reset = self.cooldown.tick(now);
        if tracks_reset {
            self.registry.reset();
            log::info!("global silence ended, resuming detection (tracks reset)");
        }

        if self.cooldown.is_active(now) {
            self.evaluating = false;
            return FrameReport {
                silence_active: true,
                silence_remaining: self.cooldown.remaining(now),
                tracks_reset: false,
                assignments: Vec::new(),
            };
        }
        self.evaluating = true;

        let assignments = self.registry.update(detections, now);
        FrameReport {
            silence_active: false,
            silence_remaining: 0.0,
            tracks_reset,
            assignments,
        }
    }

    /// Record one equipment observation for a matched track and run the
    /// hysteresis step.
    ///
    /// Computes `missing = required - present`, votes, and evaluates the
    /// enter/exit thresholds. At most one event is emitted, and the
    /// transition is committed before the sink runs: a failing sink is
    /// logged and changes nothing. No-op on silenced frames and for
    /// unknown track ids (e.g. already evicted).
    pub fn observe_equipment(
        &mut self,
        track_id: u64,
        present: &HashSet<EquipmentItem>,
        now: f64,
        sink: &mut dyn EventSink,
    ) -> Option<ViolationEvent> {
        if !self.evaluating {
            return None;
        }

        let missing: Vec<EquipmentItem> = self
            .config
            .required_items
            .iter()
            .copied()
            .filter(|item| !present.contains(item))
            .collect();

        let track = self.registry.get_mut(track_id)?;
        track
            .votes
            .record(now, !missing.is_empty(), self.config.vote_window_secs);
        let ratio = track.votes.ratio();
        let event = track.evaluate(now, missing, &self.config)?;

        let was_active = self.cooldown.is_active(now);
        self.cooldown.trigger(now);
        if !was_active {
            log::info!(
                "track {} violating (ratio {:.2}, missing {}), entering global silence for {:.0}s",
                track_id,
                ratio,
                event.missing_tag(),
                self.config.global_silence_secs
            );
        }

        if let Err(err) = sink.emit(&event) {
            log::warn!("event sink failed for track {}: {:#}", track_id, err);
        }

        Some(event)
    }
}
