//! Siteguard Decision Engine
//!
//! Turns noisy per-frame person detections and equipment observations into
//! stable, rate-limited violation events: identity tracking without a
//! re-identification model, a time-windowed missing-equipment vote,
//! enter/exit hysteresis, per-track re-arm and a system-wide post-violation
//! silence window.

pub mod config;
pub mod cooldown;
pub mod engine;
pub mod events;
pub mod geometry;
pub mod items;
pub mod registry;
pub mod track;

// Re-export commonly used types
pub use config::EngineConfig;
pub use cooldown::GlobalCooldown;
pub use engine::{ComplianceEngine, FrameReport};
pub use events::{CollectSink, ViolationEvent};
pub use geometry::BoundingBox;
pub use items::EquipmentItem;
pub use registry::TrackRegistry;
pub use track::{ComplianceState, Track, VoteWindow};

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the decision engine
pub mod traits {
    use super::events::ViolationEvent;

    /// Abstract sink invoked exactly once per transition into Violating.
    ///
    /// Emission is fire-and-forget from the engine's point of view: the
    /// transition has already committed when `emit` runs, and a returned
    /// error is logged, never retried, and never alters tracking state.
    pub trait EventSink {
        fn emit(&mut self, event: &ViolationEvent) -> crate::Result<()>;
    }
}
