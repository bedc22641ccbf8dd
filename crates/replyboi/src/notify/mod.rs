//! # Cross-Context Reset Notification
//!
//! The authoritative counter is not the only place a count lives. A dependent
//! context (for example the page-side interceptor) keeps its own mirror so it
//! does not have to round-trip through the store on every event. When the
//! authoritative count is zeroed (manual reset or day rollover) those mirrors
//! should be zeroed too.
//!
//! ## Delivery
//!
//! [`Notifier::broadcast_reset`] tries each registered [`MirrorTarget`] once:
//!
//! 1. **Message**: send `RESET_LOCAL` through [`MirrorTarget::deliver`].
//! 2. **Fallback**: if that fails, write the mirror directly via
//!    [`MirrorTarget::zero_mirror`].
//! 3. **Give up**: if both fail the target is reported as unreachable.
//!
//! Delivery is at-most-once and never blocks the caller on a dependent. Every
//! failure is swallowed: a dependent that misses a reset can at worst push a
//! stale, higher count through `SYNC_COUNT`, which max-wins reconciliation
//! bounds to the replies made in the gap.
//!
//! ## Implementations
//!
//! - [`fs_mirror::FsMirror`]: a dependent living in a directory on disk.
//! - [`mem_mirror::MemMirror`]: in-memory dependent with switchable failures.

use crate::protocol::DependentMessage;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub mod fs_mirror;
pub mod mem_mirror;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("dependent '{0}' is not loaded")]
    NotLoaded(String),

    #[error("dependent '{0}' does not exist")]
    Missing(String),

    #[error("invalid dependent name: {0:?}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A dependent context holding a non-authoritative copy of the count.
pub trait MirrorTarget {
    fn name(&self) -> &str;

    /// Primary path: hand the dependent a message to act on.
    fn deliver(&self, message: &DependentMessage) -> Result<(), DeliveryError>;

    /// Fallback path: zero the dependent's mirror directly.
    fn zero_mirror(&self) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered,
    FellBack,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetOutcome {
    pub target: String,
    pub outcome: DeliveryOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl BroadcastReport {
    pub fn count(&self, outcome: DeliveryOutcome) -> usize {
        self.outcomes.iter().filter(|o| o.outcome == outcome).count()
    }

    pub fn outcome_for(&self, target: &str) -> Option<DeliveryOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.target == target)
            .map(|o| o.outcome)
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[derive(Default)]
pub struct Notifier {
    targets: Vec<Box<dyn MirrorTarget>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: impl MirrorTarget + 'static) -> Self {
        self.register(Box::new(target));
        self
    }

    pub fn register(&mut self, target: Box<dyn MirrorTarget>) {
        self.targets.push(target);
    }

    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn broadcast_reset(&self) -> BroadcastReport {
        let message = DependentMessage::ResetLocal;
        let outcomes = self
            .targets
            .iter()
            .map(|target| {
                let outcome = match target.deliver(&message) {
                    Ok(()) => DeliveryOutcome::Delivered,
                    Err(err) => {
                        debug!(dependent = target.name(), error = %err, "reset not delivered, writing mirror directly");
                        match target.zero_mirror() {
                            Ok(()) => DeliveryOutcome::FellBack,
                            Err(err) => {
                                debug!(dependent = target.name(), error = %err, "dependent unreachable");
                                DeliveryOutcome::Unreachable
                            }
                        }
                    }
                };
                TargetOutcome {
                    target: target.name().to_string(),
                    outcome,
                }
            })
            .collect();
        BroadcastReport { outcomes }
    }
}
