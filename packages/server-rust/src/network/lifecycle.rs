//! Lifecycle phase tracking shared between the coordinator and health probes.
//!
//! Uses `ArcSwap` for lock-free phase transitions.

use std::sync::Arc;

use arc_swap::ArcSwap;

/// Server lifecycle phase, advanced by the coordinator.
///
/// State machine: Starting -> Running -> `ShuttingDown` -> Terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Capability, middleware, and sinks are being assembled.
    Starting,
    /// Listener and signal tasks are running.
    Running,
    /// A termination event was received; remaining tasks are being stopped.
    ShuttingDown,
    /// All tasks are gone.
    Terminated,
}

impl LifecyclePhase {
    /// Lowercase name used in logs and health output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::ShuttingDown => "shutting_down",
            Self::Terminated => "terminated",
        }
    }
}

/// Shared, cheaply cloneable view of the current lifecycle phase.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    phase: Arc<ArcSwap<LifecyclePhase>>,
}

impl Lifecycle {
    /// Creates a tracker in the `Starting` phase.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Arc::new(ArcSwap::from_pointee(LifecyclePhase::Starting)),
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> LifecyclePhase {
        **self.phase.load()
    }

    pub(crate) fn advance(&self, next: LifecyclePhase) {
        self.phase.store(Arc::new(next));
        tracing::debug!(phase = next.as_str(), "lifecycle phase changed");
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_phase_is_starting() {
        assert_eq!(Lifecycle::new().phase(), LifecyclePhase::Starting);
    }

    #[test]
    fn clones_observe_transitions() {
        let lifecycle = Lifecycle::new();
        let observer = lifecycle.clone();

        lifecycle.advance(LifecyclePhase::Running);
        assert_eq!(observer.phase(), LifecyclePhase::Running);

        lifecycle.advance(LifecyclePhase::ShuttingDown);
        lifecycle.advance(LifecyclePhase::Terminated);
        assert_eq!(observer.phase(), LifecyclePhase::Terminated);
    }

    #[test]
    fn phase_names() {
        assert_eq!(LifecyclePhase::Running.as_str(), "running");
        assert_eq!(LifecyclePhase::ShuttingDown.as_str(), "shutting_down");
    }
}
