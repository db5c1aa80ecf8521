//! The cambrian engine: the per-step scheduler, the generation driver,
//! species clustering, run statistics and snapshot persistence, layered on
//! the core types.

mod generation;
pub mod genomics;
pub mod persistence;
pub mod simulation;
pub mod stats;

pub use persistence::{Snapshot, SnapshotError, SnapshotResult};
pub use simulation::Simulation;
pub use stats::{GenerationSummary, RunHistory};

pub use cambrian_core::*;

/// Installs a process-wide tracing subscriber for the engine's generation
/// events, once. Embedders with their own subscriber just skip this.
pub fn init_logging() {
    use std::sync::Once;
    static INIT_LOGGING: Once = Once::new();

    INIT_LOGGING.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .compact(),
            )
            .init();
    });
}
