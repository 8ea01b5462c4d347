//! Session state: the phase machine and the snapshot consumed by views.

mod phase;
mod snapshot;

pub use phase::SessionPhase;
pub use snapshot::SessionSnapshot;
