//! # Outbound Ports (Driven Ports)

/// State that can be checkpointed and rolled back within one call.
///
/// Implemented by the execution context (typically the state database's
/// journal). Snapshots are stack-like: reverting to one discards every
/// write made after it.
pub trait Journaled {
    type Snapshot;

    /// Checkpoint the current state.
    fn snapshot(&mut self) -> Self::Snapshot;

    /// Discard every write made since `snapshot`.
    fn revert_to(&mut self, snapshot: Self::Snapshot);
}
