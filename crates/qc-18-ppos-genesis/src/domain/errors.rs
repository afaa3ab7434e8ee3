use thiserror::Error;

/// Snapshot key-value store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Nothing from the batch was kept.
    #[error("Batch of {total} writes rejected at write #{failed_at}")]
    BatchRejected { failed_at: usize, total: usize },
}

/// Account state (statedb) failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Balance overflow")]
    BalanceOverflow,
}

/// Restricting ledger failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Restricting record has no plans")]
    EmptyPlans,

    #[error("Invalid restricting plan #{index}: {reason}")]
    InvalidPlan { index: usize, reason: String },

    #[error("Account state error: {0}")]
    State(#[from] StateError),
}

/// Node identity to address derivation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error("Node id is not a valid secp256k1 public key: {0}")]
    InvalidPublicKey(String),
}

/// Genesis construction errors.
///
/// Every variant is fatal: the node must refuse to start rather than run
/// with partially seeded consensus state.
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("Failed to derive node address at position {index} (node {node_id}): {source}")]
    IdentityDerivation {
        index: usize,
        node_id: String,
        #[source]
        source: DerivationError,
    },

    #[error("Failed to encode {what}: {reason}")]
    Encode { what: &'static str, reason: String },

    #[error("Snapshot store write failed for {what}: {source}")]
    Store {
        what: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Account state write failed: {0}")]
    State(#[from] StateError),

    #[error("Restricting ledger rejected allowance plan: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Invalid genesis configuration: {0}")]
    InvalidConfig(String),
}
