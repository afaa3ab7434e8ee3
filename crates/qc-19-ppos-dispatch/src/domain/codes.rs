//! # Function Codes
//!
//! Codes are grouped in blocks of 1000 per contract. Within a block:
//!
//! | `code % 1000` | Kind |
//! |---------------|------|
//! | `0..100` | mutating (transaction) |
//! | `100..200` | query (call, must not write) |
//! | `200..1000` | reserved |

/// Whether a function may write state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Mutating,
    Query,
    Reserved,
}

impl FunctionKind {
    #[must_use]
    pub const fn of(code: u16) -> Self {
        match code % 1000 {
            0..=99 => Self::Mutating,
            100..=199 => Self::Query,
            _ => Self::Reserved,
        }
    }

    #[must_use]
    pub const fn is_query(self) -> bool {
        matches!(self, Self::Query)
    }
}

/// Staking contract functions.
pub mod staking {
    pub const CREATE_STAKING: u16 = 1000;
    pub const EDIT_CANDIDATE: u16 = 1001;
    pub const INCREASE_STAKING: u16 = 1002;
    pub const WITHDREW_STAKING: u16 = 1003;
    pub const DELEGATE: u16 = 1004;
    pub const WITHDREW_DELEGATE: u16 = 1005;

    pub const GET_VERIFIER_LIST: u16 = 1100;
    pub const GET_VALIDATOR_LIST: u16 = 1101;
    pub const GET_CANDIDATE_LIST: u16 = 1102;
    pub const GET_RELATED_LIST_BY_DEL_ADDR: u16 = 1103;
    pub const GET_DELEGATE_INFO: u16 = 1104;
    pub const GET_CANDIDATE_INFO: u16 = 1105;
}

/// Governance contract functions.
pub mod governance {
    pub const SUBMIT_TEXT: u16 = 2000;
    pub const SUBMIT_VERSION: u16 = 2001;
    pub const VOTE: u16 = 2002;
    pub const DECLARE_VERSION: u16 = 2003;

    pub const GET_PROPOSAL: u16 = 2100;
    pub const GET_TALLY_RESULT: u16 = 2101;
    pub const LIST_PROPOSAL: u16 = 2102;
}
