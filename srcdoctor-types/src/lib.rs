//! Shared DTOs (schemas-as-code) for the srcdoctor workspace.
//!
//! # Design constraints
//! - `LedgerEntry` is serialized to disk and read back across runs.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod diagnostic;
pub mod fix;
pub mod ledger;

pub use diagnostic::{Diagnostic, Severity};
pub use fix::{Fix, FixCategory, LineEdit};
pub use ledger::LedgerEntry;

/// Schema identifiers.
pub mod schema {
    pub const SRCDOCTOR_LEDGER_V1: &str = "srcdoctor.ledger.v1";
}
