use crate::fix::FixCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One append-only ledger row: a single apply-and-validate attempt.
///
/// Never updated or deleted. Schema evolution is additive-only; new fields
/// must carry `#[serde(default)]` so old rows keep parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub schema: String,
    pub ts: DateTime<Utc>,
    /// Groups entries written by one orchestrator invocation.
    pub run_id: Uuid,
    pub file: String,
    pub message: String,
    pub category: FixCategory,
    pub confidence: f64,
    pub success: bool,
}

impl LedgerEntry {
    pub fn new(
        run_id: Uuid,
        file: impl Into<String>,
        message: impl Into<String>,
        category: FixCategory,
        confidence: f64,
        success: bool,
    ) -> Self {
        Self {
            schema: crate::schema::SRCDOCTOR_LEDGER_V1.to_string(),
            ts: Utc::now(),
            run_id,
            file: file.into(),
            message: message.into(),
            category,
            confidence,
            success,
        }
    }
}
