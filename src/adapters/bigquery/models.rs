//! BigQuery REST API request and response bodies
//!
//! Only the fields Quarry reads are modelled; everything else in the
//! responses is ignored by serde.

use serde::{Deserialize, Serialize};

/// Body of `jobs.query`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// GoogleSQL statement
    pub query: String,

    /// Always `false`
    pub use_legacy_sql: bool,

    /// Idempotency key for the job insertion
    pub request_id: String,

    /// Rows per result page
    pub max_results: u32,

    /// Server-side wait before answering with `jobComplete = false`
    pub timeout_ms: u64,

    /// Job location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Response of `jobs.query` and `jobs.getQueryResults`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Job handle, needed to poll and page
    #[serde(default)]
    pub job_reference: Option<JobReference>,

    /// `false` while the job is still running; `rows` is absent then
    #[serde(default)]
    pub job_complete: bool,

    /// Result rows of this page
    #[serde(default)]
    pub rows: Vec<TableRow>,

    /// Present when more pages follow
    #[serde(default)]
    pub page_token: Option<String>,

    /// Total rows of the result, as a decimal string
    #[serde(default)]
    pub total_rows: Option<String>,
}

/// Job identifier
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    /// Project that owns the job
    pub project_id: String,

    /// Job id
    pub job_id: String,

    /// Region the job ran in
    #[serde(default)]
    pub location: Option<String>,
}

/// One result row: `{"f": [{"v": ...}, ...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct TableRow {
    /// Cells in projection order
    pub f: Vec<TableCell>,
}

/// One result cell; scalars arrive as strings, NULL as JSON null
#[derive(Debug, Clone, Deserialize)]
pub struct TableCell {
    /// Cell value
    pub v: serde_json::Value,
}

impl TableCell {
    /// The cell as a string, if it is a non-null scalar
    pub fn as_str(&self) -> Option<&str> {
        self.v.as_str()
    }
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// HTTP status repeated by the API
    #[serde(default)]
    pub code: u16,

    /// Human-readable message
    #[serde(default)]
    pub message: String,

    /// Individual errors with machine-readable reasons
    #[serde(default)]
    pub errors: Vec<ErrorItem>,
}

/// Single error entry
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorItem {
    /// Reason code, e.g. `invalidQuery`, `rateLimitExceeded`
    #[serde(default)]
    pub reason: String,

    /// Message
    #[serde(default)]
    pub message: String,
}
