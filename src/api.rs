use serde::{Deserialize, Serialize};
use serde_json::{value::RawValue, Value};
use std::fmt;


/// Name of the Postgres function that replaces the listings snapshot.
pub const SYNC_JOB_LISTINGS: &str = "sync_job_listings";

/// One listing, kept as the exact JSON text it was read as so large integers
/// and key order reach the database untouched.
pub type Record = Box<RawValue>;

/// Request body for the `sync_job_listings` RPC.
///
/// Every record from the input file goes into a single envelope, in file
/// order. There is no chunking: one invocation uploads everything or nothing.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncRequest {
    /// The listings, each an arbitrary JSON value
    pub records: Vec<Record>,
}

impl SyncRequest {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Body of a failed RPC response.
///
/// PostgREST normally answers with a JSON object (`message`, `code`,
/// `details`, `hint`), but a proxy in front of it may return plain text or
/// HTML, so both are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(Value),
    Text(String),
}

impl ErrorBody {
    /// Interpret a response body, preferring JSON and falling back to the raw
    /// text.
    pub fn parse(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(text),
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorBody::Json(value) => write!(f, "{value}"),
            ErrorBody::Text(text) => f.write_str(text),
        }
    }
}
