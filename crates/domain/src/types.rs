//! Common data types used throughout the application

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Onshape API key pair
///
/// Held in memory for the duration of a session and shared read-only by
/// every concurrent task in a sync run. Never persisted.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub access_key: String,
    pub secret_key: String,
}

/// Row state during a sync run
///
/// `Idle` is the only non-terminal state a row may re-enter (on a fresh
/// sync attempt); `Pending` is transient within one `synchronize` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    Idle,
    Pending,
    Success,
    Error,
}

/// One imported spreadsheet row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetRow {
    /// Stable identity, unique across the batch, minted at import time
    pub id: String,
    /// Column name to cell value
    pub values: HashMap<String, String>,
    pub status: UpdateStatus,
    pub error_message: Option<String>,
}

impl SheetRow {
    /// Create a fresh row in the `Idle` state.
    pub fn new(id: impl Into<String>, values: HashMap<String, String>) -> Self {
        Self { id: id.into(), values, status: UpdateStatus::Idle, error_message: None }
    }

    /// Cell value for the named column, if the column is present.
    pub fn value(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }
}

/// Role assigned to an imported column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "name", rename_all = "lowercase")]
pub enum ColumnRole {
    /// Column holds the part reference URL
    Identifier,
    /// Column maps to a named Onshape property
    Property(String),
    /// Column is excluded from sync
    Ignore,
}

/// Mapping from imported column name to its role
pub type ColumnMap = HashMap<String, ColumnRole>;

/// Which view of a document a reference addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevisionSelector {
    Workspace,
    Version,
    Microversion,
}

impl RevisionSelector {
    /// One-letter path segment used on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Self::Workspace => "w",
            Self::Version => "v",
            Self::Microversion => "m",
        }
    }

    /// Parse the one-letter selector code from a reference path.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "w" => Some(Self::Workspace),
            "v" => Some(Self::Version),
            "m" => Some(Self::Microversion),
            _ => None,
        }
    }

    /// Selector to use when addressing the metadata update endpoint.
    ///
    /// The backend rejects metadata mutation on microversions, so only an
    /// explicit version passes through; everything else addresses the
    /// workspace.
    pub fn for_update(self) -> Self {
        match self {
            Self::Version => Self::Version,
            _ => Self::Workspace,
        }
    }
}

/// Structured identifiers extracted from a part reference URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    pub document_id: String,
    pub selector: RevisionSelector,
    pub revision_id: String,
    pub element_id: String,
    pub part_id: String,
}

/// A single property update destined for the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyUpdate {
    pub property_id: String,
    pub value: String,
}

/// Terminal result for one row of a sync run
///
/// Exactly one outcome is produced per submitted row, regardless of how
/// the rest of the batch fares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub row_id: String,
    pub success: bool,
    pub error_message: Option<String>,
}

impl SyncOutcome {
    /// Successful outcome for a row.
    pub fn success(row_id: impl Into<String>) -> Self {
        Self { row_id: row_id.into(), success: true, error_message: None }
    }

    /// Failed outcome carrying a human-readable message.
    pub fn failure(row_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self { row_id: row_id.into(), success: false, error_message: Some(message.into()) }
    }
}
