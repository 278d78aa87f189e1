//! Twin registry: list, create and look up twins.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::client::{BackendClient, BackendResponse, path_segment};
use crate::error::ProxyResult;

/// Backend-assigned twin identifier.
///
/// Never empty: an empty selection means "no twin selected".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TwinId(String);

impl TwinId {
    /// Wrap an identifier, rejecting blank strings.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TwinId {
    type Error = &'static str;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id).ok_or("twin id must not be empty")
    }
}

impl From<TwinId> for String {
    fn from(id: TwinId) -> Self {
        id.0
    }
}

impl fmt::Display for TwinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A twin as listed by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Twin {
    pub id: TwinId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Twin {
    /// "name — kind — id", as used in selection lists.
    pub fn label(&self) -> String {
        format!("{} — {} — {}", self.name, self.kind, self.id)
    }
}

/// Request body for `POST /api/twins`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwinCreate {
    pub name: String,
    /// Category tag, e.g. district, grid, rail, water, airport.
    pub kind: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl TwinCreate {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Typed view over a `{ twins: [...] }` listing, in backend order.
///
/// Entries without a usable `id` are skipped; a body without a `twins`
/// array yields an empty list.
pub fn twins_from_listing(body: &Value) -> Vec<Twin> {
    body.get("twins")
        .and_then(Value::as_array)
        .map(|twins| {
            twins
                .iter()
                .filter_map(|t| serde_json::from_value(t.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Identifier from a create response (`{ id, ... }`).
pub fn created_twin_id(body: &Value) -> Option<TwinId> {
    body.get("id").and_then(Value::as_str).and_then(TwinId::new)
}

impl BackendClient {
    /// List twins. The body is returned as sent, order included.
    #[instrument(skip(self))]
    pub async fn list_twins(&self) -> ProxyResult<BackendResponse> {
        self.get("/api/twins").await
    }

    /// Create a twin. The caller refreshes the listing afterwards.
    #[instrument(skip(self, twin), fields(name = %twin.name, kind = %twin.kind))]
    pub async fn create_twin(&self, twin: &TwinCreate) -> ProxyResult<BackendResponse> {
        self.post("/api/twins", twin).await
    }

    /// Fetch a single twin.
    #[instrument(skip(self, twin_id), fields(twin_id = %twin_id))]
    pub async fn get_twin(&self, twin_id: &TwinId) -> ProxyResult<BackendResponse> {
        self.get(&format!("/api/twins/{}", path_segment(twin_id)))
            .await
    }
}
