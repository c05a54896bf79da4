//! # contract: seams between the pipelines and their collaborators
//!
//! This module defines the narrow interfaces the execution loop consumes
//! (transport, per-item parameter retrieval, operation resolution) and the
//! plain data types that cross them.
//!
//! ## Interface & Extensibility
//! - Implement [`Transport`] to plug in a real HTTP client (see
//!   [`crate::http::HttpTransport`]), a fixture, or a mock.
//! - Implement [`ParameterSource`] to adapt whatever parameter store the host
//!   uses; [`StaticItems`] is the in-memory implementation used by callers
//!   that already hold fully-typed operations.
//! - Implement [`Operation`] for a new operation family: a pure function from
//!   configuration to [`RequestDescriptor`], with an optional declared binary
//!   output.
//!
//! ## Mocking & Testing
//! - [`Transport`] is annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests.
//!
//! ## Error Handling
//! - All methods return [`ApsError`]; transports must map network/HTTP
//!   failures to `ApsError::Transport` with a message detailed enough to
//!   surface to the caller.

use async_trait::async_trait;
use mockall::automock;
use serde_json::{json, Value};

use crate::config::{ApsConfig, Region};
use crate::error::ApsError;
use crate::normalize::NormalizeOptions;
use crate::request::RequestDescriptor;

/// The transport's return value, before normalisation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    /// Opaque bytes (thumbnails, downloaded objects).
    Binary(Vec<u8>),
    /// UTF-8 text, possibly JSON-encoded; the normaliser parses it
    /// opportunistically.
    Text(String),
    /// Already-parsed structured value.
    Json(Value),
}

/// Declared binary output of an operation. The binary response path is gated
/// on this declaration, never on sniffing the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryOutput {
    /// Key under which the base64 text representation appears in the
    /// output item's json (e.g. `thumbnail`, `file`).
    pub json_field: &'static str,
    /// Content type declared for the payload.
    pub content_type: &'static str,
}

/// Logical name every binary attachment is stored under.
pub const BINARY_ATTACHMENT_NAME: &str = "data";

/// A named byte payload attached to an output item.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryAttachment {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// One record of the produced output sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputItem {
    pub json: Value,
    /// Index of the input item that produced this record. Never reassigned.
    pub paired_item_index: usize,
    pub binary: Option<BinaryAttachment>,
}

impl OutputItem {
    pub fn new(json: Value, paired_item_index: usize) -> Self {
        OutputItem {
            json,
            paired_item_index,
            binary: None,
        }
    }

    /// Synthetic error record emitted under the continue-on-failure policy.
    pub fn from_error(err: &ApsError, paired_item_index: usize) -> Self {
        OutputItem::new(json!({ "error": err.to_string() }), paired_item_index)
    }
}

/// Options shared by every list operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum number of resources to return, as a plain query parameter.
    pub limit: Option<u32>,
    /// Region override; replaces the configured default header value.
    pub region: Option<Region>,
}

impl ListOptions {
    /// Attach the options to a request: the configured default region header
    /// first, then the per-operation override (unconditionally replacing the
    /// default), then the limit query parameter.
    pub fn apply(&self, request: RequestDescriptor, config: &ApsConfig) -> RequestDescriptor {
        let mut request = request.with_header("x-ads-region", config.default_region.as_str());
        if let Some(region) = self.region {
            request = request.with_header("x-ads-region", region.as_str());
        }
        if let Some(limit) = self.limit {
            request = request.with_query("limit", limit);
        }
        request
    }
}

/// A remote operation that can resolve itself into a request descriptor.
///
/// Resolution is pure: no network, no credentials, no side effects, so every
/// builder is unit-testable in isolation.
pub trait Operation: Send + Sync {
    fn resolve(&self, config: &ApsConfig) -> Result<RequestDescriptor, ApsError>;

    /// Declared binary output, for the few operations whose response is a
    /// byte stream rather than a JSON document.
    fn binary_output(&self) -> Option<BinaryOutput> {
        None
    }
}

/// Everything the loop needs to process one input item: the typed operation
/// and the normalisation toggles in force for it.
#[derive(Debug, Clone)]
pub struct ItemPlan<Op> {
    pub operation: Op,
    pub options: NormalizeOptions,
}

impl<Op> ItemPlan<Op> {
    pub fn new(operation: Op) -> Self {
        ItemPlan {
            operation,
            options: NormalizeOptions::default(),
        }
    }

    pub fn with_options(operation: Op, options: NormalizeOptions) -> Self {
        ItemPlan { operation, options }
    }
}

/// Per-item parameter retrieval plus the process-wide failure policy.
///
/// `plan` fails with `ApsError::Configuration` when the host cannot produce a
/// fully-typed operation for the given item; the loop treats that exactly
/// like any other pre-network configuration failure.
pub trait ParameterSource<Op>: Send + Sync {
    fn item_count(&self) -> usize;

    fn plan(&self, item_index: usize) -> Result<ItemPlan<Op>, ApsError>;

    /// Process-wide policy, read once per item at the failure boundary.
    fn continue_on_failure(&self) -> bool;
}

/// In-memory [`ParameterSource`] over a vector of pre-built plans.
pub struct StaticItems<Op> {
    plans: Vec<ItemPlan<Op>>,
    continue_on_failure: bool,
}

impl<Op> StaticItems<Op> {
    pub fn new(plans: Vec<ItemPlan<Op>>) -> Self {
        StaticItems {
            plans,
            continue_on_failure: false,
        }
    }

    pub fn with_continue_on_failure(mut self, enabled: bool) -> Self {
        self.continue_on_failure = enabled;
        self
    }
}

impl<Op: Clone + Send + Sync> ParameterSource<Op> for StaticItems<Op> {
    fn item_count(&self) -> usize {
        self.plans.len()
    }

    fn plan(&self, item_index: usize) -> Result<ItemPlan<Op>, ApsError> {
        self.plans.get(item_index).cloned().ok_or_else(|| {
            ApsError::Configuration(format!("no parameters declared for item {item_index}"))
        })
    }

    fn continue_on_failure(&self) -> bool {
        self.continue_on_failure
    }
}

/// Authenticated execution of one request descriptor.
///
/// The implementor owns credentials, TLS, pooling and any transport-level
/// retry; this crate only builds descriptors and interprets raw results.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the call and return the raw body. Network and HTTP-status
    /// failures map to `ApsError::Transport`.
    async fn invoke(&self, request: &RequestDescriptor) -> Result<RawResult, ApsError>;
}
