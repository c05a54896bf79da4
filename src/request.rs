//! Request descriptors: the fully-resolved form of one remote operation,
//! handed to the transport collaborator as-is.
//!
//! A descriptor is built fresh per input item and never mutated afterwards.
//! Path parameters are percent-encoded segment by segment before they are
//! spliced into the URL; the template's `/` separators are never re-encoded.

use serde_json::Value;

use crate::error::ApsError;

/// Closed set of HTTP methods the operation resolvers emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Request body with its encoding mode as the variant tag.
///
/// `Json` serialises with `Content-Type: application/json`; `Raw` bypasses
/// JSON encoding entirely and ships the bytes opaquely.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    None,
    Json(Value),
    Raw(Vec<u8>),
}

/// A fully-specified request: everything the transport needs, nothing about
/// how the response will be interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Fully resolved URL; every parameter-sourced path segment is already
    /// percent-encoded.
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: String) -> Self {
        RequestDescriptor {
            method,
            url,
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::None,
        }
    }

    pub fn with_query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Set a header, replacing any previously-set header of the same name.
    pub fn with_header(mut self, name: &str, value: impl ToString) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn with_raw_body(mut self, bytes: Vec<u8>) -> Self {
        self.body = RequestBody::Raw(bytes);
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Percent-encode one path segment. Applied to each parameter individually,
/// never to the concatenated URL.
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Reject a required parameter that resolved empty; fails before any network
/// action is attempted.
pub fn required_param<'a>(name: &str, value: &'a str) -> Result<&'a str, ApsError> {
    if value.trim().is_empty() {
        return Err(ApsError::missing_parameter(name));
    }
    Ok(value)
}

/// Validate a required path parameter and percent-encode it for insertion.
pub fn path_param(name: &str, value: &str) -> Result<String, ApsError> {
    Ok(encode_segment(required_param(name, value)?))
}
