//! # normalize: reduce heterogeneous API payloads to a uniform item stream
//!
//! The API families this crate talks to mix a JSON:API convention (resources
//! under `data`, identity split from `attributes` and `links`) with ad hoc
//! domain payloads (translation manifests, metadata trees) that follow no
//! convention at all. A fixed response schema cannot cover both, so the shape
//! is detected defensively here, at normalisation time, instead of being
//! assumed from the operation.
//!
//! The engine is total: no input shape raises an error. A raw text body that
//! fails to parse as JSON is kept as the original string; an unrecognised
//! structure passes through verbatim. Binary responses are handled only for
//! operations that *declare* a binary output — the payload is never sniffed.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Map, Value};

use crate::contract::{
    BinaryAttachment, BinaryOutput, OutputItem, RawResult, BINARY_ATTACHMENT_NAME,
};

/// Per-item normalisation toggles.
///
/// `simplify` applies [`flatten_entity`] to JSON:API-shaped resources;
/// `split_items` fans an array-valued `data` field out into one output item
/// per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub simplify: bool,
    pub split_items: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        NormalizeOptions {
            simplify: true,
            split_items: false,
        }
    }
}

/// Flatten one JSON:API resource object into a single-level record.
///
/// `id` and `type` are copied when present and omitted entirely when absent
/// (never `null`). `href` comes from `links.self.href`, else `links.href`,
/// else is omitted. Fields other than the structural keys (`id`, `type`,
/// `attributes`, `links`) are merged through, the children of `attributes`
/// are spread at top level, and the extracted `id`/`type`/`href` win every
/// name collision. Total over all inputs; non-objects are returned unchanged.
pub fn flatten_entity(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return value.clone();
    };
    let mut flat = Map::new();
    for (key, val) in obj {
        if matches!(key.as_str(), "id" | "type" | "attributes" | "links") {
            continue;
        }
        flat.insert(key.clone(), val.clone());
    }
    if let Some(attrs) = obj.get("attributes").and_then(Value::as_object) {
        for (key, val) in attrs {
            flat.insert(key.clone(), val.clone());
        }
    }
    // Identity and link fields must never be overridden by attributes.
    if let Some(id) = obj.get("id") {
        flat.insert("id".to_string(), id.clone());
    }
    if let Some(kind) = obj.get("type") {
        flat.insert("type".to_string(), kind.clone());
    }
    let href = obj.get("links").and_then(|links| {
        links
            .get("self")
            .and_then(|s| s.get("href"))
            .or_else(|| links.get("href"))
    });
    if let Some(href) = href {
        flat.insert("href".to_string(), href.clone());
    }
    Value::Object(flat)
}

/// Classify a raw result and reduce it to zero, one or many output items,
/// each carrying `item_index` as its paired item index.
pub fn normalize(
    raw: RawResult,
    binary: Option<BinaryOutput>,
    options: &NormalizeOptions,
    item_index: usize,
) -> Vec<OutputItem> {
    match (binary, raw) {
        (Some(declared), RawResult::Binary(bytes)) => {
            vec![binary_item(declared, bytes, item_index)]
        }
        (_, raw) => normalize_body(parse_raw(raw), options, item_index),
    }
}

fn binary_item(declared: BinaryOutput, bytes: Vec<u8>, item_index: usize) -> OutputItem {
    let mut json = Map::new();
    json.insert(
        declared.json_field.to_string(),
        Value::String(STANDARD.encode(&bytes)),
    );
    json.insert(
        "contentType".to_string(),
        Value::String(declared.content_type.to_string()),
    );
    OutputItem {
        json: Value::Object(json),
        paired_item_index: item_index,
        binary: Some(BinaryAttachment {
            name: BINARY_ATTACHMENT_NAME.to_string(),
            content_type: declared.content_type.to_string(),
            data: bytes,
        }),
    }
}

/// Opportunistic parse: a JSON-encoded string becomes structured data, a
/// parse failure keeps the original text. Never an error.
fn parse_raw(raw: RawResult) -> Value {
    match raw {
        RawResult::Json(value) => value,
        RawResult::Text(text) => {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        }
        RawResult::Binary(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(_) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        },
    }
}

fn maybe_flatten(value: &Value, simplify: bool) -> Value {
    if simplify {
        flatten_entity(value)
    } else {
        value.clone()
    }
}

/// Shape dispatch: `data` array → list, `data` object → single entity,
/// anything else → pass-through, untouched by flattening.
fn normalize_body(body: Value, options: &NormalizeOptions, item_index: usize) -> Vec<OutputItem> {
    match body.get("data") {
        Some(Value::Array(elements)) => {
            if options.split_items {
                elements
                    .iter()
                    .map(|element| {
                        OutputItem::new(maybe_flatten(element, options.simplify), item_index)
                    })
                    .collect()
            } else {
                let data: Vec<Value> = elements
                    .iter()
                    .map(|element| maybe_flatten(element, options.simplify))
                    .collect();
                vec![OutputItem::new(json!({ "data": data }), item_index)]
            }
        }
        Some(entity @ Value::Object(_)) => {
            let json = if options.simplify {
                flatten_entity(entity)
            } else {
                body.clone()
            };
            vec![OutputItem::new(json, item_index)]
        }
        _ => vec![OutputItem::new(body, item_index)],
    }
}
