//! Forge pipeline: OSS bucket/object management and Model Derivative
//! translation jobs.
//!
//! Same construction as [`crate::data_management`]: a closed tagged-variant
//! enum whose variants carry only their own fields, resolved by pure
//! builders. The two binary-returning operations (`DownloadObject`,
//! `GetThumbnail`) declare their output via
//! [`Operation::binary_output`]; everything else normalises as JSON.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};

use crate::config::{ApsConfig, Region};
use crate::contract::{BinaryOutput, ListOptions, Operation};
use crate::error::ApsError;
use crate::request::{path_param, required_param, Method, RequestDescriptor};

/// Bucket retention policy, lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    Transient,
    Temporary,
    Persistent,
}

impl RetentionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetentionPolicy::Transient => "transient",
            RetentionPolicy::Temporary => "temporary",
            RetentionPolicy::Persistent => "persistent",
        }
    }
}

/// Output format of a translation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svf,
    Svf2,
    Obj,
    Thumbnail,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Svf => "svf",
            OutputFormat::Svf2 => "svf2",
            OutputFormat::Obj => "obj",
            OutputFormat::Thumbnail => "thumbnail",
        }
    }
}

/// View selector for viewer-format translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    TwoD,
    ThreeD,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::TwoD => "2d",
            View::ThreeD => "3d",
        }
    }
}

/// Closed set of OSS and Model Derivative operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ForgeOperation {
    /// `POST /oss/v2/buckets`
    CreateBucket {
        bucket_key: String,
        policy: RetentionPolicy,
        region: Option<Region>,
    },
    /// `GET /oss/v2/buckets`
    ListBuckets { options: ListOptions },
    /// `GET /oss/v2/buckets/{bucketKey}/details`
    GetBucketDetails { bucket_key: String },
    /// `DELETE /oss/v2/buckets/{bucketKey}`
    DeleteBucket { bucket_key: String },
    /// `GET /oss/v2/buckets/{bucketKey}/objects`
    ListObjects {
        bucket_key: String,
        options: ListOptions,
    },
    /// `GET /oss/v2/buckets/{bucketKey}/objects/{objectName}/details`
    GetObjectDetails {
        bucket_key: String,
        object_name: String,
    },
    /// `PUT /oss/v2/buckets/{bucketKey}/objects/{objectName}` with a raw
    /// byte body.
    UploadObject {
        bucket_key: String,
        object_name: String,
        /// Payload text: base64 when `content_is_base64`, UTF-8 otherwise.
        content: String,
        /// When true, `content` is base64-decoded to bytes before
        /// transmission; when false it is passed verbatim as UTF-8 bytes.
        content_is_base64: bool,
        content_type: Option<String>,
    },
    /// `GET /oss/v2/buckets/{bucketKey}/objects/{objectName}` — binary.
    DownloadObject {
        bucket_key: String,
        object_name: String,
    },
    /// `PUT /oss/v2/buckets/{bucketKey}/objects/{objectName}/copyto/{newObjectName}`
    CopyObject {
        bucket_key: String,
        object_name: String,
        new_object_name: String,
    },
    /// `DELETE /oss/v2/buckets/{bucketKey}/objects/{objectName}`
    DeleteObject {
        bucket_key: String,
        object_name: String,
    },
    /// `POST /modelderivative/v2/designdata/job`
    TranslateJob {
        urn: String,
        output_type: OutputFormat,
        /// Advanced setting: attached to the output format only when set.
        /// `None` produces a body identical to the baseline request.
        views: Option<Vec<View>>,
        /// Adds `?force=true` to re-run a completed translation.
        force: bool,
    },
    /// `GET /modelderivative/v2/designdata/{urn}/manifest`
    GetManifest { urn: String },
    /// `GET /modelderivative/v2/designdata/{urn}/metadata`
    GetMetadata { urn: String },
    /// `GET /modelderivative/v2/designdata/{urn}/thumbnail` — binary.
    GetThumbnail {
        urn: String,
        width: Option<u16>,
    },
}

impl Operation for ForgeOperation {
    fn resolve(&self, config: &ApsConfig) -> Result<RequestDescriptor, ApsError> {
        use ForgeOperation::*;

        let base = &config.base_url;
        let request = match self {
            CreateBucket {
                bucket_key,
                policy,
                region,
            } => {
                let key = required_param("bucketKey", bucket_key)?;
                let mut request =
                    RequestDescriptor::new(Method::Post, format!("{base}/oss/v2/buckets"))
                        .with_json_body(json!({
                            "bucketKey": key,
                            "policyKey": policy.as_str(),
                        }))
                        .with_header("x-ads-region", config.default_region.as_str());
                if let Some(region) = region {
                    request = request.with_header("x-ads-region", region.as_str());
                }
                request
            }
            ListBuckets { options } => options.apply(
                RequestDescriptor::new(Method::Get, format!("{base}/oss/v2/buckets")),
                config,
            ),
            GetBucketDetails { bucket_key } => {
                let bucket = path_param("bucketKey", bucket_key)?;
                RequestDescriptor::new(
                    Method::Get,
                    format!("{base}/oss/v2/buckets/{bucket}/details"),
                )
            }
            DeleteBucket { bucket_key } => {
                let bucket = path_param("bucketKey", bucket_key)?;
                RequestDescriptor::new(Method::Delete, format!("{base}/oss/v2/buckets/{bucket}"))
            }
            ListObjects {
                bucket_key,
                options,
            } => {
                let bucket = path_param("bucketKey", bucket_key)?;
                options.apply(
                    RequestDescriptor::new(
                        Method::Get,
                        format!("{base}/oss/v2/buckets/{bucket}/objects"),
                    ),
                    config,
                )
            }
            GetObjectDetails {
                bucket_key,
                object_name,
            } => {
                let bucket = path_param("bucketKey", bucket_key)?;
                let object = path_param("objectName", object_name)?;
                RequestDescriptor::new(
                    Method::Get,
                    format!("{base}/oss/v2/buckets/{bucket}/objects/{object}/details"),
                )
            }
            UploadObject {
                bucket_key,
                object_name,
                content,
                content_is_base64,
                content_type,
            } => {
                let bucket = path_param("bucketKey", bucket_key)?;
                let object = path_param("objectName", object_name)?;
                let bytes = if *content_is_base64 {
                    STANDARD.decode(content.trim()).map_err(|e| {
                        ApsError::Configuration(format!(
                            "upload content is not valid base64: {e}"
                        ))
                    })?
                } else {
                    content.clone().into_bytes()
                };
                let mut request = RequestDescriptor::new(
                    Method::Put,
                    format!("{base}/oss/v2/buckets/{bucket}/objects/{object}"),
                )
                .with_raw_body(bytes);
                if let Some(content_type) = content_type {
                    request = request.with_header("Content-Type", content_type);
                }
                request
            }
            DownloadObject {
                bucket_key,
                object_name,
            } => {
                let bucket = path_param("bucketKey", bucket_key)?;
                let object = path_param("objectName", object_name)?;
                RequestDescriptor::new(
                    Method::Get,
                    format!("{base}/oss/v2/buckets/{bucket}/objects/{object}"),
                )
            }
            CopyObject {
                bucket_key,
                object_name,
                new_object_name,
            } => {
                let bucket = path_param("bucketKey", bucket_key)?;
                let object = path_param("objectName", object_name)?;
                let target = path_param("newObjectName", new_object_name)?;
                RequestDescriptor::new(
                    Method::Put,
                    format!("{base}/oss/v2/buckets/{bucket}/objects/{object}/copyto/{target}"),
                )
            }
            DeleteObject {
                bucket_key,
                object_name,
            } => {
                let bucket = path_param("bucketKey", bucket_key)?;
                let object = path_param("objectName", object_name)?;
                RequestDescriptor::new(
                    Method::Delete,
                    format!("{base}/oss/v2/buckets/{bucket}/objects/{object}"),
                )
            }
            TranslateJob {
                urn,
                output_type,
                views,
                force,
            } => {
                let urn = required_param("urn", urn)?;
                let mut format = serde_json::Map::new();
                format.insert("type".to_string(), json!(output_type.as_str()));
                if let Some(views) = views {
                    let views: Vec<Value> =
                        views.iter().map(|view| json!(view.as_str())).collect();
                    format.insert("views".to_string(), Value::Array(views));
                }
                let mut request = RequestDescriptor::new(
                    Method::Post,
                    format!("{base}/modelderivative/v2/designdata/job"),
                )
                .with_json_body(json!({
                    "input": { "urn": urn },
                    "output": { "formats": [format] },
                }));
                if *force {
                    request = request.with_query("force", "true");
                }
                request
            }
            GetManifest { urn } => {
                let urn = path_param("urn", urn)?;
                RequestDescriptor::new(
                    Method::Get,
                    format!("{base}/modelderivative/v2/designdata/{urn}/manifest"),
                )
            }
            GetMetadata { urn } => {
                let urn = path_param("urn", urn)?;
                RequestDescriptor::new(
                    Method::Get,
                    format!("{base}/modelderivative/v2/designdata/{urn}/metadata"),
                )
            }
            GetThumbnail { urn, width } => {
                let urn = path_param("urn", urn)?;
                let mut request = RequestDescriptor::new(
                    Method::Get,
                    format!("{base}/modelderivative/v2/designdata/{urn}/thumbnail"),
                );
                if let Some(width) = width {
                    request = request.with_query("width", width);
                }
                request
            }
        };
        Ok(request)
    }

    fn binary_output(&self) -> Option<BinaryOutput> {
        match self {
            ForgeOperation::DownloadObject { .. } => Some(BinaryOutput {
                json_field: "file",
                content_type: "application/octet-stream",
            }),
            ForgeOperation::GetThumbnail { .. } => Some(BinaryOutput {
                json_field: "thumbnail",
                content_type: "image/png",
            }),
            _ => None,
        }
    }
}
