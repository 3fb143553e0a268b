//! REST client for the curation API's annotation endpoints.
//!
//! Wraps the file listing, per-item fetch/upsert, skip, and summary
//! endpoints using [`reqwest`]. All calls carry the session's bearer
//! token. Payloads are sanitized and their status recomputed here, at
//! the boundary, so the server and the screen never disagree about what
//! was persisted.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::ApiError;
use crate::progress::AnnotationSummary;
use crate::record::{
    AnnotationPayload, AnnotationRecord, DetectionBox, GroundingPair, RecordStatus, TaskKind,
    sanitize_payload,
};

/// One page of a dataset's file listing.
#[derive(Debug, Deserialize)]
pub struct FileListPage {
    pub files: Vec<String>,
    #[serde(default)]
    pub root_path: String,
    /// Status badge per path, for the pages the server returned.
    #[serde(default)]
    pub file_statuses: HashMap<String, RecordStatus>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
}

/// Wire shape shared by the per-task annotation endpoints; each task
/// fills a subset of the optional fields.
#[derive(Debug, Default, Deserialize)]
struct AnnotationEnvelope {
    #[serde(default)]
    status: Option<RecordStatus>,
    #[serde(default)]
    labels: Option<Vec<String>>,
    #[serde(default)]
    boxes: Option<Vec<DetectionBox>>,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    pairs: Option<Vec<GroundingPair>>,
}

impl AnnotationEnvelope {
    fn into_record(self, task: TaskKind) -> AnnotationRecord {
        let payload = match task {
            TaskKind::Classification | TaskKind::TextClassification => {
                AnnotationPayload::Labels(self.labels.unwrap_or_default())
            }
            TaskKind::Detection => AnnotationPayload::Boxes(self.boxes.unwrap_or_default()),
            TaskKind::Grounding => AnnotationPayload::Grounding {
                caption: self.caption.unwrap_or_default(),
                pairs: self.pairs.unwrap_or_default(),
            },
            TaskKind::Captioning => AnnotationPayload::Caption(self.caption.unwrap_or_default()),
        };
        AnnotationRecord {
            status: self.status.unwrap_or_default(),
            payload,
        }
    }
}

/// Build the POST body for an upsert: the GET shape plus `path` and
/// `status`.
pub fn upsert_body(path: &str, payload: &AnnotationPayload, status: RecordStatus) -> serde_json::Value {
    let mut body = serde_json::json!({
        "path": path,
        "status": status,
    });
    let fields = body.as_object_mut().expect("upsert body is an object");
    match payload {
        AnnotationPayload::Labels(labels) => {
            fields.insert("labels".into(), serde_json::json!(labels));
        }
        AnnotationPayload::Boxes(boxes) => {
            fields.insert("boxes".into(), serde_json::json!(boxes));
        }
        AnnotationPayload::Grounding { caption, pairs } => {
            fields.insert("caption".into(), serde_json::json!(caption));
            fields.insert("pairs".into(), serde_json::json!(pairs));
        }
        AnnotationPayload::Caption(caption) => {
            fields.insert("caption".into(), serde_json::json!(caption));
        }
    }
    body
}

/// HTTP client for one curation API server.
pub struct AnnotationApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl AnnotationApi {
    /// Create a client for the server at `base_url`, authenticating
    /// every request with `token`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    /// Create a client reusing an existing [`reqwest::Client`] (useful
    /// for connection pooling across screens).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client,
            base_url,
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the full-size view image for an item. The engine treats
    /// it as opaque; the shell hands it to its image element.
    pub fn view_url(&self, dataset_id: &str, path: &str) -> String {
        format!(
            "{}/datasets/{}/view?path={}",
            self.base_url,
            dataset_id,
            urlencode(path)
        )
    }

    /// Thumbnail URL for the jump-to picker.
    pub fn thumbnail_url(&self, dataset_id: &str, path: &str) -> String {
        format!(
            "{}/datasets/{}/thumb?path={}",
            self.base_url,
            dataset_id,
            urlencode(path)
        )
    }

    /// Fetch one page of a dataset's files.
    ///
    /// `status_filter` maps to the `class_name` query parameter, which
    /// the server also accepts as a status filter (`unlabeled`,
    /// `labeled`, `skipped`).
    pub async fn list_files(
        &self,
        dataset_id: &str,
        offset: u64,
        limit: u64,
        status_filter: Option<&str>,
    ) -> Result<FileListPage, ApiError> {
        let mut query: Vec<(&str, String)> = vec![
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(filter) = status_filter {
            query.push(("class_name", filter.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/datasets/{}/files", self.base_url, dataset_id))
            .bearer_auth(&self.token)
            .query(&query)
            .send()
            .await?;

        let page: FileListPage = Self::parse_response(response).await?;
        tracing::debug!(
            dataset_id,
            files = page.files.len(),
            total = page.total,
            "fetched file page"
        );
        Ok(page)
    }

    /// Fetch the annotation record for one item. Items never annotated
    /// come back as an empty unlabeled record.
    pub async fn fetch_annotation(
        &self,
        dataset_id: &str,
        task: TaskKind,
        path: &str,
    ) -> Result<AnnotationRecord, ApiError> {
        let response = self
            .client
            .get(format!(
                "{}/datasets/{}/annotations/{}",
                self.base_url,
                dataset_id,
                task.api_name()
            ))
            .bearer_auth(&self.token)
            .query(&[("path", path)])
            .send()
            .await?;

        let envelope: AnnotationEnvelope = Self::parse_response(response).await?;
        Ok(envelope.into_record(task))
    }

    /// Upsert one item's annotation.
    ///
    /// The payload is sanitized first and the status derived from what
    /// survives: `labeled` when content remains, `unlabeled` otherwise.
    /// Returns the record as the server echoed it back.
    pub async fn save_annotation(
        &self,
        dataset_id: &str,
        task: TaskKind,
        path: &str,
        payload: &AnnotationPayload,
    ) -> Result<AnnotationRecord, ApiError> {
        let clean = sanitize_payload(payload);
        let status = clean.derived_status();
        let body = upsert_body(path, &clean, status);

        let response = self
            .client
            .post(format!(
                "{}/datasets/{}/annotations/{}",
                self.base_url,
                dataset_id,
                task.api_name()
            ))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let envelope: AnnotationEnvelope = Self::parse_response(response).await?;
        tracing::info!(dataset_id, path, task = task.api_name(), ?status, "saved annotation");
        Ok(envelope.into_record(task))
    }

    /// Mark one item skipped. The payload is emptied server-side too;
    /// skipping is destructive to any draft.
    pub async fn skip_annotation(
        &self,
        dataset_id: &str,
        task: TaskKind,
        path: &str,
    ) -> Result<(), ApiError> {
        let body = upsert_body(path, &AnnotationPayload::empty_for(task), RecordStatus::Skipped);

        let response = self
            .client
            .post(format!(
                "{}/datasets/{}/annotations/{}",
                self.base_url,
                dataset_id,
                task.api_name()
            ))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        Self::check_status(response).await?;
        tracing::info!(dataset_id, path, task = task.api_name(), "skipped item");
        Ok(())
    }

    /// Fetch the server-computed progress summary for a task.
    pub async fn fetch_summary(
        &self,
        dataset_id: &str,
        task: TaskKind,
    ) -> Result<AnnotationSummary, ApiError> {
        let response = self
            .client
            .get(format!(
                "{}/datasets/{}/annotations/{}/summary",
                self.base_url,
                dataset_id,
                task.api_name()
            ))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Percent-encode a path for use as a query value.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
