//! Google Drive v3 gateway over HTTP.
//!
//! Pages through listings, checks ownership, searches by name, and submits
//! permission mutations through the provider's `multipart/mixed` batch
//! endpoint.

use crate::config::GatewayConfig;
use crate::error::SharingError;
use crate::gateway::{BatchItemOutcome, DriveGateway};
use crate::resource::{ResourceRecord, SearchHit};
use crate::types::ResourceId;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const LIST_FIELDS: &str = "nextPageToken, files(id, name, parents, mimeType)";
const OWNER_FIELDS: &str = "id, name, owners";
const SEARCH_FIELDS: &str = "nextPageToken, files(id, name, mimeType)";

/// Boundary used for outgoing batch bodies. The provider picks its own
/// boundary for the response.
const BATCH_BOUNDARY: &str = "batch-driveshare";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<FileResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResource {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    parents: Option<Vec<String>>,
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    owners: Vec<Owner>,
}

#[derive(Debug, Deserialize)]
struct Owner {
    #[serde(default)]
    me: bool,
}

/// Drive gateway backed by reqwest.
///
/// Holds no mutable state; one instance serves any number of independent
/// operations.
pub struct HttpDriveGateway {
    client: reqwest::Client,
    api_base: String,
    api_path: String,
    batch_url: String,
    page_size: u32,
    access_token: String,
}

impl HttpDriveGateway {
    pub fn new(config: &GatewayConfig, access_token: String) -> Result<Self, SharingError> {
        let api_base = config.api_base.trim_end_matches('/').to_string();
        let api_path = path_of(&api_base).ok_or_else(|| {
            SharingError::Config(format!("api_base has no path component: {}", api_base))
        })?;

        Ok(HttpDriveGateway {
            client: reqwest::Client::new(),
            api_base,
            api_path,
            batch_url: config.batch_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            access_token,
        })
    }

    fn files_url(&self) -> String {
        format!("{}/files", self.api_base)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SharingError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SharingError::Provider(format!(
                "{} returned {}",
                url, status
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl DriveGateway for HttpDriveGateway {
    async fn list_all_resources(&self) -> Result<Vec<ResourceRecord>, SharingError> {
        let mut all = Vec::new();
        let mut page_token: Option<String> = None;
        let page_size = self.page_size.to_string();

        loop {
            let mut query = vec![("pageSize", page_size.as_str()), ("fields", LIST_FIELDS)];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: FileList = self.get_json(&self.files_url(), &query).await?;
            if page.files.is_empty() {
                break;
            }
            all.extend(page.files.into_iter().map(|f| {
                ResourceRecord::new(f.name, f.id, f.parents.unwrap_or_default(), f.mime_type)
            }));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(total = all.len(), "drive listing complete");
        Ok(all)
    }

    async fn is_owned_by_current_user(&self, id: &str) -> Result<bool, SharingError> {
        let url = format!("{}/{}", self.files_url(), id);
        let file: FileResource = self.get_json(&url, &[("fields", OWNER_FIELDS)]).await?;
        Ok(file.owners.first().map(|owner| owner.me).unwrap_or(false))
    }

    async fn submit_ownership_batch(
        &self,
        ids: &[ResourceId],
        new_owner_email: &str,
    ) -> Result<Vec<BatchItemOutcome>, SharingError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let body = build_batch_body(&self.api_path, ids, new_owner_email);
        let response = self
            .client
            .post(&self.batch_url)
            .bearer_auth(&self.access_token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/mixed; boundary={}", BATCH_BOUNDARY),
            )
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SharingError::Provider(format!(
                "batch submission returned {}",
                status
            )));
        }

        let boundary = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(response_boundary)
            .ok_or_else(|| {
                SharingError::Provider("batch response is not multipart/mixed".to_string())
            })?;

        let text = response.text().await?;
        parse_batch_response(&text, &boundary, ids)
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<SearchHit>, SharingError> {
        let q = format!("name contains '{}'", query.replace('\'', "\\'"));
        let page: FileList = self
            .get_json(
                &self.files_url(),
                &[("q", q.as_str()), ("fields", SEARCH_FIELDS)],
            )
            .await?;

        Ok(page
            .files
            .into_iter()
            .map(|f| SearchHit {
                name: f.name,
                id: f.id,
                kind: f.mime_type,
            })
            .collect())
    }
}

/// Path component of a base URL, e.g. `/drive/v3` out of
/// `https://www.googleapis.com/drive/v3`.
fn path_of(base: &str) -> Option<String> {
    let rest = base.split_once("://").map(|(_, rest)| rest)?;
    rest.find('/').map(|i| rest[i..].to_string())
}

/// Render the `multipart/mixed` batch body: one `application/http` part per
/// id, each an ownership-transferring permission create with its own
/// `Content-ID`.
fn build_batch_body(api_path: &str, ids: &[ResourceId], new_owner_email: &str) -> String {
    let payload = json!({
        "type": "user",
        "role": "owner",
        "emailAddress": new_owner_email,
    })
    .to_string();

    let mut body = String::new();
    for (index, id) in ids.iter().enumerate() {
        body.push_str(&format!("--{}\r\n", BATCH_BOUNDARY));
        body.push_str("Content-Type: application/http\r\n");
        body.push_str(&format!("Content-ID: <item-{}>\r\n\r\n", index));
        body.push_str(&format!(
            "POST {}/files/{}/permissions?fields=id&transferOwnership=true HTTP/1.1\r\n",
            api_path, id
        ));
        body.push_str("Content-Type: application/json\r\n");
        body.push_str(&format!("Content-Length: {}\r\n\r\n", payload.len()));
        body.push_str(&payload);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BATCH_BOUNDARY));
    body
}

/// Boundary parameter of a `multipart/mixed` content type header.
fn response_boundary(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|param| {
        let (key, value) = param.trim().split_once('=')?;
        if key.eq_ignore_ascii_case("boundary") {
            Some(value.trim_matches('"').to_string())
        } else {
            None
        }
    })
}

/// Split a batch response back into per-item outcomes, keyed by the
/// `Content-ID` each part echoes back.
fn parse_batch_response(
    body: &str,
    boundary: &str,
    ids: &[ResourceId],
) -> Result<Vec<BatchItemOutcome>, SharingError> {
    let delimiter = format!("--{}", boundary);
    let mut outcomes = Vec::new();

    for part in body.split(&delimiter) {
        let part = part.trim_matches(|c: char| c == '\r' || c == '\n' || c == ' ');
        if part.is_empty() || part == "--" {
            continue;
        }

        let index = content_id_index(part).ok_or_else(|| {
            SharingError::Provider("batch response part has no usable Content-ID".to_string())
        })?;
        let file_id = ids.get(index).cloned().ok_or_else(|| {
            SharingError::Provider(format!(
                "batch response references unknown item {}",
                index
            ))
        })?;

        let (status, payload) = inner_response(part)?;
        if (200..300).contains(&status) {
            let permission_id = serde_json::from_str::<serde_json::Value>(payload)
                .ok()
                .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(String::from))
                .unwrap_or_default();
            outcomes.push(BatchItemOutcome::Granted {
                file_id,
                permission_id,
            });
        } else {
            outcomes.push(BatchItemOutcome::Failed {
                file_id,
                reason: failure_reason(status, payload),
            });
        }
    }

    Ok(outcomes)
}

/// Index encoded in a part's `Content-ID` header (`item-N`, echoed back by
/// the provider as `response-item-N`).
fn content_id_index(part: &str) -> Option<usize> {
    let line = part
        .lines()
        .find(|line| line.to_ascii_lowercase().starts_with("content-id:"))?;
    let marker = line.rfind("item-")?;
    let digits: String = line[marker + "item-".len()..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Status code and body of the inner HTTP response embedded in a batch part.
fn inner_response(part: &str) -> Result<(u16, &str), SharingError> {
    let start = part.find("HTTP/").ok_or_else(|| {
        SharingError::Provider("batch response part has no inner status line".to_string())
    })?;
    let inner = &part[start..];

    let status_line = inner.lines().next().unwrap_or_default();
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| {
            SharingError::Provider(format!("malformed batch status line: {}", status_line))
        })?;

    let payload = inner
        .split_once("\r\n\r\n")
        .or_else(|| inner.split_once("\n\n"))
        .map(|(_, rest)| rest)
        .unwrap_or("");

    Ok((status, payload.trim()))
}

fn failure_reason(status: u16, payload: &str) -> String {
    serde_json::from_str::<serde_json::Value>(payload)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| format!("HTTP {}", status))
}
