//! REST provider
//!
//! Default `Provider` implementation over a management-style REST API:
//! bearer-token auth, JSON payloads, and auto-pagination on list calls. No
//! retries and no timeouts at this layer; transient provider errors surface
//! to the caller unchanged.

use super::{CreateRequest, Provider};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::resource::{ResourceId, ResourceKind, ResourceState};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize a response body for logging: truncate and strip non-printable
/// characters.
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // Back off to a char boundary; a multibyte char may straddle the cut.
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..end],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP-backed `Provider`.
///
/// URL scheme: groups live at `{base}/groups`, grouped resources at
/// `{base}/{groupId}/{kind-path}`. Reads and deletes address `{base}/{id}`
/// directly, since identifiers are server-issued paths.
#[derive(Clone)]
pub struct RestProvider {
    client: Client,
    base: String,
    token: String,
}

impl RestProvider {
    /// Create a provider for the given endpoint, authenticating every request
    /// with the given bearer token. Acquiring the token is the caller's
    /// concern.
    pub fn new(endpoint: &str, token: impl Into<String>) -> Result<Self> {
        // Validate early so a bad endpoint fails at construction, not mid-flow.
        let parsed = Url::parse(endpoint)?;
        let client = Client::builder()
            .user_agent(concat!("cloudcuts/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base: parsed.as_str().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Build a provider from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.effective_endpoint(), config.effective_token())
    }

    fn collection_url(&self, kind: ResourceKind, group: Option<&ResourceId>) -> Result<String> {
        match (kind, group) {
            (ResourceKind::Group, _) => Ok(format!("{}/groups", self.base)),
            (kind, Some(group)) => Ok(format!(
                "{}/{}/{}",
                self.base,
                group,
                kind.path_segment()
            )),
            (kind, None) => Err(Error::Provider(format!(
                "listing or creating a {kind} requires a group"
            ))),
        }
    }

    fn resource_url(&self, id: &ResourceId) -> String {
        format!("{}/{}", self.base, id)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Only log sanitized/truncated error bodies.
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(Error::Api {
                status: status.as_u16(),
                message: sanitize_for_log(&body),
            });
        }

        Ok(body)
    }

    fn parse_state(body: &str) -> Result<ResourceState> {
        Ok(serde_json::from_str(body)?)
    }

    /// Map a 404 from a by-identifier call onto `NotFound`.
    fn map_missing(err: Error, id: &ResourceId) -> Error {
        match err {
            Error::Api { status: 404, .. } => Error::NotFound(id.clone()),
            other => other,
        }
    }
}

#[async_trait]
impl Provider for RestProvider {
    async fn create_resource(&self, request: CreateRequest) -> Result<ResourceState> {
        let url = format!(
            "{}/{}",
            self.collection_url(request.kind, request.group.as_ref())?,
            urlencoding::encode(&request.name)
        );
        tracing::debug!("PUT {}", url);

        let body = serde_json::json!({
            "name": request.name,
            "region": request.region,
            "tags": request.tags,
            "properties": request.properties,
        });

        let response = self.send(self.client.put(&url).json(&body)).await?;
        Self::parse_state(&response)
    }

    async fn get_resource(&self, kind: ResourceKind, id: &ResourceId) -> Result<ResourceState> {
        let url = self.resource_url(id);
        tracing::debug!("GET {}", url);

        let response = self
            .send(self.client.get(&url))
            .await
            .map_err(|e| Self::map_missing(e, id))?;
        let state = Self::parse_state(&response)?;
        if state.kind != kind {
            return Err(Error::NotFound(id.clone()));
        }
        Ok(state)
    }

    async fn delete_resource(&self, kind: ResourceKind, id: &ResourceId) -> Result<()> {
        let url = self.resource_url(id);
        tracing::debug!("DELETE {} ({})", url, kind);

        self.send(self.client.delete(&url))
            .await
            .map_err(|e| Self::map_missing(e, id))?;
        Ok(())
    }

    async fn list_resources(
        &self,
        kind: ResourceKind,
        group: Option<&ResourceId>,
    ) -> Result<Vec<ResourceState>> {
        let url = self.collection_url(kind, group)?;
        let mut all_items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            tracing::debug!("GET {} (pageToken: {:?})", url, page_token);
            let mut request = self.client.get(&url);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let body = self.send(request).await?;
            let page: Value = serde_json::from_str(&body)?;

            if let Some(items) = page.get("items").and_then(|v| v.as_array()) {
                for item in items {
                    all_items.push(serde_json::from_value(item.clone())?);
                }
            }

            page_token = page
                .get("nextPageToken")
                .and_then(|v| v.as_str())
                .map(String::from);
            if page_token.is_none() {
                break;
            }
        }

        Ok(all_items)
    }
}
