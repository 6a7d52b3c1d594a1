//! PostgREST client for the hosted row store.
//!
//! # Responsibilities
//! - Translate store operations into `/rest/v1/{table}` requests
//! - Attach the project API key to every request
//! - Map non-success responses to `RemoteError`

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::error::{RemoteError, RemoteResult};
use crate::store::{OrderBy, RemoteStore, Row};

/// Row store backed by a PostgREST endpoint.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl RestStore {
    /// Create a client for the project at `url`.
    pub fn new(url: &str, api_key: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: normalize_base(url)?,
            api_key: api_key.into(),
        })
    }

    fn table_url(&self, table: &str) -> RemoteResult<Url> {
        Ok(self.base_url.join(&format!("rest/v1/{}", table))?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        authorize(self.client.request(method, url), &self.api_key)
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn select(&self, table: &str, order: &[OrderBy]) -> RemoteResult<Vec<Row>> {
        let mut query = vec![("select", "*".to_string())];
        if !order.is_empty() {
            query.push(("order", order_param(order)));
        }

        let response = self
            .request(Method::GET, self.table_url(table)?)
            .query(&query)
            .send()
            .await?;
        let rows = ensure_success(response).await?.json::<Vec<Row>>().await?;
        Ok(rows)
    }

    async fn insert(&self, table: &str, record: Row) -> RemoteResult<Row> {
        let response = self
            .request(Method::POST, self.table_url(table)?)
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;
        let mut rows = ensure_success(response).await?.json::<Vec<Row>>().await?;
        if rows.is_empty() {
            return Err(RemoteError::new(format!("insert into {} returned no rows", table)));
        }
        Ok(rows.swap_remove(0))
    }

    async fn update(&self, table: &str, id: &str, patch: Row) -> RemoteResult<()> {
        let response = self
            .request(Method::PATCH, self.table_url(table)?)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(&patch)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> RemoteResult<()> {
        let response = self
            .request(Method::DELETE, self.table_url(table)?)
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "rest"
    }
}

impl std::fmt::Debug for RestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStore")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// Render an ordering specification as a PostgREST `order` parameter.
pub fn order_param(order: &[OrderBy]) -> String {
    order
        .iter()
        .map(|o| format!("{}.{}", o.column, o.direction.as_str()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a project URL, making sure relative joins land under its path.
pub(crate) fn normalize_base(url: &str) -> RemoteResult<Url> {
    let mut base = Url::parse(url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

pub(crate) fn authorize(request: RequestBuilder, api_key: &str) -> RequestBuilder {
    request.header("apikey", api_key).bearer_auth(api_key)
}

/// Error body shapes returned by PostgREST and edge functions.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    code: Option<String>,
}

/// Pass successful responses through, turn anything else into a `RemoteError`.
pub(crate) async fn ensure_success(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let message = body
        .message
        .or(body.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.to_string()
            } else {
                text.clone()
            }
        });

    let mut err = RemoteError::new(message).with_status(status.as_u16());
    if let Some(code) = body.code {
        err = err.with_code(code);
    }
    Err(err)
}
