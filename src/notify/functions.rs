//! Client for named remote functions (hosted edge functions).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::error::RemoteResult;
use crate::store::rest::{authorize, ensure_success, normalize_base};

/// A service exposing named callables that take one JSON object.
#[async_trait]
pub trait RemoteFunctions: Send + Sync {
    async fn invoke(&self, name: &str, payload: &Value) -> RemoteResult<Value>;
}

/// Invokes functions at `{url}/functions/v1/{name}`.
#[derive(Clone)]
pub struct FunctionsClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl FunctionsClient {
    pub fn new(url: &str, api_key: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: normalize_base(url)?,
            api_key: api_key.into(),
        })
    }

    fn function_url(&self, name: &str) -> RemoteResult<Url> {
        Ok(self.base_url.join(&format!("functions/v1/{}", name))?)
    }
}

#[async_trait]
impl RemoteFunctions for FunctionsClient {
    async fn invoke(&self, name: &str, payload: &Value) -> RemoteResult<Value> {
        let request = self.client.post(self.function_url(name)?).json(payload);
        let response = authorize(request, &self.api_key).send().await?;
        let response = ensure_success(response).await?;

        // Functions may answer with an empty or non-JSON body.
        let text = response.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

impl std::fmt::Debug for FunctionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionsClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
