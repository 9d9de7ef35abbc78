//! Relay endpoint transport (JSON-RPC 2.0).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    clients::envelope::{Envelope, GovernanceAction},
    config::RelayConfig,
    errors::{Error, Result},
};

/// Something that accepts `(method, params)` and returns the relay's result.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, method: &str, params: Value) -> Result<Value>;
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

/// Turn a decoded JSON-RPC reply into the call's result.
///
/// An error object wins over the HTTP status, so the relay's own message reaches the caller.
fn rpc_result(method: &str, status: StatusCode, response: RpcResponse) -> Result<Value> {
    if let Some(err) = response.error {
        tracing::warn!(
            target: "relay",
            method,
            code = err.code,
            "relay rejected envelope: {}",
            err.message
        );
        return Err(Error::RelayFailure(format!("{method}: {} (code {})", err.message, err.code)));
    }
    if !status.is_success() {
        return Err(Error::RelayFailure(format!("{method}: http status {status}")));
    }
    response
        .result
        .ok_or_else(|| Error::RelayFailure(format!("{method}: response carried no result")))
}

/// JSON-RPC over HTTP POST.
#[derive(Clone)]
pub struct HttpRelay {
    pub url: String,
    client: Client,
}

impl HttpRelay {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            url: config.url.clone(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl RelayTransport for HttpRelay {
    async fn send(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({ "jsonrpc": "2.0", "method": method, "params": params, "id": null });
        tracing::debug!(target: "relay", url = %self.url, method, "sending envelope");

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::RelayFailure(format!("{method}: {e}")))?;

        let status = resp.status();
        let parsed: RpcResponse = resp.json().await.map_err(|e| {
            Error::RelayFailure(format!("{method}: invalid response ({status}): {e}"))
        })?;
        rpc_result(method, status, parsed)
    }
}

/// Forward an envelope under its action's method, as `{ signatureData, data }`.
pub(crate) async fn relay_envelope<D>(
    relay: Option<&dyn RelayTransport>,
    envelope: &Envelope<D>,
) -> Result<Value>
where
    D: GovernanceAction + Serialize + Sync,
{
    let relay = relay.ok_or_else(|| {
        Error::UnsupportedConfiguration(
            "no relay endpoint configured for signature envelopes".to_string(),
        )
    })?;
    if envelope.signature_data.is_none() {
        return Err(Error::Input("only signed envelopes can be relayed".to_string()));
    }
    let params = serde_json::to_value(envelope).map_err(|e| Error::Input(e.to_string()))?;
    let result = relay.send(D::METHOD, params).await?;
    tracing::info!(target: "relay", method = D::METHOD, "envelope relayed");
    Ok(result)
}
