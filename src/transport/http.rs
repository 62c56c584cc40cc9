use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::TransportError;

pub async fn get_json<T: DeserializeOwned>(http: &reqwest::Client, url: &str) -> Result<T, TransportError> {
    let response = http.get(url).send().await?;
    decode(response).await
}

pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
    body: &B,
) -> Result<T, TransportError> {
    let response = http.post(url).json(body).send().await?;
    decode(response).await
}

/// Turns a response into exactly one outcome. Non-2xx bodies are kept as JSON when
/// they parse so callers can dig out `error.message`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    if !status.is_success() {
        let body = if bytes.is_empty() {
            None
        } else {
            Some(
                serde_json::from_slice(&bytes)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())),
            )
        };
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
}
