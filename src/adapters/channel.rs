use crate::utils::error::{BetError, ChannelError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::RwLock;
use std::time::Duration;
use url::Url;

/// Long-lived connection to a remote voting service.
///
/// Each remote method is a JSON `POST` to `{endpoint}{package.Service/Method}`.
/// One channel is opened per service at startup and shared by every request;
/// [`RpcChannel::close`] drops the connection pool and makes later calls fail
/// with [`ChannelError::Closed`].
#[derive(Debug)]
pub struct RpcChannel {
    endpoint: Url,
    client: RwLock<Option<Client>>,
}

impl RpcChannel {
    pub fn connect(server: &str, use_tls: bool, timeout: Duration) -> Result<Self> {
        let scheme = if use_tls { "https" } else { "http" };
        let endpoint = Url::parse(&format!("{}://{}/", scheme, server)).map_err(|e| {
            BetError::InvalidConfigValueError {
                field: "server".to_string(),
                value: server.to_string(),
                reason: format!("Invalid service address: {}", e),
            }
        })?;

        let client = Client::builder().timeout(timeout).build()?;

        tracing::info!("🔌 Channel opened to {} (TLS: {})", endpoint, use_tls);

        Ok(Self {
            endpoint,
            client: RwLock::new(Some(client)),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// 單次遠端呼叫：送出一個請求並等待唯一的回應
    pub async fn call<Req, Resp>(
        &self,
        method: &str,
        request: &Req,
    ) -> std::result::Result<Resp, ChannelError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let client = self
            .client
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .ok_or_else(|| ChannelError::Closed {
                endpoint: self.endpoint.to_string(),
            })?;

        let url = format!("{}{}", self.endpoint, method);
        tracing::debug!("📡 Calling {}", url);

        let response = client.post(&url).json(request).send().await?;
        let status = response.status();
        tracing::debug!("Remote call {} status: {}", method, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChannelError::Status {
                method: method.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ChannelError::Decode {
            method: method.to_string(),
            details: e.to_string(),
        })
    }

    pub fn close(&self) {
        let mut client = self
            .client
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if client.take().is_some() {
            tracing::info!("🔌 Channel to {} closed", self.endpoint);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.client
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}
