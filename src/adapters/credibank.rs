use crate::adapters::channel::RpcChannel;
use crate::core::{Credential, CredentialIssuer, IssuanceResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ISSUE_CREDENTIAL_METHOD: &str = "voting.VoterRegistrationService/IssueVotingCredential";

/// CrediBank 的預設支票前綴
pub const DEFAULT_CREDENTIAL_PREFIX: &str = "CRED-";

pub const DENIED_REASON: &str = "Account has insufficient credit or is invalid.";

#[derive(Debug, Serialize)]
struct IssueCredentialRequest<'a> {
    citizen_card_number: &'a str,
}

#[derive(Debug, Deserialize)]
struct IssueCredentialResponse {
    #[serde(default)]
    voting_credential: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Issues 10-credit digital cheques through CrediBank.
pub struct CrediBankClient {
    channel: Arc<RpcChannel>,
    credential_prefix: String,
}

impl CrediBankClient {
    pub fn new(channel: Arc<RpcChannel>, credential_prefix: impl Into<String>) -> Self {
        Self {
            channel,
            credential_prefix: credential_prefix.into(),
        }
    }

    fn classify(&self, response: IssueCredentialResponse) -> IssuanceResult {
        // null and missing are treated like an empty credential
        let token = response.voting_credential.unwrap_or_default();
        if !token.is_empty() && token.starts_with(&self.credential_prefix) {
            tracing::info!("[CrediBank] ✅ Cheque issued");
            tracing::debug!("[CrediBank] Cheque: {}", token);
            return IssuanceResult::Issued {
                credential: Credential::new(token),
            };
        }

        tracing::warn!("[CrediBank] Invalid cheque received: {:?}", token);
        let reason = response
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DENIED_REASON.to_string());
        IssuanceResult::Denied { reason }
    }
}

#[async_trait]
impl CredentialIssuer for CrediBankClient {
    async fn request_credential(&self, account_id: &str) -> IssuanceResult {
        tracing::info!("[CrediBank] Requesting cheque for account: {}", account_id);

        let request = IssueCredentialRequest {
            citizen_card_number: account_id,
        };

        match self
            .channel
            .call::<_, IssueCredentialResponse>(ISSUE_CREDENTIAL_METHOD, &request)
            .await
        {
            Ok(response) => self.classify(response),
            Err(e) => {
                tracing::error!("[CrediBank] ❌ Error: {}", e);
                IssuanceResult::Unreachable {
                    cause: e.to_string(),
                }
            }
        }
    }
}
