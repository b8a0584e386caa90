use crate::adapters::channel::RpcChannel;
use crate::adapters::confirmation::ConfirmationParser;
use crate::core::{
    Credential, EncodedKey, RegistrationResult, ResultRecord, Selection, SelectionRegistrar,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const VOTE_METHOD: &str = "voting.VotingService/Vote";
pub const GET_RESULTS_METHOD: &str = "voting.VotingService/GetResults";

#[derive(Debug, Serialize)]
struct VoteRequest<'a> {
    voting_credential: &'a str,
    candidate_id: EncodedKey,
}

#[derive(Debug, Deserialize)]
struct VoteResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct GetResultsRequest {}

#[derive(Debug, Deserialize)]
struct GetResultsResponse {
    #[serde(default)]
    results: Vec<ResultRecord>,
}

/// Registers bets on EuroMilRegister by spending a CrediBank cheque.
pub struct EuroMilRegisterClient {
    channel: Arc<RpcChannel>,
    parser: ConfirmationParser,
}

impl EuroMilRegisterClient {
    pub fn new(channel: Arc<RpcChannel>, parser: ConfirmationParser) -> Self {
        Self { channel, parser }
    }

    /// 將投票服務的回應轉換成投注訊息
    fn translate(&self, selection: &Selection, response: VoteResponse) -> RegistrationResult {
        if response.success {
            let tag = self.parser.tag_or_marker(&response.message);
            RegistrationResult::Registered {
                detail: format!(
                    "Bet registered successfully! Key: {} | Registration number: {}",
                    selection, tag
                ),
            }
        } else {
            RegistrationResult::Rejected {
                reason: format!("Failed to register bet: {}", response.message),
            }
        }
    }
}

#[async_trait]
impl SelectionRegistrar for EuroMilRegisterClient {
    async fn register_selection(
        &self,
        credential: &Credential,
        selection: &Selection,
        key: EncodedKey,
    ) -> RegistrationResult {
        tracing::info!("[EuroMilRegister] Registering bet: {} (id {})", selection, key);
        tracing::debug!("[EuroMilRegister] Cheque: {}", credential.as_str());

        let request = VoteRequest {
            voting_credential: credential.as_str(),
            candidate_id: key,
        };

        match self
            .channel
            .call::<_, VoteResponse>(VOTE_METHOD, &request)
            .await
        {
            Ok(response) => {
                tracing::info!("[EuroMilRegister] Server reply: {}", response.message);
                self.translate(selection, response)
            }
            Err(e) => {
                tracing::error!("[EuroMilRegister] ❌ Error: {}", e);
                RegistrationResult::Unreachable {
                    cause: e.to_string(),
                }
            }
        }
    }

    async fn list_results(&self) -> Result<Vec<ResultRecord>> {
        let response: GetResultsResponse = self
            .channel
            .call(GET_RESULTS_METHOD, &GetResultsRequest {})
            .await?;
        tracing::debug!("[EuroMilRegister] {} result records", response.results.len());
        Ok(response.results)
    }
}
