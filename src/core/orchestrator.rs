use crate::core::key_encoder::KeyEncoder;
use crate::core::{
    BetOutcome, BetRequest, CredentialIssuer, FailureStage, IssuanceResult, RegistrationResult,
    ResultRecord, Selection, SelectionRegistrar,
};
use crate::utils::error::{BetError, Result};
use std::sync::Arc;

/// Runs one bet: validate, obtain a cheque from CrediBank, spend it on EuroMilRegister.
///
/// The two remote calls are strictly sequential and the flow stops at the first
/// failure. Nothing is retried and a spent cheque is never refunded.
pub struct BetOrchestrator {
    issuer: Arc<dyn CredentialIssuer>,
    registrar: Arc<dyn SelectionRegistrar>,
    encoder: KeyEncoder,
}

impl BetOrchestrator {
    pub fn new(
        issuer: Arc<dyn CredentialIssuer>,
        registrar: Arc<dyn SelectionRegistrar>,
        encoder: KeyEncoder,
    ) -> Self {
        Self {
            issuer,
            registrar,
            encoder,
        }
    }

    pub async fn place_bet(&self, request: BetRequest) -> BetOutcome {
        tracing::info!(
            "🎫 New bet - account: {}, numbers: {:?}, stars: {:?}",
            request.account_id,
            request.numbers,
            request.stars
        );

        // 驗證輸入，失敗時不呼叫任何外部服務
        let selection = match validate(&request) {
            Ok(selection) => selection,
            Err(e) => {
                tracing::warn!("❌ Bet rejected at validation: {}", e);
                return BetOutcome::failed(FailureStage::Validation, e, None);
            }
        };

        // 步驟 1: CrediBank
        tracing::info!("💳 Step 1: contacting CrediBank...");
        let credential = match self.issuer.request_credential(&request.account_id).await {
            IssuanceResult::Issued { credential } => credential,
            IssuanceResult::Denied { reason } => {
                tracing::warn!("❌ CrediBank denied the cheque: {}", reason);
                return BetOutcome::failed(
                    FailureStage::CredentialIssuance,
                    BetError::IssuanceDenied { reason },
                    None,
                );
            }
            IssuanceResult::Unreachable { cause } => {
                tracing::error!("❌ CrediBank unreachable: {}", cause);
                return BetOutcome::failed(
                    FailureStage::CredentialIssuance,
                    BetError::IssuanceUnreachable { cause },
                    None,
                );
            }
        };
        tracing::info!("✅ Digital cheque obtained");
        tracing::debug!("Cheque: {}", credential.as_str());

        // 步驟 2: EuroMilRegister
        let key = self.encoder.encode(&selection);
        tracing::info!(
            "🎰 Step 2: contacting EuroMilRegister (key: {}, id: {})...",
            selection,
            key
        );

        match self
            .registrar
            .register_selection(&credential, &selection, key)
            .await
        {
            RegistrationResult::Registered { detail } => {
                tracing::info!("✅ Bet registered: {}", detail);
                BetOutcome::Success {
                    selection,
                    credential,
                    detail,
                }
            }
            RegistrationResult::Rejected { reason } => {
                tracing::warn!(
                    "❌ EuroMilRegister rejected the bet; cheque {} is spent and not refunded: {}",
                    credential.as_str(),
                    reason
                );
                BetOutcome::failed(
                    FailureStage::Registration,
                    BetError::RegistrationRejected { reason },
                    Some(credential),
                )
            }
            RegistrationResult::Unreachable { cause } => {
                tracing::error!(
                    "🚨 EuroMilRegister unreachable after spending cheque {}: {}",
                    credential.as_str(),
                    cause
                );
                BetOutcome::failed(
                    FailureStage::Registration,
                    BetError::RegistrationUnreachable { cause },
                    Some(credential),
                )
            }
        }
    }

    /// Passthrough to the registration service's results query.
    pub async fn results(&self) -> Result<Vec<ResultRecord>> {
        self.registrar.list_results().await
    }
}

fn validate(request: &BetRequest) -> Result<Selection> {
    if request.account_id.trim().is_empty() {
        return Err(BetError::validation("Account id cannot be empty."));
    }
    Selection::new(&request.numbers, &request.stars)
}
