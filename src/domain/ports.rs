use crate::domain::model::{Credential, EncodedKey, IssuanceResult, RegistrationResult, ResultRecord, Selection};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 向 CrediBank 申請數位支票
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    async fn request_credential(&self, account_id: &str) -> IssuanceResult;
}

/// 向 EuroMilRegister 登記投注
#[async_trait]
pub trait SelectionRegistrar: Send + Sync {
    /// Spends `credential`; whatever the result, the credential must not be used again.
    async fn register_selection(
        &self,
        credential: &Credential,
        selection: &Selection,
        key: EncodedKey,
    ) -> RegistrationResult;

    async fn list_results(&self) -> Result<Vec<ResultRecord>>;
}

pub trait ConfigProvider: Send + Sync {
    fn port(&self) -> u16;
    fn credibank_server(&self) -> &str;
    fn euromil_server(&self) -> &str;
    fn use_tls(&self) -> bool;
    fn request_timeout(&self) -> Duration;
    fn frontend_dir(&self) -> &str;
    fn credential_prefix(&self) -> &str;
    fn key_domain_size(&self) -> u32;
    fn registration_tag_pattern(&self) -> &str;
}
