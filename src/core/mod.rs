pub mod key_encoder;
pub mod orchestrator;

pub use crate::domain::model::{
    BetOutcome, BetRequest, Credential, EncodedKey, FailureStage, IssuanceResult,
    RegistrationResult, ResultRecord, Selection,
};
pub use crate::domain::ports::{ConfigProvider, CredentialIssuer, SelectionRegistrar};
pub use crate::utils::error::Result;
