pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::{build_orchestrator, ServiceChannels};
pub use app::{create_app, AppState};
pub use core::{key_encoder::KeyEncoder, orchestrator::BetOrchestrator};
pub use domain::model::{BetOutcome, BetRequest, Credential, EncodedKey, FailureStage, Selection};
pub use utils::error::{BetError, ChannelError, Result};
