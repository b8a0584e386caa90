// Adapters layer: concrete clients for the remote CrediBank / EuroMilRegister services.

pub mod channel;
pub mod confirmation;
pub mod credibank;
pub mod euromil_register;

use crate::core::key_encoder::KeyEncoder;
use crate::core::orchestrator::BetOrchestrator;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use channel::RpcChannel;
use confirmation::ConfirmationParser;
use credibank::CrediBankClient;
use euromil_register::EuroMilRegisterClient;
use std::sync::Arc;

/// The two shared service connections, opened once per process.
#[derive(Debug, Clone)]
pub struct ServiceChannels {
    pub credibank: Arc<RpcChannel>,
    pub euromil: Arc<RpcChannel>,
}

impl ServiceChannels {
    pub fn open<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let credibank = RpcChannel::connect(
            config.credibank_server(),
            config.use_tls(),
            config.request_timeout(),
        )?;
        let euromil = RpcChannel::connect(
            config.euromil_server(),
            config.use_tls(),
            config.request_timeout(),
        )?;

        Ok(Self {
            credibank: Arc::new(credibank),
            euromil: Arc::new(euromil),
        })
    }

    /// 關閉兩個連線；之後的呼叫會立即失敗
    pub fn close(&self) {
        self.credibank.close();
        self.euromil.close();
    }
}

/// 組裝客戶端與下注流程
pub fn build_orchestrator<C: ConfigProvider + ?Sized>(
    config: &C,
    channels: &ServiceChannels,
) -> Result<BetOrchestrator> {
    let issuer = CrediBankClient::new(channels.credibank.clone(), config.credential_prefix());
    let parser = ConfirmationParser::new(config.registration_tag_pattern())?;
    let registrar = EuroMilRegisterClient::new(channels.euromil.clone(), parser);
    let encoder = KeyEncoder::new(config.key_domain_size())?;

    Ok(BetOrchestrator::new(
        Arc::new(issuer),
        Arc::new(registrar),
        encoder,
    ))
}
