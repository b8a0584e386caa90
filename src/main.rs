use anyhow::Context;
use clap::Parser;
use euromil_bet::core::ConfigProvider;
use euromil_bet::utils::{logger, validation::Validate};
use euromil_bet::{
    build_orchestrator, create_app, AppState, BetError, CliConfig, ServiceChannels, TomlConfig,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入配置：指定 --config 時使用 TOML，否則使用命令列/環境變數
    let config: Box<dyn ConfigProvider> = match &cli.config {
        Some(path) => {
            let toml = match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            let (verbose, json_logs) = cli.log_flags_with(&toml);
            logger::init_logger(verbose, json_logs);
            tracing::info!("📁 Configuration loaded from: {}", path);
            exit_if_invalid(toml.validate());
            Box::new(toml)
        }
        None => {
            logger::init_logger(cli.verbose, cli.json_logs);
            exit_if_invalid(cli.validate());
            Box::new(cli.clone())
        }
    };

    tracing::info!("{}", "=".repeat(60));
    tracing::info!("🎰 EUROMILLIONS BETTING SYSTEM");
    tracing::info!("{}", "=".repeat(60));

    let channels = ServiceChannels::open(config.as_ref()).context("failed to open service channels")?;
    let orchestrator =
        build_orchestrator(config.as_ref(), &channels).context("failed to build bet orchestrator")?;

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        grpc_server: config.credibank_server().to_string(),
        frontend_dir: config.frontend_dir().to_string(),
    };
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port()));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("🚀 Server running at: http://localhost:{}", config.port());
    tracing::info!(
        "📡 CrediBank: {} | EuroMilRegister: {} (TLS: {})",
        config.credibank_server(),
        config.euromil_server(),
        config.use_tls()
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // 伺服器停止後釋放兩個遠端連線
    tracing::info!("🛑 Shutting down server...");
    channels.close();

    served.context("HTTP server failed")?;
    tracing::info!("👋 Server stopped");
    Ok(())
}

fn exit_if_invalid(result: Result<(), BetError>) {
    if let Err(e) = result {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received (Ctrl+C)");
}
