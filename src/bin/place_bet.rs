use clap::Parser;
use euromil_bet::core::ConfigProvider;
use euromil_bet::utils::error::ErrorSeverity;
use euromil_bet::utils::{logger, validation::Validate};
use euromil_bet::{
    build_orchestrator, BetError, BetOutcome, BetRequest, CliConfig, Selection, ServiceChannels,
    TomlConfig,
};

#[derive(Parser)]
#[command(name = "place-bet")]
#[command(about = "Place a single EuroMillions bet, or list registered results")]
struct Args {
    #[command(flatten)]
    service: CliConfig,

    /// CrediBank account paying for the bet
    #[arg(long)]
    account: Option<String>,

    /// Five numbers, comma separated (1-50)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    numbers: Vec<i64>,

    /// Two stars, comma separated (1-12)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    stars: Vec<i64>,

    /// Whole key in canonical form, e.g. "1,2,3,4,5+6,7"
    #[arg(long, conflicts_with_all = ["numbers", "stars"])]
    key: Option<String>,

    /// List results instead of betting
    #[arg(long)]
    results: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config: Box<dyn ConfigProvider> = match &args.service.config {
        Some(path) => {
            let toml = TomlConfig::from_file(path)?;
            let (verbose, json_logs) = args.service.log_flags_with(&toml);
            logger::init_logger(verbose, json_logs);
            fail_if_err(toml.validate());
            Box::new(toml)
        }
        None => {
            logger::init_logger(args.service.verbose, args.service.json_logs);
            fail_if_err(args.service.validate());
            Box::new(args.service.clone())
        }
    };

    let channels = ServiceChannels::open(config.as_ref())?;
    let orchestrator = build_orchestrator(config.as_ref(), &channels)?;

    if args.results {
        let results = orchestrator.results().await;
        channels.close();
        let results = match results {
            Ok(results) => results,
            Err(e) => fail(e),
        };
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let Some(account) = args.account else {
        fail(BetError::validation("--account is required to place a bet"));
    };

    let request = match &args.key {
        Some(key) => match key.parse::<Selection>() {
            Ok(selection) => BetRequest::new(
                account,
                selection.numbers().iter().map(|n| i64::from(*n)).collect(),
                selection.stars().iter().map(|s| i64::from(*s)).collect(),
            ),
            Err(e) => fail(e),
        },
        None => BetRequest::new(account, args.numbers, args.stars),
    };

    let outcome = orchestrator.place_bet(request).await;
    channels.close();

    match outcome {
        BetOutcome::Success {
            selection,
            credential,
            detail,
        } => {
            println!("✅ {}", detail);
            println!("🎫 Key: {}", selection);
            println!("💳 Cheque: {}", credential.as_str());
            Ok(())
        }
        BetOutcome::Failure {
            stage,
            error,
            credential,
        } => {
            eprintln!("❌ [{}] {}", stage, error.user_friendly_message());
            if let Some(credential) = credential {
                eprintln!("⚠️ Cheque {} was spent and not refunded", credential.as_str());
            }
            fail(error)
        }
    }
}

fn fail_if_err(result: Result<(), BetError>) {
    if let Err(e) = result {
        fail(e);
    }
}

fn fail(error: BetError) -> ! {
    tracing::error!("❌ {} (Severity: {:?})", error, error.severity());
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 Suggestion: {}", error.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match error.severity() {
        ErrorSeverity::Low => 2,      // 輸入錯誤
        ErrorSeverity::Medium => 3,   // 可重試
        ErrorSeverity::High => 4,     // 支票已消耗或設定錯誤
        ErrorSeverity::Critical => 5, // 支票遺失
    };
    std::process::exit(exit_code);
}
