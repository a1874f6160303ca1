use clap::{Parser, Subcommand};
use std::sync::Arc;

use psu_reg_bot::application::errors::{BotError, ConfigError};
use psu_reg_bot::application::services::ReplyService;
use psu_reg_bot::domain::traits::{DisabledLog, InteractionLog, Messenger};
use psu_reg_bot::infrastructure::adapters::{ConsoleMessenger, LineClient};
use psu_reg_bot::infrastructure::config::Config;
use psu_reg_bot::infrastructure::llm::{GeminiProvider, LLM};
use psu_reg_bot::infrastructure::server::{self, AppState};
use psu_reg_bot::infrastructure::sheets::{GoogleSheetsLog, SpreadsheetRef};

#[derive(Parser)]
#[command(name = "psu-reg-bot")]
#[command(about = "LINE webhook bot for the PSU Pattani registration office", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Listening port (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            if let Err(e) = run_bot(&cli.config, cli.port) {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("psu-reg-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            if let Err(e) = init_config() {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    }
}

fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    if !std::path::Path::new(config_path).exists() {
        return Config::load_env();
    }

    let mut config = Config::load(config_path).unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}, using defaults", e);
        Config::default()
    });
    config.apply_env()?;
    Ok(config)
}

fn run_bot(config_path: &str, port_override: Option<u16>) -> Result<(), BotError> {
    // .env is optional
    if let Ok(path) = dotenvy::dotenv() {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let mut config = load_config(config_path)?;
    if let Some(port) = port_override {
        config.server.port = port;
    }
    config.validate()?;

    let messenger: Arc<dyn Messenger> = match config.line.channel_access_token() {
        Some(token) => Arc::new(LineClient::new(token)),
        None => {
            tracing::warn!("LINE_CHANNEL_ACCESS_TOKEN not set, printing replies to the console");
            Arc::new(ConsoleMessenger::new())
        }
    };

    if config.llm.api_key().is_none() {
        tracing::warn!("GEMINI_API_KEY not set, conversation replies will report the error");
    }
    let llm: Arc<dyn LLM> = Arc::new(GeminiProvider::new(
        config.llm.api_key().unwrap_or_default(),
        Some(&config.llm.model),
    ));
    tracing::info!("Using Gemini {} for conversation replies", config.llm.model);

    let log = interaction_log(&config);

    let service = ReplyService::from_config(&config, llm, messenger, log)?;
    let secret = config.line.channel_secret().unwrap_or_default().to_string();
    let state = AppState::new(secret, service);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("failed to start runtime: {}", e)))?;
    rt.block_on(server::serve(&config.bind_addr(), state))
}

fn interaction_log(config: &Config) -> Arc<dyn InteractionLog> {
    let sheets = &config.sheets;
    let target = match (&sheets.spreadsheet_id, &sheets.spreadsheet_name) {
        (Some(id), _) => Some(SpreadsheetRef::Id(id.clone())),
        (None, Some(name)) => Some(SpreadsheetRef::Name(name.clone())),
        (None, None) => None,
    };

    match (&sheets.credentials_file, target) {
        (Some(path), Some(target)) => {
            tracing::info!("Logging interactions to Google Sheets ({:?})", target);
            Arc::new(GoogleSheetsLog::new(path.clone(), target))
        }
        _ => {
            tracing::warn!("Spreadsheet credentials or name not set, interaction log disabled");
            Arc::new(DisabledLog)
        }
    }
}

fn init_config() -> Result<(), ConfigError> {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config)
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
