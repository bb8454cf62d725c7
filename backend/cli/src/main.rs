mod analyze_cmd;
mod doctor_cmd;
mod terminal_output;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use defectscan_config::DefectScanConfig;
use defectscan_core::MultimodalGenerator;
use defectscan_gateway::GatewayState;
use defectscan_understanding::{DefectAnalyzer, GeminiProvider, MockGenerator};

#[derive(Parser)]
#[command(name = "defectscan")]
#[command(about = "DefectScan: manufacturing part defect analysis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web UI and upload API (default)
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Answer every analysis with this text instead of calling Gemini
        #[arg(long, value_name = "TEXT")]
        mock: Option<String>,
    },
    /// Analyze one image file and print the result
    Analyze {
        /// JPEG or PNG file
        path: PathBuf,
        /// Strip Markdown formatting from the result
        #[arg(long)]
        plain: bool,
    },
    /// Check credentials and configuration
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { port: None, mock: None }) {
        Commands::Serve { port, mock } => {
            let config = defectscan_config::from_env()?;
            logging::init_logger(&config.log_level, config.log_dir.as_deref());
            let config = DefectScanConfig {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config, mock).await?;
        }
        Commands::Analyze { path, plain } => {
            let config = defectscan_config::from_env()?;
            logging::init_logger("warn", config.log_dir.as_deref());
            let generator = Arc::new(gemini_provider(&config));
            analyze_cmd::run(generator, &path, plain).await?;
        }
        Commands::Doctor => {
            logging::init_logger("warn", None::<&str>);
            let vars = defectscan_config::env_vars(Some(Path::new(defectscan_config::DOTENV_FILE)))?;
            if !doctor_cmd::run(&vars)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn gemini_provider(config: &DefectScanConfig) -> GeminiProvider {
    GeminiProvider::new(config.api_key.clone())
        .with_model(&config.model)
        .with_base_url(&config.api_base_url)
}

async fn run_server(config: DefectScanConfig, mock: Option<String>) -> Result<()> {
    info!(config = %config.redacted(), "Starting DefectScan");
    defectscan_config::log_validation(&config);

    let (generator, credential_configured) = match mock {
        Some(text) => {
            warn!("Serving canned analysis results; Gemini will not be called");
            let generator: Arc<dyn MultimodalGenerator> =
                Arc::new(MockGenerator::new("mock").with_response(text));
            (generator, true)
        }
        None => {
            let provider = gemini_provider(&config);
            let has_key = provider.has_credential();
            let generator: Arc<dyn MultimodalGenerator> = Arc::new(provider);
            (generator, has_key)
        }
    };
    info!(
        provider = generator.name(),
        model = generator.model(),
        source = config.api_key_source.as_deref().unwrap_or("none"),
        "Generator ready"
    );

    let state = GatewayState::new(Arc::new(DefectAnalyzer::new(generator)), credential_configured);
    defectscan_gateway::start_server(&config.listen_addr(), state).await
}
