use std::env;

use clap::Parser;
use websignin_server::ServerBuilder;
use websignin_server::config::loader::{DEFAULT_CONFIG_PATH, load_config};
use websignin_server::observability::{apply_logging_level, effective_level, init_tracing};

/// Provider plugin preparing directory applications for web sign-in
#[derive(Parser, Debug)]
#[command(name = "websignin-server", version)]
struct Args {
    /// Engine address; accepted for compatibility, not dialed
    engine_address: Option<String>,

    /// Configuration file
    #[arg(long)]
    config: Option<String>,

    /// Accepted for compatibility; logs always go to stderr
    #[arg(long)]
    logtostderr: bool,

    /// Engine verbosity: 5 and above enables debug, 9 and above trace
    #[arg(short = 'v', long = "verbose", default_value_t = 0)]
    verbose: u8,
}

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    CliArgument,
    EnvironmentVariable,
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (WEBSIGNIN_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    init_tracing();

    let args = Args::parse();
    let (config_path, source) = resolve_config_path(args.config.clone());

    let cfg = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    apply_logging_level(&effective_level(&cfg.logging.level, args.verbose));
    tracing::info!(
        path = %config_path,
        source = %source,
        engine = args.engine_address.as_deref().unwrap_or(""),
        "Configuration loaded"
    );

    ServerBuilder::new().with_config(cfg).build().run().await
}

/// Priority: `--config`, then `WEBSIGNIN_CONFIG`, then `websignin.toml`.
fn resolve_config_path(cli: Option<String>) -> (String, ConfigSource) {
    if let Some(path) = cli {
        return (path, ConfigSource::CliArgument);
    }

    if let Ok(path) = env::var("WEBSIGNIN_CONFIG") {
        if !path.is_empty() {
            return (path, ConfigSource::EnvironmentVariable);
        }
    }

    (DEFAULT_CONFIG_PATH.to_string(), ConfigSource::Default)
}
