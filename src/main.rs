use aurora::core::config::{self, CliOverrides};
use aurora::tui;
use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "aurora", about = "Terminal client for an Aurora chat backend")]
struct Args {
    /// Backend base URL (overrides AURORA_BASE_URL and the config file)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    /// Start with the session sidebar hidden
    #[arg(long)]
    no_sidebar: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Checked up front: loading writes the default file
    let generated_config = config::config_path().filter(|path| !path.exists());
    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (config::AuroraConfig::default(), Some(e)),
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            log_level: args.log_level,
            no_sidebar: args.no_sidebar,
        },
    );

    // File logger: the terminal belongs to the TUI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Some(path) = generated_config {
        log::info!("No config file found, generated default at {}", path.display());
    }
    if let Some(e) = config_error {
        log::warn!("Falling back to default config: {}", e);
    }
    for warning in &resolved.warnings {
        log::warn!("{}", warning);
    }
    log::debug!("Resolved config: {:?}", resolved);
    log::info!("Aurora starting up against {}", resolved.base_url);

    tui::run(resolved)
}
