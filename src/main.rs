use clap::Parser;
use std::error::Error;
use std::fs::OpenOptions;

use maillog_browser::app::{self, App};
use maillog_browser::config::{CliArgs, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();
    let config = Config::from_args(&args)?;

    // The terminal belongs to the interface, so logs go to a file.
    if let Some(parent) = config.log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    log::info!(
        "Starting against {} (debounce {:?}, settings {:?})",
        config.base_url,
        config.debounce,
        config.settings_path
    );
    app::configure(config);

    let program = bubbletea_rs::Program::<App>::builder()
        .alt_screen(true)
        .build()?;
    program.run().await?;

    log::info!("Exited");
    Ok(())
}
