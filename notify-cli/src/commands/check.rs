use crate::output;

use std::path::PathBuf;

use clap::Args;
use color_eyre::Result;

use release_service::NotifierConfig;

/// Check the notifier configuration file
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the notifier configuration file
    #[arg(value_name = "FILE", default_value = "notifier.yml")]
    pub config: PathBuf,
}

pub fn execute(args: CheckArgs) -> Result<()> {
    let path = &args.config;

    if !path.exists() {
        color_eyre::eyre::bail!("Configuration file not found: {}", path.display());
    }

    output::status("Checking", &format!("{}", path.display()));

    let config = match NotifierConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    };

    output::check("configuration parses");
    output::check(&format!("releases endpoint: {}", config.releases_url()));
    output::check(&format!("method: {}", config.method));

    match &config.proxy {
        Some(proxy) => output::info(&format!("proxy: {}", proxy)),
        None => output::info("no proxy configured"),
    }
    output::info(&format!(
        "timeouts: connect {}s, read {}s",
        config.connect_timeout_secs, config.read_timeout_secs
    ));

    output::success("configuration OK");
    Ok(())
}
