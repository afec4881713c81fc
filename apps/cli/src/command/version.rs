use super::Command;
use crate::config::Config;
use crate::error::{OptionExt, Result, WrapErr};
use es_client::Uptasticsearch;
use tracing::info;

pub struct VersionCommand {
    config: Config,
    host: Option<String>,
}

impl VersionCommand {
    pub fn new(cfg: Config, host: Option<String>) -> Self {
        Self { config: cfg, host }
    }
}

impl Command for VersionCommand {
    fn execute(&self) -> Result<()> {
        let host = match &self.host {
            Some(host) => host.clone(),
            None => self
                .config
                .host()?
                .ok_or_eyre("No host given. Pass --host or set `host` in config.toml")?,
        };

        let client = Uptasticsearch::connect(&host, &self.config.client_config())
            .wrap_err_with(|| format!("Failed to resolve the version of {}", host))?;
        info!("connected to {}", client.endpoint());

        let number = client.version().map_or("unknown", |v| v.number.as_str());
        println!("{}\t{}", number, client.strategy());
        Ok(())
    }
}
