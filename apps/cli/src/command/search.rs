use super::Command;
use crate::cli::{OutputFormat, SearchArgs};
use crate::config::Config;
use crate::error::{error, OptionExt, Result, WrapErr};
use es_client::{es_search, SearchSpec};
use tabular::Table;
use tracing::info;

pub struct SearchCommand {
    config: Config,
    args: SearchArgs,
}

impl SearchCommand {
    pub fn new(cfg: Config, args: SearchArgs) -> Self {
        Self { config: cfg, args }
    }

    fn host(&self) -> Result<String> {
        match &self.args.host {
            Some(host) => Ok(host.clone()),
            None => self
                .config
                .host()?
                .ok_or_eyre("No host given. Pass --host or set `host` in config.toml"),
        }
    }

    fn query(&self) -> Result<String> {
        if let Some(query) = &self.args.query {
            return Ok(query.clone());
        }
        let Some(path) = &self.args.query_file else {
            return Ok(es_client::models::DEFAULT_QUERY.to_string());
        };

        let query = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read query file {}", path.display()))?;
        if query.trim().is_empty() {
            return Err(error!("Query file {} is empty", path.display()));
        }
        Ok(query)
    }

    /// Command line flags first, then config.toml
    fn spec(&self) -> Result<SearchSpec> {
        let scroll = match &self.args.scroll {
            Some(scroll) => scroll.clone(),
            None => self.config.scroll()?,
        };

        let mut spec = SearchSpec::for_index(self.args.index.as_str())
            .query(self.query()?)
            .page_size(self.args.size.unwrap_or(self.config.page_size))
            .scroll(scroll);
        if let Some(doc_type) = &self.args.doc_type {
            spec = spec.doc_type(doc_type.as_str());
        }
        if let Some(max_hits) = self.args.max_hits.or(self.config.max_hits) {
            spec = spec.max_hits(max_hits);
        }
        Ok(spec)
    }
}

fn render(table: &Table, format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Json => table.to_json()?,
        OutputFormat::Ndjson => table.to_ndjson()?,
    };
    Ok(out)
}

impl Command for SearchCommand {
    fn execute(&self) -> Result<()> {
        let host = self.host()?;
        let spec = self.spec()?;

        let mut client_config = self.config.client_config();
        client_config.clear_scroll |= self.args.clear_scroll;

        info!("Searching {} on {}", spec.index, host);
        let table = es_search(&host, &spec, &client_config)
            .wrap_err_with(|| format!("Search on {} failed", host))?;

        match table {
            Some(table) => {
                info!("Retrieved {} documents", table.len());
                let out = render(&table, self.args.format)?;
                print!("{}", out);
                if !out.ends_with('\n') {
                    println!();
                }
            }
            None => info!("No documents matched"),
        }
        Ok(())
    }
}
