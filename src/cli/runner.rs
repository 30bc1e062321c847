//! CLI runner - executes commands

use crate::auth::AuthConfig;
use crate::cli::commands::{Cli, Commands, IterateMode, OutputFormat};
use crate::client::Client;
use crate::config::{load_config, ClientConfig};
use crate::error::{Error, Result};
use crate::options::{keys, IteratorType, Options};
use crate::pagination::Collection;
use crate::resources::RESOURCES;
use serde_json::{json, Value};
use std::io::Write;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, printing results to stdout
    pub async fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(&mut out).await
    }

    /// Run the CLI command, printing results to `out`
    pub async fn run_with_output<W: Write>(&self, out: &mut W) -> Result<()> {
        match &self.cli.command {
            Commands::Resources => self.resources(out),
            Commands::Get {
                path,
                query,
                full_payload,
            } => {
                let client = self.client()?;
                let options = Options::new().with(keys::FULL_PAYLOAD, *full_payload);
                let value = client.get(path, &to_options(query), &options).await?;
                self.output(out, &value)
            }
            Commands::List {
                path,
                query,
                iterate,
                max,
            } => {
                let client = self.client()?;
                self.list(&client, out, path, &to_options(query), *iterate, *max)
                    .await
            }
            Commands::Post { path, data } => {
                let client = self.client()?;
                let value = client.post(path, parse_data(data)?, &Options::new()).await?;
                self.output(out, &value)
            }
            Commands::Put { path, data } => {
                let client = self.client()?;
                let value = client.put(path, parse_data(data)?, &Options::new()).await?;
                self.output(out, &value)
            }
            Commands::Delete { path } => {
                let client = self.client()?;
                let value = client.delete(path, &Options::new()).await?;
                self.output(out, &value)
            }
        }
    }

    /// Build the client: config file, then flags
    pub fn client(&self) -> Result<Client> {
        let config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => ClientConfig::default(),
        };

        let mut builder = config.into_builder();
        if let Some(token) = &self.cli.token {
            builder = builder.auth(AuthConfig::bearer(token));
        }
        if let Some(url) = &self.cli.base_url {
            builder = builder.base_url(url);
        }
        builder = builder.options(&to_options(&self.cli.options));

        let client = builder.build()?;
        debug!("Client options: {:?}", client.options());
        Ok(client)
    }

    async fn list<W: Write>(
        &self,
        client: &Client,
        out: &mut W,
        path: &str,
        query: &Options,
        mode: IterateMode,
        max: Option<usize>,
    ) -> Result<()> {
        let iterator_type = match mode {
            IterateMode::Pages => Value::from(IteratorType::Pages),
            IterateMode::Items => Value::from(IteratorType::Items),
            IterateMode::None => Value::Null,
        };
        let options = Options::new().with(keys::ITERATOR_TYPE, iterator_type);
        let max = max.unwrap_or(usize::MAX);
        let mut printed = 0;

        match client.get_collection(path, query, &options).await? {
            Collection::Pages(mut pages) => {
                while printed < max {
                    let Some(page) = pages.next_page().await? else {
                        break;
                    };
                    self.output(out, &Value::Array(page))?;
                    printed += 1;
                }
            }
            Collection::Items(mut items) => {
                while printed < max {
                    let Some(item) = items.next_item().await? else {
                        break;
                    };
                    self.output(out, &item)?;
                    printed += 1;
                }
            }
            Collection::Data(data) => self.output(out, &data)?,
        }
        Ok(())
    }

    fn resources<W: Write>(&self, out: &mut W) -> Result<()> {
        for resource in RESOURCES {
            self.output(out, &json!({"name": resource.name, "path": resource.path}))?;
        }
        Ok(())
    }

    fn output<W: Write>(&self, out: &mut W, value: &Value) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        writeln!(out, "{text}")?;
        Ok(())
    }
}

fn to_options(pairs: &[(String, Value)]) -> Options {
    pairs.iter().cloned().collect()
}

fn parse_data(data: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(data)
        .map_err(|e| Error::config(format!("Invalid --data JSON: {e}")))?;
    if !value.is_object() {
        return Err(Error::config("--data must be a JSON object"));
    }
    Ok(value)
}
