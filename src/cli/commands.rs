//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

/// Asana API command-line client
#[derive(Parser, Debug)]
#[command(name = "asana")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Personal access token
    #[arg(long, global = true, env = "ASANA_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// API root, overriding the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Extra client option as KEY=VALUE (VALUE may be JSON), repeatable
    #[arg(short = 'o', long = "option", global = true, value_parser = parse_key_value)]
    pub options: Vec<(String, Value)>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a single resource
    Get {
        /// Path relative to the API root, e.g. /users/me
        path: String,

        /// Query parameter as KEY=VALUE, repeatable
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, Value)>,

        /// Print the whole response envelope
        #[arg(long)]
        full_payload: bool,
    },

    /// Walk a collection
    List {
        /// Collection path, e.g. /tasks
        path: String,

        /// Query parameter as KEY=VALUE, repeatable
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, Value)>,

        /// Print one line per page, per item, or the first page's data
        #[arg(long, default_value = "items")]
        iterate: IterateMode,

        /// Stop after this many lines
        #[arg(long)]
        max: Option<usize>,
    },

    /// Create a resource
    Post {
        /// Collection path
        path: String,

        /// JSON object sent as `data`
        #[arg(short, long)]
        data: String,
    },

    /// Update a resource
    Put {
        /// Resource path
        path: String,

        /// JSON object sent as `data`
        #[arg(short, long)]
        data: String,
    },

    /// Delete a resource
    Delete {
        /// Resource path
        path: String,
    },

    /// List known resources
    Resources,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON (one value per line)
    Json,
    /// Indented JSON
    Pretty,
}

/// How `list` walks a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum IterateMode {
    /// One line per page
    Pages,
    /// One line per item
    Items,
    /// Single request, no pagination
    None,
}

/// Parse `KEY=VALUE`, reading VALUE as JSON when it parses and as a string otherwise
pub(crate) fn parse_key_value(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
