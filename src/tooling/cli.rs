//! CLI Tooling
//!
//! Command-line interface over the ingest pipeline and the dnode store.

use crate::accumulator::lines_from_reader;
use crate::config::{ConfigLoader, DnodesConfig};
use crate::error::ApiError;
use crate::grammar::GrammarKind;
use crate::ingest::ingest;
use crate::logging::LoggingConfig;
use crate::record::Dnode;
use crate::store::{DnodeStore, SledDnodeStore};
use crate::tooling::format::{
    format_dnode_detail, format_dnode_table, format_ingest_report, DnodeView,
};
use clap::{Parser, Subcommand};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::info;

/// Dnodes CLI - ingest zdb dnode listings
#[derive(Parser)]
#[command(name = "dnodes")]
#[command(about = "Ingest zdb dnode listings into a queryable store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store directory (overrides storage.store_path)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Enable verbose logging (same as --log-level debug)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Parse zdb output and persist every dnode it describes
    Ingest {
        /// Captured output to read (stdin when omitted or "-")
        input: Option<PathBuf>,
        /// Line grammar (key-value, zdb); defaults to ingest.grammar
        #[arg(long)]
        grammar: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List stored dnodes
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one dnode by inode
    Show {
        inode: u64,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Find the dnode recorded for a path
    Find {
        path: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

impl Cli {
    /// Merge logging flags over the configured logging section.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_output_format(format: &str) -> Result<OutputFormat, ApiError> {
    match format {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(ApiError::ConfigError(format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

/// CLI context: resolved configuration and an open store
pub struct CliContext {
    config: DnodesConfig,
    store: SledDnodeStore,
}

impl CliContext {
    /// Load configuration and open the store.
    pub fn new(store_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Self::with_config(config, store_path)
    }

    /// Open the store for an already loaded configuration.
    pub fn with_config(config: DnodesConfig, store_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let store_path = config.storage.resolve_store_path(store_path)?;
        let store = SledDnodeStore::open(&store_path)?;
        info!(store = %store_path.display(), "opened dnode store");
        Ok(Self { config, store })
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Ingest {
                input,
                grammar,
                format,
            } => {
                let format = parse_output_format(format)?;
                let grammar = match grammar {
                    Some(name) => name.parse::<GrammarKind>().map_err(ApiError::ConfigError)?,
                    None => self.config.ingest.grammar,
                };
                match input.as_deref() {
                    Some(path) if path != Path::new("-") => {
                        let file = std::fs::File::open(path)?;
                        self.ingest_from(BufReader::new(file), grammar, format)
                    }
                    _ => self.ingest_from(std::io::stdin().lock(), grammar, format),
                }
            }
            Commands::List { format } => {
                let dnodes = self.store.list_all()?;
                self.render_many(&dnodes, parse_output_format(format)?)
            }
            Commands::Show { inode, format } => {
                let dnode = self
                    .store
                    .get(*inode)?
                    .ok_or_else(|| ApiError::NotFound(format!("no dnode with inode {}", inode)))?;
                self.render_one(&dnode, parse_output_format(format)?)
            }
            Commands::Find { path, format } => {
                let dnode = self
                    .store
                    .find_by_path(&path_bytes(path))?
                    .ok_or_else(|| {
                        ApiError::NotFound(format!("no dnode with path {}", path.display()))
                    })?;
                self.render_one(&dnode, parse_output_format(format)?)
            }
        }
    }

    fn ingest_from<R: BufRead>(
        &self,
        reader: R,
        grammar: GrammarKind,
        format: OutputFormat,
    ) -> Result<String, ApiError> {
        let report = ingest(lines_from_reader(reader), grammar.build(), &self.store)?;
        match format {
            OutputFormat::Text => Ok(format_ingest_report(&report)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
        }
    }

    fn render_many(&self, dnodes: &[Dnode], format: OutputFormat) -> Result<String, ApiError> {
        match format {
            OutputFormat::Text => Ok(format_dnode_table(dnodes)),
            OutputFormat::Json => {
                let views: Vec<DnodeView> = dnodes.iter().map(DnodeView::from).collect();
                Ok(serde_json::to_string_pretty(&views)?)
            }
        }
    }

    fn render_one(&self, dnode: &Dnode, format: OutputFormat) -> Result<String, ApiError> {
        match format {
            OutputFormat::Text => Ok(format_dnode_detail(dnode)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&DnodeView::from(dnode))?),
        }
    }
}
