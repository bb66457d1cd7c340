//! CLI Tooling
//!
//! Command-line interface for the sharing operations. Each command maps to
//! one service operation and renders its result as text or JSON.

use crate::auth;
use crate::config::AppConfig;
use crate::error::SharingError;
use crate::format::{
    format_forest_text, format_search_results_text, format_transfer_report_text,
};
use crate::gateway::HttpDriveGateway;
use crate::service::SharingService;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Driveshare CLI - browse a drive account and transfer subtree ownership
#[derive(Parser)]
#[command(name = "driveshare")]
#[command(about = "Browse a drive account and transfer subtree ownership")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the account's resources as a tree
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Transfer ownership of a resource and its whole subtree
    ChangeOwner {
        /// Resource id at the top of the subtree
        #[arg(long)]
        id: String,
        /// Email address of the new owner
        #[arg(long = "new-owner-email")]
        new_owner_email: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Search resources by name
    Search {
        /// Name substring to match
        #[arg(long)]
        query: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Execution context holding the configured service.
pub struct CliContext {
    service: SharingService,
}

impl CliContext {
    /// Build a context from configuration; resolves the stored access token
    /// and wires up the HTTP gateway.
    pub fn new(config: &AppConfig) -> Result<Self, SharingError> {
        let token = auth::resolve_access_token(&config.auth)?;
        let gateway = HttpDriveGateway::new(&config.gateway, token)?;
        Ok(CliContext {
            service: SharingService::new(Arc::new(gateway)),
        })
    }

    /// Build a context over an externally constructed service.
    pub fn with_service(service: SharingService) -> Self {
        CliContext { service }
    }

    /// Execute a command, returning the printable output.
    pub async fn execute(&self, command: &Commands) -> Result<String, SharingError> {
        match command {
            Commands::List { format } => {
                info!("serving list request");
                let forest = self.service.list_files().await?;
                render(format, &forest, || format_forest_text(&forest))
            }
            Commands::ChangeOwner {
                id,
                new_owner_email,
                format,
            } => {
                info!("serving change-owner request");
                let report = self.service.change_owner(id, new_owner_email).await?;
                render(format, &report, || format_transfer_report_text(&report))
            }
            Commands::Search { query, format } => {
                info!("serving search request");
                let hits = self.service.search_by_name(query).await?;
                render(format, &hits, || format_search_results_text(&hits))
            }
        }
    }
}

fn render<T: Serialize>(
    format: &str,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<String, SharingError> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(value)?),
        "text" => Ok(text()),
        other => Err(SharingError::InvalidArgument(format!(
            "invalid output format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}
