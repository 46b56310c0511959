//! # varspec CLI Module
//!
//! This module implements the CLI interface.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `search` - Filter orders by optional criteria
//! - `latest` - Show an order's current variant specification version
//! - `translate` - Translate a specification between dialects
//! - `compact` - Print a specification's assignments in compact form
//! - `validate` - Validate every order in an orders file
//! - `downgrade` - Downgrade a standard specification through KDP

mod commands;

use crate::config::VarspecConfig;
use crate::error::AppError;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use varspec_core::{OrderQuery, SelectionMode};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// varspec - variant specification translation and query
///
/// Searches test object orders, selects current specification versions and
/// translates specifications between the KDP, PRINS and internal dialects.
#[derive(Parser, Debug)]
#[command(name = "varspec")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Specification dialect read by `translate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dialect {
    /// KDP specification, translated to internal
    Kdp,
    /// PRINS specification, translated to internal
    Prins,
    /// Internal specification, translated to KDP
    Internal,
}

/// Order search criteria; every flag is optional and blank values are ignored.
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    #[arg(long)]
    pub order_id: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub project: Option<String>,
    #[arg(long)]
    pub series: Option<String>,
    #[arg(long)]
    pub vin: Option<String>,
    #[arg(long = "type")]
    pub test_object_type: Option<String>,
    /// Legacy variant code (family + number)
    #[arg(long)]
    pub variant: Option<String>,
    /// Legacy variant designation
    #[arg(long)]
    pub designation: Option<String>,
    #[arg(long)]
    pub variable_code: Option<String>,
    #[arg(long)]
    pub value_code: Option<String>,
}

impl From<SearchArgs> for OrderQuery {
    fn from(args: SearchArgs) -> Self {
        Self {
            test_object_order_id: args.order_id,
            status: args.status,
            project: args.project,
            series: args.series,
            vin: args.vin,
            test_object_type: args.test_object_type,
            variant: args.variant,
            designation: args.designation,
            variable_code: args.variable_code,
            value_code: args.value_code,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides [server] host)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides [server] port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Orders file (overrides [data] orders_file)
        #[arg(short, long)]
        orders: Option<PathBuf>,
    },

    /// Filter orders by optional criteria
    Search {
        /// Orders file (overrides [data] orders_file)
        #[arg(short, long)]
        orders: Option<PathBuf>,

        #[command(flatten)]
        criteria: SearchArgs,
    },

    /// Show an order's current variant specification version
    Latest {
        /// Test object order id
        id: String,

        /// Selection mode (recency, flag)
        #[arg(short, long, default_value = "recency")]
        mode: SelectionMode,

        /// Orders file (overrides [data] orders_file)
        #[arg(short, long)]
        orders: Option<PathBuf>,
    },

    /// Translate a specification between dialects
    Translate {
        /// Dialect of the input file
        #[arg(long, value_enum)]
        from: Dialect,

        /// Path to the JSON specification
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print an internal specification's assignments in compact form
    Compact {
        /// Path to the JSON internal specification
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Validate every order in an orders file
    Validate {
        /// Orders file (overrides [data] orders_file)
        #[arg(short, long)]
        orders: Option<PathBuf>,
    },

    /// Downgrade a standard specification to downloadable through KDP
    Downgrade {
        /// Path to a JSON KDP standard specification
        #[arg(short, long, conflicts_with = "order")]
        file: Option<PathBuf>,

        /// Downgrade this order's current version instead
        #[arg(long)]
        order: Option<String>,

        /// Selection mode used with --order (recency, flag)
        #[arg(short, long, default_value = "recency")]
        mode: SelectionMode,

        /// Orders file (overrides [data] orders_file)
        #[arg(short, long)]
        orders: Option<PathBuf>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let config = VarspecConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port, orders }) => {
            cmd_server(&config, host, port, orders.as_deref()).await
        }
        Some(Commands::Search { orders, criteria }) => {
            cmd_search(&config, orders.as_deref(), criteria.into(), json_mode)
        }
        Some(Commands::Latest { id, mode, orders }) => {
            cmd_latest(&config, orders.as_deref(), &id, mode, json_mode)
        }
        Some(Commands::Translate { from, file }) => cmd_translate(from, &file),
        Some(Commands::Compact { file }) => cmd_compact(&file, json_mode),
        Some(Commands::Validate { orders }) => cmd_validate(&config, orders.as_deref(), json_mode),
        Some(Commands::Downgrade {
            file,
            order,
            mode,
            orders,
        }) => {
            cmd_downgrade(
                &config,
                orders.as_deref(),
                file.as_deref(),
                order.as_deref(),
                mode,
            )
            .await
        }
        None => {
            // No subcommand - show the order count by default
            cmd_search(&config, None, OrderQuery::default(), json_mode)
        }
    }
}
