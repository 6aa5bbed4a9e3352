use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use okreport::api::ApiClient;
use okreport::commands;
use okreport::config;
use okreport::data_provider::ReportProvider;
use okreport::table::{ListQuery, DEFAULT_PAGE_SIZE};
use okreport::types::ReportKind;

// Default Configuration Constants
/// Default log level when not specified
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log file path (no logging to file)
const DEFAULT_LOG_FILE: &str = "/dev/null";

#[derive(Parser)]
#[command(name = "okreport")]
#[command(
    about = "Inspection report lists and print previews",
    long_about = "Inspection report lists and print previews\n\nIf no command is specified, the program starts in interactive mode."
)]
struct Cli {
    /// Set log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Log file path (default: /dev/null for no logging)
    #[arg(short = 'F', long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: String,

    /// Serve fixture reports instead of calling the API
    #[cfg(feature = "development")]
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of reports
    List {
        /// Report kind: acb, ht-breaker, earth-test, oil-filtration
        kind: ReportKind,

        /// Zero-based page index
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Rows per page
        #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: usize,

        /// Sort as column,asc or column,desc (e.g. reportDate,desc)
        #[arg(long)]
        sort_by: Option<String>,

        /// Free-text search
        #[arg(short, long)]
        query: Option<String>,

        /// Fetch every report and filter, sort and paginate locally
        #[arg(short, long)]
        all: bool,
    },
    /// Print a report as paginated text
    Show {
        /// Report kind: acb, ht-breaker, earth-test, oil-filtration
        kind: ReportKind,

        /// Report id
        id: i64,
    },
    /// Validate a JSON report and store it
    Submit {
        /// Report kind: acb, ht-breaker, earth-test, oil-filtration
        kind: ReportKind,

        /// JSON file holding the report
        file: PathBuf,

        /// Update an existing report instead of adding a new one
        #[arg(short, long)]
        update: bool,
    },
    /// Display current configuration
    Config,
}

fn create_client(config: &config::Config) -> Arc<dyn ReportProvider> {
    match ApiClient::new(&config.api) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            let error_msg = format!("Failed to create API client: {}", e);
            tracing::error!("{}", error_msg);
            eprintln!("{}", error_msg);
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "development")]
fn select_client(cli: &Cli, config: &config::Config) -> Arc<dyn ReportProvider> {
    if cli.mock {
        tracing::info!("Using mock report backend");
        return Arc::new(okreport::dev::mock_client::MockClient::new());
    }
    create_client(config)
}

#[cfg(not(feature = "development"))]
fn select_client(_cli: &Cli, config: &config::Config) -> Arc<dyn ReportProvider> {
    create_client(config)
}

fn init_logging(log_level: &str, log_file: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_file, e);
            return;
        }
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Handle the config command - display current configuration
fn handle_config_command() {
    let cfg = config::read();

    let (path_str, exists) = match config::get_config_path() {
        Some(path) => {
            let exists = path.exists();
            (path.display().to_string(), exists)
        }
        None => ("Unable to determine config path".to_string(), false),
    };

    println!("Configuration File: {} (Exists: {})", path_str, if exists { "yes" } else { "no" });
    println!();
    println!("Current Configuration:");
    println!("=====================");
    println!("log_level: {}", cfg.log_level);
    println!("log_file: {}", cfg.log_file);
    println!();
    println!("[api]");
    println!("base_url: {}", cfg.api.base_url);
    println!("timeout_secs: {}", cfg.api.timeout_secs);
    println!();
    println!("[tables]");
    let server_paged: Vec<&str> = cfg.tables.server_paged.iter().map(|k| k.slug()).collect();
    println!("server_paged: [{}]", server_paged.join(", "));
    println!("page_size: {}", cfg.tables.page_size);
    println!("search_debounce_ms: {}", cfg.tables.search_debounce_ms);
    println!("min_loading_ms: {}", cfg.tables.min_loading_ms);
    println!();
    println!("[print]");
    println!("first_page_rows: {}", cfg.print.first_page_rows);
    println!("page_rows: {}", cfg.print.page_rows);
    println!("page_width_pt: {}", cfg.print.page_width_pt);
    println!("stamp_width_pt: {}", cfg.print.stamp_width_pt);
    println!();
    println!("[display]");
    println!("use_unicode: {}", cfg.display.use_unicode);
    println!("selection_fg: {:?}", cfg.display.selection_fg);
    println!("unfocused_selection_fg: {:?}{}",
        cfg.display.unfocused_selection_fg(),
        if cfg.display.unfocused_selection_fg.is_none() { " (auto: 50% darker)" } else { "" }
    );
}

/// Resolve log configuration from CLI args and config file
/// CLI arguments take precedence over config file
fn resolve_log_config<'a>(cli: &'a Cli, config: &'a config::Config) -> (&'a str, &'a str) {
    let log_level = if cli.log_level != DEFAULT_LOG_LEVEL {
        cli.log_level.as_str()
    } else {
        config.log_level.as_str()
    };

    let log_file = if cli.log_file != DEFAULT_LOG_FILE {
        cli.log_file.as_str()
    } else {
        config.log_file.as_str()
    };

    (log_level, log_file)
}

/// Execute a CLI command by routing it to the appropriate command handler
async fn execute_command(
    client: &dyn ReportProvider,
    command: Commands,
    config: &config::Config,
) -> anyhow::Result<()> {
    match command {
        Commands::Config => unreachable!("Config command should be handled before execute_command"),
        Commands::List { kind, page, size, sort_by, query, all } => {
            let query = ListQuery {
                page,
                size,
                sort_by: commands::parse_sort_arg(sort_by)?,
                query: query.filter(|q| !q.is_empty()),
            };
            commands::list::run(client, kind, commands::list::ListOptions { query, all }, config).await
        }
        Commands::Show { kind, id } => commands::show::run(client, kind, id, config).await,
        Commands::Submit { kind, file, update } => {
            commands::submit::run(client, kind, &file, update).await
        }
    }
}

#[tokio::main]
async fn main() {
    let config = config::read();
    let cli = Cli::parse();

    // Resolve and initialize logging
    let (log_level, log_file) = resolve_log_config(&cli, &config);
    if log_file != DEFAULT_LOG_FILE {
        init_logging(log_level, log_file);
    }

    // Config doesn't need a client
    if matches!(cli.command, Some(Commands::Config)) {
        handle_config_command();
        return;
    }

    let client = select_client(&cli, &config);

    // If no subcommand, run TUI
    let Some(command) = cli.command else {
        if let Err(e) = okreport::tui::run(client, config).await {
            eprintln!("Error running TUI: {}", e);
            std::process::exit(1);
        }
        return;
    };

    if let Err(e) = execute_command(client.as_ref(), command, &config).await {
        eprintln!("Error: {:#}", e);
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
