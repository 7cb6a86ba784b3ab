//! CrowdfundFix CLI
//!
//! Run the engines locally or talk to a running server.

mod client;
mod commands;
mod style;

use clap::{Parser, Subcommand};
use crowdfundfix::AnalysisInput;
use style::*;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "crowdfix")]
#[command(version)]
#[command(about = "CrowdfundFix - Crowdfunded bug bounties", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// CrowdfundFix server URL
    #[arg(
        short,
        long,
        env = "CROWDFIX_URL",
        default_value = "http://localhost:8000",
        global = true
    )]
    server: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a bug report without a server
    #[command(visible_alias = "a")]
    Analyze {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Raw log output
        #[arg(short, long, default_value = "")]
        logs: String,

        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Low, Medium, High or Critical; anything else scores as Medium
        #[arg(long, default_value = "Medium")]
        severity: String,

        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },

    /// Grade a fix submission without a server
    #[command(visible_alias = "v")]
    Verify {
        #[arg(long)]
        bug_id: String,

        #[arg(long)]
        developer_id: String,

        #[arg(long)]
        pr_link: String,

        #[arg(long)]
        json: bool,
    },

    /// Run the API server (flags override config.toml and env)
    #[command(visible_alias = "s")]
    Server {
        /// Host to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database path
        #[arg(long)]
        database: Option<String>,

        /// Load demo data into an empty database
        #[arg(long)]
        seed: bool,
    },

    /// List reported bugs
    #[command(visible_alias = "ls")]
    Bugs {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Rank developers for a bug
    #[command(visible_alias = "m")]
    Match { bug_id: String },

    /// Show marketplace analytics
    #[command(visible_alias = "d")]
    Dashboard,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("info").init();
    }

    let result = match cli.command {
        Commands::Analyze {
            title,
            description,
            logs,
            tags,
            severity,
            json,
        } => {
            let input = AnalysisInput {
                title,
                description,
                logs,
                tags,
                ..Default::default()
            };
            commands::analyze::run(input, &severity, json)
        }
        Commands::Verify {
            bug_id,
            developer_id,
            pr_link,
            json,
        } => commands::verify::run(&bug_id, &developer_id, &pr_link, json),
        Commands::Server {
            host,
            port,
            database,
            seed,
        } => {
            if !cli.verbose {
                tracing_subscriber::fmt().with_env_filter("info").init();
            }
            println!(
                "  {} {}",
                style_cyan("CrowdfundFix"),
                style_dim(&format!("v{}", VERSION))
            );
            commands::server::run(commands::server::ServerOverrides {
                host,
                port,
                database,
                seed,
            })
            .await
        }
        Commands::Bugs { limit } => commands::bugs::run(&cli.server, limit).await,
        Commands::Match { bug_id } => commands::matches::run(&cli.server, &bug_id).await,
        Commands::Dashboard => commands::dashboard::run(&cli.server).await,
    };

    if let Err(e) = result {
        print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
