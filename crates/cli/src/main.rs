//! `siteflow` -- terminal frontend for the field approval workflow.
//!
//! Stands in for the mobile screens: loads an entity's detail snapshot,
//! renders its flow history and the state-dependent action panel, and
//! drives action/amendment submissions against the backend.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                          | Description                    |
//! |------------------------|----------|----------------------------------|--------------------------------|
//! | `API_BASE_URL`         | no       | `http://localhost:3000/api/v1`   | REST API root                  |
//! | `UPLOAD_BASE_URL`      | no       | `http://localhost:3000/uploads`  | Document preview base URL      |
//! | `SESSION_FILE`         | no       | `$HOME/.siteflow/session.json`   | Persisted session identity     |
//! | `REQUEST_TIMEOUT_SECS` | no       | `30`                             | HTTP timeout per request       |

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use siteflow_client::activity::ActivityTracker;
use siteflow_client::config::ClientConfig;
use siteflow_client::detail::DetailLoader;
use siteflow_client::dispatch::Dispatcher;
use siteflow_client::gateway::ApiGateway;
use siteflow_client::session::SessionStore;
use siteflow_core::types::EntityId;

mod commands;
mod render;

#[derive(Debug, Parser)]
#[command(name = "siteflow", about = "Approval workflow client for site field operations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show an entity's detail: flow history plus whichever panel the
    /// current workflow state calls for.
    Detail {
        /// Module slug (builder-billing, customer-billing, daily-progress,
        /// attendance, safety-checklist).
        module: String,
        /// Entity id.
        id: EntityId,
    },
    /// Submit an approval action against the pending flow record.
    Act {
        /// Module slug.
        module: String,
        /// Entity id.
        id: EntityId,
        /// Action to take (approve, reject, return, reevaluate).
        #[arg(long)]
        action: String,
        /// Mandatory remarks.
        #[arg(long)]
        remarks: String,
        /// Optional document to attach (at most one).
        #[arg(long)]
        document: Option<PathBuf>,
    },
    /// Amend certified quantities after a return-to-submitter.
    Amend {
        /// Module slug.
        module: String,
        /// Entity id.
        id: EntityId,
        /// Edited items as `ITEM_ID=QTY`, repeatable.
        #[arg(long = "set", value_name = "ITEM_ID=QTY", required = true)]
        set: Vec<String>,
        /// Mandatory remarks.
        #[arg(long)]
        remarks: String,
    },
    /// Persist the session identity used by every other command.
    Login {
        /// Backend user id.
        #[arg(long)]
        id: EntityId,
        /// User category as the backend reports it.
        #[arg(long = "user-type")]
        user_type: String,
    },
    /// Remove the persisted session identity.
    Logout,
    /// Print the persisted session identity.
    Whoami,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "siteflow=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();

    if let Err(e) = run(cli, config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> anyhow::Result<()> {
    tracing::debug!(
        api = %config.api_base_url,
        session_file = %config.session_file.display(),
        "Starting siteflow"
    );

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    let gateway = ApiGateway::with_client(http, config.api_base_url.clone());
    let activity = ActivityTracker::new();

    let ctx = commands::Context {
        loader: DetailLoader::new(gateway.clone(), activity.clone()),
        dispatcher: Dispatcher::new(gateway, activity),
        store: SessionStore::new(config.session_file.clone()),
        upload_base_url: config.upload_base_url,
    };

    match cli.command {
        Command::Detail { module, id } => commands::detail(&ctx, &module, id).await,
        Command::Act {
            module,
            id,
            action,
            remarks,
            document,
        } => commands::act(&ctx, &module, id, &action, remarks, document).await,
        Command::Amend {
            module,
            id,
            set,
            remarks,
        } => commands::amend(&ctx, &module, id, &set, remarks).await,
        Command::Login { id, user_type } => commands::login(&ctx, id, user_type),
        Command::Logout => commands::logout(&ctx),
        Command::Whoami => commands::whoami(&ctx),
    }
}
