use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use feature_tags::{
    api,
    client::FeatureClient,
    config::Config,
    db,
    dialog::DialogController,
    manager::{delete_confirmation, FeatureManager},
    models::*,
    store::{FeatureStore, LocalStore},
    terminal::{self, TerminalDialogs},
    workflow::NAME_REQUIRED,
};

#[derive(Parser)]
#[command(name = "ftag")]
#[command(about = "Manage feature tags for project tasks")]
struct Cli {
    /// Feature API base URL (overrides config and FTAG_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Use the local database directly instead of the HTTP API
    #[arg(long, global = true)]
    local: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the feature API server
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List projects
    Projects,
    /// Create a project
    NewProject { name: String },
    /// List the features of a project
    List {
        #[arg(short, long)]
        project: Uuid,
    },
    /// Create a feature
    Add {
        #[arg(short, long)]
        project: Uuid,
        #[arg(short, long)]
        name: String,
    },
    /// Rename a feature
    Rename {
        id: Uuid,
        #[arg(short, long)]
        name: String,
    },
    /// Delete a feature. Its tasks are kept and detached.
    Delete {
        id: Uuid,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Interactive feature manager for a project
    Manage {
        #[arg(short, long)]
        project: Uuid,
    },
}

/// Initialize tracing with output to stderr (interactive mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "feature_tags=debug,tower_http=debug".into()),
    );

    if use_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

enum Backend {
    Remote(FeatureClient),
    Local(db::Database),
}

impl Backend {
    fn connect(cli: &Cli, config: &Config) -> anyhow::Result<Self> {
        if cli.local {
            let db = db::Database::open_default()?;
            db.migrate()?;
            Ok(Self::Local(db))
        } else {
            Ok(Self::Remote(FeatureClient::from_config(config)))
        }
    }

    fn store(&self) -> Arc<dyn FeatureStore> {
        match self {
            Self::Remote(client) => Arc::new(client.clone()),
            Self::Local(db) => Arc::new(LocalStore::new(db.clone())),
        }
    }

    async fn get_feature(&self, id: Uuid) -> anyhow::Result<Feature> {
        match self {
            Self::Remote(client) => Ok(client.get_feature(id).await?),
            Self::Local(db) => db
                .get_feature(id)?
                .ok_or_else(|| anyhow::anyhow!("Feature not found")),
        }
    }

    async fn list_projects(&self) -> anyhow::Result<Vec<Project>> {
        match self {
            Self::Remote(client) => Ok(client.list_projects().await?),
            Self::Local(db) => db.get_all_projects(),
        }
    }

    async fn create_project(&self, name: String) -> anyhow::Result<Project> {
        let input = CreateProject { name };
        match self {
            Self::Remote(client) => Ok(client.create_project(&input).await?),
            Self::Local(db) => db.create_project(input),
        }
    }
}

fn stdin_dialogs() -> TerminalDialogs<BufReader<tokio::io::Stdin>, std::io::Stdout> {
    TerminalDialogs::new(BufReader::new(tokio::io::stdin()), std::io::stdout())
}

fn print_feature(feature: &Feature) {
    println!("{}  {}", feature.id, feature.name);
}

async fn serve(port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting feature API server on port {}", port);

    let db = db::Database::open_default()?;
    db.migrate()?;

    let app = api::create_router_with_security(db, api::SecurityConfig::from_env());

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    tracing::info!("Feature API listening on http://127.0.0.1:{}/api/v1", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The interactive manager owns stdout
    let use_stderr = matches!(cli.command, Commands::Manage { .. });
    init_tracing(use_stderr);

    let mut config = Config::load();
    if let Some(url) = &cli.url {
        config.server_url = url.clone();
    }

    if let Commands::Serve { port } = cli.command {
        return serve(port.unwrap_or(config.port)).await;
    }

    let backend = Backend::connect(&cli, &config)?;
    let store = backend.store();

    match cli.command {
        Commands::Serve { .. } => unreachable!("handled above"),
        Commands::Projects => {
            for project in backend.list_projects().await? {
                println!("{}  {}", project.id, project.name);
            }
        }
        Commands::NewProject { name } => {
            let project = backend.create_project(name).await?;
            println!("{}  {}", project.id, project.name);
        }
        Commands::List { project } => {
            let features = store.list(project).await?;
            if features.is_empty() {
                println!("{}", feature_tags::manager::EMPTY_MESSAGE);
            }
            for feature in &features {
                print_feature(feature);
            }
        }
        Commands::Add { project, name } => {
            let name = name.trim();
            if name.is_empty() {
                bail!(NAME_REQUIRED);
            }
            let feature = store
                .create(&CreateFeature {
                    project_id: project,
                    name: name.to_string(),
                })
                .await?;
            print_feature(&feature);
        }
        Commands::Rename { id, name } => {
            let name = name.trim();
            if name.is_empty() {
                bail!(NAME_REQUIRED);
            }
            let feature = store
                .update(
                    id,
                    &UpdateFeature {
                        name: Some(name.to_string()),
                    },
                )
                .await?;
            print_feature(&feature);
        }
        Commands::Delete { id, yes } => {
            let feature = backend.get_feature(id).await?;
            if !yes && !stdin_dialogs().confirm(&delete_confirmation(&feature.name)).await {
                println!("Aborted.");
                return Ok(());
            }
            store.delete(id).await?;
            println!("Deleted {}", feature.name);
        }
        Commands::Manage { project } => {
            let mut manager = FeatureManager::new(store);
            let mut dialogs = stdin_dialogs();
            manager.activate(project).await;
            terminal::run_manager(&mut manager, &mut dialogs).await;
        }
    }

    Ok(())
}
