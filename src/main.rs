use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use clap::{Parser, Subcommand};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webos_backend::{
    app::{caption_router, desktop_router, lite_router},
    constants::{CAPTION_DEFAULT_PORT, DESKTOP_DEFAULT_PORT, LITE_DEFAULT_PORT},
    db::{create_pool, run_migrations, UserRepository},
    models::NewUser,
    security::hash_password,
    CaptionState, Config, DesktopState, LiteState, SqliteRepository,
};

#[derive(Parser)]
#[command(name = "webos-backend", version, about = "WebOS desktop and caption services")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the caption upload service
    Caption {
        #[arg(long, env = "SERVER_PORT")]
        port: Option<u16>,
    },
    /// Run the database-backed desktop shell
    Desktop {
        #[arg(long, env = "SERVER_PORT")]
        port: Option<u16>,
    },
    /// Run the lite desktop shell
    Lite {
        #[arg(long, env = "SERVER_PORT")]
        port: Option<u16>,
    },
    /// Create a desktop account
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "WEBOS_USER_PASSWORD")]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webos_backend=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Command::Caption { port } => {
            config.server_port = port.or(config.server_port);
            tracing::info!("Starting caption service...");

            tokio::fs::create_dir_all(&config.upload_dir)
                .await
                .with_context(|| format!("creating {}", config.upload_dir.display()))?;

            let app = caption_router(CaptionState::new(config.clone()));
            serve(app, &config, CAPTION_DEFAULT_PORT).await
        }
        Command::Desktop { port } => {
            config.server_port = port.or(config.server_port);
            tracing::info!("Starting desktop shell...");

            let pool = create_pool(&config.database_path).await?;
            run_migrations(&pool).await?;

            let repo = Arc::new(SqliteRepository::new(pool));
            let state = DesktopState::new(repo, config.clone()).map_err(|e| anyhow::anyhow!(e))?;

            serve(desktop_router(state), &config, DESKTOP_DEFAULT_PORT).await
        }
        Command::Lite { port } => {
            config.server_port = port.or(config.server_port);
            tracing::info!("Starting lite desktop shell...");

            for dir in [&config.static_dir, &config.assets_dir] {
                tokio::fs::create_dir_all(dir)
                    .await
                    .with_context(|| format!("creating {}", dir.display()))?;
            }

            let state = LiteState::from_config(config.clone());
            tracing::info!("{} lite account(s) configured", config.lite_users.len());

            serve(lite_router(state), &config, LITE_DEFAULT_PORT).await
        }
        Command::CreateUser {
            username,
            email,
            password,
        } => create_user(&config, username, email, password).await,
    }
}

/// Add CORS and request tracing, bind and run until shutdown
async fn serve(app: Router, config: &Config, default_port: u16) -> anyhow::Result<()> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| origin.parse())
        .collect::<Result<Vec<HeaderValue>, _>>()
        .context("invalid ALLOWED_ORIGINS entry")?;

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = app.layer(cors).layer(TraceLayer::new_for_http());

    tracing::info!(
        "Environment: {}, Server: {}",
        config.environment,
        config.server_address(default_port)
    );

    let addr: SocketAddr = config.server_address(default_port).parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn create_user(
    config: &Config,
    username: String,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let pool = create_pool(&config.database_path).await?;
    run_migrations(&pool).await?;
    let repo = SqliteRepository::new(pool);

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await?
        .map_err(|e| anyhow::anyhow!(e))?;

    let user = repo
        .create_user(&NewUser {
            username,
            email,
            password_hash: Some(password_hash),
            google_id: None,
        })
        .await?;

    tracing::info!("Created user {} with id {}", user.username, user.id);
    Ok(())
}
