use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vehicle_server::build_app;
use vehicle_server::config::database::mask_database_url;
use vehicle_server::config::{DatabaseConfig, EnvironmentConfig};
use vehicle_server::database::SchemaManager;
use vehicle_server::repositories::VehicleRepository;
use vehicle_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vehicle_server=debug,tower_http=info")),
        )
        .init();

    info!("🚚 Vehicle server");

    let config = EnvironmentConfig::from_env()?;
    let database = DatabaseConfig::from_env()?;

    info!("🗄️ Connecting to {}", mask_database_url(&database.url));
    let pool = match database.create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Database connection failed: {:#}", e);
            return Err(e);
        }
    };

    if config.create_schema_on_start {
        let schema = SchemaManager::new(pool.clone(), config.schema.clone());
        if schema.schema_exists().await? {
            info!("Schema '{}' already present", config.schema);
        } else {
            schema.create_schema().await?;
        }
    }

    let store = VehicleRepository::new(pool.clone(), config.schema.clone(), config.reference_point);
    let app = build_app(AppState::new(Arc::new(store)), &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("cannot bind {}", config.server_url()))?;
    info!("🌐 Listening on http://{}", listener.local_addr()?);
    info!("   GET  /vehicles - List vehicles by distance");
    info!("   POST /vehicles - Create a vehicle");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Server error: {}", e);
    }

    pool.close().await;
    info!("👋 Server stopped");
    Ok(())
}

/// Señal de apagado ordenado
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 Termination signal received, shutting down...");
        },
    }
}
