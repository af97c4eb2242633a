use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tokio::{signal, sync::mpsc};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};
use tracing::{error, info, warn};

use counter_pos as pos;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = pos::config::load_config().context("failed to load configuration")?;
    pos::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Init DB
    let db_pool = pos::db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to database")?;
    if cfg.auto_migrate {
        pos::db::run_migrations(&db_pool)
            .await
            .map_err(|e| {
                error!("Failed running migrations: {}", e);
                e
            })
            .context("failed to run migrations")?;
    }
    let db_arc = Arc::new(db_pool);

    // Init events
    let (event_tx, event_rx) = mpsc::channel(cfg.event_channel_capacity);
    let event_sender = pos::events::EventSender::new(event_tx);
    tokio::spawn(pos::events::process_events(event_rx));

    let services = pos::handlers::AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

    let app_state = pos::AppState {
        db: db_arc,
        config: cfg.clone(),
        event_sender,
        services,
    };

    let cors_layer = if cfg.is_production() {
        CorsLayer::new()
    } else {
        warn!("Using permissive CORS outside production");
        CorsLayer::permissive()
    };

    let app = pos::app_router(app_state)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors_layer);

    let addr = cfg.bind_address();
    info!("counter-pos listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("counter-pos stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
