//! Tollgate service entry point.
//!
//! Loads configuration, wires the adapters behind the billing router,
//! and runs the Axum server with graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::signal;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tollgate::adapters::http::{billing_router, BillingAppState};
use tollgate::adapters::memory::InMemoryWebhookEventRepository;
use tollgate::adapters::postgres::PostgresWebhookEventRepository;
use tollgate::adapters::sink::{
    InMemoryEventSink, PostgresEventSink, QueuedEventSink, TimeoutSink,
};
use tollgate::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use tollgate::config::{AppConfig, SinkBackend, SinkDispatch};
use tollgate::ports::{EventSink, PaymentProvider, WebhookEventRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    tracing::info!(
        environment = ?config.server.environment,
        sink_backend = ?config.sink.backend,
        sink_dispatch = ?config.sink.dispatch,
        "starting tollgate"
    );

    let pool = connect_database(&config).await?;

    let webhook_repository: Arc<dyn WebhookEventRepository> = match &pool {
        Some(pool) => Arc::new(PostgresWebhookEventRepository::new(pool.clone())),
        None => Arc::new(InMemoryWebhookEventRepository::new()),
    };

    let base_sink: Arc<dyn EventSink> = match (config.sink.backend, &pool) {
        (SinkBackend::Postgres, Some(pool)) => Arc::new(PostgresEventSink::new(pool.clone())),
        _ => Arc::new(InMemoryEventSink::new()),
    };
    let timed_sink: Arc<dyn EventSink> = Arc::new(TimeoutSink::new(
        base_sink,
        Duration::from_secs(config.sink.timeout_secs),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut worker_handle = None;
    let event_sink: Arc<dyn EventSink> = match config.sink.dispatch {
        SinkDispatch::Inline => timed_sink,
        SinkDispatch::Queued => {
            let (queued, worker) = QueuedEventSink::new(timed_sink, config.sink.queue_capacity);
            worker_handle = Some(tokio::spawn(worker.run(shutdown_rx.clone())));
            Arc::new(queued)
        }
    };

    let mut stripe_config = StripeConfig::new(config.payment.stripe_api_key.clone());
    if let Some(base_url) = &config.payment.api_base_url {
        stripe_config = stripe_config.with_base_url(base_url);
    }
    let payment_provider: Arc<dyn PaymentProvider> =
        Arc::new(StripePaymentAdapter::new(stripe_config));

    let state = BillingAppState {
        payment_provider,
        webhook_repository,
        event_sink,
        webhook_secret: config.payment.stripe_webhook_secret.clone(),
    };

    let mut app = billing_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    if !origins.is_empty() {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([
                    header::CONTENT_TYPE,
                    HeaderName::from_static("stripe-signature"),
                ]),
        );
    }

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the sink worker and let it drain its queue.
    let _ = shutdown_tx.send(true);
    if let Some(handle) = worker_handle {
        let _ = handle.await;
    }

    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::new(&config.server.log_level);

    if config.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn connect_database(config: &AppConfig) -> Result<Option<PgPool>, sqlx::Error> {
    if !config.needs_database() {
        return Ok(None);
    }

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(config.database.url.as_str())
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!().run(&pool).await?;
    }

    tracing::info!("database connected");
    Ok(Some(pool))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("received terminate signal, starting graceful shutdown");
        },
    }
}
