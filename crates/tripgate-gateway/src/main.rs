use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tripgate_analytics::{RybbitConfig, RybbitSink};
use tripgate_cache::{FreshnessCache, ResetSchedule, ResetScheduler};
use tripgate_core::{EventSink, NoopLocator, ProfileUrls};
use tripgate_gateway::cli::CLI;
use tripgate_gateway::telemetry::init_tracing;
use tripgate_gateway::{App, AppState, DomainTable};
use tripgate_redirector::{Dispatcher, TripResolver, DEFAULT_QUEUE_CAPACITY};
use tripgate_storage::{InMemoryVisitStore, SqliteVisitStore, VisitSink};
use tripgate_upstream::{IpApiLocator, LocatorConfig, TripApiClient, UpstreamConfig};

const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_json)?;

    let domains = DomainTable::load(&config.domains_file)?;

    info!(
        port = config.port,
        hosts = domains.len(),
        upstream = %config.upstream_url,
        profile_base = %config.profile_base_url,
        "starting tripgate"
    );

    let sinks = build_sinks(&config).await?;
    let (dispatcher, worker) = Dispatcher::spawn(sinks, DEFAULT_QUEUE_CAPACITY);

    let cache = FreshnessCache::new();
    let reset = ResetScheduler::new(cache.clone(), ResetSchedule::system_midnight()).spawn();

    let source = TripApiClient::new(
        UpstreamConfig::builder()
            .base_url(config.upstream_url.clone())
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build(),
    )
    .context("invalid upstream configuration")?;

    let resolver = TripResolver::new(
        source,
        cache,
        ProfileUrls::new(&config.profile_base_url).context("invalid profile base url")?,
        dispatcher.clone(),
    );
    let state = AppState::new(Arc::new(resolver), domains, dispatcher);

    let listen_addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(
        listener,
        App::router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server error")?;

    info!("shutting down");
    reset.shutdown().await;
    if tokio::time::timeout(DRAIN_TIMEOUT, worker.join()).await.is_err() {
        info!("event queue not drained before timeout");
    }

    Ok(())
}

async fn build_sinks(config: &CLI) -> anyhow::Result<Vec<Arc<dyn EventSink>>> {
    let mut sinks: Vec<Arc<dyn EventSink>> = Vec::new();

    let locator = match &config.geo_api_url {
        Some(url) => Some(
            IpApiLocator::new(LocatorConfig::builder().base_url(url.clone()).build())
                .context("invalid geolocation configuration")?,
        ),
        None => None,
    };

    if config.no_db {
        let store = InMemoryVisitStore::new();
        sinks.push(visit_sink(store, locator));
    } else {
        let store = SqliteVisitStore::connect(&config.db_path)
            .await
            .with_context(|| format!("failed to open {}", config.db_path.display()))?;
        sinks.push(visit_sink(store, locator));
    }

    if let Some(rybbit) = RybbitConfig::from_parts(
        config.rybbit_api_url.clone(),
        config.rybbit_api_key.clone(),
        config.rybbit_site_id.clone(),
    ) {
        info!(api_url = %rybbit.api_url, site_id = %rybbit.site_id, "analytics enabled");
        sinks.push(Arc::new(RybbitSink::new(rybbit)?));
    }

    Ok(sinks)
}

fn visit_sink<S>(store: S, locator: Option<IpApiLocator>) -> Arc<dyn EventSink>
where
    S: tripgate_storage::VisitStore,
{
    match locator {
        Some(locator) => Arc::new(VisitSink::new(store, locator)),
        None => Arc::new(VisitSink::new(store, NoopLocator)),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
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
