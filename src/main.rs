use anyhow::Result;
use std::sync::Arc;
use svclens::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let metadata_repo = Arc::new(metadata_repo::MetadataRepo::new(
        &app_config.metadata.base_url,
        &app_config.metadata.api_key,
        app_config.metadata.verify_tls,
        app_config.refresh.upstream_timeout_secs,
    )?);
    let docker_repo = Arc::new(docker_repo::DockerRepo::connect()?);

    let (cache, trigger_rx) = cache::SnapshotCache::new(app_config.publishing.broadcast_capacity);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let refresher_handle = refresher::spawn(
        refresher::RefresherDeps {
            cache: cache.clone(),
            metadata: metadata_repo,
            runtime: docker_repo.clone(),
            trigger_rx,
            shutdown_rx,
        },
        refresher::RefresherConfig {
            interval_secs: app_config.refresh.interval_secs,
            upstream_timeout_secs: app_config.refresh.upstream_timeout_secs,
            stats_log_interval_secs: app_config.refresh.stats_log_interval_secs,
            host_address: app_config.metadata.host_address(),
        },
    );

    let app = routes::app(cache, Some(docker_repo));
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let in_container = std::path::Path::new("/.dockerenv").exists()
        || std::env::var("CONTAINER").as_deref() == Ok("1");

    if in_container {
        // In Docker: run server until error or SIGTERM (no signal handler; avoids immediate exit)
        axum::serve(listener, app).await?;
    } else {
        tokio::select! {
            result = axum::serve(listener, app) => {
                result?;
            }
            _ = async {
                #[cfg(unix)]
                {
                    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                        Ok(s) => s,
                        Err(_) => {
                            let _ = tokio::signal::ctrl_c().await;
                            return;
                        }
                    };
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                #[cfg(not(unix))]
                {
                    tokio::signal::ctrl_c().await
                }
            } => {
                tracing::info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
                let _ = refresher_handle.await;
            }
        }
    }

    Ok(())
}
