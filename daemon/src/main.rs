//! fangate daemon — entry point for running the gated-download service.

mod collaborators;
mod config;

use clap::Parser;
use collaborators::{CdnResolver, LogMailer, PassthroughProvider};
use config::ServiceConfig;
use fangate_engine::{Collaborators, Stores, SystemClock, VerificationOrchestrator};
use fangate_rpc::RpcServer;
use fangate_store::HandshakeStore;
use fangate_store_lmdb::LmdbStore;
use fangate_types::Timestamp;
use fangate_utils::format_duration;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "fangate-daemon", about = "Gated-download verification service")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base; CLI
    /// flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory for LMDB storage.
    #[arg(long, env = "FANGATE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Address the HTTP server listens on.
    #[arg(long, env = "FANGATE_LISTEN")]
    listen: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "FANGATE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "FANGATE_LOG_FORMAT")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_toml_file(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    fangate_utils::init_tracing(&config.log_level, &config.log_format);
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config file");
    }

    let store = Arc::new(LmdbStore::open(
        &config.data_dir,
        config.map_size_mb * 1024 * 1024,
    )?);

    let orchestrator = Arc::new(VerificationOrchestrator::new(
        Stores {
            gates: store.clone(),
            submissions: store.clone(),
            handshakes: store.clone(),
            credentials: store.clone(),
            consent: store.clone(),
            analytics: store.clone(),
        },
        Collaborators {
            provider: Arc::new(PassthroughProvider::new(&config.authorize_base_url)),
            mailer: Arc::new(LogMailer::new()),
            resolver: Arc::new(CdnResolver::new(&config.cdn_base_url)),
            clock: Arc::new(SystemClock),
        },
        config.consent.clone(),
        config.params.clone(),
    ));

    spawn_handshake_sweeper(store.clone(), config.purge_interval_secs);

    let addr: SocketAddr = config.listen.parse()?;
    tracing::info!(
        %addr,
        data_dir = %config.data_dir.display(),
        handshake_ttl = %format_duration(config.params.handshake_ttl_secs),
        credential_ttl = %format_duration(config.params.credential_ttl_secs),
        "starting fangate daemon"
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for shutdown signal");
        } else {
            tracing::info!("shutdown signal received, stopping server");
        }
    };
    RpcServer::new(addr).start(orchestrator, shutdown).await?;

    tracing::info!("fangate daemon exited cleanly");
    Ok(())
}

/// Periodically delete expired handshake tokens. Expiry is enforced at claim
/// time either way; the sweep only keeps the table from growing.
fn spawn_handshake_sweeper(store: Arc<LmdbStore>, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        interval.tick().await;
        loop {
            interval.tick().await;
            let sweep = store.clone();
            match tokio::task::spawn_blocking(move || sweep.purge_expired(Timestamp::now())).await
            {
                Ok(Ok(0)) => {}
                Ok(Ok(purged)) => tracing::debug!(purged, "expired handshake tokens removed"),
                Ok(Err(e)) => tracing::warn!(error = %e, "handshake sweep failed"),
                Err(e) => tracing::warn!(error = %e, "handshake sweep task failed"),
            }
        }
    });
}
