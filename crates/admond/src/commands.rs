//! Subcommand implementations.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use admon_collector::{CollectionLoop, CycleVerdict, LoopExit, LoopSettings};
use admon_core::{Category, RelayConfig};
use admon_sink::HttpSink;
use admon_store::SqliteSnapshotStore;
use anyhow::Context;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{error, info, info_span, warn};

use crate::exit::Failure;

/// Load and validate the config, applying a `--interval` override.
pub fn load_config(path: &Path, interval: Option<u64>) -> Result<RelayConfig, Failure> {
    let mut config = RelayConfig::from_file(path)?;
    if let Some(secs) = interval {
        config.collector.poll_interval_secs = secs;
        config.validate()?;
    }
    Ok(config)
}

/// `admond run`: start the agent, or run a single cycle with `once`.
pub async fn run(config: RelayConfig, once: bool) -> Result<(), Failure> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        store = %config.store.path.display(),
        sink = %format!("{}:{}", config.sink.host, config.sink.port),
        namespace = %config.sink.namespace,
        "admond starting"
    );

    let store = SqliteSnapshotStore::open(&config.store.path, config.store.timeout)?;
    store.verify()?;
    info!(path = %store.path().display(), "snapshot store opened");

    let banner =
        admon_sink::probe(&config.sink.host, config.sink.port, config.sink.timeout).await?;
    info!(banner = %banner.trim(), "sink reachable");

    let collector_config = &config.collector;
    if collector_config.reset_window_cycles <= collector_config.failure_budget {
        warn!(
            failure_budget = collector_config.failure_budget,
            reset_window_cycles = collector_config.reset_window_cycles,
            "reset window is not larger than the failure budget, the agent will never give up"
        );
    }

    let span = info_span!("relay", namespace = %config.sink.namespace);
    let mut collector = CollectionLoop::new(
        Arc::new(store),
        Arc::new(HttpSink::from_config(&config.sink)),
        LoopSettings::from_config(&config),
    )
    .with_span(span);

    if once {
        let report = collector.run_cycle().await;
        for category in Category::ALL {
            info!(%category, outcome = ?report.outcome(category), "single cycle finished");
        }
        return match report.verdict {
            CycleVerdict::Succeeded => Ok(()),
            CycleVerdict::Failed => Err(Failure::CycleFailed {
                cycle: report.cycle,
            }),
        };
    }

    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to register SIGTERM handler")?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_shutdown_signal(tokio::signal::ctrl_c(), async move { sigterm.recv().await })
            .await;
        let _ = shutdown_tx.send(true);
    });

    match collector.run(shutdown_rx).await {
        LoopExit::Shutdown { cycles } => {
            info!(cycles, "admond stopped");
            Ok(())
        }
        LoopExit::BudgetExhausted {
            cycles,
            failed_cycles,
        } => Err(Failure::BudgetExhausted {
            cycles,
            failed_cycles,
        }),
    }
}

/// Resolve on SIGINT or SIGTERM.
///
/// A SIGINT listener that fails to register is logged and left pending, so
/// only SIGTERM can stop the agent in that case.
async fn wait_for_shutdown_signal<I, T>(sigint: I, sigterm: T)
where
    I: Future<Output = std::io::Result<()>>,
    T: Future<Output = Option<()>>,
{
    let sigint = async {
        match sigint.await {
            Ok(()) => info!("received SIGINT"),
            Err(e) => {
                error!(error = %e, "failed to listen for SIGINT");
                std::future::pending::<()>().await;
            }
        }
    };
    tokio::select! {
        _ = sigint => {}
        _ = sigterm => info!("received SIGTERM"),
    }
}

/// `admond probe`: check the sink once and print its banner.
pub async fn probe(config: &RelayConfig) -> Result<(), Failure> {
    let banner =
        admon_sink::probe(&config.sink.host, config.sink.port, config.sink.timeout).await?;
    println!("{}", banner.trim());
    Ok(())
}

/// `admond check-config`: print the effective configuration.
pub fn check_config(config: &RelayConfig) -> Result<(), Failure> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::exit::codes;

    const MINIMAL: &str = r#"
[store]
path = "/var/lib/admon/admon.db"

[sink]
host = "localhost"

[servers]
meta = ["meta01"]
"#;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), content).unwrap();
        file
    }

    #[test]
    fn interval_override_replaces_poll_interval() {
        let file = write_config(MINIMAL);
        let config = load_config(file.path(), Some(5)).unwrap();
        assert_eq!(config.collector.poll_interval_secs, 5);

        let config = load_config(file.path(), None).unwrap();
        assert_eq!(config.collector.poll_interval_secs, 60);
    }

    #[test]
    fn zero_interval_override_is_invalid() {
        let file = write_config(MINIMAL);
        let failure = load_config(file.path(), Some(0)).unwrap_err();
        assert_eq!(failure.code(), codes::CONFIG_INVALID);
    }

    #[test]
    fn missing_config_file_is_invalid() {
        let failure = load_config(Path::new("/nonexistent/admon-relay.toml"), None).unwrap_err();
        assert_eq!(failure.code(), codes::CONFIG_INVALID);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_sigint_listener_does_not_trigger_shutdown() {
        let sigint = async { Err(std::io::Error::other("signal driver unavailable")) };
        let waited = tokio::time::timeout(
            Duration::from_secs(3600),
            wait_for_shutdown_signal(sigint, std::future::pending()),
        )
        .await;
        assert!(waited.is_err(), "shutdown fired without a signal");
    }

    #[tokio::test]
    async fn sigterm_still_triggers_shutdown_after_sigint_failure() {
        let sigint = async { Err(std::io::Error::other("signal driver unavailable")) };
        wait_for_shutdown_signal(sigint, async { Some(()) }).await;
    }

    #[tokio::test]
    async fn sigint_triggers_shutdown() {
        wait_for_shutdown_signal(async { Ok(()) }, std::future::pending()).await;
    }

    #[tokio::test]
    async fn missing_store_is_a_startup_failure() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_config(MINIMAL);
        let mut config = load_config(file.path(), None).unwrap();
        config.store.path = dir.path().join("absent.db");

        let failure = run(config, true).await.unwrap_err();
        assert!(matches!(failure, Failure::Store(_)), "{failure}");
        assert_eq!(failure.code(), codes::STARTUP);
    }
}
