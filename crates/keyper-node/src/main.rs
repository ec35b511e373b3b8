//! # Keyper Node
//!
//! Runs a single KeyperChain instance with in-memory collaborators.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (TOML file, then `KC_*` overrides) and validate it
//! 2. Restore the last snapshot and its adapter file, or build the genesis
//!    state with empty adapters
//! 3. Start the committed-event logger and the step clock
//! 4. On Ctrl+C, stop both and persist both snapshots
//!
//! ## Usage
//!
//! ```text
//! keyper-node [config.toml]
//! ```
//!
//! The config path may also be given as `KC_CONFIG`.

use anyhow::{Context, Result};
use keyper_node::adapters::{GovernanceArbiter, InMemoryTarget, InMemoryTokenLedger};
use keyper_node::{
    adapters_path, build_genesis, load_adapters, load_snapshot, save_adapters, save_snapshot,
    AdapterSnapshot, Collaborators, KeyperChain, NodeConfig,
};
use kc_05_executor::EcdsaQuorumVerifier;
use shared_bus::{EventFilter, InMemoryEventBus};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// The node runtime: the chain plus its background tasks.
pub struct NodeRuntime {
    config: NodeConfig,
    chain: Arc<KeyperChain>,
    ledger: Arc<InMemoryTokenLedger>,
    arbiter: Arc<GovernanceArbiter>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    /// Restore or bootstrap the protocol state and wire the collaborators.
    pub fn new(config: NodeConfig) -> Result<Self> {
        let snapshot_path = &config.storage.snapshot_path;
        let state = if snapshot_path.exists() {
            info!(path = %snapshot_path.display(), "Restoring from snapshot");
            load_snapshot(snapshot_path).context("Failed to restore snapshot")?
        } else {
            info!("No snapshot found, building genesis state");
            build_genesis(&config, 0).context("Failed to build genesis state")?
        };

        let adapters_file = adapters_path(snapshot_path);
        let adapters = if adapters_file.exists() {
            load_adapters(&adapters_file).context("Failed to restore adapter snapshot")?
        } else {
            if snapshot_path.exists() {
                warn!(path = %adapters_file.display(), "No adapter snapshot, custody starts empty");
            }
            AdapterSnapshot::default()
        };

        let ledger = Arc::new(InMemoryTokenLedger::from_balances(adapters.balances));
        let arbiter = Arc::new(GovernanceArbiter::with_decisions(adapters.decisions));
        let collaborators = Collaborators {
            ledger: ledger.clone(),
            target: Arc::new(InMemoryTarget::new()),
            verifier: Arc::new(EcdsaQuorumVerifier::new()),
            arbiter: arbiter.clone(),
        };
        let chain = Arc::new(KeyperChain::new(
            state,
            collaborators,
            Arc::new(InMemoryEventBus::new()),
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            config,
            chain,
            ledger,
            arbiter,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Start the event logger and the step clock.
    pub fn start(&self) {
        info!("===========================================");
        info!("  Keyper-Chain Node Starting");
        info!("===========================================");
        info!(
            step = self.chain.current_step(),
            next_sequence = self.chain.next_sequence(),
            "Protocol state ready"
        );

        self.spawn_event_logger();
        self.spawn_step_clock();
    }

    fn spawn_event_logger(&self) {
        let mut subscription = self.chain.subscribe(EventFilter::all());
        let mut shutdown = self.shutdown_rx.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = subscription.recv() => {
                        let Some(event) = event else { break };
                        info!(event = %KeyperChain::describe(&event), "Committed");
                        match serde_json::to_string(&event.to_record()) {
                            Ok(json) => tracing::debug!(target: "keyper_node::events", "{json}"),
                            Err(e) => warn!(error = %e, "Failed to encode event record"),
                        }
                    }
                    _ = shutdown.changed() => {
                        info!("[events] Shutdown signal received");
                        break;
                    }
                }
            }
        });
    }

    fn spawn_step_clock(&self) {
        let chain = Arc::clone(&self.chain);
        let interval = Duration::from_millis(self.config.node.step_interval_ms);
        let mut shutdown = self.shutdown_rx.clone();
        tokio::spawn(async move {
            // The first tick fires immediately; skip it so step N is reached
            // after N intervals.
            let mut ticks = IntervalStream::new(tokio::time::interval(interval)).skip(1);
            loop {
                tokio::select! {
                    tick = ticks.next() => {
                        if tick.is_none() {
                            break;
                        }
                        if let Err(e) = chain.advance(1) {
                            error!(error = %e, "Step clock stopped");
                            break;
                        }
                    }
                    _ = shutdown.changed() => {
                        info!("[clock] Shutdown signal received");
                        break;
                    }
                }
            }
        });
    }

    /// Stop background tasks and persist the committed state.
    pub fn shutdown(&self) -> Result<()> {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let snapshot_path = &self.config.storage.snapshot_path;
        save_snapshot(&self.chain.snapshot(), snapshot_path)
            .context("Failed to persist snapshot")?;
        let adapters = AdapterSnapshot {
            balances: self.ledger.balances(),
            decisions: self.arbiter.decisions(),
        };
        save_adapters(&adapters, &adapters_path(snapshot_path))
            .context("Failed to persist adapter snapshot")?;

        info!(step = self.chain.current_step(), "Shutdown complete");
        Ok(())
    }
}

/// Load configuration from the optional file and the environment.
fn load_config() -> Result<NodeConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("KC_CONFIG").ok())
        .map(PathBuf::from);

    let mut config = match &path {
        Some(path) => NodeConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => NodeConfig::default(),
    };
    config.apply_env_overrides();
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    config.log_summary();

    let runtime = NodeRuntime::new(config)?;
    runtime.start();

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown()?;

    Ok(())
}
