//! Prometheus metrics for the votechain client.
//!
//! [`ClientMetrics`] owns a dedicated [`Registry`]; the CLI can render it in
//! the Prometheus text exposition format.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry, Encoder,
    IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

pub struct ClientMetrics {
    pub registry: Registry,

    /// Transactions handed to the wallet, by contract function.
    pub tx_submitted: IntCounterVec,
    /// Transactions mined successfully, by contract function.
    pub tx_confirmed: IntCounterVec,
    /// Transactions that failed (rejected, reverted, timed out), by function.
    pub tx_failed: IntCounterVec,
    /// Writes refused locally before a transaction was sent.
    pub tx_blocked: IntCounter,
    pub contract_reads: IntCounter,
    pub ipfs_uploads: IntCounter,
    pub ipfs_failures: IntCounter,
}

impl ClientMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let tx_submitted = register_int_counter_vec_with_registry!(
            Opts::new(
                "votechain_transactions_submitted_total",
                "Transactions submitted to the wallet"
            ),
            &["function"],
            registry
        )?;
        let tx_confirmed = register_int_counter_vec_with_registry!(
            Opts::new(
                "votechain_transactions_confirmed_total",
                "Transactions confirmed on-chain"
            ),
            &["function"],
            registry
        )?;
        let tx_failed = register_int_counter_vec_with_registry!(
            Opts::new(
                "votechain_transactions_failed_total",
                "Transactions rejected, reverted or timed out"
            ),
            &["function"],
            registry
        )?;
        let tx_blocked = register_int_counter_with_registry!(
            Opts::new(
                "votechain_transactions_blocked_total",
                "Writes refused by client-side checks"
            ),
            registry
        )?;
        let contract_reads = register_int_counter_with_registry!(
            Opts::new("votechain_contract_reads_total", "Contract read calls"),
            registry
        )?;
        let ipfs_uploads = register_int_counter_with_registry!(
            Opts::new("votechain_ipfs_uploads_total", "Successful IPFS uploads"),
            registry
        )?;
        let ipfs_failures = register_int_counter_with_registry!(
            Opts::new("votechain_ipfs_failures_total", "Failed IPFS uploads"),
            registry
        )?;

        Ok(Self {
            registry,
            tx_submitted,
            tx_confirmed,
            tx_failed,
            tx_blocked,
            contract_reads,
            ipfs_uploads,
            ipfs_failures,
        })
    }

    /// Render every metric in the text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
