use std::time::Duration;

use alloy::primitives::{TxHash, U256};
use tracing::{debug, error, info, warn};

use crate::{
    chain::{BridgeableNetwork, NetworkConfig, Registry},
    deposit::{BridgeRequest, DepositBuilder},
    endpoint::Connections,
    error::BridgeError,
    units::format_ether,
    wallet::{Balance, Wallet},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    PrecheckBalance,
    Aborted,
    Running,
    Reporting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(TxHash),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeResult {
    pub network: String,
    pub outcome: Outcome,
}

impl BridgeResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }
}

/// Ordered per-network results of one bridge-all run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub results: Vec<BridgeResult>,
}

impl RunReport {
    pub fn successes(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failures(&self) -> usize {
        self.results.len() - self.successes()
    }
}

/// Fails when `balance` cannot cover `amount` for each of `targets` networks.
pub fn precheck(balance: U256, amount: U256, targets: usize) -> Result<U256, BridgeError> {
    let required = amount
        .checked_mul(U256::from(targets))
        .ok_or_else(|| BridgeError::InvalidAmount("total amount overflows".to_string()))?;
    if balance < required {
        return Err(BridgeError::InsufficientBalance {
            required,
            available: balance,
        });
    }
    Ok(required)
}

/// Drives deposits from the source network into every bridgeable network.
///
/// Operations take `&mut self`: one orchestrator runs one bridge operation at a
/// time, which keeps the source account's nonce sequence consistent.
pub struct BridgeOrchestrator<'a> {
    registry: &'a Registry,
    wallet: &'a Wallet,
    connections: &'a Connections,
    builder: DepositBuilder<'a>,
    phase: RunPhase,
}

impl<'a> BridgeOrchestrator<'a> {
    pub fn new(registry: &'a Registry, wallet: &'a Wallet, connections: &'a Connections) -> Self {
        Self {
            registry,
            wallet,
            connections,
            builder: DepositBuilder::new(registry, wallet.address()),
            phase: RunPhase::Idle,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn wallet(&self) -> &'a Wallet {
        self.wallet
    }

    /// Wallet balance on every registered network, in registry order.
    pub async fn balances(&self) -> Vec<(&'a NetworkConfig, Balance)> {
        let mut balances = Vec::new();
        for network in self.registry.networks() {
            let balance = match self.connections.get(&network.id) {
                Ok(endpoint) => self.wallet.balance_of(endpoint).await,
                Err(_) => Balance::Unavailable,
            };
            balances.push((network, balance));
        }
        balances
    }

    /// Deposits `amount` into each bridgeable network in registry order, sleeping
    /// `delay` between submissions. Per-network failures are recorded, not raised.
    pub async fn bridge_all(
        &mut self,
        amount: U256,
        delay: Duration,
    ) -> Result<RunReport, BridgeError> {
        if amount.is_zero() {
            return Err(BridgeError::InvalidAmount("amount must be positive".to_string()));
        }
        let registry = self.registry;
        let targets = registry.list_bridgeable();
        info!(
            amount = %format_ether(amount),
            delay_secs = delay.as_secs(),
            targets = targets.len(),
            "starting bridge run"
        );

        self.transition(RunPhase::PrecheckBalance);
        let source = registry.source();
        let connections = self.connections;
        let balance = match connections.get(&source.id) {
            Ok(endpoint) => self.wallet.balance_of(endpoint).await.or_zero(),
            Err(err) => {
                self.transition(RunPhase::Aborted);
                self.transition(RunPhase::Idle);
                return Err(err);
            }
        };
        if let Err(err) = precheck(balance, amount, targets.len()) {
            warn!("bridge run aborted: {err}");
            self.transition(RunPhase::Aborted);
            self.transition(RunPhase::Idle);
            return Err(err);
        }

        self.transition(RunPhase::Running);
        let mut report = RunReport::default();
        for (i, target) in targets.iter().enumerate() {
            info!(
                "[{}/{}] bridging to {}",
                i + 1,
                targets.len(),
                target.config.name
            );
            let outcome = match self.deposit(target, amount).await {
                Ok(tx_hash) => Outcome::Success(tx_hash),
                Err(err) => {
                    error!(network = %target.config.id, "bridge failed: {err}");
                    Outcome::Failure(err.to_string())
                }
            };
            report.results.push(BridgeResult {
                network: target.config.id.clone(),
                outcome,
            });

            if i + 1 < targets.len() && !delay.is_zero() {
                info!("waiting {}s before the next network", delay.as_secs());
                tokio::time::sleep(delay).await;
            }
        }

        self.transition(RunPhase::Reporting);
        info!(
            succeeded = report.successes(),
            failed = report.failures(),
            "bridge run finished"
        );
        self.transition(RunPhase::Idle);
        Ok(report)
    }

    /// Single deposit into `network`; failures are logged and yield `None`.
    pub async fn bridge_to_network(&mut self, network: &str, amount: U256) -> Option<TxHash> {
        match self.try_bridge_to_network(network, amount).await {
            Ok(tx_hash) => Some(tx_hash),
            Err(err) => {
                error!(network, "bridge failed: {err}");
                None
            }
        }
    }

    pub async fn try_bridge_to_network(
        &mut self,
        network: &str,
        amount: U256,
    ) -> Result<TxHash, BridgeError> {
        let registry = self.registry;
        let target = registry.bridgeable_network(network)?;
        let request = BridgeRequest::new(network, amount)?;
        let source = registry.source();
        let endpoint = self.connections.get(&source.id)?;

        let balance = self.wallet.balance_of(endpoint).await.or_zero();
        if balance < request.amount() {
            return Err(BridgeError::InsufficientBalance {
                required: request.amount(),
                available: balance,
            });
        }
        info!(
            "bridging {} ETH to {}",
            format_ether(request.amount()),
            target.config.name
        );
        self.deposit(target, amount).await
    }

    async fn deposit(&self, target: &BridgeableNetwork, amount: U256) -> Result<TxHash, BridgeError> {
        let request = BridgeRequest::new(target.config.id.clone(), amount)?;
        let source = self.registry.source();
        let endpoint = self.connections.get(&source.id)?;

        let tx = self.builder.build(source, endpoint, &request).await?;
        let raw = self.wallet.sign(tx).await?;
        let tx_hash = endpoint
            .send_raw_transaction(&raw)
            .await
            .map_err(|err| BridgeError::Submission(err.to_string()))?;

        info!(network = %target.config.id, tx = %tx_hash, "deposit submitted");
        if let Some(explorer) = &source.explorer {
            info!("{}/tx/{tx_hash}", explorer.trim_end_matches('/'));
        }
        Ok(tx_hash)
    }

    fn transition(&mut self, next: RunPhase) {
        debug!(from = ?self.phase, to = ?next, "run phase");
        self.phase = next;
    }
}
