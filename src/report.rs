use std::fmt;

use crate::{
    chain::{NetworkConfig, Registry},
    orchestrator::RunReport,
    units::format_ether,
    wallet::Balance,
};

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summary {
    AllSucceeded,
    Partial,
    AllFailed,
}

impl Summary {
    pub fn from_counts(successes: usize, total: usize) -> Self {
        if successes == total {
            Summary::AllSucceeded
        } else if successes == 0 {
            Summary::AllFailed
        } else {
            Summary::Partial
        }
    }

    pub fn of(report: &RunReport) -> Self {
        Self::from_counts(report.successes(), report.results.len())
    }

    pub fn label(self) -> &'static str {
        match self {
            Summary::AllSucceeded => "all succeeded",
            Summary::Partial => "partial success",
            Summary::AllFailed => "all failed",
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn balances_table<'a>(rows: impl IntoIterator<Item = (&'a NetworkConfig, Balance)>) -> String {
    let rule = "-".repeat(40);
    let mut lines = vec![rule.clone()];
    lines.extend(rows.into_iter().map(|(network, balance)| {
        let amount = match balance {
            Balance::Known(wei) => format!("{} ETH", format_ether(wei)),
            Balance::Unavailable => "unavailable".to_string(),
        };
        format!("{:<15}: {amount}", network.name)
    }));
    lines.push(rule);
    table(lines)
}

pub fn results_table(registry: &Registry, report: &RunReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![rule.clone()];
    lines.extend(report.results.iter().map(|result| {
        let name = registry
            .get(&result.network)
            .map(|config| config.name.as_str())
            .unwrap_or(result.network.as_str());
        let status = if result.is_success() { "success" } else { "failed" };
        format!("{name:<12}: {status}")
    }));
    lines.push(rule);
    lines.push(format!(
        "Total: {} | Succeeded: {} | Failed: {}",
        report.results.len(),
        report.successes(),
        report.failures()
    ));
    lines.push(format!("Result: {}", Summary::of(report)));
    table(lines)
}

/// One line per entry, each newline-terminated.
fn table(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chain::{
            tests::{bridgeable, config},
            Network,
        },
        orchestrator::{BridgeResult, Outcome},
    };
    use alloy::primitives::{TxHash, U256};
    use test_case::test_case;

    #[test_case(3, 3, Summary::AllSucceeded ; "all")]
    #[test_case(0, 3, Summary::AllFailed ; "none")]
    #[test_case(1, 3, Summary::Partial ; "one of three")]
    #[test_case(2, 3, Summary::Partial ; "two of three")]
    #[test_case(0, 0, Summary::AllSucceeded ; "empty run")]
    fn summary_follows_success_count(successes: usize, total: usize, expected: Summary) {
        assert_eq!(Summary::from_counts(successes, total), expected);
    }

    #[test]
    fn balances_use_six_decimals() {
        let ethereum = config("ethereum", 1);
        let base = config("base", 8453);
        let table = balances_table([
            (&ethereum, Balance::Known(U256::from(50_000_000_000_000_000u128))),
            (&base, Balance::Unavailable),
        ]);

        assert!(table.contains("ETHEREUM       : 0.050000 ETH"));
        assert!(table.contains("BASE           : unavailable"));
    }

    #[test]
    fn results_list_networks_in_order_with_summary() {
        let registry = Registry::new(
            "ethereum",
            vec![
                Network::SourceOnly(config("ethereum", 1)),
                bridgeable("optimism", 10, 1),
                bridgeable("base", 8453, 2),
            ],
        )
        .unwrap();
        let report = RunReport {
            results: vec![
                BridgeResult {
                    network: "optimism".to_string(),
                    outcome: Outcome::Success(TxHash::ZERO),
                },
                BridgeResult {
                    network: "base".to_string(),
                    outcome: Outcome::Failure("nonce too low".to_string()),
                },
            ],
        };

        let table = results_table(&registry, &report);
        let optimism = table.find("OPTIMISM    : success").unwrap();
        let base = table.find("BASE        : failed").unwrap();
        assert!(optimism < base);
        assert!(table.contains("Total: 2 | Succeeded: 1 | Failed: 1"));
        assert!(table.ends_with("Result: partial success\n"));
    }
}
