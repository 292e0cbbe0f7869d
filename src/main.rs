use std::time::Duration;

use clap::Parser;
use eyre::{eyre, WrapErr};
use tokio::io::AsyncBufRead;
use tracing::info;

use superbridge::{
    config::{BridgeDefaults, Cli, Command},
    endpoint::Connections,
    logging::log_init,
    menu::{self, Console},
    orchestrator::BridgeOrchestrator,
    wallet::Wallet,
};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    log_init(format!("{}=info", env!("CARGO_CRATE_NAME")));

    let registry = cli.settings.registry()?;
    let wallet = Wallet::from_private_key(&cli.settings.private_key)
        .wrap_err("cannot load wallet from PRIVATE_KEY")?;
    info!(address = %wallet.address(), "wallet loaded");

    let connections = Connections::connect(&registry)?;
    for network in registry.networks() {
        info!(network = %network.id, rpc = %network.rpc_url, "endpoint configured");
    }

    let mut orchestrator = BridgeOrchestrator::new(&registry, &wallet, &connections);
    let defaults = cli.settings.defaults();
    let stdin = menu::detached_lines(std::io::BufReader::new(std::io::stdin()));
    let mut console = Console::new(stdin, std::io::stdout());

    tokio::select! {
        result = run(cli.command, &mut orchestrator, &defaults, &mut console) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\nStopped by user");
            Ok(())
        }
    }
}

async fn run<R, W>(
    command: Option<Command>,
    orchestrator: &mut BridgeOrchestrator<'_>,
    defaults: &BridgeDefaults,
    console: &mut Console<R, W>,
) -> eyre::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: std::io::Write,
{
    match command.unwrap_or(Command::Menu) {
        Command::Menu => menu::run_menu(orchestrator, defaults, console).await,
        Command::All { amount, delay, yes } => {
            let amount = amount.unwrap_or(defaults.amount);
            let delay = delay.map(Duration::from_secs).unwrap_or(defaults.delay);
            if !yes && !console.confirm("Bridge to all networks? (y/n): ").await? {
                return console.say("Bridge cancelled");
            }
            menu::bridge_all(orchestrator, amount, delay, console).await
        }
        Command::Bridge { network, amount } => {
            let amount = amount.unwrap_or(defaults.amount);
            let tx_hash = orchestrator
                .bridge_to_network(&network, amount)
                .await
                .ok_or_else(|| eyre!("bridge to {network} failed"))?;
            console.say(format!("Bridge submitted: {tx_hash}"))
        }
        Command::Balances => menu::show_balances(orchestrator, console).await,
    }
}
