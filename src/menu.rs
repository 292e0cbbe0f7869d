use std::{
    io::{BufRead, Write},
    time::Duration,
};

use alloy::primitives::U256;
use eyre::{eyre, Result, WrapErr};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines},
    runtime::Handle,
};

use crate::{
    config::BridgeDefaults,
    error::BridgeError,
    orchestrator::BridgeOrchestrator,
    report::{balances_table, results_table},
    units::{format_ether, parse_amount},
};

const LINE_BUFFER: usize = 4096;

/// Forwards the lines of a blocking reader from a detached thread. A read still
/// pending when the program stops never holds up runtime shutdown.
pub fn detached_lines<I>(input: I) -> BufReader<DuplexStream>
where
    I: BufRead + Send + 'static,
{
    let (reader, mut writer) = tokio::io::duplex(LINE_BUFFER);
    let runtime = Handle::current();
    std::thread::spawn(move || {
        for line in input.lines() {
            let Ok(line) = line else { break };
            let forwarded = runtime.block_on(async {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await
            });
            if forwarded.is_err() {
                break;
            }
        }
    });
    BufReader::new(reader)
}

/// Line-based prompt over any async reader, writing to any sink.
pub struct Console<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
        }
    }

    pub fn say(&mut self, text: impl std::fmt::Display) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Closed input is an error: nothing more can be asked.
    pub async fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.out, "{question}")?;
        self.out.flush()?;
        let line = self
            .lines
            .next_line()
            .await
            .wrap_err("reading input")?
            .ok_or_else(|| eyre!("input closed"))?;
        Ok(line.trim().to_string())
    }

    pub async fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self.ask(question).await?.eq_ignore_ascii_case("y"))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }
}

pub async fn show_balances<R, W>(
    orchestrator: &BridgeOrchestrator<'_>,
    console: &mut Console<R, W>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.say(format!("\nWallet {} balances:", orchestrator.wallet().address()))?;
    let balances = orchestrator.balances().await;
    console.say(balances_table(balances))
}

/// Bridge-all with balances shown before and after; an aborted run is reported, not raised.
pub async fn bridge_all<R, W>(
    orchestrator: &mut BridgeOrchestrator<'_>,
    amount: U256,
    delay: Duration,
    console: &mut Console<R, W>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    show_balances(orchestrator, console).await?;
    match orchestrator.bridge_all(amount, delay).await {
        Ok(report) => {
            console.say("\nBridge results:")?;
            console.say(results_table(orchestrator.registry(), &report))?;
            console.say("Balances after bridging:")?;
            show_balances(orchestrator, console).await
        }
        Err(err @ BridgeError::InsufficientBalance { .. }) => {
            console.say(format!("Bridge cancelled: {err}"))
        }
        Err(err) => console.say(format!("Bridge not started: {err}")),
    }
}

pub async fn run_menu<R, W>(
    orchestrator: &mut BridgeOrchestrator<'_>,
    defaults: &BridgeDefaults,
    console: &mut Console<R, W>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        console.say("\nOptions:")?;
        console.say("1. Bridge to all networks")?;
        console.say("2. Bridge to one network")?;
        console.say("3. Show balances")?;
        console.say("4. Exit")?;

        match console.ask("\nChoose (1-4): ").await?.as_str() {
            "1" => bridge_all_prompted(orchestrator, defaults, console).await?,
            "2" => bridge_one_prompted(orchestrator, defaults, console).await?,
            "3" => show_balances(orchestrator, console).await?,
            "4" => {
                console.say("Bye!")?;
                return Ok(());
            }
            other => console.say(format!("Invalid choice: {other:?}"))?,
        }

        console.ask("\nPress Enter to return to the menu...").await?;
    }
}

async fn bridge_all_prompted<R, W>(
    orchestrator: &mut BridgeOrchestrator<'_>,
    defaults: &BridgeDefaults,
    console: &mut Console<R, W>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Some(amount) = ask_amount(console, defaults.amount).await? else {
        return Ok(());
    };
    let question = format!(
        "Seconds between networks (default: {}): ",
        defaults.delay.as_secs()
    );
    let delay = match console.ask(&question).await?.as_str() {
        "" => defaults.delay,
        input => match input.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => return console.say(format!("Invalid delay: {input:?}")),
        },
    };

    console.say(format!("\nAmount per network: {} ETH", format_ether(amount)))?;
    console.say(format!("Delay: {}s", delay.as_secs()))?;
    if !console.confirm("\nContinue? (y/n): ").await? {
        return console.say("Bridge cancelled");
    }
    bridge_all(orchestrator, amount, delay, console).await
}

async fn bridge_one_prompted<R, W>(
    orchestrator: &mut BridgeOrchestrator<'_>,
    defaults: &BridgeDefaults,
    console: &mut Console<R, W>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.say("Available networks:")?;
    for network in orchestrator.registry().list_bridgeable() {
        console.say(format!("- {}", network.config.id))?;
    }
    let network = console.ask("Network: ").await?.to_lowercase();
    let Some(amount) = ask_amount(console, defaults.amount).await? else {
        return Ok(());
    };

    match orchestrator.bridge_to_network(&network, amount).await {
        Some(tx_hash) => console.say(format!("Bridge submitted: {tx_hash}")),
        None => console.say(format!("Bridge to {network} failed, see log")),
    }
}

async fn ask_amount<R, W>(console: &mut Console<R, W>, default: U256) -> Result<Option<U256>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let question = format!("Amount in ETH (default: {}): ", format_ether(default));
    match console.ask(&question).await?.as_str() {
        "" => Ok(Some(default)),
        input => match parse_amount(input) {
            Ok(amount) => Ok(Some(amount)),
            Err(err) => {
                console.say(format!("Invalid amount: {err}"))?;
                Ok(None)
            }
        },
    }
}
