use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser as _;
use restaker::agent::{Agent, Decision};
use restaker::cli::{Cli, Commands};
use restaker::config::{AgentConfig, ConfigOverrides};
use restaker::core::chain::ethereum::EthereumStakingValidatedArgs;
use restaker::core::chain::EthereumStakingClient;
use restaker::core::history::{CsvHistory, HistorySink, HistorySummary};
use restaker::core::notify::{LogNotifier, Notifier, WebhookNotifier};
use restaker::core::signer::SignerProvider;
use restaker::service::Scheduler;
use restaker::types::units::{format_gwei, format_token};
use restaker::types::{RunResult, StakeSnapshot, VestingStatus};
use restaker::utils::logging::init_logging;
use restaker::utils::signal_handler::SignalHandler;
use restaker::{AgentError, AgentResult};
use tracing::{debug, error, info, warn};

fn main() -> color_eyre::Result<()> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();
    init_logging()?;

    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    if let Err(e) = runtime.block_on(execute(cli)) {
        error!(error = %e, error_chain = ?e, "Command failed");
        return Err(e.into());
    }
    Ok(())
}

async fn execute(cli: Cli) -> AgentResult<()> {
    let overrides = ConfigOverrides::from(&cli.network_args);
    let config = AgentConfig::load(&cli.config_file, &overrides)?;
    debug!(config = ?config, "Configuration loaded");

    match cli.command {
        Commands::Run { dry_run } => {
            let agent = build_agent(&config, cli.signer_args.provider()?)?;
            let result = agent.run_once(&config.policy()?, dry_run).await?;
            print_result(&config, &result);
            Ok(())
        }
        Commands::Daemon { interval_hours, dry_run } => {
            if interval_hours == 0 {
                return Err(AgentError::RunCommandError("--interval-hours must be positive".to_string()));
            }
            let agent = Arc::new(build_agent(&config, cli.signer_args.provider()?)?);
            run_daemon(agent, &cli.config_file, overrides, config, interval_hours, dry_run).await
        }
        Commands::Status => {
            let agent = build_agent(&config, cli.signer_args.provider()?)?;
            let (snapshot, decision) = agent.inspect(&config.policy()?).await?;
            let vesting = match agent.vesting().await {
                Ok(vesting) => vesting,
                Err(e) => {
                    warn!(error = %e, "Vesting status unavailable");
                    None
                }
            };
            print_status(&config, &snapshot, &decision, vesting.as_ref());
            Ok(())
        }
        Commands::History { limit } => {
            let rows = CsvHistory::new(config.history_file()).read_all()?;
            print_summary(&HistorySummary::from_rows(config.mode, &rows, limit));
            Ok(())
        }
    }
}

fn build_agent(config: &AgentConfig, signer: Arc<dyn SignerProvider>) -> AgentResult<Agent> {
    let chain = EthereumStakingClient::new_with_args(&EthereumStakingValidatedArgs {
        rpc_url: config.rpc_url()?,
        contract_address: config.contract_address()?,
    });
    let history: Arc<dyn HistorySink> = Arc::new(CsvHistory::new(config.history_file()));

    let mut notifiers: Vec<Arc<dyn Notifier>> = vec![Arc::new(LogNotifier)];
    if let Some(url) = &config.notify.webhook_url {
        notifiers.push(Arc::new(WebhookNotifier::new(url.clone())));
    }

    info!(wallet = %signer.address(), mode = %config.mode, chain_id = config.chain_id()?, "Agent ready");
    let agent = Agent::new(Arc::new(chain), signer, history, notifiers, config.chain_id()?, config.gas_settings());
    Ok(match config.vesting_distributor() {
        Some(distributor) => agent.with_vesting_distributor(distributor),
        None => agent,
    })
}

async fn run_daemon(
    agent: Arc<Agent>,
    config_file: &Path,
    overrides: ConfigOverrides,
    config: AgentConfig,
    interval_hours: u64,
    dry_run: bool,
) -> AgentResult<()> {
    let mut signal_handler = SignalHandler::new();
    let token = signal_handler.token();

    let config_file = config_file.to_path_buf();
    let policy_source = Box::new(move || -> AgentResult<_> {
        let config = AgentConfig::load(&config_file, &overrides)?;
        Ok(config.policy()?)
    });
    let scheduler = Scheduler::new(
        agent,
        Duration::from_secs(interval_hours * 3600),
        dry_run,
        policy_source,
        token.child_token(),
    );
    let scheduler = tokio::spawn(scheduler.run());

    signal_handler.wait_for_shutdown().await?;

    // a pass in flight may still be waiting on a receipt
    let shutdown_timeout = config.gas.confirmation_timeout_secs * 2 + 30;
    signal_handler
        .handle_graceful_shutdown(
            || async move {
                let passes = scheduler.await.map_err(|e| AgentError::RunCommandError(e.to_string()))?;
                info!(passes, "Daemon finished");
                Ok(())
            },
            shutdown_timeout,
        )
        .await
}

#[allow(clippy::print_stdout)]
fn print_result(config: &AgentConfig, result: &RunResult) {
    println!("Status:   {}", result.status);
    println!("Mode:     {}", result.mode);
    println!("Amount:   {}", format_token(result.amount));
    println!("Gas cost: {}", format_token(result.gas_cost));
    for estimate in &result.estimates {
        println!(
            "  step {} {:<20} gas limit {:>8}  max cost {}",
            estimate.ordinal,
            estimate.function_name,
            estimate.gas_limit,
            format_token(estimate.max_cost)
        );
    }
    for hash in &result.tx_hashes {
        let link = config.explorer_tx_url(&hash.to_string()).unwrap_or_else(|| hash.to_string());
        println!("  tx {link}");
    }
    if let Some(failure) = &result.failure {
        println!("Failed at step {} ({}): {}", failure.ordinal, failure.kind, failure.message);
        if let Some(hash) = failure.tx_hash {
            println!("  unconfirmed tx {hash}");
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_status(config: &AgentConfig, snapshot: &StakeSnapshot, decision: &Decision, vesting: Option<&VestingStatus>) {
    println!("Mode:           {}", config.mode);
    println!("Gas price:      {} gwei", format_gwei(snapshot.gas_price));
    println!("Pending reward: {}", format_token(snapshot.pending_reward));
    println!("Staked:         {}", format_token(snapshot.staked));
    if let Some(lock) = &snapshot.lock {
        println!("Locked:         {}", format_token(lock.amount));
        println!("Lock end:       {}", lock.end);
    }
    match decision {
        Decision::Skip(status) => println!("Next pass:      {status}"),
        Decision::Act { amount, unlock_time: Some(until) } => {
            println!("Next pass:      extend lock on {} until {until}", format_token(*amount))
        }
        Decision::Act { amount, unlock_time: None } => {
            println!("Next pass:      compound {}", format_token(*amount))
        }
    }
    if let Some(vesting) = vesting {
        println!(
            "Vesting:        epoch {}, last claimed {} ({} to claim)",
            vesting.current_epoch,
            vesting.last_claimed_epoch,
            vesting.epochs_behind()
        );
    }
}

#[allow(clippy::print_stdout)]
fn print_summary(summary: &HistorySummary) {
    println!("Runs:        {}", summary.total_runs);
    println!("Successful:  {}", summary.successes);
    println!("Failed:      {}", summary.failures);
    println!("Skipped:     {}", summary.skipped);
    println!("Dry runs:    {}", summary.dry_runs);
    if let Some(net_gain) = summary.net_gain() {
        println!("Compounded:  {}", format_token(summary.total_amount));
        println!("Gas spent:   {}", format_token(summary.total_gas_cost));
        println!("Net gain:    {}", format_token(net_gain));
    } else {
        println!("Extensions:  {}", summary.successes);
        println!("Gas spent:   {}", format_token(summary.total_gas_cost));
    }
    for row in &summary.recent {
        println!("  {} {:<24} {}", row.timestamp.format("%Y-%m-%d %H:%M"), row.status.to_string(), format_token(row.amount));
    }
}
