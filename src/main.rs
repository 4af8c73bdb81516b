use std::fs::File;
use std::io::{BufReader, BufWriter, Write, stderr, stdout};
use std::process::exit;
use std::sync::Arc;

use anyhow::Result;
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::level_filters::LevelFilter;
use tracing::{error, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

use transfer_ledger::engine::TransferEngine;
use transfer_ledger::models::Account;
use transfer_ledger::storage::{AccountStore, InMemoryAccountStore, InMemoryTransferStore};

type ScenarioEngine = TransferEngine<InMemoryAccountStore, InMemoryTransferStore>;

/// One row of the account seed file.
#[derive(Debug, Deserialize)]
struct AccountSeed {
    account_number: String,
    owner_name: String,
    balance: Decimal
}

/// One transfer instruction to replay through the engine.
#[derive(Debug, Deserialize)]
struct TransferInstruction {
    source: String,
    destination: String,
    amount: Decimal,
    description: Option<String>
}

#[tokio::main]
async fn main() -> Result<()> {
    //NOTE: If this grew into a real CLI surface I would reach for clap; two
    //      positional paths and a log level do not warrant it.
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: transfer-ledger [accounts].csv [transfers].csv [log_level:optional] > [output].csv");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let log_level = args.get(3)
        .map(|s| parse_log_level(s)).unwrap_or(LevelFilter::ERROR);

    setup_logging(log_level);

    let accounts = Arc::new(InMemoryAccountStore::new());
    let transfers = Arc::new(InMemoryTransferStore::new());
    let engine = TransferEngine::new(accounts.clone(), transfers.clone());

    seed_accounts(accounts.as_ref(), &args[1]).await?;
    replay_transfers(&engine, &args[2]).await?;

    write_results_to_stdout(&engine).await?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Because we are doing stdout redirection, we will need to utilize stderr to display logging
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

async fn seed_accounts(store: &InMemoryAccountStore, path: &str) -> Result<()> {
    for seed in read_rows::<AccountSeed>(path)? {
        store.save(Account::new(seed.account_number, seed.owner_name, seed.balance)).await?;
    }

    Ok(())
}

async fn replay_transfers(engine: &ScenarioEngine, path: &str) -> Result<()> {
    for instruction in read_rows::<TransferInstruction>(path)? {
        let outcome = engine.perform_transfer(
            &instruction.source,
            &instruction.destination,
            instruction.amount,
            instruction.description.as_deref()
        ).await;

        // A rejected transfer is already persisted as a FAILED audit row, so
        // it is not a program error.
        if let Err(failure) = outcome {
            warn!("{}", failure.receipt.message);
        }
    }

    Ok(())
}

fn read_rows<R: DeserializeOwned>(path: &str) -> Result<Vec<R>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut rows = Vec::new();

    for result in reader.deserialize::<R>() {
        match result {
            Ok(row) => rows.push(row),
            Err(csv_error) => {
                error!("CSV deserialization error: {csv_error}");
            }
        }
    }

    Ok(rows)
}

async fn write_results_to_stdout(engine: &ScenarioEngine) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    writeln!(output, "account_number,owner_name,balance")?;

    for account in engine.get_all_accounts().await? {
        writeln!(
            output,
            "{},{},{}",
            account.account_number,
            account.owner_name,
            account.balance
        )?;
    }

    writeln!(output)?;
    writeln!(output, "id,source_account_id,destination_account_id,amount,status,description")?;

    for transfer in engine.get_all_transfers().await? {
        writeln!(
            output,
            "{},{},{},{},{},{}",
            format_id(transfer.id),
            format_id(transfer.source_account_id),
            format_id(transfer.destination_account_id),
            transfer.amount,
            transfer.status,
            transfer.description
        )?;
    }

    output.flush()?;

    Ok(())
}

fn format_id(id: Option<u64>) -> String {
    id.map(|value| value.to_string()).unwrap_or_default()
}
