//! keypom-harness CLI
//!
//! Thin command-line front end over the harness helpers, for poking at a
//! sandbox or testnet deployment by hand.
//!
//! ```text
//!   keys ──────────▶ harness::keys
//!   views ─────────▶ harness::views ──▶ Contract (query) ──┐
//!   create-series ─▶ harness::series ─▶ Account (tx) ──────┼─▶ RpcClient ─▶ NEAR RPC
//!   balance-check ─▶ harness::balance                      │
//!   account ───────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use keypom_harness::blockchain::units::{format_near, parse_near_amount};
use keypom_harness::blockchain::{Account, Contract, RpcClient, Signer};
use keypom_harness::config::{load_or_default, HarnessConfig};
use keypom_harness::harness::{
    assert_balance_change, create_series_with_options, generate_key_pairs,
    query_all_view_functions, query_all_view_functions_concurrent, CallOptions, HarnessError,
    TokenMetadata, ViewQuery,
};
use keypom_harness::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "keypom-harness")]
#[command(about = "Test utilities for Keypom drop contracts on NEAR", long_about = None)]
struct Cli {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random ed25519 key pairs
    Keys {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Also print secret keys
        #[arg(long)]
        show_secret: bool,
    },
    /// Run every applicable view on the drop contract and print the result as JSON
    Views {
        #[arg(long)]
        drop_id: Option<u64>,
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        account_id: Option<String>,
        #[arg(long)]
        from_index: Option<String>,
        #[arg(long)]
        limit: Option<u64>,
        /// Issue the view groups concurrently
        #[arg(long)]
        concurrent: bool,
    },
    /// Create NFT series from a JSON file of `[{ "id": .., "metadata": {..} }]`
    CreateSeries {
        #[arg(short, long)]
        file: PathBuf,
        /// NFT contract; overrides `contracts.nft`
        #[arg(long)]
        nft_contract: Option<String>,
    },
    /// Check a balance delta against an expected amount
    BalanceCheck {
        #[arg(long)]
        before: String,
        #[arg(long)]
        after: String,
        #[arg(long)]
        expected: String,
        #[arg(long, default_value_t = 0.05)]
        precision: f64,
    },
    /// Show an account's balance
    Account { account_id: String },
}

#[derive(Deserialize)]
struct SeriesEntry {
    id: u64,
    metadata: TokenMetadata,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    init_logging(&config.observability);

    tracing::debug!(rpc_url = %config.blockchain.rpc_url, "keypom-harness starting");

    match cli.command {
        Commands::Keys { count, show_secret } => {
            let generated = generate_key_pairs(count);
            for (kp, pk) in generated.keys.iter().zip(&generated.public_keys) {
                if show_secret {
                    println!("{} {}", pk, kp.secret_key());
                } else {
                    println!("{}", pk);
                }
            }
        }
        Commands::Views {
            drop_id,
            key,
            account_id,
            from_index,
            limit,
            concurrent,
        } => {
            let mut query = ViewQuery::from_config(&config.views);
            query.drop_id = drop_id;
            query.key = key;
            query.account_id = account_id;
            if from_index.is_some() {
                query.from_index = from_index;
            }
            if limit.is_some() {
                query.limit = limit;
            }

            let client = RpcClient::new(config.blockchain.clone())?;
            let contract = Contract::new(client, config.contracts.keypom.clone());
            let views = if concurrent {
                query_all_view_functions_concurrent(&contract, &query).await?
            } else {
                query_all_view_functions(&contract, &query).await?
            };
            println!("{}", views.to_json_pretty()?);
        }
        Commands::CreateSeries { file, nft_contract } => {
            run_create_series(&config, &file, nft_contract).await?;
        }
        Commands::BalanceCheck {
            before,
            after,
            expected,
            precision,
        } => {
            let ok = assert_balance_change(
                parse_near_amount(&before)?,
                parse_near_amount(&after)?,
                parse_near_amount(&expected)?,
                precision,
            );
            println!("{}", ok);
            if !ok {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Account { account_id } => {
            let client = RpcClient::new(config.blockchain.clone())?;
            let view = client.view_account(&account_id).await?;
            println!(
                "{}: {} (locked {}, storage {} bytes)",
                account_id,
                format_near(view.amount.0),
                format_near(view.locked.0),
                view.storage_usage
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_create_series(
    config: &HarnessConfig,
    file: &Path,
    nft_contract: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let nft_contract = nft_contract
        .or_else(|| config.contracts.nft.clone())
        .ok_or_else(|| HarnessError::InvalidOptions("no NFT contract configured".to_string()))?;
    let account_id = config
        .signer
        .account_id
        .clone()
        .ok_or_else(|| HarnessError::InvalidOptions("signer.account_id is not set".to_string()))?;

    let entries: Vec<SeriesEntry> = serde_json::from_str(&std::fs::read_to_string(file)?)?;
    let (ids, metadatas): (Vec<u64>, Vec<TokenMetadata>) =
        entries.into_iter().map(|e| (e.id, e.metadata)).unzip();

    let signer = Signer::from_env(account_id, &config.signer.secret_key_env)?;
    let client = RpcClient::new(config.blockchain.clone())?;
    let account = Account::new(client, signer);
    let options = CallOptions::try_from(&config.call_defaults)?;

    create_series_with_options(&account, &nft_contract, &metadatas, &ids, options).await?;
    tracing::info!(count = ids.len(), nft_contract = %nft_contract, "All series created");
    Ok(())
}
