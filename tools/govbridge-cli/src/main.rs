use std::{fs, path::PathBuf};

use alloy_primitives::Address;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use govbridge::{
    create_execution_hash, generate_merkle_proof, generate_merkle_root, get_execution_data,
    get_storage_var_address,
    merkle::leaf_hashes,
    offset_storage_var,
    utils::encoding::{felt_to_hex, felt_to_u256, parse_u256},
    ExecutionInput, Leaf, SplitUint256,
};
use govbridge_types::{ExecutorKind, MetaTransaction};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Offline encoders for governance artifacts: whitelist roots and proofs, execution hashes,
/// storage slots and executor payloads. Output is JSON on stdout.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merkle root over a JSON array of `{ type, address, votingPower }` leaves.
    MerkleRoot {
        #[arg(long)]
        leaves: PathBuf,
    },

    /// Merkle proof for the leaf at `index`.
    MerkleProof {
        #[arg(long)]
        leaves: PathBuf,
        #[arg(long)]
        index: usize,
    },

    /// Execution hash over a JSON array of meta-transactions.
    ExecutionHash {
        #[arg(long)]
        transactions: PathBuf,
        /// L1 executor verifying the hash.
        #[arg(long, env = "GOVBRIDGE_VERIFYING_CONTRACT")]
        verifying_contract: Address,
        #[arg(long, env = "GOVBRIDGE_CHAIN_ID")]
        chain_id: u64,
    },

    /// Storage slot of a Starknet storage variable.
    StorageAddress {
        #[arg(long)]
        name: String,
        /// Hex-encoded key arguments, in order.
        #[arg(long = "key")]
        keys: Vec<String>,
        /// Offset into a struct stored at the slot.
        #[arg(long)]
        offset: Option<u64>,
    },

    /// Execution payload for an executor kind (vanilla, avatar, timelock, eth-relayer).
    ExecutionPayload {
        #[arg(long)]
        kind: ExecutorKind,
        #[arg(long)]
        executor: String,
        #[arg(long)]
        transactions: Option<PathBuf>,
        #[arg(long)]
        destination: Option<Address>,
        #[arg(long, env = "GOVBRIDGE_CHAIN_ID")]
        chain_id: Option<u64>,
    },

    /// Split a decimal or hex 256-bit integer into its 128-bit halves.
    SplitUint256 { value: String },
}

fn read_json<T: DeserializeOwned>(path: &PathBuf) -> Result<T> {
    tracing::debug!(path = %path.display(), "reading input");
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn run(command: Command) -> Result<Value> {
    match command {
        Command::MerkleRoot { leaves } => {
            let leaves: Vec<Leaf> = read_json(&leaves)?;
            let hashes = leaf_hashes(&leaves)?;
            let root = generate_merkle_root(&hashes)?;
            Ok(json!({
                "root": felt_to_hex(&root),
                "leafHashes": hashes.iter().map(felt_to_hex).collect::<Vec<_>>(),
            }))
        }
        Command::MerkleProof { leaves, index } => {
            let leaves: Vec<Leaf> = read_json(&leaves)?;
            let hashes = leaf_hashes(&leaves)?;
            let proof = generate_merkle_proof(&hashes, index)?;
            Ok(json!({
                "root": felt_to_hex(&generate_merkle_root(&hashes)?),
                "leaf": felt_to_hex(&hashes[index]),
                "proof": proof.iter().map(felt_to_hex).collect::<Vec<_>>(),
            }))
        }
        Command::ExecutionHash {
            transactions,
            verifying_contract,
            chain_id,
        } => {
            let transactions: Vec<MetaTransaction> = read_json(&transactions)?;
            let hash = create_execution_hash(&transactions, verifying_contract, chain_id);
            Ok(json!({
                "executionHash": hash.execution_hash.to_string(),
                "txHashes": hash.tx_hashes.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }))
        }
        Command::StorageAddress { name, keys, offset } => {
            let mut address = get_storage_var_address(&name, &keys)?;
            if let Some(offset) = offset {
                address = offset_storage_var(&address, offset)?;
            }
            Ok(json!({
                "address": felt_to_hex(&address),
                "decimal": felt_to_u256(&address).to_string(),
            }))
        }
        Command::ExecutionPayload {
            kind,
            executor,
            transactions,
            destination,
            chain_id,
        } => {
            let transactions = transactions
                .as_ref()
                .map(read_json::<Vec<MetaTransaction>>)
                .transpose()?;
            let input = ExecutionInput {
                transactions,
                destination,
                chain_id,
            };
            let payload = get_execution_data(kind, &executor, Some(&input))?;
            Ok(serde_json::to_value(payload)?)
        }
        Command::SplitUint256 { value } => {
            let split = SplitUint256::from_uint(parse_u256(&value)?);
            Ok(json!({ "low": split.low_hex(), "high": split.high_hex() }))
        }
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = run(cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
