//! Builds, signs, and prints a transaction spending a native segwit output back to its owner.
//!
//! Spends the same UTXO as the mainnet transaction
//! `f9e7840870ed85e197469ea4998b3ae0dce6af47f0ca0164e1e3fc2ccd07cc77`, on mainnet the output is
//! byte-for-byte that transaction.

use anyhow::Context;
use btc_paykit::bitcoin::{Amount, Network};
use btc_paykit::{Address, AddressType, Creator, NetworkParams, PrivateKey, Utxo};
use clap::Parser;
use tracing_subscriber::EnvFilter;

const WIF: &str = "L3fYVdieHsWx2HJ8vvStiLBo8NmYAK7GUGwD3SNnSyDLKiKnPs5N";
const UTXO_TXID: &str = "a958bc46c0d7e6c9bc324d6d5462ce6b36156272af810189f75cc74df23bddcf";
const UTXO_VOUT: u32 = 0;
const UTXO_VALUE: Amount = Amount::from_sat(1_000);
const SPEND_AMOUNT: i64 = 800;

#[derive(Parser)]
#[command(version, about = "Sign a single input P2WPKH transaction", long_about = None)]
struct Cli {
    /// Network to build the transaction for.
    #[arg(short, long, env = "PAYKIT_NETWORK", default_value = "bitcoin")]
    network: Network,

    /// WIF private key controlling the UTXO, defaults to the fixture key (mainnet only).
    #[arg(long, env = "PAYKIT_WIF", default_value = WIF)]
    wif: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let network = NetworkParams::from(cli.network);

    let key = PrivateKey::from_wif(&cli.wif, network.clone()).context("decoding WIF")?;
    let address = Address::derive(&key.public_key(), AddressType::P2wpkh, &network)?;

    let utxo = Utxo::new(
        UTXO_TXID.parse().context("parsing utxo txid")?,
        UTXO_VOUT,
        UTXO_VALUE,
        address.script_pubkey(),
    );

    let mut builder = Creator::new().network(network).builder();
    builder.add_input(utxo)?;
    builder.add_output(address.as_str(), SPEND_AMOUNT)?;

    // Offline signing.
    builder.sign_input(0, &key)?;
    builder.finalize_all_inputs()?;

    println!("Generate transaction: {}", builder.extract_hex()?);
    println!("- [txid]: {}", builder.txid()?);
    println!("- [fee]: {}", builder.fee()?);

    Ok(())
}
