//! Generates a fresh key and prints its WIF, public key, and the four addresses it controls.
//!
//! Run with `cargo run --example gen-address -- --network testnet`, set `RUST_LOG=debug` to see
//! the derivation logs.

use anyhow::Context;
use btc_paykit::address::is_valid;
use btc_paykit::bitcoin::hex::DisplayHex;
use btc_paykit::bitcoin::Network;
use btc_paykit::{Address, AddressType, NetworkParams, PrivateKey};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Not an address on any network, used to show a failed validation.
const NOT_AN_ADDRESS: &str = "0xdadb0d80178819f2319190d340ce9a924f783711";

#[derive(Parser)]
#[command(version, about = "Generate a private key and the addresses it controls", long_about = None)]
struct Cli {
    /// Network to encode the key and addresses for.
    #[arg(short, long, env = "PAYKIT_NETWORK", default_value = "bitcoin")]
    network: Network,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let network = NetworkParams::from(cli.network);

    println!("Generate private key");
    let key = PrivateKey::generate(network.clone());
    println!("- [WIF]: {}", key.to_wif());

    println!("\nGenerate public key");
    println!("- [PublicKey]: {}", key.public_key_bytes().to_lower_hex_string());

    println!("\nGenerate addresses");
    let mut addresses = Vec::with_capacity(AddressType::ALL.len());
    for address_type in AddressType::ALL {
        let address = Address::derive(&key.public_key(), address_type, &network)
            .with_context(|| format!("deriving {} address", address_type))?;
        println!("- [{}]: {}", address_type, address);
        addresses.push(address);
    }

    println!("\nValidate addresses");
    let taproot = addresses.last().context("no addresses derived")?;
    println!("- [Valid]: {} {}", taproot, is_valid(taproot.as_str(), &network));
    println!("- [Invalid]: {} {}", NOT_AN_ADDRESS, is_valid(NOT_AN_ADDRESS, &network));

    Ok(())
}
