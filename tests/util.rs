#![cfg(feature = "std")]
// Functions in this file are all used but clippy complains still.
#![allow(dead_code)]

use btc_paykit::bitcoin::hex::DisplayHex;
use btc_paykit::bitcoin::{Amount, ScriptBuf};
use btc_paykit::{Address, AddressType, NetworkParams, PrivateKey, Utxo};

/// Private key used by most fixtures.
pub const WIF: &str = "L3fYVdieHsWx2HJ8vvStiLBo8NmYAK7GUGwD3SNnSyDLKiKnPs5N";

/// Compressed public key of [`WIF`].
pub const PUBKEY: &str = "02e687f2e1ffed79e7e96900df02d802b151c353773f7c3080ef729ef9bde0bace";

/// The output spent by the transaction fixtures.
pub const UTXO_TXID: &str = "a958bc46c0d7e6c9bc324d6d5462ce6b36156272af810189f75cc74df23bddcf";

/// Native segwit address of [`WIF`], the destination of the transaction fixtures.
pub const DESTINATION: &str = "bc1qlqvtwpu2servhtchh26f9u09uav2w835tdxl59";

#[track_caller]
pub fn mainnet_key() -> PrivateKey {
    match PrivateKey::from_wif(WIF, NetworkParams::bitcoin()) {
        Ok(key) => key,
        Err(e) => panic!("unable to decode fixture WIF {}: {}", WIF, e),
    }
}

/// Returns the key whose secret scalar is one, the public key is the generator point.
#[track_caller]
pub fn generator_key(network: NetworkParams) -> PrivateKey {
    let mut one = [0u8; 32];
    one[31] = 1;
    PrivateKey::from_slice(&one, network).expect("one is a valid secret")
}

#[track_caller]
pub fn derive(key: &PrivateKey, address_type: AddressType) -> Address {
    Address::derive(&key.public_key(), address_type, key.network())
        .unwrap_or_else(|e| panic!("failed to derive {} address: {}", address_type, e))
}

/// The fixture UTXO, locked to `address_type` for [`mainnet_key`].
#[track_caller]
pub fn fixture_utxo(address_type: AddressType) -> Utxo {
    let key = mainnet_key();
    let script_pubkey = derive(&key, address_type).script_pubkey();
    Utxo::from_hex(UTXO_TXID, 0, Amount::from_sat(1000), &script_hex(&script_pubkey))
        .expect("valid fixture")
}

pub fn script_hex(script: &ScriptBuf) -> String { script.as_bytes().to_lower_hex_string() }
