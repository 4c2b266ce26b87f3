//! Building, signing, and serializing single-input transactions.

#![cfg(feature = "std")]

mod util;

use std::collections::BTreeMap;

use btc_paykit::bitcoin::consensus::encode;
use btc_paykit::bitcoin::hashes::Hash;
use btc_paykit::bitcoin::hex::{DisplayHex, FromHex};
use btc_paykit::bitcoin::secp256k1::{schnorr, Message, Secp256k1, XOnlyPublicKey};
use btc_paykit::bitcoin::sighash::{EcdsaSighashType, Prevouts, SighashCache, TapSighashType};
use btc_paykit::bitcoin::{ecdsa, Amount, Transaction};
use btc_paykit::builder::{ExtractError, FinalizeError};
use btc_paykit::{build, AddressType, Creator, ErrorKind, NetworkParams, TransactionBuilder};

use crate::util::{fixture_utxo, mainnet_key, DESTINATION};

/// The P2WPKH spend the original demo broadcast.
const P2WPKH_TX: &str = "02000000000101cfdd3bf24dc75cf7890181af726215366bce62546d4d32bcc9e6d7c046bc58a90000000000ffffffff012003000000000000160014f818b7078a8646cbaf17bab492f1e5e758a71e340247304402203181e4c2feb6b304d14c65e0b9ecfa23cc40b0e9f5698e0cd69838b1478888a602207b8961cebb57ae5001882f12ff761800a229cb4dddbce38bbf0fe85c6add8b4e012102e687f2e1ffed79e7e96900df02d802b151c353773f7c3080ef729ef9bde0bace00000000";
const P2WPKH_TXID: &str = "f9e7840870ed85e197469ea4998b3ae0dce6af47f0ca0164e1e3fc2ccd07cc77";

const P2PKH_TX: &str = "0200000001cfdd3bf24dc75cf7890181af726215366bce62546d4d32bcc9e6d7c046bc58a9000000006b483045022100847256be8e636d75dbfc7bc79962aa90ca8ccd7a84426172c5ad8310aa5a55bd022039a7d381ca8a1e3259ebacb2eb2dfff9c7de58b55af314ece89c5c5c284dadaa012102e687f2e1ffed79e7e96900df02d802b151c353773f7c3080ef729ef9bde0baceffffffff012003000000000000160014f818b7078a8646cbaf17bab492f1e5e758a71e3400000000";
const P2PKH_TXID: &str = "bfeed634e9807a88da9280fe0e451c6135965f87f7bae88fe215ed7b7691cb6d";

const P2SH_P2WPKH_TX: &str = "02000000000101cfdd3bf24dc75cf7890181af726215366bce62546d4d32bcc9e6d7c046bc58a90000000017160014f818b7078a8646cbaf17bab492f1e5e758a71e34ffffffff012003000000000000160014f818b7078a8646cbaf17bab492f1e5e758a71e340247304402203181e4c2feb6b304d14c65e0b9ecfa23cc40b0e9f5698e0cd69838b1478888a602207b8961cebb57ae5001882f12ff761800a229cb4dddbce38bbf0fe85c6add8b4e012102e687f2e1ffed79e7e96900df02d802b151c353773f7c3080ef729ef9bde0bace00000000";
const P2SH_P2WPKH_TXID: &str = "4ed46f5d0c76e08c691e60d8e0e7a95b8126d12f691443721e4a85c18494c31f";

/// Spends the fixture UTXO locked to `address_type`, paying 800 sat back to the fixture key.
fn signed_spend(address_type: AddressType) -> TransactionBuilder {
    let mut builder = TransactionBuilder::new(NetworkParams::bitcoin());
    builder.add_input(fixture_utxo(address_type)).unwrap();
    builder.add_output(DESTINATION, 800).unwrap();
    builder.sign_input(0, &mainnet_key()).unwrap();
    builder.finalize_all_inputs().unwrap();
    builder
}

#[test]
fn p2wpkh_spend_matches_fixture() {
    let builder = signed_spend(AddressType::P2wpkh);

    assert_eq!(builder.extract_hex().unwrap(), P2WPKH_TX);
    assert_eq!(builder.extract_transaction().unwrap(), Vec::from_hex(P2WPKH_TX).unwrap());
    assert_eq!(builder.txid().unwrap().to_string(), P2WPKH_TXID);
    assert_eq!(builder.fee().unwrap(), Amount::from_sat(200));
}

#[test]
fn p2wpkh_signature_verifies() {
    let secp = Secp256k1::verification_only();
    let tx = signed_spend(AddressType::P2wpkh).extract_tx().unwrap();
    let utxo = fixture_utxo(AddressType::P2wpkh);

    let sighash = SighashCache::new(&tx)
        .p2wpkh_signature_hash(0, &utxo.script_pubkey, utxo.value, EcdsaSighashType::All)
        .unwrap();
    let msg = Message::from_digest(sighash.to_byte_array());

    let witness = &tx.input[0].witness;
    assert_eq!(witness.len(), 2);
    let sig = ecdsa::Signature::from_slice(&witness[0]).unwrap();
    assert_eq!(sig.sighash_type, EcdsaSighashType::All);
    let pubkey = btc_paykit::bitcoin::secp256k1::PublicKey::from_slice(&witness[1]).unwrap();
    assert_eq!(pubkey, mainnet_key().public_key());

    secp.verify_ecdsa(&msg, &sig.signature, &pubkey).unwrap();
    assert!(tx.input[0].script_sig.is_empty());
}

#[test]
fn p2pkh_spend_matches_fixture() {
    let builder = signed_spend(AddressType::P2pkh);
    let tx = builder.extract_tx().unwrap();

    assert_eq!(builder.extract_hex().unwrap(), P2PKH_TX);
    assert_eq!(tx.compute_txid().to_string(), P2PKH_TXID);
    // Legacy only, serialized without the segwit marker.
    assert!(tx.input[0].witness.is_empty());
}

#[test]
fn p2sh_p2wpkh_spend_matches_fixture() {
    let builder = signed_spend(AddressType::P2shP2wpkh);
    let tx = builder.extract_tx().unwrap();

    assert_eq!(builder.extract_hex().unwrap(), P2SH_P2WPKH_TX);
    assert_eq!(tx.compute_txid().to_string(), P2SH_P2WPKH_TXID);
    assert_eq!(
        tx.input[0].script_sig.as_bytes().to_lower_hex_string(),
        "160014f818b7078a8646cbaf17bab492f1e5e758a71e34"
    );
}

#[test]
fn p2tr_signature_verifies_against_output_key() {
    let secp = Secp256k1::verification_only();
    let tx = signed_spend(AddressType::P2tr).extract_tx().unwrap();
    let utxo = fixture_utxo(AddressType::P2tr);

    // Key path spend, a single 64 byte signature for SIGHASH_DEFAULT.
    let witness = &tx.input[0].witness;
    assert_eq!(witness.len(), 1);
    assert_eq!(witness[0].len(), 64);
    assert!(tx.input[0].script_sig.is_empty());

    let prevouts = vec![utxo.tx_out()];
    let sighash = SighashCache::new(&tx)
        .taproot_key_spend_signature_hash(0, &Prevouts::All(&prevouts), TapSighashType::Default)
        .unwrap();
    let msg = Message::from_digest(sighash.to_byte_array());

    let output_key = XOnlyPublicKey::from_slice(&utxo.script_pubkey.as_bytes()[2..]).unwrap();
    assert_eq!(
        output_key.serialize().to_lower_hex_string(),
        "268b8cd9da86058dab06fcd3df0f56323032f89959b814872baf9c4330daf1d6"
    );
    let sig = schnorr::Signature::from_slice(&witness[0]).unwrap();
    secp.verify_schnorr(&sig, &msg, &output_key).unwrap();
}

#[test]
fn p2tr_signing_is_deterministic() {
    let a = signed_spend(AddressType::P2tr).extract_hex().unwrap();
    let b = signed_spend(AddressType::P2tr).extract_hex().unwrap();
    assert_eq!(a, b);
}

#[test]
fn extracted_transaction_decodes() -> anyhow::Result<()> {
    let bytes = signed_spend(AddressType::P2wpkh).extract_transaction()?;
    let tx: Transaction = encode::deserialize(&bytes)?;

    assert_eq!(tx.input.len(), 1);
    assert_eq!(tx.output.len(), 1);
    assert_eq!(tx.output[0].value, Amount::from_sat(800));
    assert_eq!(encode::serialize(&tx), bytes);
    Ok(())
}

#[test]
fn lifecycle_errors() {
    let mut builder = TransactionBuilder::new(NetworkParams::bitcoin());
    builder.add_input(fixture_utxo(AddressType::P2wpkh)).unwrap();
    builder.add_output(DESTINATION, 800).unwrap();

    assert_eq!(builder.finalize_all_inputs(), Err(FinalizeError::MissingSignature { index: 0 }));
    assert_eq!(
        builder.extract_transaction(),
        Err(ExtractError::IncompleteTransaction { index: 0 })
    );
}

#[test]
fn negative_output_leaves_outputs_unchanged() {
    let mut builder = TransactionBuilder::new(NetworkParams::bitcoin());
    builder.add_output(DESTINATION, 800).unwrap();
    let before = builder.outputs().to_vec();

    let err = builder.add_output(DESTINATION, -800).unwrap_err();
    assert_eq!(btc_paykit::Error::from(err).kind(), ErrorKind::InvalidAmount);
    assert_eq!(builder.outputs(), &before[..]);
}

#[test]
fn mixed_inputs_sign_with_all_prevouts() {
    let key = mainnet_key();
    let mut keys = BTreeMap::new();
    keys.insert(0, key.clone());
    keys.insert(1, key);

    let mut p2tr = fixture_utxo(AddressType::P2tr);
    p2tr.vout = 1;
    let bytes = build(
        Creator::new(),
        vec![fixture_utxo(AddressType::P2wpkh), p2tr],
        &[(DESTINATION, 1500)],
        &keys,
    )
    .unwrap();

    let tx: Transaction = encode::deserialize(&bytes).unwrap();
    assert_eq!(tx.input.len(), 2);
    assert_eq!(tx.input[0].witness.len(), 2);
    assert_eq!(tx.input[1].witness.len(), 1);
}

#[test]
fn build_reports_key_mismatch() {
    let mut keys = BTreeMap::new();
    keys.insert(0, crate::util::generator_key(NetworkParams::bitcoin()));

    let err = build(
        Creator::new(),
        vec![fixture_utxo(AddressType::P2wpkh)],
        &[(DESTINATION, 800)],
        &keys,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyMismatch);
}

#[test]
fn build_rejects_invalid_destination() {
    let mut keys = BTreeMap::new();
    keys.insert(0, mainnet_key());

    let err = build(
        Creator::new(),
        vec![fixture_utxo(AddressType::P2wpkh)],
        &[("tb1qlqvtwpu2servhtchh26f9u09uav2w835ptav0k", 800)],
        &keys,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAddress);
}
