// SPDX-License-Identifier: CC0-1.0

//! Bitcoin keys, addresses, and single-key transaction signing.
//!
//! This crate covers the round trip most demo wallets need:
//!
//! - Create or import key material ([`PrivateKey`]), export it as WIF.
//! - Derive an [`Address`] for one of four script templates ([`AddressType`]): legacy P2PKH,
//!   P2WPKH nested in P2SH, native P2WPKH, and key-path only P2TR as defined in [BIP-341].
//! - Check whether an address string is valid for a network ([`address::is_valid`]).
//! - Build, sign, finalize, and serialize a transaction spending outputs locked to those
//!   templates ([`builder`]).
//!
//! The target network is always explicit, see [`NetworkParams`].
//!
//! Cryptographic primitives (secp256k1, hashing, Base58Check, Bech32, sighash algorithms, and
//! consensus serialization) come from [`rust-bitcoin`].
//!
//! [BIP-341]: <https://github.com/bitcoin/bips/blob/master/bip-0341.mediawiki>
//! [`rust-bitcoin`]: <https://github.com/rust-bitcoin/rust-bitcoin>

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
// Coding conventions
#![warn(missing_docs)]
// Exclude clippy lints we don't think are valuable
#![allow(clippy::needless_question_mark)] // https://github.com/rust-bitcoin/rust-bitcoin/pull/2134

#[macro_use]
extern crate alloc;

#[cfg(feature = "serde")]
#[macro_use]
extern crate actual_serde as serde;

/// Re-export of the `rust-bitcoin` crate.
pub extern crate bitcoin;

mod error;

pub mod address;
pub mod builder;
pub mod key;
pub mod network;
pub mod script;

#[rustfmt::skip]                // Keep public re-exports separate.
pub use crate::{
    address::{Address, AddressType},
    builder::{build, Creator, TransactionBuilder, Utxo},
    error::{Error, ErrorKind},
    key::PrivateKey,
    network::NetworkParams,
    script::ScriptType,
};
