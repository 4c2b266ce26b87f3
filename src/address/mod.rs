// SPDX-License-Identifier: CC0-1.0

//! Addresses.
//!
//! Derives addresses from a public key for the four supported templates, and decodes address
//! strings back into output scripts (see [`Address::from_str_network`] and [`is_valid`]).
//!
//! # Templates
//!
//! - [`AddressType::P2pkh`]: `Base58Check(p2pkh_prefix || HASH160(pubkey))`.
//! - [`AddressType::P2shP2wpkh`]: the P2WPKH locking script is used as the redeem script,
//!   `Base58Check(p2sh_prefix || HASH160(redeem_script))`.
//! - [`AddressType::P2wpkh`]: `Bech32(hrp, 0, HASH160(pubkey))`.
//! - [`AddressType::P2tr`]: the x-only public key is the internal key, tweaked with an empty
//!   merkle root as per BIP-341, `Bech32m(hrp, 1, output_key)`.

mod decode;
mod error;

use core::fmt;
use core::str::FromStr;

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;

use bitcoin::base58;
use bitcoin::bech32::{segwit, Fe32, Hrp};
use bitcoin::key::TapTweak;
use bitcoin::secp256k1::{self, Secp256k1, Verification, XOnlyPublicKey};
use bitcoin::ScriptBuf;

use crate::network::NetworkParams;
use crate::script::{self, ScriptType};

#[rustfmt::skip]                // Keep public exports separate.
pub use self::{
    decode::{is_valid, to_output_script},
    error::{DeriveError, ParseAddressError, ParseAddressTypeError},
};

/// The address templates this crate can derive and spend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub enum AddressType {
    /// Legacy pay-to-pubkey-hash.
    P2pkh,
    /// Pay-to-witness-pubkey-hash nested in pay-to-script-hash.
    P2shP2wpkh,
    /// Native pay-to-witness-pubkey-hash.
    P2wpkh,
    /// Key-path only pay-to-taproot.
    P2tr,
}

impl AddressType {
    /// All address types, in the order the demos print them.
    pub const ALL: [AddressType; 4] =
        [AddressType::P2pkh, AddressType::P2shP2wpkh, AddressType::P2wpkh, AddressType::P2tr];

    /// The [`ScriptType`] of the output script an address of this type locks to.
    pub fn script_type(&self) -> ScriptType {
        use AddressType::*;

        match self {
            P2pkh => ScriptType::P2pkh,
            P2shP2wpkh => ScriptType::P2sh,
            P2wpkh => ScriptType::P2wpkh,
            P2tr => ScriptType::P2tr,
        }
    }

    /// The address type a single key spends outputs of `script_type` with, if any.
    pub fn from_script_type(script_type: ScriptType) -> Option<Self> {
        use AddressType::*;

        match script_type {
            ScriptType::P2pkh => Some(P2pkh),
            ScriptType::P2sh => Some(P2shP2wpkh),
            ScriptType::P2wpkh => Some(P2wpkh),
            ScriptType::P2tr => Some(P2tr),
            ScriptType::Unsupported => None,
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AddressType::*;

        let s = match *self {
            P2pkh => "p2pkh",
            P2shP2wpkh => "p2sh-p2wpkh",
            P2wpkh => "p2wpkh",
            P2tr => "p2tr",
        };
        f.write_str(s)
    }
}

impl FromStr for AddressType {
    type Err = ParseAddressTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use AddressType::*;

        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "p2pkh" => Ok(P2pkh),
            "p2sh-p2wpkh" => Ok(P2shP2wpkh),
            "p2wpkh" => Ok(P2wpkh),
            "p2tr" => Ok(P2tr),
            _ => Err(ParseAddressTypeError::Unknown(s.to_owned())),
        }
    }
}

/// Numeric selectors: `0 = P2PKH, 1 = P2WPKH, 2 = P2TR, 3 = P2SH-P2WPKH`.
impl TryFrom<u8> for AddressType {
    type Error = ParseAddressTypeError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        use AddressType::*;

        match n {
            0 => Ok(P2pkh),
            1 => Ok(P2wpkh),
            2 => Ok(P2tr),
            3 => Ok(P2shP2wpkh),
            _ => Err(ParseAddressTypeError::UnknownSelector(n)),
        }
    }
}

/// The data an address encodes, enough to reconstruct the output script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payload {
    /// HASH160 of a public key (P2PKH).
    PubkeyHash([u8; 20]),
    /// HASH160 of a redeem script (P2SH).
    ScriptHash([u8; 20]),
    /// A segwit witness program.
    WitnessProgram {
        /// Witness version, 0 to 16 inclusive.
        version: u8,
        /// Witness program, 2 to 40 bytes.
        program: Vec<u8>,
    },
}

impl Payload {
    /// The output script this payload locks to.
    pub fn script_pubkey(&self) -> ScriptBuf {
        match *self {
            Payload::PubkeyHash(ref hash) => script::p2pkh(hash),
            Payload::ScriptHash(ref hash) => script::p2sh(hash),
            Payload::WitnessProgram { version, ref program } =>
                script::witness_program(version, program),
        }
    }

    /// Encodes this payload as an address string for `network`.
    fn encode(&self, network: &NetworkParams) -> Result<String, DeriveError> {
        match *self {
            Payload::PubkeyHash(ref hash) => Ok(base58_encode(network.p2pkh_prefix, hash)),
            Payload::ScriptHash(ref hash) => Ok(base58_encode(network.p2sh_prefix, hash)),
            Payload::WitnessProgram { version, ref program } => {
                let hrp = Hrp::parse(&network.hrp).map_err(DeriveError::InvalidHrp)?;
                let version =
                    Fe32::try_from(version).map_err(|_| DeriveError::InvalidWitnessVersion(version))?;
                // Picks Bech32 for version 0 and Bech32m for anything later.
                segwit::encode(hrp, version, program).map_err(DeriveError::Bech32)
            }
        }
    }
}

fn base58_encode(prefix: u8, hash: &[u8; 20]) -> String {
    let mut data = [0u8; 21];
    data[0] = prefix;
    data[1..].copy_from_slice(hash);
    base58::encode_check(&data)
}

/// A Bitcoin address, the encoded string along with the payload it decodes to.
///
/// Addresses parsed from a string keep the string as given, so an uppercase Bech32 address stays
/// uppercase. Two addresses that differ only in case lock to the same output script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    payload: Payload,
    encoded: String,
}

impl Address {
    /// Derives the address of `address_type` for `pubkey` on `network`.
    pub fn derive(
        pubkey: &secp256k1::PublicKey,
        address_type: AddressType,
        network: &NetworkParams,
    ) -> Result<Self, DeriveError> {
        let secp = Secp256k1::verification_only();
        Self::derive_with_context(&secp, pubkey, address_type, network)
    }

    /// Derives an address, using an existing context for the taproot tweak.
    pub fn derive_with_context<C: Verification>(
        secp: &Secp256k1<C>,
        pubkey: &secp256k1::PublicKey,
        address_type: AddressType,
        network: &NetworkParams,
    ) -> Result<Self, DeriveError> {
        let payload = payload(secp, pubkey, address_type);
        let encoded = payload.encode(network)?;
        tracing::debug!(%address_type, address = %encoded, "derived address");

        Ok(Address { payload, encoded })
    }

    /// Decodes `s` as an address for `network`.
    ///
    /// Use [`is_valid`] if only a yes/no answer is needed.
    pub fn from_str_network(s: &str, network: &NetworkParams) -> Result<Self, ParseAddressError> {
        let payload = decode::decode(s, network)?;
        Ok(Address { payload, encoded: s.to_owned() })
    }

    /// Returns the payload this address encodes.
    pub fn payload(&self) -> &Payload { &self.payload }

    /// Returns the output script this address locks to.
    pub fn script_pubkey(&self) -> ScriptBuf { self.payload.script_pubkey() }

    /// Returns the address string.
    pub fn as_str(&self) -> &str { &self.encoded }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.encoded) }
}

/// Derives the address of `address_type` for `pubkey` on `network`.
///
/// Alias for [`Address::derive`].
pub fn derive(
    pubkey: &secp256k1::PublicKey,
    address_type: AddressType,
    network: &NetworkParams,
) -> Result<Address, DeriveError> {
    Address::derive(pubkey, address_type, network)
}

/// Returns the output script an address of `address_type` for `pubkey` locks to.
///
/// Output scripts do not depend on the network.
pub fn script_pubkey<C: Verification>(
    secp: &Secp256k1<C>,
    pubkey: &secp256k1::PublicKey,
    address_type: AddressType,
) -> ScriptBuf {
    payload(secp, pubkey, address_type).script_pubkey()
}

/// Returns the redeem script for `pubkey` if `address_type` is P2SH wrapped.
pub fn redeem_script(pubkey: &secp256k1::PublicKey, address_type: AddressType) -> Option<ScriptBuf> {
    match address_type {
        AddressType::P2shP2wpkh => Some(script::p2wpkh(&pubkey_hash(pubkey))),
        AddressType::P2pkh | AddressType::P2wpkh | AddressType::P2tr => None,
    }
}

/// Returns the taproot output key for a key-path only output with internal key `internal_key`.
pub fn taproot_output_key<C: Verification>(
    secp: &Secp256k1<C>,
    internal_key: XOnlyPublicKey,
) -> XOnlyPublicKey {
    let (tweaked, _parity) = internal_key.tap_tweak(secp, None);
    tweaked.to_x_only_public_key()
}

fn pubkey_hash(pubkey: &secp256k1::PublicKey) -> [u8; 20] { script::hash160(&pubkey.serialize()) }

/// The single dispatch point from address type to template.
fn payload<C: Verification>(
    secp: &Secp256k1<C>,
    pubkey: &secp256k1::PublicKey,
    address_type: AddressType,
) -> Payload {
    match address_type {
        AddressType::P2pkh => Payload::PubkeyHash(pubkey_hash(pubkey)),
        AddressType::P2shP2wpkh => {
            let redeem = script::p2wpkh(&pubkey_hash(pubkey));
            Payload::ScriptHash(script::hash160(redeem.as_bytes()))
        }
        AddressType::P2wpkh =>
            Payload::WitnessProgram { version: 0, program: pubkey_hash(pubkey).to_vec() },
        AddressType::P2tr => {
            let (internal_key, _parity) = pubkey.x_only_public_key();
            let output_key = taproot_output_key(secp, internal_key);
            Payload::WitnessProgram { version: 1, program: output_key.serialize().to_vec() }
        }
    }
}
