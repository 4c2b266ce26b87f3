// SPDX-License-Identifier: CC0-1.0

//! Locking script templates.
//!
//! Builds the four output scripts this crate can derive and spend, and classifies arbitrary
//! output scripts so the builder knows how to sign and finalize an input.

use core::fmt;

use alloc::vec::Vec;

use bitcoin::hashes::{hash160, Hash};
use bitcoin::opcodes::all::{
    OP_CHECKSIG, OP_DUP, OP_EQUAL, OP_EQUALVERIFY, OP_HASH160, OP_PUSHBYTES_0, OP_PUSHNUM_1,
};
use bitcoin::script::{Builder, Script, ScriptBuf};

/// Computes HASH160 i.e., RIPEMD160(SHA256(data)).
pub fn hash160(data: &[u8]) -> [u8; 20] { hash160::Hash::hash(data).to_byte_array() }

/// `OP_DUP OP_HASH160 <pubkey_hash> OP_EQUALVERIFY OP_CHECKSIG`
pub fn p2pkh(pubkey_hash: &[u8; 20]) -> ScriptBuf {
    Builder::new()
        .push_opcode(OP_DUP)
        .push_opcode(OP_HASH160)
        .push_slice(pubkey_hash)
        .push_opcode(OP_EQUALVERIFY)
        .push_opcode(OP_CHECKSIG)
        .into_script()
}

/// `OP_HASH160 <script_hash> OP_EQUAL`
pub fn p2sh(script_hash: &[u8; 20]) -> ScriptBuf {
    Builder::new()
        .push_opcode(OP_HASH160)
        .push_slice(script_hash)
        .push_opcode(OP_EQUAL)
        .into_script()
}

/// `OP_0 <pubkey_hash>`
pub fn p2wpkh(pubkey_hash: &[u8; 20]) -> ScriptBuf {
    Builder::new().push_opcode(OP_PUSHBYTES_0).push_slice(pubkey_hash).into_script()
}

/// `OP_1 <output_key>`, `output_key` being the tweaked x-only key.
pub fn p2tr(output_key: &[u8; 32]) -> ScriptBuf {
    Builder::new().push_opcode(OP_PUSHNUM_1).push_slice(output_key).into_script()
}

/// Builds a witness program output script for any witness version.
///
/// Caller guarantees `version <= 16` and `2 <= program.len() <= 40` (see BIP-141), both hold for
/// anything the address decoder accepts.
pub(crate) fn witness_program(version: u8, program: &[u8]) -> ScriptBuf {
    debug_assert!(version <= 16);
    debug_assert!((2..=40).contains(&program.len()));

    let version_opcode = if version == 0 { 0x00 } else { 0x50 + version };
    let mut bytes = Vec::with_capacity(program.len() + 2);
    bytes.push(version_opcode);
    // Programs are at most 40 bytes so the push is always a direct OP_PUSHBYTES_N.
    bytes.push(program.len() as u8);
    bytes.extend_from_slice(program);
    ScriptBuf::from_bytes(bytes)
}

/// The kind of output script being spent by a transaction input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub enum ScriptType {
    /// Pay-to-pubkey-hash.
    P2pkh,
    /// Pay-to-script-hash, only spendable here if the redeem script is P2WPKH.
    P2sh,
    /// Pay-to-witness-pubkey-hash.
    P2wpkh,
    /// Pay-to-taproot.
    P2tr,
    /// Any other script, we do not know how to sign or finalize these.
    Unsupported,
}

impl ScriptType {
    /// Classifies `script_pubkey`.
    pub fn classify(script_pubkey: &Script) -> Self {
        use ScriptType::*;

        if script_pubkey.is_p2pkh() {
            P2pkh
        } else if script_pubkey.is_p2sh() {
            P2sh
        } else if script_pubkey.is_p2wpkh() {
            P2wpkh
        } else if script_pubkey.is_p2tr() {
            P2tr
        } else {
            Unsupported
        }
    }

    /// Returns true if inputs spending this script type can be signed and finalized.
    pub fn is_supported(&self) -> bool { *self != ScriptType::Unsupported }

    /// Returns true if spending this script type requires witness data.
    pub fn is_segwit(&self) -> bool {
        use ScriptType::*;

        // Every P2SH output we know how to spend wraps P2WPKH.
        matches!(self, P2sh | P2wpkh | P2tr)
    }

    /// The signing algorithm used to spend this script type.
    pub fn signing_algorithm(&self) -> Option<SigningAlgorithm> {
        use ScriptType::*;

        match self {
            P2pkh | P2sh | P2wpkh => Some(SigningAlgorithm::Ecdsa),
            P2tr => Some(SigningAlgorithm::Schnorr),
            Unsupported => None,
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ScriptType::*;

        let s = match *self {
            P2pkh => "p2pkh",
            P2sh => "p2sh",
            P2wpkh => "p2wpkh",
            P2tr => "p2tr",
            Unsupported => "unsupported",
        };
        f.write_str(s)
    }
}

/// Signing algorithms supported by the Bitcoin network.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SigningAlgorithm {
    /// The Elliptic Curve Digital Signature Algorithm, used by legacy and segwit v0 outputs.
    Ecdsa,
    /// BIP-340 Schnorr signatures, used by taproot outputs.
    Schnorr,
}

#[cfg(test)]
mod tests {
    use bitcoin::hex::{DisplayHex, FromHex};

    use super::*;

    // HASH160 of the compressed generator point.
    const GENERATOR_HASH: &str = "751e76e8199196d454941c45d1b3a323f1433bd6";

    fn generator_hash() -> [u8; 20] { <[u8; 20]>::from_hex(GENERATOR_HASH).unwrap() }

    #[test]
    fn hash160_generator_point() {
        let pk = Vec::from_hex("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
            .unwrap();
        assert_eq!(hash160(&pk).to_lower_hex_string(), GENERATOR_HASH);
    }

    #[test]
    fn templates_have_expected_bytes() {
        let hash = generator_hash();

        assert_eq!(
            p2pkh(&hash).as_bytes().to_lower_hex_string(),
            format!("76a914{}88ac", GENERATOR_HASH)
        );
        assert_eq!(p2sh(&hash).as_bytes().to_lower_hex_string(), format!("a914{}87", GENERATOR_HASH));
        assert_eq!(p2wpkh(&hash).as_bytes().to_lower_hex_string(), format!("0014{}", GENERATOR_HASH));

        let key = [0xab_u8; 32];
        assert_eq!(p2tr(&key).as_bytes()[..2], [0x51, 0x20]);
        assert_eq!(p2tr(&key).len(), 34);
    }

    #[test]
    fn witness_program_matches_templates() {
        let hash = generator_hash();
        assert_eq!(witness_program(0, &hash), p2wpkh(&hash));

        let key = [0x01_u8; 32];
        assert_eq!(witness_program(1, &key), p2tr(&key));

        let future = witness_program(16, &[0xff, 0xee]);
        assert_eq!(future.as_bytes(), &[0x60, 0x02, 0xff, 0xee]);
    }

    #[test]
    fn classify_templates() {
        let hash = generator_hash();

        assert_eq!(ScriptType::classify(&p2pkh(&hash)), ScriptType::P2pkh);
        assert_eq!(ScriptType::classify(&p2sh(&hash)), ScriptType::P2sh);
        assert_eq!(ScriptType::classify(&p2wpkh(&hash)), ScriptType::P2wpkh);
        assert_eq!(ScriptType::classify(&p2tr(&[0x02; 32])), ScriptType::P2tr);

        // P2WSH is a valid output we do not know how to spend.
        let p2wsh = witness_program(0, &[0x00; 32]);
        assert_eq!(ScriptType::classify(&p2wsh), ScriptType::Unsupported);
        assert_eq!(ScriptType::classify(&ScriptBuf::new()), ScriptType::Unsupported);
    }

    #[test]
    fn signing_algorithms() {
        assert_eq!(ScriptType::P2pkh.signing_algorithm(), Some(SigningAlgorithm::Ecdsa));
        assert_eq!(ScriptType::P2sh.signing_algorithm(), Some(SigningAlgorithm::Ecdsa));
        assert_eq!(ScriptType::P2wpkh.signing_algorithm(), Some(SigningAlgorithm::Ecdsa));
        assert_eq!(ScriptType::P2tr.signing_algorithm(), Some(SigningAlgorithm::Schnorr));
        assert_eq!(ScriptType::Unsupported.signing_algorithm(), None);
        assert!(!ScriptType::P2pkh.is_segwit());
        assert!(ScriptType::P2sh.is_segwit());
    }
}
