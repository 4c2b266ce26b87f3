// SPDX-License-Identifier: CC0-1.0

//! Address errors.

use core::fmt;

use alloc::string::String;

use bitcoin::base58;
use bitcoin::bech32::primitives::hrp;
use bitcoin::bech32::segwit;

use crate::error::write_err;

/// Error parsing an [`AddressType`](super::AddressType).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseAddressTypeError {
    /// Name is not one of `p2pkh`, `p2sh-p2wpkh`, `p2wpkh`, `p2tr`.
    Unknown(String),
    /// Numeric selector is greater than 3.
    UnknownSelector(u8),
}

impl fmt::Display for ParseAddressTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseAddressTypeError::*;

        match *self {
            Unknown(ref s) => write!(f, "unknown address type: {}", s),
            UnknownSelector(n) => write!(f, "unknown address type selector: {}", n),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseAddressTypeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use ParseAddressTypeError::*;

        match *self {
            Unknown(_) | UnknownSelector(_) => None,
        }
    }
}

/// Error deriving an address from a public key.
///
/// Only reachable with custom [`NetworkParams`](crate::NetworkParams), the well known networks
/// always encode.
#[derive(Debug)]
#[non_exhaustive]
pub enum DeriveError {
    /// The network's human-readable part is not valid Bech32.
    InvalidHrp(hrp::Error),
    /// Witness version is greater than 16.
    InvalidWitnessVersion(u8),
    /// Bech32 encoding failed.
    Bech32(segwit::EncodeError),
}

impl fmt::Display for DeriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DeriveError::*;

        match *self {
            InvalidHrp(ref e) => write_err!(f, "invalid bech32 human-readable part"; e),
            InvalidWitnessVersion(v) => write!(f, "invalid witness version {}", v),
            Bech32(ref e) => write_err!(f, "bech32 encoding failed"; e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DeriveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use DeriveError::*;

        match *self {
            InvalidHrp(ref e) => Some(e),
            Bech32(ref e) => Some(e),
            InvalidWitnessVersion(_) => None,
        }
    }
}

/// Error decoding an address string for a network.
#[derive(Debug)]
#[non_exhaustive]
pub enum ParseAddressError {
    /// The address string is empty.
    Empty,
    /// Not valid Base58Check, and not Bech32 either.
    Base58(base58::Error),
    /// Base58Check payload is not a version byte followed by a 20 byte hash.
    InvalidBase58PayloadLength(usize),
    /// Base58Check version byte is neither the network's P2PKH nor its P2SH prefix.
    UnknownVersionByte(u8),
    /// Valid Bech32 but for another network.
    WrongHrp(String),
    /// Bech32 decoding failed (bad checksum, checksum variant, witness version or length).
    Bech32(segwit::DecodeError),
    /// A version 1 witness program that is not 32 bytes long.
    InvalidTaprootProgramLength(usize),
}

impl fmt::Display for ParseAddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseAddressError::*;

        match *self {
            Empty => f.write_str("empty address string"),
            Base58(ref e) => write_err!(f, "invalid base58check address"; e),
            InvalidBase58PayloadLength(len) =>
                write!(f, "base58check address payload has length {}, expected 21", len),
            UnknownVersionByte(b) => write!(f, "unknown address version byte {:#04x}", b),
            WrongHrp(ref prefix) => write!(f, "bech32 address has foreign prefix {}", prefix),
            Bech32(ref e) => write_err!(f, "invalid bech32 address"; e),
            InvalidTaprootProgramLength(len) =>
                write!(f, "witness v1 program has length {}, expected 32", len),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseAddressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use ParseAddressError::*;

        match *self {
            Base58(ref e) => Some(e),
            Bech32(ref e) => Some(e),
            Empty
            | InvalidBase58PayloadLength(_)
            | UnknownVersionByte(_)
            | WrongHrp(_)
            | InvalidTaprootProgramLength(_) => None,
        }
    }
}
