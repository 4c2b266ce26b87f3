// SPDX-License-Identifier: CC0-1.0

//! Transaction builder errors.

use core::fmt;

use bitcoin::script::PushBytesError;
use bitcoin::{hex, secp256k1, sighash, transaction, Amount};

use crate::address::ParseAddressError;
use crate::error::write_err;
use crate::script::ScriptType;

/// Input index out of bounds (actual index, length of the inputs vector).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct IndexOutOfBoundsError {
    /// Attempted index access.
    pub index: usize,
    /// Length of the inputs vector.
    pub length: usize,
}

impl fmt::Display for IndexOutOfBoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index {} is out-of-bounds for inputs vector length {}", self.index, self.length)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IndexOutOfBoundsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> { None }
}

/// Inputs and outputs can not be added once an input carries a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct NotModifiableError;

impl fmt::Display for NotModifiableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("transaction has signatures, inputs and outputs are no longer modifiable")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NotModifiableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> { None }
}

/// An amount outside the range `0..=MAX_MONEY`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AmountError {
    /// Amount is negative (in satoshis).
    Negative(i64),
    /// Amount exceeds 21 million bitcoin.
    ExceedsMaxMoney(Amount),
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AmountError::*;

        match *self {
            Negative(sat) => write!(f, "negative amount {} sat", sat),
            ExceedsMaxMoney(amount) =>
                write!(f, "amount {} exceeds the maximum {}", amount, Amount::MAX_MONEY),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use AmountError::*;

        match *self {
            Negative(_) | ExceedsMaxMoney(_) => None,
        }
    }
}

/// Error parsing a [`Utxo`](super::Utxo) from hex strings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseUtxoError {
    /// Invalid txid hex.
    Txid(hex::HexToArrayError),
    /// Invalid script hex.
    ScriptPubkey(hex::HexToBytesError),
}

impl fmt::Display for ParseUtxoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseUtxoError::*;

        match *self {
            Txid(ref e) => write_err!(f, "invalid utxo txid"; e),
            ScriptPubkey(ref e) => write_err!(f, "invalid utxo script_pubkey"; e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseUtxoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use ParseUtxoError::*;

        match *self {
            Txid(ref e) => Some(e),
            ScriptPubkey(ref e) => Some(e),
        }
    }
}

/// Error adding an input to the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AddInputError {
    /// Signatures exist.
    NotModifiable(NotModifiableError),
    /// The UTXO value is out of range.
    InvalidAmount(AmountError),
}

impl fmt::Display for AddInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AddInputError::*;

        match *self {
            NotModifiable(ref e) => write_err!(f, "can not add input"; e),
            InvalidAmount(ref e) => write_err!(f, "invalid utxo value"; e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AddInputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use AddInputError::*;

        match *self {
            NotModifiable(ref e) => Some(e),
            InvalidAmount(ref e) => Some(e),
        }
    }
}

impl From<NotModifiableError> for AddInputError {
    fn from(e: NotModifiableError) -> Self { Self::NotModifiable(e) }
}

impl From<AmountError> for AddInputError {
    fn from(e: AmountError) -> Self { Self::InvalidAmount(e) }
}

/// Error adding an output to the builder.
#[derive(Debug)]
#[non_exhaustive]
pub enum AddOutputError {
    /// Signatures exist.
    NotModifiable(NotModifiableError),
    /// The address does not decode for the builder's network.
    InvalidAddress(ParseAddressError),
    /// The value is negative or exceeds 21 million bitcoin.
    InvalidAmount(AmountError),
}

impl fmt::Display for AddOutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AddOutputError::*;

        match *self {
            NotModifiable(ref e) => write_err!(f, "can not add output"; e),
            InvalidAddress(ref e) => write_err!(f, "invalid output address"; e),
            InvalidAmount(ref e) => write_err!(f, "invalid output value"; e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AddOutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use AddOutputError::*;

        match *self {
            NotModifiable(ref e) => Some(e),
            InvalidAddress(ref e) => Some(e),
            InvalidAmount(ref e) => Some(e),
        }
    }
}

impl From<NotModifiableError> for AddOutputError {
    fn from(e: NotModifiableError) -> Self { Self::NotModifiable(e) }
}

impl From<ParseAddressError> for AddOutputError {
    fn from(e: ParseAddressError) -> Self { Self::InvalidAddress(e) }
}

impl From<AmountError> for AddOutputError {
    fn from(e: AmountError) -> Self { Self::InvalidAmount(e) }
}

/// Error signing an input.
#[derive(Debug)]
#[non_exhaustive]
pub enum SignError {
    /// Input index out of bounds.
    IndexOutOfBounds(IndexOutOfBoundsError),
    /// The input is already finalized.
    AlreadyFinalized {
        /// Index of the input.
        index: usize,
    },
    /// The input spends a script none of the templates match.
    UnsupportedScriptType {
        /// Index of the input.
        index: usize,
    },
    /// The key does not control the output this input spends.
    KeyMismatch {
        /// Index of the input.
        index: usize,
        /// Type of the script being spent.
        script_type: ScriptType,
    },
    /// Legacy sighash computation error.
    LegacySighash(transaction::InputsIndexError),
    /// Segwit v0 sighash computation error.
    SegwitV0Sighash(sighash::P2wpkhError),
    /// Taproot sighash computation error.
    TaprootSighash(sighash::TaprootError),
    /// The signature failed to verify against the sighash.
    Verification(secp256k1::Error),
}

impl fmt::Display for SignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SignError::*;

        match *self {
            IndexOutOfBounds(ref e) => write_err!(f, "index out of bounds"; e),
            AlreadyFinalized { index } => write!(f, "input {} is already finalized", index),
            UnsupportedScriptType { index } =>
                write!(f, "input {} spends an unsupported script type", index),
            KeyMismatch { index, script_type } =>
                write!(f, "key does not match the {} script spent by input {}", script_type, index),
            LegacySighash(ref e) => write_err!(f, "legacy sighash"; e),
            SegwitV0Sighash(ref e) => write_err!(f, "segwit v0 sighash"; e),
            TaprootSighash(ref e) => write_err!(f, "taproot sighash"; e),
            Verification(ref e) => write_err!(f, "signature verification failed"; e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use SignError::*;

        match *self {
            IndexOutOfBounds(ref e) => Some(e),
            LegacySighash(ref e) => Some(e),
            SegwitV0Sighash(ref e) => Some(e),
            TaprootSighash(ref e) => Some(e),
            Verification(ref e) => Some(e),
            AlreadyFinalized { .. } | UnsupportedScriptType { .. } | KeyMismatch { .. } => None,
        }
    }
}

impl From<IndexOutOfBoundsError> for SignError {
    fn from(e: IndexOutOfBoundsError) -> Self { Self::IndexOutOfBounds(e) }
}

impl From<transaction::InputsIndexError> for SignError {
    fn from(e: transaction::InputsIndexError) -> Self { Self::LegacySighash(e) }
}

impl From<sighash::P2wpkhError> for SignError {
    fn from(e: sighash::P2wpkhError) -> Self { Self::SegwitV0Sighash(e) }
}

impl From<sighash::TaprootError> for SignError {
    fn from(e: sighash::TaprootError) -> Self { Self::TaprootSighash(e) }
}

/// Error finalizing the inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FinalizeError {
    /// The input spends a script none of the templates match.
    UnsupportedScriptType {
        /// Index of the input.
        index: usize,
    },
    /// The input has not been signed.
    MissingSignature {
        /// Index of the input.
        index: usize,
    },
    /// Data could not be pushed onto the final script sig.
    ScriptPush(PushBytesError),
}

impl fmt::Display for FinalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FinalizeError::*;

        match *self {
            UnsupportedScriptType { index } =>
                write!(f, "can not finalize input {}, unsupported script type", index),
            MissingSignature { index } => write!(f, "input {} has not been signed", index),
            ScriptPush(ref e) => write_err!(f, "final script sig push"; e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FinalizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use FinalizeError::*;

        match *self {
            ScriptPush(ref e) => Some(e),
            UnsupportedScriptType { .. } | MissingSignature { .. } => None,
        }
    }
}

impl From<PushBytesError> for FinalizeError {
    fn from(e: PushBytesError) -> Self { Self::ScriptPush(e) }
}
