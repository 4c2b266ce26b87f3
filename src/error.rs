// SPDX-License-Identifier: CC0-1.0

use core::fmt;

use crate::address::{DeriveError, ParseAddressError, ParseAddressTypeError};
use crate::builder::{
    AddInputError, AddOutputError, ExtractError, FinalizeError, ParseUtxoError, SignError,
};
use crate::key::WifError;

/// The class of an [`Error`], for callers that only need to branch on what went wrong.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Unknown address type selector, or an unparseable UTXO reference.
    InvalidArgument,
    /// Undecodable address string, or an address that can not be encoded.
    InvalidAddress,
    /// Negative or out-of-range amount.
    InvalidAmount,
    /// The signing key does not control the output being spent.
    KeyMismatch,
    /// Finalize attempted before sign.
    MissingSignature,
    /// The script being spent matches none of the supported templates.
    UnsupportedScriptType,
    /// Serialization attempted before finalization.
    IncompleteTransaction,
    /// Undecodable, uncompressed, or wrong network private key.
    InvalidKey,
    /// Input index out of bounds.
    IndexOutOfBounds,
    /// Inputs or outputs added after signing.
    NotModifiable,
    /// Input signed after it was finalized.
    AlreadyFinalized,
    /// Sighash computation or signature verification failed.
    Sighash,
    /// Negative fee, or a fee rate above the configured maximum.
    Fee,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Debug::fmt(self, f) }
}

/// Any error returned by this crate.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error decoding a WIF private key.
    Wif(WifError),
    /// Error parsing an address type.
    ParseAddressType(ParseAddressTypeError),
    /// Error deriving an address.
    Derive(DeriveError),
    /// Error decoding an address.
    ParseAddress(ParseAddressError),
    /// Error parsing a UTXO reference.
    ParseUtxo(ParseUtxoError),
    /// Error adding an input.
    AddInput(AddInputError),
    /// Error adding an output.
    AddOutput(AddOutputError),
    /// Error signing an input.
    Sign(SignError),
    /// Error finalizing the inputs.
    Finalize(FinalizeError),
    /// Error extracting the transaction.
    Extract(ExtractError),
}

impl Error {
    /// Returns the class of this error.
    pub fn kind(&self) -> ErrorKind {
        use ErrorKind::*;

        match *self {
            Error::Wif(_) => InvalidKey,
            Error::ParseAddressType(_) | Error::ParseUtxo(_) => InvalidArgument,
            Error::Derive(_) | Error::ParseAddress(_) => InvalidAddress,
            Error::AddInput(ref e) => match *e {
                AddInputError::NotModifiable(_) => NotModifiable,
                AddInputError::InvalidAmount(_) => InvalidAmount,
            },
            Error::AddOutput(ref e) => match *e {
                AddOutputError::NotModifiable(_) => NotModifiable,
                AddOutputError::InvalidAddress(_) => InvalidAddress,
                AddOutputError::InvalidAmount(_) => InvalidAmount,
            },
            Error::Sign(ref e) => match *e {
                SignError::IndexOutOfBounds(_) => IndexOutOfBounds,
                SignError::AlreadyFinalized { .. } => AlreadyFinalized,
                SignError::UnsupportedScriptType { .. } => UnsupportedScriptType,
                SignError::KeyMismatch { .. } => KeyMismatch,
                SignError::LegacySighash(_)
                | SignError::SegwitV0Sighash(_)
                | SignError::TaprootSighash(_)
                | SignError::Verification(_) => Sighash,
            },
            Error::Finalize(ref e) => match *e {
                FinalizeError::UnsupportedScriptType { .. } => UnsupportedScriptType,
                FinalizeError::MissingSignature { .. } => MissingSignature,
                FinalizeError::ScriptPush(_) => InvalidArgument,
            },
            Error::Extract(ref e) => match *e {
                ExtractError::NoInputs
                | ExtractError::NoOutputs
                | ExtractError::IncompleteTransaction { .. } => IncompleteTransaction,
                ExtractError::Fee(_) | ExtractError::AbsurdFeeRate { .. } => Fee,
            },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;

        match *self {
            Wif(ref e) => write_err!(f, "private key"; e),
            ParseAddressType(ref e) => write_err!(f, "address type"; e),
            Derive(ref e) => write_err!(f, "address derivation"; e),
            ParseAddress(ref e) => write_err!(f, "address decoding"; e),
            ParseUtxo(ref e) => write_err!(f, "utxo"; e),
            AddInput(ref e) => write_err!(f, "add input"; e),
            AddOutput(ref e) => write_err!(f, "add output"; e),
            Sign(ref e) => write_err!(f, "sign"; e),
            Finalize(ref e) => write_err!(f, "finalize"; e),
            Extract(ref e) => write_err!(f, "extract"; e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use Error::*;

        match *self {
            Wif(ref e) => Some(e),
            ParseAddressType(ref e) => Some(e),
            Derive(ref e) => Some(e),
            ParseAddress(ref e) => Some(e),
            ParseUtxo(ref e) => Some(e),
            AddInput(ref e) => Some(e),
            AddOutput(ref e) => Some(e),
            Sign(ref e) => Some(e),
            Finalize(ref e) => Some(e),
            Extract(ref e) => Some(e),
        }
    }
}

impl From<WifError> for Error {
    fn from(e: WifError) -> Self { Self::Wif(e) }
}

impl From<ParseAddressTypeError> for Error {
    fn from(e: ParseAddressTypeError) -> Self { Self::ParseAddressType(e) }
}

impl From<DeriveError> for Error {
    fn from(e: DeriveError) -> Self { Self::Derive(e) }
}

impl From<ParseAddressError> for Error {
    fn from(e: ParseAddressError) -> Self { Self::ParseAddress(e) }
}

impl From<ParseUtxoError> for Error {
    fn from(e: ParseUtxoError) -> Self { Self::ParseUtxo(e) }
}

impl From<AddInputError> for Error {
    fn from(e: AddInputError) -> Self { Self::AddInput(e) }
}

impl From<AddOutputError> for Error {
    fn from(e: AddOutputError) -> Self { Self::AddOutput(e) }
}

impl From<SignError> for Error {
    fn from(e: SignError) -> Self { Self::Sign(e) }
}

impl From<FinalizeError> for Error {
    fn from(e: FinalizeError) -> Self { Self::Finalize(e) }
}

impl From<ExtractError> for Error {
    fn from(e: ExtractError) -> Self { Self::Extract(e) }
}

/// Formats error.
///
/// If `std` feature is OFF appends error source (delimited by `: `). We do this because
/// `e.source()` is only available in std builds, without this macro the error source is lost for
/// no-std builds.
macro_rules! write_err {
    ($writer:expr, $string:literal $(, $args:expr)*; $source:expr) => {
        {
            #[cfg(feature = "std")]
            {
                let _ = &$source;   // Prevents clippy warnings.
                write!($writer, $string $(, $args)*)
            }
            #[cfg(not(feature = "std"))]
            {
                write!($writer, concat!($string, ": {}") $(, $args)*, $source)
            }
        }
    }
}
pub(crate) use write_err;
