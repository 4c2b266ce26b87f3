// SPDX-License-Identifier: CC0-1.0

//! Transaction extraction.
//!
//! A transaction can only be extracted once every input has been finalized. Extraction also
//! refuses transactions whose outputs exceed their inputs, or whose fee rate is above the
//! configured maximum (see [`Creator::max_fee_rate`](super::Creator::max_fee_rate)).

use core::fmt;

use alloc::string::String;
use alloc::vec::Vec;

use bitcoin::consensus::encode;
use bitcoin::{Amount, FeeRate, Transaction, Txid};

use crate::builder::TransactionBuilder;
use crate::error::write_err;

impl TransactionBuilder {
    /// Extracts the signed transaction and serializes it.
    pub fn extract_transaction(&self) -> Result<Vec<u8>, ExtractError> {
        Ok(encode::serialize(&self.extract_tx()?))
    }

    /// Extracts the signed transaction and serializes it as lowercase hex.
    pub fn extract_hex(&self) -> Result<String, ExtractError> {
        Ok(encode::serialize_hex(&self.extract_tx()?))
    }

    /// Returns the txid of the signed transaction.
    pub fn txid(&self) -> Result<Txid, ExtractError> { Ok(self.extract_tx()?.compute_txid()) }

    /// Extracts the signed [`Transaction`], checking the fee against the configured maximum rate.
    pub fn extract_tx(&self) -> Result<Transaction, ExtractError> {
        let tx = self.extract_tx_unchecked_fee_rate()?;
        let fee = self.fee()?;

        let fee_rate =
            FeeRate::from_sat_per_kwu(fee.to_sat().saturating_mul(1000) / tx.weight().to_wu());
        let max = self.config.max_fee_rate;
        if fee_rate > max {
            tracing::warn!(%fee, fee_rate = fee_rate.to_sat_per_vb_floor(), "refusing to extract");
            return Err(ExtractError::AbsurdFeeRate { fee_rate, max });
        }

        Ok(tx)
    }

    /// Extracts the signed [`Transaction`] without checking the fee rate.
    ///
    /// This can result in a transaction with absurdly high fees. Use with caution.
    pub fn extract_tx_unchecked_fee_rate(&self) -> Result<Transaction, ExtractError> {
        if self.inputs.is_empty() {
            return Err(ExtractError::NoInputs);
        }
        if self.outputs.is_empty() {
            return Err(ExtractError::NoOutputs);
        }
        if let Some(index) = self.inputs.iter().position(|input| !input.is_finalized()) {
            return Err(ExtractError::IncompleteTransaction { index });
        }

        let tx = Transaction {
            version: self.config.version,
            lock_time: self.config.lock_time,
            input: self.inputs.iter().map(|input| input.signed_tx_in()).collect(),
            output: self.outputs.iter().map(|output| output.tx_out()).collect(),
        };
        tracing::debug!(txid = %tx.compute_txid(), weight = tx.weight().to_wu(), "extracted transaction");

        Ok(tx)
    }

    /// Calculates the transaction fee.
    ///
    /// 'Fee' being the difference in value of the total inputs and the total outputs.
    pub fn fee(&self) -> Result<Amount, FeeError> {
        use FeeError::*;

        let mut input_value = Amount::ZERO;
        for input in &self.inputs {
            input_value = input_value.checked_add(input.utxo().value).ok_or(InputOverflow)?;
        }
        let mut output_value = Amount::ZERO;
        for output in &self.outputs {
            output_value = output_value.checked_add(output.amount).ok_or(OutputOverflow)?;
        }

        input_value.checked_sub(output_value).ok_or(Negative)
    }
}

/// Error extracting a transaction from the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtractError {
    /// The transaction has no inputs.
    NoInputs,
    /// The transaction has no outputs.
    NoOutputs,
    /// An input has not been finalized.
    IncompleteTransaction {
        /// Index of the first input not finalized.
        index: usize,
    },
    /// Error calculating the fee.
    Fee(FeeError),
    /// The fee rate exceeds the configured maximum.
    AbsurdFeeRate {
        /// Calculated fee rate.
        fee_rate: FeeRate,
        /// Maximum allowed fee rate.
        max: FeeRate,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ExtractError::*;

        match *self {
            NoInputs => f.write_str("transaction has no inputs"),
            NoOutputs => f.write_str("transaction has no outputs"),
            IncompleteTransaction { index } =>
                write!(f, "attempted to extract transaction with input {} not finalized", index),
            Fee(ref e) => write_err!(f, "fee calculation"; e),
            AbsurdFeeRate { fee_rate, max } => write!(
                f,
                "fee rate {} sat/vB is greater than max {} sat/vB",
                fee_rate.to_sat_per_vb_floor(),
                max.to_sat_per_vb_floor()
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use ExtractError::*;

        match *self {
            Fee(ref e) => Some(e),
            NoInputs | NoOutputs | IncompleteTransaction { .. } | AbsurdFeeRate { .. } => None,
        }
    }
}

impl From<FeeError> for ExtractError {
    fn from(e: FeeError) -> Self { Self::Fee(e) }
}

/// Error calculating the transaction fee.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FeeError {
    /// Integer overflow in fee calculation adding input.
    InputOverflow,
    /// Integer overflow in fee calculation adding output.
    OutputOverflow,
    /// Outputs exceed inputs.
    Negative,
}

impl fmt::Display for FeeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FeeError::*;

        match *self {
            InputOverflow => f.write_str("integer overflow in fee calculation adding input"),
            OutputOverflow => f.write_str("integer overflow in fee calculation adding output"),
            Negative => f.write_str("transaction has a negative fee which is not allowed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FeeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use FeeError::*;

        match *self {
            InputOverflow | OutputOverflow | Negative => None,
        }
    }
}
