// SPDX-License-Identifier: CC0-1.0

//! Builder outputs.

use bitcoin::{Amount, ScriptBuf, TxOut};

use crate::builder::error::AmountError;

/// An output of the transaction being built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct Output {
    /// The output's amount.
    pub amount: Amount,
    /// The script for this output, also known as the scriptPubKey.
    pub script_pubkey: ScriptBuf,
}

impl Output {
    /// Creates a new `Output`.
    pub fn new(amount: Amount, script_pubkey: ScriptBuf) -> Self { Output { amount, script_pubkey } }

    /// Creates the [`TxOut`] associated with this `Output`.
    pub(crate) fn tx_out(&self) -> TxOut {
        TxOut { value: self.amount, script_pubkey: self.script_pubkey.clone() }
    }
}

/// Checks `sat` is in `0..=MAX_MONEY`.
pub(crate) fn checked_amount(sat: i64) -> Result<Amount, AmountError> {
    let sat = u64::try_from(sat).map_err(|_| AmountError::Negative(sat))?;
    check_max_money(Amount::from_sat(sat))
}

pub(crate) fn check_max_money(amount: Amount) -> Result<Amount, AmountError> {
    if amount > Amount::MAX_MONEY {
        return Err(AmountError::ExceedsMaxMoney(amount));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_range() {
        assert_eq!(checked_amount(0), Ok(Amount::ZERO));
        assert_eq!(checked_amount(800), Ok(Amount::from_sat(800)));
        assert_eq!(checked_amount(-1), Err(AmountError::Negative(-1)));

        let max = Amount::MAX_MONEY.to_sat() as i64;
        assert_eq!(checked_amount(max), Ok(Amount::MAX_MONEY));
        assert_eq!(
            checked_amount(max + 1),
            Err(AmountError::ExceedsMaxMoney(Amount::from_sat(max as u64 + 1)))
        );
        assert!(checked_amount(i64::MAX).is_err());
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serde_roundtrip() {
        let output = Output::new(Amount::from_sat(800), crate::script::p2wpkh(&[0xab; 20]));
        let json = serde_json::to_string(&output).unwrap();
        let back: Output = serde_json::from_str(&json).unwrap();
        assert_eq!(back, output);
    }
}
