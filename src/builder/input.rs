// SPDX-License-Identifier: CC0-1.0

//! Builder inputs.

use core::str::FromStr;

use bitcoin::script::{Builder, PushBytes};
use bitcoin::{
    ecdsa, secp256k1, taproot, Amount, OutPoint, ScriptBuf, Sequence, TxIn, TxOut, Txid, Witness,
};

use crate::builder::error::{FinalizeError, ParseUtxoError};
use crate::script::ScriptType;

/// A reference to an unspent output, along with the value and script needed to sign for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct Utxo {
    /// The txid of the transaction that created the output.
    pub txid: Txid,
    /// The index of the output in that transaction.
    pub vout: u32,
    /// The value of the output.
    pub value: Amount,
    /// The output's locking script.
    pub script_pubkey: ScriptBuf,
}

impl Utxo {
    /// Creates a new `Utxo`.
    pub fn new(txid: Txid, vout: u32, value: Amount, script_pubkey: ScriptBuf) -> Self {
        Utxo { txid, vout, value, script_pubkey }
    }

    /// Creates a `Utxo` from a display hex txid and a hex encoded script.
    pub fn from_hex(
        txid: &str,
        vout: u32,
        value: Amount,
        script_pubkey: &str,
    ) -> Result<Self, ParseUtxoError> {
        let txid = Txid::from_str(txid).map_err(ParseUtxoError::Txid)?;
        let script_pubkey = ScriptBuf::from_hex(script_pubkey).map_err(ParseUtxoError::ScriptPubkey)?;
        Ok(Utxo { txid, vout, value, script_pubkey })
    }

    /// Returns the outpoint this UTXO is at.
    pub fn outpoint(&self) -> OutPoint { OutPoint { txid: self.txid, vout: self.vout } }

    /// Returns the output this UTXO refers to.
    pub fn tx_out(&self) -> TxOut {
        TxOut { value: self.value, script_pubkey: self.script_pubkey.clone() }
    }
}

/// The signature an input carries before it is finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputSignature {
    /// ECDSA signature along with the key it verifies against.
    Ecdsa { pubkey: secp256k1::PublicKey, signature: ecdsa::Signature },
    /// Taproot key-path signature.
    Schnorr(taproot::Signature),
}

/// An input of the transaction being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    utxo: Utxo,
    sequence: Sequence,
    script_type: ScriptType,
    pub(crate) signature: Option<InputSignature>,
    /// P2SH-P2WPKH redeem script, set when the input is signed.
    pub(crate) redeem_script: Option<ScriptBuf>,
    final_script_sig: Option<ScriptBuf>,
    final_script_witness: Option<Witness>,
}

impl Input {
    pub(crate) fn new(utxo: Utxo, sequence: Sequence) -> Self {
        let script_type = ScriptType::classify(&utxo.script_pubkey);
        Input {
            utxo,
            sequence,
            script_type,
            signature: None,
            redeem_script: None,
            final_script_sig: None,
            final_script_witness: None,
        }
    }

    /// Returns the UTXO this input spends.
    pub fn utxo(&self) -> &Utxo { &self.utxo }

    /// Returns the sequence number of this input.
    pub fn sequence(&self) -> Sequence { self.sequence }

    /// Returns the type of the script this input spends.
    pub fn script_type(&self) -> ScriptType { self.script_type }

    /// Returns true if this input carries a signature.
    pub fn is_signed(&self) -> bool { self.signature.is_some() }

    /// Returns true if this input has been finalized.
    ///
    /// A finalized input has both its final script sig and final witness set, for legacy inputs
    /// the witness is empty and for native segwit inputs the script sig is.
    pub fn is_finalized(&self) -> bool {
        self.final_script_sig.is_some() && self.final_script_witness.is_some()
    }

    /// Returns the final script sig, if finalized.
    pub fn final_script_sig(&self) -> Option<&ScriptBuf> { self.final_script_sig.as_ref() }

    /// Returns the final witness, if finalized.
    pub fn final_script_witness(&self) -> Option<&Witness> { self.final_script_witness.as_ref() }

    /// The input as it appears in the transaction before it is signed.
    pub(crate) fn unsigned_tx_in(&self) -> TxIn {
        TxIn {
            previous_output: self.utxo.outpoint(),
            script_sig: ScriptBuf::new(),
            sequence: self.sequence,
            witness: Witness::default(),
        }
    }

    /// The input as it appears in the extracted transaction.
    pub(crate) fn signed_tx_in(&self) -> TxIn {
        TxIn {
            previous_output: self.utxo.outpoint(),
            script_sig: self.final_script_sig.clone().unwrap_or_default(),
            sequence: self.sequence,
            witness: self.final_script_witness.clone().unwrap_or_default(),
        }
    }

    /// Checks that this input can be finalized.
    pub(crate) fn check_finalizable(&self, index: usize) -> Result<(), FinalizeError> {
        if !self.script_type.is_supported() {
            return Err(FinalizeError::UnsupportedScriptType { index });
        }
        if self.signature.is_none() {
            return Err(FinalizeError::MissingSignature { index });
        }
        Ok(())
    }

    /// Builds the final script sig and witness from the signature.
    ///
    /// Does not modify the input, see [`Input::set_final`].
    pub(crate) fn final_scripts(&self, index: usize) -> Result<(ScriptBuf, Witness), FinalizeError> {
        self.check_finalizable(index)?;

        let mut witness = Witness::new();
        let script_sig = match (self.script_type, &self.signature) {
            (ScriptType::P2pkh, Some(InputSignature::Ecdsa { pubkey, signature })) => Builder::new()
                .push_slice(signature.serialize())
                .push_key(&bitcoin::PublicKey::new(*pubkey))
                .into_script(),
            (ScriptType::P2wpkh, Some(InputSignature::Ecdsa { pubkey, signature })) => {
                witness.push(signature.to_vec());
                witness.push(pubkey.serialize());
                ScriptBuf::new()
            }
            (ScriptType::P2sh, Some(InputSignature::Ecdsa { pubkey, signature })) => {
                witness.push(signature.to_vec());
                witness.push(pubkey.serialize());
                let redeem = self
                    .redeem_script
                    .as_ref()
                    .ok_or(FinalizeError::MissingSignature { index })?;
                let redeem = <&PushBytes>::try_from(redeem.as_bytes())?;
                Builder::new().push_slice(redeem).into_script()
            }
            (ScriptType::P2tr, Some(InputSignature::Schnorr(signature))) => {
                witness.push(signature.to_vec());
                ScriptBuf::new()
            }
            // A signature of the wrong kind for the script is never stored.
            _ => return Err(FinalizeError::MissingSignature { index }),
        };

        Ok((script_sig, witness))
    }

    pub(crate) fn set_final(&mut self, script_sig: ScriptBuf, witness: Witness) {
        self.final_script_sig = Some(script_sig);
        self.final_script_witness = Some(witness);
    }
}
