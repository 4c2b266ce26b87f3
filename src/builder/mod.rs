// SPDX-License-Identifier: CC0-1.0

//! Single-key transaction building and signing.
//!
//! A transaction moves through the following roles, loosely modelled on [BIP-174]:
//!
//! - The **Creator** role: use the [`Creator`] type to pick the network and transaction
//!   parameters, or just use [`TransactionBuilder::new`] for the defaults.
//! - The **Constructor** role: [`TransactionBuilder::add_input`] and
//!   [`TransactionBuilder::add_output`].
//! - The **Signer** role: [`TransactionBuilder::sign_input`].
//! - The **Finalizer** role: [`TransactionBuilder::finalize_all_inputs`].
//! - The **Extractor** role: [`TransactionBuilder::extract_transaction`] and friends.
//!
//! Every input must spend one of the four templates in [`AddressType`], signed by the single key
//! the template commits to. Once any input is signed, inputs and outputs can no longer be added
//! since `SIGHASH_ALL` (and `SIGHASH_DEFAULT`) signatures commit to all of them.
//!
//! Failed operations leave the builder unchanged.
//!
//! [BIP-174]: <https://github.com/bitcoin/bips/blob/master/bip-0174.mediawiki>

mod error;
mod extract;
mod input;
mod output;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use bitcoin::hashes::Hash;
use bitcoin::key::TapTweak;
use bitcoin::locktime::absolute;
use bitcoin::secp256k1::{Message, Secp256k1};
use bitcoin::sighash::{EcdsaSighashType, Prevouts, SighashCache, TapSighashType};
use bitcoin::{ecdsa, taproot, transaction, FeeRate, ScriptBuf, Sequence, Transaction, Witness};

use crate::address::{self, Address, AddressType};
use crate::key::PrivateKey;
use crate::network::NetworkParams;
use crate::script::{ScriptType, SigningAlgorithm};

use self::input::InputSignature;

#[rustfmt::skip]                // Keep public exports separate.
#[doc(inline)]
pub use self::{
    error::{
        AddInputError, AddOutputError, AmountError, FinalizeError, IndexOutOfBoundsError,
        NotModifiableError, ParseUtxoError, SignError,
    },
    extract::{ExtractError, FeeError},
    input::{Input, Utxo},
    output::Output,
};

/// Builds, signs, and serializes a transaction in one go.
///
/// Signs input `i` with `keys[&i]`. Any input without a key is left unsigned, making this fail
/// with [`FinalizeError::MissingSignature`].
pub fn build(
    creator: Creator,
    inputs: Vec<Utxo>,
    outputs: &[(&str, i64)],
    keys: &BTreeMap<usize, PrivateKey>,
) -> Result<Vec<u8>, crate::Error> {
    let mut builder = creator.builder();
    for utxo in inputs {
        builder.add_input(utxo)?;
    }
    for (address, value) in outputs {
        builder.add_output(address, *value)?;
    }
    builder.sign_all_inputs(keys)?;
    builder.finalize_all_inputs()?;

    Ok(builder.extract_transaction()?)
}

/// Implements the Creator role, configures the transaction before any input is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    network: NetworkParams,
    version: transaction::Version,
    lock_time: absolute::LockTime,
    sequence: Sequence,
    max_fee_rate: FeeRate,
}

impl Creator {
    /// The default maximum fee rate, 5000 sat/vB.
    ///
    /// Anything above this is almost certainly an amount typo (e.g. a missing change output).
    pub const DEFAULT_MAX_FEE_RATE: FeeRate = FeeRate::from_sat_per_vb_u32(5_000);

    /// Creates a new `Creator` for mainnet with the default parameters.
    pub fn new() -> Self {
        Creator {
            network: NetworkParams::bitcoin(),
            version: transaction::Version::TWO,
            lock_time: absolute::LockTime::ZERO,
            sequence: Sequence::MAX,
            max_fee_rate: Self::DEFAULT_MAX_FEE_RATE,
        }
    }

    /// Sets the network output addresses are decoded for.
    pub fn network(mut self, network: NetworkParams) -> Self {
        self.network = network;
        self
    }

    /// Sets the transaction version.
    ///
    /// The default is [`transaction::Version::TWO`].
    pub fn transaction_version(mut self, version: transaction::Version) -> Self {
        self.version = version;
        self
    }

    /// Sets the transaction lock time, the default is zero.
    pub fn lock_time(mut self, lock_time: absolute::LockTime) -> Self {
        self.lock_time = lock_time;
        self
    }

    /// Sets the sequence number used by [`TransactionBuilder::add_input`].
    ///
    /// The default is [`Sequence::MAX`].
    pub fn sequence(mut self, sequence: Sequence) -> Self {
        self.sequence = sequence;
        self
    }

    /// Sets the maximum fee rate [`TransactionBuilder::extract_tx`] accepts.
    pub fn max_fee_rate(mut self, max_fee_rate: FeeRate) -> Self {
        self.max_fee_rate = max_fee_rate;
        self
    }

    /// Builds a [`TransactionBuilder`] with no inputs or outputs.
    pub fn builder(self) -> TransactionBuilder {
        TransactionBuilder { config: self, inputs: vec![], outputs: vec![] }
    }
}

impl Default for Creator {
    fn default() -> Self { Self::new() }
}

/// Builds a transaction spending single-key outputs.
///
/// Not synchronized, callers sharing a builder across threads must lock it themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBuilder {
    config: Creator,
    inputs: Vec<Input>,
    outputs: Vec<Output>,
}

impl TransactionBuilder {
    /// Creates a builder for `network` with the default transaction parameters.
    pub fn new(network: NetworkParams) -> Self { Creator::new().network(network).builder() }

    /// Returns the network output addresses are decoded for.
    pub fn network(&self) -> &NetworkParams { &self.config.network }

    /// Returns the inputs added so far.
    pub fn inputs(&self) -> &[Input] { &self.inputs }

    /// Returns the outputs added so far.
    pub fn outputs(&self) -> &[Output] { &self.outputs }

    /// Returns true if all inputs have been finalized.
    pub fn is_finalized(&self) -> bool { self.inputs.iter().all(|input| input.is_finalized()) }

    /// Appends an input spending `utxo`, returning its index.
    pub fn add_input(&mut self, utxo: Utxo) -> Result<usize, AddInputError> {
        let sequence = self.config.sequence;
        self.add_input_with_sequence(utxo, sequence)
    }

    /// Appends an input spending `utxo` with a custom sequence number, returning its index.
    pub fn add_input_with_sequence(
        &mut self,
        utxo: Utxo,
        sequence: Sequence,
    ) -> Result<usize, AddInputError> {
        self.check_modifiable()?;
        output::check_max_money(utxo.value)?;

        let input = Input::new(utxo, sequence);
        tracing::debug!(
            outpoint = %input.utxo().outpoint(),
            value = %input.utxo().value,
            script_type = %input.script_type(),
            "adding input"
        );
        self.inputs.push(input);

        Ok(self.inputs.len() - 1)
    }

    /// Appends an output paying `value` satoshis to `address`, returning its index.
    ///
    /// The address must be valid for the builder's network.
    pub fn add_output(&mut self, address: &str, value: i64) -> Result<usize, AddOutputError> {
        self.check_modifiable()?;
        let address = Address::from_str_network(address, &self.config.network)?;
        let amount = output::checked_amount(value)?;

        tracing::debug!(%address, %amount, "adding output");
        self.outputs.push(Output::new(amount, address.script_pubkey()));

        Ok(self.outputs.len() - 1)
    }

    /// Appends an output paying `value` satoshis to an explicit locking script.
    pub fn add_output_script(
        &mut self,
        script_pubkey: ScriptBuf,
        value: i64,
    ) -> Result<usize, AddOutputError> {
        self.check_modifiable()?;
        let amount = output::checked_amount(value)?;

        tracing::debug!(%amount, "adding output with explicit script");
        self.outputs.push(Output::new(amount, script_pubkey));

        Ok(self.outputs.len() - 1)
    }

    /// Signs the input at `index` with `key`.
    ///
    /// The key must control the output the input spends, for P2TR outputs that is the key-path
    /// spend with no script tree. Signing an input twice replaces the first signature.
    pub fn sign_input(&mut self, index: usize, key: &PrivateKey) -> Result<(), SignError> {
        let secp = Secp256k1::new();
        let tx = self.unsigned_tx();

        let input = self.checked_input(index)?;
        if input.is_finalized() {
            return Err(SignError::AlreadyFinalized { index });
        }
        let script_type = input.script_type();
        let address_type = AddressType::from_script_type(script_type)
            .ok_or(SignError::UnsupportedScriptType { index })?;

        let pubkey = key.public_key();
        let expected = address::script_pubkey(&secp, &pubkey, address_type);
        if expected != input.utxo().script_pubkey {
            return Err(SignError::KeyMismatch { index, script_type });
        }
        let redeem_script = address::redeem_script(&pubkey, address_type);

        let mut cache = SighashCache::new(&tx);
        let signature = match script_type.signing_algorithm() {
            Some(SigningAlgorithm::Ecdsa) => {
                let utxo = input.utxo();
                let sighash_type = EcdsaSighashType::All;
                let msg = match redeem_script {
                    // Nested segwit signs with the redeem script as the script code.
                    Some(ref redeem) => {
                        let sighash =
                            cache.p2wpkh_signature_hash(index, redeem, utxo.value, sighash_type)?;
                        Message::from_digest(sighash.to_byte_array())
                    }
                    None if script_type == ScriptType::P2wpkh => {
                        let sighash = cache.p2wpkh_signature_hash(
                            index,
                            &utxo.script_pubkey,
                            utxo.value,
                            sighash_type,
                        )?;
                        Message::from_digest(sighash.to_byte_array())
                    }
                    None => {
                        let sighash = cache.legacy_signature_hash(
                            index,
                            &utxo.script_pubkey,
                            sighash_type.to_u32(),
                        )?;
                        Message::from_digest(sighash.to_byte_array())
                    }
                };
                tracing::trace!(index, sighash = %msg, "ecdsa sighash");

                let signature = secp.sign_ecdsa(&msg, key.secret_key());
                secp.verify_ecdsa(&msg, &signature, &pubkey).map_err(SignError::Verification)?;
                InputSignature::Ecdsa { pubkey, signature: ecdsa::Signature { signature, sighash_type } }
            }
            Some(SigningAlgorithm::Schnorr) => {
                let prevouts =
                    self.inputs.iter().map(|input| input.utxo().tx_out()).collect::<Vec<_>>();
                let sighash_type = TapSighashType::Default;
                let sighash = cache.taproot_key_spend_signature_hash(
                    index,
                    &Prevouts::All(&prevouts),
                    sighash_type,
                )?;
                let msg = Message::from_digest(sighash.to_byte_array());
                tracing::trace!(index, sighash = %msg, "taproot sighash");

                let keypair = key.keypair(&secp).tap_tweak(&secp, None).to_keypair();
                let signature = secp.sign_schnorr_no_aux_rand(&msg, &keypair);
                let (output_key, _parity) = keypair.x_only_public_key();
                secp.verify_schnorr(&signature, &msg, &output_key)
                    .map_err(SignError::Verification)?;
                InputSignature::Schnorr(taproot::Signature { signature, sighash_type })
            }
            None => return Err(SignError::UnsupportedScriptType { index }),
        };

        tracing::debug!(index, %script_type, "signed input");
        let input = &mut self.inputs[index];
        input.signature = Some(signature);
        input.redeem_script = redeem_script;

        Ok(())
    }

    /// Signs every input whose index is in `keys` with the corresponding key.
    ///
    /// Stops at the first error, inputs signed before it keep their signatures.
    pub fn sign_all_inputs(&mut self, keys: &BTreeMap<usize, PrivateKey>) -> Result<(), SignError> {
        for (index, key) in keys {
            self.sign_input(*index, key)?;
        }
        Ok(())
    }

    /// Finalizes every input, building its final script sig and witness from its signature.
    ///
    /// Every input is checked before any is modified, if this fails no input has been finalized.
    pub fn finalize_all_inputs(&mut self) -> Result<(), FinalizeError> {
        for (index, input) in self.inputs.iter().enumerate() {
            input.check_finalizable(index)?;
        }

        let finals = self
            .inputs
            .iter()
            .enumerate()
            .map(|(index, input)| input.final_scripts(index))
            .collect::<Result<Vec<(ScriptBuf, Witness)>, _>>()?;

        for (input, (script_sig, witness)) in self.inputs.iter_mut().zip(finals) {
            input.set_final(script_sig, witness);
        }
        tracing::debug!(inputs = self.inputs.len(), "finalized all inputs");

        Ok(())
    }

    /// Creates the transaction without any signature data.
    fn unsigned_tx(&self) -> Transaction {
        Transaction {
            version: self.config.version,
            lock_time: self.config.lock_time,
            input: self.inputs.iter().map(|input| input.unsigned_tx_in()).collect(),
            output: self.outputs.iter().map(|output| output.tx_out()).collect(),
        }
    }

    fn checked_input(&self, index: usize) -> Result<&Input, IndexOutOfBoundsError> {
        self.inputs.get(index).ok_or(IndexOutOfBoundsError { index, length: self.inputs.len() })
    }

    fn check_modifiable(&self) -> Result<(), NotModifiableError> {
        if self.inputs.iter().any(|input| input.is_signed()) {
            return Err(NotModifiableError);
        }
        Ok(())
    }
}
