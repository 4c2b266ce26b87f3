// SPDX-License-Identifier: CC0-1.0

//! Address decoding and validation.
//!
//! An address is valid for a network if it decodes to an output script under that network's
//! parameters. Base58Check addresses must carry the network's P2PKH or P2SH version byte, Bech32
//! addresses must carry the network's human-readable part (in either case, never mixed) and pass
//! the BIP-173/BIP-350 checksum matching their witness version.

use alloc::string::ToString;

use bitcoin::base58;
use bitcoin::bech32::segwit;
use bitcoin::ScriptBuf;

use super::{Address, ParseAddressError, Payload};
use crate::network::NetworkParams;

/// Length of a Base58Check address payload: version byte and 20 byte hash.
const BASE58_PAYLOAD_LEN: usize = 21;

/// Decodes `s` into the output script it locks to.
pub fn to_output_script(s: &str, network: &NetworkParams) -> Result<ScriptBuf, ParseAddressError> {
    Ok(decode(s, network)?.script_pubkey())
}

/// Returns true if `s` is a valid address for `network`.
///
/// Never panics, any malformed input is simply invalid.
pub fn is_valid(s: &str, network: &NetworkParams) -> bool {
    match Address::from_str_network(s, network) {
        Ok(_) => true,
        Err(e) => {
            tracing::trace!(address = s, error = %e, "invalid address");
            false
        }
    }
}

pub(super) fn decode(s: &str, network: &NetworkParams) -> Result<Payload, ParseAddressError> {
    if s.is_empty() {
        return Err(ParseAddressError::Empty);
    }

    if has_network_hrp(s, network) {
        return decode_segwit(s, network);
    }

    match base58::decode_check(s) {
        Ok(data) => decode_base58(&data, network),
        // Report a well formed Bech32 address for another network as such.
        Err(e) => match segwit::decode(s) {
            Ok((hrp, _, _)) => Err(ParseAddressError::WrongHrp(hrp.to_string().to_ascii_lowercase())),
            Err(_) => Err(ParseAddressError::Base58(e)),
        },
    }
}

/// Bech32 strings separate the human-readable part with the last `1`.
fn has_network_hrp(s: &str, network: &NetworkParams) -> bool {
    match s.rfind('1') {
        Some(pos) => network.is_hrp(&s[..pos]),
        None => false,
    }
}

fn decode_segwit(s: &str, network: &NetworkParams) -> Result<Payload, ParseAddressError> {
    // Checks the checksum variant against the version, and the program length bounds.
    let (hrp, version, program) = segwit::decode(s).map_err(ParseAddressError::Bech32)?;

    let hrp = hrp.to_string();
    if !network.is_hrp(&hrp) {
        return Err(ParseAddressError::WrongHrp(hrp.to_ascii_lowercase()));
    }

    let version = version.to_u8();
    if version == 1 && program.len() != 32 {
        return Err(ParseAddressError::InvalidTaprootProgramLength(program.len()));
    }

    Ok(Payload::WitnessProgram { version, program })
}

fn decode_base58(data: &[u8], network: &NetworkParams) -> Result<Payload, ParseAddressError> {
    if data.len() != BASE58_PAYLOAD_LEN {
        return Err(ParseAddressError::InvalidBase58PayloadLength(data.len()));
    }

    let mut hash = [0u8; 20];
    hash.copy_from_slice(&data[1..]);

    let prefix = data[0];
    if prefix == network.p2pkh_prefix {
        Ok(Payload::PubkeyHash(hash))
    } else if prefix == network.p2sh_prefix {
        Ok(Payload::ScriptHash(hash))
    } else {
        Err(ParseAddressError::UnknownVersionByte(prefix))
    }
}
