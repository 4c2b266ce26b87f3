// SPDX-License-Identifier: CC0-1.0

//! Network parameters.
//!
//! Every address and WIF encoding is specific to a network. Nothing in this crate assumes
//! mainnet, the caller picks the parameters once and passes them around.

use core::fmt;

use alloc::string::String;

use bitcoin::Network;

/// Encoding parameters for a single network.
///
/// The well known networks are available via `From<Network>`, custom chains (e.g. a fork that
/// reuses the Bitcoin script system with different prefixes) can construct this directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct NetworkParams {
    /// The Base58Check version byte of a P2PKH address.
    pub p2pkh_prefix: u8,
    /// The Base58Check version byte of a P2SH address.
    pub p2sh_prefix: u8,
    /// The Base58Check version byte of a WIF encoded private key.
    pub wif_prefix: u8,
    /// The Bech32 human-readable part, stored lowercase.
    pub hrp: String,
}

impl NetworkParams {
    /// Parameters for Bitcoin mainnet.
    pub fn bitcoin() -> Self { Self::new(0x00, 0x05, 0x80, "bc") }

    /// Parameters for testnet and signet (they share all prefixes).
    pub fn testnet() -> Self { Self::new(0x6f, 0xc4, 0xef, "tb") }

    /// Parameters for regtest.
    pub fn regtest() -> Self { Self::new(0x6f, 0xc4, 0xef, "bcrt") }

    /// Creates custom network parameters.
    ///
    /// The human-readable part is lowercased, Bech32 comparison is case-insensitive.
    pub fn new(p2pkh_prefix: u8, p2sh_prefix: u8, wif_prefix: u8, hrp: &str) -> Self {
        NetworkParams { p2pkh_prefix, p2sh_prefix, wif_prefix, hrp: hrp.to_ascii_lowercase() }
    }

    /// Returns true if `hrp` is this network's human-readable part, ignoring case.
    pub fn is_hrp(&self, hrp: &str) -> bool { self.hrp.eq_ignore_ascii_case(hrp) }
}

impl Default for NetworkParams {
    fn default() -> Self { Self::bitcoin() }
}

impl From<Network> for NetworkParams {
    fn from(network: Network) -> Self {
        match network {
            Network::Bitcoin => Self::bitcoin(),
            Network::Regtest => Self::regtest(),
            // Testnet, signet, and any later test network share the testnet prefixes.
            _ => Self::testnet(),
        }
    }
}

impl fmt::Display for NetworkParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hrp={} p2pkh={:#04x} p2sh={:#04x} wif={:#04x}",
            self.hrp, self.p2pkh_prefix, self.p2sh_prefix, self.wif_prefix
        )
    }
}
