// SPDX-License-Identifier: CC0-1.0

//! Key material.
//!
//! A [`PrivateKey`] owns a secp256k1 secret scalar and the public point derived from it. Public
//! keys are always used in compressed form, every template in this crate commits to the 33 byte
//! serialization (or, for taproot, to the 32 byte x-only key).

use core::fmt;

use alloc::string::String;
use alloc::vec::Vec;

use bitcoin::base58;
use bitcoin::secp256k1::{self, Keypair, Secp256k1, SecretKey, Signing, XOnlyPublicKey};

use crate::error::write_err;
use crate::network::NetworkParams;

/// Length of a WIF payload for a compressed key: prefix, 32 byte secret, compression flag.
const WIF_COMPRESSED_LEN: usize = 34;
/// Length of a WIF payload for an uncompressed key: prefix, 32 byte secret.
const WIF_UNCOMPRESSED_LEN: usize = 33;
/// Trailing byte marking a WIF key as compressed.
const WIF_COMPRESSED_FLAG: u8 = 0x01;

/// A private key along with the public key derived from it.
///
/// The `Debug` implementation never prints the secret scalar.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    secret: SecretKey,
    public: secp256k1::PublicKey,
    network: NetworkParams,
}

impl PrivateKey {
    /// Generates a new random key for `network` using the thread-local CSPRNG.
    #[cfg(feature = "std")]
    pub fn generate(network: NetworkParams) -> Self {
        let secret = SecretKey::new(&mut secp256k1::rand::thread_rng());
        tracing::debug!("generated new private key");
        Self::from_secret_key(secret, network)
    }

    /// Creates a key from an existing secret scalar.
    pub fn from_secret_key(secret: SecretKey, network: NetworkParams) -> Self {
        let secp = Secp256k1::signing_only();
        Self::from_secret_key_with_context(&secp, secret, network)
    }

    /// Creates a key from an existing secret scalar, using an existing signing context.
    pub fn from_secret_key_with_context<C: Signing>(
        secp: &Secp256k1<C>,
        secret: SecretKey,
        network: NetworkParams,
    ) -> Self {
        let public = secret.public_key(secp);
        PrivateKey { secret, public, network }
    }

    /// Creates a key from a 32 byte big-endian secret scalar.
    pub fn from_slice(data: &[u8], network: NetworkParams) -> Result<Self, WifError> {
        let secret = SecretKey::from_slice(data).map_err(WifError::Secp256k1)?;
        Ok(Self::from_secret_key(secret, network))
    }

    /// Decodes a WIF encoded private key for `network`.
    ///
    /// Only compressed-key WIF strings are accepted.
    pub fn from_wif(wif: &str, network: NetworkParams) -> Result<Self, WifError> {
        let data = base58::decode_check(wif).map_err(WifError::Base58)?;

        let secret_bytes = match data.len() {
            WIF_COMPRESSED_LEN => {
                if data[WIF_COMPRESSED_LEN - 1] != WIF_COMPRESSED_FLAG {
                    return Err(WifError::InvalidCompressionFlag(data[WIF_COMPRESSED_LEN - 1]));
                }
                &data[1..WIF_COMPRESSED_LEN - 1]
            }
            WIF_UNCOMPRESSED_LEN => return Err(WifError::Uncompressed),
            len => return Err(WifError::InvalidLength(len)),
        };

        if data[0] != network.wif_prefix {
            return Err(WifError::WrongNetwork { expected: network.wif_prefix, got: data[0] });
        }

        Self::from_slice(secret_bytes, network)
    }

    /// Encodes this key as WIF, compressed form.
    pub fn to_wif(&self) -> String {
        let mut data = Vec::with_capacity(WIF_COMPRESSED_LEN);
        data.push(self.network.wif_prefix);
        data.extend_from_slice(&self.secret.secret_bytes());
        data.push(WIF_COMPRESSED_FLAG);
        base58::encode_check(&data)
    }

    /// Returns the secret scalar.
    pub fn secret_key(&self) -> &SecretKey { &self.secret }

    /// Returns the public key.
    pub fn public_key(&self) -> secp256k1::PublicKey { self.public }

    /// Returns the 33 byte compressed serialization of the public key.
    pub fn public_key_bytes(&self) -> [u8; 33] { self.public.serialize() }

    /// Returns the x-only public key, the taproot internal key.
    pub fn x_only_public_key(&self) -> XOnlyPublicKey { self.public.x_only_public_key().0 }

    /// Returns the network this key encodes to.
    pub fn network(&self) -> &NetworkParams { &self.network }

    /// Returns the keypair used for Schnorr signing.
    pub(crate) fn keypair<C: Signing>(&self, secp: &Secp256k1<C>) -> Keypair {
        Keypair::from_secret_key(secp, &self.secret)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public", &self.public)
            .field("network", &self.network.hrp)
            .finish_non_exhaustive()
    }
}

/// Error decoding a WIF private key.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WifError {
    /// Base58Check decoding failed.
    Base58(base58::Error),
    /// Decoded payload has an unexpected length.
    InvalidLength(usize),
    /// The compression flag byte is not `0x01`.
    InvalidCompressionFlag(u8),
    /// The key is for uncompressed public keys, which this crate does not support.
    Uncompressed,
    /// The version byte does not match the target network.
    WrongNetwork {
        /// Expected version byte.
        expected: u8,
        /// Actual version byte.
        got: u8,
    },
    /// The secret is not a valid secp256k1 scalar.
    Secp256k1(secp256k1::Error),
}

impl fmt::Display for WifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use WifError::*;

        match *self {
            Base58(ref e) => write_err!(f, "invalid base58check encoding"; e),
            InvalidLength(len) => write!(f, "invalid WIF payload length {}", len),
            InvalidCompressionFlag(b) => write!(f, "invalid WIF compression flag {:#04x}", b),
            Uncompressed => f.write_str("uncompressed WIF keys are not supported"),
            WrongNetwork { expected, got } =>
                write!(f, "WIF version byte {:#04x}, expected {:#04x}", got, expected),
            Secp256k1(ref e) => write_err!(f, "invalid secret key"; e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for WifError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use WifError::*;

        match *self {
            Base58(ref e) => Some(e),
            Secp256k1(ref e) => Some(e),
            InvalidLength(_) | InvalidCompressionFlag(_) | Uncompressed | WrongNetwork { .. } =>
                None,
        }
    }
}
