// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Committee key material.
//!
//! Committee members sign the keccak-256 digest of
//! `BRIDGE_MESSAGE_PREFIX || serialize(message)` with recoverable secp256k1
//! signatures; verification recovers the compressed public key and looks it
//! up in the member map. EVM-side identities are derived the Ethereum way:
//! keccak over the 64-byte decompressed point, last 20 bytes.

use std::fmt;

use ethers::types::Address as EthAddress;
use fastcrypto::{
    hash::{HashFunction, Keccak256},
    secp256k1::{recoverable::Secp256k1RecoverableSignature, Secp256k1KeyPair, Secp256k1PublicKey},
    traits::{RecoverableSignature, ToFromBytes},
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{BridgeError, BridgeResult};

pub const ECDSA_COMPRESSED_PUBKEY_LENGTH: usize = 33;
pub const RECOVERABLE_SIGNATURE_LENGTH: usize = 65;

/// Domain separator prepended to every serialized message before hashing.
pub const BRIDGE_MESSAGE_PREFIX: &[u8] = b"STARCOIN_BRIDGE_MESSAGE";

pub type BridgeAuthorityKeyPair = Secp256k1KeyPair;
pub type BridgeAuthorityPublicKey = Secp256k1PublicKey;
pub type BridgeAuthorityRecoverableSignature = Secp256k1RecoverableSignature;

/// Compressed secp256k1 public key of a committee member.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BridgeAuthorityPublicKeyBytes([u8; ECDSA_COMPRESSED_PUBKEY_LENGTH]);

impl BridgeAuthorityPublicKeyBytes {
    pub fn from_bytes(bytes: &[u8]) -> BridgeResult<Self> {
        let bytes: [u8; ECDSA_COMPRESSED_PUBKEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| BridgeError::InvalidPubkeyLength)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Standard secp256k1 point decompression to the 65-byte uncompressed
    /// form (leading 0x04).
    pub fn decompress(&self) -> BridgeResult<[u8; 65]> {
        let pubkey =
            Secp256k1PublicKey::from_bytes(&self.0).map_err(|_| BridgeError::InvalidPublicKey)?;
        Ok(pubkey.pubkey.serialize_uncompressed())
    }

    /// The EVM address this key controls: keccak-256 of the decompressed
    /// 64-byte tail, bytes [12..32).
    pub fn to_eth_address(&self) -> BridgeResult<EthAddress> {
        let uncompressed = self.decompress()?;
        let digest = Keccak256::digest(&uncompressed[1..]).digest;
        Ok(EthAddress::from_slice(&digest[12..]))
    }
}

impl From<&BridgeAuthorityPublicKey> for BridgeAuthorityPublicKeyBytes {
    fn from(pubkey: &BridgeAuthorityPublicKey) -> Self {
        let bytes: [u8; ECDSA_COMPRESSED_PUBKEY_LENGTH] = pubkey
            .as_bytes()
            .try_into()
            .expect("compressed secp256k1 pubkey is 33 bytes");
        Self(bytes)
    }
}

impl fmt::Display for BridgeAuthorityPublicKeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for BridgeAuthorityPublicKeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k#{}", hex::encode(self.0))
    }
}

impl Serialize for BridgeAuthorityPublicKeyBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for BridgeAuthorityPublicKeyBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(de::Error::custom)?;
        Self::from_bytes(&bytes).map_err(de::Error::custom)
    }
}

/// Recovers the compressed public key from a 65-byte RSV signature over
/// `message`, hashed with keccak-256.
pub fn ecrecover(signature: &[u8], message: &[u8]) -> BridgeResult<BridgeAuthorityPublicKeyBytes> {
    let signature = BridgeAuthorityRecoverableSignature::from_bytes(signature)
        .map_err(|_| BridgeError::InvalidSignatureBytes)?;
    let pubkey = signature
        .recover_with_hash::<Keccak256>(message)
        .map_err(|_| BridgeError::InvalidSignature)?;
    Ok(BridgeAuthorityPublicKeyBytes::from(&pubkey))
}

/// The exact byte sequence committee members sign for `message_bytes`.
pub fn signing_preimage(message_bytes: &[u8]) -> Vec<u8> {
    let mut preimage = Vec::with_capacity(BRIDGE_MESSAGE_PREFIX.len() + message_bytes.len());
    preimage.extend_from_slice(BRIDGE_MESSAGE_PREFIX);
    preimage.extend_from_slice(message_bytes);
    preimage
}
