// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

pub const STARCOIN_ADDRESS_LENGTH: usize = 32;
pub const EVM_ADDRESS_LENGTH: usize = 20;

/// 32-byte account address on the home chain.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct StarcoinAddress([u8; STARCOIN_ADDRESS_LENGTH]);

impl StarcoinAddress {
    pub const ZERO: Self = Self([0u8; STARCOIN_ADDRESS_LENGTH]);

    pub fn new(bytes: [u8; STARCOIN_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> BridgeResult<Self> {
        let bytes: [u8; STARCOIN_ADDRESS_LENGTH] = bytes
            .try_into()
            .map_err(|_| BridgeError::InvalidAddressLength)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for StarcoinAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for StarcoinAddress {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|_| BridgeError::InvalidAddressLength)?;
        Self::from_bytes(&bytes)
    }
}

impl From<[u8; STARCOIN_ADDRESS_LENGTH]> for StarcoinAddress {
    fn from(bytes: [u8; STARCOIN_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for StarcoinAddress {
    type Error = BridgeError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}
