// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The set of legal chain ids and the directed routes between them.
//!
//! The route table is an allow-list: a pair of perfectly valid chain ids is
//! still an invalid route unless it appears here. The limiter only installs
//! caps for routes drawn from this table.

use num_enum::TryFromPrimitive;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

#[derive(
    Debug,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Clone,
    Copy,
    TryFromPrimitive,
    Hash,
)]
#[repr(u8)]
pub enum BridgeChainId {
    StarcoinMainnet = 0,
    StarcoinTestnet = 1,
    StarcoinDevnet = 2,

    EthMainnet = 10,
    EthSepolia = 11,
    EthCustom = 12,
}

impl BridgeChainId {
    pub fn is_starcoin_chain(&self) -> bool {
        matches!(
            self,
            BridgeChainId::StarcoinMainnet
                | BridgeChainId::StarcoinTestnet
                | BridgeChainId::StarcoinDevnet
        )
    }
}

/// Directed pair of chain ids drawn from the allow-list below.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct BridgeRoute {
    pub source: BridgeChainId,
    pub destination: BridgeChainId,
}

static VALID_ROUTES: Lazy<Vec<BridgeRoute>> = Lazy::new(|| {
    use BridgeChainId::*;
    [
        (StarcoinMainnet, EthMainnet),
        (EthMainnet, StarcoinMainnet),
        (StarcoinTestnet, EthSepolia),
        (EthSepolia, StarcoinTestnet),
        (StarcoinTestnet, EthCustom),
        (EthCustom, StarcoinTestnet),
        (StarcoinDevnet, EthSepolia),
        (EthSepolia, StarcoinDevnet),
        (StarcoinDevnet, EthCustom),
        (EthCustom, StarcoinDevnet),
    ]
    .into_iter()
    .map(|(source, destination)| BridgeRoute {
        source,
        destination,
    })
    .collect()
});

pub fn assert_valid_chain_id(id: u8) -> BridgeResult<BridgeChainId> {
    BridgeChainId::try_from(id).map_err(|_| BridgeError::InvalidChainId)
}

pub fn is_valid_route(source: BridgeChainId, destination: BridgeChainId) -> bool {
    VALID_ROUTES
        .iter()
        .any(|route| route.source == source && route.destination == destination)
}

pub fn get_route(source: BridgeChainId, destination: BridgeChainId) -> BridgeResult<BridgeRoute> {
    if !is_valid_route(source, destination) {
        return Err(BridgeError::InvalidBridgeRoute);
    }
    Ok(BridgeRoute {
        source,
        destination,
    })
}
