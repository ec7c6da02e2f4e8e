// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fixture helpers shared by unit and integration tests.

use std::collections::BTreeMap;

use fastcrypto::{
    hash::Keccak256,
    traits::{KeyPair, RecoverableSigner, ToFromBytes},
};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    base_types::StarcoinAddress,
    committee::BridgeCommittee,
    crypto::{signing_preimage, BridgeAuthorityKeyPair, BridgeAuthorityPublicKeyBytes},
    events::EventLog,
    message::{serialize_message, BridgeMessage},
    treasury::{
        create_token_capabilities, BridgeTreasury, Coin, TOKEN_ID_ETH, TOKEN_ID_USDT,
    },
};

pub const TEST_ETH_TYPE_NAME: &str = "0x1::XETH::XETH";
pub const TEST_USDT_TYPE_NAME: &str = "0x1::XUSDT::XUSDT";

/// A deterministic 32-byte home-chain address.
pub fn test_starcoin_address(seed: u8) -> StarcoinAddress {
    StarcoinAddress::new([seed; 32])
}

/// Deterministic committee keypairs.
pub fn test_keypairs(count: usize) -> Vec<BridgeAuthorityKeyPair> {
    (0..count)
        .map(|i| BridgeAuthorityKeyPair::generate(&mut StdRng::from_seed([i as u8 + 1; 32])))
        .collect()
}

/// Builds an active committee through the real registration flow, with the
/// given voting powers (bps).
pub fn test_committee(voting_powers: &[u64]) -> (BridgeCommittee, Vec<BridgeAuthorityKeyPair>) {
    let mut committee = BridgeCommittee::new();
    let mut log = EventLog::new();
    let keypairs = test_keypairs(voting_powers.len());
    let active: BTreeMap<StarcoinAddress, u64> = voting_powers
        .iter()
        .enumerate()
        .map(|(i, power)| (test_starcoin_address(i as u8), *power))
        .collect();
    for (i, keypair) in keypairs.iter().enumerate() {
        committee
            .register(
                &active,
                test_starcoin_address(i as u8),
                BridgeAuthorityPublicKeyBytes::from(keypair.public()).as_bytes(),
                format!("http://127.0.0.1:{}", 9000 + i).into_bytes(),
                &mut log,
            )
            .unwrap();
    }
    committee.try_create_next_committee(&active, voting_powers.iter().sum(), 0, &mut log);
    (committee, keypairs)
}

/// 65-byte recoverable signatures over the domain-separated preimage of
/// `message`, one per keypair.
pub fn sign_message_with_keys(
    message: &BridgeMessage,
    keypairs: &[BridgeAuthorityKeyPair],
) -> Vec<Vec<u8>> {
    let preimage = signing_preimage(&serialize_message(message));
    keypairs
        .iter()
        .map(|keypair| {
            keypair
                .sign_recoverable_with_hash::<Keccak256>(&preimage)
                .as_bytes()
                .to_vec()
        })
        .collect()
}

/// A treasury with ETH (id 2, 8 decimals, $5) and USDT (id 3, 6 decimals,
/// $1) registered and supported, zero supply.
pub fn setup_treasury_with_eth_and_usdt() -> BridgeTreasury {
    let mut treasury = BridgeTreasury::new();
    let mut log = EventLog::new();

    let (mint_cap, burn_cap) = create_token_capabilities(TEST_ETH_TYPE_NAME);
    treasury
        .register_foreign_token(mint_cap, burn_cap, 8, &mut log)
        .unwrap();
    treasury
        .add_new_token(TEST_ETH_TYPE_NAME, TOKEN_ID_ETH, false, 5 * 100_000_000, &mut log)
        .unwrap();

    let (mint_cap, burn_cap) = create_token_capabilities(TEST_USDT_TYPE_NAME);
    treasury
        .register_foreign_token(mint_cap, burn_cap, 6, &mut log)
        .unwrap();
    treasury
        .add_new_token(TEST_USDT_TYPE_NAME, TOKEN_ID_USDT, false, 100_000_000, &mut log)
        .unwrap();

    treasury
}

/// Mints a coin for test setup; run before the treasury moves into a
/// bridge.
pub fn mint_test_coin(treasury: &mut BridgeTreasury, token_id: u8, amount: u64) -> Coin {
    treasury.mint(token_id, amount).unwrap()
}
