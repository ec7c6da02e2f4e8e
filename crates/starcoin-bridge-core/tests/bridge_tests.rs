// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end flows through the bridge state machine: outbound deposits,
//! inbound approve/claim with committee signatures, emergency governance
//! and the idempotence guarantees.

use hex_literal::hex;
use starcoin_bridge_core::{
    base_types::StarcoinAddress,
    bridge::Bridge,
    chain_ids::BridgeChainId,
    error::BridgeError,
    events::BridgeEvent,
    limiter::{TransferLimiter, USD_VALUE_MULTIPLIER},
    message::{
        create_emergency_op_message, create_update_bridge_limit_message, BridgeMessage,
        BridgeMessageKey, BridgeMessageType, EmergencyOpType,
    },
    test_utils::{
        mint_test_coin, setup_treasury_with_eth_and_usdt, sign_message_with_keys, test_committee,
        test_starcoin_address,
    },
    treasury::{TOKEN_ID_ETH, TOKEN_ID_USDT},
};

/// Wire bytes of an EthSepolia → StarcoinTestnet transfer of 12345 USDT
/// (token id 3), seq 10, to the address 0x00…64.
const INBOUND_TRANSFER_HEX: [u8; 75] = hex!("0001000000000000000a0b1400000000000000000000000000000000000000c801200000000000000000000000000000000000000000000000000000000000000064030000000000003039");

fn inbound_claimer() -> StarcoinAddress {
    StarcoinAddress::from_bytes(&hex!(
        "0000000000000000000000000000000000000000000000000000000000000064"
    ))
    .unwrap()
}

fn assert_claimed_implies_signed(bridge: &Bridge, keys: &[BridgeMessageKey]) {
    for key in keys {
        if let Some(record) = bridge.record(key) {
            if record.is_claimed() {
                assert!(record.verified_signatures().is_some());
            }
        }
    }
}

#[test]
fn test_outbound_send() {
    let (committee, keypairs) = test_committee(&[5000, 5000]);
    let mut treasury = setup_treasury_with_eth_and_usdt();
    let eth = mint_test_coin(&mut treasury, TOKEN_ID_ETH, 10);
    assert_eq!(treasury.total_supply(TOKEN_ID_ETH).unwrap(), 10);

    let mut bridge = Bridge::new(
        BridgeChainId::StarcoinDevnet,
        committee,
        treasury,
        TransferLimiter::new(),
    );
    let sender = test_starcoin_address(7);
    let target = hex!("00000000000000000000000000000000000000c8").to_vec();
    bridge
        .send_token(sender, BridgeChainId::EthSepolia as u8, target.clone(), eth)
        .unwrap();

    // the burn removed the deposited coins from circulation
    assert_eq!(bridge.treasury().total_supply(TOKEN_ID_ETH).unwrap(), 0);
    assert_eq!(bridge.sequence_num(BridgeMessageType::TokenTransfer), 1);

    let key = BridgeMessageKey {
        source_chain: BridgeChainId::StarcoinDevnet as u8,
        message_type: BridgeMessageType::TokenTransfer as u8,
        bridge_seq_num: 0,
    };
    let record = bridge.record(&key).unwrap();
    assert!(record.verified_signatures().is_none());
    assert!(!record.is_claimed());

    let deposited = bridge
        .events()
        .iter()
        .find_map(|event| match event {
            BridgeEvent::TokenDepositedEvent(event) => Some(event.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(deposited.seq_num, 0);
    assert_eq!(deposited.source_chain, BridgeChainId::StarcoinDevnet as u8);
    assert_eq!(deposited.target_chain, BridgeChainId::EthSepolia as u8);
    assert_eq!(deposited.target_address, target);
    assert_eq!(deposited.token_type, TOKEN_ID_ETH);
    assert_eq!(deposited.amount, 10);

    // the committee can now approve the home-initiated transfer, once
    let message = record.message().clone();
    let signatures = sign_message_with_keys(&message, &keypairs);
    bridge
        .approve_token_transfer(message.clone(), signatures.clone())
        .unwrap();
    assert!(bridge.record(&key).unwrap().verified_signatures().is_some());

    let events_before = bridge.events().len();
    bridge.approve_token_transfer(message, signatures).unwrap();
    assert!(matches!(
        bridge.events().last().unwrap(),
        BridgeEvent::TokenTransferAlreadyApproved(event) if event.message_key == key
    ));
    assert_eq!(bridge.events().len(), events_before + 1);
    assert_claimed_implies_signed(&bridge, &[key]);
}

#[test]
fn test_inbound_approve_and_claim() {
    let (committee, keypairs) = test_committee(&[3334, 3333, 3333]);
    let treasury = setup_treasury_with_eth_and_usdt();
    let mut bridge = Bridge::new(
        BridgeChainId::StarcoinTestnet,
        committee,
        treasury,
        TransferLimiter::new(),
    );

    // install the sepolia -> testnet route cap through governance
    let limit_update = create_update_bridge_limit_message(
        BridgeChainId::StarcoinTestnet,
        0,
        BridgeChainId::EthSepolia,
        1_000_000 * USD_VALUE_MULTIPLIER,
    );
    let signatures = sign_message_with_keys(&limit_update, &keypairs);
    bridge.execute_system_message(limit_update, signatures).unwrap();

    let message = BridgeMessage::from_wire_bytes(&INBOUND_TRANSFER_HEX).unwrap();
    let key = message.key();

    // first approval creates the record already approved
    let signatures = sign_message_with_keys(&message, &keypairs[..2]);
    bridge
        .approve_token_transfer(message.clone(), signatures.clone())
        .unwrap();
    let record = bridge.record(&key).unwrap();
    assert!(record.verified_signatures().is_some());
    assert!(!record.is_claimed());

    // second approval is idempotent
    bridge.approve_token_transfer(message, signatures).unwrap();
    assert!(matches!(
        bridge.events().last().unwrap(),
        BridgeEvent::TokenTransferAlreadyApproved(event) if event.message_key == key
    ));

    // only the recorded target may claim
    assert_eq!(
        bridge
            .claim_token(0, test_starcoin_address(9), BridgeChainId::EthSepolia as u8, 10)
            .unwrap_err(),
        BridgeError::UnauthorizedClaim
    );

    let coin = bridge
        .claim_token(0, inbound_claimer(), BridgeChainId::EthSepolia as u8, 10)
        .unwrap()
        .unwrap();
    assert_eq!(coin.value(), 12345);
    assert_eq!(coin.type_name(), "0x1::XUSDT::XUSDT");
    assert_eq!(bridge.treasury().total_supply(TOKEN_ID_USDT).unwrap(), 12345);
    assert!(bridge.record(&key).unwrap().is_claimed());
    assert!(matches!(
        bridge.events().last().unwrap(),
        BridgeEvent::TokenTransferClaimed(event) if event.message_key == key
    ));

    // claiming again is idempotent: event, no coin
    let again = bridge
        .claim_token(0, inbound_claimer(), BridgeChainId::EthSepolia as u8, 10)
        .unwrap();
    assert!(again.is_none());
    assert!(matches!(
        bridge.events().last().unwrap(),
        BridgeEvent::TokenTransferAlreadyClaimed(event) if event.message_key == key
    ));
    assert_eq!(bridge.treasury().total_supply(TOKEN_ID_USDT).unwrap(), 12345);
    assert_claimed_implies_signed(&bridge, &[key]);
}

#[test]
fn test_claim_over_limit_can_retry() {
    let (committee, keypairs) = test_committee(&[10_000]);
    let treasury = setup_treasury_with_eth_and_usdt();
    let mut bridge = Bridge::new(
        BridgeChainId::StarcoinTestnet,
        committee,
        treasury,
        TransferLimiter::new(),
    );

    // a zero cap refuses every claim on the route
    let limit_update = create_update_bridge_limit_message(
        BridgeChainId::StarcoinTestnet,
        0,
        BridgeChainId::EthSepolia,
        0,
    );
    let signatures = sign_message_with_keys(&limit_update, &keypairs);
    bridge.execute_system_message(limit_update, signatures).unwrap();

    let message = BridgeMessage::from_wire_bytes(&INBOUND_TRANSFER_HEX).unwrap();
    let key = message.key();
    let signatures = sign_message_with_keys(&message, &keypairs);
    bridge.approve_token_transfer(message, signatures).unwrap();

    let refused = bridge
        .claim_token(0, inbound_claimer(), BridgeChainId::EthSepolia as u8, 10)
        .unwrap();
    assert!(refused.is_none());
    assert!(matches!(
        bridge.events().last().unwrap(),
        BridgeEvent::TokenTransferLimitExceed(event) if event.message_key == key
    ));
    assert!(!bridge.record(&key).unwrap().is_claimed());
    assert_eq!(bridge.treasury().total_supply(TOKEN_ID_USDT).unwrap(), 0);

    // after the cap is raised the same claim goes through
    let limit_update = create_update_bridge_limit_message(
        BridgeChainId::StarcoinTestnet,
        1,
        BridgeChainId::EthSepolia,
        1_000_000 * USD_VALUE_MULTIPLIER,
    );
    let signatures = sign_message_with_keys(&limit_update, &keypairs);
    bridge.execute_system_message(limit_update, signatures).unwrap();

    let coin = bridge
        .claim_token(0, inbound_claimer(), BridgeChainId::EthSepolia as u8, 10)
        .unwrap()
        .unwrap();
    assert_eq!(coin.value(), 12345);
    assert!(bridge.record(&key).unwrap().is_claimed());
}

#[test]
fn test_claim_and_transfer_token_delivers_to_owner() {
    let (committee, keypairs) = test_committee(&[10_000]);
    let treasury = setup_treasury_with_eth_and_usdt();
    let mut bridge = Bridge::new(
        BridgeChainId::StarcoinTestnet,
        committee,
        treasury,
        TransferLimiter::new(),
    );
    let limit_update = create_update_bridge_limit_message(
        BridgeChainId::StarcoinTestnet,
        0,
        BridgeChainId::EthSepolia,
        1_000_000 * USD_VALUE_MULTIPLIER,
    );
    let signatures = sign_message_with_keys(&limit_update, &keypairs);
    bridge.execute_system_message(limit_update, signatures).unwrap();

    let message = BridgeMessage::from_wire_bytes(&INBOUND_TRANSFER_HEX).unwrap();
    let signatures = sign_message_with_keys(&message, &keypairs);
    bridge.approve_token_transfer(message, signatures).unwrap();

    // anyone may trigger delivery; the coin goes to the recorded owner
    let (coin, owner) = bridge
        .claim_and_transfer_token(0, BridgeChainId::EthSepolia as u8, 10)
        .unwrap();
    assert_eq!(owner, inbound_claimer());
    assert_eq!(coin.unwrap().value(), 12345);
}

#[test]
fn test_emergency_pause_and_unpause() {
    let (committee, keypairs) = test_committee(&[5000, 5000]);
    let mut treasury = setup_treasury_with_eth_and_usdt();
    let eth = mint_test_coin(&mut treasury, TOKEN_ID_ETH, 10);
    let mut bridge = Bridge::new(
        BridgeChainId::StarcoinTestnet,
        committee,
        treasury,
        TransferLimiter::new(),
    );

    // pause threshold is 450 bps: a single signer is plenty
    let pause = create_emergency_op_message(BridgeChainId::StarcoinTestnet, 0, EmergencyOpType::Pause);
    let signatures = sign_message_with_keys(&pause, &keypairs[..1]);
    bridge.execute_system_message(pause, signatures).unwrap();
    assert!(bridge.paused());
    assert!(matches!(
        bridge.events().last().unwrap(),
        BridgeEvent::EmergencyOpEvent(event) if event.frozen
    ));

    // value flow is rejected while paused
    let error = bridge
        .send_token(
            test_starcoin_address(1),
            BridgeChainId::EthSepolia as u8,
            vec![0u8; 20],
            eth,
        )
        .unwrap_err();
    assert_eq!(error, BridgeError::BridgeUnavailable);

    // pausing twice fails and does not advance the sequence number
    let pause_again =
        create_emergency_op_message(BridgeChainId::StarcoinTestnet, 1, EmergencyOpType::Pause);
    let signatures = sign_message_with_keys(&pause_again, &keypairs[..1]);
    assert_eq!(
        bridge.execute_system_message(pause_again, signatures).unwrap_err(),
        BridgeError::BridgeAlreadyPaused
    );
    assert_eq!(bridge.sequence_num(BridgeMessageType::EmergencyOp), 1);

    // unpause needs 5001 bps: one 5000 bps signer is not enough
    let unpause =
        create_emergency_op_message(BridgeChainId::StarcoinTestnet, 1, EmergencyOpType::Unpause);
    let signatures = sign_message_with_keys(&unpause, &keypairs[..1]);
    assert_eq!(
        bridge
            .execute_system_message(unpause.clone(), signatures)
            .unwrap_err(),
        BridgeError::SignatureBelowThreshold
    );
    assert!(bridge.paused());

    let signatures = sign_message_with_keys(&unpause, &keypairs);
    bridge.execute_system_message(unpause, signatures).unwrap();
    assert!(!bridge.paused());
    assert_eq!(bridge.sequence_num(BridgeMessageType::EmergencyOp), 2);
}

#[test]
fn test_signature_threshold_forgery_rejected() {
    // the whole committee only holds 3000 bps, below the 3334 bps a token
    // transfer needs
    let (committee, keypairs) = test_committee(&[1000, 1000, 1000]);
    let treasury = setup_treasury_with_eth_and_usdt();
    let mut bridge = Bridge::new(
        BridgeChainId::StarcoinTestnet,
        committee,
        treasury,
        TransferLimiter::new(),
    );

    let message = BridgeMessage::from_wire_bytes(&INBOUND_TRANSFER_HEX).unwrap();
    let key = message.key();
    let signatures = sign_message_with_keys(&message, &keypairs);
    assert_eq!(
        bridge.approve_token_transfer(message, signatures).unwrap_err(),
        BridgeError::SignatureBelowThreshold
    );
    assert!(bridge.record(&key).is_none());
}
