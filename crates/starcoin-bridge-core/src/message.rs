// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Construction and parsing of the bridge message variants.
//!
//! Wire format, shared bit-exactly with the peer bridges:
//!
//! ```text
//! byte 0        message_type (u8)
//! byte 1        message_version (u8) = 1
//! bytes 2..=9   seq_num (u64, big-endian)
//! byte 10       source_chain (u8)
//! bytes 11..    payload (message-type specific)
//! ```
//!
//! Payload vectors are ULEB128-length-prefixed BCS; the numeric fields
//! `seq_num`, `amount`, `new_limit` and `new_price` are big-endian. Every
//! extractor consumes the full payload and rejects trailing bytes.

use ethers::types::Address as EthAddress;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::{
    base_types::{EVM_ADDRESS_LENGTH, STARCOIN_ADDRESS_LENGTH},
    chain_ids::{assert_valid_chain_id, BridgeChainId},
    encoding::{write_vec_u8, write_vec_u64, write_vec_vec_u8, BcsReader},
    error::{BridgeError, BridgeResult},
};

pub const CURRENT_MESSAGE_VERSION: u8 = 1;

/// 1 + 32 + 1 + 1 + 20 + 1 + 8 with a 32-byte home address and a 20-byte
/// EVM address, in either direction.
pub const TOKEN_TRANSFER_PAYLOAD_SIZE: usize = 64;

// Committee thresholds per message type, in bps of total voting power.
pub const APPROVAL_THRESHOLD_TOKEN_TRANSFER: u64 = 3334;
pub const APPROVAL_THRESHOLD_EMERGENCY_PAUSE: u64 = 450;
pub const APPROVAL_THRESHOLD_EMERGENCY_UNPAUSE: u64 = 5001;
pub const APPROVAL_THRESHOLD_COMMITTEE_BLOCKLIST: u64 = 5001;
pub const APPROVAL_THRESHOLD_LIMIT_UPDATE: u64 = 5001;
pub const APPROVAL_THRESHOLD_ASSET_PRICE_UPDATE: u64 = 5001;
pub const APPROVAL_THRESHOLD_ADD_TOKENS_ON_STARCOIN: u64 = 5001;

#[derive(
    Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, TryFromPrimitive, Hash,
)]
#[repr(u8)]
pub enum BridgeMessageType {
    TokenTransfer = 0,
    CommitteeBlocklist = 1,
    EmergencyOp = 2,
    UpdateBridgeLimit = 3,
    UpdateAssetPrice = 4,
    AddTokensOnStarcoin = 5,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, TryFromPrimitive)]
#[repr(u8)]
pub enum BlocklistType {
    Blocklist = 0,
    Unblocklist = 1,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, TryFromPrimitive)]
#[repr(u8)]
pub enum EmergencyOpType {
    Pause = 0,
    Unpause = 1,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Hash)]
pub struct BridgeMessage {
    pub message_type: u8,
    pub message_version: u8,
    pub seq_num: u64,
    pub source_chain: u8,
    pub payload: Vec<u8>,
}

/// Uniquely identifies any message ever handled by the bridge.
#[derive(
    Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash,
)]
pub struct BridgeMessageKey {
    pub source_chain: u8,
    pub message_type: u8,
    pub bridge_seq_num: u64,
}

impl BridgeMessage {
    pub fn key(&self) -> BridgeMessageKey {
        BridgeMessageKey {
            source_chain: self.source_chain,
            message_type: self.message_type,
            bridge_seq_num: self.seq_num,
        }
    }

    /// Parses a message from its wire bytes.
    pub fn from_wire_bytes(bytes: &[u8]) -> BridgeResult<Self> {
        let mut reader = BcsReader::new(bytes.to_vec());
        let message_type = reader.peel_u8()?;
        let message_version = reader.peel_u8()?;
        let seq_num = reader.peel_u64_be()?;
        let source_chain = reader.peel_u8()?;
        Ok(Self {
            message_type,
            message_version,
            seq_num,
            source_chain,
            payload: reader.into_remainder_bytes(),
        })
    }
}

/// The wire bytes of `message`; also the suffix of the signing preimage.
pub fn serialize_message(message: &BridgeMessage) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(11 + message.payload.len());
    bytes.push(message.message_type);
    bytes.push(message.message_version);
    bytes.extend_from_slice(&message.seq_num.to_be_bytes());
    bytes.push(message.source_chain);
    bytes.extend_from_slice(&message.payload);
    bytes
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenTransferPayload {
    pub sender_address: Vec<u8>,
    pub target_chain: u8,
    pub target_address: Vec<u8>,
    pub token_type: u8,
    pub amount: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EmergencyOpPayload {
    pub op_type: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BlocklistPayload {
    pub blocklist_type: u8,
    pub members: Vec<EthAddress>,
}

impl BlocklistPayload {
    /// Anything but an explicit un-blocklist request blocklists.
    pub fn is_blocklist_request(&self) -> bool {
        self.blocklist_type != BlocklistType::Unblocklist as u8
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UpdateBridgeLimitPayload {
    pub receiving_chain: u8,
    pub sending_chain: u8,
    pub new_limit: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UpdateAssetPricePayload {
    pub token_id: u8,
    pub new_price: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AddTokensOnStarcoinPayload {
    pub native_token: bool,
    pub token_ids: Vec<u8>,
    pub token_type_names: Vec<String>,
    pub token_prices: Vec<u64>,
}

fn expected_address_length(chain: BridgeChainId) -> usize {
    if chain.is_starcoin_chain() {
        STARCOIN_ADDRESS_LENGTH
    } else {
        EVM_ADDRESS_LENGTH
    }
}

pub fn create_token_bridge_message(
    source_chain: BridgeChainId,
    seq_num: u64,
    sender_address: Vec<u8>,
    target_chain: BridgeChainId,
    target_address: Vec<u8>,
    token_type: u8,
    amount: u64,
) -> BridgeResult<BridgeMessage> {
    if sender_address.len() != expected_address_length(source_chain)
        || target_address.len() != expected_address_length(target_chain)
    {
        return Err(BridgeError::InvalidAddressLength);
    }
    let mut payload = Vec::with_capacity(TOKEN_TRANSFER_PAYLOAD_SIZE);
    write_vec_u8(&mut payload, &sender_address);
    payload.push(target_chain as u8);
    write_vec_u8(&mut payload, &target_address);
    payload.push(token_type);
    payload.extend_from_slice(&amount.to_be_bytes());
    if payload.len() != TOKEN_TRANSFER_PAYLOAD_SIZE {
        return Err(BridgeError::InvalidPayloadLength);
    }
    Ok(BridgeMessage {
        message_type: BridgeMessageType::TokenTransfer as u8,
        message_version: CURRENT_MESSAGE_VERSION,
        seq_num,
        source_chain: source_chain as u8,
        payload,
    })
}

pub fn create_emergency_op_message(
    source_chain: BridgeChainId,
    seq_num: u64,
    op_type: EmergencyOpType,
) -> BridgeMessage {
    BridgeMessage {
        message_type: BridgeMessageType::EmergencyOp as u8,
        message_version: CURRENT_MESSAGE_VERSION,
        seq_num,
        source_chain: source_chain as u8,
        payload: vec![op_type as u8],
    }
}

pub fn create_blocklist_message(
    source_chain: BridgeChainId,
    seq_num: u64,
    blocklist_type: BlocklistType,
    members: &[EthAddress],
) -> BridgeResult<BridgeMessage> {
    if members.is_empty() {
        return Err(BridgeError::EmptyBlocklist);
    }
    let mut payload = vec![blocklist_type as u8, members.len() as u8];
    for member in members {
        payload.extend_from_slice(member.as_bytes());
    }
    Ok(BridgeMessage {
        message_type: BridgeMessageType::CommitteeBlocklist as u8,
        message_version: CURRENT_MESSAGE_VERSION,
        seq_num,
        source_chain: source_chain as u8,
        payload,
    })
}

/// The message travels with `source_chain` set to the *receiving* chain;
/// the sending chain of the capped route rides in the payload.
pub fn create_update_bridge_limit_message(
    receiving_chain: BridgeChainId,
    seq_num: u64,
    sending_chain: BridgeChainId,
    new_limit: u64,
) -> BridgeMessage {
    let mut payload = vec![sending_chain as u8];
    payload.extend_from_slice(&new_limit.to_be_bytes());
    BridgeMessage {
        message_type: BridgeMessageType::UpdateBridgeLimit as u8,
        message_version: CURRENT_MESSAGE_VERSION,
        seq_num,
        source_chain: receiving_chain as u8,
        payload,
    }
}

pub fn create_update_asset_price_message(
    source_chain: BridgeChainId,
    seq_num: u64,
    token_id: u8,
    new_price: u64,
) -> BridgeMessage {
    let mut payload = vec![token_id];
    payload.extend_from_slice(&new_price.to_be_bytes());
    BridgeMessage {
        message_type: BridgeMessageType::UpdateAssetPrice as u8,
        message_version: CURRENT_MESSAGE_VERSION,
        seq_num,
        source_chain: source_chain as u8,
        payload,
    }
}

pub fn create_add_tokens_on_starcoin_message(
    source_chain: BridgeChainId,
    seq_num: u64,
    native_token: bool,
    token_ids: &[u8],
    token_type_names: &[String],
    token_prices: &[u64],
) -> BridgeResult<BridgeMessage> {
    if token_ids.len() != token_type_names.len() || token_ids.len() != token_prices.len() {
        return Err(BridgeError::MalformedMessage);
    }
    let mut payload = vec![native_token as u8];
    write_vec_u8(&mut payload, token_ids);
    let name_bytes: Vec<Vec<u8>> = token_type_names
        .iter()
        .map(|name| name.as_bytes().to_vec())
        .collect();
    write_vec_vec_u8(&mut payload, &name_bytes);
    write_vec_u64(&mut payload, token_prices);
    Ok(BridgeMessage {
        message_type: BridgeMessageType::AddTokensOnStarcoin as u8,
        message_version: CURRENT_MESSAGE_VERSION,
        seq_num,
        source_chain: source_chain as u8,
        payload,
    })
}

fn finish<T>(reader: BcsReader, value: T) -> BridgeResult<T> {
    if reader.is_empty() {
        Ok(value)
    } else {
        Err(BridgeError::TrailingBytes)
    }
}

fn assert_message_is(message: &BridgeMessage, expected: BridgeMessageType) -> BridgeResult<()> {
    if message.message_type != expected as u8 {
        return Err(BridgeError::UnexpectedMessageType);
    }
    Ok(())
}

pub fn extract_token_bridge_payload(message: &BridgeMessage) -> BridgeResult<TokenTransferPayload> {
    assert_message_is(message, BridgeMessageType::TokenTransfer)?;
    if message.payload.len() != TOKEN_TRANSFER_PAYLOAD_SIZE {
        return Err(BridgeError::InvalidPayloadLength);
    }
    let source_chain = assert_valid_chain_id(message.source_chain)?;
    let mut reader = BcsReader::new(message.payload.clone());
    let sender_address = reader.peel_vec_u8()?;
    let target_chain = assert_valid_chain_id(reader.peel_u8()?)?;
    let target_address = reader.peel_vec_u8()?;
    let token_type = reader.peel_u8()?;
    let amount = reader.peel_u64_be()?;
    if sender_address.len() != expected_address_length(source_chain)
        || target_address.len() != expected_address_length(target_chain)
    {
        return Err(BridgeError::InvalidAddressLength);
    }
    finish(
        reader,
        TokenTransferPayload {
            sender_address,
            target_chain: target_chain as u8,
            target_address,
            token_type,
            amount,
        },
    )
}

pub fn extract_emergency_op_payload(message: &BridgeMessage) -> BridgeResult<EmergencyOpPayload> {
    assert_message_is(message, BridgeMessageType::EmergencyOp)?;
    let mut reader = BcsReader::new(message.payload.clone());
    let op_type = reader.peel_u8()?;
    finish(reader, EmergencyOpPayload { op_type })
}

pub fn extract_blocklist_payload(message: &BridgeMessage) -> BridgeResult<BlocklistPayload> {
    assert_message_is(message, BridgeMessageType::CommitteeBlocklist)?;
    let mut reader = BcsReader::new(message.payload.clone());
    let blocklist_type = reader.peel_u8()?;
    let count = reader.peel_u8()?;
    if count == 0 {
        return Err(BridgeError::EmptyBlocklist);
    }
    let mut members = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let bytes = reader.peel_bytes(EVM_ADDRESS_LENGTH)?;
        members.push(EthAddress::from_slice(&bytes));
    }
    finish(
        reader,
        BlocklistPayload {
            blocklist_type,
            members,
        },
    )
}

pub fn extract_update_bridge_limit_payload(
    message: &BridgeMessage,
) -> BridgeResult<UpdateBridgeLimitPayload> {
    assert_message_is(message, BridgeMessageType::UpdateBridgeLimit)?;
    let mut reader = BcsReader::new(message.payload.clone());
    let sending_chain = assert_valid_chain_id(reader.peel_u8()?)?;
    let new_limit = reader.peel_u64_be()?;
    finish(
        reader,
        UpdateBridgeLimitPayload {
            receiving_chain: message.source_chain,
            sending_chain: sending_chain as u8,
            new_limit,
        },
    )
}

pub fn extract_update_asset_price_payload(
    message: &BridgeMessage,
) -> BridgeResult<UpdateAssetPricePayload> {
    assert_message_is(message, BridgeMessageType::UpdateAssetPrice)?;
    let mut reader = BcsReader::new(message.payload.clone());
    let token_id = reader.peel_u8()?;
    let new_price = reader.peel_u64_be()?;
    finish(reader, UpdateAssetPricePayload { token_id, new_price })
}

pub fn extract_add_tokens_on_starcoin_payload(
    message: &BridgeMessage,
) -> BridgeResult<AddTokensOnStarcoinPayload> {
    assert_message_is(message, BridgeMessageType::AddTokensOnStarcoin)?;
    let mut reader = BcsReader::new(message.payload.clone());
    let native_token = reader.peel_bool()?;
    let token_ids = reader.peel_vec_u8()?;
    let token_type_names = reader
        .peel_vec_vec_u8()?
        .into_iter()
        .map(|bytes| String::from_utf8(bytes).map_err(|_| BridgeError::MalformedMessage))
        .collect::<BridgeResult<Vec<_>>>()?;
    let token_prices = reader.peel_vec_u64()?;
    finish(
        reader,
        AddTokensOnStarcoinPayload {
            native_token,
            token_ids,
            token_type_names,
            token_prices,
        },
    )
}

/// Minimum aggregate committee voting power (bps of 10,000) for the message
/// to take effect.
pub fn required_voting_power(message: &BridgeMessage) -> BridgeResult<u64> {
    let message_type = BridgeMessageType::try_from(message.message_type)
        .map_err(|_| BridgeError::UnexpectedMessageType)?;
    Ok(match message_type {
        BridgeMessageType::TokenTransfer => APPROVAL_THRESHOLD_TOKEN_TRANSFER,
        BridgeMessageType::CommitteeBlocklist => APPROVAL_THRESHOLD_COMMITTEE_BLOCKLIST,
        BridgeMessageType::EmergencyOp => {
            let payload = extract_emergency_op_payload(message)?;
            match EmergencyOpType::try_from(payload.op_type) {
                Ok(EmergencyOpType::Pause) => APPROVAL_THRESHOLD_EMERGENCY_PAUSE,
                Ok(EmergencyOpType::Unpause) => APPROVAL_THRESHOLD_EMERGENCY_UNPAUSE,
                Err(_) => return Err(BridgeError::UnexpectedEmergencyOpType),
            }
        }
        BridgeMessageType::UpdateBridgeLimit => APPROVAL_THRESHOLD_LIMIT_UPDATE,
        BridgeMessageType::UpdateAssetPrice => APPROVAL_THRESHOLD_ASSET_PRICE_UPDATE,
        BridgeMessageType::AddTokensOnStarcoin => APPROVAL_THRESHOLD_ADD_TOKENS_ON_STARCOIN,
    })
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::treasury::TOKEN_ID_USDT;

    fn sample_evm_address() -> Vec<u8> {
        hex!("00000000000000000000000000000000000000c8").to_vec()
    }

    fn sample_starcoin_address() -> Vec<u8> {
        hex!("0000000000000000000000000000000000000000000000000000000000000064").to_vec()
    }

    #[test]
    fn test_token_message_golden_bytes() {
        let message = create_token_bridge_message(
            BridgeChainId::EthSepolia,
            10,
            sample_evm_address(),
            BridgeChainId::StarcoinTestnet,
            sample_starcoin_address(),
            TOKEN_ID_USDT,
            12345,
        )
        .unwrap();
        let expected = hex!("0001000000000000000a0b1400000000000000000000000000000000000000c801200000000000000000000000000000000000000000000000000000000000000064030000000000003039");
        assert_eq!(serialize_message(&message), expected.to_vec());

        let parsed = BridgeMessage::from_wire_bytes(&expected).unwrap();
        assert_eq!(parsed, message);

        let payload = extract_token_bridge_payload(&message).unwrap();
        assert_eq!(payload.sender_address, sample_evm_address());
        assert_eq!(payload.target_chain, BridgeChainId::StarcoinTestnet as u8);
        assert_eq!(payload.target_address, sample_starcoin_address());
        assert_eq!(payload.token_type, TOKEN_ID_USDT);
        assert_eq!(payload.amount, 12345);
    }

    #[test]
    fn test_token_message_round_trip_home_to_evm() {
        let message = create_token_bridge_message(
            BridgeChainId::StarcoinDevnet,
            0,
            sample_starcoin_address(),
            BridgeChainId::EthSepolia,
            sample_evm_address(),
            2,
            10,
        )
        .unwrap();
        assert_eq!(message.payload.len(), TOKEN_TRANSFER_PAYLOAD_SIZE);
        let parsed = BridgeMessage::from_wire_bytes(&serialize_message(&message)).unwrap();
        assert_eq!(parsed, message);
        let payload = extract_token_bridge_payload(&parsed).unwrap();
        assert_eq!(payload.amount, 10);
    }

    #[test]
    fn test_token_message_rejects_wrong_address_lengths() {
        assert_eq!(
            create_token_bridge_message(
                BridgeChainId::StarcoinDevnet,
                0,
                sample_evm_address(), // 20 bytes on a 32-byte chain
                BridgeChainId::EthSepolia,
                sample_evm_address(),
                2,
                10,
            )
            .unwrap_err(),
            BridgeError::InvalidAddressLength
        );
    }

    #[test]
    fn test_token_payload_must_be_64_bytes() {
        let mut message = create_token_bridge_message(
            BridgeChainId::EthSepolia,
            1,
            sample_evm_address(),
            BridgeChainId::StarcoinTestnet,
            sample_starcoin_address(),
            1,
            7,
        )
        .unwrap();
        message.payload.push(0);
        assert_eq!(
            extract_token_bridge_payload(&message).unwrap_err(),
            BridgeError::InvalidPayloadLength
        );
    }

    #[test]
    fn test_emergency_op_round_trip() {
        let message =
            create_emergency_op_message(BridgeChainId::StarcoinDevnet, 0, EmergencyOpType::Pause);
        assert_eq!(
            serialize_message(&message),
            hex!("020100000000000000000200")
        );
        let payload = extract_emergency_op_payload(&message).unwrap();
        assert_eq!(payload.op_type, EmergencyOpType::Pause as u8);

        // trailing byte is rejected
        let mut bad = message.clone();
        bad.payload.push(0xff);
        assert_eq!(
            extract_emergency_op_payload(&bad).unwrap_err(),
            BridgeError::TrailingBytes
        );
    }

    #[test]
    fn test_blocklist_round_trip() {
        let member = EthAddress::from_slice(&sample_evm_address());
        let message = create_blocklist_message(
            BridgeChainId::StarcoinTestnet,
            129,
            BlocklistType::Blocklist,
            &[member, member],
        )
        .unwrap();
        let payload = extract_blocklist_payload(&message).unwrap();
        assert!(payload.is_blocklist_request());
        assert_eq!(payload.members, vec![member, member]);

        let unblock = create_blocklist_message(
            BridgeChainId::StarcoinTestnet,
            130,
            BlocklistType::Unblocklist,
            &[member],
        )
        .unwrap();
        assert!(!extract_blocklist_payload(&unblock).unwrap().is_blocklist_request());

        assert_eq!(
            create_blocklist_message(BridgeChainId::StarcoinTestnet, 131, BlocklistType::Blocklist, &[])
                .unwrap_err(),
            BridgeError::EmptyBlocklist
        );
    }

    #[test]
    fn test_update_bridge_limit_round_trip() {
        let message = create_update_bridge_limit_message(
            BridgeChainId::StarcoinTestnet,
            3,
            BridgeChainId::EthSepolia,
            1_000_000 * 100_000_000,
        );
        let payload = extract_update_bridge_limit_payload(&message).unwrap();
        assert_eq!(payload.receiving_chain, BridgeChainId::StarcoinTestnet as u8);
        assert_eq!(payload.sending_chain, BridgeChainId::EthSepolia as u8);
        assert_eq!(payload.new_limit, 1_000_000 * 100_000_000);
    }

    #[test]
    fn test_update_asset_price_round_trip() {
        let message =
            create_update_asset_price_message(BridgeChainId::StarcoinTestnet, 4, 2, 5 * 100_000_000);
        assert_eq!(
            serialize_message(&message),
            hex!("040100000000000000040102000000001dcd6500")
        );
        let payload = extract_update_asset_price_payload(&message).unwrap();
        assert_eq!(payload.token_id, 2);
        assert_eq!(payload.new_price, 500_000_000);
    }

    #[test]
    fn test_add_tokens_round_trip() {
        let message = create_add_tokens_on_starcoin_message(
            BridgeChainId::StarcoinDevnet,
            5,
            false,
            &[5, 6],
            &["0x1::XBTC::XBTC".to_string(), "0x1::XETH::XETH".to_string()],
            &[6_000_000_000_000, 250_000_000_000],
        )
        .unwrap();
        let payload = extract_add_tokens_on_starcoin_payload(&message).unwrap();
        assert!(!payload.native_token);
        assert_eq!(payload.token_ids, vec![5, 6]);
        assert_eq!(
            payload.token_type_names,
            vec!["0x1::XBTC::XBTC".to_string(), "0x1::XETH::XETH".to_string()]
        );
        assert_eq!(payload.token_prices, vec![6_000_000_000_000, 250_000_000_000]);

        assert_eq!(
            create_add_tokens_on_starcoin_message(
                BridgeChainId::StarcoinDevnet,
                5,
                false,
                &[5],
                &[],
                &[1],
            )
            .unwrap_err(),
            BridgeError::MalformedMessage
        );
    }

    #[test]
    fn test_required_voting_power() {
        let token = create_token_bridge_message(
            BridgeChainId::EthSepolia,
            0,
            sample_evm_address(),
            BridgeChainId::StarcoinTestnet,
            sample_starcoin_address(),
            1,
            1,
        )
        .unwrap();
        assert_eq!(required_voting_power(&token).unwrap(), 3334);

        let pause =
            create_emergency_op_message(BridgeChainId::StarcoinTestnet, 0, EmergencyOpType::Pause);
        assert_eq!(required_voting_power(&pause).unwrap(), 450);

        let unpause =
            create_emergency_op_message(BridgeChainId::StarcoinTestnet, 1, EmergencyOpType::Unpause);
        assert_eq!(required_voting_power(&unpause).unwrap(), 5001);

        let mut unknown_op = pause.clone();
        unknown_op.payload = vec![9];
        assert_eq!(
            required_voting_power(&unknown_op).unwrap_err(),
            BridgeError::UnexpectedEmergencyOpType
        );

        let limit = create_update_bridge_limit_message(
            BridgeChainId::StarcoinTestnet,
            0,
            BridgeChainId::EthSepolia,
            1,
        );
        assert_eq!(required_voting_power(&limit).unwrap(), 5001);
    }
}
