// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The bridge orchestrator: sequence-number discipline, the
//! approve/claim lifecycle of token transfers, emergency pause, and
//! dispatch of committee-signed governance messages.
//!
//! A transfer key walks this state machine:
//!
//! ```text
//! Absent   ── send_token ─────────▶ Pending
//! Absent   ── approve (remote) ───▶ Approved
//! Pending  ── approve (home) ─────▶ Approved
//! Pending  ── approve duplicate ──▶ Pending   (idempotent, event only)
//! Approved ── approve duplicate ──▶ Approved  (idempotent)
//! Approved ── claim, limit ok ────▶ Claimed
//! Approved ── claim, over limit ──▶ Approved  (event, returns None)
//! Claimed  ── claim ──────────────▶ Claimed   (idempotent, event only)
//! ```
//!
//! Every public operation either commits completely or returns an error
//! without mutating state; the idempotent paths above emit their event and
//! return `Ok`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    base_types::{StarcoinAddress, EVM_ADDRESS_LENGTH},
    chain_ids::{assert_valid_chain_id, get_route, is_valid_route, BridgeChainId},
    committee::BridgeCommittee,
    error::{BridgeError, BridgeResult},
    events::{
        BridgeEvent, EmergencyOpEvent, EventLog, TokenDepositedEvent, TokenTransferAlreadyApproved,
        TokenTransferAlreadyClaimed, TokenTransferApproved, TokenTransferClaimed,
        TokenTransferLimitExceed,
    },
    limiter::TransferLimiter,
    message::{
        create_token_bridge_message, extract_add_tokens_on_starcoin_payload,
        extract_blocklist_payload, extract_emergency_op_payload, extract_token_bridge_payload,
        extract_update_asset_price_payload, extract_update_bridge_limit_payload,
        BridgeMessage, BridgeMessageKey, BridgeMessageType, EmergencyOpType,
        CURRENT_MESSAGE_VERSION,
    },
    treasury::{BridgeTreasury, BurnCapability, Coin, MintCapability},
};

/// Approval/claim lifecycle of one transfer message.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BridgeRecord {
    message: BridgeMessage,
    verified_signatures: Option<Vec<Vec<u8>>>,
    claimed: bool,
}

impl BridgeRecord {
    pub fn message(&self) -> &BridgeMessage {
        &self.message
    }

    pub fn verified_signatures(&self) -> Option<&Vec<Vec<u8>>> {
        self.verified_signatures.as_ref()
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Bridge {
    chain_id: BridgeChainId,
    // next sequence number per message type
    sequence_nums: BTreeMap<u8, u64>,
    committee: BridgeCommittee,
    treasury: BridgeTreasury,
    limiter: TransferLimiter,
    token_transfer_records: BTreeMap<BridgeMessageKey, BridgeRecord>,
    paused: bool,
    event_log: EventLog,
}

impl Bridge {
    /// A bridge with empty committee, treasury and limiter. The chain id
    /// must be a home-chain id.
    pub fn create(chain_id: u8) -> BridgeResult<Self> {
        let chain_id = assert_valid_chain_id(chain_id)?;
        if !chain_id.is_starcoin_chain() {
            return Err(BridgeError::InvalidChainId);
        }
        Ok(Self::new(
            chain_id,
            BridgeCommittee::new(),
            BridgeTreasury::new(),
            TransferLimiter::new(),
        ))
    }

    /// Genesis-style wiring from pre-built components.
    pub fn new(
        chain_id: BridgeChainId,
        committee: BridgeCommittee,
        treasury: BridgeTreasury,
        limiter: TransferLimiter,
    ) -> Self {
        Self {
            chain_id,
            sequence_nums: BTreeMap::new(),
            committee,
            treasury,
            limiter,
            token_transfer_records: BTreeMap::new(),
            paused: false,
            event_log: EventLog::new(),
        }
    }

    pub fn chain_id(&self) -> BridgeChainId {
        self.chain_id
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn committee(&self) -> &BridgeCommittee {
        &self.committee
    }

    pub fn treasury(&self) -> &BridgeTreasury {
        &self.treasury
    }

    pub fn limiter(&self) -> &TransferLimiter {
        &self.limiter
    }

    pub fn events(&self) -> &[BridgeEvent] {
        self.event_log.events()
    }

    pub fn record(&self, key: &BridgeMessageKey) -> Option<&BridgeRecord> {
        self.token_transfer_records.get(key)
    }

    /// The next sequence number the bridge will accept (or mint) for
    /// `message_type`.
    pub fn sequence_num(&self, message_type: BridgeMessageType) -> u64 {
        self.sequence_nums
            .get(&(message_type as u8))
            .copied()
            .unwrap_or(0)
    }

    fn assert_not_paused(&self) -> BridgeResult<()> {
        if self.paused {
            return Err(BridgeError::BridgeUnavailable);
        }
        Ok(())
    }

    fn get_current_seq_num_and_increment(&mut self, message_type: BridgeMessageType) -> u64 {
        let entry = self.sequence_nums.entry(message_type as u8).or_insert(0);
        let current = *entry;
        *entry += 1;
        current
    }

    // Entry points delegating to the owned components.

    pub fn register_foreign_token(
        &mut self,
        mint_cap: MintCapability,
        burn_cap: BurnCapability,
        decimal: u8,
    ) -> BridgeResult<()> {
        self.treasury
            .register_foreign_token(mint_cap, burn_cap, decimal, &mut self.event_log)
    }

    pub fn committee_registration(
        &mut self,
        active_validators: &BTreeMap<StarcoinAddress, u64>,
        sender: StarcoinAddress,
        bridge_pubkey_bytes: &[u8],
        http_rest_url: Vec<u8>,
    ) -> BridgeResult<()> {
        self.committee.register(
            active_validators,
            sender,
            bridge_pubkey_bytes,
            http_rest_url,
            &mut self.event_log,
        )
    }

    pub fn init_bridge_committee(
        &mut self,
        active_validator_voting_power: &BTreeMap<StarcoinAddress, u64>,
        min_stake_participation_bps: u64,
        epoch: u64,
    ) {
        self.committee.try_create_next_committee(
            active_validator_voting_power,
            min_stake_participation_bps,
            epoch,
            &mut self.event_log,
        );
    }

    pub fn update_node_url(
        &mut self,
        sender: StarcoinAddress,
        new_url: Vec<u8>,
    ) -> BridgeResult<()> {
        self.committee
            .update_node_url(sender, new_url, &mut self.event_log)
    }

    /// Sends `token` to `target_address` on `target_chain`: burns the coin,
    /// mints the next transfer sequence number and stores the pending
    /// record.
    pub fn send_token(
        &mut self,
        sender: StarcoinAddress,
        target_chain: u8,
        target_address: Vec<u8>,
        token: Coin,
    ) -> BridgeResult<()> {
        self.assert_not_paused()?;
        let target_chain = assert_valid_chain_id(target_chain)?;
        if !is_valid_route(self.chain_id, target_chain) {
            return Err(BridgeError::InvalidBridgeRoute);
        }
        if target_address.len() != EVM_ADDRESS_LENGTH {
            return Err(BridgeError::InvalidAddressLength);
        }
        if token.value() == 0 {
            return Err(BridgeError::TokenValueIsZero);
        }
        let token_id = self.treasury.token_id(token.type_name())?;
        let amount = token.value();

        let seq_num = self.get_current_seq_num_and_increment(BridgeMessageType::TokenTransfer);
        let message = create_token_bridge_message(
            self.chain_id,
            seq_num,
            sender.to_vec(),
            target_chain,
            target_address.clone(),
            token_id,
            amount,
        )?;
        self.treasury.burn(token)?;
        let key = message.key();
        self.token_transfer_records.insert(
            key,
            BridgeRecord {
                message,
                verified_signatures: None,
                claimed: false,
            },
        );
        tracing::info!(
            seq_num,
            target_chain = target_chain as u8,
            token_id,
            amount,
            "token deposited"
        );
        self.event_log.emit(TokenDepositedEvent {
            seq_num,
            source_chain: self.chain_id as u8,
            sender_address: sender.to_vec(),
            target_chain: target_chain as u8,
            target_address,
            token_type: token_id,
            amount,
        });
        Ok(())
    }

    /// Stores committee signatures for a transfer. Re-approving an
    /// approved transfer emits `TokenTransferAlreadyApproved` and leaves
    /// state unchanged.
    pub fn approve_token_transfer(
        &mut self,
        message: BridgeMessage,
        signatures: Vec<Vec<u8>>,
    ) -> BridgeResult<()> {
        self.assert_not_paused()?;
        self.committee.verify_signatures(&message, &signatures)?;
        if message.message_type != BridgeMessageType::TokenTransfer as u8 {
            return Err(BridgeError::UnexpectedMessageType);
        }
        if message.message_version != CURRENT_MESSAGE_VERSION {
            return Err(BridgeError::UnexpectedMessageVersion);
        }
        let payload = extract_token_bridge_payload(&message)?;
        let source_chain = assert_valid_chain_id(message.source_chain)?;
        let target_chain = assert_valid_chain_id(payload.target_chain)?;
        if source_chain != self.chain_id && target_chain != self.chain_id {
            return Err(BridgeError::UnexpectedChainId);
        }
        let key = message.key();

        if source_chain == self.chain_id {
            // home-initiated: the record was created at send time
            let record = self
                .token_transfer_records
                .get_mut(&key)
                .ok_or(BridgeError::MessageNotFoundInRecords)?;
            if record.message != message {
                return Err(BridgeError::MalformedMessage);
            }
            if record.claimed {
                return Err(BridgeError::RecordAlreadyClaimed);
            }
            if record.verified_signatures.is_some() {
                self.event_log
                    .emit(TokenTransferAlreadyApproved { message_key: key });
                return Ok(());
            }
            record.verified_signatures = Some(signatures);
        } else {
            // remote-initiated: the first approval creates the record
            if self.token_transfer_records.contains_key(&key) {
                self.event_log
                    .emit(TokenTransferAlreadyApproved { message_key: key });
                return Ok(());
            }
            self.token_transfer_records.insert(
                key,
                BridgeRecord {
                    message,
                    verified_signatures: Some(signatures),
                    claimed: false,
                },
            );
        }
        tracing::info!(?key, "token transfer approved");
        self.event_log
            .emit(TokenTransferApproved { message_key: key });
        Ok(())
    }

    /// Claims an approved inbound transfer for `claimer`, who must be the
    /// recorded target. Returns `None` (with an event) when the transfer
    /// was already claimed or currently exceeds the route limit.
    pub fn claim_token(
        &mut self,
        clock_ms: u64,
        claimer: StarcoinAddress,
        source_chain: u8,
        bridge_seq_num: u64,
    ) -> BridgeResult<Option<Coin>> {
        let owner = self.record_target(source_chain, bridge_seq_num)?;
        if claimer != owner {
            return Err(BridgeError::UnauthorizedClaim);
        }
        let (token, _owner) = self.claim_token_internal(clock_ms, source_chain, bridge_seq_num)?;
        Ok(token)
    }

    /// Like [`Bridge::claim_token`] but callable by anyone; the coin is
    /// returned together with the recorded owner for delivery.
    pub fn claim_and_transfer_token(
        &mut self,
        clock_ms: u64,
        source_chain: u8,
        bridge_seq_num: u64,
    ) -> BridgeResult<(Option<Coin>, StarcoinAddress)> {
        self.claim_token_internal(clock_ms, source_chain, bridge_seq_num)
    }

    /// The recorded target address of an inbound transfer.
    fn record_target(&self, source_chain: u8, bridge_seq_num: u64) -> BridgeResult<StarcoinAddress> {
        let key = BridgeMessageKey {
            source_chain,
            message_type: BridgeMessageType::TokenTransfer as u8,
            bridge_seq_num,
        };
        let record = self
            .token_transfer_records
            .get(&key)
            .ok_or(BridgeError::MessageNotFoundInRecords)?;
        let payload = extract_token_bridge_payload(&record.message)?;
        StarcoinAddress::from_bytes(&payload.target_address)
    }

    fn claim_token_internal(
        &mut self,
        clock_ms: u64,
        source_chain: u8,
        bridge_seq_num: u64,
    ) -> BridgeResult<(Option<Coin>, StarcoinAddress)> {
        self.assert_not_paused()?;
        let source_chain = assert_valid_chain_id(source_chain)?;
        let key = BridgeMessageKey {
            source_chain: source_chain as u8,
            message_type: BridgeMessageType::TokenTransfer as u8,
            bridge_seq_num,
        };
        let record = self
            .token_transfer_records
            .get(&key)
            .ok_or(BridgeError::MessageNotFoundInRecords)?;
        if record.message.message_version != CURRENT_MESSAGE_VERSION {
            return Err(BridgeError::UnexpectedMessageVersion);
        }
        let payload = extract_token_bridge_payload(&record.message)?;
        // the transfer must be directed at this chain
        if payload.target_chain != self.chain_id as u8 {
            return Err(BridgeError::UnexpectedChainId);
        }
        let owner = StarcoinAddress::from_bytes(&payload.target_address)?;
        if record.claimed {
            self.event_log
                .emit(TokenTransferAlreadyClaimed { message_key: key });
            return Ok((None, owner));
        }
        if record.verified_signatures.is_none() {
            return Err(BridgeError::TokenTransferNotSigned);
        }

        let route = get_route(source_chain, self.chain_id)?;
        let within_limit = self.limiter.check_and_record_sending_transfer(
            &self.treasury,
            route,
            payload.token_type,
            payload.amount,
            clock_ms,
        )?;
        if !within_limit {
            tracing::info!(?key, "claim exceeds route limit, try again later");
            self.event_log
                .emit(TokenTransferLimitExceed { message_key: key });
            return Ok((None, owner));
        }

        let token = self.treasury.mint(payload.token_type, payload.amount)?;
        let record = self
            .token_transfer_records
            .get_mut(&key)
            .expect("record existence checked above");
        record.claimed = true;
        tracing::info!(?key, amount = payload.amount, "token transfer claimed");
        self.event_log
            .emit(TokenTransferClaimed { message_key: key });
        Ok((Some(token), owner))
    }

    /// Verifies and executes a committee-signed governance message. The
    /// per-type sequence number must match exactly and only advances when
    /// the whole operation succeeds.
    pub fn execute_system_message(
        &mut self,
        message: BridgeMessage,
        signatures: Vec<Vec<u8>>,
    ) -> BridgeResult<()> {
        if message.message_version != CURRENT_MESSAGE_VERSION {
            return Err(BridgeError::UnexpectedMessageVersion);
        }
        let message_type = BridgeMessageType::try_from(message.message_type)
            .map_err(|_| BridgeError::UnexpectedMessageType)?;
        if message_type == BridgeMessageType::TokenTransfer {
            return Err(BridgeError::UnexpectedMessageType);
        }
        if message.source_chain != self.chain_id as u8 {
            return Err(BridgeError::UnexpectedChainId);
        }
        let expected = self.sequence_num(message_type);
        if message.seq_num != expected {
            return Err(BridgeError::UnexpectedSeqNum {
                expected,
                actual: message.seq_num,
            });
        }
        self.committee.verify_signatures(&message, &signatures)?;

        match message_type {
            BridgeMessageType::EmergencyOp => {
                let payload = extract_emergency_op_payload(&message)?;
                match EmergencyOpType::try_from(payload.op_type) {
                    Ok(EmergencyOpType::Pause) => self.execute_emergency_pause()?,
                    Ok(EmergencyOpType::Unpause) => self.execute_emergency_unpause()?,
                    Err(_) => return Err(BridgeError::UnexpectedEmergencyOpType),
                }
            }
            BridgeMessageType::CommitteeBlocklist => {
                let payload = extract_blocklist_payload(&message)?;
                self.committee
                    .execute_blocklist(&payload, &mut self.event_log)?;
            }
            BridgeMessageType::UpdateBridgeLimit => self.execute_update_bridge_limit(&message)?,
            BridgeMessageType::UpdateAssetPrice => {
                let payload = extract_update_asset_price_payload(&message)?;
                self.treasury.update_asset_notional_price(
                    payload.token_id,
                    payload.new_price,
                    &mut self.event_log,
                )?;
            }
            BridgeMessageType::AddTokensOnStarcoin => self.execute_add_tokens(&message)?,
            BridgeMessageType::TokenTransfer => return Err(BridgeError::UnexpectedMessageType),
        }

        let advanced = self.get_current_seq_num_and_increment(message_type);
        debug_assert_eq!(advanced, expected);
        Ok(())
    }

    fn execute_emergency_pause(&mut self) -> BridgeResult<()> {
        if self.paused {
            return Err(BridgeError::BridgeAlreadyPaused);
        }
        self.paused = true;
        tracing::warn!("bridge paused by emergency op");
        self.event_log.emit(EmergencyOpEvent { frozen: true });
        Ok(())
    }

    fn execute_emergency_unpause(&mut self) -> BridgeResult<()> {
        if !self.paused {
            return Err(BridgeError::BridgeNotPaused);
        }
        self.paused = false;
        tracing::warn!("bridge unpaused by emergency op");
        self.event_log.emit(EmergencyOpEvent { frozen: false });
        Ok(())
    }

    fn execute_update_bridge_limit(&mut self, message: &BridgeMessage) -> BridgeResult<()> {
        let payload = extract_update_bridge_limit_payload(message)?;
        if payload.receiving_chain != self.chain_id as u8 {
            return Err(BridgeError::UnexpectedChainId);
        }
        let sending_chain = assert_valid_chain_id(payload.sending_chain)?;
        let route = get_route(sending_chain, self.chain_id)?;
        self.limiter
            .update_route_limit(route, payload.new_limit, &mut self.event_log);
        Ok(())
    }

    fn execute_add_tokens(&mut self, message: &BridgeMessage) -> BridgeResult<()> {
        let payload = extract_add_tokens_on_starcoin_payload(message)?;
        if payload.token_ids.len() != payload.token_type_names.len()
            || payload.token_ids.len() != payload.token_prices.len()
        {
            return Err(BridgeError::MalformedMessage);
        }
        // validate the whole batch before mutating anything
        let mut batch_ids = BTreeSet::new();
        for (token_id, (type_name, price)) in payload
            .token_ids
            .iter()
            .zip(payload.token_type_names.iter().zip(&payload.token_prices))
        {
            if *price == 0 {
                return Err(BridgeError::InvalidNotionalValue);
            }
            if !batch_ids.insert(*token_id) || self.treasury.token_type_name(*token_id).is_ok() {
                return Err(BridgeError::DuplicateTokenId);
            }
            if !self.treasury.waiting_room_contains(type_name) {
                return Err(BridgeError::UnsupportedTokenType);
            }
        }
        for (token_id, (type_name, price)) in payload
            .token_ids
            .iter()
            .zip(payload.token_type_names.iter().zip(&payload.token_prices))
        {
            self.treasury.add_new_token(
                type_name,
                *token_id,
                payload.native_token,
                *price,
                &mut self.event_log,
            )?;
        }
        Ok(())
    }
}
