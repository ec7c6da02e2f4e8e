// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Bridge committee: weighted-voting signature verification.
//!
//! Members carry voting power in basis points of [`TOTAL_VOTING_POWER`].
//! Registration is only open before the first committee activates; once
//! `try_create_next_committee` installs the member map, the set is fixed
//! for the epoch. Block-listed members keep their slot but contribute zero
//! power.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    base_types::StarcoinAddress,
    crypto::{ecrecover, signing_preimage, BridgeAuthorityPublicKeyBytes},
    error::{BridgeError, BridgeResult},
    events::{
        BlocklistValidatorEvent, CommitteeMemberRegistrationEvent, CommitteeMemberUrlUpdateEvent,
        CommitteeUpdateEvent, EventLog,
    },
    message::{required_voting_power, serialize_message, BlocklistPayload, BridgeMessage},
};

pub const TOTAL_VOTING_POWER: u64 = 10_000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CommitteeMember {
    pub starcoin_address: StarcoinAddress,
    pub bridge_pubkey_bytes: BridgeAuthorityPublicKeyBytes,
    /// Voting power in bps of [`TOTAL_VOTING_POWER`].
    pub voting_power: u64,
    pub http_rest_url: Vec<u8>,
    pub blocklisted: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CommitteeMemberRegistration {
    pub starcoin_address: StarcoinAddress,
    pub bridge_pubkey_bytes: BridgeAuthorityPublicKeyBytes,
    pub http_rest_url: Vec<u8>,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BridgeCommittee {
    members: BTreeMap<BridgeAuthorityPublicKeyBytes, CommitteeMember>,
    member_registrations: BTreeMap<StarcoinAddress, CommitteeMemberRegistration>,
    last_committee_update_epoch: u64,
}

impl BridgeCommittee {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &BTreeMap<BridgeAuthorityPublicKeyBytes, CommitteeMember> {
        &self.members
    }

    pub fn member_registrations(
        &self,
    ) -> &BTreeMap<StarcoinAddress, CommitteeMemberRegistration> {
        &self.member_registrations
    }

    pub fn last_committee_update_epoch(&self) -> u64 {
        self.last_committee_update_epoch
    }

    /// Registers `sender` as a committee candidate. Only possible before
    /// the first committee activates; re-registration replaces the
    /// sender's previous entry.
    pub fn register(
        &mut self,
        active_validators: &BTreeMap<StarcoinAddress, u64>,
        sender: StarcoinAddress,
        bridge_pubkey_bytes: &[u8],
        http_rest_url: Vec<u8>,
        log: &mut EventLog,
    ) -> BridgeResult<()> {
        // v1: no registration after the committee is activated
        if !self.members.is_empty() {
            return Err(BridgeError::CommitteeAlreadyInitiated);
        }
        let pubkey = BridgeAuthorityPublicKeyBytes::from_bytes(bridge_pubkey_bytes)?;
        if !active_validators.contains_key(&sender) {
            return Err(BridgeError::SenderNotActiveValidator);
        }
        if self
            .member_registrations
            .iter()
            .any(|(addr, registration)| {
                *addr != sender && registration.bridge_pubkey_bytes == pubkey
            })
        {
            return Err(BridgeError::DuplicatePubkey);
        }
        self.member_registrations.insert(
            sender,
            CommitteeMemberRegistration {
                starcoin_address: sender,
                bridge_pubkey_bytes: pubkey,
                http_rest_url: http_rest_url.clone(),
            },
        );
        tracing::info!(%sender, %pubkey, "committee member registration");
        log.emit(CommitteeMemberRegistrationEvent {
            starcoin_address: sender,
            bridge_pubkey_bytes: pubkey,
            http_rest_url,
        });
        Ok(())
    }

    /// Activates the committee from the current registrations if the
    /// registered active-validator power reaches
    /// `min_stake_participation_bps`; otherwise a no-op.
    pub fn try_create_next_committee(
        &mut self,
        active_validator_voting_power: &BTreeMap<StarcoinAddress, u64>,
        min_stake_participation_bps: u64,
        epoch: u64,
        log: &mut EventLog,
    ) {
        let mut new_members = BTreeMap::new();
        let mut stake_participation = 0u64;
        for (address, registration) in &self.member_registrations {
            if let Some(voting_power) = active_validator_voting_power.get(address) {
                stake_participation += voting_power;
                new_members.insert(
                    registration.bridge_pubkey_bytes,
                    CommitteeMember {
                        starcoin_address: *address,
                        bridge_pubkey_bytes: registration.bridge_pubkey_bytes,
                        voting_power: *voting_power,
                        http_rest_url: registration.http_rest_url.clone(),
                        blocklisted: false,
                    },
                );
            }
        }
        if stake_participation < min_stake_participation_bps {
            tracing::info!(
                stake_participation,
                min_stake_participation_bps,
                "not enough stake participation to create the next committee"
            );
            return;
        }
        let member_count = new_members.len() as u64;
        self.members = new_members;
        self.member_registrations.clear();
        self.last_committee_update_epoch = epoch;
        tracing::info!(member_count, epoch, "bridge committee created");
        log.emit(CommitteeUpdateEvent {
            member_count,
            stake_participation_bps: stake_participation,
            epoch,
        });
    }

    /// Verifies that `signatures` carry enough non-block-listed voting
    /// power over the domain-separated preimage of `message`.
    pub fn verify_signatures(
        &self,
        message: &BridgeMessage,
        signatures: &[Vec<u8>],
    ) -> BridgeResult<()> {
        let required = required_voting_power(message)?;
        let preimage = signing_preimage(&serialize_message(message));
        let mut seen = BTreeSet::new();
        let mut aggregate_power = 0u64;
        for signature in signatures {
            let pubkey = ecrecover(signature, &preimage)?;
            // the same signer twice is a hard error, not a silent skip
            if !seen.insert(pubkey) {
                return Err(BridgeError::DuplicatedSignature);
            }
            let member = self
                .members
                .get(&pubkey)
                .ok_or(BridgeError::InvalidSignature)?;
            if !member.blocklisted {
                aggregate_power += member.voting_power;
            }
        }
        if aggregate_power < required {
            return Err(BridgeError::SignatureBelowThreshold);
        }
        Ok(())
    }

    /// Applies a verified block-list payload: resolves every EVM address to
    /// a member first, then toggles, so an unknown address leaves nothing
    /// half-applied.
    pub fn execute_blocklist(
        &mut self,
        payload: &BlocklistPayload,
        log: &mut EventLog,
    ) -> BridgeResult<()> {
        let blocklisted = payload.is_blocklist_request();
        let mut keys = Vec::with_capacity(payload.members.len());
        for evm_address in &payload.members {
            let key = self
                .members
                .keys()
                .find(|pubkey| {
                    pubkey
                        .to_eth_address()
                        .map(|address| address == *evm_address)
                        .unwrap_or(false)
                })
                .copied()
                .ok_or(BridgeError::BlocklistContainsUnknownKey)?;
            keys.push(key);
        }
        for key in &keys {
            let member = self
                .members
                .get_mut(key)
                .expect("resolved keys are member keys");
            member.blocklisted = blocklisted;
            tracing::info!(pubkey = %key, blocklisted, "committee member blocklist update");
        }
        log.emit(BlocklistValidatorEvent {
            blocklisted,
            public_keys: keys,
        });
        Ok(())
    }

    /// Lets an existing member update its own REST endpoint.
    pub fn update_node_url(
        &mut self,
        sender: StarcoinAddress,
        new_url: Vec<u8>,
        log: &mut EventLog,
    ) -> BridgeResult<()> {
        let member = self
            .members
            .values_mut()
            .find(|member| member.starcoin_address == sender)
            .ok_or(BridgeError::SenderIsNotInBridgeCommittee)?;
        member.http_rest_url = new_url.clone();
        log.emit(CommitteeMemberUrlUpdateEvent {
            member: member.bridge_pubkey_bytes,
            new_url,
        });
        Ok(())
    }
}
