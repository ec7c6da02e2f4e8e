// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Typed event surface.
//!
//! Every observable state change emits one of the events below into the
//! bridge's [`EventLog`]; the log is the core's output channel to the
//! surrounding ledger, which persists it to the event stream.

use serde::{Deserialize, Serialize};

use crate::{
    base_types::StarcoinAddress, crypto::BridgeAuthorityPublicKeyBytes,
    message::BridgeMessageKey,
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenDepositedEvent {
    pub seq_num: u64,
    pub source_chain: u8,
    pub sender_address: Vec<u8>,
    pub target_chain: u8,
    pub target_address: Vec<u8>,
    pub token_type: u8,
    pub amount: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenTransferApproved {
    pub message_key: BridgeMessageKey,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenTransferAlreadyApproved {
    pub message_key: BridgeMessageKey,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenTransferClaimed {
    pub message_key: BridgeMessageKey,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenTransferAlreadyClaimed {
    pub message_key: BridgeMessageKey,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenTransferLimitExceed {
    pub message_key: BridgeMessageKey,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EmergencyOpEvent {
    pub frozen: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CommitteeMemberRegistrationEvent {
    pub starcoin_address: StarcoinAddress,
    pub bridge_pubkey_bytes: BridgeAuthorityPublicKeyBytes,
    pub http_rest_url: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CommitteeUpdateEvent {
    pub member_count: u64,
    pub stake_participation_bps: u64,
    pub epoch: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CommitteeMemberUrlUpdateEvent {
    pub member: BridgeAuthorityPublicKeyBytes,
    pub new_url: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BlocklistValidatorEvent {
    pub blocklisted: bool,
    pub public_keys: Vec<BridgeAuthorityPublicKeyBytes>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenRegistrationEvent {
    pub type_name: String,
    pub decimal: u8,
    pub native_token: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NewTokenEvent {
    pub token_id: u8,
    pub type_name: String,
    pub native_token: bool,
    pub decimal_multiplier: u64,
    pub notional_value: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UpdateTokenPriceEvent {
    pub token_id: u8,
    pub new_price: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UpdateRouteLimitEvent {
    pub sending_chain: u8,
    pub receiving_chain: u8,
    pub new_limit: u64,
}

macro_rules! bridge_events {
    ($($variant:ident),* $(,)?) => {
        #[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
        pub enum BridgeEvent {
            $($variant($variant),)*
        }

        $(
            impl From<$variant> for BridgeEvent {
                fn from(event: $variant) -> Self {
                    BridgeEvent::$variant(event)
                }
            }
        )*
    };
}

bridge_events!(
    TokenDepositedEvent,
    TokenTransferApproved,
    TokenTransferAlreadyApproved,
    TokenTransferClaimed,
    TokenTransferAlreadyClaimed,
    TokenTransferLimitExceed,
    EmergencyOpEvent,
    CommitteeMemberRegistrationEvent,
    CommitteeUpdateEvent,
    CommitteeMemberUrlUpdateEvent,
    BlocklistValidatorEvent,
    TokenRegistrationEvent,
    NewTokenEvent,
    UpdateTokenPriceEvent,
    UpdateRouteLimitEvent,
);

/// Ordered accumulator standing in for the ledger's event stream.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<BridgeEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: impl Into<BridgeEvent>) {
        let event = event.into();
        tracing::debug!(event = ?event, "bridge event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[BridgeEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&BridgeEvent> {
        self.events.last()
    }
}
