// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! On-chain core of the Starcoin ↔ EVM token bridge.
//!
//! The bridge burns home-chain representations of bridged assets when
//! sending outbound and mints them when inbound transfers arrive with a
//! committee quorum. This crate is the chain-agnostic core: the message
//! codec, the weighted-voting committee, the USD rate limiter, the token
//! treasury and the orchestrating state machine. The surrounding runtime
//! supplies transaction authentication, the clock and event persistence.

pub mod base_types;
pub mod bridge;
pub mod chain_ids;
pub mod committee;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod events;
pub mod limiter;
pub mod message;
pub mod test_utils;
pub mod treasury;

pub use bridge::{Bridge, BridgeRecord};
pub use error::{BridgeError, BridgeResult};
