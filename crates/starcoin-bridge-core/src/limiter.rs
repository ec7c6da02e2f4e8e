// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Sliding 24-hour notional-USD rate limiter, per directed route.
//!
//! Amounts are tracked in USD fixed-point with eight fractional digits,
//! bucketed per hour of the input clock. The limiter fails closed: a route
//! without an installed cap aborts instead of passing traffic.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::{
    chain_ids::BridgeRoute,
    error::{BridgeError, BridgeResult},
    events::{EventLog, UpdateRouteLimitEvent},
    treasury::BridgeTreasury,
};

/// Sentinel for an effectively uncapped route.
pub const MAX_TRANSFER_LIMIT: u64 = u64::MAX;

/// USD fixed-point scale: eight fractional digits.
pub const USD_VALUE_MULTIPLIER: u64 = 100_000_000;

const SLIDING_WINDOW_HOURS: u64 = 24;
const MILLIS_PER_HOUR: u64 = 3_600_000;

/// Per-route transfer history over the trailing 24 hours.
///
/// `per_hour_amounts[i]` is the notional USD moved during hour
/// `hour_tail + i`; the window invariants are
/// `hour_head - hour_tail + 1 == per_hour_amounts.len() <= 24` and
/// `sum(per_hour_amounts) == total_amount`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    hour_head: u64,
    hour_tail: u64,
    per_hour_amounts: VecDeque<u64>,
    total_amount: u64,
}

impl TransferRecord {
    fn new() -> Self {
        Self {
            hour_head: 0,
            hour_tail: 0,
            per_hour_amounts: VecDeque::from([0]),
            total_amount: 0,
        }
    }

    pub fn hour_head(&self) -> u64 {
        self.hour_head
    }

    pub fn hour_tail(&self) -> u64 {
        self.hour_tail
    }

    pub fn per_hour_amounts(&self) -> &VecDeque<u64> {
        &self.per_hour_amounts
    }

    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }

    /// Slides the window forward to `current_hour`, evicting stale buckets
    /// and appending empty ones.
    fn adjust(&mut self, current_hour: u64) {
        if self.hour_head == current_hour {
            return;
        }
        let target_tail = current_hour.saturating_sub(SLIDING_WINDOW_HOURS - 1);
        if self.hour_head < target_tail {
            // the whole recorded window is stale
            self.per_hour_amounts.clear();
            self.per_hour_amounts.push_back(0);
            self.total_amount = 0;
            self.hour_head = target_tail;
            self.hour_tail = target_tail;
        } else {
            while self.hour_tail < target_tail {
                let evicted = self.per_hour_amounts.pop_front().unwrap_or_default();
                self.total_amount -= evicted;
                self.hour_tail += 1;
            }
        }
        while self.hour_head < current_hour {
            self.hour_head += 1;
            self.per_hour_amounts.push_back(0);
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferLimiter {
    transfer_limits: BTreeMap<BridgeRoute, u64>,
    transfer_records: BTreeMap<BridgeRoute, TransferRecord>,
}

impl TransferLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route_limit(&self, route: &BridgeRoute) -> Option<u64> {
        self.transfer_limits.get(route).copied()
    }

    pub fn record(&self, route: &BridgeRoute) -> Option<&TransferRecord> {
        self.transfer_records.get(route)
    }

    /// Installs or replaces the 8-dp USD cap for `route`.
    pub fn update_route_limit(&mut self, route: BridgeRoute, new_usd_limit: u64, log: &mut EventLog) {
        tracing::info!(?route, new_usd_limit, "updating route limit");
        self.transfer_limits.insert(route, new_usd_limit);
        log.emit(UpdateRouteLimitEvent {
            sending_chain: route.source as u8,
            receiving_chain: route.destination as u8,
            new_limit: new_usd_limit,
        });
    }

    /// Records `amount` of the token registered under `token_id` against
    /// the route's trailing-24h window.
    ///
    /// Returns `Ok(true)` when the transfer is within limit and was
    /// recorded, `Ok(false)` when it would exceed the cap (nothing is
    /// mutated; the caller may retry in a later hour). A route without an
    /// installed cap fails closed with `LimitNotFoundForRoute`.
    pub fn check_and_record_sending_transfer(
        &mut self,
        treasury: &BridgeTreasury,
        route: BridgeRoute,
        token_id: u8,
        amount: u64,
        clock_ms: u64,
    ) -> BridgeResult<bool> {
        let route_limit = *self
            .transfer_limits
            .get(&route)
            .ok_or(BridgeError::LimitNotFoundForRoute)?;
        let notional_value = treasury.notional_value(token_id)?;
        let multiplier = u128::from(treasury.decimal_multiplier(token_id)?);

        let record = self
            .transfer_records
            .entry(route)
            .or_insert_with(TransferRecord::new);
        record.adjust(clock_ms / MILLIS_PER_HOUR);

        // compare in token-multiplier units to avoid truncation
        let notional_amount_with_multiplier = u128::from(notional_value) * u128::from(amount);
        let window_with_multiplier = u128::from(record.total_amount) * multiplier;
        let limit_with_multiplier = u128::from(route_limit) * multiplier;
        if window_with_multiplier + notional_amount_with_multiplier > limit_with_multiplier {
            tracing::debug!(?route, token_id, amount, "transfer exceeds route limit");
            return Ok(false);
        }

        // scale back down to 8-dp USD before recording
        let notional_amount = (notional_amount_with_multiplier / multiplier) as u64;
        let bucket = record
            .per_hour_amounts
            .back_mut()
            .expect("sliding window always holds at least one bucket");
        *bucket += notional_amount;
        record.total_amount += notional_amount;
        Ok(true)
    }
}
