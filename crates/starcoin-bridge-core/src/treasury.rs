// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Token metadata registry and mint/burn dispatch.
//!
//! A foreign token enters in two steps: `register_foreign_token` parks its
//! capabilities in the waiting room, then a governance-approved
//! `add_new_token` promotes it to supported and binds its wire-protocol
//! token id. Ids and notional prices only ever change through governance
//! messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{BridgeError, BridgeResult},
    events::{EventLog, NewTokenEvent, TokenRegistrationEvent, UpdateTokenPriceEvent},
};

// Wire-protocol token ids of the initial asset set.
pub const TOKEN_ID_STC: u8 = 0;
pub const TOKEN_ID_BTC: u8 = 1;
pub const TOKEN_ID_ETH: u8 = 2;
pub const TOKEN_ID_USDT: u8 = 3;
pub const TOKEN_ID_USDC: u8 = 4;

const MAX_TOKEN_DECIMALS: u8 = 19;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BridgeTokenMetadata {
    pub id: u8,
    pub decimal_multiplier: u64,
    pub notional_value: u64,
    pub native_token: bool,
}

/// A foreign token whose capabilities are held but whose id and price have
/// not been approved yet.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ForeignTokenRegistration {
    pub type_name: String,
    pub decimal: u8,
}

/// Authority to mint one asset type. Non-clonable; tracks the cumulative
/// minted amount so supply can be audited against the burn side.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MintCapability {
    type_name: String,
    minted: u64,
}

impl MintCapability {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn mint(&mut self, value: u64) -> BridgeResult<Coin> {
        self.minted = self
            .minted
            .checked_add(value)
            .ok_or(BridgeError::AmountOverflow)?;
        Ok(Coin {
            type_name: self.type_name.clone(),
            value,
        })
    }
}

/// Authority to burn one asset type; tracks the cumulative burned amount.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BurnCapability {
    type_name: String,
    burned: u64,
}

impl BurnCapability {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn burn(&mut self, coin: Coin) -> BridgeResult<u64> {
        if coin.type_name != self.type_name {
            return Err(BridgeError::MismatchedCapability);
        }
        self.burned = self
            .burned
            .checked_add(coin.value)
            .ok_or(BridgeError::AmountOverflow)?;
        Ok(coin.value)
    }
}

/// Issues a fresh capability pair for an asset type, with zero supply.
pub fn create_token_capabilities(type_name: &str) -> (MintCapability, BurnCapability) {
    (
        MintCapability {
            type_name: type_name.to_string(),
            minted: 0,
        },
        BurnCapability {
            type_name: type_name.to_string(),
            burned: 0,
        },
    )
}

/// An amount of one bridged asset. Non-clonable: coins are only created by
/// a mint capability and destroyed by the matching burn capability.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coin {
    type_name: String,
    value: u64,
}

impl Coin {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct TokenVault {
    mint_cap: MintCapability,
    burn_cap: BurnCapability,
}

impl TokenVault {
    fn total_supply(&self) -> u64 {
        self.mint_cap.minted - self.burn_cap.burned
    }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BridgeTreasury {
    treasuries: BTreeMap<String, TokenVault>,
    supported_tokens: BTreeMap<String, BridgeTokenMetadata>,
    // token id -> type name
    id_token_type_map: BTreeMap<u8, String>,
    // tokens waiting to be approved, keyed by type name
    waiting_room: BTreeMap<String, ForeignTokenRegistration>,
}

impl BridgeTreasury {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parks a foreign token in the waiting room and takes custody of its
    /// capabilities. The token must have zero circulating supply.
    pub fn register_foreign_token(
        &mut self,
        mint_cap: MintCapability,
        burn_cap: BurnCapability,
        decimal: u8,
        log: &mut EventLog,
    ) -> BridgeResult<()> {
        if mint_cap.type_name != burn_cap.type_name {
            return Err(BridgeError::MismatchedCapability);
        }
        if mint_cap.minted != burn_cap.burned {
            return Err(BridgeError::TokenSupplyNonZero);
        }
        if decimal > MAX_TOKEN_DECIMALS {
            return Err(BridgeError::InvalidTokenDecimals);
        }
        let type_name = mint_cap.type_name.clone();
        if self.treasuries.contains_key(&type_name)
            || self.waiting_room.contains_key(&type_name)
            || self.supported_tokens.contains_key(&type_name)
        {
            return Err(BridgeError::TokenAlreadyRegistered);
        }
        self.waiting_room.insert(
            type_name.clone(),
            ForeignTokenRegistration {
                type_name: type_name.clone(),
                decimal,
            },
        );
        self.treasuries
            .insert(type_name.clone(), TokenVault { mint_cap, burn_cap });
        log.emit(TokenRegistrationEvent {
            type_name,
            decimal,
            native_token: false,
        });
        Ok(())
    }

    /// Promotes a waiting-room token to supported under `token_id`.
    pub fn add_new_token(
        &mut self,
        type_name: &str,
        token_id: u8,
        native_token: bool,
        notional_value: u64,
        log: &mut EventLog,
    ) -> BridgeResult<()> {
        if notional_value == 0 {
            return Err(BridgeError::InvalidNotionalValue);
        }
        if self.id_token_type_map.contains_key(&token_id) {
            return Err(BridgeError::DuplicateTokenId);
        }
        let registration = self
            .waiting_room
            .remove(type_name)
            .ok_or(BridgeError::UnsupportedTokenType)?;
        let decimal_multiplier = 10u64.pow(u32::from(registration.decimal));
        self.supported_tokens.insert(
            registration.type_name.clone(),
            BridgeTokenMetadata {
                id: token_id,
                decimal_multiplier,
                notional_value,
                native_token,
            },
        );
        self.id_token_type_map
            .insert(token_id, registration.type_name.clone());
        tracing::info!(token_id, type_name = %registration.type_name, "new bridge token");
        log.emit(NewTokenEvent {
            token_id,
            type_name: registration.type_name,
            native_token,
            decimal_multiplier,
            notional_value,
        });
        Ok(())
    }

    /// Burns a coin through the stored capability.
    pub fn burn(&mut self, coin: Coin) -> BridgeResult<u64> {
        let vault = self
            .treasuries
            .get_mut(coin.type_name())
            .ok_or(BridgeError::UnsupportedTokenType)?;
        vault.burn_cap.burn(coin)
    }

    /// Mints `amount` of the token registered under `token_id`.
    pub fn mint(&mut self, token_id: u8, amount: u64) -> BridgeResult<Coin> {
        let type_name = self
            .id_token_type_map
            .get(&token_id)
            .ok_or(BridgeError::UnsupportedTokenType)?;
        let vault = self
            .treasuries
            .get_mut(type_name)
            .ok_or(BridgeError::UnsupportedTokenType)?;
        vault.mint_cap.mint(amount)
    }

    pub fn update_asset_notional_price(
        &mut self,
        token_id: u8,
        new_usd_price: u64,
        log: &mut EventLog,
    ) -> BridgeResult<()> {
        if new_usd_price == 0 {
            return Err(BridgeError::InvalidNotionalValue);
        }
        let type_name = self
            .id_token_type_map
            .get(&token_id)
            .ok_or(BridgeError::UnsupportedTokenType)?;
        let metadata = self
            .supported_tokens
            .get_mut(type_name)
            .ok_or(BridgeError::UnsupportedTokenType)?;
        metadata.notional_value = new_usd_price;
        log.emit(UpdateTokenPriceEvent {
            token_id,
            new_price: new_usd_price,
        });
        Ok(())
    }

    fn metadata_by_id(&self, token_id: u8) -> BridgeResult<&BridgeTokenMetadata> {
        let type_name = self
            .id_token_type_map
            .get(&token_id)
            .ok_or(BridgeError::UnsupportedTokenType)?;
        self.supported_tokens
            .get(type_name)
            .ok_or(BridgeError::UnsupportedTokenType)
    }

    pub fn token_id(&self, type_name: &str) -> BridgeResult<u8> {
        self.supported_tokens
            .get(type_name)
            .map(|metadata| metadata.id)
            .ok_or(BridgeError::UnsupportedTokenType)
    }

    pub fn decimal_multiplier(&self, token_id: u8) -> BridgeResult<u64> {
        Ok(self.metadata_by_id(token_id)?.decimal_multiplier)
    }

    pub fn notional_value(&self, token_id: u8) -> BridgeResult<u64> {
        Ok(self.metadata_by_id(token_id)?.notional_value)
    }

    pub fn token_type_name(&self, token_id: u8) -> BridgeResult<&str> {
        self.id_token_type_map
            .get(&token_id)
            .map(String::as_str)
            .ok_or(BridgeError::UnsupportedTokenType)
    }

    pub fn metadata(&self, token_id: u8) -> BridgeResult<&BridgeTokenMetadata> {
        self.metadata_by_id(token_id)
    }

    pub fn waiting_room_contains(&self, type_name: &str) -> bool {
        self.waiting_room.contains_key(type_name)
    }

    /// Circulating supply of a supported token, by id.
    pub fn total_supply(&self, token_id: u8) -> BridgeResult<u64> {
        let type_name = self
            .id_token_type_map
            .get(&token_id)
            .ok_or(BridgeError::UnsupportedTokenType)?;
        let vault = self
            .treasuries
            .get(type_name)
            .ok_or(BridgeError::UnsupportedTokenType)?;
        Ok(vault.total_supply())
    }
}
