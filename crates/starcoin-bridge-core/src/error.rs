// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Every fatal condition the bridge core can abort a transaction with.
/// Idempotent paths (double-approve, double-claim, over-limit claim) are
/// not errors; they emit an event and return normally.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum BridgeError {
    // Codec
    #[error("attempted to read past the end of the buffer")]
    OutOfRange,
    #[error("ULEB128 length takes more than 5 bytes")]
    LengthOutOfRange,
    #[error("byte is not a BCS boolean")]
    NotBool,
    #[error("message carries trailing bytes after its payload")]
    TrailingBytes,
    #[error("payload length does not match the wire format")]
    InvalidPayloadLength,
    #[error("address field has the wrong length")]
    InvalidAddressLength,
    #[error("blocklist payload contains no addresses")]
    EmptyBlocklist,

    // Chain ids / routing
    #[error("unknown chain id")]
    InvalidChainId,
    #[error("route is not in the allow-list")]
    InvalidBridgeRoute,

    // Crypto
    #[error("bytes do not encode a secp256k1 public key")]
    InvalidPublicKey,
    #[error("bytes do not encode a 65-byte recoverable signature")]
    InvalidSignatureBytes,

    // Treasury
    #[error("token type is not registered with the treasury")]
    UnsupportedTokenType,
    #[error("token has nonzero supply at registration")]
    TokenSupplyNonZero,
    #[error("notional value must be strictly positive")]
    InvalidNotionalValue,
    #[error("token id is already claimed by another token")]
    DuplicateTokenId,
    #[error("token decimals exceed the supported range")]
    InvalidTokenDecimals,
    #[error("mint/burn capability does not match the token type")]
    MismatchedCapability,
    #[error("token type is already registered or waiting for approval")]
    TokenAlreadyRegistered,
    #[error("amount arithmetic overflowed")]
    AmountOverflow,

    // Committee
    #[error("aggregate voting power is below the required threshold")]
    SignatureBelowThreshold,
    #[error("the same signer appears more than once")]
    DuplicatedSignature,
    #[error("signature does not recover to a committee member")]
    InvalidSignature,
    #[error("sender is not an active validator")]
    SenderNotActiveValidator,
    #[error("public key is already registered")]
    DuplicatePubkey,
    #[error("committee has already been created")]
    CommitteeAlreadyInitiated,
    #[error("sender is not a committee member")]
    SenderIsNotInBridgeCommittee,
    #[error("public key is not 33 bytes")]
    InvalidPubkeyLength,
    #[error("blocklist names an address that is not a committee member")]
    BlocklistContainsUnknownKey,

    // Bridge
    #[error("unexpected message type")]
    UnexpectedMessageType,
    #[error("unexpected chain id")]
    UnexpectedChainId,
    #[error("unexpected sequence number (expected {expected}, got {actual})")]
    UnexpectedSeqNum { expected: u64, actual: u64 },
    #[error("unsupported message version")]
    UnexpectedMessageVersion,
    #[error("unknown emergency op type")]
    UnexpectedEmergencyOpType,
    #[error("bridge is already paused")]
    BridgeAlreadyPaused,
    #[error("bridge is not paused")]
    BridgeNotPaused,
    #[error("claimer is not the recorded transfer target")]
    UnauthorizedClaim,
    #[error("no record exists for this message key")]
    MessageNotFoundInRecords,
    #[error("transfer record has no verified signatures")]
    TokenTransferNotSigned,
    #[error("bridge is paused")]
    BridgeUnavailable,
    #[error("message does not match the stored record")]
    MalformedMessage,
    #[error("token value must be strictly positive")]
    TokenValueIsZero,
    #[error("home-initiated transfer record must not be claimed at approval")]
    RecordAlreadyClaimed,

    // Limiter
    #[error("no transfer limit installed for this route")]
    LimitNotFoundForRoute,
}
