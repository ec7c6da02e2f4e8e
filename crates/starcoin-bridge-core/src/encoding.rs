// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! BCS-flavored payload reader.
//!
//! Bridge payloads are decoded with pop-last semantics: the buffer is
//! reversed once at construction and every `peel_*` pops bytes off the end,
//! which reads the original stream front to back. `into_remainder_bytes`
//! restores stream order so trailing-byte checks see the leftover bytes as
//! they appeared on the wire.
//!
//! Multi-byte integers are little-endian, as BCS writes them. The one
//! exception is [`BcsReader::peel_u64_be`]: numeric fields inside bridge
//! message payloads (`seq_num`, `amount`, `new_limit`, `new_price`) are
//! big-endian on the wire, the bit-exact contract with peer bridges.

use ethers::types::U256;

use crate::error::{BridgeError, BridgeResult};

/// A ULEB128 length must terminate within 5 bytes.
const ULEB_MAX_BYTES: usize = 5;

pub struct BcsReader {
    // stored reversed; `pop()` yields the next byte in stream order
    bytes: Vec<u8>,
}

impl BcsReader {
    pub fn new(mut bytes: Vec<u8>) -> Self {
        bytes.reverse();
        Self { bytes }
    }

    fn pop(&mut self) -> BridgeResult<u8> {
        self.bytes.pop().ok_or(BridgeError::OutOfRange)
    }

    pub fn peel_u8(&mut self) -> BridgeResult<u8> {
        self.pop()
    }

    pub fn peel_u16(&mut self) -> BridgeResult<u16> {
        let mut value = 0u16;
        for shift in 0..2 {
            value |= u16::from(self.pop()?) << (8 * shift);
        }
        Ok(value)
    }

    pub fn peel_u32(&mut self) -> BridgeResult<u32> {
        let mut value = 0u32;
        for shift in 0..4 {
            value |= u32::from(self.pop()?) << (8 * shift);
        }
        Ok(value)
    }

    pub fn peel_u64(&mut self) -> BridgeResult<u64> {
        let mut value = 0u64;
        for shift in 0..8 {
            value |= u64::from(self.pop()?) << (8 * shift);
        }
        Ok(value)
    }

    pub fn peel_u128(&mut self) -> BridgeResult<u128> {
        let mut value = 0u128;
        for shift in 0..16 {
            value |= u128::from(self.pop()?) << (8 * shift);
        }
        Ok(value)
    }

    pub fn peel_u256(&mut self) -> BridgeResult<U256> {
        let bytes = self.peel_bytes(32)?;
        Ok(U256::from_little_endian(&bytes))
    }

    /// Big-endian u64, used for the on-wire numeric fields of bridge
    /// messages.
    pub fn peel_u64_be(&mut self) -> BridgeResult<u64> {
        let mut value = 0u64;
        for _ in 0..8 {
            value = (value << 8) | u64::from(self.pop()?);
        }
        Ok(value)
    }

    pub fn peel_bool(&mut self) -> BridgeResult<bool> {
        match self.pop()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(BridgeError::NotBool),
        }
    }

    pub fn peel_uleb_len(&mut self) -> BridgeResult<usize> {
        let mut total = 0u64;
        let mut shift = 0u32;
        for _ in 0..ULEB_MAX_BYTES {
            let byte = self.pop()?;
            total |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(total as usize);
            }
            shift += 7;
        }
        Err(BridgeError::LengthOutOfRange)
    }

    pub fn peel_bytes(&mut self, len: usize) -> BridgeResult<Vec<u8>> {
        if self.bytes.len() < len {
            return Err(BridgeError::OutOfRange);
        }
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.pop()?);
        }
        Ok(out)
    }

    pub fn peel_vec_u8(&mut self) -> BridgeResult<Vec<u8>> {
        let len = self.peel_uleb_len()?;
        self.peel_bytes(len)
    }

    pub fn peel_vec_u64(&mut self) -> BridgeResult<Vec<u64>> {
        let len = self.peel_uleb_len()?;
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.peel_u64()?);
        }
        Ok(out)
    }

    pub fn peel_vec_vec_u8(&mut self) -> BridgeResult<Vec<Vec<u8>>> {
        let len = self.peel_uleb_len()?;
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.peel_vec_u8()?);
        }
        Ok(out)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Remaining bytes in stream order.
    pub fn into_remainder_bytes(mut self) -> Vec<u8> {
        self.bytes.reverse();
        self.bytes
    }
}

/// ULEB128 length prefix, the inverse of [`BcsReader::peel_uleb_len`].
pub fn write_uleb_len(out: &mut Vec<u8>, mut len: usize) {
    loop {
        let byte = (len & 0x7f) as u8;
        len >>= 7;
        if len == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

pub fn write_vec_u8(out: &mut Vec<u8>, bytes: &[u8]) {
    write_uleb_len(out, bytes.len());
    out.extend_from_slice(bytes);
}

pub fn write_vec_u64(out: &mut Vec<u8>, values: &[u64]) {
    write_uleb_len(out, values.len());
    for value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

pub fn write_vec_vec_u8(out: &mut Vec<u8>, items: &[Vec<u8>]) {
    write_uleb_len(out, items.len());
    for item in items {
        write_vec_u8(out, item);
    }
}
