//! Bit-per-entry status storage and its W3C Bitstring Status List encoding.
//! https://www.w3.org/TR/vc-bitstring-status-list/#bitstring-encoding

use std::io::{Read, Write};

use bit_vec::BitVec;
use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use thiserror::Error;

/// Minimum length of a published list, in bits
pub const MINIMUM_BITSTRING_SIZE: usize = 131072;
/// Maximum length of a list, in bits (8 MiB decoded)
pub const MAXIMUM_BITSTRING_SIZE: usize = 1 << 26;

#[derive(Debug, Error)]
pub enum BitstringError {
    #[error("Base64 error: `{0}`")]
    Base64Error(ct_codecs::Error),
    #[error("IO error: `{0}`")]
    IoError(std::io::Error),
    #[error("Index {index} out of range, bitstring size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("Bitstring longer than {max_size} bits")]
    TooLarge { max_size: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusBitstring {
    bits: BitVec,
}

impl StatusBitstring {
    pub fn new(size: usize) -> Self {
        Self {
            bits: BitVec::from_elem(size, false),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn get(&self, index: usize) -> Result<bool, BitstringError> {
        self.bits.get(index).ok_or(BitstringError::IndexOutOfRange {
            index,
            size: self.bits.len(),
        })
    }

    /// Returns the previous value
    pub fn set(&mut self, index: usize, value: bool) -> Result<bool, BitstringError> {
        let previous = self.get(index)?;
        self.bits.set(index, value);
        Ok(previous)
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|bit| *bit).count()
    }

    pub fn grow(&mut self, additional: usize) {
        self.bits.grow(additional, false);
    }

    /// GZIP-compressed, base64url encoded, padded to at least [MINIMUM_BITSTRING_SIZE] bits
    pub fn encode(&self) -> Result<String, BitstringError> {
        let size = std::cmp::max(self.bits.len(), MINIMUM_BITSTRING_SIZE);
        let mut bits = self.bits.clone();
        bits.grow(size - self.bits.len(), false);

        let compressed = gzip_compress(bits.to_bytes())?;
        Base64UrlSafeNoPadding::encode_to_string(compressed).map_err(BitstringError::Base64Error)
    }

    /// Reads a published list, see [Self::decode_with_limit]
    pub fn decode(encoded: &str) -> Result<Self, BitstringError> {
        Self::decode_with_limit(encoded, MAXIMUM_BITSTRING_SIZE)
    }

    /// Inflates at most `max_size` bits, longer lists are rejected
    pub fn decode_with_limit(encoded: &str, max_size: usize) -> Result<Self, BitstringError> {
        let compressed = Base64UrlSafeNoPadding::decode_to_vec(encoded, None)
            .map_err(BitstringError::Base64Error)?;
        let bytes = gzip_decompress(&compressed, max_size)?;

        Ok(Self {
            bits: BitVec::from_bytes(&bytes),
        })
    }
}

fn gzip_compress(input: Vec<u8>) -> Result<Vec<u8>, BitstringError> {
    let mut encoder = GzEncoder::new(Vec::new(), Default::default());
    encoder.write_all(&input).map_err(BitstringError::IoError)?;
    encoder.finish().map_err(BitstringError::IoError)
}

fn gzip_decompress(input: &[u8], max_size: usize) -> Result<Vec<u8>, BitstringError> {
    let limit = max_size.div_ceil(8);

    // one byte past the limit tells an oversized list from one of exactly `limit` bytes
    let mut decoder = GzDecoder::new(input).take(limit as u64 + 1);
    let mut result = Vec::new();
    decoder
        .read_to_end(&mut result)
        .map_err(BitstringError::IoError)?;

    if result.len() > limit {
        return Err(BitstringError::TooLarge { max_size });
    }
    Ok(result)
}
