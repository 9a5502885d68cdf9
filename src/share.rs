// Copyright 2019 The Grin Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Definition of a single share and its mnemonic serialization.
//!
//! Wire layout, viewed as a stream of 10-bit symbols: identifier (15
//! bits), iteration exponent (5), group index (4), group threshold - 1
//! (4), group count - 1 (4), member index (4), member threshold - 1
//! (4), zero padding to a symbol boundary, the share value, and a
//! 3-symbol RS1024 checksum.

use crate::constants::{
	CHECKSUM_LENGTH_WORDS, CUSTOMIZATION_STRING, ID_LENGTH_BITS, ITERATION_EXP_LENGTH_BITS,
	MAX_SHARE_COUNT, METADATA_LENGTH_WORDS, MIN_MNEMONIC_LENGTH_WORDS, RADIX_BITS,
};
use crate::error::{Error, ErrorKind};
use crate::mnemonic;
use crate::util::bitpacker::BitPacker;
use crate::util::rs1024;

/// One share of a split, the decoded form of one mnemonic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
	/// Random 15-bit value, common to all shares of one split; also
	/// salts the encryption of the master secret
	pub identifier: u16,
	/// PBKDF2 iteration exponent e; the total iteration count is
	/// 10000 << e
	pub iteration_exponent: u8,
	/// x coordinate of this share's group
	pub group_index: u8,
	/// Number of groups required to reconstruct the master secret
	pub group_threshold: u8,
	/// Total number of groups
	pub group_count: u8,
	/// x coordinate of this share within its group
	pub member_index: u8,
	/// Number of member shares required to reconstruct the group share
	pub member_threshold: u8,
	/// f(member_index) for each byte polynomial, big-endian
	pub share_value: Vec<u8>,
}

impl Share {
	/// Decode a whitespace-separated mnemonic string into a share
	pub fn parse(mnemonic_str: &str) -> Result<Share, Error> {
		let words: Vec<&str> = mnemonic_str.split_whitespace().collect();
		if words.len() < MIN_MNEMONIC_LENGTH_WORDS as usize {
			return Err(ErrorKind::InvalidMnemonicLength(
				words.len(),
				MIN_MNEMONIC_LENGTH_WORDS,
			))?;
		}
		let symbols = mnemonic::words_to_symbols(&words)?;
		rs1024::verify_checksum(CUSTOMIZATION_STRING, &symbols)?;

		let payload_words = words.len() - METADATA_LENGTH_WORDS as usize;
		let payload_bits = payload_words * RADIX_BITS as usize;
		// a word count whose payload cannot hold a validly padded value
		if payload_bits % 16 > 8 {
			return Err(ErrorKind::InvalidMasterSecretLength(words.len()))?;
		}
		let padding_bits = payload_bits % 16;

		let mut bp = BitPacker::new();
		for s in &symbols {
			bp.append_u32(*s, RADIX_BITS)?;
		}

		let identifier = bp.get_u16(0, ID_LENGTH_BITS as usize)?;
		let iteration_exponent = bp.get_u8(
			ID_LENGTH_BITS as usize,
			ITERATION_EXP_LENGTH_BITS as usize,
		)?;
		let group_index = bp.get_u8(20, 4)?;
		let group_threshold = bp.get_u8(24, 4)? + 1;
		let group_count = bp.get_u8(28, 4)? + 1;
		let member_index = bp.get_u8(32, 4)?;
		let member_threshold = bp.get_u8(36, 4)? + 1;

		if group_count < group_threshold {
			return Err(ErrorKind::InvalidGroupThreshold(
				group_threshold,
				group_count,
			))?;
		}

		// keep the padded share value, then strip and verify the padding
		bp.retain(
			40,
			bp.len() - RADIX_BITS as usize * CHECKSUM_LENGTH_WORDS as usize,
		)?;
		bp.remove_padding(padding_bits)?;
		let share_value = bp.get_bytes(0, bp.len() / 8)?;
		if share_value.len() != 16 && share_value.len() != 32 {
			return Err(ErrorKind::InvalidMasterSecretLength(words.len()))?;
		}

		Ok(Share {
			identifier,
			iteration_exponent,
			group_index,
			group_threshold,
			group_count,
			member_index,
			member_threshold,
			share_value,
		})
	}

	/// Encode the share as its list of mnemonic words
	pub fn to_words(&self) -> Result<Vec<String>, Error> {
		let bp = self.pack_bits()?;
		let mut symbols = Vec::with_capacity(bp.len() / RADIX_BITS as usize);
		for i in (0..bp.len()).step_by(RADIX_BITS as usize) {
			symbols.push(bp.get_u32(i, RADIX_BITS as usize)?);
		}
		mnemonic::symbols_to_words(&symbols)
	}

	/// Encode the share as a space-separated mnemonic string
	pub fn to_mnemonic(&self) -> Result<String, Error> {
		Ok(self.to_words()?.join(" "))
	}

	fn check_fields(&self) -> Result<(), Error> {
		if self.identifier >> ID_LENGTH_BITS != 0 {
			return Err(ErrorKind::Value(format!(
				"Identifier {} does not fit in {} bits",
				self.identifier, ID_LENGTH_BITS
			)))?;
		}
		if self.iteration_exponent >> ITERATION_EXP_LENGTH_BITS != 0 {
			return Err(ErrorKind::Value(format!(
				"Iteration exponent {} does not fit in {} bits",
				self.iteration_exponent, ITERATION_EXP_LENGTH_BITS
			)))?;
		}
		if self.group_index >= MAX_SHARE_COUNT || self.member_index >= MAX_SHARE_COUNT {
			return Err(ErrorKind::Value(
				"Share indices must be below 16".to_string(),
			))?;
		}
		if self.group_threshold < 1
			|| self.group_threshold > self.group_count
			|| self.group_count > MAX_SHARE_COUNT
		{
			return Err(ErrorKind::InvalidGroupThreshold(
				self.group_threshold,
				self.group_count,
			))?;
		}
		if self.member_threshold < 1 || self.member_threshold > MAX_SHARE_COUNT {
			return Err(ErrorKind::Value(format!(
				"Member threshold {} out of range",
				self.member_threshold
			)))?;
		}
		if self.share_value.len() != 16 && self.share_value.len() != 32 {
			return Err(ErrorKind::Value(format!(
				"Share value must be 16 or 32 bytes, not {}",
				self.share_value.len()
			)))?;
		}
		Ok(())
	}

	// the packed symbol stream, checksum included
	fn pack_bits(&self) -> Result<BitPacker, Error> {
		self.check_fields()?;
		let value_bits = self.share_value.len() * 8;
		let padding_bit_count =
			(RADIX_BITS as usize - (40 + value_bits) % RADIX_BITS as usize) % RADIX_BITS as usize;

		let mut bp = BitPacker::new();
		bp.append_u16(self.identifier, ID_LENGTH_BITS)?;
		bp.append_u8(self.iteration_exponent, ITERATION_EXP_LENGTH_BITS)?;
		bp.append_u8(self.group_index, 4)?;
		bp.append_u8(self.group_threshold - 1, 4)?;
		bp.append_u8(self.group_count - 1, 4)?;
		bp.append_u8(self.member_index, 4)?;
		bp.append_u8(self.member_threshold - 1, 4)?;
		bp.append_padding(padding_bit_count as u8);
		bp.append_bytes(&self.share_value);

		if bp.len() % RADIX_BITS as usize != 0 {
			return Err(ErrorKind::Value(format!(
				"Incorrect share bit length. Must be a multiple of {}, actual length: {}",
				RADIX_BITS,
				bp.len(),
			)))?;
		}

		let mut sum_data = Vec::with_capacity(bp.len() / RADIX_BITS as usize);
		for i in (0..bp.len()).step_by(RADIX_BITS as usize) {
			sum_data.push(bp.get_u32(i, RADIX_BITS as usize)?);
		}
		for c in rs1024::create_checksum(CUSTOMIZATION_STRING, &sum_data) {
			bp.append_u32(c, RADIX_BITS)?;
		}

		Ok(bp)
	}
}
