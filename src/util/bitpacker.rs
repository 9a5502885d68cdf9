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

//! An MSB-first bit stream used to pack and unpack the share wire
//! layout. Field widths are given per call; nothing here knows about
//! the share structure itself.

use bitvec::prelude::*;

use crate::error::{Error, ErrorKind};

/// Wraps a bit vector and defines fixed-width packing operations on it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitPacker {
	bv: BitVec<u8, Msb0>,
}

impl BitPacker {
	/// Create an empty packer
	pub fn new() -> Self {
		BitPacker { bv: BitVec::new() }
	}

	/// Number of bits held
	pub fn len(&self) -> usize {
		self.bv.len()
	}

	/// Whether any bits are held
	pub fn is_empty(&self) -> bool {
		self.bv.is_empty()
	}

	fn append_bits(&mut self, val: u32, num_bits: u8) {
		for i in (0..num_bits).rev() {
			self.bv.push(val >> i & 1 == 1);
		}
	}

	/// Append the low num_bits of a u8, MSB first
	pub fn append_u8(&mut self, val: u8, num_bits: u8) -> Result<(), Error> {
		if num_bits > 8 {
			return Err(ErrorKind::BitVec(
				"number of bits to pack must be <= 8".to_owned(),
			))?;
		}
		self.append_bits(u32::from(val), num_bits);
		Ok(())
	}

	/// Append the low num_bits of a u16, MSB first
	pub fn append_u16(&mut self, val: u16, num_bits: u8) -> Result<(), Error> {
		if num_bits > 16 {
			return Err(ErrorKind::BitVec(
				"number of bits to pack must be <= 16".to_owned(),
			))?;
		}
		self.append_bits(u32::from(val), num_bits);
		Ok(())
	}

	/// Append the low num_bits of a u32, MSB first
	pub fn append_u32(&mut self, val: u32, num_bits: u8) -> Result<(), Error> {
		if num_bits > 32 {
			return Err(ErrorKind::BitVec(
				"number of bits to pack must be <= 32".to_owned(),
			))?;
		}
		self.append_bits(val, num_bits);
		Ok(())
	}

	/// Append num_bits of zero padding
	pub fn append_padding(&mut self, num_bits: u8) {
		self.append_bits(0, num_bits);
	}

	/// Append each byte in order
	pub fn append_bytes(&mut self, data: &[u8]) {
		for b in data {
			self.append_bits(u32::from(*b), 8);
		}
	}

	fn read_bits(&self, start: usize, num_bits: usize) -> Result<u32, Error> {
		if num_bits == 0 {
			return Ok(0);
		}
		if num_bits > 32 || start + num_bits > self.bv.len() {
			return Err(ErrorKind::BitVec(format!(
				"cannot read {} bits at offset {} (length {})",
				num_bits,
				start,
				self.bv.len()
			)))?;
		}
		Ok(self.bv[start..start + num_bits].load_be::<u32>())
	}

	/// Read num_bits at the given offset as a u8
	pub fn get_u8(&self, start: usize, num_bits: usize) -> Result<u8, Error> {
		if num_bits > 8 {
			return Err(ErrorKind::BitVec(
				"number of bits to read must be <= 8".to_owned(),
			))?;
		}
		Ok(self.read_bits(start, num_bits)? as u8)
	}

	/// Read num_bits at the given offset as a u16
	pub fn get_u16(&self, start: usize, num_bits: usize) -> Result<u16, Error> {
		if num_bits > 16 {
			return Err(ErrorKind::BitVec(
				"number of bits to read must be <= 16".to_owned(),
			))?;
		}
		Ok(self.read_bits(start, num_bits)? as u16)
	}

	/// Read num_bits at the given offset as a u32
	pub fn get_u32(&self, start: usize, num_bits: usize) -> Result<u32, Error> {
		self.read_bits(start, num_bits)
	}

	/// Read num_bytes whole bytes starting at the given bit offset
	pub fn get_bytes(&self, start: usize, num_bytes: usize) -> Result<Vec<u8>, Error> {
		let mut retval = Vec::with_capacity(num_bytes);
		for i in 0..num_bytes {
			retval.push(self.read_bits(start + i * 8, 8)? as u8);
		}
		Ok(retval)
	}

	/// Keep only the bits in [start, end), dropping the rest
	pub fn retain(&mut self, start: usize, end: usize) -> Result<(), Error> {
		if start > end || end > self.bv.len() {
			return Err(ErrorKind::BitVec(format!(
				"cannot retain range {}..{} (length {})",
				start,
				end,
				self.bv.len()
			)))?;
		}
		self.bv = self.bv[start..end].to_bitvec();
		Ok(())
	}

	/// Strip num_bits of leading padding, which must all be zero
	pub fn remove_padding(&mut self, num_bits: usize) -> Result<(), Error> {
		if num_bits > self.bv.len() {
			return Err(ErrorKind::BitVec(
				"padding longer than content".to_owned(),
			))?;
		}
		if self.bv[..num_bits].any() {
			return Err(ErrorKind::InvalidPadding)?;
		}
		self.bv.drain(..num_bits);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pack_and_read() -> Result<(), Error> {
		let mut bp = BitPacker::new();
		bp.append_u16(21219, 15)?;
		bp.append_u8(0, 5)?;
		bp.append_u8(4, 4)?;
		assert_eq!(bp.len(), 24);
		assert_eq!(bp.get_u16(0, 15)?, 21219);
		assert_eq!(bp.get_u8(15, 5)?, 0);
		assert_eq!(bp.get_u8(20, 4)?, 4);
		// first 10-bit symbol of identifier 21219 << 9
		assert_eq!(bp.get_u32(0, 10)?, 663);
		Ok(())
	}

	#[test]
	fn bytes_roundtrip() -> Result<(), Error> {
		let mut bp = BitPacker::new();
		bp.append_padding(2);
		bp.append_bytes(&[0xde, 0xad, 0xbe, 0xef]);
		bp.remove_padding(2)?;
		assert_eq!(bp.get_bytes(0, 4)?, vec![0xde, 0xad, 0xbe, 0xef]);
		Ok(())
	}

	#[test]
	fn nonzero_padding_rejected() -> Result<(), Error> {
		let mut bp = BitPacker::new();
		bp.append_u8(0xff, 8)?;
		assert!(bp.remove_padding(2).is_err());
		Ok(())
	}

	#[test]
	fn retain_window() -> Result<(), Error> {
		let mut bp = BitPacker::new();
		bp.append_bytes(&[0xab, 0xcd, 0xef]);
		bp.retain(8, 16)?;
		assert_eq!(bp.len(), 8);
		assert_eq!(bp.get_u8(0, 8)?, 0xcd);
		Ok(())
	}

	#[test]
	fn out_of_range_reads() {
		let bp = BitPacker::new();
		assert!(bp.get_u8(0, 8).is_err());
		let mut bp = BitPacker::new();
		bp.append_padding(4);
		assert!(bp.get_u8(0, 8).is_err());
	}
}
