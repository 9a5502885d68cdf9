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

//! RS1024, a BCH checksum over GF(1024). Shaped like bech32's polymod
//! but operating on 10-bit symbols, with a customization string
//! prepended to the data.

use crate::constants::CHECKSUM_LENGTH_WORDS;
use crate::error::{Error, ErrorKind};

const GEN: [u32; 10] = [
	0xe0e040, 0x1c1c080, 0x3838100, 0x7070200, 0xe0e0009, 0x1c0c2412, 0x38086c24, 0x3090fc48,
	0x21b1f890, 0x3f3f120,
];

// values interpreted as a list of 10-bit integers
fn polymod<'a>(values: impl Iterator<Item = &'a u32>) -> u32 {
	let mut chk: u32 = 1;
	for v in values {
		let b = chk >> 20;
		chk = (chk & 0xfffff) << 10 ^ v;
		for (i, g) in GEN.iter().enumerate() {
			if (b >> i) & 1 == 1 {
				chk ^= g;
			}
		}
	}
	chk
}

fn customization_symbols(custom_string: &[u8]) -> Vec<u32> {
	custom_string.iter().map(|b| u32::from(*b)).collect()
}

/// Checksum symbols for the given data, MSB-first
pub fn create_checksum(custom_string: &[u8], data: &[u32]) -> Vec<u32> {
	let cs = customization_symbols(custom_string);
	let zeros = [0u32; CHECKSUM_LENGTH_WORDS as usize];
	let polymod = polymod(cs.iter().chain(data.iter()).chain(zeros.iter())) ^ 1;
	(0..CHECKSUM_LENGTH_WORDS as usize)
		.map(|i| polymod >> (10 * (CHECKSUM_LENGTH_WORDS as usize - 1 - i)) & 1023)
		.collect()
}

/// Verify that data (checksum symbols included) checks out
pub fn verify_checksum(custom_string: &[u8], data: &[u32]) -> Result<(), Error> {
	let cs = customization_symbols(custom_string);
	if polymod(cs.iter().chain(data.iter())) != 1 {
		return Err(ErrorKind::InvalidChecksum)?;
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::constants::CUSTOMIZATION_STRING;

	#[test]
	fn known_checksums() -> Result<(), Error> {
		// data parts of two reference mnemonics
		let cases: [(&[u32], [u32; 3]); 2] = [
			(
				&[
					663, 96, 0, 66, 132, 27, 234, 28, 191, 405, 992, 848, 257, 36, 858, 1012, 858,
				],
				[1001, 340, 369],
			),
			(
				&[
					663, 96, 0, 66, 177, 310, 288, 156, 827, 77, 232, 34, 965, 772, 962, 966, 754,
				],
				[247, 29, 757],
			),
		];
		for (data, expected) in cases.iter() {
			let checksum = create_checksum(CUSTOMIZATION_STRING, data);
			assert_eq!(&checksum, expected);
			let mut full = data.to_vec();
			full.extend_from_slice(&checksum);
			verify_checksum(CUSTOMIZATION_STRING, &full)?;
			// any corruption must be caught
			assert!(verify_checksum(b"fhamir", &full).is_err());
			full[0] ^= 23;
			assert!(verify_checksum(CUSTOMIZATION_STRING, &full).is_err());
		}
		Ok(())
	}
}
