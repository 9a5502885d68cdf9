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

//! Hex conversion helpers, mostly for test fixtures and display

use crate::error::{Error, ErrorKind};
use std::fmt::Write;

/// Encode bytes as a lowercase hex string
pub fn to_hex(bytes: &[u8]) -> String {
	let mut retval = String::with_capacity(bytes.len() * 2);
	for b in bytes {
		write!(retval, "{:02x}", b).expect("writing to a String cannot fail");
	}
	retval
}

/// Decode a hex string into bytes
pub fn from_hex(hex: &str) -> Result<Vec<u8>, Error> {
	let hex = hex.trim();
	if !hex.is_ascii() {
		return Err(ErrorKind::Argument("Hex string must be ASCII".to_owned()))?;
	}
	if hex.len() % 2 != 0 {
		return Err(ErrorKind::Argument(format!(
			"Hex string has odd length: {}",
			hex.len()
		)))?;
	}
	(0..hex.len())
		.step_by(2)
		.map(|i| {
			u8::from_str_radix(&hex[i..i + 2], 16)
				.map_err(|e| ErrorKind::Argument(format!("Invalid hex: {}", e)).into())
		})
		.collect()
}
