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

//! The fixed 1024-word vocabulary and its base-1024 codec. Words are
//! alphabetically ordered with unique four-letter prefixes; each word
//! stands for one 10-bit symbol.

use crate::constants::RADIX;
use crate::error::{Error, ErrorKind};

use std::collections::HashMap;

lazy_static! {
	/// Word list, index is the symbol value
	pub static ref WORDLIST: Vec<&'static str> =
		include_str!("en.txt").split_whitespace().collect();
	/// Reverse lookup from word to symbol value
	pub static ref WORD_INDEX: HashMap<&'static str, u16> = {
		let mut retval = HashMap::new();
		for (i, w) in WORDLIST.iter().enumerate() {
			retval.insert(*w, i as u16);
		}
		retval
	};
}

/// Look up the 10-bit symbol for each word
pub fn words_to_symbols(words: &[&str]) -> Result<Vec<u32>, Error> {
	if WORDLIST.len() != RADIX as usize {
		return Err(ErrorKind::Config(format!(
			"The wordlist should contain {} words, but it contains {} words.",
			RADIX,
			WORDLIST.len()
		)))?;
	}
	let mut symbols = Vec::with_capacity(words.len());
	for w in words {
		match WORD_INDEX.get(w) {
			Some(i) => symbols.push(u32::from(*i)),
			None => return Err(ErrorKind::InvalidWord((*w).to_owned()))?,
		}
	}
	Ok(symbols)
}

/// Render 10-bit symbols as their words
pub fn symbols_to_words(symbols: &[u32]) -> Result<Vec<String>, Error> {
	let mut retval = Vec::with_capacity(symbols.len());
	for s in symbols {
		if *s >= u32::from(RADIX) {
			return Err(ErrorKind::Value(format!("Symbol {} out of range", s)))?;
		}
		retval.push(WORDLIST[*s as usize].to_owned());
	}
	Ok(retval)
}
