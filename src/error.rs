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

//! Error types for the slip39 crate. Display strings may name a share
//! by its indices but never include share values.

use failure::{Backtrace, Context, Fail};
use std::env;
use std::fmt::{self, Display};

/// Error definition
#[derive(Debug, Fail)]
pub struct Error {
	inner: Context<ErrorKind>,
}

/// All ways a share operation can fail
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	/// Configuration error, with details
	#[fail(display = "Configuration Error: {}", _0)]
	Config(String),

	/// Inconsistency between different arguments
	#[fail(display = "Argument Error: {}", _0)]
	Argument(String),

	/// Invalid value of one of the arguments
	#[fail(display = "Value Error: {}", _0)]
	Value(String),

	/// Word is not part of the word list
	#[fail(display = "Invalid word: '{}'", _0)]
	InvalidWord(String),

	/// The RS1024 checksum of a mnemonic does not verify
	#[fail(display = "Invalid mnemonic checksum")]
	InvalidChecksum,

	/// Mnemonic is too short to contain a share
	#[fail(display = "Invalid mnemonic length: {} words, at least {} required", _0, _1)]
	InvalidMnemonicLength(usize, u8),

	/// High padding bits of the share value are not all zero
	#[fail(display = "Invalid padding: all padding bits must be 0")]
	InvalidPadding,

	/// Decoded share value has an unsupported length
	#[fail(display = "Invalid master secret length: {} words cannot carry a share value", _0)]
	InvalidMasterSecretLength(usize),

	/// Shares of one set carry different identifiers
	#[fail(display = "All shares must have the same identifier")]
	DifferentIdentifiers,

	/// Shares of one set carry different iteration exponents
	#[fail(display = "All shares must have the same iteration exponent")]
	DifferentIterationExponents,

	/// Shares of one set disagree on the group threshold
	#[fail(display = "All shares must have the same group threshold")]
	MismatchingGroupThresholds,

	/// Shares of one set disagree on the group count
	#[fail(display = "All shares must have the same group count")]
	MismatchingGroupCounts,

	/// Group threshold exceeds the group count
	#[fail(display = "Group threshold ({}) cannot exceed group count ({})", _0, _1)]
	InvalidGroupThreshold(u8, u8),

	/// Group index is out of range for the declared group count
	#[fail(display = "Group index {} is out of range for group count {}", _0, _1)]
	InvalidGroupIndex(u8, u8),

	/// Shares within one group disagree on the member threshold
	#[fail(display = "Shares of group {} must have the same member threshold", _0)]
	MismatchingMemberThresholds(u8),

	/// Two shares of one group carry the same member index
	#[fail(display = "Shares of group {} must have distinct member indices", _0)]
	DuplicateMemberIndices(u8),

	/// Not enough distinct groups to meet the group threshold
	#[fail(display = "Insufficient groups: have {}, need {}", _0, _1)]
	InsufficientGroups(usize, u8),

	/// A needed group holds fewer shares than its member threshold
	#[fail(display = "Insufficient members in group {}: have {}, need {}", _0, _1, _2)]
	InsufficientMembers(u8, usize, u8),

	/// Interpolation points do not have distinct x coordinates
	#[fail(display = "Share indices must be distinct")]
	InvalidShareIndices,

	/// Reassembled secret does not match its digest share
	#[fail(display = "Invalid digest of the shared secret")]
	InvalidDigest,

	/// BIP-39 conversion failed
	#[fail(display = "BIP-39 Error: {}", _0)]
	Bip39(String),

	/// Invalid usage of the bit packer
	#[fail(display = "BitVec Error: {}", _0)]
	BitVec(String),
}

impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let show_bt = match env::var("RUST_BACKTRACE") {
			Ok(r) => r == "1",
			Err(_) => false,
		};
		let backtrace = match self.backtrace() {
			Some(b) => format!("{}", b),
			None => String::from("Unknown"),
		};
		let inner_output = format!("{}", self.inner,);
		let backtrace_output = format!("\n Backtrace: {}", backtrace);
		let mut output = inner_output;
		if show_bt {
			output.push_str(&backtrace_output);
		}
		Display::fmt(&output, f)
	}
}

impl Error {
	/// get kind
	pub fn kind(&self) -> ErrorKind {
		self.inner.get_context().clone()
	}
	/// get cause string
	pub fn cause_string(&self) -> String {
		match self.cause() {
			Some(k) => format!("{}", k),
			None => "Unknown".to_string(),
		}
	}
	/// get cause
	pub fn cause(&self) -> Option<&dyn Fail> {
		self.inner.cause()
	}
	/// get backtrace
	pub fn backtrace(&self) -> Option<&Backtrace> {
		self.inner.backtrace()
	}
}

impl From<ErrorKind> for Error {
	fn from(kind: ErrorKind) -> Error {
		Error {
			inner: Context::new(kind),
		}
	}
}

impl From<Context<ErrorKind>> for Error {
	fn from(inner: Context<ErrorKind>) -> Error {
		Error { inner }
	}
}
