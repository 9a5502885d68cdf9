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

//! Fixed parameters of the sharing scheme. None of these are
//! configurable; changing any of them breaks interoperability with
//! other implementations.

/// Number of bits per mnemonic word
pub const RADIX_BITS: u8 = 10;

/// Number of words in the word list (2^RADIX_BITS)
pub const RADIX: u16 = 1 << RADIX_BITS as u16;

/// Length of the random share identifier in bits
pub const ID_LENGTH_BITS: u8 = 15;

/// Length of the iteration exponent field in bits
pub const ITERATION_EXP_LENGTH_BITS: u8 = 5;

/// Words occupied by the identifier and iteration exponent
pub const ID_EXP_LENGTH_WORDS: u8 = (ID_LENGTH_BITS + ITERATION_EXP_LENGTH_BITS) / RADIX_BITS;

/// Length of the RS1024 checksum in words
pub const CHECKSUM_LENGTH_WORDS: u8 = 3;

/// Words in a mnemonic that do not carry share value
pub const METADATA_LENGTH_WORDS: u8 = ID_EXP_LENGTH_WORDS + 2 + CHECKSUM_LENGTH_WORDS;

/// Minimum allowed entropy of the master secret in bits
pub const MIN_STRENGTH_BITS: u16 = 128;

/// Minimum allowed length of a mnemonic in words
pub const MIN_MNEMONIC_LENGTH_WORDS: u8 =
	METADATA_LENGTH_WORDS + ((MIN_STRENGTH_BITS + RADIX_BITS as u16 - 1) / RADIX_BITS as u16) as u8;

/// Maximum number of shares or groups in a split
pub const MAX_SHARE_COUNT: u8 = 16;

/// Length of the digest prefix of the digest share in bytes
pub const DIGEST_LENGTH_BYTES: u8 = 4;

/// x coordinate reserved for the digest share
pub const DIGEST_INDEX: u8 = 254;

/// x coordinate reserved for the shared secret
pub const SECRET_INDEX: u8 = 255;

/// Base PBKDF2 iteration count; the effective per-round count is
/// (BASE_ITERATION_COUNT << e) / ROUND_COUNT
pub const BASE_ITERATION_COUNT: u32 = 10000;

/// Number of rounds in the Feistel cipher
pub const ROUND_COUNT: u8 = 4;

/// Customization string for the RS1024 checksum and the PBKDF2 salt
pub const CUSTOMIZATION_STRING: &[u8] = b"shamir";
