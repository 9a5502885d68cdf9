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

//! Master secret encryption: a four-round Feistel network whose round
//! function is PBKDF2-HMAC-SHA256 keyed by the passphrase and salted
//! with the share identifier. Working halves are zeroized on drop.

use crate::constants::{BASE_ITERATION_COUNT, CUSTOMIZATION_STRING, ROUND_COUNT};
use crate::error::{Error, ErrorKind};

use std::convert::TryFrom;
use zeroize::Zeroizing;

#[cfg(feature = "ring_pbkdf2")]
use ring::pbkdf2;
#[cfg(feature = "ring_pbkdf2")]
use std::num::NonZeroU32;

#[cfg(feature = "rust_crypto_pbkdf2")]
use hmac::Hmac;
#[cfg(feature = "rust_crypto_pbkdf2")]
use pbkdf2::pbkdf2;
#[cfg(feature = "rust_crypto_pbkdf2")]
use sha2::Sha256;

/// Encrypt a master secret. The result has the same length as the
/// input, which must be of even length.
pub fn encrypt(
	master_secret: &[u8],
	passphrase: &[u8],
	iteration_exponent: u8,
	identifier: u16,
) -> Result<Vec<u8>, Error> {
	permute(
		master_secret,
		passphrase,
		iteration_exponent,
		identifier,
		0..ROUND_COUNT,
	)
}

/// Invert [encrypt] by running the rounds in reverse order
pub fn decrypt(
	enc_master_secret: &[u8],
	passphrase: &[u8],
	iteration_exponent: u8,
	identifier: u16,
) -> Result<Vec<u8>, Error> {
	permute(
		enc_master_secret,
		passphrase,
		iteration_exponent,
		identifier,
		(0..ROUND_COUNT).rev(),
	)
}

fn permute(
	input: &[u8],
	passphrase: &[u8],
	iteration_exponent: u8,
	identifier: u16,
	rounds: impl Iterator<Item = u8>,
) -> Result<Vec<u8>, Error> {
	if input.is_empty() || input.len() % 2 != 0 {
		return Err(ErrorKind::Value(
			"The length of the master secret in bytes must be an even number".to_string(),
		))?;
	}
	let half = input.len() / 2;
	let mut l = Zeroizing::new(input[..half].to_vec());
	let mut r = Zeroizing::new(input[half..].to_vec());
	let mut salt_prefix = CUSTOMIZATION_STRING.to_vec();
	salt_prefix.extend_from_slice(&identifier.to_be_bytes());
	for i in rounds {
		let f = round_function(i, passphrase, iteration_exponent, &salt_prefix, &r)?;
		let next = Zeroizing::new(
			l.iter()
				.zip(f.iter())
				.map(|(a, b)| a ^ b)
				.collect::<Vec<u8>>(),
		);
		l = r;
		r = next;
	}
	let mut retval = Vec::with_capacity(input.len());
	retval.extend_from_slice(&r);
	retval.extend_from_slice(&l);
	Ok(retval)
}

fn round_function(
	i: u8,
	passphrase: &[u8],
	e: u8,
	salt_prefix: &[u8],
	r: &[u8],
) -> Result<Zeroizing<Vec<u8>>, Error> {
	let iterations = (u64::from(BASE_ITERATION_COUNT) << e) / u64::from(ROUND_COUNT);
	let iterations = u32::try_from(iterations).map_err(|_| {
		ErrorKind::Value(format!(
			"Iteration exponent {} overflows the PBKDF2 iteration count",
			e
		))
	})?;
	let mut salt = Zeroizing::new(Vec::with_capacity(salt_prefix.len() + r.len()));
	salt.extend_from_slice(salt_prefix);
	salt.extend_from_slice(r);
	let mut password = Zeroizing::new(Vec::with_capacity(passphrase.len() + 1));
	password.push(i);
	password.extend_from_slice(passphrase);
	let mut out = Zeroizing::new(vec![0u8; r.len()]);
	derive(iterations, &salt, &password, &mut out)?;
	Ok(out)
}

#[cfg(feature = "ring_pbkdf2")]
fn derive(iterations: u32, salt: &[u8], password: &[u8], out: &mut [u8]) -> Result<(), Error> {
	let iterations = NonZeroU32::new(iterations)
		.ok_or_else(|| ErrorKind::Value("PBKDF2 iteration count must be non-zero".to_string()))?;
	pbkdf2::derive(pbkdf2::PBKDF2_HMAC_SHA256, iterations, salt, password, out);
	Ok(())
}

#[cfg(feature = "rust_crypto_pbkdf2")]
fn derive(iterations: u32, salt: &[u8], password: &[u8], out: &mut [u8]) -> Result<(), Error> {
	pbkdf2::<Hmac<Sha256>>(password, salt, iterations, out)
		.map_err(|e| ErrorKind::Value(format!("PBKDF2 failure: {}", e)))?;
	Ok(())
}
