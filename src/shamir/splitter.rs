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

//! Shamir splitting and recovery of a byte-string secret over GF(256),
//! one polynomial per byte position. Shares are plain (x, value) points.
//! The secret sits at x = 255 and an HMAC digest share at x = 254, so a
//! split of threshold k has k - 2 degrees of freedom for randomness;
//! k = 1 degenerates to plain replication.

use crate::constants::{DIGEST_INDEX, DIGEST_LENGTH_BYTES, MAX_SHARE_COUNT, SECRET_INDEX};
use crate::error::{Error, ErrorKind};
use crate::field::gf256::Gf256;
use crate::field::lagrange;
use crate::util;

use hmac::{Hmac, Mac};
use rand::{thread_rng, CryptoRng, RngCore};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Split a secret into share_count shares, any threshold of which
/// recover it. The secret must be at least 16 bytes and of even length.
/// Randomness comes from the thread-local RNG.
pub fn split_secret(
	secret: &[u8],
	threshold: u8,
	share_count: u8,
) -> Result<Vec<(u8, Vec<u8>)>, Error> {
	split_secret_with_rng(&mut thread_rng(), secret, threshold, share_count)
}

/// As [split_secret], drawing randomness from the given source. A split
/// with threshold k >= 2 consumes exactly (k - 2) * n + (n - 4) random
/// bytes for an n-byte secret; a threshold of 1 consumes none.
pub fn split_secret_with_rng<R>(
	rng: &mut R,
	secret: &[u8],
	threshold: u8,
	share_count: u8,
) -> Result<Vec<(u8, Vec<u8>)>, Error>
where
	R: RngCore + CryptoRng,
{
	if threshold == 0 || threshold > MAX_SHARE_COUNT {
		return Err(ErrorKind::Argument(format!(
			"Threshold must be between 1 and {}",
			MAX_SHARE_COUNT
		)))?;
	}
	if share_count < threshold || share_count > MAX_SHARE_COUNT {
		return Err(ErrorKind::Argument(format!(
			"Share count with given threshold must be between {} and {}",
			threshold, MAX_SHARE_COUNT
		)))?;
	}
	if secret.len() < 16 || secret.len() % 2 != 0 {
		return Err(ErrorKind::Argument(
			"Secret must be at least 16 bytes in length and a multiple of 2".to_string(),
		))?;
	}

	// a threshold of 1 needs no polynomial and no digest
	if threshold == 1 {
		return Ok((0..share_count).map(|i| (i, secret.to_vec())).collect());
	}

	let random_share_count = threshold - 2;
	let mut shares: Vec<(u8, Vec<u8>)> = (0..random_share_count)
		.map(|i| (i, util::fill_vec_rand(rng, secret.len())))
		.collect();

	let random_part =
		util::fill_vec_rand(rng, secret.len() - DIGEST_LENGTH_BYTES as usize);
	let mut digest = create_digest(&random_part, secret);
	digest.extend_from_slice(&random_part);

	let mut base_shares = shares.clone();
	base_shares.push((DIGEST_INDEX, digest));
	base_shares.push((SECRET_INDEX, secret.to_vec()));

	for i in random_share_count..share_count {
		shares.push((i, interpolate(i, &base_shares)?));
	}

	Ok(shares)
}

/// Evaluate the polynomial defined by the given shares at x, byte
/// position by byte position. x coordinates must be distinct and all
/// values of equal length.
pub fn interpolate(x: u8, shares: &[(u8, Vec<u8>)]) -> Result<Vec<u8>, Error> {
	if shares.is_empty() {
		return Err(ErrorKind::Value("Share set must not be empty.".to_string()))?;
	}
	let value_length = shares[0].1.len();
	for (_, v) in shares {
		if v.len() != value_length {
			return Err(ErrorKind::Value(
				"Invalid set of shares. All share values must have the same length".to_string(),
			))?;
		}
	}
	let mut seen = [false; 256];
	for (x_i, _) in shares {
		if seen[*x_i as usize] {
			return Err(ErrorKind::InvalidShareIndices)?;
		}
		seen[*x_i as usize] = true;
	}

	if let Some((_, v)) = shares.iter().find(|(x_i, _)| *x_i == x) {
		return Ok(v.clone());
	}

	let mut retval = Vec::with_capacity(value_length);
	for j in 0..value_length {
		let points: Vec<(Gf256, Gf256)> = shares
			.iter()
			.map(|(x_i, v)| (Gf256::from_byte(*x_i), Gf256::from_byte(v[j])))
			.collect();
		retval.push(lagrange::evaluate_at(Gf256::from_byte(x), &points).to_byte());
	}
	Ok(retval)
}

/// Recover the secret from the first `threshold` of the given shares,
/// verifying the digest share whenever the threshold is at least 2
pub fn recover_secret(shares: &[(u8, Vec<u8>)], threshold: u8) -> Result<Vec<u8>, Error> {
	if threshold == 0 || shares.len() < threshold as usize {
		return Err(ErrorKind::Argument(format!(
			"At least {} shares are required, got {}",
			threshold,
			shares.len()
		)))?;
	}
	let points = &shares[..threshold as usize];
	let secret = interpolate(SECRET_INDEX, points)?;
	if threshold != 1 {
		check_digest(points, &secret)?;
	}
	Ok(secret)
}

fn create_digest(random_data: &[u8], shared_secret: &[u8]) -> Vec<u8> {
	let mut mac = HmacSha256::new_from_slice(random_data).expect("HMAC accepts any key length");
	mac.update(shared_secret);
	let mut retval = mac.finalize().into_bytes().to_vec();
	retval.truncate(DIGEST_LENGTH_BYTES as usize);
	retval
}

fn check_digest(shares: &[(u8, Vec<u8>)], secret: &[u8]) -> Result<(), Error> {
	let mut digest = interpolate(DIGEST_INDEX, shares)?;
	let random_part = digest.split_off(DIGEST_LENGTH_BYTES as usize);
	if digest != create_digest(&random_part, secret) {
		return Err(ErrorKind::InvalidDigest)?;
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::StdRng;
	use rand::{Rng, SeedableRng};

	// random source that counts the bytes drawn from it
	struct CountingRng {
		inner: StdRng,
		drawn: usize,
	}

	impl RngCore for CountingRng {
		fn next_u32(&mut self) -> u32 {
			self.inner.next_u32()
		}
		fn next_u64(&mut self) -> u64 {
			self.inner.next_u64()
		}
		fn fill_bytes(&mut self, dest: &mut [u8]) {
			self.drawn += dest.len();
			self.inner.fill_bytes(dest);
		}
		fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
			self.drawn += dest.len();
			self.inner.try_fill_bytes(dest)
		}
	}

	impl CryptoRng for CountingRng {}

	// split and recover, then check that subsets of threshold size
	// still reconstruct and one share fewer does not
	fn split_recover_impl(
		secret_length_bytes: usize,
		threshold: u8,
		total_shares: u8,
	) -> Result<(), Error> {
		let mut rng = StdRng::seed_from_u64(u64::from(threshold) << 8 | u64::from(total_shares));
		let secret = util::fill_vec_rand(&mut rng, secret_length_bytes);
		let mut shares = split_secret_with_rng(&mut rng, &secret, threshold, total_shares)?;
		for _ in threshold..=total_shares {
			let recovered = recover_secret(&shares, threshold)?;
			assert_eq!(secret, recovered);
			if threshold == 1 {
				return Ok(());
			}
			// randomly remove a share till we're at threshold
			let remove_index = rng.gen_range(0..shares.len());
			shares.remove(remove_index);
		}
		// now remove one more, and recovery should fail
		if shares.len() > 1 {
			let remove_index = rng.gen_range(0..shares.len());
			shares.remove(remove_index);
			assert!(recover_secret(&shares, threshold).is_err());
		}
		Ok(())
	}

	#[test]
	fn split_recover() -> Result<(), Error> {
		// invalid inputs
		assert!(split_recover_impl(14, 3, 5).is_err());
		assert!(split_recover_impl(15, 3, 5).is_err());
		assert!(split_recover_impl(16, 0, 5).is_err());
		assert!(split_recover_impl(16, 5, 3).is_err());
		assert!(split_recover_impl(16, 5, 17).is_err());
		// a range of thresholds
		for sc in 1..=MAX_SHARE_COUNT {
			for t in 1..=sc {
				split_recover_impl(16, t, sc)?;
			}
		}
		// a range of lengths
		for sl in (16..32).step_by(2) {
			split_recover_impl(sl, 3, 5)?;
			split_recover_impl(sl, 2, 3)?;
		}
		// a couple of long ones
		split_recover_impl(512, 3, 5)?;
		split_recover_impl(1024, 10, 16)?;
		Ok(())
	}

	#[test]
	fn randomness_consumption() -> Result<(), Error> {
		let secret = [0xa5u8; 16];
		for (threshold, count) in [(1u8, 5u8), (2, 3), (3, 5), (13, 15)] {
			let mut rng = CountingRng {
				inner: StdRng::seed_from_u64(42),
				drawn: 0,
			};
			split_secret_with_rng(&mut rng, &secret, threshold, count)?;
			let expected = if threshold < 2 {
				0
			} else {
				(threshold as usize - 2) * 16 + 12
			};
			assert_eq!(rng.drawn, expected);
		}
		Ok(())
	}

	#[test]
	fn tampered_share_fails_digest() -> Result<(), Error> {
		let mut rng = StdRng::seed_from_u64(7);
		let secret = util::fill_vec_rand(&mut rng, 16);
		let mut shares = split_secret_with_rng(&mut rng, &secret, 2, 2)?;
		shares[0].1[3] ^= 0x40;
		let res = recover_secret(&shares, 2);
		assert_eq!(res.unwrap_err().kind(), ErrorKind::InvalidDigest);
		Ok(())
	}

	#[test]
	fn duplicate_indices_rejected() {
		let shares = vec![(1u8, vec![0u8; 16]), (1u8, vec![1u8; 16])];
		let res = interpolate(255, &shares);
		assert_eq!(res.unwrap_err().kind(), ErrorKind::InvalidShareIndices);
	}

	#[test]
	fn interpolate_at_known_index_returns_value() -> Result<(), Error> {
		let shares = vec![(0u8, vec![7u8; 16]), (5u8, vec![9u8; 16])];
		assert_eq!(interpolate(5, &shares)?, vec![9u8; 16]);
		Ok(())
	}
}
