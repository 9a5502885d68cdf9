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

//! Orchestration of the two-level scheme: cross-share consistency
//! checks, group handling, the outer and inner splits, and the
//! top-level generate/recover entry points.

use std::collections::BTreeMap;
use std::fmt;

use rand::{thread_rng, CryptoRng, Rng, RngCore};
use zeroize::{Zeroize, Zeroizing};

use crate::constants::{ID_LENGTH_BITS, ITERATION_EXP_LENGTH_BITS, MAX_SHARE_COUNT};
use crate::error::{Error, ErrorKind};
use crate::shamir;
use crate::share::Share;
use crate::util::encrypt;

/// All member shares of one group, together with the group parameters
/// they agree on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareGroup {
	/// Common share identifier
	pub identifier: u16,
	/// Common iteration exponent
	pub iteration_exponent: u8,
	/// x coordinate of this group
	pub group_index: u8,
	/// Number of groups required to reconstruct the master secret
	pub group_threshold: u8,
	/// Total number of groups
	pub group_count: u8,
	/// Number of members required to reconstruct the group share
	pub member_threshold: u8,
	/// Member shares held for this group
	pub member_shares: Vec<Share>,
}

impl fmt::Display for ShareGroup {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		writeln!(
			f,
			"Group {} of {} - {} of {} shares required: ",
			self.group_index + 1,
			self.group_count,
			self.member_threshold,
			self.member_shares.len()
		)?;
		for s in &self.member_shares {
			match s.to_mnemonic() {
				Ok(m) => writeln!(f, "{}", m)?,
				Err(_) => writeln!(f, "<unserializable share>")?,
			}
		}
		Ok(())
	}
}

impl ShareGroup {
	/// Mnemonics of all member shares held
	pub fn mnemonics(&self) -> Result<Vec<String>, Error> {
		self.member_shares.iter().map(|s| s.to_mnemonic()).collect()
	}

	/// Whether enough members are held to reconstruct the group share
	pub fn is_complete(&self) -> bool {
		self.member_shares.len() >= self.member_threshold as usize
	}

	fn member_points(&self) -> Vec<(u8, Vec<u8>)> {
		self.member_shares
			.iter()
			.map(|s| (s.member_index, s.share_value.clone()))
			.collect()
	}
}

/// A collection of shares agreed on identifier, iteration exponent,
/// group threshold and group count, keyed by group index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSet {
	/// Common share identifier
	pub identifier: u16,
	/// Common iteration exponent
	pub iteration_exponent: u8,
	/// Number of groups required to reconstruct the master secret
	pub group_threshold: u8,
	/// Total number of groups of the split
	pub group_count: u8,
	groups: BTreeMap<u8, ShareGroup>,
}

impl ShareSet {
	/// Collect shares into a set, verifying cross-share consistency.
	/// Any inconsistency aborts before cryptographic work starts.
	pub fn new(shares: &[Share]) -> Result<ShareSet, Error> {
		let first = match shares.first() {
			Some(s) => s,
			None => {
				return Err(ErrorKind::Argument(
					"Share set must not be empty".to_string(),
				))?;
			}
		};
		if shares.iter().any(|s| s.identifier != first.identifier) {
			return Err(ErrorKind::DifferentIdentifiers)?;
		}
		if shares
			.iter()
			.any(|s| s.iteration_exponent != first.iteration_exponent)
		{
			return Err(ErrorKind::DifferentIterationExponents)?;
		}
		if shares
			.iter()
			.any(|s| s.group_threshold != first.group_threshold)
		{
			return Err(ErrorKind::MismatchingGroupThresholds)?;
		}
		if shares.iter().any(|s| s.group_count != first.group_count) {
			return Err(ErrorKind::MismatchingGroupCounts)?;
		}
		if first.group_threshold > first.group_count {
			return Err(ErrorKind::InvalidGroupThreshold(
				first.group_threshold,
				first.group_count,
			))?;
		}
		if first.group_count > MAX_SHARE_COUNT {
			return Err(ErrorKind::Value(format!(
				"Group count {} out of range",
				first.group_count
			)))?;
		}

		let mut groups: BTreeMap<u8, ShareGroup> = BTreeMap::new();
		for s in shares {
			let group = groups.entry(s.group_index).or_insert_with(|| ShareGroup {
				identifier: s.identifier,
				iteration_exponent: s.iteration_exponent,
				group_index: s.group_index,
				group_threshold: s.group_threshold,
				group_count: s.group_count,
				member_threshold: s.member_threshold,
				member_shares: vec![],
			});
			group.member_shares.push(s.clone());
		}

		for (group_index, group) in &groups {
			if group
				.member_shares
				.iter()
				.any(|s| s.member_threshold != group.member_threshold)
			{
				return Err(ErrorKind::MismatchingMemberThresholds(*group_index))?;
			}
			let mut seen = [false; MAX_SHARE_COUNT as usize];
			for s in &group.member_shares {
				if s.member_index >= MAX_SHARE_COUNT {
					return Err(ErrorKind::Value(format!(
						"Member index {} out of range",
						s.member_index
					)))?;
				}
				if seen[s.member_index as usize] {
					return Err(ErrorKind::DuplicateMemberIndices(*group_index))?;
				}
				seen[s.member_index as usize] = true;
			}
		}

		for s in shares {
			if s.group_index >= s.group_count {
				return Err(ErrorKind::InvalidGroupIndex(s.group_index, s.group_count))?;
			}
		}

		Ok(ShareSet {
			identifier: first.identifier,
			iteration_exponent: first.iteration_exponent,
			group_threshold: first.group_threshold,
			group_count: first.group_count,
			groups,
		})
	}

	/// Groups of the set in group index order
	pub fn groups(&self) -> impl Iterator<Item = &ShareGroup> {
		self.groups.values()
	}

	// two-level reconstruction of the encrypted master secret
	fn recover_encrypted(&self) -> Result<Vec<u8>, Error> {
		let usable: Vec<&ShareGroup> = self.groups.values().filter(|g| g.is_complete()).collect();
		if (usable.len() as u8) < self.group_threshold {
			let short = self.groups.values().find(|g| !g.is_complete());
			return Err(match short {
				// enough groups present, one of them short on members
				Some(g) if self.groups.len() as u8 >= self.group_threshold => {
					ErrorKind::InsufficientMembers(
						g.group_index,
						g.member_shares.len(),
						g.member_threshold,
					)
				}
				_ => ErrorKind::InsufficientGroups(self.groups.len(), self.group_threshold),
			})?;
		}

		// any threshold-sized selection of usable groups will do
		let mut group_points: Vec<(u8, Vec<u8>)> = Vec::new();
		for g in usable.iter().take(self.group_threshold as usize) {
			let points = g.member_points();
			let value = shamir::recover_secret(&points, g.member_threshold)?;
			group_points.push((g.group_index, value));
		}
		let ems = shamir::recover_secret(&group_points, self.group_threshold)?;
		for (_, v) in group_points.iter_mut() {
			v.zeroize();
		}
		Ok(ems)
	}

	/// Recover the master secret, undoing the Feistel encryption with
	/// the given passphrase
	pub fn recover(&self, passphrase: &[u8]) -> Result<Vec<u8>, Error> {
		let ems = Zeroizing::new(self.recover_encrypted()?);
		encrypt::decrypt(
			&ems,
			passphrase,
			self.iteration_exponent,
			self.identifier,
		)
	}

	/// Split a secret into share_count raw (index, value) shares, any
	/// threshold of which recover it via [ShareSet::interpolate]
	pub fn split_secret(
		secret: &[u8],
		threshold: u8,
		share_count: u8,
	) -> Result<Vec<(u8, Vec<u8>)>, Error> {
		shamir::split_secret(secret, threshold, share_count)
	}

	/// Evaluate the share polynomial at x; x = 255 recovers the secret,
	/// x = 254 the digest share
	pub fn interpolate(x: u8, shares: &[(u8, Vec<u8>)]) -> Result<Vec<u8>, Error> {
		shamir::interpolate(x, shares)
	}

	/// Encrypt and split a master secret across groups. Each entry of
	/// `groups` is a (member_threshold, member_count) pair;
	/// group_threshold of them are required for recovery.
	pub fn split(
		group_threshold: u8,
		groups: &[(u8, u8)],
		master_secret: &[u8],
		passphrase: &[u8],
		iteration_exponent: u8,
	) -> Result<Vec<ShareGroup>, Error> {
		Self::split_with_rng(
			&mut thread_rng(),
			group_threshold,
			groups,
			master_secret,
			passphrase,
			iteration_exponent,
		)
	}

	/// As [ShareSet::split], drawing identifier and share randomness
	/// from the given source
	pub fn split_with_rng<R>(
		rng: &mut R,
		group_threshold: u8,
		groups: &[(u8, u8)],
		master_secret: &[u8],
		passphrase: &[u8],
		iteration_exponent: u8,
	) -> Result<Vec<ShareGroup>, Error>
	where
		R: RngCore + CryptoRng,
	{
		if master_secret.len() != 16 && master_secret.len() != 32 {
			return Err(ErrorKind::Value(format!(
				"The master secret must be 16 or 32 bytes, not {}",
				master_secret.len()
			)))?;
		}
		if groups.is_empty() || groups.len() > MAX_SHARE_COUNT as usize {
			return Err(ErrorKind::Argument(format!(
				"Group count must be between 1 and {}",
				MAX_SHARE_COUNT
			)))?;
		}
		if group_threshold == 0 || group_threshold as usize > groups.len() {
			return Err(ErrorKind::InvalidGroupThreshold(
				group_threshold,
				groups.len() as u8,
			))?;
		}
		if iteration_exponent >> ITERATION_EXP_LENGTH_BITS != 0 {
			return Err(ErrorKind::Value(format!(
				"Iteration exponent {} does not fit in {} bits",
				iteration_exponent, ITERATION_EXP_LENGTH_BITS
			)))?;
		}

		let identifier: u16 = rng.gen::<u16>() & ((1 << ID_LENGTH_BITS) - 1);
		let ems = Zeroizing::new(encrypt::encrypt(
			master_secret,
			passphrase,
			iteration_exponent,
			identifier,
		)?);

		let group_values =
			shamir::split_secret_with_rng(rng, &ems, group_threshold, groups.len() as u8)?;

		let mut retval = Vec::with_capacity(groups.len());
		for (group_index, mut group_value) in group_values {
			let (member_threshold, member_count) = groups[group_index as usize];
			let member_values =
				shamir::split_secret_with_rng(rng, &group_value, member_threshold, member_count)?;
			group_value.zeroize();
			let member_shares = member_values
				.into_iter()
				.map(|(member_index, share_value)| Share {
					identifier,
					iteration_exponent,
					group_index,
					group_threshold,
					group_count: groups.len() as u8,
					member_index,
					member_threshold,
					share_value,
				})
				.collect();
			retval.push(ShareGroup {
				identifier,
				iteration_exponent,
				group_index,
				group_threshold,
				group_count: groups.len() as u8,
				member_threshold,
				member_shares,
			});
		}
		Ok(retval)
	}

	/// Convert a BIP-39 mnemonic to its entropy, encrypt it with the
	/// passphrase, and split it in a single group of share_count
	/// members with the given threshold. Returns one share mnemonic
	/// per member.
	pub fn generate_shares(
		bip39_mnemonic: &str,
		threshold: u8,
		share_count: u8,
		passphrase: &[u8],
		iteration_exponent: u8,
	) -> Result<Vec<String>, Error> {
		Self::generate_shares_with_rng(
			&mut thread_rng(),
			bip39_mnemonic,
			threshold,
			share_count,
			passphrase,
			iteration_exponent,
		)
	}

	/// As [ShareSet::generate_shares] with an explicit random source
	pub fn generate_shares_with_rng<R>(
		rng: &mut R,
		bip39_mnemonic: &str,
		threshold: u8,
		share_count: u8,
		passphrase: &[u8],
		iteration_exponent: u8,
	) -> Result<Vec<String>, Error>
	where
		R: RngCore + CryptoRng,
	{
		let parsed = bip39::Mnemonic::parse_normalized(bip39_mnemonic)
			.map_err(|e| ErrorKind::Bip39(format!("{}", e)))?;
		let entropy = Zeroizing::new(parsed.to_entropy());
		if entropy.len() != 16 && entropy.len() != 32 {
			return Err(ErrorKind::Value(format!(
				"Only 128- or 256-bit seed mnemonics can be shared, not {} bits",
				entropy.len() * 8
			)))?;
		}
		let groups = Self::split_with_rng(
			rng,
			1,
			&[(threshold, share_count)],
			&entropy,
			passphrase,
			iteration_exponent,
		)?;
		groups[0].mnemonics()
	}

	/// Decode share mnemonics, recover the master secret with the
	/// passphrase, and render it as a BIP-39 mnemonic
	pub fn recover_mnemonic<T>(mnemonics: &[T], passphrase: &[u8]) -> Result<String, Error>
	where
		T: AsRef<str>,
	{
		let shares = mnemonics
			.iter()
			.map(|m| Share::parse(m.as_ref()))
			.collect::<Result<Vec<_>, _>>()?;
		let set = ShareSet::new(&shares)?;
		let entropy = Zeroizing::new(set.recover(passphrase)?);
		let mnemonic = bip39::Mnemonic::from_entropy(&entropy)
			.map_err(|e| ErrorKind::Bip39(format!("{}", e)))?;
		Ok(mnemonic.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::StdRng;
	use rand::SeedableRng;

	fn flatten(groups: &[ShareGroup]) -> Result<Vec<Share>, Error> {
		let mut retval = vec![];
		for g in groups {
			retval.extend(g.member_shares.iter().cloned());
		}
		Ok(retval)
	}

	fn recover_from(shares: &[Share], passphrase: &[u8]) -> Result<Vec<u8>, Error> {
		ShareSet::new(shares)?.recover(passphrase)
	}

	#[test]
	fn single_group_roundtrip() -> Result<(), Error> {
		let master_secret = b"\x0c\x94\x90\xbcn\xd6\xbc\xbf\xac>\xbe}\xeeV\xf2P".to_vec();
		let mut rng = StdRng::seed_from_u64(1);
		let groups =
			ShareSet::split_with_rng(&mut rng, 1, &[(3, 5)], &master_secret, b"", 0)?;
		assert_eq!(groups.len(), 1);
		assert_eq!(groups[0].member_shares.len(), 5);
		// serialization of every share must parse back to itself
		for s in &groups[0].member_shares {
			assert_eq!(Share::parse(&s.to_mnemonic()?)?, *s);
		}
		let shares = flatten(&groups)?;
		assert_eq!(recover_from(&shares, b"")?, master_secret);
		// any 3 of 5 suffice
		assert_eq!(recover_from(&shares[1..4], b"")?, master_secret);
		// 2 of 5 do not
		let res = recover_from(&shares[..2], b"");
		assert_eq!(
			res.unwrap_err().kind(),
			ErrorKind::InsufficientMembers(0, 2, 3)
		);
		Ok(())
	}

	#[test]
	fn multi_group_roundtrip() -> Result<(), Error> {
		let master_secret = b"\x0c\x94\x90\xbcn\xd6\xbc\xbf\xac>\xbe}\xeeV\xf2P".to_vec();
		let mut rng = StdRng::seed_from_u64(2);
		let groups = ShareSet::split_with_rng(
			&mut rng,
			2,
			&[(3, 5), (2, 5), (3, 3), (13, 16)],
			&master_secret,
			b"TREZOR",
			0,
		)?;
		assert_eq!(groups.len(), 4);
		// all shares of all groups
		let shares = flatten(&groups)?;
		assert_eq!(recover_from(&shares, b"TREZOR")?, master_secret);
		// exactly two complete groups, extra members dropped
		let mut selection = vec![];
		selection.extend(groups[1].member_shares[2..5].iter().cloned());
		selection.extend(groups[2].member_shares.iter().cloned());
		assert_eq!(recover_from(&selection, b"TREZOR")?, master_secret);
		// one complete group is not enough
		let res = recover_from(&groups[2].member_shares, b"TREZOR");
		assert_eq!(res.unwrap_err().kind(), ErrorKind::InsufficientGroups(1, 2));
		// wrong passphrase yields a different secret, not an error
		assert_ne!(recover_from(&shares, b"wrong")?, master_secret);
		Ok(())
	}

	#[test]
	fn one_of_one_split() -> Result<(), Error> {
		let master_secret = b"\xff\x00\xff\x00\xff\x00\xff\x00\xff\x00\xff\x00\xff\x00\xff\x00"
			.to_vec();
		let mut rng = StdRng::seed_from_u64(3);
		let groups = ShareSet::split_with_rng(&mut rng, 1, &[(1, 1)], &master_secret, b"", 0)?;
		let share = &groups[0].member_shares[0];
		assert_eq!(share.group_threshold, 1);
		assert_eq!(share.member_threshold, 1);
		assert_eq!(share.member_index, 0);
		assert_eq!(recover_from(&flatten(&groups)?, b"")?, master_secret);
		Ok(())
	}

	#[test]
	fn cross_share_checks() -> Result<(), Error> {
		let master_secret = b"\x0c\x94\x90\xbcn\xd6\xbc\xbf\xac>\xbe}\xeeV\xf2P".to_vec();
		let mut rng = StdRng::seed_from_u64(4);
		let groups =
			ShareSet::split_with_rng(&mut rng, 1, &[(2, 3)], &master_secret, b"", 0)?;
		let shares = flatten(&groups)?;

		let mut tampered = shares.clone();
		tampered[0].identifier ^= 1;
		assert_eq!(
			ShareSet::new(&tampered).unwrap_err().kind(),
			ErrorKind::DifferentIdentifiers
		);

		let mut tampered = shares.clone();
		tampered[0].iteration_exponent = 1;
		assert_eq!(
			ShareSet::new(&tampered).unwrap_err().kind(),
			ErrorKind::DifferentIterationExponents
		);

		let mut tampered = shares.clone();
		tampered[0].group_threshold = 1;
		tampered[1].group_threshold = 2;
		assert_eq!(
			ShareSet::new(&tampered).unwrap_err().kind(),
			ErrorKind::MismatchingGroupThresholds
		);

		let mut tampered = shares.clone();
		tampered[2].group_count = 2;
		assert_eq!(
			ShareSet::new(&tampered).unwrap_err().kind(),
			ErrorKind::MismatchingGroupCounts
		);

		let mut tampered = shares.clone();
		tampered[1].member_threshold = 3;
		assert_eq!(
			ShareSet::new(&tampered).unwrap_err().kind(),
			ErrorKind::MismatchingMemberThresholds(0)
		);

		let mut tampered = shares.clone();
		tampered[1].member_index = tampered[0].member_index;
		assert_eq!(
			ShareSet::new(&tampered).unwrap_err().kind(),
			ErrorKind::DuplicateMemberIndices(0)
		);

		let mut tampered = shares.clone();
		for s in tampered.iter_mut() {
			s.group_index = 5;
		}
		assert_eq!(
			ShareSet::new(&tampered).unwrap_err().kind(),
			ErrorKind::InvalidGroupIndex(5, 1)
		);

		assert_eq!(
			ShareSet::new(&[]).unwrap_err().kind(),
			ErrorKind::Argument("Share set must not be empty".to_string())
		);
		Ok(())
	}

	#[test]
	fn raw_split_and_interpolate() -> Result<(), Error> {
		let secret = crate::util::hex::from_hex("7c3397a292a5941682d7a4ae2d898d11")?;
		for (k, n) in [(2u8, 3u8), (3, 5), (5, 5), (9, 9), (13, 15)] {
			let share_data = ShareSet::split_secret(&secret, k, n)?;
			assert_eq!(
				ShareSet::interpolate(255, &share_data[..k as usize])?,
				secret
			);
		}
		Ok(())
	}

	#[test]
	fn bip39_roundtrip() -> Result<(), Error> {
		let twelve = "abandon abandon abandon abandon abandon abandon abandon abandon \
		              abandon abandon abandon about";
		let twenty_four = "abandon abandon abandon abandon abandon abandon abandon abandon \
		                   abandon abandon abandon abandon abandon abandon abandon abandon \
		                   abandon abandon abandon abandon abandon abandon abandon art";
		let mut rng = StdRng::seed_from_u64(5);
		for bip39_mnemonic in [twelve, twenty_four] {
			let bip39_mnemonic = bip39_mnemonic
				.split_whitespace()
				.collect::<Vec<_>>()
				.join(" ");
			for (k, n) in [(1u8, 1u8), (2, 3), (3, 5)] {
				let mnemonics = ShareSet::generate_shares_with_rng(
					&mut rng,
					&bip39_mnemonic,
					k,
					n,
					b"buidltest",
					0,
				)?;
				assert_eq!(mnemonics.len(), n as usize);
				let recovered =
					ShareSet::recover_mnemonic(&mnemonics[..k as usize], b"buidltest")?;
				assert_eq!(recovered, bip39_mnemonic);
			}
		}
		// a 12-word mnemonic with a bad checksum must be rejected
		let res = ShareSet::generate_shares_with_rng(
			&mut rng,
			"abandon abandon abandon abandon abandon abandon abandon abandon \
			 abandon abandon abandon abandon",
			2,
			3,
			b"",
			0,
		);
		assert!(res.is_err());
		Ok(())
	}

	#[test]
	fn group_listing() -> Result<(), Error> {
		let master_secret = b"\x0c\x94\x90\xbcn\xd6\xbc\xbf\xac>\xbe}\xeeV\xf2P".to_vec();
		let mut rng = StdRng::seed_from_u64(6);
		let groups =
			ShareSet::split_with_rng(&mut rng, 1, &[(2, 3)], &master_secret, b"", 0)?;
		let mnemonics = groups[0].mnemonics()?;
		assert_eq!(mnemonics.len(), 3);
		for m in &mnemonics {
			assert_eq!(m.split_whitespace().count(), 20);
		}
		let listing = format!("{}", groups[0]);
		assert!(listing.starts_with("Group 1 of 1 - 2 of 3 shares required"));
		Ok(())
	}
}
