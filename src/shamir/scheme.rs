// Copyright 2024 The shamir39 Developers
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

//! The two-level split and combine protocol: the encrypted master secret
//! is split across groups, each group share is split across members, and
//! members are rendered as mnemonics.

use super::{Share, Splitter};
use crate::error::{Error, ErrorKind};
use crate::random::{self, EntropySource, SystemEntropy};
use crate::util::encrypt::MasterSecretEnc;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use zeroize::Zeroize;

const MAX_GROUP_COUNT: usize = 16;

/// One group's worth of member shares as produced by a split
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupShare {
	/// Identifier of the split this group belongs to
	pub identifier: u16,
	/// extendable flag
	pub extendable: bool,
	/// iteration exponent
	pub iteration_exponent: u8,
	/// group index
	pub group_index: u8,
	/// group threshold
	pub group_threshold: u8,
	/// number of group shares
	pub group_count: u8,
	/// member threshold
	pub member_threshold: u8,
	/// Member shares for the group
	pub member_shares: Vec<Share>,
}

impl fmt::Display for GroupShare {
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
				Ok(words) => {
					for w in words {
						write!(f, "{} ", w)?;
					}
				}
				Err(_) => write!(f, "<invalid share>")?,
			}
			writeln!(f)?;
		}
		Ok(())
	}
}

impl GroupShare {
	/// return list of mnemonics
	pub fn mnemonic_list(&self) -> Result<Vec<Vec<String>>, Error> {
		let mut ret_vec = vec![];
		for s in &self.member_shares {
			ret_vec.push(s.to_mnemonic()?);
		}
		Ok(ret_vec)
	}

	/// return list of mnemonics as space separated strings
	pub fn mnemonic_list_flat(&self) -> Result<Vec<String>, Error> {
		let mut ret_vec = vec![];
		for s in &self.member_shares {
			ret_vec.push(s.to_mnemonic()?.join(" "))
		}
		Ok(ret_vec)
	}

	/// recover the group share from the first member_threshold members,
	/// taken in member index order
	pub fn decode_shares(&self) -> Result<Share, Error> {
		let mut members: Vec<Share> = self.member_shares.clone();
		members.sort_by_key(|s| s.member_index);
		members.truncate(self.member_threshold as usize);
		let sp = Splitter::new(None);
		sp.recover_secret(&members, self.member_threshold)
	}
}

/// Split a master secret into mnemonic shares.
/// group_threshold: The number of groups required to reconstruct the master
/// secret.
/// groups: A list of (member_threshold, member_count) pairs for each group,
/// where member_count is the number of shares to generate for the group and
/// member_threshold is the number of members required to reconstruct the
/// group secret.
/// master_secret: The master secret to split.
/// passphrase: The passphrase used to encrypt the master secret.
/// iteration_exponent: Scales the PBKDF2 work inside the cipher.
/// extendable: Selects the extendable domain-separation constants, so that
/// more members can later be added without colliding with this split.
/// return: List of group shares, one entry per group.
pub fn generate_mnemonics(
	group_threshold: u8,
	groups: &[(u8, u8)],
	master_secret: &[u8],
	passphrase: &str,
	iteration_exponent: u8,
	extendable: bool,
) -> Result<Vec<GroupShare>, Error> {
	let mut source = SystemEntropy::new();
	generate_mnemonics_with_source(
		group_threshold,
		groups,
		master_secret,
		passphrase,
		iteration_exponent,
		extendable,
		&mut source,
	)
}

/// As [`generate_mnemonics`], drawing all randomness (the identifier and
/// the Shamir random points) from the given source
pub fn generate_mnemonics_with_source(
	group_threshold: u8,
	groups: &[(u8, u8)],
	master_secret: &[u8],
	passphrase: &str,
	iteration_exponent: u8,
	extendable: bool,
	source: &mut dyn EntropySource,
) -> Result<Vec<GroupShare>, Error> {
	let mut proto_share = Share::default();
	proto_share.extendable = extendable;
	proto_share.iteration_exponent = iteration_exponent;
	proto_share.group_threshold = group_threshold;
	proto_share.group_count = groups.len() as u8;

	if master_secret.len() * 8 < proto_share.config.min_strength_bits as usize {
		return Err(ErrorKind::InvalidInput(format!(
			"The length of the master secret ({} bytes) must be at least {} bytes.",
			master_secret.len(),
			(f64::from(proto_share.config.min_strength_bits) / 8f64).ceil(),
		)))?;
	}

	if master_secret.len() % 2 != 0 {
		return Err(ErrorKind::InvalidInput(
			"The length of the master secret in bytes must be an even number".to_string(),
		))?;
	}

	if groups.is_empty() || groups.len() > MAX_GROUP_COUNT {
		return Err(ErrorKind::InvalidInput(format!(
			"The number of groups must be between 1 and {}.",
			MAX_GROUP_COUNT,
		)))?;
	}

	if group_threshold == 0 || group_threshold as usize > groups.len() {
		return Err(ErrorKind::InvalidInput(format!(
			"The requested group threshold ({}) must be between 1 and the number of groups ({}).",
			group_threshold,
			groups.len()
		)))?;
	}

	for (member_threshold, member_count) in groups {
		if *member_threshold == 0 || member_threshold > member_count || *member_count > 16 {
			return Err(ErrorKind::InvalidInput(format!(
				"Group arguments ({} of {}) must satisfy 1 <= threshold <= count <= 16.",
				member_threshold, member_count,
			)))?;
		}
		if *member_threshold == 1 && *member_count > 1 {
			return Err(ErrorKind::InvalidInput(
				"Creating multiple member shares with member threshold 1 is not allowed. \
				 Use 1-of-1 member sharing instead."
					.to_string(),
			))?;
		}
	}

	proto_share.identifier = random::random_identifier(source, proto_share.config.id_length_bits);

	let encoder = MasterSecretEnc::new();

	let mut encrypted_master_secret = encoder.encrypt(
		master_secret,
		passphrase,
		iteration_exponent,
		proto_share.identifier,
		extendable,
	)?;

	let sp = Splitter::new(None);

	let group_shares = sp.split_secret(
		&proto_share,
		group_threshold,
		groups.len() as u8,
		&encrypted_master_secret,
		source,
	)?;
	encrypted_master_secret.zeroize();

	let mut retval: Vec<GroupShare> = vec![];

	let gs_len = group_shares.len();
	for (i, mut elem) in group_shares.into_iter().enumerate() {
		proto_share.group_index = i as u8;
		let (member_threshold, member_count) = groups[i];
		let member_shares = sp.split_secret(
			&proto_share,
			member_threshold,
			member_count,
			&elem.share_value,
			source,
		)?;
		elem.share_value.zeroize();
		retval.push(GroupShare {
			identifier: proto_share.identifier,
			extendable,
			iteration_exponent,
			group_index: i as u8,
			group_threshold,
			group_count: gs_len as u8,
			member_threshold,
			member_shares,
		});
	}

	Ok(retval)
}

/// As [`generate_mnemonics`], with a master secret of `strength_bits` drawn
/// from the entropy source
pub fn generate_mnemonics_random(
	group_threshold: u8,
	groups: &[(u8, u8)],
	strength_bits: u16,
	passphrase: &str,
	iteration_exponent: u8,
	extendable: bool,
) -> Result<Vec<GroupShare>, Error> {
	let mut source = SystemEntropy::new();
	let config = Share::default().config;
	if strength_bits < config.min_strength_bits {
		return Err(ErrorKind::InvalidInput(format!(
			"The requested strength of the master secret ({} bits) must be at least {} bits.",
			strength_bits, config.min_strength_bits,
		)))?;
	}
	if strength_bits % 16 != 0 {
		return Err(ErrorKind::InvalidInput(format!(
			"The requested strength of the master secret ({} bits) must be a multiple of 16 bits.",
			strength_bits,
		)))?;
	}
	let mut master_secret = random::fill_vec_rand(&mut source, strength_bits as usize / 8);
	let retval = generate_mnemonics_with_source(
		group_threshold,
		groups,
		&master_secret,
		passphrase,
		iteration_exponent,
		extendable,
		&mut source,
	);
	master_secret.zeroize();
	retval
}

/// Combines mnemonic shares to obtain the master secret which was
/// previously split using Shamir's secret sharing scheme.
/// mnemonics: List of mnemonics.
/// passphrase: The passphrase used to encrypt the master secret.
/// return: The master secret.
pub fn combine_mnemonics(mnemonics: &[Vec<String>], passphrase: &str) -> Result<Vec<u8>, Error> {
	let group_shares = decode_mnemonics(mnemonics)?;
	let group_threshold = group_shares[0].group_threshold;
	let mut shares = vec![];
	for gs in &group_shares {
		// within each group, the member index recovered the group share;
		// at the outer level the group index is the abscissa
		let mut s = gs.decode_shares()?;
		s.member_index = s.group_index;
		shares.push(s);
	}
	shares.truncate(group_threshold as usize);
	let sp = Splitter::new(None);
	let mut ems = sp.recover_secret(&shares, group_threshold)?;
	for s in shares.iter_mut() {
		s.share_value.zeroize();
	}
	let encoder = MasterSecretEnc::new();
	let dms = encoder.decrypt(
		&ems.share_value,
		passphrase,
		ems.iteration_exponent,
		ems.identifier,
		ems.extendable,
	)?;
	ems.share_value.zeroize();
	Ok(dms)
}

/// Decode a single mnemonic into its share record without recovering
/// anything. Useful for inspecting metadata (identifier, group and member
/// parameters) of a share in isolation.
pub fn decode_mnemonic(mnemonic: &[String]) -> Result<Share, Error> {
	Share::from_mnemonic(mnemonic)
}

/// Decodes all Mnemonics to a list of shares and performs error checking
fn decode_mnemonics(mnemonics: &[Vec<String>]) -> Result<Vec<GroupShare>, Error> {
	let mut shares = vec![];
	if mnemonics.is_empty() {
		return Err(ErrorKind::InsufficientShares(
			"List of mnemonics is empty.".to_string(),
		))?;
	}
	let check_len = mnemonics[0].len();
	for m in mnemonics {
		if m.len() != check_len {
			return Err(ErrorKind::InconsistentShares(
				"Invalid set of mnemonics. All mnemonics must have the same length.".to_string(),
			))?;
		}
		shares.push(Share::from_mnemonic(m)?);
	}

	let check_share = shares[0].clone();
	for s in shares.iter() {
		if s.identifier != check_share.identifier
			|| s.iteration_exponent != check_share.iteration_exponent
			|| s.extendable != check_share.extendable
		{
			return Err(ErrorKind::InconsistentShares(format!(
				"Invalid set of mnemonics. All mnemonics must begin with the same {} words. \
				 (Identifier, extendable flag and iteration exponent must be the same).",
				s.config.id_exp_length_words,
			)))?;
		}
		if s.group_threshold != check_share.group_threshold {
			return Err(ErrorKind::InconsistentShares(
				"Invalid set of mnemonics. All mnemonics must have the same group threshold"
					.to_string(),
			))?;
		}
		if s.group_count != check_share.group_count {
			return Err(ErrorKind::InconsistentShares(
				"Invalid set of mnemonics. All mnemonics must have the same group count"
					.to_string(),
			))?;
		}
	}

	let mut group_index_map = BTreeMap::new();

	for s in shares {
		if !group_index_map.contains_key(&s.group_index) {
			let group_share = GroupShare {
				identifier: s.identifier,
				extendable: s.extendable,
				iteration_exponent: s.iteration_exponent,
				group_index: s.group_index,
				group_threshold: s.group_threshold,
				group_count: s.group_count,
				member_threshold: s.member_threshold,
				member_shares: vec![s],
			};
			group_index_map.insert(group_share.group_index, group_share);
		} else {
			let e = group_index_map.get_mut(&s.group_index).unwrap();
			e.member_shares.push(s);
		}
	}

	for g in group_index_map.values() {
		let mut member_indices = BTreeSet::new();
		for ms in g.member_shares.iter() {
			if g.member_threshold != ms.member_threshold {
				return Err(ErrorKind::InconsistentShares(format!(
					"Invalid set of mnemonics. All mnemonics in group {} must have \
					 the same member threshold.",
					g.group_index,
				)))?;
			}
			if !member_indices.insert(ms.member_index) {
				return Err(ErrorKind::InconsistentShares(format!(
					"Invalid set of mnemonics. Group {} contains two shares with \
					 member index {}.",
					g.group_index, ms.member_index,
				)))?;
			}
		}
		if g.member_threshold == 1 && g.member_shares.len() > 1 {
			return Err(ErrorKind::InconsistentShares(format!(
				"Invalid set of mnemonics. Group {} has member threshold 1 but \
				 contains more than one member share.",
				g.group_index,
			)))?;
		}
		if g.member_shares.len() < g.member_threshold as usize {
			return Err(ErrorKind::InsufficientShares(format!(
				"Insufficient number of mnemonics (Group {}). At least {} mnemonics \
				 are required.",
				g.group_index, g.member_threshold,
			)))?;
		}
	}

	if group_index_map.len() < check_share.group_threshold as usize {
		return Err(ErrorKind::InsufficientShares(format!(
			"Insufficient number of mnemonic groups ({}). The required number \
			 of groups is {}.",
			group_index_map.len(),
			check_share.group_threshold,
		)))?;
	}

	Ok(group_index_map.into_iter().map(|g| g.1).collect())
}
