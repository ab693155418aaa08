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

//! Definition of a share, as well as functions to
//! convert it to and from the wordlist representation

use crate::error::{Error, ErrorKind};
use crate::util::bitpacker::BitPacker;
use crate::util::rs1024;
use crate::wordlist;

/// Share-specific configuration values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareConfig {
	/// The length of the random Identifier in bits
	pub id_length_bits: u8,
	/// The length of the extendable flag in bits
	pub extendable_length_bits: u8,
	/// The length of the iteration exponent in bits
	pub iteration_exp_length_bits: u8,
	/// The number of words in the word list
	pub radix: u16,
	/// The length of the radix in bits
	pub radix_bits: u8,
	/// The length of the identifier, extendable flag and iteration
	/// exponent in words
	pub id_exp_length_words: u8,
	/// The length of the RS1024 checksum in words
	pub checksum_length_words: u8,
	/// The length of the mnemonic in words without the share value
	pub metadata_length_words: u8,
	/// The minimum allowed length of the mnemonic in words
	pub min_mnemonic_length_words: u8,
	/// The minimum allowed entropy of the master secret
	pub min_strength_bits: u16,
}

impl Default for ShareConfig {
	fn default() -> Self {
		let radix_bits = wordlist::RADIX_BITS;
		let id_length_bits = 15;
		let extendable_length_bits = 1;
		let iteration_exp_length_bits = 4;
		let checksum_length_words = 3;
		let min_strength_bits = 128;

		// derived values
		let radix = wordlist::RADIX;
		let id_exp_length_words =
			(id_length_bits + extendable_length_bits + iteration_exp_length_bits) / radix_bits;
		let metadata_length_words = id_exp_length_words + 2 + checksum_length_words;
		let min_mnemonic_length_words =
			metadata_length_words + (f64::from(min_strength_bits) / 10f64).ceil() as u8;

		ShareConfig {
			id_length_bits,
			extendable_length_bits,
			iteration_exp_length_bits,
			radix,
			radix_bits,
			id_exp_length_words,
			checksum_length_words,
			metadata_length_words,
			min_mnemonic_length_words,
			min_strength_bits,
		}
	}
}

impl ShareConfig {
	/// Just use defaults for now
	pub fn new() -> Self {
		ShareConfig {
			..Default::default()
		}
	}
}

/// Main definition of a share and its mnemonic serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
	/// Random 15 bit value which is the same for all shares and is used to
	/// verify that the shares belong together; it is also part of the salt
	/// in the encryption of the master secret. (15 bits)
	pub identifier: u16,
	/// Selects the customization strings of both the checksum and the
	/// encryption salt, so that a scheme can later be extended with new
	/// members without colliding with non-extendable splits. (1 bit)
	pub extendable: bool,
	/// Indicates the total number of iterations to be used in PBKDF2. The
	/// number of iterations is calculated as 10000x2^e. (4 bits)
	pub iteration_exponent: u8,
	/// The x value of the group share (4 bits)
	pub group_index: u8,
	/// indicates how many group shares are needed to reconstruct the master
	/// secret. The actual value is encoded as Gt = GT - 1, so a value of 0
	/// indicates that a single group share is needed (GT = 1), a value of 1
	/// indicates that two group shares are needed (GT = 2) etc. (4 bits)
	pub group_threshold: u8,
	/// indicates the total number of groups. The actual value is encoded as
	/// g = G - 1 (4 bits)
	pub group_count: u8,
	/// Member index, or x value of the member share in the given group
	/// (4 bits)
	pub member_index: u8,
	/// indicates how many member shares are needed to reconstruct the group
	/// share. The actual value is encoded as t = T - 1. (4 bits)
	pub member_threshold: u8,
	/// corresponds to a list of the SSS part's fk(x) values 1 <= k <= n.
	/// Each fk(x) value is encoded as a string of eight bits in big-endian
	/// order. The concatenation of these bit strings is the share value.
	/// This value is left-padded with "0" bits so that the length of the
	/// padded share value in bits becomes the nearest multiple of 10.
	/// (padding + 8n bits)
	pub share_value: Vec<u8>,
	/// configuration values
	pub config: ShareConfig,
}

impl Default for Share {
	fn default() -> Self {
		Share {
			identifier: 0,
			extendable: false,
			iteration_exponent: 0,
			group_index: 0,
			group_threshold: 0,
			group_count: 0,
			member_index: 0,
			member_threshold: 0,
			share_value: vec![],
			config: ShareConfig::new(),
		}
	}
}

impl Share {
	/// convenience to create a new share from a mnemonic
	pub fn from_mnemonic(mn: &[String]) -> Result<Self, Error> {
		let mut s = Share::default();
		s.fill_with_mnemonic(mn)?;
		Ok(s)
	}

	/// Convert from a u8 vec
	pub fn from_u8_vec(input: &[u8]) -> Result<Self, Error> {
		let mut s = Share::default();
		let mut bp = BitPacker::new();
		bp.append_vec_u8(input)?;
		bp.normalize(s.config.radix_bits as usize);
		s.parse_bp(&mut bp)?;
		Ok(s)
	}

	// create the packed bit array
	fn pack_bits(&self) -> Result<BitPacker, Error> {
		self.check_fields()?;
		let mut padding_bit_count = self.config.radix_bits
			- (self.share_value.len() * 8 % self.config.radix_bits as usize) as u8;
		if padding_bit_count == self.config.radix_bits {
			padding_bit_count = 0;
		}
		let mut bp = BitPacker::new();

		bp.append_u16(self.identifier, self.config.id_length_bits)?;
		bp.append_u8(
			self.extendable as u8,
			self.config.extendable_length_bits,
		)?;
		bp.append_u8(
			self.iteration_exponent,
			self.config.iteration_exp_length_bits,
		)?;
		bp.append_u8(self.group_index, 4)?;
		bp.append_u8(self.group_threshold - 1, 4)?;
		bp.append_u8(self.group_count - 1, 4)?;
		bp.append_u8(self.member_index, 4)?;
		bp.append_u8(self.member_threshold - 1, 4)?;
		bp.append_padding(padding_bit_count);
		bp.append_vec_u8(&self.share_value)?;

		if bp.len() % self.config.radix_bits as usize != 0 {
			return Err(ErrorKind::InvalidMnemonic(format!(
				"Incorrect share bit length. Must be a multiple of {}, actual length: {}",
				self.config.radix_bits,
				bp.len(),
			)))?;
		}

		// Create checksum
		let mut sum_data: Vec<u32> = vec![];
		for i in (0..bp.len()).step_by(self.config.radix_bits as usize) {
			sum_data.push(bp.get_u32(i, self.config.radix_bits as usize)?);
		}

		let checksum = rs1024::create_checksum(
			rs1024::customization_string(self.extendable),
			&sum_data,
			self.config.checksum_length_words,
		);

		for c in checksum {
			bp.append_u32(c, self.config.radix_bits)?;
		}

		Ok(bp)
	}

	/// Convert share data to a share mnemonic
	pub fn to_mnemonic(&self) -> Result<Vec<String>, Error> {
		let bp = self.pack_bits()?;

		// Read bits as u32 vec
		let mut word_indices: Vec<u32> = vec![];
		for i in (0..bp.len()).step_by(self.config.radix_bits as usize) {
			word_indices.push(bp.get_u32(i, self.config.radix_bits as usize)?);
		}

		let mut retval = Vec::with_capacity(word_indices.len());
		for i in word_indices {
			retval.push(wordlist::word_at(i as u16)?.to_owned());
		}
		Ok(retval)
	}

	/// Convert share data to a u8 vec, the trailing partial byte (if any)
	/// zero-filled
	pub fn to_u8_vec(&self) -> Result<Vec<u8>, Error> {
		let mut bp = self.pack_bits()?;
		let trailing = (8 - bp.len() % 8) % 8;
		bp.append_padding(trailing as u8);

		bp.get_vec_u8(0, bp.len() / 8)
	}

	// basic field sanity, so that encoding malformed shares fails loudly
	// instead of wrapping around
	fn check_fields(&self) -> Result<(), Error> {
		if u32::from(self.identifier) >= 1u32 << self.config.id_length_bits {
			return Err(ErrorKind::InvalidInput(format!(
				"Identifier must fit into {} bits",
				self.config.id_length_bits,
			)))?;
		}
		if self.iteration_exponent > 15 {
			return Err(ErrorKind::InvalidInput(
				"Iteration exponent must be between 0 and 15".to_string(),
			))?;
		}
		if self.group_index > 15 || self.member_index > 15 {
			return Err(ErrorKind::InvalidInput(
				"Share indices must be between 0 and 15".to_string(),
			))?;
		}
		for (name, value) in &[
			("group threshold", self.group_threshold),
			("group count", self.group_count),
			("member threshold", self.member_threshold),
		] {
			if *value < 1 || *value > 16 {
				return Err(ErrorKind::InvalidInput(format!(
					"The {} must be between 1 and 16",
					name,
				)))?;
			}
		}
		if self.group_threshold > self.group_count {
			return Err(ErrorKind::InvalidInput(
				"Group threshold must not exceed group count".to_string(),
			))?;
		}
		Ok(())
	}

	// convert mnemonic words back into share data
	fn fill_with_mnemonic(&mut self, mn: &[String]) -> Result<(), Error> {
		if mn.len() < self.config.min_mnemonic_length_words as usize {
			return Err(ErrorKind::InvalidMnemonic(format!(
				"Invalid mnemonic length. The length of each mnemonic must be at least {} words.",
				self.config.min_mnemonic_length_words,
			)))?;
		}
		let mut bp = BitPacker::new();
		for s in mn {
			let index = wordlist::index_of(s)?;
			bp.append_u16(index, self.config.radix_bits)?;
		}
		self.parse_bp(&mut bp)
	}

	fn parse_bp(&mut self, bp: &mut BitPacker) -> Result<(), Error> {
		let mut sum_data: Vec<u32> = vec![];
		for i in (0..bp.len()).step_by(self.config.radix_bits as usize) {
			sum_data.push(bp.get_u32(i, self.config.radix_bits as usize)?);
		}
		if sum_data.len() < self.config.min_mnemonic_length_words as usize {
			return Err(ErrorKind::InvalidMnemonic(format!(
				"Invalid mnemonic length. The length of each mnemonic must be at least {} words.",
				self.config.min_mnemonic_length_words,
			)))?;
		}

		// the extendable flag selects the checksum customization, so peek
		// at it before verifying
		self.extendable = bp.get_u8(self.config.id_length_bits as usize, 1)? == 1;

		rs1024::verify_checksum(rs1024::customization_string(self.extendable), &sum_data)?;

		if (self.config.radix_bits as usize
			* (sum_data.len() - self.config.metadata_length_words as usize))
			% 16 > 8
		{
			return Err(ErrorKind::InvalidPadding)?;
		}

		self.identifier = bp.get_u16(0, self.config.id_length_bits as usize)?;
		let exp_offset =
			(self.config.id_length_bits + self.config.extendable_length_bits) as usize;
		self.iteration_exponent =
			bp.get_u8(exp_offset, self.config.iteration_exp_length_bits as usize)?;
		self.group_index = bp.get_u8(20, 4)?;
		self.group_threshold = bp.get_u8(24, 4)? + 1;
		self.group_count = bp.get_u8(28, 4)? + 1;
		self.member_index = bp.get_u8(32, 4)?;
		self.member_threshold = bp.get_u8(36, 4)? + 1;

		if self.group_count < self.group_threshold {
			return Err(ErrorKind::InvalidMnemonic(
				"Invalid mnemonic. Group threshold cannot be greater than group count.".to_string(),
			))?;
		}

		// remove padding and recover the share value
		bp.split_out(
			40,
			bp.len() - self.config.radix_bits as usize * self.config.checksum_length_words as usize,
		);

		bp.remove_padding(bp.len() % 16)?;

		self.share_value = bp.get_vec_u8(0, bp.len() / 8)?;

		Ok(())
	}
}
