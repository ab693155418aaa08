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

//! Master secret encryption: a four-round Feistel cipher whose round
//! function is PBKDF2-HMAC-SHA256 keyed by the passphrase. No
//! authentication happens at this layer; a wrong passphrase decrypts to a
//! different, equally plausible master secret.

use crate::error::{Error, ErrorKind};

use zeroize::Zeroize;

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

/// Config Struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterSecretEncConfig {
	/// Total PBKDF2 iterations across all rounds at iteration exponent 0;
	/// the count doubles with each exponent step
	pub base_iteration_count: u32,
	/// The number of rounds in the Feistel cipher
	pub round_count: u8,
	/// The customization string mixed into the PBKDF2 salt of
	/// non-extendable shares
	pub customization_string: Vec<u8>,
}

impl Default for MasterSecretEncConfig {
	fn default() -> Self {
		let base_iteration_count = 10000;
		let round_count = 4;
		let customization_string = b"shamir".to_vec();

		MasterSecretEncConfig {
			base_iteration_count,
			round_count,
			customization_string,
		}
	}
}

impl MasterSecretEncConfig {
	/// Just use defaults for now
	pub fn new() -> Self {
		MasterSecretEncConfig {
			..Default::default()
		}
	}
}

/// Struct, so that config values are held
pub struct MasterSecretEnc {
	pub config: MasterSecretEncConfig,
}

impl Default for MasterSecretEnc {
	fn default() -> Self {
		MasterSecretEnc {
			config: MasterSecretEncConfig::new(),
		}
	}
}

impl MasterSecretEnc {
	/// Create a new encoder with all defaults
	pub fn new() -> MasterSecretEnc {
		MasterSecretEnc {
			config: MasterSecretEncConfig::new(),
		}
	}

	pub fn encrypt(
		&self,
		master_secret: &[u8],
		passphrase: &str,
		iteration_exponent: u8,
		identifier: u16,
		extendable: bool,
	) -> Result<Vec<u8>, Error> {
		self.check_inputs(master_secret, passphrase, iteration_exponent)?;
		let rounds: Vec<u8> = (0..self.config.round_count).collect();
		self.feistel(
			master_secret,
			passphrase,
			iteration_exponent,
			identifier,
			extendable,
			&rounds,
		)
	}

	pub fn decrypt(
		&self,
		enc_master_secret: &[u8],
		passphrase: &str,
		iteration_exponent: u8,
		identifier: u16,
		extendable: bool,
	) -> Result<Vec<u8>, Error> {
		self.check_inputs(enc_master_secret, passphrase, iteration_exponent)?;
		let rounds: Vec<u8> = (0..self.config.round_count).rev().collect();
		self.feistel(
			enc_master_secret,
			passphrase,
			iteration_exponent,
			identifier,
			extendable,
			&rounds,
		)
	}

	fn check_inputs(
		&self,
		secret: &[u8],
		passphrase: &str,
		iteration_exponent: u8,
	) -> Result<(), Error> {
		if secret.len() % 2 != 0 {
			return Err(ErrorKind::InvalidInput(
				"The length of the secret in bytes must be an even number".to_string(),
			))?;
		}
		if iteration_exponent > 15 {
			return Err(ErrorKind::InvalidInput(format!(
				"Iteration exponent must be between 0 and 15, got {}",
				iteration_exponent,
			)))?;
		}
		if !passphrase.bytes().all(|b| (32..=126).contains(&b)) {
			return Err(ErrorKind::InvalidInput(
				"The passphrase must contain only printable ASCII characters".to_string(),
			))?;
		}
		Ok(())
	}

	// run the round sequence; encryption and decryption differ only in the
	// order of the round indices
	fn feistel(
		&self,
		input: &[u8],
		passphrase: &str,
		iteration_exponent: u8,
		identifier: u16,
		extendable: bool,
		round_indices: &[u8],
	) -> Result<Vec<u8>, Error> {
		let mut l = input[..input.len() / 2].to_vec();
		let mut r = input[input.len() / 2..].to_vec();
		let salt = self.get_salt(identifier, extendable);
		for i in round_indices {
			let mut f = self.round_function(*i, passphrase, iteration_exponent, &salt, &r);
			let next_r = self.xor(&l, &f);
			f.zeroize();
			let mut prev_l = std::mem::replace(&mut l, std::mem::replace(&mut r, next_r));
			prev_l.zeroize();
		}
		let mut retval = r;
		retval.append(&mut l);
		Ok(retval)
	}

	fn get_salt(&self, identifier: u16, extendable: bool) -> Vec<u8> {
		let mut retval = if extendable {
			vec![]
		} else {
			self.config.customization_string.clone()
		};
		retval.extend_from_slice(&identifier.to_be_bytes());
		retval
	}

	/// the round function used internally by the Feistel cipher
	fn round_function(&self, i: u8, passphrase: &str, e: u8, salt: &[u8], r: &[u8]) -> Vec<u8> {
		let iterations =
			(self.config.base_iteration_count << u32::from(e)) / u32::from(self.config.round_count);
		let out_length = r.len();
		let mut salt = salt.to_vec();
		salt.extend_from_slice(r);
		let mut password = vec![i];
		password.extend_from_slice(passphrase.as_bytes());
		let out = self.pbkdf2_derive(iterations, &salt, &password, out_length);
		password.zeroize();
		salt.zeroize();
		out
	}

	#[cfg(feature = "rust_crypto_pbkdf2")]
	fn pbkdf2_derive(
		&self,
		iterations: u32,
		salt: &[u8],
		password: &[u8],
		out_length: usize,
	) -> Vec<u8> {
		let mut out = vec![0; out_length];
		pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut out)
			.expect("HMAC can take a key of any size");
		out
	}

	// Ring implementation of the key derivation
	#[cfg(feature = "ring_pbkdf2")]
	fn pbkdf2_derive(
		&self,
		iterations: u32,
		salt: &[u8],
		password: &[u8],
		out_length: usize,
	) -> Vec<u8> {
		let mut out = vec![0; out_length];
		pbkdf2::derive(
			pbkdf2::PBKDF2_HMAC_SHA256,
			NonZeroU32::new(iterations).expect("iteration count is never zero"),
			salt,
			password,
			&mut out,
		);
		out
	}

	// xor values in both arrays, up to length of b
	fn xor(&self, a: &[u8], b: &[u8]) -> Vec<u8> {
		let mut retval = vec![0; b.len()];
		for i in 0..b.len() {
			retval[i] = a[i] ^ b[i];
		}
		retval
	}
}
