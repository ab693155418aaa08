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

//! Two-level Shamir secret sharing over mnemonic shares (SLIP-0039).
//!
//! A master secret is encrypted with an optional passphrase, split across
//! groups, and each group share is split across members. Any subset of
//! shares satisfying both thresholds recovers the secret; any smaller
//! subset reveals nothing. Shares travel as sequences of words from a
//! fixed 1024-word list, protected by a Reed-Solomon checksum.
//!
//! The library performs no I/O and keeps no state between calls. All
//! randomness flows through the injectable [`EntropySource`].

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

#[macro_use]
extern crate lazy_static;

#[macro_use]
mod field;

pub mod error;
pub mod random;
pub mod shamir;
pub mod util;
pub mod wordlist;

pub use crate::error::{Error, ErrorKind};
pub use crate::random::{EntropySource, SystemEntropy};
pub use crate::shamir::{
	combine_mnemonics, decode_mnemonic, generate_mnemonics, generate_mnemonics_random,
	generate_mnemonics_with_source, GroupShare, Share,
};
pub use crate::util::hex::{from_hex, to_hex};
