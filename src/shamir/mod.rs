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

//! Share definition, single-level splitting engine and the two-level
//! group scheme built on top of them

mod scheme;
mod share;
mod splitter;

pub use self::scheme::{
	combine_mnemonics, decode_mnemonic, generate_mnemonics, generate_mnemonics_random,
	generate_mnemonics_with_source, GroupShare,
};
pub use self::share::{Share, ShareConfig};
pub use self::splitter::{Splitter, SplitterConfig};
