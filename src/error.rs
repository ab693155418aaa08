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

//! Error types for the shamir39 crate

use failure::{Backtrace, Context, Fail};
use std::env;
use std::fmt::{self, Display};

/// Error definition
#[derive(Debug, Fail)]
pub struct Error {
	inner: Context<ErrorKind>,
}

/// All of the ways a split or combine operation can fail. Each public entry
/// point returns exactly one of these kinds; a wrong passphrase is not an
/// error and silently decrypts to a different master secret.
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	/// An argument outside its documented range (bad thresholds, short or
	/// odd-length master secret, non-printable passphrase, ...)
	#[fail(display = "Invalid Input: {}", _0)]
	InvalidInput(String),

	/// A malformed mnemonic: unknown word, wrong word count or a header
	/// field that cannot be satisfied
	#[fail(display = "Invalid Mnemonic: {}", _0)]
	InvalidMnemonic(String),

	/// RS1024 checksum verification failed
	#[fail(display = "Invalid Checksum: {}", _0)]
	InvalidChecksum(String),

	/// Shares that cannot belong to one split (mixed identifiers, iteration
	/// exponents, extendable flags, group parameters or member thresholds)
	#[fail(display = "Inconsistent Shares: {}", _0)]
	InconsistentShares(String),

	/// Fewer members than a group's threshold, or fewer groups than the
	/// group threshold
	#[fail(display = "Insufficient Shares: {}", _0)]
	InsufficientShares(String),

	/// The digest recovered alongside the shared secret did not match
	/// (corrupt or forged share value)
	#[fail(display = "Invalid Digest: {}", _0)]
	InvalidDigest(String),

	/// Share value padding bits were set, or the padding was over-long
	#[fail(display = "Invalid Padding: all padding bits must be 0")]
	InvalidPadding,
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
