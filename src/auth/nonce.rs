//! CSRF nonce pair carried through the verification redirect.

// crates.io
use rand::{Rng, distr::Alphanumeric};
use subtle::ConstantTimeEq;
// self
use crate::_prelude::*;

const NONCE_LEN: usize = 24;

/// Nonces bound to the generic verify action (`kr_nonce`) and the service-specific one
/// (`nonce`).
///
/// A pair is generated per connector and is only meaningful for one redirect cycle.
#[derive(Clone, PartialEq, Eq)]
pub struct NoncePair {
	kr_nonce: String,
	nonce: String,
}
impl NoncePair {
	/// Generates a fresh random pair.
	pub fn generate() -> Self {
		Self { kr_nonce: random_nonce(), nonce: random_nonce() }
	}

	/// Rebuilds a pair from known values.
	pub fn from_parts(kr_nonce: impl Into<String>, nonce: impl Into<String>) -> Self {
		Self { kr_nonce: kr_nonce.into(), nonce: nonce.into() }
	}

	/// Nonce for the generic verify action.
	pub fn kr_nonce(&self) -> &str {
		&self.kr_nonce
	}

	/// Nonce for the service-specific verify action.
	pub fn nonce(&self) -> &str {
		&self.nonce
	}

	/// Checks values echoed back by the host; missing values never match.
	pub fn verify(&self, kr_nonce: Option<&str>, nonce: Option<&str>) -> bool {
		match (kr_nonce, nonce) {
			(Some(kr_nonce), Some(nonce)) => {
				let kr_match = self.kr_nonce.as_bytes().ct_eq(kr_nonce.as_bytes());
				let nonce_match = self.nonce.as_bytes().ct_eq(nonce.as_bytes());

				(kr_match & nonce_match).into()
			},
			_ => false,
		}
	}
}
impl Debug for NoncePair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("NoncePair(..)")
	}
}

fn random_nonce() -> String {
	rand::rng().sample_iter(&Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}
