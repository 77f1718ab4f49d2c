//! Content-addressed short code generation.
//!
//! A code is a prefix of the SHA-256 digest of the URL bytes, rendered as
//! URL-safe base64 without padding (`A-Z a-z 0-9 - _`, 6 bits per character).
//! The same URL always yields the same code, so no counter or sequence has to
//! be shared between instances.
//!
//! # Collisions
//!
//! Truncation trades length for collision risk. With the default 8 characters
//! (48 bits) the birthday bound gives roughly:
//!
//! | records | P(any collision) |
//! |---------|------------------|
//! | 100 000 | 1.8e-5 |
//! | 1 000 000 | 1.8e-3 |
//! | 10 000 000 | 0.16 |
//!
//! When a code is already taken by a different URL, the create flow walks
//! [`CodeGenerator::candidates`]: longer prefixes of the same digest. The
//! sequence depends only on the URL, so resubmissions land on the same code.

use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Default code length in characters.
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Default upper bound for collision extension.
pub const DEFAULT_MAX_CODE_LENGTH: usize = 12;

/// Length of a full SHA-256 digest in unpadded base64.
pub const DIGEST_CODE_LENGTH: usize = 43;

/// Shortest code the generator will produce.
pub const MIN_CODE_LENGTH: usize = 4;

const BITS_PER_CHAR: u32 = 6;

/// Derives short codes from URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeGenerator {
    length: usize,
    max_length: usize,
}

impl CodeGenerator {
    /// Creates a generator producing `length`-character codes, extendable up
    /// to `max_length` on collision.
    ///
    /// Both bounds are clamped to `MIN_CODE_LENGTH..=DIGEST_CODE_LENGTH` and
    /// `max_length` is raised to `length` if smaller.
    pub fn new(length: usize, max_length: usize) -> Self {
        let length = length.clamp(MIN_CODE_LENGTH, DIGEST_CODE_LENGTH);
        let max_length = max_length.clamp(length, DIGEST_CODE_LENGTH);
        Self { length, max_length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Returns the primary short code for `url`.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let generator = CodeGenerator::default();
    /// assert_eq!(generator.generate("https://example.com/very/long/path"), "HkTRTCTy");
    /// ```
    pub fn generate(&self, url: &str) -> String {
        let mut digest = encoded_digest(url);
        digest.truncate(self.length);
        digest
    }

    /// Returns the candidate sequence for `url`: prefixes of the digest from
    /// `length` to `max_length` characters, shortest first.
    pub fn candidates(&self, url: &str) -> impl Iterator<Item = String> + use<> {
        let digest = encoded_digest(url);
        (self.length..=self.max_length).map(move |n| digest[..n].to_string())
    }

    /// Returns true if `id` could have been produced by a generator of any
    /// configured length.
    ///
    /// Stored ids outlive the `length` / `max_length` they were created with,
    /// so only the absolute bounds and the alphabet are checked.
    pub fn is_well_formed(&self, id: &str) -> bool {
        (MIN_CODE_LENGTH..=DIGEST_CODE_LENGTH).contains(&id.len())
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH, DEFAULT_MAX_CODE_LENGTH)
    }
}

fn encoded_digest(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest)
}

/// Birthday-bound probability that at least two of `records` URLs share a
/// code of `code_length` characters.
pub fn collision_probability(records: u64, code_length: usize) -> f64 {
    let space = 2f64.powi((code_length as u32 * BITS_PER_CHAR) as i32);
    let n = records as f64;
    let exponent = -(n * (n - 1.0)) / (2.0 * space);
    -exponent.exp_m1()
}
