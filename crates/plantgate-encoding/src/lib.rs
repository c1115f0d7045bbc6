//! PlantUML text encoding for engine request URLs.
//!
//! The rendering engine accepts diagram source embedded directly in the
//! request path as a compact URL-safe token. The token format is fixed by the
//! engine's decoder:
//!
//! 1. the UTF-8 source bytes are compressed as a raw DEFLATE stream (a zlib
//!    stream minus its 2-byte header and 4-byte Adler checksum),
//! 2. the compressed bytes are base64-encoded with the engine's own
//!    64-symbol alphabet (`0-9 A-Z a-z - _`, no padding),
//! 3. a single request-type character is prepended to select the engine's
//!    compressed decode path.
//!
//! [`encode`] and [`decode`] are exact inverses: `decode(encode(s)) == s`
//! for every UTF-8 string. Production traffic only needs `encode`; `decode`
//! exists for symmetry and testing. Both are pure functions with no I/O.

use std::io::Write;
use std::sync::LazyLock;

use base64::Engine;
use base64::alphabet::Alphabet;
use base64::engine::{GeneralPurpose, general_purpose};
use flate2::Compression;
use flate2::write::{DeflateDecoder, DeflateEncoder};

/// The engine's 64-symbol token alphabet, mapped positionally from the
/// standard base64 alphabet. Every symbol is URL-path-safe; no symbol
/// requires percent-escaping.
pub const TOKEN_ALPHABET: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";

/// Request-type prefix selecting the engine's compressed decode path.
pub const DEFLATE_PREFIX: char = '1';

/// Request-type prefix for raw hex-encoded source. Accepted by the engine
/// but never produced by this encoder.
pub const HEX_PREFIX: char = 'h';

/// Reserved request-type prefix.
pub const RESERVED_PREFIX: char = '0';

static TOKEN_ENGINE: LazyLock<GeneralPurpose> = LazyLock::new(|| {
    let alphabet = Alphabet::new(TOKEN_ALPHABET).unwrap();
    GeneralPurpose::new(&alphabet, general_purpose::NO_PAD)
});

/// Error while encoding diagram source into a token.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// DEFLATE compression failed.
    #[error("compression failed: {0}")]
    Compression(#[from] std::io::Error),
}

/// Error while decoding a token back to diagram source.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The token does not start with the compressed-path prefix. The hex
    /// (`'h'`) and reserved (`'0'`) request types are part of the engine
    /// protocol but are not handled here.
    #[error("unsupported token prefix {prefix:?}: only the compressed request type is handled")]
    UnsupportedPrefix {
        /// The prefix character found, or None for an empty token.
        prefix: Option<char>,
    },
    /// The token payload is not valid engine base64.
    #[error("token is not valid engine base64: {0}")]
    Alphabet(#[from] base64::DecodeError),
    /// The compressed payload is not a valid DEFLATE stream.
    #[error("decompression failed: {0}")]
    Decompression(#[from] std::io::Error),
    /// The decompressed bytes are not UTF-8.
    #[error("decoded source is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Encode diagram source into the engine's URL token format.
///
/// Deterministic: the same source always yields the same token. The empty
/// string encodes to a non-empty minimal token.
pub fn encode(source: &str) -> Result<String, EncodeError> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(source.as_bytes())?;
    let compressed = encoder.finish()?;

    // Prefix + unpadded base64 expansion of the compressed payload.
    let mut token = String::with_capacity(1 + compressed.len().div_ceil(3) * 4);
    token.push(DEFLATE_PREFIX);
    TOKEN_ENGINE.encode_string(&compressed, &mut token);
    Ok(token)
}

/// Decode an engine URL token back to diagram source.
pub fn decode(token: &str) -> Result<String, DecodeError> {
    let mut chars = token.chars();
    match chars.next() {
        Some(DEFLATE_PREFIX) => {}
        prefix => return Err(DecodeError::UnsupportedPrefix { prefix }),
    }

    let compressed = TOKEN_ENGINE.decode(chars.as_str())?;
    let mut decoder = DeflateDecoder::new(Vec::new());
    decoder.write_all(&compressed)?;
    let bytes = decoder.finish()?;
    Ok(String::from_utf8(bytes)?)
}
