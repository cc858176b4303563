// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! NIP19: bech32-encoded entities
//!
//! Only the bare `npub` and `note` forms are handled.
//!
//! <https://github.com/nostr-protocol/nips/blob/master/19.md>

use core::fmt;

use bech32::primitives::decode::{CheckedHrpstring, CheckedHrpstringError};
use bech32::primitives::hrp;
use bech32::{Bech32, Fe32, Hrp};

use super::nip21;
use crate::event::id::EVENT_ID_SIZE;
use crate::key::PUBLIC_KEY_SIZE;
use crate::{EventId, PublicKey};

/// `npub` prefix
pub const PREFIX_BECH32_PUBLIC_KEY: &str = "npub";
/// `note` prefix
pub const PREFIX_BECH32_NOTE_ID: &str = "note";

const MIN_LENGTH: usize = 8;
const MAX_LENGTH: usize = 90;
const WITNESS_VERSION: u8 = 0;
const PAYLOAD_SIZE: usize = 32;

/// Built-in vector used by [`self_check`]
const SELF_CHECK_HEX: &str = "82341f882b6eabcd2ba7f1ef90aad961cf074af15b9ef44a09f9d2a8fbfbe6a2";

/// `NIP19` error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bech32 parsing error (case, separator, charset, checksum)
    Bech32(CheckedHrpstringError),
    /// Bech32 encoding error
    Encode(bech32::EncodeError),
    /// Invalid prefix
    Hrp(hrp::Error),
    /// Total length outside of `8..=90`
    InvalidLength(usize),
    /// Char outside of the bech32 charset
    InvalidChar(char),
    /// Non-zero padding bits, or too many of them
    InvalidPadding,
    /// Leading byte is not the zero witness version
    InvalidWitnessVersion(u8),
    /// Payload is not 32 bytes
    InvalidDataLength(usize),
    /// Prefix doesn't match the requested entity
    WrongPrefix {
        /// Expected prefix
        expected: &'static str,
        /// Found prefix
        found: String,
    },
    /// Prefix is not `npub` or `note`
    UnknownPrefix(String),
    /// Round trip of the built-in vector failed
    SelfCheck(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bech32(e) => write!(f, "{e}"),
            Self::Encode(e) => write!(f, "{e}"),
            Self::Hrp(e) => write!(f, "{e}"),
            Self::InvalidLength(len) => write!(f, "Invalid length: {len}"),
            Self::InvalidChar(c) => write!(f, "Invalid char: {c:?}"),
            Self::InvalidPadding => write!(f, "Invalid padding"),
            Self::InvalidWitnessVersion(v) => write!(f, "Invalid witness version: {v}"),
            Self::InvalidDataLength(len) => write!(f, "Invalid data length: {len} bytes"),
            Self::WrongPrefix { expected, found } => {
                write!(f, "Wrong prefix: expected '{expected}', found '{found}'")
            }
            Self::UnknownPrefix(p) => write!(f, "Unknown prefix: {p}"),
            Self::SelfCheck(e) => write!(f, "Self check failed: {e}"),
        }
    }
}

impl From<CheckedHrpstringError> for Error {
    fn from(e: CheckedHrpstringError) -> Self {
        Self::Bech32(e)
    }
}

impl From<bech32::EncodeError> for Error {
    fn from(e: bech32::EncodeError) -> Self {
        Self::Encode(e)
    }
}

impl From<hrp::Error> for Error {
    fn from(e: hrp::Error) -> Self {
        Self::Hrp(e)
    }
}

/// How strictly [`decode`] treats non-canonical encodings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// Padding bits must be zero and fewer than 5, the payload must be 32 bytes,
    /// optionally preceded by the zero witness version byte.
    #[default]
    Strict,
    /// Padding bits are discarded unchecked and a leading zero byte is dropped when present.
    Lenient,
}

/// A decoded `npub` or `note` reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nip19 {
    /// npub
    Pubkey(PublicKey),
    /// note
    EventId(EventId),
}

impl Nip19 {
    /// Reference type (`npub` or `note`)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pubkey(..) => PREFIX_BECH32_PUBLIC_KEY,
            Self::EventId(..) => PREFIX_BECH32_NOTE_ID,
        }
    }

    /// Lowercase hex of the referenced key or event id
    pub fn hex(&self) -> String {
        match self {
            Self::Pubkey(public_key) => public_key.to_hex(),
            Self::EventId(id) => id.to_hex(),
        }
    }
}

/// Decode from bech32
pub trait FromBech32: Sized {
    /// Error
    type Err;

    /// Decode from bech32 string (strict mode)
    fn from_bech32<S>(bech32: S) -> Result<Self, Self::Err>
    where
        S: AsRef<str>;
}

/// Encode to bech32
pub trait ToBech32 {
    /// Error
    type Err;

    /// Encode as bech32 string
    fn to_bech32(&self) -> Result<String, Self::Err>;
}

impl FromBech32 for PublicKey {
    type Err = Error;

    fn from_bech32<S>(public_key: S) -> Result<Self, Self::Err>
    where
        S: AsRef<str>,
    {
        let bytes = decode_with_prefix(public_key.as_ref(), PREFIX_BECH32_PUBLIC_KEY)?;
        Ok(Self::from_byte_array(bytes))
    }
}

impl ToBech32 for PublicKey {
    type Err = Error;

    fn to_bech32(&self) -> Result<String, Self::Err> {
        encode(PREFIX_BECH32_PUBLIC_KEY, self.as_bytes())
    }
}

impl FromBech32 for EventId {
    type Err = Error;

    fn from_bech32<S>(id: S) -> Result<Self, Self::Err>
    where
        S: AsRef<str>,
    {
        let bytes = decode_with_prefix(id.as_ref(), PREFIX_BECH32_NOTE_ID)?;
        Ok(Self::from_byte_array(bytes))
    }
}

impl ToBech32 for EventId {
    type Err = Error;

    fn to_bech32(&self) -> Result<String, Self::Err> {
        encode(PREFIX_BECH32_NOTE_ID, self.as_bytes())
    }
}

/// Encode 32 bytes as `<prefix>1<data><checksum>`
///
/// A zero witness version byte is prepended before regrouping into 5-bit symbols.
pub fn encode(prefix: &str, bytes: &[u8; PAYLOAD_SIZE]) -> Result<String, Error> {
    let hrp: Hrp = Hrp::parse(prefix)?;

    let mut payload: Vec<u8> = Vec::with_capacity(PAYLOAD_SIZE + 1);
    payload.push(WITNESS_VERSION);
    payload.extend_from_slice(bytes);

    let encoded: String = bech32::encode::<Bech32>(hrp, &payload)?;

    if encoded.len() > MAX_LENGTH {
        return Err(Error::InvalidLength(encoded.len()));
    }

    Ok(encoded)
}

/// Decode a bech32 string into its (lowercase) prefix and payload bytes
pub fn decode(text: &str, mode: DecodeMode) -> Result<(String, Vec<u8>), Error> {
    let len: usize = text.len();
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&len) {
        return Err(Error::InvalidLength(len));
    }

    let checked: CheckedHrpstring = CheckedHrpstring::new::<Bech32>(text)?;

    let symbols: Vec<u8> = checked
        .data_part_ascii_no_checksum()
        .iter()
        .map(|b| {
            let c: char = char::from(*b);
            Fe32::from_char(c)
                .map(Fe32::to_u8)
                .map_err(|_| Error::InvalidChar(c))
        })
        .collect::<Result<_, _>>()?;

    let bytes: Vec<u8> = match mode {
        DecodeMode::Strict => strip_witness_strict(regroup_strict(&symbols)?)?,
        DecodeMode::Lenient => strip_witness_lenient(regroup_lenient(&symbols)),
    };

    Ok((checked.hrp().to_lowercase(), bytes))
}

fn strip_witness_strict(mut bytes: Vec<u8>) -> Result<Vec<u8>, Error> {
    match bytes.len() {
        PAYLOAD_SIZE => Ok(bytes),
        len if len == PAYLOAD_SIZE + 1 => {
            if bytes[0] != WITNESS_VERSION {
                return Err(Error::InvalidWitnessVersion(bytes[0]));
            }
            bytes.remove(0);
            Ok(bytes)
        }
        len => Err(Error::InvalidDataLength(len)),
    }
}

fn strip_witness_lenient(mut bytes: Vec<u8>) -> Vec<u8> {
    // A 32 bytes payload may legitimately start with zero
    if bytes.len() > PAYLOAD_SIZE && bytes.first() == Some(&WITNESS_VERSION) {
        bytes.remove(0);
    }
    bytes
}

fn decode_with_prefix(text: &str, expected: &'static str) -> Result<[u8; PAYLOAD_SIZE], Error> {
    let (hrp, bytes) = decode(text, DecodeMode::Strict)?;

    if hrp != expected {
        return Err(Error::WrongPrefix {
            expected,
            found: hrp,
        });
    }

    bytes
        .as_slice()
        .try_into()
        .map_err(|_| Error::InvalidDataLength(bytes.len()))
}

/// Normalize a public key to hex
///
/// `npub1…` (optionally as `nostr:` URI) is decoded and hex-encoded.
/// Any other input is returned unchanged.
pub fn normalize_key(input: &str) -> Result<String, Error> {
    let candidate: &str = nip21::strip_prefix(input);

    let is_npub: bool = candidate
        .get(..PREFIX_BECH32_PUBLIC_KEY.len() + 1)
        .map(|p| p.eq_ignore_ascii_case("npub1"))
        .unwrap_or(false);

    if is_npub {
        let public_key = PublicKey::from_bech32(candidate)?;
        Ok(format!("{:0>64}", public_key.to_hex()))
    } else {
        Ok(input.to_string())
    }
}

/// Check if input is a valid public key, in hex or `npub` form
pub fn validate_pubkey(input: &str) -> bool {
    match normalize_key(input) {
        Ok(hex) => hex.len() == PUBLIC_KEY_SIZE * 2 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        Err(..) => false,
    }
}

/// Decode a `npub` or `note` reference (optionally as `nostr:` URI)
pub fn decode_reference(identifier: &str) -> Result<Nip19, Error> {
    let identifier: &str = nip21::strip_prefix(identifier.trim());
    let (hrp, bytes) = decode(identifier, DecodeMode::Strict)?;

    match hrp.as_str() {
        PREFIX_BECH32_PUBLIC_KEY => {
            let bytes: [u8; PUBLIC_KEY_SIZE] = bytes
                .as_slice()
                .try_into()
                .map_err(|_| Error::InvalidDataLength(bytes.len()))?;
            Ok(Nip19::Pubkey(PublicKey::from_byte_array(bytes)))
        }
        PREFIX_BECH32_NOTE_ID => {
            let bytes: [u8; EVENT_ID_SIZE] = bytes
                .as_slice()
                .try_into()
                .map_err(|_| Error::InvalidDataLength(bytes.len()))?;
            Ok(Nip19::EventId(EventId::from_byte_array(bytes)))
        }
        _ => Err(Error::UnknownPrefix(hrp)),
    }
}

/// Round trip the built-in vector through `npub` and `note`
pub fn self_check() -> Result<(), Error> {
    let public_key =
        PublicKey::from_hex(SELF_CHECK_HEX).map_err(|e| Error::SelfCheck(e.to_string()))?;
    let npub: String = public_key.to_bech32()?;
    if PublicKey::from_bech32(&npub)? != public_key {
        return Err(Error::SelfCheck(format!("{npub} doesn't decode to {SELF_CHECK_HEX}")));
    }

    let id = EventId::from_byte_array(public_key.to_bytes());
    let note: String = id.to_bech32()?;
    if EventId::from_bech32(&note)? != id {
        return Err(Error::SelfCheck(format!("{note} doesn't decode to {SELF_CHECK_HEX}")));
    }

    Ok(())
}

/// Regroup 5-bit symbols into bytes, MSB first
///
/// Returns the bytes and the leftover `(value, bits)`.
fn regroup(symbols: &[u8]) -> (Vec<u8>, u32, u32) {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut out: Vec<u8> = Vec::with_capacity(symbols.len() * 5 / 8);

    for symbol in symbols {
        acc = ((acc << 5) | u32::from(*symbol)) & 0xfff;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push(((acc >> bits) & 0xff) as u8);
        }
    }

    (out, acc & ((1 << bits) - 1), bits)
}

/// Padding must be zero and shorter than 5 bits
fn regroup_strict(symbols: &[u8]) -> Result<Vec<u8>, Error> {
    match regroup(symbols) {
        (bytes, 0, bits) if bits < 5 => Ok(bytes),
        _ => Err(Error::InvalidPadding),
    }
}

#[inline]
fn regroup_lenient(symbols: &[u8]) -> Vec<u8> {
    regroup(symbols).0
}
