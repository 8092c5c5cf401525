//! Boundary conversion between UTF-8 bytes and the wide string used by the
//! PDF library.
//!
//! Host-side text arrives as UTF-8. The library stores text (titles,
//! metadata, annotation contents, extracted page text) as UTF-16 code units.
//! [`to_internal`] and [`to_external`] move a value across that boundary
//! without loss: for every sequence of Unicode scalar values the two are
//! exact inverses.
//!
//! Malformed UTF-8 is rejected with [`QuireError::Encoding`]. Nothing is
//! truncated and nothing is replaced with U+FFFD.

use std::fmt;
use std::str::FromStr;

use crate::error::{QuireError, Result};

/// Text in the PDF library's internal representation.
///
/// A sequence of UTF-16 code units. Every constructor validates its input,
/// so a `UString` never holds an unpaired surrogate and converting it back
/// to UTF-8 cannot fail.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UString {
    units: Vec<u16>,
}

/// Convert UTF-8 bytes to the internal wide string.
///
/// Fails with [`QuireError::Encoding`] if `external` is not well-formed UTF-8.
pub fn to_internal(external: &[u8]) -> Result<UString> {
    UString::from_utf8(external)
}

/// Convert an internal wide string to UTF-8 bytes.
pub fn to_external(internal: &UString) -> Vec<u8> {
    internal.to_utf8()
}

impl UString {
    /// An empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode UTF-8 bytes.
    pub fn from_utf8(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|err| {
            tracing::debug!(
                valid_up_to = err.valid_up_to(),
                error_len = ?err.error_len(),
                "rejecting malformed utf-8"
            );
            QuireError::from(err)
        })?;
        Ok(Self::from(text))
    }

    /// Decode ISO-8859-1 bytes. Every byte is a scalar value, so this
    /// cannot fail.
    pub fn from_latin1(bytes: &[u8]) -> Self {
        Self {
            units: bytes.iter().map(|&b| u16::from(b)).collect(),
        }
    }

    /// Build from raw UTF-16 code units, checking surrogate pairing.
    pub fn from_utf16(units: &[u16]) -> Result<Self> {
        let mut index = 0;
        for decoded in char::decode_utf16(units.iter().copied()) {
            match decoded {
                Ok(ch) => index += ch.len_utf16(),
                Err(err) => {
                    let unit = err.unpaired_surrogate();
                    tracing::debug!(unit, index, "rejecting unpaired surrogate");
                    return Err(QuireError::UnpairedSurrogate { unit, index });
                }
            }
        }
        Ok(Self {
            units: units.to_vec(),
        })
    }

    /// Encode as UTF-8 bytes.
    pub fn to_utf8(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Encode as ISO-8859-1.
    ///
    /// Fails with [`QuireError::NotLatin1`] at the first scalar above U+00FF;
    /// `index` counts scalars, not code units.
    pub fn to_latin1(&self) -> Result<Vec<u8>> {
        self.chars()
            .enumerate()
            .map(|(index, ch)| {
                u8::try_from(u32::from(ch)).map_err(|_| QuireError::NotLatin1 { ch, index })
            })
            .collect()
    }

    /// The UTF-16 code units.
    pub fn as_units(&self) -> &[u16] {
        &self.units
    }

    pub fn into_units(self) -> Vec<u16> {
        self.units
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterate over the scalar values.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        // Units are validated on construction; the fallback is unreachable.
        char::decode_utf16(self.units.iter().copied())
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    /// Number of scalar values (surrogate pairs count once).
    pub fn char_count(&self) -> usize {
        self.chars().count()
    }
}

impl fmt::Display for UString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for ch in self.chars() {
            f.write_char(ch)?;
        }
        Ok(())
    }
}

impl fmt::Debug for UString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UString({:?})", self.to_string())
    }
}

impl From<&str> for UString {
    fn from(s: &str) -> Self {
        Self {
            units: s.encode_utf16().collect(),
        }
    }
}

impl From<String> for UString {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<&UString> for String {
    fn from(s: &UString) -> Self {
        s.to_string()
    }
}

impl FromStr for UString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl PartialEq<str> for UString {
    fn eq(&self, other: &str) -> bool {
        self.units.iter().copied().eq(other.encode_utf16())
    }
}

impl PartialEq<&str> for UString {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for UString {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UString {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}
