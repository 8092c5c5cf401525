//! Enumerations published by the PDF library.
//!
//! Discriminants are the library's integer values and must not change:
//! hosts store them. Besides the plain tables this module carries the bits
//! of PDF semantics that travel with each enum: the `/P` permission bits,
//! the page box dictionary keys with their default chain, and rotation in
//! degrees.

use std::fmt;
use std::str::FromStr;

use crate::error::{QuireError, Result};

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u8)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[cfg_attr(feature = "serde", serde(rename = $label))]
                $variant = $value,
            )+
        }

        impl $name {
            /// Every variant, in value order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Name under which the host sees this enum.
            pub const KIND: &'static str = $kind;

            /// Exported name of the variant.
            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// The library's integer value.
            pub const fn value(self) -> i64 {
                self as i64
            }

            pub fn from_value(value: i64) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = QuireError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($label => Ok($name::$variant),)+
                    _ => Err(QuireError::UnknownName {
                        kind: $kind,
                        name: s.to_string(),
                    }),
                }
            }
        }
    };
}

named_enum! {
    /// A document access permission.
    Permission, "permission_enum" {
        Print = 0 => "print",
        Change = 1 => "change",
        Copy = 2 => "copy",
        AddNotes = 3 => "add_notes",
        FillForms = 4 => "fill_forms",
        Accessibility = 5 => "accessibility",
        Assemble = 6 => "assemble",
        PrintHighResolution = 7 => "print_high_resolution",
    }
}

named_enum! {
    /// One of the five page boundaries.
    PageBox, "page_box_enum" {
        MediaBox = 0 => "media_box",
        CropBox = 1 => "crop_box",
        BleedBox = 2 => "bleed_box",
        TrimBox = 3 => "trim_box",
        ArtBox = 4 => "art_box",
    }
}

named_enum! {
    /// Page rotation, clockwise.
    Rotation, "rotation_enum" {
        Rotate0 = 0 => "rotate_0",
        Rotate90 = 1 => "rotate_90",
        Rotate180 = 2 => "rotate_180",
        Rotate270 = 3 => "rotate_270",
    }
}

impl Permission {
    /// 1-based bit of the `/P` entry in the encryption dictionary that
    /// grants this permission.
    pub const fn p_bit(self) -> u32 {
        match self {
            Permission::Print => 3,
            Permission::Change => 4,
            Permission::Copy => 5,
            Permission::AddNotes => 6,
            Permission::FillForms => 9,
            Permission::Accessibility => 10,
            Permission::Assemble => 11,
            Permission::PrintHighResolution => 12,
        }
    }

    const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// `/P` bits that must be 1: 7, 8 and 13 through 32.
const P_RESERVED_ONES: u32 = 0xFFFF_F0C0;

/// A set of [`Permission`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Permissions(u8);

impl Permissions {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(u8::MAX)
    }

    /// Decode the signed 32-bit `/P` value of an encryption dictionary.
    pub fn from_p_value(p: i32) -> Self {
        let bits = p as u32;
        let mut set = Self::empty();
        for &perm in Permission::ALL {
            if bits & (1 << (perm.p_bit() - 1)) != 0 {
                set.insert(perm);
            }
        }
        set
    }

    /// Encode as a `/P` value, with reserved bits set as the format requires.
    pub fn to_p_value(self) -> i32 {
        let bits = self
            .iter()
            .fold(P_RESERVED_ONES, |acc, perm| acc | 1 << (perm.p_bit() - 1));
        bits as i32
    }

    pub fn allows(self, perm: Permission) -> bool {
        self.0 & perm.mask() != 0
    }

    pub fn insert(&mut self, perm: Permission) {
        self.0 |= perm.mask();
    }

    pub fn remove(&mut self, perm: Permission) {
        self.0 &= !perm.mask();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Permission> {
        Permission::ALL
            .iter()
            .copied()
            .filter(move |&perm| self.allows(perm))
    }
}

impl FromIterator<Permission> for Permissions {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut set = Self::empty();
        for perm in iter {
            set.insert(perm);
        }
        set
    }
}

impl PageBox {
    /// Key of this box in a page dictionary.
    pub const fn pdf_key(self) -> &'static str {
        match self {
            PageBox::MediaBox => "MediaBox",
            PageBox::CropBox => "CropBox",
            PageBox::BleedBox => "BleedBox",
            PageBox::TrimBox => "TrimBox",
            PageBox::ArtBox => "ArtBox",
        }
    }

    /// Box whose value applies when this one is absent from the page.
    ///
    /// The media box is required and has no fallback.
    pub const fn fallback(self) -> Option<PageBox> {
        match self {
            PageBox::MediaBox => None,
            PageBox::CropBox => Some(PageBox::MediaBox),
            PageBox::BleedBox | PageBox::TrimBox | PageBox::ArtBox => Some(PageBox::CropBox),
        }
    }

    pub fn from_pdf_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.pdf_key() == key)
    }
}

impl Rotation {
    pub const fn degrees(self) -> i64 {
        self as i64 * 90
    }

    /// Normalise a `/Rotate` value. Negative and out-of-range multiples of
    /// 90 wrap around; anything else is rejected.
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(QuireError::InvalidRotation(degrees));
        }
        let quarter = (degrees / 90).rem_euclid(4);
        Self::from_value(quarter).ok_or(QuireError::InvalidRotation(degrees))
    }

    /// Apply `other` after `self`.
    pub fn compose(self, other: Rotation) -> Rotation {
        Self::from_value((self.value() + other.value()) % 4).unwrap_or(Rotation::Rotate0)
    }
}
