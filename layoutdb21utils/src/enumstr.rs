//!
//! # Enum-String Mapping Module
//!
//! Defines the [enumstr] macro and its paired [EnumStr] trait,
//! mapping fieldless enums to and from fixed string values.
//! Layout databases traffic heavily in such enumerated strings:
//! orientation codes, path end-styles, boundary types, and format keywords
//! all arrive as one of a small set of known names.
//!
//! Example:
//!
//! ```rs
//! use layoutdb21utils::enumstr;
//!
//! enumstr!(
//! /// # Two of the Eight Lattice Orientations
//! Flip {
//!     MirrorX: "MX",
//!     MirrorY: "MY",
//!  }
//! );
//! ```
//!

///
/// # String-Enumeration Trait
///
/// Defines two central methods:
/// * `to_str(&self) -> &'static str` converts the enum to its string value.
/// * `from_str(&str) -> Option<Self>` does the opposite, returning an [Option] indicator of success or failure.
///
/// While [EnumStr] can be implemented by hand, its primary intent is
/// implementation by the [enumstr] macro.
///
pub trait EnumStr: std::marker::Sized {
    fn to_str(&self) -> &'static str;
    fn from_str(txt: &str) -> Option<Self>;
}

///
/// # Enum-String Pairing Macro
///
/// Creates an `enum` which:
/// * (a) Pairs each variant with a string value, as commonly arrive in text-format fields
/// * (b) Implements the [EnumStr] trait for conversions to and from those strings
/// * (c) Implements [std::fmt::Display], writing the string values
///
/// All variants are fieldless, and include derived implementations of common
/// traits, notably including `serde::{Serialize, Deserialize}`.
///
#[macro_export]
macro_rules! enumstr {
    (   $(#[$meta: meta])*
        $enum_name: ident {
        $( $variant: ident : $strval: literal ),* $(,)?
    }) => {
        $(#[$meta])*
        #[allow(dead_code)]
        #[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
        pub enum $enum_name {
            $( #[doc=$strval]
                $variant ),*
        }
        impl EnumStr for $enum_name {
            /// Convert a [$enum_name] variant to its paired (static) string value.
            #[allow(dead_code)]
            fn to_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $strval),*,
                }
            }
            /// Create a [$enum_name] from one of its string values.
            /// Returns `None` if input `txt` does not match one of [$enum_name]'s variants.
            /// Matching is case *sensitive*; re-case outside `from_str` if
            /// case-insensitivity is intended.
            fn from_str(txt: &str) -> Option<Self> {
                match txt {
                    $( $strval => Some(Self::$variant)),*,
                    _ => None,
                }
            }
        }
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                let s = match self {
                    $( Self::$variant => $strval),*,
                };
                write!(f, "{}", s)
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[test]
    fn test_enumstr() {
        enumstr!(
            /// # Path End-Styles
            EndStyle {
                Truncate: "truncate",
                Extend: "extend",
            }
        );

        // Conversion to string
        assert_eq!(EndStyle::Truncate.to_str(), "truncate");
        assert_eq!(EndStyle::Extend.to_str(), "extend");

        // Conversion from string
        assert_eq!(EndStyle::from_str("truncate"), Some(EndStyle::Truncate));
        assert_eq!(EndStyle::from_str("extend"), Some(EndStyle::Extend));
        assert_eq!(EndStyle::from_str("round"), None);

        // Display
        assert_eq!(format!("{}", EndStyle::Extend), "extend");
    }
}
