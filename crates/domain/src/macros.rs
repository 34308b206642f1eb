//! Macro for implementing Display and FromStr for wire-level enums
//!
//! Job statuses and HTTP methods both travel as plain strings. This macro
//! gives each enum one canonical string form and case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use cronlytic_domain::impl_wire_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Schedule {
//!     Hourly,
//!     Daily,
//! }
//!
//! impl_wire_enum_conversions!(Schedule {
//!     Hourly => "hourly",
//!     Daily => "daily",
//! });
//!
//! assert_eq!("DAILY".parse::<Schedule>().unwrap(), Schedule::Daily);
//! ```

/// Implements `as_str`, Display and FromStr for a fieldless enum.
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their canonical string
///
/// Parsing ignores ASCII case, so `"post"`, `"Post"` and `"POST"` all match a
/// variant mapped to `"POST"`. Display always emits the canonical form.
#[macro_export]
macro_rules! impl_wire_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical wire representation.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
