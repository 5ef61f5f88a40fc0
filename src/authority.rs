//! Payment target types (the URI authority).
//!
//! Every `payto` URI names its payment target type in the authority position:
//! `payto://bic/...`, `payto://upi/...`. This module provides:
//!
//! - The [`Authority`] trait, implemented by zero-sized marker types that
//!   parameterize [`crate::PaymentTarget`]
//! - The [`authority!`](macro@crate::authority) macro that generates those marker types
//! - The [`Bic`] and [`Upi`] markers for the implemented target types
//! - [`known`], the registry of well-known authority names

/// A payment target type, identified by its authority name.
pub trait Authority {
    /// The authority as it appears in the URI host position.
    const NAME: &'static str;
}

/// Creates a marker type for a payment target authority.
///
/// The generated type:
/// - Implements [`Authority`] with the given name
/// - Implements `FromStr` (only accepts the exact name, ASCII case-insensitive)
/// - Implements `Display` and `AsRef<str>` (outputs the name)
///
/// ```
/// use payto_rs::authority::Authority;
///
/// payto_rs::authority!(Iban, payto_rs::authority::known::IBAN);
///
/// assert_eq!(Iban::NAME, "iban");
/// assert_eq!(Iban.to_string(), "iban");
/// assert!("IBAN".parse::<Iban>().is_ok());
/// assert!("bic".parse::<Iban>().is_err());
/// ```
#[macro_export]
macro_rules! authority {
    ($struct_name:ident, $val:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $struct_name;

        impl $crate::authority::Authority for $struct_name {
            const NAME: &'static str = $val;
        }

        impl AsRef<str> for $struct_name {
            fn as_ref(&self) -> &str {
                <Self as $crate::authority::Authority>::NAME
            }
        }

        impl std::str::FromStr for $struct_name {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let name = <Self as $crate::authority::Authority>::NAME;
                if s.eq_ignore_ascii_case(name) {
                    Ok($struct_name)
                } else {
                    Err(format!("expected '{}', got '{}'", name, s))
                }
            }
        }

        impl std::fmt::Display for $struct_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(<Self as $crate::authority::Authority>::NAME)
            }
        }
    };
}

/// Well-known payment target type names.
///
/// Only [`BIC`](known::BIC) and [`UPI`](known::UPI) have target
/// implementations; the others are listed for reference.
pub mod known {
    pub const IBAN: &str = "iban";
    pub const ACH: &str = "ach";
    pub const BIC: &str = "bic";
    pub const UPI: &str = "upi";
    pub const BITCOIN: &str = "bitcoin";
    pub const ILP: &str = "ilp";
    pub const VOID: &str = "void";

    /// All well-known names, in registration order.
    pub const ALL: [&str; 7] = [IBAN, ACH, BIC, UPI, BITCOIN, ILP, VOID];

    /// Returns `true` if `name` is a well-known payment target type.
    pub fn is_known(name: &str) -> bool {
        ALL.iter().any(|known| known.eq_ignore_ascii_case(name))
    }
}

authority!(Bic, known::BIC);
authority!(Upi, known::UPI);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_names() {
        assert_eq!(Bic::NAME, "bic");
        assert_eq!(Upi::NAME, "upi");
        assert_eq!(Bic.to_string(), "bic");
        assert_eq!(Upi.as_ref(), "upi");
    }

    #[test]
    fn test_marker_from_str() {
        assert_eq!("bic".parse::<Bic>(), Ok(Bic));
        assert_eq!("UPI".parse::<Upi>(), Ok(Upi));
        assert!("upi".parse::<Bic>().is_err());
    }

    #[test]
    fn test_known_names() {
        assert!(known::is_known("iban"));
        assert!(known::is_known("Bitcoin"));
        assert!(!known::is_known("swift"));
    }
}
