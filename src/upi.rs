//! Unified Payment Interface (UPI) payment targets.
//!
//! The path is an account alias. The amount and receiver-name options are
//! mandatory for this payment target.
//!
//! ```text
//! payto://upi/alice@example.com?amount=200&receiver-name=Alice
//! ```

use crate::authority::Upi;
use crate::error::PaytoError;
use crate::target::{PaymentTarget, TargetOption};

/// A `payto://upi/<alias>` payment target.
pub type UpiTarget = PaymentTarget<Upi>;

/// Builds a UPI payment target.
///
/// # Errors
///
/// Returns [`PaytoError::InvalidAmount`] if `amount` is not a number.
///
/// # Example
///
/// ```
/// use payto_rs::new_upi;
///
/// let upi = new_upi("alice@example.com", "Alice", "200", []).unwrap();
/// assert_eq!(upi.url().as_str(), "payto://upi/alice@example.com?amount=200&receiver-name=Alice");
/// ```
pub fn new_upi<P, R, I>(
    account_alias: P,
    receiver: R,
    amount: &str,
    options: I,
) -> Result<UpiTarget, PaytoError>
where
    P: Into<String>,
    R: Into<String>,
    I: IntoIterator<Item = TargetOption>,
{
    UpiTarget::new(account_alias, receiver, amount, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::sender;

    const ALIAS: &str = "my-lil-acc@payto.com";

    #[test]
    fn test_upi_mandatory_options() {
        let upi = new_upi(ALIAS, "the-receiver", "123.39", []).unwrap();
        assert_eq!(
            upi.to_string(),
            "payto://upi/my-lil-acc@payto.com?amount=123.39&receiver-name=the-receiver"
        );
        assert_eq!(upi.path(), ALIAS);
    }

    #[test]
    fn test_upi_with_sender() {
        let upi = new_upi(ALIAS, "the-receiver", "123.39", [sender("the-sender")]).unwrap();
        assert_eq!(
            upi.to_string(),
            "payto://upi/my-lil-acc@payto.com?amount=123.39&receiver-name=the-receiver&sender-name=the-sender"
        );
        assert_eq!(upi.sender_name(), "the-sender");
    }

    #[test]
    fn test_upi_parse_own_output() {
        let upi = new_upi(ALIAS, "the-receiver", "123.39", [sender("the-sender")]).unwrap();
        let parsed: UpiTarget = upi.to_string().parse().unwrap();
        assert_eq!(parsed, upi);
    }
}
