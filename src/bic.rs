//! Business Identifier Code (BIC) payment targets.
//!
//! The path consists of just a BIC. This is used for wire transfers between
//! banks. The registry for BICs is provided by SWIFT. The path does not allow
//! specifying a bank account number.
//!
//! ```text
//! payto://bic/SOGEDEFFXXX
//! ```
//!
//! The SWIFT code is taken as given; its format is not checked.

use crate::authority::Bic;
use crate::error::PaytoError;
use crate::target::{PaymentTarget, TargetOption};

/// A `payto://bic/<swift>` payment target.
pub type BicTarget = PaymentTarget<Bic>;

/// Builds a BIC payment target.
///
/// # Errors
///
/// Returns [`PaytoError::InvalidAmount`] if `amount` is not a number.
///
/// # Example
///
/// ```
/// use payto_rs::{new_bic, message};
///
/// let bic = new_bic("SOGEDEFFXXX", "the-receiver", "123.39", [message("the-message")]).unwrap();
/// assert_eq!(
///     bic.url().as_str(),
///     "payto://bic/SOGEDEFFXXX?amount=123.39&message=the-message&receiver-name=the-receiver"
/// );
/// ```
pub fn new_bic<S, R, I>(
    swift_code: S,
    receiver: R,
    amount: &str,
    options: I,
) -> Result<BicTarget, PaytoError>
where
    S: Into<String>,
    R: Into<String>,
    I: IntoIterator<Item = TargetOption>,
{
    BicTarget::new(swift_code, receiver, amount, options)
}
