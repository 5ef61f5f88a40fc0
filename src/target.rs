//! The payment target value object and its URI form.
//!
//! A [`PaymentTarget`] holds everything a `payto` URI describes: the target
//! type (as the marker parameter `A`), the path identifier, the amount, the
//! receiver name and the optional sender name, message and instruction.
//!
//! ```text
//! payto-URI = "payto://" authority path-abempty [ "?" opts ]
//! opts = opt *( "&" opt )
//! opt = opt-name "=" opt-value
//! generic-opt = "amount" / "receiver-name" / "sender-name" /
//!               "message" / "instruction"
//! ```
//!
//! Query options are always emitted sorted by key, so two equal targets
//! render the same URI byte for byte.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Debug, Display};
use std::marker::PhantomData;
use std::str::FromStr;
use url::Url;

use crate::amount::Amount;
use crate::authority::Authority;
use crate::error::PaytoError;

/// The `payto` URI scheme.
pub const SCHEME: &str = "payto";

/// Bytes escaped in option names and values: all but `A-Z a-z 0-9 - _ . ~`.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Bytes escaped in the path identifier. Sub-delimiters, `:`, `@` and `/`
/// stay literal; `%`, `?` and `#` are always escaped.
const PATH_ESCAPE: &AsciiSet = &QUERY_ESCAPE
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

/// Escapes a query component; spaces become `+`.
fn query_escape(input: &str) -> String {
    // A literal '%' is escaped to "%25", so every "%20" left comes from a space.
    utf8_percent_encode(input, QUERY_ESCAPE)
        .to_string()
        .replace("%20", "+")
}

/// Names of the generic options understood by every target type.
pub mod opt {
    pub const AMOUNT: &str = "amount";
    pub const RECEIVER_NAME: &str = "receiver-name";
    pub const SENDER_NAME: &str = "sender-name";
    pub const MESSAGE: &str = "message";
    pub const INSTRUCTION: &str = "instruction";
}

/// The accessor contract shared by every payment target type.
///
/// Useful for handling targets of different types uniformly:
///
/// ```
/// use payto_rs::{Payto, new_bic, new_upi};
///
/// let targets: Vec<Box<dyn Payto>> = vec![
///     Box::new(new_bic("SOGEDEFFXXX", "Alice", "10", []).unwrap()),
///     Box::new(new_upi("alice@example.com", "Alice", "200", []).unwrap()),
/// ];
/// let authorities: Vec<_> = targets.iter().map(|t| t.authority()).collect();
/// assert_eq!(authorities, ["bic", "upi"]);
/// ```
pub trait Payto {
    /// The target type name, as found in the URI authority.
    fn authority(&self) -> &'static str;
    /// The amount to transfer.
    fn amount(&self) -> &Amount;
    /// Name of the entity that receives the payment (creditor).
    fn receiver_name(&self) -> &str;
    /// Name of the entity that makes the payment (debtor). Empty when absent.
    fn sender_name(&self) -> &str;
    /// A short message to identify the purpose of the payment. Empty when absent.
    fn message(&self) -> &str;
    /// A short message giving payment reconciliation instructions. Empty when absent.
    fn instruction(&self) -> &str;
    /// The `payto` URI describing this target.
    fn url(&self) -> Url;
}

/// An optional field setter, applied in order during construction.
///
/// Later options override earlier ones for the same field. Setting a field
/// to the empty string is the same as leaving it absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOption {
    /// Sets the `sender-name` option.
    Sender(String),
    /// Sets the `message` option.
    Message(String),
    /// Sets the `instruction` option.
    Instruction(String),
}

/// Shorthand for [`TargetOption::Sender`].
pub fn sender<S: Into<String>>(sender: S) -> TargetOption {
    TargetOption::Sender(sender.into())
}

/// Shorthand for [`TargetOption::Message`].
pub fn message<S: Into<String>>(message: S) -> TargetOption {
    TargetOption::Message(message.into())
}

/// Shorthand for [`TargetOption::Instruction`].
pub fn instruction<S: Into<String>>(instruction: S) -> TargetOption {
    TargetOption::Instruction(instruction.into())
}

/// A payment target of type `A`.
///
/// Fields are private and there are no setters: a target never changes
/// after construction.
///
/// # Example
///
/// ```
/// use payto_rs::{BicTarget, sender};
///
/// let target = BicTarget::new("SOGEDEFFXXX", "the-receiver", "123.39", [sender("the-sender")])
///     .unwrap();
/// assert_eq!(
///     target.to_string(),
///     "payto://bic/SOGEDEFFXXX?amount=123.39&receiver-name=the-receiver&sender-name=the-sender"
/// );
/// ```
pub struct PaymentTarget<A> {
    path: String,
    amount: Amount,
    receiver: String,
    sender: String,
    message: String,
    instruction: String,
    _authority: PhantomData<A>,
}

impl<A: Authority> PaymentTarget<A> {
    /// Builds a target from its mandatory fields and a list of options.
    ///
    /// # Errors
    ///
    /// Returns [`PaytoError::InvalidAmount`] if `amount` is not a number.
    /// No other field is validated.
    pub fn new<P, R, I>(path: P, receiver: R, amount: &str, options: I) -> Result<Self, PaytoError>
    where
        P: Into<String>,
        R: Into<String>,
        I: IntoIterator<Item = TargetOption>,
    {
        let amount = match Amount::parse(amount) {
            Ok(amount) => amount,
            Err(e) => {
                #[cfg(feature = "telemetry")]
                tracing::debug!(authority = A::NAME, error = %e, "Rejected payment target");
                return Err(e);
            }
        };
        let mut target = PaymentTarget {
            path: path.into(),
            amount,
            receiver: receiver.into(),
            sender: String::new(),
            message: String::new(),
            instruction: String::new(),
            _authority: PhantomData,
        };
        for option in options {
            target.apply(option);
        }

        #[cfg(feature = "telemetry")]
        tracing::debug!(authority = A::NAME, path = %target.path, amount = %target.amount, "Built payment target");

        Ok(target)
    }

    /// Starts a builder for a target with the given mandatory fields.
    ///
    /// The amount is parsed when [`PaymentTargetBuilder::build`] is called.
    pub fn builder<P, R, M>(path: P, receiver: R, amount: M) -> PaymentTargetBuilder<A>
    where
        P: Into<String>,
        R: Into<String>,
        M: Into<String>,
    {
        PaymentTargetBuilder {
            path: path.into(),
            receiver: receiver.into(),
            amount: amount.into(),
            options: Vec::new(),
            _authority: PhantomData,
        }
    }

    fn apply(&mut self, option: TargetOption) {
        match option {
            TargetOption::Sender(sender) => self.sender = sender,
            TargetOption::Message(message) => self.message = message,
            TargetOption::Instruction(instruction) => self.instruction = instruction,
        }
    }

    /// Returns the target type name, e.g. `"bic"`.
    pub fn authority(&self) -> &'static str {
        A::NAME
    }

    /// Returns the path identifier (SWIFT code, account alias, ...).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the amount.
    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    pub fn receiver_name(&self) -> &str {
        &self.receiver
    }

    pub fn sender_name(&self) -> &str {
        &self.sender
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Returns the query options, keyed and therefore ordered by name.
    ///
    /// `amount` and `receiver-name` are always present; the optional fields
    /// only when non-empty.
    pub fn query_pairs(&self) -> BTreeMap<&'static str, String> {
        let mut pairs = BTreeMap::new();
        pairs.insert(opt::RECEIVER_NAME, self.receiver.clone());
        pairs.insert(opt::AMOUNT, self.amount.to_string());
        if !self.sender.is_empty() {
            pairs.insert(opt::SENDER_NAME, self.sender.clone());
        }
        if !self.instruction.is_empty() {
            pairs.insert(opt::INSTRUCTION, self.instruction.clone());
        }
        if !self.message.is_empty() {
            pairs.insert(opt::MESSAGE, self.message.clone());
        }
        pairs
    }

    /// Renders the target as `payto://<authority>/<path>?<sorted options>`.
    ///
    /// Option values keep `A-Z a-z 0-9 - _ . ~`, turn spaces into `+` and
    /// percent-encode everything else.
    pub fn url(&self) -> Url {
        let mut url = Url::parse(&format!("{SCHEME}://{}", A::NAME))
            .expect("authority names are valid URI hosts");
        let path = utf8_percent_encode(&self.path, PATH_ESCAPE).to_string();
        if path.starts_with('/') {
            url.set_path(&path);
        } else {
            url.set_path(&format!("/{path}"));
        }
        let query = self
            .query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{}={}", query_escape(key), query_escape(&value)))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));
        url
    }

    /// Parses a `payto` URI of this target type.
    ///
    /// Options may appear in any order. `amount` must appear exactly once and
    /// `receiver-name` at least once; for the other generic options the last
    /// occurrence wins. Options this crate does not know are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI is malformed, names another scheme or
    /// target type, lacks a path or a mandatory option, or carries an
    /// invalid amount.
    pub fn parse(uri: &str) -> Result<Self, PaytoError> {
        let result = Self::parse_url(uri);
        #[cfg(feature = "telemetry")]
        {
            if let Err(e) = &result {
                tracing::debug!(authority = A::NAME, uri, error = %e, "Failed to parse payto URI");
            }
        }
        result
    }

    fn parse_url(uri: &str) -> Result<Self, PaytoError> {
        let url = Url::parse(uri)?;
        if url.scheme() != SCHEME {
            return Err(PaytoError::UnsupportedScheme(url.scheme().to_string()));
        }
        let host = url.host_str().unwrap_or_default();
        if !host.eq_ignore_ascii_case(A::NAME) {
            return Err(PaytoError::AuthorityMismatch {
                expected: A::NAME,
                actual: host.to_string(),
            });
        }
        let raw_path = url.path().strip_prefix('/').unwrap_or(url.path());
        if raw_path.is_empty() {
            return Err(PaytoError::MissingPath);
        }
        let path = percent_decode_str(raw_path)
            .decode_utf8()
            .map_err(|_| PaytoError::InvalidPath(raw_path.to_string()))?
            .into_owned();

        let mut amount = None;
        let mut receiver = None;
        let mut options = Vec::new();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                opt::AMOUNT => {
                    if amount.replace(value).is_some() {
                        return Err(PaytoError::DuplicateAmount);
                    }
                }
                opt::RECEIVER_NAME => receiver = Some(value.into_owned()),
                opt::SENDER_NAME => options.push(TargetOption::Sender(value.into_owned())),
                opt::MESSAGE => options.push(TargetOption::Message(value.into_owned())),
                opt::INSTRUCTION => options.push(TargetOption::Instruction(value.into_owned())),
                _ => {}
            }
        }
        let amount = amount.ok_or(PaytoError::MissingOption(opt::AMOUNT))?;
        let receiver = receiver.ok_or(PaytoError::MissingOption(opt::RECEIVER_NAME))?;
        Self::new(path, receiver, &amount, options)
    }
}

impl<A: Authority> Payto for PaymentTarget<A> {
    fn authority(&self) -> &'static str {
        A::NAME
    }

    fn amount(&self) -> &Amount {
        &self.amount
    }

    fn receiver_name(&self) -> &str {
        &self.receiver
    }

    fn sender_name(&self) -> &str {
        &self.sender
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn instruction(&self) -> &str {
        &self.instruction
    }

    fn url(&self) -> Url {
        PaymentTarget::url(self)
    }
}

// Manual impls: derives would demand `A: Clone + PartialEq + ...` on the marker.
impl<A> Clone for PaymentTarget<A> {
    fn clone(&self) -> Self {
        PaymentTarget {
            path: self.path.clone(),
            amount: self.amount.clone(),
            receiver: self.receiver.clone(),
            sender: self.sender.clone(),
            message: self.message.clone(),
            instruction: self.instruction.clone(),
            _authority: PhantomData,
        }
    }
}

impl<A> PartialEq for PaymentTarget<A> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.amount == other.amount
            && self.receiver == other.receiver
            && self.sender == other.sender
            && self.message == other.message
            && self.instruction == other.instruction
    }
}

impl<A> Eq for PaymentTarget<A> {}

impl<A: Authority> Debug for PaymentTarget<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentTarget")
            .field("authority", &A::NAME)
            .field("path", &self.path)
            .field("amount", &self.amount)
            .field("receiver", &self.receiver)
            .field("sender", &self.sender)
            .field("message", &self.message)
            .field("instruction", &self.instruction)
            .finish()
    }
}

impl<A: Authority> Display for PaymentTarget<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url().as_str())
    }
}

impl<A: Authority> FromStr for PaymentTarget<A> {
    type Err = PaytoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentTarget::parse(s)
    }
}

impl<A: Authority> From<PaymentTarget<A>> for Url {
    fn from(value: PaymentTarget<A>) -> Self {
        value.url()
    }
}

impl<A: Authority> Serialize for PaymentTarget<A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.url().as_str())
    }
}

impl<'de, A: Authority> Deserialize<'de> for PaymentTarget<A> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PaymentTarget::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Step-by-step construction of a [`PaymentTarget`].
///
/// ```
/// use payto_rs::UpiTarget;
///
/// let target = UpiTarget::builder("alice@example.com", "Alice", "200")
///     .message("rent")
///     .build()
///     .unwrap();
/// assert_eq!(target.message(), "rent");
/// ```
#[derive(Debug, Clone)]
pub struct PaymentTargetBuilder<A> {
    path: String,
    receiver: String,
    amount: String,
    options: Vec<TargetOption>,
    _authority: PhantomData<A>,
}

impl<A: Authority> PaymentTargetBuilder<A> {
    pub fn sender<S: Into<String>>(self, value: S) -> Self {
        self.option(sender(value))
    }

    pub fn message<S: Into<String>>(self, value: S) -> Self {
        self.option(message(value))
    }

    pub fn instruction<S: Into<String>>(self, value: S) -> Self {
        self.option(instruction(value))
    }

    /// Queues an arbitrary option. Options are applied in the order queued.
    pub fn option(mut self, option: TargetOption) -> Self {
        self.options.push(option);
        self
    }

    /// Parses the amount and builds the target.
    ///
    /// # Errors
    ///
    /// Returns [`PaytoError::InvalidAmount`] if the amount is not a number.
    pub fn build(self) -> Result<PaymentTarget<A>, PaytoError> {
        PaymentTarget::new(self.path, self.receiver, &self.amount, self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::{Bic, Upi};

    fn bic(options: Vec<TargetOption>) -> PaymentTarget<Bic> {
        PaymentTarget::new("SOGEDEFFXXX", "the-receiver", "123.39", options).unwrap()
    }

    #[test]
    fn test_optional_fields_default_to_empty() {
        let target = bic(vec![]);
        assert_eq!(target.sender_name(), "");
        assert_eq!(target.message(), "");
        assert_eq!(target.instruction(), "");
        assert_eq!(target.receiver_name(), "the-receiver");
        assert_eq!(target.path(), "SOGEDEFFXXX");
        assert_eq!(target.amount().to_string(), "123.39");
    }

    #[test]
    fn test_later_option_overrides_earlier() {
        let target = bic(vec![sender("first"), message("m"), sender("second")]);
        assert_eq!(target.sender_name(), "second");
        assert_eq!(target.message(), "m");
    }

    #[test]
    fn test_empty_option_is_omitted() {
        let target = bic(vec![sender("someone"), sender("")]);
        assert_eq!(
            target.to_string(),
            "payto://bic/SOGEDEFFXXX?amount=123.39&receiver-name=the-receiver"
        );
    }

    #[test]
    fn test_query_keys_sorted() {
        let target = bic(vec![
            message("the-message"),
            instruction("the-instruction"),
            sender("the-sender"),
        ]);
        assert_eq!(
            target.to_string(),
            "payto://bic/SOGEDEFFXXX?amount=123.39&instruction=the-instruction\
             &message=the-message&receiver-name=the-receiver&sender-name=the-sender"
        );
        let keys: Vec<_> = target.query_pairs().into_keys().collect();
        assert_eq!(
            keys,
            ["amount", "instruction", "message", "receiver-name", "sender-name"]
        );
    }

    #[test]
    fn test_values_are_query_escaped() {
        let target: PaymentTarget<Bic> =
            PaymentTarget::new("SOGEDEFFXXX", "Alice Smith", "1", [message("a&b=c")]).unwrap();
        assert_eq!(
            target.to_string(),
            "payto://bic/SOGEDEFFXXX?amount=1&message=a%26b%3Dc&receiver-name=Alice+Smith"
        );
    }

    #[test]
    fn test_query_escaping_keeps_unreserved_only() {
        let target: PaymentTarget<Bic> =
            PaymentTarget::new("X", "r", "1", [message("a~b*c d")]).unwrap();
        assert_eq!(
            target.to_string(),
            "payto://bic/X?amount=1&message=a~b%2Ac+d&receiver-name=r"
        );
    }

    #[test]
    fn test_path_escaping_roundtrip() {
        let cases = [
            ("a%20b", "payto://upi/a%2520b?amount=1&receiver-name=r"),
            ("what?", "payto://upi/what%3F?amount=1&receiver-name=r"),
            ("tag#1", "payto://upi/tag%231?amount=1&receiver-name=r"),
            ("my alias", "payto://upi/my%20alias?amount=1&receiver-name=r"),
        ];
        for (path, expected) in cases {
            let target: PaymentTarget<Upi> = PaymentTarget::new(path, "r", "1", []).unwrap();
            assert_eq!(target.to_string(), expected);
            let parsed: PaymentTarget<Upi> = expected.parse().unwrap();
            assert_eq!(parsed.path(), path);
            assert_eq!(parsed, target);
        }
    }

    #[test]
    fn test_parse_rejects_non_utf8_path() {
        assert_eq!(
            PaymentTarget::<Upi>::parse("payto://upi/%FF?amount=1&receiver-name=r"),
            Err(PaytoError::InvalidPath("%FF".into()))
        );
    }

    #[test]
    fn test_invalid_amount() {
        let result = PaymentTarget::<Bic>::new("SOGEDEFFXXX", "the-receiver", "not-a-number", []);
        assert_eq!(
            result,
            Err(PaytoError::InvalidAmount("not-a-number".into()))
        );
    }

    #[test]
    fn test_builder_matches_options() {
        let built = PaymentTarget::<Bic>::builder("SOGEDEFFXXX", "the-receiver", "123.39")
            .sender("the-sender")
            .instruction("the-instruction")
            .build()
            .unwrap();
        let direct = bic(vec![sender("the-sender"), instruction("the-instruction")]);
        assert_eq!(built, direct);
    }

    #[test]
    fn test_builder_invalid_amount() {
        let result = PaymentTarget::<Upi>::builder("a@b", "r", "twelve").build();
        assert!(matches!(result, Err(PaytoError::InvalidAmount(_))));
    }

    #[test]
    fn test_parse_roundtrip() {
        let original = bic(vec![sender("Bob Jones"), message("invoice 42 & more")]);
        let parsed: PaymentTarget<Bic> = original.to_string().parse().unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_any_order_and_unknown_options() {
        let parsed = PaymentTarget::<Upi>::parse(
            "payto://upi/alice@example.com?receiver-name=Alice&foo=bar&amount=200.0",
        )
        .unwrap();
        assert_eq!(parsed.path(), "alice@example.com");
        assert_eq!(parsed.receiver_name(), "Alice");
        assert_eq!(parsed.amount().to_string(), "200");
    }

    #[test]
    fn test_parse_decodes_path() {
        let parsed =
            PaymentTarget::<Upi>::parse("payto://upi/my%20alias?amount=1&receiver-name=r").unwrap();
        assert_eq!(parsed.path(), "my alias");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            PaymentTarget::<Bic>::parse("not a uri"),
            Err(PaytoError::InvalidUri(_))
        ));
        assert_eq!(
            PaymentTarget::<Bic>::parse("https://bic/X?amount=1&receiver-name=r"),
            Err(PaytoError::UnsupportedScheme("https".into()))
        );
        assert_eq!(
            PaymentTarget::<Bic>::parse("payto://upi/a@b?amount=1&receiver-name=r"),
            Err(PaytoError::AuthorityMismatch {
                expected: "bic",
                actual: "upi".into()
            })
        );
        assert_eq!(
            PaymentTarget::<Bic>::parse("payto://bic?amount=1&receiver-name=r"),
            Err(PaytoError::MissingPath)
        );
        assert_eq!(
            PaymentTarget::<Bic>::parse("payto://bic/X?receiver-name=r"),
            Err(PaytoError::MissingOption("amount"))
        );
        assert_eq!(
            PaymentTarget::<Bic>::parse("payto://bic/X?amount=1"),
            Err(PaytoError::MissingOption("receiver-name"))
        );
        assert_eq!(
            PaymentTarget::<Bic>::parse("payto://bic/X?amount=1&amount=2&receiver-name=r"),
            Err(PaytoError::DuplicateAmount)
        );
        assert_eq!(
            PaymentTarget::<Bic>::parse("payto://bic/X?amount=EUR:1&receiver-name=r"),
            Err(PaytoError::InvalidAmount("EUR:1".into()))
        );
    }

    #[test]
    fn test_serde_as_uri_string() {
        let target = bic(vec![sender("the-sender")]);
        let json = serde_json::to_string(&target).unwrap();
        assert_eq!(
            json,
            "\"payto://bic/SOGEDEFFXXX?amount=123.39&receiver-name=the-receiver&sender-name=the-sender\""
        );
        let back: PaymentTarget<Bic> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, target);
        assert!(serde_json::from_str::<PaymentTarget<Upi>>(&json).is_err());
    }

    #[test]
    fn test_payto_trait_object() {
        let target = bic(vec![instruction("ref-1")]);
        let payto: &dyn Payto = &target;
        assert_eq!(payto.authority(), "bic");
        assert_eq!(payto.instruction(), "ref-1");
        assert_eq!(payto.url(), target.url());
    }
}
