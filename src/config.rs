//! Payment targets declared in configuration files.
//!
//! A targets file is a JSON document listing payment targets by their parts:
//!
//! ```json
//! {
//!   "targets": [
//!     {
//!       "authority": "bic",
//!       "path": "SOGEDEFFXXX",
//!       "amount": "123.39",
//!       "receiver_name": "$RECEIVER_NAME",
//!       "message": "${INVOICE_MESSAGE}"
//!     }
//!   ]
//! }
//! ```
//!
//! # Environment Variable Resolution
//!
//! Every string field goes through [`LiteralOrEnv`], so values can be given
//! literally or as references to environment variables (`$VAR` or `${VAR}`).
//! References are resolved while the file is deserialized.

use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Deref;
use std::path::Path;
use std::str::FromStr;

use crate::authority::{Authority, Bic, Upi};
use crate::error::{ConfigError, PaytoError};
use crate::target::{PaymentTarget, TargetOption};

/// A transparent wrapper that resolves environment variables during deserialization.
///
/// Supports both literal values and environment variable references:
/// - Literal: `"SOGEDEFFXXX"`
/// - Simple env var: `"$RECEIVER_NAME"`
/// - Braced env var: `"${RECEIVER_NAME}"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralOrEnv<T>(T);

impl<T> LiteralOrEnv<T> {
    pub fn from_literal(value: T) -> Self {
        Self(value)
    }

    pub fn inner(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }

    /// Returns the variable name if `s` matches `$VAR` or `${VAR}` syntax.
    fn parse_env_var_syntax(s: &str) -> Option<&str> {
        if let Some(braced) = s.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
            Some(braced)
        } else if let Some(var_name) = s.strip_prefix('$') {
            let is_name =
                !var_name.is_empty() && var_name.chars().all(|c| c.is_alphanumeric() || c == '_');
            is_name.then_some(var_name)
        } else {
            None
        }
    }
}

impl<T> Deref for LiteralOrEnv<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de, T> Deserialize<'de> for LiteralOrEnv<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let value = if let Some(var_name) = Self::parse_env_var_syntax(&s) {
            std::env::var(var_name).map_err(|_| {
                serde::de::Error::custom(format!(
                    "Environment variable '{}' not found (referenced as '{}')",
                    var_name, s
                ))
            })?
        } else {
            s
        };

        let parsed = value
            .parse::<T>()
            .map_err(|e| serde::de::Error::custom(format!("Failed to parse value: {}", e)))?;

        Ok(LiteralOrEnv(parsed))
    }
}

impl<T: Serialize> Serialize for LiteralOrEnv<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// One payment target, described field by field.
///
/// The amount is kept as text and parsed when the target is built, so an
/// invalid amount surfaces as [`PaytoError::InvalidAmount`] like any other
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetConfig {
    /// Target type name, e.g. `"bic"` or `"upi"`.
    pub authority: String,
    pub path: LiteralOrEnv<String>,
    pub amount: LiteralOrEnv<String>,
    pub receiver_name: LiteralOrEnv<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<LiteralOrEnv<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<LiteralOrEnv<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<LiteralOrEnv<String>>,
}

impl TargetConfig {
    fn options(&self) -> Vec<TargetOption> {
        let mut options = Vec::new();
        if let Some(sender) = &self.sender_name {
            options.push(TargetOption::Sender(sender.inner().clone()));
        }
        if let Some(message) = &self.message {
            options.push(TargetOption::Message(message.inner().clone()));
        }
        if let Some(instruction) = &self.instruction {
            options.push(TargetOption::Instruction(instruction.inner().clone()));
        }
        options
    }

    /// Builds a typed target from this entry.
    ///
    /// # Errors
    ///
    /// Returns [`PaytoError::AuthorityMismatch`] if the entry declares a
    /// different target type, or [`PaytoError::InvalidAmount`].
    pub fn to_target<A: Authority>(&self) -> Result<PaymentTarget<A>, PaytoError> {
        if !self.authority.eq_ignore_ascii_case(A::NAME) {
            return Err(PaytoError::AuthorityMismatch {
                expected: A::NAME,
                actual: self.authority.clone(),
            });
        }
        PaymentTarget::new(
            self.path.inner().as_str(),
            self.receiver_name.inner().as_str(),
            &self.amount,
            self.options(),
        )
    }

    pub fn to_bic(&self) -> Result<PaymentTarget<Bic>, PaytoError> {
        self.to_target()
    }

    pub fn to_upi(&self) -> Result<PaymentTarget<Upi>, PaytoError> {
        self.to_target()
    }
}

/// A list of payment targets loaded from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TargetsConfig {
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

impl TargetsConfig {
    /// Reads and deserializes a targets file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Json`] if it is malformed or references an unset
    /// environment variable.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: TargetsConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        #[cfg(feature = "telemetry")]
        tracing::info!(path = %path.display(), targets = config.targets.len(), "Loaded payment targets");

        Ok(config)
    }

    /// Returns the entries declared with authority `A`.
    pub fn of<A: Authority>(&self) -> impl Iterator<Item = &TargetConfig> {
        self.targets
            .iter()
            .filter(|target| target.authority.eq_ignore_ascii_case(A::NAME))
    }
}

impl Deref for TargetsConfig {
    type Target = Vec<TargetConfig>;

    fn deref(&self) -> &Self::Target {
        &self.targets
    }
}
