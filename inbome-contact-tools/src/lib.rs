//! Address tools for inline key handling: the sender identity handed to the
//! trust provider, and the comparison used to match a header against it.

#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::correctness,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::wildcard_imports,
    clippy::needless_borrow,
    clippy::cast_lossless,
    clippy::unused_async,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
    clippy::cloned_instead_of_copied
)]
#![cfg_attr(not(test), warn(clippy::indexing_slicing))]

use std::fmt;
use std::ops::Deref;

use anyhow::{bail, Result};

/// Syntactically valid address, spelled as the sender wrote it.
///
/// Only surrounding whitespace is removed; case is kept. Use [`addr_cmp`]
/// to compare addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactAddress(String);

impl ContactAddress {
    /// Checks `s` and wraps it, trimmed.
    pub fn new(s: &str) -> Result<Self> {
        let addr = s.trim();
        EmailAddress::new(addr)?;
        Ok(Self(addr.to_string()))
    }
}

impl Deref for ContactAddress {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ContactAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the comparison form of an address: trimmed, lowercased and
/// without a `mailto:` prefix.
pub fn addr_normalize(addr: &str) -> String {
    let addr = addr.trim().to_lowercase();
    match addr.strip_prefix("mailto:") {
        Some(rest) => rest.to_string(),
        None => addr,
    }
}

/// Returns whether two addresses name the same mailbox, ignoring case.
pub fn addr_cmp(addr1: &str, addr2: &str) -> bool {
    addr_normalize(addr1) == addr_normalize(addr2)
}

/// An address split into local part and domain.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EmailAddress {
    /// Part before the last `@`.
    pub local: String,

    /// Part after the last `@`.
    pub domain: String,
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

impl EmailAddress {
    /// Splits a bare `local@domain` address.
    ///
    /// Display names, angle brackets and whitespace are not accepted, the
    /// input is expected to come out of an address list parser.
    pub fn new(input: &str) -> Result<EmailAddress> {
        if input.chars().any(|c| c.is_whitespace() || c == '<' || c == '>') {
            bail!("address {input:?} contains whitespace or angle brackets");
        }
        let Some((local, domain)) = input.rsplit_once('@') else {
            bail!("address {input:?} has no '@'");
        };
        if local.is_empty() {
            bail!("address {input:?} has an empty local part");
        }
        if domain.is_empty() || domain.starts_with('.') || domain.ends_with('.') {
            bail!("address {input:?} has an invalid domain");
        }
        Ok(EmailAddress {
            local: local.to_string(),
            domain: domain.to_string(),
        })
    }
}
