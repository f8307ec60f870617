//! # Inbome header.
//!
//! Parses and validates the `Inbome` inline key header:
//!
//! ```text
//! Inbome: type=p; to=alice@example.org; key=xsBNBFzG3j0BCAC6...
//! ```
//!
//! `type` is optional and must be `p`, `key` and `to` are required. Any other
//! parameter is critical unless its name starts with an underscore, and an
//! unknown critical parameter voids the header. A message must carry exactly
//! one valid header, more than one voids them all.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use inbome_contact_tools::addr_cmp;

use crate::constants::{INBOME_TYPE_OPENPGP, NON_CRITICAL_PARAM_PREFIX};
use crate::context::Context;
use crate::headerdef::HeaderDef;
use crate::key_data::{decode_key_data, KeyDataError};
use crate::message::IncomingMessage;
use crate::param::{HeaderParams, ParamError};
use crate::tools::single_value;
use crate::trust::{maybe_dispatch, reject};

pub const INBOME_PARAM_TYPE: &str = "type";
pub const INBOME_PARAM_KEY_DATA: &str = "key";
pub const INBOME_PARAM_TO: &str = "to";

/// Value of the `type` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyType {
    /// `p`, an OpenPGP key. Also assumed if the parameter is missing.
    OpenPgp,
    Unrecognized(String),
}

impl From<&str> for KeyType {
    fn from(s: &str) -> Self {
        match s {
            INBOME_TYPE_OPENPGP => KeyType::OpenPgp,
            other => KeyType::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeyType::OpenPgp => write!(fmt, "{INBOME_TYPE_OPENPGP}"),
            KeyType::Unrecognized(s) => write!(fmt, "{s}"),
        }
    }
}

/// Why a single header value was discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("cannot parse parameters: {0}")]
    Unparsable(#[from] ParamError),

    #[error("unsupported type parameter {0:?}")]
    UnsupportedType(String),

    #[error("missing key parameter")]
    MissingKeyData,

    #[error("bad key parameter: {0}")]
    InvalidKeyData(#[from] KeyDataError),

    #[error("missing to parameter")]
    MissingRecipient,

    #[error("unknown critical parameter {0:?}")]
    CriticalParameter(String),
}

/// A valid Inbome header.
#[derive(Clone, PartialEq, Eq)]
pub struct InbomeHeader {
    /// Decoded key, never empty.
    pub key_data: Vec<u8>,

    /// Address the key belongs to.
    pub to: String,

    /// Non-critical parameters, kept for diagnostics only.
    pub params: BTreeMap<String, String>,
}

impl fmt::Debug for InbomeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InbomeHeader")
            .field("key_data", &format_args!("[{} bytes]", self.key_data.len()))
            .field("to", &self.to)
            .field("params", &self.params)
            .finish()
    }
}

impl InbomeHeader {
    /// Returns whether the header announces a key for `from`, the sender of the message.
    ///
    /// A key announced for someone else is never used, whatever the header says.
    pub fn is_usable_for(&self, from: &str) -> bool {
        addr_cmp(&self.to, from)
    }
}

impl FromStr for InbomeHeader {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut params = HeaderParams::parse(s)?;

        if let Some(key_type) = params.remove(INBOME_PARAM_TYPE) {
            if let KeyType::Unrecognized(key_type) = KeyType::from(key_type.as_str()) {
                return Err(HeaderError::UnsupportedType(key_type));
            }
        }

        let key_data = match params.remove(INBOME_PARAM_KEY_DATA) {
            Some(raw) => decode_key_data(&raw)?,
            None => return Err(HeaderError::MissingKeyData),
        };

        let to = match params.remove(INBOME_PARAM_TO) {
            Some(to) if !to.is_empty() => to,
            _ => return Err(HeaderError::MissingRecipient),
        };

        // Names are compared case-sensitively, so `Key=` is an unknown critical parameter.
        if let Some(param) = params
            .iter()
            .find(|param| !param.name.starts_with(NON_CRITICAL_PARAM_PREFIX))
        {
            return Err(HeaderError::CriticalParameter(param.name.clone()));
        }

        Ok(InbomeHeader {
            key_data,
            to,
            params: params
                .into_iter()
                .map(|param| (param.name, param.value))
                .collect(),
        })
    }
}

/// Result of validating all `Inbome` headers of a message.
#[derive(Debug, Default)]
pub struct Validation {
    /// Headers that passed all checks, in message order.
    pub valid: Vec<InbomeHeader>,

    /// Reasons for discarding the other headers, in message order.
    pub discarded: Vec<HeaderError>,
}

impl Validation {
    /// Returns the header if exactly one header is valid.
    pub fn into_header(self) -> Option<InbomeHeader> {
        single_value(self.valid)
    }

    /// Number of header values looked at.
    pub fn occurrences(&self) -> usize {
        self.valid.len() + self.discarded.len()
    }
}

/// Validates every value of the `Inbome` header found in one message.
pub fn validate<S: AsRef<str>>(values: &[S]) -> Validation {
    let mut validation = Validation::default();
    for value in values {
        match InbomeHeader::from_str(value.as_ref()) {
            Ok(header) => validation.valid.push(header),
            Err(err) => validation.discarded.push(err),
        }
    }
    validation
}

/// Returns the single valid `Inbome` header of the message, if any.
///
/// Every discarded header is reported as [`crate::EventType::InlineKeyRejected`].
pub fn get_valid_inbome_header(context: &Context, msg: &IncomingMessage) -> Option<InbomeHeader> {
    let validation = validate(&msg.get_header_values(HeaderDef::Inbome));
    for err in &validation.discarded {
        reject(context, HeaderDef::Inbome, err.to_string());
    }

    let occurrences = validation.occurrences();
    let valid = validation.valid.len();
    let header = validation.into_header();
    if header.is_none() && valid > 1 {
        reject(
            context,
            HeaderDef::Inbome,
            format!("{valid} valid headers out of {occurrences}, expected exactly one"),
        );
    }
    header
}

/// Returns the key announced by the message, if it has a valid `Inbome` header
/// announcing a key for its own sender.
pub fn get_usable_inbome_header(context: &Context, msg: &IncomingMessage) -> Option<InbomeHeader> {
    let header = get_valid_inbome_header(context, msg)?;

    let Some(from) = msg.get_from() else {
        reject(context, HeaderDef::Inbome, "message has no single sender".to_string());
        return None;
    };
    if !header.is_usable_for(from) {
        reject(
            context,
            HeaderDef::Inbome,
            format!("header is for {:?}, not for sender {:?}", header.to, from),
        );
        return None;
    }
    Some(header)
}

pub fn has_inbome_header(msg: &IncomingMessage) -> bool {
    msg.has_header(HeaderDef::Inbome)
}

/// Offers the key from the `Inbome` header of an unsigned message to the trust provider.
///
/// Returns whether a trust update was queued.
pub fn process_unsigned_message(context: &Context, msg: &IncomingMessage) -> bool {
    match get_usable_inbome_header(context, msg) {
        Some(header) => maybe_dispatch(context, msg, HeaderDef::Inbome, header.key_data),
        None => false,
    }
}
