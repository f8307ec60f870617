//! # OpenPGP header.
//!
//! The older inline key convention: an `OpenPGP` header whose whole value is
//! a base64 encoded public key. There are no parameters, no recipient and no
//! rule about repeated headers; the first header is used and the rest ignored.

use crate::context::Context;
use crate::headerdef::HeaderDef;
use crate::key_data::{decode_key_data, KeyDataError};
use crate::message::IncomingMessage;
use crate::trust::{maybe_dispatch, reject};

/// Decodes the key from the first of the given header values.
///
/// Returns `Ok(None)` if there is no value at all.
pub fn get_openpgp_key_data<S: AsRef<str>>(values: &[S]) -> Result<Option<Vec<u8>>, KeyDataError> {
    match values.first() {
        Some(value) => decode_key_data(value.as_ref()).map(Some),
        None => Ok(None),
    }
}

pub fn has_openpgp_header(msg: &IncomingMessage) -> bool {
    msg.has_header(HeaderDef::OpenPgp)
}

/// Offers the key from the `OpenPGP` header of an unsigned message to the trust provider.
///
/// Returns whether a trust update was queued.
pub fn process_unsigned_message(context: &Context, msg: &IncomingMessage) -> bool {
    match get_openpgp_key_data(&msg.get_header_values(HeaderDef::OpenPgp)) {
        Ok(Some(key_data)) => maybe_dispatch(context, msg, HeaderDef::OpenPgp, key_data),
        Ok(None) => false,
        Err(err) => {
            reject(context, HeaderDef::OpenPgp, err.to_string());
            false
        }
    }
}
