//! Inline key handling for a received message.

use crate::config::Config;
use crate::context::Context;
use crate::headerdef::HeaderDef;
use crate::inbome;
use crate::log::LogExt;
use crate::message::{IncomingMessage, MessageKind};
use crate::openpgp_header;

/// What happened to the inline key headers of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineKeyOutcome {
    /// The message is signed or encrypted, its keys are handled elsewhere.
    SignedMessage,

    /// No header to look at, or processing is disabled.
    NoHeader,

    /// A header was there but yielded no usable key.
    Skipped(HeaderDef),

    /// A trust update was queued from the key in this header.
    Dispatched(HeaderDef),
}

/// Looks for an inline key in a received message and offers it to the trust provider.
///
/// The `Inbome` header is preferred; the `OpenPGP` header is only consulted
/// if the message carries no `Inbome` header at all. Never fails, problems
/// with the headers are reported as events.
pub fn handle_inline_keys(context: &Context, msg: &IncomingMessage) -> InlineKeyOutcome {
    if msg.get_kind() != MessageKind::Unsigned {
        info!(
            context,
            "Not looking for inline keys, message is {:?}.",
            msg.get_kind()
        );
        return InlineKeyOutcome::SignedMessage;
    }

    if context.get_config_bool(Config::InbomeEnabled) && inbome::has_inbome_header(msg) {
        return if inbome::process_unsigned_message(context, msg) {
            InlineKeyOutcome::Dispatched(HeaderDef::Inbome)
        } else {
            InlineKeyOutcome::Skipped(HeaderDef::Inbome)
        };
    }

    if context.get_config_bool(Config::OpenpgpHeaderEnabled)
        && openpgp_header::has_openpgp_header(msg)
    {
        return if openpgp_header::process_unsigned_message(context, msg) {
            InlineKeyOutcome::Dispatched(HeaderDef::OpenPgp)
        } else {
            InlineKeyOutcome::Skipped(HeaderDef::OpenPgp)
        };
    }

    InlineKeyOutcome::NoHeader
}

/// Like [`handle_inline_keys`], but takes the raw message.
///
/// A message that can not be parsed is treated as having no headers.
pub fn handle_inline_keys_raw(
    context: &Context,
    body: &[u8],
    internal_date: i64,
) -> InlineKeyOutcome {
    match IncomingMessage::from_bytes(body, internal_date).log_err(context) {
        Some(msg) => handle_inline_keys(context, &msg),
        None => InlineKeyOutcome::NoHeader,
    }
}
