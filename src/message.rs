//! # Incoming message view.
//!
//! The part of a received message that inline key processing looks at:
//! sender, timestamps, whether the message is signed or encrypted, and raw
//! header values.

use anyhow::{Context as _, Result};
use mailparse::MailAddr;

use crate::headerdef::{HeaderDef, HeaderDefMap};

/// How the message is protected, judged by its top-level content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Unsigned,
    /// `multipart/signed`.
    Signed,
    /// `multipart/encrypted`.
    Encrypted,
}

#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Addresses of all mailboxes in the From header, as written.
    from: Vec<String>,

    /// Value of the Date header, if it could be parsed.
    sent_date: Option<i64>,

    /// Time the message was recorded locally.
    internal_date: i64,

    kind: MessageKind,

    /// Decoded header values, keyed by lowercased header name.
    headers: Vec<(String, String)>,
}

impl IncomingMessage {
    /// Parses a raw RFC 5322 message.
    ///
    /// `internal_date` is the local receive time of the message, e.g. the
    /// IMAP INTERNALDATE.
    pub fn from_bytes(body: &[u8], internal_date: i64) -> Result<Self> {
        let mail = mailparse::parse_mail(body).context("failed to parse mail")?;

        let from = match mail.headers.get_header(HeaderDef::From_) {
            Some(header) => mailparse::addrparse_header(header)
                .map(|list| {
                    list.iter()
                        .flat_map(|addr| match addr {
                            MailAddr::Single(info) => vec![info.addr.clone()],
                            MailAddr::Group(group) => {
                                group.addrs.iter().map(|info| info.addr.clone()).collect()
                            }
                        })
                        .collect()
                })
                .unwrap_or_default(),
            None => Vec::new(),
        };

        let sent_date = mail
            .headers
            .get_header_value(HeaderDef::Date)
            .and_then(|date| mailparse::dateparse(&date).ok());

        let kind = match mail.ctype.mimetype.as_str() {
            "multipart/signed" => MessageKind::Signed,
            "multipart/encrypted" => MessageKind::Encrypted,
            _ => MessageKind::Unsigned,
        };

        let headers = mail
            .headers
            .iter()
            .map(|header| (header.get_key().to_lowercase(), header.get_value()))
            .collect();

        Ok(IncomingMessage {
            from,
            sent_date,
            internal_date,
            kind,
            headers,
        })
    }

    /// Returns the sender address if the From header names exactly one mailbox.
    pub fn get_from(&self) -> Option<&str> {
        match &self.from[..] {
            [addr] => Some(addr.as_str()),
            _ => None,
        }
    }

    pub fn get_sent_date(&self) -> Option<i64> {
        self.sent_date
    }

    pub fn get_internal_date(&self) -> i64 {
        self.internal_date
    }

    pub fn get_kind(&self) -> MessageKind {
        self.kind
    }

    /// Returns every value of the header, in message order.
    pub fn get_header_values(&self, headerdef: HeaderDef) -> Vec<&str> {
        let name = headerdef.get_headername();
        self.headers
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn has_header(&self, headerdef: HeaderDef) -> bool {
        let name = headerdef.get_headername();
        self.headers.iter().any(|(key, _)| key == name)
    }
}
