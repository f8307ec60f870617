//! # List of email headers.

use mailparse::{MailHeader, MailHeaderMap};
use strum_macros::{Display, IntoStaticStr};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "kebab_case")]
pub enum HeaderDef {
    From_,
    Date,

    /// Inline key announcement carrying `type`, `to` and `key` parameters.
    Inbome,

    /// Older convention: the whole value is a base64 encoded public key.
    #[strum(serialize = "openpgp")]
    OpenPgp,
}

impl HeaderDef {
    /// Returns the header name as used in a message.
    pub fn get_headername(&self) -> &'static str {
        self.into()
    }
}

pub trait HeaderDefMap {
    /// Returns requested header value if it exists.
    fn get_header_value(&self, headerdef: HeaderDef) -> Option<String>;

    /// Returns requested header if it exists.
    fn get_header(&self, headerdef: HeaderDef) -> Option<&MailHeader>;
}

impl HeaderDefMap for [MailHeader<'_>] {
    fn get_header_value(&self, headerdef: HeaderDef) -> Option<String> {
        self.get_first_value(headerdef.get_headername())
    }

    fn get_header(&self, headerdef: HeaderDef) -> Option<&MailHeader> {
        self.get_first_header(headerdef.get_headername())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Test that kebab_case serialization works as expected
    fn kebab_test() {
        assert_eq!(HeaderDef::From_.get_headername(), "from");
        assert_eq!(HeaderDef::Date.get_headername(), "date");
        assert_eq!(HeaderDef::Inbome.get_headername(), "inbome");
        assert_eq!(HeaderDef::OpenPgp.get_headername(), "openpgp");
    }

    #[test]
    /// Test that headers are found case-insensitively, first one wins
    fn test_get_header_value() {
        let (headers, _) = mailparse::parse_headers(
            b"From: a@example.org\r\nINBOME: to=a@example.org\r\nInbome: to=b@example.org\r\n\r\n",
        )
        .unwrap();

        assert_eq!(
            headers.get_header_value(HeaderDef::Inbome),
            Some("to=a@example.org".to_string())
        );
        assert_eq!(
            headers.get_header_value(HeaderDef::From_),
            Some("a@example.org".to_string())
        );
        assert!(headers.get_header(HeaderDef::OpenPgp).is_none());
    }
}
