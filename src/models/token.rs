use std::{fmt::Display, str::FromStr};

use lazy_regex::regex_is_match;
use thiserror::Error;
use uuid::Uuid;

/// Public, unguessable reference to a submission.
///
/// Always 32 lowercase hex characters. Parsing rejects anything else, so a
/// malformed path segment never reaches the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token(String);

#[derive(Debug, Error)]
#[error("Invalid token: `{0}`")]
pub struct InvalidToken(pub String);

impl Token {
    pub fn generate() -> Token {
        Token(Uuid::new_v4().simple().to_string())
    }

    /// File name of the QR code generated for this token.
    pub fn qr_filename(&self) -> String {
        format!("qr_{}.png", self.0)
    }
}

impl FromStr for Token {
    type Err = InvalidToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if regex_is_match!(r"^[0-9a-f]{32}$", s) {
            Ok(Token(s.to_owned()))
        } else {
            Err(InvalidToken(s.escape_default().to_string()))
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
