//! Bearer credentials attached to outgoing calls.

use std::fmt;

/// Supplies the bearer token for each call.
///
/// Called once per request, so implementations may rotate tokens.
/// Returning `None` sends the call without an `Authorization` header.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_token() {
        let token = StaticToken::new("s3cret");
        assert_eq!(token.bearer_token().as_deref(), Some("s3cret"));
        assert!(!format!("{token:?}").contains("s3cret"));
    }
}
