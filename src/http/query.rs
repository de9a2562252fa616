//! Query-string assembly from `key=value` tokens.

use crate::error::{ClientError, Result};

/// A query string ready to append to a request path: empty, or `?k=v&...`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString(String);

impl QueryString {
    /// Join tokens with `&` behind a leading `?`. Every token must contain `=`.
    pub fn from_pairs<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let mut query = String::new();
        for (i, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            if !token.contains('=') {
                return Err(ClientError::InvalidParam(token.to_string()));
            }
            query.push(if i == 0 { '?' } else { '&' });
            query.push_str(token);
        }
        Ok(Self(query))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs() {
        let query = QueryString::from_pairs(&["a=1", "b=two", "c="]).unwrap();
        assert_eq!(query.as_str(), "?a=1&b=two&c=");

        let empty = QueryString::from_pairs::<&str>(&[]).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_rejects_token_without_equals() {
        let err = QueryString::from_pairs(&["a=1", "oops"]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidParam(t) if t == "oops"));
    }
}
