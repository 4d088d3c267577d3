use serde::{Deserialize, Serialize};

/// The request body for the login endpoint. The event uses a single shared
/// admin password, there are no per-user accounts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// The claims carried by an admin token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Always `true` for a token issued by the login endpoint.
    pub is_authenticated: bool,
    /// Whether the token grants write access.
    pub is_admin: bool,
    /// Issued at
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Not before time
    pub nbf: u64,
}

impl Claims {
    pub fn new(is_admin: bool) -> Self {
        Self {
            is_authenticated: true,
            is_admin,
            iat: 0,
            exp: 0,
            nbf: 0,
        }
    }
}

/// An encoded JWT.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Token {
    token: String,
}

impl Token {
    pub fn new<T>(token: T) -> Self
    where
        T: ToString,
    {
        Self {
            token: token.to_string(),
        }
    }

    /// Returns the encoded token string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Decodes the claims of the token without verifying its signature.
    ///
    /// This is only useful for displaying token contents; whether the token
    /// is actually valid can only be decided by the issuing server.
    pub fn claims(&self) -> Result<Claims, TokenError> {
        let claims = self.token.split('.').nth(1).ok_or(TokenError::Malformed)?;

        let claims = base64::decode_config(claims, base64::URL_SAFE_NO_PAD)?;

        Ok(serde_json::from_slice(&claims)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("json decode error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::{Claims, Token};

    #[test]
    fn test_token_claims() {
        let claims = Claims {
            is_authenticated: true,
            is_admin: true,
            iat: 1,
            exp: 3,
            nbf: 2,
        };

        let payload =
            base64::encode_config(serde_json::to_vec(&claims).unwrap(), base64::URL_SAFE_NO_PAD);
        let token = Token::new(format!("head.{}.sig", payload));

        assert_eq!(token.claims().unwrap(), claims);
    }

    #[test]
    fn test_token_claims_malformed() {
        let token = Token::new("garbage");
        assert!(token.claims().is_err());
    }
}
