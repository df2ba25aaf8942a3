//! HS256 JSON Web Token adapter for the `TokenIssuer` port.
//!
//! Tokens are signed and verified with the same configured secret. Expiry is
//! checked without leeway so a token is rejected as soon as `exp` passes.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::domain::TokenClaims;
use crate::domain::ports::{TokenError, TokenIssuer};

/// Token issuer backed by a shared HMAC secret.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenIssuer {
    /// Sign and verify HS256 tokens with `secret`. Expiry has no leeway.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let key = secret.as_ref();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| TokenError::invalid(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{Role, UserId};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[fixture]
    fn issuer() -> JwtTokenIssuer {
        JwtTokenIssuer::new(SECRET)
    }

    #[rstest]
    fn issued_token_verifies_with_same_secret(issuer: JwtTokenIssuer) {
        let claims = TokenClaims::new(UserId::random(), Role::Customer, Utc::now());

        let token = issuer.issue(&claims).expect("signed");
        let verified = issuer.verify(&token).expect("verified");

        assert_eq!(verified, claims);
    }

    #[rstest]
    fn token_from_another_secret_is_rejected(issuer: JwtTokenIssuer) {
        let other = JwtTokenIssuer::new("fedcba9876543210fedcba9876543210");
        let claims = TokenClaims::new(UserId::random(), Role::Admin, Utc::now());
        let token = other.issue(&claims).expect("signed");

        let error = issuer.verify(&token).expect_err("wrong secret");

        assert!(matches!(error, TokenError::Invalid { .. }));
    }

    #[rstest]
    #[case(Duration::hours(73))]
    #[case(Duration::hours(72) + Duration::seconds(5))]
    fn expired_token_is_rejected(issuer: JwtTokenIssuer, #[case] age: Duration) {
        let claims = TokenClaims::new(UserId::random(), Role::Customer, Utc::now() - age);
        let token = issuer.issue(&claims).expect("signed");

        assert!(issuer.verify(&token).is_err());
    }

    #[rstest]
    #[case("")]
    #[case("not-a-token")]
    #[case("a.b.c")]
    fn malformed_token_is_rejected(issuer: JwtTokenIssuer, #[case] token: &str) {
        assert!(matches!(
            issuer.verify(token),
            Err(TokenError::Invalid { .. })
        ));
    }
}
