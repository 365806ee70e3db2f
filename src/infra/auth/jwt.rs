//! JWT validation against a PEM-encoded public key.

use std::path::Path;

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::{debug, info};

use crate::domain::{AppError, Claims, ConfigError, TokenValidator};

/// Validates bearer tokens signed by the identity provider's private key.
///
/// The signing algorithm is fixed by the key type found in the PEM file:
/// RSA keys accept RS256, EC keys ES256 and Ed25519 keys EdDSA. Tokens
/// signed with any other algorithm are rejected.
pub struct JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtValidator")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl JwtValidator {
    /// Load the public key from `path`.
    pub async fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let pem = tokio::fs::read(path).await.map_err(|e| ConfigError::KeyFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let validator = Self::from_pem(&pem).map_err(|e| match e {
            ConfigError::KeyFile { message, .. } => ConfigError::KeyFile {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        info!(
            path = %path.display(),
            algorithms = ?validator.validation.algorithms,
            "Loaded JWT public key"
        );
        Ok(validator)
    }

    pub fn from_pem(pem: &[u8]) -> Result<Self, ConfigError> {
        let (key, algorithm) = if let Ok(key) = DecodingKey::from_rsa_pem(pem) {
            (key, Algorithm::RS256)
        } else if let Ok(key) = DecodingKey::from_ec_pem(pem) {
            (key, Algorithm::ES256)
        } else if let Ok(key) = DecodingKey::from_ed_pem(pem) {
            (key, Algorithm::EdDSA)
        } else {
            return Err(ConfigError::KeyFile {
                path: "<memory>".to_string(),
                message: "expected an RSA, EC or Ed25519 public key in PEM format".to_string(),
            });
        };

        let mut validation = Validation::new(algorithm);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self { key, validation })
    }
}

#[async_trait]
impl TokenValidator for JwtValidator {
    async fn validate(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "JWT rejected");
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "token expired",
                    ErrorKind::InvalidSignature => "invalid signature",
                    ErrorKind::InvalidAlgorithm => "unexpected signing algorithm",
                    ErrorKind::MissingRequiredClaim(_) => "missing required claim",
                    _ => "malformed token",
                };
                AppError::Authentication(reason.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TenantId;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const PUBLIC_KEY: &str = include_str!("../../../tests/fixtures/jwt_ed25519_public.pem");
    const PRIVATE_KEY: &str = include_str!("../../../tests/fixtures/jwt_ed25519_private.pem");
    const OTHER_PRIVATE_KEY: &str =
        include_str!("../../../tests/fixtures/other_ed25519_private.pem");

    fn now() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    fn sign(claims: &Claims, private_pem: &str) -> String {
        let key = EncodingKey::from_ed_pem(private_pem.as_bytes()).unwrap();
        encode(&Header::new(Algorithm::EdDSA), claims, &key).unwrap()
    }

    fn validator() -> JwtValidator {
        JwtValidator::from_pem(PUBLIC_KEY.as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_yields_claims() {
        let tenant = TenantId::random();
        let claims = Claims {
            sub: "user-1".to_string(),
            exp: now() + 600,
            tenant_id: Some(tenant),
        };
        let token = sign(&claims, PRIVATE_KEY);

        let validated = validator().validate(&token).await.unwrap();
        assert_eq!(validated, claims);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let claims = Claims {
            sub: "user-1".to_string(),
            exp: now() - 3600,
            tenant_id: None,
        };
        let token = sign(&claims, PRIVATE_KEY);

        let err = validator().validate(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(msg) if msg == "token expired"));
    }

    #[tokio::test]
    async fn test_foreign_signature_rejected() {
        let claims = Claims {
            sub: "user-1".to_string(),
            exp: now() + 600,
            tenant_id: None,
        };
        let token = sign(&claims, OTHER_PRIVATE_KEY);

        let err = validator().validate(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let err = validator().validate("not.a.jwt").await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[test]
    fn test_non_key_pem_rejected() {
        let err = JwtValidator::from_pem(b"-----BEGIN NOTHING-----\n-----END NOTHING-----\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::KeyFile { .. }));
    }

    #[tokio::test]
    async fn test_missing_key_file() {
        let err = JwtValidator::from_pem_file("/definitely/missing/key.pem")
            .await
            .unwrap_err();
        match err {
            ConfigError::KeyFile { path, .. } => assert_eq!(path, "/definitely/missing/key.pem"),
            other => panic!("Expected KeyFile error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_fixture_key_file() {
        let path = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/jwt_ed25519_public.pem"
        );
        let validator = JwtValidator::from_pem_file(path).await.unwrap();
        assert_eq!(validator.validation.algorithms, vec![Algorithm::EdDSA]);
    }
}
