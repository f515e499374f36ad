//! Authentication credential secrets.
//!
//! A closed family of credential payloads. Password and magic-link secrets
//! authenticate with the owning account's email; provider OAuth secrets
//! point at the account held at the external provider.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FastcoError, FastcoResult};
use crate::models::base::{Entity, EntityMeta};
use crate::password;
use crate::registry::EntityKind;
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthCredentialSecret {
    #[serde(flatten)]
    pub meta: EntityMeta,
    #[serde(flatten)]
    pub secret: CredentialSecret,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum CredentialSecret {
    #[serde(rename = "PasswordCredentialSecret")]
    Password {
        /// Argon2id PHC string; plaintext is never stored.
        password_hash: String,
    },
    #[serde(rename = "MFACredentialSecret")]
    Mfa { mfa_secret: String },
    #[serde(rename = "OAuthCredentialSecret")]
    OAuth,
    #[serde(rename = "GoogleOAuthCredentialSecret")]
    GoogleOAuth { google_account_id: Uuid },
    #[serde(rename = "AppleOAuthCredentialSecret")]
    AppleOAuth { apple_account_id: Uuid },
    #[serde(rename = "FacebookOAuthCredentialSecret")]
    FacebookOAuth { facebook_account_id: Uuid },
    #[serde(rename = "TwitterOAuthCredentialSecret")]
    TwitterOAuth { twitter_account_id: Uuid },
    #[serde(rename = "EmailMagicLinkCredentialSecret")]
    EmailMagicLink,
}

impl CredentialSecret {
    pub fn kind(&self) -> EntityKind {
        match self {
            CredentialSecret::Password { .. } => EntityKind::PasswordCredentialSecret,
            CredentialSecret::Mfa { .. } => EntityKind::MfaCredentialSecret,
            CredentialSecret::OAuth => EntityKind::OAuthCredentialSecret,
            CredentialSecret::GoogleOAuth { .. } => EntityKind::GoogleOAuthCredentialSecret,
            CredentialSecret::AppleOAuth { .. } => EntityKind::AppleOAuthCredentialSecret,
            CredentialSecret::FacebookOAuth { .. } => EntityKind::FacebookOAuthCredentialSecret,
            CredentialSecret::TwitterOAuth { .. } => EntityKind::TwitterOAuthCredentialSecret,
            CredentialSecret::EmailMagicLink => EntityKind::EmailMagicLinkCredentialSecret,
        }
    }

    /// The external-provider account for provider OAuth secrets.
    pub fn provider_account_id(&self) -> Option<Uuid> {
        match self {
            CredentialSecret::GoogleOAuth { google_account_id } => Some(*google_account_id),
            CredentialSecret::AppleOAuth { apple_account_id } => Some(*apple_account_id),
            CredentialSecret::FacebookOAuth {
                facebook_account_id,
            } => Some(*facebook_account_id),
            CredentialSecret::TwitterOAuth { twitter_account_id } => Some(*twitter_account_id),
            _ => None,
        }
    }

    /// Secrets that authenticate with the owning account's email.
    pub fn uses_account_email(&self) -> bool {
        matches!(
            self,
            CredentialSecret::Password { .. } | CredentialSecret::EmailMagicLink
        )
    }
}

impl AuthCredentialSecret {
    pub fn new(secret: CredentialSecret) -> Self {
        Self {
            meta: EntityMeta::new(),
            secret,
        }
    }

    /// Build a password secret, hashing `plaintext` with Argon2id.
    pub fn password(plaintext: &str, pepper: Option<&str>) -> FastcoResult<Self> {
        let password_hash = password::hash_password(plaintext, pepper)?;
        Ok(Self::new(CredentialSecret::Password { password_hash }))
    }

    /// Check `plaintext` against a password secret.
    ///
    /// Any other secret kind never matches.
    pub fn verify_password(&self, plaintext: &str, pepper: Option<&str>) -> FastcoResult<bool> {
        match &self.secret {
            CredentialSecret::Password { password_hash } => {
                password::verify_password(plaintext, password_hash, pepper)
            }
            _ => Ok(false),
        }
    }
}

impl Entity for AuthCredentialSecret {
    const ROOT: EntityKind = EntityKind::AuthCredentialSecret;

    fn kind(&self) -> EntityKind {
        self.secret.kind()
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        let kind = self.kind();
        match &self.secret {
            CredentialSecret::Password { password_hash } => {
                if !password::is_password_hash(password_hash) {
                    return Err(FastcoError::validation(format!(
                        "{kind}.password_hash must be an Argon2 PHC hash"
                    )));
                }
                Ok(())
            }
            CredentialSecret::Mfa { mfa_secret } => {
                validation::require_text(kind, "mfa_secret", mfa_secret)
            }
            _ => Ok(()),
        }
    }
}
