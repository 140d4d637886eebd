use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use launchpad_shared::User;

use crate::{repository::UserStore, CoreResult};

/// Encodes an email into a login token.
///
/// The token is a reversible, unsigned encoding. It identifies a caller but
/// proves nothing about them.
pub fn encode_token(email: &str) -> String {
    BASE64.encode(email.as_bytes())
}

/// Decodes a token produced by [`encode_token`]. Accepts an optional
/// `Bearer ` prefix. Returns `None` for anything that is not valid base64
/// over UTF-8.
pub fn decode_token(credential: &str) -> Option<String> {
    let token = credential.trim();
    let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
    if token.is_empty() {
        return None;
    }
    let bytes = BASE64.decode(token).ok()?;
    String::from_utf8(bytes).ok()
}

/// Syntactic plausibility check for an email address.
pub fn is_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 || domain.contains('@') || domain.len() > 255 {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Turns a bearer credential into a user, creating the user on first contact.
#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserStore>,
}

impl IdentityResolver {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Missing or malformed credentials resolve to `Ok(None)`; only store
    /// failures are errors.
    pub async fn resolve(&self, credential: Option<&str>) -> CoreResult<Option<User>> {
        let Some(email) = credential.and_then(decode_token) else {
            return Ok(None);
        };
        self.find_or_create(&email).await
    }

    pub async fn find_or_create(&self, email: &str) -> CoreResult<Option<User>> {
        if !is_email(email) {
            tracing::debug!("Rejected credential: not an email address");
            return Ok(None);
        }
        let user = self.users.find_or_create(email).await?;
        Ok(Some(user))
    }
}
