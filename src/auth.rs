//! Bearer token seam.
//!
//! The booking core never looks tokens up from ambient state. Whoever owns
//! authentication hands a [`TokenProvider`] to the submitter and API client.

use std::sync::{PoisonError, RwLock};

/// Source of the bearer token attached to reservation-mutating calls.
pub trait TokenProvider: Send + Sync {
    /// Current token, or `None` when the user is signed out.
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token, e.g. from `MESA_TOKEN`.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl From<Option<String>> for StaticToken {
    fn from(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.is_empty()))
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// A token that can be replaced after sign-in or cleared on sign-out.
#[derive(Debug, Default)]
pub struct SessionToken {
    inner: RwLock<Option<String>>,
}

impl SessionToken {
    pub fn set(&self, token: impl Into<String>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl TokenProvider for SessionToken {
    fn bearer_token(&self) -> Option<String> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
