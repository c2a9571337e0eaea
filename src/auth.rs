//! Authentication capability interface.
//!
//! The email-verification gate and the social display-name recovery path go
//! through this trait. Which implementation runs is a startup configuration
//! choice ([`AuthMode`](crate::config::AuthMode)), never a compile-time
//! conditional: `DisabledAuth` is the null provider for builds shipping
//! without an auth backend, `SimulatedAuth` is the settable provider for
//! development and tests.

use std::sync::RwLock;

use async_trait::async_trait;

/// Capability set the onboarding core needs from an auth backend.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Whether a user is signed in at all.
    async fn is_authenticated(&self) -> bool;

    /// Whether the signed-in user's email address is verified.
    ///
    /// Gates the `EmailConfirmation` step; the null provider always passes,
    /// which keeps that step skipped while authentication is disabled.
    async fn is_email_verified(&self) -> bool;

    /// Display name asserted by a verified social provider, if any.
    ///
    /// Used to recover the name gate when the stored profile name is empty
    /// (e.g. social sign-in before the name step ever ran).
    async fn verified_display_name(&self) -> Option<String>;
}

/// Null provider for builds with authentication disabled: behaves as a
/// signed-in user with a verified email and no social display name.
pub struct DisabledAuth;

#[async_trait]
impl AuthProvider for DisabledAuth {
    async fn is_authenticated(&self) -> bool {
        true
    }

    async fn is_email_verified(&self) -> bool {
        true
    }

    async fn verified_display_name(&self) -> Option<String> {
        None
    }
}

#[derive(Default)]
struct SimulatedState {
    authenticated: bool,
    email_verified: bool,
    display_name: Option<String>,
}

/// Settable provider for development and tests.
#[derive(Default)]
pub struct SimulatedAuth {
    state: RwLock<SimulatedState>,
}

impl SimulatedAuth {
    /// A signed-out provider.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// A signed-in provider with a verified email.
    pub fn signed_in() -> Self {
        let auth = Self::default();
        auth.set_authenticated(true);
        auth.set_email_verified(true);
        auth
    }

    pub fn set_authenticated(&self, value: bool) {
        if let Ok(mut state) = self.state.write() {
            state.authenticated = value;
        }
    }

    pub fn set_email_verified(&self, value: bool) {
        if let Ok(mut state) = self.state.write() {
            state.email_verified = value;
        }
    }

    pub fn set_display_name(&self, name: Option<String>) {
        if let Ok(mut state) = self.state.write() {
            state.display_name = name;
        }
    }
}

#[async_trait]
impl AuthProvider for SimulatedAuth {
    async fn is_authenticated(&self) -> bool {
        self.state.read().map(|s| s.authenticated).unwrap_or(false)
    }

    async fn is_email_verified(&self) -> bool {
        self.state.read().map(|s| s.email_verified).unwrap_or(false)
    }

    async fn verified_display_name(&self) -> Option<String> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.display_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_auth_always_passes() {
        let auth = DisabledAuth;
        assert!(auth.is_authenticated().await);
        assert!(auth.is_email_verified().await);
        assert!(auth.verified_display_name().await.is_none());
    }

    #[tokio::test]
    async fn simulated_auth_is_settable() {
        let auth = SimulatedAuth::signed_out();
        assert!(!auth.is_authenticated().await);
        assert!(!auth.is_email_verified().await);

        auth.set_authenticated(true);
        auth.set_email_verified(true);
        auth.set_display_name(Some("Jo Smith".to_string()));

        assert!(auth.is_authenticated().await);
        assert!(auth.is_email_verified().await);
        assert_eq!(
            auth.verified_display_name().await.as_deref(),
            Some("Jo Smith")
        );
    }
}
