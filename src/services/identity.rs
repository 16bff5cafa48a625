// src/services/identity.rs
//
// Lifecycle around the hosted member/identity service. The service's SDK is reached
// through `IdentityConnector`/`IdentityProvider`; this module only owns init,
// member state, and tearing down the auth-change subscription.
use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityConfig {
    pub public_key: String,
    pub use_cookies: bool,
    pub session_duration_days: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdentityError {
    #[error("identity service is not available")]
    NotAvailable,

    #[error("{0}")]
    Provider(String),

    /// Text to show on the login/signup form.
    #[error("{0}")]
    UserMessage(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthStatus {
    Loading,
    Ready,
    Unavailable(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_member(&self) -> Result<Option<Member>, IdentityError>;
    async fn login_email_password(&self, creds: &Credentials) -> Result<Member, IdentityError>;
    async fn signup_email_password(&self, creds: &Credentials) -> Result<Member, IdentityError>;
    async fn logout(&self) -> Result<(), IdentityError>;
    fn subscribe_auth_changes(&self) -> broadcast::Receiver<Option<Member>>;
}

/// Loads and initializes the SDK with a public key.
#[async_trait]
pub trait IdentityConnector: Send + Sync {
    async fn connect(
        &self,
        config: &IdentityConfig,
    ) -> Result<Arc<dyn IdentityProvider>, IdentityError>;
}

pub struct AuthSession {
    status: AuthStatus,
    provider: Option<Arc<dyn IdentityProvider>>,
    member: Arc<RwLock<Option<Member>>>,
    listener: Option<JoinHandle<()>>,
}

impl AuthSession {
    pub fn loading() -> Self {
        AuthSession {
            status: AuthStatus::Loading,
            provider: None,
            member: Arc::new(RwLock::new(None)),
            listener: None,
        }
    }

    pub async fn initialize(
        config: Option<IdentityConfig>,
        connector: &dyn IdentityConnector,
    ) -> Self {
        let mut session = Self::loading();

        let config = match config {
            Some(config) => config,
            None => {
                let msg = "Identity public key not found in environment variables";
                error!("{}", msg);
                session.status = AuthStatus::Unavailable(msg.to_string());
                return session;
            }
        };

        info!("Initializing identity provider");
        let provider = match connector.connect(&config).await {
            Ok(provider) => provider,
            Err(e) => {
                let msg = format!("Failed to initialize identity provider: {}", e);
                error!("{}", msg);
                session.status = AuthStatus::Unavailable(msg);
                return session;
            }
        };

        // Subscribe before the lookup so a change during it is not missed
        let mut changes = provider.subscribe_auth_changes();

        match provider.current_member().await {
            Ok(member) => {
                debug!("Current member: {}", if member.is_some() { "found" } else { "none" });
                session.set_member(member);
            }
            // Normal when nobody is logged in
            Err(e) => warn!("Error checking current member: {}", e),
        }

        let member = session.member.clone();
        session.listener = Some(tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(next) => {
                        info!("Auth change: {}", if next.is_some() { "logged in" } else { "logged out" });
                        if let Ok(mut slot) = member.write() {
                            *slot = next;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Auth listener lagged, skipped {} changes", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }));

        session.provider = Some(provider);
        session.status = AuthStatus::Ready;
        session
    }

    pub fn status(&self) -> &AuthStatus {
        &self.status
    }

    pub fn is_available(&self) -> bool {
        self.status == AuthStatus::Ready && self.provider.is_some()
    }

    pub fn member(&self) -> Option<Member> {
        self.member.read().ok().and_then(|m| m.clone())
    }

    fn set_member(&self, member: Option<Member>) {
        if let Ok(mut slot) = self.member.write() {
            *slot = member;
        }
    }

    fn provider(&self) -> Result<&Arc<dyn IdentityProvider>, IdentityError> {
        match (&self.status, &self.provider) {
            (AuthStatus::Ready, Some(provider)) => Ok(provider),
            _ => Err(IdentityError::NotAvailable),
        }
    }

    pub async fn login(&self, creds: &Credentials) -> Result<Member, IdentityError> {
        let provider = self.provider()?;
        match provider.login_email_password(creds).await {
            Ok(member) => {
                info!("Login successful");
                self.set_member(Some(member.clone()));
                Ok(member)
            }
            Err(e) => {
                error!("Login error: {}", e);
                Err(user_message(e, "Login failed. Please try again."))
            }
        }
    }

    pub async fn signup(&self, creds: &Credentials) -> Result<Member, IdentityError> {
        let provider = self.provider()?;
        match provider.signup_email_password(creds).await {
            Ok(member) => {
                info!("Signup successful");
                self.set_member(Some(member.clone()));
                Ok(member)
            }
            Err(e) => {
                error!("Signup error: {}", e);
                Err(user_message(e, "Signup failed. Please try again."))
            }
        }
    }

    pub async fn logout(&self) -> Result<(), IdentityError> {
        let provider = self.provider()?;
        provider.logout().await.map_err(|e| {
            error!("Error logging out: {}", e);
            e
        })?;
        info!("User logged out successfully");
        self.set_member(None);
        Ok(())
    }

    pub fn teardown(&mut self) {
        if let Some(listener) = self.listener.take() {
            debug!("Cleaning up auth change listener");
            listener.abort();
        }
    }
}

impl Drop for AuthSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn user_message(err: IdentityError, default: &str) -> IdentityError {
    match err {
        IdentityError::Provider(msg) | IdentityError::UserMessage(msg) if !msg.trim().is_empty() => {
            IdentityError::UserMessage(msg)
        }
        _ => IdentityError::UserMessage(default.to_string()),
    }
}
