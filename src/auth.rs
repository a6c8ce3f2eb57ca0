//! Identity and session provider.
//!
//! The rest of the application treats identity as opaque: sign up, sign in,
//! sign out, current session, and a subscription for auth-state changes.
//! The in-memory implementation backs the demo deployment; swapping in a
//! hosted provider only means another `IdentityProvider` impl.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("An account with this email already exists")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Email and password are required")]
    MissingCredentials,
}

/// Current authentication state, broadcast to subscribers on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    SignedIn { email: String },
    SignedOut,
}

/// A live session: the bearer token handed to the client and the account
/// it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub email: String,
}

/// Opaque identity seam. Implementations are synchronous; handlers call
/// them directly from async context since no I/O is involved.
pub trait IdentityProvider: Send + Sync {
    fn sign_up(&self, email: &str, password: &str) -> Result<Session, IdentityError>;
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError>;
    fn sign_out(&self, token: &str);
    /// Resolve a bearer token to its session, if still live.
    fn session(&self, token: &str) -> Option<Session>;
    fn subscribe(&self) -> watch::Receiver<AuthState>;
}

/// Hash a password using SHA-256.
fn hash_password(password: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[derive(Default)]
struct IdentityStore {
    // email -> password hash
    accounts: HashMap<String, [u8; 32]>,
    // token -> email
    sessions: HashMap<String, String>,
}

/// In-memory identity provider. State lives for the process lifetime.
pub struct InMemoryIdentity {
    store: Mutex<IdentityStore>,
    state_tx: watch::Sender<AuthState>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(AuthState::SignedOut);
        Self {
            store: Mutex::new(IdentityStore::default()),
            state_tx,
        }
    }

    fn open_session(&self, store: &mut IdentityStore, email: &str) -> Session {
        let token = generate_token();
        store.sessions.insert(token.clone(), email.to_string());
        self.state_tx.send_replace(AuthState::SignedIn {
            email: email.to_string(),
        });
        Session {
            token,
            email: email.to_string(),
        }
    }
}

impl Default for InMemoryIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for InMemoryIdentity {
    fn sign_up(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(IdentityError::MissingCredentials);
        }

        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        if store.accounts.contains_key(&email) {
            return Err(IdentityError::EmailTaken);
        }
        store.accounts.insert(email.clone(), hash_password(password));

        tracing::info!(email = %email, "account created");
        Ok(self.open_session(&mut store, &email))
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(IdentityError::MissingCredentials);
        }

        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        match store.accounts.get(&email) {
            Some(stored) if *stored == hash_password(password) => {
                tracing::info!(email = %email, "signed in");
                Ok(self.open_session(&mut store, &email))
            }
            _ => Err(IdentityError::InvalidCredentials),
        }
    }

    fn sign_out(&self, token: &str) {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(email) = store.sessions.remove(token) {
            tracing::info!(email = %email, "signed out");
        }
        if store.sessions.is_empty() {
            self.state_tx.send_replace(AuthState::SignedOut);
        }
    }

    fn session(&self, token: &str) -> Option<Session> {
        let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.sessions.get(token).map(|email| Session {
            token: token.to_string(),
            email: email.clone(),
        })
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }
}
