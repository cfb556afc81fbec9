//! Per-service access tokens.

use soundbyte_core::ServiceType;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// Holds the access token of every connected service.
///
/// The login flow writes here; everything else only reads. Reads are
/// synchronous so callers can gate work on `is_connected` before any
/// network call.
#[derive(Debug, Default)]
pub struct CredentialStore {
    tokens: RwLock<HashMap<ServiceType, String>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already connected to one service.
    pub fn with_token(service: ServiceType, token: impl Into<String>) -> Self {
        let store = Self::new();
        store.connect(service, token);
        store
    }

    /// Store a token obtained by the login flow.
    pub fn connect(&self, service: ServiceType, token: impl Into<String>) {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        tokens.insert(service, token.into());
        info!(service = %service, "Account connected");
    }

    /// Forget the token for a service (logout).
    pub fn disconnect(&self, service: ServiceType) {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        if tokens.remove(&service).is_some() {
            info!(service = %service, "Account disconnected");
        }
    }

    pub fn is_connected(&self, service: ServiceType) -> bool {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&service)
    }

    pub fn token(&self, service: ServiceType) -> Option<String> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&service)
            .cloned()
    }
}
