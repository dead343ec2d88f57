//! Turns a decrypted credential into the headers or query parameters a
//! request needs. Decryption failures degrade to an unauthenticated
//! request; only the error kind is ever surfaced.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use volley_core::{AuthKind, Credential};
use volley_store::{CredentialStore, SecretMap};

use crate::executor::events::{Event, EventSink};

pub struct CredentialAdapter<'a> {
    store: &'a dyn CredentialStore,
    events: &'a dyn EventSink,
}

impl<'a> CredentialAdapter<'a> {
    pub fn new(store: &'a dyn CredentialStore, events: &'a dyn EventSink) -> Self {
        Self { store, events }
    }

    /// Headers to inject for this credential. Query-style and absent
    /// credentials contribute nothing here.
    pub async fn build_headers(
        &self,
        credential: Option<&Credential>,
    ) -> BTreeMap<String, String> {
        let Some(credential) = credential else {
            return BTreeMap::new();
        };
        if matches!(credential.auth_kind, AuthKind::None | AuthKind::ApiKeyQuery) {
            return BTreeMap::new();
        }
        let Some(secret) = self.decrypt(credential).await else {
            return BTreeMap::new();
        };

        let mut headers = BTreeMap::new();
        match credential.auth_kind {
            AuthKind::Bearer => {
                let name = header_name(credential, "Authorization");
                let prefix = header_prefix(credential, "Bearer");
                let token = secret.get_or("token", "");
                headers.insert(name, prefixed(&prefix, token));
            }
            AuthKind::Basic => {
                let username = secret.get_or("username", "");
                let password = secret.get_or("password", "");
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                headers.insert("Authorization".to_string(), format!("Basic {encoded}"));
            }
            AuthKind::ApiKey | AuthKind::ApiKeyHeader => {
                let name = secret.get_or("key_name", "X-API-Key").to_string();
                let key = secret.get_or("api_key", "").to_string();
                headers.insert(name, key);
            }
            AuthKind::Oauth2 => {
                let token = secret.get_or("access_token", "");
                headers.insert("Authorization".to_string(), format!("Bearer {token}"));
            }
            AuthKind::Custom => {
                let name = header_name(credential, "Authorization");
                let prefix = credential
                    .header_prefix
                    .as_deref()
                    .unwrap_or("")
                    .to_string();
                let token = secret.get_or("token", "");
                headers.insert(name, prefixed(&prefix, token));
            }
            AuthKind::None | AuthKind::ApiKeyQuery => unreachable!("handled above"),
        }
        headers
    }

    /// Query parameters to inject. Only `api_key_query` credentials
    /// produce any.
    pub async fn build_query_params(
        &self,
        credential: Option<&Credential>,
    ) -> BTreeMap<String, String> {
        let Some(credential) = credential else {
            return BTreeMap::new();
        };
        if credential.auth_kind != AuthKind::ApiKeyQuery {
            return BTreeMap::new();
        }
        let Some(secret) = self.decrypt(credential).await else {
            return BTreeMap::new();
        };
        let mut params = BTreeMap::new();
        params.insert(
            secret.get_or("key_name", "api_key").to_string(),
            secret.get_or("api_key", "").to_string(),
        );
        params
    }

    async fn decrypt(&self, credential: &Credential) -> Option<SecretMap> {
        match self.store.decrypt(credential).await {
            Ok(secret) => Some(secret),
            Err(e) => {
                self.events
                    .emit(Event::CredentialDecryptFailed {
                        credential_id: credential.id,
                        kind: e.kind(),
                    })
                    .await;
                None
            }
        }
    }
}

fn header_name(credential: &Credential, default: &str) -> String {
    credential
        .header_name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn header_prefix(credential: &Credential, default: &str) -> String {
    credential
        .header_prefix
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn prefixed(prefix: &str, token: &str) -> String {
    format!("{prefix} {token}").trim().to_string()
}
