use std::sync::Arc;

use tracing::{info, warn};

use shared_models::auth::Role;
use shared_models::user::{AuthResponse, SignupRequest, UpdateProfileRequest, UserProfile};

use crate::error::ClientError;
use crate::http::ApiClient;
use crate::keys;
use crate::services::{AuthApi, UserApi};
use crate::storage::KeyValueStore;

/// The signed-in user and token, mirrored into a [`KeyValueStore`] so a
/// restart picks up where it left off. Owned by the caller and passed
/// to whatever needs it.
pub struct Session {
    api: ApiClient,
    store: Arc<dyn KeyValueStore>,
    user: Option<UserProfile>,
}

impl Session {
    /// Picks up a persisted token and user. Half-written or unreadable
    /// state is discarded and the session starts signed out.
    pub fn restore(api: ApiClient, store: Arc<dyn KeyValueStore>) -> Result<Self, ClientError> {
        let mut session = Self {
            api,
            store,
            user: None,
        };

        let token = session.store.get(keys::AUTH_TOKEN)?;
        let user = session.store.get(keys::USER)?;

        match (token, user) {
            (Some(token), Some(raw_user)) => match serde_json::from_str::<UserProfile>(&raw_user) {
                Ok(user) => {
                    session.api.set_token(Some(token));
                    session.user = Some(user);
                }
                Err(e) => {
                    warn!("Discarding unreadable persisted user: {}", e);
                    session.clear_persisted()?;
                }
            },
            (None, None) => {}
            _ => session.clear_persisted()?,
        }

        Ok(session)
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.api.token().is_some()
    }

    fn persist(&self) -> Result<(), ClientError> {
        match (&self.user, self.api.token()) {
            (Some(user), Some(token)) => {
                self.store.set(keys::AUTH_TOKEN, &token)?;
                self.store.set(keys::USER, &serde_json::to_string(user)?)
            }
            _ => self.clear_persisted(),
        }
    }

    fn clear_persisted(&self) -> Result<(), ClientError> {
        self.store.remove(keys::AUTH_TOKEN)?;
        self.store.remove(keys::USER)
    }

    fn accept(&mut self, response: AuthResponse) -> Result<&UserProfile, ClientError> {
        self.api.set_token(Some(response.token));
        self.user = Some(response.user);
        self.persist()?;

        self.user.as_ref().ok_or(ClientError::NotAuthenticated)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&UserProfile, ClientError> {
        let response = AuthApi::new(&self.api).login(email.trim(), password).await?;
        info!("Signed in as {}", response.user.email);
        self.accept(response)
    }

    pub async fn signup(&mut self, request: &SignupRequest) -> Result<&UserProfile, ClientError> {
        let response = AuthApi::new(&self.api).signup(request).await?;
        info!("Registered {} as {}", response.user.email, response.user.role);
        self.accept(response)
    }

    /// Tokens are stateless; signing out only forgets them locally.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.api.set_token(None);
        self.user = None;
        self.clear_persisted()
    }

    pub async fn update_profile(&mut self, request: &UpdateProfileRequest) -> Result<&UserProfile, ClientError> {
        if !self.is_authenticated() {
            return Err(ClientError::NotAuthenticated);
        }

        let updated = UserApi::new(&self.api).update_profile(request).await?;
        self.user = Some(updated);
        self.persist()?;

        self.user.as_ref().ok_or(ClientError::NotAuthenticated)
    }

    /// Re-reads the profile from the server; signs out if the token is no longer accepted.
    pub async fn refresh(&mut self) -> Result<Option<&UserProfile>, ClientError> {
        if self.api.token().is_none() {
            return Ok(None);
        }

        match AuthApi::new(&self.api).me().await {
            Ok(user) => {
                self.user = Some(user);
                self.persist()?;
                Ok(self.user.as_ref())
            }
            Err(ClientError::Api { status: 401, .. }) => {
                warn!("Stored token rejected, signing out");
                self.logout()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
