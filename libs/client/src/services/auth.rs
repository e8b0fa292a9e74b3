use serde::Deserialize;

use shared_models::user::{AuthResponse, LoginRequest, SignupRequest, UserProfile};

use crate::error::ClientError;
use crate::http::ApiClient;

#[derive(Deserialize)]
struct VerifyResponse {
    valid: bool,
}

#[derive(Debug, Clone)]
pub struct AuthApi {
    api: ApiClient,
}

impl AuthApi {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ClientError> {
        self.api.post("/auth/signup", request).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.api.post("/auth/login", &request).await
    }

    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        self.api.get("/auth/me").await
    }

    /// `false` for an expired or rejected token rather than an error.
    pub async fn verify(&self) -> Result<bool, ClientError> {
        match self.api.post::<_, VerifyResponse>("/auth/verify", &serde_json::json!({})).await {
            Ok(resp) => Ok(resp.valid),
            Err(ClientError::Api { status: 401, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
