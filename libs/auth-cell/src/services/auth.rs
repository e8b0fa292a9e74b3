use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;
use serde_json::json;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::store::{eq, StoreClient};
use shared_models::auth::Role;
use shared_models::user::{AuthResponse, LoginRequest, SignupRequest, UserProfile};
use shared_utils::jwt::issue_token;

use crate::models::{AuthError, StoredCredentials};
use crate::services::password::PasswordService;

const USERS: &str = "users";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
    })
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_signup(request: &SignupRequest) -> Result<(), AuthError> {
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(AuthError::Validation("First and last name are required".to_string()));
    }
    if !email_regex().is_match(request.email.trim()) {
        return Err(AuthError::Validation("A valid email address is required".to_string()));
    }
    PasswordService::check_strength(&request.password).map_err(AuthError::Validation)?;

    match request.role {
        Role::Doctor => {
            let missing = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
            if missing(&request.specialty) || missing(&request.license_number) {
                return Err(AuthError::Validation(
                    "Doctors must provide a specialty and license number".to_string(),
                ));
            }
        }
        Role::Admin => {
            return Err(AuthError::Validation("Admin accounts cannot be created via signup".to_string()));
        }
        Role::Patient => {}
    }
    Ok(())
}

pub struct AuthService {
    store: StoreClient,
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
            jwt_secret: config.jwt_secret.clone(),
            token_ttl_hours: config.token_ttl_hours,
        }
    }

    fn token_for(&self, profile: &UserProfile) -> Result<String, AuthError> {
        issue_token(
            &profile.id.to_string(),
            &profile.email,
            &profile.role.to_string(),
            &self.jwt_secret,
            self.token_ttl_hours,
        )
        .map_err(AuthError::Token)
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse, AuthError> {
        validate_signup(&request)?;
        let email = normalize_email(&request.email);
        debug!("Signing up new {} account: {}", request.role, email);

        if self.store.select_one(USERS, &eq("email", &email)).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = PasswordService::hash_password(&request.password)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let now = Utc::now().to_rfc3339();
        let mut row = json!({
            "first_name": request.first_name.trim(),
            "last_name": request.last_name.trim(),
            "email": email,
            "phone": request.phone,
            "role": request.role,
            "password_hash": password_hash,
            "profile_picture": null,
            "availability": [],
            "created_at": now,
            "updated_at": now,
        });

        if request.role == Role::Doctor {
            row["specialty"] = json!(request.specialty);
            row["license_number"] = json!(request.license_number);
            row["years_of_experience"] = json!(request.years_of_experience);
            row["medical_school"] = json!(request.medical_school);
            row["rating"] = json!(0.0);
            row["review_count"] = json!(0);
            // Doctors start unverified until an administrator reviews the license.
            row["is_verified"] = json!(false);
        }

        let stored = self.store.insert(USERS, row).await?;
        let user: UserProfile = serde_json::from_value(stored)
            .map_err(|e| AuthError::Database(format!("Failed to decode user: {}", e)))?;

        let token = self.token_for(&user)?;
        info!("Created {} account {}", user.role, user.id);

        Ok(AuthResponse { token, user })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&request.email);
        debug!("Login attempt for {}", email);

        let row = match self.store.select_one(USERS, &eq("email", &email)).await? {
            Some(row) => row,
            None => {
                warn!("Login for unknown email {}", email);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let credentials: StoredCredentials = serde_json::from_value(row.clone())
            .map_err(|e| AuthError::Database(format!("Failed to decode credentials: {}", e)))?;

        let matches = PasswordService::verify_password(&request.password, &credentials.password_hash)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if !matches {
            warn!("Wrong password for user {}", credentials.id);
            return Err(AuthError::InvalidCredentials);
        }

        let user: UserProfile = serde_json::from_value(row)
            .map_err(|e| AuthError::Database(format!("Failed to decode user: {}", e)))?;
        let token = self.token_for(&user)?;

        debug!("User {} ({}) logged in as {}", user.id, credentials.email, credentials.role);
        Ok(AuthResponse { token, user })
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, AuthError> {
        let row = self
            .store
            .select_one(USERS, &eq("id", user_id))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        serde_json::from_value(row).map_err(|e| AuthError::Database(format!("Failed to decode user: {}", e)))
    }
}
