use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::{JwtClaims, User};

type HmacSha256 = Hmac<Sha256>;

fn keyed_mac(signing_input: &str, jwt_secret: &str) -> Result<HmacSha256, String> {
    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    Ok(mac)
}

/// Issues an HS256 token for `user_id` valid for `ttl_hours`.
pub fn issue_token(
    user_id: &str,
    email: &str,
    role: &str,
    jwt_secret: &str,
    ttl_hours: i64,
) -> Result<String, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let now = Utc::now();
    let exp = now + Duration::hours(ttl_hours);

    let header = json!({ "alg": "HS256", "typ": "JWT" });
    let claims = json!({
        "sub": user_id,
        "email": email,
        "role": role,
        "iat": now.timestamp(),
        "exp": exp.timestamp(),
    });

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    );
    let signature = keyed_mac(&signing_input, jwt_secret)?.finalize().into_bytes();

    debug!("Issued token for user: {}", user_id);
    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

/// Checks signature and expiry, then maps the claims onto a [`User`].
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let mut segments = token.split('.');
    let (header_b64, claims_b64, signature_b64) =
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(h), Some(c), Some(s), None) => (h, c, s),
            _ => return Err("Invalid token format".to_string()),
        };

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Undecodable token signature: {}", e);
        "Invalid signature encoding".to_string()
    })?;

    keyed_mac(&format!("{}.{}", header_b64, claims_b64), jwt_secret)?
        .verify_slice(&signature)
        .map_err(|_| {
            debug!("Token signature mismatch");
            "Invalid token signature".to_string()
        })?;

    let claims: JwtClaims = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| "Invalid claims encoding".to_string())
        .and_then(|bytes| {
            serde_json::from_slice(&bytes).map_err(|e| {
                debug!("Unparseable token claims: {}", e);
                "Invalid claims format".to_string()
            })
        })?;

    let now = Utc::now().timestamp();
    if matches!(claims.exp, Some(exp) if (exp as i64) < now) {
        return Err("Token expired".to_string());
    }

    Ok(User {
        created_at: claims.iat.and_then(|iat| Utc.timestamp_opt(iat as i64, 0).single()),
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    })
}
