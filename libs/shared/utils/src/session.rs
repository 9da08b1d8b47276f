use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{AdminSession, SessionClaims};

type HmacSha256 = Hmac<Sha256>;

/// Issue a signed session token for a staff user. Tokens carry an explicit
/// issue and expiry timestamp; there is no server-side session table, so
/// invalidation is expiry plus client-side discard.
pub fn issue_token(
    user_id: &str,
    username: &str,
    role: &str,
    doctor_id: Option<Uuid>,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, String> {
    if secret.is_empty() {
        return Err("Session secret is not set".to_string());
    }

    let now = Utc::now();
    let claims = SessionClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role: role.to_string(),
        doctor_id,
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    let header_b64 = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let claims_json = serde_json::to_string(&claims)
        .map_err(|e| format!("Failed to encode claims: {}", e))?;
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims_json);

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature_b64))
}

/// Validate a session token and return the staff identity it names.
/// Signature and expiry are both checked; either failure rejects the token.
pub fn validate_token(token: &str, secret: &str) -> Result<AdminSession, String> {
    if secret.is_empty() {
        return Err("Session secret is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };

    mac.update(signing_input.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: SessionClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        },
    };

    let now = Utc::now().timestamp();
    if claims.exp < now {
        debug!("Session expired at {} (now: {})", claims.exp, now);
        return Err("Session expired".to_string());
    }

    let expires_at = Utc.timestamp_opt(claims.exp, 0)
        .single()
        .ok_or_else(|| "Invalid expiry timestamp".to_string())?;

    let session = AdminSession {
        user_id: claims.sub,
        username: claims.username,
        role: claims.role,
        doctor_id: claims.doctor_id,
        expires_at,
    };

    debug!("Session validated for user: {}", session.user_id);
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-session-signing-must-be-long-enough";

    #[test]
    fn issued_token_round_trips() {
        let token = issue_token("user-1", "reception", "admin", None, SECRET, 12)
            .expect("token should be issued");

        let session = validate_token(&token, SECRET).expect("token should validate");
        assert_eq!(session.user_id, "user-1");
        assert_eq!(session.username, "reception");
        assert_eq!(session.role, "admin");
        assert!(session.doctor_id.is_none());
    }

    #[test]
    fn doctor_id_claim_survives_round_trip() {
        let doctor_id = Uuid::new_v4();
        let token = issue_token("user-2", "drhouse", "doctor", Some(doctor_id), SECRET, 1)
            .expect("token should be issued");

        let session = validate_token(&token, SECRET).expect("token should validate");
        assert_eq!(session.doctor_id, Some(doctor_id));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token("user-1", "reception", "admin", None, SECRET, -1)
            .expect("token should be issued");

        let err = validate_token(&token, SECRET).unwrap_err();
        assert_eq!(err, "Session expired");
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let token = issue_token("user-1", "reception", "admin", None, SECRET, 12)
            .expect("token should be issued");

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
        parts[2] = forged;
        let tampered = parts.join(".");

        assert!(validate_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token("user-1", "reception", "admin", None, SECRET, 12)
            .expect("token should be issued");

        assert!(validate_token(&token, "a-different-secret-entirely-and-long").is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(validate_token("not-a-token", SECRET).is_err());
        assert!(validate_token("a.b", SECRET).is_err());
    }
}
