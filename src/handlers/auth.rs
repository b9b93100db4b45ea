// src/handlers/auth.rs
// DOCUMENTATION: Login gate for the search surface
// PURPOSE: Check operator credentials and hand out the access token

use crate::config::Config;
use crate::errors::LeadError;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

/// Request body for the login endpoint
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response on successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Token the client must send as X-Access-Token on gated endpoints
    pub access_token: String,
}

/// POST /auth/login
/// Check credentials against the configured pair
///
/// DOCUMENTATION: Gated revisions require this before any search; when no
/// credentials are configured the endpoint reports gating as disabled
pub async fn login(
    config: web::Data<Config>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, LeadError> {
    if !config.gated() {
        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "authentication is not enabled on this instance"
        })));
    }

    if body.username != config.auth_username || body.password != config.auth_password {
        log::warn!("Failed login attempt for user {:?}", body.username);
        return Err(LeadError::Unauthorized);
    }

    log::info!("User {:?} logged in", body.username);

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token: config.access_token.clone(),
    }))
}

/// Helper used by gated handlers to verify the access token
/// DOCUMENTATION: Checks X-Access-Token against the configured token;
/// a no-op when gating is disabled
pub fn verify_access_token(req: &HttpRequest, config: &Config) -> Result<(), LeadError> {
    if !config.gated() {
        return Ok(());
    }

    let token = req
        .headers()
        .get("X-Access-Token")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Gated request without access token");
            LeadError::Unauthorized
        })?;

    if token != config.access_token {
        log::warn!("Gated request with invalid access token");
        return Err(LeadError::Forbidden);
    }

    Ok(())
}

/// Configuration for auth routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").route("/login", web::post().to(login)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn gated_config() -> Config {
        Config {
            server_address: "127.0.0.1".to_string(),
            server_port: 8002,
            environment: "test".to_string(),
            log_level: "info".to_string(),
            places_api_key: "key".to_string(),
            places_base_url: None,
            translate_base_url: None,
            auth_username: "operator".to_string(),
            auth_password: "secret".to_string(),
            access_token: "token-123".to_string(),
        }
    }

    #[test]
    fn test_verify_access_token_ungated_passes() {
        let mut config = gated_config();
        config.auth_username = String::new();

        let req = TestRequest::default().to_http_request();
        assert!(verify_access_token(&req, &config).is_ok());
    }

    #[test]
    fn test_verify_access_token_missing_header() {
        let config = gated_config();
        let req = TestRequest::default().to_http_request();

        assert!(matches!(
            verify_access_token(&req, &config),
            Err(LeadError::Unauthorized)
        ));
    }

    #[test]
    fn test_verify_access_token_wrong_token() {
        let config = gated_config();
        let req = TestRequest::default()
            .insert_header(("X-Access-Token", "wrong"))
            .to_http_request();

        assert!(matches!(
            verify_access_token(&req, &config),
            Err(LeadError::Forbidden)
        ));
    }

    #[test]
    fn test_verify_access_token_valid() {
        let config = gated_config();
        let req = TestRequest::default()
            .insert_header(("X-Access-Token", "token-123"))
            .to_http_request();

        assert!(verify_access_token(&req, &config).is_ok());
    }
}
