use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::auth::{generate_session_token, validate_session_token, Claims};
use crate::config::SessionConfig;
use crate::database::models::{Flash, Session, User};
use crate::database::{DatabaseError, SessionStore, UserStore};
use crate::error::AppError;
use crate::state::AppState;

use super::response::{AuthChange, SessionEffects};

/// Everything a handler may know about the caller, resolved once per request
/// from the session cookie.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub session_id: Uuid,
    pub principal: Option<User>,
    /// Flash messages queued by earlier requests, consumed by this one.
    pub flash: Vec<Flash>,
}

/// Session middleware: loads the session named by the cookie, injects a
/// `RequestContext`, then applies the `SessionEffects` the handler returned.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let config = &state.config.session;
    let cookie_sid = session_id_from_headers(request.headers(), config);

    let loaded = match cookie_sid {
        Some(sid) => match state.store.load_session(sid).await {
            Ok(session) => session,
            Err(e) => return AppError::from(e).into_response(),
        },
        None => None,
    };
    let stored = loaded.is_some();
    let mut session = loaded.unwrap_or_else(|| Session::new(config.ttl_secs));
    let consumed = std::mem::take(&mut session.flash);

    let principal = match session.user_id {
        Some(user_id) => match state.store.find_user_by_id(user_id).await {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                tracing::warn!("Session {} names missing user {}", session.id, user_id);
                session.user_id = None;
                None
            }
            Err(e) => return AppError::from(e).into_response(),
        },
        None => None,
    };

    tracing::debug!(
        "Session {} resolved (principal: {})",
        session.id,
        principal.as_ref().map(|u| u.email.as_str()).unwrap_or("anonymous")
    );

    request.extensions_mut().insert(RequestContext {
        session_id: session.id,
        principal,
        flash: consumed.clone(),
    });

    let mut response = next.run(request).await;
    let effects = response
        .extensions_mut()
        .remove::<SessionEffects>()
        .unwrap_or_default();

    // Only a rendered page shows the queued messages; anything else keeps them.
    if !renders_page(&response) {
        session.flash = consumed;
    }

    let result = apply_effects(&state, session, stored, effects).await;
    match result {
        Ok(Some(cookie)) => {
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            response
        }
        Ok(None) => response,
        Err(e) => AppError::from(e).into_response(),
    }
}

fn renders_page(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.starts_with("text/html"))
}

/// Persists the session after the handler ran. Returns the `Set-Cookie`
/// value to send, if any.
async fn apply_effects(
    state: &AppState,
    mut session: Session,
    stored: bool,
    effects: SessionEffects,
) -> Result<Option<String>, DatabaseError> {
    let config = &state.config.session;
    let had_cookie = stored;
    let mut stored = stored;

    match effects.auth {
        Some(AuthChange::Login(user_id)) => {
            // fresh id on every login
            if stored {
                state.store.delete_session(session.id).await?;
                stored = false;
            }
            let carried = std::mem::take(&mut session.flash);
            session = Session::new(config.ttl_secs);
            session.user_id = Some(user_id);
            session.flash = carried;
        }
        Some(AuthChange::Logout) => {
            if stored {
                state.store.delete_session(session.id).await?;
                stored = false;
            }
            session = Session::new(config.ttl_secs);
        }
        None => {}
    }
    session.flash.extend(effects.flash);

    if session.is_empty() {
        if stored {
            state.store.delete_session(session.id).await?;
        }
        return Ok(had_cookie.then(|| clear_cookie(config)));
    }

    session.touch(config.ttl_secs);
    state.store.save_session(&session).await?;

    match generate_session_token(&Claims::new(session.id, config.ttl_secs), &config.secret) {
        Ok(token) => Ok(Some(session_cookie(config, &token))),
        Err(e) => {
            tracing::error!("Could not issue session cookie: {}", e);
            Ok(None)
        }
    }
}

/// Session id from the signed session cookie; invalid or expired tokens
/// count as no cookie.
fn session_id_from_headers(headers: &HeaderMap, config: &SessionConfig) -> Option<Uuid> {
    let token = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == config.cookie_name)
        .map(|(_, value)| value.to_string())?;

    match validate_session_token(&token, &config.secret) {
        Ok(sid) => Some(sid),
        Err(e) => {
            tracing::debug!("Ignoring session cookie: {}", e);
            None
        }
    }
}

fn session_cookie(config: &SessionConfig, token: &str) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name, token, config.ttl_secs
    );
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

fn clear_cookie(config: &SessionConfig) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        config.cookie_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn reads_signed_cookie_among_others() {
        let config = AppConfig::development().session;
        let sid = Uuid::new_v4();
        let token = generate_session_token(&Claims::new(sid, 60), &config.secret).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}; lang=en", config.cookie_name, token)).unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers, &config), Some(sid));
    }

    #[test]
    fn tampered_cookie_is_ignored() {
        let config = AppConfig::development().session;
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{}=not.a.token", config.cookie_name)).unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers, &config), None);
    }

    #[test]
    fn cookie_attributes_follow_config() {
        let mut config = AppConfig::development().session;
        assert_eq!(
            session_cookie(&config, "tok"),
            "hostel_sid=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600"
        );
        config.secure_cookie = true;
        assert!(session_cookie(&config, "tok").ends_with("; Secure"));
        assert!(clear_cookie(&config).contains("Max-Age=0"));
    }

    #[test]
    fn only_html_counts_as_rendered() {
        use axum::response::{Html, Json, Redirect};

        assert!(renders_page(&Html("<p>hi</p>").into_response()));
        assert!(!renders_page(&Json(serde_json::json!({"ok": true})).into_response()));
        assert!(!renders_page(&Redirect::to("/").into_response()));
    }
}
