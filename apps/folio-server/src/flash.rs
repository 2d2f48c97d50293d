//! One-shot flash messages
//!
//! A failing step stores a short message in a cookie and redirects to the
//! upload page, which renders the message once and clears the cookie.

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Cookie carrying the pending message
pub const FLASH_COOKIE: &str = "folio_flash";

/// Build a `303 See Other` redirect to `location`
pub fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::error!("Refusing to redirect to invalid location {:?}", location);
            (StatusCode::SEE_OTHER, [(header::LOCATION, HeaderValue::from_static("/"))])
                .into_response()
        }
    }
}

/// Redirect to `location` and leave `message` for the next page view
pub fn redirect_with_flash(location: &str, message: &str) -> Response {
    let mut response = redirect(location);
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        FLASH_COOKIE,
        urlencoding::encode(message)
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

/// Cookie value that expires a pending message
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("folio_flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// Read the pending message from the request cookies, if any
pub fn take(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|message| message.into_owned())
        .filter(|message| !message.is_empty())
}
