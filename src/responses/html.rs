use crate::errors::{ResultResp, ServerError};
use crate::session::SESSION_COOKIE;
use astra::{Body, Response, ResponseBuilder};
use maud::Markup;

pub fn html_response(markup: Markup) -> ResultResp {
    html_status_response(200, markup)
}

/// A full page with a non-200 status, e.g. a rejected form shown again.
pub fn html_status_response(status: u16, markup: Markup) -> ResultResp {
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(markup.into_string()))
        .map_err(|_| ServerError::InternalError)
}

/// 303 See Other, so a form POST is followed by a GET.
pub fn redirect(location: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(303)
        .header("Location", location)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}

pub fn with_session_cookie(mut resp: Response, token: &str) -> Response {
    let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    match cookie.parse() {
        Ok(value) => {
            resp.headers_mut().insert("set-cookie", value);
        }
        Err(e) => tracing::warn!(error = %e, "session cookie not set"),
    }
    resp
}
