use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::auth::AuthUser;

const CAPTION_INDEX_HTML: &str = include_str!("../../templates/caption/index.html");
const CAPTION_UPLOAD_HTML: &str = include_str!("../../templates/caption/upload.html");
const DESKTOP_LOGIN_HTML: &str = include_str!("../../templates/desktop/login.html");
const DESKTOP_HTML: &str = include_str!("../../templates/desktop/desktop.html");
const LITE_INDEX_HTML: &str = include_str!("../../templates/lite/index.html");

// Caption service

pub async fn caption_index() -> Html<&'static str> {
    Html(CAPTION_INDEX_HTML)
}

pub async fn upload_page() -> Html<&'static str> {
    Html(CAPTION_UPLOAD_HTML)
}

// Desktop shell

/// GET /: send signed-in users to the desktop, everyone else to the login page
pub async fn desktop_root(user: Option<AuthUser>) -> Redirect {
    match user {
        Some(_) => Redirect::to("/desktop"),
        None => Redirect::to("/login"),
    }
}

pub async fn login_page(user: Option<AuthUser>) -> Response {
    match user {
        Some(_) => Redirect::to("/desktop").into_response(),
        None => Html(DESKTOP_LOGIN_HTML).into_response(),
    }
}

pub async fn desktop_page(user: Option<AuthUser>) -> Response {
    match user {
        Some(_) => Html(DESKTOP_HTML).into_response(),
        None => Redirect::to("/login").into_response(),
    }
}

// Lite shell

pub async fn lite_index() -> Html<&'static str> {
    Html(LITE_INDEX_HTML)
}
