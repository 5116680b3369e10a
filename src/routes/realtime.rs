use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Response,
};

use crate::auth::AuthUser;
use crate::realtime::handle_socket;
use crate::DesktopState;

/// Upgrade to the realtime notification channel
///
/// GET /ws
///
/// Anyone may connect; only sockets opened from a signed-in session receive
/// the initial `status` event.
pub async fn realtime(
    ws: WebSocketUpgrade,
    State(state): State<DesktopState>,
    user: Option<AuthUser>,
) -> Response {
    let hub = state.hub.clone();
    let authenticated = user.is_some();
    ws.on_upgrade(move |socket| handle_socket(socket, hub, authenticated))
}
