//! OTP verification route handlers
//!
//! - `POST /send` issues a code for a phone number or identity document
//! - `POST /verify` checks a code against its session
//! - `POST /resend` replaces a session's code
//! - `GET /sessions/{id}` reports a session's status

pub mod resend_code;
pub mod send_code;
pub mod session_status;
pub mod verify_code;

use actix_web::{web, HttpRequest};
use uuid::Uuid;

use tk_core::{Clock, SessionStore};

use crate::app::AppState;

/// Register the OTP routes on a scope
pub fn configure<S, C>(cfg: &mut web::ServiceConfig)
where
    S: SessionStore + 'static,
    C: Clock + 'static,
{
    cfg.route("/send", web::post().to(send_code::send_code::<S, C>))
        .route("/verify", web::post().to(verify_code::verify_code::<S, C>))
        .route("/resend", web::post().to(resend_code::resend_code::<S, C>))
        .route(
            "/sessions/{session_id}",
            web::get().to(session_status::session_status::<S, C>),
        );
}

/// Request id from `X-Request-Id`, or a fresh one
pub(crate) fn request_id(req: &HttpRequest) -> String {
    req.headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub(crate) type State<S, C> = web::Data<AppState<S, C>>;
