use actix_web::{web, HttpRequest, HttpResponse};

use tk_core::{Clock, SessionStore};
use tk_shared::types::ApiResponse;

use super::{request_id, State};
use crate::handlers::ApiError;

/// Handler for GET /api/v1/otp/sessions/{session_id}
///
/// Reports the masked subject, verification state and remaining attempts.
/// The code itself is never returned.
pub async fn session_status<S, C>(
    req: HttpRequest,
    state: State<S, C>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError>
where
    S: SessionStore + 'static,
    C: Clock + 'static,
{
    let request_id = request_id(&req);
    let view = state.verification.session(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(view).with_request_id(request_id)))
}
