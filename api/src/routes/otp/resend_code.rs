use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use tk_core::{Clock, SessionStore};
use tk_shared::types::ApiResponse;

use super::{request_id, State};
use crate::dto::{ResendCodeRequest, SendCodeResponse};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/otp/resend
///
/// The old session is discarded; the response carries the new session id.
pub async fn resend_code<S, C>(
    req: HttpRequest,
    state: State<S, C>,
    request: web::Json<ResendCodeRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: SessionStore + 'static,
    C: Clock + 'static,
{
    let request_id = request_id(&req);
    request.validate()?;

    log::info!("[{}] Resending code for session {}", request_id, request.session_id);

    let issued = state.verification.resend_code(&request.session_id).await?;

    Ok(HttpResponse::Ok()
        .json(ApiResponse::success(SendCodeResponse::from(issued)).with_request_id(request_id)))
}
