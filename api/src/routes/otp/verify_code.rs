use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use tk_core::{Clock, SessionStore};
use tk_shared::types::ApiResponse;

use super::{request_id, State};
use crate::dto::{VerifyCodeRequest, VerifyCodeResponse};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/otp/verify
///
/// ```json
/// { "session_id": "3f2a...", "code": "482913" }
/// ```
///
/// A wrong code answers 400 with `remaining_attempts` in the error details;
/// an expired session 410; an exhausted one 429.
pub async fn verify_code<S, C>(
    req: HttpRequest,
    state: State<S, C>,
    request: web::Json<VerifyCodeRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: SessionStore + 'static,
    C: Clock + 'static,
{
    let request_id = request_id(&req);
    request.validate()?;

    let result = state
        .verification
        .verify_code(&request.session_id, &request.code)
        .await?;

    log::info!(
        "[{}] Session {} verified after {} attempt(s)",
        request_id,
        result.session_id,
        result.attempts_used
    );

    Ok(HttpResponse::Ok()
        .json(ApiResponse::success(VerifyCodeResponse::from(result)).with_request_id(request_id)))
}
