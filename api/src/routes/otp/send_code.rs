use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use tk_core::{Clock, SessionStore};
use tk_shared::types::ApiResponse;

use super::{request_id, State};
use crate::dto::{SendCodeRequest, SendCodeResponse};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/otp/send
///
/// ```json
/// { "subject_kind": "phone", "subject_value": "+91 98765 43210" }
/// ```
///
/// Responds 200 with the session id and how the code was delivered. When no
/// channel accepted the code the response still succeeds and carries a
/// `fallback_link` the user can open to send it themselves.
pub async fn send_code<S, C>(
    req: HttpRequest,
    state: State<S, C>,
    request: web::Json<SendCodeRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: SessionStore + 'static,
    C: Clock + 'static,
{
    let request_id = request_id(&req);
    request.validate()?;

    let (kind, value) = request.normalized_subject().ok_or_else(|| {
        ApiError::BadRequest("Subject could not be normalized".to_string())
    })?;

    log::info!(
        "[{}] Issuing {} code for {}",
        request_id,
        kind,
        kind.mask(&value)
    );

    let issued = state.verification.issue_code(kind, &value).await?;

    Ok(HttpResponse::Ok()
        .json(ApiResponse::success(SendCodeResponse::from(issued)).with_request_id(request_id)))
}
