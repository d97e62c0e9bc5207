use crate::handlers::ErrorResponse;
use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use uuid::Uuid;

/// Identity of the already-authorized caller, used for audit fields only.
///
/// The authorization decision itself happens upstream of this service; by
/// the time a request lands here it is assumed allowed, and the actor id is
/// recorded on the rows it touches.
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub actor_id: Uuid,
}

/// Extract the acting user from the X-Actor-Id header.
pub fn extract_actor_id(headers: &HeaderMap) -> Result<Uuid, (StatusCode, Json<ErrorResponse>)> {
    let header = headers
        .get("x-actor-id")
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    "missing_actor_header",
                    "X-Actor-Id header is required for this operation",
                )),
            )
        })?
        .to_str()
        .map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    "invalid_actor_header",
                    "X-Actor-Id header is not valid UTF-8",
                )),
            )
        })?;

    Uuid::parse_str(header).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "invalid_actor_header",
                "X-Actor-Id header must be a UUID",
            )),
        )
    })
}

/// Middleware for mutating routes: resolves the actor and stashes it as a
/// request extension for handlers to pick up.
pub async fn require_actor(
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let actor_id = extract_actor_id(request.headers())?;

    request
        .extensions_mut()
        .insert(ActorContext { actor_id });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_actor_id() {
        let mut headers = HeaderMap::new();
        assert!(extract_actor_id(&headers).is_err());

        headers.insert("x-actor-id", HeaderValue::from_static("not-a-uuid"));
        assert!(extract_actor_id(&headers).is_err());

        let actor = Uuid::new_v4();
        headers.insert(
            "x-actor-id",
            HeaderValue::from_str(&actor.to_string()).unwrap(),
        );
        assert_eq!(extract_actor_id(&headers).unwrap(), actor);
    }
}
