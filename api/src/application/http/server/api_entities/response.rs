use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub enum Response<T: Serialize> {
    OK(T),
    NoContent,
}

impl<T: Serialize> IntoResponse for Response<T> {
    fn into_response(self) -> AxumResponse {
        match self {
            Response::OK(data) => (StatusCode::OK, Json(data)).into_response(),
            Response::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_statuses() {
        let ok = Response::OK(serde_json::json!({"filename": "a.jpg"})).into_response();
        assert_eq!(ok.status(), StatusCode::OK);

        let empty = Response::<()>::NoContent.into_response();
        assert_eq!(empty.status(), StatusCode::NO_CONTENT);
    }
}
