// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use ironpulse::error::AppError;

#[test]
fn test_error_status_mapping() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
        (
            AppError::Forbidden("nope".to_string()),
            StatusCode::FORBIDDEN,
        ),
        (
            AppError::NotFound("Pulse 1 not found".to_string()),
            StatusCode::NOT_FOUND,
        ),
        (
            AppError::BadRequest("bad".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            AppError::Conflict("taken".to_string()),
            StatusCode::CONFLICT,
        ),
        (
            AppError::Database("boom".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        let response = err.into_response();
        assert_eq!(response.status(), expected);
    }
}

#[test]
fn test_internal_errors_do_not_leak_details() {
    // Database and internal errors must return an opaque body.
    let response = AppError::Database("connection string with secrets".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response =
        AppError::Internal(anyhow::anyhow!("stack trace details")).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_invalid_credentials_is_uniform() {
    // Unknown phone and wrong PIN share one variant, so the API cannot
    // reveal which phones are registered.
    let a = AppError::InvalidCredentials.into_response();
    let b = AppError::InvalidCredentials.into_response();
    assert_eq!(a.status(), b.status());
}
