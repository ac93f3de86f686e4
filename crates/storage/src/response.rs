// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status-bearing results returned by the client facade

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Expected failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "UNAUTHORIZED")]
    Unauthorized,
    #[serde(rename = "BAD_REQUEST")]
    BadRequest,
    #[serde(rename = "TABLE_NOT_FOUND")]
    TableNotFound,
    /// Unique constraint violation, using the Postgres SQLSTATE
    #[serde(rename = "23505")]
    UniqueViolation,
    #[serde(rename = "METHOD_NOT_ALLOWED")]
    MethodNotAllowed,
    #[serde(rename = "RPC_NOT_IMPLEMENTED")]
    RpcNotImplemented,
    #[serde(rename = "PASSCODE_BAD_FORMAT")]
    PasscodeBadFormat,
    #[serde(rename = "INVALID_PASSCODE")]
    InvalidPasscode,
    #[serde(rename = "SERVER_MISCONFIGURED")]
    ServerMisconfigured,
}

impl ErrorCode {
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::Unauthorized | ErrorCode::InvalidPasscode => 401,
            ErrorCode::BadRequest | ErrorCode::PasscodeBadFormat => 400,
            ErrorCode::TableNotFound => 404,
            ErrorCode::UniqueViolation => 409,
            ErrorCode::MethodNotAllowed => 405,
            ErrorCode::RpcNotImplemented => 501,
            ErrorCode::ServerMisconfigured => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::Unauthorized, "missing or invalid access token")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }
}

/// `{data, error, status}` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub data: Option<Value>,
    pub error: Option<ApiError>,
    pub status: u16,
}

impl ApiResponse {
    pub fn ok(status: u16, data: Value) -> Self {
        Self {
            data: Some(data),
            error: None,
            status,
        }
    }

    /// Success without a body (`Prefer: return=minimal`)
    pub fn empty(status: u16) -> Self {
        Self {
            data: None,
            error: None,
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|e| e.code)
    }

    /// Rows in `data`, or an empty slice when `data` is not an array
    pub fn rows(&self) -> &[Value] {
        match &self.data {
            Some(Value::Array(rows)) => rows,
            _ => &[],
        }
    }
}

impl From<ApiError> for ApiResponse {
    fn from(error: ApiError) -> Self {
        Self {
            data: None,
            status: error.code.status(),
            error: Some(error),
        }
    }
}
