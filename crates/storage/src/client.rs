// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client facade: `rest`, `auth` and `rpc`
//!
//! Expected failures come back as an [`ApiResponse`] carrying an
//! [`ApiError`]; only environment failures surface as [`StoreError`].

use crate::auth::{self, AuthError};
use crate::backend::DocumentBackend;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::mutation::{self, Actor, MutationError};
use crate::response::{ApiError, ApiResponse, ErrorCode};
use crate::store::{Cycle, FileStore, Store};
use lb_core::{
    Clock, Document, FocusSession, IdGen, QueryError, QueryParams, QuerySpec, SessionTaskRef,
    SystemClock, Table, TableRow, Todo, UuidIdGen,
};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

/// Verbs accepted by [`Client::rest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl FromStr for Method {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(ApiError::new(
                ErrorCode::MethodNotAllowed,
                format!("method {} is not supported", s),
            )),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One `rest` call
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    pub table: String,
    pub method: String,
    pub query: QueryParams,
    pub body: Option<Value>,
    /// `Prefer` header value, e.g. `return=minimal`
    pub prefer: Option<String>,
}

impl RestRequest {
    pub fn new(method: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            method: method.into(),
            query: QueryParams::new(),
            body: None,
            prefer: None,
        }
    }

    pub fn get(table: impl Into<String>) -> Self {
        Self::new("GET", table)
    }

    pub fn post(table: impl Into<String>, body: Value) -> Self {
        Self::new("POST", table).with_body(body)
    }

    pub fn patch(table: impl Into<String>, body: Value) -> Self {
        Self::new("PATCH", table).with_body(body)
    }

    pub fn delete(table: impl Into<String>) -> Self {
        Self::new("DELETE", table)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push(key, value);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_prefer(mut self, prefer: impl Into<String>) -> Self {
        self.prefer = Some(prefer.into());
        self
    }

    fn wants_minimal(&self) -> bool {
        self.prefer.as_deref().is_some_and(|p| {
            p.split(',')
                .any(|part| part.trim().eq_ignore_ascii_case("return=minimal"))
        })
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let code = match e {
            AuthError::BadFormat => ErrorCode::PasscodeBadFormat,
            AuthError::InvalidPasscode => ErrorCode::InvalidPasscode,
            AuthError::Misconfigured => ErrorCode::ServerMisconfigured,
            AuthError::Unauthorized => ErrorCode::Unauthorized,
        };
        ApiError::new(code, e.to_string())
    }
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        ApiError::bad_request(e.to_string())
    }
}

impl From<MutationError> for ApiError {
    fn from(e: MutationError) -> Self {
        match e {
            MutationError::Conflict { ref detail } => {
                ApiError::new(ErrorCode::UniqueViolation, e.to_string()).with_details(detail)
            }
            MutationError::Row(_) | MutationError::EmptyPatch | MutationError::InvalidBody(_) => {
                ApiError::bad_request(e.to_string())
            }
        }
    }
}

/// Client over a JSON file store
pub type FileClient = Client<crate::traced::TracedBackend<crate::backend::JsonFileBackend>>;

/// A caller's handle on a [`Store`], holding its current bearer token
pub struct Client<B, C: Clock = SystemClock, I: IdGen = UuidIdGen> {
    store: Arc<Store<B, C, I>>,
    token: RwLock<Option<String>>,
}

impl FileClient {
    pub fn open(config: StoreConfig) -> Self {
        Client::new(Arc::new(FileStore::open(config)))
    }
}

impl<B, C, I> Client<B, C, I>
where
    B: DocumentBackend,
    C: Clock,
    I: IdGen,
{
    pub fn new(store: Arc<Store<B, C, I>>) -> Self {
        Self {
            store,
            token: RwLock::new(None),
        }
    }

    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    pub fn store(&self) -> &Arc<Store<B, C, I>> {
        &self.store
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    pub fn auth(&self) -> AuthClient<'_, B, C, I> {
        AuthClient { client: self }
    }

    /// Remote procedures are not supported
    pub fn rpc(&self, name: &str) -> ApiResponse {
        tracing::debug!(name, "rpc");
        ApiError::new(
            ErrorCode::RpcNotImplemented,
            format!("rpc '{}' is not implemented", name),
        )
        .into()
    }

    pub async fn rest(&self, request: RestRequest) -> Result<ApiResponse, StoreError> {
        tracing::debug!(table = %request.table, method = %request.method, "rest");

        let method = match request.method.parse::<Method>() {
            Ok(method) => method,
            Err(e) => return Ok(e.into()),
        };
        let table = match request.table.parse::<Table>() {
            Ok(table) => table,
            Err(e) => return Ok(ApiError::new(ErrorCode::TableNotFound, e.to_string()).into()),
        };
        let Some(token) = self.token() else {
            return Ok(ApiError::unauthorized().into());
        };
        let spec = match QuerySpec::parse(&request.query) {
            Ok(spec) => spec,
            Err(e) => return Ok(ApiError::from(e).into()),
        };
        let op = Operation {
            method,
            minimal: request.wants_minimal(),
            body: request.body.unwrap_or(Value::Null),
        };

        let store = &self.store;
        let result = store
            .run_exclusive(|doc| {
                let now = store.clock().now();
                let Some(user) = auth::resolve_token(doc, &token, now) else {
                    return Cycle::Read(Err(ApiError::unauthorized()));
                };
                let actor = Actor {
                    user_id: &user.id,
                    now,
                };
                match table {
                    Table::Todos => op.execute::<Todo>(doc, actor, &spec, store.ids()),
                    Table::FocusSessions => {
                        op.execute::<FocusSession>(doc, actor, &spec, store.ids())
                    }
                    Table::SessionTaskRefs => {
                        op.execute::<SessionTaskRef>(doc, actor, &spec, store.ids())
                    }
                }
            })
            .await?;

        Ok(match result {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(%table, %method, code = ?e.code, "rest rejected");
                e.into()
            }
        })
    }
}

/// A decoded `rest` call, ready to run against the document
struct Operation {
    method: Method,
    minimal: bool,
    body: Value,
}

impl Operation {
    fn execute<T: TableRow>(
        self,
        doc: &mut Document,
        actor: Actor<'_>,
        spec: &QuerySpec,
        ids: &impl IdGen,
    ) -> Cycle<Result<ApiResponse, ApiError>> {
        let minimal = self.minimal;
        let written = |status: u16, rows: Vec<Map<String, Value>>| {
            if minimal {
                let status = if status == 201 { 201 } else { 204 };
                ApiResponse::empty(status)
            } else {
                ApiResponse::ok(status, Value::Array(spec.project(rows)))
            }
        };

        match self.method {
            Method::Get => {
                let rows = mutation::select::<T>(doc, actor.user_id, spec);
                Cycle::Read(Ok(ApiResponse::ok(200, Value::Array(rows))))
            }
            Method::Post => match mutation::insert::<T>(doc, actor, ids, self.body) {
                Ok(rows) => Cycle::Write(Ok(written(201, rows))),
                Err(e) => Cycle::Read(Err(e.into())),
            },
            Method::Patch => match mutation::update::<T>(doc, actor, spec, self.body) {
                Ok(rows) if rows.is_empty() => Cycle::Read(Ok(written(200, rows))),
                Ok(rows) => Cycle::Write(Ok(written(200, rows))),
                Err(e) => Cycle::Read(Err(e.into())),
            },
            Method::Delete => {
                let rows = mutation::delete::<T>(doc, actor.user_id, spec);
                if rows.is_empty() {
                    Cycle::Read(Ok(written(200, rows)))
                } else {
                    Cycle::Write(Ok(written(200, rows)))
                }
            }
        }
    }
}

/// Passcode sign-in and token management for a [`Client`]
pub struct AuthClient<'a, B, C: Clock, I: IdGen> {
    client: &'a Client<B, C, I>,
}

impl<B, C, I> AuthClient<'_, B, C, I>
where
    B: DocumentBackend,
    C: Clock,
    I: IdGen,
{
    /// Exchange the passcode for a token, which the client keeps
    pub async fn sign_in(&self, passcode: &str) -> Result<ApiResponse, StoreError> {
        let store = &self.client.store;
        let settings = store.auth_settings();
        let result = store
            .run_exclusive(|doc| {
                let now = store.clock().now();
                match auth::sign_in(doc, &settings, store.ids(), now, passcode) {
                    Ok(session) => Cycle::Write(Ok(session)),
                    Err(e) => Cycle::Read(Err(e)),
                }
            })
            .await?;

        match result {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "signed in");
                self.client.set_token(Some(session.access_token.clone()));
                Ok(ApiResponse::ok(200, serde_json::to_value(&session)?))
            }
            Err(e) => {
                tracing::warn!(reason = %e, "sign-in rejected");
                Ok(ApiError::from(e).into())
            }
        }
    }

    /// The user the client's token belongs to
    pub async fn get_user(&self) -> Result<ApiResponse, StoreError> {
        let Some(token) = self.client.token() else {
            return Ok(ApiError::unauthorized().into());
        };
        let store = &self.client.store;
        let user = store
            .run_exclusive(|doc| Cycle::Read(auth::resolve_token(doc, &token, store.clock().now())))
            .await?;

        Ok(match user {
            Some(user) => ApiResponse::ok(200, json!({ "user": user })),
            None => ApiError::unauthorized().into(),
        })
    }

    pub async fn change_passcode(&self, old: &str, new: &str) -> Result<ApiResponse, StoreError> {
        let Some(token) = self.client.token() else {
            return Ok(ApiError::unauthorized().into());
        };
        let store = &self.client.store;
        let settings = store.auth_settings();
        let result = store
            .run_exclusive(|doc| {
                let now = store.clock().now();
                match auth::change_passcode(doc, &settings, now, &token, old, new) {
                    Ok(()) => Cycle::Write(Ok(())),
                    Err(e) => Cycle::Read(Err(e)),
                }
            })
            .await?;

        match result {
            Ok(()) => {
                tracing::info!("passcode changed");
                Ok(ApiResponse::ok(200, json!({ "updated": true })))
            }
            Err(e) => {
                tracing::warn!(reason = %e, "passcode change rejected");
                Ok(ApiError::from(e).into())
            }
        }
    }

    /// Revoke the client's token. Revoking an unknown token succeeds.
    pub async fn sign_out(&self) -> Result<ApiResponse, StoreError> {
        let Some(token) = self.client.token() else {
            return Ok(ApiError::unauthorized().into());
        };
        let removed = self
            .client
            .store
            .run_exclusive(|doc| {
                if auth::sign_out(doc, &token) {
                    Cycle::Write(true)
                } else {
                    Cycle::Read(false)
                }
            })
            .await?;

        self.client.set_token(None);
        if removed {
            tracing::info!("signed out");
        }
        Ok(ApiResponse::ok(200, json!({})))
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
