//! Sign-in, sign-up, sign-out and the current-session endpoint.
//!
//! These live under `/api/` and so bypass the request router; they manage
//! the session cookie themselves.

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Instrument, Span, info, warn};

use atrium_security::account::AccountIdentity;
use atrium_security::session::{CookieMutation, CookieMutations, RequestCookies, SessionLookup};
use atrium_telemetry::masking::Sensitive;
use atrium_telemetry::metrics::AtriumMetrics;
use atrium_telemetry::spans::sign_in_span;

use super::views::{AccountView, MemberView, OperatorView, TenantView};
use crate::error::{ApiError, ApiResult};
use crate::middleware::{apply_cookie_mutations, request_cookies};
use crate::response::{ApiResponse, CreatedResponse, EmptyResponse};
use crate::state::AppState;

/// Sign-in request body.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: Sensitive<String>,
}

/// Sign-up request body.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: Sensitive<String>,
    /// Display name; defaults to the email's local part
    #[serde(default)]
    pub display_name: String,
}

/// The signed-in account with both of its identity links.
#[derive(Debug, Serialize)]
pub struct CurrentAccount {
    /// The account
    pub account: AccountView,
    /// Global operator record, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<OperatorView>,
    /// Tenant memberships
    pub memberships: Vec<Membership>,
}

/// A tenant membership with its tenant.
#[derive(Debug, Serialize)]
pub struct Membership {
    /// The tenant
    pub tenant: TenantView,
    /// Role and permissions inside the tenant
    #[serde(flatten)]
    pub member: MemberView,
}

fn with_cookie(response: impl IntoResponse, cookie: CookieMutation) -> Response {
    let mut response = response.into_response();
    apply_cookie_mutations(response.headers_mut(), &cookie.into());
    response
}

async fn blocking<T, F>(task: F) -> ApiResult<T>
where
    F: FnOnce() -> atrium_security::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ApiError::Internal(format!("Credential task failed: {e}")))?
        .map_err(ApiError::from)
}

/// Sign-in handler.
///
/// POST /api/v1/auth/sign-in
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignInRequest>,
) -> ApiResult<Response> {
    let span = sign_in_span("account");
    async move {
        let accounts = Arc::clone(state.accounts());
        let verified = blocking(move || {
            accounts.verify_credentials(&request.email, request.password.expose())
        })
        .await;

        let account = match verified {
            Ok(account) => account,
            Err(err) => {
                Span::current().record("outcome", "rejected");
                AtriumMetrics::sign_in("rejected");
                info!("Sign-in rejected");
                return Err(err);
            }
        };

        let (_, cookie) = state.issuer().issue(&account).await?;
        Span::current().record("outcome", "success");
        AtriumMetrics::sign_in("success");
        info!(account_id = %account.id(), "Signed in");

        Ok(with_cookie(
            ApiResponse::success(AccountView::from(&account)),
            cookie,
        ))
    }
    .instrument(span)
    .await
}

/// Sign-up handler.
///
/// POST /api/v1/auth/sign-up
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignUpRequest>,
) -> ApiResult<Response> {
    let accounts = Arc::clone(state.accounts());
    let account = blocking(move || {
        accounts.register(
            &request.email,
            request.password.expose(),
            &request.display_name,
        )
    })
    .await?;

    let (_, cookie) = state.issuer().issue(&account).await?;
    info!(account_id = %account.id(), "Signed up");

    Ok(with_cookie(
        CreatedResponse::new(AccountView::from(&account)),
        cookie,
    ))
}

/// Sign-out handler.
///
/// POST /api/v1/auth/sign-out
///
/// Always clears the cookie, even when the session is already gone.
pub async fn sign_out(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let cookies = request_cookies(&headers);
    let session = match state.sessions().get_session(&cookies).await {
        Ok(lookup) => lookup.session,
        Err(err) => {
            warn!(error = %err, "Session lookup failed during sign-out");
            None
        }
    };

    let cookie = match session {
        Some(session) => match state.issuer().revoke(&session).await {
            Ok(cookie) => cookie,
            Err(err) => {
                warn!(error = %err, "Session revocation failed");
                state.issuer().clear_cookie()
            }
        },
        None => state.issuer().clear_cookie(),
    };

    with_cookie(EmptyResponse::success_with_message("Signed out"), cookie)
}

/// Current-session handler.
///
/// GET /api/v1/auth/me
pub async fn me(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let cookies = request_cookies(&headers);
    let (result, mutations) = current_account(&state, &cookies).await;

    let mut response = match result {
        Ok(current) => ApiResponse::success(current).into_response(),
        Err(err) => err.into_response(),
    };
    apply_cookie_mutations(response.headers_mut(), &mutations);
    response
}

async fn current_account(
    state: &AppState,
    jar: &RequestCookies,
) -> (ApiResult<CurrentAccount>, CookieMutations) {
    let SessionLookup { session, cookies } = match state.sessions().get_session(jar).await {
        Ok(lookup) => lookup,
        Err(err) => {
            warn!(error = %err, "Session lookup failed");
            return (Err(signed_out()), CookieMutations::new());
        }
    };
    let Some(session) = session else {
        return (Err(signed_out()), cookies);
    };
    let account = match state.sessions().get_user(&session).await {
        Ok(Some(account)) => account,
        Ok(None) => return (Err(signed_out()), cookies),
        Err(err) => {
            warn!(error = %err, "Account lookup failed");
            return (Err(signed_out()), cookies);
        }
    };

    (Ok(describe(state, &account).await), cookies)
}

async fn describe(state: &AppState, account: &AccountIdentity) -> CurrentAccount {
    let operator = state
        .identities()
        .resolve_global(&account.id())
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "Operator lookup failed");
            None
        });

    let members = state
        .identities()
        .memberships(&account.id())
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "Membership lookup failed");
            Vec::new()
        });
    let tenants = if members.is_empty() {
        Vec::new()
    } else {
        state.tenants().list().await.unwrap_or_else(|err| {
            warn!(error = %err, "Tenant listing failed");
            Vec::new()
        })
    };

    let memberships = members
        .iter()
        .filter_map(|member| {
            tenants
                .iter()
                .find(|tenant| tenant.id() == member.tenant_id())
                .map(|tenant| Membership {
                    tenant: tenant.into(),
                    member: member.into(),
                })
        })
        .collect();

    CurrentAccount {
        account: account.into(),
        operator: operator.as_ref().map(OperatorView::from),
        memberships,
    }
}

fn signed_out() -> ApiError {
    ApiError::Unauthorized("No active session".to_string())
}
