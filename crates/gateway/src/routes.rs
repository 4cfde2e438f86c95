use std::sync::Arc;

use {
    axum::{
        Form, Json, Router,
        body::Body,
        extract::{Query, State},
        http::{HeaderMap, Request, header},
        response::{IntoResponse, Redirect, Response},
        routing::{get, post},
    },
    axum_extra::extract::cookie::{Cookie, CookieJar, SameSite},
    hcauth_appliances::{AccessorySnippet, DeviceDirectory},
    hcauth_oauth::{TokenRecord, unix_now},
    hcauth_sessions::{LookupError, new_session_id},
    secrecy::SecretString,
    serde::Deserialize,
    tower_http::trace::TraceLayer,
    tracing::{Span, info, info_span, warn},
};

use crate::{
    error::GatewayError,
    pages::{
        AuthorizedPage, DeniedPage, DeviceOption, DonePage, FinishPage, SelectPage, WelcomePage,
        render,
    },
    state::{CALLBACK_PATH, GatewayState},
};

pub const SESSION_COOKIE: &str = "hcauth_session";

pub fn build_router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/welcome", get(welcome).post(proceed))
        .route("/login", get(login))
        .route(CALLBACK_PATH, get(authorized))
        .route("/logout", get(logout))
        .route("/finish", post(finish))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

/// Request span without the query string, which carries authorization codes.
fn request_span(request: &Request<Body>) -> Span {
    info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

async fn index(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
) -> Result<Response, GatewayError> {
    if let Some(id) = session_id(&jar)
        && state.sessions.current_token(&id).is_some()
    {
        let page = AuthorizedPage {
            token_path: token_path(&state)?,
        };
        return Ok(render(&page)?.into_response());
    }

    let entry = if state.options.device_selection {
        "/welcome"
    } else {
        "/login"
    };
    Ok(Redirect::to(entry).into_response())
}

async fn welcome() -> Result<Response, GatewayError> {
    Ok(render(&WelcomePage { action: "/welcome" })?.into_response())
}

async fn proceed() -> Redirect {
    Redirect::to("/login")
}

async fn login(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
) -> Result<Redirect, GatewayError> {
    let callback = state.callback_url(&headers);
    let url = state
        .oauth
        .authorization_url(&callback)
        .map_err(GatewayError::Internal)?;
    info!(%callback, "redirecting to provider for authorization");
    Ok(Redirect::to(&url))
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_reason: Option<String>,
    pub error_description: Option<String>,
}

async fn authorized(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<Response, GatewayError> {
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        let Some(reason) = params.error_reason.or(params.error) else {
            return Err(GatewayError::MissingCode);
        };
        let description = params.error_description.unwrap_or_default();
        warn!(%reason, %description, "provider denied authorization");
        return Ok(render(&DeniedPage {
            reason,
            description,
        })?
        .into_response());
    };

    let redirect_uri = state.callback_url(&headers);
    let token = state
        .oauth
        .exchange_code(&code, &redirect_uri)
        .await
        .map_err(GatewayError::TokenExchange)?;
    let access_token = token.access_token.clone();

    let record = TokenRecord::new(token, state.oauth.config(), unix_now());
    state
        .tokens
        .save(&record)
        .map_err(GatewayError::TokenPersist)?;

    if let Some(previous) = session_id(&jar) {
        state.sessions.remove(&previous);
    }
    let session = new_session_id();
    state
        .sessions
        .store_token(&session, SecretString::new(access_token.clone()));
    let jar = jar.add(session_cookie(session.clone()));

    if !state.options.device_selection {
        let page = DonePage {
            token_path: token_path(&state)?,
        };
        return Ok((jar, render(&page)?).into_response());
    }

    let appliances = match state
        .appliances
        .list(&SecretString::new(access_token))
        .await
    {
        Ok(list) => list,
        Err(e) => return Ok((jar, GatewayError::DeviceListing(e)).into_response()),
    };
    let directory = DeviceDirectory::from_appliances(appliances);
    let devices = directory.iter().map(DeviceOption::from).collect();
    state.sessions.set_devices(&session, directory)?;

    Ok((jar, render(&SelectPage { devices })?).into_response())
}

async fn logout(State(state): State<Arc<GatewayState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    let Some(id) = session_id(&jar) else {
        return (jar, Redirect::to("/"));
    };
    if state.sessions.remove(&id) {
        info!("session logged out");
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/"))
}

#[derive(Debug, Deserialize)]
pub struct FinishForm {
    pub dropdown: String,
}

async fn finish(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
    headers: HeaderMap,
    Form(form): Form<FinishForm>,
) -> Result<Response, GatewayError> {
    let session = session_id(&jar)
        .filter(|id| state.sessions.current_token(id).is_some())
        .ok_or(LookupError::UnknownSession)?;
    let appliance = state.sessions.lookup_device(&session, &form.dropdown)?;
    let path = state
        .tokens
        .absolute_path()
        .map_err(GatewayError::Internal)?;
    let snippet = AccessorySnippet::new(&appliance, &path);
    info!(ha_id = %appliance.ha_id, "accessory configuration generated");

    if wants_json(&headers) {
        return Ok(Json(snippet).into_response());
    }

    let json = snippet
        .to_pretty_json()
        .map_err(|e| GatewayError::Internal(e.into()))?;
    let page = FinishPage {
        name: snippet.name,
        snippet: json,
    };
    Ok(render(&page)?.into_response())
}

fn token_path(state: &GatewayState) -> Result<String, GatewayError> {
    let path = state
        .tokens
        .absolute_path()
        .map_err(GatewayError::Internal)?;
    Ok(path.display().to_string())
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}
