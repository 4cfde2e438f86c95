use {
    askama::Template,
    axum::{
        http::StatusCode,
        response::{Html, IntoResponse, Response},
    },
    hcauth_sessions::LookupError,
    tracing::{error, warn},
};

use crate::pages::ErrorPage;

/// Failures a request can end in. Provider-reported denials are not errors;
/// they render their own page.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("the authorization callback carried neither a code nor an error")]
    MissingCode,
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("Home Connect did not accept the authorization code")]
    TokenExchange(#[source] anyhow::Error),
    #[error("the token was saved, but listing home appliances failed")]
    DeviceListing(#[source] anyhow::Error),
    #[error("the token could not be saved")]
    TokenPersist(#[source] anyhow::Error),
    #[error("failed to render page")]
    Render(#[from] askama::Error),
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingCode => StatusCode::BAD_REQUEST,
            Self::Lookup(_) => StatusCode::NOT_FOUND,
            Self::TokenExchange(_) | Self::DeviceListing(_) => StatusCode::BAD_GATEWAY,
            Self::TokenPersist(_) | Self::Render(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::TokenExchange(e)
            | Self::DeviceListing(e)
            | Self::TokenPersist(e)
            | Self::Internal(e) => format!("{self}: {e:#}"),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.detail(), "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        let page = ErrorPage {
            status: status.as_u16(),
            message: self.to_string(),
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => (status, self.to_string()).into_response(),
        }
    }
}
