//! HTML pages rendered by the flow. Templates live in `templates/`.

use {askama::Template, axum::response::Html, hcauth_appliances::Appliance};

use crate::error::GatewayError;

pub fn render<T: Template>(page: &T) -> Result<Html<String>, GatewayError> {
    Ok(Html(page.render()?))
}

#[derive(Template)]
#[template(path = "welcome.html")]
pub struct WelcomePage {
    pub action: &'static str,
}

/// Shown at `/` once this browser has completed the flow.
#[derive(Template)]
#[template(path = "authorized.html")]
pub struct AuthorizedPage {
    pub token_path: String,
}

#[derive(Template)]
#[template(path = "denied.html")]
pub struct DeniedPage {
    pub reason: String,
    pub description: String,
}

#[derive(Template)]
#[template(path = "done.html")]
pub struct DonePage {
    pub token_path: String,
}

pub struct DeviceOption {
    pub ha_id: String,
    pub label: String,
}

impl From<&Appliance> for DeviceOption {
    fn from(appliance: &Appliance) -> Self {
        Self {
            ha_id: appliance.ha_id.clone(),
            label: appliance.label(),
        }
    }
}

#[derive(Template)]
#[template(path = "select.html")]
pub struct SelectPage {
    pub devices: Vec<DeviceOption>,
}

#[derive(Template)]
#[template(path = "finish.html")]
pub struct FinishPage {
    pub name: String,
    pub snippet: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub status: u16,
    pub message: String,
}
