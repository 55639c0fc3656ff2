use serde::{Deserialize, Serialize};

/// Audience accepting both organizational and personal Microsoft accounts.
pub const SIGN_IN_AUDIENCE: &str = "AzureADandPersonalMicrosoftAccount";
pub const ACCESS_TOKEN_VERSION: u8 = 2;

/// Partial update applied to a directory application for web sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPatch {
    pub api: ApiSettings,
    pub sign_in_audience: String,
    pub web: WebSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    pub requested_access_token_version: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSettings {
    pub home_page_url: String,
    pub redirect_uris: Vec<String>,
    pub logout_url: String,
}

impl ApplicationPatch {
    /// OpenID Connect sign-in configuration for a site served at `host_name`.
    pub fn web_sign_in(host_name: &str) -> Self {
        Self {
            api: ApiSettings {
                requested_access_token_version: ACCESS_TOKEN_VERSION,
            },
            sign_in_audience: SIGN_IN_AUDIENCE.to_string(),
            web: WebSettings {
                home_page_url: format!("https://{host_name}"),
                redirect_uris: vec![format!("https://{host_name}/signin-oidc")],
                logout_url: format!("https://{host_name}/signout-oidc"),
            },
        }
    }
}
