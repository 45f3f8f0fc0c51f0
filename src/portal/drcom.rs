//! DrCOM captive portal implementation
//!
//! Campus networks running a DrCOM gateway authenticate with a single
//! JSONP-over-GET call: `/drcom/login?callback=dr1003&DDDDD=<id>@cmcc&...`.
//! The password travels as a plaintext query parameter; that is the
//! protocol's fixed shape, with no channel protection beyond whatever the
//! configured base URL scheme provides.

use crate::config::Config;
use crate::http::HttpClient;
use crate::models::{LoginFailure, LoginOutcome};
use crate::parser;
use crate::portal::Portal;
use anyhow::Result;
use async_trait::async_trait;

/// Login endpoint, relative to the configured base URL
const LOGIN_PATH: &str = "/drcom/login";

/// JSONP callback name the portal echoes back
const CALLBACK: &str = "dr1003";

/// Fixed authentication key expected on every request
const AUTH_KEY: &str = "123456";

/// Carrier suffix appended to every transmitted account id
const CARRIER_SUFFIX: &str = "@cmcc";

/// Portal script version tag
const JS_VERSION: &str = "4.2";

/// Client version tag
const CLIENT_VERSION: &str = "2023";

/// Query parameters for one login request
///
/// Construction is pure and total: no validation, no side effects. Blank
/// input checks belong to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginParams {
    /// Transmitted account, already carrying the carrier suffix
    pub account: String,
    /// Password, verbatim
    pub password: String,
}

impl LoginParams {
    pub fn new(account_id: &str, password: &str) -> Self {
        Self {
            account: format!("{account_id}{CARRIER_SUFFIX}"),
            password: password.to_string(),
        }
    }

    /// Full parameter set in the portal's fixed wire order
    ///
    /// Everything except `DDDDD` and `upass` is a protocol constant the
    /// gateway requires but never varies.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("callback", CALLBACK.to_string()),
            ("DDDDD", self.account.clone()),
            ("upass", self.password.clone()),
            ("0MKKey", AUTH_KEY.to_string()),
            ("R1", "0".to_string()),
            ("R2", String::new()),
            ("R3", "0".to_string()),
            ("R6", "0".to_string()),
            ("para", "00".to_string()),
            ("v6ip", String::new()),
            ("terminal_type", "1".to_string()),
            ("lang", "zh-cn".to_string()),
            ("jsVersion", JS_VERSION.to_string()),
            ("v", CLIENT_VERSION.to_string()),
        ]
    }
}

/// DrCOM portal client
pub struct DrcomPortal {
    base_url: String,
    client: HttpClient,
}

impl DrcomPortal {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            base_url: cfg.server.base_url.trim_end_matches('/').to_string(),
            client: HttpClient::new(&cfg.http)?,
        })
    }

    fn login_url(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_PATH)
    }
}

#[async_trait]
impl Portal for DrcomPortal {
    fn name(&self) -> &str {
        "DrCOM"
    }

    async fn login(&self, account: &str, password: &str) -> LoginOutcome {
        let params = LoginParams::new(account, password);
        let url = self.login_url();

        tracing::debug!("GET {} as {}", url, params.account);

        let resp = self
            .client
            .get_query(&url, &params.query_pairs())
            .await
            .map_err(LoginFailure::from)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(LoginFailure::from)?;

        tracing::debug!("raw response: {}", body);

        parser::interpret(&body, status)
    }
}
