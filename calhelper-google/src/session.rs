//! Authorization for the Calendar API.
//!
//! A session either signs in as a service account (token exchange and
//! refresh handled by `yup_oauth2`) or carries an access token issued
//! elsewhere, e.g. by `gcloud auth print-access-token`.

use std::path::Path;

use calhelper_core::{CalendarError, CalendarResult, GoogleConfig};
use google_calendar::Client;
use yup_oauth2::hyper::client::HttpConnector;
use yup_oauth2::hyper_rustls::HttpsConnector;
use yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};

type Authenticator = yup_oauth2::authenticator::Authenticator<HttpsConnector<HttpConnector>>;

enum Credentials {
    ServiceAccount(Authenticator),
    Token(String),
}

pub struct Session {
    credentials: Credentials,
    scopes: Vec<String>,
    client_id: String,
}

/// Read a service account JSON key.
///
/// `service_account_name`, when set, replaces the key's `client_email` as
/// the issuer of the token request.
pub async fn load_key(path: &Path, config: &GoogleConfig) -> CalendarResult<ServiceAccountKey> {
    let mut key = yup_oauth2::read_service_account_key(path).await.map_err(|e| {
        CalendarError::Auth(format!(
            "Failed to read service account key from {}: {e}",
            path.display()
        ))
    })?;

    if let Some(name) = &config.service_account_name {
        key.client_email = name.clone();
    }
    Ok(key)
}

impl Session {
    pub async fn service_account(key: ServiceAccountKey, config: &GoogleConfig) -> CalendarResult<Self> {
        tracing::debug!(issuer = %key.client_email, "building service account session");

        let auth = ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|e| CalendarError::Auth(format!("Invalid service account key: {e}")))?;

        Ok(Session {
            credentials: Credentials::ServiceAccount(auth),
            scopes: config.scopes.clone(),
            client_id: config.client_id.clone().unwrap_or_default(),
        })
    }

    /// Session using a pre-issued access token. It is never refreshed.
    pub fn with_token(token: impl Into<String>, config: &GoogleConfig) -> Self {
        Session {
            credentials: Credentials::Token(token.into()),
            scopes: config.scopes.clone(),
            client_id: config.client_id.clone().unwrap_or_default(),
        }
    }

    /// Prefers `google.access_token` over the service account key.
    pub async fn from_config(config: &GoogleConfig) -> CalendarResult<Self> {
        if let Some(token) = config.access_token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(Self::with_token(token, config));
        }

        let key = load_key(&config.key_path()?, config).await?;
        Self::service_account(key, config).await
    }

    /// Current access token; the service account flow caches and refreshes it.
    pub async fn access_token(&self) -> CalendarResult<String> {
        match &self.credentials {
            Credentials::Token(token) => Ok(token.clone()),
            Credentials::ServiceAccount(auth) => {
                let token = auth
                    .token(&self.scopes)
                    .await
                    .map_err(|e| CalendarError::Auth(format!("Token request failed: {e}")))?;

                token
                    .token()
                    .map(str::to_string)
                    .ok_or_else(|| CalendarError::Auth("Token response had no access token".into()))
            }
        }
    }

    pub async fn client(&self) -> CalendarResult<Client> {
        let token = self.access_token().await?;

        Ok(Client::new(
            self.client_id.clone(),
            String::new(),
            String::new(),
            token,
            String::new(),
        ))
    }
}
