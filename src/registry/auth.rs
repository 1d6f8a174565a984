//! Authentication against the identity service (Keystone v2.0 token API)

use crate::config::{Credentials, Endpoint};
use crate::error::handlers::{HttpErrorHandler, NetworkErrorHandler};
use crate::error::Result;
use crate::logging::Logger;
use crate::registry::transport::{AccessToken, IdentityService, TokenOutcome};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

pub const TOKENS_PATH: &str = "/v2.0/tokens";

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    auth: AuthBody<'a>,
}

#[derive(Debug, Serialize)]
struct AuthBody<'a> {
    #[serde(rename = "passwordCredentials")]
    password_credentials: PasswordCredentials<'a>,
    #[serde(rename = "tenantId")]
    tenant_id: &'a str,
}

#[derive(Debug, Serialize)]
struct PasswordCredentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access: Access,
}

#[derive(Debug, Deserialize)]
struct Access {
    token: TokenId,
}

#[derive(Debug, Deserialize)]
struct TokenId {
    id: String,
}

#[derive(Debug, Clone)]
pub struct IdentityClient {
    client: Client,
    endpoint: Endpoint,
    output: Logger,
}

impl IdentityClient {
    pub fn new(client: Client, endpoint: Endpoint, output: Logger) -> Self {
        Self {
            client,
            endpoint,
            output,
        }
    }

    /// Build the token issuance request
    pub fn token_request(&self, credentials: &Credentials) -> Result<RequestBuilder> {
        let url = self.endpoint.url(TOKENS_PATH)?;
        let body = TokenRequest {
            auth: AuthBody {
                password_credentials: PasswordCredentials {
                    username: &credentials.user,
                    password: &credentials.password,
                },
                tenant_id: &credentials.tenant_id,
            },
        };

        Ok(self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&body))
    }
}

/// Interpret a token response. Only a 200 carrying `access.token.id` issues a token.
pub fn token_from_response(status: StatusCode, body: &str) -> TokenOutcome {
    if status != StatusCode::OK {
        return TokenOutcome::Rejected {
            status: status.as_u16(),
            reason: HttpErrorHandler::describe_auth_rejection(status),
        };
    }

    match serde_json::from_str::<TokenResponse>(body) {
        Ok(response) => TokenOutcome::Issued(AccessToken::new(response.access.token.id)),
        Err(e) => TokenOutcome::Rejected {
            status: status.as_u16(),
            reason: format!("Token response has no access.token.id: {}", e),
        },
    }
}

#[async_trait]
impl IdentityService for IdentityClient {
    async fn retrieve_token(&self, credentials: &Credentials) -> Result<TokenOutcome> {
        self.output.detail(&format!(
            "Requesting token for user '{}' in tenant '{}' from {}",
            credentials.user,
            credentials.tenant_id,
            self.endpoint.base_url()
        ));

        let response = self
            .token_request(credentials)?
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "token request"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "token request"))?;

        let outcome = token_from_response(status, &body);
        if let TokenOutcome::Issued(token) = &outcome {
            self.output
                .detail(&format!("Token obtained (length: {} chars)", token.as_str().len()));
        }
        Ok(outcome)
    }
}
