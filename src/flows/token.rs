//! Token Exchange
//!
//! Trades an authorization code for an access token at the token endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{error_message_from_body, TokenExchangeError};
use crate::signing::{query_string, RequestSigner};
use crate::types::{MyInfoConfig, TokenResponse};

/// Token endpoint client.
pub struct TokenExchanger<T: HttpTransport> {
    config: Arc<MyInfoConfig>,
    transport: Arc<T>,
    signer: Arc<RequestSigner>,
}

impl<T: HttpTransport> TokenExchanger<T> {
    pub fn new(config: Arc<MyInfoConfig>, transport: Arc<T>, signer: Arc<RequestSigner>) -> Self {
        Self {
            config,
            transport,
            signer,
        }
    }

    /// Form parameters of the token request. All of them are signed,
    /// the client secret included.
    fn build_token_params(&self, code: &str) -> Vec<(String, String)> {
        vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), self.config.redirect_uri.clone()),
            ("client_id".to_string(), self.config.client_id.clone()),
            (
                "client_secret".to_string(),
                self.config.client_secret_value().to_string(),
            ),
        ]
    }

    /// Exchange an authorization code for an access token.
    #[instrument(skip(self, code), fields(client_id = %self.config.client_id))]
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, TokenExchangeError> {
        if code.is_empty() {
            return Err(TokenExchangeError::MissingCode);
        }

        let url = self.config.token_url();
        let params = self.build_token_params(code);
        let signed = self.signer.sign(HttpMethod::Post, &url, &params)?;

        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        headers.insert("cache-control".to_string(), "no-cache".to_string());
        headers.insert("accept".to_string(), "application/json".to_string());
        headers.insert("authorization".to_string(), signed.header_value());

        let request = HttpRequest {
            method: HttpMethod::Post,
            url,
            query: Vec::new(),
            headers,
            body: Some(query_string(&params)),
            timeout: Some(self.config.timeout),
        };

        debug!("requesting access token");
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let message = error_message_from_body(response.status, &response.body);
            warn!(status = response.status, %message, "token endpoint rejected exchange");
            return Err(TokenExchangeError::HttpStatus {
                status: response.status,
                message,
            });
        }

        parse_token_response(&response.body)
    }
}

/// Parse a token endpoint body, requiring a string `access_token`.
pub fn parse_token_response(body: &str) -> Result<TokenResponse, TokenExchangeError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| TokenExchangeError::InvalidJson {
            message: e.to_string(),
        })?;

    if !value
        .get("access_token")
        .map(serde_json::Value::is_string)
        .unwrap_or(false)
    {
        return Err(TokenExchangeError::MissingAccessToken);
    }

    serde_json::from_value(value).map_err(|e| TokenExchangeError::InvalidJson {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockHttpTransport;
    use crate::error::TransportError;
    use crate::flows::test_support::{test_config, CLIENT_PRIVATE_KEY, CLIENT_PUBLIC_KEY};
    use crate::signing::SignedHeader;
    use serde_json::json;

    fn exchanger(transport: Arc<MockHttpTransport>) -> TokenExchanger<MockHttpTransport> {
        let config = Arc::new(test_config());
        let signer = Arc::new(RequestSigner::new(&config.client_id, CLIENT_PRIVATE_KEY).unwrap());
        TokenExchanger::new(config, transport, signer)
    }

    #[tokio::test]
    async fn test_exchange_code_success() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(
            200,
            &json!({"access_token": "T1", "token_type": "Bearer", "expires_in": 1800}),
        );

        let token = exchanger(transport.clone())
            .exchange_code("auth-code")
            .await
            .unwrap();
        assert_eq!(token.access_token, "T1");
        assert_eq!(token.expires_in, Some(1800));

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://test.api.myinfo.gov.sg/com/v3/token");
        assert_eq!(
            request.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(request.header("cache-control"), Some("no-cache"));
        assert_eq!(
            request.body.as_deref(),
            Some(
                "grant_type=authorization_code&code=auth-code\
                 &redirect_uri=http%3A%2F%2Flocalhost%3A3001%2Fcallback\
                 &client_id=STG2-MYINFO-SELF-TEST\
                 &client_secret=44d953c796cccebcec9bdc826852857ab412fbe2"
            )
        );
    }

    #[tokio::test]
    async fn test_signature_covers_every_form_param() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(200, &json!({"access_token": "T1"}));

        let exchanger = exchanger(transport.clone());
        exchanger.exchange_code("auth-code").await.unwrap();

        let request = transport.get_last_request().unwrap();
        let header = SignedHeader::parse(request.header("authorization").unwrap()).unwrap();
        assert_eq!(header.app_id, "STG2-MYINFO-SELF-TEST");

        let params = exchanger.build_token_params("auth-code");
        header
            .verify(CLIENT_PUBLIC_KEY, HttpMethod::Post, &request.url, &params)
            .unwrap();

        let without_secret: Vec<_> = params
            .into_iter()
            .filter(|(k, _)| k != "client_secret")
            .collect();
        assert!(header
            .verify(CLIENT_PUBLIC_KEY, HttpMethod::Post, &request.url, &without_secret)
            .is_err());
    }

    #[tokio::test]
    async fn test_missing_access_token() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(200, &json!({"token_type": "Bearer"}));

        let result = exchanger(transport).exchange_code("auth-code").await;
        assert!(matches!(result, Err(TokenExchangeError::MissingAccessToken)));
    }

    #[tokio::test]
    async fn test_non_string_access_token() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(200, &json!({"access_token": 42}));

        let result = exchanger(transport).exchange_code("auth-code").await;
        assert!(matches!(result, Err(TokenExchangeError::MissingAccessToken)));
    }

    #[tokio::test]
    async fn test_http_error_carries_gateway_message() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(
            401,
            &json!({"code": 401, "message": "Invalid signature"}),
        );

        let result = exchanger(transport).exchange_code("auth-code").await;
        match result {
            Err(TokenExchangeError::HttpStatus { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid signature");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_body(200, "<html>maintenance</html>");

        let result = exchanger(transport).exchange_code("auth-code").await;
        assert!(matches!(result, Err(TokenExchangeError::InvalidJson { .. })));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let transport = Arc::new(MockHttpTransport::new());

        let result = exchanger(transport).exchange_code("auth-code").await;
        assert!(matches!(
            result,
            Err(TokenExchangeError::Transport(TransportError::ConnectionFailed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_empty_code_is_not_sent() {
        let transport = Arc::new(MockHttpTransport::new());

        let result = exchanger(transport.clone()).exchange_code("").await;
        assert!(matches!(result, Err(TokenExchangeError::MissingCode)));
        assert!(transport.get_requests().is_empty());
    }
}
