//! Person Data
//!
//! Signed, bearer-authenticated retrieval of attribute-scoped person data.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{error_message_from_body, ResourceFetchError};
use crate::signing::RequestSigner;
use crate::types::{join_attributes, MyInfoConfig, PersonRecord};

/// Person endpoint client.
pub struct PersonFetcher<T: HttpTransport> {
    config: Arc<MyInfoConfig>,
    transport: Arc<T>,
    signer: Arc<RequestSigner>,
}

impl<T: HttpTransport> PersonFetcher<T> {
    pub fn new(config: Arc<MyInfoConfig>, transport: Arc<T>, signer: Arc<RequestSigner>) -> Self {
        Self {
            config,
            transport,
            signer,
        }
    }

    fn build_person_query<S: AsRef<str>>(&self, attributes: &[S]) -> Vec<(String, String)> {
        vec![
            ("client_id".to_string(), self.config.client_id.clone()),
            ("attributes".to_string(), join_attributes(attributes)),
        ]
    }

    /// Fetch person data for a verified subject.
    ///
    /// The body is returned as received; it is not checked against any
    /// attribute schema.
    #[instrument(skip(self, access_token, attributes), fields(attributes = attributes.len()))]
    pub async fn fetch<S: AsRef<str> + Send + Sync>(
        &self,
        access_token: &str,
        subject: &str,
        attributes: &[S],
    ) -> Result<PersonRecord, ResourceFetchError> {
        let url = self.config.person_url(subject);
        let query = self.build_person_query(attributes);
        let signed = self.signer.sign(HttpMethod::Get, &url, &query)?;

        let mut headers = HashMap::new();
        headers.insert("cache-control".to_string(), "no-cache".to_string());
        headers.insert("accept".to_string(), "application/json".to_string());
        headers.insert("authorization".to_string(), signed.with_bearer(access_token));

        let request = HttpRequest {
            method: HttpMethod::Get,
            url,
            query,
            headers,
            body: None,
            timeout: Some(self.config.timeout),
        };

        debug!("requesting person data");
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let message = error_message_from_body(response.status, &response.body);
            warn!(status = response.status, %message, "person endpoint rejected request");
            return Err(ResourceFetchError::HttpStatus {
                status: response.status,
                message,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| ResourceFetchError::InvalidJson {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockHttpTransport;
    use crate::flows::test_support::{test_config, CLIENT_PRIVATE_KEY, CLIENT_PUBLIC_KEY};
    use crate::signing::SignedHeader;
    use serde_json::json;

    fn fetcher(transport: Arc<MockHttpTransport>) -> PersonFetcher<MockHttpTransport> {
        let config = Arc::new(test_config());
        let signer = Arc::new(RequestSigner::new(&config.client_id, CLIENT_PRIVATE_KEY).unwrap());
        PersonFetcher::new(config, transport, signer)
    }

    #[tokio::test]
    async fn test_fetch_person() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(200, &json!({"name": {"value": "Tan Ah Kow"}}));

        let record = fetcher(transport.clone())
            .fetch("T1", "S0000001X", &["name", "regadd.postal"])
            .await
            .unwrap();
        assert_eq!(record.value_of("name"), Some(&json!("Tan Ah Kow")));

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.full_url(),
            "https://test.api.myinfo.gov.sg/com/v3/person/S0000001X/\
             ?client_id=STG2-MYINFO-SELF-TEST&attributes=name%2Cregadd.postal"
        );
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_authorization_carries_signature_and_bearer() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(200, &json!({}));

        fetcher(transport.clone())
            .fetch("T1", "S0000001X", &["name"])
            .await
            .unwrap();

        let request = transport.get_last_request().unwrap();
        let authorization = request.header("authorization").unwrap();
        assert!(authorization.starts_with("PKI_SIGN timestamp=\""));
        assert!(authorization.ends_with("\",Bearer T1"));

        let header = SignedHeader::parse(authorization).unwrap();
        header
            .verify(CLIENT_PUBLIC_KEY, HttpMethod::Get, &request.url, &request.query)
            .unwrap();
    }

    #[tokio::test]
    async fn test_partial_body_passes_through() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(
            200,
            &json!({"name": {"value": "Tan Ah Kow"}, "unexpected": [1, 2, 3]}),
        );

        let record = fetcher(transport)
            .fetch("T1", "S0000001X", &["name", "email"])
            .await
            .unwrap();
        assert_eq!(record.len(), 2);
        assert!(record.is_unavailable("email"));
    }

    #[tokio::test]
    async fn test_http_error() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(401, &json!({"code": 401, "message": "Token expired"}));

        let result = fetcher(transport).fetch("T1", "S0000001X", &["name"]).await;
        assert!(matches!(
            result,
            Err(ResourceFetchError::HttpStatus { status: 401, ref message }) if message == "Token expired"
        ));
    }

    #[tokio::test]
    async fn test_non_json_body() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_body(200, "eyJhbGciOiJSU0EtT0FFUCJ9.encrypted");

        let result = fetcher(transport).fetch("T1", "S0000001X", &["name"]).await;
        assert!(matches!(result, Err(ResourceFetchError::InvalidJson { .. })));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let transport = Arc::new(MockHttpTransport::new());

        let result = fetcher(transport).fetch("T1", "S0000001X", &["name"]).await;
        assert!(matches!(result, Err(ResourceFetchError::Transport(_))));
    }
}
