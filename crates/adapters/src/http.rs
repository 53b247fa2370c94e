use std::time::Duration;

use log::debug;
use meme_studio_application::{ApplicationError, HttpRequest, HttpResponse, HttpTransport};
use meme_studio_domain::HttpMethod;
use reqwest::blocking::Client;
use reqwest::Method;

/// Blocking HTTP transport with a session cookie jar, so credentialed
/// requests carry the backend session like a browser would.
pub struct ReqwestTransport {
    client: Client,
    anonymous: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApplicationError> {
        let build = |cookies: bool| {
            Client::builder()
                .timeout(timeout)
                .cookie_store(cookies)
                .build()
                .map_err(|error| ApplicationError::Transport(error.to_string()))
        };
        Ok(Self {
            client: build(true)?,
            anonymous: build(false)?,
        })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApplicationError> {
        let client = if request.include_credentials {
            &self.client
        } else {
            &self.anonymous
        };
        debug!("{} {}", request.method, request.url);

        let mut builder = client.request(method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .map_err(|error| ApplicationError::Transport(error.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|error| ApplicationError::Transport(error.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_method() {
        assert_eq!(method(HttpMethod::Get), Method::GET);
        assert_eq!(method(HttpMethod::Patch), Method::PATCH);
        assert_eq!(method(HttpMethod::Delete), Method::DELETE);
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let transport = ReqwestTransport::new(Duration::from_millis(200)).expect("client");
        let result = transport.send(&HttpRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:9/api/templates".to_string(),
            headers: Vec::new(),
            body: None,
            include_credentials: true,
        });
        assert!(matches!(result, Err(ApplicationError::Transport(_))));
    }
}
