use std::marker::PhantomData;

use log::error;
use meme_studio_domain::{
    endpoints, AiStyle, ApplyStyleRequest, ApplyStyleResponse, Collage, CollagePatch, HttpMethod,
    MemeTemplate, NewCollage, NewMemeTemplate, NewSavedMeme, RecordId, SavedMeme, SavedMemePatch,
    TemplatePatch, UnauthorizedBehavior,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{ApplicationError, HttpRequest, HttpResponse, HttpTransport};

const JSON_CONTENT_TYPE: &str = "application/json";

/// JSON client for the meme backend.
pub struct ApiClient {
    transport: Box<dyn HttpTransport>,
    base_url: String,
}

impl ApiClient {
    pub fn new(transport: Box<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Sends `body` as JSON (never for GET) with credentials and parses the
    /// JSON reply. Non-2xx answers fail with `"<status>: <body>"`.
    pub fn request<B, R>(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&B>,
    ) -> Result<R, ApplicationError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let result = self
            .send(method, url, body)
            .and_then(|response| parse_json(&response));
        if let Err(error) = &result {
            error!("api request error ({method} {url}): {error}");
        }
        result
    }

    /// Like `request`, for endpoints that answer without a body.
    pub fn execute<B>(&self, method: HttpMethod, url: &str, body: Option<&B>) -> Result<(), ApplicationError>
    where
        B: Serialize + ?Sized,
    {
        let result = self.send(method, url, body).map(|_| ());
        if let Err(error) = &result {
            error!("api request error ({method} {url}): {error}");
        }
        result
    }

    pub fn query_fn<R: DeserializeOwned>(&self, on_unauthorized: UnauthorizedBehavior) -> QueryFn<'_, R> {
        QueryFn {
            client: self,
            on_unauthorized,
            _response: PhantomData,
        }
    }

    pub fn list_templates(&self) -> Result<Vec<MemeTemplate>, ApplicationError> {
        self.request::<(), _>(HttpMethod::Get, endpoints::TEMPLATES, None)
    }

    pub fn get_template(&self, id: RecordId) -> Result<MemeTemplate, ApplicationError> {
        self.request::<(), _>(HttpMethod::Get, &endpoints::template(id), None)
    }

    pub fn create_template(&self, template: &NewMemeTemplate) -> Result<MemeTemplate, ApplicationError> {
        self.request(HttpMethod::Post, endpoints::TEMPLATES, Some(template))
    }

    pub fn update_template(
        &self,
        id: RecordId,
        patch: &TemplatePatch,
    ) -> Result<MemeTemplate, ApplicationError> {
        self.request(HttpMethod::Put, &endpoints::template(id), Some(patch))
    }

    pub fn delete_template(&self, id: RecordId) -> Result<(), ApplicationError> {
        self.execute::<()>(HttpMethod::Delete, &endpoints::template(id), None)
    }

    pub fn list_memes(&self) -> Result<Vec<SavedMeme>, ApplicationError> {
        self.request::<(), _>(HttpMethod::Get, endpoints::MEMES, None)
    }

    pub fn get_meme(&self, id: RecordId) -> Result<SavedMeme, ApplicationError> {
        self.request::<(), _>(HttpMethod::Get, &endpoints::meme(id), None)
    }

    pub fn create_meme(&self, meme: &NewSavedMeme) -> Result<SavedMeme, ApplicationError> {
        self.request(HttpMethod::Post, endpoints::MEMES, Some(meme))
    }

    pub fn update_meme(
        &self,
        id: RecordId,
        patch: &SavedMemePatch,
    ) -> Result<SavedMeme, ApplicationError> {
        self.request(HttpMethod::Put, &endpoints::meme(id), Some(patch))
    }

    pub fn delete_meme(&self, id: RecordId) -> Result<(), ApplicationError> {
        self.execute::<()>(HttpMethod::Delete, &endpoints::meme(id), None)
    }

    pub fn list_collages(&self) -> Result<Vec<Collage>, ApplicationError> {
        self.request::<(), _>(HttpMethod::Get, endpoints::COLLAGES, None)
    }

    pub fn get_collage(&self, id: RecordId) -> Result<Collage, ApplicationError> {
        self.request::<(), _>(HttpMethod::Get, &endpoints::collage(id), None)
    }

    pub fn create_collage(&self, collage: &NewCollage) -> Result<Collage, ApplicationError> {
        self.request(HttpMethod::Post, endpoints::COLLAGES, Some(collage))
    }

    pub fn update_collage(
        &self,
        id: RecordId,
        patch: &CollagePatch,
    ) -> Result<Collage, ApplicationError> {
        self.request(HttpMethod::Put, &endpoints::collage(id), Some(patch))
    }

    pub fn delete_collage(&self, id: RecordId) -> Result<(), ApplicationError> {
        self.execute::<()>(HttpMethod::Delete, &endpoints::collage(id), None)
    }

    pub fn list_styles(&self) -> Result<Vec<AiStyle>, ApplicationError> {
        self.request::<(), _>(HttpMethod::Get, endpoints::STYLES, None)
    }

    pub fn get_style(&self, id: RecordId) -> Result<AiStyle, ApplicationError> {
        self.request::<(), _>(HttpMethod::Get, &endpoints::style(id), None)
    }

    pub fn apply_style(&self, request: &ApplyStyleRequest) -> Result<ApplyStyleResponse, ApplicationError> {
        self.request(HttpMethod::Post, endpoints::APPLY_STYLE, Some(request))
    }

    fn send<B>(&self, method: HttpMethod, url: &str, body: Option<&B>) -> Result<HttpResponse, ApplicationError>
    where
        B: Serialize + ?Sized,
    {
        let body = match body {
            Some(body) if method.carries_body() => Some(
                serde_json::to_string(body)
                    .map_err(|error| ApplicationError::InvalidInput(error.to_string()))?,
            ),
            _ => None,
        };
        let request = HttpRequest {
            method,
            url: self.resolve_url(url),
            headers: vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())],
            body,
            include_credentials: true,
        };
        let response = self.transport.send(&request)?;
        ensure_success(&response)?;
        Ok(response)
    }

    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") || self.base_url.is_empty() {
            return url.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

/// Query function bound to one 401 policy, used by cached reads.
pub struct QueryFn<'a, R> {
    client: &'a ApiClient,
    on_unauthorized: UnauthorizedBehavior,
    _response: PhantomData<fn() -> R>,
}

impl<R: DeserializeOwned> QueryFn<'_, R> {
    /// `Ok(None)` only when the policy is `ReturnNull` and the backend said 401.
    pub fn fetch(&self, key: &str) -> Result<Option<R>, ApplicationError> {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: self.client.resolve_url(key),
            headers: Vec::new(),
            body: None,
            include_credentials: true,
        };
        let response = self.client.transport.send(&request)?;

        if self.on_unauthorized == UnauthorizedBehavior::ReturnNull && response.status == 401 {
            return Ok(None);
        }

        ensure_success(&response)?;
        parse_json(&response).map(Some)
    }
}

fn ensure_success(response: &HttpResponse) -> Result<(), ApplicationError> {
    if response.is_success() {
        return Ok(());
    }
    let body = if response.body.is_empty() {
        response.status_text.clone()
    } else {
        response.body.clone()
    };
    Err(ApplicationError::Http {
        status: response.status,
        body,
    })
}

fn parse_json<R: DeserializeOwned>(response: &HttpResponse) -> Result<R, ApplicationError> {
    serde_json::from_str(&response.body)
        .map_err(|error| ApplicationError::Decode(format!("invalid json response: {error}")))
}
