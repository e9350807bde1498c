use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use tracing::debug;
use url::Url;

use super::backend::{ClientError, ClientResult, CmsBackend, CurrentUser};
use crate::server::requests::ContentItemRequest;
use crate::services::content_service::{BulkSaveResult, PageContentMap};

#[derive(Deserialize)]
struct LoginResponse {
    user: CurrentUser,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// [`CmsBackend`] over HTTP. The client keeps a cookie store, so a successful
/// [`login`](CmsBackend::login) authenticates every later admin call.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self { client, base_url })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("Request failed").to_string(),
    };
    debug!("API call failed with {}: {}", status, message);

    if status == StatusCode::UNAUTHORIZED {
        Err(ClientError::Unauthorized(message))
    } else {
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl CmsBackend for HttpBackend {
    async fn login(&self, email: &str, password: &str) -> ClientResult<CurrentUser> {
        let url = self.endpoint(&["api", "auth", "login"])?;
        let response = self
            .client
            .post(url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body: LoginResponse = parse_response(response).await?;
        Ok(body.user)
    }

    async fn logout(&self) -> ClientResult<()> {
        let url = self.endpoint(&["api", "auth", "logout"])?;
        let response = self.client.post(url).send().await?;
        parse_response::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn me(&self) -> ClientResult<CurrentUser> {
        let url = self.endpoint(&["api", "auth", "me"])?;
        let response = self.client.get(url).send().await?;
        parse_response(response).await
    }

    async fn page_content(&self, page: &str) -> ClientResult<PageContentMap> {
        let url = self.endpoint(&["api", "public", "content", page])?;
        let response = self.client.get(url).send().await?;
        parse_response(response).await
    }

    async fn bulk_save(&self, items: Vec<ContentItemRequest>) -> ClientResult<BulkSaveResult> {
        let url = self.endpoint(&["api", "admin", "content", "bulk"])?;
        let response = self
            .client
            .put(url)
            .json(&json!({ "items": items }))
            .send()
            .await?;
        parse_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_encode_segments() {
        let backend = HttpBackend::new("http://localhost:3000/").unwrap();
        let url = backend.endpoint(&["api", "public", "content", "o nas"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/public/content/o%20nas");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            HttpBackend::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpBackend::new("mailto:admin@czaplisko.pl"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
