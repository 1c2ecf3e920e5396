use std::{fmt::Debug, sync::Arc};

use log::*;
use reqwest::{header::LOCATION, Client, Response, StatusCode};
use serde::Serialize;
use url::Url;

use crate::{
    directory::{CustomerDirectory, DirectoryConfig, DirectoryError},
    directory_types::{Address, Card, CustomerDirectoryEntry, CustomerProfile, CustomerSearchResponse},
};

const CUSTOMER_SEARCH_PATH: &str = "/customers/search/findByUsername";
const CUSTOMERS_PATH: &str = "/customers";
const ADDRESSES_PATH: &str = "/addresses";
const CARDS_PATH: &str = "/cards";

/// A [`CustomerDirectory`] backed by the accounts service's REST API.
#[derive(Clone)]
pub struct HttpCustomerDirectory {
    config: DirectoryConfig,
    client: Arc<Client>,
}

impl Debug for HttpCustomerDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HttpCustomerDirectory ({})", self.config.base_url)
    }
}

impl HttpCustomerDirectory {
    /// Builds the client. The base URL must be an absolute `http` or `https` URL with a host, e.g. `http://accounts`.
    pub fn new(config: DirectoryConfig) -> Result<Self, DirectoryError> {
        validate_base_url(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DirectoryError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// POSTs `body` as JSON to `path`. Anything other than `200 OK` or `201 Created` is an error.
    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Response, DirectoryError> {
        let url = self.url(path);
        trace!("POSTing to {url}");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;
        check_status(response, is_created).await
    }

    async fn create_resource<B: Serialize>(&self, path: &str, body: &B, kind: &str) -> Result<String, DirectoryError> {
        let response = self.post_json(path, body).await?;
        let link = location(&response).ok_or_else(|| DirectoryError::MissingLocation(kind.to_string()))?;
        debug!("Created {kind} at {link}");
        Ok(link)
    }
}

fn validate_base_url(base_url: &str) -> Result<(), DirectoryError> {
    let invalid = || DirectoryError::InvalidUrl(base_url.to_string());
    let url = Url::parse(base_url).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(invalid());
    }
    Ok(())
}

fn is_created(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::CREATED
}

async fn check_status(response: Response, accepted: fn(StatusCode) -> bool) -> Result<Response, DirectoryError> {
    if accepted(response.status()) {
        trace!("Directory request successful. {}", response.status());
        Ok(response)
    } else {
        let status = response.status().as_u16();
        let message = response.text().await.map_err(|e| DirectoryError::Transport(e.to_string()))?;
        Err(DirectoryError::Rejected { status, message })
    }
}

fn location(response: &Response) -> Option<String> {
    response.headers().get(LOCATION).and_then(|v| v.to_str().ok()).filter(|s| !s.is_empty()).map(String::from)
}

impl CustomerDirectory for HttpCustomerDirectory {
    async fn find_customers_by_username(&self, username: &str) -> Result<Vec<CustomerDirectoryEntry>, DirectoryError> {
        let url = self.url(CUSTOMER_SEARCH_PATH);
        debug!("Looking up customer {username} at {url}");
        let response = self
            .client
            .get(url)
            .query(&[("username", username)])
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;
        let response = check_status(response, |s| s.is_success()).await?;
        let body =
            response.json::<CustomerSearchResponse>().await.map_err(|e| DirectoryError::Json(e.to_string()))?;
        trace!("Directory search response: {body:?}");
        Ok(body.into())
    }

    async fn create_address(&self, address: &Address) -> Result<String, DirectoryError> {
        self.create_resource(ADDRESSES_PATH, address, "address").await
    }

    async fn create_card(&self, card: &Card) -> Result<String, DirectoryError> {
        self.create_resource(CARDS_PATH, card, "card").await
    }

    async fn create_customer(&self, customer: &CustomerProfile) -> Result<Option<String>, DirectoryError> {
        debug!("Creating customer {}", customer.username);
        let response = self.post_json(CUSTOMERS_PATH, customer).await?;
        Ok(location(&response))
    }
}
