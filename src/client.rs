use futures::stream::Stream;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use snafu::{ensure, ResultExt, Snafu};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    batch::{BatchDetail, BatchPage, BatchSummary, Paging},
    common::xml::{error_description, from_xml},
    config::Config,
};

const MESSAGE_BATCHES: [&str; 2] = ["v1.1", "messagebatches"];

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("base URL '{base_url}' cannot carry a request path"))]
    ConstructUrl { base_url: Url },

    #[snafu(display("batch id must not be empty"))]
    EmptyBatchId,

    #[snafu(display("page size must be at least 1"))]
    InvalidPageSize,

    #[snafu(display("failed to perform request to '{url}'"))]
    PerformRequest { source: reqwest::Error, url: Url },

    #[snafu(display("failed to read response body"))]
    ReadBody { source: reqwest::Error },

    #[snafu(display(
        "bad response from server; code {code}; description: {}",
        description.as_deref().unwrap_or("none")
    ))]
    BadResponse {
        code: u16,
        description: Option<String>,
    },

    #[snafu(display("failed to deserialize XML response"))]
    Deserialize { source: quick_xml::errors::serialize::DeError },
}

impl Error {
    /// HTTP status code of a rejected request.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::BadResponse { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True when the server answered successfully but the body could not be decoded.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Deserialize { .. })
    }
}

/// Internal client for making requests to the Esendex API
pub(crate) struct EsendexClient {
    http_client: Client,
    config: Config,
}

impl EsendexClient {
    fn new(http_client: Client, config: Config) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Fetch one page of message batches
    pub(crate) async fn list_batches(&self, paging: Option<Paging>) -> Result<BatchPage, Error> {
        let url = self.batches_url(paging)?;
        let response = self.perform(Method::GET, url, StatusCode::OK).await?;
        Self::decode(response).await
    }

    /// Fetch a single message batch
    pub(crate) async fn get_batch(&self, id: &str) -> Result<BatchDetail, Error> {
        let url = self.batch_url(id, None)?;
        let response = self.perform(Method::GET, url, StatusCode::OK).await?;
        Self::decode(response).await
    }

    /// Cancel the schedule of a message batch
    pub(crate) async fn cancel_batch(&self, id: &str) -> Result<(), Error> {
        let url = self.batch_url(id, Some("schedule"))?;
        self.perform(Method::DELETE, url, StatusCode::NO_CONTENT)
            .await?;
        Ok(())
    }

    /// Send an authenticated request, accepting only the `expected` status.
    async fn perform(
        &self,
        method: Method,
        url: Url,
        expected: StatusCode,
    ) -> Result<Response, Error> {
        debug!(%method, %url, "sending request");

        let response = self
            .http_client
            .request(method, url.clone())
            .basic_auth(self.config.username(), Some(self.config.password()))
            .send()
            .await
            .context(PerformRequestSnafu { url })?;

        Self::check_response(response, expected).await
    }

    async fn check_response(response: Response, expected: StatusCode) -> Result<Response, Error> {
        let status = response.status();
        if status == expected {
            return Ok(response);
        }

        let description = match response.text().await {
            Ok(body) => error_description(&body),
            Err(e) => {
                debug!(error = %e, "failed to read error response body");
                None
            }
        };
        warn!(
            code = status.as_u16(),
            description = description.as_deref().unwrap_or("none"),
            "unexpected response status"
        );

        BadResponseSnafu {
            code: status.as_u16(),
            description,
        }
        .fail()
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
        let body = response.text().await.context(ReadBodySnafu)?;
        from_xml(&body).context(DeserializeSnafu)
    }

    fn batches_url(&self, paging: Option<Paging>) -> Result<Url, Error> {
        let mut url = self.build_url(&MESSAGE_BATCHES)?;
        if let Some(paging) = paging {
            ensure!(paging.count > 0, InvalidPageSizeSnafu);
            url.query_pairs_mut().extend_pairs(paging.query_pairs());
        }
        Ok(url)
    }

    fn batch_url(&self, id: &str, action: Option<&str>) -> Result<Url, Error> {
        ensure!(!id.is_empty(), EmptyBatchIdSnafu);
        let [version, collection] = MESSAGE_BATCHES;
        let mut segments = vec![version, collection, id];
        segments.extend(action);
        self.build_url(&segments)
    }

    /// Append `segments` beneath the base URL's path. Segments are percent-encoded.
    fn build_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.config.base_url().clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ConstructUrlSnafu {
                    base_url: self.config.base_url().clone(),
                }
                .build())?;
            path.pop_if_empty().extend(segments);
        }
        url.set_query(None);
        Ok(url)
    }
}

/// Client for the Esendex message batch API
///
/// Cloning is cheap: clones share the underlying HTTP client and configuration.
#[derive(Clone)]
pub struct Esendex {
    client: Arc<EsendexClient>,
}

impl Esendex {
    /// Create a new client with a default HTTP client
    pub fn new(config: Config) -> Self {
        Self::with_http_client(config, Client::new())
    }

    /// Create a new client for the production endpoint with the given credentials
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(Config::new(username, password))
    }

    /// Create a new client on top of a preconfigured HTTP client
    ///
    /// Timeouts, proxies and TLS settings of `http_client` apply to every request.
    pub fn with_http_client(config: Config, http_client: Client) -> Self {
        Self {
            client: Arc::new(EsendexClient::new(http_client, config)),
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.client.config
    }

    /// Lists message batches.
    ///
    /// Without paging the server's default page is returned; with paging the
    /// `startindex` and `count` query parameters select the slice.
    #[instrument(skip_all)]
    pub async fn batches(&self, paging: impl Into<Option<Paging>>) -> Result<BatchPage, Error> {
        let paging = paging.into();
        debug!(?paging, "listing message batches");
        self.client.list_batches(paging).await
    }

    /// Retrieves a single message batch by id.
    #[instrument(skip_all, fields(batch.id = %id))]
    pub async fn batch(&self, id: &str) -> Result<BatchDetail, Error> {
        self.client.get_batch(id).await
    }

    /// Cancels the schedule of a message batch.
    ///
    /// Succeeds only when the server answers `204 No Content`.
    #[instrument(skip_all, fields(batch.id = %id))]
    pub async fn cancel_batch(&self, id: &str) -> Result<(), Error> {
        self.client.cancel_batch(id).await
    }

    /// Lists every message batch.
    ///
    /// This method returns a stream that handles pagination automatically, requesting
    /// `page_size` batches at a time. It ends after the first error, on an empty page, or once
    /// `totalcount` batches have been yielded.
    pub fn batches_stream(
        &self,
        page_size: u32,
    ) -> impl Stream<Item = Result<BatchSummary, Error>> + Send {
        let client = self.client.clone();
        async_stream::try_stream! {
            let mut yielded: u64 = 0;
            let mut paging = Some(Paging::first(page_size));
            while let Some(current) = paging {
                let page = client.list_batches(Some(current)).await?;
                let total_count = u64::from(page.total_count);
                paging = page.next_paging(current);

                let remaining = total_count.saturating_sub(yielded);
                let take = usize::try_from(remaining).unwrap_or(usize::MAX);
                for batch in page.batches.into_iter().take(take) {
                    yielded += 1;
                    yield batch;
                }

                if yielded >= total_count {
                    break;
                }
            }
        }
    }
}
