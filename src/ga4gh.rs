use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Ga4ghError;
use crate::paging::fetch_all_pages;
use crate::schema::{
    CallSet, Dataset, ReferenceSet, SearchDatasetsRequest, SearchDatasetsResponse,
    SearchVariantSetsRequest, SearchVariantSetsResponse, SearchVariantsRequest,
    SearchVariantsResponse, Variant, VariantSet,
};

/// Querying a variant store can take a long time; the same limit applies to
/// every outbound call.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5 * 60);

const DATASETS_SEARCH_PATH: &str = "datasets/search";
const VARIANT_SETS_SEARCH_PATH: &str = "variantsets/search";
const VARIANTS_SEARCH_PATH: &str = "variants/search";
const REFERENCE_SETS_PATH: &str = "referencesets";
const CALL_SETS_PATH: &str = "callsets";

/// Client for the variant store hosting a single dataset.
pub trait Ga4ghClient: Send + Sync {
    fn search_datasets(&self) -> Result<Vec<Dataset>, Ga4ghError>;
    fn search_variant_sets(&self, dataset_id: &str) -> Result<Vec<VariantSet>, Ga4ghError>;
    /// Variants overlapping `[start, start + 1)` on `reference_name`.
    fn search_variants(
        &self,
        variant_set_id: &str,
        reference_name: &str,
        start: u64,
    ) -> Result<Vec<Variant>, Ga4ghError>;
    fn load_reference_set(&self, reference_set_id: &str) -> Result<ReferenceSet, Ga4ghError>;
    fn load_call_set(&self, call_set_id: &str) -> Result<CallSet, Ga4ghError>;
}

#[derive(Clone)]
pub struct Ga4ghHttpClient {
    client: Client,
    base_url: Url,
}

impl Ga4ghHttpClient {
    pub fn new(base_url: &str) -> Result<Self, Ga4ghError> {
        Self::with_timeout(base_url, DEFAULT_READ_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, Ga4ghError> {
        let base_url = parse_base_url(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("variants-beacon/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| Ga4ghError::Http(err.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| Ga4ghError::Http(err.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, Ga4ghError> {
        self.base_url
            .join(path)
            .map_err(|err| Ga4ghError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                message: err.to_string(),
            })
    }

    fn record_url(&self, collection: &str, id: &str) -> Result<Url, Ga4ghError> {
        let mut url = self.endpoint(collection)?;
        url.path_segments_mut()
            .map_err(|_| Ga4ghError::InvalidUrl {
                url: self.base_url.to_string(),
                message: "base url cannot carry path segments".to_string(),
            })?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn handle_status(response: Response) -> Result<Response, Ga4ghError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "GA4GH request failed".to_string());
        Err(Ga4ghError::Status { status, message })
    }

    fn post<B, T>(&self, path: &str, body: &B) -> Result<T, Ga4ghError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|err| Ga4ghError::Http(err.to_string()))?;
        Self::handle_status(response)?
            .json()
            .map_err(|err| Ga4ghError::Http(err.to_string()))
    }

    fn get<T>(&self, url: Url) -> Result<T, Ga4ghError>
    where
        T: DeserializeOwned,
    {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| Ga4ghError::Http(err.to_string()))?;
        Self::handle_status(response)?
            .json()
            .map_err(|err| Ga4ghError::Http(err.to_string()))
    }
}

impl Ga4ghClient for Ga4ghHttpClient {
    fn search_datasets(&self) -> Result<Vec<Dataset>, Ga4ghError> {
        let pages = fetch_all_pages(
            SearchDatasetsRequest::default(),
            |request| -> Result<SearchDatasetsResponse, Ga4ghError> {
                self.post(DATASETS_SEARCH_PATH, request)
            },
        )?;
        Ok(pages.into_iter().flat_map(|page| page.datasets).collect())
    }

    fn search_variant_sets(&self, dataset_id: &str) -> Result<Vec<VariantSet>, Ga4ghError> {
        let request = SearchVariantSetsRequest {
            dataset_id: dataset_id.to_string(),
            page_token: String::new(),
        };
        let pages = fetch_all_pages(
            request,
            |request| -> Result<SearchVariantSetsResponse, Ga4ghError> {
                self.post(VARIANT_SETS_SEARCH_PATH, request)
            },
        )?;
        Ok(pages.into_iter().flat_map(|page| page.variant_sets).collect())
    }

    fn search_variants(
        &self,
        variant_set_id: &str,
        reference_name: &str,
        start: u64,
    ) -> Result<Vec<Variant>, Ga4ghError> {
        let request = SearchVariantsRequest::at_position(variant_set_id, reference_name, start);
        let pages = fetch_all_pages(
            request,
            |request| -> Result<SearchVariantsResponse, Ga4ghError> {
                self.post(VARIANTS_SEARCH_PATH, request)
            },
        )?;
        Ok(pages.into_iter().flat_map(|page| page.variants).collect())
    }

    fn load_reference_set(&self, reference_set_id: &str) -> Result<ReferenceSet, Ga4ghError> {
        let url = self.record_url(REFERENCE_SETS_PATH, reference_set_id)?;
        self.get(url)
    }

    fn load_call_set(&self, call_set_id: &str) -> Result<CallSet, Ga4ghError> {
        let url = self.record_url(CALL_SETS_PATH, call_set_id)?;
        self.get(url)
    }
}

/// Parses a dataset's external url. A trailing slash is added so relative
/// endpoint paths resolve below it rather than replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, Ga4ghError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&normalized).map_err(|err| Ga4ghError::InvalidUrl {
        url: raw.to_string(),
        message: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(Ga4ghError::InvalidUrl {
            url: raw.to_string(),
            message: "url cannot be a base".to_string(),
        });
    }
    Ok(url)
}
