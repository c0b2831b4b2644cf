use crate::config::ApiConfig;
use crate::error::SearchError;
use crate::models::{Category, Coordinate, NearbyResponse, ResultSet, SearchDefaults, SearchQuery};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

/// The nearby-places endpoint as seen by the fetcher.
#[async_trait]
pub trait NearbyBackend: Send + Sync {
    async fn nearby(&self, query: &SearchQuery) -> Result<NearbyResponse, SearchError>;
}

/// Builds `{endpoint}?lat=..&lng=..&radius=..&category=..`.
pub fn query_url(endpoint: &str, query: &SearchQuery) -> Result<Url, SearchError> {
    Url::parse_with_params(
        endpoint,
        &[
            ("lat", query.origin.latitude.to_string()),
            ("lng", query.origin.longitude.to_string()),
            ("radius", query.radius_km.to_string()),
            ("category", query.category.as_str().to_string()),
        ],
    )
    .map_err(|e| SearchError::NetworkError(format!("invalid endpoint '{}': {}", endpoint, e)))
}

/// HTTP backend over `reqwest`.
pub struct PlacesProvider {
    client: Client,
    endpoint: String,
}

impl PlacesProvider {
    pub fn new(config: &ApiConfig) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl NearbyBackend for PlacesProvider {
    async fn nearby(&self, query: &SearchQuery) -> Result<NearbyResponse, SearchError> {
        let url = query_url(&self.endpoint, query)?;
        debug!("GET {}", url);

        // Error bodies come back with 4xx/5xx, so the status is not checked here.
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::NetworkError(e.to_string()))?;
        let status = res.status();

        res.json::<NearbyResponse>().await.map_err(|e| {
            SearchError::NetworkError(format!("undecodable response ({}): {}", status, e))
        })
    }
}

/// Issues nearby-places searches and classifies their outcome.
pub struct ResultsFetcher<B> {
    backend: B,
    defaults: SearchDefaults,
}

impl<B: NearbyBackend> ResultsFetcher<B> {
    pub fn new(backend: B, defaults: SearchDefaults) -> Self {
        Self { backend, defaults }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn defaults(&self) -> &SearchDefaults {
        &self.defaults
    }

    /// Builds a query from possibly-absent inputs and fetches it.
    ///
    /// Without an origin this fails with [`SearchError::MissingOrigin`]
    /// before anything reaches the backend.
    pub async fn search(
        &self,
        origin: Option<Coordinate>,
        radius_km: Option<f64>,
        category: Option<Category>,
    ) -> Result<ResultSet, SearchError> {
        let query = SearchQuery::from_inputs(origin, radius_km, category, &self.defaults)?;
        self.fetch(&query).await
    }

    /// Exactly one backend call per invocation. No retry.
    pub async fn fetch(&self, query: &SearchQuery) -> Result<ResultSet, SearchError> {
        info!(
            "Searching {} within {}km of ({})",
            query.category, query.radius_km, query.origin
        );

        let outcome = self
            .backend
            .nearby(query)
            .await
            .and_then(NearbyResponse::into_result_set);

        match &outcome {
            Ok(places) => info!("Search returned {} places", places.len()),
            Err(e @ SearchError::NetworkError(detail)) => warn!("{} ({})", e, detail),
            Err(e) => warn!("Search failed: {}", e),
        }
        outcome
    }
}
