use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::consts::{DEFAULT_CITIES_URL, DEFAULT_HADITH_BASE, DEFAULT_PRAYER_SCHEDULE_BASE};
use crate::hadith::{self, HadithPage, SelectedHadith};
use crate::prayer::{self, DailySchedule};
use crate::retry::{Backoff, RetryError, Transient, retry};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Where each upstream service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub cities_url: String,
    pub schedule_base: String,
    pub hadith_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cities_url: DEFAULT_CITIES_URL.to_owned(),
            schedule_base: DEFAULT_PRAYER_SCHEDULE_BASE.to_owned(),
            hadith_base: DEFAULT_HADITH_BASE.to_owned(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("Hadith page {0} is empty")]
    EmptyPage(u32),
}

impl Transient for FetchError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => !(e.is_decode() || e.is_builder()),
            Self::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::EmptyPage(_) => false,
        }
    }
}

/// HTTP client for the city list, prayer schedules and hadith collection.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    endpoints: Endpoints,
    backoff: Backoff,
}

impl ApiClient {
    /// # Errors
    /// Returns `FetchError::Request` if the HTTP client cannot be built.
    pub fn new(endpoints: Endpoints) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoints,
            backoff: Backoff::default(),
        })
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(%url, "fetching");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_owned(),
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// Every city slug, duplicates removed
    ///
    /// # Errors
    /// Returns `FetchError` if the list cannot be fetched or decoded.
    pub async fn cities(&self) -> Result<Vec<String>, FetchError> {
        let slugs: Vec<String> = self.get_json(&self.endpoints.cities_url).await?;
        let total = slugs.len();
        let unique = prayer::unique_cities(slugs);
        debug!(total, unique = unique.len(), "city list loaded");
        Ok(unique)
    }

    /// The schedule of every day in `year`/`month` for `city`
    ///
    /// # Errors
    /// Returns `FetchError` if the schedule cannot be fetched or decoded.
    pub async fn monthly_schedule(
        &self,
        city: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<DailySchedule>, FetchError> {
        let url = prayer::schedule_url(&self.endpoints.schedule_base, city, year, month);
        self.get_json(&url).await
    }

    /// # Errors
    /// Returns `FetchError` if the page cannot be fetched or decoded.
    pub async fn hadith_page(&self, page: u32) -> Result<HadithPage, FetchError> {
        self.get_json(&hadith::page_url(&self.endpoints.hadith_base, page))
            .await
    }

    /// A random hadith: a random page, then a random record on it. Page
    /// fetches are retried with backoff.
    ///
    /// # Errors
    /// Returns `RetryError` when the page could not be loaded or was empty.
    pub async fn random_hadith(&self) -> Result<SelectedHadith, RetryError<FetchError>> {
        let page_number = hadith::random_page(&mut rand::rng());

        let page = retry(self.backoff, |_| self.hadith_page(page_number)).await?;

        let record = hadith::pick_random(&mut rand::rng(), &page)
            .cloned()
            .ok_or(RetryError::Terminal(FetchError::EmptyPage(page_number)))?;

        info!(page = page_number, number = %record.number, "hadith selected");
        Ok(SelectedHadith {
            page: page_number,
            record,
        })
    }
}
