//! Country catalog loading. A load never fails: anything short of a usable remote list
//! degrades to the embedded fallback catalog.

use std::time::Duration;

use log::{info, warn};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;

use crate::models::{
    country::{Catalog, CountryName, CountryRecord, Coordinates, DEFAULT_FLAG, UNKNOWN},
    game::OPTION_COUNT,
};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("response is not an array")]
    NotAnArray,
    #[error("only {0} usable countries in response")]
    TooFew(usize),
}

pub struct CatalogLoader {
    url: String,
    timeout: Duration,
}

impl CatalogLoader {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        CatalogLoader {
            url: url.into(),
            timeout,
        }
    }

    pub async fn load(&self) -> Catalog {
        match self.fetch().await {
            Ok(countries) => {
                info!("Loaded {} countries from {}", countries.len(), self.url);
                Catalog::remote(countries)
            }
            Err(error) => {
                warn!("Country service unavailable, using fallback data: {}", error);
                Catalog::fallback()
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<CountryRecord>, CatalogError> {
        let request = async {
            let response = reqwest::Client::new()
                .get(&self.url)
                .header(ACCEPT, "application/json")
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(CatalogError::Status(response.status()));
            }
            let body = response.json::<Value>().await?;
            normalize_countries(body)
        };

        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(CatalogError::Timeout(self.timeout)),
        }
    }
}

#[derive(Deserialize, Default)]
struct RawName {
    common: Option<String>,
    official: Option<String>,
}

#[derive(Deserialize)]
struct RawCountry {
    name: Option<RawName>,
    capital: Option<Vec<String>>,
    region: Option<String>,
    subregion: Option<String>,
    population: Option<u64>,
    flag: Option<String>,
    cca2: Option<String>,
    cca3: Option<String>,
    latlng: Option<Vec<f64>>,
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl RawCountry {
    fn into_record(self) -> Option<CountryRecord> {
        let capital = self.capital?.into_iter().next()?;
        if capital.trim().is_empty() {
            return None;
        }
        let coordinates = match self.latlng.as_deref() {
            Some([lat, lng]) => Coordinates { lat: *lat, lng: *lng },
            _ => return None,
        };
        let name = self.name.unwrap_or_default();

        Some(CountryRecord {
            name: CountryName {
                common: or_default(name.common, UNKNOWN),
                official: or_default(name.official, UNKNOWN),
            },
            capital: Some(capital),
            region: or_default(self.region, UNKNOWN),
            subregion: or_default(self.subregion, UNKNOWN),
            population: self.population.unwrap_or(0),
            flag: or_default(self.flag, DEFAULT_FLAG),
            cca2: self.cca2.unwrap_or_default(),
            cca3: self.cca3.unwrap_or_default(),
            coordinates: Some(coordinates),
        })
    }
}

/// Turns a REST Countries body into records, dropping entries without a capital or a
/// two-element `latlng`.
pub fn normalize_countries(body: Value) -> Result<Vec<CountryRecord>, CatalogError> {
    let Value::Array(entries) = body else {
        return Err(CatalogError::NotAnArray);
    };

    let countries: Vec<CountryRecord> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RawCountry>(entry).ok())
        .filter_map(RawCountry::into_record)
        .collect();

    let usable = countries.iter().filter(|c| c.is_quiz_eligible()).count();
    if usable < OPTION_COUNT {
        return Err(CatalogError::TooFew(usable));
    }
    Ok(countries)
}
