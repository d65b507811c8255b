use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";
pub const DEFAULT_FLAG: &str = "🏳️";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CountryName {
    pub common: String,
    pub official: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CountryRecord {
    pub name: CountryName,
    pub capital: Option<String>,
    pub region: String,
    pub subregion: String,
    pub population: u64,
    pub flag: String,
    pub cca2: String,
    pub cca3: String,
    pub coordinates: Option<Coordinates>,
}

impl CountryRecord {
    /// A record can appear in a question only with a capital and a usable map position.
    pub fn is_quiz_eligible(&self) -> bool {
        let has_capital = self
            .capital
            .as_deref()
            .map_or(false, |capital| !capital.trim().is_empty());
        let has_position = self.coordinates.map_or(false, |c| c.is_valid());
        has_capital && has_position
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    Remote,
    Fallback,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Catalog {
    pub countries: Vec<CountryRecord>,
    pub source: CatalogSource,
}

impl Catalog {
    pub fn remote(countries: Vec<CountryRecord>) -> Self {
        Catalog {
            countries,
            source: CatalogSource::Remote,
        }
    }

    pub fn fallback() -> Self {
        Catalog {
            countries: fallback_countries(),
            source: CatalogSource::Fallback,
        }
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn country(
    common: &str,
    official: &str,
    capital: &str,
    region: &str,
    subregion: &str,
    population: u64,
    flag: &str,
    codes: (&str, &str),
    (lat, lng): (f64, f64),
) -> CountryRecord {
    CountryRecord {
        name: CountryName {
            common: common.to_string(),
            official: official.to_string(),
        },
        capital: Some(capital.to_string()),
        region: region.to_string(),
        subregion: subregion.to_string(),
        population,
        flag: flag.to_string(),
        cca2: codes.0.to_string(),
        cca3: codes.1.to_string(),
        coordinates: Some(Coordinates { lat, lng }),
    }
}

/// The embedded catalog used whenever the country service cannot be reached.
pub fn fallback_countries() -> Vec<CountryRecord> {
    vec![
        country("France", "French Republic", "Paris", "Europe", "Western Europe", 67_391_582, "🇫🇷", ("FR", "FRA"), (46.0, 2.0)),
        country("Germany", "Federal Republic of Germany", "Berlin", "Europe", "Central Europe", 83_240_525, "🇩🇪", ("DE", "DEU"), (51.0, 9.0)),
        country("Japan", "Japan", "Tokyo", "Asia", "Eastern Asia", 125_836_021, "🇯🇵", ("JP", "JPN"), (36.0, 138.0)),
        country("Brazil", "Federative Republic of Brazil", "Brasília", "Americas", "South America", 215_313_498, "🇧🇷", ("BR", "BRA"), (-10.0, -55.0)),
        country("Australia", "Commonwealth of Australia", "Canberra", "Oceania", "Australia and New Zealand", 25_687_041, "🇦🇺", ("AU", "AUS"), (-27.0, 133.0)),
        country("Canada", "Canada", "Ottawa", "Americas", "North America", 38_008_005, "🇨🇦", ("CA", "CAN"), (60.0, -95.0)),
        country("United Kingdom", "United Kingdom of Great Britain and Northern Ireland", "London", "Europe", "Northern Europe", 67_886_011, "🇬🇧", ("GB", "GBR"), (54.0, -2.0)),
        country("United States", "United States of America", "Washington, D.C.", "Americas", "North America", 331_893_745, "🇺🇸", ("US", "USA"), (38.0, -97.0)),
        country("China", "People's Republic of China", "Beijing", "Asia", "Eastern Asia", 1_439_323_776, "🇨🇳", ("CN", "CHN"), (35.0, 105.0)),
        country("India", "Republic of India", "New Delhi", "Asia", "Southern Asia", 1_380_004_385, "🇮🇳", ("IN", "IND"), (20.0, 77.0)),
        country("South Africa", "Republic of South Africa", "Cape Town", "Africa", "Southern Africa", 59_308_690, "🇿🇦", ("ZA", "ZAF"), (-29.0, 24.0)),
        country("Egypt", "Arab Republic of Egypt", "Cairo", "Africa", "Northern Africa", 102_334_403, "🇪🇬", ("EG", "EGY"), (27.0, 30.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_twelve_eligible_countries() {
        let countries = fallback_countries();
        assert_eq!(countries.len(), 12);
        assert!(countries.iter().all(|c| c.is_quiz_eligible()));
    }

    #[test]
    fn catalogs_remember_where_they_came_from() {
        let fallback = Catalog::fallback();
        assert_eq!(fallback.source, CatalogSource::Fallback);
        assert!(!fallback.is_empty());

        let remote = Catalog::remote(Vec::new());
        assert_eq!(remote.source, CatalogSource::Remote);
        assert!(remote.is_empty());
        assert_eq!(remote.len(), 0);
    }

    #[test]
    fn blank_capital_or_bad_coordinates_are_ineligible() {
        let mut record = fallback_countries().remove(0);
        record.capital = Some("  ".to_string());
        assert!(!record.is_quiz_eligible());

        let mut record = fallback_countries().remove(0);
        record.coordinates = Some(Coordinates { lat: 120.0, lng: 0.0 });
        assert!(!record.is_quiz_eligible());

        record.coordinates = None;
        assert!(!record.is_quiz_eligible());
    }
}
