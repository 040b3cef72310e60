use serde::{Deserialize, Deserializer, Serialize};

/// Geographic coordinates as stored in the location dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

/// One entry of the location dataset.
///
/// The shape follows OpenWeatherMap's `city.list.json`. An empty `state` in
/// the file is read as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub country: String,
    pub coord: Coordinates,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

impl LocationRecord {
    /// Human-readable one-liner: `"{name}, {state}, ({country})"`, or
    /// `"{name}, ({country})"` when the record has no state.
    pub fn summary(&self) -> String {
        match self.state.as_deref() {
            Some(state) if !state.is_empty() => {
                format!("{}, {}, ({})", self.name, state, self.country)
            }
            _ => format!("{}, ({})", self.name, self.country),
        }
    }

    /// True if this record satisfies every criterion in `filters`.
    pub fn matches(&self, filters: &QueryFilters) -> bool {
        if filters.name.is_empty() || self.name.to_lowercase() != filters.name {
            return false;
        }
        if let Some(country) = &filters.country_code {
            if &self.country != country {
                return false;
            }
        }
        if let Some(state) = &filters.state {
            if self.state.as_ref() != Some(state) {
                return false;
            }
        }
        true
    }
}

/// Matching criteria for one query.
///
/// Constructors normalize: the name is trimmed and lower-cased, country and
/// state are trimmed and upper-cased, and blank values become `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryFilters {
    pub name: String,
    pub country_code: Option<String>,
    pub state: Option<String>,
}

impl QueryFilters {
    pub fn new(name: &str, country_code: Option<&str>, state: Option<&str>) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            country_code: normalize_code(country_code),
            state: normalize_code(state),
        }
    }

    /// Name-only query.
    pub fn by_name(name: &str) -> Self {
        Self::new(name, None, None)
    }

    pub fn with_country(mut self, country_code: &str) -> Self {
        self.country_code = normalize_code(Some(country_code));
        self
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = normalize_code(Some(state));
        self
    }

    /// Re-apply normalization to filters received from elsewhere.
    pub fn normalized(self) -> Self {
        Self::new(
            &self.name,
            self.country_code.as_deref(),
            self.state.as_deref(),
        )
    }
}

fn normalize_code(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_uppercase)
}

/// Ordered records matching a query, in dataset order.
pub type MatchSet = Vec<LocationRecord>;

/// The in-memory location dataset. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<LocationRecord>,
}

impl Dataset {
    pub fn new(records: Vec<LocationRecord>) -> Self {
        Self { records }
    }

    /// Parse a `city.list.json` document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let records: Vec<LocationRecord> = serde_json::from_slice(bytes)?;
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }
}
