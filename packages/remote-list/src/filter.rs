use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::ResultRecord;

/// Does `record` match a live query? Name is matched case-insensitively,
/// the identifier by its decimal representation. The query is taken as typed.
pub fn matches_query<T: ResultRecord>(record: &T, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    record.name().to_lowercase().contains(&needle) || record.id().to_string().contains(&needle)
}

/// Filtered view over already fetched records, in store order.
pub fn filter_records<'a, T: ResultRecord>(records: &'a [T], query: &str) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| matches_query(*record, query))
        .collect()
}

/// Character status accepted by the `status` query parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterStatus {
    Alive,
    Dead,
    Unknown,
}

impl CharacterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterStatus::Alive => "alive",
            CharacterStatus::Dead => "dead",
            CharacterStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alive" => Ok(CharacterStatus::Alive),
            "dead" => Ok(CharacterStatus::Dead),
            "unknown" => Ok(CharacterStatus::Unknown),
            other => Err(format!(
                "unknown status '{}' (expected alive, dead or unknown)",
                other
            )),
        }
    }
}

/// User-entered criteria sent to a paginated endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<CharacterStatus>,
    #[serde(default)]
    pub species: String,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_status(mut self, status: CharacterStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = species.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    /// Non-empty fields only, in `name`, `status`, `species` order. Empty
    /// fields are left out entirely rather than sent as `name=`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        let name = self.name.trim();
        if !name.is_empty() {
            pairs.push(("name", name.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        let species = self.species.trim();
        if !species.is_empty() {
            pairs.push(("species", species.to_string()));
        }

        pairs
    }
}
