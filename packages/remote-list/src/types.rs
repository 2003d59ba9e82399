use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::renderer::{DetailFact, DetailView, DisplayUnit, StatBar};

/// Identifier of a remote record. PokeAPI and the character API both use
/// integers, but nothing in the pipelines depends on that.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        // "25" and 25 must select the same card
        match s.parse::<u64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(s.to_string()),
        }
    }
}

/// A decoded remote entity that can be filtered and rendered.
pub trait ResultRecord: DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> RecordId;

    fn name(&self) -> &str;

    /// Primary image reference (URL), if the API provided one.
    fn image(&self) -> Option<&str>;

    /// Secondary line shown under the name on a card.
    fn caption(&self) -> Option<String> {
        None
    }

    fn display_unit(&self) -> DisplayUnit {
        DisplayUnit {
            id: self.id(),
            name: self.name().to_string(),
            image: self.image().map(str::to_string),
            caption: self.caption(),
        }
    }

    /// Record-specific detail projection. Defaults to the summary view.
    fn detail_view(&self) -> DetailView {
        summary_detail(self)
    }
}

/// Name, image and identifier only.
pub fn summary_detail<T: ResultRecord>(record: &T) -> DetailView {
    DetailView {
        id: record.id(),
        name: record.name().to_string(),
        image: record.image().map(str::to_string),
        accent: None,
        facts: Vec::new(),
        stats: Vec::new(),
    }
}

// --- PokeAPI ---

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NamedResource {
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Sprites {
    pub front_default: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BaseStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

/// `GET /pokemon/{id}`, reduced to the fields the browser reads.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Pokemon {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    /// Hectograms
    #[serde(default)]
    pub weight: u32,
    /// Decimetres
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub stats: Vec<BaseStat>,
}

const DEFAULT_TYPE_COLOR: &str = "#ffcc00";

const TYPE_COLORS: &[(&str, &str)] = &[
    ("fire", "#f08030"),
    ("water", "#6890f0"),
    ("grass", "#78c850"),
    ("electric", "#f8d030"),
    ("psychic", "#f85888"),
    ("ice", "#98d8d8"),
    ("dragon", "#7038f8"),
    ("dark", "#705848"),
    ("fairy", "#ee99ac"),
    ("normal", "#a8a878"),
    ("fighting", "#c03028"),
    ("flying", "#a890f0"),
    ("poison", "#a040a0"),
    ("ground", "#e0c068"),
    ("rock", "#b8a038"),
    ("bug", "#a8b820"),
    ("ghost", "#705898"),
    ("steel", "#b8b8d0"),
];

/// Hex colour for a Pokémon type, falling back to yellow for unknown types.
pub fn type_color(type_name: &str) -> &'static str {
    TYPE_COLORS
        .iter()
        .find(|(name, _)| *name == type_name)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_TYPE_COLOR)
}

impl Pokemon {
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(|slot| slot.kind.name.as_str())
    }

    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }

    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }
}

impl ResultRecord for Pokemon {
    fn id(&self) -> RecordId {
        RecordId::Number(self.id)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn image(&self) -> Option<&str> {
        self.sprites.front_default.as_deref()
    }

    fn caption(&self) -> Option<String> {
        Some(format!("#{}", self.id))
    }

    fn detail_view(&self) -> DetailView {
        let accent = self
            .primary_type()
            .map(type_color)
            .unwrap_or(DEFAULT_TYPE_COLOR)
            .to_string();

        let stats = self
            .stats
            .iter()
            .map(|s| StatBar::new(&s.stat.name, s.base_stat, &accent))
            .collect();

        DetailView {
            id: self.id(),
            name: self.name.clone(),
            image: self.sprites.front_default.clone(),
            accent: Some(accent),
            facts: vec![
                DetailFact::new("Weight", format!("{:.1} kg", self.weight_kg())),
                DetailFact::new("Height", format!("{:.1} m", self.height_m())),
            ],
            stats,
        }
    }
}

// --- Rick and Morty API ---

/// `GET /character` entry.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub species: String,
}

impl ResultRecord for Character {
    fn id(&self) -> RecordId {
        RecordId::Number(self.id)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn caption(&self) -> Option<String> {
        Some(format!("{} - {}", self.status, self.species))
    }

    fn detail_view(&self) -> DetailView {
        let mut view = summary_detail(self);
        view.facts = vec![
            DetailFact::new("Status", self.status.clone()),
            DetailFact::new("Species", self.species.clone()),
        ];
        view
    }
}

/// Pagination block of a list response.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PageInfo {
    pub pages: u32,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// `{ info: { pages }, results: [...] }`
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PagedResponse<T> {
    pub info: PageInfo,
    pub results: Vec<T>,
}
