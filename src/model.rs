//! In-memory model of universes, sectors and their child records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved id of the universe populated by snapshot import
pub const DEFAULT_UNIVERSE_ID: &str = "default";

/// Display name of the default universe
pub const DEFAULT_UNIVERSE_NAME: &str = "Default";

/// Hex coordinate within a sector (column, row), written as `XXYY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub x: i32,
    pub y: i32,
}

impl Hex {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Parse a four-digit `XXYY` hex
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let x = s[..2].parse().ok()?;
        let y = s[2..].parse().ok()?;
        Some(Self { x, y })
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UniverseInfo {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Universe {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub sectors: Vec<Sector>,
}

impl Universe {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn info(&self) -> UniverseInfo {
        UniverseInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Sector summary returned by listing and position queries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectorInfo {
    pub id: String,
    pub universe_id: Option<String>,
    pub is_custom: bool,
    pub milieu: String,
    pub sector_x: i32,
    pub sector_y: i32,
    pub primary_name: String,
    pub abbreviation: Option<String>,
    pub tags: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sector {
    pub id: String,
    /// `None` for sectors of the default universe
    pub universe_id: Option<String>,
    pub is_custom: bool,
    pub milieu: String,
    pub sector_x: i32,
    pub sector_y: i32,
    pub primary_name: String,
    pub primary_language: Option<String>,
    pub abbreviation: Option<String>,
    pub label: Option<String>,
    pub selected: bool,
    pub tags: Option<String>,
    pub style_sheet: Option<String>,
    pub credits: Option<String>,
    pub publication: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,

    pub alternate_names: Vec<AlternateName>,
    pub subsector_names: Vec<SubsectorName>,
    pub allegiances: Vec<Allegiance>,
    pub sophonts: Vec<Sophont>,
    pub systems: Vec<System>,
    pub products: Vec<Product>,
    pub routes: Vec<Route>,
    pub borders: Vec<Border>,
    pub regions: Vec<Region>,
    pub labels: Vec<Label>,
}

impl Sector {
    /// Empty custom sector owned by `universe_id`
    pub fn custom(
        id: impl Into<String>,
        universe_id: impl Into<String>,
        milieu: impl Into<String>,
        sector_x: i32,
        sector_y: i32,
        primary_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            universe_id: Some(universe_id.into()),
            is_custom: true,
            milieu: milieu.into(),
            sector_x,
            sector_y,
            primary_name: primary_name.into(),
            ..Self::default()
        }
    }

    pub fn info(&self) -> SectorInfo {
        SectorInfo {
            id: self.id.clone(),
            universe_id: self.universe_id.clone(),
            is_custom: self.is_custom,
            milieu: self.milieu.clone(),
            sector_x: self.sector_x,
            sector_y: self.sector_y,
            primary_name: self.primary_name.clone(),
            abbreviation: self.abbreviation.clone(),
            tags: self.tags.clone(),
        }
    }

    pub fn allegiance_by_code(&self, code: &str) -> Option<&Allegiance> {
        self.allegiances.iter().find(|a| a.code == code)
    }

    pub fn sophont_by_code(&self, code: &str) -> Option<&Sophont> {
        self.sophonts.iter().find(|s| s.code == code)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlternateName {
    pub name: String,
    pub language: Option<String>,
}

/// Subsector name; `code` 0..=15 maps to subsectors A..P
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubsectorName {
    pub code: u8,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Allegiance {
    pub id: String,
    pub code: String,
    pub name: String,
    pub legacy: Option<String>,
    pub base: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sophont {
    pub id: String,
    pub code: String,
    pub name: String,
    pub is_major: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Product {
    pub publication: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct System {
    pub id: String,
    pub hex_x: i32,
    pub hex_y: i32,
    pub name: Option<String>,

    // Universal world profile
    pub starport: Option<String>,
    pub size: Option<String>,
    pub atmosphere: Option<String>,
    pub hydrographics: Option<String>,
    pub population: Option<String>,
    pub government: Option<String>,
    pub law_level: Option<String>,
    pub tech_level: Option<String>,

    // Importance, economic and cultural extensions
    pub importance: Option<i32>,
    pub resources: Option<String>,
    pub labor: Option<String>,
    pub infrastructure: Option<String>,
    pub efficiency: Option<i32>,
    pub heterogeneity: Option<String>,
    pub acceptance: Option<String>,
    pub strangeness: Option<String>,
    pub symbols: Option<String>,

    pub population_multiplier: Option<i32>,
    pub belts: Option<i32>,
    pub gas_giants: Option<i32>,
    pub worlds: Option<i32>,
    pub zone: Option<String>,
    /// Weak reference to an allegiance of the same sector
    pub allegiance_id: Option<String>,
    pub notes: Option<String>,

    pub nobilities: Vec<String>,
    pub trade_codes: Vec<String>,
    pub sophont_populations: Vec<SophontPopulation>,
    /// Allegiance ids
    pub ruling_allegiances: Vec<String>,
    pub owning_systems: Vec<SystemReference>,
    pub colony_systems: Vec<SystemReference>,
    pub research_stations: Vec<String>,
    pub custom_remarks: Vec<String>,
    pub bases: Vec<String>,
    pub stars: Vec<Star>,
}

impl System {
    pub fn hex(&self) -> Hex {
        Hex::new(self.hex_x, self.hex_y)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SophontPopulation {
    pub sophont_id: String,
    /// Share of the population in tenths, `None` when unspecified
    pub population: Option<i32>,
    pub is_home_world: bool,
    pub is_die_back: bool,
}

/// Pointer to a system by coordinate, optionally in another sector
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemReference {
    pub hex_x: i32,
    pub hex_y: i32,
    /// Abbreviation of the other sector; `None` means the same sector
    pub sector_abbreviation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Star {
    pub spectral_class: Option<String>,
    pub spectral_decimal: Option<i32>,
    pub luminosity_class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub start_hex_x: i32,
    pub start_hex_y: i32,
    pub end_hex_x: i32,
    pub end_hex_y: i32,
    pub start_offset_x: i32,
    pub start_offset_y: i32,
    pub end_offset_x: i32,
    pub end_offset_y: i32,
    pub route_type: Option<String>,
    pub style: Option<String>,
    pub color: Option<String>,
    pub width: Option<f64>,
    pub allegiance_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Border {
    pub id: String,
    pub allegiance_id: Option<String>,
    pub show_label: bool,
    pub wrap_label: bool,
    pub label_hex_x: Option<i32>,
    pub label_hex_y: Option<i32>,
    pub label_offset_x: Option<f64>,
    pub label_offset_y: Option<f64>,
    pub label: Option<String>,
    pub style: Option<String>,
    pub color: Option<String>,
    pub hexes: Vec<Hex>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub show_label: bool,
    pub wrap_label: bool,
    pub label_hex_x: Option<i32>,
    pub label_hex_y: Option<i32>,
    pub label_offset_x: Option<f64>,
    pub label_offset_y: Option<f64>,
    pub label: Option<String>,
    pub color: Option<String>,
    pub hexes: Vec<Hex>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub hex_x: i32,
    pub hex_y: i32,
    pub text: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub wrap: bool,
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
}
