//! Parsed sector records and the parser boundary
//!
//! Parsers turn the raw metadata and world-data files into records that
//! still refer to allegiances and sophonts by code. `convert` resolves those
//! codes and assigns ids.

use crate::error::Result;
use crate::model::{AlternateName, Hex, Product, Star, SubsectorName};

/// Reads the two per-sector files of a snapshot
pub trait SectorParser {
    /// Parse a sector metadata document. `source` names the file in errors.
    fn parse_metadata(&self, source: &str, text: &str) -> Result<SectorMetadata>;

    /// Parse the world data of a sector
    fn parse_worlds(&self, source: &str, text: &str) -> Result<Vec<WorldRecord>>;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectorMetadata {
    /// First entry is the primary name
    pub names: Vec<AlternateName>,
    pub abbreviation: Option<String>,
    pub label: Option<String>,
    pub tags: Option<String>,
    pub selected: bool,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub credits: Option<String>,
    pub style_sheet: Option<String>,
    pub data_file: Option<Product>,
    pub products: Vec<Product>,
    pub subsectors: Vec<SubsectorName>,
    pub allegiances: Vec<AllegianceRecord>,
    pub sophonts: Vec<SophontRecord>,
    pub routes: Vec<RouteRecord>,
    pub borders: Vec<BorderRecord>,
    pub regions: Vec<RegionRecord>,
    pub labels: Vec<LabelRecord>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AllegianceRecord {
    pub code: String,
    pub name: String,
    pub legacy: Option<String>,
    pub base: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SophontRecord {
    pub code: String,
    pub name: String,
    pub is_major: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    pub start: Hex,
    pub end: Hex,
    pub start_offset: (i32, i32),
    pub end_offset: (i32, i32),
    pub route_type: Option<String>,
    pub style: Option<String>,
    pub color: Option<String>,
    pub width: Option<f64>,
    pub allegiance: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BorderRecord {
    pub allegiance: Option<String>,
    pub region: RegionRecord,
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionRecord {
    pub hexes: Vec<Hex>,
    pub show_label: bool,
    pub wrap_label: bool,
    pub label_position: Option<Hex>,
    pub label_offset_x: Option<f64>,
    pub label_offset_y: Option<f64>,
    pub label: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub hex: Hex,
    pub text: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub wrap: bool,
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
}

/// One line of world data
#[derive(Debug, Clone, PartialEq)]
pub struct WorldRecord {
    pub hex: Hex,
    pub name: Option<String>,
    pub uwp: Uwp,
    pub remarks: Vec<String>,
    pub importance: Option<i32>,
    pub economic: Option<Economic>,
    pub cultural: Option<Cultural>,
    pub nobility: Option<String>,
    pub bases: Option<String>,
    pub zone: Option<String>,
    pub pbg: Option<Pbg>,
    pub worlds: Option<i32>,
    pub allegiance: Option<String>,
    pub stars: Vec<Star>,
}

/// Universal world profile, one extended-hex digit per characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uwp {
    pub starport: char,
    pub size: char,
    pub atmosphere: char,
    pub hydrographics: char,
    pub population: char,
    pub government: char,
    pub law_level: char,
    pub tech_level: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Economic {
    pub resources: char,
    pub labor: char,
    pub infrastructure: char,
    pub efficiency: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cultural {
    pub heterogeneity: char,
    pub acceptance: char,
    pub strangeness: char,
    pub symbols: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pbg {
    pub population_multiplier: i32,
    pub belts: i32,
    pub gas_giants: i32,
}
