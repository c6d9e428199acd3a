//! Table schema definitions for the universe store

use super::types::*;

// =============================================================================
// Bookkeeping
// =============================================================================

pub static TABLE_SCHEMAS: TableSchema = TableSchema {
    name: "table_schemas",
    primary_key: "name",
    version: 1,
    columns: &[
        Column::required("name", ColumnType::Text),
        Column::required("version", ColumnType::Integer),
    ],
    foreign_keys: &[],
    indexes: &[],
};

pub static METADATA: TableSchema = TableSchema {
    name: "metadata",
    primary_key: "key",
    version: 1,
    columns: &[
        Column::required("key", ColumnType::Text),
        Column::new("value", ColumnType::Text),
    ],
    foreign_keys: &[],
    indexes: &[],
};

// =============================================================================
// Universes and sectors
// =============================================================================

pub static UNIVERSES: TableSchema = TableSchema {
    name: "universes",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Text),
        Column::required("name", ColumnType::Text).unique(),
        Column::new("description", ColumnType::Text),
        Column::new("notes", ColumnType::Text),
    ],
    foreign_keys: &[],
    indexes: &[],
};

pub static SECTORS: TableSchema = TableSchema {
    name: "sectors",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Text),
        Column::new("universe_id", ColumnType::Text),
        Column::required("is_custom", ColumnType::Boolean),
        Column::required("milieu", ColumnType::Text),
        Column::required("sector_x", ColumnType::Integer),
        Column::required("sector_y", ColumnType::Integer),
        Column::required("primary_name", ColumnType::Text),
        Column::new("primary_language", ColumnType::Text),
        Column::new("abbreviation", ColumnType::Text),
        Column::new("sector_label", ColumnType::Text),
        Column::required("selected", ColumnType::Boolean),
        Column::new("tags", ColumnType::Text),
        Column::new("style_sheet", ColumnType::Text),
        Column::new("credits", ColumnType::Text),
        Column::new("publication", ColumnType::Text),
        Column::new("author", ColumnType::Text),
        Column::new("publisher", ColumnType::Text),
        Column::new("reference", ColumnType::Text),
        Column::new("notes", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::cascade("universe_id", "universes")],
    indexes: &[Index::unique(
        "idx_sectors_position",
        &["universe_id", "milieu", "sector_x", "sector_y"],
    )],
};

// =============================================================================
// Sector-owned tables
// =============================================================================

pub static ALTERNATE_NAMES: TableSchema = TableSchema {
    name: "alternate_names",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("sector_id", ColumnType::Text),
        Column::required("name", ColumnType::Text),
        Column::new("language", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::cascade("sector_id", "sectors")],
    indexes: &[],
};

pub static SUBSECTOR_NAMES: TableSchema = TableSchema {
    name: "subsector_names",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("sector_id", ColumnType::Text),
        Column::required("code", ColumnType::Integer).check("code BETWEEN 0 AND 15"),
        Column::required("name", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::cascade("sector_id", "sectors")],
    indexes: &[Index::unique(
        "idx_subsector_names_code",
        &["sector_id", "code"],
    )],
};

pub static ALLEGIANCES: TableSchema = TableSchema {
    name: "allegiances",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Text),
        Column::required("sector_id", ColumnType::Text),
        Column::required("code", ColumnType::Text),
        Column::required("name", ColumnType::Text),
        Column::new("legacy", ColumnType::Text),
        Column::new("base", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::cascade("sector_id", "sectors")],
    indexes: &[],
};

pub static SOPHONTS: TableSchema = TableSchema {
    name: "sophonts",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Text),
        Column::required("sector_id", ColumnType::Text),
        Column::required("code", ColumnType::Text),
        Column::required("name", ColumnType::Text),
        Column::required("is_major", ColumnType::Boolean),
    ],
    foreign_keys: &[ForeignKey::cascade("sector_id", "sectors")],
    indexes: &[],
};

pub static PRODUCTS: TableSchema = TableSchema {
    name: "products",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("sector_id", ColumnType::Text),
        Column::new("publication", ColumnType::Text),
        Column::new("author", ColumnType::Text),
        Column::new("publisher", ColumnType::Text),
        Column::new("reference", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::cascade("sector_id", "sectors")],
    indexes: &[],
};

pub static SYSTEMS: TableSchema = TableSchema {
    name: "systems",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Text),
        Column::required("sector_id", ColumnType::Text),
        Column::required("hex_x", ColumnType::Integer),
        Column::required("hex_y", ColumnType::Integer),
        Column::new("name", ColumnType::Text),
        Column::new("starport", ColumnType::Text),
        Column::new("size", ColumnType::Text),
        Column::new("atmosphere", ColumnType::Text),
        Column::new("hydrographics", ColumnType::Text),
        Column::new("population", ColumnType::Text),
        Column::new("government", ColumnType::Text),
        Column::new("law_level", ColumnType::Text),
        Column::new("tech_level", ColumnType::Text),
        Column::new("importance", ColumnType::Integer),
        Column::new("resources", ColumnType::Text),
        Column::new("labor", ColumnType::Text),
        Column::new("infrastructure", ColumnType::Text),
        Column::new("efficiency", ColumnType::Integer),
        Column::new("heterogeneity", ColumnType::Text),
        Column::new("acceptance", ColumnType::Text),
        Column::new("strangeness", ColumnType::Text),
        Column::new("symbols", ColumnType::Text),
        Column::new("population_multiplier", ColumnType::Integer),
        Column::new("belts", ColumnType::Integer),
        Column::new("gas_giants", ColumnType::Integer),
        Column::new("worlds", ColumnType::Integer),
        Column::new("zone", ColumnType::Text),
        Column::new("allegiance_id", ColumnType::Text),
        Column::new("notes", ColumnType::Text),
    ],
    foreign_keys: &[
        ForeignKey::cascade("sector_id", "sectors"),
        ForeignKey::set_null("allegiance_id", "allegiances"),
    ],
    indexes: &[Index::unique(
        "idx_systems_hex",
        &["sector_id", "hex_x", "hex_y"],
    )],
};

// =============================================================================
// System-owned tables
// =============================================================================

pub static NOBILITIES: TableSchema = TableSchema {
    name: "nobilities",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("system_id", ColumnType::Text),
        Column::required("code", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::cascade("system_id", "systems")],
    indexes: &[],
};

pub static TRADE_CODES: TableSchema = TableSchema {
    name: "trade_codes",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("system_id", ColumnType::Text),
        Column::required("code", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::cascade("system_id", "systems")],
    indexes: &[],
};

pub static SOPHONT_POPULATIONS: TableSchema = TableSchema {
    name: "sophont_populations",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("system_id", ColumnType::Text),
        Column::required("sophont_id", ColumnType::Text),
        Column::new("population", ColumnType::Integer),
        Column::required("is_home_world", ColumnType::Boolean),
        Column::required("is_die_back", ColumnType::Boolean),
    ],
    foreign_keys: &[
        ForeignKey::cascade("system_id", "systems"),
        ForeignKey::cascade("sophont_id", "sophonts"),
    ],
    indexes: &[],
};

pub static RULING_ALLEGIANCES: TableSchema = TableSchema {
    name: "ruling_allegiances",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("system_id", ColumnType::Text),
        Column::required("allegiance_id", ColumnType::Text),
    ],
    foreign_keys: &[
        ForeignKey::cascade("system_id", "systems"),
        ForeignKey::cascade("allegiance_id", "allegiances"),
    ],
    indexes: &[],
};

pub static OWNING_SYSTEMS: TableSchema = TableSchema {
    name: "owning_systems",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("system_id", ColumnType::Text),
        Column::required("hex_x", ColumnType::Integer),
        Column::required("hex_y", ColumnType::Integer),
        Column::new("sector_abbreviation", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::cascade("system_id", "systems")],
    indexes: &[],
};

pub static COLONY_SYSTEMS: TableSchema = TableSchema {
    name: "colony_systems",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("system_id", ColumnType::Text),
        Column::required("hex_x", ColumnType::Integer),
        Column::required("hex_y", ColumnType::Integer),
        Column::new("sector_abbreviation", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::cascade("system_id", "systems")],
    indexes: &[],
};

pub static RESEARCH_STATIONS: TableSchema = TableSchema {
    name: "research_stations",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("system_id", ColumnType::Text),
        Column::required("code", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::cascade("system_id", "systems")],
    indexes: &[],
};

pub static CUSTOM_REMARKS: TableSchema = TableSchema {
    name: "custom_remarks",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("system_id", ColumnType::Text),
        Column::required("text", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::cascade("system_id", "systems")],
    indexes: &[],
};

pub static BASES: TableSchema = TableSchema {
    name: "bases",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("system_id", ColumnType::Text),
        Column::required("code", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::cascade("system_id", "systems")],
    indexes: &[],
};

pub static STARS: TableSchema = TableSchema {
    name: "stars",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("system_id", ColumnType::Text),
        Column::new("spectral_class", ColumnType::Text),
        Column::new("spectral_decimal", ColumnType::Integer),
        Column::new("luminosity_class", ColumnType::Text),
        Column::required("sort_order", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::cascade("system_id", "systems")],
    indexes: &[],
};

// =============================================================================
// Map overlays: routes, borders, regions, labels
// =============================================================================

pub static ROUTES: TableSchema = TableSchema {
    name: "routes",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Text),
        Column::required("sector_id", ColumnType::Text),
        Column::required("start_hex_x", ColumnType::Integer),
        Column::required("start_hex_y", ColumnType::Integer),
        Column::required("end_hex_x", ColumnType::Integer),
        Column::required("end_hex_y", ColumnType::Integer),
        Column::required("start_offset_x", ColumnType::Integer),
        Column::required("start_offset_y", ColumnType::Integer),
        Column::required("end_offset_x", ColumnType::Integer),
        Column::required("end_offset_y", ColumnType::Integer),
        Column::new("route_type", ColumnType::Text),
        Column::new("style", ColumnType::Text),
        Column::new("color", ColumnType::Text),
        Column::new("width", ColumnType::Real),
        Column::new("allegiance_id", ColumnType::Text),
    ],
    foreign_keys: &[
        ForeignKey::cascade("sector_id", "sectors"),
        ForeignKey::set_null("allegiance_id", "allegiances"),
    ],
    indexes: &[],
};

pub static BORDERS: TableSchema = TableSchema {
    name: "borders",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Text),
        Column::required("sector_id", ColumnType::Text),
        Column::new("allegiance_id", ColumnType::Text),
        Column::required("show_label", ColumnType::Boolean),
        Column::required("wrap_label", ColumnType::Boolean),
        Column::new("label_hex_x", ColumnType::Integer),
        Column::new("label_hex_y", ColumnType::Integer),
        Column::new("label_offset_x", ColumnType::Real),
        Column::new("label_offset_y", ColumnType::Real),
        Column::new("label", ColumnType::Text),
        Column::new("style", ColumnType::Text),
        Column::new("color", ColumnType::Text),
    ],
    foreign_keys: &[
        ForeignKey::cascade("sector_id", "sectors"),
        ForeignKey::set_null("allegiance_id", "allegiances"),
    ],
    indexes: &[],
};

pub static BORDER_HEXES: TableSchema = TableSchema {
    name: "border_hexes",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("border_id", ColumnType::Text),
        Column::required("hex_x", ColumnType::Integer),
        Column::required("hex_y", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::cascade("border_id", "borders")],
    indexes: &[],
};

pub static REGIONS: TableSchema = TableSchema {
    name: "regions",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Text),
        Column::required("sector_id", ColumnType::Text),
        Column::required("show_label", ColumnType::Boolean),
        Column::required("wrap_label", ColumnType::Boolean),
        Column::new("label_hex_x", ColumnType::Integer),
        Column::new("label_hex_y", ColumnType::Integer),
        Column::new("label_offset_x", ColumnType::Real),
        Column::new("label_offset_y", ColumnType::Real),
        Column::new("label", ColumnType::Text),
        Column::new("color", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::cascade("sector_id", "sectors")],
    indexes: &[],
};

pub static REGION_HEXES: TableSchema = TableSchema {
    name: "region_hexes",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("region_id", ColumnType::Text),
        Column::required("hex_x", ColumnType::Integer),
        Column::required("hex_y", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::cascade("region_id", "regions")],
    indexes: &[],
};

pub static LABELS: TableSchema = TableSchema {
    name: "labels",
    primary_key: "id",
    version: 1,
    columns: &[
        Column::required("id", ColumnType::Text),
        Column::required("sector_id", ColumnType::Text),
        Column::required("hex_x", ColumnType::Integer),
        Column::required("hex_y", ColumnType::Integer),
        Column::required("text", ColumnType::Text),
        Column::new("color", ColumnType::Text),
        Column::new("size", ColumnType::Text),
        Column::required("wrap", ColumnType::Boolean),
        Column::new("offset_x", ColumnType::Real),
        Column::new("offset_y", ColumnType::Real),
    ],
    foreign_keys: &[ForeignKey::cascade("sector_id", "sectors")],
    indexes: &[],
};

// =============================================================================
// Registry
// =============================================================================

/// All tables, parents before children
pub static ALL_TABLES: &[&TableSchema] = &[
    &TABLE_SCHEMAS,
    &METADATA,
    &UNIVERSES,
    &SECTORS,
    &ALTERNATE_NAMES,
    &SUBSECTOR_NAMES,
    &ALLEGIANCES,
    &SOPHONTS,
    &PRODUCTS,
    &SYSTEMS,
    &NOBILITIES,
    &TRADE_CODES,
    &SOPHONT_POPULATIONS,
    &RULING_ALLEGIANCES,
    &OWNING_SYSTEMS,
    &COLONY_SYSTEMS,
    &RESEARCH_STATIONS,
    &CUSTOM_REMARKS,
    &BASES,
    &STARS,
    &ROUTES,
    &BORDERS,
    &BORDER_HEXES,
    &REGIONS,
    &REGION_HEXES,
    &LABELS,
];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}
