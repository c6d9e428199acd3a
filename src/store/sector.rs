//! Sector records and their full child tree

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use tracing::debug;

use super::rows::{insert_rows, SqlValue};
use super::{Store, Transaction};
use crate::error::{Error, Result};
use crate::model::*;
use crate::schema::{self, generate_select, TableSchema};

impl Store {
    /// Save a custom sector, replacing any stored sector with the same id or
    /// the same (universe, milieu, x, y) position
    pub fn save_sector(&self, sector: &Sector, tx: Option<&mut Transaction>) -> Result<()> {
        ensure_custom(sector)?;
        self.with_transaction(tx, |conn| save_sector_in(conn, sector))
    }

    /// Load a sector with every child collection
    pub fn load_sector(&self, sector_id: &str, tx: Option<&mut Transaction>) -> Result<Option<Sector>> {
        self.with_transaction(tx, |conn| load_sector_in(conn, sector_id))
    }

    /// Delete a custom sector and, by cascade, its subtree. Returns whether
    /// the sector existed.
    pub fn delete_sector(&self, sector_id: &str, tx: Option<&mut Transaction>) -> Result<bool> {
        self.with_transaction(tx, |conn| {
            let is_custom: Option<bool> = conn
                .query_row(
                    "SELECT is_custom FROM sectors WHERE id = ?1",
                    [sector_id],
                    |row| row.get(0),
                )
                .optional()?;

            match is_custom {
                None => Ok(false),
                Some(false) => Err(Error::InvalidOperation(format!(
                    "sector {} belongs to the default universe",
                    sector_id
                ))),
                Some(true) => {
                    conn.execute("DELETE FROM sectors WHERE id = ?1", [sector_id])?;
                    debug!(sector = sector_id, "Deleted sector");
                    Ok(true)
                }
            }
        })
    }
}

/// Only custom sectors of a non-default universe go through the public API
pub(crate) fn ensure_custom(sector: &Sector) -> Result<()> {
    match sector.universe_id.as_deref() {
        None | Some(DEFAULT_UNIVERSE_ID) => Err(Error::InvalidOperation(format!(
            "sector {} is not owned by a custom universe",
            sector.id
        ))),
        Some(_) if !sector.is_custom => Err(Error::InvalidOperation(format!(
            "sector {} is not marked custom",
            sector.id
        ))),
        Some(_) => Ok(()),
    }
}

pub(crate) fn save_sector_in(conn: &Connection, sector: &Sector) -> Result<()> {
    let existing_custom: Option<bool> = conn
        .query_row(
            "SELECT is_custom FROM sectors WHERE id = ?1",
            [&sector.id],
            |row| row.get(0),
        )
        .optional()?;
    if existing_custom == Some(false) {
        return Err(Error::InvalidOperation(format!(
            "sector id {} belongs to the default universe",
            sector.id
        )));
    }

    let removed = conn.execute(
        "DELETE FROM sectors
         WHERE id = ?1
            OR (universe_id = ?2 AND milieu = ?3 AND sector_x = ?4 AND sector_y = ?5)",
        params![
            sector.id,
            sector.universe_id,
            sector.milieu,
            sector.sector_x,
            sector.sector_y
        ],
    )?;
    if removed > 0 {
        debug!(sector = %sector.id, removed, "Replaced existing sector");
    }

    insert_sector(conn, sector)
}

/// Remove every sector of the default universe
pub(crate) fn delete_default_sectors(conn: &Connection) -> Result<usize> {
    Ok(conn.execute("DELETE FROM sectors WHERE universe_id IS NULL", [])?)
}

/// Insert a sector row and all children without any ownership checks
pub(crate) fn insert_sector(conn: &Connection, sector: &Sector) -> Result<()> {
    let sid = &sector.id;

    insert_rows(
        conn,
        &schema::SECTORS,
        &[vec![
            sid.into(),
            (&sector.universe_id).into(),
            sector.is_custom.into(),
            (&sector.milieu).into(),
            sector.sector_x.into(),
            sector.sector_y.into(),
            (&sector.primary_name).into(),
            (&sector.primary_language).into(),
            (&sector.abbreviation).into(),
            (&sector.label).into(),
            sector.selected.into(),
            (&sector.tags).into(),
            (&sector.style_sheet).into(),
            (&sector.credits).into(),
            (&sector.publication).into(),
            (&sector.author).into(),
            (&sector.publisher).into(),
            (&sector.reference).into(),
            (&sector.notes).into(),
        ]],
    )?;

    let rows: Vec<Vec<SqlValue>> = sector
        .alternate_names
        .iter()
        .map(|n| vec![sid.into(), (&n.name).into(), (&n.language).into()])
        .collect();
    insert_rows(conn, &schema::ALTERNATE_NAMES, &rows)?;

    let rows: Vec<Vec<SqlValue>> = sector
        .subsector_names
        .iter()
        .map(|n| vec![sid.into(), i32::from(n.code).into(), (&n.name).into()])
        .collect();
    insert_rows(conn, &schema::SUBSECTOR_NAMES, &rows)?;

    let rows: Vec<Vec<SqlValue>> = sector
        .allegiances
        .iter()
        .map(|a| {
            vec![
                (&a.id).into(),
                sid.into(),
                (&a.code).into(),
                (&a.name).into(),
                (&a.legacy).into(),
                (&a.base).into(),
            ]
        })
        .collect();
    insert_rows(conn, &schema::ALLEGIANCES, &rows)?;

    let rows: Vec<Vec<SqlValue>> = sector
        .sophonts
        .iter()
        .map(|s| {
            vec![
                (&s.id).into(),
                sid.into(),
                (&s.code).into(),
                (&s.name).into(),
                s.is_major.into(),
            ]
        })
        .collect();
    insert_rows(conn, &schema::SOPHONTS, &rows)?;

    let rows: Vec<Vec<SqlValue>> = sector
        .products
        .iter()
        .map(|p| {
            vec![
                sid.into(),
                (&p.publication).into(),
                (&p.author).into(),
                (&p.publisher).into(),
                (&p.reference).into(),
            ]
        })
        .collect();
    insert_rows(conn, &schema::PRODUCTS, &rows)?;

    insert_systems(conn, sector)?;

    let rows: Vec<Vec<SqlValue>> = sector
        .routes
        .iter()
        .map(|r| {
            vec![
                (&r.id).into(),
                sid.into(),
                r.start_hex_x.into(),
                r.start_hex_y.into(),
                r.end_hex_x.into(),
                r.end_hex_y.into(),
                r.start_offset_x.into(),
                r.start_offset_y.into(),
                r.end_offset_x.into(),
                r.end_offset_y.into(),
                (&r.route_type).into(),
                (&r.style).into(),
                (&r.color).into(),
                r.width.into(),
                (&r.allegiance_id).into(),
            ]
        })
        .collect();
    insert_rows(conn, &schema::ROUTES, &rows)?;

    let rows: Vec<Vec<SqlValue>> = sector
        .borders
        .iter()
        .map(|b| {
            vec![
                (&b.id).into(),
                sid.into(),
                (&b.allegiance_id).into(),
                b.show_label.into(),
                b.wrap_label.into(),
                b.label_hex_x.into(),
                b.label_hex_y.into(),
                b.label_offset_x.into(),
                b.label_offset_y.into(),
                (&b.label).into(),
                (&b.style).into(),
                (&b.color).into(),
            ]
        })
        .collect();
    insert_rows(conn, &schema::BORDERS, &rows)?;
    insert_rows(
        conn,
        &schema::BORDER_HEXES,
        &hex_rows(sector.borders.iter().map(|b| (&b.id, &b.hexes))),
    )?;

    let rows: Vec<Vec<SqlValue>> = sector
        .regions
        .iter()
        .map(|r| {
            vec![
                (&r.id).into(),
                sid.into(),
                r.show_label.into(),
                r.wrap_label.into(),
                r.label_hex_x.into(),
                r.label_hex_y.into(),
                r.label_offset_x.into(),
                r.label_offset_y.into(),
                (&r.label).into(),
                (&r.color).into(),
            ]
        })
        .collect();
    insert_rows(conn, &schema::REGIONS, &rows)?;
    insert_rows(
        conn,
        &schema::REGION_HEXES,
        &hex_rows(sector.regions.iter().map(|r| (&r.id, &r.hexes))),
    )?;

    let rows: Vec<Vec<SqlValue>> = sector
        .labels
        .iter()
        .map(|l| {
            vec![
                (&l.id).into(),
                sid.into(),
                l.hex_x.into(),
                l.hex_y.into(),
                (&l.text).into(),
                (&l.color).into(),
                (&l.size).into(),
                l.wrap.into(),
                l.offset_x.into(),
                l.offset_y.into(),
            ]
        })
        .collect();
    insert_rows(conn, &schema::LABELS, &rows)?;

    debug!(
        sector = %sector.id,
        systems = sector.systems.len(),
        "Inserted sector"
    );
    Ok(())
}

fn insert_systems(conn: &Connection, sector: &Sector) -> Result<()> {
    let rows: Vec<Vec<SqlValue>> = sector
        .systems
        .iter()
        .map(|w| {
            vec![
                (&w.id).into(),
                (&sector.id).into(),
                w.hex_x.into(),
                w.hex_y.into(),
                (&w.name).into(),
                (&w.starport).into(),
                (&w.size).into(),
                (&w.atmosphere).into(),
                (&w.hydrographics).into(),
                (&w.population).into(),
                (&w.government).into(),
                (&w.law_level).into(),
                (&w.tech_level).into(),
                w.importance.into(),
                (&w.resources).into(),
                (&w.labor).into(),
                (&w.infrastructure).into(),
                w.efficiency.into(),
                (&w.heterogeneity).into(),
                (&w.acceptance).into(),
                (&w.strangeness).into(),
                (&w.symbols).into(),
                w.population_multiplier.into(),
                w.belts.into(),
                w.gas_giants.into(),
                w.worlds.into(),
                (&w.zone).into(),
                (&w.allegiance_id).into(),
                (&w.notes).into(),
            ]
        })
        .collect();
    insert_rows(conn, &schema::SYSTEMS, &rows)?;

    let systems = &sector.systems;
    insert_rows(conn, &schema::NOBILITIES, &code_rows(systems, |w| &w.nobilities))?;
    insert_rows(conn, &schema::TRADE_CODES, &code_rows(systems, |w| &w.trade_codes))?;
    insert_rows(
        conn,
        &schema::RESEARCH_STATIONS,
        &code_rows(systems, |w| &w.research_stations),
    )?;
    insert_rows(conn, &schema::CUSTOM_REMARKS, &code_rows(systems, |w| &w.custom_remarks))?;
    insert_rows(conn, &schema::BASES, &code_rows(systems, |w| &w.bases))?;
    insert_rows(
        conn,
        &schema::RULING_ALLEGIANCES,
        &code_rows(systems, |w| &w.ruling_allegiances),
    )?;

    let mut populations: Vec<Vec<SqlValue>> = Vec::new();
    let mut owning: Vec<Vec<SqlValue>> = Vec::new();
    let mut colonies: Vec<Vec<SqlValue>> = Vec::new();
    let mut stars: Vec<Vec<SqlValue>> = Vec::new();

    for w in systems {
        for p in &w.sophont_populations {
            populations.push(vec![
                (&w.id).into(),
                (&p.sophont_id).into(),
                p.population.into(),
                p.is_home_world.into(),
                p.is_die_back.into(),
            ]);
        }
        for r in &w.owning_systems {
            owning.push(reference_row(&w.id, r));
        }
        for r in &w.colony_systems {
            colonies.push(reference_row(&w.id, r));
        }
        for (order, star) in w.stars.iter().enumerate() {
            stars.push(vec![
                (&w.id).into(),
                (&star.spectral_class).into(),
                star.spectral_decimal.into(),
                (&star.luminosity_class).into(),
                SqlValue::Integer(order as i64),
            ]);
        }
    }

    insert_rows(conn, &schema::SOPHONT_POPULATIONS, &populations)?;
    insert_rows(conn, &schema::OWNING_SYSTEMS, &owning)?;
    insert_rows(conn, &schema::COLONY_SYSTEMS, &colonies)?;
    insert_rows(conn, &schema::STARS, &stars)?;

    Ok(())
}

/// `(system_id, value)` rows for a per-system list of strings
fn code_rows<F>(systems: &[System], field: F) -> Vec<Vec<SqlValue>>
where
    F: Fn(&System) -> &Vec<String>,
{
    systems
        .iter()
        .flat_map(|w| {
            field(w)
                .iter()
                .map(move |code| vec![SqlValue::from(&w.id), SqlValue::from(code)])
        })
        .collect()
}

fn reference_row(system_id: &String, r: &SystemReference) -> Vec<SqlValue> {
    vec![
        system_id.into(),
        r.hex_x.into(),
        r.hex_y.into(),
        (&r.sector_abbreviation).into(),
    ]
}

fn hex_rows<'a, I>(owners: I) -> Vec<Vec<SqlValue>>
where
    I: Iterator<Item = (&'a String, &'a Vec<Hex>)>,
{
    owners
        .flat_map(|(id, hexes)| {
            hexes
                .iter()
                .map(move |h| vec![SqlValue::from(id), h.x.into(), h.y.into()])
        })
        .collect()
}

// =============================================================================
// Loading
// =============================================================================

/// How a child table is correlated with the sector being loaded
#[derive(Clone, Copy)]
enum Owner {
    Sector,
    System,
    Border,
    Region,
}

impl Owner {
    fn clause(&self) -> &'static str {
        match self {
            Owner::Sector => " WHERE t.sector_id = ?1 ORDER BY t.rowid",
            Owner::System => {
                " JOIN systems o ON t.system_id = o.id WHERE o.sector_id = ?1 ORDER BY t.rowid"
            }
            Owner::Border => {
                " JOIN borders o ON t.border_id = o.id WHERE o.sector_id = ?1 ORDER BY t.rowid"
            }
            Owner::Region => {
                " JOIN regions o ON t.region_id = o.id WHERE o.sector_id = ?1 ORDER BY t.rowid"
            }
        }
    }
}

fn query_children<T, F>(
    conn: &Connection,
    table: &TableSchema,
    owner: Owner,
    sector_id: &str,
    map: F,
) -> Result<Vec<T>>
where
    F: FnMut(&Row) -> rusqlite::Result<T>,
{
    let sql = format!("{}{}", generate_select(table, "t"), owner.clause());
    let mut stmt = conn.prepare_cached(&sql)?;
    let items = stmt
        .query_map([sector_id], map)?
        .collect::<rusqlite::Result<Vec<T>>>()?;
    Ok(items)
}

/// Children grouped by the id in `key_column`, in insertion order
fn query_grouped<T, F>(
    conn: &Connection,
    table: &TableSchema,
    owner: Owner,
    key_column: &str,
    sector_id: &str,
    mut map: F,
) -> Result<HashMap<String, Vec<T>>>
where
    F: FnMut(&Row) -> rusqlite::Result<T>,
{
    let pairs = query_children(conn, table, owner, sector_id, |row| {
        Ok((row.get::<_, String>(key_column)?, map(row)?))
    })?;

    let mut grouped: HashMap<String, Vec<T>> = HashMap::new();
    for (key, item) in pairs {
        grouped.entry(key).or_default().push(item);
    }
    Ok(grouped)
}

fn query_system_strings(
    conn: &Connection,
    table: &TableSchema,
    column: &str,
    sector_id: &str,
) -> Result<HashMap<String, Vec<String>>> {
    query_grouped(conn, table, Owner::System, "system_id", sector_id, |row| {
        row.get(column)
    })
}

pub(crate) fn load_sector_in(conn: &Connection, sector_id: &str) -> Result<Option<Sector>> {
    let sql = format!("{} WHERE t.id = ?1", generate_select(&schema::SECTORS, "t"));
    let sector = conn.query_row(&sql, [sector_id], row_to_sector).optional()?;

    let mut sector = match sector {
        Some(sector) => sector,
        None => return Ok(None),
    };

    sector.alternate_names = query_children(
        conn,
        &schema::ALTERNATE_NAMES,
        Owner::Sector,
        sector_id,
        |row| {
            Ok(AlternateName {
                name: row.get("name")?,
                language: row.get("language")?,
            })
        },
    )?;

    sector.subsector_names = query_children(
        conn,
        &schema::SUBSECTOR_NAMES,
        Owner::Sector,
        sector_id,
        |row| {
            Ok(SubsectorName {
                code: row.get("code")?,
                name: row.get("name")?,
            })
        },
    )?;

    sector.allegiances = query_children(
        conn,
        &schema::ALLEGIANCES,
        Owner::Sector,
        sector_id,
        |row| {
            Ok(Allegiance {
                id: row.get("id")?,
                code: row.get("code")?,
                name: row.get("name")?,
                legacy: row.get("legacy")?,
                base: row.get("base")?,
            })
        },
    )?;

    sector.sophonts = query_children(conn, &schema::SOPHONTS, Owner::Sector, sector_id, |row| {
        Ok(Sophont {
            id: row.get("id")?,
            code: row.get("code")?,
            name: row.get("name")?,
            is_major: row.get("is_major")?,
        })
    })?;

    sector.products = query_children(conn, &schema::PRODUCTS, Owner::Sector, sector_id, |row| {
        Ok(Product {
            publication: row.get("publication")?,
            author: row.get("author")?,
            publisher: row.get("publisher")?,
            reference: row.get("reference")?,
        })
    })?;

    sector.systems = load_systems(conn, sector_id)?;

    sector.routes = query_children(conn, &schema::ROUTES, Owner::Sector, sector_id, |row| {
        Ok(Route {
            id: row.get("id")?,
            start_hex_x: row.get("start_hex_x")?,
            start_hex_y: row.get("start_hex_y")?,
            end_hex_x: row.get("end_hex_x")?,
            end_hex_y: row.get("end_hex_y")?,
            start_offset_x: row.get("start_offset_x")?,
            start_offset_y: row.get("start_offset_y")?,
            end_offset_x: row.get("end_offset_x")?,
            end_offset_y: row.get("end_offset_y")?,
            route_type: row.get("route_type")?,
            style: row.get("style")?,
            color: row.get("color")?,
            width: row.get("width")?,
            allegiance_id: row.get("allegiance_id")?,
        })
    })?;

    let mut border_hexes =
        query_grouped(conn, &schema::BORDER_HEXES, Owner::Border, "border_id", sector_id, row_to_hex)?;
    sector.borders = query_children(conn, &schema::BORDERS, Owner::Sector, sector_id, |row| {
        let id: String = row.get("id")?;
        Ok(Border {
            hexes: border_hexes.remove(&id).unwrap_or_default(),
            id,
            allegiance_id: row.get("allegiance_id")?,
            show_label: row.get("show_label")?,
            wrap_label: row.get("wrap_label")?,
            label_hex_x: row.get("label_hex_x")?,
            label_hex_y: row.get("label_hex_y")?,
            label_offset_x: row.get("label_offset_x")?,
            label_offset_y: row.get("label_offset_y")?,
            label: row.get("label")?,
            style: row.get("style")?,
            color: row.get("color")?,
        })
    })?;

    let mut region_hexes =
        query_grouped(conn, &schema::REGION_HEXES, Owner::Region, "region_id", sector_id, row_to_hex)?;
    sector.regions = query_children(conn, &schema::REGIONS, Owner::Sector, sector_id, |row| {
        let id: String = row.get("id")?;
        Ok(Region {
            hexes: region_hexes.remove(&id).unwrap_or_default(),
            id,
            show_label: row.get("show_label")?,
            wrap_label: row.get("wrap_label")?,
            label_hex_x: row.get("label_hex_x")?,
            label_hex_y: row.get("label_hex_y")?,
            label_offset_x: row.get("label_offset_x")?,
            label_offset_y: row.get("label_offset_y")?,
            label: row.get("label")?,
            color: row.get("color")?,
        })
    })?;

    sector.labels = query_children(conn, &schema::LABELS, Owner::Sector, sector_id, |row| {
        Ok(Label {
            id: row.get("id")?,
            hex_x: row.get("hex_x")?,
            hex_y: row.get("hex_y")?,
            text: row.get("text")?,
            color: row.get("color")?,
            size: row.get("size")?,
            wrap: row.get("wrap")?,
            offset_x: row.get("offset_x")?,
            offset_y: row.get("offset_y")?,
        })
    })?;

    Ok(Some(sector))
}

fn load_systems(conn: &Connection, sector_id: &str) -> Result<Vec<System>> {
    let mut nobilities = query_system_strings(conn, &schema::NOBILITIES, "code", sector_id)?;
    let mut trade_codes = query_system_strings(conn, &schema::TRADE_CODES, "code", sector_id)?;
    let mut research = query_system_strings(conn, &schema::RESEARCH_STATIONS, "code", sector_id)?;
    let mut remarks = query_system_strings(conn, &schema::CUSTOM_REMARKS, "text", sector_id)?;
    let mut bases = query_system_strings(conn, &schema::BASES, "code", sector_id)?;
    let mut ruling =
        query_system_strings(conn, &schema::RULING_ALLEGIANCES, "allegiance_id", sector_id)?;

    let mut populations = query_grouped(
        conn,
        &schema::SOPHONT_POPULATIONS,
        Owner::System,
        "system_id",
        sector_id,
        |row| {
            Ok(SophontPopulation {
                sophont_id: row.get("sophont_id")?,
                population: row.get("population")?,
                is_home_world: row.get("is_home_world")?,
                is_die_back: row.get("is_die_back")?,
            })
        },
    )?;
    let mut owning = query_grouped(
        conn,
        &schema::OWNING_SYSTEMS,
        Owner::System,
        "system_id",
        sector_id,
        row_to_reference,
    )?;
    let mut colonies = query_grouped(
        conn,
        &schema::COLONY_SYSTEMS,
        Owner::System,
        "system_id",
        sector_id,
        row_to_reference,
    )?;
    // Stars keep their explicit order, which matches insertion order
    let mut stars = query_grouped(
        conn,
        &schema::STARS,
        Owner::System,
        "system_id",
        sector_id,
        |row| {
            Ok(Star {
                spectral_class: row.get("spectral_class")?,
                spectral_decimal: row.get("spectral_decimal")?,
                luminosity_class: row.get("luminosity_class")?,
            })
        },
    )?;

    query_children(conn, &schema::SYSTEMS, Owner::Sector, sector_id, |row| {
        let id: String = row.get("id")?;
        Ok(System {
            hex_x: row.get("hex_x")?,
            hex_y: row.get("hex_y")?,
            name: row.get("name")?,
            starport: row.get("starport")?,
            size: row.get("size")?,
            atmosphere: row.get("atmosphere")?,
            hydrographics: row.get("hydrographics")?,
            population: row.get("population")?,
            government: row.get("government")?,
            law_level: row.get("law_level")?,
            tech_level: row.get("tech_level")?,
            importance: row.get("importance")?,
            resources: row.get("resources")?,
            labor: row.get("labor")?,
            infrastructure: row.get("infrastructure")?,
            efficiency: row.get("efficiency")?,
            heterogeneity: row.get("heterogeneity")?,
            acceptance: row.get("acceptance")?,
            strangeness: row.get("strangeness")?,
            symbols: row.get("symbols")?,
            population_multiplier: row.get("population_multiplier")?,
            belts: row.get("belts")?,
            gas_giants: row.get("gas_giants")?,
            worlds: row.get("worlds")?,
            zone: row.get("zone")?,
            allegiance_id: row.get("allegiance_id")?,
            notes: row.get("notes")?,
            nobilities: nobilities.remove(&id).unwrap_or_default(),
            trade_codes: trade_codes.remove(&id).unwrap_or_default(),
            sophont_populations: populations.remove(&id).unwrap_or_default(),
            ruling_allegiances: ruling.remove(&id).unwrap_or_default(),
            owning_systems: owning.remove(&id).unwrap_or_default(),
            colony_systems: colonies.remove(&id).unwrap_or_default(),
            research_stations: research.remove(&id).unwrap_or_default(),
            custom_remarks: remarks.remove(&id).unwrap_or_default(),
            bases: bases.remove(&id).unwrap_or_default(),
            stars: stars.remove(&id).unwrap_or_default(),
            id,
        })
    })
}

fn row_to_sector(row: &Row) -> rusqlite::Result<Sector> {
    Ok(Sector {
        id: row.get("id")?,
        universe_id: row.get("universe_id")?,
        is_custom: row.get("is_custom")?,
        milieu: row.get("milieu")?,
        sector_x: row.get("sector_x")?,
        sector_y: row.get("sector_y")?,
        primary_name: row.get("primary_name")?,
        primary_language: row.get("primary_language")?,
        abbreviation: row.get("abbreviation")?,
        label: row.get("sector_label")?,
        selected: row.get("selected")?,
        tags: row.get("tags")?,
        style_sheet: row.get("style_sheet")?,
        credits: row.get("credits")?,
        publication: row.get("publication")?,
        author: row.get("author")?,
        publisher: row.get("publisher")?,
        reference: row.get("reference")?,
        notes: row.get("notes")?,
        ..Sector::default()
    })
}

fn row_to_hex(row: &Row) -> rusqlite::Result<Hex> {
    Ok(Hex::new(row.get("hex_x")?, row.get("hex_y")?))
}

fn row_to_reference(row: &Row) -> rusqlite::Result<SystemReference> {
    Ok(SystemReference {
        hex_x: row.get("hex_x")?,
        hex_y: row.get("hex_y")?,
        sector_abbreviation: row.get("sector_abbreviation")?,
    })
}
