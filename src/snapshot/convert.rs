//! Build canonical default-universe sectors from parsed records
//!
//! Allegiance and sophont codes are resolved to generated ids. Codes used by
//! worlds but not declared in the metadata are added to the sector so every
//! reference stays inside it.

use std::collections::{HashMap, HashSet};
use tracing::debug;
use uuid::Uuid;

use super::layout::IndexEntry;
use super::parser::{RegionRecord, SectorMetadata, WorldRecord};
use crate::error::{Error, Result};
use crate::model::{
    Allegiance, AlternateName, Border, Hex, Label, Region, Route, Sector, Sophont,
    SophontPopulation, System, SystemReference,
};

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Assemble one default-universe sector. Metadata coordinates and names take
/// precedence over the universe index.
pub(crate) fn build_sector(
    milieu: &str,
    entry: &IndexEntry,
    metadata: SectorMetadata,
    worlds: Vec<WorldRecord>,
) -> Result<Sector> {
    let names_from_metadata = !metadata.names.is_empty();
    let mut names = metadata.names.into_iter();
    let (primary_name, primary_language) = match names.next() {
        Some(name) => (name.name, name.language),
        None => {
            let name = entry
                .primary_name()
                .ok_or_else(|| Error::parse(milieu, "sector has no name"))?;
            (name.to_string(), None)
        }
    };
    let alternate_names: Vec<AlternateName> = if names_from_metadata {
        names.collect()
    } else {
        entry
            .names
            .iter()
            .skip(1)
            .map(|n| AlternateName {
                name: n.text.clone(),
                language: n.lang.clone(),
            })
            .collect()
    };

    let (sector_x, sector_y) = match (metadata.x.or(entry.x), metadata.y.or(entry.y)) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(Error::parse(primary_name, "sector has no coordinates")),
    };

    let data_file = metadata.data_file.unwrap_or_default();
    let mut sector = Sector {
        id: new_id(),
        universe_id: None,
        is_custom: false,
        milieu: milieu.to_string(),
        sector_x,
        sector_y,
        primary_name,
        primary_language,
        abbreviation: metadata.abbreviation.or_else(|| entry.abbreviation.clone()),
        label: metadata.label,
        selected: metadata.selected,
        tags: metadata.tags,
        style_sheet: metadata.style_sheet,
        credits: metadata.credits,
        publication: data_file.publication,
        author: data_file.author,
        publisher: data_file.publisher,
        reference: data_file.reference,
        alternate_names,
        subsector_names: metadata.subsectors,
        products: metadata.products,
        ..Sector::default()
    };

    let mut codes = CodeTable::default();
    for record in metadata.allegiances {
        codes.add_allegiance(
            &mut sector,
            Allegiance {
                id: new_id(),
                code: record.code,
                name: record.name,
                legacy: record.legacy,
                base: record.base,
            },
        );
    }
    for record in metadata.sophonts {
        codes.add_sophont(
            &mut sector,
            Sophont {
                id: new_id(),
                code: record.code,
                name: record.name,
                is_major: record.is_major,
            },
        );
    }

    for world in worlds {
        let system = build_system(&mut sector, &mut codes, world);
        sector.systems.push(system);
    }

    sector.routes = metadata
        .routes
        .into_iter()
        .map(|r| Route {
            id: new_id(),
            start_hex_x: r.start.x,
            start_hex_y: r.start.y,
            end_hex_x: r.end.x,
            end_hex_y: r.end.y,
            start_offset_x: r.start_offset.0,
            start_offset_y: r.start_offset.1,
            end_offset_x: r.end_offset.0,
            end_offset_y: r.end_offset.1,
            route_type: r.route_type,
            style: r.style,
            color: r.color,
            width: r.width,
            allegiance_id: codes.allegiance_id(r.allegiance.as_deref()),
        })
        .collect();

    sector.borders = metadata
        .borders
        .into_iter()
        .map(|b| {
            let region = build_region(b.region);
            Border {
                id: region.id,
                allegiance_id: codes.allegiance_id(b.allegiance.as_deref()),
                show_label: region.show_label,
                wrap_label: region.wrap_label,
                label_hex_x: region.label_hex_x,
                label_hex_y: region.label_hex_y,
                label_offset_x: region.label_offset_x,
                label_offset_y: region.label_offset_y,
                label: region.label,
                style: b.style,
                color: region.color,
                hexes: region.hexes,
            }
        })
        .collect();

    sector.regions = metadata.regions.into_iter().map(build_region).collect();

    sector.labels = metadata
        .labels
        .into_iter()
        .map(|l| Label {
            id: new_id(),
            hex_x: l.hex.x,
            hex_y: l.hex.y,
            text: l.text,
            color: l.color,
            size: l.size,
            wrap: l.wrap,
            offset_x: l.offset_x,
            offset_y: l.offset_y,
        })
        .collect();

    check_table_constraints(&sector)?;
    debug!(
        milieu,
        sector = %sector.primary_name,
        systems = sector.systems.len(),
        "Built sector"
    );
    Ok(sector)
}

/// Reject a sector that would violate a per-sector unique index or CHECK
/// when written, so the import can skip it before the write transaction
fn check_table_constraints(sector: &Sector) -> Result<()> {
    let fail = |message: String| Err(Error::parse(sector.primary_name.as_str(), message));

    let mut codes = HashSet::new();
    for subsector in &sector.subsector_names {
        if subsector.code > 15 {
            return fail(format!("subsector code {} is out of range", subsector.code));
        }
        if !codes.insert(subsector.code) {
            return fail(format!(
                "subsector {} appears more than once",
                char::from(b'A' + subsector.code)
            ));
        }
    }

    let mut hexes = HashSet::new();
    for system in &sector.systems {
        if !hexes.insert(system.hex()) {
            return fail(format!("hex {} appears more than once", system.hex()));
        }
    }

    Ok(())
}

fn build_region(record: RegionRecord) -> Region {
    Region {
        id: new_id(),
        show_label: record.show_label,
        wrap_label: record.wrap_label,
        label_hex_x: record.label_position.map(|h| h.x),
        label_hex_y: record.label_position.map(|h| h.y),
        label_offset_x: record.label_offset_x,
        label_offset_y: record.label_offset_y,
        label: record.label,
        color: record.color,
        hexes: record.hexes,
    }
}

#[derive(Default)]
struct CodeTable {
    allegiances: HashMap<String, String>,
    sophonts: HashMap<String, String>,
    sophont_names: HashMap<String, String>,
}

impl CodeTable {
    fn add_allegiance(&mut self, sector: &mut Sector, allegiance: Allegiance) -> String {
        if let Some(id) = self.allegiances.get(&allegiance.code) {
            return id.clone();
        }
        let id = allegiance.id.clone();
        self.allegiances.insert(allegiance.code.clone(), id.clone());
        sector.allegiances.push(allegiance);
        id
    }

    fn add_sophont(&mut self, sector: &mut Sector, sophont: Sophont) -> String {
        if let Some(id) = self.sophonts.get(&sophont.code) {
            return id.clone();
        }
        let id = sophont.id.clone();
        self.sophonts.insert(sophont.code.clone(), id.clone());
        self.sophont_names.insert(sophont.name.clone(), id.clone());
        sector.sophonts.push(sophont);
        id
    }

    fn allegiance_id(&self, code: Option<&str>) -> Option<String> {
        self.allegiances.get(code?).cloned()
    }

    /// Id of the allegiance with `code`, declaring it when unknown
    fn allegiance_or_declare(&mut self, sector: &mut Sector, code: &str) -> String {
        self.add_allegiance(
            sector,
            Allegiance {
                id: new_id(),
                code: code.to_string(),
                name: code.to_string(),
                ..Allegiance::default()
            },
        )
    }

    /// Id of a sophont referenced by name in a home-world remark
    fn sophont_by_name(&mut self, sector: &mut Sector, name: &str, is_major: bool) -> String {
        if let Some(id) = self.sophont_names.get(name).or_else(|| self.sophonts.get(name)) {
            return id.clone();
        }
        let code: String = name.chars().filter(|c| c.is_alphanumeric()).take(4).collect();
        let code = if self.sophonts.contains_key(&code) || code.is_empty() {
            name.to_string()
        } else {
            code
        };
        self.add_sophont(
            sector,
            Sophont {
                id: new_id(),
                code,
                name: name.to_string(),
                is_major,
            },
        )
    }
}

fn build_system(sector: &mut Sector, codes: &mut CodeTable, world: WorldRecord) -> System {
    let uwp = world.uwp;
    let mut system = System {
        id: new_id(),
        hex_x: world.hex.x,
        hex_y: world.hex.y,
        name: world.name,
        starport: Some(uwp.starport.to_string()),
        size: Some(uwp.size.to_string()),
        atmosphere: Some(uwp.atmosphere.to_string()),
        hydrographics: Some(uwp.hydrographics.to_string()),
        population: Some(uwp.population.to_string()),
        government: Some(uwp.government.to_string()),
        law_level: Some(uwp.law_level.to_string()),
        tech_level: Some(uwp.tech_level.to_string()),
        importance: world.importance,
        resources: world.economic.map(|e| e.resources.to_string()),
        labor: world.economic.map(|e| e.labor.to_string()),
        infrastructure: world.economic.map(|e| e.infrastructure.to_string()),
        efficiency: world.economic.map(|e| e.efficiency),
        heterogeneity: world.cultural.map(|c| c.heterogeneity.to_string()),
        acceptance: world.cultural.map(|c| c.acceptance.to_string()),
        strangeness: world.cultural.map(|c| c.strangeness.to_string()),
        symbols: world.cultural.map(|c| c.symbols.to_string()),
        population_multiplier: world.pbg.map(|p| p.population_multiplier),
        belts: world.pbg.map(|p| p.belts),
        gas_giants: world.pbg.map(|p| p.gas_giants),
        worlds: world.worlds,
        zone: world.zone,
        nobilities: chars(world.nobility.as_deref()),
        bases: chars(world.bases.as_deref()),
        stars: world.stars,
        ..System::default()
    };

    if let Some(code) = world.allegiance.as_deref() {
        system.allegiance_id = Some(codes.allegiance_or_declare(sector, code));
    }

    for remark in world.remarks {
        classify_remark(sector, codes, &mut system, remark);
    }

    system
}

fn chars(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| v.chars().map(String::from).collect())
        .unwrap_or_default()
}

/// Sort one remark into the system's typed collections. Anything
/// unrecognized is kept as a trade code.
fn classify_remark(sector: &mut Sector, codes: &mut CodeTable, system: &mut System, remark: String) {
    if let Some(target) = remark.strip_prefix("O:") {
        if let Some(reference) = parse_reference(target) {
            system.owning_systems.push(reference);
            return;
        }
    }
    if let Some(target) = remark.strip_prefix("C:") {
        if let Some(reference) = parse_reference(target) {
            system.colony_systems.push(reference);
            return;
        }
    }
    if let Some(station) = remark.strip_prefix("Rs") {
        if station.chars().count() == 1 {
            system.research_stations.push(station.to_string());
            return;
        }
    }
    if let Some(code) = remark.strip_prefix("Mr(").and_then(|r| r.strip_suffix(')')) {
        let id = codes.allegiance_or_declare(sector, code);
        system.ruling_allegiances.push(id);
        return;
    }
    if let Some(name) = remark.strip_prefix("Di(").and_then(|r| r.strip_suffix(')')) {
        let sophont_id = codes.sophont_by_name(sector, name, false);
        system.sophont_populations.push(SophontPopulation {
            sophont_id,
            population: None,
            is_home_world: true,
            is_die_back: true,
        });
        return;
    }
    if let Some(population) = home_world(sector, codes, &remark) {
        system.sophont_populations.push(population);
        return;
    }
    if let Some(population) = sophont_population(codes, &remark) {
        system.sophont_populations.push(population);
        return;
    }

    system.trade_codes.push(remark);
}

/// `(Name)` marks a major race home world, `[Name]` a minor one; either may
/// carry a population digit
fn home_world(sector: &mut Sector, codes: &mut CodeTable, remark: &str) -> Option<SophontPopulation> {
    let (is_major, close) = match remark.chars().next()? {
        '(' => (true, ')'),
        '[' => (false, ']'),
        _ => return None,
    };
    let end = remark.find(close)?;
    let name = &remark[1..end];
    if name.is_empty() {
        return None;
    }
    let population = population_share(&remark[end + 1..])?;

    Some(SophontPopulation {
        sophont_id: codes.sophont_by_name(sector, name, is_major),
        population,
        is_home_world: true,
        is_die_back: false,
    })
}

/// `CodeN` or `CodeW` for a declared sophont code
fn sophont_population(codes: &CodeTable, remark: &str) -> Option<SophontPopulation> {
    let split = remark.len().checked_sub(1)?;
    if !remark.is_char_boundary(split) {
        return None;
    }
    let (code, share) = remark.split_at(split);
    let sophont_id = codes.sophonts.get(code)?.clone();
    let population = population_share(share)??;

    Some(SophontPopulation {
        sophont_id,
        population: Some(population),
        is_home_world: false,
        is_die_back: false,
    })
}

/// Population share in tenths: empty is unspecified, `W` the whole world.
/// `None` means the suffix is not a share at all.
fn population_share(suffix: &str) -> Option<Option<i32>> {
    match suffix {
        "" => Some(None),
        "W" => Some(Some(10)),
        s if s.len() == 1 => s.parse().ok().map(Some),
        _ => None,
    }
}

/// `XXYY` in the same sector or `Abbr-XXYY` in another one
fn parse_reference(target: &str) -> Option<SystemReference> {
    let (abbreviation, hex) = match target.rsplit_once('-') {
        Some((abbreviation, hex)) => (Some(abbreviation.to_string()), hex),
        None => (None, target),
    };
    let hex = Hex::parse(hex)?;
    Some(SystemReference {
        hex_x: hex.x,
        hex_y: hex.y,
        sector_abbreviation: abbreviation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SubsectorName;
    use crate::snapshot::layout::IndexName;
    use crate::snapshot::parser::{AllegianceRecord, SophontRecord, Uwp};

    fn entry(name: &str, x: i32, y: i32) -> IndexEntry {
        IndexEntry {
            x: Some(x),
            y: Some(y),
            milieu: Some("M1105".into()),
            abbreviation: Some("Test".into()),
            names: vec![IndexName {
                text: name.into(),
                lang: None,
            }],
        }
    }

    fn world(hex: &str, remarks: &[&str], allegiance: Option<&str>) -> WorldRecord {
        WorldRecord {
            hex: Hex::parse(hex).unwrap(),
            name: Some(format!("World {}", hex)),
            uwp: Uwp {
                starport: 'A',
                size: '7',
                atmosphere: '8',
                hydrographics: '8',
                population: '8',
                government: '9',
                law_level: '9',
                tech_level: 'C',
            },
            remarks: remarks.iter().map(|r| r.to_string()).collect(),
            importance: None,
            economic: None,
            cultural: None,
            nobility: Some("Bc".into()),
            bases: Some("NS".into()),
            zone: None,
            pbg: None,
            worlds: None,
            allegiance: allegiance.map(str::to_string),
            stars: Vec::new(),
        }
    }

    #[test]
    fn test_index_supplies_missing_metadata() {
        let sector =
            build_sector("M1105", &entry("Indexed", 2, -3), SectorMetadata::default(), vec![])
                .unwrap();
        assert_eq!(sector.primary_name, "Indexed");
        assert_eq!((sector.sector_x, sector.sector_y), (2, -3));
        assert_eq!(sector.abbreviation.as_deref(), Some("Test"));
        assert_eq!(sector.universe_id, None);
        assert!(!sector.is_custom);
    }

    #[test]
    fn test_missing_coordinates_fail() {
        let mut e = entry("Nowhere", 0, 0);
        e.x = None;
        assert!(build_sector("M0", &e, SectorMetadata::default(), vec![]).is_err());
    }

    #[test]
    fn test_codes_resolve_to_ids() {
        let metadata = SectorMetadata {
            allegiances: vec![AllegianceRecord {
                code: "ImDd".into(),
                name: "Third Imperium".into(),
                ..AllegianceRecord::default()
            }],
            sophonts: vec![SophontRecord {
                code: "Vlan".into(),
                name: "Vilani".into(),
                is_major: true,
            }],
            ..SectorMetadata::default()
        };
        let worlds = vec![
            world("0101", &["Ri", "Vlan4", "O:Spin-1910", "RsB"], Some("ImDd")),
            world("0102", &["(Aslan)", "Di(Droyne)", "Mr(CsIm)", "C:0101"], Some("NaHu")),
        ];

        let sector = build_sector("M1105", &entry("Coded", 0, 0), metadata, worlds).unwrap();
        let imperium = sector.allegiance_by_code("ImDd").unwrap();
        let vilani = sector.sophont_by_code("Vlan").unwrap();

        let first = &sector.systems[0];
        assert_eq!(first.allegiance_id.as_deref(), Some(imperium.id.as_str()));
        assert_eq!(first.trade_codes, vec!["Ri"]);
        assert_eq!(first.sophont_populations[0].sophont_id, vilani.id);
        assert_eq!(first.sophont_populations[0].population, Some(4));
        assert_eq!(
            first.owning_systems[0].sector_abbreviation.as_deref(),
            Some("Spin")
        );
        assert_eq!(first.research_stations, vec!["B"]);
        assert_eq!(first.nobilities, vec!["B", "c"]);
        assert_eq!(first.bases, vec!["N", "S"]);

        let second = &sector.systems[1];
        assert!(sector.allegiance_by_code("NaHu").is_some());
        assert!(sector.allegiance_by_code("CsIm").is_some());
        assert_eq!(second.ruling_allegiances.len(), 1);
        assert_eq!(second.sophont_populations.len(), 2);
        assert!(second.sophont_populations[0].is_home_world);
        assert!(second.sophont_populations[1].is_die_back);
        assert_eq!(second.colony_systems[0].hex_y, 1);

        let aslan = sector.sophonts.iter().find(|s| s.name == "Aslan").unwrap();
        assert!(aslan.is_major);
        assert_eq!(aslan.code, "Asla");
    }

    #[test]
    fn test_duplicate_hex_fails_sector() {
        let worlds = vec![world("0101", &[], None), world("0101", &[], None)];
        let err = build_sector("M0", &entry("Twice", 0, 0), SectorMetadata::default(), worlds)
            .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_duplicate_subsector_fails_sector() {
        let metadata = SectorMetadata {
            subsectors: vec![
                SubsectorName {
                    code: 0,
                    name: "Regina".into(),
                },
                SubsectorName {
                    code: 0,
                    name: "Again".into(),
                },
            ],
            ..SectorMetadata::default()
        };
        let err = build_sector("M0", &entry("Split", 0, 0), metadata, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("subsector A appears more than once"));
    }

    #[test]
    fn test_population_share() {
        assert_eq!(population_share(""), Some(None));
        assert_eq!(population_share("W"), Some(Some(10)));
        assert_eq!(population_share("7"), Some(Some(7)));
        assert_eq!(population_share("x"), None);
    }
}
