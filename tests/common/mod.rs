//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::path::Path;
use tempfile::TempDir;

use universe_db::model::*;
use universe_db::{Store, StoreConfig};

// =============================================================================
// Store Fixtures
// =============================================================================

/// A store in a fresh temporary directory; keep the `TempDir` alive
pub fn open_store() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::open(StoreConfig::new(dir.path().join("universe.db"))).unwrap();
    (dir, store)
}

pub fn custom_universe(store: &Store, id: &str) -> Universe {
    let universe = Universe::new(id, format!("Universe {}", id));
    store.save_universe(&universe, None).unwrap();
    universe
}

/// Custom sector with every child collection populated
pub fn full_sector(id: &str, universe_id: &str, milieu: &str, x: i32, y: i32) -> Sector {
    let allegiance_id = format!("{}-alg", id);
    let sophont_id = format!("{}-soph", id);
    let mut sector = Sector::custom(id, universe_id, milieu, x, y, format!("Sector {}", id));

    sector.primary_language = Some("Anglic".into());
    sector.abbreviation = Some("Tst".into());
    sector.label = Some("Test label".into());
    sector.selected = true;
    sector.tags = Some("Custom".into());
    sector.credits = Some("Referee".into());
    sector.notes = Some("Notes".into());
    sector.alternate_names = vec![AlternateName {
        name: "Alt".into(),
        language: Some("Vilani".into()),
    }];
    sector.subsector_names = vec![
        SubsectorName {
            code: 0,
            name: "Alpha".into(),
        },
        SubsectorName {
            code: 15,
            name: "Omega".into(),
        },
    ];
    sector.allegiances = vec![Allegiance {
        id: allegiance_id.clone(),
        code: "CsIm".into(),
        name: "Client state".into(),
        legacy: Some("Cs".into()),
        base: None,
    }];
    sector.sophonts = vec![Sophont {
        id: sophont_id.clone(),
        code: "Huma".into(),
        name: "Human".into(),
        is_major: true,
    }];
    sector.products = vec![Product {
        publication: Some("Atlas".into()),
        author: Some("Author".into()),
        publisher: None,
        reference: Some("p. 12".into()),
    }];
    sector.systems = vec![
        System {
            id: format!("{}-sys1", id),
            hex_x: 1,
            hex_y: 1,
            name: Some("Capital".into()),
            starport: Some("A".into()),
            size: Some("8".into()),
            tech_level: Some("F".into()),
            importance: Some(4),
            efficiency: Some(-2),
            population_multiplier: Some(7),
            belts: Some(1),
            gas_giants: Some(3),
            zone: Some("A".into()),
            allegiance_id: Some(allegiance_id.clone()),
            nobilities: vec!["B".into(), "c".into()],
            trade_codes: vec!["Hi".into(), "In".into()],
            sophont_populations: vec![SophontPopulation {
                sophont_id,
                population: Some(10),
                is_home_world: true,
                is_die_back: false,
            }],
            ruling_allegiances: vec![allegiance_id.clone()],
            owning_systems: vec![SystemReference {
                hex_x: 2,
                hex_y: 3,
                sector_abbreviation: Some("Spin".into()),
            }],
            colony_systems: vec![SystemReference {
                hex_x: 4,
                hex_y: 5,
                sector_abbreviation: None,
            }],
            research_stations: vec!["G".into()],
            custom_remarks: vec!["Capital of the client state".into()],
            bases: vec!["N".into(), "S".into()],
            stars: vec![
                Star {
                    spectral_class: Some("G".into()),
                    spectral_decimal: Some(2),
                    luminosity_class: Some("V".into()),
                },
                Star {
                    spectral_class: Some("BD".into()),
                    spectral_decimal: None,
                    luminosity_class: None,
                },
            ],
            ..System::default()
        },
        System {
            id: format!("{}-sys2", id),
            hex_x: 2,
            hex_y: 1,
            name: Some("Outpost".into()),
            ..System::default()
        },
    ];
    sector.routes = vec![Route {
        id: format!("{}-route", id),
        start_hex_x: 1,
        start_hex_y: 1,
        end_hex_x: 2,
        end_hex_y: 1,
        end_offset_x: 1,
        route_type: Some("Trade".into()),
        width: Some(1.5),
        allegiance_id: Some(allegiance_id.clone()),
        ..Route::default()
    }];
    sector.borders = vec![Border {
        id: format!("{}-border", id),
        allegiance_id: Some(allegiance_id),
        show_label: true,
        label_hex_x: Some(1),
        label_hex_y: Some(1),
        label_offset_x: Some(0.5),
        label: Some("Client".into()),
        hexes: vec![Hex::new(1, 1), Hex::new(2, 1), Hex::new(2, 2)],
        ..Border::default()
    }];
    sector.regions = vec![Region {
        id: format!("{}-region", id),
        color: Some("#ff0000".into()),
        hexes: vec![Hex::new(5, 5), Hex::new(5, 6)],
        ..Region::default()
    }];
    sector.labels = vec![Label {
        id: format!("{}-label", id),
        hex_x: 7,
        hex_y: 7,
        text: "The Void".into(),
        wrap: true,
        offset_y: Some(-0.25),
        ..Label::default()
    }];

    sector
}

// =============================================================================
// Snapshot Fixtures
// =============================================================================

pub const SEC_HEADER: &str =
    "Hex\tName\tUWP\tRemarks\t{Ix}\t(Ex)\t[Cx]\tNobility\tBases\tZone\tPBG\tW\tAllegiance\tStars";

/// Write `timestamp.txt` under `root`
pub fn write_timestamp(root: &Path, timestamp: &str) {
    std::fs::create_dir_all(root).unwrap();
    std::fs::write(root.join("timestamp.txt"), timestamp).unwrap();
}

/// Write one sector (index entry, metadata and world data) into a milieu.
/// Existing index entries are kept.
pub fn write_sector(root: &Path, milieu: &str, name: &str, x: i32, y: i32, sec: &str) {
    write_sector_with_metadata(root, milieu, name, x, y, "", sec);
}

/// Like `write_sector`, with `extra` placed inside the `<Sector>` element
pub fn write_sector_with_metadata(
    root: &Path,
    milieu: &str,
    name: &str,
    x: i32,
    y: i32,
    extra: &str,
    sec: &str,
) {
    let dir = root.join("milieu").join(milieu);
    std::fs::create_dir_all(&dir).unwrap();

    let index_path = dir.join("universe.json");
    let mut index: serde_json::Value = std::fs::read_to_string(&index_path)
        .map(|text| serde_json::from_str(&text).unwrap())
        .unwrap_or_else(|_| serde_json::json!({ "Sectors": [] }));
    index["Sectors"]
        .as_array_mut()
        .unwrap()
        .push(serde_json::json!({
            "X": x,
            "Y": y,
            "Milieu": milieu,
            "Names": [{ "Text": name }],
        }));
    std::fs::write(&index_path, index.to_string()).unwrap();

    let file_name = universe_db::snapshot::escape_file_name(name);
    std::fs::write(
        dir.join(format!("{}.xml", file_name)),
        format!(
            r#"<?xml version="1.0"?>
<Sector Abbreviation="{abbr}">
  <Name>{name}</Name>
  <Allegiances>
    <Allegiance Code="ImDd">Third Imperium</Allegiance>
  </Allegiances>
  {extra}
</Sector>"#,
            abbr = &name[..name.len().min(4)],
            name = name,
            extra = extra
        ),
    )
    .unwrap();
    std::fs::write(dir.join(format!("{}.sec", file_name)), sec).unwrap();
}

pub fn world_line(hex: &str, name: &str, uwp: &str) -> String {
    format!(
        "{}\t{}\t{}\tHi In\t{{ +2 }}\t(C8E+1)\t[9A6C]\tB\tN\t-\t503\t9\tImDd\tG2 V",
        hex, name, uwp
    )
}

pub fn sec_file(lines: &[String]) -> String {
    let mut text = format!("# generated\n{}\n", SEC_HEADER);
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}
