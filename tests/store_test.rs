//! Store integration tests against on-disk SQLite databases.
//!
//! Covers repository round trips, replace semantics, cascading deletes,
//! default-universe protection and overlay resolution.

mod common;

use std::collections::HashSet;

use common::{custom_universe, full_sector, open_store};
use universe_db::model::*;
use universe_db::schema::{
    get_table, DependencyResolver, RULING_ALLEGIANCES, SECTORS, SYSTEMS, TRADE_CODES,
};
use universe_db::{Error, Store};

// =============================================================================
// Helpers
// =============================================================================

/// Import a minimal default universe through the public import path
fn seed_default(store: &Store, dir: &std::path::Path, positions: &[(&str, i32, i32)]) {
    let root = dir.join("snapshot");
    common::write_timestamp(&root, "2024-01-01 00:00:00");
    for (i, (milieu, x, y)) in positions.iter().enumerate() {
        let line = common::world_line("0101", "Default world", "B565777-9");
        common::write_sector(
            &root,
            milieu,
            &format!("Default {}", i),
            *x,
            *y,
            &common::sec_file(&[line]),
        );
    }
    let report = store
        .import_default_universe(&root, universe_db::ImportOptions::new())
        .unwrap();
    assert_eq!(report.imported, positions.len());
}

fn total_rows(store: &Store, tables: &[&str]) -> u64 {
    tables
        .iter()
        .map(|name| store.count_rows(get_table(name).unwrap(), None).unwrap())
        .sum()
}

// =============================================================================
// Universe Repository
// =============================================================================

#[test]
fn test_universe_lookup_and_listing() {
    let (_dir, store) = open_store();
    custom_universe(&store, "beta");
    custom_universe(&store, "alpha");

    let names: Vec<String> = store
        .list_universe_info(None)
        .unwrap()
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, vec!["Universe alpha", "Universe beta"]);

    let info = store.universe_info_by_name("Universe beta", None).unwrap().unwrap();
    assert_eq!(info.id, "beta");
    assert_eq!(store.universe_info_by_id("missing", None).unwrap(), None);
    assert_eq!(store.universe_info_by_id(DEFAULT_UNIVERSE_ID, None).unwrap(), None);
}

#[test]
fn test_reserved_default_universe_is_rejected() {
    let (_dir, store) = open_store();
    let default = Universe::new(DEFAULT_UNIVERSE_ID, DEFAULT_UNIVERSE_NAME);

    assert!(matches!(
        store.save_universe(&default, None),
        Err(Error::InvalidOperation(_))
    ));
    assert!(matches!(
        store.delete_universe(DEFAULT_UNIVERSE_ID, None),
        Err(Error::InvalidOperation(_))
    ));
}

#[test]
fn test_save_universe_updates_record_and_saves_sectors() {
    let (_dir, store) = open_store();
    let mut universe = custom_universe(&store, "mine");

    universe.description = Some("Campaign".into());
    universe.sectors.push(full_sector("s1", "mine", "M1105", 0, 0));
    store.save_universe(&universe, None).unwrap();

    let info = store.universe_info_by_id("mine", None).unwrap().unwrap();
    assert_eq!(info.description.as_deref(), Some("Campaign"));
    assert!(store.load_sector("s1", None).unwrap().is_some());
}

#[test]
fn test_delete_universe_cascades_to_sectors() {
    let (_dir, store) = open_store();
    custom_universe(&store, "doomed");
    store
        .save_sector(&full_sector("s1", "doomed", "M1105", 0, 0), None)
        .unwrap();

    assert!(store.delete_universe("doomed", None).unwrap());
    assert!(!store.delete_universe("doomed", None).unwrap());
    assert_eq!(store.load_sector("s1", None).unwrap(), None);
    assert_eq!(store.count_rows(&SYSTEMS, None).unwrap(), 0);
}

// =============================================================================
// Sector Repository
// =============================================================================

#[test]
fn test_sector_round_trip() {
    let (_dir, store) = open_store();
    custom_universe(&store, "mine");
    let sector = full_sector("s1", "mine", "M1105", -4, -1);

    store.save_sector(&sector, None).unwrap();
    let loaded = store.load_sector("s1", None).unwrap().unwrap();

    assert_eq!(loaded, sector);
}

#[test]
fn test_load_missing_sector_is_none() {
    let (_dir, store) = open_store();
    assert_eq!(store.load_sector("nope", None).unwrap(), None);
    assert!(!store.delete_sector("nope", None).unwrap());
}

#[test]
fn test_replace_by_id_keeps_one_row() {
    let (_dir, store) = open_store();
    custom_universe(&store, "mine");

    let mut sector = full_sector("s1", "mine", "M1105", 0, 0);
    store.save_sector(&sector, None).unwrap();

    sector.primary_name = "Renamed".into();
    sector.systems.truncate(1);
    sector.systems[0].trade_codes = vec!["Ag".into()];
    store.save_sector(&sector, None).unwrap();

    assert_eq!(store.count_rows(&SECTORS, None).unwrap(), 1);
    assert_eq!(store.count_rows(&SYSTEMS, None).unwrap(), 1);
    assert_eq!(store.count_rows(&TRADE_CODES, None).unwrap(), 1);
    assert_eq!(store.load_sector("s1", None).unwrap().unwrap(), sector);
}

#[test]
fn test_replace_by_position_keeps_latest_id() {
    let (_dir, store) = open_store();
    custom_universe(&store, "mine");

    store
        .save_sector(&full_sector("first", "mine", "M1105", 3, 4), None)
        .unwrap();
    store
        .save_sector(&full_sector("second", "mine", "M1105", 3, 4), None)
        .unwrap();

    let at = store
        .sector_info_by_position("mine", "M1105", 3, 4, None)
        .unwrap()
        .unwrap();
    assert_eq!(at.id, "second");
    assert_eq!(store.load_sector("first", None).unwrap(), None);
    assert_eq!(store.count_rows(&SECTORS, None).unwrap(), 1);
}

#[test]
fn test_delete_sector_cascades_through_every_child_table() {
    let (_dir, store) = open_store();
    custom_universe(&store, "mine");
    store
        .save_sector(&full_sector("s1", "mine", "M1105", 0, 0), None)
        .unwrap();

    let owned = DependencyResolver::new().cascade_closure("sectors");
    assert!(owned.contains(&"systems"));
    assert!(owned.contains(&"stars"));
    assert!(owned.contains(&"border_hexes"));
    assert!(total_rows(&store, &owned) > 0);

    assert!(store.delete_sector("s1", None).unwrap());

    assert_eq!(store.load_sector("s1", None).unwrap(), None);
    for table in owned {
        assert_eq!(
            store.count_rows(get_table(table).unwrap(), None).unwrap(),
            0,
            "rows left in {}",
            table
        );
    }
}

#[test]
fn test_deleted_allegiance_clears_weak_references() {
    let (_dir, store) = open_store();
    custom_universe(&store, "u1");
    store
        .save_sector(&full_sector("s1", "u1", "M0", 0, 0), None)
        .unwrap();
    assert_eq!(store.count_rows(&RULING_ALLEGIANCES, None).unwrap(), 1);

    let mut tx = store.create_transaction().unwrap();
    tx.begin().unwrap();
    let removed = tx
        .connection()
        .unwrap()
        .execute("DELETE FROM allegiances WHERE id = ?1", ["s1-alg"])
        .unwrap();
    assert_eq!(removed, 1);
    tx.end().unwrap();

    let sector = store.load_sector("s1", None).unwrap().unwrap();
    assert!(sector.allegiances.is_empty());
    assert_eq!(sector.systems.len(), 2);
    assert_eq!(sector.systems[0].allegiance_id, None);
    assert!(sector.systems[0].ruling_allegiances.is_empty());
    assert_eq!(sector.routes.len(), 1);
    assert_eq!(sector.routes[0].allegiance_id, None);
    assert_eq!(sector.borders.len(), 1);
    assert_eq!(sector.borders[0].allegiance_id, None);
    assert_eq!(sector.borders[0].hexes.len(), 3);
    assert_eq!(store.count_rows(&RULING_ALLEGIANCES, None).unwrap(), 0);
}

#[test]
fn test_default_sectors_are_immutable() {
    let (dir, store) = open_store();
    seed_default(&store, dir.path(), &[("M1105", 0, 0)]);

    let listed = store
        .list_sector_info(DEFAULT_UNIVERSE_ID, None, true, None)
        .unwrap();
    let info = &listed[0];
    let err = store.delete_sector(&info.id, None).unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
    assert!(store.load_sector(&info.id, None).unwrap().is_some());

    let mut copy = store.load_sector(&info.id, None).unwrap().unwrap();
    assert!(matches!(
        store.save_sector(&copy, None),
        Err(Error::InvalidOperation(_))
    ));
    copy.universe_id = Some(DEFAULT_UNIVERSE_ID.into());
    copy.is_custom = true;
    assert!(matches!(
        store.save_sector(&copy, None),
        Err(Error::InvalidOperation(_))
    ));
}

#[test]
fn test_custom_sector_cannot_reuse_default_id() {
    let (dir, store) = open_store();
    seed_default(&store, dir.path(), &[("M1105", 0, 0)]);
    custom_universe(&store, "u1");

    let default_id = store
        .list_sector_info(DEFAULT_UNIVERSE_ID, None, true, None)
        .unwrap()[0]
        .id
        .clone();
    let custom = Sector::custom(default_id.as_str(), "u1", "M1105", 5, 5, "Shadow");
    assert!(matches!(
        store.save_sector(&custom, None),
        Err(Error::InvalidOperation(_))
    ));

    assert!(store.has_default_universe(None).unwrap());
    let kept = store.load_sector(&default_id, None).unwrap().unwrap();
    assert!(!kept.is_custom);
    assert_eq!(kept.universe_id, None);
    assert_eq!(
        store.sector_info_by_position("u1", "M1105", 5, 5, None).unwrap(),
        None
    );
}

#[test]
fn test_caller_transaction_spans_operations() {
    let (_dir, store) = open_store();

    let mut tx = store.create_transaction().unwrap();
    tx.begin().unwrap();
    store
        .save_universe(&Universe::new("tx", "In transaction"), Some(&mut tx))
        .unwrap();
    store
        .save_sector(&full_sector("s1", "tx", "M0", 0, 0), Some(&mut tx))
        .unwrap();
    assert!(store.load_sector("s1", Some(&mut tx)).unwrap().is_some());
    tx.rollback().unwrap();

    assert_eq!(store.universe_info_by_id("tx", None).unwrap(), None);
    assert_eq!(store.load_sector("s1", None).unwrap(), None);
}

// =============================================================================
// Overlay Resolution
// =============================================================================

#[test]
fn test_custom_sector_wins_at_its_position() {
    let (dir, store) = open_store();
    seed_default(&store, dir.path(), &[("M1105", 0, 0), ("M1105", 1, 0)]);
    custom_universe(&store, "mine");
    store
        .save_sector(&full_sector("mine-0-0", "mine", "M1105", 0, 0), None)
        .unwrap();

    let at = store
        .sector_info_by_position("mine", "M1105", 0, 0, None)
        .unwrap()
        .unwrap();
    assert_eq!(at.id, "mine-0-0");
    assert!(at.is_custom);

    let fallback = store
        .sector_info_by_position("mine", "M1105", 1, 0, None)
        .unwrap()
        .unwrap();
    assert!(!fallback.is_custom);
    assert_eq!(fallback.universe_id, None);

    let default_view = store
        .sector_info_by_position(DEFAULT_UNIVERSE_ID, "M1105", 0, 0, None)
        .unwrap()
        .unwrap();
    assert!(!default_view.is_custom);

    assert_eq!(
        store
            .sector_info_by_position("mine", "M1105", 9, 9, None)
            .unwrap(),
        None
    );
}

#[test]
fn test_listing_has_one_entry_per_visible_position() {
    let (dir, store) = open_store();
    seed_default(
        &store,
        dir.path(),
        &[("M1105", 0, 0), ("M1105", 1, 0), ("M0", 0, 0)],
    );
    custom_universe(&store, "mine");
    store
        .save_sector(&full_sector("c1", "mine", "M1105", 0, 0), None)
        .unwrap();
    store
        .save_sector(&full_sector("c2", "mine", "M1105", 5, 5), None)
        .unwrap();

    let listed = store.list_sector_info("mine", None, true, None).unwrap();
    let positions: HashSet<(String, i32, i32)> = listed
        .iter()
        .map(|s| (s.milieu.clone(), s.sector_x, s.sector_y))
        .collect();
    assert_eq!(listed.len(), 4);
    assert_eq!(positions.len(), listed.len());

    let at_origin: Vec<&SectorInfo> = listed
        .iter()
        .filter(|s| s.milieu == "M1105" && s.sector_x == 0 && s.sector_y == 0)
        .collect();
    assert_eq!(at_origin.len(), 1);
    assert_eq!(at_origin[0].id, "c1");

    let custom_only = store.list_sector_info("mine", None, false, None).unwrap();
    assert_eq!(custom_only.len(), 2);
    assert!(custom_only.iter().all(|s| s.is_custom));

    let one_milieu = store.list_sector_info("mine", Some("M0"), true, None).unwrap();
    assert_eq!(one_milieu.len(), 1);
    assert!(!one_milieu[0].is_custom);

    let defaults = store
        .list_sector_info(DEFAULT_UNIVERSE_ID, None, true, None)
        .unwrap();
    assert_eq!(defaults.len(), 3);
    assert!(defaults.iter().all(|s| s.universe_id.is_none()));
}

#[test]
fn test_load_universe_reports_progress() {
    let (dir, store) = open_store();
    seed_default(&store, dir.path(), &[("M1105", 0, 0), ("M1105", 1, 0)]);
    custom_universe(&store, "mine");
    store
        .save_sector(&full_sector("c1", "mine", "M1105", 0, 0), None)
        .unwrap();

    let mut calls = Vec::new();
    let mut record = |milieu: Option<&str>, name: Option<&str>, done: usize, total: usize| {
        calls.push((milieu.map(str::to_string), name.map(str::to_string), done, total));
    };
    let universe = store
        .load_universe("mine", true, Some(&mut record), None)
        .unwrap()
        .unwrap();

    assert_eq!(universe.sectors.len(), 2);
    assert!(universe.sectors.iter().any(|s| s.id == "c1" && s.systems.len() == 2));
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].2, 1);
    assert_eq!(calls[2], (None, None, 2, 2));
}

#[test]
fn test_load_universe_absent_cases() {
    let (dir, store) = open_store();
    assert_eq!(
        store
            .load_universe(DEFAULT_UNIVERSE_ID, true, None, None)
            .unwrap(),
        None
    );
    assert_eq!(store.load_universe("ghost", true, None, None).unwrap(), None);
    assert!(!store.has_default_universe(None).unwrap());

    seed_default(&store, dir.path(), &[("M1105", 0, 0)]);
    assert!(store.has_default_universe(None).unwrap());
    let default = store
        .load_universe(DEFAULT_UNIVERSE_ID, true, None, None)
        .unwrap()
        .unwrap();
    assert_eq!(default.name, DEFAULT_UNIVERSE_NAME);
    assert_eq!(default.sectors.len(), 1);
}
