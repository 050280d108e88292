//! Running the transform twice over unchanged input writes the same bytes.

use gearworks_core::test_utils::*;
use gearworks_store::{DirStore, TransformConfig, run_transform};
use std::fs;

#[test]
fn rerun_is_byte_identical() {
    let dir = std::env::temp_dir().join(format!("gearworks_rerun_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();

    let catalogue = CatalogueBuilder::new()
        .tiered(
            "BLADE",
            vec![
                ("1", crafted_fields("Blade I", "100", &[("STEEL", "2")])),
                ("2", crafted_fields("Blade II", "300", &[("STEEL", "5"), ("GEM", "1")])),
            ],
        )
        .single("STEEL", crafted_fields("Steel", "20", &[("ORE", "3"), ("COAL", "1")]))
        .single("ORE", material_fields("Ore", "0"))
        .single("COAL", material_fields("Coal", "0"))
        .single("GEM", material_fields("Gem", "0"))
        .build();
    let raw = serde_json::Value::Array(vec![catalogue.to_document().unwrap().into()]);
    fs::write(dir.join("raw_gear.json"), raw.to_string()).unwrap();

    let mut store = DirStore::open(&dir).unwrap();
    let config = TransformConfig::default();

    run_transform(&mut store, &config).unwrap();
    let first = fs::read(dir.join("gear.json")).unwrap();
    run_transform(&mut store, &config).unwrap();
    let second = fs::read(dir.join("gear.json")).unwrap();

    assert_eq!(first, second);

    let gear: Vec<serde_json::Value> = serde_json::from_slice(&second).unwrap();
    let ids: Vec<&str> = gear.iter().map(|r| r["gear_id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["T1_BLADE", "T2_BLADE", "STEEL", "ORE", "COAL", "GEM"]);

    let _ = fs::remove_dir_all(&dir);
}
