use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use partsynth_core::Error;
use partsynth_load::{FsLoader, LoadOptions, Loader};

fn temp_data_dir(label: &str) -> Result<PathBuf> {
    let mut dir = std::env::temp_dir();
    dir.push(format!("partsynth_load_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(dir.join("formatData")).context("create temp data dir")?;
    Ok(dir)
}

fn write(dir: &Path, relative: &str, contents: &str) -> Result<()> {
    fs::write(dir.join(relative), contents).with_context(|| format!("writing {relative}"))
}

fn write_fixture(dir: &Path) -> Result<()> {
    write(
        dir,
        "class-features.json",
        r#"{
  "Filters": {
    "necessary": ["Type"],
    "Most Relevant": ["Filter Order", "Frequency - Cutoff"],
    "Description": ["Series"]
  }
}"#,
    )?;
    write(
        dir,
        "class-info.json",
        r#"{"Filters": ["Active Filters", "Anti/Aliasing Filters"]}"#,
    )?;
    write(dir, "numeric-fields.json", r#"["Frequency - Cutoff", "Power"]"#)?;
    write(
        dir,
        "dynamic-units.json",
        r#"{"mW": {"W": "0.001"}, "Hz": {"kHz": 0.001}}"#,
    )?;
    write(
        dir,
        "pair-params.txt",
        "Frequency - Cutoff/\n(Frequency Unit)\n\nPower/Power Unit\n",
    )?;
    write(
        dir,
        "class-aliases.json",
        r#"{"Filters": ["Signal Filters"]}"#,
    )?;
    write(
        dir,
        "formatData/Active_Filters.json",
        r#"[
  {"Type": "Active", "Filter Order": "2nd", "Frequency - Cutoff": "10kHz"},
  {"Type": "Passive", "Filter Order": "4th", "Frequency - Cutoff": "20kHz", "Channels": 2}
]"#,
    )?;
    write(
        dir,
        "formatData/Anti_Aliasing_Filters.json",
        r#"[{"Type": "Active"}]"#,
    )?;
    write(dir, "formatData/notes.md", "not a catalog")?;
    Ok(())
}

#[test]
fn loads_taxonomy_tables() -> Result<()> {
    let dir = temp_data_dir("taxonomy")?;
    write_fixture(&dir)?;
    let loader = FsLoader::new(LoadOptions::with_data_dir(&dir));

    let taxonomy = loader.load_taxonomy()?;
    let entry = taxonomy
        .taxonomy_of("Filters")
        .ok_or_else(|| anyhow!("missing Filters entry"))?;

    assert_eq!(entry.necessary(), &["Type".to_string()]);
    assert_eq!(entry.most_relevant, vec!["FilterOrder", "FrequencyCutoff"]);
    assert!(taxonomy.is_numeric("FrequencyCutoff"));
    assert_eq!(taxonomy.pairs.partner_of("FrequencyCutoff"), Some("FrequencyUnit"));
    assert_eq!(taxonomy.pairs.source_of("PowerUnit"), Some("Power"));
    assert_eq!(taxonomy.aliases_of("Filters"), &["Signal Filters".to_string()]);
    assert_eq!(
        taxonomy
            .units
            .alternates("Hz")
            .and_then(|alternates| alternates.get("kHz"))
            .copied(),
        Some(0.001)
    );
    assert_eq!(taxonomy.class_of("Anti Aliasing Filters")?, "Filters");
    Ok(())
}

#[test]
fn lists_and_loads_catalogs() -> Result<()> {
    let dir = temp_data_dir("catalogs")?;
    write_fixture(&dir)?;
    let loader = FsLoader::new(LoadOptions::with_data_dir(&dir));

    assert_eq!(
        loader.list_components()?,
        vec!["Active Filters", "Anti Aliasing Filters"]
    );

    let index = loader.load_catalog("Active Filters")?;
    assert_eq!(index.component, "Active Filters");
    assert_eq!(
        index.values_of("FrequencyCutoff").map(|values| values.to_vec()),
        Some(vec!["10kHz".to_string(), "20kHz".to_string()])
    );
    assert_eq!(
        index.values_of("Channels").map(|values| values.to_vec()),
        Some(vec!["2".to_string()])
    );

    let catalog = loader.load_catalog_all()?;
    assert_eq!(catalog.len(), 2);
    Ok(())
}

#[test]
fn missing_alias_table_is_optional() -> Result<()> {
    let dir = temp_data_dir("aliases")?;
    write_fixture(&dir)?;
    fs::remove_file(dir.join("class-aliases.json"))?;

    let taxonomy = FsLoader::new(LoadOptions::with_data_dir(&dir)).load_taxonomy()?;
    assert!(taxonomy.aliases_of("Filters").is_empty());
    Ok(())
}

#[test]
fn rejects_unrecognized_table_types() -> Result<()> {
    let dir = temp_data_dir("format")?;
    write_fixture(&dir)?;
    write(&dir, "pairs.yaml", "Power/Power Unit")?;

    let mut options = LoadOptions::with_data_dir(&dir);
    options.pair_params = "pairs.yaml".to_string();
    let result = FsLoader::new(options).load_taxonomy();
    assert!(matches!(result, Err(Error::InvalidInputFormat(_))));
    Ok(())
}

#[test]
fn unknown_component_catalog_fails() -> Result<()> {
    let dir = temp_data_dir("unknown")?;
    write_fixture(&dir)?;
    let loader = FsLoader::new(LoadOptions::with_data_dir(&dir));

    assert!(matches!(
        loader.load_catalog("Relays"),
        Err(Error::UnknownComponent(name)) if name == "Relays"
    ));
    Ok(())
}
