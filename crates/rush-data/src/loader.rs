//! Reading restaurant data files from disk.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and the two
//! entry points hosts use: [`load_config`] for a balance file and
//! [`load_restaurant_dir`] for a directory holding a balance file and a
//! floor plan.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rush_core::config::{ConfigError, RestaurantConfig};
use serde::de::DeserializeOwned;

use crate::builder::{BuiltRestaurant, build_restaurant};
use crate::schema::FloorPlan;

/// Base name of the balance file in a restaurant directory.
pub const CONFIG_FILE: &str = "restaurant";
/// Base name of the floor plan in a restaurant directory.
pub const FLOOR_FILE: &str = "floor";

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The file parsed but its numbers would not run.
    #[error("invalid config in {file}: {source}")]
    Config {
        file: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// Fixture names share one namespace across every fixture list.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Find `{base_name}.ron`, `.toml` or `.json` in `dir`.
///
/// Returns `Ok(None)` when none exists and `ConflictingFormats` when more
/// than one does.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if !candidate.exists() {
            continue;
        }
        if let Some(existing) = found {
            return Err(DataLoadError::ConflictingFormats {
                a: existing,
                b: candidate,
            });
        }
        found = Some(candidate);
    }

    Ok(found)
}

/// Like [`find_data_file`], but a missing file is an error.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its extension.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    let parse_error = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Read and validate a balance file.
pub fn load_config(path: &Path) -> Result<RestaurantConfig, DataLoadError> {
    let config: RestaurantConfig = deserialize_file(path)?;
    config.validate().map_err(|source| DataLoadError::Config {
        file: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Read the floor plan in `dir` and the balance file if there is one.
///
/// Without a `restaurant.*` file the default balance is used.
pub fn load_restaurant_files(dir: &Path) -> Result<(RestaurantConfig, FloorPlan, PathBuf), DataLoadError> {
    let config = match find_data_file(dir, CONFIG_FILE)? {
        Some(path) => load_config(&path)?,
        None => {
            log::info!("no {CONFIG_FILE} file in {}, using default balance", dir.display());
            RestaurantConfig::default()
        }
    };
    let floor_path = require_data_file(dir, FLOOR_FILE)?;
    let plan: FloorPlan = deserialize_file(&floor_path)?;
    Ok((config, plan, floor_path))
}

/// Load a restaurant directory and build it.
pub fn load_restaurant_dir(dir: &Path) -> Result<BuiltRestaurant, DataLoadError> {
    let (config, plan, floor_path) = load_restaurant_files(dir)?;
    build_restaurant(config, &plan, &floor_path)
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rush_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("floor.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("floor.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("floor.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_rejects_unknown_and_missing_extensions() {
        assert!(matches!(
            detect_format(Path::new("floor.yaml")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            detect_format(Path::new("floor")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn find_data_file_picks_the_only_candidate() {
        let dir = make_test_dir("find_one");
        fs::write(dir.join("floor.toml"), "").unwrap();

        assert_eq!(find_data_file(&dir, "floor").unwrap(), Some(dir.join("floor.toml")));
        assert_eq!(find_data_file(&dir, "restaurant").unwrap(), None);

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("floor.ron"), "()").unwrap();
        fs::write(dir.join("floor.json"), "{}").unwrap();

        assert!(matches!(
            find_data_file(&dir, "floor"),
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");

        match require_data_file(&dir, "floor") {
            Err(DataLoadError::MissingRequired { file, .. }) => assert_eq!(file, "floor"),
            other => panic!("expected MissingRequired, got {other:?}"),
        }

        cleanup(&dir);
    }

    #[test]
    fn deserialize_file_parse_error() {
        let dir = make_test_dir("deser_parse_err");
        let path = dir.join("floor.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();

        let result: Result<FloorPlan, _> = deserialize_file(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn load_config_keeps_defaults_for_missing_fields() {
        let dir = make_test_dir("config_partial");
        let path = dir.join("restaurant.toml");
        fs::write(&path, "seed = 7\nstarting_money = 250\n\n[counter]\nqueue_capacity = 4\n").unwrap();

        let config = load_config(&path).unwrap();
        let defaults = RestaurantConfig::default();
        assert_eq!(config.seed, 7);
        assert_eq!(config.starting_money, 250);
        assert_eq!(config.counter.queue_capacity, 4);
        assert_eq!(config.counter.base_price, defaults.counter.base_price);
        assert_eq!(config.frame_seconds, defaults.frame_seconds);

        cleanup(&dir);
    }

    #[test]
    fn load_config_rejects_invalid_numbers() {
        let dir = make_test_dir("config_invalid");
        let path = dir.join("restaurant.json");
        fs::write(&path, r#"{"frame_seconds": 0.0}"#).unwrap();

        match load_config(&path) {
            Err(DataLoadError::Config { file, source }) => {
                assert_eq!(file, path);
                assert!(matches!(source, ConfigError::NonPositive { field: "frame_seconds", .. }));
            }
            other => panic!("expected Config error, got {other:?}"),
        }

        cleanup(&dir);
    }

    #[test]
    fn load_config_partial_player_section_keeps_player_defaults() {
        let dir = make_test_dir("config_player");
        let path = dir.join("restaurant.toml");
        fs::write(&path, "[player]\nbase_speed = 4.0\n\n[unlock_price]\ngrowth = 1.2\n").unwrap();

        let config = load_config(&path).unwrap();
        let defaults = RestaurantConfig::default();
        assert_eq!(config.player.base_speed, 4.0);
        assert_eq!(config.player.base_capacity, 5);
        assert_eq!(config.player.capacity_step, 3);
        assert_eq!(config.player.pause, 0.0);
        assert_eq!(config.employee, defaults.employee);
        assert_eq!(config.unlock_price.growth, 1.2);
        assert_eq!(config.unlock_price.base, 75.0);
        assert_eq!(config.unlock_price.rounding_unit, 5);

        cleanup(&dir);
    }

    #[test]
    fn load_config_rejects_nan() {
        let dir = make_test_dir("config_nan");
        let path = dir.join("restaurant.toml");
        fs::write(&path, "car_speed = nan\n").unwrap();

        match load_config(&path) {
            Err(DataLoadError::Config { source, .. }) => {
                assert!(matches!(source, ConfigError::NotFinite { field: "car_speed", .. }));
            }
            other => panic!("expected Config error, got {other:?}"),
        }

        cleanup(&dir);
    }

    #[test]
    fn restaurant_dir_without_config_uses_defaults() {
        let dir = make_test_dir("dir_no_config");
        fs::write(dir.join("floor.ron"), "(machines: [(name: \"grill\", position: (0.0, 0.0), level: 1)])").unwrap();

        let (config, plan, path) = load_restaurant_files(&dir).unwrap();
        assert_eq!(config, RestaurantConfig::default());
        assert_eq!(plan.machines.len(), 1);
        assert_eq!(path, dir.join("floor.ron"));

        cleanup(&dir);
    }

    #[test]
    fn restaurant_dir_requires_a_floor_plan() {
        let dir = make_test_dir("dir_no_floor");
        fs::write(dir.join("restaurant.ron"), "()").unwrap();

        assert!(matches!(
            load_restaurant_dir(&dir),
            Err(DataLoadError::MissingRequired { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn resolve_name_and_check_duplicate() {
        let mut map = HashMap::new();
        map.insert("grill".to_string(), 1u32);
        let file = Path::new("floor.ron");

        assert_eq!(resolve_name(&map, "grill", file, "fixture").unwrap(), &1);
        assert!(matches!(
            resolve_name(&map, "fryer", file, "fixture"),
            Err(DataLoadError::UnresolvedRef { expected_kind: "fixture", .. })
        ));
        assert!(check_duplicate(&map, "fryer", file).is_ok());
        assert!(matches!(
            check_duplicate(&map, "grill", file),
            Err(DataLoadError::DuplicateName { .. })
        ));
    }
}
