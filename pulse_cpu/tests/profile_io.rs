//! # Profile I/O Tests
//!
//! Loading the shipped profile documents, serialization round-trips, and
//! loader failure modes against files on disk.

use std::path::{Path, PathBuf};

use pulse_cpu::profile::test_support::reference_profile;
use pulse_cpu::{CpuProfile, ProfileError};

fn profiles_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../profiles/cpu")
}

#[test]
fn shipped_xeon_profile_matches_the_reference() {
    let loaded = CpuProfile::load(&profiles_dir().join("intel_xeon_6142.json")).unwrap();
    assert_eq!(loaded, reference_profile());
}

#[test]
fn shipped_profiles_all_validate() {
    let profiles = CpuProfile::load_dir(&profiles_dir()).unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].0, "amd_epyc_7452");
    assert_eq!(profiles[1].0, "intel_xeon_6142");
    for (_, profile) in &profiles {
        profile.validate().unwrap();
    }
}

/// Loading then re-serializing yields a semantically equal document.
#[test]
fn profile_round_trips_through_serialization() {
    let raw = std::fs::read_to_string(profiles_dir().join("intel_xeon_6142.json")).unwrap();
    let profile = CpuProfile::from_json_str(&raw).unwrap();

    let reserialized = serde_json::to_string_pretty(&profile).unwrap();
    let back = CpuProfile::from_json_str(&reserialized).unwrap();
    assert_eq!(back, profile);

    // Same values in the same tables, independent of formatting.
    let original: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let rewritten: serde_json::Value = serde_json::from_str(&reserialized).unwrap();
    assert_eq!(original, rewritten);
}

#[test]
fn unknown_major_version_file_is_rejected() {
    let mut doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(profiles_dir().join("intel_xeon_6142.json")).unwrap())
            .unwrap();
    doc["version"] = "3.0".into();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.json");
    std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

    assert!(matches!(
        CpuProfile::load(&path).unwrap_err(),
        ProfileError::UnsupportedVersion { version, .. } if version == "3.0"
    ));
}

#[test]
fn missing_table_key_in_file_is_rejected() {
    let mut doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(profiles_dir().join("intel_xeon_6142.json")).unwrap())
            .unwrap();
    doc["engine_specific"]["complexity"]["factors"]
        .as_object_mut()
        .unwrap()
        .remove("O(n^2)");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("incomplete.json");
    std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

    assert!(matches!(
        CpuProfile::load(&path).unwrap_err(),
        ProfileError::MissingKey { table: "complexity_factors", key } if key == "O(n^2)"
    ));
}

#[test]
fn unknown_schema_field_is_rejected() {
    let mut doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(profiles_dir().join("intel_xeon_6142.json")).unwrap())
            .unwrap();
    doc["engine_specific"]["thermal"]["secret_knob"] = 42.into();

    let err = CpuProfile::from_json_str(&serde_json::to_string(&doc).unwrap()).unwrap_err();
    assert!(matches!(err, ProfileError::Json { .. }));
}

#[test]
fn missing_file_surfaces_io_error() {
    let err = CpuProfile::load(Path::new("/nonexistent/profile.json")).unwrap_err();
    assert!(matches!(err, ProfileError::Io { .. }));
}
