//! Change detection for gqldoc.
//!
//! Decides whether documentation must be regenerated by comparing the
//! loaded schema against two artifacts persisted under a temp directory by
//! the previous run:
//!
//! - `schema.hash`: SHA-256 fingerprint of the canonical SDL
//! - `schema.graphql`: the full SDL snapshot
//!
//! Both artifacts are rewritten unconditionally at the end of every run
//! (regenerated or skipped), so the next run always compares against the
//! immediately-preceding schema. A missing artifact is treated as
//! "changed".

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use sha2::{Digest, Sha256};

use gqldoc_schema::SchemaGraph;

/// Fingerprint file name under the temp directory.
pub const HASH_FILE: &str = "schema.hash";
/// Snapshot file name under the temp directory.
pub const SNAPSHOT_FILE: &str = "schema.graphql";

/// How schema changes are detected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum DiffMethod {
    /// Always regenerate.
    #[serde(rename = "FORCE")]
    Force,
    /// Regenerate when the schema fingerprint differs from the persisted one.
    #[serde(rename = "SCHEMA-HASH")]
    SchemaHash,
    /// Regenerate when the serialized schema differs from the persisted
    /// snapshot.
    #[default]
    #[serde(rename = "SCHEMA-DIFF")]
    SchemaDiff,
}

impl DiffMethod {
    /// Canonical configuration spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Force => "FORCE",
            Self::SchemaHash => "SCHEMA-HASH",
            Self::SchemaDiff => "SCHEMA-DIFF",
        }
    }
}

impl std::fmt::Display for DiffMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized diff-method spellings.
#[derive(Debug, thiserror::Error)]
#[error("Unknown diff method \"{0}\" (expected FORCE, SCHEMA-HASH or SCHEMA-DIFF)")]
pub struct UnknownDiffMethod(pub String);

impl FromStr for DiffMethod {
    type Err = UnknownDiffMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FORCE" => Ok(Self::Force),
            "SCHEMA-HASH" => Ok(Self::SchemaHash),
            "SCHEMA-DIFF" => Ok(Self::SchemaDiff),
            other => Err(UnknownDiffMethod(other.to_owned())),
        }
    }
}

/// Error raised while reading or writing diff state.
#[derive(Debug, thiserror::Error)]
#[error("Diff state error at {}: {source}", path.display())]
pub struct DiffError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// SHA-256 fingerprint of the schema's canonical SDL, hex-encoded.
#[must_use]
pub fn schema_hash(schema: &SchemaGraph) -> String {
    hex::encode(Sha256::digest(schema.to_sdl()))
}

/// Decide whether documentation must be regenerated.
pub fn should_regenerate(
    schema: &SchemaGraph,
    tmp_dir: &Path,
    method: DiffMethod,
) -> Result<bool, DiffError> {
    let changed = match method {
        DiffMethod::Force => true,
        DiffMethod::SchemaHash => {
            let hash_file = tmp_dir.join(HASH_FILE);
            match read_if_present(&hash_file)? {
                Some(previous) => previous.trim() != schema_hash(schema),
                None => true,
            }
        }
        DiffMethod::SchemaDiff => {
            let snapshot_file = tmp_dir.join(SNAPSHOT_FILE);
            match read_if_present(&snapshot_file)? {
                Some(previous) => previous != schema.to_sdl(),
                None => true,
            }
        }
    };
    tracing::debug!(?method, changed, "schema change check");
    Ok(changed)
}

/// Persist the fingerprint and snapshot for the next run, overwriting any
/// prior state.
pub fn save_schema_artifacts(schema: &SchemaGraph, tmp_dir: &Path) -> Result<(), DiffError> {
    std::fs::create_dir_all(tmp_dir).map_err(|source| DiffError {
        path: tmp_dir.to_path_buf(),
        source,
    })?;

    let hash_file = tmp_dir.join(HASH_FILE);
    std::fs::write(&hash_file, schema_hash(schema)).map_err(|source| DiffError {
        path: hash_file.clone(),
        source,
    })?;

    let snapshot_file = tmp_dir.join(SNAPSHOT_FILE);
    std::fs::write(&snapshot_file, schema.to_sdl()).map_err(|source| DiffError {
        path: snapshot_file.clone(),
        source,
    })?;

    tracing::debug!(dir = %tmp_dir.display(), "persisted schema artifacts");
    Ok(())
}

fn read_if_present(path: &Path) -> Result<Option<String>, DiffError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(DiffError {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqldoc_schema::schema_from_sdl;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_schema() -> SchemaGraph {
        schema_from_sdl("type Query { ping: String }").unwrap()
    }

    fn changed_schema() -> SchemaGraph {
        schema_from_sdl("type Query { ping: String pong: Int }").unwrap()
    }

    #[test]
    fn test_first_run_with_hash_mode_regenerates() {
        let tmp = TempDir::new().unwrap();
        let schema = sample_schema();

        assert!(should_regenerate(&schema, tmp.path(), DiffMethod::SchemaHash).unwrap());
    }

    #[test]
    fn test_unchanged_schema_with_hash_mode_skips() {
        let tmp = TempDir::new().unwrap();
        let schema = sample_schema();

        save_schema_artifacts(&schema, tmp.path()).unwrap();
        assert!(!should_regenerate(&schema, tmp.path(), DiffMethod::SchemaHash).unwrap());
    }

    #[test]
    fn test_force_regenerates_even_when_unchanged() {
        let tmp = TempDir::new().unwrap();
        let schema = sample_schema();

        save_schema_artifacts(&schema, tmp.path()).unwrap();
        assert!(should_regenerate(&schema, tmp.path(), DiffMethod::Force).unwrap());
    }

    #[test]
    fn test_changed_schema_with_hash_mode_regenerates() {
        let tmp = TempDir::new().unwrap();

        save_schema_artifacts(&sample_schema(), tmp.path()).unwrap();
        assert!(
            should_regenerate(&changed_schema(), tmp.path(), DiffMethod::SchemaHash).unwrap()
        );
    }

    #[test]
    fn test_diff_mode_compares_snapshots() {
        let tmp = TempDir::new().unwrap();

        save_schema_artifacts(&sample_schema(), tmp.path()).unwrap();
        assert!(!should_regenerate(&sample_schema(), tmp.path(), DiffMethod::SchemaDiff).unwrap());
        assert!(
            should_regenerate(&changed_schema(), tmp.path(), DiffMethod::SchemaDiff).unwrap()
        );
    }

    #[test]
    fn test_save_overwrites_previous_artifacts() {
        let tmp = TempDir::new().unwrap();

        save_schema_artifacts(&sample_schema(), tmp.path()).unwrap();
        save_schema_artifacts(&changed_schema(), tmp.path()).unwrap();

        let snapshot = std::fs::read_to_string(tmp.path().join(SNAPSHOT_FILE)).unwrap();
        assert_eq!(snapshot, changed_schema().to_sdl());
        let hash = std::fs::read_to_string(tmp.path().join(HASH_FILE)).unwrap();
        assert_eq!(hash, schema_hash(&changed_schema()));
    }

    #[test]
    fn test_save_creates_missing_tmp_dir() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("deep/nested");

        save_schema_artifacts(&sample_schema(), &nested).unwrap();
        assert!(nested.join(HASH_FILE).exists());
        assert!(nested.join(SNAPSHOT_FILE).exists());
    }

    #[test]
    fn test_diff_method_parsing() {
        assert_eq!("FORCE".parse::<DiffMethod>().unwrap(), DiffMethod::Force);
        assert_eq!(
            "SCHEMA-HASH".parse::<DiffMethod>().unwrap(),
            DiffMethod::SchemaHash
        );
        assert_eq!(
            "SCHEMA-DIFF".parse::<DiffMethod>().unwrap(),
            DiffMethod::SchemaDiff
        );
        assert!("whatever".parse::<DiffMethod>().is_err());
    }

    #[test]
    fn test_schema_hash_is_stable() {
        assert_eq!(schema_hash(&sample_schema()), schema_hash(&sample_schema()));
        assert_ne!(schema_hash(&sample_schema()), schema_hash(&changed_schema()));
    }
}
