use super::types::{Database, DATABASE_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Get the default database file path (~/.config/picadito/picadito.json)
pub fn get_database_path() -> PathBuf {
    crate::config::get_config_dir().join("picadito.json")
}

/// Load the database from a JSON file
///
/// If the file doesn't exist, returns a new empty database.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_database(path: &Path) -> Result<Database> {
    if !path.exists() {
        return Ok(Database::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open database file at {}", path.display()))?;

    let db: Database = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to load database from {}", path.display()))?;

    if db.version != DATABASE_VERSION {
        anyhow::bail!("Unsupported database version: {}", db.version);
    }

    Ok(db)
}

/// Save the database to a JSON file atomically
///
/// The file is never left half-written. Creates the parent directory if it
/// doesn't exist.
pub fn save_database(path: &Path, db: &Database) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory at {}", parent.display())
            })?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, db).context("Failed to serialize database")?;

    file.commit().context("Failed to save database")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{PlayerId, PlayerRecord, Position};

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let db = load_database(&dir.path().join("missing.json")).unwrap();
        assert_eq!(db.version, 1);
        assert!(db.players.is_empty());
        assert_eq!(db.next_player_id, 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("picadito.json");

        let mut db = Database::new();
        db.players.push(PlayerRecord {
            id: PlayerId(1),
            name: "Ana".to_string(),
            position: Position::Forward,
        });
        db.next_player_id = 2;
        save_database(&path, &db).unwrap();

        let loaded = load_database(&path).unwrap();
        assert_eq!(loaded.players, db.players);
        assert_eq!(loaded.next_player_id, 2);
    }

    #[test]
    fn test_unsupported_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picadito.json");
        std::fs::write(&path, r#"{"version": 9}"#).unwrap();
        let err = load_database(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported database version"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picadito.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_database(&path).is_err());
    }
}
