use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchemaforgeConfig {
    pub database: Option<String>,
    pub snapshot: Option<String>,
    pub uploads: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("schemaforge.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("schemaforge.db")
}

pub fn default_snapshot_path() -> PathBuf {
    PathBuf::from("schemaforge.json")
}

pub fn default_upload_dir() -> PathBuf {
    PathBuf::from(".schemaforge").join("uploads")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<SchemaforgeConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: SchemaforgeConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &SchemaforgeConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemaforge.toml");

        let config = SchemaforgeConfig {
            database: Some("data/out.db".to_string()),
            snapshot: None,
            uploads: Some("scratch".to_string()),
        };
        write_config(&path, &config, false).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.database.as_deref(), Some("data/out.db"));
        assert_eq!(loaded.snapshot, None);
        assert_eq!(loaded.uploads.as_deref(), Some("scratch"));
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("none.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_overwrite_requires_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemaforge.toml");

        write_config(&path, &SchemaforgeConfig::default(), false).unwrap();
        assert!(write_config(&path, &SchemaforgeConfig::default(), false).is_err());
        write_config(&path, &SchemaforgeConfig::default(), true).unwrap();
    }
}
