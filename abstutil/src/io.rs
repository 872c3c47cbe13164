use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn to_json<T: Serialize>(obj: &T) -> Result<String> {
    serde_json::to_string_pretty(obj).context("serializing to JSON")
}

/// Writes pretty-printed JSON, creating parent directories as needed.
pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, obj: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs_err::create_dir_all(parent)?;
        }
    }
    fs_err::write(path, to_json(obj)?)?;
    Ok(())
}

pub fn read_json<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T> {
    let path = path.as_ref();
    let contents = fs_err::read_to_string(path)?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Settings {
        max_rounds: usize,
        label: String,
    }

    #[test]
    fn json_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            max_rounds: 10,
            label: "x".to_string(),
        };
        write_json(&path, &settings).unwrap();
        let loaded: Settings = read_json(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_json::<_, Settings>("/definitely/not/here.json").unwrap_err();
        assert!(format!("{:#}", err).contains("/definitely/not/here.json"));
    }
}
