use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::pronunciation::ScoringConfig;

/// Host-side settings: where the bundled assets live.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub assets_root: PathBuf,
}

impl AppConfig {
    /// Uses `path` when given, else the nearest `assets/` directory above the executable.
    pub fn from_override(path: Option<PathBuf>) -> Result<Self> {
        let root = match path {
            Some(custom) => canonicalize_dir(&custom)?,
            None => default_assets_root()?,
        };
        Ok(Self { assets_root: root })
    }

    /// Scoring thresholds from an explicit file, or `scoring.json` under the assets root.
    pub fn scoring_config(&self, explicit: Option<&Path>) -> Result<ScoringConfig> {
        match explicit {
            Some(path) => ScoringConfig::from_path(path)
                .with_context(|| format!("failed to load scoring config {}", path.display())),
            None => ScoringConfig::load_from_assets(&self.assets_root).with_context(|| {
                format!(
                    "failed to load scoring config from {}",
                    self.assets_root.display()
                )
            }),
        }
    }
}

fn canonicalize_dir(path: &Path) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("failed to resolve assets directory at {:?}", path))?;
    if canonical.is_dir() {
        Ok(canonical)
    } else {
        Err(anyhow!("assets path {:?} is not a directory", canonical))
    }
}

fn default_assets_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("unable to resolve current executable path")?;
    exe.ancestors()
        .find_map(|dir| {
            let candidate = dir.join("assets");
            candidate.join("scoring.json").is_file().then_some(candidate)
        })
        .ok_or_else(|| anyhow!("could not locate an assets directory with scoring.json alongside the binary"))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{default_assets_root, AppConfig};

    #[test]
    fn discovers_assets_root() {
        let root = default_assets_root().expect("assets directory should exist");
        assert!(root.ends_with("assets"));
    }

    #[test]
    fn bundled_scoring_config_matches_defaults() {
        let config = AppConfig::from_override(Some(std::env::current_dir().unwrap().join("assets")))
            .unwrap();
        let scoring = config.scoring_config(None).unwrap();
        assert_eq!(scoring, Default::default());
    }

    #[test]
    fn explicit_config_file_overrides_assets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{ "feedback": { "tip_threshold": 65.0 } }"#).unwrap();
        let config = AppConfig::from_override(Some(dir.path().to_path_buf())).unwrap();
        let scoring = config.scoring_config(Some(&path)).unwrap();
        assert_eq!(scoring.feedback.tip_threshold, 65.0);
        assert_eq!(scoring.fusion, Default::default());
    }

    #[test]
    fn rejects_file_as_assets_root() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(AppConfig::from_override(Some(file.path().to_path_buf())).is_err());
    }
}
