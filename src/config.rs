use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_THEOREM_KINDS: &[&str] = &["theorem", "lemma", "proposition", "corollary"];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DocrefConfig {
    /// Auxiliary file with `\bibcite` marker overrides
    pub aux: Option<String>,
    pub coverage: CoverageConfig,
    pub dep_graph: DepGraphConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Theorem-like kinds covered by the report, in report order
    #[serde(deserialize_with = "deserialize_kinds")]
    pub thms: Vec<String>,
    /// Sectioning kind grouping the report
    pub sectioning: String,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            thms: DEFAULT_THEOREM_KINDS.iter().map(|k| k.to_string()).collect(),
            sectioning: "chapter".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DepGraphConfig {
    pub enabled: bool,
    pub target: String,
}

impl Default for DepGraphConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target: "dep_graph.json".to_string(),
        }
    }
}

impl DepGraphConfig {
    /// Where to write the graph, or `None` when generation is disabled.
    /// An explicit output path wins over the configured target.
    pub fn output_path(&self, output: Option<PathBuf>) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }
        Some(output.unwrap_or_else(|| PathBuf::from(&self.target)))
    }
}

/// Split a `+`-separated kind list such as `theorem+lemma`
pub fn parse_kind_list(list: &str) -> Vec<String> {
    list.split('+')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn deserialize_kinds<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Kinds {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Kinds::deserialize(deserializer)? {
        Kinds::List(list) => list
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
        Kinds::Joined(joined) => parse_kind_list(&joined),
    })
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("docref.toml")
}

pub fn load_config(path: Option<&Path>) -> crate::Result<Option<DocrefConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: DocrefConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &DocrefConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind_list() {
        assert_eq!(parse_kind_list(" theorem + lemma+"), vec!["theorem", "lemma"]);
        assert!(parse_kind_list("").is_empty());
    }

    #[test]
    fn test_joined_kinds_in_toml() {
        let config: DocrefConfig = toml::from_str(
            "[coverage]\nthms = \"definition+theorem\"\nsectioning = \"section\"\n",
        )
        .unwrap();
        assert_eq!(config.coverage.thms, vec!["definition", "theorem"]);
        assert_eq!(config.coverage.sectioning, "section");
        assert!(config.dep_graph.enabled);
    }

    #[test]
    fn test_disabled_dep_graph_has_no_output() {
        let config: DocrefConfig = toml::from_str("[dep_graph]\nenabled = false\n").unwrap();
        assert!(config.dep_graph.output_path(None).is_none());
        assert!(config.dep_graph.output_path(Some(PathBuf::from("g.json"))).is_none());

        let enabled = DepGraphConfig::default();
        assert_eq!(enabled.output_path(None), Some(PathBuf::from("dep_graph.json")));
        assert_eq!(enabled.output_path(Some(PathBuf::from("g.json"))), Some(PathBuf::from("g.json")));
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("docref.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docref.toml");
        let mut config = DocrefConfig::default();
        config.aux = Some("paper.aux".to_string());

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.aux.as_deref(), Some("paper.aux"));
        assert_eq!(loaded.coverage.thms, config.coverage.thms);
    }
}
