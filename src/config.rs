use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::CompareError;

pub const CONFIG_FILE: &str = "kira-gc.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub params: Option<String>,
    #[serde(default)]
    pub sessions: Option<String>,
    #[serde(default)]
    pub groups: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub datasets: DatasetPaths,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatasetPaths {
    #[serde(default)]
    pub hotspots: Option<String>,
    #[serde(default)]
    pub genome_links: Option<String>,
    #[serde(default)]
    pub oncogenicity: Option<String>,
    #[serde(default)]
    pub evidence_genes: Option<String>,
    #[serde(default)]
    pub evidence_variants: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDatasets {
    pub hotspots: Option<Utf8PathBuf>,
    pub genome_links: Option<Utf8PathBuf>,
    pub oncogenicity: Option<Utf8PathBuf>,
    pub evidence_genes: Option<Utf8PathBuf>,
    pub evidence_variants: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub params: Utf8PathBuf,
    pub sessions: Utf8PathBuf,
    pub groups: Option<Utf8PathBuf>,
    pub session: Option<Utf8PathBuf>,
    pub datasets: ResolvedDatasets,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            schema_version: 1,
            params: default_params_path(),
            sessions: default_sessions_dir(),
            groups: None,
            session: None,
            datasets: ResolvedDatasets::default(),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, CompareError> {
        let config_path = match path {
            Some(path) => Utf8PathBuf::from(path),
            None => Utf8PathBuf::from(CONFIG_FILE),
        };

        if path.is_none() && !config_path.as_std_path().exists() {
            return Err(CompareError::MissingConfig);
        }

        let content = fs::read_to_string(config_path.as_std_path())
            .map_err(|_| CompareError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| CompareError::ConfigParse(err.to_string()))?;

        let base = config_path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or(Utf8Path::new("."));
        Ok(Self::resolve_config(config, base))
    }

    /// Relative paths are taken relative to `base`.
    pub fn resolve_config(config: Config, base: &Utf8Path) -> ResolvedConfig {
        let resolve = |value: Option<String>| value.map(|value| join_relative(base, &value));
        ResolvedConfig {
            schema_version: config.schema_version.unwrap_or(1),
            params: resolve(config.params).unwrap_or_else(|| base.join(default_params_path())),
            sessions: resolve(config.sessions)
                .unwrap_or_else(|| base.join(default_sessions_dir())),
            groups: resolve(config.groups),
            session: resolve(config.session),
            datasets: ResolvedDatasets {
                hotspots: resolve(config.datasets.hotspots),
                genome_links: resolve(config.datasets.genome_links),
                oncogenicity: resolve(config.datasets.oncogenicity),
                evidence_genes: resolve(config.datasets.evidence_genes),
                evidence_variants: resolve(config.datasets.evidence_variants),
            },
        }
    }
}

pub fn default_params_path() -> Utf8PathBuf {
    Utf8PathBuf::from(".kira-gc").join("params.json")
}

pub fn default_sessions_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(".kira-gc").join("sessions")
}

fn join_relative(base: &Utf8Path, value: &str) -> Utf8PathBuf {
    let path = Utf8Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
