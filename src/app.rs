use std::fs;

use camino::Utf8Path;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::annotation::{self, AnnotationRecord, AnnotationSources};
use crate::comparison::ComparisonStore;
use crate::config::{ResolvedConfig, ResolvedDatasets};
use crate::domain::{ComparisonSession, Group, GroupOrigin, OverlapStrategy};
use crate::error::CompareError;
use crate::evidence::{EvidenceGeneIndex, EvidenceVariantIndex};
use crate::genome_links::GenomeLinkIndex;
use crate::hotspot::HotspotData;
use crate::mutation::Mutation;
use crate::oncogenicity::{EvidenceQuery, OncogenicityIndex};
use crate::params::{FileParams, ParamStore};
use crate::reactive::Remote;
use crate::session::FileSessionClient;

#[derive(Debug, Clone, Serialize)]
pub struct GroupListResult {
    pub overlap_strategy: OverlapStrategy,
    pub groups: Vec<GroupEntry>,
    pub selected: Vec<String>,
    pub order: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupEntry {
    pub name: String,
    pub origin: GroupOrigin,
    pub selected: bool,
    pub deletable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlapResult {
    pub overlap_strategy: OverlapStrategy,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResult {
    pub id: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotateResult {
    pub rows: Vec<RowAnnotation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowAnnotation {
    pub annotation: AnnotationRecord,
    pub sort_vector: Vec<f64>,
    pub evidence_query: Option<EvidenceQuery>,
}

/// Annotation datasets read from disk. Unconfigured datasets stay `None`.
#[derive(Debug, Clone, Default)]
pub struct LoadedDatasets {
    pub hotspots: Option<HotspotData>,
    pub genome_links: Option<GenomeLinkIndex>,
    pub oncogenicity: Option<OncogenicityIndex>,
    pub evidence_genes: Option<EvidenceGeneIndex>,
    pub evidence_variants: Option<EvidenceVariantIndex>,
}

impl LoadedDatasets {
    pub fn load(paths: &ResolvedDatasets) -> Result<Self, CompareError> {
        Ok(Self {
            hotspots: read_optional(paths.hotspots.as_deref())?,
            genome_links: read_optional(paths.genome_links.as_deref())?,
            oncogenicity: read_optional(paths.oncogenicity.as_deref())?,
            evidence_genes: read_optional(paths.evidence_genes.as_deref())?,
            evidence_variants: read_optional(paths.evidence_variants.as_deref())?,
        })
    }

    pub fn sources(&self) -> AnnotationSources<'_> {
        AnnotationSources {
            hotspots: self.hotspots.as_ref(),
            genome_links: self.genome_links.as_ref(),
            oncogenicity: self.oncogenicity.as_ref(),
            evidence_genes: self.evidence_genes.as_ref(),
            evidence_variants: self.evidence_variants.as_ref(),
        }
    }
}

pub struct App {
    config: ResolvedConfig,
}

impl App {
    pub fn new(config: ResolvedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Opens the parameter file and feeds the configured group list and
    /// session into a fresh store. Unconfigured inputs stay pending.
    pub fn open_store(&self) -> Result<ComparisonStore<FileParams>, CompareError> {
        let params = FileParams::open(self.config.params.clone())?;
        let mut store = ComparisonStore::new(params);
        if let Some(path) = &self.config.groups {
            let groups: Vec<Group> = read_json(path)?;
            tracing::debug!(%path, groups = groups.len(), "loaded comparison groups");
            store.set_base_groups(Remote::Complete(groups));
        }
        if let Some(path) = &self.config.session {
            let session: ComparisonSession = read_json(path)?;
            store.set_session(Remote::Complete(session));
        }
        Ok(store)
    }

    pub fn session_client(&self) -> FileSessionClient {
        FileSessionClient::new(self.config.sessions.clone())
    }

    pub fn save_session<P: ParamStore>(
        &self,
        store: &mut ComparisonStore<P>,
        session_path: &Utf8Path,
    ) -> Result<SessionResult, CompareError> {
        let session: ComparisonSession = read_json(session_path)?;
        let client = self.session_client();
        let id = store.save_session(&client, &session)?;
        Ok(SessionResult {
            path: client.session_path(&id).to_string(),
            id: id.to_string(),
        })
    }

    pub fn annotate(&self, rows_path: &Utf8Path) -> Result<AnnotateResult, CompareError> {
        let rows: Vec<Vec<Mutation>> = read_json(rows_path)?;
        let datasets = LoadedDatasets::load(&self.config.datasets)?;
        Ok(annotate_rows(&rows, &datasets.sources()))
    }
}

pub fn list_groups<P: ParamStore>(
    store: &mut ComparisonStore<P>,
) -> Result<GroupListResult, CompareError> {
    let groups = store
        .ordered_groups()
        .require("comparison groups")?
        .to_vec();
    let entries = groups
        .into_iter()
        .map(|group| GroupEntry {
            selected: store.is_group_selected(&group.name),
            deletable: store.is_group_deletable(&group),
            origin: group.origin,
            name: group.name,
        })
        .collect();
    Ok(GroupListResult {
        overlap_strategy: store.overlap_strategy(),
        groups: entries,
        selected: store.selected_group_names(),
        order: store.group_order(),
    })
}

pub fn overlap<P: ParamStore>(store: &ComparisonStore<P>) -> OverlapResult {
    OverlapResult {
        overlap_strategy: store.overlap_strategy(),
    }
}

pub fn annotate_rows(rows: &[Vec<Mutation>], sources: &AnnotationSources<'_>) -> AnnotateResult {
    let rows = rows
        .iter()
        .map(|row| RowAnnotation {
            annotation: annotation::build_annotation(Some(row.as_slice()), sources),
            sort_vector: annotation::compute_sort_vector(Some(row.as_slice()), sources),
            evidence_query: annotation::evidence_query(row, sources),
        })
        .collect();
    AnnotateResult { rows }
}

pub fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, CompareError> {
    let content = fs::read_to_string(path.as_std_path())
        .map_err(|_| CompareError::InputRead(path.to_path_buf()))?;
    serde_json::from_str(&content).map_err(|err| CompareError::InputParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn read_optional<T: DeserializeOwned>(path: Option<&Utf8Path>) -> Result<Option<T>, CompareError> {
    path.map(read_json::<T>).transpose()
}
