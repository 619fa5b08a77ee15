//! Per-row annotation assembled from independent, optional lookup datasets.
//!
//! Every dataset may be absent or still loading. Each field of the
//! [`AnnotationRecord`] is computed from a single source, so a missing source
//! only leaves its own fields at their defaults.

use serde::Serialize;

use crate::evidence::{self, EvidenceGeneIndex, EvidenceLookup, EvidenceVariantIndex};
use crate::genome_links::{self, GenomeLinkIndex};
use crate::hotspot::{self, HotspotData};
use crate::mutation::Mutation;
use crate::oncogenicity::{
    self, EvidenceQuery, Indicator, LookupStatus, OncogenicityIndex, classify_lookup_status,
};

/// Borrowed lookup datasets for one table render.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationSources<'a> {
    pub hotspots: Option<&'a HotspotData>,
    pub genome_links: Option<&'a GenomeLinkIndex>,
    pub oncogenicity: Option<&'a OncogenicityIndex>,
    pub evidence_genes: Option<&'a EvidenceGeneIndex>,
    pub evidence_variants: Option<&'a EvidenceVariantIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    pub is_hotspot: bool,
    #[serde(rename = "is3dHotspot")]
    pub is_3d_hotspot: bool,
    pub genome_links: Vec<String>,
    pub oncogenicity_indicator: Option<Indicator>,
    pub oncogenicity_status: LookupStatus,
    pub evidence: EvidenceLookup,
    // TODO: reflect whether the evidence indexes hold variants for the gene.
    /// Always `true`; not yet derived from the evidence indexes.
    pub has_evidence_variants: bool,
}

impl Default for AnnotationRecord {
    fn default() -> Self {
        Self {
            is_hotspot: false,
            is_3d_hotspot: false,
            genome_links: Vec::new(),
            oncogenicity_indicator: None,
            oncogenicity_status: LookupStatus::Complete,
            evidence: EvidenceLookup::NotQueried,
            has_evidence_variants: true,
        }
    }
}

/// The first mutation of the row stands in for the whole row. A missing or
/// empty row yields [`AnnotationRecord::default`].
pub fn build_annotation(row: Option<&[Mutation]>, sources: &AnnotationSources<'_>) -> AnnotationRecord {
    let Some(mutation) = row.and_then(|row| row.first()) else {
        return AnnotationRecord::default();
    };

    let oncogenicity_status = classify_lookup_status(sources.oncogenicity);
    let oncogenicity_indicator = match (sources.oncogenicity, oncogenicity_status) {
        (Some(index), LookupStatus::Complete) => {
            oncogenicity::indicator_for(mutation, index).cloned()
        }
        _ => None,
    };

    let evidence = match (sources.evidence_genes, sources.evidence_variants) {
        (Some(genes), Some(variants)) => evidence::evidence_entry(mutation, genes, variants),
        _ => EvidenceLookup::NotQueried,
    };

    AnnotationRecord {
        is_hotspot: sources
            .hotspots
            .is_some_and(|hotspots| hotspots.is_hotspot(mutation)),
        is_3d_hotspot: sources
            .hotspots
            .is_some_and(|hotspots| hotspots.is_3d_hotspot(mutation)),
        genome_links: sources
            .genome_links
            .map(|index| genome_links::genome_links(mutation, index))
            .unwrap_or_default(),
        oncogenicity_indicator,
        oncogenicity_status,
        evidence,
        has_evidence_variants: true,
    }
}

/// Composite sort key: oncogenicity, genome links, hotspots, evidence, in
/// that order.
pub fn compute_sort_vector(row: Option<&[Mutation]>, sources: &AnnotationSources<'_>) -> Vec<f64> {
    let record = build_annotation(row, sources);
    let mut vector = Vec::with_capacity(8);
    vector.extend(oncogenicity::sort_values(record.oncogenicity_indicator.as_ref()));
    vector.push(genome_links::sort_value(&record.genome_links));
    vector.push(hotspot::sort_value(record.is_hotspot, record.is_3d_hotspot));
    vector.push(evidence::sort_value(&record.evidence));
    vector
}

/// Evidence cache query for the row's first mutation, when the oncogenicity
/// dataset carries a sample→tumor map.
pub fn evidence_query(row: &[Mutation], sources: &AnnotationSources<'_>) -> Option<EvidenceQuery> {
    let mutation = row.first()?;
    oncogenicity::evidence_query(mutation, sources.oncogenicity?)
}
