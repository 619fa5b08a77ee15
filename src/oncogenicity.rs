//! Variant-level oncogenicity indicators from an external knowledge base.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mutation::Mutation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStatus {
    Loading,
    Complete,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Oncogenicity {
    Oncogenic,
    #[serde(rename = "Likely Oncogenic")]
    LikelyOncogenic,
    #[serde(rename = "Predicted Oncogenic")]
    PredictedOncogenic,
    #[serde(rename = "Likely Neutral")]
    LikelyNeutral,
    Inconclusive,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Oncogenicity {
    pub fn score(self) -> f64 {
        match self {
            Oncogenicity::Oncogenic => 5.0,
            Oncogenicity::LikelyOncogenic => 4.0,
            Oncogenicity::PredictedOncogenic => 3.0,
            Oncogenicity::LikelyNeutral => 2.0,
            Oncogenicity::Inconclusive => 1.0,
            Oncogenicity::Unknown => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvidenceLevel {
    #[serde(rename = "LEVEL_1")]
    Level1,
    #[serde(rename = "LEVEL_2A")]
    Level2A,
    #[serde(rename = "LEVEL_2B")]
    Level2B,
    #[serde(rename = "LEVEL_3A")]
    Level3A,
    #[serde(rename = "LEVEL_3B")]
    Level3B,
    #[serde(rename = "LEVEL_4")]
    Level4,
    #[serde(rename = "LEVEL_R1")]
    LevelR1,
    #[serde(rename = "LEVEL_R2")]
    LevelR2,
    #[serde(rename = "LEVEL_R3")]
    LevelR3,
    #[serde(other)]
    Other,
}

impl EvidenceLevel {
    pub fn sensitivity_score(self) -> f64 {
        match self {
            EvidenceLevel::Level1 => 6.0,
            EvidenceLevel::Level2A => 5.0,
            EvidenceLevel::Level2B => 4.0,
            EvidenceLevel::Level3A => 3.0,
            EvidenceLevel::Level3B => 2.0,
            EvidenceLevel::Level4 => 1.0,
            _ => 0.0,
        }
    }

    pub fn resistance_score(self) -> f64 {
        match self {
            EvidenceLevel::LevelR1 => 3.0,
            EvidenceLevel::LevelR2 => 2.0,
            EvidenceLevel::LevelR3 => 1.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    #[serde(default)]
    pub gene_exist: bool,
    #[serde(default)]
    pub variant_exist: bool,
    #[serde(default)]
    pub allele_exist: bool,
    #[serde(default)]
    pub vus: bool,
    #[serde(default)]
    pub oncogenic: Oncogenicity,
    #[serde(default)]
    pub highest_sensitive_level: Option<EvidenceLevel>,
    #[serde(default)]
    pub highest_resistance_level: Option<EvidenceLevel>,
    #[serde(default)]
    pub gene_summary: Option<String>,
    #[serde(default)]
    pub variant_summary: Option<String>,
}

/// Indicator lookup tables. An explicit `null` for a map means the lookup
/// failed; a missing or empty map means it has not finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OncogenicityIndex {
    #[serde(default = "empty_tumor_map")]
    pub sample_to_tumor_map: Option<BTreeMap<String, String>>,
    #[serde(default = "empty_indicator_map")]
    pub indicator_map: Option<BTreeMap<String, Indicator>>,
}

impl Default for OncogenicityIndex {
    fn default() -> Self {
        Self {
            sample_to_tumor_map: empty_tumor_map(),
            indicator_map: empty_indicator_map(),
        }
    }
}

fn empty_tumor_map() -> Option<BTreeMap<String, String>> {
    Some(BTreeMap::new())
}

fn empty_indicator_map() -> Option<BTreeMap<String, Indicator>> {
    Some(BTreeMap::new())
}

/// Query descriptor handed to the evidence cache for a single mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceQuery {
    pub id: String,
    pub entrez_gene_id: i64,
    pub tumor_type: Option<String>,
    pub alteration: Option<String>,
    pub consequence: Option<String>,
    pub protein_start: Option<u32>,
    pub protein_end: Option<u32>,
}

/// `Error` when both maps are null, `Loading` when both are empty, otherwise
/// `Complete`. An absent dataset counts as complete.
pub fn classify_lookup_status(index: Option<&OncogenicityIndex>) -> LookupStatus {
    let Some(index) = index else {
        return LookupStatus::Complete;
    };
    if index.sample_to_tumor_map.is_none() && index.indicator_map.is_none() {
        return LookupStatus::Error;
    }
    let tumors_empty = index
        .sample_to_tumor_map
        .as_ref()
        .is_none_or(|map| map.is_empty());
    let indicators_empty = index
        .indicator_map
        .as_ref()
        .is_none_or(|map| map.is_empty());
    if tumors_empty && indicators_empty {
        LookupStatus::Loading
    } else {
        LookupStatus::Complete
    }
}

pub fn query_variant_id(
    entrez_gene_id: i64,
    tumor_type: Option<&str>,
    alteration: Option<&str>,
    mutation_type: Option<&str>,
) -> String {
    let mut id = entrez_gene_id.to_string();
    for part in [tumor_type, alteration, mutation_type].into_iter().flatten() {
        if !part.is_empty() {
            id.push('_');
            id.push_str(part);
        }
    }
    id.trim()
        .chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .collect()
}

pub fn indicator_for<'a>(mutation: &Mutation, index: &'a OncogenicityIndex) -> Option<&'a Indicator> {
    let tumors = index.sample_to_tumor_map.as_ref()?;
    let indicators = index.indicator_map.as_ref()?;
    let id = query_variant_id(
        mutation.gene.entrez_gene_id,
        tumors.get(&mutation.sample_id).map(String::as_str),
        mutation.protein_change(),
        mutation.mutation_type(),
    );
    indicators.get(&id)
}

/// Needs the sample→tumor map; the indicator map is not consulted.
pub fn evidence_query(mutation: &Mutation, index: &OncogenicityIndex) -> Option<EvidenceQuery> {
    let tumors = index.sample_to_tumor_map.as_ref()?;
    let tumor_type = tumors.get(&mutation.sample_id).cloned();
    Some(EvidenceQuery {
        id: query_variant_id(
            mutation.gene.entrez_gene_id,
            tumor_type.as_deref(),
            mutation.protein_change(),
            mutation.mutation_type(),
        ),
        entrez_gene_id: mutation.gene.entrez_gene_id,
        tumor_type,
        alteration: mutation.protein_change().map(str::to_string),
        consequence: mutation.mutation_type().map(str::to_string),
        protein_start: mutation.protein_pos_start,
        protein_end: mutation.protein_pos_end,
    })
}

/// `[annotated, oncogenic, sensitivity level, resistance level, gene known]`
pub fn sort_values(indicator: Option<&Indicator>) -> [f64; 5] {
    let Some(indicator) = indicator else {
        return [0.0; 5];
    };
    let flag = |value: bool| if value { 1.0 } else { 0.0 };
    [
        flag(indicator.variant_exist || indicator.allele_exist || indicator.vus),
        indicator.oncogenic.score(),
        indicator
            .highest_sensitive_level
            .map(EvidenceLevel::sensitivity_score)
            .unwrap_or(0.0),
        indicator
            .highest_resistance_level
            .map(EvidenceLevel::resistance_score)
            .unwrap_or(0.0),
        flag(indicator.gene_exist),
    ]
}
