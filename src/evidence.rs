//! Curated clinical evidence per gene and variant.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mutation::Mutation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceGene {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    /// Variant name to variant id.
    #[serde(default)]
    pub variants: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceVariant {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub gene_id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    /// Evidence type to number of evidence items.
    #[serde(default)]
    pub evidence: BTreeMap<String, u64>,
}

pub type EvidenceGeneIndex = BTreeMap<String, EvidenceGene>;
pub type EvidenceVariantIndex = BTreeMap<String, BTreeMap<String, EvidenceVariant>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceEntry {
    pub name: String,
    pub description: String,
    pub url: String,
    pub variants: BTreeMap<String, EvidenceVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "entry", rename_all = "kebab-case")]
pub enum EvidenceLookup {
    /// The indexes were not available.
    #[default]
    NotQueried,
    NotFound,
    Found(EvidenceEntry),
}

impl EvidenceLookup {
    pub fn entry(&self) -> Option<&EvidenceEntry> {
        match self {
            EvidenceLookup::Found(entry) => Some(entry),
            _ => None,
        }
    }
}

/// The variant index is consulted first; a gene without variants is not
/// looked up in the gene index at all.
pub fn evidence_entry(
    mutation: &Mutation,
    genes: &EvidenceGeneIndex,
    variants: &EvidenceVariantIndex,
) -> EvidenceLookup {
    let symbol = mutation.hugo_gene_symbol();
    let Some(gene_variants) = variants.get(symbol) else {
        return EvidenceLookup::NotFound;
    };
    let Some(gene) = genes.get(symbol) else {
        tracing::debug!(gene = symbol, "evidence variants without a gene entry");
        return EvidenceLookup::NotFound;
    };
    EvidenceLookup::Found(EvidenceEntry {
        name: gene.name.clone(),
        description: gene.description.clone(),
        url: gene.url.clone(),
        variants: gene_variants.clone(),
    })
}

pub fn sort_value(lookup: &EvidenceLookup) -> f64 {
    match lookup {
        EvidenceLookup::Found(_) => 1.0,
        _ => 0.0,
    }
}
