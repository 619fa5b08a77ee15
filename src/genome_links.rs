//! Curated per-gene alteration pages linked from the mutation table.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::mutation::Mutation;

static PROTEIN_CHANGE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][0-9]+(?:[A-Za-z]|\s)").expect("valid regex"));
static NUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenomeLink {
    pub hugo_gene_symbol: String,
    pub alteration: String,
    #[serde(default)]
    pub cancer_type: String,
    #[serde(rename = "linkHTML")]
    pub link_html: String,
}

/// Links keyed by gene symbol.
pub type GenomeLinkIndex = BTreeMap<String, Vec<GenomeLink>>;

/// Keeps the candidates whose alteration starts with a protein-change shape
/// (letter, position, then a letter or whitespace) at the same position as the
/// mutation's protein change. Residue identities are not compared.
pub fn filter_by_alteration<'a>(mutation: &Mutation, candidates: &'a [GenomeLink]) -> Vec<&'a GenomeLink> {
    let Some(mutation_pos) = mutation
        .protein_change()
        .and_then(|change| NUMERIC_RUN.find(change))
        .map(|found| found.as_str())
    else {
        return Vec::new();
    };

    candidates
        .iter()
        .filter(|candidate| {
            PROTEIN_CHANGE_SHAPE.is_match(candidate.alteration.trim())
                && NUMERIC_RUN
                    .find(&candidate.alteration)
                    .is_some_and(|found| found.as_str() == mutation_pos)
        })
        .collect()
}

pub fn genome_links(mutation: &Mutation, index: &GenomeLinkIndex) -> Vec<String> {
    index
        .get(mutation.hugo_gene_symbol())
        .map(|candidates| {
            filter_by_alteration(mutation, candidates)
                .into_iter()
                .map(|link| link.link_html.clone())
                .collect()
        })
        .unwrap_or_default()
}

pub fn sort_value(links: &[String]) -> f64 {
    links.len() as f64
}
