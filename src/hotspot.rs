use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::mutation::Mutation;

/// Recurrent residues per gene symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HotspotIndex(BTreeMap<String, BTreeSet<u32>>);

impl HotspotIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, gene: impl Into<String>, residue: u32) {
        self.0.entry(gene.into()).or_default().insert(residue);
    }

    /// True when any residue of the gene falls inside the mutation's protein
    /// span. A missing end position means a single-residue span.
    pub fn contains(&self, mutation: &Mutation) -> bool {
        let Some(start) = mutation.protein_pos_start else {
            return false;
        };
        let end = mutation.protein_pos_end.unwrap_or(start).max(start);
        self.0
            .get(mutation.hugo_gene_symbol())
            .map(|residues| residues.range(start..=end).next().is_some())
            .unwrap_or(false)
    }
}

/// Single-residue hotspots and spatially clustered (3D) hotspots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotspotData {
    #[serde(default)]
    pub single: HotspotIndex,
    #[serde(default)]
    pub clustered: HotspotIndex,
}

impl HotspotData {
    pub fn is_hotspot(&self, mutation: &Mutation) -> bool {
        self.single.contains(mutation)
    }

    pub fn is_3d_hotspot(&self, mutation: &Mutation) -> bool {
        self.clustered.contains(mutation)
    }
}

pub fn sort_value(is_hotspot: bool, is_3d_hotspot: bool) -> f64 {
    let mut score = 0.0;
    if is_hotspot {
        score += 1.0;
    }
    if is_3d_hotspot {
        score += 0.5;
    }
    score
}
