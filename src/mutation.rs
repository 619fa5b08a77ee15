use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gene {
    pub hugo_gene_symbol: String,
    pub entrez_gene_id: i64,
}

/// One mutation call as delivered by the portal API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mutation {
    pub gene: Gene,
    pub sample_id: String,
    #[serde(default)]
    pub protein_change: Option<String>,
    #[serde(default)]
    pub mutation_type: Option<String>,
    #[serde(default)]
    pub protein_pos_start: Option<u32>,
    #[serde(default)]
    pub protein_pos_end: Option<u32>,
}

impl Mutation {
    pub fn hugo_gene_symbol(&self) -> &str {
        &self.gene.hugo_gene_symbol
    }

    /// The protein change, with an empty string read as missing.
    pub fn protein_change(&self) -> Option<&str> {
        self.protein_change
            .as_deref()
            .filter(|change| !change.is_empty())
    }

    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref().filter(|kind| !kind.is_empty())
    }
}
