use std::collections::BTreeMap;

use assert_matches::assert_matches;

use kira_group_compare::annotation::{
    AnnotationRecord, AnnotationSources, build_annotation, compute_sort_vector, evidence_query,
};
use kira_group_compare::evidence::{
    EvidenceGene, EvidenceGeneIndex, EvidenceLookup, EvidenceVariant, EvidenceVariantIndex,
};
use kira_group_compare::genome_links::{GenomeLink, GenomeLinkIndex, filter_by_alteration};
use kira_group_compare::hotspot::HotspotData;
use kira_group_compare::mutation::{Gene, Mutation};
use kira_group_compare::oncogenicity::{
    EvidenceLevel, Indicator, LookupStatus, Oncogenicity, OncogenicityIndex,
    classify_lookup_status,
};

fn braf_v600e() -> Mutation {
    Mutation {
        gene: Gene {
            hugo_gene_symbol: "BRAF".to_string(),
            entrez_gene_id: 673,
        },
        sample_id: "S1".to_string(),
        protein_change: Some("V600E".to_string()),
        mutation_type: Some("Missense_Mutation".to_string()),
        protein_pos_start: Some(600),
        protein_pos_end: Some(600),
    }
}

fn link(alteration: &str, html: &str) -> GenomeLink {
    GenomeLink {
        hugo_gene_symbol: "BRAF".to_string(),
        alteration: alteration.to_string(),
        cancer_type: "Melanoma".to_string(),
        link_html: html.to_string(),
    }
}

fn hotspots() -> HotspotData {
    let mut data = HotspotData::default();
    data.single.insert("BRAF", 600);
    data.clustered.insert("BRAF", 601);
    data
}

fn genome_index() -> GenomeLinkIndex {
    let mut index = GenomeLinkIndex::new();
    index.insert(
        "BRAF".to_string(),
        vec![
            link("V600 mutations", "<a>V600</a>"),
            link("K601E", "<a>K601E</a>"),
            link("V600E", "<a>V600E</a>"),
        ],
    );
    index
}

fn oncogenicity_index() -> OncogenicityIndex {
    let indicator = Indicator {
        gene_exist: true,
        variant_exist: true,
        oncogenic: Oncogenicity::Oncogenic,
        highest_sensitive_level: Some(EvidenceLevel::Level1),
        highest_resistance_level: Some(EvidenceLevel::LevelR2),
        ..Indicator::default()
    };
    OncogenicityIndex {
        sample_to_tumor_map: Some(BTreeMap::from([("S1".to_string(), "Melanoma".to_string())])),
        indicator_map: Some(BTreeMap::from([(
            "673_Melanoma_V600E_Missense_Mutation".to_string(),
            indicator,
        )])),
    }
}

fn evidence_indexes() -> (EvidenceGeneIndex, EvidenceVariantIndex) {
    let gene = EvidenceGene {
        id: 5,
        name: "BRAF".to_string(),
        description: "serine/threonine kinase".to_string(),
        url: "https://civicdb.org/genes/5".to_string(),
        variants: BTreeMap::from([("V600E".to_string(), 12)]),
    };
    let variant = EvidenceVariant {
        id: 12,
        name: "V600E".to_string(),
        gene_id: 5,
        description: String::new(),
        url: "https://civicdb.org/variants/12".to_string(),
        evidence: BTreeMap::from([("Predictive".to_string(), 3)]),
    };
    (
        BTreeMap::from([("BRAF".to_string(), gene)]),
        BTreeMap::from([(
            "BRAF".to_string(),
            BTreeMap::from([("V600E".to_string(), variant)]),
        )]),
    )
}

#[test]
fn lookup_status_partition() {
    let error = OncogenicityIndex {
        sample_to_tumor_map: None,
        indicator_map: None,
    };
    assert_eq!(classify_lookup_status(Some(&error)), LookupStatus::Error);

    let loading = OncogenicityIndex::default();
    assert_eq!(classify_lookup_status(Some(&loading)), LookupStatus::Loading);

    let half_null = OncogenicityIndex {
        sample_to_tumor_map: None,
        indicator_map: Some(BTreeMap::new()),
    };
    assert_eq!(classify_lookup_status(Some(&half_null)), LookupStatus::Loading);

    assert_eq!(
        classify_lookup_status(Some(&oncogenicity_index())),
        LookupStatus::Complete
    );
    assert_eq!(classify_lookup_status(None), LookupStatus::Complete);
}

#[test]
fn missing_row_yields_default_record() {
    let (genes, variants) = evidence_indexes();
    let hotspots = hotspots();
    let genome = genome_index();
    let oncogenicity = oncogenicity_index();
    let sources = AnnotationSources {
        hotspots: Some(&hotspots),
        genome_links: Some(&genome),
        oncogenicity: Some(&oncogenicity),
        evidence_genes: Some(&genes),
        evidence_variants: Some(&variants),
    };

    let record = build_annotation(None, &sources);
    assert_eq!(record, AnnotationRecord::default());
    assert_eq!(build_annotation(Some(&[]), &sources), AnnotationRecord::default());
    assert!(record.has_evidence_variants);
    assert_eq!(record.oncogenicity_status, LookupStatus::Complete);
    assert_matches!(record.evidence, EvidenceLookup::NotQueried);
}

#[test]
fn alteration_filter_matches_on_position_only() {
    let mutation = braf_v600e();
    let candidates = vec![
        link("V600 mutations", "a"),
        link("K601E", "b"),
        link("V600K", "c"),
        link("600", "d"),
        link("  V600R ", "e"),
    ];
    let matched: Vec<&str> = filter_by_alteration(&mutation, &candidates)
        .into_iter()
        .map(|candidate| candidate.link_html.as_str())
        .collect();
    assert_eq!(matched, vec!["a", "c", "e"]);
}

#[test]
fn alteration_filter_needs_a_protein_change() {
    let mut mutation = braf_v600e();
    mutation.protein_change = Some(String::new());
    assert!(filter_by_alteration(&mutation, &[link("V600E", "a")]).is_empty());
    mutation.protein_change = None;
    assert!(filter_by_alteration(&mutation, &[link("V600E", "a")]).is_empty());
}

#[test]
fn full_annotation_joins_every_source() {
    let (genes, variants) = evidence_indexes();
    let hotspots = hotspots();
    let genome = genome_index();
    let oncogenicity = oncogenicity_index();
    let sources = AnnotationSources {
        hotspots: Some(&hotspots),
        genome_links: Some(&genome),
        oncogenicity: Some(&oncogenicity),
        evidence_genes: Some(&genes),
        evidence_variants: Some(&variants),
    };
    let row = vec![braf_v600e()];

    let record = build_annotation(Some(&row), &sources);
    assert!(record.is_hotspot);
    assert!(!record.is_3d_hotspot);
    assert_eq!(record.genome_links, vec!["<a>V600</a>", "<a>V600E</a>"]);
    assert_eq!(record.oncogenicity_status, LookupStatus::Complete);
    assert_eq!(
        record.oncogenicity_indicator.as_ref().map(|indicator| indicator.oncogenic),
        Some(Oncogenicity::Oncogenic)
    );
    let entry = record.evidence.entry().unwrap();
    assert_eq!(entry.name, "BRAF");
    assert!(entry.variants.contains_key("V600E"));

    let vector = compute_sort_vector(Some(&row), &sources);
    assert_eq!(vector, vec![1.0, 5.0, 6.0, 2.0, 1.0, 2.0, 1.0, 1.0]);
    assert_eq!(vector, compute_sort_vector(Some(&row), &sources));
}

#[test]
fn absent_sources_leave_their_fields_empty() {
    let row = vec![braf_v600e()];
    let record = build_annotation(Some(&row), &AnnotationSources::default());
    assert!(!record.is_hotspot);
    assert!(record.genome_links.is_empty());
    assert_eq!(record.oncogenicity_status, LookupStatus::Complete);
    assert!(record.oncogenicity_indicator.is_none());
    assert_matches!(record.evidence, EvidenceLookup::NotQueried);

    let vector = compute_sort_vector(Some(&row), &AnnotationSources::default());
    assert_eq!(vector, vec![0.0; 8]);
}

#[test]
fn loading_oncogenicity_has_no_indicator() {
    let loading = OncogenicityIndex::default();
    let sources = AnnotationSources {
        oncogenicity: Some(&loading),
        ..AnnotationSources::default()
    };
    let record = build_annotation(Some(&[braf_v600e()]), &sources);
    assert_eq!(record.oncogenicity_status, LookupStatus::Loading);
    assert!(record.oncogenicity_indicator.is_none());
}

#[test]
fn gene_without_variants_is_not_found() {
    let (genes, _) = evidence_indexes();
    let variants = EvidenceVariantIndex::new();
    let sources = AnnotationSources {
        evidence_genes: Some(&genes),
        evidence_variants: Some(&variants),
        ..AnnotationSources::default()
    };
    let record = build_annotation(Some(&[braf_v600e()]), &sources);
    assert_matches!(record.evidence, EvidenceLookup::NotFound);

    let only_genes = AnnotationSources {
        evidence_genes: Some(&genes),
        ..AnnotationSources::default()
    };
    let record = build_annotation(Some(&[braf_v600e()]), &only_genes);
    assert_matches!(record.evidence, EvidenceLookup::NotQueried);
}

#[test]
fn three_dimensional_hotspot_ranks_below_single() {
    let hotspots = hotspots();
    let sources = AnnotationSources {
        hotspots: Some(&hotspots),
        ..AnnotationSources::default()
    };
    let mut k601e = braf_v600e();
    k601e.protein_change = Some("K601E".to_string());
    k601e.protein_pos_start = Some(601);
    k601e.protein_pos_end = Some(601);

    let record = build_annotation(Some(&[k601e.clone()]), &sources);
    assert!(!record.is_hotspot);
    assert!(record.is_3d_hotspot);
    assert_eq!(compute_sort_vector(Some(&[k601e]), &sources)[6], 0.5);
}

#[test]
fn evidence_query_uses_tumor_type() {
    let oncogenicity = oncogenicity_index();
    let sources = AnnotationSources {
        oncogenicity: Some(&oncogenicity),
        ..AnnotationSources::default()
    };
    let query = evidence_query(&[braf_v600e()], &sources).unwrap();
    assert_eq!(query.id, "673_Melanoma_V600E_Missense_Mutation");
    assert_eq!(query.tumor_type.as_deref(), Some("Melanoma"));
    assert_eq!(query.protein_start, Some(600));

    let no_tumors = OncogenicityIndex {
        sample_to_tumor_map: None,
        indicator_map: Some(BTreeMap::new()),
    };
    let sources = AnnotationSources {
        oncogenicity: Some(&no_tumors),
        ..AnnotationSources::default()
    };
    assert!(evidence_query(&[braf_v600e()], &sources).is_none());
}
