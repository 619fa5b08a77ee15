pub mod annotation;
pub mod app;
pub mod comparison;
pub mod config;
pub mod domain;
pub mod error;
pub mod evidence;
pub mod genome_links;
pub mod hotspot;
pub mod mutation;
pub mod number;
pub mod oncogenicity;
pub mod output;
pub mod params;
pub mod reactive;
pub mod session;

pub use annotation::{AnnotationRecord, AnnotationSources, build_annotation, compute_sort_vector};
pub use comparison::ComparisonStore;
pub use error::CompareError;
pub use params::{FileParams, ParamStore, QueryParams};
pub use reactive::Remote;
