//! Vocabulary extraction and term matching over the merged graph.

mod matcher;
mod overview;
mod term;

pub use matcher::{
    MismatchReport, MismatchRow, anti_join, ena_vs_mixs, match_all, mixs_vs_insdc, ncbi_vs_mixs,
};
pub use overview::example_overview;
pub use term::{
    ENA_FIELD_TYPE, NCBI_ATTRIBUTE_TYPE, PropertyKind, VocabularyIndex, VocabularySource,
    VocabularyTerm,
};
