//! Worldlens Core — shared data model, configuration, error type, and
//! stage artifact files.

pub mod artifact;
pub mod cluster;
pub mod config;
pub mod document;
pub mod error;
pub mod extraction;
pub mod worldview;

pub use artifact::Artifact;
pub use cluster::{Cluster, ClusterMember, ClusterResult};
pub use config::{ClusterConfig, ExtractConfig, PipelineConfig, QuoteConfig, ScoreWeights, SynthConfig};
pub use document::Document;
pub use error::{Error, Result};
pub use extraction::{
    CoOccurrence, ExtractedEntity, ExtractedKeyword, ExtractedPhrase, Extraction, TfidfTerm,
};
pub use worldview::{Depth, SynthesisMethod, Worldview, WorldviewPoint};
