//! Stage artifact files for resumable runs.
//!
//! Each pipeline stage can serialize its output to JSON and a later run
//! can resume from it. Files carry an explicit `artifact_type` tag so
//! loaders never have to sniff for the presence of a key.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cluster::ClusterResult;
use crate::error::{Error, Result};
use crate::extraction::Extraction;
use crate::worldview::Worldview;

/// A stage output, discriminated by the `artifact_type` tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "artifact_type", rename_all = "snake_case")]
pub enum Artifact {
    Extraction(Extraction),
    Clusters(ClusterResult),
    Worldview(Worldview),
}

impl Artifact {
    /// Write the artifact as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        debug!("Saved {} artifact to {}", self.kind(), path.display());
        Ok(())
    }

    /// Load and tag-dispatch an artifact file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Stable name of the variant, used in filenames and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "extraction",
            Self::Clusters(_) => "clusters",
            Self::Worldview(_) => "worldview",
        }
    }

    pub fn into_extraction(self) -> Result<Extraction> {
        match self {
            Self::Extraction(e) => Ok(e),
            other => Err(Error::Precondition(format!(
                "expected extraction artifact, found {}",
                other.kind()
            ))),
        }
    }

    pub fn into_clusters(self) -> Result<ClusterResult> {
        match self {
            Self::Clusters(c) => Ok(c),
            other => Err(Error::Precondition(format!(
                "expected clusters artifact, found {}",
                other.kind()
            ))),
        }
    }

    pub fn into_worldview(self) -> Result<Worldview> {
        match self {
            Self::Worldview(w) => Ok(w),
            other => Err(Error::Precondition(format!(
                "expected worldview artifact, found {}",
                other.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::TfidfTerm;

    #[test]
    fn test_roundtrip_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extraction.json");

        let mut extraction = Extraction::default();
        extraction.tfidf.push(TfidfTerm {
            term: "school".into(),
            score: 1.25,
        });
        extraction.source_transcripts.push("vid1".into());

        Artifact::Extraction(extraction).save(&path).unwrap();
        let loaded = Artifact::load(&path).unwrap().into_extraction().unwrap();
        assert_eq!(loaded.tfidf[0].term, "school");
        assert_eq!(loaded.source_transcripts, vec!["vid1".to_string()]);
    }

    #[test]
    fn test_tag_mismatch_is_precondition_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extraction.json");
        Artifact::Extraction(Extraction::default())
            .save(&path)
            .unwrap();

        let err = Artifact::load(&path).unwrap().into_clusters().unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_untagged_json_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.json");
        std::fs::write(&path, r#"{"keywords": []}"#).unwrap();
        assert!(Artifact::load(&path).is_err());
    }
}
