//! Stage-by-stage pipeline execution.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use worldlens_cluster::cluster_terms;
use worldlens_core::{
    Artifact, ClusterResult, Depth, Document, Extraction, PipelineConfig, Result, Worldview,
};
use worldlens_extract::{extract_all, HeuristicNer, NerBackend};
use worldlens_infer::{CachingEmbedder, EmbedderBackend, HashEmbedder};
use worldlens_quotes::{extract_quotes_all, group_themes, QuoteCollection, QuoteTheme};
use worldlens_synth::{
    synthesize, synthesize_from_quotes, QuoteGroundedOutcome, SynthesisOutcome, TextGenerator,
    UnavailableGenerator,
};

/// Artifact filenames within an output directory.
const EXTRACTION_FILE: &str = "extraction.json";
const CLUSTERS_FILE: &str = "clusters.json";
const WORLDVIEW_FILE: &str = "worldview.json";

/// Output of one full pipeline run.
pub struct PipelineRun {
    pub extraction: Extraction,
    pub clusters: ClusterResult,
    pub outcome: SynthesisOutcome,
}

impl PipelineRun {
    pub fn worldview(&self) -> &Worldview {
        &self.outcome.worldview
    }
}

/// Executes the pipeline stages over one corpus.
///
/// Stages run sequentially; each consumes the previous stage's output
/// and nothing else. All tunables come from the [`PipelineConfig`]
/// captured at construction.
pub struct Pipeline {
    config: PipelineConfig,
    embedder: Arc<dyn EmbedderBackend>,
    ner: Box<dyn NerBackend>,
    generator: Box<dyn TextGenerator>,
}

impl Pipeline {
    /// Pipeline with the default local backends: heuristic NER, a
    /// cached hashing embedder, no generative backend.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            embedder: Arc::new(CachingEmbedder::new(HashEmbedder::default())),
            ner: Box::new(HeuristicNer),
            generator: Box::new(UnavailableGenerator),
        }
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn EmbedderBackend>) -> Self {
        self.embedder = embedder;
        self
    }

    pub fn with_ner(mut self, ner: Box<dyn NerBackend>) -> Self {
        self.ner = ner;
        self
    }

    pub fn with_generator(mut self, generator: Box<dyn TextGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Score quotable sentences across the corpus.
    pub fn run_quotes(&self, documents: &[Document]) -> QuoteCollection {
        extract_quotes_all(documents, &self.config.quotes)
    }

    /// Group top quotes under their most frequent content words.
    pub fn run_themes(&self, documents: &[Document], max_themes: usize) -> Vec<QuoteTheme> {
        let collection = self.run_quotes(documents);
        group_themes(&collection, max_themes)
    }

    /// Run all extractors over the corpus.
    pub fn run_extraction(&self, documents: &[Document]) -> Result<Extraction> {
        extract_all(documents, &self.config.extract, self.ner.as_ref())
    }

    /// Cluster the terms of an extraction.
    pub fn run_clustering(&self, extraction: &Extraction) -> Result<ClusterResult> {
        cluster_terms(extraction, &self.config.cluster, Arc::clone(&self.embedder))
    }

    /// Synthesize a worldview at the given depth.
    pub fn run_synthesis(
        &self,
        clusters: &ClusterResult,
        extraction: Option<&Extraction>,
        subject: &str,
        depth: Depth,
    ) -> Result<SynthesisOutcome> {
        synthesize(
            clusters,
            extraction,
            subject,
            depth,
            &self.config.synth,
            self.generator.as_ref(),
        )
    }

    /// Quote-grounded alternate path: score quotes, then synthesize
    /// beliefs directly from them, bypassing extraction and clustering.
    pub fn run_quote_grounded(
        &self,
        documents: &[Document],
        subject: &str,
    ) -> QuoteGroundedOutcome {
        let collection = self.run_quotes(documents);
        synthesize_from_quotes(
            &collection,
            subject,
            self.config.synth.n_points,
            self.generator.as_ref(),
        )
    }

    /// Run the full pipeline: extraction, clustering, synthesis.
    ///
    /// When `output_dir` is given, each stage's artifact is persisted
    /// there as tagged JSON so a later run can resume from it.
    pub fn run(
        &self,
        documents: &[Document],
        subject: &str,
        depth: Depth,
        output_dir: Option<&Path>,
    ) -> Result<PipelineRun> {
        info!(documents = documents.len(), subject, %depth, "starting pipeline run");

        let extraction = self.run_extraction(documents)?;
        if let Some(dir) = output_dir {
            Artifact::Extraction(extraction.clone()).save(&dir.join(EXTRACTION_FILE))?;
        }

        let clusters = self.run_clustering(&extraction)?;
        if let Some(dir) = output_dir {
            Artifact::Clusters(clusters.clone()).save(&dir.join(CLUSTERS_FILE))?;
        }

        let outcome = self.run_synthesis(&clusters, Some(&extraction), subject, depth)?;
        if let Some(dir) = output_dir {
            Artifact::Worldview(outcome.worldview.clone()).save(&dir.join(WORLDVIEW_FILE))?;
        }

        info!(
            points = outcome.worldview.points.len(),
            method = %outcome.worldview.method,
            degraded = outcome.degraded(),
            "pipeline run complete"
        );

        Ok(PipelineRun {
            extraction,
            clusters,
            outcome,
        })
    }

    /// Resume clustering and synthesis from a saved extraction artifact.
    pub fn resume_from_extraction(
        &self,
        extraction_path: &Path,
        subject: &str,
        depth: Depth,
    ) -> Result<PipelineRun> {
        let extraction = Artifact::load(extraction_path)?.into_extraction()?;
        let clusters = self.run_clustering(&extraction)?;
        let outcome = self.run_synthesis(&clusters, Some(&extraction), subject, depth)?;
        Ok(PipelineRun {
            extraction,
            clusters,
            outcome,
        })
    }
}
