//! Ollama HTTP backend for model-grounded synthesis.
//!
//! Talks to a local Ollama server over its REST API. Blocking, single
//! attempt per prompt; callers degrade to the statistical path on
//! failure.

#[cfg(feature = "ollama")]
mod inner {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};
    use tracing::debug;

    use worldlens_core::{Error, Result};

    use crate::generator::TextGenerator;

    const DEFAULT_HOST: &str = "http://localhost:11434";

    #[derive(Serialize)]
    struct GenerateRequest<'a> {
        model: &'a str,
        prompt: &'a str,
        format: &'a str,
        stream: bool,
    }

    #[derive(Deserialize)]
    struct GenerateResponse {
        response: String,
    }

    pub struct OllamaGenerator {
        client: reqwest::blocking::Client,
        host: String,
        model: String,
    }

    impl OllamaGenerator {
        pub fn new(model: impl Into<String>) -> Self {
            Self::with_host(model, DEFAULT_HOST)
        }

        pub fn with_host(model: impl Into<String>, host: impl Into<String>) -> Self {
            Self {
                client: reqwest::blocking::Client::builder()
                    .timeout(Duration::from_secs(120))
                    .build()
                    .unwrap_or_default(),
                host: host.into(),
                model: model.into(),
            }
        }
    }

    impl TextGenerator for OllamaGenerator {
        fn name(&self) -> &str {
            "ollama"
        }

        fn is_available(&self) -> bool {
            // A cheap model-list request doubles as a liveness probe.
            self.client
                .get(format!("{}/api/tags", self.host))
                .timeout(Duration::from_secs(2))
                .send()
                .map(|r| r.status().is_success())
                .unwrap_or(false)
        }

        fn complete(&self, prompt: &str) -> Result<String> {
            debug!(model = %self.model, "sending generation request");
            let response = self
                .client
                .post(format!("{}/api/generate", self.host))
                .json(&GenerateRequest {
                    model: &self.model,
                    prompt,
                    format: "json",
                    stream: false,
                })
                .send()
                .map_err(|e| Error::Synthesis(format!("generation request failed: {e}")))?;

            if !response.status().is_success() {
                return Err(Error::Synthesis(format!(
                    "generation request returned {}",
                    response.status()
                )));
            }

            let body: GenerateResponse = response
                .json()
                .map_err(|e| Error::Synthesis(format!("malformed generation response: {e}")))?;
            Ok(body.response)
        }
    }
}

#[cfg(feature = "ollama")]
pub use inner::OllamaGenerator;
