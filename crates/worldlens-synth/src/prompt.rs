//! Prompt construction for the model-grounded paths.

use worldlens_core::{ClusterResult, Extraction};
use worldlens_quotes::Quote;

/// Prompt for deep synthesis: cluster summaries plus extraction
/// statistics, with an explicit instruction to prefer specific and
/// contrarian claims over platitudes.
pub fn deep_prompt(
    clusters: &ClusterResult,
    extraction: &Extraction,
    subject: &str,
    n_points: usize,
) -> String {
    let cluster_summary = clusters
        .clusters
        .iter()
        .take(10)
        .map(|c| {
            let members = c
                .members
                .iter()
                .take(5)
                .map(|m| m.term.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("- {}: {}", c.label, members)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let top_tfidf = extraction
        .tfidf
        .iter()
        .take(20)
        .map(|t| t.term.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let top_phrases = extraction
        .phrases
        .iter()
        .take(15)
        .map(|p| p.phrase.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let entity_lines: Vec<String> = extraction
        .entities
        .iter()
        .take(5)
        .map(|(label, entities)| {
            let names = entities
                .iter()
                .take(5)
                .map(|e| e.text.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{label}: {names}")
        })
        .collect();
    let entities_summary = if entity_lines.is_empty() {
        "None extracted".to_string()
    } else {
        entity_lines.join("\n")
    };

    format!(
        r#"You are analyzing transcripts from appearances of {subject} to extract their core worldview.

## Extracted Themes
{cluster_summary}

## Key Terms (by TF-IDF)
{top_tfidf}

## Frequent Phrases
{top_phrases}

## Named Entities Mentioned
{entities_summary}

---

Based on this evidence, identify the {n_points} most fundamental aspects of {subject}'s worldview.

For each point:
1. State the core belief/position concisely (1-2 sentences)
2. Provide a brief elaboration (2-3 sentences)
3. List supporting evidence from the extracted data
4. Assign a confidence score (0.0-1.0) based on how strongly the evidence supports this point

Prefer specific, contrarian claims that name people, numbers, or institutions over generic platitudes.

Format as JSON:
{{
  "worldview_points": [
    {{
      "point": "...",
      "elaboration": "...",
      "confidence": 0.0,
      "supporting_evidence": ["...", "..."]
    }}
  ]
}}"#
    )
}

/// Prompt for the quote-grounded path: claims derived directly from
/// scored quotes, each claim required to cite at least two verbatim
/// quotes from the provided set.
pub fn quote_grounded_prompt(quotes: &[Quote], subject: &str, n_points: usize) -> String {
    let quote_list = quotes
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. \"{}\" (from {})", i + 1, q.text, q.source_id))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are analyzing direct quotes from {subject} to identify their most distinctive beliefs.

## Quotes
{quote_list}

---

Identify the {n_points} most distinctive beliefs {subject} expresses in these quotes.

Rules:
1. Each belief must be supported by at least 2 verbatim quotes copied exactly from the list above
2. Prefer specific, contrarian positions over generic statements
3. Assign a confidence score (0.0-1.0) per belief

Format as JSON:
{{
  "worldview_points": [
    {{
      "point": "...",
      "elaboration": "...",
      "confidence": 0.0,
      "supporting_evidence": ["verbatim quote 1", "verbatim quote 2"]
    }}
  ]
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldlens_core::{Cluster, ClusterMember};

    fn cluster_result() -> ClusterResult {
        ClusterResult {
            clusters: vec![Cluster {
                id: 0,
                label: "school / conformity".to_string(),
                centroid_terms: vec!["school".to_string(), "conformity".to_string()],
                members: vec![
                    ClusterMember { term: "school".to_string(), distance: 0.1 },
                    ClusterMember { term: "conformity".to_string(), distance: 0.2 },
                ],
                coherence: 0.8,
            }],
            unclustered: Vec::new(),
            silhouette_score: 0.5,
            embedding_model: "hash-trigram".to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_deep_prompt_contains_evidence_sections() {
        let prompt = deep_prompt(&cluster_result(), &Extraction::default(), "Test Subject", 5);
        assert!(prompt.contains("school / conformity"));
        assert!(prompt.contains("Test Subject"));
        assert!(prompt.contains("worldview_points"));
        assert!(prompt.contains("None extracted"));
        assert!(prompt.contains("contrarian"));
    }

    #[test]
    fn test_quote_prompt_requires_two_verbatim_quotes() {
        let quotes = vec![Quote {
            text: "School teaches obedience.".to_string(),
            source_id: "ep1".to_string(),
            source_title: "Episode 1".to_string(),
            timestamp_approx: None,
            position: 0.0,
            context: None,
            score: 0.5,
            reasons: vec![],
            is_contrarian: true,
        }];
        let prompt = quote_grounded_prompt(&quotes, "Subject", 3);
        assert!(prompt.contains("at least 2 verbatim quotes"));
        assert!(prompt.contains("School teaches obedience."));
    }
}
