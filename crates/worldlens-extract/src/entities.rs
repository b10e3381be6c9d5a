//! Named entity recognition backends.
//!
//! A backend advertises availability up front; callers probe once and
//! pick a backend before extraction starts rather than catching
//! failures mid-run.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use worldlens_core::{ExtractedEntity, Result};

/// A raw entity mention found in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMention {
    pub text: String,
    pub label: String,
}

/// Pluggable NER implementation.
pub trait NerBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this backend can run right now (model loaded, service up).
    fn is_available(&self) -> bool;

    fn extract(&self, text: &str) -> Result<Vec<EntityMention>>;
}

/// Regex-based NER covering PERSON, ORG, DATE and MONEY.
///
/// Deliberately conservative: misses are acceptable, false positives
/// pollute downstream grouping.
#[derive(Debug, Default)]
pub struct HeuristicNer;

static TITLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Mr|Mrs|Ms|Dr|Prof)\.\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)").unwrap()
});

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][a-z]+\s+[A-Z][a-z]+)\b").unwrap());

static ORG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:Inc\.|Corp\.|LLC|Ltd\.|Co\.)").unwrap()
});

static DATE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:st|nd|rd|th)?,?\s*\d{4}\b",
        r"\b\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\b",
        r"\b\d{4}[-/]\d{1,2}[-/]\d{1,2}\b",
        r"\bQ[1-4]\s*\d{4}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static MONEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[\d,]+(?:\.\d{2})?\s*(?:million|billion|M|B|K)?\b").unwrap());

impl NerBackend for HeuristicNer {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn extract(&self, text: &str) -> Result<Vec<EntityMention>> {
        let mut mentions = Vec::new();

        for cap in TITLE_NAME_RE.captures_iter(text) {
            if let Some(m) = cap.get(1) {
                mentions.push(EntityMention {
                    text: m.as_str().to_string(),
                    label: "PERSON".to_string(),
                });
            }
        }
        // Two consecutive capitalized words, skipping the very start of
        // the text where a sentence opener masquerades as a name.
        for m in NAME_RE.find_iter(text) {
            if m.start() > 2 {
                mentions.push(EntityMention {
                    text: m.as_str().to_string(),
                    label: "PERSON".to_string(),
                });
            }
        }
        for m in ORG_RE.find_iter(text) {
            mentions.push(EntityMention {
                text: m.as_str().to_string(),
                label: "ORG".to_string(),
            });
        }
        for re in DATE_RES.iter() {
            for m in re.find_iter(text) {
                mentions.push(EntityMention {
                    text: m.as_str().to_string(),
                    label: "DATE".to_string(),
                });
            }
        }
        for m in MONEY_RE.find_iter(text) {
            mentions.push(EntityMention {
                text: m.as_str().to_string(),
                label: "MONEY".to_string(),
            });
        }

        Ok(mentions)
    }
}

/// Placeholder for a backend that failed its availability probe.
#[derive(Debug, Default)]
pub struct UnavailableNer;

impl NerBackend for UnavailableNer {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn extract(&self, _text: &str) -> Result<Vec<EntityMention>> {
        Ok(Vec::new())
    }
}

/// Aggregate per-document mentions into the grouped entity map.
///
/// Mentions are keyed by (label, trimmed text); each group records its
/// total frequency and the set of documents it appeared in. Groups are
/// sorted by frequency descending, ties by text ascending.
pub fn aggregate_entities(
    per_doc: &[(String, Vec<EntityMention>)],
) -> BTreeMap<String, Vec<ExtractedEntity>> {
    let mut grouped: BTreeMap<(String, String), (usize, std::collections::BTreeSet<String>)> =
        BTreeMap::new();
    for (source_id, mentions) in per_doc {
        for mention in mentions {
            let text = mention.text.trim();
            if text.is_empty() {
                continue;
            }
            let entry = grouped
                .entry((mention.label.clone(), text.to_string()))
                .or_default();
            entry.0 += 1;
            entry.1.insert(source_id.clone());
        }
    }

    let mut result: BTreeMap<String, Vec<ExtractedEntity>> = BTreeMap::new();
    for ((label, text), (frequency, sources)) in grouped {
        result.entry(label.clone()).or_default().push(ExtractedEntity {
            text,
            label,
            frequency,
            sources: sources.into_iter().collect(),
        });
    }
    for entities in result.values_mut() {
        entities.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.text.cmp(&b.text)));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_is_available() {
        assert!(HeuristicNer.is_available());
        assert!(!UnavailableNer.is_available());
    }

    #[test]
    fn test_person_with_title() {
        let mentions = HeuristicNer.extract("We spoke with Dr. Jane Smith today.").unwrap();
        assert!(mentions
            .iter()
            .any(|m| m.label == "PERSON" && m.text.contains("Jane")));
    }

    #[test]
    fn test_org_suffix() {
        let mentions = HeuristicNer.extract("He founded Acme Widgets Inc. in 2001.").unwrap();
        assert!(mentions.iter().any(|m| m.label == "ORG" && m.text.contains("Acme")));
    }

    #[test]
    fn test_date_and_money() {
        let mentions = HeuristicNer
            .extract("Revenue hit $4,000 million by January 15, 2020.")
            .unwrap();
        assert!(mentions.iter().any(|m| m.label == "DATE"));
        assert!(mentions.iter().any(|m| m.label == "MONEY"));
    }

    #[test]
    fn test_aggregate_groups_and_sorts() {
        let per_doc = vec![
            (
                "a".to_string(),
                vec![
                    EntityMention { text: "John Smith".into(), label: "PERSON".into() },
                    EntityMention { text: "John Smith".into(), label: "PERSON".into() },
                    EntityMention { text: "Ada Byron".into(), label: "PERSON".into() },
                ],
            ),
            (
                "b".to_string(),
                vec![EntityMention { text: "John Smith".into(), label: "PERSON".into() }],
            ),
        ];
        let grouped = aggregate_entities(&per_doc);
        let persons = &grouped["PERSON"];
        assert_eq!(persons[0].text, "John Smith");
        assert_eq!(persons[0].frequency, 3);
        assert_eq!(persons[0].sources, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(persons[1].text, "Ada Byron");
    }

    #[test]
    fn test_unavailable_extracts_nothing() {
        let mentions = UnavailableNer.extract("Dr. Jane Smith").unwrap();
        assert!(mentions.is_empty());
    }
}
