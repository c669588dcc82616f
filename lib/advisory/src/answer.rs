//! Grouped retrieval digests for free-text prompts.

use ahash::AHashSet;

use riskwise_core::domain::RISK_ID_OFFSET;
use riskwise_core::facts::PAPER_RULE_LABEL;
use riskwise_core::index::{SearchHit, VectorIndex};

/// Digest shape for [`answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStyle {
    /// Sectioned Markdown, one `###` heading per hit group.
    Full,
    /// At most five bullets, no headings.
    Mini,
}

const MINI_LIMIT: usize = 5;

/// Search the index and render the hits as a grouped digest.
///
/// Hits are bucketed as literature (`paper_rule` label), risk records
/// (offset id range), or suggestions. Empty results render as an empty
/// string rather than an empty skeleton.
#[must_use]
pub fn answer(index: &VectorIndex, prompt: &str, k: usize, style: AnswerStyle) -> String {
    let hits = index.search(prompt, k);
    if hits.is_empty() {
        return String::new();
    }

    let mut risks: Vec<&SearchHit> = Vec::new();
    let mut suggestions: Vec<&SearchHit> = Vec::new();
    let mut literature: Vec<&SearchHit> = Vec::new();
    for hit in &hits {
        if hit.label == PAPER_RULE_LABEL {
            literature.push(hit);
        } else if hit.id >= RISK_ID_OFFSET {
            risks.push(hit);
        } else {
            suggestions.push(hit);
        }
    }

    match style {
        AnswerStyle::Mini => {
            let mut seen = AHashSet::default();
            let mut bullets = Vec::new();
            for hit in suggestions.iter().chain(&risks).chain(&literature) {
                let text = hit.text.trim();
                if text.is_empty() || !seen.insert(text.to_lowercase()) {
                    continue;
                }
                bullets.push(format!("- {text}"));
                if bullets.len() >= MINI_LIMIT {
                    break;
                }
            }
            bullets.join("\n")
        }
        AnswerStyle::Full => {
            let groups = [
                ("Benzer Risk Kayıtları", &risks),
                ("İlgili Öneriler", &suggestions),
                ("Makalelerden Kurallar", &literature),
            ];
            let sections: Vec<String> = groups
                .iter()
                .filter_map(|(title, group)| section(title, group))
                .collect();
            sections.join("\n\n")
        }
    }
}

fn section(title: &str, hits: &[&SearchHit]) -> Option<String> {
    let mut seen = AHashSet::default();
    let mut bullets = Vec::new();
    for hit in hits {
        let text = hit.text.trim();
        if text.is_empty() || !seen.insert(text.to_lowercase()) {
            continue;
        }
        bullets.push(format!("- {text}"));
    }
    if bullets.is_empty() {
        return None;
    }
    Some(format!("### {title}\n{}", bullets.join("\n")))
}
