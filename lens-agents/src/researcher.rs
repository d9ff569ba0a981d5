//! Researcher agent prompts
//!
//! Publication histories are rendered in the order supplied.

use serde::{Deserialize, Serialize};

use lens_core::PublicationStub;

/// Characters of each abstract included in an evaluation prompt
pub const ABSTRACT_PREVIEW_CHARS: usize = 300;

/// Publications per researcher included in a comparison
pub const COMPARE_PUBLICATIONS_PER_RESEARCHER: usize = 5;

/// One researcher in a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearcherPublications {
    pub name: String,
    #[serde(default)]
    pub publications: Vec<PublicationStub>,
}

fn abstract_preview(publication: &PublicationStub) -> String {
    let text = publication.abstract_text.trim();
    if text.is_empty() {
        return "No abstract".to_string();
    }
    let preview: String = text.chars().take(ABSTRACT_PREVIEW_CHARS).collect();
    format!("{}...", preview)
}

/// Render a publication list for an evaluation prompt
pub fn render_publications(publications: &[PublicationStub]) -> String {
    publications
        .iter()
        .map(|p| {
            format!(
                "Year {}: {}\nAbstract: {}",
                p.year_label(),
                p.title,
                abstract_preview(p)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Prompt classifying a researcher's career pattern
pub fn evaluate_prompt(publications: &[PublicationStub], name: Option<&str>) -> String {
    let name_context = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| format!(" for researcher {}", n))
        .unwrap_or_default();

    format!(
        "Analyze the following publication history{}.\n\n\
         ---\nPUBLICATIONS:\n{}\n---\n\n\
         Respond with exactly these Markdown sections:\n\n\
         ## Researcher Pattern\n\
         **Classification:** `Trend Follower` / `Deep Specialist` / `Abstraction Upleveler`\n\
         **Confidence:** `High` / `Medium` / `Low`\n\n\
         ## Evidence & Reasoning\n\
         Bullet points citing specific publications.\n\n\
         ## Topic Evolution\n\
         How topics changed over time: pivots, deepening threads, recurring themes.\n\n\
         ## Career Trajectory\n\
         Where they started, where they are heading, and what that says about strategy.\n\n\
         ## Key Strengths & Blind Spots\n",
        name_context,
        render_publications(publications)
    )
}

/// Prompt comparing several researchers on their first few publications
pub fn compare_prompt(researchers: &[ResearcherPublications]) -> String {
    let sections = researchers
        .iter()
        .map(|r| {
            let pubs = r
                .publications
                .iter()
                .take(COMPARE_PUBLICATIONS_PER_RESEARCHER)
                .map(|p| {
                    format!(
                        "- {}: {}",
                        p.year.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string()),
                        p.title
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("=== {} ===\n{}", r.name, pubs)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Compare the following researchers and their work patterns:\n\n{}\n\n\
         For each researcher:\n\
         1. Classify their pattern (Trend Follower, Deep Specialist, or Abstraction Upleveler)\n\
         2. Give the key distinguishing characteristics\n\
         3. Compare and contrast their approaches\n\n\
         Then give an overall comparative analysis.\n",
        sections
    )
}
