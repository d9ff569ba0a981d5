//! Workflow results
//!
//! Plain serializable structs handed to the CLI for rendering.

use serde::Serialize;

use lens_core::PaperSource;

/// Result of `understand`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnderstandResult {
    pub title: String,
    pub authors: Vec<String>,
    pub source: PaperSource,
    pub url: Option<String>,
    pub translation: String,
    pub analysis: String,
}

/// Result of a researcher evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearcherEvaluation {
    pub name: String,
    pub affiliation: String,
    pub pub_count: usize,
    /// Empty when publications were supplied manually
    pub url: String,
    pub evaluation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub simplified: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuzzwordExplanation {
    pub buzzword: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemHierarchy {
    pub hierarchy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearcherComparison {
    pub researchers: Vec<String>,
    pub comparison: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAssessment {
    pub topic: String,
    pub assessment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendComparison {
    pub criterion: String,
    pub trends: Vec<String>,
    pub comparison: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OversupplyAnalysis {
    pub research_area: String,
    pub analysis: String,
}

/// Result of `comprehensive_analysis`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComprehensiveAnalysis {
    pub translation: String,
    pub analysis: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trends: Vec<TrendAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub researcher: Option<String>,
}

/// A workflow result rendered as Markdown for the terminal
pub trait Render {
    fn render_markdown(&self) -> String;
}

fn section(heading: &str, body: &str) -> String {
    format!("## {}\n\n{}\n", heading, body.trim())
}

impl Render for UnderstandResult {
    fn render_markdown(&self) -> String {
        let mut out = String::new();
        if !self.title.is_empty() {
            out.push_str(&format!("# {}\n\n", self.title));
        }
        if !self.authors.is_empty() {
            out.push_str(&format!("**Authors:** {}\n\n", self.authors.join(", ")));
        }
        out.push_str(&format!("**Source:** {}", self.source));
        if let Some(url) = &self.url {
            out.push_str(&format!(" ({})", url));
        }
        out.push_str("\n\n");
        out.push_str(&section("Plain-Language Translation", &self.translation));
        out.push('\n');
        out.push_str(&section("Research Analysis", &self.analysis));
        out
    }
}

impl Render for ResearcherEvaluation {
    fn render_markdown(&self) -> String {
        let mut out = format!("# {}\n\n", self.name);
        if !self.affiliation.is_empty() {
            out.push_str(&format!("**Affiliation:** {}\n\n", self.affiliation));
        }
        out.push_str(&format!("**Publications analyzed:** {}\n\n", self.pub_count));
        out.push_str(&section("Researcher Evaluation", &self.evaluation));
        out
    }
}

impl Render for Translation {
    fn render_markdown(&self) -> String {
        section("Plain-Language Translation", &self.simplified)
    }
}

impl Render for BuzzwordExplanation {
    fn render_markdown(&self) -> String {
        section(&format!("Buzzword: {}", self.buzzword), &self.explanation)
    }
}

impl Render for Analysis {
    fn render_markdown(&self) -> String {
        section("Research Analysis", &self.analysis)
    }
}

impl Render for ProblemHierarchy {
    fn render_markdown(&self) -> String {
        section("Problem Hierarchy", &self.hierarchy)
    }
}

impl Render for ResearcherComparison {
    fn render_markdown(&self) -> String {
        section(
            &format!("Comparison: {}", self.researchers.join(" vs. ")),
            &self.comparison,
        )
    }
}

impl Render for TrendAssessment {
    fn render_markdown(&self) -> String {
        section(&format!("Trend: {}", self.topic), &self.assessment)
    }
}

impl Render for TrendComparison {
    fn render_markdown(&self) -> String {
        section(
            &format!("Trend Comparison ({})", self.criterion),
            &self.comparison,
        )
    }
}

impl Render for OversupplyAnalysis {
    fn render_markdown(&self) -> String {
        section(&format!("Oversupply: {}", self.research_area), &self.analysis)
    }
}

impl Render for ComprehensiveAnalysis {
    fn render_markdown(&self) -> String {
        let mut parts = vec![
            section("Plain-Language Translation", &self.translation),
            section("Research Analysis", &self.analysis),
        ];
        parts.extend(self.trends.iter().map(Render::render_markdown));
        if let Some(researcher) = &self.researcher {
            parts.push(section("Researcher Evaluation", researcher));
        }
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_understand_markdown() {
        let result = UnderstandResult {
            title: "Deep learning".to_string(),
            authors: vec!["Yann LeCun".to_string(), "Yoshua Bengio".to_string()],
            source: PaperSource::Doi,
            url: Some("https://doi.org/10.1038/nature14539".to_string()),
            translation: "Computers learn layers of features.".to_string(),
            analysis: "Scaling stage.".to_string(),
        };

        let markdown = result.render_markdown();
        assert!(markdown.starts_with("# Deep learning\n\n**Authors:** Yann LeCun, Yoshua Bengio"));
        assert!(markdown.contains("**Source:** doi (https://doi.org/10.1038/nature14539)"));
        assert!(markdown.contains("## Research Analysis\n\nScaling stage.\n"));
    }

    #[test]
    fn test_raw_text_markdown_has_no_title() {
        let result = UnderstandResult {
            title: String::new(),
            authors: Vec::new(),
            source: PaperSource::Text,
            url: None,
            translation: "t".to_string(),
            analysis: "a".to_string(),
        };
        assert!(result.render_markdown().starts_with("**Source:** text\n\n"));
    }

    #[test]
    fn test_comprehensive_json_skips_empty_parts() {
        let result = ComprehensiveAnalysis {
            translation: "t".to_string(),
            analysis: "a".to_string(),
            trends: Vec::new(),
            researcher: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"translation":"t","analysis":"a"}"#);
    }
}
