//! Researcher profiles scraped from Google Scholar

use serde::{Deserialize, Serialize};

/// One row of a Scholar publication table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationStub {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub cited_by: u32,
    /// Scholar profile pages never expose abstracts, so this is usually empty
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
}

impl PublicationStub {
    pub fn new(title: impl Into<String>, year: Option<i32>, cited_by: u32) -> Self {
        Self {
            title: title.into(),
            year,
            cited_by,
            abstract_text: String::new(),
        }
    }

    /// Year for prompts, `Unknown` when absent
    pub fn year_label(&self) -> String {
        self.year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// A researcher and their publication list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearcherProfile {
    pub name: String,
    pub affiliation: String,
    pub publications: Vec<PublicationStub>,
    pub url: String,
}

impl ResearcherProfile {
    pub fn publication_count(&self) -> usize {
        self.publications.len()
    }

    pub fn total_citations(&self) -> u64 {
        self.publications.iter().map(|p| p.cited_by as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_label() {
        assert_eq!(PublicationStub::new("A", Some(2021), 3).year_label(), "2021");
        assert_eq!(PublicationStub::new("B", None, 0).year_label(), "Unknown");
    }

    #[test]
    fn test_manual_publication_defaults() {
        let stub: PublicationStub = serde_json::from_str(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(stub.cited_by, 0);
        assert_eq!(stub.year, None);
        assert!(stub.abstract_text.is_empty());
    }

    #[test]
    fn test_total_citations() {
        let profile = ResearcherProfile {
            name: "R".to_string(),
            affiliation: String::new(),
            publications: vec![
                PublicationStub::new("a", Some(2020), 10),
                PublicationStub::new("b", None, 5),
            ],
            url: String::new(),
        };
        assert_eq!(profile.publication_count(), 2);
        assert_eq!(profile.total_citations(), 15);
    }
}
