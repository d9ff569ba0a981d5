//! Orchestration pipeline
//!
//! Runs the DeepLens workflows as short sequential chains:
//! - Acquisition (resolver or Scholar scraper) comes first
//! - Empty content and empty publication lists are rejected before any
//!   agent is invoked
//! - Agent calls run one after another, never concurrently
//! - Any failure propagates unchanged; there are no partial results

use std::sync::Arc;
use tracing::{info, info_span, Instrument};

use lens_agents::{
    analysis, researcher, translation, trend, AgentKind, AgentRegistry, LensAgent,
    PersonaRegistry, ResearcherPublications, SharedBackend,
};
use lens_core::{classify, validate_input, InputKind, PaperRecord, PublicationStub};
use lens_net::Fetcher;
use lens_sources::{Acquisition, Endpoints, WebAcquisition};

use crate::{
    Analysis, BuzzwordExplanation, ComprehensiveAnalysis, OversupplyAnalysis, PipelineError,
    ProblemHierarchy, ResearcherComparison, ResearcherEvaluation, Translation, TrendAssessment,
    TrendComparison, UnderstandResult,
};

/// Short random id tagging one request's log lines
pub fn request_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}

/// The DeepLens orchestrator
pub struct Orchestrator {
    acquisition: Arc<dyn Acquisition>,
    agents: AgentRegistry,
}

impl Orchestrator {
    /// Create an orchestrator from pre-built parts
    pub fn new(acquisition: Arc<dyn Acquisition>, agents: AgentRegistry) -> Self {
        Self {
            acquisition,
            agents,
        }
    }

    /// Live HTTP acquisition plus persona-backed agents on one backend
    pub fn with_backend(
        backend: SharedBackend,
        personas: &PersonaRegistry,
        fetcher: Fetcher,
        endpoints: Endpoints,
    ) -> Result<Self, PipelineError> {
        let agents = AgentRegistry::from_personas(personas, backend)?;
        Ok(Self::new(
            Arc::new(WebAcquisition::new(fetcher, endpoints)),
            agents,
        ))
    }

    /// Look up an agent by name
    pub fn agent(&self, name: &str) -> Result<Arc<dyn LensAgent>, PipelineError> {
        Ok(self.agents.get(name)?)
    }

    async fn run(&self, kind: AgentKind, prompt: &str) -> Result<String, PipelineError> {
        let agent = self.agents.agent(kind)?;
        info!("Invoking {} agent", kind);
        Ok(agent.invoke(prompt).await?)
    }

    /// Resolve a URL or wrap raw text, rejecting empty content
    pub async fn acquire(&self, input: &str) -> Result<PaperRecord, PipelineError> {
        let record = match classify(input) {
            InputKind::Url => self.acquisition.resolve(input.trim()).await?,
            InputKind::Text => PaperRecord::from_text(input.trim()),
        };

        if !record.has_content() {
            let origin = record.url.clone().unwrap_or_else(|| "raw text".to_string());
            return Err(PipelineError::EmptyContent(origin));
        }

        info!(
            "Acquired {} chars from {}{}",
            record.content.chars().count(),
            record.source,
            if record.is_full_text() { " (full text)" } else { "" }
        );
        Ok(record)
    }

    /// Translate and analyze a paper given as a URL or raw text
    pub async fn understand(&self, input: &str) -> Result<UnderstandResult, PipelineError> {
        let span = info_span!("understand", request = %request_id());
        self.understand_inner(input).instrument(span).await
    }

    async fn understand_inner(&self, input: &str) -> Result<UnderstandResult, PipelineError> {
        let record = self.acquire(input).await?;

        let translation = self
            .run(
                AgentKind::Translation,
                &translation::translate_prompt(&record.content),
            )
            .await?;
        let analysis = self
            .run(
                AgentKind::Analysis,
                &analysis::analyze_prompt(&record.content, None),
            )
            .await?;

        Ok(UnderstandResult {
            title: record.title,
            authors: record.authors,
            source: record.source,
            url: record.url,
            translation,
            analysis,
        })
    }

    /// Scrape a Scholar profile and classify the researcher's pattern
    pub async fn evaluate_researcher_profile(
        &self,
        url: &str,
    ) -> Result<ResearcherEvaluation, PipelineError> {
        let span = info_span!("evaluate", request = %request_id());
        self.evaluate_profile_inner(url).instrument(span).await
    }

    async fn evaluate_profile_inner(&self, url: &str) -> Result<ResearcherEvaluation, PipelineError> {
        let profile = self.acquisition.fetch_profile(url).await?;
        if profile.publications.is_empty() {
            return Err(PipelineError::NoPublications { name: profile.name });
        }

        let evaluation = self
            .run(
                AgentKind::Researcher,
                &researcher::evaluate_prompt(&profile.publications, Some(&profile.name)),
            )
            .await?;

        Ok(ResearcherEvaluation {
            pub_count: profile.publication_count(),
            name: profile.name,
            affiliation: profile.affiliation,
            url: profile.url,
            evaluation,
        })
    }

    /// Classify a researcher from a manually supplied publication list
    pub async fn evaluate_researcher(
        &self,
        name: Option<&str>,
        publications: &[PublicationStub],
    ) -> Result<ResearcherEvaluation, PipelineError> {
        let display_name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown");

        if publications.is_empty() {
            return Err(PipelineError::NoPublications {
                name: display_name.to_string(),
            });
        }

        let evaluation = self
            .run(
                AgentKind::Researcher,
                &researcher::evaluate_prompt(publications, name),
            )
            .await?;

        Ok(ResearcherEvaluation {
            name: display_name.to_string(),
            affiliation: String::new(),
            pub_count: publications.len(),
            url: String::new(),
            evaluation,
        })
    }

    pub async fn translate(&self, content: &str) -> Result<Translation, PipelineError> {
        validate_input(content, 1, None)?;
        let simplified = self
            .run(AgentKind::Translation, &translation::translate_prompt(content))
            .await?;
        Ok(Translation { simplified })
    }

    pub async fn explain_buzzword(&self, term: &str) -> Result<BuzzwordExplanation, PipelineError> {
        validate_input(term, 1, None)?;
        let explanation = self
            .run(AgentKind::Translation, &translation::buzzword_prompt(term))
            .await?;
        Ok(BuzzwordExplanation {
            buzzword: term.trim().to_string(),
            explanation,
        })
    }

    pub async fn analyze(
        &self,
        content: &str,
        context: Option<&str>,
    ) -> Result<Analysis, PipelineError> {
        validate_input(content, 1, None)?;
        let analysis = self
            .run(AgentKind::Analysis, &analysis::analyze_prompt(content, context))
            .await?;
        Ok(Analysis { analysis })
    }

    /// Stated, actual and fundamental problem of a piece of research
    pub async fn problem_hierarchy(&self, content: &str) -> Result<ProblemHierarchy, PipelineError> {
        validate_input(content, 1, None)?;
        let hierarchy = self
            .run(AgentKind::Analysis, &analysis::hierarchy_prompt(content))
            .await?;
        Ok(ProblemHierarchy { hierarchy })
    }

    pub async fn compare_researchers(
        &self,
        researchers: &[ResearcherPublications],
    ) -> Result<ResearcherComparison, PipelineError> {
        if let Some(empty) = researchers.iter().find(|r| r.publications.is_empty()) {
            return Err(PipelineError::NoPublications {
                name: empty.name.clone(),
            });
        }

        let comparison = self
            .run(AgentKind::Researcher, &researcher::compare_prompt(researchers))
            .await?;
        Ok(ResearcherComparison {
            researchers: researchers.iter().map(|r| r.name.clone()).collect(),
            comparison,
        })
    }

    pub async fn assess_trend(
        &self,
        topic: &str,
        context: Option<&str>,
    ) -> Result<TrendAssessment, PipelineError> {
        validate_input(topic, 1, None)?;
        let assessment = self
            .run(AgentKind::Trend, &trend::assess_prompt(topic, context))
            .await?;
        Ok(TrendAssessment {
            topic: topic.trim().to_string(),
            assessment,
        })
    }

    /// Compare trends on `criterion`, `obsolescence_risk` when absent
    pub async fn compare_trends(
        &self,
        topics: &[String],
        criterion: Option<&str>,
    ) -> Result<TrendComparison, PipelineError> {
        if topics.iter().all(|t| t.trim().is_empty()) {
            return Err(lens_core::ValidationError::EmptyInput.into());
        }
        let criterion = criterion
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(trend::DEFAULT_TREND_CRITERION);

        let comparison = self
            .run(AgentKind::Trend, &trend::compare_prompt(topics, criterion))
            .await?;
        Ok(TrendComparison {
            criterion: criterion.to_string(),
            trends: topics.to_vec(),
            comparison,
        })
    }

    pub async fn detect_oversupply(
        &self,
        area: &str,
        recent_papers: &[PublicationStub],
    ) -> Result<OversupplyAnalysis, PipelineError> {
        validate_input(area, 1, None)?;
        let analysis = self
            .run(AgentKind::Trend, &trend::oversupply_prompt(area, recent_papers))
            .await?;
        Ok(OversupplyAnalysis {
            research_area: area.trim().to_string(),
            analysis,
        })
    }

    /// Paper translation and analysis, then each trend, then the
    /// researcher when publications are supplied
    pub async fn comprehensive_analysis(
        &self,
        content: &str,
        trend_topics: &[String],
        researcher: Option<(&str, &[PublicationStub])>,
    ) -> Result<ComprehensiveAnalysis, PipelineError> {
        let span = info_span!("comprehensive", request = %request_id());
        self.comprehensive_inner(content, trend_topics, researcher)
            .instrument(span)
            .await
    }

    async fn comprehensive_inner(
        &self,
        content: &str,
        trend_topics: &[String],
        researcher: Option<(&str, &[PublicationStub])>,
    ) -> Result<ComprehensiveAnalysis, PipelineError> {
        let paper = self.acquire(content).await?;
        let translation = self.translate(&paper.content).await?.simplified;
        let analysis = self.analyze(&paper.content, None).await?.analysis;

        let mut trends = Vec::with_capacity(trend_topics.len());
        for topic in trend_topics {
            trends.push(self.assess_trend(topic, None).await?);
        }

        let researcher = match researcher {
            Some((name, publications)) if !publications.is_empty() => Some(
                self.evaluate_researcher(Some(name), publications)
                    .await?
                    .evaluation,
            ),
            _ => None,
        };

        Ok(ComprehensiveAnalysis {
            translation,
            analysis,
            trends,
            researcher,
        })
    }
}
