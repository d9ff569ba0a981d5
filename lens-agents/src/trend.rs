//! Trend agent prompts

use lens_core::PublicationStub;

/// Criterion used by trend comparisons when none is given
pub const DEFAULT_TREND_CRITERION: &str = "obsolescence_risk";

/// Recent papers included in an oversupply prompt
pub const MAX_RECENT_PAPERS: usize = 10;

/// Prompt assessing one trend or research area
pub fn assess_prompt(topic: &str, context: Option<&str>) -> String {
    let context = context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| format!("\n\nContext: {}", c))
        .unwrap_or_default();

    format!(
        "Assess the following technical trend or research area:\n\n\
         Topic: {}{}\n\n\
         Provide:\n\
         1. Trend Status: emerging, hyped, mature, declining, or obsolete?\n\
         2. Problem Type: hard problem, engineering problem, already solved, or fake problem?\n\
         3. Obsolescence Prediction: when and why might this become obsolete?\n\
         4. Hype Assessment: the ratio of hype to substance\n\
         5. Oversupply Analysis: are too many researchers working on this?\n\
         6. Hard vs. Easy: what is fundamentally difficult and what is engineering work?\n\
         7. Recommendation: what should researchers focus on instead?\n",
        topic.trim(),
        context
    )
}

/// Prompt ranking several trends on one criterion
pub fn compare_prompt(topics: &[String], criterion: &str) -> String {
    let list = topics
        .iter()
        .map(|t| format!("- {}", t.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Compare the following technical trends on the criterion: {criterion}\n\n\
         Trends:\n{list}\n\n\
         For each trend:\n\
         1. Rate it on {criterion} (Low / Medium / High)\n\
         2. Give your reasoning\n\
         3. Cite specific evidence\n\n\
         Then rank them and give an overall comparative analysis.\n"
    )
}

/// Prompt checking a research area for oversupply
pub fn oversupply_prompt(area: &str, recent_papers: &[PublicationStub]) -> String {
    let papers = if recent_papers.is_empty() {
        String::new()
    } else {
        let list = recent_papers
            .iter()
            .take(MAX_RECENT_PAPERS)
            .map(|p| {
                format!(
                    "- {} ({})",
                    p.title,
                    p.year.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string())
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("\n\nRecent papers in this area:\n{}", list)
    };

    format!(
        "Analyze potential oversupply in the research area: {}{}\n\n\
         Assess:\n\
         1. Saturation Level: not / moderately / highly saturated\n\
         2. Originality: distinct contributions or rehashed ideas?\n\
         3. Incremental vs. Breakthrough: the ratio between them\n\
         4. Competition: how many groups chase similar contributions?\n\
         5. Opportunity: under-explored adjacent areas\n\
         6. Recommendation: enter this area or look elsewhere?\n\n\
         Signs of oversupply include many papers on nearly identical problems, \
         diminishing returns, and papers that differ mainly in datasets or hyperparameters.\n",
        area.trim(),
        papers
    )
}
