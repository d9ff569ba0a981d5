//! Translation agent prompts
//!
//! Plain-language rendering of paper content and single buzzwords.

/// Prompt asking for a plain-language rendering of research content
pub fn translate_prompt(content: &str) -> String {
    format!(
        "Translate the following research content into plain language:\n\n\
         ---\n{}\n---\n\n\
         Provide:\n\
         1. A simplified explanation (2-3 paragraphs)\n\
         2. Key technical terms with plain definitions\n\
         3. The core idea in one sentence\n\
         4. Helpful analogies or examples\n",
        content.trim()
    )
}

/// Prompt asking what a single buzzword really means
pub fn buzzword_prompt(term: &str) -> String {
    format!(
        "Explain the research buzzword \"{}\" in plain language.\n\n\
         Provide:\n\
         1. What it actually means, stripped of hype\n\
         2. The underlying technical concept\n\
         3. Why it became popular\n\
         4. Whether it is genuinely new or a rebranding\n\
         5. A simple analogy\n",
        term.trim()
    )
}
