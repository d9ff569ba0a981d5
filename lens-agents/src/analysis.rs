//! Analysis agent prompts

/// Prompt classifying the fundamental problem, research stage and demand
pub fn analyze_prompt(content: &str, context: Option<&str>) -> String {
    let context = context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| format!("\n\nAdditional context: {}", c))
        .unwrap_or_default();

    format!(
        "Analyze the following research content.\n\n\
         ---\nCONTENT:\n{}{}\n---\n\n\
         Respond with exactly these Markdown sections:\n\n\
         ## Fundamental Problem\n\
         What is the real problem being solved, beyond the stated claims?\n\n\
         ## Research Stage\n\
         **Classification:** `Exploration` / `Scaling` / `Convergence`\n\
         **Reasoning:** evidence from the content for this stage.\n\n\
         ## Industry Demand\n\
         **Demand Level:** `High` / `Medium` / `Low` / `Speculative`\n\
         - **Evidence:** products, adoption, funding or market pull\n\
         - **Gap Analysis:** what stands between the research and deployment\n\n\
         ## Key Challenges\n\
         | Challenge | Type (Technical / Engineering) | Notes |\n\n\
         ## Bottom Line\n\
         One short paragraph: is this worth attention, and who should care?\n",
        content.trim(),
        context
    )
}

/// Prompt tracing the stated, actual and fundamental problems
pub fn hierarchy_prompt(content: &str) -> String {
    format!(
        "Identify the problem hierarchy of this research:\n\n\
         ---\n{}\n---\n\n\
         List the problems from surface level to fundamental:\n\
         1. Stated Problem: what the paper claims to solve\n\
         2. Actual Problem: what it really addresses\n\
         3. Fundamental Problem: the deepest underlying issue\n\n\
         For each level, explain how it differs from the others.\n",
        content.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_prompt_context_is_optional() {
        let without = analyze_prompt("Paper text", None);
        assert!(!without.contains("Additional context"));
        assert!(without.contains("## Research Stage"));

        let with = analyze_prompt("Paper text", Some("Cited 400 times"));
        assert!(with.contains("Paper text\n\nAdditional context: Cited 400 times"));

        let blank = analyze_prompt("Paper text", Some("   "));
        assert!(!blank.contains("Additional context"));
    }

    #[test]
    fn test_hierarchy_prompt_levels() {
        let prompt = hierarchy_prompt("Paper text");
        assert!(prompt.contains("Stated Problem"));
        assert!(prompt.contains("Fundamental Problem"));
    }
}
