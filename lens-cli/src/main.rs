//! DeepLens CLI
//!
//! Plain-language translation, critical analysis and researcher evaluation
//! for papers and Google Scholar profiles.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lens_agents::{
    create_backend, GenerateOptions, PersonaRegistry, Provider, ProviderConfig,
    ResearcherPublications,
};
use lens_core::PublicationStub;
use lens_net::Fetcher;
use lens_runtime::{ErrorKind, Orchestrator, PipelineError, Render, UnderstandResult};
use lens_sources::Endpoints;

#[derive(Parser)]
#[command(name = "deeplens")]
#[command(author, version, about = "DeepLens: see through research papers and careers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1", global = true)]
    verbose: u8,

    /// LLM provider: openai, azure-openai, anthropic, gemini, cohere
    #[arg(long, env = "DEEPLENS_PROVIDER", default_value = "openai", global = true)]
    provider: String,

    /// Model name (the deployment name for Azure)
    #[arg(long, env = "DEEPLENS_MODEL", default_value = "gpt-4o-mini", global = true)]
    model: String,

    /// Sampling temperature
    #[arg(long, default_value = "0.7", global = true)]
    temperature: f32,

    /// Maximum tokens per completion
    #[arg(long, default_value = "4096", global = true)]
    max_tokens: u32,

    /// Directory of persona TOML files overriding the built-in ones
    #[arg(long, global = true)]
    personas: Option<PathBuf>,

    /// Print results as JSON instead of Markdown
    #[arg(long, global = true)]
    json: bool,

    /// Also write the result to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate and analyze a paper (URL or raw text)
    Understand {
        /// Paper URL (arXiv, Semantic Scholar, DOI, any page) or pasted text
        #[arg(required_unless_present = "file")]
        input: Option<String>,

        /// Read the paper text from a file
        #[arg(short, long, conflicts_with = "input")]
        file: Option<PathBuf>,
    },

    /// Classify a researcher from a Google Scholar profile
    Evaluate {
        /// Google Scholar citations profile URL
        #[arg(required_unless_present = "publications")]
        url: Option<String>,

        /// JSON file with a publication list, instead of scraping
        #[arg(long, conflicts_with = "url")]
        publications: Option<PathBuf>,

        /// Researcher name for a manual publication list
        #[arg(long, requires = "publications")]
        name: Option<String>,
    },

    /// Compare researchers from a JSON file of {name, publications} entries
    CompareResearchers { file: PathBuf },

    /// Rewrite text in plain language
    Translate {
        text: String,

        /// Explain the text as a buzzword instead
        #[arg(long)]
        buzzword: bool,
    },

    /// Critically analyze research text
    Analyze {
        text: String,

        /// Stated, actual and fundamental problem instead
        #[arg(long)]
        hierarchy: bool,

        /// Extra context for the analysis
        #[arg(long, conflicts_with = "hierarchy")]
        context: Option<String>,
    },

    /// Assess a research trend
    Trend {
        topic: String,

        /// Look for oversupply in the area instead
        #[arg(long)]
        oversupply: bool,

        /// JSON file of recent papers for the oversupply check
        #[arg(long, requires = "oversupply")]
        papers: Option<PathBuf>,

        /// Extra context for the assessment
        #[arg(long, conflicts_with = "oversupply")]
        context: Option<String>,
    },

    /// Compare several trends on one criterion
    CompareTrends {
        #[arg(required = true, num_args = 1..)]
        topics: Vec<String>,

        /// Comparison criterion (default: obsolescence_risk)
        #[arg(long)]
        criterion: Option<String>,
    },

    /// Paper analysis plus trend and researcher assessments
    Comprehensive {
        /// Paper URL or pasted text
        input: String,

        /// Trend topic to assess (repeatable)
        #[arg(long = "trend")]
        trends: Vec<String>,

        /// JSON file with the author's publication list
        #[arg(long)]
        publications: Option<PathBuf>,

        /// Author name for the publication list
        #[arg(long, requires = "publications")]
        name: Option<String>,
    },

    /// Understand every line of a file
    Batch {
        file: PathBuf,

        /// Requests in flight at once
        #[arg(long, default_value = "2")]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let orchestrator = build_orchestrator(&cli)?;
    let out = Output {
        json: cli.json,
        path: cli.output.clone(),
    };

    match cli.command {
        Commands::Understand { input, file } => {
            let input = match (input, file) {
                (_, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("Cannot read {}", path.display()))?,
                (Some(input), None) => input,
                (None, None) => anyhow::bail!("Provide a paper URL, text or --file"),
            };
            let result = orchestrator.understand(&input).await.map_err(describe)?;
            out.emit(&result)?;
        }
        Commands::Evaluate {
            url,
            publications,
            name,
        } => {
            let result = match (url, publications) {
                (_, Some(path)) => {
                    let pubs = read_json::<Vec<PublicationStub>>(&path)?;
                    orchestrator.evaluate_researcher(name.as_deref(), &pubs).await
                }
                (Some(url), None) => orchestrator.evaluate_researcher_profile(&url).await,
                (None, None) => anyhow::bail!("Provide a Scholar profile URL or --publications"),
            }
            .map_err(describe)?;
            out.emit(&result)?;
        }
        Commands::CompareResearchers { file } => {
            let researchers = read_json::<Vec<ResearcherPublications>>(&file)?;
            let result = orchestrator
                .compare_researchers(&researchers)
                .await
                .map_err(describe)?;
            out.emit(&result)?;
        }
        Commands::Translate { text, buzzword } => {
            if buzzword {
                out.emit(&orchestrator.explain_buzzword(&text).await.map_err(describe)?)?;
            } else {
                out.emit(&orchestrator.translate(&text).await.map_err(describe)?)?;
            }
        }
        Commands::Analyze {
            text,
            hierarchy,
            context,
        } => {
            if hierarchy {
                out.emit(&orchestrator.problem_hierarchy(&text).await.map_err(describe)?)?;
            } else {
                let result = orchestrator
                    .analyze(&text, context.as_deref())
                    .await
                    .map_err(describe)?;
                out.emit(&result)?;
            }
        }
        Commands::Trend {
            topic,
            oversupply,
            papers,
            context,
        } => {
            if oversupply {
                let papers = match papers {
                    Some(path) => read_json::<Vec<PublicationStub>>(&path)?,
                    None => Vec::new(),
                };
                let result = orchestrator
                    .detect_oversupply(&topic, &papers)
                    .await
                    .map_err(describe)?;
                out.emit(&result)?;
            } else {
                let result = orchestrator
                    .assess_trend(&topic, context.as_deref())
                    .await
                    .map_err(describe)?;
                out.emit(&result)?;
            }
        }
        Commands::CompareTrends { topics, criterion } => {
            let result = orchestrator
                .compare_trends(&topics, criterion.as_deref())
                .await
                .map_err(describe)?;
            out.emit(&result)?;
        }
        Commands::Comprehensive {
            input,
            trends,
            publications,
            name,
        } => {
            let pubs = match &publications {
                Some(path) => read_json::<Vec<PublicationStub>>(path)?,
                None => Vec::new(),
            };
            let researcher = publications
                .as_ref()
                .map(|_| (name.as_deref().unwrap_or("Unknown"), pubs.as_slice()));
            let result = orchestrator
                .comprehensive_analysis(&input, &trends, researcher)
                .await
                .map_err(describe)?;
            out.emit(&result)?;
        }
        Commands::Batch { file, concurrency } => {
            run_batch(&orchestrator, &file, concurrency, &out).await?;
        }
    }

    Ok(())
}

fn build_orchestrator(cli: &Cli) -> Result<Orchestrator> {
    let provider: Provider = cli.provider.parse()?;
    let config = ProviderConfig::from_env(provider, &cli.model)?;
    let backend = create_backend(
        &config,
        GenerateOptions {
            temperature: cli.temperature,
            max_tokens: cli.max_tokens,
        },
    );
    info!("Provider: {} | Model: {}", config.provider(), config.model());

    let personas = match &cli.personas {
        Some(dir) => PersonaRegistry::embedded_with_overrides(dir)?,
        None => PersonaRegistry::load_embedded()?,
    };

    Ok(Orchestrator::with_backend(
        backend,
        &personas,
        Fetcher::with_defaults()?,
        Endpoints::default(),
    )?)
}

/// One-line failure description carrying the error class
fn describe(err: PipelineError) -> anyhow::Error {
    let mut message = format!("[{}] {}", err.kind(), err);
    if err.kind() == ErrorKind::Blocked {
        message.push_str("\nTip: deeplens evaluate --publications <file.json> --name <name>");
    }
    anyhow::anyhow!(message)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Where and how results are printed
struct Output {
    json: bool,
    path: Option<PathBuf>,
}

impl Output {
    fn emit<T: Serialize + Render>(&self, result: &T) -> Result<()> {
        let text = if self.json {
            serde_json::to_string_pretty(result)?
        } else {
            result.render_markdown()
        };
        self.write(&text, self.path.as_deref())
    }

    fn write(&self, text: &str, path: Option<&Path>) -> Result<()> {
        println!("{}", text);
        if let Some(path) = path {
            fs::write(path, text).with_context(|| format!("Cannot write {}", path.display()))?;
            eprintln!("📄 Saved to: {}", path.display());
        }
        Ok(())
    }
}

/// Non-empty, trimmed lines of a batch file
fn batch_inputs(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

async fn run_batch(
    orchestrator: &Orchestrator,
    file: &Path,
    concurrency: usize,
    out: &Output,
) -> Result<()> {
    let content =
        fs::read_to_string(file).with_context(|| format!("Cannot read {}", file.display()))?;
    let inputs = batch_inputs(&content);
    info!("Batch of {} inputs, {} at a time", inputs.len(), concurrency.max(1));

    let results: Vec<(String, Result<UnderstandResult, PipelineError>)> = stream::iter(inputs)
        .map(|input| async move {
            let result = orchestrator.understand(&input).await;
            (input, result)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();

    let text = if out.json {
        let entries: Vec<serde_json::Value> = results
            .iter()
            .map(|(input, result)| match result {
                Ok(ok) => serde_json::json!({ "input": input, "result": ok }),
                Err(e) => serde_json::json!({
                    "input": input,
                    "error": e.to_string(),
                    "kind": e.kind().as_str(),
                }),
            })
            .collect();
        serde_json::to_string_pretty(&entries)?
    } else {
        results
            .iter()
            .map(|(input, result)| match result {
                Ok(ok) => ok.render_markdown(),
                Err(e) => format!("## {}\n\n❌ [{}] {}\n", input, e.kind(), e),
            })
            .collect::<Vec<_>>()
            .join("\n---\n\n")
    };

    let path = out.path.clone().unwrap_or_else(|| {
        let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
        let ext = if out.json { "json" } else { "md" };
        PathBuf::from(format!("deeplens_batch_{}.{}", timestamp, ext))
    });
    out.write(&text, Some(&path))?;

    eprintln!(
        "✅ {} succeeded, {} failed",
        results.len() - failed,
        failed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "deeplens",
            "compare-trends",
            "RAG",
            "Long context",
            "--criterion",
            "hype_level",
            "--json",
            "--provider",
            "anthropic",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.provider, "anthropic");
        match cli.command {
            Commands::CompareTrends { topics, criterion } => {
                assert_eq!(topics, vec!["RAG", "Long context"]);
                assert_eq!(criterion.as_deref(), Some("hype_level"));
            }
            _ => panic!("expected compare-trends"),
        }
    }

    #[test]
    fn test_evaluate_needs_url_or_publications() {
        assert!(Cli::try_parse_from(["deeplens", "evaluate"]).is_err());
        assert!(Cli::try_parse_from([
            "deeplens",
            "evaluate",
            "--publications",
            "pubs.json",
            "--name",
            "Ada"
        ])
        .is_ok());
    }

    #[test]
    fn test_batch_inputs_skip_blank_lines() {
        let inputs = batch_inputs("https://arxiv.org/abs/1706.03762\n\n   \n  some text  \n");
        assert_eq!(inputs, vec!["https://arxiv.org/abs/1706.03762", "some text"]);
    }

    #[test]
    fn test_read_publications_json() {
        let path = std::env::temp_dir().join(format!("deeplens-pubs-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"[{"title": "Attention Is All You Need", "year": 2017, "abstract": "Transformers."},
                {"title": "Untitled"}]"#,
        )
        .unwrap();

        let pubs = read_json::<Vec<PublicationStub>>(&path).unwrap();
        assert_eq!(pubs.len(), 2);
        assert_eq!(pubs[0].year, Some(2017));
        assert_eq!(pubs[0].abstract_text, "Transformers.");
        assert_eq!(pubs[1].year_label(), "Unknown");

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_blocked_error_suggests_manual_path() {
        let err = describe(PipelineError::Acquisition(lens_sources::SourceError::Blocked(
            "Google Scholar returned a CAPTCHA.".to_string(),
        )));
        let message = err.to_string();
        assert!(message.starts_with("[blocked] Google Scholar returned a CAPTCHA."));
        assert!(message.contains("--publications"));
    }
}
