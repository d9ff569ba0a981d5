//! Google Scholar profile scraper
//!
//! Fetches a citations profile with pagination widened to one page,
//! detects CAPTCHA interstitials, and parses the name, affiliation and
//! publication table.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{info, warn};
use url::Url;

use lens_core::{
    is_scholar_profile_url, normalize_url, PublicationStub, ResearcherProfile, ValidationError,
};
use lens_net::Fetcher;

use crate::{Endpoints, SourceError};

/// Publications requested per page
pub const SCHOLAR_PAGE_SIZE: u32 = 100;

/// Phrase Scholar shows on its robot-check interstitial
const CAPTCHA_PHRASE: &str = "Please show you";

const BLOCKED_MESSAGE: &str = "Google Scholar returned a CAPTCHA. \
     Please try again later or provide publications manually.";

static CAPTCHA_FORM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("form#gs_captcha_f").unwrap());
static PROFILE_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#gsc_prf_in").unwrap());
static AFFILIATION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.gsc_prf_il").unwrap());
static PUBLICATION_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr.gsc_a_tr").unwrap());
static ROW_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.gsc_a_at").unwrap());
static ROW_YEAR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.gsc_a_h.gsc_a_hc").unwrap());
static ROW_YEAR_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.gsc_a_y span").unwrap());
static ROW_CITATIONS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.gsc_a_ac").unwrap());

/// Profile URL with `cstart=0&pagesize=100` added when neither is present
pub fn paginated_profile_url(url: &str) -> Result<Url, SourceError> {
    let mut parsed = Url::parse(&normalize_url(url))
        .map_err(|e| SourceError::parse(format!("Invalid Scholar URL {}: {}", url, e)))?;

    let has_paging = parsed
        .query_pairs()
        .any(|(key, _)| key == "cstart" || key == "pagesize");
    if !has_paging {
        parsed
            .query_pairs_mut()
            .append_pair("cstart", "0")
            .append_pair("pagesize", &SCHOLAR_PAGE_SIZE.to_string());
    }

    Ok(parsed)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn is_captcha(html: &str, document: &Html) -> bool {
    html.contains(CAPTCHA_PHRASE) || document.select(&CAPTCHA_FORM).next().is_some()
}

fn parse_row(row: ElementRef<'_>) -> PublicationStub {
    let title = row.select(&ROW_TITLE).next().map(element_text).unwrap_or_default();

    // Scholar renders the year in one of two places depending on layout
    let year = row
        .select(&ROW_YEAR)
        .next()
        .or_else(|| row.select(&ROW_YEAR_CELL).next())
        .map(element_text)
        .and_then(|text| parse_digits(&text));

    let cited_by = row
        .select(&ROW_CITATIONS)
        .next()
        .map(element_text)
        .and_then(|text| parse_digits(&text))
        .unwrap_or(0);

    PublicationStub::new(title, year, cited_by)
}

/// Parse strictly-numeric text; anything else (`*`, `1,234`, empty) is `None`
fn parse_digits<T: std::str::FromStr>(text: &str) -> Option<T> {
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}

/// Parse a fetched profile page. `url` is recorded on the profile as-is.
pub fn parse_profile(html: &str, url: &str) -> Result<ResearcherProfile, SourceError> {
    let document = Html::parse_document(html);

    if is_captcha(html, &document) {
        return Err(SourceError::Blocked(BLOCKED_MESSAGE.to_string()));
    }

    let name = document
        .select(&PROFILE_NAME)
        .next()
        .map(element_text)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    let affiliation = document
        .select(&AFFILIATION)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let publications: Vec<PublicationStub> =
        document.select(&PUBLICATION_ROW).map(parse_row).collect();

    if publications.is_empty() {
        warn!(
            "No publications found for {} - the profile may be empty or restricted",
            name
        );
    }

    Ok(ResearcherProfile {
        name,
        affiliation,
        publications,
        url: url.to_string(),
    })
}

/// Scraper for Google Scholar citations profiles
#[derive(Debug, Clone)]
pub struct ProfileScraper {
    fetcher: Fetcher,
    endpoints: Endpoints,
}

impl ProfileScraper {
    pub fn new(fetcher: Fetcher, endpoints: Endpoints) -> Self {
        Self { fetcher, endpoints }
    }

    /// Validate, fetch and parse a profile
    pub async fn fetch_profile(&self, url: &str) -> Result<ResearcherProfile, SourceError> {
        let url = url.trim();
        if !is_scholar_profile_url(url) {
            return Err(ValidationError::NotScholarProfile(url.to_string()).into());
        }

        let profile_url = paginated_profile_url(url)?;
        let fetch_url = format!(
            "{}{}?{}",
            self.endpoints.scholar_base.trim_end_matches('/'),
            profile_url.path(),
            profile_url.query().unwrap_or_default()
        );
        info!("Fetching Scholar profile {}", fetch_url);

        let html = self.fetcher.get_text(&fetch_url).await?;
        let profile = parse_profile(&html, profile_url.as_str())?;

        info!(
            "Scholar profile {}: {} publications",
            profile.name,
            profile.publication_count()
        );
        Ok(profile)
    }
}
