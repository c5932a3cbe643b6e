use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;
use wg_core::types::SUMMARY_SENTENCES;
use wg_core::{Error, KnowledgeBase, Language, Page, Result};

pub const LANGUAGE_PLACEHOLDER: &str = "{lang}";
pub const DEFAULT_API_URL: &str = "https://{lang}.wikipedia.org/w/api.php";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("wikigate/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct WikipediaConfig {
    /// MediaWiki `api.php` endpoint; `{lang}` is replaced by the language code
    pub api_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    query: Option<T>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ApiError {
    code: String,
    info: String,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<TitleRef>,
}

#[derive(Deserialize)]
struct RandomQuery {
    #[serde(default)]
    random: Vec<TitleRef>,
}

#[derive(Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<PageInfo>,
}

#[derive(Deserialize)]
struct TitleRef {
    title: String,
}

#[derive(Deserialize)]
struct PageInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    fullurl: Option<String>,
    extract: Option<String>,
    pageprops: Option<PageProps>,
    #[serde(default)]
    categories: Vec<TitleRef>,
    #[serde(default)]
    links: Vec<TitleRef>,
}

#[derive(Deserialize)]
struct PageProps {
    disambiguation: Option<serde_json::Value>,
}

impl PageInfo {
    fn is_disambiguation(&self) -> bool {
        self.pageprops
            .as_ref()
            .map_or(false, |props| props.disambiguation.is_some())
    }
}

/// Drops the namespace prefix, `Category:Foo` becomes `Foo`.
fn strip_namespace(title: &str) -> String {
    title
        .split_once(':')
        .map_or(title, |(_, name)| name)
        .to_string()
}

/// Knowledge base backed by the MediaWiki action API.
#[derive(Clone)]
pub struct WikipediaClient {
    client: Client,
    config: WikipediaConfig,
}

impl fmt::Debug for WikipediaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WikipediaClient")
            .field("client", &"<reqwest::Client>")
            .field("api_url", &self.config.api_url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl WikipediaClient {
    pub fn new(config: WikipediaConfig) -> Result<Self> {
        // Fail early on a template that cannot produce a URL.
        Url::parse(&config.api_url.replace(LANGUAGE_PLACEHOLDER, "en"))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &WikipediaConfig {
        &self.config
    }

    fn endpoint(&self, language: &Language) -> Result<Url> {
        Ok(Url::parse(
            &self
                .config
                .api_url
                .replace(LANGUAGE_PLACEHOLDER, language.as_str()),
        )?)
    }

    async fn query<T: DeserializeOwned>(
        &self,
        language: &Language,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let mut url = self.endpoint(language)?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .append_pair("formatversion", "2")
            .extend_pairs(params);
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!("MediaWiki API returned {}", status)));
        }

        let body: ApiResponse<T> = response.json().await?;
        if let Some(error) = body.error {
            return Err(Error::Upstream(format!("{}: {}", error.code, error.info)));
        }
        body.query
            .ok_or_else(|| Error::Upstream("MediaWiki API response has no query".to_string()))
    }

    async fn disambiguation_options(&self, language: &Language, title: &str) -> Result<Vec<String>> {
        let query: PagesQuery = self
            .query(
                language,
                &[
                    ("prop", "links"),
                    ("plnamespace", "0"),
                    ("pllimit", "max"),
                    ("titles", title),
                ],
            )
            .await?;

        Ok(query
            .pages
            .into_iter()
            .flat_map(|page| page.links)
            .map(|link| link.title)
            .collect())
    }
}

#[async_trait]
impl KnowledgeBase for WikipediaClient {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn search(&self, language: &Language, query: &str, limit: u32) -> Result<Vec<String>> {
        let limit = limit.to_string();
        let result: SearchQuery = self
            .query(
                language,
                &[
                    ("list", "search"),
                    ("srsearch", query),
                    ("srlimit", limit.as_str()),
                    ("srprop", ""),
                ],
            )
            .await?;

        Ok(result.search.into_iter().map(|hit| hit.title).collect())
    }

    async fn page(&self, language: &Language, title: &str) -> Result<Page> {
        // `|` separates titles in the API, so it would turn one lookup into several.
        if title.contains('|') {
            return Err(Error::NotFound(title.to_string()));
        }

        let sentences = SUMMARY_SENTENCES.to_string();
        let query: PagesQuery = self
            .query(
                language,
                &[
                    ("prop", "info|pageprops|extracts|categories"),
                    ("inprop", "url"),
                    ("ppprop", "disambiguation"),
                    ("exintro", "1"),
                    ("explaintext", "1"),
                    ("exsentences", sentences.as_str()),
                    ("clshow", "!hidden"),
                    ("cllimit", "max"),
                    ("redirects", "1"),
                    ("titles", title),
                ],
            )
            .await?;

        let mut pages = query.pages.into_iter();
        let page = match (pages.next(), pages.next()) {
            (Some(page), None) => page,
            (None, _) => return Err(Error::NotFound(title.to_string())),
            (Some(_), Some(_)) => {
                return Err(Error::Upstream(format!("several pages reported for {:?}", title)))
            }
        };

        if page.missing || page.invalid {
            return Err(Error::NotFound(title.to_string()));
        }

        if page.is_disambiguation() {
            let options = self.disambiguation_options(language, &page.title).await?;
            return Err(Error::Ambiguous {
                title: page.title,
                options,
            });
        }

        let url = page
            .fullurl
            .ok_or_else(|| Error::Upstream(format!("no URL reported for {:?}", page.title)))?;

        Ok(Page {
            title: page.title,
            url,
            summary: page.extract.unwrap_or_default(),
            categories: page
                .categories
                .iter()
                .map(|category| strip_namespace(&category.title))
                .collect(),
        })
    }

    async fn random_title(&self, language: &Language) -> Result<String> {
        let result: RandomQuery = self
            .query(
                language,
                &[("list", "random"), ("rnnamespace", "0"), ("rnlimit", "1")],
            )
            .await?;

        result
            .random
            .into_iter()
            .next()
            .map(|page| page.title)
            .ok_or_else(|| Error::Upstream("MediaWiki API returned no random page".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_namespace() {
        assert_eq!(strip_namespace("Category:Programming languages"), "Programming languages");
        assert_eq!(strip_namespace("Категория:Языки программирования"), "Языки программирования");
        assert_eq!(strip_namespace("Plain"), "Plain");
    }

    #[test]
    fn test_endpoint_substitutes_language() {
        let client = WikipediaClient::new(WikipediaConfig::default()).unwrap();
        let url = client.endpoint(&"de".parse().unwrap()).unwrap();
        assert_eq!(url.as_str(), "https://de.wikipedia.org/w/api.php");
    }

    #[test]
    fn test_rejects_unusable_api_url() {
        let config = WikipediaConfig {
            api_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(WikipediaClient::new(config), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_parses_page_response() {
        let body = r#"{
            "batchcomplete": true,
            "query": {
                "pages": [{
                    "pageid": 23862,
                    "ns": 0,
                    "title": "Python (programming language)",
                    "fullurl": "https://en.wikipedia.org/wiki/Python_(programming_language)",
                    "extract": "Python is a programming language.",
                    "categories": [{"ns": 14, "title": "Category:Programming languages"}]
                }]
            }
        }"#;
        let response: ApiResponse<PagesQuery> = serde_json::from_str(body).unwrap();
        let page = response.query.unwrap().pages.into_iter().next().unwrap();
        assert!(!page.missing);
        assert!(!page.is_disambiguation());
        assert_eq!(page.categories.len(), 1);
    }

    #[test]
    fn test_parses_disambiguation_and_missing() {
        let body = r#"{"query": {"pages": [
            {"ns": 0, "title": "Mercury", "pageprops": {"disambiguation": ""}},
            {"ns": 0, "title": "Nope", "missing": true}
        ]}}"#;
        let response: ApiResponse<PagesQuery> = serde_json::from_str(body).unwrap();
        let pages = response.query.unwrap().pages;
        assert!(pages[0].is_disambiguation());
        assert!(pages[1].missing);
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_live_summary() {
        let client = WikipediaClient::new(WikipediaConfig::default()).unwrap();
        let en: Language = "en".parse().unwrap();
        let page = client.page(&en, "Python (programming language)").await.unwrap();
        assert!(!page.summary.is_empty());
        assert!(page.url.contains("Python"));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_live_search_and_random() {
        let client = WikipediaClient::new(WikipediaConfig::default()).unwrap();
        let ru = Language::default();
        let titles = client.search(&ru, "python", 5).await.unwrap();
        assert!(!titles.is_empty() && titles.len() <= 5);
        assert!(!client.random_title(&ru).await.unwrap().is_empty());
    }
}
