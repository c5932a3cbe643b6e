use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::GatewayError;
use crate::knowledge::KnowledgeBase;
use crate::types::{
    first_sentences, ArticleSummary, Language, SearchLimit, SearchResult, MAX_AMBIGUOUS_OPTIONS,
    MAX_CATEGORIES, SUMMARY_SENTENCES,
};
use crate::Error;

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Read-only article operations on top of a knowledge base.
///
/// The language of every upstream call is passed explicitly, so one gateway
/// can serve concurrent requests for different wikis.
#[derive(Clone)]
pub struct Gateway {
    knowledge: Arc<dyn KnowledgeBase>,
    default_language: Language,
}

impl Gateway {
    pub fn new(knowledge: Arc<dyn KnowledgeBase>, default_language: Language) -> Self {
        Self {
            knowledge,
            default_language,
        }
    }

    pub fn default_language(&self) -> &Language {
        &self.default_language
    }

    pub fn backend_name(&self) -> &str {
        self.knowledge.name()
    }

    pub async fn search(&self, query: &str, limit: SearchLimit) -> GatewayResult<SearchResult> {
        info!("🔎 Searching articles for {:?} (limit: {})", query, limit.get());

        let mut titles = self
            .knowledge
            .search(&self.default_language, query, limit.get())
            .await
            .map_err(|e| {
                error!("Search for {:?} failed: {}", query, e);
                GatewayError::upstream("Search failed", &e)
            })?;
        titles.truncate(limit.get() as usize);

        info!("Found {} results for {:?}", titles.len(), query);
        Ok(SearchResult::new(query, limit, titles))
    }

    pub async fn summary(&self, title: &str) -> GatewayResult<ArticleSummary> {
        self.summary_in(&self.default_language, title).await
    }

    /// Summary of a random article, in `language` when given.
    ///
    /// The override only applies to this call.
    pub async fn random(&self, language: Option<&Language>) -> GatewayResult<ArticleSummary> {
        let language = language.unwrap_or(&self.default_language);
        info!("🎲 Fetching a random article ({})", language);

        let title = self.knowledge.random_title(language).await.map_err(|e| {
            error!("Random article lookup failed: {}", e);
            GatewayError::upstream("Failed to fetch random article", &e)
        })?;

        self.summary_in(language, &title).await.map_err(|e| {
            error!("Random article {:?} could not be summarised: {}", title, e);
            GatewayError::UpstreamFailure {
                message: format!("Failed to fetch random article: {}", e),
            }
        })
    }

    async fn summary_in(&self, language: &Language, title: &str) -> GatewayResult<ArticleSummary> {
        info!("📖 Fetching summary for {:?} ({})", title, language);

        match self.knowledge.page(language, title).await {
            Ok(page) => {
                info!("Fetched summary for {:?}", title);
                Ok(ArticleSummary {
                    title: title.to_string(),
                    summary: first_sentences(&page.summary, SUMMARY_SENTENCES),
                    url: page.url,
                    categories: page.categories.into_iter().take(MAX_CATEGORIES).collect(),
                })
            }
            Err(Error::Ambiguous { options, .. }) => {
                warn!("Ambiguous title {:?}: {:?}", title, options);
                Err(GatewayError::AmbiguousTitle {
                    title: title.to_string(),
                    options: options.into_iter().take(MAX_AMBIGUOUS_OPTIONS).collect(),
                })
            }
            Err(Error::NotFound(_)) => {
                error!("Page {:?} not found", title);
                Err(GatewayError::NotFound {
                    title: title.to_string(),
                })
            }
            Err(e) => {
                error!("Failed to fetch article {:?}: {}", title, e);
                Err(GatewayError::upstream("Failed to fetch article", &e))
            }
        }
    }
}
