use async_trait::async_trait;

use crate::types::{Language, Page};
use crate::Result;

#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Short backend name, used in logs and the health endpoint
    fn name(&self) -> &str;

    /// Titles matching `query`, relevance ranked, at most `limit` of them
    async fn search(&self, language: &Language, query: &str, limit: u32) -> Result<Vec<String>>;

    /// Resolve `title` to an article.
    ///
    /// Fails with `Error::Ambiguous` for disambiguation pages and
    /// `Error::NotFound` when no such article exists.
    async fn page(&self, language: &Language, title: &str) -> Result<Page>;

    /// Title of a random article from the main namespace
    async fn random_title(&self, language: &Language) -> Result<String>;
}
