use std::collections::HashMap;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use wg_core::{Error, KnowledgeBase, Language, Page, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryArticle {
    pub title: String,
    pub text: String,
    pub categories: Vec<String>,
}

impl MemoryArticle {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            categories: Vec::new(),
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Default)]
struct Wiki {
    articles: Vec<MemoryArticle>,
    disambiguations: Vec<(String, Vec<String>)>,
}

impl Wiki {
    fn find_article(&self, title: &str) -> Option<&MemoryArticle> {
        self.articles
            .iter()
            .find(|article| article.title.to_lowercase() == title.to_lowercase())
    }

    fn find_disambiguation(&self, title: &str) -> Option<&(String, Vec<String>)> {
        self.disambiguations
            .iter()
            .find(|(name, _)| name.to_lowercase() == title.to_lowercase())
    }
}

/// In-process knowledge base, one wiki per language.
#[derive(Debug, Default)]
pub struct MemoryKnowledgeBase {
    wikis: RwLock<HashMap<Language, Wiki>>,
    failure: RwLock<Option<String>>,
}

pub fn article_url(language: &Language, title: &str) -> String {
    format!(
        "https://{}.wikipedia.org/wiki/{}",
        language,
        title.replace(' ', "_")
    )
}

impl MemoryKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_article(mut self, language: &Language, article: MemoryArticle) -> Self {
        self.wikis
            .get_mut()
            .entry(language.clone())
            .or_default()
            .articles
            .push(article);
        self
    }

    pub fn with_disambiguation<I, S>(mut self, language: &Language, title: &str, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = options.into_iter().map(Into::into).collect();
        self.wikis
            .get_mut()
            .entry(language.clone())
            .or_default()
            .disambiguations
            .push((title.to_string(), options));
        self
    }

    /// A handful of articles in `ru` and `en`, enough to exercise every endpoint offline.
    pub fn seeded() -> Self {
        let ru = Language::default();
        let en: Language = "en".parse().unwrap_or_default();
        Self::new()
            .with_article(
                &ru,
                MemoryArticle::new(
                    "Python",
                    "Python — высокоуровневый язык программирования общего назначения. \
                     Язык создан Гвидо ван Россумом. Первый выпуск состоялся в 1991 году. \
                     Python поддерживает несколько парадигм программирования.",
                )
                .with_categories(["Языки программирования", "Python"]),
            )
            .with_article(
                &ru,
                MemoryArticle::new(
                    "Москва",
                    "Москва — столица России. Крупнейший по численности населения город страны. \
                     Город федерального значения. Расположена на реке Москве.",
                )
                .with_categories(["Города России", "Столицы европейских государств"]),
            )
            .with_disambiguation(&ru, "Меркурий", ["Меркурий (планета)", "Меркурий (мифология)"])
            .with_article(
                &en,
                MemoryArticle::new(
                    "Rust (programming language)",
                    "Rust is a general-purpose programming language. It emphasizes performance, \
                     type safety and concurrency. It enforces memory safety without a garbage \
                     collector. Rust was influenced by functional programming.",
                )
                .with_categories(["Programming languages", "Systems programming languages"]),
            )
            .with_disambiguation(
                &en,
                "Mercury",
                ["Mercury (planet)", "Mercury (element)", "Mercury (mythology)"],
            )
    }

    /// Makes every following call fail with `message` until cleared.
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }

    pub async fn clear_failure(&self) {
        *self.failure.write().await = None;
    }

    async fn check_failure(&self) -> Result<()> {
        match self.failure.read().await.as_ref() {
            Some(message) => Err(Error::Upstream(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl KnowledgeBase for MemoryKnowledgeBase {
    fn name(&self) -> &str {
        "memory"
    }

    async fn search(&self, language: &Language, query: &str, limit: u32) -> Result<Vec<String>> {
        self.check_failure().await?;
        let needle = query.to_lowercase();
        let wikis = self.wikis.read().await;
        let Some(wiki) = wikis.get(language) else {
            return Ok(Vec::new());
        };

        let articles = wiki.articles.iter().map(|article| &article.title);
        let disambiguations = wiki.disambiguations.iter().map(|(title, _)| title);
        Ok(articles
            .chain(disambiguations)
            .filter(|title| title.to_lowercase().contains(&needle))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn page(&self, language: &Language, title: &str) -> Result<Page> {
        self.check_failure().await?;
        let wikis = self.wikis.read().await;
        let wiki = wikis
            .get(language)
            .ok_or_else(|| Error::NotFound(title.to_string()))?;

        if let Some((name, options)) = wiki.find_disambiguation(title) {
            return Err(Error::Ambiguous {
                title: name.clone(),
                options: options.clone(),
            });
        }

        let article = wiki
            .find_article(title)
            .ok_or_else(|| Error::NotFound(title.to_string()))?;

        Ok(Page {
            title: article.title.clone(),
            url: article_url(language, &article.title),
            summary: article.text.clone(),
            categories: article.categories.clone(),
        })
    }

    async fn random_title(&self, language: &Language) -> Result<String> {
        self.check_failure().await?;
        let wikis = self.wikis.read().await;
        wikis
            .get(language)
            .and_then(|wiki| wiki.articles.choose(&mut rand::thread_rng()))
            .map(|article| article.title.clone())
            .ok_or_else(|| Error::Upstream(format!("no articles available in {}", language)))
    }
}
