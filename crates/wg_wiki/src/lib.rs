pub mod memory;
pub mod wikipedia;

pub use memory::{MemoryArticle, MemoryKnowledgeBase};
pub use wikipedia::{WikipediaClient, WikipediaConfig};

pub mod prelude {
    pub use super::memory::{MemoryArticle, MemoryKnowledgeBase};
    pub use super::wikipedia::{WikipediaClient, WikipediaConfig};
    pub use wg_core::{Error, KnowledgeBase, Language, Page, Result};
}
