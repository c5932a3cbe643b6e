pub mod error;
pub mod gateway;
pub mod knowledge;
pub mod types;

pub use error::{Error, GatewayError, Result};
pub use gateway::{Gateway, GatewayResult};
pub use knowledge::KnowledgeBase;
pub use types::{ArticleSummary, Language, Page, SearchLimit, SearchResult};

pub mod prelude {
    pub use crate::{ArticleSummary, Error, Gateway, GatewayError, KnowledgeBase, Language, Result};
}
