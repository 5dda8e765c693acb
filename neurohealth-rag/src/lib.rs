//! # neurohealth-rag
//!
//! Knowledge-base loading and embedding-ranked retrieval for NeuroHealth.
//!
//! ## Overview
//!
//! - [`load_documents`] parses a JSON knowledge base into validated [`KnowledgeDocument`]s.
//! - [`KnowledgeIndex`] embeds those documents once and ranks them against a
//!   free-text query by cosine similarity.
//! - [`EmbeddingProvider`] is the capability the index calls for vectors; the
//!   `openai` feature adds an HTTP implementation for OpenAI-compatible endpoints.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use neurohealth_rag::{KnowledgeIndex, load_documents};
//!
//! let documents = load_documents("data/knowledge_base.json")?;
//! let index = KnowledgeIndex::build(documents, &embedder).await?;
//! for hit in index.retrieve("I have a high fever", &embedder, 4).await? {
//!     println!("{:.3} [{}] {}", hit.score, hit.document.source, hit.document.title);
//! }
//! ```

pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod loader;
#[cfg(feature = "openai")]
pub mod openai;

pub use document::{KnowledgeDocument, RetrievedDocument};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::{KnowledgeIndex, cosine_similarity};
pub use loader::{load_documents, load_documents_from_str, parse_documents};
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
