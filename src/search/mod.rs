//! Lexical Relevance Search
//!
//! Keyword scoring over an in-memory documentation collection, used to pick
//! grounding context for a question. Scoring weights live in
//! [`crate::constants::search`].

mod document;
mod index;

pub use document::{Document, DocumentSnapshot, extract_title};
pub use index::{IndexStatus, RelevanceSearchIndex, ScoredDocument, search};
