pub mod document;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod service;
pub mod tokenizer;

pub use document::{parse_post, parse_post_bytes, parse_post_str, DocumentStore, Post};
pub use error::{Error, Result};
pub use index::{DocId, InvertedIndex, InvertedIndexBuilder, TextIndex, TextIndexBuilder};
pub use pipeline::{build_index, build_index_with};
pub use service::SearchService;
