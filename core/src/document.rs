//! Post records and the in-memory store they are loaded into.
//!
//! A post file is either a bare YAML mapping or a front-matter block:
//!
//! ```text
//! ---
//! title: ねこ
//! title_english: Cat
//! categories_english:
//!   - animal
//! ---
//! anything below the closing delimiter is ignored
//! ```

use crate::error::{Error, Result};
use crate::index::DocId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::ops::Index;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title_english: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_english: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entry_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_alt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_alt_english: String,
    /// Kept verbatim; never interpreted as a date.
    #[serde(default, deserialize_with = "null_as_default")]
    pub published_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories_english: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub all_english: String,
}

impl Post {
    /// English text submitted to the index, one contribution per item.
    pub fn english_contributions(&self) -> impl Iterator<Item = &str> {
        [
            self.title_english.as_str(),
            self.description_english.as_str(),
            self.image_alt_english.as_str(),
            self.all_english.as_str(),
        ]
        .into_iter()
        .chain(self.categories_english.iter().map(String::as_str))
    }
}

// `title:` with no value is YAML null; store it as empty rather than failing.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read and parse one post file.
pub fn parse_post(path: impl AsRef<Path>) -> Result<Post> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    parse_post_bytes(&bytes).map_err(|e| Error::format(path, e))
}

/// Parse raw file content. Content that is not UTF-8 is a format error.
pub fn parse_post_bytes(bytes: &[u8]) -> std::result::Result<Post, serde_yaml::Error> {
    let text = std::str::from_utf8(bytes).map_err(<serde_yaml::Error as serde::de::Error>::custom)?;
    parse_post_str(text)
}

/// Parse post text. Only the first YAML document is considered.
pub fn parse_post_str(text: &str) -> std::result::Result<Post, serde_yaml::Error> {
    let yaml = front_matter(text).unwrap_or(text);
    if yaml.trim().is_empty() {
        return Ok(Post::default());
    }
    match serde_yaml::Deserializer::from_str(yaml).next() {
        Some(doc) => Post::deserialize(doc),
        None => Ok(Post::default()),
    }
}

/// Returns the YAML between a leading `---` line and the next `---` line, if any.
fn front_matter(text: &str) -> Option<&str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rest = text.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed == "---" || trimmed == "..." {
            return Some(&rest[..offset]);
        }
        offset += line.len();
    }
    // Opening delimiter only: the whole remainder is the document.
    Some(rest)
}

/// Posts addressed by their position, which is also their [`DocId`].
#[derive(Debug, Default, Clone)]
pub struct DocumentStore {
    posts: Vec<Post>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a post and returns the identifier it was assigned.
    pub fn push(&mut self, post: Post) -> DocId {
        let id = self.posts.len() as DocId;
        self.posts.push(post);
        id
    }

    pub fn get(&self, id: DocId) -> Option<&Post> {
        self.posts.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Post)> {
        self.posts.iter().enumerate().map(|(i, p)| (i as DocId, p))
    }
}

impl Index<DocId> for DocumentStore {
    type Output = Post;

    /// Panics when `id` was not produced by the build that filled this store.
    fn index(&self, id: DocId) -> &Post {
        &self.posts[id as usize]
    }
}
