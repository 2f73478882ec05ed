use crate::dictionary::{DictionaryError, DictionaryLoader};
use crate::matcher::PhraseMatcher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Failures raised by a search invocation.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error("failed to compile phrase set: {0}")]
    PhraseCompile(#[from] regex_automata::meta::BuildError),
}

/// Content fingerprint of the dictionary source, used to decide when the
/// compiled phrase set must be rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceFingerprint {
    modified: SystemTime,
    len: u64,
}

struct CachedMatcher {
    fingerprint: SourceFingerprint,
    matcher: Arc<PhraseMatcher>,
}

/// Ties the dictionary loader and the phrase matcher together for one
/// search invocation.
///
/// Every search is a pure function of (dictionary source snapshot, query):
/// the source is re-read whenever its fingerprint changes, and the compiled
/// matcher for the current snapshot is shared between concurrent searches.
/// When no fingerprint can be obtained the source is re-parsed per call,
/// which is the uncached baseline behavior.
pub struct SearchEngine {
    source: PathBuf,
    loader: DictionaryLoader,
    cache: RwLock<Option<CachedMatcher>>,
}

impl SearchEngine {
    pub fn new(source: impl Into<PathBuf>) -> Result<Self, SearchError> {
        Ok(Self {
            source: source.into(),
            loader: DictionaryLoader::new()?,
            cache: RwLock::new(None),
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Run one search against the current dictionary snapshot.
    ///
    /// Zero matches is a successful outcome; errors mean the dictionary
    /// itself was unavailable or malformed.
    pub async fn search(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let matcher = self.current_matcher().await?;
        let matches = matcher.find_matches(query);
        debug!("Query matched {} of {} phrases", matches.len(), matcher.len());
        Ok(matches)
    }

    async fn current_matcher(&self) -> Result<Arc<PhraseMatcher>, SearchError> {
        let fingerprint = self.fingerprint().await?;

        if let Some(fingerprint) = fingerprint {
            if let Some(cached) = self.cache.read().await.as_ref() {
                if cached.fingerprint == fingerprint {
                    return Ok(cached.matcher.clone());
                }
            }
        }

        let phrases = self.loader.load(&self.source).await?;
        let matcher = Arc::new(PhraseMatcher::compile(phrases)?);
        info!(
            "Rebuilt phrase matcher for {} ({} phrases)",
            self.source.display(),
            matcher.len()
        );

        if let Some(fingerprint) = fingerprint {
            let mut cache = self.cache.write().await;
            *cache = Some(CachedMatcher {
                fingerprint,
                matcher: matcher.clone(),
            });
        }

        Ok(matcher)
    }

    async fn fingerprint(&self) -> Result<Option<SourceFingerprint>, SearchError> {
        let metadata = tokio::fs::metadata(&self.source).await.map_err(|source| {
            DictionaryError::SourceUnreadable {
                path: self.source.clone(),
                source,
            }
        })?;

        // some filesystems expose no mtime; fall back to uncached re-parse
        Ok(metadata.modified().ok().map(|modified| SourceFingerprint {
            modified,
            len: metadata.len(),
        }))
    }
}
