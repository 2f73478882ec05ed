use regex_automata::meta::Regex;
use regex_automata::util::syntax;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Name of the column the loader extracts from the dictionary source.
pub const CATEGORY_COLUMN: &str = "category";

/// Failures raised while loading the dictionary source.
///
/// Both variants are fatal to the invocation and must propagate to the
/// caller: an unreadable dictionary is semantically distinct from a
/// dictionary that simply produced no matches.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("cannot read dictionary source {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dictionary source {path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: String },
}

/// Reads category phrases out of a tab-separated dictionary source.
///
/// Only the `category` column is extracted; other columns are skipped while
/// streaming line-by-line and never held in memory. ISO language/country
/// prefixes (`fr:`, `en:`, ...) are stripped, empty values are discarded,
/// and duplicates are dropped while keeping first-occurrence order.
pub struct DictionaryLoader {
    iso_prefix: Regex,
}

impl DictionaryLoader {
    pub fn new() -> Result<Self, regex_automata::meta::BuildError> {
        // 2-or-3 character language/country codes, anchored so colons later
        // in a phrase are left alone
        let iso_prefix = Regex::builder()
            .syntax(syntax::Config::new().case_insensitive(true))
            .build(r"^\w{2,3}:")?;

        Ok(Self { iso_prefix })
    }

    /// Load the ordered, deduplicated phrase set from `path`.
    ///
    /// Returns `DictionaryError::SourceUnreadable` if the file cannot be
    /// opened or read, and `DictionaryError::MissingColumn` if the header
    /// row lacks the `category` column.
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<Vec<String>, DictionaryError> {
        let path = path.as_ref();
        debug!("Loading dictionary source: {}", path.display());

        let file = File::open(path).await.map_err(|source| {
            warn!("Failed to open dictionary source {}: {}", path.display(), source);
            DictionaryError::SourceUnreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = match next_line(&mut lines, path).await? {
            Some(header) => header,
            // an empty source has no header row, so the required column is absent
            None => return Err(missing_column(path)),
        };

        let column_index = header
            .split('\t')
            .position(|name| name == CATEGORY_COLUMN)
            .ok_or_else(|| missing_column(path))?;

        let mut seen = HashSet::new();
        let mut phrases = Vec::new();
        let mut rows = 0u64;

        while let Some(line) = next_line(&mut lines, path).await? {
            rows += 1;

            let Some(value) = line.split('\t').nth(column_index) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }

            let phrase = self.strip_iso_prefix(value);
            // a value that was only a prefix (e.g. `fr:`) strips to nothing
            if phrase.is_empty() {
                continue;
            }

            if seen.insert(phrase.to_string()) {
                phrases.push(phrase.to_string());
            }
        }

        info!(
            "Loaded {} distinct phrases from {} rows in {}",
            phrases.len(),
            rows,
            path.display()
        );
        Ok(phrases)
    }

    /// Strip an anchored ISO prefix, leaving the remainder verbatim.
    pub fn strip_iso_prefix<'a>(&self, value: &'a str) -> &'a str {
        match self.iso_prefix.find(value) {
            Some(m) => &value[m.end()..],
            None => value,
        }
    }
}

async fn next_line(
    lines: &mut tokio::io::Lines<BufReader<File>>,
    path: &Path,
) -> Result<Option<String>, DictionaryError> {
    let line = lines
        .next_line()
        .await
        .map_err(|source| DictionaryError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    // tolerate CRLF sources; lines() only strips the \n
    Ok(line.map(|l| l.trim_end_matches('\r').to_string()))
}

fn missing_column(path: &Path) -> DictionaryError {
    DictionaryError::MissingColumn {
        path: path.to_path_buf(),
        column: CATEGORY_COLUMN.to_string(),
    }
}
