//! Distinct-key generation against a transient full-universe presence
//! bitmap.

use std::path::Path;

use crate::dense::Bitmap;
use crate::rng::Mwc;
use crate::Key;

/// Where candidate keys come from.
pub enum KeySource<'a> {
    /// Unlimited pseudo-random stream; colliding candidates are redrawn.
    Rng(&'a mut Mwc),
    /// Finite list, consumed front to back; colliding candidates are
    /// skipped. Must yield the requested number of distinct keys before
    /// running out.
    Literal(Vec<Key>),
}

#[derive(Debug, thiserror::Error)]
pub enum KeygenError {
    #[error("key source exhausted after {accepted} of {requested} distinct keys")]
    SourceExhausted { requested: usize, accepted: usize },
    #[error("line {line_no}: malformed key {text:?}")]
    MalformedKey { line_no: usize, text: String },
    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Produce exactly `n` pairwise-distinct keys from `source`.
///
/// A full-universe presence bitmap (same 512 MiB shape as the query
/// index, but transient) rejects duplicates; it is freed when this
/// returns. Duplicate candidates are normal operation, not an error.
pub fn generate(source: &mut KeySource<'_>, n: usize) -> Result<Vec<Key>, KeygenError> {
    let mut seen = Bitmap::universe();
    let mut keys = Vec::with_capacity(n);

    match source {
        KeySource::Rng(rng) => {
            while keys.len() < n {
                let key = rng.next_u32();
                if !seen.test(key) {
                    seen.set(key);
                    keys.push(key);
                }
            }
        }
        KeySource::Literal(list) => {
            let mut candidates = list.drain(..);
            while keys.len() < n {
                let Some(key) = candidates.next() else {
                    return Err(KeygenError::SourceExhausted {
                        requested: n,
                        accepted: keys.len(),
                    });
                };
                if !seen.test(key) {
                    seen.set(key);
                    keys.push(key);
                }
            }
        }
    }

    Ok(keys)
}

/// Parse line-delimited keys: decimal or `0b`-prefixed binary, one per
/// line. Blank lines are skipped; anything else unparsable is fatal.
pub fn parse_keys(input: &str) -> Result<Vec<Key>, KeygenError> {
    let mut keys = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let parsed = match text.strip_prefix("0b") {
            Some(bits) => Key::from_str_radix(bits, 2),
            None => text.parse::<Key>(),
        };
        match parsed {
            Ok(key) => keys.push(key),
            Err(_) => {
                return Err(KeygenError::MalformedKey {
                    line_no: idx + 1,
                    text: text.to_string(),
                })
            }
        }
    }
    Ok(keys)
}

pub fn read_key_file(path: &Path) -> Result<Vec<Key>, KeygenError> {
    let input = std::fs::read_to_string(path).map_err(|source| KeygenError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_keys(&input)
}
