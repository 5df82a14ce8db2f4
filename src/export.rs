//! Export directory reading: manifest and chunk message iteration.
//!
//! An export directory looks like:
//!
//! ```text
//! group_12345/
//! ├── manifest.json
//! └── chunks/
//!     ├── chunk_000.jsonl
//!     └── chunk_001.jsonl
//! ```
//!
//! `manifest.json` carries an optional chat display name and an optional
//! ordered chunk list:
//!
//! ```json
//! {
//!   "chatInfo": {"name": "My Group"},
//!   "chunked": {
//!     "chunksDir": "chunks",
//!     "chunks": [{"fileName": "chunk_000.jsonl"}]
//!   }
//! }
//! ```
//!
//! Chunk files are UTF-8 text (invalid sequences replaced), one JSON message
//! per line. Messages have no fixed schema; they are surfaced as raw
//! [`serde_json::Value`]s and malformed lines are skipped silently.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{BililinksError, Result};

// Manifest shapes. Everything is optional; exporters differ.

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(rename = "chatInfo", default)]
    chat_info: ChatInfo,
    #[serde(default)]
    chunked: Chunked,
}

#[derive(Debug, Default, Deserialize)]
struct ChatInfo {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Chunked {
    #[serde(rename = "chunksDir")]
    chunks_dir: Option<String>,
    #[serde(default)]
    chunks: Vec<ChunkEntry>,
}

#[derive(Debug, Deserialize)]
struct ChunkEntry {
    #[serde(rename = "fileName")]
    file_name: String,
}

/// A resolved export directory: chat name plus the ordered chunk set.
///
/// Opening an export reads the manifest once; nothing is mutated afterwards.
///
/// # Example
///
/// ```rust,no_run
/// use bililinks::export::Export;
///
/// let export = Export::open("exports/group_12345".as_ref())?;
/// for chunk in &export.chunk_files {
///     for msg in bililinks::export::read_messages(chunk)? {
///         // each msg is a serde_json::Value
///     }
/// }
/// # Ok::<(), bililinks::BililinksError>(())
/// ```
#[derive(Debug)]
pub struct Export {
    /// Display name from `chatInfo.name`, else the export directory's name.
    pub chat_name: String,
    /// Chunk files in manifest order, or sorted by file name when the
    /// manifest lists none. May include paths that no longer exist; callers
    /// skip those with a warning.
    pub chunk_files: Vec<PathBuf>,
}

impl Export {
    /// Opens an export directory, reading and resolving its manifest.
    ///
    /// # Errors
    ///
    /// - [`BililinksError::ManifestMissing`] when `manifest.json` is absent
    /// - [`BililinksError::Json`] when the manifest is not valid JSON
    /// - [`BililinksError::NoChunks`] when no chunk files can be resolved
    pub fn open(root: &Path) -> Result<Self> {
        let manifest_path = root.join("manifest.json");
        if !manifest_path.exists() {
            return Err(BililinksError::ManifestMissing {
                path: manifest_path,
            });
        }

        let manifest: Manifest = serde_json::from_str(&fs::read_to_string(&manifest_path)?)?;

        let chat_name = manifest
            .chat_info
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| {
                root.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });

        let chunks_dir = root.join(manifest.chunked.chunks_dir.as_deref().unwrap_or("chunks"));

        // Manifest order wins; fall back to a name-sorted directory scan.
        let mut chunk_files: Vec<PathBuf> = manifest
            .chunked
            .chunks
            .iter()
            .map(|c| chunks_dir.join(&c.file_name))
            .collect();

        if chunk_files.is_empty() {
            chunk_files = list_jsonl_sorted(&chunks_dir)?;
        }

        if chunk_files.is_empty() {
            return Err(BililinksError::NoChunks { chunks_dir });
        }

        Ok(Self {
            chat_name,
            chunk_files,
        })
    }
}

/// Lists `*.jsonl` files directly under `dir`, sorted by file name.
///
/// A missing directory yields an empty list, not an error; the caller
/// decides whether an empty chunk set is fatal.
fn list_jsonl_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == "jsonl")
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Opens a chunk file and returns a lazy iterator over its parsed messages.
///
/// Lines are read as bytes and converted with lossy UTF-8, so encoding
/// damage never aborts a chunk. Blank lines and lines that fail to parse
/// are skipped without a diagnostic.
///
/// # Errors
///
/// Fails only if the file cannot be opened; read errors mid-file end the
/// iteration early.
pub fn read_messages(path: &Path) -> Result<Messages> {
    let file = File::open(path)?;
    Ok(Messages {
        reader: BufReader::new(file),
        buf: Vec::new(),
    })
}

/// Lazy iterator over the JSON messages of one chunk file.
///
/// Created by [`read_messages`]. Non-restartable; it consumes its reader.
pub struct Messages {
    reader: BufReader<File>,
    buf: Vec<u8>,
}

impl Iterator for Messages {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }

            let line = String::from_utf8_lossy(&self.buf);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            // Malformed lines are skipped, not surfaced.
            if let Ok(value) = serde_json::from_str::<Value>(line) {
                return Some(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(path: &Path, content: &str) {
        let mut f = File::create(path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_open_missing_manifest() {
        let dir = tempdir().unwrap();
        let err = Export::open(dir.path()).unwrap_err();
        assert!(matches!(err, BililinksError::ManifestMissing { .. }));
    }

    #[test]
    fn test_open_manifest_with_chunk_list() {
        let dir = tempdir().unwrap();
        let chunks = dir.path().join("chunks");
        fs::create_dir(&chunks).unwrap();
        write_file(&chunks.join("b.jsonl"), "{}\n");
        write_file(&chunks.join("a.jsonl"), "{}\n");
        write_file(
            &dir.path().join("manifest.json"),
            r#"{"chatInfo": {"name": "test_chat"},
                "chunked": {"chunksDir": "chunks",
                            "chunks": [{"fileName": "b.jsonl"}, {"fileName": "a.jsonl"}]}}"#,
        );

        let export = Export::open(dir.path()).unwrap();
        assert_eq!(export.chat_name, "test_chat");
        // Manifest order preserved, not name order
        assert_eq!(export.chunk_files[0].file_name().unwrap(), "b.jsonl");
        assert_eq!(export.chunk_files[1].file_name().unwrap(), "a.jsonl");
    }

    #[test]
    fn test_open_falls_back_to_sorted_scan() {
        let dir = tempdir().unwrap();
        let chunks = dir.path().join("chunks");
        fs::create_dir(&chunks).unwrap();
        write_file(&chunks.join("z.jsonl"), "{}\n");
        write_file(&chunks.join("a.jsonl"), "{}\n");
        write_file(&chunks.join("notes.txt"), "not a chunk\n");
        write_file(&dir.path().join("manifest.json"), "{}");

        let export = Export::open(dir.path()).unwrap();
        assert_eq!(export.chunk_files.len(), 2);
        assert_eq!(export.chunk_files[0].file_name().unwrap(), "a.jsonl");
        assert_eq!(export.chunk_files[1].file_name().unwrap(), "z.jsonl");
    }

    #[test]
    fn test_open_chat_name_defaults_to_dir_name() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("group_777");
        let chunks = root.join("chunks");
        fs::create_dir_all(&chunks).unwrap();
        write_file(&chunks.join("a.jsonl"), "{}\n");
        write_file(&root.join("manifest.json"), "{}");

        let export = Export::open(&root).unwrap();
        assert_eq!(export.chat_name, "group_777");
    }

    #[test]
    fn test_open_no_chunks_is_fatal() {
        let dir = tempdir().unwrap();
        write_file(&dir.path().join("manifest.json"), "{}");
        let err = Export::open(dir.path()).unwrap_err();
        assert!(matches!(err, BililinksError::NoChunks { .. }));
    }

    #[test]
    fn test_read_messages_skips_bad_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chunk.jsonl");
        write_file(
            &path,
            "{\"a\": 1}\nnot json at all\n\n{\"b\": 2}\n{unterminated\n",
        );

        let messages: Vec<Value> = read_messages(&path).unwrap().collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["a"], 1);
        assert_eq!(messages[1]["b"], 2);
    }

    #[test]
    fn test_read_messages_lossy_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chunk.jsonl");
        let mut f = File::create(&path).unwrap();
        // Invalid UTF-8 inside an otherwise parseable line gets replaced,
        // and the line still parses (the bad byte is inside a string).
        f.write_all(b"{\"text\": \"ok\"}\n").unwrap();
        f.write_all(b"{\"text\": \"bad\xFFbyte\"}\n").unwrap();
        drop(f);

        let messages: Vec<Value> = read_messages(&path).unwrap().collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[1]["text"].as_str().unwrap().contains("bad"));
    }
}
