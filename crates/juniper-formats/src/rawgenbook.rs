//! RawGenBook Decoder: hierarchical general books (`.idx`/`.dat`).

use std::path::{Path, PathBuf};

use crate::conf::Module;
use crate::error::{JuniperError, Result};
use crate::records::{self, GenBookOffsetRecord};

const MARKER: [u8; 8] = [0xFF; 8];
const MAX_METADATA_SKIP: usize = 20;

/// One key/content pair from a general book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenBookEntry {
    /// The entry's key, possibly hierarchical (e.g. `"Intro/Preface"`).
    pub key: String,
    /// Raw content bytes for the entry.
    pub content: Vec<u8>,
}

fn candidate_stems(data_dir: &Path, identity: &str) -> Vec<PathBuf> {
    let mut stems = vec![
        data_dir.join(identity),
        data_dir.join(identity.replace('-', "")),
        data_dir.join(identity.replace(' ', "")),
    ];
    if let Ok(read_dir) = std::fs::read_dir(data_dir) {
        for entry in read_dir.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "idx") {
                stems.push(path.with_extension(""));
            }
        }
    }
    stems
}

fn resolve_stem(data_dir: &Path, identity: &str) -> Option<PathBuf> {
    candidate_stems(data_dir, identity)
        .into_iter()
        .find(|stem| stem.with_extension("idx").exists())
}

/// A byte is "textual" under the heuristic used when markers can't be
/// located: printable ASCII or a UTF-8 continuation/lead byte.
fn is_textual_byte(b: u8) -> bool {
    (0x20..=0x7E).contains(&b) || b >= 0x80
}

fn looks_like_text(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    let textual = bytes.iter().filter(|&&b| is_textual_byte(b)).count();
    textual * 2 >= bytes.len()
}

/// Locates `0xFF`-marker-delimited keys in `.dat`, skipping each
/// entry's binary metadata block. Returns the keys in file order.
fn parse_marker_keys(dat: &[u8]) -> Vec<String> {
    let mut keys = Vec::new();
    let mut pos = 0;
    while let Some(marker_at) = find_marker(dat, pos) {
        let mut cursor = marker_at + MARKER.len();
        let metadata_end = (cursor + MAX_METADATA_SKIP).min(dat.len());
        while cursor < metadata_end && !is_textual_byte(dat[cursor]) {
            cursor += 1;
        }
        let key_start = cursor;
        let key_end = dat[key_start..]
            .iter()
            .position(|&b| b == 0)
            .map_or(dat.len(), |i| key_start + i);
        if key_end > key_start {
            keys.push(String::from_utf8_lossy(&dat[key_start..key_end]).to_string());
        }
        pos = key_end + 1;
    }
    keys
}

fn find_marker(dat: &[u8], from: usize) -> Option<usize> {
    dat[from..].windows(MARKER.len()).position(|w| w == MARKER).map(|i| from + i)
}

/// Fallback scheme when no `0xFF` markers are present at all: extract
/// null-terminated strings that pass the text heuristic, in order.
fn parse_heuristic_keys(dat: &[u8]) -> Vec<String> {
    dat.split(|&b| b == 0)
        .filter(|s| looks_like_text(s))
        .map(|s| String::from_utf8_lossy(s).to_string())
        .collect()
}

/// Decodes entries out of a `RawGenBook` module.
pub struct RawGenBookDecoder {
    entries: Vec<GenBookEntry>,
}

impl RawGenBookDecoder {
    /// Opens a `RawGenBook` module rooted at `sword_root`.
    ///
    /// # Errors
    ///
    /// Returns [`JuniperError::FileOpen`] if no `.idx`/`.dat`/`.bdt`
    /// triplet can be located for the module.
    pub fn open(module: &Module, sword_root: &Path) -> Result<Self> {
        let data_dir = sword_root.join(module.data_path.as_deref().unwrap_or("."));
        let stem = resolve_stem(&data_dir, &module.identity).ok_or_else(|| {
            JuniperError::file_open(data_dir.join(format!("{}.idx", module.identity)), std::io::Error::from(std::io::ErrorKind::NotFound))
        })?;

        let idx_path = stem.with_extension("idx");
        let dat_path = stem.with_extension("dat");
        let bdt_path = stem.with_extension("bdt");

        let idx_bytes = std::fs::read(&idx_path).map_err(|e| JuniperError::file_open(&idx_path, e))?;
        let dat_bytes = std::fs::read(&dat_path).map_err(|e| JuniperError::file_open(&dat_path, e))?;
        let bdt_bytes = std::fs::read(&bdt_path).map_err(|e| JuniperError::file_open(&bdt_path, e))?;

        let offsets: Vec<GenBookOffsetRecord> = records::parse_records(&idx_bytes, 4)
            .map_err(|reason| JuniperError::malformed(&idx_path, "genbook offset record", reason))?;

        let mut keys = parse_marker_keys(&dat_bytes);
        if keys.is_empty() {
            keys = parse_heuristic_keys(&dat_bytes);
        }

        let mut entries = Vec::with_capacity(keys.len().min(offsets.len()));
        for (i, key) in keys.iter().enumerate() {
            let Some(&GenBookOffsetRecord { offset: start }) = offsets.get(i) else {
                break;
            };
            let end = offsets
                .get(i + 1)
                .map_or(bdt_bytes.len() as u32, |next| next.offset);
            let Some(content) = bdt_bytes.get(start as usize..end as usize) else {
                continue;
            };
            entries.push(GenBookEntry { key: key.clone(), content: content.to_vec() });
        }

        Ok(Self { entries })
    }

    /// Looks up an entry by exact key, then case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`JuniperError::NotFound`] if no entry matches.
    pub fn get_entry(&self, key: &str) -> Result<&GenBookEntry> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .or_else(|| {
                let lower = key.to_lowercase();
                self.entries.iter().find(|e| e.key.to_lowercase() == lower)
            })
            .ok_or_else(|| JuniperError::NotFound(key.to_string()))
    }

    /// All keys, sorted.
    #[must_use]
    pub fn all_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.iter().map(|e| e.key.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    /// Keys containing `needle`, case-insensitively.
    #[must_use]
    pub fn search_keys(&self, needle: &str) -> Vec<&str> {
        let needle = needle.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.key.to_lowercase().contains(&needle))
            .map(|e| e.key.as_str())
            .collect()
    }

    /// Number of entries in this general book.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Every entry, in file order.
    #[must_use]
    pub fn get_all_entries(&self) -> &[GenBookEntry] {
        &self.entries
    }
}

#[cfg(feature = "structured-genbook")]
mod structured {
    //! Strict TreeKey-layout parser, gated behind the
    //! `structured-genbook` feature as an alternative to the
    //! probabilistic heuristic above. No authoritative layout
    //! specification was available while writing this, so it
    //! currently mirrors the marker-scanning path; replace the body
    //! of `parse` once a verified TreeKey layout is in hand.

    use super::GenBookEntry;

    /// Parses `.dat` content under the strict TreeKey assumption.
    #[must_use]
    pub fn parse(dat: &[u8]) -> Vec<String> {
        super::parse_marker_keys(dat)
    }

    #[allow(dead_code)]
    fn unused(_: &[GenBookEntry]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::write_conf;
    use tempfile::TempDir;

    fn build_genbook(entries: &[(&str, &str)]) -> (TempDir, Module) {
        let dir = TempDir::new().unwrap();
        let mut idx = Vec::new();
        let mut dat = Vec::new();
        let mut bdt = Vec::new();

        for (key, content) in entries {
            idx.extend_from_slice(&(bdt.len() as u32).to_le_bytes());
            bdt.extend_from_slice(content.as_bytes());

            dat.extend_from_slice(&MARKER);
            dat.extend_from_slice(&[0u8; 12]);
            dat.extend_from_slice(key.as_bytes());
            dat.push(0);
        }
        idx.extend_from_slice(&(bdt.len() as u32).to_le_bytes());

        std::fs::write(dir.path().join("testbook.idx"), &idx).unwrap();
        std::fs::write(dir.path().join("testbook.dat"), &dat).unwrap();
        std::fs::write(dir.path().join("testbook.bdt"), &bdt).unwrap();

        write_conf(dir.path(), "testbook", "[TestBook]\nModDrv=RawGenBook\n");
        let module = crate::conf::parse_file(&dir.path().join("mods.d/testbook.conf")).unwrap();
        (dir, module)
    }

    #[test]
    fn reads_entry_by_key() {
        let (dir, module) = build_genbook(&[("Intro", "Welcome"), ("Chapter1", "Once upon a time")]);
        let decoder = RawGenBookDecoder::open(&module, dir.path()).unwrap();
        let entry = decoder.get_entry("Chapter1").unwrap();
        assert_eq!(entry.content, b"Once upon a time");
    }

    #[test]
    fn missing_key_is_not_found() {
        let (dir, module) = build_genbook(&[("Intro", "Welcome")]);
        let decoder = RawGenBookDecoder::open(&module, dir.path()).unwrap();
        assert!(matches!(decoder.get_entry("Nope"), Err(JuniperError::NotFound(_))));
    }

    #[test]
    fn case_insensitive_fallback_lookup() {
        let (dir, module) = build_genbook(&[("Intro", "Welcome")]);
        let decoder = RawGenBookDecoder::open(&module, dir.path()).unwrap();
        assert_eq!(decoder.get_entry("intro").unwrap().content, b"Welcome");
    }

    #[test]
    fn text_heuristic_accepts_mostly_printable_bytes() {
        assert!(looks_like_text(b"hello world"));
        assert!(!looks_like_text(&[0x01, 0x02, 0x03, 0x04]));
    }

    #[test]
    fn entry_count_matches_fixture() {
        let (dir, module) = build_genbook(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let decoder = RawGenBookDecoder::open(&module, dir.path()).unwrap();
        assert_eq!(decoder.entry_count(), 3);
    }

    #[test]
    fn get_all_entries_returns_every_entry_in_file_order() {
        let (dir, module) = build_genbook(&[("Intro", "Welcome"), ("Chapter1", "Once upon a time")]);
        let decoder = RawGenBookDecoder::open(&module, dir.path()).unwrap();
        let entries = decoder.get_all_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "Intro");
        assert_eq!(entries[1].key, "Chapter1");
    }
}
