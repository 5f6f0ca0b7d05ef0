//! ZLD Decoder: compressed lexicon/dictionary (`.idx`/`.dat`/`.zdx`/`.zdt`).

use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use juniper_cache::{BlockCache, BlockKey, Testament as CacheTestament};

use crate::conf::Module;
use crate::error::{JuniperError, Result};
use crate::records::{self, CompressedIndexRecord, KeyIndexRecord};

/// One resolved dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    /// Original-case key as stored in the file.
    pub key: String,
    /// Definition text.
    pub definition: String,
    /// Strong's number, if this module's identifier indicated one and
    /// the key was purely numeric.
    pub strongs_num: Option<String>,
}

struct Entry {
    key: String,
    key_lower: String,
    def_offset: u32,
    comp_size: Option<u32>,
    /// Set only for entries read from the uncompressed fallback format,
    /// where the definition text was already extracted in [`ZldDecoder::open`]
    /// rather than addressed by an offset/size pair into a data file.
    inline_definition: Option<String>,
}

/// Decodes entries out of a `zLD` (compressed lexicon) module.
pub struct ZldDecoder {
    entries: Vec<Entry>,
    def_data_file: PathBuf,
    strongs_prefix: Option<char>,
    cache: BlockCache,
}

fn resolve_file_stem(data_dir: &Path, identity: &str) -> Option<PathBuf> {
    for candidate in [identity, "dict"] {
        let prefix = data_dir.join(candidate);
        if prefix.with_extension("idx").exists() {
            return Some(prefix);
        }
    }
    None
}

fn strongs_prefix(identity: &str) -> Option<char> {
    let lower = identity.to_ascii_lowercase();
    if !lower.contains("strong") {
        return None;
    }
    if lower.contains("hebrew") {
        Some('H')
    } else if lower.contains("greek") {
        Some('G')
    } else {
        None
    }
}

fn read_null_terminated_strings(bytes: &[u8]) -> Vec<String> {
    bytes
        .split(|&b| b == 0)
        .filter(|s| !s.is_empty())
        .map(|s| String::from_utf8_lossy(s).trim().to_string())
        .collect()
}

impl ZldDecoder {
    /// Opens a `zLD` module rooted at `sword_root`.
    ///
    /// Tries the `<prefix>.idx`/`.dat`/`.zdx`/`.zdt` layout first (the
    /// module's identity as the prefix, then the literal name `dict`
    /// for the directory-per-module layout), falling back to an
    /// uncompressed `.dat`-only scheme if no `.zdx`/`.zdt` pair exists.
    ///
    /// # Errors
    ///
    /// Returns [`JuniperError::FileOpen`] if no key index can be
    /// found, or [`JuniperError::Malformed`] if the index files are
    /// truncated.
    pub fn open(module: &Module, sword_root: &Path) -> Result<Self> {
        let data_dir = sword_root.join(module.data_path.as_deref().unwrap_or("."));
        let prefix = resolve_file_stem(&data_dir, &module.identity)
            .ok_or_else(|| JuniperError::file_open(data_dir.join(format!("{}.idx", module.identity)), std::io::Error::from(std::io::ErrorKind::NotFound)))?;

        let idx_path = prefix.with_extension("idx");
        let dat_path = prefix.with_extension("dat");
        let dat_bytes = std::fs::read(&dat_path).map_err(|e| JuniperError::file_open(&dat_path, e))?;

        let zdx_path = prefix.with_extension("zdx");
        let zdt_path = prefix.with_extension("zdt");

        if !zdx_path.exists() {
            // Uncompressed fallback: `.dat` holds alternating
            // null-terminated key/definition string pairs; the `.idx`
            // offsets address key strings only in the compressed layout
            // and are not consulted here.
            let entries = parse_uncompressed_fallback(&dat_bytes)
                .into_iter()
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, definition)| {
                    let key_lower = key.to_lowercase();
                    Entry { key, key_lower, def_offset: 0, comp_size: None, inline_definition: Some(definition) }
                })
                .collect();

            return Ok(Self {
                entries,
                def_data_file: dat_path,
                strongs_prefix: strongs_prefix(&module.identity),
                cache: BlockCache::new(),
            });
        }

        let idx_bytes = std::fs::read(&idx_path).map_err(|e| JuniperError::file_open(&idx_path, e))?;
        let key_index: Vec<KeyIndexRecord> = records::parse_records(&idx_bytes, 8)
            .map_err(|reason| JuniperError::malformed(&idx_path, "key index record", reason))?;

        let zdx_bytes = std::fs::read(&zdx_path).map_err(|e| JuniperError::file_open(&zdx_path, e))?;
        let compressed_index: Vec<CompressedIndexRecord> = records::parse_records(&zdx_bytes, 8)
            .map_err(|reason| JuniperError::malformed(&zdx_path, "compressed index record", reason))?;

        let mut entries = Vec::with_capacity(key_index.len());
        for (i, key_rec) in key_index.iter().enumerate() {
            let start = key_rec.offset as usize;
            let end = start + key_rec.size as usize;
            let Some(raw) = dat_bytes.get(start..end) else {
                continue;
            };
            let key = String::from_utf8_lossy(raw).trim().to_string();
            if key.is_empty() {
                continue;
            }
            let key_lower = key.to_lowercase();

            let rec = compressed_index
                .get(i)
                .ok_or_else(|| JuniperError::out_of_range("zdx record", i as u64, compressed_index.len() as u64))?;

            entries.push(Entry {
                key,
                key_lower,
                def_offset: rec.offset,
                comp_size: Some(rec.comp_size),
                inline_definition: None,
            });
        }

        Ok(Self {
            entries,
            def_data_file: zdt_path,
            strongs_prefix: strongs_prefix(&module.identity),
            cache: BlockCache::new(),
        })
    }

    fn definition_text(&self, entry: &Entry) -> Result<String> {
        if let Some(text) = &entry.inline_definition {
            return Ok(text.clone());
        }

        // `.zdx` records carry no uncompressed-length field, unlike
        // ZText's block index, so the cached loader below accepts
        // whatever length zlib actually produces.
        let comp_size = entry.comp_size.expect("compressed entries always carry comp_size");
        let data_file = self.def_data_file.clone();
        let offset = entry.def_offset;
        let bytes = self
            .cache
            .get_or_insert_with(BlockKey::new(CacheTestament::Old, entry.def_offset), move || {
                let mut file = std::fs::File::open(&data_file)
                    .map_err(|e| format!("open {}: {e}", data_file.display()))?;
                std::io::Seek::seek(&mut file, std::io::SeekFrom::Start(u64::from(offset)))
                    .map_err(|e| e.to_string())?;
                let mut compressed = vec![0u8; comp_size as usize];
                file.read_exact(&mut compressed).map_err(|e| e.to_string())?;
                let mut decoder = ZlibDecoder::new(&compressed[..]);
                let mut out = Vec::new();
                decoder.read_to_end(&mut out).map_err(|e| e.to_string())?;
                Ok(out)
            })
            .map_err(JuniperError::Decompression)?;
        Ok(String::from_utf8_lossy(&bytes).trim_end_matches('\0').to_string())
    }

    fn strongs_num(&self, key: &str) -> Option<String> {
        let prefix = self.strongs_prefix?;
        if key.chars().all(|c| c.is_ascii_digit()) {
            Some(format!("{prefix}{key}"))
        } else {
            None
        }
    }

    /// Looks up `key`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`JuniperError::NotFound`] if no entry matches, or a
    /// decompression/I/O error reading the definition.
    pub fn get_entry(&self, key: &str) -> Result<LexiconEntry> {
        let lower = key.to_lowercase();
        let entry = self
            .entries
            .iter()
            .find(|e| e.key_lower == lower)
            .ok_or_else(|| JuniperError::NotFound(key.to_string()))?;
        Ok(LexiconEntry {
            key: entry.key.clone(),
            definition: self.definition_text(entry)?,
            strongs_num: self.strongs_num(&entry.key),
        })
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
            .filter(|e| e.key_lower.contains(&needle))
            .map(|e| e.key.as_str())
            .collect()
    }

    /// Every entry in the lexicon, resolving each definition.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::get_entry`]; bounding the cost of this
    /// call for large lexicons is the caller's responsibility.
    pub fn get_all_entries(&self) -> Result<Vec<LexiconEntry>> {
        self.entries
            .iter()
            .map(|entry| {
                Ok(LexiconEntry {
                    key: entry.key.clone(),
                    definition: self.definition_text(entry)?,
                    strongs_num: self.strongs_num(&entry.key),
                })
            })
            .collect()
    }
}

/// Parses the uncompressed fallback format: `.dat` holds alternating
/// null-terminated key and definition strings, one pair per `.idx` entry.
#[must_use]
pub fn parse_uncompressed_fallback(dat_bytes: &[u8]) -> Vec<(String, String)> {
    let strings = read_null_terminated_strings(dat_bytes);
    strings.chunks_exact(2).map(|pair| (pair[0].clone(), pair[1].clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::write_conf;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write as _;
    use tempfile::TempDir;

    fn build_zld(keys_and_defs: &[(&str, &str)]) -> (TempDir, Module) {
        let dir = TempDir::new().unwrap();
        let mut idx = Vec::new();
        let mut dat = Vec::new();
        let mut zdx = Vec::new();
        let mut zdt = Vec::new();

        for (key, def) in keys_and_defs {
            let key_offset = dat.len() as u32;
            dat.extend_from_slice(key.as_bytes());
            dat.push(0);
            idx.extend_from_slice(&key_offset.to_le_bytes());
            idx.extend_from_slice(&(key.len() as u32 + 1).to_le_bytes());

            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(def.as_bytes()).unwrap();
            let compressed = encoder.finish().unwrap();
            let def_offset = zdt.len() as u32;
            zdx.extend_from_slice(&def_offset.to_le_bytes());
            zdx.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
            zdt.extend_from_slice(&compressed);
        }

        std::fs::write(dir.path().join("strongshebrew.idx"), &idx).unwrap();
        std::fs::write(dir.path().join("strongshebrew.dat"), &dat).unwrap();
        std::fs::write(dir.path().join("strongshebrew.zdx"), &zdx).unwrap();
        std::fs::write(dir.path().join("strongshebrew.zdt"), &zdt).unwrap();

        write_conf(dir.path(), "strongshebrew", "[StrongsHebrew]\nModDrv=zLD\n");
        let module = crate::conf::parse_file(&dir.path().join("mods.d/strongshebrew.conf")).unwrap();
        (dir, module)
    }

    #[test]
    fn looks_up_key_case_insensitively() {
        let (dir, module) = build_zld(&[("430", "elohim — God, gods")]);
        let decoder = ZldDecoder::open(&module, dir.path()).unwrap();
        let entry = decoder.get_entry("430").unwrap();
        assert_eq!(entry.definition, "elohim — God, gods");
        assert_eq!(entry.strongs_num.as_deref(), Some("H430"));
    }

    #[test]
    fn unknown_key_is_not_found() {
        let (dir, module) = build_zld(&[("430", "elohim")]);
        let decoder = ZldDecoder::open(&module, dir.path()).unwrap();
        let err = decoder.get_entry("999").unwrap_err();
        assert!(matches!(err, JuniperError::NotFound(_)));
    }

    #[test]
    fn all_keys_are_sorted() {
        let (dir, module) = build_zld(&[("b", "two"), ("a", "one")]);
        let decoder = ZldDecoder::open(&module, dir.path()).unwrap();
        assert_eq!(decoder.all_keys(), vec!["a", "b"]);
    }

    #[test]
    fn uncompressed_fallback_pairs_strings() {
        let mut dat = Vec::new();
        dat.extend_from_slice(b"logos\0a word\0");
        let pairs = parse_uncompressed_fallback(&dat);
        assert_eq!(pairs, vec![("logos".to_string(), "a word".to_string())]);
    }

    #[test]
    fn get_all_entries_returns_every_resolved_definition() {
        let (dir, module) = build_zld(&[("430", "elohim"), ("3068", "yhwh")]);
        let decoder = ZldDecoder::open(&module, dir.path()).unwrap();
        let mut entries = decoder.get_all_entries().unwrap();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].definition, "yhwh");
        assert_eq!(entries[1].definition, "elohim");
    }

    /// A module with no `.zdx`/`.zdt` pair must read real definitions out
    /// of `.dat`'s key/definition string pairs, not treat the key string
    /// itself as its own definition.
    #[test]
    fn uncompressed_module_reads_real_definitions_not_keys() {
        let dir = TempDir::new().unwrap();
        let mut dat = Vec::new();
        dat.extend_from_slice(b"logos\0a word\0");
        dat.extend_from_slice(b"theos\0god\0");
        std::fs::write(dir.path().join("dict.idx"), []).unwrap();
        std::fs::write(dir.path().join("dict.dat"), &dat).unwrap();

        write_conf(dir.path(), "dict", "[Dict]\nModDrv=zLD\n");
        let module = crate::conf::parse_file(&dir.path().join("mods.d/dict.conf")).unwrap();

        let decoder = ZldDecoder::open(&module, dir.path()).unwrap();
        let entry = decoder.get_entry("logos").unwrap();
        assert_eq!(entry.definition, "a word");
        assert_ne!(entry.definition, entry.key);

        let entry = decoder.get_entry("theos").unwrap();
        assert_eq!(entry.definition, "god");
    }
}
