//! Synthetic SWORD module fixtures shared by this crate's and
//! `juniper-module`'s tests.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use tempfile::TempDir;

use crate::conf::Module;
use crate::records::{BlockIndexRecord, VerseIndexRecord};
use crate::versification::registry;
use crate::ztext::ZTextDecoder;

fn synthetic_module(driver: &str, versification: &str) -> Module {
    crate::conf::parse(std::io::Cursor::new(
        format!("[Test]\nModDrv={driver}\nVersification={versification}\n").into_bytes(),
    ))
    .expect("synthetic conf is well-formed")
}

/// Builds a synthetic `zText` module directory for decoder tests.
pub struct ZTextFixtureBuilder {
    verses: Vec<(&'static str, u32, u32, String)>,
}

impl ZTextFixtureBuilder {
    /// Adds a verse to the Old Testament side of the fixture.
    #[must_use]
    pub fn ot_verse(mut self, book: &'static str, chapter: u32, verse: u32, text: &str) -> Self {
        self.verses.push((book, chapter, verse, text.to_string()));
        self
    }

    /// Builds the fixture, writing `.bzs`/`.bzv`/`.bzz` files under a
    /// fresh temporary directory.
    #[must_use]
    pub fn build(self) -> ZTextFixture {
        let dir = TempDir::new().expect("tempdir");
        let kjv = registry().kjv();

        let mut by_testament: HashMap<crate::versification::FileTestament, Vec<(u32, String)>> = HashMap::new();
        for (book, chapter, verse, text) in self.verses {
            let index = kjv
                .calculate_verse_index(book, chapter, verse)
                .expect("fixture references must resolve against KJV");
            let file_testament = kjv.book(book).expect("known book").testament.file_testament();
            by_testament.entry(file_testament).or_default().push((index, text));
        }

        for (file_testament, mut entries) in by_testament {
            entries.sort_by_key(|(index, _)| *index);
            let stem = match file_testament {
                crate::versification::FileTestament::Old => "ot",
                crate::versification::FileTestament::New => "nt",
            };
            write_testament(dir.path(), stem, &entries);
        }

        ZTextFixture { dir, module: synthetic_module("zText", "KJV") }
    }
}

fn write_testament(dir: &std::path::Path, stem: &str, entries: &[(u32, String)]) {
    let max_index = entries.iter().map(|(i, _)| *i).max().unwrap_or(0);
    let mut verse_index = vec![VerseIndexRecord { block_num: 0, verse_start: 0, verse_len: 0 }; max_index as usize + 1];

    let mut block_plain = Vec::new();
    for (index, text) in entries {
        let start = block_plain.len() as u32;
        block_plain.extend_from_slice(text.as_bytes());
        verse_index[*index as usize] = VerseIndexRecord {
            block_num: 0,
            verse_start: start,
            verse_len: text.len() as u16,
        };
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&block_plain).unwrap();
    let compressed = encoder.finish().unwrap();

    let block_index = [BlockIndexRecord {
        offset: 0,
        comp_size: compressed.len() as u32,
        uncomp_size: block_plain.len() as u32,
    }];

    std::fs::write(dir.join(format!("{stem}.bzz")), &compressed).unwrap();
    std::fs::write(dir.join(format!("{stem}.bzs")), serialize_block_index(&block_index)).unwrap();
    std::fs::write(dir.join(format!("{stem}.bzv")), serialize_verse_index(&verse_index)).unwrap();
}

fn serialize_block_index(records: &[BlockIndexRecord]) -> Vec<u8> {
    let mut out = Vec::with_capacity(records.len() * 12);
    for r in records {
        out.extend_from_slice(&r.offset.to_le_bytes());
        out.extend_from_slice(&r.comp_size.to_le_bytes());
        out.extend_from_slice(&r.uncomp_size.to_le_bytes());
    }
    out
}

fn serialize_verse_index(records: &[VerseIndexRecord]) -> Vec<u8> {
    let mut out = Vec::with_capacity(records.len() * 10);
    for r in records {
        out.extend_from_slice(&r.block_num.to_le_bytes());
        out.extend_from_slice(&r.verse_start.to_le_bytes());
        out.extend_from_slice(&r.verse_len.to_le_bytes());
    }
    out
}

/// A built `zText` fixture. Keeps its temporary directory alive for
/// as long as the fixture is in scope.
pub struct ZTextFixture {
    dir: TempDir,
    module: Module,
}

impl ZTextFixture {
    /// Starts building a fixture.
    #[must_use]
    pub fn builder() -> ZTextFixtureBuilder {
        ZTextFixtureBuilder { verses: Vec::new() }
    }

    /// Opens a [`ZTextDecoder`] against this fixture's files.
    #[must_use]
    pub fn open(&self) -> ZTextDecoder {
        ZTextDecoder::open(&self.module, self.dir.path()).expect("fixture should open")
    }

    /// Root directory of the fixture, for building other decoders against it.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }
}

/// Writes a `.conf` file into `dir/mods.d/<name>.conf`.
pub fn write_conf(dir: &std::path::Path, name: &str, body: &str) {
    let mods_d = dir.join("mods.d");
    std::fs::create_dir_all(&mods_d).unwrap();
    std::fs::write(mods_d.join(format!("{name}.conf")), body).unwrap();
}
