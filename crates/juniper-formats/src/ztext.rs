//! ZText Decoder: compressed Bible text (`.bzs`/`.bzv`/`.bzz`).

use std::path::{Path, PathBuf};

use juniper_cache::{BlockCache, BlockKey, Testament as CacheTestament};
use tracing::debug;

use crate::conf::Module;
use crate::error::{JuniperError, Result};
use crate::mapper::Reference;
use crate::records::{self, BlockIndexRecord, VerseIndexRecord};
use crate::versification::{registry, VersificationSystem};

pub(crate) struct TestamentFiles {
    pub(crate) block_index: Vec<BlockIndexRecord>,
    pub(crate) verse_index: Vec<VerseIndexRecord>,
    pub(crate) data_file: PathBuf,
}

pub(crate) fn load_testament(data_dir: &Path, stem: &str) -> Result<Option<TestamentFiles>> {
    let idx_path = data_dir.join(format!("{stem}.bzs"));
    if !idx_path.exists() {
        return Ok(None);
    }
    let idx_bytes = std::fs::read(&idx_path).map_err(|e| JuniperError::file_open(&idx_path, e))?;
    let block_index: Vec<BlockIndexRecord> = records::parse_records(&idx_bytes, 12)
        .map_err(|reason| JuniperError::malformed(&idx_path, "block index record", reason))?;

    let vss_path = data_dir.join(format!("{stem}.bzv"));
    let vss_bytes = std::fs::read(&vss_path).map_err(|e| JuniperError::file_open(&vss_path, e))?;
    let verse_index: Vec<VerseIndexRecord> = records::parse_records(&vss_bytes, 10)
        .map_err(|reason| JuniperError::malformed(&vss_path, "verse index record", reason))?;

    let data_file = data_dir.join(format!("{stem}.bzz"));

    Ok(Some(TestamentFiles { block_index, verse_index, data_file }))
}

/// Decodes verses out of a `zText` (compressed Bible) module.
pub struct ZTextDecoder {
    versification: &'static VersificationSystem,
    ot: Option<TestamentFiles>,
    nt: Option<TestamentFiles>,
    cache: BlockCache,
}

impl ZTextDecoder {
    /// Opens a `zText` module rooted at `sword_root`, using `module`'s
    /// `DataPath` and `Versification` metadata.
    ///
    /// Missing OT or NT files are not an error: a module may cover
    /// only one testament, discovered lazily by whichever is present
    /// on disk.
    ///
    /// # Errors
    ///
    /// Returns [`JuniperError::FileOpen`] or [`JuniperError::Malformed`]
    /// if a present testament's index files cannot be read.
    pub fn open(module: &Module, sword_root: &Path) -> Result<Self> {
        let data_dir = sword_root.join(module.data_path.as_deref().unwrap_or("."));
        let versification = module
            .versification
            .as_deref()
            .and_then(|name| registry().get(name))
            .unwrap_or_else(|| registry().kjv());

        Ok(Self {
            versification,
            ot: load_testament(&data_dir, "ot")?,
            nt: load_testament(&data_dir, "nt")?,
            cache: BlockCache::new(),
        })
    }

    fn resolve(&self, reference: &Reference) -> Result<(&'static VersificationSystem, u32)> {
        match self.versification.calculate_verse_index(reference.book, reference.chapter, reference.verse) {
            Ok(index) => Ok((self.versification, index)),
            Err(JuniperError::UnknownBook(_)) => {
                debug!(book = reference.book, "falling back to KJV book table");
                let kjv = registry().kjv();
                let index = kjv.calculate_verse_index(reference.book, reference.chapter, reference.verse)?;
                Ok((kjv, index))
            }
            Err(other) => Err(other),
        }
    }

    fn testament_files(&self, file_testament: crate::versification::FileTestament) -> Option<&TestamentFiles> {
        use crate::versification::FileTestament;
        match file_testament {
            FileTestament::Old => self.ot.as_ref(),
            FileTestament::New => self.nt.as_ref(),
        }
    }

    /// Returns a verse's text, or an empty string if the module has no
    /// text for that verse (a valid, non-error outcome).
    ///
    /// # Errors
    ///
    /// [`JuniperError::UnknownBook`], [`JuniperError::OutOfRange`], or
    /// [`JuniperError::Decompression`] as described in this crate's
    /// error taxonomy.
    pub fn get_verse(&self, reference: &Reference) -> Result<String> {
        let (system, verse_index) = self.resolve(reference)?;
        let book = system.book(reference.book).expect("resolve() validated the book exists");
        let file_testament = book.testament.file_testament();

        let files = self.testament_files(file_testament).ok_or_else(|| {
            JuniperError::UnknownBook(format!("{} has no data in this module", reference.book))
        })?;

        let entry = files.verse_index.get(verse_index as usize).ok_or_else(|| {
            JuniperError::out_of_range("verse index", u64::from(verse_index), files.verse_index.len() as u64)
        })?;

        if entry.verse_len == 0 {
            return Ok(String::new());
        }

        let block = self.decompress_block(files, file_testament, entry.block_num)?;
        let start = entry.verse_start as usize;
        let end = start + entry.verse_len as usize;
        let slice = block.get(start..end).ok_or_else(|| {
            JuniperError::malformed(&files.data_file, "verse slice", "verse extends beyond decompressed block")
        })?;
        Ok(String::from_utf8_lossy(slice).into_owned())
    }

    fn decompress_block(
        &self,
        files: &TestamentFiles,
        file_testament: crate::versification::FileTestament,
        block_num: u32,
    ) -> Result<std::sync::Arc<[u8]>> {
        use crate::versification::FileTestament;
        let cache_testament = match file_testament {
            FileTestament::Old => CacheTestament::Old,
            FileTestament::New => CacheTestament::New,
        };
        let key = BlockKey::new(cache_testament, block_num);

        let block_entry = files.block_index.get(block_num as usize).ok_or_else(|| {
            JuniperError::out_of_range("block number", u64::from(block_num), files.block_index.len() as u64)
        })?;

        records::decompress_cached(
            &self.cache,
            key,
            &files.data_file,
            block_entry.offset,
            block_entry.comp_size,
            block_entry.uncomp_size,
        )
    }

    /// Returns every verse in `book chapter`, in verse order.
    ///
    /// # Errors
    ///
    /// [`JuniperError::UnknownBook`] if `book` is not in the active
    /// system, or [`JuniperError::OutOfRange`] if `chapter` does not
    /// exist in `book`; otherwise the same taxonomy as [`Self::get_verse`].
    pub fn get_chapter(&self, book: &'static str, chapter: u32) -> Result<Vec<String>> {
        let (system, _) = self.resolve(&Reference::new(book, chapter, 1))?;
        let book_info = system.book(book).expect("resolve() validated the book exists");
        let verse_count = book_info.verses_in_chapter(chapter).ok_or_else(|| {
            JuniperError::out_of_range("chapter", u64::from(chapter), u64::from(book_info.chapters.len() as u32) + 1)
        })?;
        (1..=u32::from(verse_count)).map(|verse| self.get_verse(&Reference::new(book, chapter, verse))).collect()
    }

    /// Returns every chapter of `book`, each as an ordered list of verses.
    ///
    /// # Errors
    ///
    /// [`JuniperError::UnknownBook`] if `book` is not in the active
    /// system; otherwise the same taxonomy as [`Self::get_chapter`].
    pub fn get_book(&self, book: &'static str) -> Result<Vec<Vec<String>>> {
        let (system, _) = self.resolve(&Reference::new(book, 1, 1))?;
        let book_info = system.book(book).expect("resolve() validated the book exists");
        (1..=book_info.chapters.len() as u32).map(|chapter| self.get_chapter(book, chapter)).collect()
    }

    /// Returns every book this module has data for, in canonical order.
    ///
    /// Books whose testament file (OT or NT) is absent from this module
    /// are skipped rather than erroring, the same way [`Self::get_verse`]
    /// treats a missing testament as "no content here" at the book level.
    /// Bounding the cost of this call for large modules is the caller's
    /// responsibility, per this core's concurrency and resource model.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::get_book`] for a book whose
    /// testament file is present but malformed.
    pub fn get_all_books(&self) -> Result<Vec<(&'static str, Vec<Vec<String>>)>> {
        let mut out = Vec::new();
        for book_info in &self.versification.books {
            if self.testament_files(book_info.testament.file_testament()).is_none() {
                continue;
            }
            out.push((book_info.id, self.get_book(book_info.id)?));
        }
        Ok(out)
    }

    /// Clears the shared block cache, releasing decompressed buffers.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
