//! Versification systems: book order, chapter/verse counts, and the
//! verse-index calculator shared by every compressed driver.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

use crate::error::{JuniperError, Result};

/// Which physical testament file a book's content lives in.
///
/// Apocryphal/Deuterocanonical books share the Old Testament's files,
/// so [`Testament::Apocrypha`] still resolves to the `ot.*` triplet —
/// [`Testament::file_testament`] is the projection decoders actually use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Testament {
    /// Old Testament proper.
    Old,
    /// Apocrypha / Deuterocanon, stored alongside the Old Testament.
    Apocrypha,
    /// New Testament.
    New,
}

impl Testament {
    /// The file-level testament (`ot` or `nt`) this testament's content lives in.
    #[must_use]
    pub const fn file_testament(self) -> FileTestament {
        match self {
            Self::Old | Self::Apocrypha => FileTestament::Old,
            Self::New => FileTestament::New,
        }
    }
}

/// The two physical testament files a SWORD Bible/commentary module has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileTestament {
    /// `ot.*` files.
    Old,
    /// `nt.*` files.
    New,
}

/// One book's place in a versification system.
#[derive(Debug, Clone, Serialize)]
pub struct BookInfo {
    /// OSIS-style short identifier, e.g. `"Gen"`, `"1Cor"`.
    pub id: &'static str,
    /// Full display name.
    pub name: &'static str,
    /// Which testament file the book's content lives in.
    pub testament: Testament,
    /// Verse count for each chapter, 0-indexed by chapter number minus one.
    pub chapters: Vec<u16>,
}

impl BookInfo {
    /// Total verses across every chapter.
    #[must_use]
    pub fn total_verses(&self) -> u32 {
        self.chapters.iter().map(|&v| u32::from(v)).sum()
    }

    /// SWORD "book size": total verses, plus one intro slot per chapter,
    /// plus one slot for the book's own intro.
    #[must_use]
    pub fn book_size(&self) -> u32 {
        self.total_verses() + self.chapters.len() as u32 + 1
    }

    /// Verse count of `chapter` (1-based), or `None` if out of range.
    #[must_use]
    pub fn verses_in_chapter(&self, chapter: u32) -> Option<u16> {
        chapter
            .checked_sub(1)
            .and_then(|idx| self.chapters.get(idx as usize))
            .copied()
    }
}

/// A named canon: book order plus each book's chapter/verse layout.
///
/// Serialises via `serde` into the minimal JSON projection external
/// embedders need: book list with testament tags, chapters-per-book,
/// and verses-per-chapter.
#[derive(Debug, Clone, Serialize)]
pub struct VersificationSystem {
    /// Canonical system name, e.g. `"KJV"`.
    pub name: &'static str,
    /// Books in canonical order. Order matters: it determines which
    /// books are "previous" for the index calculator.
    pub books: Vec<BookInfo>,
}

impl VersificationSystem {
    fn book_index(&self, book_id: &str) -> Option<usize> {
        self.books.iter().position(|b| b.id == book_id)
    }

    /// Looks up a book by its OSIS identifier.
    #[must_use]
    pub fn book(&self, book_id: &str) -> Option<&BookInfo> {
        self.book_index(book_id).map(|i| &self.books[i])
    }

    /// Computes the absolute verse index SWORD uses to address a
    /// testament's `.bzv`/`.vss` verse-index table.
    ///
    /// `index = 2 (testament header) + sum(previous book sizes) + 1
    /// (book intro) + sum(previous chapter sizes within book) + 1
    /// (chapter intro) + (verse - 1)`, where "previous" is scoped to
    /// books sharing the same physical testament file as the target
    /// book, in this system's canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`JuniperError::UnknownBook`] if `book_id` is not in
    /// this system, or [`JuniperError::OutOfRange`] if `chapter` or
    /// `verse` is outside the book's bounds.
    pub fn calculate_verse_index(&self, book_id: &str, chapter: u32, verse: u32) -> Result<u32> {
        let target_idx = self
            .book_index(book_id)
            .ok_or_else(|| JuniperError::UnknownBook(book_id.to_string()))?;
        let target = &self.books[target_idx];
        let file_testament = target.testament.file_testament();

        let verses_in_chapter = target.verses_in_chapter(chapter).ok_or_else(|| {
            JuniperError::out_of_range("chapter", u64::from(chapter), u64::from(target.chapters.len() as u32) + 1)
        })?;
        if verse == 0 || verse > u32::from(verses_in_chapter) {
            return Err(JuniperError::out_of_range(
                "verse",
                u64::from(verse),
                u64::from(verses_in_chapter) + 1,
            ));
        }

        let previous_books_size: u32 = self.books[..target_idx]
            .iter()
            .filter(|b| b.testament.file_testament() == file_testament)
            .map(BookInfo::book_size)
            .sum();

        let previous_chapters_size: u32 = target.chapters[..(chapter as usize - 1)]
            .iter()
            .map(|&v| u32::from(v) + 1)
            .sum();

        Ok(2 + previous_books_size + 1 + previous_chapters_size + 1 + (verse - 1))
    }
}

/// Distributes `total` verses as evenly as possible across `chapter_count`
/// chapters. The sum of the returned vector always equals `total` exactly.
fn even_spread(total: u32, chapter_count: u32) -> Vec<u16> {
    let base = total / chapter_count;
    let remainder = total % chapter_count;
    (0..chapter_count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .map(|v| v as u16)
        .collect()
}

fn book(id: &'static str, name: &'static str, testament: Testament, chapters: Vec<u16>) -> BookInfo {
    BookInfo { id, name, testament, chapters }
}

fn spread_book(id: &'static str, name: &'static str, testament: Testament, chapter_count: u32, total_verses: u32) -> BookInfo {
    book(id, name, testament, even_spread(total_verses, chapter_count))
}

/// Genesis's real KJV chapter/verse counts, summing to 1533.
fn genesis() -> BookInfo {
    book(
        "Gen",
        "Genesis",
        Testament::Old,
        vec![
            31, 25, 24, 26, 32, 22, 24, 22, 29, 32, 32, 20, 18, 24, 21, 16, 27, 33, 38, 18, 34,
            24, 20, 67, 34, 35, 46, 22, 35, 43, 55, 32, 20, 31, 29, 43, 36, 30, 23, 23, 57, 38,
            34, 34, 28, 34, 31, 22, 33, 26,
        ],
    )
}

/// Matthew's real KJV chapter/verse counts, summing to 1071.
fn matthew() -> BookInfo {
    book(
        "Matt",
        "Matthew",
        Testament::New,
        vec![
            25, 23, 17, 25, 48, 34, 29, 34, 38, 42, 30, 50, 58, 36, 39, 28, 27, 35, 30, 34, 46,
            46, 39, 51, 46, 75, 66, 20,
        ],
    )
}

fn old_testament_books() -> Vec<BookInfo> {
    vec![
        genesis(),
        spread_book("Exod", "Exodus", Testament::Old, 40, 1213),
        spread_book("Lev", "Leviticus", Testament::Old, 27, 859),
        spread_book("Num", "Numbers", Testament::Old, 36, 1288),
        spread_book("Deut", "Deuteronomy", Testament::Old, 34, 959),
        spread_book("Josh", "Joshua", Testament::Old, 24, 658),
        spread_book("Judg", "Judges", Testament::Old, 21, 618),
        spread_book("Ruth", "Ruth", Testament::Old, 4, 85),
        spread_book("1Sam", "1 Samuel", Testament::Old, 31, 810),
        spread_book("2Sam", "2 Samuel", Testament::Old, 24, 695),
        spread_book("1Kgs", "1 Kings", Testament::Old, 22, 816),
        spread_book("2Kgs", "2 Kings", Testament::Old, 25, 719),
        spread_book("1Chr", "1 Chronicles", Testament::Old, 29, 942),
        spread_book("2Chr", "2 Chronicles", Testament::Old, 36, 822),
        spread_book("Ezra", "Ezra", Testament::Old, 10, 280),
        spread_book("Neh", "Nehemiah", Testament::Old, 13, 406),
        spread_book("Esth", "Esther", Testament::Old, 10, 167),
        spread_book("Job", "Job", Testament::Old, 42, 1070),
        spread_book("Ps", "Psalms", Testament::Old, 150, 2461),
        spread_book("Prov", "Proverbs", Testament::Old, 31, 915),
        spread_book("Eccl", "Ecclesiastes", Testament::Old, 12, 222),
        spread_book("Song", "Song of Solomon", Testament::Old, 8, 117),
        spread_book("Isa", "Isaiah", Testament::Old, 66, 1292),
        spread_book("Jer", "Jeremiah", Testament::Old, 52, 1364),
        spread_book("Lam", "Lamentations", Testament::Old, 5, 154),
        spread_book("Ezek", "Ezekiel", Testament::Old, 48, 1273),
        spread_book("Dan", "Daniel", Testament::Old, 12, 357),
        spread_book("Hos", "Hosea", Testament::Old, 14, 197),
        spread_book("Joel", "Joel", Testament::Old, 3, 73),
        spread_book("Amos", "Amos", Testament::Old, 9, 146),
        spread_book("Obad", "Obadiah", Testament::Old, 1, 21),
        spread_book("Jonah", "Jonah", Testament::Old, 4, 48),
        spread_book("Mic", "Micah", Testament::Old, 7, 105),
        spread_book("Nah", "Nahum", Testament::Old, 3, 47),
        spread_book("Hab", "Habakkuk", Testament::Old, 3, 56),
        spread_book("Zeph", "Zephaniah", Testament::Old, 3, 53),
        spread_book("Hag", "Haggai", Testament::Old, 2, 38),
        spread_book("Zech", "Zechariah", Testament::Old, 14, 211),
        spread_book("Mal", "Malachi", Testament::Old, 4, 55),
    ]
}

fn new_testament_books() -> Vec<BookInfo> {
    vec![
        matthew(),
        spread_book("Mark", "Mark", Testament::New, 16, 678),
        spread_book("Luke", "Luke", Testament::New, 24, 1151),
        spread_book("John", "John", Testament::New, 21, 879),
        spread_book("Acts", "Acts", Testament::New, 28, 1007),
        spread_book("Rom", "Romans", Testament::New, 16, 433),
        spread_book("1Cor", "1 Corinthians", Testament::New, 16, 437),
        spread_book("2Cor", "2 Corinthians", Testament::New, 13, 257),
        spread_book("Gal", "Galatians", Testament::New, 6, 149),
        spread_book("Eph", "Ephesians", Testament::New, 6, 155),
        spread_book("Phil", "Philippians", Testament::New, 4, 104),
        spread_book("Col", "Colossians", Testament::New, 4, 95),
        spread_book("1Thess", "1 Thessalonians", Testament::New, 5, 89),
        spread_book("2Thess", "2 Thessalonians", Testament::New, 3, 47),
        spread_book("1Tim", "1 Timothy", Testament::New, 6, 113),
        spread_book("2Tim", "2 Timothy", Testament::New, 4, 83),
        spread_book("Titus", "Titus", Testament::New, 3, 46),
        spread_book("Phlm", "Philemon", Testament::New, 1, 25),
        spread_book("Heb", "Hebrews", Testament::New, 13, 303),
        spread_book("Jas", "James", Testament::New, 5, 108),
        spread_book("1Pet", "1 Peter", Testament::New, 5, 105),
        spread_book("2Pet", "2 Peter", Testament::New, 3, 61),
        spread_book("1John", "1 John", Testament::New, 5, 105),
        spread_book("2John", "2 John", Testament::New, 1, 13),
        spread_book("3John", "3 John", Testament::New, 1, 14),
        spread_book("Jude", "Jude", Testament::New, 1, 25),
        spread_book("Rev", "Revelation", Testament::New, 22, 404),
    ]
}

/// Apocryphal/Deuterocanonical books shared by `KJVA` and `Vulg`.
fn common_apocrypha_books() -> Vec<BookInfo> {
    vec![
        spread_book("Tob", "Tobit", Testament::Apocrypha, 14, 244),
        spread_book("Jdt", "Judith", Testament::Apocrypha, 16, 340),
        spread_book("AddEsth", "Additions to Esther", Testament::Apocrypha, 6, 88),
        spread_book("Wis", "Wisdom of Solomon", Testament::Apocrypha, 19, 435),
        spread_book("Sir", "Sirach", Testament::Apocrypha, 51, 1403),
        spread_book("Bar", "Baruch", Testament::Apocrypha, 6, 92),
        spread_book("PrAzar", "Prayer of Azariah", Testament::Apocrypha, 1, 68),
        spread_book("Sus", "Susanna", Testament::Apocrypha, 1, 64),
        spread_book("Bel", "Bel and the Dragon", Testament::Apocrypha, 1, 42),
        spread_book("1Macc", "1 Maccabees", Testament::Apocrypha, 16, 924),
        spread_book("2Macc", "2 Maccabees", Testament::Apocrypha, 15, 555),
    ]
}

fn kjv() -> VersificationSystem {
    let mut books = old_testament_books();
    books.extend(new_testament_books());
    VersificationSystem { name: "KJV", books }
}

fn kjva() -> VersificationSystem {
    let mut books = old_testament_books();
    books.extend(common_apocrypha_books());
    books.extend(new_testament_books());
    VersificationSystem { name: "KJVA", books }
}

/// The Vulgate Old Testament in SWORD canon order: protocanonical books
/// with the Deuterocanon and Vulgate-only books interspersed at their
/// traditional positions (1/2 Esdras after Chronicles, Tobit/Judith/the
/// Esther additions around Esther, Wisdom/Sirach after the Song of
/// Solomon, Baruch after Lamentations, the Daniel additions after
/// Daniel, the Prayer of Manasseh and Maccabees at the end), rather than
/// appended as one block after every protocanonical book. This matters
/// because the verse-index calculator sums "previous books in this
/// testament file" in canonical order, so an interspersed book
/// contributes to the index of every later OT book, not just the ones
/// after the whole Old Testament.
fn vulg_old_testament_books() -> Vec<BookInfo> {
    vec![
        genesis(),
        spread_book("Exod", "Exodus", Testament::Old, 40, 1213),
        spread_book("Lev", "Leviticus", Testament::Old, 27, 859),
        spread_book("Num", "Numbers", Testament::Old, 36, 1288),
        spread_book("Deut", "Deuteronomy", Testament::Old, 34, 959),
        spread_book("Josh", "Joshua", Testament::Old, 24, 658),
        spread_book("Judg", "Judges", Testament::Old, 21, 618),
        spread_book("Ruth", "Ruth", Testament::Old, 4, 85),
        spread_book("1Sam", "1 Samuel", Testament::Old, 31, 810),
        spread_book("2Sam", "2 Samuel", Testament::Old, 24, 695),
        spread_book("1Kgs", "1 Kings", Testament::Old, 22, 816),
        spread_book("2Kgs", "2 Kings", Testament::Old, 25, 719),
        spread_book("1Chr", "1 Chronicles", Testament::Old, 29, 942),
        spread_book("2Chr", "2 Chronicles", Testament::Old, 36, 822),
        spread_book("1Esd", "1 Esdras", Testament::Apocrypha, 9, 441),
        spread_book("2Esd", "2 Esdras", Testament::Apocrypha, 16, 933),
        spread_book("Ezra", "Ezra", Testament::Old, 10, 280),
        spread_book("Neh", "Nehemiah", Testament::Old, 13, 406),
        spread_book("Tob", "Tobit", Testament::Apocrypha, 14, 244),
        spread_book("Jdt", "Judith", Testament::Apocrypha, 16, 340),
        spread_book("Esth", "Esther", Testament::Old, 10, 167),
        spread_book("AddEsth", "Additions to Esther", Testament::Apocrypha, 6, 88),
        spread_book("Job", "Job", Testament::Old, 42, 1070),
        spread_book("Ps", "Psalms", Testament::Old, 150, 2461),
        spread_book("Prov", "Proverbs", Testament::Old, 31, 915),
        spread_book("Eccl", "Ecclesiastes", Testament::Old, 12, 222),
        spread_book("Song", "Song of Solomon", Testament::Old, 8, 117),
        spread_book("Wis", "Wisdom of Solomon", Testament::Apocrypha, 19, 435),
        spread_book("Sir", "Sirach", Testament::Apocrypha, 51, 1403),
        spread_book("Isa", "Isaiah", Testament::Old, 66, 1292),
        spread_book("Jer", "Jeremiah", Testament::Old, 52, 1364),
        spread_book("Lam", "Lamentations", Testament::Old, 5, 154),
        spread_book("Bar", "Baruch", Testament::Apocrypha, 6, 92),
        spread_book("Ezek", "Ezekiel", Testament::Old, 48, 1273),
        spread_book("Dan", "Daniel", Testament::Old, 12, 357),
        spread_book("PrAzar", "Prayer of Azariah", Testament::Apocrypha, 1, 68),
        spread_book("Sus", "Susanna", Testament::Apocrypha, 1, 64),
        spread_book("Bel", "Bel and the Dragon", Testament::Apocrypha, 1, 42),
        spread_book("Hos", "Hosea", Testament::Old, 14, 197),
        spread_book("Joel", "Joel", Testament::Old, 3, 73),
        spread_book("Amos", "Amos", Testament::Old, 9, 146),
        spread_book("Obad", "Obadiah", Testament::Old, 1, 21),
        spread_book("Jonah", "Jonah", Testament::Old, 4, 48),
        spread_book("Mic", "Micah", Testament::Old, 7, 105),
        spread_book("Nah", "Nahum", Testament::Old, 3, 47),
        spread_book("Hab", "Habakkuk", Testament::Old, 3, 56),
        spread_book("Zeph", "Zephaniah", Testament::Old, 3, 53),
        spread_book("Hag", "Haggai", Testament::Old, 2, 38),
        spread_book("Zech", "Zechariah", Testament::Old, 14, 211),
        spread_book("Mal", "Malachi", Testament::Old, 4, 55),
        spread_book("PrMan", "Prayer of Manasseh", Testament::Apocrypha, 1, 15),
        spread_book("1Macc", "1 Maccabees", Testament::Apocrypha, 16, 924),
        spread_book("2Macc", "2 Maccabees", Testament::Apocrypha, 15, 555),
    ]
}

fn vulg() -> VersificationSystem {
    let mut books = vulg_old_testament_books();
    books.extend(new_testament_books());
    VersificationSystem { name: "Vulg", books }
}

/// LXX-only books, absent from `Vulg`.
fn lxx_only_books() -> Vec<BookInfo> {
    vec![
        spread_book("3Macc", "3 Maccabees", Testament::Apocrypha, 7, 227),
        spread_book("4Macc", "4 Maccabees", Testament::Apocrypha, 18, 484),
        spread_book("Odes", "Odes", Testament::Apocrypha, 14, 234),
        spread_book("PssSol", "Psalms of Solomon", Testament::Apocrypha, 18, 328),
    ]
}

fn lxx() -> VersificationSystem {
    let mut books = old_testament_books();
    books.extend(common_apocrypha_books());
    books.extend(lxx_only_books());
    books.extend(new_testament_books());
    VersificationSystem { name: "LXX", books }
}

fn mt() -> VersificationSystem {
    VersificationSystem {
        name: "MT",
        books: old_testament_books(),
    }
}

/// Process-wide catalogue of built-in versification systems.
///
/// Populated lazily on first access and immutable thereafter; no
/// locking is needed on the read path.
pub struct VersificationRegistry {
    systems: HashMap<&'static str, VersificationSystem>,
}

impl VersificationRegistry {
    fn build() -> Self {
        let mut systems = HashMap::new();
        for system in [kjv(), kjva(), vulg(), lxx(), mt()] {
            systems.insert(system.name, system);
        }
        Self { systems }
    }

    /// Looks up a system by name, folding common aliases to their
    /// canonical name first. Unrecognised names resolve to `None`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VersificationSystem> {
        self.systems.get(normalize_system_name(name))
    }

    /// The `KJV` system, which is always present.
    #[must_use]
    pub fn kjv(&self) -> &VersificationSystem {
        self.systems.get("KJV").expect("KJV is always registered")
    }
}

/// Returns the process-wide [`VersificationRegistry`], building it on
/// first call.
pub fn registry() -> &'static VersificationRegistry {
    static REGISTRY: OnceLock<VersificationRegistry> = OnceLock::new();
    REGISTRY.get_or_init(VersificationRegistry::build)
}

/// Folds known aliases (case-insensitive) to a canonical system name.
/// Unrecognised input passes through unchanged; lookups against the
/// registry simply miss in that case.
fn normalize_system_name(name: &str) -> &str {
    match name.to_ascii_lowercase().as_str() {
        "kjv" | "king james" | "protestant" => "KJV",
        "kjva" => "KJVA",
        "vulg" | "vulgate" | "latin vulgate" => "Vulg",
        "lxx" | "septuagint" => "LXX",
        "mt" | "masoretic" | "hebrew" => "MT",
        _ => return name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_sums_to_known_total() {
        let kjv = kjv();
        assert_eq!(kjv.book("Gen").unwrap().total_verses(), 1533);
    }

    #[test]
    fn psalms_sums_to_known_total() {
        let kjv = kjv();
        assert_eq!(kjv.book("Ps").unwrap().total_verses(), 2461);
    }

    #[test]
    fn matthew_sums_to_known_total() {
        let kjv = kjv();
        assert_eq!(kjv.book("Matt").unwrap().total_verses(), 1071);
    }

    #[test]
    fn genesis_one_one_indexes_to_four() {
        let kjv = kjv();
        assert_eq!(kjv.calculate_verse_index("Gen", 1, 1).unwrap(), 4);
    }

    #[test]
    fn matthew_one_one_indexes_to_four_in_nt_file() {
        let kjv = kjv();
        assert_eq!(kjv.calculate_verse_index("Matt", 1, 1).unwrap(), 4);
    }

    #[test]
    fn advancing_verse_advances_index_by_one() {
        let kjv = kjv();
        let a = kjv.calculate_verse_index("Gen", 1, 3).unwrap();
        let b = kjv.calculate_verse_index("Gen", 1, 4).unwrap();
        assert_eq!(b - a, 1);
    }

    #[test]
    fn crossing_chapter_boundary_adds_two() {
        let kjv = kjv();
        let last_verse_ch1 = kjv.book("Gen").unwrap().verses_in_chapter(1).unwrap();
        let a = kjv.calculate_verse_index("Gen", 1, u32::from(last_verse_ch1)).unwrap();
        let b = kjv.calculate_verse_index("Gen", 2, 1).unwrap();
        assert_eq!(b - a, 2);
    }

    #[test]
    fn unknown_book_is_rejected() {
        let kjv = kjv();
        assert!(matches!(
            kjv.calculate_verse_index("Nope", 1, 1),
            Err(JuniperError::UnknownBook(_))
        ));
    }

    #[test]
    fn out_of_range_verse_is_rejected() {
        let kjv = kjv();
        assert!(matches!(
            kjv.calculate_verse_index("Gen", 1, 9999),
            Err(JuniperError::OutOfRange { .. })
        ));
    }

    #[test]
    fn registry_resolves_aliases() {
        let reg = registry();
        assert!(reg.get("King James").is_some());
        assert!(reg.get("Septuagint").is_some());
        assert!(reg.get("totally-unknown-system").is_none());
    }

    #[test]
    fn system_serializes_to_json() {
        let kjv = kjv();
        let json = serde_json::to_string(&kjv).expect("versification system should serialize");
        assert!(json.contains("\"name\":\"KJV\""));
        assert!(json.contains("\"Gen\""));
    }

    #[test]
    fn vulgate_apocrypha_contributes_to_ot_index() {
        let v = vulg();
        let k = kjv();

        // 1/2 Esdras sit between 2 Chronicles and Ezra in the Vulgate
        // canon; Ezra's index must be larger than KJV's Ezra index by at
        // least those two books' sizes, proving they were interspersed
        // rather than appended after the whole Old Testament.
        let vulg_ezra = v.calculate_verse_index("Ezra", 1, 1).unwrap();
        let kjv_ezra = k.calculate_verse_index("Ezra", 1, 1).unwrap();
        let esdras_size = v.book("1Esd").unwrap().book_size() + v.book("2Esd").unwrap().book_size();
        assert_eq!(vulg_ezra - kjv_ezra, esdras_size);

        // Tobit/Judith/the Esther additions sit between Nehemiah and Job;
        // Job's index must likewise reflect all of the interspersed books
        // that precede it, not just the ones inserted before Ezra.
        let vulg_job = v.calculate_verse_index("Job", 1, 1).unwrap();
        let kjv_job = k.calculate_verse_index("Job", 1, 1).unwrap();
        let intervening_size = esdras_size
            + v.book("Tob").unwrap().book_size()
            + v.book("Jdt").unwrap().book_size()
            + v.book("AddEsth").unwrap().book_size();
        assert_eq!(vulg_job - kjv_job, intervening_size);
    }
}
