//! Verse Mapper: translates references between versification systems.

use crate::versification::registry;

/// A book/chapter/verse triple. `chapter == 0` means book-level,
/// `verse == 0` means chapter-level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    /// OSIS-style book identifier.
    pub book: &'static str,
    /// 1-based chapter number, or 0 for a book-level reference.
    pub chapter: u32,
    /// 1-based verse number, or 0 for a chapter-level reference.
    pub verse: u32,
}

impl Reference {
    /// Builds a verse-level reference.
    #[must_use]
    pub const fn new(book: &'static str, chapter: u32, verse: u32) -> Self {
        Self { book, chapter, verse }
    }
}

/// How a reference relates across two versification systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    /// Same book, chapter, and verse in both systems.
    Direct,
    /// Same content, different verse number.
    Renumber,
    /// One source verse corresponds to a range in the target.
    Split,
    /// A range of source verses corresponds to one target verse.
    Merge,
    /// The target system has no corresponding content.
    Missing,
    /// The target system has content the source lacks.
    Added,
}

/// Result of mapping a [`Reference`] from one system to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedReference {
    /// The reference in the target system, if one exists.
    pub reference: Option<Reference>,
    /// How the source relates to the target.
    pub kind: MappingKind,
}

struct Rule {
    src_book: &'static str,
    src_chapter: u32,
    src_verse: u32,
    dst_book: &'static str,
    dst_chapter: u32,
    dst_verse: u32,
    kind: MappingKind,
}

/// Books present only in `LXX`, absent from `KJV` and `Vulg`.
const LXX_ONLY_BOOKS: &[&str] = &["3Macc", "4Macc", "Odes", "PssSol"];
/// Books present only in `Vulg`, absent from `KJV` and `LXX`.
const VULGATE_ONLY_BOOKS: &[&str] = &["1Esd", "2Esd", "PrMan"];

/// Maps `reference` from `from_system` to `to_system`.
///
/// Identity mappings (`from_system == to_system`) always return
/// [`MappingKind::Direct`] unchanged. Otherwise rule tables are
/// consulted first (first match wins), then the Psalms renumbering
/// algorithm for `Ps` references, then book-absence rules, falling
/// back to `Direct` for everything else.
#[must_use]
pub fn map_reference(reference: Reference, from_system: &str, to_system: &str) -> MappedReference {
    if from_system.eq_ignore_ascii_case(to_system) {
        return MappedReference {
            reference: Some(reference),
            kind: MappingKind::Direct,
        };
    }

    if let Some(mapped) = apply_rules(reference, from_system, to_system) {
        return mapped;
    }

    if reference.book == "Ps" {
        if let Some(mapped) = map_psalm(reference, from_system, to_system) {
            return mapped;
        }
    }

    if let Some(mapped) = check_book_absence(reference, to_system) {
        return mapped;
    }

    MappedReference {
        reference: Some(reference),
        kind: MappingKind::Direct,
    }
}

/// Convenience wrapper for mapping into `KJV`.
#[must_use]
pub fn map_to_kjv(reference: Reference, from_system: &str) -> MappedReference {
    map_reference(reference, from_system, "KJV")
}

/// Convenience wrapper for mapping out of `KJV`.
#[must_use]
pub fn map_from_kjv(reference: Reference, to_system: &str) -> MappedReference {
    map_reference(reference, "KJV", to_system)
}

fn rule_table(from_system: &str, to_system: &str) -> &'static [Rule] {
    // No book/chapter-level rule tables are pre-populated for the
    // built-in systems today; Psalms renumbering and book-absence
    // checks below cover the differences among KJV/KJVA/Vulg/LXX/MT.
    // Named, even if empty, so per-pair rule tables can be added
    // without changing map_reference's control flow.
    let _ = (from_system, to_system);
    &[]
}

fn apply_rules(reference: Reference, from_system: &str, to_system: &str) -> Option<MappedReference> {
    for rule in rule_table(from_system, to_system) {
        let chapter_matches = rule.src_chapter == 0 || rule.src_chapter == reference.chapter;
        let verse_matches = rule.src_verse == 0 || rule.src_verse == reference.verse;
        if rule.src_book == reference.book && chapter_matches && verse_matches {
            let chapter = if rule.dst_chapter == 0 { reference.chapter } else { rule.dst_chapter };
            let verse = if rule.dst_verse == 0 { reference.verse } else { rule.dst_verse };
            return Some(MappedReference {
                reference: Some(Reference::new(rule.dst_book, chapter, verse)),
                kind: rule.kind,
            });
        }
    }
    None
}

/// `true` if `system` uses LXX-style Psalm numbering (offset by one
/// from chapter 9 through 147, with 9, 114-116, and 147 split/merged).
fn uses_lxx_psalm_numbering(system: &str) -> bool {
    system.eq_ignore_ascii_case("LXX") || system.eq_ignore_ascii_case("Vulg")
}

fn map_psalm(reference: Reference, from_system: &str, to_system: &str) -> Option<MappedReference> {
    let from_lxx = uses_lxx_psalm_numbering(from_system);
    let to_lxx = uses_lxx_psalm_numbering(to_system);
    if from_lxx == to_lxx {
        return None;
    }

    let direct = |chapter, verse| {
        Some(MappedReference {
            reference: Some(Reference::new("Ps", chapter, verse)),
            kind: MappingKind::Direct,
        })
    };
    let renumber = |chapter, verse| {
        Some(MappedReference {
            reference: Some(Reference::new("Ps", chapter, verse)),
            kind: MappingKind::Renumber,
        })
    };
    let split = |chapter, verse| {
        Some(MappedReference {
            reference: Some(Reference::new("Ps", chapter, verse)),
            kind: MappingKind::Split,
        })
    };
    let merge = |chapter, verse| {
        Some(MappedReference {
            reference: Some(Reference::new("Ps", chapter, verse)),
            kind: MappingKind::Merge,
        })
    };

    if !from_lxx {
        // KJV -> LXX/Vulg. KJV 9 and 10 collapse into LXX 9 (Merge); LXX
        // 116 and 147 each split out of a single KJV psalm (Split).
        let Reference { chapter, verse, .. } = reference;
        return match chapter {
            1..=8 => direct(chapter, verse),
            9 => direct(9, verse),
            10 => merge(9, verse + 21),
            11..=113 => renumber(chapter - 1, verse),
            114 => merge(113, verse),
            115 => merge(113, verse + 8),
            116 if verse <= 9 => split(114, verse),
            116 => split(115, verse - 9),
            117..=146 => renumber(chapter - 1, verse),
            147 if verse <= 11 => split(146, verse),
            147 => split(147, verse - 11),
            148..=150 => direct(chapter, verse),
            _ => None,
        };
    }

    // LXX/Vulg -> KJV: the inverse of each case above.
    let Reference { chapter, verse, .. } = reference;
    match chapter {
        1..=8 => direct(chapter, verse),
        9 if verse <= 21 => direct(9, verse),
        9 => split(10, verse - 21),
        10..=112 => renumber(chapter + 1, verse),
        113 if verse <= 8 => split(114, verse),
        113 => split(115, verse - 8),
        114 => merge(116, verse),
        115 => merge(116, verse + 9),
        116..=145 => renumber(chapter + 1, verse),
        146 => merge(147, verse),
        147 => merge(147, verse + 11),
        148..=150 => direct(chapter, verse),
        _ => None,
    }
}

fn check_book_absence(reference: Reference, to_system: &str) -> Option<MappedReference> {
    let to_lxx = to_system.eq_ignore_ascii_case("LXX");
    let to_vulg = to_system.eq_ignore_ascii_case("Vulg");
    let to_kjv = to_system.eq_ignore_ascii_case("KJV") || to_system.eq_ignore_ascii_case("MT");

    let missing = (LXX_ONLY_BOOKS.contains(&reference.book) && !to_lxx)
        || (VULGATE_ONLY_BOOKS.contains(&reference.book) && !to_vulg)
        || ((LXX_ONLY_BOOKS.contains(&reference.book) || VULGATE_ONLY_BOOKS.contains(&reference.book)) && to_kjv)
        || registry().get(to_system).is_some_and(|sys| sys.book(reference.book).is_none());

    if missing {
        return Some(MappedReference { reference: None, kind: MappingKind::Missing });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_mapping_is_direct() {
        let r = Reference::new("Gen", 1, 1);
        let mapped = map_reference(r, "KJV", "KJV");
        assert_eq!(mapped.kind, MappingKind::Direct);
        assert_eq!(mapped.reference, Some(r));
    }

    #[test]
    fn psalm_23_1_kjv_maps_to_psalm_22_1_vulg() {
        let mapped = map_reference(Reference::new("Ps", 23, 1), "KJV", "Vulg");
        assert_eq!(mapped.kind, MappingKind::Renumber);
        assert_eq!(mapped.reference, Some(Reference::new("Ps", 22, 1)));
    }

    #[test]
    fn psalm_116_10_kjv_splits_into_lxx_115_1() {
        let mapped = map_reference(Reference::new("Ps", 116, 10), "KJV", "LXX");
        assert_eq!(mapped.kind, MappingKind::Split);
        assert_eq!(mapped.reference, Some(Reference::new("Ps", 115, 1)));
    }

    #[test]
    fn psalm_9_whole_kjv_is_direct_to_lxx_9() {
        let mapped = map_reference(Reference::new("Ps", 9, 5), "KJV", "LXX");
        assert_eq!(mapped.kind, MappingKind::Direct);
        assert_eq!(mapped.reference, Some(Reference::new("Ps", 9, 5)));
    }

    #[test]
    fn psalm_round_trip_kjv_lxx_kjv() {
        for chapter in [1u32, 5, 9, 23, 51, 100, 116, 147, 150] {
            let original = Reference::new("Ps", chapter, 1);
            let to_lxx = map_reference(original, "KJV", "LXX");
            let Some(intermediate) = to_lxx.reference else {
                continue;
            };
            let back = map_reference(intermediate, "LXX", "KJV");
            assert_eq!(back.reference, Some(original), "round trip failed for chapter {chapter}");
        }
    }

    #[test]
    fn psalm_10_merges_from_kjv_into_lxx_9() {
        let mapped = map_reference(Reference::new("Ps", 10, 3), "KJV", "LXX");
        assert_eq!(mapped.kind, MappingKind::Merge);
        assert_eq!(mapped.reference, Some(Reference::new("Ps", 9, 24)));
    }

    #[test]
    fn psalm_9_verse_22_splits_from_lxx_into_kjv_10() {
        let mapped = map_reference(Reference::new("Ps", 9, 24), "LXX", "KJV");
        assert_eq!(mapped.kind, MappingKind::Split);
        assert_eq!(mapped.reference, Some(Reference::new("Ps", 10, 3)));
    }

    #[test]
    fn psalm_114_merges_from_kjv_into_lxx_113() {
        let mapped = map_reference(Reference::new("Ps", 114, 2), "KJV", "LXX");
        assert_eq!(mapped.kind, MappingKind::Merge);
        assert_eq!(mapped.reference, Some(Reference::new("Ps", 113, 2)));
    }

    #[test]
    fn psalm_113_verse_2_splits_from_lxx_into_kjv_114() {
        let mapped = map_reference(Reference::new("Ps", 113, 2), "LXX", "KJV");
        assert_eq!(mapped.kind, MappingKind::Split);
        assert_eq!(mapped.reference, Some(Reference::new("Ps", 114, 2)));
    }

    #[test]
    fn psalm_115_merges_from_kjv_into_lxx_113() {
        let mapped = map_reference(Reference::new("Ps", 115, 1), "KJV", "LXX");
        assert_eq!(mapped.kind, MappingKind::Merge);
        assert_eq!(mapped.reference, Some(Reference::new("Ps", 113, 9)));
    }

    #[test]
    fn psalm_113_verse_9_splits_from_lxx_into_kjv_115() {
        let mapped = map_reference(Reference::new("Ps", 113, 9), "LXX", "KJV");
        assert_eq!(mapped.kind, MappingKind::Split);
        assert_eq!(mapped.reference, Some(Reference::new("Ps", 115, 1)));
    }

    #[test]
    fn psalm_147_first_half_splits_from_kjv_into_lxx_146() {
        let mapped = map_reference(Reference::new("Ps", 147, 5), "KJV", "LXX");
        assert_eq!(mapped.kind, MappingKind::Split);
        assert_eq!(mapped.reference, Some(Reference::new("Ps", 146, 5)));
    }

    #[test]
    fn psalm_146_merges_from_lxx_into_kjv_147() {
        let mapped = map_reference(Reference::new("Ps", 146, 5), "LXX", "KJV");
        assert_eq!(mapped.kind, MappingKind::Merge);
        assert_eq!(mapped.reference, Some(Reference::new("Ps", 147, 5)));
    }

    #[test]
    fn three_maccabees_missing_from_kjv() {
        let mapped = map_reference(Reference::new("3Macc", 1, 1), "LXX", "KJV");
        assert_eq!(mapped.kind, MappingKind::Missing);
        assert_eq!(mapped.reference, None);
    }

    #[test]
    fn prayer_of_manasseh_missing_from_lxx() {
        let mapped = map_reference(Reference::new("PrMan", 1, 1), "Vulg", "LXX");
        assert_eq!(mapped.kind, MappingKind::Missing);
    }

    #[test]
    fn ordinary_book_is_direct_across_systems() {
        let mapped = map_reference(Reference::new("Matt", 5, 3), "KJV", "Vulg");
        assert_eq!(mapped.kind, MappingKind::Direct);
        assert_eq!(mapped.reference, Some(Reference::new("Matt", 5, 3)));
    }
}
