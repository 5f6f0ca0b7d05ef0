//! Parser for SWORD `.conf` module metadata files.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::{JuniperError, Result};

const DESCRIPTION_CLIP_LEN: usize = 200;

/// Storage driver a module uses, as named by the `ModDrv` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// Compressed Bible text, one verse per index entry.
    ZText,
    /// Compressed Bible text, four bytes per index field.
    ZText4,
    /// Uncompressed Bible text.
    RawText,
    /// Uncompressed Bible text, four-byte index fields.
    RawText4,
    /// Compressed commentary.
    ZCom,
    /// Compressed commentary, four-byte index fields.
    ZCom4,
    /// Uncompressed commentary.
    RawCom,
    /// Uncompressed commentary, four-byte index fields.
    RawCom4,
    /// Compressed lexicon/dictionary.
    ZLd,
    /// Uncompressed lexicon/dictionary.
    RawLd,
    /// Uncompressed lexicon/dictionary, four-byte index fields.
    RawLd4,
    /// Hierarchical general book.
    RawGenBook,
}

impl Driver {
    /// Parses a `ModDrv` value, case-sensitively as SWORD itself does.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "zText" => Self::ZText,
            "zText4" => Self::ZText4,
            "RawText" => Self::RawText,
            "RawText4" => Self::RawText4,
            "zCom" => Self::ZCom,
            "zCom4" => Self::ZCom4,
            "RawCom" => Self::RawCom,
            "RawCom4" => Self::RawCom4,
            "zLD" => Self::ZLd,
            "RawLD" => Self::RawLd,
            "RawLD4" => Self::RawLd4,
            "RawGenBook" => Self::RawGenBook,
            _ => return None,
        })
    }

    /// Module class this driver belongs to.
    ///
    /// Total over every variant of [`Driver`] by construction, so a
    /// new driver added above is a compile error here until classified.
    #[must_use]
    pub const fn class(self) -> ModuleClass {
        match self {
            Self::ZText | Self::ZText4 | Self::RawText | Self::RawText4 => ModuleClass::Bible,
            Self::ZCom | Self::ZCom4 | Self::RawCom | Self::RawCom4 => ModuleClass::Commentary,
            Self::ZLd | Self::RawLd | Self::RawLd4 => ModuleClass::Dictionary,
            Self::RawGenBook => ModuleClass::GenBook,
        }
    }
}

/// Broad category of content a module provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleClass {
    /// Scripture text.
    Bible,
    /// Verse-keyed commentary.
    Commentary,
    /// Key-keyed lexicon or dictionary.
    Dictionary,
    /// Hierarchical general book.
    GenBook,
}

/// Parsed `.conf` metadata for one SWORD module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Lower-cased identifier taken from the `[Name]` section header.
    pub identity: String,
    /// `Description` value, or synthesised from `About` if absent.
    pub title: String,
    /// `About` value with RTF-like escapes collapsed.
    pub about: Option<String>,
    /// Raw `ModDrv` string. Kept alongside the parsed [`Driver`] so an
    /// unrecognised driver can still be reported accurately.
    pub driver_name: String,
    /// Parsed driver, if recognised.
    pub driver: Option<Driver>,
    /// `SourceType` value (`OSIS`, `ThML`, `GBF`, `TEI`, `Plain`, ...).
    pub source_type: Option<String>,
    /// `Lang` value.
    pub language: Option<String>,
    /// `Versification` value, unnormalised.
    pub versification: Option<String>,
    /// `DataPath` value, relative to the SWORD root.
    pub data_path: Option<String>,
    /// `CompressType` value.
    pub compress_type: Option<String>,
    /// `BlockType` value (`BOOK`, `CHAPTER`, `VERSE`).
    pub block_type: Option<String>,
    /// `Encoding` value.
    pub encoding: Option<String>,
    /// `Version` value.
    pub version: Option<String>,
    /// `DistributionLicense` value.
    pub license: Option<String>,
    /// `Category` value.
    pub category: Option<String>,
    /// Accumulated `Feature` values, in file order.
    pub features: Vec<String>,
    /// Accumulated `GlobalOptionFilter` values, in file order.
    pub global_option_filters: Vec<String>,
}

impl Module {
    /// Module class implied by [`Self::driver`], if the driver was recognised.
    #[must_use]
    pub fn class(&self) -> Option<ModuleClass> {
        self.driver.map(Driver::class)
    }
}

/// Parses a `.conf` file at `path`.
///
/// # Errors
///
/// Returns [`JuniperError::FileOpen`] if the file cannot be opened, or
/// [`JuniperError::Malformed`] if no `[Section]` header is present.
pub fn parse_file(path: &Path) -> Result<Module> {
    let file = std::fs::File::open(path).map_err(|e| JuniperError::file_open(path, e))?;
    parse(std::io::BufReader::new(file)).map_err(|reason| {
        JuniperError::malformed(path, "conf file", reason)
    })
}

/// Parses `.conf` content from any buffered reader.
///
/// # Errors
///
/// Returns a description of the failure as a plain string; callers
/// that have a path on hand should prefer [`parse_file`], which wraps
/// this into a [`JuniperError`].
pub fn parse<R: BufRead>(mut reader: R) -> std::result::Result<Module, String> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| e.to_string())?;

    let mut identity = None;
    let mut fields: HashMap<String, Vec<String>> = HashMap::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            if identity.is_none() {
                identity = Some(name.trim().to_lowercase());
            }
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        fields
            .entry(key.trim().to_string())
            .or_default()
            .push(value.trim().to_string());
    }

    let identity = identity.ok_or_else(|| "no [Section] header found".to_string())?;

    let take_one = |fields: &HashMap<String, Vec<String>>, key: &str| {
        fields.get(key).and_then(|v| v.last()).cloned()
    };
    let take_list = |fields: &HashMap<String, Vec<String>>, key: &str| {
        fields.get(key).cloned().unwrap_or_default()
    };

    let about = take_one(&fields, "About").map(|raw| clean_about(&raw));
    let driver_name = take_one(&fields, "ModDrv").unwrap_or_default();
    let driver = Driver::parse(&driver_name);

    let title = take_one(&fields, "Description")
        .unwrap_or_else(|| synthesize_description(about.as_deref().unwrap_or_default()));

    Ok(Module {
        identity,
        title,
        about,
        driver_name,
        driver,
        source_type: take_one(&fields, "SourceType"),
        language: take_one(&fields, "Lang"),
        versification: take_one(&fields, "Versification"),
        data_path: take_one(&fields, "DataPath"),
        compress_type: take_one(&fields, "CompressType"),
        block_type: take_one(&fields, "BlockType"),
        encoding: take_one(&fields, "Encoding"),
        version: take_one(&fields, "Version"),
        license: take_one(&fields, "DistributionLicense"),
        category: take_one(&fields, "Category"),
        features: take_list(&fields, "Feature"),
        global_option_filters: take_list(&fields, "GlobalOptionFilter"),
    })
}

/// Collapses the small RTF-like escape set SWORD uses in `About` values.
fn clean_about(raw: &str) -> String {
    raw.replace("\\par\\par", "\n\n")
        .replace("\\par", "\n")
        .replace("\\qc", "")
        .replace("\\pard", "")
        .trim()
        .to_string()
}

/// Builds a fallback title from the first paragraph of a cleaned `About`.
fn synthesize_description(about: &str) -> String {
    let first_paragraph = about.split("\n\n").next().unwrap_or_default().trim();
    if first_paragraph.chars().count() <= DESCRIPTION_CLIP_LEN {
        return first_paragraph.to_string();
    }
    // Clip by character count, not byte count: find the byte offset of the
    // 200th character rather than slicing at byte 200, which can fall
    // inside a multi-byte UTF-8 sequence.
    let clip_at = first_paragraph
        .char_indices()
        .nth(DESCRIPTION_CLIP_LEN)
        .map_or(first_paragraph.len(), |(byte_idx, _)| byte_idx);
    let clipped = &first_paragraph[..clip_at];
    match clipped.rfind(char::is_whitespace) {
        Some(pos) => format!("{}…", clipped[..pos].trim_end()),
        None => format!("{clipped}…"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_str(s: &str) -> Module {
        parse(Cursor::new(s.as_bytes())).expect("conf should parse")
    }

    #[test]
    fn parses_basic_bible_module() {
        let module = parse_str(
            "[KJV]\nDescription=King James Version\nModDrv=zText\nLang=en\nVersification=KJV\n",
        );
        assert_eq!(module.identity, "kjv");
        assert_eq!(module.title, "King James Version");
        assert_eq!(module.driver, Some(Driver::ZText));
        assert_eq!(module.class(), Some(ModuleClass::Bible));
        assert_eq!(module.language.as_deref(), Some("en"));
        assert_eq!(module.versification.as_deref(), Some("KJV"));
    }

    #[test]
    fn accumulates_repeated_keys() {
        let module = parse_str(
            "[StrongsGreek]\nModDrv=zLD\nFeature=StrongsNumbers\nFeature=GreekDef\nGlobalOptionFilter=OSISStrongs\n",
        );
        assert_eq!(module.features, vec!["StrongsNumbers", "GreekDef"]);
        assert_eq!(module.global_option_filters, vec!["OSISStrongs"]);
    }

    #[test]
    fn synthesizes_description_from_about_when_missing() {
        let long_about = "x".repeat(250);
        let module = parse_str(&format!("[Foo]\nModDrv=RawGenBook\nAbout={long_about}\n"));
        assert!(module.title.ends_with('…'));
        assert!(module.title.len() <= DESCRIPTION_CLIP_LEN + 1 + "…".len());
    }

    #[test]
    fn synthesizes_description_without_panicking_on_multibyte_chars() {
        let long_about = "é".repeat(250);
        let module = parse_str(&format!("[Foo]\nModDrv=RawGenBook\nAbout={long_about}\n"));
        assert!(module.title.ends_with('…'));
        assert_eq!(module.title.chars().filter(|&c| c == 'é').count(), DESCRIPTION_CLIP_LEN);
    }

    #[test]
    fn collapses_rtf_escapes_in_about() {
        let module = parse_str("[Foo]\nModDrv=RawGenBook\nAbout=Line one\\parLine two\\par\\parNew para\\qc\\pard\n");
        assert_eq!(module.about.as_deref(), Some("Line one\nLine two\n\nNew para"));
    }

    #[test]
    fn missing_section_header_is_malformed() {
        let err = parse(Cursor::new(b"Description=no section\n".as_slice())).unwrap_err();
        assert!(err.contains("Section"));
    }

    #[test]
    fn unknown_driver_is_retained_but_unclassified() {
        let module = parse_str("[Weird]\nModDrv=SomeFutureDriver\n");
        assert_eq!(module.driver, None);
        assert_eq!(module.class(), None);
        assert_eq!(module.driver_name, "SomeFutureDriver");
    }
}
