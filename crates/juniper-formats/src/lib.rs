//! Parsers and decoders for the SWORD Project module binary format.
//!
//! This crate decodes the four on-disk driver families SWORD uses —
//! compressed Bible text (`zText`), compressed commentary (`zCom`),
//! compressed lexicons (`zLD`), and hierarchical general books
//! (`RawGenBook`) — plus the `.conf` metadata format that names which
//! driver and versification system a module uses, and the
//! versification registry and verse mapper those decoders consult to
//! resolve references across canons.
//!
//! # Layout
//!
//! - [`conf`] parses `.conf` files into [`conf::Module`] descriptors.
//! - [`versification`] holds the built-in canon definitions and the
//!   verse-index calculator every compressed driver shares.
//! - [`mapper`] translates references between versification systems.
//! - [`ztext`], [`zcom`], [`zld`], [`rawgenbook`] are the four decoders.
//! - [`records`] holds the fixed-size binary record layouts and the
//!   cached-decompression helper they share.
//! - [`error`] is this crate's flat error taxonomy.

pub mod conf;
pub mod error;
pub mod mapper;
pub mod rawgenbook;
pub mod records;
pub mod test_utils;
pub mod versification;
pub mod zcom;
pub mod zld;
pub mod ztext;

pub use conf::{Driver, Module, ModuleClass};
pub use error::{JuniperError, Result};
pub use mapper::{map_from_kjv, map_reference, map_to_kjv, MappedReference, MappingKind, Reference};
pub use rawgenbook::{GenBookEntry, RawGenBookDecoder};
pub use versification::{registry, BookInfo, VersificationSystem};
pub use zcom::ZComDecoder;
pub use zld::{LexiconEntry, ZldDecoder};
pub use ztext::ZTextDecoder;
