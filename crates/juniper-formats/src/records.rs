//! Fixed-size little-endian binary records shared by the compressed drivers.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use binrw::BinRead;
use flate2::read::ZlibDecoder;
use juniper_cache::{BlockCache, BlockKey};

use crate::error::JuniperError;

/// 12-byte block index record (`.bzs`, `.cbk`): locates one
/// compressed block within a `.bzz`/`.cbt`-style data file.
#[derive(Debug, Clone, Copy, BinRead)]
#[br(little)]
pub struct BlockIndexRecord {
    /// Byte offset of the compressed block in the data file.
    pub offset: u32,
    /// Length of the compressed block.
    pub comp_size: u32,
    /// Length of the block once decompressed.
    pub uncomp_size: u32,
}

/// 10-byte verse index record (`.bzv`): locates one verse within a
/// decompressed block.
#[derive(Debug, Clone, Copy, BinRead)]
#[br(little)]
pub struct VerseIndexRecord {
    /// Which block (by position in the block index) holds this verse.
    pub block_num: u32,
    /// Byte offset of the verse within the decompressed block.
    pub verse_start: u32,
    /// Length of the verse's text in bytes.
    pub verse_len: u16,
}

/// 8-byte lexicon key-index record (`.idx`): locates a key string in `.dat`.
#[derive(Debug, Clone, Copy, BinRead)]
#[br(little)]
pub struct KeyIndexRecord {
    /// Byte offset of the key string in `.dat`.
    pub offset: u32,
    /// Length of the key string.
    pub size: u32,
}

/// 8-byte lexicon compressed-definition-index record (`.zdx`): locates
/// a compressed definition block in `.zdt`.
#[derive(Debug, Clone, Copy, BinRead)]
#[br(little)]
pub struct CompressedIndexRecord {
    /// Byte offset of the compressed block in `.zdt`.
    pub offset: u32,
    /// Length of the compressed block.
    pub comp_size: u32,
}

/// 4-byte general-book offset record (`.idx`): one entry's start
/// offset into `.dat`; sizes are derived by subtracting consecutive
/// offsets.
#[derive(Debug, Clone, Copy, BinRead)]
#[br(little)]
pub struct GenBookOffsetRecord {
    /// Byte offset into the data file.
    pub offset: u32,
}

/// Parses a slice of fixed-size records, rejecting a file whose length
/// is not a multiple of `RECORD_SIZE`.
///
/// # Errors
///
/// Returns a human-readable message naming the mismatch; callers wrap
/// this into a [`crate::error::JuniperError::Malformed`] with the
/// offending path attached.
pub fn parse_records<T>(bytes: &[u8], record_size: usize) -> Result<Vec<T>, String>
where
    for<'a> T: BinRead<Args<'a> = ()> + binrw::meta::ReadEndian,
{
    if bytes.len() % record_size != 0 {
        return Err(format!(
            "file size {} is not a multiple of record size {record_size}",
            bytes.len()
        ));
    }
    let mut cursor = std::io::Cursor::new(bytes);
    let count = bytes.len() / record_size;
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        records.push(T::read(&mut cursor).map_err(|e| e.to_string())?);
    }
    Ok(records)
}

/// Reads, decompresses, and caches one zlib block shared by ZText, ZCom,
/// and ZLD's definition files.
///
/// # Errors
///
/// Returns [`JuniperError::Decompression`] for any I/O, zlib, or
/// length-mismatch failure.
pub fn decompress_cached(
    cache: &BlockCache,
    key: BlockKey,
    data_file: &Path,
    offset: u32,
    comp_size: u32,
    expected_len: u32,
) -> Result<Arc<[u8]>, JuniperError> {
    let data_file = data_file.to_path_buf();
    cache
        .get_or_insert_with(key, move || {
            let mut file = std::fs::File::open(&data_file)
                .map_err(|e| format!("open {}: {e}", data_file.display()))?;
            std::io::Seek::seek(&mut file, std::io::SeekFrom::Start(u64::from(offset)))
                .map_err(|e| e.to_string())?;
            let mut compressed = vec![0u8; comp_size as usize];
            file.read_exact(&mut compressed).map_err(|e| e.to_string())?;

            let mut decoder = ZlibDecoder::new(&compressed[..]);
            let mut out = Vec::with_capacity(expected_len as usize);
            decoder.read_to_end(&mut out).map_err(|e| e.to_string())?;
            if out.len() != expected_len as usize {
                return Err(format!("decompressed {} bytes, expected {expected_len}", out.len()));
            }
            Ok(out)
        })
        .map_err(JuniperError::Decompression)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_block_index_records() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&100u32.to_le_bytes());
        bytes.extend_from_slice(&200u32.to_le_bytes());
        bytes.extend_from_slice(&100u32.to_le_bytes());
        bytes.extend_from_slice(&50u32.to_le_bytes());
        bytes.extend_from_slice(&80u32.to_le_bytes());

        let records: Vec<BlockIndexRecord> = parse_records(&bytes, 12).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].offset, 0);
        assert_eq!(records[1].comp_size, 50);
    }

    #[test]
    fn rejects_truncated_record_file() {
        let bytes = vec![0u8; 11];
        let result: Result<Vec<BlockIndexRecord>, _> = parse_records(&bytes, 12);
        assert!(result.is_err());
    }

    #[test]
    fn parses_verse_index_records() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&42u16.to_le_bytes());

        let records: Vec<VerseIndexRecord> = parse_records(&bytes, 10).unwrap();
        assert_eq!(records[0].verse_len, 42);
    }
}
