//! Uncompressed bundle container for distributable mods.
//!
//! A bundle is a flat, uncompressed member table: magic, format version,
//! member count, then one record per member (name length, name bytes, data
//! length, data bytes), all integers little-endian. Exporting collects only
//! the candidate files that exist at call time; missing members are dropped
//! without error.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Bundle file magic identifier.
pub const BUNDLE_MAGIC: &[u8; 8] = b"MODBNDL\0";

/// Bundle format version.
pub const BUNDLE_VERSION: u16 = 1;

/// Error during bundle export or reading.
#[derive(Debug, Error)]
pub enum BundleError {
    /// File I/O error
    #[error("bundle I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Not a bundle file
    #[error("not a bundle: bad magic")]
    BadMagic,
    /// Newer or unknown format version
    #[error("unsupported bundle version {0}")]
    UnsupportedVersion(u16),
    /// A member record carries a name that is not UTF-8
    #[error("bundle member name is not valid UTF-8")]
    InvalidMemberName,
    /// A member name exceeds the container's name-length field
    #[error("bundle member name too long ({0} bytes)")]
    MemberNameTooLong(usize),
}

/// One named blob inside a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleMember {
    pub name: String,
    pub data: Vec<u8>,
}

/// Export a bundle containing the candidate files that currently exist.
///
/// The bundle lands at `{output_dir}/{lowercase(character)}{suffix}`;
/// `output_dir` is created if needed. Member names are the candidates' file
/// names. Candidates whose backing file is missing are silently excluded;
/// an all-missing candidate list still produces an empty bundle.
pub fn export_bundle(
    candidates: &[PathBuf],
    character: &str,
    suffix: &str,
    output_dir: &Path,
) -> Result<PathBuf, BundleError> {
    let present: Vec<&PathBuf> = candidates.iter().filter(|p| p.is_file()).collect();

    fs::create_dir_all(output_dir)?;
    let bundle_path = output_dir.join(format!("{}{}", character.to_lowercase(), suffix));

    let mut writer = BufWriter::new(File::create(&bundle_path)?);
    writer.write_all(BUNDLE_MAGIC)?;
    writer.write_u16::<LittleEndian>(BUNDLE_VERSION)?;
    writer.write_u32::<LittleEndian>(present.len() as u32)?;

    for path in present {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data = fs::read(path)?;
        write_member(&mut writer, &name, &data)?;
    }

    writer.flush()?;
    Ok(bundle_path)
}

/// Write one member record. The name must fit the u16 length field; a name
/// that does not is an error rather than a silently corrupted record.
fn write_member<W: Write>(writer: &mut W, name: &str, data: &[u8]) -> Result<(), BundleError> {
    let name_len =
        u16::try_from(name.len()).map_err(|_| BundleError::MemberNameTooLong(name.len()))?;
    writer.write_u16::<LittleEndian>(name_len)?;
    writer.write_all(name.as_bytes())?;
    writer.write_u64::<LittleEndian>(data.len() as u64)?;
    writer.write_all(data)?;
    Ok(())
}

/// Read a bundle's member table back.
pub fn read_bundle(path: &Path) -> Result<Vec<BundleMember>, BundleError> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic)?;
    if &magic != BUNDLE_MAGIC {
        return Err(BundleError::BadMagic);
    }

    let version = reader.read_u16::<LittleEndian>()?;
    if version != BUNDLE_VERSION {
        return Err(BundleError::UnsupportedVersion(version));
    }

    let count = reader.read_u32::<LittleEndian>()?;
    let mut members = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name_len = reader.read_u16::<LittleEndian>()? as usize;
        let mut name_bytes = vec![0u8; name_len];
        reader.read_exact(&mut name_bytes)?;
        let name = String::from_utf8(name_bytes).map_err(|_| BundleError::InvalidMemberName)?;

        let data_len = reader.read_u64::<LittleEndian>()? as usize;
        let mut data = vec![0u8; data_len];
        reader.read_exact(&mut data)?;

        members.push(BundleMember { name, data });
    }

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_roundtrip() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("Rex_Library.json");
        let b = dir.path().join("AdditionalNames.json");
        fs::write(&a, b"{\"entries\":[]}").unwrap();
        fs::write(&b, b"{\"mainName\":\"Rex\"}").unwrap();

        let out = dir.path().join("Bundle");
        let path = export_bundle(&[a, b], "Rex", ".customer", &out).unwrap();
        assert_eq!(path, out.join("rex.customer"));

        let members = read_bundle(&path).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "Rex_Library.json");
        assert_eq!(members[0].data, b"{\"entries\":[]}");
        assert_eq!(members[1].name, "AdditionalNames.json");
    }

    #[test]
    fn test_missing_candidates_are_dropped() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("Rex_Library.json");
        fs::write(&present, b"data").unwrap();
        let missing = dir.path().join("Rex_Atlas.png");

        let out = dir.path().join("Bundle");
        let path = export_bundle(&[missing, present], "Rex", ".customer", &out).unwrap();

        let members = read_bundle(&path).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "Rex_Library.json");
    }

    #[test]
    fn test_all_missing_still_produces_empty_bundle() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("Bundle");
        let path =
            export_bundle(&[dir.path().join("ghost.json")], "Rex", ".customer", &out).unwrap();
        assert!(read_bundle(&path).unwrap().is_empty());
    }

    #[test]
    fn test_bundle_name_is_lowercased_with_suffix() {
        let dir = tempdir().unwrap();
        let path = export_bundle(&[], "BigBoss", ".customer", dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "bigboss.customer");
    }

    #[test]
    fn test_oversized_member_name_is_rejected() {
        let name = "x".repeat(usize::from(u16::MAX) + 1);
        let mut buffer = Vec::new();
        let result = write_member(&mut buffer, &name, b"data");
        assert!(matches!(
            result,
            Err(BundleError::MemberNameTooLong(n)) if n == name.len()
        ));
        // Nothing half-written before the length check.
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_bad_magic_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk.customer");
        fs::write(&path, b"NOTABNDL\x01\x00\x00\x00\x00\x00").unwrap();
        assert!(matches!(read_bundle(&path), Err(BundleError::BadMagic)));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let dir = tempdir().unwrap();
        let path = export_bundle(&[], "Rex", ".customer", dir.path()).unwrap();
        let mut bytes = fs::read(&path).unwrap();
        bytes[8] = 0xFF;
        bytes[9] = 0xFF;
        fs::write(&path, bytes).unwrap();
        assert!(matches!(
            read_bundle(&path),
            Err(BundleError::UnsupportedVersion(0xFFFF))
        ));
    }
}
