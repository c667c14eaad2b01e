//! Binary framing of persisted model bundles.
//!
//! Layout (little-endian):
//!
//! | field          | size |
//! |----------------|------|
//! | magic `LCTN`   | 4    |
//! | format version | 2    |
//! | variant tag    | 1    |
//! | payload length | 8    |
//! | payload crc32  | 4    |
//! | payload        | n    |
//!
//! The payload is the bincode encoding of the bundle. The variant tag sits
//! in the header so a mismatched artifact is rejected before decoding.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{LecternError, Result};
use crate::ml::bundle::{BundleVariant, ModelBundle};

pub const MAGIC: &[u8; 4] = b"LCTN";
pub const FORMAT_VERSION: u16 = 1;
const HEADER_LEN: usize = 4 + 2 + 1 + 8 + 4;

/// Encode a bundle into a framed artifact.
pub fn encode(bundle: &ModelBundle) -> Result<Vec<u8>> {
    let payload = bincode::serde::encode_to_vec(bundle, bincode::config::standard())
        .map_err(|e| LecternError::serialization(format!("Failed to encode model bundle: {e}")))?;

    let mut output = Vec::with_capacity(HEADER_LEN + payload.len());
    output.write_all(MAGIC)?;
    output.write_u16::<LittleEndian>(FORMAT_VERSION)?;
    output.write_u8(bundle.variant().tag())?;
    output.write_u64::<LittleEndian>(payload.len() as u64)?;
    output.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
    output.write_all(&payload)?;

    Ok(output)
}

/// Read only the variant recorded in an artifact header.
pub fn peek_variant(bytes: &[u8]) -> Result<BundleVariant> {
    let mut input = Cursor::new(bytes);
    read_header(&mut input).map(|header| header.variant)
}

/// Decode a framed artifact, requiring the expected variant.
///
/// Fails with [`LecternError::BundleVariantMismatch`] when the artifact is
/// intact but of another variant, and with a storage or serialization
/// error when it is damaged.
pub fn decode(bytes: &[u8], expected: BundleVariant) -> Result<ModelBundle> {
    let mut input = Cursor::new(bytes);
    let header = read_header(&mut input)?;

    if header.variant != expected {
        return Err(LecternError::BundleVariantMismatch {
            expected,
            found: header.variant,
        });
    }

    let mut payload = Vec::new();
    input.read_to_end(&mut payload)?;
    if payload.len() as u64 != header.payload_len {
        return Err(LecternError::storage(format!(
            "artifact payload is {} bytes, header declares {}",
            payload.len(),
            header.payload_len
        )));
    }
    if crc32fast::hash(&payload) != header.checksum {
        return Err(LecternError::storage("artifact checksum mismatch"));
    }

    let (bundle, _): (ModelBundle, _) =
        bincode::serde::decode_from_slice(&payload, bincode::config::standard()).map_err(|e| {
            LecternError::serialization(format!("Failed to decode model bundle: {e}"))
        })?;

    bundle.expect_variant(expected)?;
    bundle.validate()?;
    Ok(bundle)
}

struct Header {
    variant: BundleVariant,
    payload_len: u64,
    checksum: u32,
}

fn read_header<R: Read>(input: &mut R) -> Result<Header> {
    let truncated = |_| LecternError::storage("artifact header is truncated");

    let mut magic = [0u8; 4];
    input.read_exact(&mut magic).map_err(truncated)?;
    if &magic != MAGIC {
        return Err(LecternError::storage("not a model artifact (bad magic)"));
    }

    let version = input.read_u16::<LittleEndian>().map_err(truncated)?;
    if version != FORMAT_VERSION {
        return Err(LecternError::storage(format!(
            "unsupported artifact format version {version}"
        )));
    }

    let tag = input.read_u8().map_err(truncated)?;
    let variant = BundleVariant::from_tag(tag)
        .ok_or_else(|| LecternError::storage(format!("unknown bundle variant tag {tag}")))?;

    Ok(Header {
        variant,
        payload_len: input.read_u64::<LittleEndian>().map_err(truncated)?,
        checksum: input.read_u32::<LittleEndian>().map_err(truncated)?,
    })
}
