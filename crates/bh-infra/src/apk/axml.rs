//! Minimal decoder for Android binary XML (`AndroidManifest.xml` inside an APK).
//!
//! Only what identity extraction needs is decoded: the string pool, the
//! resource map and start-element chunks. Everything else is skipped.

use bh_core::ports::ManifestError;

const RES_XML_TYPE: u16 = 0x0003;
const RES_STRING_POOL_TYPE: u16 = 0x0001;
const RES_XML_RESOURCE_MAP_TYPE: u16 = 0x0180;
const RES_XML_START_ELEMENT_TYPE: u16 = 0x0102;

const STRING_POOL_UTF8_FLAG: u32 = 1 << 8;
const TYPE_STRING: u8 = 0x03;
const NO_INDEX: u32 = 0xFFFF_FFFF;

/// `android:name` in the framework resource table.
const ANDROID_NAME_RES_ID: u32 = 0x0101_0003;

/// Facts read from the manifest, before qualification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestFacts {
    pub package: Option<String>,
    pub first_activity: Option<String>,
}

pub fn decode_manifest(bytes: &[u8]) -> Result<ManifestFacts, ManifestError> {
    let doc = Cursor::new(bytes);
    if doc.u16_at(0)? != RES_XML_TYPE {
        return Err(malformed("not a binary XML document"));
    }
    let header_size = doc.u16_at(2)? as usize;
    let end = doc.u32_at(4)? as usize;
    if end > bytes.len() {
        return Err(malformed(format!(
            "document declares {end} bytes but only {} are present",
            bytes.len()
        )));
    }

    let mut strings = StringPool::default();
    let mut resource_ids: Vec<u32> = Vec::new();
    let mut facts = ManifestFacts::default();
    let mut seen_activity = false;

    let mut offset = header_size;
    while offset + 8 <= end {
        let chunk_type = doc.u16_at(offset)?;
        let chunk_header = doc.u16_at(offset + 2)? as usize;
        let chunk_size = doc.u32_at(offset + 4)? as usize;
        if chunk_size < 8 || chunk_header > chunk_size || offset + chunk_size > end {
            return Err(malformed(format!("bad chunk at offset {offset}")));
        }
        let chunk = Cursor::new(&bytes[offset..offset + chunk_size]);

        match chunk_type {
            RES_STRING_POOL_TYPE => strings = StringPool::parse(&chunk)?,
            RES_XML_RESOURCE_MAP_TYPE => {
                resource_ids = (chunk_header..chunk_size)
                    .step_by(4)
                    .map(|at| chunk.u32_at(at))
                    .collect::<Result<_, _>>()?;
            }
            RES_XML_START_ELEMENT_TYPE => {
                let element = StartElement::parse(&chunk, chunk_header, &strings)?;
                match element.name {
                    "manifest" if facts.package.is_none() => {
                        facts.package = element
                            .attributes
                            .iter()
                            .find(|a| a.ns.is_none() && a.name == "package")
                            .and_then(|a| a.value.clone());
                    }
                    "activity" if !seen_activity => {
                        seen_activity = true;
                        facts.first_activity = element
                            .attributes
                            .iter()
                            .find(|a| a.is_android_name(&resource_ids))
                            .and_then(|a| a.value.clone());
                    }
                    _ => {}
                }
                if facts.package.is_some() && seen_activity {
                    break;
                }
            }
            _ => {}
        }

        offset += chunk_size;
    }

    Ok(facts)
}

fn malformed(msg: impl Into<String>) -> ManifestError {
    ManifestError::Malformed(msg.into())
}

struct Cursor<'a> {
    buf: &'a [u8],
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn bytes(&self, at: usize, len: usize) -> Result<&'a [u8], ManifestError> {
        at.checked_add(len)
            .and_then(|end| self.buf.get(at..end))
            .ok_or_else(|| malformed(format!("read of {len} bytes at {at} out of bounds")))
    }

    fn u8_at(&self, at: usize) -> Result<u8, ManifestError> {
        Ok(self.bytes(at, 1)?[0])
    }

    fn u16_at(&self, at: usize) -> Result<u16, ManifestError> {
        let b = self.bytes(at, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32_at(&self, at: usize) -> Result<u32, ManifestError> {
        let b = self.bytes(at, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

#[derive(Default)]
struct StringPool {
    strings: Vec<String>,
}

impl StringPool {
    fn parse(chunk: &Cursor<'_>) -> Result<Self, ManifestError> {
        let header_size = chunk.u16_at(2)? as usize;
        let count = chunk.u32_at(8)? as usize;
        let flags = chunk.u32_at(16)?;
        let strings_start = chunk.u32_at(20)? as usize;
        let utf8 = flags & STRING_POOL_UTF8_FLAG != 0;

        let mut strings = Vec::with_capacity(count.min(4096));
        for i in 0..count {
            let offset = chunk.u32_at(header_size + i * 4)? as usize;
            let at = strings_start + offset;
            let value = if utf8 {
                read_utf8(chunk, at)?
            } else {
                read_utf16(chunk, at)?
            };
            strings.push(value);
        }
        Ok(Self { strings })
    }

    fn get(&self, index: u32) -> Option<&str> {
        if index == NO_INDEX {
            return None;
        }
        self.strings.get(index as usize).map(String::as_str)
    }
}

/// Length prefix of a UTF-8 pool entry: one byte, or two with the high bit set.
fn read_utf8_len(chunk: &Cursor<'_>, at: usize) -> Result<(usize, usize), ManifestError> {
    let first = chunk.u8_at(at)? as usize;
    if first & 0x80 != 0 {
        let second = chunk.u8_at(at + 1)? as usize;
        Ok((((first & 0x7F) << 8) | second, 2))
    } else {
        Ok((first, 1))
    }
}

fn read_utf8(chunk: &Cursor<'_>, at: usize) -> Result<String, ManifestError> {
    let (_chars, skip) = read_utf8_len(chunk, at)?;
    let (len, skip2) = read_utf8_len(chunk, at + skip)?;
    let raw = chunk.bytes(at + skip + skip2, len)?;
    Ok(String::from_utf8_lossy(raw).into_owned())
}

fn read_utf16(chunk: &Cursor<'_>, at: usize) -> Result<String, ManifestError> {
    let first = chunk.u16_at(at)? as usize;
    let (len, skip) = if first & 0x8000 != 0 {
        let second = chunk.u16_at(at + 2)? as usize;
        ((((first & 0x7FFF) << 16) | second), 4)
    } else {
        (first, 2)
    };
    let raw = chunk.bytes(at + skip, len * 2)?;
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    Ok(String::from_utf16_lossy(&units))
}

struct Attribute<'p> {
    ns: Option<&'p str>,
    name_index: u32,
    name: &'p str,
    value: Option<String>,
}

impl Attribute<'_> {
    fn is_android_name(&self, resource_ids: &[u32]) -> bool {
        match resource_ids.get(self.name_index as usize) {
            Some(&id) => id == ANDROID_NAME_RES_ID,
            None => self.ns.is_some() && self.name == "name",
        }
    }
}

struct StartElement<'p> {
    name: &'p str,
    attributes: Vec<Attribute<'p>>,
}

impl<'p> StartElement<'p> {
    fn parse(
        chunk: &Cursor<'_>,
        header_size: usize,
        strings: &'p StringPool,
    ) -> Result<Self, ManifestError> {
        let ext = header_size;
        let name = strings.get(chunk.u32_at(ext + 4)?).unwrap_or("");
        let attr_start = chunk.u16_at(ext + 8)? as usize;
        let attr_size = chunk.u16_at(ext + 10)? as usize;
        let attr_count = chunk.u16_at(ext + 12)? as usize;
        if attr_count > 0 && attr_size < 20 {
            return Err(malformed(format!("attribute size {attr_size} too small")));
        }

        let mut attributes = Vec::with_capacity(attr_count);
        for i in 0..attr_count {
            let at = ext + attr_start + i * attr_size;
            let ns = strings.get(chunk.u32_at(at)?);
            let name_index = chunk.u32_at(at + 4)?;
            let raw_value = chunk.u32_at(at + 8)?;
            let data_type = chunk.u8_at(at + 15)?;
            let data = chunk.u32_at(at + 16)?;

            let value = strings
                .get(raw_value)
                .or_else(|| (data_type == TYPE_STRING).then(|| strings.get(data)).flatten())
                .map(str::to_owned);

            attributes.push(Attribute {
                ns,
                name_index,
                name: strings.get(name_index).unwrap_or(""),
                value,
            });
        }

        Ok(Self { name, attributes })
    }
}
