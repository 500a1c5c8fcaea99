//! Binary manifest and APK builders for tests.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";

/// Emits the chunk layout `aapt2` produces, for a handful of elements.
pub struct AxmlBuilder {
    utf8: bool,
    /// Index 0 is always `name`, mapped to `android:name`.
    strings: Vec<String>,
    body: Vec<u8>,
}

impl AxmlBuilder {
    pub fn new(utf8: bool) -> Self {
        Self {
            utf8,
            strings: vec!["name".to_string()],
            body: Vec::new(),
        }
    }

    fn intern(&mut self, s: &str) -> u32 {
        if let Some(i) = self.strings.iter().skip(1).position(|x| x == s) {
            return (i + 1) as u32;
        }
        self.strings.push(s.to_string());
        (self.strings.len() - 1) as u32
    }

    pub fn start(&mut self, name: &str, attrs: &[(Option<&str>, &str, &str)]) {
        let name_idx = self.intern(name);
        let encoded: Vec<[u32; 3]> = attrs
            .iter()
            .map(|(ns, attr, value)| {
                let ns_idx = ns.map(|ns| self.intern(ns)).unwrap_or(u32::MAX);
                let attr_idx = if *ns == Some(ANDROID_NS) && *attr == "name" {
                    0
                } else {
                    self.intern(attr)
                };
                [ns_idx, attr_idx, self.intern(value)]
            })
            .collect();

        let size = 16 + 20 + 20 * encoded.len();
        put_u16(&mut self.body, 0x0102);
        put_u16(&mut self.body, 16);
        put_u32(&mut self.body, size as u32);
        put_u32(&mut self.body, 1); // line
        put_u32(&mut self.body, u32::MAX); // comment
        put_u32(&mut self.body, u32::MAX); // ns
        put_u32(&mut self.body, name_idx);
        put_u16(&mut self.body, 20); // attributeStart
        put_u16(&mut self.body, 20); // attributeSize
        put_u16(&mut self.body, encoded.len() as u16);
        put_u16(&mut self.body, 0);
        put_u16(&mut self.body, 0);
        put_u16(&mut self.body, 0);
        for [ns, attr, value] in encoded {
            put_u32(&mut self.body, ns);
            put_u32(&mut self.body, attr);
            put_u32(&mut self.body, value);
            put_u16(&mut self.body, 8);
            self.body.push(0);
            self.body.push(0x03); // TYPE_STRING
            put_u32(&mut self.body, value);
        }
    }

    pub fn end(&mut self, name: &str) {
        let name_idx = self.intern(name);
        put_u16(&mut self.body, 0x0103);
        put_u16(&mut self.body, 16);
        put_u32(&mut self.body, 24);
        put_u32(&mut self.body, 1);
        put_u32(&mut self.body, u32::MAX);
        put_u32(&mut self.body, u32::MAX);
        put_u32(&mut self.body, name_idx);
    }

    pub fn build(self) -> Vec<u8> {
        let pool = self.string_pool();
        let mut res_map = Vec::new();
        put_u16(&mut res_map, 0x0180);
        put_u16(&mut res_map, 8);
        put_u32(&mut res_map, 12);
        put_u32(&mut res_map, 0x0101_0003);

        let total = 8 + pool.len() + res_map.len() + self.body.len();
        let mut out = Vec::with_capacity(total);
        put_u16(&mut out, 0x0003);
        put_u16(&mut out, 8);
        put_u32(&mut out, total as u32);
        out.extend(pool);
        out.extend(res_map);
        out.extend(self.body);
        out
    }

    fn string_pool(&self) -> Vec<u8> {
        let mut data = Vec::new();
        let mut offsets = Vec::new();
        for s in &self.strings {
            offsets.push(data.len() as u32);
            if self.utf8 {
                data.push(s.chars().count() as u8);
                data.push(s.len() as u8);
                data.extend_from_slice(s.as_bytes());
                data.push(0);
            } else {
                let units: Vec<u16> = s.encode_utf16().collect();
                put_u16(&mut data, units.len() as u16);
                for unit in units {
                    put_u16(&mut data, unit);
                }
                put_u16(&mut data, 0);
            }
        }
        while data.len() % 4 != 0 {
            data.push(0);
        }

        let header = 28;
        let strings_start = header + 4 * self.strings.len();
        let size = strings_start + data.len();
        let mut out = Vec::with_capacity(size);
        put_u16(&mut out, 0x0001);
        put_u16(&mut out, header as u16);
        put_u32(&mut out, size as u32);
        put_u32(&mut out, self.strings.len() as u32);
        put_u32(&mut out, 0); // styles
        put_u32(&mut out, if self.utf8 { 1 << 8 } else { 0 });
        put_u32(&mut out, strings_start as u32);
        put_u32(&mut out, 0);
        for offset in offsets {
            put_u32(&mut out, offset);
        }
        out.extend(data);
        out
    }
}

/// `<manifest package=..><application><activity android:name=../>..</application></manifest>`
pub fn manifest_bytes(package: &str, activities: &[&str], utf8: bool) -> Vec<u8> {
    let mut builder = AxmlBuilder::new(utf8);
    builder.start("manifest", &[(None, "package", package)]);
    builder.start("application", &[]);
    for activity in activities {
        builder.start("activity", &[(Some(ANDROID_NS), "name", activity)]);
        builder.end("activity");
    }
    builder.end("application");
    builder.end("manifest");
    builder.build()
}

/// A stored (uncompressed) zip with the given entries.
pub fn apk_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, bytes) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}
