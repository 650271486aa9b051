//! JAR access: a ZIP archive with a prebuilt entry-name index and the
//! manifest conventions layered on top.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use memmap2::Mmap;
use zip::ZipArchive;

use crate::{lint_err, Result};

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// An open JAR. Generic over the underlying reader so analyses can run
/// against in-memory archives; the file-path opener is mmap-backed.
pub struct JarFile<R: Read + Seek> {
    zip: ZipArchive<R>,
    names: HashSet<String>,
    location: String,
}

pub type MmapJarFile = JarFile<Cursor<Mmap>>;

impl JarFile<Cursor<Mmap>> {
    pub fn open(path: &Path) -> Result<MmapJarFile> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        JarFile::with_location(Cursor::new(mmap), path.display().to_string())
    }
}

impl<R: Read + Seek> JarFile<R> {
    pub fn from_reader(reader: R) -> Result<JarFile<R>> {
        JarFile::with_location(reader, "[in-memory]".to_string())
    }

    fn with_location(reader: R, location: String) -> Result<JarFile<R>> {
        let zip = ZipArchive::new(reader)?;
        let names = zip.file_names().map(str::to_string).collect();
        Ok(JarFile {
            zip,
            names,
            location,
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.names.contains(entry)
    }

    /// Streams one entry fully into an owned buffer.
    pub fn read_entry(&mut self, entry: &str) -> Result<Vec<u8>> {
        if !self.names.contains(entry) {
            return lint_err!(EntryMissing, entry.to_string());
        }
        let mut file = self.zip.by_name(entry)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// The manifest's `Main-Class` attribute, as a dotted class name.
    pub fn main_class(&mut self) -> Result<String> {
        if !self.names.contains(MANIFEST_PATH) {
            return lint_err!(ManifestMissing);
        }
        let manifest = self.read_entry(MANIFEST_PATH)?;
        let manifest = String::from_utf8_lossy(&manifest);
        match parse_main_class(&manifest) {
            Some(name) => Ok(name),
            None => lint_err!(MainClassMissing),
        }
    }
}

/// Archive entry for an internal class name.
pub fn class_entry_name(internal_name: &str) -> String {
    format!("{}.class", internal_name)
}

/// Internal (slash-delimited) form of a dotted class name.
pub fn internal_name(dotted: &str) -> String {
    dotted.replace('.', "/")
}

fn parse_main_class(manifest: &str) -> Option<String> {
    for line in manifest.split('\n') {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if key.trim() == "Main-Class" {
            return Some(value.trim().to_string());
        }
    }
    None
}
