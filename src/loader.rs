use std::collections::HashMap;
use std::io::{Read, Seek};
use std::rc::Rc;

use crate::archive::{class_entry_name, JarFile};
use crate::class::ClassFile;

/// Resolves internal class names against the archive, parsing each class
/// at most once. Missing and unparseable classes are cached as tombstones
/// so the resolver treats them as external without re-probing the archive.
pub struct ClassLoader<R: Read + Seek> {
    jar: JarFile<R>,
    cache: HashMap<String, Option<Rc<ClassFile>>>,
}

impl<R: Read + Seek> ClassLoader<R> {
    pub fn new(jar: JarFile<R>) -> ClassLoader<R> {
        ClassLoader {
            jar,
            cache: HashMap::new(),
        }
    }

    pub fn load(&mut self, internal_name: &str) -> Option<Rc<ClassFile>> {
        let entry = class_entry_name(internal_name);
        if let Some(cached) = self.cache.get(&entry) {
            return cached.clone();
        }
        let loaded = self.load_uncached(internal_name, &entry);
        self.cache.insert(entry, loaded.clone());
        loaded
    }

    fn load_uncached(&mut self, internal_name: &str, entry: &str) -> Option<Rc<ClassFile>> {
        if !self.jar.contains(entry) {
            tracing::debug!("{}: not in archive, treating as external", internal_name);
            return None;
        }
        let data = match self.jar.read_entry(entry) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", entry, e);
                return None;
            }
        };
        match ClassFile::parse(&data) {
            Ok(class) => Some(Rc::new(class)),
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", entry, e);
                None
            }
        }
    }
}
