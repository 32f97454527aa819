//! Document assembly: merge single-page PDF buffers, in call order, into
//! one multi-page container.

use crate::{Error, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"Resources", b"CropBox", b"Rotate"];

/// Deepest page tree walked when resolving inherited attributes
const MAX_TREE_DEPTH: usize = 32;

/// A container written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDocument {
    pub path: PathBuf,
    pub pages: usize,
    /// Hex SHA-256 of the written bytes
    pub sha256: String,
}

/// Running output document; one page is appended per [`append`] call.
///
/// [`append`]: DocumentAssembler::append
#[derive(Debug, Default)]
pub struct DocumentAssembler {
    objects: BTreeMap<ObjectId, Object>,
    pages: Vec<ObjectId>,
    max_id: u32,
}

fn type_name(obj: &Object) -> Option<&[u8]> {
    let dict = match obj {
        Object::Dictionary(d) => d,
        Object::Stream(s) => &s.dict,
        _ => return None,
    };
    dict.get(b"Type").and_then(Object::as_name).ok()
}

fn parent_of(dict: &Dictionary) -> Option<ObjectId> {
    dict.get(b"Parent").and_then(Object::as_reference).ok()
}

impl DocumentAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages appended so far
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Load `buffer` as a standalone PDF and append its first page.
    pub fn append(&mut self, buffer: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(buffer)?;
        doc.renumber_objects_with(self.max_id + 1);

        let page_id = doc
            .get_pages()
            .values()
            .next()
            .copied()
            .ok_or_else(|| Error::AssemblyError("page buffer holds no pages".into()))?;

        let mut page = doc.get_dictionary(page_id)?.clone();
        let mut ancestor = parent_of(&page);
        let mut depth = 0;
        while let Some(id) = ancestor {
            depth += 1;
            if depth > MAX_TREE_DEPTH {
                return Err(Error::AssemblyError("page tree too deep or cyclic".into()));
            }
            let node = doc.get_dictionary(id)?;
            for key in INHERITABLE {
                if !page.has(key) {
                    if let Ok(value) = node.get(key) {
                        page.set(key.to_vec(), value.clone());
                    }
                }
            }
            ancestor = parent_of(node);
        }
        page.remove(b"Parent");

        self.max_id = self.max_id.max(doc.max_id);
        for (id, obj) in doc.objects {
            if id == page_id {
                self.objects.insert(id, Object::Dictionary(page.clone()));
                continue;
            }
            match type_name(&obj) {
                Some(b"Catalog") | Some(b"Pages") | Some(b"Page") | Some(b"ObjStm") | Some(b"XRef") => {}
                _ => {
                    self.objects.insert(id, obj);
                }
            }
        }
        self.pages.push(page_id);
        Ok(())
    }

    /// Build the page tree and catalog over every appended page
    pub fn finish(self) -> Result<Document> {
        if self.pages.is_empty() {
            return Err(Error::AssemblyError("no pages were appended".into()));
        }

        let pages_id = (self.max_id + 1, 0);
        let catalog_id = (self.max_id + 2, 0);

        let mut doc = Document::with_version("1.7");
        doc.objects = self.objects;
        for id in &self.pages {
            if let Some(Object::Dictionary(page)) = doc.objects.get_mut(id) {
                page.set("Parent", Object::Reference(pages_id));
            }
        }

        let kids: Vec<Object> = self.pages.iter().map(|id| Object::Reference(*id)).collect();
        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Kids", Object::Array(kids));
        pages.set("Count", Object::Integer(self.pages.len() as i64));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        doc.objects.insert(catalog_id, Object::Dictionary(catalog));

        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.max_id = catalog_id.0;

        doc.prune_objects();
        doc.renumber_objects();
        doc.compress();
        Ok(doc)
    }

    /// Finish and serialize the container
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        let mut doc = self.finish()?;
        let mut buf = Vec::new();
        doc.save_to(&mut buf)?;
        Ok(buf)
    }

    /// Finish, serialize and write the container to `path`
    pub fn persist(self, path: &Path) -> Result<PersistedDocument> {
        let pages = self.len();
        let bytes = self.to_bytes()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, &bytes)?;
        Ok(PersistedDocument {
            path: path.to_path_buf(),
            pages,
            sha256: hex::encode(Sha256::digest(&bytes)),
        })
    }
}

/// Number of pages in a serialized PDF
pub fn count_pages(bytes: &[u8]) -> Result<usize> {
    Ok(Document::load_mem(bytes)?.get_pages().len())
}
