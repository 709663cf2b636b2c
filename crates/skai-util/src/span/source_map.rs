//! Source map - registry of loaded source files.

use super::FileId;

/// A single loaded source file: its display name and full content.
#[derive(Clone, Debug)]
pub struct SourceFile {
    /// Name shown in error messages (a path, or `argv` for inline source).
    pub name: String,
    /// Full source text.
    pub content: String,
}

/// Registry mapping [`FileId`]s to loaded files.
///
/// The interpreter loads a single file per run, but keeping the id
/// indirection means tokens stay small and error rendering has one place
/// to ask for names.
///
/// # Examples
///
/// ```
/// use skai_util::span::SourceMap;
///
/// let mut map = SourceMap::new();
/// let id = map.add_file("main.sk", "print(1);");
/// assert_eq!(map.name(id), "main.sk");
/// ```
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    /// Create an empty source map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return its id.
    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<String>) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(SourceFile {
            name: name.into(),
            content: content.into(),
        });
        id
    }

    /// Display name of the given file.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this map.
    pub fn name(&self, id: FileId) -> &str {
        &self.files[id.index()].name
    }

    /// Full content of the given file.
    pub fn content(&self, id: FileId) -> &str {
        &self.files[id.index()].content
    }

    /// Iterate over `(id, file)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| (FileId(i), f))
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True if no files are registered.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
