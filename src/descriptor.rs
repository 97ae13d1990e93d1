use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// One fact: "this type implements the documented trait in some library".
///
/// All three fields are opaque build output. `text` is the rendered impl signature
/// (already HTML-escaped by the generator), and `types` are the type names the impl
/// mentions, used by the viewer to avoid listing the same synthetic impl twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImplementorDescriptor {
    text: String,
    #[serde(default)]
    synthetic: bool,
    #[serde(default)]
    types: Vec<String>,
}

impl ImplementorDescriptor {
    pub fn new(text: impl Into<String>, synthetic: bool, types: Vec<String>) -> Self {
        Self {
            text: text.into(),
            synthetic,
            types,
        }
    }

    /// Human-readable impl signature.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// `true` for impls synthesized by the compiler (auto traits, blanket impls)
    /// rather than written out by the library author.
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    #[inline]
    pub fn types(&self) -> &[String] {
        &self.types
    }
}

/// Implementors from a single library, in documentation display order.
pub type LibraryImplementorList = Vec<ImplementorDescriptor>;

/// Maps library names to the implementors each library contributes for one trait.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImplementorRegistry {
    libraries: BTreeMap<String, LibraryImplementorList>,
}

impl ImplementorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the implementor list for `library`.
    /// A library that was already present has its list replaced; the old list is returned.
    pub fn insert_library(
        &mut self,
        library: impl Into<String>,
        implementors: LibraryImplementorList,
    ) -> Option<LibraryImplementorList> {
        self.libraries.insert(library.into(), implementors)
    }

    pub fn library(&self, name: &str) -> Option<&[ImplementorDescriptor]> {
        self.libraries.get(name).map(Vec::as_slice)
    }

    /// Iterates over libraries by name. Each library's implementors keep their insertion order.
    pub fn iter(&self) -> RegistryIter<'_> {
        RegistryIter {
            inner: self.libraries.iter(),
        }
    }

    /// Number of libraries.
    #[inline]
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Total number of descriptors across all libraries.
    pub fn implementor_count(&self) -> usize {
        self.libraries.values().map(Vec::len).sum()
    }
}

pub struct RegistryIter<'a> {
    inner: btree_map::Iter<'a, String, LibraryImplementorList>,
}

impl<'a> Iterator for RegistryIter<'a> {
    type Item = (&'a str, &'a [ImplementorDescriptor]);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(library, list)| (library.as_str(), list.as_slice()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for RegistryIter<'_> {}

impl<'a> IntoIterator for &'a ImplementorRegistry {
    type Item = (&'a str, &'a [ImplementorDescriptor]);
    type IntoIter = RegistryIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<L: Into<String>> FromIterator<(L, LibraryImplementorList)> for ImplementorRegistry {
    fn from_iter<I: IntoIterator<Item = (L, LibraryImplementorList)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (library, implementors) in iter {
            registry.insert_library(library, implementors);
        }
        registry
    }
}

/// Builds an [`ImplementorRegistry`] from literal data, in the same shape as the table
/// embedded in a generated implementors script.
///
/// ```
/// use doc_implementors::implementors;
///
/// let registry = implementors! {
///     "byteorder" => [
///         { text: "impl StructuralPartialEq for BigEndian", synthetic: false, types: [] },
///         { text: "impl StructuralPartialEq for LittleEndian", synthetic: false, types: [] },
///     ],
/// };
/// assert_eq!(registry.implementor_count(), 2);
/// ```
#[macro_export]
macro_rules! implementors {
    ($(
        $library:expr => [$(
            { text: $text:expr, synthetic: $synthetic:expr, types: [$($ty:expr),* $(,)?] $(,)? }
        ),* $(,)?]
    ),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut registry = $crate::ImplementorRegistry::new();
        $(
            registry.insert_library(
                $library,
                ::std::vec![$(
                    $crate::ImplementorDescriptor::new(
                        $text,
                        $synthetic,
                        ::std::vec![$(::std::string::String::from($ty)),*],
                    )
                ),*],
            );
        )*
        registry
    }};
}
