//! Generated implementor fragments: one per documented trait.

mod script;

use crate::{Error, Handoff, ImplementorBoard, ImplementorRegistry, Result};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Fully qualified path of a documented trait, e.g. `core::marker::StructuralPartialEq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraitPath {
    module: Vec<String>,
    name: String,
}

impl TraitPath {
    pub fn new<I, S>(module: I, name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            module: module.into_iter().map(Into::into).collect(),
            name: name.into(),
        }
    }

    /// Splits a `::`-separated path. The last segment is the trait name.
    pub fn parse(path: &str) -> Self {
        let mut segments: Vec<String> = path.split("::").map(str::to_owned).collect();
        // `split` always yields at least one segment.
        let name = segments.pop().unwrap_or_default();
        Self {
            module: segments,
            name,
        }
    }

    /// Recovers the trait path from the location of a generated script,
    /// e.g. `doc/implementors/core/marker/trait.StructuralPartialEq.js`.
    ///
    /// Directories up to and including the last `implementors` component are ignored.
    pub fn from_script_path(path: &Path) -> Result<Self> {
        let invalid = || Error::InvalidScriptPath(path.to_owned());
        let name = path
            .file_name()
            .and_then(OsStr::to_str)
            .and_then(|file| file.strip_prefix("trait."))
            .and_then(|file| file.strip_suffix(".js"))
            .filter(|name| !name.is_empty())
            .ok_or_else(invalid)?;

        let mut module = Vec::new();
        for component in path.parent().into_iter().flat_map(Path::components) {
            if let Component::Normal(segment) = component {
                let segment = segment.to_str().ok_or_else(invalid)?;
                if segment == "implementors" {
                    module.clear();
                } else {
                    module.push(segment.to_owned());
                }
            }
        }
        Ok(Self {
            module,
            name: name.to_owned(),
        })
    }

    /// Where the generator puts this trait's implementors script, relative to the doc root.
    pub fn script_path(&self) -> PathBuf {
        let mut path = PathBuf::from("implementors");
        path.extend(&self.module);
        path.push(format!("trait.{}.js", self.name));
        path
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn module(&self) -> &[String] {
        &self.module
    }
}

impl fmt::Display for TraitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.module {
            write!(f, "{segment}::")?;
        }
        f.write_str(&self.name)
    }
}

/// The implementors of one trait, as emitted at documentation build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    trait_path: TraitPath,
    implementors: ImplementorRegistry,
}

impl Fragment {
    pub fn new(trait_path: TraitPath, implementors: ImplementorRegistry) -> Self {
        Self {
            trait_path,
            implementors,
        }
    }

    /// Parses a generated implementors script.
    ///
    /// Only the `implementors["<library>"] = [...];` lines carry data; the surrounding
    /// wrapper and registration code are skipped. Descriptor contents are taken as they are.
    pub fn from_script(trait_path: TraitPath, source: &str) -> Result<Self> {
        Ok(Self::new(trait_path, script::parse(source)?))
    }

    /// Reads a generated script from disk, taking the trait path from the file's location.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let trait_path = TraitPath::from_script_path(path)?;
        let source = std::fs::read_to_string(path)?;
        Self::from_script(trait_path, &source)
    }

    /// Renders this fragment in the generator's script format.
    pub fn to_script(&self) -> Result<String> {
        script::render(&self.implementors)
    }

    #[inline]
    pub fn trait_path(&self) -> &TraitPath {
        &self.trait_path
    }

    #[inline]
    pub fn implementors(&self) -> &ImplementorRegistry {
        &self.implementors
    }

    pub fn into_implementors(self) -> ImplementorRegistry {
        self.implementors
    }

    /// Makes this fragment's single hand-off attempt: straight to the sink when the page
    /// has one, into the pending buffer when it doesn't.
    pub fn load(self, board: &mut ImplementorBoard) -> Handoff {
        let libraries = self.implementors.len();
        let handoff = board.register_implementors(self.implementors);
        tracing::debug!(
            trait_path = %self.trait_path,
            libraries,
            ?handoff,
            "loaded implementors fragment"
        );
        handoff
    }
}
