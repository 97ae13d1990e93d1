use crate::{Error, ImplementorRegistry, LibraryImplementorList, Result};

const PROLOGUE: &str = "(function() {var implementors = {};";
const ENTRY_PREFIX: &str = "implementors[";
const EPILOGUE: &str = "if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()";

pub(super) fn parse(source: &str) -> Result<ImplementorRegistry> {
    let mut registry = ImplementorRegistry::new();
    for (index, line) in source.lines().enumerate() {
        let Some(entry) = line.trim().strip_prefix(ENTRY_PREFIX) else {
            continue;
        };
        let (library, implementors) = parse_entry(entry, index + 1)?;
        // Later assignments to the same library win, as they would when the script runs.
        registry.insert_library(library, implementors);
    }
    Ok(registry)
}

/// Parses `"<library>"] = [...];`, the part of an entry line after `implementors[`.
fn parse_entry(entry: &str, line: usize) -> Result<(String, LibraryImplementorList)> {
    let json_error = |source| Error::Json { line, source };

    let mut stream = serde_json::Deserializer::from_str(entry).into_iter::<String>();
    let library = match stream.next() {
        Some(library) => library.map_err(json_error)?,
        None => return Err(Error::MalformedEntry { line }),
    };
    let implementors = entry[stream.byte_offset()..]
        .trim_start()
        .strip_prefix(']')
        .and_then(|rest| rest.trim_start().strip_prefix('='))
        .and_then(|rest| rest.trim().strip_suffix(';'))
        .ok_or(Error::MalformedEntry { line })?;
    let implementors = serde_json::from_str(implementors).map_err(json_error)?;
    Ok((library, implementors))
}

pub(super) fn render(registry: &ImplementorRegistry) -> Result<String> {
    let mut script = String::from(PROLOGUE);
    script.push('\n');
    for (library, implementors) in registry {
        let library = serde_json::to_string(library).map_err(Error::Serialize)?;
        let implementors = serde_json::to_string(implementors).map_err(Error::Serialize)?;
        script.push_str(&format!("{ENTRY_PREFIX}{library}] = {implementors};\n"));
    }
    script.push_str(EPILOGUE);
    Ok(script)
}
