// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Untyped YAML document helpers used by the migrations.

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tauticord_core::TauticordError;

/// Read the file as a YAML mapping. `Ok(None)` when the file is absent.
pub fn read(number: u32, path: &Path) -> Result<Option<Mapping>, TauticordError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(failure(number, format!("cannot read {}: {e}", path.display()))),
    };
    if content.trim().is_empty() {
        return Ok(Some(Mapping::new()));
    }
    match serde_yaml::from_str::<Value>(&content) {
        Ok(Value::Mapping(m)) => Ok(Some(m)),
        Ok(Value::Null) => Ok(Some(Mapping::new())),
        Ok(_) => Err(failure(number, format!("{} is not a YAML mapping", path.display()))),
        Err(e) => Err(failure(number, format!("{} is not valid YAML: {e}", path.display()))),
    }
}

/// Overwrite the file with `document`.
pub fn write(number: u32, path: &Path, document: &Mapping) -> Result<(), TauticordError> {
    let yaml = serde_yaml::to_string(document)
        .map_err(|e| failure(number, format!("cannot serialize configuration: {e}")))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| failure(number, format!("cannot create {}: {e}", parent.display())))?;
    }
    let tmp = path.with_extension("yaml.tmp");
    std::fs::write(&tmp, yaml)
        .map_err(|e| failure(number, format!("cannot write {}: {e}", tmp.display())))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| failure(number, format!("cannot replace {}: {e}", path.display())))
}

pub fn failure(number: u32, message: impl Into<String>) -> TauticordError {
    TauticordError::Migration {
        number,
        message: message.into(),
    }
}

pub fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

/// Value at a nested key path.
pub fn get<'a>(document: &'a Mapping, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let value = document.get(key(first))?;
    if rest.is_empty() {
        Some(value)
    } else {
        get(value.as_mapping()?, rest)
    }
}

/// Mutable mapping at a nested key path.
pub fn get_mapping_mut<'a>(document: &'a mut Mapping, path: &[&str]) -> Option<&'a mut Mapping> {
    let Some((first, rest)) = path.split_first() else {
        return Some(document);
    };
    let value = document.get_mut(key(first))?;
    get_mapping_mut(value.as_mapping_mut()?, rest)
}

/// Set a value at a nested key path, creating intermediate mappings and
/// replacing non-mapping intermediates.
pub fn set(document: &mut Mapping, path: &[&str], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    if rest.is_empty() {
        document.insert(key(first), value);
        return;
    }
    let entry = document
        .entry(key(first))
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    if !entry.is_mapping() {
        *entry = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(child) = entry {
        set(child, rest, value);
    }
}

/// Library entries under `Stats.Libraries` (plain and combined).
pub fn library_entries_mut(document: &mut Mapping) -> Vec<&mut Mapping> {
    let Some(libraries) = get_mapping_mut(document, &["Stats", "Libraries"]) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (k, v) in libraries.iter_mut() {
        if k.as_str() == Some("Libraries") || k.as_str() == Some("CombinedLibraries") {
            if let Value::Sequence(entries) = v {
                out.extend(entries.iter_mut().filter_map(Value::as_mapping_mut));
            }
        }
    }
    out
}

/// Read-only view of the library entries.
pub fn library_entries(document: &Mapping) -> Vec<&Mapping> {
    ["Libraries", "CombinedLibraries"]
        .iter()
        .filter_map(|list| get(document, &["Stats", "Libraries", list]))
        .filter_map(Value::as_sequence)
        .flat_map(|entries| entries.iter().filter_map(Value::as_mapping))
        .collect()
}

/// The default gauge block written by migrations.
pub fn default_gauge() -> Mapping {
    let mut gauge = Mapping::new();
    gauge.insert(key("Enable"), Value::Bool(false));
    gauge.insert(key("UseEmojis"), Value::Bool(true));
    gauge.insert(key("CustomEmoji"), key(""));
    gauge.insert(key("CustomName"), key(""));
    gauge.insert(key("VoiceChannelID"), Value::Number(0.into()));
    gauge
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_creates_intermediate_mappings() {
        let mut doc = Mapping::new();
        set(&mut doc, &["Display", "Time", "Use24HourTime"], Value::Bool(true));
        assert_eq!(
            get(&doc, &["Display", "Time", "Use24HourTime"]),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn set_replaces_scalar_intermediates() {
        let mut doc = Mapping::new();
        doc.insert(key("Discord"), key("oops"));
        set(&mut doc, &["Discord", "BotToken"], key("t"));
        assert_eq!(get(&doc, &["Discord", "BotToken"]), Some(&key("t")));
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read(1, &dir.path().join("absent.yaml")).unwrap().is_none());
    }

    #[test]
    fn non_mapping_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tauticord.yaml");
        std::fs::write(&path, "- just\n- a list\n").unwrap();
        assert!(read(2, &path).is_err());
    }
}
