use crate::error::{Result, VersegrepError};
use colored::Colorize;
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A text module: a JSON object file mapping keys (verse references,
/// Strong's numbers, dictionary words, `MM.DD` dates) to marked-up text.
pub struct Module {
    name: String,
    entries: BTreeMap<String, String>,
}

impl Module {
    /// Load `<name>.json` from the data directory.
    pub fn load(data_dir: &Path, name: &str) -> Result<Self> {
        let path = data_dir.join(format!("{name}.json"));
        if !path.exists() {
            return Err(VersegrepError::UnknownModule(name.to_string()));
        }
        debug!("Loading module {} from {}", name, path.display());
        let content = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&content)?;
        let object = value
            .as_object()
            .ok_or_else(|| VersegrepError::UnknownModule(name.to_string()))?;
        let entries = object
            .iter()
            .filter_map(|(key, text)| text.as_str().map(|t| (key.clone(), t.to_string())))
            .collect();
        Ok(Module {
            name: name.to_string(),
            entries,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text for a key; missing keys yield empty text, the way the sword
    /// library renders unknown keys.
    pub fn get_text(&self, key: &str) -> &str {
        self.entries.get(key).map(String::as_str).unwrap_or("")
    }

    /// Iterate entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, text)| (key.as_str(), text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Look up a list of items in a module and return the formatted text,
/// each entry under its bolded key.
pub fn mod_lookup(data_dir: &Path, module: &str, items: &str) -> Result<String> {
    let lookup = Module::load(data_dir, module)?;

    let mut text_list = Vec::new();
    for item in items.split([' ', ',']).filter(|i| !i.is_empty()) {
        let item_text = lookup.get_text(item);
        text_list.push(format!("{}:\n{}", item.bold(), item_text));
    }
    Ok(text_list.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_module(dir: &Path, name: &str, entries: &[(&str, &str)]) {
        let object: serde_json::Map<String, Value> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        let mut file = fs::File::create(dir.join(format!("{name}.json"))).unwrap();
        write!(file, "{}", Value::Object(object)).unwrap();
    }

    #[test]
    fn load_and_get() {
        let dir = tempfile::tempdir().unwrap();
        write_module(
            dir.path(),
            "WebstersDict",
            &[("Grace", "Favor shown to the undeserving.")],
        );
        let module = Module::load(dir.path(), "WebstersDict").unwrap();
        assert_eq!(module.get_text("Grace"), "Favor shown to the undeserving.");
        assert_eq!(module.get_text("Missing"), "");
    }

    #[test]
    fn missing_module_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = Module::load(dir.path(), "Nope").err().expect("load should fail");
        match err {
            VersegrepError::UnknownModule(name) => assert_eq!(name, "Nope"),
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn lookup_formats_each_item() {
        colored::control::set_override(false);
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(), "Robinson", &[("V-AAI-3S", "Verb, aorist.")]);
        let text = mod_lookup(dir.path(), "Robinson", "V-AAI-3S").unwrap();
        assert!(text.contains("V-AAI-3S:\nVerb, aorist."));
    }
}
