use crate::error::{HelperError, Result};

/// Keys here apply to every section that does not set them itself.
pub const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    /// Keys are case-insensitive.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        let key = key.to_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key, value.to_string())),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Flat section-based key/value document, sections kept in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    /// Parse `[section]` headers and `key = value` / `key: value` lines.
    /// Ignores empty lines and comments (# or ;).
    pub fn parse(text: &str) -> Result<Self> {
        let mut doc = Document::default();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or_else(|| HelperError::ConfigParse {
                    line: line_no,
                    message: format!("unclosed section header '{line}'"),
                })?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(HelperError::ConfigParse {
                        line: line_no,
                        message: "empty section name".to_string(),
                    });
                }
                doc.section_mut(name);
                continue;
            }

            let Some(pos) = line.find(['=', ':']) else {
                return Err(HelperError::ConfigParse {
                    line: line_no,
                    message: format!("expected 'key = value', got '{line}'"),
                });
            };
            let key = line[..pos].trim();
            let value = line[pos + 1..].trim();
            if key.is_empty() {
                return Err(HelperError::ConfigParse {
                    line: line_no,
                    message: "missing key".to_string(),
                });
            }

            let Some(section) = doc.sections.last_mut() else {
                return Err(HelperError::ConfigParse {
                    line: line_no,
                    message: format!("entry '{key}' appears before any section header"),
                });
            };
            section.set(key, value);
        }

        Ok(doc)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Returns the named section, appending an empty one if it does not exist yet.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    pub fn defaults(&self) -> Option<&Section> {
        self.section(DEFAULT_SECTION)
    }

    #[cfg(test)]
    fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&format!("[{}]\n", section.name));
            for (k, v) in section.entries() {
                out.push_str(&format!("{k} = {v}\n"));
            }
            out.push('\n');
        }
        out
    }
}
