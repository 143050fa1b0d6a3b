use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

/// Class id to display name mapping.
///
/// Unknown ids render as their decimal value.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    names: HashMap<u32, String>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    /// Parse a labels file.
    ///
    /// If the first line starts with a number every line is read as
    /// `<id> <name>`; otherwise each line is a name and its id is the
    /// zero-based line number.
    pub fn parse(contents: &str) -> Self {
        let lines: Vec<&str> = contents.lines().collect();
        let with_ids = lines
            .first()
            .and_then(|line| line.split_whitespace().next())
            .is_some_and(|token| token.parse::<u32>().is_ok());

        let mut names = HashMap::new();
        for (index, line) in lines.iter().enumerate() {
            if with_ids {
                let mut parts = line.trim().splitn(2, char::is_whitespace);
                let id = parts.next().and_then(|id| id.parse::<u32>().ok());
                if let (Some(id), Some(name)) = (id, parts.next()) {
                    names.insert(id, name.trim().to_string());
                }
            } else {
                names.insert(index as u32, line.trim().to_string());
            }
        }

        Self { names }
    }

    pub fn insert(&mut self, class_id: u32, name: impl Into<String>) {
        self.names.insert(class_id, name.into());
    }

    pub fn name_for(&self, class_id: u32) -> Cow<'_, str> {
        match self.names.get(&class_id) {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => Cow::Owned(class_id.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_ids() {
        let labels = LabelMap::parse("0  person\n2  car\n7  truck\n");
        assert_eq!(labels.name_for(2), "car");
        assert_eq!(labels.name_for(7), "truck");
        assert_eq!(labels.name_for(3), "3");
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn test_parse_plain_names() {
        let labels = LabelMap::parse("person\nbicycle\ncar\n");
        assert_eq!(labels.name_for(1), "bicycle");
        assert_eq!(labels.name_for(2), "car");
    }

    #[test]
    fn test_multi_word_names() {
        let labels = LabelMap::parse("9 traffic light\n");
        assert_eq!(labels.name_for(9), "traffic light");
    }

    #[test]
    fn test_empty_map_uses_ids() {
        let labels = LabelMap::new();
        assert!(labels.is_empty());
        assert_eq!(labels.name_for(5), "5");
    }
}
