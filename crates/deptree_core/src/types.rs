use serde::Deserialize;
use std::collections::HashMap;

/// Whether converted module paths keep their original casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    /// Fold converted paths to lowercase.
    Lower,
    /// Keep the casing found in the input paths.
    Preserve,
}

/// Raw dependency graph as read from stdin: each analyzed file path mapped
/// to the file paths it depends on.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FileGraph(HashMap<String, Vec<String>>);

impl FileGraph {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Analyzed files with their dependency lists.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.0.iter().map(|(file, deps)| (file.as_str(), deps.as_slice()))
    }

    /// Every path mentioned anywhere in the graph, keys and values alike.
    pub fn all_paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().flat_map(|(file, deps)| {
            std::iter::once(file.as_str()).chain(deps.iter().map(String::as_str))
        })
    }
}

impl From<HashMap<String, Vec<String>>> for FileGraph {
    fn from(files: HashMap<String, Vec<String>>) -> Self {
        Self(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_graph_deserializes_from_plain_mapping() {
        let graph: FileGraph =
            serde_json::from_str(r#"{"src/a.py": ["src/b.py"], "src/b.py": []}"#).unwrap();
        assert_eq!(graph.len(), 2);
        assert!(!graph.is_empty());
    }

    #[test]
    fn test_all_paths_yields_keys_and_values() {
        let graph: FileGraph =
            serde_json::from_str(r#"{"src/a.py": ["src/b.py", "src/c.py"]}"#).unwrap();
        let mut paths: Vec<&str> = graph.all_paths().collect();
        paths.sort_unstable();
        assert_eq!(paths, ["src/a.py", "src/b.py", "src/c.py"]);
    }

    #[test]
    fn test_from_map() {
        let mut files = HashMap::new();
        files.insert("main.py".to_string(), vec!["util.py".to_string()]);
        let graph = FileGraph::from(files);
        assert_eq!(graph.iter().count(), 1);
    }
}
