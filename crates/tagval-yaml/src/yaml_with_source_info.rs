//! YAML nodes with source location tracking.

use crate::SourceInfo;
use yaml_rust2::Yaml;

/// The structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Scalar => "scalar",
            NodeKind::Sequence => "sequence",
            NodeKind::Mapping => "mapping",
        }
    }
}

/// A YAML value with source location information.
///
/// Holds the owned `yaml-rust2` value for code that only needs data, plus a
/// parallel children structure carrying positions for every descendant.
/// Mapping entries keep the order in which they appear in the document.
#[derive(Debug, Clone)]
pub struct YamlWithSourceInfo {
    /// The complete yaml-rust2 value (owned).
    pub yaml: Yaml,

    /// Source location for this node.
    pub source_info: SourceInfo,

    /// Explicit YAML tag suffix (e.g. `str` for `!!str`) and where it was seen.
    pub tag: Option<(String, SourceInfo)>,

    children: Children,
}

#[derive(Debug, Clone)]
enum Children {
    /// Literal text of a scalar, as written (without quotes)
    Scalar(String),

    Sequence(Vec<YamlWithSourceInfo>),

    Mapping(Vec<YamlHashEntry>),
}

/// A key-value pair in a YAML mapping with source tracking.
#[derive(Debug, Clone)]
pub struct YamlHashEntry {
    pub key: YamlWithSourceInfo,
    pub value: YamlWithSourceInfo,

    /// Source location of the entire entry (key start to value end)
    pub entry_span: SourceInfo,
}

impl YamlWithSourceInfo {
    /// Create a scalar node from its literal text and resolved value.
    pub fn new_scalar(text: impl Into<String>, yaml: Yaml, source_info: SourceInfo) -> Self {
        Self {
            yaml,
            source_info,
            tag: None,
            children: Children::Scalar(text.into()),
        }
    }

    pub fn new_sequence(
        yaml: Yaml,
        source_info: SourceInfo,
        items: Vec<YamlWithSourceInfo>,
    ) -> Self {
        Self {
            yaml,
            source_info,
            tag: None,
            children: Children::Sequence(items),
        }
    }

    pub fn new_mapping(yaml: Yaml, source_info: SourceInfo, entries: Vec<YamlHashEntry>) -> Self {
        Self {
            yaml,
            source_info,
            tag: None,
            children: Children::Mapping(entries),
        }
    }

    /// Attach an explicit tag to this node.
    pub fn with_tag(mut self, tag: Option<(String, SourceInfo)>) -> Self {
        self.tag = tag;
        self
    }

    /// Move this node to another location, keeping its content.
    ///
    /// Used for aliases so that diagnostics point at the alias, not the anchor.
    pub fn relocated(mut self, source_info: SourceInfo) -> Self {
        self.source_info = source_info;
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self.children {
            Children::Scalar(_) => NodeKind::Scalar,
            Children::Sequence(_) => NodeKind::Sequence,
            Children::Mapping(_) => NodeKind::Mapping,
        }
    }

    /// 1-based line of the node's first character.
    pub fn line(&self) -> usize {
        self.source_info.line
    }

    /// 1-based column of the node's first character.
    pub fn column(&self) -> usize {
        self.source_info.col
    }

    pub fn is_scalar(&self) -> bool {
        self.kind() == NodeKind::Scalar
    }

    pub fn is_sequence(&self) -> bool {
        self.kind() == NodeKind::Sequence
    }

    pub fn is_mapping(&self) -> bool {
        self.kind() == NodeKind::Mapping
    }

    /// Literal text of a scalar node, or None for containers.
    ///
    /// This is the text as written in the document, so `age: 030` yields
    /// `"030"` even though the resolved value is the integer 30.
    pub fn scalar_text(&self) -> Option<&str> {
        match &self.children {
            Children::Scalar(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[YamlWithSourceInfo]> {
        match &self.children {
            Children::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[YamlHashEntry]> {
        match &self.children {
            Children::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Mapping entries in document order; empty for scalars and sequences.
    pub fn entries(&self) -> impl Iterator<Item = &YamlHashEntry> {
        self.as_mapping().unwrap_or_default().iter()
    }

    /// Look up a mapping value by the literal text of a scalar key.
    ///
    /// When a key is repeated, the last occurrence wins.
    pub fn get_hash_value(&self, key: &str) -> Option<&YamlWithSourceInfo> {
        self.entries()
            .filter(|entry| entry.key.scalar_text() == Some(key))
            .map(|entry| &entry.value)
            .last()
    }

    pub fn get_sequence_item(&self, index: usize) -> Option<&YamlWithSourceInfo> {
        self.as_sequence().and_then(|items| items.get(index))
    }

    /// Number of children (sequence length or mapping entry count).
    pub fn len(&self) -> usize {
        match &self.children {
            Children::Scalar(_) => 0,
            Children::Sequence(items) => items.len(),
            Children::Mapping(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl YamlHashEntry {
    pub fn new(key: YamlWithSourceInfo, value: YamlWithSourceInfo) -> Self {
        let start = key.source_info.offset;
        let end = value.source_info.end_offset().max(key.source_info.end_offset());
        let entry_span = key.source_info.clone().with_len(end.saturating_sub(start));
        Self {
            key,
            value,
            entry_span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(text: &str, line: usize, col: usize) -> YamlWithSourceInfo {
        YamlWithSourceInfo::new_scalar(
            text,
            Yaml::String(text.into()),
            SourceInfo::new(None, 0, line, col, text.len()),
        )
    }

    #[test]
    fn test_scalar_creation() {
        let node = scalar("test", 3, 4);

        assert_eq!(node.kind(), NodeKind::Scalar);
        assert_eq!(node.scalar_text(), Some("test"));
        assert_eq!((node.line(), node.column()), (3, 4));
        assert_eq!(node.len(), 0);
        assert!(node.as_mapping().is_none());
    }

    #[test]
    fn test_sequence_creation() {
        let yaml = Yaml::Array(vec![Yaml::String("a".into()), Yaml::String("b".into())]);
        let node = YamlWithSourceInfo::new_sequence(
            yaml,
            SourceInfo::default(),
            vec![scalar("a", 1, 1), scalar("b", 2, 1)],
        );

        assert!(node.is_sequence());
        assert_eq!(node.len(), 2);
        assert_eq!(node.get_sequence_item(1).and_then(|n| n.scalar_text()), Some("b"));
        assert!(node.get_sequence_item(2).is_none());
        assert_eq!(node.entries().count(), 0);
    }

    #[test]
    fn test_mapping_lookup_uses_last_duplicate() {
        let entries = vec![
            YamlHashEntry::new(scalar("k", 1, 1), scalar("first", 1, 4)),
            YamlHashEntry::new(scalar("k", 2, 1), scalar("second", 2, 4)),
        ];
        let node = YamlWithSourceInfo::new_mapping(Yaml::Null, SourceInfo::default(), entries);

        assert!(node.is_mapping());
        assert_eq!(
            node.get_hash_value("k").and_then(|n| n.scalar_text()),
            Some("second")
        );
        assert!(node.get_hash_value("missing").is_none());
    }

    #[test]
    fn test_relocated_keeps_content() {
        let node = scalar("x", 1, 1).relocated(SourceInfo::new(None, 9, 4, 2, 1));
        assert_eq!(node.scalar_text(), Some("x"));
        assert_eq!((node.line(), node.column()), (4, 2));
    }
}
