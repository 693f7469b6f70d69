//! YAML parser that builds YamlWithSourceInfo trees.

use crate::{Error, Result, SourceInfo, YamlHashEntry, YamlWithSourceInfo};
use std::collections::HashMap;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::Yaml;

/// Parse YAML from a string, producing a YamlWithSourceInfo tree.
///
/// Only the first document of a multi-document stream is returned.
///
/// ```rust
/// use tagval_yaml::parse;
///
/// let yaml = parse("title: My Document").unwrap();
/// assert!(yaml.is_mapping());
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is invalid or the input holds no document.
pub fn parse(content: &str) -> Result<YamlWithSourceInfo> {
    parse_impl(content, None)
}

/// Parse YAML from a string with an associated filename.
///
/// The filename is recorded in every node's source info.
///
/// ```rust
/// use tagval_yaml::parse_file;
///
/// let yaml = parse_file("title: My Document", "config.yaml").unwrap();
/// assert_eq!(yaml.source_info.file, Some("config.yaml".into()));
/// ```
pub fn parse_file(content: &str, filename: &str) -> Result<YamlWithSourceInfo> {
    parse_impl(content, Some(filename))
}

fn parse_impl(content: &str, filename: Option<&str>) -> Result<YamlWithSourceInfo> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = TreeBuilder::new(filename);

    // false = single document only
    parser.load(&mut builder, false)?;

    builder.result()
}

/// Receives marked parser events and assembles the node tree.
struct TreeBuilder {
    filename: Option<String>,
    stack: Vec<BuildNode>,
    anchors: HashMap<usize, YamlWithSourceInfo>,
    root: Option<YamlWithSourceInfo>,
    error: Option<Error>,
}

enum BuildNode {
    Sequence {
        start_marker: Marker,
        anchor_id: usize,
        items: Vec<YamlWithSourceInfo>,
    },
    Mapping {
        start_marker: Marker,
        anchor_id: usize,
        entries: Vec<(YamlWithSourceInfo, Option<YamlWithSourceInfo>)>,
    },
}

impl TreeBuilder {
    fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(str::to_string),
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    fn result(self) -> Result<YamlWithSourceInfo> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.root.ok_or(Error::EmptyDocument)
    }

    fn fail(&mut self, message: &str) {
        if self.error.is_none() {
            self.error = Some(Error::InvalidStructure {
                message: message.to_string(),
            });
        }
    }

    fn remember(&mut self, anchor_id: usize, node: &YamlWithSourceInfo) {
        // yaml-rust2 uses 0 for "no anchor"
        if anchor_id > 0 {
            self.anchors.insert(anchor_id, node.clone());
        }
    }

    fn push_complete(&mut self, node: YamlWithSourceInfo) {
        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(BuildNode::Sequence { items, .. }) => items.push(node),
            Some(BuildNode::Mapping { entries, .. }) => match entries.last_mut() {
                Some((_, value @ None)) => *value = Some(node),
                _ => entries.push((node, None)),
            },
        }
    }

    fn source_info(&self, marker: &Marker, len: usize) -> SourceInfo {
        let info = SourceInfo::from_marker(marker, len);
        match &self.filename {
            Some(filename) => info.with_file(filename.clone()),
            None => info,
        }
    }

    fn finish_sequence(&mut self, end: &Marker) {
        let Some(BuildNode::Sequence {
            start_marker,
            anchor_id,
            items,
        }) = self.stack.pop()
        else {
            self.fail("sequence end without matching start");
            return;
        };

        let len = end.index().saturating_sub(start_marker.index());
        let source_info = self.source_info(&start_marker, len);
        let yaml = Yaml::Array(items.iter().map(|n| n.yaml.clone()).collect());

        let node = YamlWithSourceInfo::new_sequence(yaml, source_info, items);
        self.remember(anchor_id, &node);
        self.push_complete(node);
    }

    fn finish_mapping(&mut self, end: &Marker) {
        let Some(BuildNode::Mapping {
            start_marker,
            anchor_id,
            entries,
        }) = self.stack.pop()
        else {
            self.fail("mapping end without matching start");
            return;
        };

        // Block mappings report their start at the first key's indicator;
        // the key itself is where the mapping begins.
        let start = match entries.first() {
            Some((key, _)) if key.source_info.offset < start_marker.index() => {
                key.source_info.clone()
            }
            _ => self.source_info(&start_marker, 0),
        };
        let len = end.index().saturating_sub(start.offset);
        let source_info = start.with_len(len);

        let mut hash_entries = Vec::with_capacity(entries.len());
        let mut hash = yaml_rust2::yaml::Hash::new();
        for (key, value) in entries {
            let Some(value) = value else {
                self.fail("mapping key without value");
                return;
            };
            hash.insert(key.yaml.clone(), value.yaml.clone());
            hash_entries.push(YamlHashEntry::new(key, value));
        }

        let node = YamlWithSourceInfo::new_mapping(Yaml::Hash(hash), source_info, hash_entries);
        self.remember(anchor_id, &node);
        self.push_complete(node);
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}

            Event::Scalar(value, style, anchor_id, tag) => {
                let tag_suffix = tag.map(|t| t.suffix);
                let plain = matches!(style, TScalarStyle::Plain);
                let yaml = resolve_scalar(&value, plain, tag_suffix.as_deref());

                let source_info = self.source_info(&marker, value.chars().count());
                let tag = tag_suffix.map(|suffix| (suffix, source_info.clone()));
                let node = YamlWithSourceInfo::new_scalar(value, yaml, source_info).with_tag(tag);

                self.remember(anchor_id, &node);
                self.push_complete(node);
            }

            Event::SequenceStart(anchor_id, _tag) => {
                self.stack.push(BuildNode::Sequence {
                    start_marker: marker,
                    anchor_id,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => self.finish_sequence(&marker),

            Event::MappingStart(anchor_id, _tag) => {
                self.stack.push(BuildNode::Mapping {
                    start_marker: marker,
                    anchor_id,
                    entries: Vec::new(),
                });
            }

            Event::MappingEnd => self.finish_mapping(&marker),

            Event::Alias(anchor_id) => {
                let source_info = self.source_info(&marker, 0);
                let node = match self.anchors.get(&anchor_id) {
                    Some(anchored) => anchored.clone().relocated(source_info),
                    None => YamlWithSourceInfo::new_scalar("", Yaml::Null, source_info),
                };
                self.push_complete(node);
            }
        }
    }
}

/// Resolve a scalar's text into a typed value.
///
/// Quoted scalars and scalars tagged `!!str` always stay strings. Plain
/// scalars are inferred as integer, float, boolean, null or string.
fn resolve_scalar(value: &str, plain: bool, tag: Option<&str>) -> Yaml {
    if !plain || tag == Some("str") {
        return Yaml::String(value.to_string());
    }

    if let Ok(i) = value.parse::<i64>() {
        return Yaml::Integer(i);
    }

    if value.parse::<f64>().is_ok() {
        return Yaml::Real(value.to_string());
    }

    match value {
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => {
            Yaml::Boolean(true)
        }
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => {
            Yaml::Boolean(false)
        }
        "null" | "Null" | "NULL" | "~" | "" => Yaml::Null,
        _ => Yaml::String(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeKind;

    #[test]
    fn test_parse_scalar() {
        let yaml = parse("hello").unwrap();
        assert!(yaml.is_scalar());
        assert_eq!(yaml.yaml.as_str(), Some("hello"));
        assert_eq!(yaml.scalar_text(), Some("hello"));
    }

    #[test]
    fn test_parse_integer_keeps_literal_text() {
        let yaml = parse("042").unwrap();
        assert_eq!(yaml.yaml.as_i64(), Some(42));
        assert_eq!(yaml.scalar_text(), Some("042"));
    }

    #[test]
    fn test_quoted_scalar_is_string() {
        let yaml = parse("age: \"30\"").unwrap();
        let age = yaml.get_hash_value("age").unwrap();
        assert_eq!(age.yaml.as_str(), Some("30"));
    }

    #[test]
    fn test_str_tag_is_string() {
        let yaml = parse("flag: !!str yes").unwrap();
        let flag = yaml.get_hash_value("flag").unwrap();
        assert_eq!(flag.yaml.as_str(), Some("yes"));
        assert_eq!(flag.tag.as_ref().map(|(s, _)| s.as_str()), Some("str"));
    }

    #[test]
    fn test_parse_boolean_and_null() {
        assert_eq!(parse("true").unwrap().yaml.as_bool(), Some(true));
        assert_eq!(parse("off").unwrap().yaml.as_bool(), Some(false));
        assert!(parse("~").unwrap().yaml.is_null());
    }

    #[test]
    fn test_parse_sequence() {
        let yaml = parse("[1, 2, 3]").unwrap();
        assert_eq!(yaml.kind(), NodeKind::Sequence);
        assert_eq!(yaml.len(), 3);

        let items = yaml.as_sequence().unwrap();
        assert_eq!(items[0].yaml.as_i64(), Some(1));
        assert_eq!(items[2].yaml.as_i64(), Some(3));
    }

    #[test]
    fn test_parse_mapping_preserves_order() {
        let yaml = parse("b: 1\na: 2\nc: 3").unwrap();
        assert_eq!(yaml.kind(), NodeKind::Mapping);

        let keys: Vec<_> = yaml.entries().filter_map(|e| e.key.scalar_text()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_nested_structure() {
        let yaml = parse(
            r#"
project:
  title: My Project
  authors:
    - Alice
    - Bob
"#,
        )
        .unwrap();

        let project = yaml.get_hash_value("project").unwrap();
        assert!(project.is_mapping());

        let authors = project.get_hash_value("authors").unwrap();
        assert!(authors.is_sequence());
        assert_eq!(authors.len(), 2);
    }

    #[test]
    fn test_scalar_positions() {
        let yaml = parse("name: John\nage: 16\n").unwrap();

        let name = yaml.get_hash_value("name").unwrap();
        assert_eq!((name.line(), name.column()), (1, 7));

        let age = yaml.get_hash_value("age").unwrap();
        assert_eq!((age.line(), age.column()), (2, 6));
        assert_eq!(age.source_info.offset, 16);
    }

    #[test]
    fn test_mapping_position_is_first_key() {
        let yaml = parse("\n\nname: John\n").unwrap();
        assert_eq!((yaml.line(), yaml.column()), (3, 1));
    }

    #[test]
    fn test_block_mapping_starts_at_first_key() {
        let yaml = parse("age: 16\ncreated_at: yesterday\n").unwrap();
        assert_eq!((yaml.line(), yaml.column()), (1, 1));
        assert_eq!(yaml.source_info.offset, 0);

        let nested = parse("outer:\n  inner: 1\n").unwrap();
        let outer = nested.get_hash_value("outer").unwrap();
        assert_eq!((outer.line(), outer.column()), (2, 3));
    }

    #[test]
    fn test_flow_mapping_starts_at_brace() {
        let yaml = parse("a: {b: 1}\nc: {}\n").unwrap();
        let a = yaml.get_hash_value("a").unwrap();
        assert_eq!((a.line(), a.column()), (1, 4));
        let c = yaml.get_hash_value("c").unwrap();
        assert_eq!((c.line(), c.column()), (2, 4));
    }

    #[test]
    fn test_alias_resolves_to_anchored_content() {
        let yaml = parse("base: &b\n  size: 3\ncopy: *b\n").unwrap();
        let copy = yaml.get_hash_value("copy").unwrap();
        assert!(copy.is_mapping());
        assert_eq!(
            copy.get_hash_value("size").and_then(|n| n.yaml.as_i64()),
            Some(3)
        );
        assert_eq!(copy.line(), 3);
    }

    #[test]
    fn test_scan_error_has_position() {
        let err = parse("key: [unclosed").unwrap_err();
        match err {
            Error::ParseError { location, .. } => assert!(location.line >= 1),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_filename() {
        let yaml = parse_file("title: Test", "config.yaml").unwrap();
        assert_eq!(yaml.source_info.file, Some("config.yaml".into()));
        let title = yaml.get_hash_value("title").unwrap();
        assert_eq!(title.source_info.file, Some("config.yaml".into()));
    }
}
