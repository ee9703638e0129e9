//! GEDCOM 5.x line parser.
//!
//! Only the subset needed for ego views is interpreted (`INDI`, `FAM` and their name, date and
//! linkage sub-records). Everything else is parsed into the tree and then ignored, so files from
//! arbitrary genealogy tools load without complaint.

use crate::model::{Family, Individual, RecordSet};
use crate::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// One `level [@xref@] TAG [value]` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GedcomLine {
    /// 1-based line number in the input.
    pub line: usize,
    pub level: usize,
    pub xref: Option<String>,
    pub tag: String,
    pub value: String,
}

/// A line plus its nested sub-records. `CONC`/`CONT` lines are folded into `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GedcomNode {
    pub line: usize,
    pub xref: Option<String>,
    pub tag: String,
    pub value: String,
    pub children: Vec<GedcomNode>,
}

impl GedcomNode {
    fn from_line(line: GedcomLine) -> Self {
        Self {
            line: line.line,
            xref: line.xref,
            tag: line.tag,
            value: line.value,
            children: Vec::new(),
        }
    }

    pub fn child(&self, tag: &str) -> Option<&GedcomNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a GedcomNode> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    fn child_value(&self, tag: &str) -> Option<&str> {
        let v = self.child(tag)?.value.trim();
        (!v.is_empty()).then_some(v)
    }
}

fn line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+)[ \t]+(?:(@[^@]+@)[ \t]+)?([A-Za-z0-9_]+)(?:[ \t](.*))?$")
            .expect("GEDCOM line regex must compile")
    })
}

/// Parses a single line. Blank lines yield `Ok(None)`.
///
/// Leading indentation is dropped but trailing value bytes are kept, since a `CONC` that follows
/// continues the value exactly where it stopped.
pub fn parse_line(line_no: usize, raw: &str) -> Result<Option<GedcomLine>> {
    let t = raw.trim_end_matches(['\r', '\n']).trim_start();
    if t.trim_end().is_empty() {
        return Ok(None);
    }
    let Some(caps) = line_re().captures(t) else {
        return Err(Error::Gedcom {
            line: line_no,
            message: format!("expected `level [@xref@] TAG [value]`, got `{t}`"),
        });
    };
    let level = caps[1].parse::<usize>().map_err(|_| Error::Gedcom {
        line: line_no,
        message: format!("invalid level `{}`", &caps[1]),
    })?;
    Ok(Some(GedcomLine {
        line: line_no,
        level,
        xref: caps.get(2).map(|m| m.as_str().to_string()),
        tag: caps[3].to_ascii_uppercase(),
        value: caps.get(4).map(|m| m.as_str().to_string()).unwrap_or_default(),
    }))
}

fn attach(stack: &mut Vec<GedcomNode>, roots: &mut Vec<GedcomNode>) {
    let Some(node) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Groups lines into level-0 records with nested sub-records.
pub fn parse_tree(text: &str) -> Result<Vec<GedcomNode>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut roots: Vec<GedcomNode> = Vec::new();
    let mut stack: Vec<GedcomNode> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let Some(line) = parse_line(idx + 1, raw)? else {
            continue;
        };
        if line.level > stack.len() {
            return Err(Error::Gedcom {
                line: line.line,
                message: format!(
                    "level {} cannot follow level {}",
                    line.level,
                    stack.len().saturating_sub(1)
                ),
            });
        }
        while stack.len() > line.level {
            attach(&mut stack, &mut roots);
        }

        if line.level > 0 && (line.tag == "CONC" || line.tag == "CONT") {
            if let Some(parent) = stack.last_mut() {
                if line.tag == "CONT" {
                    parent.value.push('\n');
                }
                parent.value.push_str(&line.value);
            }
            continue;
        }

        stack.push(GedcomNode::from_line(line));
    }
    while !stack.is_empty() {
        attach(&mut stack, &mut roots);
    }

    Ok(roots)
}

/// `Given /Surname/ suffix` with `GIVN`/`SURN` sub-records taking precedence.
fn person_name(name: &GedcomNode) -> String {
    let raw = name.value.trim();
    let (mut given, mut surname) = match raw.split_once('/') {
        Some((g, rest)) => {
            let s = rest.split('/').next().unwrap_or_default();
            (g.trim().to_string(), s.trim().to_string())
        }
        None => (raw.to_string(), String::new()),
    };
    if let Some(v) = name.child_value("GIVN") {
        given = v.to_string();
    }
    if let Some(v) = name.child_value("SURN") {
        surname = v.to_string();
    }
    format!("{given} {surname}").trim().to_string()
}

fn event_date(record: &GedcomNode, event: &str) -> Option<String> {
    record
        .children_tagged(event)
        .find_map(|e| e.child_value("DATE"))
        .map(str::to_string)
}

fn individual_from_node(id: &str, node: &GedcomNode) -> Individual {
    let mut person = Individual::new(id, node.child("NAME").map(person_name).unwrap_or_default());
    person.birth_date = event_date(node, "BIRT");
    person.death_date = event_date(node, "DEAT");
    for c in &node.children {
        let v = c.value.trim();
        if v.is_empty() {
            continue;
        }
        match c.tag.as_str() {
            "FAMC" => person.parent_families.push(v.to_string()),
            "FAMS" => person.spouse_families.push(v.to_string()),
            _ => {}
        }
    }
    person
}

fn family_from_node(id: &str, node: &GedcomNode) -> Family {
    let mut family = Family::new(id);
    for c in &node.children {
        let v = c.value.trim();
        if v.is_empty() {
            continue;
        }
        match c.tag.as_str() {
            "HUSB" => family.husband = Some(v.to_string()),
            "WIFE" => family.wife = Some(v.to_string()),
            "CHIL" => family.children.push(v.to_string()),
            _ => {}
        }
    }
    family
}

/// Parses GEDCOM text into a [`RecordSet`].
pub fn parse_gedcom(text: &str) -> Result<RecordSet> {
    let roots = parse_tree(text)?;

    let mut records = RecordSet::default();
    for node in &roots {
        let kind = node.tag.as_str();
        if kind != "INDI" && kind != "FAM" {
            continue;
        }
        let Some(id) = node.xref.as_deref() else {
            tracing::warn!(line = node.line, tag = kind, "skipping record without xref");
            continue;
        };
        if kind == "INDI" {
            records
                .individuals
                .insert(id.to_string(), individual_from_node(id, node));
        } else {
            records
                .families
                .insert(id.to_string(), family_from_node(id, node));
        }
    }

    tracing::debug!(
        individuals = records.individuals.len(),
        families = records.families.len(),
        "parsed GEDCOM records"
    );
    Ok(records)
}

/// Decodes UTF-8 bytes (an uploaded file) and parses them.
pub fn parse_gedcom_bytes(bytes: &[u8]) -> Result<RecordSet> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::InvalidEncoding {
        message: e.to_string(),
    })?;
    parse_gedcom(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_splits_xref_tag_and_value() {
        let l = parse_line(3, "0 @I1@ INDI").unwrap().unwrap();
        assert_eq!(l.line, 3);
        assert_eq!(l.level, 0);
        assert_eq!(l.xref.as_deref(), Some("@I1@"));
        assert_eq!(l.tag, "INDI");
        assert_eq!(l.value, "");

        let l = parse_line(4, "1 NAME John /Smith/\r").unwrap().unwrap();
        assert_eq!(l.xref, None);
        assert_eq!(l.tag, "NAME");
        assert_eq!(l.value, "John /Smith/");

        assert_eq!(parse_line(5, "   ").unwrap(), None);
    }

    #[test]
    fn parse_line_rejects_garbage() {
        let err = parse_line(7, "not a gedcom line").unwrap_err();
        assert_eq!(
            err,
            Error::Gedcom {
                line: 7,
                message: "expected `level [@xref@] TAG [value]`, got `not a gedcom line`"
                    .to_string()
            }
        );
    }

    #[test]
    fn level_jumps_are_errors() {
        let err = parse_tree("0 @I1@ INDI\n2 DATE 1900\n").unwrap_err();
        assert!(matches!(err, Error::Gedcom { line: 2, .. }));
    }

    #[test]
    fn continuation_lines_fold_into_parent_value() {
        let roots = parse_tree("0 @N1@ NOTE first\n1 CONC  half\n1 CONT second\n").unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].value, "first half\nsecond");
        assert!(roots[0].children.is_empty());
    }

    #[test]
    fn trailing_value_spaces_survive_concatenation() {
        let l = parse_line(2, "  1 NOTE keep \r\n").unwrap().unwrap();
        assert_eq!(l.level, 1);
        assert_eq!(l.value, "keep ");

        let roots = parse_tree("0 @I1@ INDI\n1 NOTE a \n2 CONC b\n").unwrap();
        assert_eq!(roots[0].child("NOTE").unwrap().value, "a b");
    }

    #[test]
    fn names_prefer_givn_and_surn() {
        let roots =
            parse_tree("0 @I1@ INDI\n1 NAME Jack /Doe/\n2 GIVN Jonathan\n").unwrap();
        let name = roots[0].child("NAME").unwrap();
        assert_eq!(person_name(name), "Jonathan Doe");
    }

    #[test]
    fn names_without_slashes_are_given_names() {
        let roots = parse_tree("0 @I1@ INDI\n1 NAME Cher\n").unwrap();
        assert_eq!(person_name(roots[0].child("NAME").unwrap()), "Cher");
        let roots = parse_tree("0 @I1@ INDI\n1 NAME /Doe/\n").unwrap();
        assert_eq!(person_name(roots[0].child("NAME").unwrap()), "Doe");
    }

    #[test]
    fn invalid_utf8_is_an_encoding_error() {
        let err = parse_gedcom_bytes(&[0x30, 0x20, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::InvalidEncoding { .. }));
    }

    #[test]
    fn bom_is_ignored() {
        let records = parse_gedcom("\u{feff}0 HEAD\n0 @I1@ INDI\n1 NAME A /B/\n0 TRLR\n").unwrap();
        assert_eq!(records.individuals.len(), 1);
        assert_eq!(records.individuals["@I1@"].name, "A B");
    }
}
