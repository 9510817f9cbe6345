use crate::core::models::structure::{Atom, Chain, Residue, Structure};
use nalgebra::Point3;
use std::collections::HashMap;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CifError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {msg}")]
    Parse { line: usize, msg: String },
    #[error("Missing required tag: {0}")]
    MissingTag(&'static str),
    #[error("No atom records found")]
    EmptyStructure,
}

fn parse_err(line: usize, msg: impl Into<String>) -> CifError {
    CifError::Parse {
        line,
        msg: msg.into(),
    }
}

fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = None;

    for c in line.chars() {
        match in_quote {
            Some(q) => {
                if c == q {
                    in_quote = None;
                } else {
                    current.push(c);
                }
            }
            None => {
                if c.is_whitespace() {
                    if !current.is_empty() {
                        tokens.push(current.clone());
                        current.clear();
                    }
                } else if c == '\'' || c == '"' {
                    if !current.is_empty() {
                        current.push(c);
                    } else {
                        in_quote = Some(c);
                    }
                } else {
                    current.push(c);
                }
            }
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Tag-to-values view of one mmCIF data block.
///
/// Every tag maps to the ordered list of its values: a single-element list
/// for key-value pairs and one element per row for `loop_` columns.
/// Multi-line `;` text blocks are collected into a single value.
#[derive(Debug, Default)]
pub struct CifDict {
    entries: HashMap<String, Vec<String>>,
}

impl CifDict {
    pub fn values(&self, tag: &str) -> Option<&[String]> {
        self.entries.get(tag).map(|v| v.as_slice())
    }

    pub fn first(&self, tag: &str) -> Option<&str> {
        self.entries
            .get(tag)
            .and_then(|v| v.first())
            .map(|s| s.as_str())
    }

    pub fn require(&self, tag: &'static str) -> Result<&[String], CifError> {
        self.values(tag).ok_or(CifError::MissingTag(tag))
    }

    pub fn require_first(&self, tag: &'static str) -> Result<&str, CifError> {
        self.first(tag).ok_or(CifError::MissingTag(tag))
    }
}

enum DictState {
    Base,
    AwaitingValue(String),
    InLoopHeader,
    InLoopData,
}

/// Reads an mmCIF data block into a [`CifDict`].
///
/// This covers the subset of the grammar that model-archive structure files
/// use: key-value pairs (value on the same or the following line), `loop_`
/// tables with wrapped rows, quoted tokens, and `;`-delimited text blocks.
pub fn read_dict<R: BufRead>(reader: R) -> Result<CifDict, CifError> {
    let mut dict = CifDict::default();
    let mut state = DictState::Base;
    let mut loop_tags: Vec<String> = Vec::new();
    let mut loop_cursor = 0usize;
    let mut block: Option<Vec<String>> = None;

    for (idx, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = idx + 1;

        if let Some(content) = block.as_mut() {
            if line.starts_with(';') {
                let value = content.join("\n");
                block = None;
                state = deliver_block(&mut dict, state, &loop_tags, &mut loop_cursor, value, line_num)?;
            } else {
                content.push(line);
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix(';') {
            block = Some(vec![rest.to_string()]);
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("data_") {
            continue;
        }
        if trimmed == "loop_" {
            state = DictState::InLoopHeader;
            loop_tags.clear();
            loop_cursor = 0;
            continue;
        }

        let tokens = tokenize(trimmed);
        if tokens.is_empty() {
            continue;
        }

        state = match state {
            DictState::Base => handle_tag_line(&mut dict, tokens),
            DictState::AwaitingValue(tag) => {
                if tokens[0].starts_with('_') {
                    // The awaited value never arrived; the tag stays absent.
                    handle_tag_line(&mut dict, tokens)
                } else {
                    let mut tokens = tokens;
                    dict.entries.entry(tag).or_default().push(tokens.swap_remove(0));
                    DictState::Base
                }
            }
            DictState::InLoopHeader => {
                if tokens[0].starts_with('_') {
                    let mut tokens = tokens;
                    loop_tags.push(tokens.swap_remove(0));
                    DictState::InLoopHeader
                } else {
                    push_loop_values(&mut dict, &loop_tags, &mut loop_cursor, tokens, line_num)?;
                    DictState::InLoopData
                }
            }
            DictState::InLoopData => {
                if tokens[0].starts_with('_') {
                    handle_tag_line(&mut dict, tokens)
                } else {
                    push_loop_values(&mut dict, &loop_tags, &mut loop_cursor, tokens, line_num)?;
                    DictState::InLoopData
                }
            }
        };
    }

    Ok(dict)
}

fn handle_tag_line(dict: &mut CifDict, mut tokens: Vec<String>) -> DictState {
    if tokens.len() >= 2 {
        let value = tokens.swap_remove(1);
        let tag = tokens.swap_remove(0);
        dict.entries.entry(tag).or_default().push(value);
        DictState::Base
    } else {
        DictState::AwaitingValue(tokens.swap_remove(0))
    }
}

fn push_loop_values(
    dict: &mut CifDict,
    loop_tags: &[String],
    cursor: &mut usize,
    tokens: Vec<String>,
    line_num: usize,
) -> Result<(), CifError> {
    if loop_tags.is_empty() {
        return Err(parse_err(line_num, "loop data before any loop_ header"));
    }
    for token in tokens {
        let tag = &loop_tags[*cursor % loop_tags.len()];
        dict.entries.entry(tag.clone()).or_default().push(token);
        *cursor += 1;
    }
    Ok(())
}

fn deliver_block(
    dict: &mut CifDict,
    state: DictState,
    loop_tags: &[String],
    cursor: &mut usize,
    value: String,
    line_num: usize,
) -> Result<DictState, CifError> {
    match state {
        DictState::AwaitingValue(tag) => {
            dict.entries.entry(tag).or_default().push(value);
            Ok(DictState::Base)
        }
        DictState::InLoopHeader | DictState::InLoopData => {
            push_loop_values(dict, loop_tags, cursor, vec![value], line_num)?;
            Ok(DictState::InLoopData)
        }
        // A stray text block outside any tag context carries no information.
        DictState::Base => Ok(DictState::Base),
    }
}

#[derive(Default)]
struct AtomSiteIndices {
    type_symbol: Option<usize>,
    auth_atom_id: Option<usize>,
    label_atom_id: Option<usize>,
    auth_comp_id: Option<usize>,
    label_comp_id: Option<usize>,
    auth_asym_id: Option<usize>,
    label_asym_id: Option<usize>,
    auth_seq_id: Option<usize>,
    label_seq_id: Option<usize>,
    cartn_x: Option<usize>,
    cartn_y: Option<usize>,
    cartn_z: Option<usize>,
    occupancy: Option<usize>,
    b_iso: Option<usize>,
}

fn map_atom_site_indices(headers: &[String]) -> AtomSiteIndices {
    let mut indices = AtomSiteIndices::default();
    for (i, header) in headers.iter().enumerate() {
        match header.as_str() {
            "_atom_site.type_symbol" => indices.type_symbol = Some(i),
            "_atom_site.auth_atom_id" => indices.auth_atom_id = Some(i),
            "_atom_site.label_atom_id" => indices.label_atom_id = Some(i),
            "_atom_site.auth_comp_id" => indices.auth_comp_id = Some(i),
            "_atom_site.label_comp_id" => indices.label_comp_id = Some(i),
            "_atom_site.auth_asym_id" => indices.auth_asym_id = Some(i),
            "_atom_site.label_asym_id" => indices.label_asym_id = Some(i),
            "_atom_site.auth_seq_id" => indices.auth_seq_id = Some(i),
            "_atom_site.label_seq_id" => indices.label_seq_id = Some(i),
            "_atom_site.Cartn_x" => indices.cartn_x = Some(i),
            "_atom_site.Cartn_y" => indices.cartn_y = Some(i),
            "_atom_site.Cartn_z" => indices.cartn_z = Some(i),
            "_atom_site.occupancy" => indices.occupancy = Some(i),
            "_atom_site.B_iso_or_equiv" => indices.b_iso = Some(i),
            _ => {}
        }
    }
    indices
}

#[derive(Default)]
struct StructureBuilder {
    structure: Structure,
    chain: Option<Chain>,
    residue: Option<Residue>,
    current_chain_id: Option<String>,
    current_seq: Option<i32>,
}

impl StructureBuilder {
    fn start_chain(&mut self, id: &str) {
        self.flush_residue();
        if let Some(chain) = self.chain.take() {
            self.structure.add_chain(chain);
        }
        self.chain = Some(Chain::new(id));
        self.current_chain_id = Some(id.to_string());
        self.current_seq = None;
    }

    fn start_residue(&mut self, seq_id: i32, name: &str) {
        self.flush_residue();
        self.residue = Some(Residue::new(seq_id, name));
        self.current_seq = Some(seq_id);
    }

    fn add_atom(&mut self, atom: Atom) {
        if let Some(residue) = self.residue.as_mut() {
            residue.add_atom(atom);
        }
    }

    fn flush_residue(&mut self) {
        if let Some(residue) = self.residue.take() {
            if let Some(chain) = self.chain.as_mut() {
                chain.add_residue(residue);
            }
        }
    }

    fn finish(mut self) -> Structure {
        self.flush_residue();
        if let Some(chain) = self.chain.take() {
            self.structure.add_chain(chain);
        }
        self.structure
    }
}

enum AtomParserState {
    Base,
    InLoopHeader,
    InAtomSiteLoop,
    InOtherLoop,
}

/// Reads the `_atom_site` records of an mmCIF data block into a [`Structure`].
///
/// Chains and residues are kept in file order. Records without coordinates or
/// without a residue sequence number are dropped, since a residue that cannot
/// be range-addressed cannot be selected for output either.
pub fn read_structure<R: BufRead>(reader: R) -> Result<Structure, CifError> {
    let mut builder = StructureBuilder::default();
    let mut state = AtomParserState::Base;
    let mut headers: Vec<String> = Vec::new();
    let mut indices = AtomSiteIndices::default();
    let mut in_text_block = false;

    for (idx, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = idx + 1;

        if line.starts_with(';') {
            in_text_block = !in_text_block;
            continue;
        }
        if in_text_block {
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("data_") {
            continue;
        }
        if trimmed == "loop_" {
            state = AtomParserState::InLoopHeader;
            headers.clear();
            continue;
        }

        match state {
            AtomParserState::Base => {}
            AtomParserState::InLoopHeader => {
                if trimmed.starts_with('_') {
                    let mut tokens = tokenize(trimmed);
                    if !tokens.is_empty() {
                        headers.push(tokens.swap_remove(0));
                    }
                } else if headers.iter().any(|h| h.starts_with("_atom_site.")) {
                    indices = map_atom_site_indices(&headers);
                    state = AtomParserState::InAtomSiteLoop;
                    process_atom_line(tokenize(trimmed), &indices, line_num, &mut builder)?;
                } else {
                    state = AtomParserState::InOtherLoop;
                }
            }
            AtomParserState::InAtomSiteLoop => {
                if trimmed.starts_with('_') {
                    state = AtomParserState::Base;
                } else {
                    process_atom_line(tokenize(trimmed), &indices, line_num, &mut builder)?;
                }
            }
            AtomParserState::InOtherLoop => {
                if trimmed.starts_with('_') {
                    state = AtomParserState::Base;
                }
            }
        }
    }

    let structure = builder.finish();
    if structure.chains().is_empty() {
        return Err(CifError::EmptyStructure);
    }
    Ok(structure)
}

fn process_atom_line(
    tokens: Vec<String>,
    indices: &AtomSiteIndices,
    line_num: usize,
    builder: &mut StructureBuilder,
) -> Result<(), CifError> {
    let atom_name_idx = indices.auth_atom_id.or(indices.label_atom_id).ok_or_else(|| {
        parse_err(line_num, "_atom_site loop is missing atom identifier columns")
    })?;
    let comp_idx = indices.auth_comp_id.or(indices.label_comp_id).ok_or_else(|| {
        parse_err(line_num, "_atom_site loop is missing residue identifier columns")
    })?;
    let asym_idx = indices.auth_asym_id.or(indices.label_asym_id).ok_or_else(|| {
        parse_err(line_num, "_atom_site loop is missing chain identifier columns")
    })?;
    let seq_idx = indices.auth_seq_id.or(indices.label_seq_id).ok_or_else(|| {
        parse_err(line_num, "_atom_site loop is missing residue sequence columns")
    })?;
    let x_idx = indices
        .cartn_x
        .ok_or_else(|| parse_err(line_num, "_atom_site.Cartn_x column is required"))?;
    let y_idx = indices
        .cartn_y
        .ok_or_else(|| parse_err(line_num, "_atom_site.Cartn_y column is required"))?;
    let z_idx = indices
        .cartn_z
        .ok_or_else(|| parse_err(line_num, "_atom_site.Cartn_z column is required"))?;

    let required = [atom_name_idx, comp_idx, asym_idx, seq_idx, x_idx, y_idx, z_idx];
    if let Some(&max_idx) = required.iter().max() {
        if tokens.len() <= max_idx {
            return Err(parse_err(
                line_num,
                "Atom record is shorter than declared _atom_site headers",
            ));
        }
    }

    let seq_str = tokens[seq_idx].as_str();
    let coords = [
        tokens[x_idx].as_str(),
        tokens[y_idx].as_str(),
        tokens[z_idx].as_str(),
    ];
    if matches!(seq_str, "." | "?") || coords.iter().any(|c| matches!(*c, "." | "?")) {
        return Ok(());
    }

    let seq_id: i32 = seq_str.parse().map_err(|_| {
        parse_err(
            line_num,
            format!("Invalid residue sequence number '{seq_str}'"),
        )
    })?;
    let parse_coord = |axis: &str, value: &str| -> Result<f64, CifError> {
        value
            .parse()
            .map_err(|_| parse_err(line_num, format!("Invalid {axis} coordinate '{value}'")))
    };
    let x = parse_coord("X", coords[0])?;
    let y = parse_coord("Y", coords[1])?;
    let z = parse_coord("Z", coords[2])?;

    let chain_id = match tokens[asym_idx].as_str() {
        "." | "?" => "?",
        other => other,
    };
    if builder.current_chain_id.as_deref() != Some(chain_id) {
        builder.start_chain(chain_id);
    }
    if builder.current_seq != Some(seq_id) {
        builder.start_residue(seq_id, &tokens[comp_idx]);
    }

    let occupancy = indices
        .occupancy
        .and_then(|i| tokens.get(i))
        .filter(|v| !matches!(v.as_str(), "." | "?"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(1.0);
    let b_factor = indices
        .b_iso
        .and_then(|i| tokens.get(i))
        .filter(|v| !matches!(v.as_str(), "." | "?"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0);
    let element = indices
        .type_symbol
        .and_then(|i| tokens.get(i))
        .filter(|v| !matches!(v.as_str(), "." | "?"))
        .map(|v| v.as_str())
        .unwrap_or("");

    let mut atom = Atom::new(&tokens[atom_name_idx], element, Point3::new(x, y, z));
    atom.occupancy = occupancy;
    atom.b_factor = b_factor;
    builder.add_atom(atom);

    Ok(())
}
