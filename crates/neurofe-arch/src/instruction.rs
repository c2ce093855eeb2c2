//! Flat instruction listing: one record per hardware primitive, one per line.
//!
//! ```text
//! t <attr...>
//! c <tile_id> <attr...>
//! i|s|d|+|o <tile_id> <core_id> <attr...>
//! @ <attr...>
//! ```

use std::fmt::{Display, Formatter};
use std::io::Write;

use crate::attrs::{format_attributes, Attributes};
use crate::error::{ArchError, Result};

/// Record kind, tagged by a single character in the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstructionKind {
    /// Tile (`t`)
    Tile,
    /// Core (`c`)
    Core,
    /// Axon input (`i`)
    AxonIn,
    /// Synapse processor (`s`)
    Synapse,
    /// Dendrite processor (`d`)
    Dendrite,
    /// Soma processor (`+`)
    Soma,
    /// Axon output (`o`)
    AxonOut,
    /// Network-on-chip (`@`)
    Noc,
}

impl InstructionKind {
    /// The five per-core sub-elements, in emission order
    pub const CORE_ELEMENTS: [InstructionKind; 5] = [
        InstructionKind::AxonIn,
        InstructionKind::Synapse,
        InstructionKind::Dendrite,
        InstructionKind::Soma,
        InstructionKind::AxonOut,
    ];

    /// Single-character tag
    pub fn symbol(self) -> char {
        match self {
            InstructionKind::Tile => 't',
            InstructionKind::Core => 'c',
            InstructionKind::AxonIn => 'i',
            InstructionKind::Synapse => 's',
            InstructionKind::Dendrite => 'd',
            InstructionKind::Soma => '+',
            InstructionKind::AxonOut => 'o',
            InstructionKind::Noc => '@',
        }
    }

    /// Inverse of [`InstructionKind::symbol`]
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            't' => Some(InstructionKind::Tile),
            'c' => Some(InstructionKind::Core),
            'i' => Some(InstructionKind::AxonIn),
            's' => Some(InstructionKind::Synapse),
            'd' => Some(InstructionKind::Dendrite),
            '+' => Some(InstructionKind::Soma),
            'o' => Some(InstructionKind::AxonOut),
            '@' => Some(InstructionKind::Noc),
            _ => None,
        }
    }

    /// Key of the sub-element in a core description
    pub fn element_key(self) -> Option<&'static str> {
        match self {
            InstructionKind::AxonIn => Some("axon_in"),
            InstructionKind::Synapse => Some("synapse"),
            InstructionKind::Dendrite => Some("dendrite"),
            InstructionKind::Soma => Some("soma"),
            InstructionKind::AxonOut => Some("axon_out"),
            _ => None,
        }
    }

    /// Number of ID fields following the tag
    fn id_fields(self) -> usize {
        match self {
            InstructionKind::Tile | InstructionKind::Noc => 0,
            InstructionKind::Core => 1,
            _ => 2,
        }
    }
}

impl Display for InstructionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One elaborated hardware primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Record kind
    pub kind: InstructionKind,
    /// Owning tile (cores and sub-elements)
    pub tile: Option<usize>,
    /// Owning core, local to its tile (sub-elements)
    pub core: Option<usize>,
    /// Rendered attributes in description key order
    pub attributes: Attributes,
}

impl Instruction {
    /// Tile record
    pub fn tile(attributes: Attributes) -> Self {
        Self {
            kind: InstructionKind::Tile,
            tile: None,
            core: None,
            attributes,
        }
    }

    /// Core record owned by `tile`
    pub fn core(tile: usize, attributes: Attributes) -> Self {
        Self {
            kind: InstructionKind::Core,
            tile: Some(tile),
            core: None,
            attributes,
        }
    }

    /// Sub-element record owned by `tile`/`core`
    pub fn element(kind: InstructionKind, tile: usize, core: usize, attributes: Attributes) -> Self {
        Self {
            kind,
            tile: Some(tile),
            core: Some(core),
            attributes,
        }
    }

    /// NoC record
    pub fn noc(attributes: Attributes) -> Self {
        Self {
            kind: InstructionKind::Noc,
            tile: None,
            core: None,
            attributes,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(t) = self.tile {
            write!(f, " {}", t)?;
        }
        if let Some(c) = self.core {
            write!(f, " {}", c)?;
        }
        f.write_str(&format_attributes(&self.attributes))
    }
}

/// Destination for elaborated records, fed in emission order
pub trait InstructionSink {
    /// Accept the next record
    fn emit(&mut self, instruction: Instruction) -> Result<()>;
}

impl InstructionSink for Vec<Instruction> {
    fn emit(&mut self, instruction: Instruction) -> Result<()> {
        self.push(instruction);
        Ok(())
    }
}

/// Streams records as text lines to a writer
pub struct TextSink<W: Write> {
    writer: W,
    records: usize,
}

impl<W: Write> TextSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer, records: 0 }
    }

    /// Records written so far
    pub fn records(&self) -> usize {
        self.records
    }

    /// Flush and hand back the writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> InstructionSink for TextSink<W> {
    fn emit(&mut self, instruction: Instruction) -> Result<()> {
        writeln!(self.writer, "{}", instruction)?;
        self.records += 1;
        Ok(())
    }
}

/// Render a whole listing to text
pub fn to_text(instructions: &[Instruction]) -> String {
    let mut out = String::new();
    for ins in instructions {
        out.push_str(&ins.to_string());
        out.push('\n');
    }
    out
}

/// Parse a listing previously produced by the elaborator.
/// Attribute values are kept as text.
pub fn parse_instructions(input: &str) -> Result<Vec<Instruction>> {
    let mut out = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let tag = fields.next().unwrap_or_default();
        let mut chars = tag.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => InstructionKind::from_symbol(c),
            _ => None,
        }
        .ok_or_else(|| ArchError::malformed_instruction(line_no, format!("unknown record kind '{}'", tag)))?;

        let mut ids = [None, None];
        for slot in ids.iter_mut().take(kind.id_fields()) {
            let field = fields
                .next()
                .ok_or_else(|| ArchError::malformed_instruction(line_no, "missing id field"))?;
            let id: usize = field
                .parse()
                .map_err(|_| ArchError::malformed_instruction(line_no, format!("bad id '{}'", field)))?;
            *slot = Some(id);
        }

        let mut attributes = Attributes::new();
        for pair in fields {
            let (k, v) = pair
                .split_once('=')
                .ok_or_else(|| ArchError::malformed_instruction(line_no, format!("missing '=' in '{}'", pair)))?;
            attributes.push((k.to_string(), v.to_string()));
        }

        out.push(Instruction {
            kind,
            tile: ids[0],
            core: ids[1],
            attributes,
        });
    }
    Ok(out)
}
