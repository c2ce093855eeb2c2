//! Architecture elaboration: tile → core → {axon_in, synapse, dendrite, soma, axon_out}.
//!
//! Elaboration runs in two steps. [`verify_architecture`] checks the whole
//! description and builds a borrowed, typed view of it; emission then walks
//! that view, expanding ranges and assigning IDs from a per-call context
//! that is dropped when the call returns. Nothing is emitted
//! unless verification succeeded.

use std::io::Write;

use log::{debug, info};
use serde_json::{Map, Value};

use crate::attrs::collect_attributes;
use crate::error::{ArchError, Result};
use crate::instruction::{Instruction, InstructionKind, InstructionSink, TextSink};
use crate::range::{has_range, parse_range, InstanceRange};

type AttrMap = Map<String, Value>;

/// Verified root of an architecture description
#[derive(Debug)]
pub struct ArchSpec<'a> {
    /// Architecture name
    pub name: &'a str,
    /// Tile specs in description order
    pub tiles: Vec<TileSpec<'a>>,
    /// NoC attributes (root `attributes`; null means empty)
    pub noc: Option<&'a AttrMap>,
}

/// Verified tile spec
#[derive(Debug)]
pub struct TileSpec<'a> {
    /// Instances to create
    pub range: InstanceRange,
    /// Tile attributes
    pub attributes: Option<&'a AttrMap>,
    /// Core specs in description order
    pub cores: Vec<CoreSpec<'a>>,
}

/// Verified core spec
#[derive(Debug)]
pub struct CoreSpec<'a> {
    /// Instances to create per tile instance
    pub range: InstanceRange,
    /// Core attributes
    pub attributes: Option<&'a AttrMap>,
    /// Attributes of each sub-element, in [`InstructionKind::CORE_ELEMENTS`] order
    pub elements: [Option<&'a AttrMap>; 5],
}

impl ArchSpec<'_> {
    /// Tile instances the description expands to
    pub fn tile_count(&self) -> usize {
        self.tiles.iter().map(|t| t.range.count()).sum()
    }

    /// Core instances the description expands to
    pub fn core_count(&self) -> usize {
        self.tiles
            .iter()
            .map(|t| t.range.count() * t.cores.iter().map(|c| c.range.count()).sum::<usize>())
            .sum()
    }
}

/// Counts reported after a successful elaboration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElaborationSummary {
    /// Tile records emitted
    pub tiles: usize,
    /// Core records emitted
    pub cores: usize,
    /// Total records emitted, NoC included
    pub records: usize,
}

/// Per-call ID allocation state
#[derive(Debug, Default)]
struct ElaborationContext {
    cores_in_tile: Vec<usize>,
    records: usize,
}

impl ElaborationContext {
    fn new() -> Self {
        Self::default()
    }

    /// Allocate the next global tile ID
    fn next_tile(&mut self) -> usize {
        self.cores_in_tile.push(0);
        self.cores_in_tile.len() - 1
    }

    /// Allocate the next core ID local to `tile`, if that tile was allocated
    fn next_core(&mut self, tile: usize) -> Option<usize> {
        let count = self.cores_in_tile.get_mut(tile)?;
        let id = *count;
        *count += 1;
        Some(id)
    }

    fn summary(&self) -> ElaborationSummary {
        ElaborationSummary {
            tiles: self.cores_in_tile.len(),
            cores: self.cores_in_tile.iter().sum(),
            records: self.records,
        }
    }
}

/// Check a description and build its typed view
pub fn verify_architecture(arch: &Value) -> Result<ArchSpec<'_>> {
    let root = arch
        .as_object()
        .ok_or_else(|| ArchError::structural("architecture must be a mapping"))?;
    let name = name_of(root, "architecture")?;
    if has_range(name) {
        return Err(ArchError::structural(format!(
            "multiple architectures not supported (architecture '{}')",
            name
        )));
    }

    let tile_list = non_empty_list(root, "tile")
        .ok_or_else(|| ArchError::structural("no tiles defined, must be at least one tile"))?;

    let mut tiles = Vec::with_capacity(tile_list.len());
    for tile_value in tile_list {
        let tile = tile_value
            .as_object()
            .ok_or_else(|| ArchError::structural("tile entry must be a mapping"))?;
        let tile_name = name_of(tile, "tile")?;
        let range = parse_range(tile_name)?;
        let attributes = attributes_of(tile, tile_name)?;

        let core_list = non_empty_list(tile, "core").ok_or_else(|| {
            ArchError::structural(format!(
                "no cores defined in tile '{}', must be at least one core",
                tile_name
            ))
        })?;
        let mut cores = Vec::with_capacity(core_list.len());
        for core_value in core_list {
            cores.push(verify_core(core_value, tile_name)?);
        }

        tiles.push(TileSpec {
            range,
            attributes,
            cores,
        });
    }

    if !root.contains_key("attributes") {
        return Err(ArchError::structural(format!(
            "NoC not defined for architecture '{}' (add it under attributes)",
            name
        )));
    }
    let noc = attributes_of(root, name)?;

    Ok(ArchSpec { name, tiles, noc })
}

fn verify_core<'a>(value: &'a Value, tile_name: &str) -> Result<CoreSpec<'a>> {
    let core = value
        .as_object()
        .ok_or_else(|| ArchError::structural(format!("core entry in tile '{}' must be a mapping", tile_name)))?;
    let core_name = name_of(core, "core")?;
    let range = parse_range(core_name)?;
    let attributes = attributes_of(core, core_name)?;

    let mut elements = [None; 5];
    for (slot, kind) in elements.iter_mut().zip(InstructionKind::CORE_ELEMENTS) {
        let key = kind.element_key().unwrap_or_default();
        let element = element_of(core, key).ok_or_else(|| {
            ArchError::structural(format!(
                "{} not defined in core '{}' (tile '{}')",
                key, core_name, tile_name
            ))
        })??;
        *slot = attributes_of(element, key)?;
    }

    Ok(CoreSpec {
        range,
        attributes,
        elements,
    })
}

fn name_of<'a>(map: &'a AttrMap, what: &str) -> Result<&'a str> {
    map.get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| ArchError::structural(format!("{} has no name", what)))
}

fn non_empty_list<'a>(map: &'a AttrMap, key: &str) -> Option<&'a Vec<Value>> {
    map.get(key)
        .and_then(Value::as_array)
        .filter(|list| !list.is_empty())
}

// A sub-element may be given directly or as a one-entry list.
fn element_of<'a>(core: &'a AttrMap, key: &str) -> Option<Result<&'a AttrMap>> {
    let value = match core.get(key)? {
        Value::Array(list) => list.first()?,
        Value::Null => return None,
        other => other,
    };
    Some(
        value
            .as_object()
            .ok_or_else(|| ArchError::structural(format!("{} must be a mapping", key))),
    )
}

fn attributes_of<'a>(map: &'a AttrMap, owner: &str) -> Result<Option<&'a AttrMap>> {
    match map.get("attributes") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(attrs)) => Ok(Some(attrs)),
        Some(_) => Err(ArchError::structural(format!(
            "attributes of '{}' must be a mapping",
            owner
        ))),
    }
}

/// Elaborate a verified description into `sink`
pub fn emit<S: InstructionSink>(spec: &ArchSpec<'_>, sink: &mut S) -> Result<ElaborationSummary> {
    let mut ctx = ElaborationContext::new();
    let mut push = |ctx: &mut ElaborationContext, ins: Instruction| -> Result<()> {
        ctx.records += 1;
        sink.emit(ins)
    };

    for tile in &spec.tiles {
        let tile_attrs = collect_attributes(tile.attributes);
        for tile_name in tile.range.instance_names() {
            let tile_id = ctx.next_tile();
            debug!("tile {} -> id {}", tile_name, tile_id);
            push(&mut ctx, Instruction::tile(tile_attrs.clone()))?;

            for core in &tile.cores {
                let core_attrs = collect_attributes(core.attributes);
                for core_name in core.range.instance_names() {
                    let core_id = ctx.next_core(tile_id).ok_or_else(|| {
                        ArchError::structural(format!("core '{}' outside any tile", core_name))
                    })?;
                    debug!("core {} -> {}.{}", core_name, tile_id, core_id);
                    push(&mut ctx, Instruction::core(tile_id, core_attrs.clone()))?;

                    for (kind, attrs) in InstructionKind::CORE_ELEMENTS.iter().zip(core.elements) {
                        push(
                            &mut ctx,
                            Instruction::element(*kind, tile_id, core_id, collect_attributes(attrs)),
                        )?;
                    }
                }
            }
        }
    }

    push(&mut ctx, Instruction::noc(collect_attributes(spec.noc)))?;

    let summary = ctx.summary();
    info!(
        "Elaborated '{}': {} tiles, {} cores, {} records",
        spec.name, summary.tiles, summary.cores, summary.records
    );
    Ok(summary)
}

/// Verify and elaborate an architecture description into `sink`
pub fn elaborate_into<S: InstructionSink>(arch: &Value, sink: &mut S) -> Result<ElaborationSummary> {
    let spec = verify_architecture(arch)?;
    emit(&spec, sink)
}

/// Elaborate into an in-memory listing
pub fn elaborate(arch: &Value) -> Result<Vec<Instruction>> {
    let mut out = Vec::new();
    elaborate_into(arch, &mut out)?;
    Ok(out)
}

/// Elaborate straight to a writer, one line per record
pub fn elaborate_to_writer<W: Write>(arch: &Value, writer: W) -> Result<ElaborationSummary> {
    let mut sink = TextSink::new(writer);
    let summary = elaborate_into(arch, &mut sink)?;
    sink.into_inner()?;
    Ok(summary)
}

/// Pick the `architecture` entry out of a whole document
pub fn architecture_of(document: &Value) -> Result<&Value> {
    document
        .get("architecture")
        .ok_or_else(|| ArchError::structural("no architecture defined"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::to_text;
    use serde_json::json;

    #[test]
    fn core_ids_only_for_allocated_tiles() {
        let mut ctx = ElaborationContext::new();
        assert_eq!(ctx.next_core(0), None);
        let first = ctx.next_tile();
        let second = ctx.next_tile();
        assert_eq!(ctx.next_core(second), Some(0));
        assert_eq!(ctx.next_core(second), Some(1));
        assert_eq!(ctx.next_core(first), Some(0));
        assert_eq!(ctx.next_core(7), None);
        assert_eq!(ctx.summary().cores, 3);
    }

    fn core(name: &str) -> Value {
        json!({
            "name": name,
            "axon_in": [{"attributes": {"model": "loihi"}}],
            "synapse": [{"attributes": {"model": "loihi", "weight_bits": 8}}],
            "dendrite": [{"attributes": null}],
            "soma": {"attributes": {"model": "loihi_lif"}},
            "axon_out": [{}]
        })
    }

    #[test]
    fn core_ids_are_local_to_tile() {
        let arch = json!({
            "name": "chip",
            "attributes": {"width": 2, "height": 1},
            "tile": [
                {"name": "tile[0..1]", "attributes": {"energy_east_west": 1.5}, "core": [core("core[0..2]")]}
            ]
        });
        let listing = elaborate(&arch).expect("elaborate");
        let cores: Vec<_> = listing
            .iter()
            .filter(|i| i.kind == InstructionKind::Core)
            .map(|i| i.tile.unwrap())
            .collect();
        assert_eq!(cores, vec![0, 0, 0, 1, 1, 1]);

        let somas: Vec<_> = listing
            .iter()
            .filter(|i| i.kind == InstructionKind::Soma)
            .map(|i| (i.tile.unwrap(), i.core.unwrap()))
            .collect();
        assert_eq!(somas, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn renders_attributes_in_key_order() {
        let arch = json!({
            "name": "chip",
            "attributes": {"topology": "mesh", "width": 1},
            "tile": [{"name": "t", "attributes": {"blocking": true}, "core": [core("c")]}]
        });
        let text = to_text(&elaborate(&arch).unwrap());
        assert_eq!(
            text,
            "t blocking=True\n\
             c 0\n\
             i 0 0 model=loihi\n\
             s 0 0 model=loihi weight_bits=8\n\
             d 0 0\n\
             + 0 0 model=loihi_lif\n\
             o 0 0\n\
             @ topology=mesh width=1\n"
        );
    }

    #[test]
    fn contexts_do_not_leak_between_calls() {
        let arch = json!({
            "name": "chip",
            "attributes": {},
            "tile": [{"name": "t[0..2]", "core": [core("c")]}]
        });
        let first = elaborate(&arch).unwrap();
        let second = elaborate(&arch).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn structural_failures() {
        let cases = [
            (json!({"name": "a[0..1]", "attributes": {}, "tile": [{"name": "t", "core": [core("c")]}]}), "multiple architectures"),
            (json!({"name": "a", "attributes": {}}), "no tiles"),
            (json!({"name": "a", "attributes": {}, "tile": []}), "no tiles"),
            (json!({"name": "a", "attributes": {}, "tile": [{"name": "t"}]}), "no cores defined in tile 't'"),
            (json!({"name": "a", "tile": [{"name": "t", "core": [core("c")]}]}), "NoC not defined"),
        ];
        for (arch, needle) in cases {
            let err = elaborate(&arch).unwrap_err();
            assert!(matches!(err, ArchError::Structural(_)), "{err:?}");
            assert!(err.to_string().contains(needle), "{err} should mention {needle}");
        }
    }

    #[test]
    fn malformed_core_range_is_reported() {
        let arch = json!({
            "name": "a",
            "attributes": {},
            "tile": [{"name": "t", "core": [core("c[2..1]")]}]
        });
        assert!(matches!(
            elaborate(&arch).unwrap_err(),
            ArchError::MalformedRange { ref name, .. } if name == "c[2..1]"
        ));
    }

    #[test]
    fn failed_verification_writes_nothing() {
        let mut broken = core("c");
        broken.as_object_mut().unwrap().remove("soma");
        let arch = json!({
            "name": "a",
            "attributes": {},
            "tile": [{"name": "t[0..3]", "core": [broken]}]
        });
        let mut out = Vec::new();
        assert!(elaborate_to_writer(&arch, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn document_lookup() {
        let doc = json!({"something_else": {}});
        assert!(architecture_of(&doc).unwrap_err().to_string().contains("no architecture defined"));
    }
}
