//! Network text reader.
//!
//! Only group sizes and neuron-to-neuron edges are restored. `g` records
//! recreate each group with default parameters and the stated number of
//! neurons; `e` records reconnect them. `x`, `n`, `&` and `<` records are
//! accepted and skipped, so group parameters, placements and inputs do not
//! survive a save/load cycle.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};

use crate::error::{NetError, Result};
use crate::network::{GroupParams, Network, NeuronAddress, NeuronFlags};
use crate::value::Weight;

fn resolve(net: &Network, line: usize, text: &str) -> Result<NeuronAddress> {
    let address: NeuronAddress = text.parse().map_err(|reason: String| NetError::parse(line, reason))?;
    net.neuron(address)
        .map(|n| n.address())
        .map_err(|_| NetError::lookup(line, text))
}

fn load_group(net: &mut Network, line: usize, fields: &[&str]) -> Result<()> {
    let count: usize = fields
        .get(1)
        .ok_or_else(|| NetError::parse(line, "group record without neuron count"))?
        .parse()
        .map_err(|_| NetError::parse(line, format!("bad neuron count '{}'", fields[1])))?;

    let id = net.create_group(GroupParams::new(0.0, 0.0, 0));
    debug!("Group {} with {} neurons (line {})", id, count, line);
    let group = net.group_mut(id)?;
    for _ in 0..count {
        group.create_neuron(NeuronFlags::default());
    }
    Ok(())
}

fn load_edge(net: &mut Network, line: usize, fields: &[&str]) -> Result<()> {
    let edge = fields
        .get(1)
        .ok_or_else(|| NetError::parse(line, "edge record without endpoints"))?;
    let (src, dest) = edge
        .split_once("->")
        .ok_or_else(|| NetError::parse(line, format!("expected 'src->dest', got '{}'", edge)))?;
    let src = resolve(net, line, src)?;
    let dest = resolve(net, line, dest)?;

    let weight = fields[2..]
        .iter()
        .rev()
        .find_map(|f| f.strip_prefix("w=").or_else(|| f.strip_prefix("weight=")))
        .ok_or_else(|| NetError::parse(line, "edge record without weight"))?;

    net.neuron_mut(src)?.add_connection(dest, Weight::parse(weight));
    Ok(())
}

impl Network {
    /// Rebuild a network from text. See the module docs for what is restored.
    pub fn load<R: BufRead>(reader: R) -> Result<Network> {
        let mut net = Network::new();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            let Some(kind) = fields.first() else {
                continue;
            };
            match *kind {
                "g" => load_group(&mut net, line_no, &fields)?,
                "e" => load_edge(&mut net, line_no, &fields)?,
                "x" | "n" | "&" | "<" => {}
                k if k.starts_with('#') => {}
                other => warn!("Skipping unknown record '{}' at line {}", other, line_no),
            }
        }
        info!(
            "Loaded {} groups, {} neurons, {} connections",
            net.groups().len(),
            net.neuron_count(),
            net.connection_count()
        );
        Ok(net)
    }

    /// Load from a file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        info!("Loading network from {}", path.display());
        let file = File::open(path)?;
        Network::load(BufReader::new(file))
    }

    /// Load from an in-memory string
    pub fn load_str(text: &str) -> Result<Network> {
        Network::load(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Weight;

    #[test]
    fn restores_groups_and_edges() {
        let text = "\
x 4 rate
g 2 threshold=3.0 reset=1.0
g 1
# comment

n 0.0 type=lif
e 0.0->1.0 w=5.00000e-01
e 1.0->0.1 w=w_exc
& 0.0@1.1
< 0 0 0 1.0
";
        let net = Network::load_str(text).unwrap();
        assert_eq!(net.groups().len(), 2);
        assert_eq!(net.external_inputs(), 0);
        assert!(net.inputs().is_empty());
        assert_eq!(net.groups()[0].len(), 2);
        assert_eq!(net.groups()[0].params(), &GroupParams::new(0.0, 0.0, 0));

        let a = net.neuron(NeuronAddress::new(0, 0)).unwrap();
        assert_eq!(a.connections()[0].dest, NeuronAddress::new(1, 0));
        assert_eq!(a.connections()[0].weight, Weight::Float(0.5));
        assert!(a.placement().is_none());
        let b = net.neuron(NeuronAddress::new(1, 0)).unwrap();
        assert_eq!(b.connections()[0].weight, Weight::Symbolic("w_exc".into()));
    }

    #[test]
    fn forward_reference_is_lookup_error() {
        let err = Network::load_str("g 1\ne 0.0->1.0 w=1.0\ng 1\n").unwrap_err();
        assert!(matches!(err, NetError::Lookup { line: 2, .. }), "{err:?}");
    }

    #[test]
    fn malformed_records() {
        assert!(matches!(Network::load_str("g many"), Err(NetError::Parse { line: 1, .. })));
        assert!(matches!(Network::load_str("g\n"), Err(NetError::Parse { line: 1, .. })));
        assert!(matches!(
            Network::load_str("g 2\ne 0.0-0.1 w=1"),
            Err(NetError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            Network::load_str("g 2\ne 0.0->0.1"),
            Err(NetError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            Network::load_str("g 2\ne 0.x->0.1 w=1"),
            Err(NetError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn unknown_records_are_skipped() {
        let net = Network::load_str("g 1\nz what\n").unwrap();
        assert_eq!(net.neuron_count(), 1);
    }
}
