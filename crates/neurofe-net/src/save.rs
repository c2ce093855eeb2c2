//! Network text writer.
//!
//! Record order: `x`, every `g` header, the per-neuron `n`/`e`/`&` blocks,
//! then the `<` input lines. Records are written straight to the sink as
//! they are produced, so peak memory does not grow with the network.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::Path;

use log::{debug, info};

use crate::error::{NetError, Result};
use crate::network::{Input, Network, Neuron, NeuronGroup, NeuronParams};
use crate::value::Value;

fn flag(on: bool) -> u8 {
    u8::from(on)
}

fn write_value<W: Write>(w: &mut W, key: &str, value: &Option<Value>) -> Result<()> {
    if let Some(v) = value {
        write!(w, " {}={}", key, v)?;
    }
    Ok(())
}

fn write_text<W: Write>(w: &mut W, key: &str, value: &Option<String>) -> Result<()> {
    if let Some(v) = value {
        write!(w, " {}={}", key, v)?;
    }
    Ok(())
}

fn write_flag<W: Write>(w: &mut W, key: &str, value: Option<bool>) -> Result<()> {
    if let Some(v) = value {
        write!(w, " {}={}", key, flag(v))?;
    }
    Ok(())
}

pub(crate) fn write_group<W: Write>(w: &mut W, group: &NeuronGroup) -> Result<()> {
    let p = group.params();
    write!(w, "g {}", group.len())?;
    write_value(w, "threshold", &p.threshold)?;
    write_value(w, "reset", &p.reset)?;
    write_value(w, "reverse_threshold", &p.reverse_threshold)?;
    write_value(w, "reverse_reset", &p.reverse_reset)?;
    write_value(w, "leak_decay", &p.leak_decay)?;
    write_text(w, "reset_mode", &p.reset_mode)?;
    write_text(w, "reverse_reset_mode", &p.reverse_reset_mode)?;
    write_flag(w, "log_spikes", p.log_spikes)?;
    write_flag(w, "log_v", p.log_v)?;
    write_flag(w, "force_update", p.force_update)?;
    if let Some(cap) = p.connections_out {
        write!(w, " connections_out={}", cap)?;
    }
    writeln!(w)?;
    Ok(())
}

/// `connections_out` written on the neuron line, if any.
///
/// Emitted when the group declares no cap, or when the neuron has
/// connections and more of them than the cap allows.
fn connections_out_override(neuron: &Neuron, cap: Option<usize>) -> Option<usize> {
    let count = neuron.connections().len();
    match cap {
        None => Some(count),
        Some(cap) if count > 0 && count > cap => Some(count),
        Some(_) => None,
    }
}

pub(crate) fn write_neuron<W: Write>(
    w: &mut W,
    neuron: &Neuron,
    group: &NeuronGroup,
    save_mappings: bool,
) -> Result<()> {
    let address = neuron.address();
    write!(w, "n {}", address)?;
    if let Some(kind) = neuron.kind() {
        write!(w, " type={}", kind)?;
    }
    if let Some(bias) = neuron.bias() {
        write!(w, " bias={}", bias)?;
    }
    match neuron.params() {
        NeuronParams::Custom(params) => {
            for (key, value) in params {
                write!(w, " {}={}", key, value)?;
            }
        }
        NeuronParams::Flags(flags) => {
            write_flag(w, "log_spikes", flags.log_spikes)?;
            write_flag(w, "log_v", flags.log_v)?;
            write_flag(w, "force_update", flags.force_update)?;
            if let Some(count) = connections_out_override(neuron, group.params().connections_out) {
                write!(w, " connections_out={}", count)?;
            }
        }
    }
    writeln!(w)?;

    for conn in neuron.connections() {
        writeln!(w, "e {}->{} w={}", address, conn.dest, conn.weight.edge_text())?;
    }

    if save_mappings {
        let placement = neuron.placement().ok_or_else(|| NetError::Unplaced {
            address: address.to_string(),
        })?;
        writeln!(w, "& {}@{}", address, placement)?;
    }
    Ok(())
}

pub(crate) fn write_input<W: Write>(w: &mut W, input: &Input) -> Result<()> {
    write!(w, "< {}", input.id().raw())?;
    for conn in input.connections() {
        write!(w, " {} {} {}", conn.dest.group, conn.dest.neuron, conn.weight)?;
    }
    writeln!(w)?;
    Ok(())
}

impl Network {
    /// Write every group, neuron and input
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        self.save_groups(writer, 0..self.groups().len())
    }

    /// Write only the groups in `range` (clamped to the existing groups).
    /// The `x` header and every input are always written.
    pub fn save_groups<W: Write>(&self, mut writer: W, range: Range<usize>) -> Result<()> {
        let end = range.end.min(self.groups().len());
        let start = range.start.min(end);
        let groups = &self.groups()[start..end];

        if self.external_inputs() > 0 {
            writeln!(writer, "x {} rate", self.external_inputs())?;
        }
        for group in groups {
            write_group(&mut writer, group)?;
        }

        let mut neurons = 0usize;
        let mut edges = 0usize;
        for group in groups {
            debug!("Writing group {} ({} neurons)", group.id(), group.len());
            for neuron in group.neurons() {
                write_neuron(&mut writer, neuron, group, self.save_mappings())?;
                neurons += 1;
                edges += neuron.connections().len();
            }
        }

        for input in self.inputs() {
            write_input(&mut writer, input)?;
        }
        writer.flush()?;

        info!(
            "Saved {} groups, {} neurons, {} connections, {} inputs",
            groups.len(),
            neurons,
            edges,
            self.inputs().len()
        );
        Ok(())
    }

    /// Save to a file, replacing it
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("Saving network to {}", path.display());
        let file = File::create(path)?;
        self.save(BufWriter::new(file))
    }

    /// Render the whole network as text
    pub fn to_text(&self) -> Result<String> {
        let mut out = Vec::new();
        self.save(&mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Placement;
    use crate::network::{GroupParams, NeuronFlags};
    use crate::value::Weight;

    fn lines(net: &Network) -> Vec<String> {
        net.to_text().unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn group_header_field_order() {
        let mut net = Network::new();
        net.create_group(
            GroupParams::new(1.0, 0.0, 1.0)
                .reverse_threshold(-1.0)
                .reverse_reset(0)
                .reset_mode("hard")
                .reverse_reset_mode("saturate")
                .log_spikes(true)
                .connections_out(4),
        );
        assert_eq!(
            lines(&net),
            vec![
                "g 0 threshold=1.0 reset=0.0 reverse_threshold=-1.0 reverse_reset=0 \
                 leak_decay=1.0 reset_mode=hard reverse_reset_mode=saturate \
                 log_spikes=1 log_v=0 force_update=0 connections_out=4"
            ]
        );
    }

    #[test]
    fn unset_fields_are_omitted() {
        let mut net = Network::new();
        let mut params = GroupParams::new(1.0, 0.0, 1.0);
        params.log_spikes = None;
        params.log_v = None;
        params.force_update = None;
        params.leak_decay = None;
        net.create_group(params);
        assert_eq!(lines(&net), vec!["g 0 threshold=1.0 reset=0.0"]);
    }

    #[test]
    fn neuron_blocks_and_inputs() {
        let mut net = Network::new().with_external_inputs(2);
        let g = net.create_group(GroupParams::new(1.0, 0.0, 1.0));
        let a = net.group_mut(g).unwrap().create_neuron(NeuronFlags {
            log_spikes: Some(true),
            ..NeuronFlags::default()
        });
        let b = net.group_mut(g).unwrap().create_neuron(NeuronFlags::default());
        net.connect(a, b, 1.0).unwrap();
        net.connect(a, b, Weight::from("w_exc")).unwrap();
        net.neuron_mut(b).unwrap().add_bias(0.5);
        let input = net.create_input();
        net.connect_input(input, a, 0.25).unwrap();
        net.connect_input(input, b, 2i64).unwrap();

        assert_eq!(
            lines(&net),
            vec![
                "x 2 rate",
                "g 2 threshold=1.0 reset=0.0 leak_decay=1.0 log_spikes=0 log_v=0 force_update=0",
                "n 0.0 type=lif log_spikes=1 connections_out=2",
                "e 0.0->0.1 w=1.00000e+00",
                "e 0.0->0.1 w=w_exc",
                "n 0.1 type=lif bias=0.5 connections_out=0",
                "< 0 0 0 0.25 0 1 2",
            ]
        );
    }

    #[test]
    fn connections_out_override_rule() {
        let mut net = Network::new();
        let g = net.create_group(GroupParams::new(1.0, 0.0, 1.0).connections_out(1));
        let a = net.group_mut(g).unwrap().create_neuron(NeuronFlags::default());
        let b = net.group_mut(g).unwrap().create_neuron(NeuronFlags::default());
        let c = net.group_mut(g).unwrap().create_neuron(NeuronFlags::default());
        net.connect(a, b, 0.5).unwrap();
        net.connect(b, a, 0.5).unwrap();
        net.connect(b, c, 0.5).unwrap();

        let text = lines(&net);
        assert!(text.contains(&"n 0.0 type=lif".to_string()));
        assert!(text.contains(&"n 0.1 type=lif connections_out=2".to_string()));
        assert!(text.contains(&"n 0.2 type=lif".to_string()));
    }

    #[test]
    fn custom_parameters_replace_flags() {
        let mut net = Network::new();
        let g = net.create_group(GroupParams::new(1.0, 0.0, 1.0));
        net.group_mut(g).unwrap().create_typed_neuron(
            "loihi",
            vec![("leak".to_string(), Value::from(0.5)), ("reset".to_string(), Value::from(0))],
        );
        assert_eq!(lines(&net)[1], "n 0.0 type=loihi leak=0.5 reset=0");
    }

    #[test]
    fn placements_written_when_enabled() {
        let mut net = Network::new().with_save_mappings(true);
        let g = net.create_group(GroupParams::new(1.0, 0.0, 1.0));
        let a = net.group_mut(g).unwrap().create_neuron(NeuronFlags::default());
        net.neuron_mut(a).unwrap().set_placement(Placement::new(3, 1));
        assert_eq!(lines(&net)[2], "& 0.0@3.1");

        net.group_mut(g).unwrap().create_neuron(NeuronFlags::default());
        assert!(matches!(net.to_text(), Err(NetError::Unplaced { .. })));
    }

    #[test]
    fn group_slice() {
        let mut net = Network::new();
        for _ in 0..3 {
            let g = net.create_group(GroupParams::new(1.0, 0.0, 1.0));
            net.group_mut(g).unwrap().create_neuron(NeuronFlags::default());
        }
        let mut out = Vec::new();
        net.save_groups(&mut out, 1..2).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with('g')).count(), 1);
        assert!(text.contains("n 1.0"));
        assert!(!text.contains("n 0.0") && !text.contains("n 2.0"));
    }
}
