use assert_cmd::Command;
use predicates::prelude::*;
use std::error::Error;
use std::fs;
use tempfile::tempdir;

const MESH: &str = r#"{
  "architecture": {
    "name": "loihi",
    "attributes": {"topology": "mesh"},
    "tile": [{
      "name": "t[0..1]",
      "core": [{
        "name": "c[0..0]",
        "axon_in": [{"attributes": {}}],
        "synapse": [{"attributes": {}}],
        "dendrite": [{"attributes": {}}],
        "soma": [{"attributes": {}}],
        "axon_out": [{"attributes": {}}]
      }]
    }]
  }
}"#;

#[test]
fn elaborate_writes_exact_listing() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let input = tmp.path().join("mesh.json");
    let out = tmp.path().join("mesh.parsed");
    fs::write(&input, MESH)?;

    let mut cmd = Command::cargo_bin("neurofe")?;
    cmd.arg("arch").arg("elaborate").arg(&input).arg("-o").arg(&out);
    cmd.assert().success();

    let listing = fs::read_to_string(&out)?;
    assert_eq!(
        listing,
        "t\nc 0\ni 0 0\ns 0 0\nd 0 0\n+ 0 0\no 0 0\n\
         t\nc 0\ni 1 0\ns 1 0\nd 1 0\n+ 1 0\no 1 0\n\
         @ topology=mesh\n"
    );
    Ok(())
}

#[test]
fn elaborate_defaults_to_run_dir() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let input = tmp.path().join("mesh.json");
    let config = tmp.path().join("config.toml");
    let run_dir = tmp.path().join("runs");
    fs::write(&input, MESH)?;
    fs::write(&config, format!("run_dir = {:?}\n", run_dir.to_string_lossy()))?;

    let mut cmd = Command::cargo_bin("neurofe")?;
    cmd.arg("--config").arg(&config).arg("arch").arg("elaborate").arg(&input);
    cmd.assert().success();

    let listing = fs::read_to_string(run_dir.join("mesh.json.parsed"))?;
    assert!(listing.ends_with("@ topology=mesh\n"));
    Ok(())
}

#[test]
fn elaborate_toml_input() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let input = tmp.path().join("chip.toml");
    let out = tmp.path().join("chip.parsed");
    fs::write(
        &input,
        r#"
[architecture]
name = "chip"

[architecture.attributes]
width = 2
height = 1

[[architecture.tile]]
name = "tile[0..1]"

[[architecture.tile.core]]
name = "core"
attributes = { buffer_pos = "soma" }
axon_in = { attributes = {} }
synapse = { attributes = { model = "cuba" } }
dendrite = { attributes = {} }
soma = { attributes = { model = "lif" } }
axon_out = { attributes = {} }
"#,
    )?;

    let mut cmd = Command::cargo_bin("neurofe")?;
    cmd.arg("arch").arg("elaborate").arg(&input).arg("-o").arg(&out);
    cmd.assert().success();

    let listing = fs::read_to_string(&out)?;
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 2 * 7 + 1);
    assert_eq!(lines[1], "c 0 buffer_pos=soma");
    assert_eq!(lines[3], "s 0 0 model=cuba");
    assert_eq!(lines[12], "+ 1 0 model=lif");
    assert_eq!(lines[14], "@ width=2 height=1");
    Ok(())
}

#[test]
fn structural_error_fails_without_output() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let input = tmp.path().join("bad.json");
    let out = tmp.path().join("bad.parsed");
    fs::write(
        &input,
        r#"{"architecture": {"name": "chip", "attributes": {}, "tile": [
            {"name": "t", "core": [{"name": "c[0..1]", "axon_in": {}, "synapse": {}, "dendrite": {}, "soma": {}}]}
        ]}}"#,
    )?;

    let mut cmd = Command::cargo_bin("neurofe")?;
    cmd.arg("arch").arg("elaborate").arg(&input).arg("-o").arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("axon_out").and(predicate::str::contains("c[0..1]")));
    assert!(!out.exists());
    Ok(())
}

#[test]
fn missing_architecture_key_fails() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let input = tmp.path().join("empty.json");
    fs::write(&input, r#"{"network": {}}"#)?;

    let mut cmd = Command::cargo_bin("neurofe")?;
    cmd.arg("arch").arg("check").arg(&input);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no architecture defined"));
    Ok(())
}

#[test]
fn check_reports_counts() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let input = tmp.path().join("mesh.json");
    fs::write(&input, MESH)?;

    let mut cmd = Command::cargo_bin("neurofe")?;
    cmd.arg("arch").arg("check").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("tiles:    2"))
        .stdout(predicate::str::contains("soma:     2"))
        .stdout(predicate::str::contains("records:  15"));
    Ok(())
}

#[test]
fn elaborate_missing_input_fails() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("neurofe")?;
    cmd.args(["arch", "elaborate", "/no/such/arch.json", "-o", "/tmp/unused.parsed"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
    Ok(())
}

#[test]
fn elaborate_yaml_input() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let input = tmp.path().join("loihi.arch");
    let out = tmp.path().join("loihi.parsed");
    fs::write(
        &input,
        r#"
architecture:
  name: loihi
  attributes: {topology: mesh}
  tile:
    - name: t[0..1]
      core:
        - name: c[0..0]
          axon_in: [{attributes: {}}]
          synapse: [{attributes: {}}]
          dendrite: [{attributes: {}}]
          soma: [{attributes: {}}]
          axon_out: [{attributes: {}}]
"#,
    )?;

    let mut cmd = Command::cargo_bin("neurofe")?;
    cmd.arg("arch").arg("elaborate").arg(&input).arg("-o").arg(&out);
    cmd.assert().success();

    let listing = fs::read_to_string(&out)?;
    assert_eq!(
        listing,
        "t\nc 0\ni 0 0\ns 0 0\nd 0 0\n+ 0 0\no 0 0\n\
         t\nc 0\ni 1 0\ns 1 0\nd 1 0\n+ 1 0\no 1 0\n\
         @ topology=mesh\n"
    );
    Ok(())
}

#[test]
fn unwritable_output_directory_names_the_path() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let input = tmp.path().join("mesh.json");
    let blocker = tmp.path().join("afile");
    fs::write(&input, MESH)?;
    fs::write(&blocker, "not a directory")?;

    let mut cmd = Command::cargo_bin("neurofe")?;
    cmd.arg("arch")
        .arg("elaborate")
        .arg(&input)
        .arg("-o")
        .arg(blocker.join("out.parsed"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("creating output directory").and(predicate::str::contains("afile")));
    Ok(())
}
