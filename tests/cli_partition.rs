use assert_cmd::prelude::*;
use hmr::libs::graph::{save_graph, Contig, EdgeRecord};
use hmr::libs::group::load_groups;
use predicates::prelude::*;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn two_triples(temp: &TempDir) -> anyhow::Result<(PathBuf, PathBuf)> {
    let contigs: Vec<Contig> = (0..6).map(|i| Contig::new(&format!("ctg{}", i), 100)).collect();
    let records = vec![
        EdgeRecord::new(0, 1, 10.0),
        EdgeRecord::new(1, 2, 9.0),
        EdgeRecord::new(2, 3, 1.0),
        EdgeRecord::new(3, 4, 10.0),
        EdgeRecord::new(4, 5, 9.0),
    ];
    let contig_file = temp.path().join("test.hmr_contig");
    let edge_file = temp.path().join("test.hmr_edge");
    save_graph(&contig_file, &edge_file, &contigs, &records)?;
    Ok((contig_file, edge_file))
}

#[test]
fn command_partition_two_groups() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let (contig_file, edge_file) = two_triples(&temp)?;
    let output = temp.path().join("out.hmr_group");

    let mut cmd = Command::cargo_bin("hmr")?;
    cmd.arg("partition")
        .arg(&contig_file)
        .arg(&edge_file)
        .arg("-g")
        .arg("2")
        .arg("-t")
        .arg("2")
        .arg("-o")
        .arg(&output);
    cmd.assert().success();

    let groups = load_groups(&output)?;
    assert_eq!(
        groups,
        vec![BTreeSet::from([0, 1, 2]), BTreeSet::from([3, 4, 5])]
    );

    Ok(())
}

#[test]
fn command_partition_single_group() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let (contig_file, edge_file) = two_triples(&temp)?;
    let output = temp.path().join("one.hmr_group");

    let mut cmd = Command::cargo_bin("hmr")?;
    cmd.arg("partition")
        .arg(&contig_file)
        .arg(&edge_file)
        .arg("-g")
        .arg("1")
        .arg("-o")
        .arg(&output);
    cmd.assert().success();

    let groups = load_groups(&output)?;
    assert_eq!(groups, vec![(0..6).collect::<BTreeSet<_>>()]);

    Ok(())
}

#[test]
fn command_partition_without_edges() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let contigs: Vec<Contig> = (0..4).map(|i| Contig::new(&format!("ctg{}", i), 10)).collect();
    let contig_file = temp.path().join("lone.hmr_contig");
    let edge_file = temp.path().join("lone.hmr_edge");
    save_graph(&contig_file, &edge_file, &contigs, &[])?;
    let output = temp.path().join("lone.hmr_group");

    let mut cmd = Command::cargo_bin("hmr")?;
    cmd.arg("partition")
        .arg(&contig_file)
        .arg(&edge_file)
        .arg("-g")
        .arg("2")
        .arg("-o")
        .arg(&output);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("unassigned"));

    assert!(load_groups(&output)?.is_empty());

    Ok(())
}

#[test]
fn command_partition_too_many_groups() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let (contig_file, edge_file) = two_triples(&temp)?;
    let output = temp.path().join("fail.hmr_group");

    let mut cmd = Command::cargo_bin("hmr")?;
    cmd.arg("partition")
        .arg(&contig_file)
        .arg(&edge_file)
        .arg("-g")
        .arg("3")
        .arg("-o")
        .arg(&output);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no partition into 3 groups"));

    assert!(!output.exists());

    Ok(())
}

#[test]
fn command_partition_bad_edge() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let contigs = vec![Contig::new("a", 10), Contig::new("b", 10)];
    let contig_file = temp.path().join("bad.hmr_contig");
    let edge_file = temp.path().join("bad.hmr_edge");
    save_graph(&contig_file, &edge_file, &contigs, &[EdgeRecord::new(0, 7, 1.0)])?;

    let mut cmd = Command::cargo_bin("hmr")?;
    cmd.arg("partition")
        .arg(&contig_file)
        .arg(&edge_file)
        .arg("-g")
        .arg("2")
        .arg("-o")
        .arg(temp.path().join("bad.hmr_group"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("outside 0..2"));

    Ok(())
}

#[test]
fn command_partition_missing_groups() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let (contig_file, edge_file) = two_triples(&temp)?;

    let mut cmd = Command::cargo_bin("hmr")?;
    cmd.arg("partition").arg(&contig_file).arg(&edge_file);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--groups"));

    Ok(())
}
