use clap::*;
use hmr::libs::graph::ContigGraph;
use hmr::libs::group::save_groups;
use hmr::libs::partition::{partition, PartitionConfig};
use tracing::{info, warn};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("partition")
        .about("Partition contigs into groups by Hi-C links")
        .after_help(
            r###"
Contigs are split into K groups of similar total length. Core groups are
seeded from the strongest links, then the remaining contigs are attached
one at a time. Several window sizes are tried in parallel and the most even
partition is kept.

Input formats, little-endian:
* contigs: u64 count, then per contig i32 name length, name, i32 length
* edges:   u64 count, then per edge i32 start, i32 end, f64 weight

Output: i32 group count, then per group i32 size and i32 contig ids.

Examples:
1. Split into 24 groups with 8 threads:
   hmr partition genome.hmr_contig genome.hmr_edge -g 24 -t 8 -o genome.hmr_group

2. Show every trial step:
   hmr partition genome.hmr_contig genome.hmr_edge -g 2 -v

"###,
        )
        .arg(
            Arg::new("contigs")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Contig file"),
        )
        .arg(
            Arg::new("edges")
                .required(true)
                .num_args(1)
                .index(2)
                .help("Edge file"),
        )
        .arg(
            Arg::new("groups")
                .long("groups")
                .short('g')
                .required(true)
                .num_args(1)
                .value_parser(value_parser!(usize))
                .help("Number of groups"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('t')
                .num_args(1)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Number of threads, also windows tried per batch. 0 for all cores"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("out.hmr_group")
                .help("Output group file"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let contigs = args.get_one::<String>("contigs").unwrap();
    let edges = args.get_one::<String>("edges").unwrap();
    let outfile = args.get_one::<String>("outfile").unwrap();
    let config = PartitionConfig::new(
        *args.get_one::<usize>("groups").unwrap(),
        *args.get_one::<usize>("threads").unwrap(),
    );

    let graph = ContigGraph::load(contigs, edges)?;
    info!(
        contigs = graph.len(),
        edges = graph.edge_count(),
        "graph loaded"
    );

    let result = partition(&graph, &config)?;

    for (index, (group, length)) in result
        .groups
        .iter()
        .zip(result.group_lengths(&graph))
        .enumerate()
    {
        info!(group = index, contigs = group.len(), length, "group");
    }
    if !result.unassigned.is_empty() {
        warn!(contigs = result.unassigned.len(), "contigs left unassigned");
    }

    save_groups(outfile, &result.groups)?;
    info!(outfile = outfile.as_str(), "groups written");

    Ok(())
}
