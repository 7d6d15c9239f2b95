use clap::*;
use hmr::libs::graph::read_contigs;
use hmr::libs::group::load_groups;
use itertools::Itertools;
use std::fs::File;
use std::io::BufReader;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("dump")
        .about("Print contigs or groups as text")
        .after_help(
            r###"
Without --group, prints one line per contig: name and length, tab-separated.
With --group, prints one line per group: the member contig names, tab-separated.

Examples:
1. List contigs:
   hmr dump genome.hmr_contig

2. List the contig names of each group:
   hmr dump genome.hmr_contig --group genome.hmr_group -o groups.tsv

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
            Arg::new("group")
                .long("group")
                .num_args(1)
                .help("Group file"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infile = args.get_one::<String>("contigs").unwrap();
    let mut writer = intspan::writer(args.get_one::<String>("outfile").unwrap());

    let contigs = read_contigs(&mut BufReader::new(File::open(infile)?))?;

    match args.get_one::<String>("group") {
        None => {
            for contig in &contigs {
                writer.write_fmt(format_args!("{}\t{}\n", contig.name, contig.length))?;
            }
        }
        Some(group_file) => {
            for group in load_groups(group_file)? {
                let mut names = vec![];
                for &id in &group {
                    match contigs.get(id) {
                        Some(contig) => names.push(contig.name.as_str()),
                        None => anyhow::bail!(
                            "group file references contig {} but only {} contigs exist",
                            id,
                            contigs.len()
                        ),
                    }
                }
                writer.write_fmt(format_args!("{}\n", names.iter().join("\t")))?;
            }
        }
    }

    Ok(())
}
