extern crate clap;
use clap::*;
use tracing_subscriber::EnvFilter;

mod cmd_hmr;

fn main() -> anyhow::Result<()> {
    let app = Command::new("hmr")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`hmr` - Hi-C contig partitioning")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log every window trial step"),
        )
        .subcommand(cmd_hmr::partition::make_subcommand())
        .subcommand(cmd_hmr::dump::make_subcommand())
        .after_help(
            r###"Subcommands:

* partition - Split contigs into K groups from a Hi-C link graph
* dump      - Print a contig table or the contig names of each group

Logging goes to stderr. RUST_LOG overrides the level set by --verbose.

"###,
        );

    let matches = app.get_matches();

    let level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    match matches.subcommand() {
        Some(("partition", sub_matches)) => cmd_hmr::partition::execute(sub_matches),
        Some(("dump", sub_matches)) => cmd_hmr::dump::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
