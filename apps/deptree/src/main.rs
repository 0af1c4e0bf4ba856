use anyhow::Result;
use clap::Parser;
use deptree_core::read_graph;
use deptree_module_tree::{Config, analyze, print_stats, print_tree};
use log::{debug, info};
use std::io::{BufWriter, IsTerminal, Write};
use std::time::Instant;

const USAGE: &str = "\
Pipe a module dependency graph to deptree:
ruff analyze graph src | deptree

Options:
    -q, --quantile <PERCENTILE>  Hot/cold boundary percentile, e.g. 99.9 [default: 95]
        --hide-zero              Hide modules without any relations
        --hide-deps              Hide modules discovered only as dependencies
        --deps                   Show nothing but dependencies
        --hide-stats             Skip the statistics summary
        --preserve-case          Keep the case of import paths";

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let config = Config::parse();
    debug!("Parsed CLI arguments: {:?}", config);

    if std::io::stdin().is_terminal() {
        eprintln!("{USAGE}");
        std::process::exit(2);
    }

    let start = Instant::now();

    let files = read_graph(std::io::stdin().lock())?;
    info!("Read a graph of {} files from stdin", files.len());

    let analysis = analyze(&files, &config)?;
    let options = config.draw_options(analysis.dependencies_quantile);

    print_tree(&mut stdout, &analysis, options)?;
    if !config.hide_stats {
        print_stats(
            &mut stdout,
            config.quantile,
            analysis.dependencies_quantile,
            analysis.stats.as_ref(),
        )?;
    }
    stdout.flush()?;

    info!("Finished in {}ms on {} files", start.elapsed().as_millis(), files.len());
    Ok(())
}
