// File: crates/graph-cli/src/main.rs
// Summary: rrdgraph entry point: logging setup, chart build and run, exit status mapping.

mod cli;

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rrdgraph_core::{build_command, charts, filter_dump, Blacklist, GraphError, RenderOptions, RrdTool};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, FilterArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .chain()
                .find_map(|e| e.downcast_ref::<GraphError>())
                .and_then(GraphError::exit_code)
                .and_then(|c| u8::try_from(c).ok())
                .filter(|&c| c != 0)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let renderer = RrdTool::new(&cli.rrdtool);
    let id = cli.command.chart_id();
    let (chart, job) = match &cli.command {
        Command::Normal(a) | Command::Diff(a) | Command::Spread(a) => (&a.chart, a.job()),
        Command::Overlap(a) | Command::OverlapDiff(a) => (&a.chart, a.job()),
        Command::FilterXml(a) => return filter_xml(a),
    };
    let id = id.ok_or_else(|| anyhow!("no chart for this subcommand"))?;
    let def = charts::find(id).ok_or_else(|| anyhow!("unknown chart `{id}`"))?;

    let command = build_command(&def, &job, &renderer, &RenderOptions::default())
        .with_context(|| format!("building `{id}` chart for {}", job.rrd.display()))?;
    command.run(chart.mode(), &renderer)?;
    Ok(())
}

fn filter_xml(args: &FilterArgs) -> Result<()> {
    let open = |path: &std::path::Path| {
        File::open(path).with_context(|| format!("opening {}", path.display())).map(BufReader::new)
    };
    let blacklist = Blacklist::from_reader(open(&args.blacklist)?)?;
    let output = File::create(&args.output).with_context(|| format!("creating {}", args.output.display()))?;
    let rewritten = filter_dump(open(&args.input)?, BufWriter::new(output), &blacklist)?;
    info!("blacklisted {rewritten} lines ({} ranges)", blacklist.ranges().len());
    Ok(())
}
