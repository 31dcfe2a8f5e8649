use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::info;

use numeric_binner::binning::CancelFlag;
use numeric_binner::data::{loader, writer};
use numeric_binner::node::{BinnerNode, OUTPUT_COLUMN_NAME};
use numeric_binner::settings::BinnerSettings;

const USAGE: &str = "usage: numeric-binner <input.{csv,json,parquet}> \
[--column NAME] [--bins N] [--settings FILE] \
[--output FILE] [--internals DIR] [--intervals FILE]";

/// Command line options.
#[derive(Debug, Default)]
struct Options {
    input: PathBuf,
    column: Option<String>,
    bins: Option<i64>,
    settings: Option<PathBuf>,
    output: Option<PathBuf>,
    internals: Option<PathBuf>,
    intervals: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options> {
    let mut opts = Options::default();
    let mut input = None;

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().with_context(|| format!("{flag} needs a value"));
        match arg.as_str() {
            "--column" => opts.column = Some(value("--column")?),
            "--bins" => {
                let raw = value("--bins")?;
                opts.bins = Some(raw.parse().with_context(|| format!("invalid --bins '{raw}'"))?);
            }
            "--settings" => opts.settings = Some(value("--settings")?.into()),
            "--output" => opts.output = Some(value("--output")?.into()),
            "--internals" => opts.internals = Some(value("--internals")?.into()),
            "--intervals" => opts.intervals = Some(value("--intervals")?.into()),
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
            path => {
                if input.replace(PathBuf::from(path)).is_some() {
                    bail!("more than one input file given\n{USAGE}");
                }
            }
        }
    }

    opts.input = input.with_context(|| format!("no input file given\n{USAGE}"))?;
    Ok(opts)
}

/// Settings file first, individual flags override it.
fn resolve_settings(opts: &Options) -> Result<BinnerSettings> {
    let mut settings = match &opts.settings {
        Some(path) => BinnerSettings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => BinnerSettings::default(),
    };
    if let Some(column) = &opts.column {
        settings.column_name = column.clone();
    }
    if let Some(bins) = opts.bins {
        settings.number_of_bins = bins;
    }
    settings.validate()?;
    Ok(settings)
}

fn main() -> Result<()> {
    env_logger::init();

    let opts = parse_args(std::env::args().skip(1))?;
    let settings = resolve_settings(&opts)?;
    let table = loader::load_file(&opts.input)
        .with_context(|| format!("loading {}", opts.input.display()))?;

    let mut node = BinnerNode::new(settings);
    node.configure(&table).context("configuring binner")?;
    let labels = node.execute(&table, &CancelFlag::new())?;

    if let Some(bins) = node.bins() {
        for (i, bin) in bins.bins().iter().enumerate() {
            match bins.intervals().and_then(|ivs| ivs.get(i)) {
                Some(iv) => info!(
                    "bin {i}: ({}, {}] {} rows",
                    iv.lower_bound,
                    iv.upper_bound,
                    bin.size()
                ),
                None => info!("bin {i}: {} rows", bin.size()),
            }
        }
    }

    match &opts.output {
        Some(path) => writer::write_csv(&table, &labels, OUTPUT_COLUMN_NAME, path)?,
        None => {
            for (row, label) in table.rows.iter().zip(&labels) {
                match label {
                    Some(l) => println!("{}\t{l}", row.key),
                    None => println!("{}\t", row.key),
                }
            }
        }
    }

    if let Some(dir) = &opts.internals {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
        node.save_internals(dir)?;
    }

    if let Some(path) = &opts.intervals {
        if let Some(model) = node.interval_model() {
            std::fs::write(path, model.to_json()?)
                .with_context(|| format!("writing {}", path.display()))?;
        }
    }

    Ok(())
}
