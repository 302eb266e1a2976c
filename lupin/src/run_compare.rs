use crate::common::*;
use matrix_util::common_io::write_lines;
use mcmc_util::comparison::compare_models;

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// First model (sub-directory of `--fit-dir`)
    model_a: Box<str>,

    /// Second model
    model_b: Box<str>,

    #[command(flatten)]
    fits: FitArgs,

    #[command(flatten)]
    criterion: CriterionArgs,

    /// Output file (default: stdout)
    #[arg(long, short, default_value = "stdout")]
    out: Box<str>,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

/// The report goes to `--out`; the library doesn't log it again
fn comparison_config(args: &CompareArgs) -> ComparisonConfig {
    args.criterion.config(false)
}

pub fn run_compare(args: &CompareArgs) -> anyhow::Result<()> {
    init_logger(args.verbose);

    let store = args.fits.store();
    let config = comparison_config(args);

    info!(
        "comparing {} and {} by {} on {}",
        args.model_a, args.model_b, config.metric, config.channel
    );

    let ret = compare_models(&store, &args.model_a, &args.model_b, &config)?;
    write_lines(&ret.report(), &args.out)?;
    Ok(())
}
