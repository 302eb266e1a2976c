use crate::common::*;
use matrix_util::common_io::{mkdir, write_lines};
use mcmc_util::hdi::summarize_draws;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Model (sub-directory of `--fit-dir`)
    model: Box<str>,

    #[command(flatten)]
    fits: FitArgs,

    /// Variable to summarize; its first axis indexes draws
    #[arg(long, short = 'x', required = true)]
    variable: Box<str>,

    /// Probability mass of the highest density interval
    #[arg(long, short, default_value_t = 0.95)]
    cred_mass: f64,

    /// Output file
    #[arg(long, short, required = true)]
    out: Box<str>,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

pub fn run_summary(args: &SummaryArgs) -> anyhow::Result<()> {
    init_logger(args.verbose);

    let fit = args.fits.store().load_fit(&args.model)?;
    let draws = fit.get(&args.variable)?;
    info!("{}: {} has shape {:?}", args.model, args.variable, draws.shape());

    let summary = summarize_draws(draws, args.cred_mass)?;

    let mut lines: Vec<Box<str>> = vec!["#name\tmean\tsd\thdi_lb\thdi_ub".into()];
    lines.extend(summary.to_string_vec(&args.variable, "\t"));

    mkdir(&args.out)?;
    write_lines(&lines, &args.out)?;
    info!("wrote {} elements to {}", summary.len(), args.out);
    Ok(())
}
