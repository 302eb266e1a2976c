use crate::common::*;
use matrix_util::common_io::{mkdir, write_types};
use mcmc_util::comparison::pointwise_elpd;
use mcmc_util::log_lik::extract_log_likelihoods;

#[derive(Args, Debug)]
pub struct ElpdArgs {
    /// Model (sub-directory of `--fit-dir`)
    model: Box<str>,

    #[command(flatten)]
    fits: FitArgs,

    #[command(flatten)]
    criterion: CriterionArgs,

    /// Output file, one elpd per observation
    #[arg(long, short, required = true)]
    out: Box<str>,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

pub fn run_elpd(args: &ElpdArgs) -> anyhow::Result<()> {
    init_logger(args.verbose);

    let store = args.fits.store();
    let config = args.criterion.config(args.verbose);

    let log_lik = extract_log_likelihoods(&store, &args.model, config.channel)?
        .select(config.channel)?;
    let elpd = pointwise_elpd(&log_lik, config.metric, config.waic_formula, &args.model)?;

    info!(
        "{}: {} elpd = {:.2} over {} observations",
        args.model,
        config.metric,
        elpd.sum(),
        elpd.len()
    );

    mkdir(&args.out)?;
    write_types(&elpd.to_vec(), &args.out)?;
    info!("wrote {}", args.out);
    Ok(())
}
