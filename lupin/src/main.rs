mod common;
mod run_compare;
mod run_elpd;
mod run_summary;

use common::*;
use run_compare::*;
use run_elpd::*;
use run_summary::*;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "LUPIN",
    long_about = "Likelihood-based Universal Posterior INspection\n\
		  Compare fitted hierarchical models by WAIC or PSIS-LOO.\n\
		  Each model's posterior draws are read from `<fit-dir>/<model>/<fit-file>`."
)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Compare two models on the deviance scale",
        long_about = "Compare two models on the deviance scale (-2 x elpd).\n\
		      Prints both totals and the difference with its standard error.\n\
		      Both models must score the same observations in the same order."
    )]
    Compare(CompareArgs),

    /// Write the pointwise elpd of one model
    Elpd(ElpdArgs),

    #[command(
        about = "Posterior mean, sd and HDI of a model variable",
        long_about = "Posterior mean, standard deviation and highest density interval\n\
		      of every element of a variable, one line per element."
    )]
    Summary(SummaryArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.commands {
        Commands::Compare(args) => {
            run_compare(args)?;
        }
        Commands::Elpd(args) => {
            run_elpd(args)?;
        }
        Commands::Summary(args) => {
            run_summary(args)?;
        }
    }

    info!("Done");
    Ok(())
}
