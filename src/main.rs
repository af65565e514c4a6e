mod app;
mod config;
mod logging;
mod prisma_api;
mod report;
mod secrets;
mod stack;
mod usage;

use anyhow::{Context, Result};
use clap::Parser;
use config::ReportOptions;
use prisma_api::types::{TimeRange, TimeUnit};
use secrets::Credentials;
use stack::Stack;
use usage::GroupFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BILLING_AG_GIT_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "billing-ag")]
#[command(about = "Query the Prisma Cloud API to get average billing per Account Group")]
#[command(version, long_version = LONG_VERSION, disable_version_flag = true)]
#[command(arg(
    clap::Arg::new("version")
        .short('v')
        .long("version")
        .action(clap::ArgAction::Version)
        .help("Print version")
))]
struct Cli {
    /// Prisma Cloud stack to query
    #[arg(value_enum, env = "PRISMA_STACK", required_unless_present = "print")]
    stack: Option<Stack>,

    /// Print the available stacks and exit
    #[arg(short, long)]
    print: bool,

    /// Relative time range amount used for usage queries
    #[arg(
        short = 't',
        long,
        env = "BILLING_AG_TIME_AMOUNT",
        default_value_t = TimeRange::DEFAULT_AMOUNT,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    time_amount: u32,

    /// Relative time range unit used for usage queries
    #[arg(
        short = 'u',
        long,
        value_enum,
        env = "BILLING_AG_TIME_UNIT",
        default_value_t = TimeUnit::Day
    )]
    time_unit: TimeUnit,

    /// Only report these account groups (repeatable)
    #[arg(short, long = "include", value_name = "NAME")]
    include: Vec<String>,

    /// Leave these account groups out of the report (repeatable)
    #[arg(short, long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,

    /// More diagnostics on stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}

impl Cli {
    fn report_options(&self) -> ReportOptions {
        ReportOptions {
            time_range: TimeRange::new(self.time_amount, self.time_unit),
            filter: GroupFilter {
                include: self.include.clone(),
                exclude: self.exclude.clone(),
            },
        }
    }
}

fn main() -> Result<()> {
    // Before parsing, so .env values can serve as argument defaults.
    let env_file = config::load_env_file()?;

    let cli = Cli::parse();
    logging::init(cli.debug);
    if let Some(path) = &env_file {
        tracing::debug!(path = %path.display(), "loaded env file");
    }

    if cli.print {
        print!("{}", app::stack_listing());
        return Ok(());
    }

    let stack = cli.stack.context("No stack selected")?;
    let options = cli.report_options();

    let mut source = secrets::stdin_secret_source();
    let credentials =
        Credentials::read_from(source.as_mut()).context("Failed to read credentials")?;

    let report = app::run(stack, &credentials, &options)?;
    print!("{}", report);
    Ok(())
}
