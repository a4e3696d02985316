use std::num::ParseIntError;

use log::*;
use structopt::StructOpt;

use lcg_engine::Constants;

mod crack;
mod generate;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "lcg-crack",
    about = "Recovers the state of a 48-bit LCG from its nextInt(bound) outputs"
)]
struct Opt {
    /// Log search progress
    #[structopt(short, long)]
    verbose: bool,

    /// LCG multiplier
    #[structopt(long, default_value = "0x5DEECE66D", parse(try_from_str = parse_u64))]
    multiplier: u64,

    /// LCG addend
    #[structopt(long, default_value = "0xB", parse(try_from_str = parse_u64))]
    addend: u64,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Find the generator state behind a list of outputs
    Crack(CrackArgs),
    /// Print outputs of a generator with a known seed
    Generate(GenerateArgs),
}

#[derive(Debug, StructOpt)]
pub struct CrackArgs {
    /// Bound value (argument passed to nextInt())
    #[structopt(short, long)]
    bound: u64,

    /// List of known outputs (comma or space separated)
    #[structopt(short, long)]
    samples: String,

    /// How many values to predict
    #[structopt(short, long, default_value = "5")]
    gen: usize,

    /// Find all possible matches (only do this if the output was wrong the first time)
    #[structopt(short = "c", long = "continue")]
    find_all: bool,
}

#[derive(Debug, StructOpt)]
pub struct GenerateArgs {
    /// Bound value (argument passed to nextInt())
    #[structopt(short, long)]
    bound: u64,

    /// Starting state, random if omitted
    #[structopt(long, parse(try_from_str = parse_u64))]
    seed: Option<u64>,

    /// Treat the seed like the Random(long) constructor does
    #[structopt(long)]
    scramble: bool,

    /// How many values to print
    #[structopt(short = "n", long, default_value = "10")]
    count: usize,
}

fn parse_u64(s: &str) -> Result<u64, ParseIntError> {
    if s.starts_with("0x") || s.starts_with("0X") {
        u64::from_str_radix(&s[2..], 16)
    } else {
        s.parse()
    }
}

fn main() -> anyhow::Result<()> {
    let args = Opt::from_args();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter(Some("lcg"), level)
        .init();

    let constants = Constants::new(args.multiplier, args.addend);
    debug!("Using {:?}", constants);

    match args.cmd {
        Command::Crack(crack_args) => crack::run(crack_args, constants),
        Command::Generate(generate_args) => generate::run(generate_args, constants),
    }
}
