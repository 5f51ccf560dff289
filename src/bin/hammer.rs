use clap::{ArgGroup, Parser};
use hammer::ecc::{decode_stream, encode_stream, ErrorInjector, ErrorPolicy, ExtendedHamming};
use log::{error, info, LevelFilter};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

/// Encodes and decodes files with an extended Hamming (8,4) code, optionally
/// simulating transmission errors.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["encode", "decode"])))]
#[command(group(ArgGroup::new("noise").args(["errors", "normal_errors", "bounded_normal_errors"])))]
struct Cli {
    /// Input file ("-" for standard input)
    input: String,

    /// Encode the input into this file ("-" for standard output)
    #[arg(short = 'c', long)]
    encode: Option<String>,

    /// Decode the input, previously encoded with -c, into this file ("-" for standard output)
    #[arg(short = 'd', long)]
    decode: Option<String>,

    /// Number of bit errors to introduce in each encoded byte
    #[arg(short = 'e', long, conflicts_with = "decode", value_parser = clap::value_parser!(u8).range(0..=8))]
    errors: Option<u8>,

    /// Introduce errors per encoded byte following, approximately, a normal
    /// distribution of mean 0 and standard deviation 1
    #[arg(short = 'n', long, conflicts_with = "decode")]
    normal_errors: bool,

    /// Like -n, but never introduce more errors than the code can detect
    #[arg(short = 'l', long, conflicts_with = "decode")]
    bounded_normal_errors: bool,

    /// Seed for the error generator, for reproducible runs
    #[arg(long, conflicts_with = "decode")]
    seed: Option<u64>,

    /// Suppress most of the diagnostic output
    #[arg(short = 'q', short_alias = 's', long, alias = "silent")]
    quiet: bool,
}

impl Cli {
    fn policy(&self) -> ErrorPolicy {
        if self.normal_errors {
            ErrorPolicy::Normal
        } else if self.bounded_normal_errors {
            ErrorPolicy::BoundedNormal
        } else {
            ErrorPolicy::Fixed(usize::from(self.errors.unwrap_or(0)))
        }
    }
}

fn open_input(path: &str) -> io::Result<Box<dyn Read>> {
    if path == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(File::open(Path::new(path))?))
    }
}

fn open_output(path: &str) -> io::Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(io::stdout().lock()))
    } else {
        Ok(Box::new(File::create(Path::new(path))?))
    }
}

fn run(cli: &Cli) -> hammer::Result<()> {
    let code = ExtendedHamming::new();
    let input = open_input(&cli.input)?;

    if let Some(path) = &cli.encode {
        let policy = cli.policy();
        let mut injector = match cli.seed {
            Some(seed) => ErrorInjector::with_seed(policy, seed)?,
            None => ErrorInjector::from_entropy(policy)?,
        };

        let report = encode_stream(&code, input, open_output(path)?, &mut injector)?;
        info!("{}", report);
    } else if let Some(path) = &cli.decode {
        let report = decode_stream(&code, input, open_output(path)?)?;
        info!("{}", report);
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
