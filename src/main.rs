use clap::Parser as ClapParser;
use std::fs;
use std::io::{self, Read};
use std::process;

use y_lang::cli::{execute, CliError, RunOptions};
use y_lang::output::EmitOptions;

#[derive(ClapParser)]
#[command(name = "y")]
#[command(about = "Y - a pipe-style expression language for navigating and editing YAML documents")]
#[command(version)]
struct Cli {
    /// Source document to load, where '-' denotes stdin
    #[arg(short, long, default_value = "-")]
    file: String,

    /// Write the resulting document back to the source file
    #[arg(short, long)]
    inplace: bool,

    /// Indentation for mappings
    #[arg(long, default_value_t = 2)]
    indent_mapping: usize,

    /// Indentation for sequences
    #[arg(long, default_value_t = 4)]
    indent_sequence: usize,

    /// Indentation offset of the sequence dash
    #[arg(long, default_value_t = 2)]
    indent_offset: usize,

    /// Expressions to evaluate, in order
    #[arg(trailing_var_arg = true)]
    expressions: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Reject the impossible combination before touching the document
    if cli.inplace && cli.file == "-" {
        return Err(CliError::InPlaceStdin);
    }

    let source = if cli.file == "-" {
        if atty::is(atty::Stream::Stdin) {
            // Interactive invocations start from an empty document
            "{}".to_string()
        } else {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            buffer
        }
    } else {
        fs::read_to_string(&cli.file).map_err(CliError::Io)?
    };

    let options = RunOptions {
        expressions: cli.expressions,
        emit: EmitOptions {
            indent_mapping: cli.indent_mapping,
            indent_sequence: cli.indent_sequence,
            indent_offset: cli.indent_offset,
        },
    };

    let output = execute(&source, &options)?;

    if cli.inplace {
        fs::write(&cli.file, output).map_err(CliError::Io)?;
    } else {
        print!("{}", output);
    }
    Ok(())
}
