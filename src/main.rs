//! SYMLS interpreter CLI
//!
//! Runs a program file after preprocessing it, or a line-by-line REPL
//! when no file is given.

use anyhow::Context;
use clap::Parser;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process;

use symls::config::Config;
use symls::interpreter::{Control, Interpreter};
use symls::preprocessor::Preprocessor;

#[derive(Parser)]
#[command(name = "symls")]
#[command(about = "Interpreter for the SYMLS programming language", long_about = None)]
#[command(version)]
struct Cli {
    /// Program file to execute (.symls is appended when missing);
    /// starts a REPL when omitted. REPL lines are not preprocessed, so
    /// multi-line blocks and subroutines are unavailable there.
    program: Option<String>,

    /// Configuration file
    #[arg(short, long, default_value = "symlsConfig.json")]
    config: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("symls: {error:#}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?
        .unwrap_or_default();
    let vocabulary = config.vocabulary();
    let defaults = config.defaults.clone();

    let input: Box<dyn BufRead> = match config.io.input_file.as_str() {
        "stdin" => Box::new(BufReader::new(io::stdin())),
        path => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening input file {path}"))?,
        )),
    };
    let output: Box<dyn Write> = match config.io.output_file.as_str() {
        "stdout" => Box::new(io::stdout()),
        path => {
            Box::new(File::create(path).with_context(|| format!("creating output file {path}"))?)
        }
    };
    let mut error_out: Box<dyn Write> = match config.io.error_file.as_str() {
        "stderr" => Box::new(io::stderr()),
        path => {
            Box::new(File::create(path).with_context(|| format!("creating error file {path}"))?)
        }
    };

    let mut interpreter = Interpreter::with_io(vocabulary, defaults, input, output);
    match cli.program {
        Some(program) => run_file(
            &mut interpreter,
            &mut error_out,
            program,
            &config.io.pre_processed_file,
        ),
        None => repl(&mut interpreter, &mut error_out),
    }
}

/// File mode: preprocess to the configured file, harvest subroutines,
/// and execute. Controlled fatal errors keep the historical exit
/// status of 0; only driver-level failures exit non-zero.
fn run_file(
    interpreter: &mut Interpreter,
    error_out: &mut dyn Write,
    program: String,
    preprocessed_file: &str,
) -> anyhow::Result<i32> {
    let mut file_name = program;
    if !file_name.contains(".symls") {
        file_name.push_str(".symls");
    }

    let source = match fs::read_to_string(&file_name) {
        Ok(source) => source,
        Err(_) => {
            // The historical report goes to program output.
            interpreter.emit("File not found\n");
            return Ok(0);
        }
    };

    let (normalized, subroutines) = {
        let preprocessor = Preprocessor::new(interpreter.vocabulary());
        let normalized = preprocessor.normalize(&source);
        let subroutines = preprocessor.harvest_subroutines(&normalized);
        (normalized, subroutines)
    };
    fs::write(preprocessed_file, &normalized)
        .with_context(|| format!("writing {preprocessed_file}"))?;
    interpreter.load_subroutines(subroutines);

    match interpreter.run(&normalized) {
        Ok(_) => Ok(0),
        Err(error) => {
            let _ = writeln!(error_out, "{error}");
            Ok(0)
        }
    }
}

/// REPL mode: interpret each input line as one statement, echo a
/// newline after it, and keep going after errors.
fn repl(interpreter: &mut Interpreter, error_out: &mut dyn Write) -> anyhow::Result<i32> {
    while let Some(line) = interpreter.read_source_line() {
        interpreter.advance_line();
        match interpreter.interpret(&line) {
            Ok(Control::End) => break,
            Ok(Control::Continue) => interpreter.emit_newline(),
            Err(error) => {
                let _ = writeln!(error_out, "{error}");
            }
        }
    }
    Ok(0)
}
