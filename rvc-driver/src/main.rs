//! Rvc Compiler Driver
//!
//! Command-line entry point for the code generation backend. The
//! parser and semantic analyzer live upstream; this driver consumes a
//! serialized AST (JSON), derives the function-signature table, runs
//! code generation and writes the assembly text to a file.

use clap::Parser;
use log::info;
use rvc_ast::{collect_function_info, Program};
use rvc_codegen::{generate_program, CodegenOptions};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rvc")]
#[command(about = "Rvc code generator: serialized AST in, RISC-V assembly out")]
#[command(version = "0.1.0")]
struct Cli {
    /// Input file holding a JSON-serialized compilation unit
    input: PathBuf,

    /// Output assembly file (defaults to the input stem with .s)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable constant folding and algebraic simplification
    #[arg(short = 'O', long)]
    optimize: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = compile(&cli.input, cli.output.as_deref(), cli.optimize) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn compile(
    input_path: &Path,
    output_path: Option<&Path>,
    optimize: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Reading AST from {}", input_path.display());
    let source = fs::read_to_string(input_path)?;
    let program: Program = serde_json::from_str(&source)?;

    let functions = collect_function_info(&program);
    info!(
        "Generating code for {} function(s), optimize={}",
        program.functions.len(),
        optimize
    );

    let asm_text = generate_program(&program, &functions, CodegenOptions { optimize })?;

    let final_output_path = match output_path {
        Some(path) => path.to_path_buf(),
        None => {
            let mut path = input_path.to_path_buf();
            path.set_extension("s");
            path
        }
    };

    fs::write(&final_output_path, asm_text)?;
    println!("Assembly written to: {}", final_output_path.display());
    Ok(())
}
