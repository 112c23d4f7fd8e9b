//! `rpal [-ast|-sast] <file>` — run an RPAL program, or print its (possibly
//! standardized) AST, through a hand-rolled argument parser (spec §3.2).

use std::env;
use std::fs;
use std::process::ExitCode;

enum Mode {
    Run,
    Ast,
    StandardizedAst,
}

fn main() -> ExitCode {
    match run(env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("rpal: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let (mode, path) = parse_args(&args)?;
    let source = fs::read_to_string(&path).map_err(|err| format!("failed to read '{path}': {err}"))?;

    match mode {
        Mode::Ast => {
            let ast = rpal::parse_source(&source).map_err(|err| err.to_string())?;
            print!("{ast}");
        }
        Mode::StandardizedAst => {
            let ast = rpal::standardize_source(&source).map_err(|err| err.to_string())?;
            print!("{ast}");
        }
        Mode::Run => {
            let answer = rpal::run_source(&source).map_err(|err| err.to_string())?;
            println!("Output of the above program is:");
            println!("{answer}");
        }
    }
    Ok(())
}

fn parse_args(args: &[String]) -> Result<(Mode, String), String> {
    match args {
        [path] => Ok((Mode::Run, path.clone())),
        [flag, path] if flag == "-ast" => Ok((Mode::Ast, path.clone())),
        [flag, path] if flag == "-sast" => Ok((Mode::StandardizedAst, path.clone())),
        [] => Err("usage: rpal [-ast|-sast] <file>".to_owned()),
        _ => Err(format!("usage: rpal [-ast|-sast] <file>, found {args:?}")),
    }
}
