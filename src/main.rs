use std::path::PathBuf;
use std::process;

use clap::Parser;
use sigexpr::{FunctionSpec, Numeric, SpecFile, Syntax};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "sigexpr")]
#[command(about = "Compile and evaluate signal expressions")]
struct Cli {
    /// Expression to evaluate; prefix with `rpn:` for postfix
    expression: Option<String>,

    /// Input value as NAME=VALUE, in input-list order (repeatable)
    #[arg(short, long = "input", value_name = "NAME=VALUE")]
    inputs: Vec<String>,

    /// Load the expression from a JSON spec file
    #[arg(long, value_name = "FILE", conflicts_with = "expression")]
    spec: Option<PathBuf>,

    /// Function to pick from a spec file holding several
    #[arg(long, requires = "spec")]
    name: Option<String>,

    /// Seed for the rand() generator
    #[arg(long)]
    seed: Option<u16>,

    /// Number of evaluations to print
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Show the compiled program
    #[arg(long)]
    bytecode: bool,

    /// Show the postfix translation of an infix expression
    #[arg(long)]
    postfix: bool,

    /// Evaluate in single precision
    #[arg(long)]
    f32: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,sigexpr=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Split `NAME=VALUE` arguments into the input list and raw values.
fn split_inputs(args: &[String]) -> Result<(Vec<String>, Vec<String>), String> {
    let mut names = Vec::with_capacity(args.len());
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("Input must be NAME=VALUE, got {}", arg))?;
        names.push(name.trim().to_string());
        values.push(value.trim().to_string());
    }
    Ok((names, values))
}

fn resolve_spec(cli: &Cli) -> Result<(FunctionSpec, Vec<String>), String> {
    let (names, values) = split_inputs(&cli.inputs)?;

    let mut spec = if let Some(path) = &cli.spec {
        let file = SpecFile::load(path).map_err(|e| e.to_string())?;
        let spec = file.select(cli.name.as_deref()).map_err(|e| e.to_string())?.clone();
        if !names.is_empty() && names != spec.inputs {
            return Err(format!(
                "Inputs {:?} do not match the spec's input list {:?}",
                names, spec.inputs
            ));
        }
        spec
    } else if let Some(expr) = &cli.expression {
        FunctionSpec::new(expr.clone(), names)
    } else {
        return Err("No expression specified".to_string());
    };

    if cli.seed.is_some() {
        spec.seed = cli.seed;
    }
    if values.len() < spec.inputs.len() {
        return Err(format!(
            "Expression takes {} inputs, {} given",
            spec.inputs.len(),
            values.len()
        ));
    }
    Ok((spec, values))
}

fn run<T: Numeric>(cli: &Cli, spec: &FunctionSpec, raw_values: &[String]) -> Result<(), String> {
    let values = raw_values
        .iter()
        .map(|v| v.parse::<T>().map_err(|_| format!("Invalid input value {}", v)))
        .collect::<Result<Vec<T>, String>>()?;

    if cli.postfix {
        match Syntax::detect(&spec.expression) {
            (Syntax::Infix, body) => {
                let postfix = sigexpr::parser::to_postfix(body).map_err(|e| e.to_string())?;
                println!("=== Postfix ===");
                println!("{}", postfix);
            }
            (Syntax::Postfix, body) => {
                println!("=== Postfix ===");
                println!("{}", body.trim());
            }
        }
    }

    let mut function = spec.build::<T>().map_err(|e| format!("Compile error: {}", e))?;

    if cli.bytecode {
        if let Some(program) = function.program() {
            println!("=== Bytecode ===");
            println!("Ops: {}", program.len());
            println!("Max depth: {}", program.max_depth());
            println!();
            print!("{}", program.disassemble());
            println!();
        }
    }

    for _ in 0..cli.count {
        println!("{}", function.evaluate(&values));
    }

    info!(
        count = cli.count,
        rng_state = function.rng_state(),
        "evaluation finished"
    );
    Ok(())
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = resolve_spec(&cli).and_then(|(spec, values)| {
        if cli.f32 {
            run::<f32>(&cli, &spec, &values)
        } else {
            run::<f64>(&cli, &spec, &values)
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
