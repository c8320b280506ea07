//! minipas CLI
//!
//! Main entry point for the `mpc` command.

use clap::{Parser, Subcommand};
use miette::Result;
use minipas::{Config, SourceFile};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "mpc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Front end and interpreter for a small Pascal subset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./minipas.toml when present)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze and interpret a program, then print its variables
    Run {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print each scope table as analysis leaves it
        #[arg(long)]
        show_scopes: bool,
    },

    /// Parse and analyze a program without running it
    Check {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show the parsed AST
        #[arg(long)]
        show_ast: bool,

        /// Show scope tables
        #[arg(long)]
        show_scopes: bool,
    },

    /// Print the token stream
    Tokens {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print a program in canonical layout
    Fmt {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Fail if the file is not already in canonical layout
        #[arg(long)]
        check: bool,
    },

    /// Print a program with every name tagged by its scope level
    Annotate {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show information about the compiler
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(Path::new("."))?,
    };

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if let Some(level) = &config.log_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Run { input, show_scopes } => {
            run(&input, &config, show_scopes || config.output.show_scopes)
        }

        Commands::Check {
            input,
            show_ast,
            show_scopes,
        } => check(&input, show_ast, show_scopes || config.output.show_scopes),

        Commands::Tokens { input } => tokens(&input),

        Commands::Fmt { input, check } => format_code(&input, &config, check),

        Commands::Annotate { input } => annotate(&input, &config),

        Commands::Info => info(),
    }
}

fn read_source(input: &Path) -> Result<SourceFile> {
    let content = std::fs::read_to_string(input)
        .map_err(|e| miette::miette!("Failed to read input file: {}", e))?;
    Ok(SourceFile::new(input.to_string_lossy(), content))
}

fn run(input: &Path, config: &Config, show_scopes: bool) -> Result<()> {
    tracing::info!("Running {:?}", input);

    let source = read_source(input)?;
    let execution = minipas::run(&source.content).map_err(|e| source.report(e))?;

    if show_scopes {
        print!("{}", execution.analysis.report());
        println!();
    }

    for line in &execution.output {
        println!("{}", line);
    }
    if config.output.show_store {
        println!("{}", execution.store);
    }
    Ok(())
}

fn check(input: &Path, show_ast: bool, show_scopes: bool) -> Result<()> {
    tracing::info!("Checking {:?}", input);

    let source = read_source(input)?;

    // 1. Parse
    let program = minipas::parse(&source.content).map_err(|e| source.report(e))?;

    if show_ast {
        println!("=== AST ===");
        let json = serde_json::to_string_pretty(&program)
            .map_err(|e| miette::miette!("Failed to serialize AST: {}", e))?;
        println!("{}", json);
        println!();
    }

    // 2. Resolve names
    let analysis = minipas::resolve::analyze(&program).map_err(|e| source.report(e))?;

    if show_scopes {
        println!("=== Scopes ===");
        print!("{}", analysis.report());
        println!();
    }

    println!("All checks passed: {}", input.display());
    Ok(())
}

fn tokens(input: &Path) -> Result<()> {
    let source = read_source(input)?;
    let tokens = minipas::lexer::lex(&source.content).map_err(|e| source.report(e))?;
    tracing::debug!("Lexed {} tokens", tokens.len());
    for token in &tokens {
        println!("{}", token);
    }
    Ok(())
}

fn format_code(input: &Path, config: &Config, check: bool) -> Result<()> {
    let source = read_source(input)?;
    let program = minipas::parse(&source.content).map_err(|e| source.report(e))?;
    let formatted = minipas::render::render_program(&program, &config.render_options());

    if check {
        if *source.content != *formatted {
            return Err(miette::miette!("{} is not formatted", input.display()));
        }
        println!("{} is formatted", input.display());
    } else {
        print!("{}", formatted);
    }
    Ok(())
}

fn annotate(input: &Path, config: &Config) -> Result<()> {
    let source = read_source(input)?;
    let program = minipas::parse(&source.content).map_err(|e| source.report(e))?;
    let annotated = minipas::render::annotate(&program, &config.render_options())
        .map_err(|e| source.report(e))?;
    print!("{}", annotated);
    Ok(())
}

fn info() -> Result<()> {
    println!("minipas");
    println!("Version: {}", minipas::VERSION);
    println!();
    println!("Language:");
    println!("  - integer and real variables");
    println!("  - nested procedure declarations with lexical scopes");
    println!("  - assignments over + - * div / with unary signs");
    println!();
    println!("Commands: run, check, tokens, fmt, annotate");

    Ok(())
}
