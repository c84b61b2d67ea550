//! Command-line front end: run programs, write assembly, or list native code.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use bfc::x64::disasm;
use bfc::{compile_assembly, parse, JitCompiler, SymbolStyle};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "bfc", version, about = "Compile tape-language programs to x86-64")]
struct Cli {
    /// Log compiler activity (repeat for more detail). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile to native code and execute it.
    Run(SourceArgs),
    /// Write Intel-syntax assembly.
    Asm {
        #[command(flatten)]
        source: SourceArgs,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Symbol naming convention (defaults to the host's).
        #[arg(long, value_enum)]
        style: Option<Style>,
    },
    /// Print a listing of the native code.
    Disasm(SourceArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Source file.
    file: Option<PathBuf>,
    /// Program text given inline.
    #[arg(short = 'e', long = "expr")]
    expr: Option<String>,
}

impl SourceArgs {
    fn load(&self) -> io::Result<Vec<u8>> {
        match (&self.file, &self.expr) {
            (_, Some(expr)) => Ok(expr.clone().into_bytes()),
            (Some(path), None) => fs::read(path),
            (None, None) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "no source given",
            )),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Style {
    Elf,
    MachO,
}

impl From<Style> for SymbolStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Elf => SymbolStyle::Elf,
            Style::MachO => SymbolStyle::MachO,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env).init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Run(source) => {
            let src = source.load()?;
            let program = bfc::compile_native(&src)?;
            program.run();
            // SAFETY: fflush(NULL) flushes every open C stream; the program wrote through putchar.
            unsafe { libc::fflush(std::ptr::null_mut()) };
        }
        Command::Asm {
            source,
            output,
            style,
        } => {
            let src = source.load()?;
            let style = style.map(SymbolStyle::from).unwrap_or_default();
            match output {
                Some(path) => {
                    let file = BufWriter::new(File::create(path)?);
                    compile_assembly(&src, file, style)?
                }
                None => compile_assembly(&src, io::stdout().lock(), style)?,
            }
        }
        Command::Disasm(source) => {
            let src = source.load()?;
            let mut jit = JitCompiler::new();
            let program = parse(&src, &mut jit)?;
            let base = program.code().as_ptr() as u64;
            let mut out = io::stdout().lock();
            out.write_all(disasm::listing(jit.code(), base).as_bytes())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("bfc: {e}");
            ExitCode::FAILURE
        }
    }
}
