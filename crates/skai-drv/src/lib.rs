//! skai-drv - The `skai` command-line driver.
//!
//! The driver is the thin shell around the pipeline: it resolves the
//! command line to a source text, feeds it through lexer → parser →
//! interpreter, and turns any [`Fatal`] into the user-facing
//! `file:line:column - message` form on standard output.
//!
//! # Usage
//!
//! ```text
//! skai <path>          run the named script file
//! skai -e <source>     run inline source (file name reported as "argv")
//! ```
//!
//! # Exit codes
//!
//! - 0: success
//! - 1: interpreter error (lex, parse, or runtime)
//! - 2: usage or I/O error (bad arguments, unreadable file)

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use skai_eval::Interpreter;
use skai_lex::Lexer;
use skai_par::Parser;
use skai_util::{FileId, Result, SourceMap};

/// Successful run.
pub const EXIT_OK: i32 = 0;
/// The program failed to lex, parse, or execute.
pub const EXIT_ERROR: i32 = 1;
/// The driver itself could not start the run.
pub const EXIT_USAGE: i32 = 2;

/// File name reported for `-e` inline source.
pub const INLINE_NAME: &str = "argv";

/// What to run, resolved from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceSpec {
    /// Run a script file.
    File(PathBuf),
    /// Run inline source text (`-e`).
    Inline(String),
}

/// Driver configuration for one invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub source: SourceSpec,
}

/// Parse command-line arguments (without the program name).
pub fn parse_args<I>(args: I) -> anyhow::Result<Config>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    let source = match args.as_slice() {
        [flag, source] if flag == "-e" => SourceSpec::Inline(source.clone()),
        [flag] if flag == "-e" => bail!("usage: skai <path> | skai -e <source>"),
        [path] => SourceSpec::File(PathBuf::from(path)),
        _ => bail!("usage: skai <path> | skai -e <source>"),
    };
    Ok(Config { source })
}

/// Run one configuration to completion and return the process exit code.
/// All error output goes to standard output.
pub fn run(config: &Config) -> i32 {
    let (name, text) = match load_source(&config.source) {
        Ok(loaded) => loaded,
        Err(err) => {
            println!("{err:#}");
            return EXIT_USAGE;
        }
    };

    let mut sources = SourceMap::new();
    let file = sources.add_file(name, text);

    match execute(&sources, file) {
        Ok(()) => EXIT_OK,
        Err(fatal) => {
            println!("{}", fatal.render(&sources));
            EXIT_ERROR
        }
    }
}

/// Resolve the source spec to a (display name, text) pair.
fn load_source(spec: &SourceSpec) -> anyhow::Result<(String, String)> {
    match spec {
        SourceSpec::File(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read '{}'", path.display()))?;
            Ok((path.display().to_string(), text))
        }
        SourceSpec::Inline(text) => Ok((INLINE_NAME.to_string(), text.clone())),
    }
}

/// The pipeline: lex → parse → interpret.
fn execute(sources: &SourceMap, file: FileId) -> Result<()> {
    let tokens = Lexer::new(sources.content(file), file).tokenize()?;
    let program = Parser::new(tokens).parse()?;
    Interpreter::new().interpret(&program)
}
