use anyhow::Context as _;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use rdgen::{codegen::Codegen, grammar::Definition, scanner::ScannerDef, syntax, translate};
use std::{fs, path::PathBuf, time::Instant};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Declare a terminal recognized by a pattern, as `NAME=PATTERN` or `NAME`.
    #[arg(short, long = "pattern", value_name = "NAME[=PATTERN]")]
    patterns: Vec<String>,

    /// Declare a terminal recognized by a fixed text, as `NAME=TEXT`.
    #[arg(short, long = "literal", value_name = "NAME=TEXT")]
    literals: Vec<String>,

    /// Specify the path of generated .rs file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the analyzed grammar next to the generated file.
    #[arg(long)]
    expanded: bool,

    /// The path to the runtime crate used by the generated code.
    #[arg(long, default_value = "::rdgen_runtime")]
    runtime: String,

    /// The name of the generated token kind enum.
    #[arg(long, default_value = "TToken")]
    token_kind: String,

    /// The token kind reported at the end of input.
    #[arg(long, default_value = "EOS", conflicts_with = "no_end_of_stream")]
    end_of_stream: String,

    /// Do not require the end of input after the start symbol.
    #[arg(long)]
    no_end_of_stream: bool,

    /// The path of grammar definition file.
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = Args::command().get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    tracing::debug!("parsed CLI args = {:?}", args);

    process_file(&args, &matches)
        .with_context(|| anyhow::anyhow!("errored during processing {}", args.input.display()))?;

    Ok(())
}

#[derive(Debug, PartialEq)]
enum Terminal<'a> {
    Pattern(&'a str),
    Literal(&'a str),
}

/// The `--pattern` and `--literal` options in command line order.
fn terminals<'a>(args: &'a Args, matches: &ArgMatches) -> Vec<Terminal<'a>> {
    let patterns = matches.indices_of("patterns").into_iter().flatten();
    let literals = matches.indices_of("literals").into_iter().flatten();

    let mut terminals: Vec<(usize, Terminal<'a>)> = patterns
        .zip(&args.patterns)
        .map(|(i, pattern)| (i, Terminal::Pattern(pattern)))
        .chain(
            literals
                .zip(&args.literals)
                .map(|(i, literal)| (i, Terminal::Literal(literal))),
        )
        .collect();
    terminals.sort_by_key(|(i, _)| *i);
    terminals.into_iter().map(|(_, terminal)| terminal).collect()
}

fn scanner_def(args: &Args, matches: &ArgMatches) -> anyhow::Result<ScannerDef> {
    let mut def = ScannerDef::new();
    for terminal in terminals(args, matches) {
        match terminal {
            Terminal::Pattern(pattern) => {
                let (name, pattern) = pattern.split_once('=').unwrap_or((pattern, ""));
                def.pattern(name, pattern)?;
            }
            Terminal::Literal(literal) => {
                let (name, text) = literal.split_once('=').with_context(|| {
                    anyhow::anyhow!("missing the text of literal `{}'", literal)
                })?;
                def.literal(name, text)?;
            }
        }
    }
    Ok(def)
}

fn process_file(args: &Args, matches: &ArgMatches) -> anyhow::Result<()> {
    let in_file = fs::canonicalize(&args.input) //
        .context("failed to canonicalize the input file name")?;

    let out_file = args
        .output
        .clone()
        .unwrap_or_else(|| in_file.with_extension("rs"));
    let backup_file = out_file.with_extension("rs.bak");
    let expanded_file = out_file.with_extension("llg.expanded");

    let source = fs::read_to_string(&in_file).context("failed to read the grammar file")?;

    let s = Instant::now();
    let ast = syntax::parse(&source)?;
    tracing::info!("parse: {:?} elapsed", s.elapsed());
    tracing::debug!("the grammar uses the scanner `{}'", ast.uses);

    let s = Instant::now();
    let def = translate::translate(&ast, scanner_def(args, matches)?).map_err(|errors| {
        for error in &errors {
            println!("[error] {}", error);
        }
        anyhow::anyhow!("the grammar has {} error(s)", errors.len())
    })?;
    tracing::info!("analysis: {:?} elapsed", s.elapsed());

    let unreachable = unreachable_nonterminals(&def);
    if !unreachable.is_empty() {
        println!(
            "[warning] The following nonterminals are not reachable from the start symbol: {:?}",
            unreachable
        );
    }

    // dump results.
    if out_file.exists() {
        fs::copy(&out_file, &backup_file).with_context(|| {
            anyhow::anyhow!(
                "failed to backup the output file to {}",
                backup_file.display()
            )
        })?;
    }

    let end_of_stream = (!args.no_end_of_stream).then_some(args.end_of_stream.as_str());
    let codegen = Codegen::new(&def)
        .runtime_path(&args.runtime)
        .token_kind(&args.token_kind)
        .end_of_stream(end_of_stream);
    fs::write(&out_file, codegen.to_string()).with_context(|| {
        anyhow::anyhow!("failed to write generated parser to {}", out_file.display())
    })?;

    if args.expanded {
        fs::write(&expanded_file, def.to_string()).with_context(|| {
            anyhow::anyhow!("failed to write the analysis to {}", expanded_file.display())
        })?;
    }

    Ok(())
}

fn unreachable_nonterminals(def: &Definition) -> Vec<&str> {
    let mut reachable: Vec<&str> = def.start_symbol().into_iter().collect();
    let mut i = 0;
    while let Some(&name) = reachable.get(i) {
        i += 1;
        if let Some(production) = def.production(name) {
            for ident in production.expr.identifiers() {
                if def.is_nonterminal(ident) && !reachable.contains(&ident) {
                    reachable.push(ident);
                }
            }
        }
    }
    def.nonterminals()
        .iter()
        .map(String::as_str)
        .filter(|name| !reachable.contains(name))
        .collect()
}
