//! Regenerates the parser used to read grammar files.

use anyhow::Context as _;
use rdgen::{codegen::Codegen, grammar::Definition, syntax};
use std::{env, fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let project_root = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .context("obtaining project root")?;

    let syntax_dir = project_root
        .parent()
        .context("project_root is root directory")?
        .join("rdgen/src/syntax");

    let source =
        fs::read_to_string(syntax_dir.join("rdgen.llg")).context("reading rdgen.llg")?;
    let def = Definition::from_source(&source, syntax::scanner_def()?).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        anyhow::anyhow!("invalid grammar:\n  {}", messages.join("\n  "))
    })?;

    let codegen = Codegen::new(&def);
    fs::write(syntax_dir.join("parser.rs"), codegen.to_string()).context("writing parser")?;

    Ok(())
}
