//! Build script support.

use crate::{
    codegen::Codegen, grammar::DefinitionError, scanner::ScannerDef, syntax, translate,
    types::Map,
};
use anyhow::Context as _;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Extension of the grammar files picked up by [`Build::process`].
pub const GRAMMAR_EXTENSION: &str = "llg";

#[derive(Debug)]
pub struct Build {
    root_dir: PathBuf,
    out_dir: PathBuf,
    scanners: Map<String, ScannerDef>,
}

impl Build {
    pub fn new() -> anyhow::Result<Self> {
        let root_dir = env::var_os("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .context("The environment variable `CARGO_MANIFEST_DIR' is not set")?;
        Self::with_root_dir(root_dir)
    }

    pub fn with_root_dir(root_dir: PathBuf) -> anyhow::Result<Self> {
        let out_dir = env::var_os("OUT_DIR")
            .map(PathBuf::from)
            .context("The environment variable `OUT_DIR' is not set")?;
        Ok(Self::with_dirs(root_dir, out_dir))
    }

    pub fn with_dirs(root_dir: PathBuf, out_dir: PathBuf) -> Self {
        Self {
            root_dir,
            out_dir,
            scanners: Map::default(),
        }
    }

    /// Register the scanner definition that grammar files refer to with `uses "<name>";`.
    pub fn scanner(mut self, name: impl Into<String>, def: ScannerDef) -> Self {
        self.scanners.insert(name.into(), def);
        self
    }

    /// Generate a parser for every grammar file under the root directory.
    pub fn process(&self) -> anyhow::Result<()> {
        for entry in WalkDir::new(&self.root_dir).sort_by_file_name() {
            let entry = entry.context("from WalkDir entry")?;
            if !entry.file_type().is_file() {
                continue;
            }
            let in_file = entry.path();
            match in_file.extension().and_then(|ext| ext.to_str()) {
                Some(GRAMMAR_EXTENSION) => self.process_file(in_file)?,
                _ => continue,
            }
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn process_file(&self, in_file: &Path) -> anyhow::Result<()> {
        let relative = in_file.strip_prefix(&self.root_dir)?;

        let mut out_file = self.out_dir.join(relative);
        out_file.set_extension("rs");
        let mut expanded_file = self.out_dir.join(relative);
        expanded_file.set_extension("llg.expanded");
        if let Some(out_dir) = out_file.parent() {
            fs::create_dir_all(out_dir)?;
        }

        println!("cargo:rerun-if-changed={}", in_file.display());

        let source = fs::read_to_string(in_file)
            .with_context(|| format!("failed to read `{}'", in_file.display()))?;
        let ast = syntax::parse(&source)
            .with_context(|| format!("failed to parse `{}'", in_file.display()))?;
        let scanner = self
            .scanners
            .get(&ast.uses)
            .cloned()
            .with_context(|| {
                format!(
                    "{}:{}: unknown scanner `{}'",
                    in_file.display(),
                    ast.uses_span,
                    ast.uses
                )
            })?;
        let def = translate::translate(&ast, scanner)
            .map_err(|errors| report(in_file, &errors))?;
        tracing::debug!(
            terminals = def.terminals().len(),
            nonterminals = def.nonterminals().len(),
            "grammar accepted"
        );

        fs::write(&out_file, Codegen::new(&def).to_string())?;
        fs::write(&expanded_file, def.to_string())?;

        Ok(())
    }
}

fn report(in_file: &Path, errors: &[DefinitionError]) -> anyhow::Error {
    let mut msg = format!("errors in `{}':", in_file.display());
    for error in errors {
        msg += "\n  ";
        msg += &error.to_string();
    }
    anyhow::anyhow!(msg)
}

pub fn process_root(scanners: impl IntoIterator<Item = (String, ScannerDef)>) -> anyhow::Result<()> {
    let mut build = Build::new()?;
    build.scanners.extend(scanners);
    build.process()
}

pub fn process_dir(
    root_dir: &Path,
    scanners: impl IntoIterator<Item = (String, ScannerDef)>,
) -> anyhow::Result<()> {
    let mut build = Build::with_root_dir(root_dir.to_owned())?;
    build.scanners.extend(scanners);
    build.process()
}
