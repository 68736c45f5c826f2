use rdgen::{build::Build, scanner::ScannerDef};
use std::{env, path::PathBuf};

fn main() -> anyhow::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    let project_root = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("missing environment variable: `CARGO_MANIFEST_DIR'"))?;

    // Operators and parentheses are declared by the grammar as literals.
    let scanner = ScannerDef::define(|s| {
        s.pattern("Number", r"[0-9]+(\.[0-9]+)?")?;
        s.pattern("Unknown", ".")?;
        Ok(())
    })?;

    Build::with_root_dir(project_root.join("src"))?
        .scanner("calculator", scanner)
        .process()
}
