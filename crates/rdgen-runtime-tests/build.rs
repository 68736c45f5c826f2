use rdgen::{build::Build, scanner::ScannerDef};
use std::{env, path::PathBuf};

fn main() -> anyhow::Result<()> {
    let json = ScannerDef::define(|s| {
        s.pattern("String", r#""([^"\\]|\\.)*""#)?;
        s.pattern("Number", r"-?[0-9]+(\.[0-9]+)?")?;
        s.pattern("Unknown", ".")?;
        Ok(())
    })?;
    let statements = ScannerDef::define(|s| {
        s.pattern("Number", "[0-9]+")?;
        s.pattern("Ident", "[a-z_][a-z0-9_]*")?;
        s.pattern("Unknown", ".")?;
        Ok(())
    })?;

    let project_root = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("missing environment variable: `CARGO_MANIFEST_DIR'"))?;
    Build::with_root_dir(project_root.join("grammars"))?
        .scanner("json", json)
        .scanner("statements", statements)
        .process()
}
