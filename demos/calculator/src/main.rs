use anyhow::Context;
use rdgen_demo_calculator::parser;
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_ansi(true)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let input = env::args().nth(1).context("missing input")?;

    let parsed = parser::parse(&input).map_err(|err| parser::describe(&input, &err))?;
    println!("parsed: {}", parsed);

    let value = parser::evaluate(&input).map_err(|err| parser::describe(&input, &err))?;
    println!("value: {}", value);

    Ok(())
}
