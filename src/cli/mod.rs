//! Command-line interface module.

mod args;

pub use args::{Cli, Commands};

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde::Serialize;

use resloc::{Locator, Resolved, ResourceResolver, Source, log, read_text, type_resource_name};

/// JSON shape printed by `resolve --json`.
#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    name: &'a str,
    locator: &'a Locator,
    source: Source,
}

/// Run the selected subcommand, writing results to `out`.
pub fn run(cli: &Cli, resolver: &ResourceResolver, out: &mut impl Write) -> Result<ExitCode> {
    let code = match &cli.command {
        Commands::Resolve { name, json } => resolve(resolver, name, *json, out)?,
        Commands::Cat { name } => cat(resolver, name, out)?,
        Commands::Relative { name } => relative(resolver, name, out)?,
        Commands::TypeName { qualified } => type_name(resolver, qualified, out)?,
    };
    out.flush().context("failed to flush output")?;
    Ok(code)
}

fn lookup(resolver: &ResourceResolver, name: &str) -> Option<Resolved> {
    let found = resolver.resolve_traced(name, None);
    if found.is_none() {
        log!("error"; "`{}` not found", name);
    }
    found
}

fn resolve(
    resolver: &ResourceResolver,
    name: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<ExitCode> {
    let Some(resolved) = lookup(resolver, name) else {
        return Ok(ExitCode::FAILURE);
    };

    if json {
        let output = ResolveOutput {
            name,
            locator: &resolved.locator,
            source: resolved.source,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        writeln!(out, "{}", resolved.locator)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn cat(resolver: &ResourceResolver, name: &str, out: &mut impl Write) -> Result<ExitCode> {
    let Some(resolved) = lookup(resolver, name) else {
        return Ok(ExitCode::FAILURE);
    };

    let text = read_text(&resolved.locator)?;
    out.write_all(text.as_bytes())
        .context("failed to write resource text")?;
    Ok(ExitCode::SUCCESS)
}

fn relative(resolver: &ResourceResolver, name: &str, out: &mut impl Write) -> Result<ExitCode> {
    let Some(resolved) = lookup(resolver, name) else {
        return Ok(ExitCode::FAILURE);
    };

    if resolver.home().is_none() {
        log!("warning"; "no home directory configured, printing the full path");
    }
    writeln!(out, "{}", resolver.relative_to_home(&resolved.locator))?;
    Ok(ExitCode::SUCCESS)
}

fn type_name(resolver: &ResourceResolver, qualified: &str, out: &mut impl Write) -> Result<ExitCode> {
    let name = type_resource_name(qualified);
    writeln!(out, "{name}")?;
    resolve(resolver, &name, false, out)
}
