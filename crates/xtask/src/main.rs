use std::collections::BTreeMap;

use anyhow::Context;
use serde::Deserialize;

/// Crates the domain crate must never depend on
const DOMAIN_FORBIDDEN: &[&str] = &[
    "explorers-player",
    "dioxus",
    "web-sys",
    "wasm-bindgen",
    "reqwest",
    "tokio",
    "gloo-net",
    "gloo-timers",
];

const DOMAIN_CRATE: &str = "explorers-domain";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    #[serde(default)]
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    #[serde(default)]
    kind: Option<String>,
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;

    let violations = domain_violations(&metadata)?;
    if !violations.is_empty() {
        for (dep, kind) in &violations {
            eprintln!("  {DOMAIN_CRATE} -> {dep} ({kind})");
        }
        anyhow::bail!(
            "arch-check failed: {} forbidden dependencies in {DOMAIN_CRATE}",
            violations.len()
        );
    }

    println!("arch-check passed: {DOMAIN_CRATE} stays free of platform crates");
    Ok(())
}

/// Forbidden direct dependencies of the domain crate, keyed by name
fn domain_violations(metadata: &Metadata) -> anyhow::Result<BTreeMap<String, String>> {
    let domain = metadata
        .packages
        .iter()
        .find(|p| p.name == DOMAIN_CRATE)
        .with_context(|| format!("{DOMAIN_CRATE} not found in workspace"))?;

    Ok(domain
        .dependencies
        .iter()
        .filter(|dep| DOMAIN_FORBIDDEN.contains(&dep.name.as_str()))
        .map(|dep| {
            let kind = dep.kind.clone().unwrap_or_else(|| "normal".to_string());
            (dep.name.clone(), kind)
        })
        .collect())
}
