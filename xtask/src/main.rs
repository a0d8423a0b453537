use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for blockworld")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy and tests
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates, warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Run the viewport timing bench
    Bench,
    /// Build rustdoc for the workspace
    Doc,
    /// Validate, render and convert the bundled sample map through the CLI
    Smoke,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            fmt()?;
            clippy()?;
            test()?;
        }
        Commands::Fmt => fmt()?,
        Commands::Clippy => clippy()?,
        Commands::Test => test()?,
        Commands::Bench => cargo(
            "bench",
            &["bench", "-p", "blockworld-render", "--bench", "bench_viewport"],
        )?,
        Commands::Doc => cargo("doc", &["doc", "--workspace", "--no-deps"])?,
        Commands::Smoke => smoke()?,
    }

    Ok(())
}

fn fmt() -> Result<()> {
    cargo("fmt --check", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test() -> Result<()> {
    cargo("test", &["test", "--workspace"])
}

fn smoke() -> Result<()> {
    const MAP: &str = "maps/sky.txt";
    let out = std::env::temp_dir().join("blockworld-smoke.json");
    let out = out.to_string_lossy();
    let cli = ["run", "-q", "-p", "blockworld-cli", "--"];

    for (step, args) in [
        ("validate", vec!["validate", MAP]),
        ("render", vec!["render", MAP, "--hat"]),
        ("convert", vec!["convert", MAP, &*out]),
        ("validate json", vec!["validate", &*out]),
    ] {
        let full: Vec<&str> = cli.iter().copied().chain(args).collect();
        cargo(step, &full)?;
    }
    Ok(())
}

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {step}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {step} failed");
    }
    Ok(())
}
