use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use push_worker::AgentConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const GLUE_TEMPLATE: &str = include_str!("../../push-worker/js/service-worker.js");
const CONFIG_PLACEHOLDER: &str = "__PUSH_WORKER_CONFIG__";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Push worker task runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the wasm module with wasm-pack
    Build {
        /// Output directory
        #[arg(short, long, default_value = "dist")]
        out_dir: PathBuf,

        /// Debug build (no size optimizations)
        #[arg(long)]
        dev: bool,
    },

    /// Render service-worker.js with the worker config embedded
    Bundle {
        /// Worker config file
        #[arg(short, long, default_value = "push-worker.toml")]
        config: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "dist")]
        out_dir: PathBuf,
    },

    /// Build and bundle
    Dist {
        #[arg(short, long, default_value = "push-worker.toml")]
        config: PathBuf,

        #[arg(short, long, default_value = "dist")]
        out_dir: PathBuf,
    },

    /// Run all Rust tests
    Test,

    /// Run clippy linter (host and wasm32)
    Clippy,

    /// Remove the output directory
    Clean {
        #[arg(short, long, default_value = "dist")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { out_dir, dev } => build(&out_dir, dev),
        Commands::Bundle { config, out_dir } => bundle(&config, &out_dir),
        Commands::Dist { config, out_dir } => {
            build(&out_dir, false)?;
            bundle(&config, &out_dir)
        }
        Commands::Test => test(),
        Commands::Clippy => clippy(),
        Commands::Clean { out_dir } => clean(&out_dir),
    }
}

fn build(out_dir: &Path, dev: bool) -> Result<()> {
    println!("🔨 Building push-worker wasm module...");

    // wasm-pack resolves --out-dir relative to the crate
    let out_dir = absolute(out_dir)?;
    let out_dir = out_dir.to_string_lossy();

    let profile = if dev { "--dev" } else { "--release" };
    run_cmd(
        "wasm-pack",
        &[
            "build",
            profile,
            "--target",
            "no-modules",
            "--no-typescript",
            "--out-dir",
            out_dir.as_ref(),
            "push-worker",
        ],
    )?;
    Ok(())
}

fn bundle(config_path: &Path, out_dir: &Path) -> Result<()> {
    println!("📦 Rendering service-worker.js from {}", config_path.display());

    let config = load_config(config_path)?;
    let glue = render_glue(&config)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let target = out_dir.join("service-worker.js");
    fs::write(&target, glue).with_context(|| format!("Failed to write {}", target.display()))?;

    println!("✅ Wrote {}", target.display());
    Ok(())
}

fn test() -> Result<()> {
    println!("🧪 Running all tests...");
    run_cmd("cargo", &["test", "--workspace"])?;
    Ok(())
}

fn clippy() -> Result<()> {
    println!("🔍 Running clippy on workspace (warnings as errors)...");
    run_cmd(
        "cargo",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )?;

    println!("🔍 Running clippy on push-worker for wasm32...");
    run_cmd(
        "cargo",
        &[
            "clippy",
            "--package",
            "push-worker",
            "--target",
            "wasm32-unknown-unknown",
            "--",
            "-D",
            "warnings",
        ],
    )?;
    Ok(())
}

fn clean(out_dir: &Path) -> Result<()> {
    if !out_dir.exists() {
        return Ok(());
    }

    println!("🧹 Removing {}", out_dir.display());
    fs::remove_dir_all(out_dir).with_context(|| format!("Failed to remove {}", out_dir.display()))?;
    Ok(())
}

fn load_config(path: &Path) -> Result<AgentConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AgentConfig = toml::from_str(&content).context("Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}

/// Glue script with the config as a JSON string literal
fn render_glue(config: &AgentConfig) -> Result<String> {
    let json = config.to_json()?;
    let literal = serde_json::to_string(&json).context("Failed to quote worker config")?;

    Ok(GLUE_TEMPLATE.replace(CONFIG_PLACEHOLDER, &literal))
}

// Helper functions
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}

fn run_cmd(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to run: {} {}", program, args.join(" ")))?;

    if !status.success() {
        anyhow::bail!("Command failed: {} {}", program, args.join(" "));
    }

    Ok(())
}
