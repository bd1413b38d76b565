//! tfpilot CLI - deploy or destroy Terraform infra from a YAML config

use std::path::PathBuf;
use std::process;

use clap::Parser;
use colored::Colorize;

use tfpilot::error::FixSuggestion;
use tfpilot::exec::SystemExecutor;
use tfpilot::runner::{DeployContext, RunOptions, RunReport, Runner};

#[derive(Parser)]
#[command(name = "tfpilot")]
#[command(about = "Deploy or destroy Terraform infra from a YAML config")]
#[command(version)]
struct Cli {
    /// Path to the YAML config file
    config: PathBuf,

    /// Terraform workspace to use (created if needed)
    #[arg(short, long, default_value = "default")]
    workspace: String,

    /// Only run terraform plan, do not apply
    #[arg(long)]
    plan_only: bool,

    /// Run terraform destroy instead of apply
    #[arg(long)]
    destroy: bool,

    /// Pass -auto-approve to apply/destroy
    #[arg(short, long)]
    auto_approve: bool,

    /// Directory to run terraform from
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    chdir: PathBuf,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let opts = RunOptions {
        config: cli.config,
        workspace: cli.workspace,
        plan_only: cli.plan_only,
        destroy: cli.destroy,
        auto_approve: cli.auto_approve,
    };
    let runner = Runner::new(DeployContext::new(cli.chdir), Box::new(SystemExecutor));

    match runner.run(&opts) {
        Ok(report) => print_report(&report),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let Some(suggestion) = e.fix_suggestion() {
                eprintln!("  {} {}", "Fix:".yellow(), suggestion);
            }
            process::exit(1);
        }
    }
}

fn print_report(report: &RunReport) {
    println!(
        "{} terraform {} completed successfully",
        "✓".green(),
        report.outcome
    );
    if !report.skipped_keys.is_empty() {
        println!(
            "  {} skipped unsupported keys: {}",
            "!".yellow(),
            report.skipped_keys.join(", ")
        );
    }
}
