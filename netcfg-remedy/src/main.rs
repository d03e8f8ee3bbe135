use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config_diff_core::{
    apply_tags, filter_by_tag, format_commands, parse_file, to_json, write, write_file,
    write_with_exits, ConfigTree, RuleSet,
};
use netcfg_remedy::driver::{builtin_driver, load_driver};
use netcfg_remedy::inspect::render_tree;
use netcfg_remedy::report::{render_diagnostics, render_marked, render_summary};
use netcfg_remedy::workflow::Workflow;

mod cli;

use cli::{
    Cli, Command, DriverArgs, InspectArgs, OutputFormat, PredictArgs, RemediateArgs, RollbackArgs,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Remediate(args) => run_remediate(args),
        Command::Predict(args) => run_predict(args),
        Command::Rollback(args) => run_rollback(args),
        Command::Inspect(args) => run_inspect(args),
    }
}

fn load_rules(args: &DriverArgs) -> Result<RuleSet> {
    match &args.driver_file {
        Some(path) => load_driver(path)
            .with_context(|| format!("failed to load driver from {}", path.display())),
        None => builtin_driver(&args.driver).context("failed to load built-in driver"),
    }
}

fn load_config(path: &Path, rules: &RuleSet) -> Result<ConfigTree> {
    parse_file(path, rules).with_context(|| format!("failed to parse {}", path.display()))
}

fn run_remediate(args: RemediateArgs) -> Result<()> {
    let rules = load_rules(&args.driver)?;
    let running = load_config(&args.running, &rules)?;
    let target = load_config(&args.target, &rules)?;
    let workflow = Workflow::new(running, target, rules);

    let remediation = workflow.remediation();
    if !remediation.diagnostics().is_empty() {
        if args.strict {
            bail!(
                "strict mode failed: {} diagnostics reported",
                remediation.diagnostics().len()
            );
        }
        eprintln!("{}", render_diagnostics(remediation.diagnostics()));
    }

    if let Some(out_path) = &args.output {
        write_file(remediation.config(), workflow.rules(), out_path)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    if args.summary {
        println!("{}", render_summary(&remediation));
        return Ok(());
    }
    if let Some(tag) = &args.tag {
        print!("{}", workflow.tagged_commands(tag));
        return Ok(());
    }
    match args.format {
        OutputFormat::Json => println!("{}", to_json(&remediation)?),
        OutputFormat::Text if args.marked => {
            println!("{}", render_marked(&remediation, workflow.rules()));
        }
        OutputFormat::Text => print!("{}", workflow.commands()),
    }
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let rules = load_rules(&args.driver)?;
    let running = load_config(&args.running, &rules)?;
    let target = load_config(&args.target, &rules)?;
    let workflow = Workflow::new(running, target, rules);

    let future = workflow.future();
    let rendered = if args.with_exits {
        write_with_exits(&future, workflow.rules())
    } else {
        write(&future, workflow.rules())
    };
    if let Some(out_path) = &args.output {
        fs::write(out_path, &rendered)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }
    print!("{rendered}");
    Ok(())
}

fn run_rollback(args: RollbackArgs) -> Result<()> {
    let rules = load_rules(&args.driver)?;
    let applied = load_config(&args.applied, &rules)?;
    let original = load_config(&args.original, &rules)?;
    let workflow = Workflow::new(applied, original, rules);

    let undo = workflow.rollback();
    match args.format {
        OutputFormat::Json => println!("{}", to_json(&undo)?),
        OutputFormat::Text if args.marked => println!("{}", render_marked(&undo, workflow.rules())),
        OutputFormat::Text => print!("{}", format_commands(&undo, workflow.rules())),
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let rules = load_rules(&args.driver)?;
    let config = load_config(&args.file, &rules)?;

    let tagged = apply_tags(&config, rules.tag_rules());
    let shown = match &args.tag {
        Some(tag) => filter_by_tag(&tagged, tag),
        None => tagged,
    };
    print!("{}", render_tree(&shown, args.depth));
    Ok(())
}
