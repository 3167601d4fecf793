mod config;
mod service;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use config::Config;
use service::{AddReport, ApplyReport, ListedSkill, Listing, RepoUpdate, SkillsetService};
use skillset_types::Scope;
use std::path::Path;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "skillset")]
#[command(about = "Manage AI skills and permissions across projects", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List installed skills and saved presets
    List,

    /// Save project permissions as a reusable preset
    Save {
        /// Preset name
        name: String,
    },

    /// Apply permission presets (auto-detect or specific)
    Apply {
        /// Preset name(s) to apply (auto-detect if omitted)
        presets: Vec<String>,

        /// Show what would be applied without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Add skills from a GitHub repo or local directory
    Add {
        /// Repo in owner/repo format, or a path starting with '/', '.' or '~'
        repo: String,

        /// Install skills globally
        #[arg(short = 'g', long = "global")]
        global: bool,
    },

    /// Update repo(s) and refresh links
    Update {
        /// Specific repo to update (all cached repos if omitted)
        repo: Option<String>,

        /// Update global skills
        #[arg(short = 'g', long = "global")]
        global: bool,
    },

    /// Remove a skill by name
    Remove {
        /// Skill name to remove
        name: String,

        /// Remove from global skills
        #[arg(short = 'g', long = "global")]
        global: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    let cwd = std::env::current_dir().context("Could not read current directory")?;

    let config = Config::load(&home, &cwd)?;
    skillset_logging::init_logging(skillset_logging::level_for_verbosity(
        &config.logging.level,
        cli.verbose,
    ))?;

    let service = SkillsetService::from_config(&config, &home, &cwd);

    match cli.command {
        Commands::List => print_listing(&service.list()?),
        Commands::Save { name } => {
            let path = service.save_preset(&name)?;
            println!("Saved preset '{}' to {}", name, path.display());
        }
        Commands::Apply { presets, dry_run } => print_apply(&service.apply(&presets, dry_run)?),
        Commands::Add { repo, global } => {
            print_add(&service.add(&repo, Scope::from_global_flag(global))?);
        }
        Commands::Update { repo, global } => {
            let updates = service.update(repo.as_deref(), Scope::from_global_flag(global))?;
            print_updates(&updates, repo.is_some());
        }
        Commands::Remove { name, global } => {
            let dir = service.remove(&name, Scope::from_global_flag(global))?;
            println!("Removed {} from {}", name, dir.display());
        }
    }

    Ok(())
}

fn print_add(report: &AddReport) {
    let links = &report.links;
    if !links.linked.is_empty() {
        println!(
            "Linked {} skill(s) to {}:",
            links.linked.len(),
            report.skills_dir.display()
        );
        let mut names = links.linked.clone();
        names.sort();
        for name in names {
            println!("  - {}", name);
        }
    }
    for name in &links.skipped {
        println!("  Skipping {}: already exists (not a link)", name);
    }

    if !report.merged_keys.is_empty() {
        println!("Merged permissions into {}:", report.settings.display());
        for key in &report.merged_keys {
            println!("  - {}", key);
        }
    }

    if links.linked.is_empty() && report.merged_keys.is_empty() {
        println!("No skills or permissions found in repo");
    }
}

fn print_updates(updates: &[RepoUpdate], single: bool) {
    if updates.is_empty() {
        println!("No repos installed");
        return;
    }

    let skills: usize = updates.iter().map(|u| u.links.linked.len()).sum();
    let keys: usize = updates.iter().map(|u| u.merged_keys.len()).sum();

    for update in updates {
        for name in &update.links.skipped {
            println!("  Skipping {} from {}: already exists (not a link)", name, update.repo);
        }
    }

    if single {
        println!("Updated {} skill(s)", skills);
        if keys > 0 {
            println!("Refreshed {} permission key(s)", keys);
        }
    } else {
        println!(
            "All repos updated ({} skill(s), {} permission key(s))",
            skills, keys
        );
    }
}

fn print_apply(report: &ApplyReport) {
    if report.presets.is_empty() {
        println!("No project types detected. Use 'skillset apply <preset>' to apply manually.");
        return;
    }

    if report.detected {
        println!("Detected: {}", report.presets.join(", "));
    }

    if report.dry_run {
        println!(
            "Would apply {} ({} permission(s)) to {} (dry-run)",
            report.presets.join(", "),
            report.rules,
            report.settings.display()
        );
    } else {
        println!(
            "Applied {} ({} permission(s)) to {}",
            report.presets.join(", "),
            report.rules,
            report.settings.display()
        );
    }
}

fn print_skills(title: &str, dir: &Path, skills: &[ListedSkill]) {
    if skills.is_empty() {
        return;
    }
    println!("{} ({}):", title, dir.display());
    for skill in skills {
        let target = skill
            .link_target
            .as_ref()
            .map(|t| format!(" -> {}", t.display()))
            .unwrap_or_default();
        match &skill.description {
            Some(description) => println!("  {}{}  {}", skill.name, target, description),
            None => println!("  {}{}", skill.name, target),
        }
    }
}

fn print_listing(listing: &Listing) {
    print_skills("Global skills", &listing.global_dir, &listing.global);
    print_skills("Project skills", &listing.project_dir, &listing.project);

    if !listing.saved_presets.is_empty() {
        println!("Saved presets ({}):", listing.presets_dir.display());
        for preset in &listing.saved_presets {
            println!("  {}", preset);
        }
    }

    if listing.global.is_empty() && listing.project.is_empty() && listing.saved_presets.is_empty() {
        println!("No skills or presets found");
    }
    println!("Built-in presets: {}", listing.builtin_presets.join(", "));
}
