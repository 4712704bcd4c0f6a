//! pensum CLI - curriculum progress tracker.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pensum_core::{
    violations, Subject, SubjectId, Template, TemplateId, TemplateMetadata, Term, UserId,
};
use pensum_progress::{CurriculumTracker, CurriculumView, Milestone, SubjectStatus};
use pensum_storage::{JsonStorage, TemplateStore};

#[derive(Parser)]
#[command(name = "pensum")]
#[command(about = "Track progress through a university curriculum", long_about = None)]
struct Cli {
    /// Storage directory
    #[arg(long, global = true, env = "PENSUM_STORAGE", default_value = ".pensum")]
    storage: PathBuf,

    /// Owner of the templates
    #[arg(long, global = true, env = "PENSUM_USER", default_value = "local")]
    owner: String,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a template
    Init {
        /// Start with no subjects instead of the built-in curriculum
        #[arg(long)]
        empty: bool,
        /// Institution name
        #[arg(long, default_value = "")]
        institution: String,
        /// Program name
        #[arg(long, default_value = "")]
        program: String,
        /// Number of ordinary terms
        #[arg(long, default_value = "8")]
        terms: u32,
        /// Intermediate terms, e.g. "5.5,7.5"
        #[arg(long, default_value = "")]
        intermediate: String,
    },
    /// List templates
    List,
    /// Show subjects and their status
    Show {
        /// Template ID
        template: String,
    },
    /// Toggle completion of subjects
    Toggle {
        /// Template ID
        template: String,
        /// Subject IDs; nothing is saved if any is unknown
        #[arg(required = true)]
        subjects: Vec<String>,
    },
    /// Forget every completion
    Clear {
        /// Template ID
        template: String,
    },
    /// Show progress statistics
    Stats {
        /// Template ID
        template: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a subject
    AddSubject {
        /// Template ID
        template: String,
        /// Subject ID
        id: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Category tag
        #[arg(long, default_value = "")]
        category: String,
        /// Term, e.g. 3 or 5.5
        #[arg(long)]
        term: Term,
        /// Prerequisite subject IDs
        #[arg(long, value_delimiter = ',')]
        requires: Vec<String>,
    },
    /// Remove a subject
    RemoveSubject {
        /// Template ID
        template: String,
        /// Subject ID
        subject: String,
    },
    /// Delete a template and its progress
    Delete {
        /// Template ID
        template: String,
    },
    /// Check a template for structural problems
    Validate {
        /// Template ID
        template: String,
    },
    /// Explain why subjects are locked
    Locks {
        /// Template ID
        template: String,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    debug!(storage = %cli.storage.display(), "opening storage");
    let storage = JsonStorage::new(&cli.storage).await?;
    let mut tracker = CurriculumTracker::new(storage);
    let owner = UserId::from(cli.owner);

    match cli.command {
        Commands::Init { empty, institution, program, terms, intermediate } => {
            let template = if empty {
                let metadata = TemplateMetadata {
                    institution,
                    program,
                    term_count: terms,
                    intermediate_terms: TemplateMetadata::parse_term_list(&intermediate)?,
                    ..TemplateMetadata::default()
                };
                tracker.create_template(owner, metadata).await?
            } else {
                tracker.create_default_template(owner).await?
            };
            println!("Created template {} ({} subjects)", template.id, template.subjects.len());
        }
        Commands::List => {
            let templates = tracker.templates_for(&owner).await?;
            println!("Templates ({})", templates.len());
            for template in templates {
                println!("  {} | {} | {} subjects | {}",
                    template.id,
                    display_name(&template),
                    template.subjects.len(),
                    template.created_at.format("%Y-%m-%d"),
                );
            }
        }
        Commands::Show { template } => {
            let view = tracker.view(&TemplateId::from(template)).await?;
            print_subjects(&view);
        }
        Commands::Toggle { template, subjects } => {
            let id = TemplateId::from(template);
            let subjects: Vec<SubjectId> = subjects.into_iter().map(SubjectId::from).collect();
            let states = tracker.toggle_completions(&id, &subjects).await?;
            for (subject, done) in subjects.iter().zip(states) {
                println!("{} {}", subject, if done { "completed" } else { "not completed" });
            }
            let view = tracker.view(&id).await?;
            println!("Eligible now: {}", join_ids(view.partition.eligible.iter()));
        }
        Commands::Clear { template } => {
            tracker.clear_completions(&TemplateId::from(template)).await?;
            println!("Cleared completions");
        }
        Commands::Stats { template, json } => {
            let view = tracker.view(&TemplateId::from(template)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view.report)?);
            } else {
                print_stats(&view);
            }
        }
        Commands::AddSubject { template, id, name, category, term, requires } => {
            let subject = Subject::new(id, name, category, term).with_prerequisites(requires);
            let subject_id = subject.id.clone();
            let template = tracker.add_subject(&TemplateId::from(template), subject).await?;
            println!("Added {} ({} subjects)", subject_id, template.subjects.len());
        }
        Commands::RemoveSubject { template, subject } => {
            let id = TemplateId::from(template);
            let subject = SubjectId::from(subject);
            let dependents: Vec<SubjectId> = tracker
                .template(&id)
                .await?
                .dependents_of(&subject)
                .iter()
                .map(|s| s.id.clone())
                .collect();

            let removed = tracker.remove_subject(&id, &subject).await?;
            println!("Removed {} - {}", removed.id, removed.name);
            if !dependents.is_empty() {
                println!("No longer required by: {}", join_ids(dependents.iter()));
            }
        }
        Commands::Delete { template } => {
            let id = TemplateId::from(template);
            tracker.delete_template(&id).await?;
            println!("Deleted template {}", id);
        }
        Commands::Validate { template } => {
            // load without the tracker so every problem is reported, not just the first
            let template = tracker.storage().load_template(&TemplateId::from(template)).await?;
            let problems = violations(&template.subjects);
            if problems.is_empty() {
                println!("Template {} is valid ({} subjects)", template.id, template.subjects.len());
            } else {
                for problem in &problems {
                    println!("  {}", problem);
                }
                bail!("template {} has {} problem(s)", template.id, problems.len());
            }
        }
        Commands::Locks { template, json } => {
            let analysis = tracker.locks(&TemplateId::from(template)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                println!("Locked: {} ({} one step away)",
                    analysis.stats.locked,
                    analysis.stats.one_step_away,
                );
                for lock in &analysis.explanations {
                    println!("  {} | {} | needs {}",
                        lock.subject,
                        lock.term.label(),
                        join_ids(lock.missing.iter()),
                    );
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn display_name(template: &Template) -> String {
    let meta = &template.metadata;
    match (meta.program.is_empty(), meta.institution.is_empty()) {
        (false, false) => format!("{} ({})", meta.program, meta.institution),
        (false, true) => meta.program.clone(),
        (true, false) => meta.institution.clone(),
        (true, true) => "untitled".to_string(),
    }
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a SubjectId>) -> String {
    let ids: Vec<&str> = ids.map(SubjectId::as_str).collect();
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.join(", ")
    }
}

fn status_marker(status: Option<SubjectStatus>) -> &'static str {
    match status {
        Some(SubjectStatus::Completed) => "[x]",
        Some(SubjectStatus::Eligible) => "[ ]",
        Some(SubjectStatus::Locked) | None => "[-]",
    }
}

fn print_subjects(view: &CurriculumView) {
    println!("{}", display_name(&view.template));
    for group in &view.report.by_term {
        println!("{} ({}/{})", group.term.label(), group.stats.completed, group.stats.total);
        for subject in view
            .template
            .subjects
            .iter()
            .filter(|s| s.term.as_str() == group.term.as_str())
        {
            println!("  {} {} | {} | {}",
                status_marker(view.partition.status_of(&subject.id)),
                subject.id,
                subject.name,
                subject.category,
            );
        }
    }
}

fn print_stats(view: &CurriculumView) {
    let report = &view.report;
    println!("Overall: {}/{} ({}%)",
        report.overall.total_completed,
        report.overall.total_subjects,
        report.overall.overall_percentage,
    );
    match report.next_milestone {
        Milestone::Remaining(n) => println!("Next milestone: {} more", n),
        Milestone::Reached => println!("Next milestone: reached"),
        Milestone::NoSubjects => println!("Next milestone: no subjects"),
    }
    if let Some(best) = &report.best_category {
        println!("Best category: {} ({}%)", best.category, best.stats.percentage);
    }

    println!("By category");
    for c in &report.by_category {
        println!("  {}: {}/{} ({}%)", c.category, c.stats.completed, c.stats.total, c.stats.percentage);
    }
    println!("By term");
    for t in &report.by_term {
        println!("  {}: {}/{} ({}%)", t.term.label(), t.stats.completed, t.stats.total, t.stats.percentage);
    }
}
