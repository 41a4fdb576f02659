//! Terminal front-end. Renders the current step and turns keystrokes into
//! workflow operations; holds no state of its own.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::config::Config;
use crate::models::Severity;
use crate::workflow::{Session, Step, Workflow};

const WELCOME_MESSAGE: &str = "Create a tailored resume for your next opportunity";

/// What the user can do while reviewing a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewCommand {
    Validate,
    Approve,
    Reject,
    Quit,
}

impl ReviewCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "v" | "validate" => Some(Self::Validate),
            "a" | "approve" => Some(Self::Approve),
            "r" | "reject" => Some(Self::Reject),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Main event loop: one iteration per rendered step, until the user quits
/// or stdin closes.
pub async fn run(workflow: &mut Workflow, config: &Config) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        match workflow.session().step {
            Step::Welcome => {
                println!("\n{}", config.display_name);
                println!("{}\n", config.tagline);
                println!("{WELCOME_MESSAGE}");
                prompt("Press Enter to get started, or 'q' to quit: ")?;
                match next_line(&mut lines) {
                    Some(line) if line.trim().eq_ignore_ascii_case("q") => return Ok(()),
                    Some(_) => workflow.start(),
                    None => return Ok(()),
                }
            }
            Step::Input => {
                if let Some(error) = &workflow.session().error {
                    println!("\n! {error}");
                }
                if !workflow.session().job_description.is_empty() {
                    println!("\nA job description is already entered; press Enter on an empty first line to resubmit it.");
                }
                println!("\nPaste the job description, then finish with an empty line:");
                if let Some(text) = read_block(&mut lines)? {
                    if !text.trim().is_empty() {
                        workflow.set_job_description(text);
                    }
                } else {
                    return Ok(());
                }
                println!("Tailoring your resume...");
                workflow.submit().await;
            }
            // submit drives Input → Processing → Review/Input to completion
            // before returning, so the loop never observes this step.
            Step::Processing => unreachable!("processing completes within submit"),
            Step::Review => {
                print!("{}", render_review(workflow.session()));
                prompt("[v]alidate  [a]pprove  [r]eject  [q]uit: ")?;
                let Some(line) = next_line(&mut lines) else {
                    return Ok(());
                };
                match ReviewCommand::parse(&line) {
                    Some(ReviewCommand::Validate) => {
                        println!("Validating...");
                        workflow.validate().await;
                    }
                    Some(ReviewCommand::Approve) => {
                        println!("Preparing your document...");
                        workflow.approve().await;
                    }
                    Some(ReviewCommand::Reject) => workflow.reject(),
                    Some(ReviewCommand::Quit) => return Ok(()),
                    None => println!("Unrecognized command."),
                }
            }
            Step::Download => {
                if let Some(path) = &workflow.session().saved_path {
                    println!("\nYour tailored resume is ready: {}", path.display());
                }
                prompt("Start a [n]ew session, or 'q' to quit: ")?;
                match next_line(&mut lines) {
                    Some(line) if line.trim().eq_ignore_ascii_case("n") => workflow.reset(),
                    _ => return Ok(()),
                }
            }
        }
    }
}

/// Renders the review screen: proposed changes, the keyword panel, and the
/// validation panel when present.
pub fn render_review(session: &Session) -> String {
    let mut out = String::new();

    if let Some(error) = &session.error {
        out.push_str(&format!("\n! {error}\n"));
    }

    out.push_str("\n=== Proposed changes ===\n");
    if session.changes.is_empty() {
        out.push_str("(no changes proposed)\n");
    }
    for change in &session.changes {
        out.push_str(&format!("\n[{}]\n", change.section));
        out.push_str(&format!("  - {}\n", change.original));
        out.push_str(&format!("  + {}\n", change.modified));
        if let Some(reason) = &change.reason {
            out.push_str(&format!("  reason: {reason}\n"));
        }
    }

    if let Some(analysis) = &session.keyword_analysis {
        out.push_str("\n=== Keyword analysis ===\n");
        out.push_str(&format!(
            "found ({}): {}\n",
            analysis.keywords_found.len(),
            analysis.keywords_found.join(", ")
        ));
        out.push_str(&format!(
            "addressed ({}): {}\n",
            analysis.keywords_addressed.len(),
            analysis.keywords_addressed.join(", ")
        ));
        out.push_str(&format!(
            "missing ({}): {}\n",
            analysis.keywords_missing.len(),
            analysis.keywords_missing.join(", ")
        ));
        out.push_str(&format!("estimated pages: {}\n", analysis.estimated_pages));
    }

    if let Some(validation) = &session.validation {
        out.push_str("\n=== ATS validation ===\n");
        out.push_str(&format!("score: {}/100\n", validation.score));
        if !validation.overall_assessment.is_empty() {
            out.push_str(&format!("{}\n", validation.overall_assessment));
        }
        for strength in &validation.strengths {
            out.push_str(&format!("  + {strength}\n"));
        }
        for issue in &validation.issues {
            out.push_str(&format!(
                "  [{}] {}: {}\n",
                severity_label(issue.severity),
                issue.category,
                issue.description
            ));
            if let Some(suggestion) = &issue.suggestion {
                out.push_str(&format!("      suggestion: {suggestion}\n"));
            }
        }
        out.push_str(if validation.ready_to_submit {
            "ready to submit\n"
        } else {
            "needs another pass\n"
        });
    }

    out
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "high",
        Severity::Medium => "medium",
        Severity::Low => "low",
    }
}

fn prompt(text: &str) -> Result<()> {
    print!("{text}");
    io::stdout().flush()?;
    Ok(())
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Option<String> {
    lines.next().and_then(|line| line.ok())
}

/// Reads lines until the first empty line. Returns `None` on EOF before any
/// input.
fn read_block(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<String>> {
    let mut collected: Vec<String> = Vec::new();
    loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if line.trim().is_empty() {
                    return Ok(Some(collected.join("\n")));
                }
                collected.push(line);
            }
            None if collected.is_empty() => return Ok(None),
            None => return Ok(Some(collected.join("\n"))),
        }
    }
}
