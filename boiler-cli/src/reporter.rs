//! Colored console progress for interactive deploys

use boiler_core::domain::{DeploymentOutcome, Stage};
use boiler_engine::ProgressSink;
use colored::*;

/// Prints one status line per stage transition
///
/// Webhook-triggered runs keep the default tracing sink; this reporter is
/// only installed for deploys started from a terminal.
pub struct ConsoleReporter;

impl ProgressSink for ConsoleReporter {
    fn stage_started(&self, stage: Stage) {
        println!("\n{}", capitalize(stage.label()).magenta());
    }

    fn stage_succeeded(&self, stage: Stage) {
        println!("{}", format!("{} - done", capitalize(stage.label())).green());
    }

    fn stage_soft_failed(&self, stage: Stage, detail: &str) {
        println!(
            "{}",
            format!("{} - {} (continuing)", capitalize(stage.label()), detail).red()
        );
    }

    fn stage_failed(&self, stage: Stage, detail: &str) {
        println!(
            "{}",
            format!("{} - {}", capitalize(stage.label()), detail).red()
        );
    }

    fn run_finished(&self, outcome: &DeploymentOutcome) {
        if !outcome.success {
            println!("\n{}", outcome.message.red());
        }
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
