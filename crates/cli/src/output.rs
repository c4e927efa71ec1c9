//! Terminal rendering: tables for workflows and executions plus the one-line
//! status markers every command prints.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use n8nctl_types::{DeployStats, Execution, ExecutionStatus, Workflow};
use n8nctl_util::{format_display_timestamp, format_duration_seconds, truncate_chars};

const WORKFLOW_NAME_WIDTH: usize = 34;
const TAGS_WIDTH: usize = 14;
const EXECUTION_WORKFLOW_WIDTH: usize = 24;
const NOT_AVAILABLE: &str = "N/A";

pub fn success(message: impl AsRef<str>) {
    println!("{} {}", style("✔").green().bold(), message.as_ref());
}

pub fn warning(message: impl AsRef<str>) {
    println!("{} {}", style("⚠").yellow().bold(), message.as_ref());
}

pub fn failure(message: impl AsRef<str>) {
    println!("{} {}", style("✘").red().bold(), message.as_ref());
}

/// A bold heading underlined to its own width.
pub fn heading(title: &str) {
    println!("{}", style(title).bold());
    println!("{}", "=".repeat(title.chars().count().max(20)));
}

fn base_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().enumerate().map(|(index, header)| {
            let cell = Cell::new(header);
            if index == 0 { cell.fg(Color::Cyan) } else { cell }
        }));
    table
}

fn status_cell(active: bool) -> Cell {
    let label = if active { "active" } else { "inactive" };
    Cell::new(label).fg(if active { Color::Green } else { Color::Red })
}

pub fn workflows_table(workflows: &[Workflow]) -> Table {
    let mut table = base_table(&["ID", "Name", "Status", "Nodes", "Tags"]);
    for workflow in workflows {
        table.add_row(vec![
            Cell::new(workflow.id.as_deref().unwrap_or(NOT_AVAILABLE)),
            Cell::new(truncate_chars(&workflow.name, WORKFLOW_NAME_WIDTH)),
            status_cell(workflow.active),
            Cell::new(workflow.nodes.len()),
            Cell::new(truncate_chars(&workflow.tag_names(), TAGS_WIDTH)),
        ]);
    }
    table
}

pub fn execution_status_cell(status: &ExecutionStatus) -> Cell {
    let color = match status {
        ExecutionStatus::Success => Color::Green,
        ExecutionStatus::Error => Color::Red,
        ExecutionStatus::Running => Color::Yellow,
        ExecutionStatus::Waiting => Color::DarkYellow,
        ExecutionStatus::Other(_) => Color::Grey,
    };
    Cell::new(status).fg(color)
}

pub fn executions_table(executions: &[Execution]) -> Table {
    let mut table = base_table(&["Execution ID", "Workflow", "Status", "Started", "Duration"]);
    for execution in executions {
        let started = execution
            .started_at
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(format_display_timestamp)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let duration = execution
            .duration_seconds()
            .map(format_duration_seconds)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        table.add_row(vec![
            Cell::new(execution.id.as_deref().unwrap_or(NOT_AVAILABLE)),
            Cell::new(truncate_chars(
                execution.workflow_name().unwrap_or(NOT_AVAILABLE),
                EXECUTION_WORKFLOW_WIDTH,
            )),
            execution_status_cell(&execution.status),
            Cell::new(started),
            Cell::new(duration),
        ]);
    }
    table
}

/// Summary printed after a batch deploy.
pub fn deploy_report_table(total: usize, succeeded: usize, stats: &DeployStats) -> Table {
    let mut table = base_table(&["Metric", "Count"]);
    for (label, count) in [
        ("Total files", total),
        ("Successful", succeeded),
        ("Created", stats.created),
        ("Updated", stats.updated),
        ("Activated", stats.activated),
        ("Errors", stats.errors),
        ("Skipped", stats.skipped),
    ] {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn workflow_rows_truncate_long_names_and_tags() {
        let workflow: Workflow = serde_json::from_value(json!({
            "id": "12",
            "name": "A very long workflow name that keeps on going forever",
            "active": true,
            "tags": [{ "id": "1", "name": "production" }, "billing"]
        }))
        .expect("workflow");

        let rendered = workflows_table(&[workflow]).to_string();

        assert!(rendered.contains("A very long workflow name that kee"));
        assert!(!rendered.contains("keeps on"));
        assert!(rendered.contains("production, bi"));
        assert!(rendered.contains("active"));
    }

    #[test]
    fn execution_rows_show_time_and_duration() {
        let execution: Execution = serde_json::from_value(json!({
            "id": 55,
            "status": "error",
            "startedAt": "2024-05-01T10:00:00.000Z",
            "stoppedAt": "2024-05-01T10:00:03.250Z",
            "workflowData": { "name": "Nightly sync" }
        }))
        .expect("execution");

        let rendered = executions_table(&[execution]).to_string();

        assert!(rendered.contains("55"));
        assert!(rendered.contains("Nightly sync"));
        assert!(rendered.contains("2024-05-01 10:00:00"));
        assert!(rendered.contains("3.2s") || rendered.contains("3.3s"));
    }

    #[test]
    fn missing_execution_fields_render_placeholders() {
        let rendered = executions_table(&[Execution::default()]).to_string();
        assert!(rendered.contains(NOT_AVAILABLE));
    }

    #[test]
    fn deploy_report_lists_every_counter() {
        let stats = DeployStats {
            created: 2,
            errors: 1,
            ..DeployStats::default()
        };
        let rendered = deploy_report_table(3, 2, &stats).to_string();
        for label in ["Total files", "Successful", "Created", "Updated", "Activated", "Errors", "Skipped"] {
            assert!(rendered.contains(label), "missing {label}");
        }
    }
}
