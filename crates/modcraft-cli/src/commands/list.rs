//! Implementation of the `modcraft list` command.

use std::sync::Arc;

use modcraft_adapters::builtin_registry;
use modcraft_core::application::{ModuleInfo, ModuleService};

use crate::{
    cli::{ListArgs, ListFormat},
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ListArgs, output: &OutputManager) -> CliResult<()> {
    let service = ModuleService::new(Arc::new(builtin_registry()));
    let modules = select(service.list_modules(), args.tag.as_deref());

    match args.format {
        ListFormat::Table => {
            output.header("Available modules:")?;
            for line in table(&modules) {
                output.print(&line)?;
            }
        }
        ListFormat::Json => {
            // JSON goes straight to stdout so pipes get it even with --quiet.
            let json = serde_json::to_string_pretty(&modules).map_err(|e| CliError::InvalidInput {
                message: format!("failed to serialise module list: {e}"),
                source: Some(Box::new(e)),
            })?;
            println!("{json}");
        }
        ListFormat::List => {
            for m in &modules {
                println!("{}", m.name);
            }
        }
        ListFormat::Csv => {
            println!("name,version,label,tags,summary");
            for m in &modules {
                println!(
                    "{},{},{},{},{}",
                    csv_field(&m.name),
                    csv_field(&m.version),
                    csv_field(&m.label),
                    csv_field(&m.tags.join(";")),
                    csv_field(&m.summary)
                );
            }
        }
    }

    Ok(())
}

/// Modules sorted by name, optionally restricted to one tag.
fn select(mut modules: Vec<ModuleInfo>, tag: Option<&str>) -> Vec<ModuleInfo> {
    if let Some(tag) = tag {
        modules.retain(|m| m.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)));
    }
    modules.sort_by(|a, b| a.name.cmp(&b.name));
    modules
}

fn table(modules: &[ModuleInfo]) -> Vec<String> {
    const HEADERS: [&str; 5] = ["NAME", "VERSION", "LABEL", "TAGS", "SUMMARY"];

    let rows: Vec<[String; 5]> = modules
        .iter()
        .map(|m| {
            [
                m.name.clone(),
                m.version.clone(),
                m.label.clone(),
                m.tags.join(","),
                m.summary.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: [&str; 5]| {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i + 1 == cells.len() {
                line.push_str(cell);
            } else {
                line.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
            }
        }
        line.trim_end().to_string()
    };

    let mut lines = vec![render(HEADERS)];
    lines.extend(rows.iter().map(|row| render(row.each_ref().map(String::as_str))));
    lines
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
