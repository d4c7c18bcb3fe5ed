use std::io::{self, Write};

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn render(result: &CommandResult, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(&result.data)?
            } else {
                serde_json::to_string(&result.data)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => {
            out.write_all(render_table(&result.header, &result.rows).as_bytes())?;
            for note in &result.notes {
                writeln!(out, "{note}")?;
            }
        }
    }

    let stderr = io::stderr();
    let mut err = stderr.lock();
    for error in &result.errors {
        writeln!(err, "error: {error}")?;
    }

    Ok(())
}

/// Left-aligned columns padded to the widest cell, two spaces apart.
pub fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(index) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut rendered = String::new();
    let header_cells: Vec<String> = header.iter().map(|cell| (*cell).to_owned()).collect();
    push_row(&mut rendered, &header_cells, &widths);
    for row in rows {
        push_row(&mut rendered, row, &widths);
    }
    rendered
}

fn push_row(rendered: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let padding = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    rendered.push_str(line.trim_end());
    rendered.push('\n');
}
