//! Plain-text rendering of traces, steps and example reports.

use std::fmt::Write;

use peakscope_trace::{Step, Trace};

use crate::cases::CaseReport;

const BADGES: [&str; 4] = ["low", "mid", "high", "peak"];

fn badges_for(step: &Step, index: usize) -> String {
    let i = index as i64;
    let flags = [
        step.low == i,
        step.mid == i,
        step.high == i,
        step.found && step.peak_index == Some(index),
    ];
    BADGES
        .iter()
        .zip(flags)
        .filter(|(_, on)| *on)
        .map(|(b, _)| *b)
        .collect::<Vec<_>>()
        .join("/")
}

/// The array as a row of cells with index and badge rows beneath.
pub fn render_array(step: &Step) -> String {
    let values = &step.snapshot;
    let cells: Vec<(String, String, String)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let value = if step.mid == i as i64 {
                format!("<{v}>")
            } else {
                format!("[{v}]")
            };
            (value, format!("i:{i}"), badges_for(step, i))
        })
        .collect();

    let mut rows = [String::new(), String::new(), String::new()];
    for (value, index, badges) in &cells {
        let width = value.len().max(index.len()).max(badges.len());
        for (row, text) in rows.iter_mut().zip([value, index, badges]) {
            if !row.is_empty() {
                row.push(' ');
            }
            let _ = write!(row, "{text:^width$}");
        }
    }

    rows.iter()
        .map(|r| r.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

fn bound_line(label: &str, step: &Step, index: i64) -> String {
    match step.value_at(index) {
        Some(v) => format!("{label}: {index} ({v})"),
        None => format!("{label}: {index}"),
    }
}

/// The step under `cursor`: array view, bounds, action and peak banner.
pub fn render_step(trace: &Trace, cursor: usize) -> String {
    let Some(step) = trace.get(cursor) else {
        return "No step selected".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", render_array(step));
    let _ = writeln!(out);
    let _ = writeln!(out, "Step {} / {}", cursor + 1, trace.len());
    let _ = writeln!(out, "{}", bound_line("low", step, step.low));
    let _ = writeln!(out, "{}", bound_line("high", step, step.high));
    let _ = writeln!(out, "{}", bound_line("mid", step, step.mid));
    let _ = writeln!(out, "Action: {}", step.action);
    if let (Some(index), Some(value)) = (step.peak_index, step.peak_value()) {
        let _ = writeln!(out, "Peak found at index {index} with value {value}");
    }
    out
}

/// Every step of the trace, the one under `cursor` marked.
pub fn render_log(trace: &Trace, cursor: usize) -> String {
    if trace.is_empty() {
        return "No steps yet.".to_string();
    }

    let mut out = String::new();
    for (i, step) in trace.iter().enumerate() {
        let marker = if i == cursor { '>' } else { ' ' };
        let found = if step.found { " (found)" } else { "" };
        let _ = writeln!(out, "{marker} Step {}{found}", i + 1);
        let _ = writeln!(
            out,
            "    mid: {}, low: {}, high: {}",
            step.mid, step.low, step.high
        );
        let _ = writeln!(out, "    {}", step.action);
    }
    out
}

fn format_array(values: &[i64]) -> String {
    let inner = values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{inner}]")
}

/// Example results as an aligned table.
pub fn render_case_table(reports: &[CaseReport]) -> String {
    let header = ["Name", "Array", "Expected", "Got", "Value", "Pass?"].map(String::from);
    let rows: Vec<[String; 6]> = reports
        .iter()
        .map(|r| {
            [
                r.name.clone(),
                format_array(&r.values),
                r.expected_index.to_string(),
                r.got_index.map_or_else(|| "-".to_string(), |i| i.to_string()),
                r.value.map_or_else(|| "-".to_string(), |v| v.to_string()),
                if r.passed { "PASS" } else { "FAIL" }.to_string(),
            ]
        })
        .collect();

    let mut widths = header.clone().map(|h| h.len());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let line = |cells: &[String; 6]| {
        cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", line(&header));
    let _ = writeln!(
        out,
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in &rows {
        let _ = writeln!(out, "{}", line(row));
    }
    out
}
