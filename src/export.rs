//! Plain-text, CSV and JSON renderings of the editor's current plan.

use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;

use crate::editor::PlanEditor;
use crate::plan::PlanRequest;
use crate::report::{present_rows, present_summary, PlanRow, PlanSummary};

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Table,
    Csv,
    Json,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no plan to export")]
    NoPlan,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct PlanDocument<'a> {
    generated_at: DateTime<Local>,
    request: &'a PlanRequest,
    summary: PlanSummary,
    segments: Vec<PlanRow>,
}

pub fn write_plan<W: Write>(
    editor: &PlanEditor,
    format: ExportFormat,
    out: W,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Table => write_table(editor, out),
        ExportFormat::Csv => write_csv(editor, out),
        ExportFormat::Json => write_json(editor, out),
    }
}

pub fn write_csv<W: Write>(editor: &PlanEditor, out: W) -> Result<(), ExportError> {
    let plan = editor.plan().ok_or(ExportError::NoPlan)?;
    let mut wtr = csv::Writer::from_writer(out);
    for row in present_rows(plan.segments()) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(editor: &PlanEditor, mut out: W) -> Result<(), ExportError> {
    let plan = editor.plan().ok_or(ExportError::NoPlan)?;
    let summary = present_summary(editor).ok_or(ExportError::NoPlan)?;
    let doc = PlanDocument {
        generated_at: Local::now(),
        request: plan.request(),
        summary,
        segments: present_rows(plan.segments()),
    };
    serde_json::to_writer_pretty(&mut out, &doc)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_table<W: Write>(editor: &PlanEditor, mut out: W) -> Result<(), ExportError> {
    let plan = editor.plan().ok_or(ExportError::NoPlan)?;
    let summary = present_summary(editor).ok_or(ExportError::NoPlan)?;

    writeln!(
        out,
        "{:.2} km  avg {}/km  target {}  estimated {}{}  [{}]",
        summary.distance,
        summary.average_pace,
        summary.target_time,
        summary.estimated_time,
        if summary.drift_exceeded { " (!)" } else { "" },
        summary.status,
    )?;
    writeln!(out)?;
    writeln!(out, "{:>4}  {:>16}  {:>8}  {:>8}", "#", "km", "pace", "time")?;
    for row in present_rows(plan.segments()) {
        writeln!(
            out,
            "{:>4}  {:>16}  {:>8}  {:>8}",
            row.id,
            format!("{:.2} ({:.2})", row.cumulative_distance, row.distance),
            row.pace,
            row.duration,
        )?;
    }
    Ok(())
}
