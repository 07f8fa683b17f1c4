//! Text and JSON rendering of stage results.

use std::io::Write;

use serde_json::{json, Value};
use threadshape_analysis::ranking::{ComponentSummary, PolaritySummary};
use threadshape_analysis::{DecompositionOutcome, ExampleReport, Polarity, RunReport, Summary, TensorBuild};
use threadshape_analysis::report::render_lines;
use threadshape_core::errors::ThreadshapeErrorCode;

use crate::error::CliError;
use crate::OutputFormat;

pub fn tensor_build(out: &mut impl Write, build: &TensorBuild, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(out, &tensor_build_json(build)),
        OutputFormat::Text => {
            let [h, c, f] = build.tensor.shape();
            writeln!(
                out,
                "tensor {h}x{c}x{f} (horizons {}..={}), {} missing cells imputed",
                build.horizons.first().copied().unwrap_or_default(),
                build.horizons.last().copied().unwrap_or_default(),
                build.imputed_cells
            )?;
            Ok(())
        }
    }
}

pub fn decomposition(
    out: &mut impl Write,
    outcome: &DecompositionOutcome,
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(out, &decomposition_json(outcome)),
        OutputFormat::Text => {
            for rank in outcome.factors.keys() {
                writeln!(out, "rank {rank}: ok")?;
            }
            for failure in &outcome.failures {
                match failure.rank() {
                    Some(rank) => writeln!(out, "rank {rank}: {}", failure.display_with_code())?,
                    None => writeln!(out, "{}", failure.display_with_code())?,
                }
            }
            Ok(())
        }
    }
}

pub fn summary(out: &mut impl Write, summary: &Summary, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(out, &serde_json::to_value(summary)?),
        OutputFormat::Text => write_summary_text(out, summary),
    }
}

pub fn examples(out: &mut impl Write, report: &ExampleReport, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(out, &examples_json(report)?),
        OutputFormat::Text => write_examples_text(out, report),
    }
}

pub fn run(out: &mut impl Write, report: &RunReport, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let failures: Vec<Value> = report.decomposition_failures.iter().map(error_json).collect();
            let value = json!({
                "built": report.built,
                "decomposed": report.decomposed,
                "decomposition_failures": failures,
                "summary": serde_json::to_value(&report.summary)?,
                "examples": examples_json(&report.examples)?,
            });
            write_json(out, &value)
        }
        OutputFormat::Text => {
            writeln!(
                out,
                "build-tensor: {}",
                if report.built { "ran" } else { "skipped (artifacts present)" }
            )?;
            writeln!(
                out,
                "decompose: {}",
                if report.decomposed { "ran" } else { "skipped (artifacts present)" }
            )?;
            for failure in &report.decomposition_failures {
                writeln!(out, "  {}", failure.display_with_code())?;
            }
            writeln!(out)?;
            write_summary_text(out, &report.summary)?;
            writeln!(out)?;
            write_examples_text(out, &report.examples)
        }
    }
}

fn write_summary_text(out: &mut impl Write, summary: &Summary) -> Result<(), CliError> {
    writeln!(out, "rank {} (threshold {})", summary.rank, summary.threshold)?;
    for component in &summary.components {
        write_component_text(out, component)?;
    }
    Ok(())
}

fn write_component_text(out: &mut impl Write, component: &ComponentSummary) -> Result<(), CliError> {
    writeln!(out, "component {}", component.component)?;
    for polarity in Polarity::ALL {
        write_polarity_text(out, polarity, component.polarity(polarity))?;
    }
    if !component.degenerate_modes.is_empty() {
        let modes: Vec<&str> = component.degenerate_modes.iter().map(|m| m.name()).collect();
        writeln!(out, "  degenerate: {}", modes.join(", "))?;
    }
    Ok(())
}

fn write_polarity_text(out: &mut impl Write, polarity: Polarity, summary: &PolaritySummary) -> Result<(), CliError> {
    writeln!(out, "  {polarity}: {} conversations", summary.flagged_conversations)?;
    for entry in &summary.groups {
        writeln!(
            out,
            "    {:<24} {:>5}/{:<5} {:.3}",
            entry.group, entry.flagged, entry.total, entry.ratio
        )?;
    }
    if !summary.features.is_empty() {
        writeln!(out, "    features: {}", summary.features.join(", "))?;
    }
    if !summary.horizons.is_empty() {
        let horizons: Vec<String> = summary.horizons.iter().map(usize::to_string).collect();
        writeln!(out, "    horizons: {}", horizons.join(", "))?;
    }
    Ok(())
}

fn write_examples_text(out: &mut impl Write, report: &ExampleReport) -> Result<(), CliError> {
    for example in &report.data {
        writeln!(
            out,
            "component {} {} #{} {} (group {})",
            example.component, example.polarity, example.index, example.conversation_id, example.group
        )?;
        for line in render_lines(&example.lines) {
            writeln!(out, "  {line}")?;
        }
    }
    for error in &report.errors {
        writeln!(out, "skipped: {}", error.display_with_code())?;
    }
    Ok(())
}

fn tensor_build_json(build: &TensorBuild) -> Value {
    json!({
        "shape": build.tensor.shape(),
        "horizons": build.horizons,
        "feature_names": build.feature_names,
        "conversations": build.entity_ids.len(),
        "imputed_cells": build.imputed_cells,
    })
}

fn decomposition_json(outcome: &DecompositionOutcome) -> Value {
    json!({
        "ranks": outcome.factors.keys().collect::<Vec<_>>(),
        "failures": outcome.failures.iter().map(error_json).collect::<Vec<_>>(),
    })
}

fn examples_json(report: &ExampleReport) -> Result<Value, CliError> {
    Ok(json!({
        "examples": serde_json::to_value(&report.data)?,
        "failures": report.errors.iter().map(error_json).collect::<Vec<_>>(),
    }))
}

fn error_json<E: ThreadshapeErrorCode + std::fmt::Display>(error: &E) -> Value {
    json!({ "code": error.error_code(), "message": error.to_string() })
}

fn write_json(out: &mut impl Write, value: &Value) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
