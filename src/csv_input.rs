//! CSV input for measurement and metric tables
//!
//! Hand-rolled field parsing with the usual quoting rules (RFC 4180 style:
//! fields containing commas, quotes or newlines are wrapped in quotes,
//! embedded quotes doubled). Columns are located by header name so column
//! order does not matter. Non-finite metric values are rejected here so the
//! engine never has to order a NaN.

use anyhow::{bail, Context, Result};

use crate::dataset::{Measurement, MetricDescriptor, MetricsTable};

/// Parse the measurements table
/// (`Algorithm,Instance,MetricName,ExecutionId,MetricValue`).
pub fn parse_measurements(content: &str) -> Result<Vec<Measurement>> {
    let mut lines = content.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (_, header) = lines.next().context("measurements CSV is empty")?;
    let columns = split_fields(header);
    let algorithm = column_index(&columns, "Algorithm")?;
    let instance = column_index(&columns, "Instance")?;
    let metric = column_index(&columns, "MetricName")?;
    let execution = column_index(&columns, "ExecutionId")?;
    let value = column_index(&columns, "MetricValue")?;

    let mut measurements = Vec::new();
    for (lineno, line) in lines {
        let fields = split_fields(line);
        if fields.len() != columns.len() {
            bail!(
                "measurements line {}: expected {} fields, got {}",
                lineno + 1,
                columns.len(),
                fields.len()
            );
        }
        let metric_value: f64 = fields[value]
            .parse()
            .with_context(|| format!("measurements line {}: bad MetricValue", lineno + 1))?;
        // f64::parse admits NaN/inf; the rank tests have no ordering for them
        if !metric_value.is_finite() {
            bail!(
                "measurements line {}: MetricValue must be finite, got '{}'",
                lineno + 1,
                fields[value]
            );
        }
        measurements.push(Measurement {
            algorithm: fields[algorithm].clone(),
            instance: fields[instance].clone(),
            metric: fields[metric].clone(),
            execution_id: fields[execution]
                .parse()
                .with_context(|| format!("measurements line {}: bad ExecutionId", lineno + 1))?,
            value: metric_value,
        });
    }
    Ok(measurements)
}

/// Parse the metrics table (`MetricName,Maximize`).
pub fn parse_metrics(content: &str) -> Result<MetricsTable> {
    let mut lines = content.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (_, header) = lines.next().context("metrics CSV is empty")?;
    let columns = split_fields(header);
    let name = column_index(&columns, "MetricName")?;
    let maximize = column_index(&columns, "Maximize")?;

    let mut metrics = Vec::new();
    for (lineno, line) in lines {
        let fields = split_fields(line);
        if fields.len() != columns.len() {
            bail!(
                "metrics line {}: expected {} fields, got {}",
                lineno + 1,
                columns.len(),
                fields.len()
            );
        }
        metrics.push(MetricDescriptor {
            name: fields[name].clone(),
            maximize: parse_bool(&fields[maximize])
                .with_context(|| format!("metrics line {}: bad Maximize flag", lineno + 1))?,
        });
    }
    Ok(MetricsTable::new(metrics))
}

fn column_index(columns: &[String], name: &str) -> Result<usize> {
    columns
        .iter()
        .position(|c| c == name)
        .with_context(|| format!("missing required column '{name}'"))
}

fn parse_bool(field: &str) -> Result<bool> {
    match field.trim() {
        "true" | "True" | "TRUE" | "1" => Ok(true),
        "false" | "False" | "FALSE" | "0" => Ok(false),
        other => bail!("expected a boolean, got '{other}'"),
    }
}

/// Split one CSV line into unescaped fields.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        if quoted {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    quoted = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => quoted = true,
                ',' => fields.push(std::mem::take(&mut field)),
                _ => field.push(c),
            }
        }
    }
    fields.push(field);
    fields
}
