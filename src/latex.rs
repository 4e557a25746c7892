//! LaTeX table rendering
//!
//! One renderer for all four report layouts, emitting standalone documents:
//! instance rows with `$center_{spread}$` cells, the best and second-best
//! algorithm per row shaded, a verdict column for the Friedman table, a
//! win/loss/tie row for the pivot table, and the upper-triangle symbol
//! matrix for the all-pairs table.

use crate::report::{AllPairsReport, FriedmanReport, PivotReport, SummaryReport};

const PREAMBLE: &str = r"\documentclass{article}
\title{Algorithms Comparison}
\usepackage{colortbl}
\usepackage{float}
\usepackage[table*]{xcolor}
\xdefinecolor{gray95}{gray}{0.65}
\xdefinecolor{gray25}{gray}{0.8}
\begin{document}
\maketitle
\section{Tables}
";

fn document(caption: &str, column_spec: &str, header: &str, body: &str) -> String {
    format!(
        "{PREAMBLE}\\begin{{table}}[H]\n\\caption{{{caption}}}\n\\centering\n\\begin{{scriptsize}}\n\\begin{{tabular}}{{{column_spec}}}\n\\hline\n{header}{body}\\hline\n\\end{{tabular}}\n\\end{{scriptsize}}\n\\end{{table}}\n\\end{{document}}\n"
    )
}

/// Column layout: one `l` label column plus `data_columns` centered ones.
fn column_spec(data_columns: usize) -> String {
    let mut spec = String::from("l|");
    for _ in 0..data_columns.saturating_sub(1) {
        spec.push_str("c|");
    }
    spec.push('c');
    spec
}

fn header_row(columns: &[String], extra: Option<&str>) -> String {
    let mut row = String::new();
    for column in columns {
        row.push_str(" & ");
        row.push_str(column);
    }
    if let Some(extra) = extra {
        row.push_str(" & ");
        row.push_str(extra);
    }
    row.push_str(" \\\\ \\hline\n");
    row
}

/// Indices of the best and second-best center values in one row, honoring
/// the metric direction. NaN cells never win.
fn highlight_indices(row: &[f64], maximize: bool) -> (Option<usize>, Option<usize>) {
    let better = |a: f64, b: f64| if maximize { a > b } else { a < b };
    let mut best = None;
    let mut second = None;
    for (i, &v) in row.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            None => best = Some(i),
            Some(b) if better(v, row[b]) => {
                second = best;
                best = Some(i);
            }
            _ => match second {
                None => second = Some(i),
                Some(s) if better(v, row[s]) => second = Some(i),
                _ => {}
            },
        }
    }
    (best, second)
}

fn cell(center: f64, spread: f64, suffix: &str, shade: Option<&str>) -> String {
    let value = format!("${center:.2e}_{{ {spread:.2e} }}{suffix}$");
    match shade {
        Some(color) => format!("\\cellcolor{{{color}}}{value}"),
        None => value,
    }
}

fn value_rows(
    summary: &SummaryReport,
    mut suffix: impl FnMut(usize, usize) -> String,
    mut row_extra: impl FnMut(usize) -> String,
) -> String {
    let agg = &summary.aggregation;
    let mut body = String::new();
    for (ii, instance) in agg.instances.iter().enumerate() {
        let (best, second) = highlight_indices(&agg.center[ii], summary.maximize);
        body.push_str(instance);
        for ai in 0..agg.algorithms.len() {
            let shade = if best == Some(ai) {
                Some("gray95")
            } else if second == Some(ai) {
                Some("gray25")
            } else {
                None
            };
            body.push_str(" & ");
            body.push_str(&cell(
                agg.center[ii][ai],
                agg.spread[ii][ai],
                &suffix(ii, ai),
                shade,
            ));
        }
        body.push_str(&row_extra(ii));
        body.push_str(" \\\\\n");
    }
    body
}

/// Center/spread table.
pub fn summary_table(report: &SummaryReport) -> String {
    let caption = format!(
        "{}. {} and {} Table",
        report.metric,
        report.aggregation.kind.center_label(),
        report.aggregation.kind.spread_label()
    );
    let body = value_rows(report, |_, _| String::new(), |_| String::new());
    document(
        &caption,
        &column_spec(report.aggregation.algorithms.len()),
        &header_row(&report.aggregation.algorithms, None),
        &body,
    )
}

/// Center/spread table with the Friedman verdict column (+ marks instances
/// where the rank differences are significant).
pub fn friedman_table(report: &FriedmanReport) -> String {
    let caption = format!(
        "{}. {} and {} Friedman Table (+ implies that the difference between the algorithms for the instance in the row is significant)",
        report.summary.metric,
        report.summary.aggregation.kind.center_label(),
        report.summary.aggregation.kind.spread_label()
    );
    let body = value_rows(
        &report.summary,
        |_, _| String::new(),
        |ii| format!(" & {}", report.verdicts[ii].symbol),
    );
    document(
        &caption,
        &column_spec(report.summary.aggregation.algorithms.len() + 1),
        &header_row(&report.summary.aggregation.algorithms, Some("FT")),
        &body,
    )
}

/// Pivot table: verdict symbols embedded in the cells, tally row appended.
pub fn pivot_table(report: &PivotReport) -> String {
    let caption = format!(
        "{}. {} and {} Pairwise Pivot Table (+/- marks algorithms statistically better/worse than the pivot '{}', = marks no significant difference)",
        report.summary.metric,
        report.summary.aggregation.kind.center_label(),
        report.summary.aggregation.kind.spread_label(),
        report.pivot
    );
    let candidate_count = report.candidates.len();
    let body_values = value_rows(
        &report.summary,
        |ii, ai| {
            if ai < candidate_count {
                format!(" {}", report.rows[ii].symbols[ai])
            } else {
                String::new()
            }
        },
        |_| String::new(),
    );

    let mut tally = String::from("\\hline + / - / =");
    for t in &report.tallies {
        tally.push_str(&format!(
            " & \\textbf{{{} / {} / {}}}",
            t.better, t.worse, t.ties
        ));
    }
    tally.push_str(" & \\\\\n");

    document(
        &caption,
        &column_spec(report.summary.aggregation.algorithms.len()),
        &header_row(&report.summary.aggregation.algorithms, None),
        &format!("{body_values}{tally}"),
    )
}

/// All-pairs table: each cell holds one verdict symbol per instance, upper
/// triangle only.
pub fn all_pairs_table(report: &AllPairsReport) -> String {
    let algorithms = &report.summary.aggregation.algorithms;
    let caption = format!(
        "{}. Pairwise Test 1vs1 Table. Each symbol in a cell is one instance, in order: {}. +/- means the row/column algorithm is better with statistical confidence, = means no significant difference",
        report.summary.metric,
        report.instances.join(", ")
    );

    let mut body = String::new();
    for first in &algorithms[..algorithms.len() - 1] {
        body.push_str(first);
        for second in &algorithms[1..] {
            body.push_str(" & ");
            if first == second {
                continue;
            }
            if let Some(pair) = report
                .pairs
                .iter()
                .find(|p| p.first == *first && p.second == *second)
            {
                body.push_str(&format!("\\texttt{{{}}}", pair.symbols));
            }
        }
        body.push_str(" \\\\\n");
    }

    document(
        &caption,
        &column_spec(algorithms.len() - 1),
        &header_row(&algorithms[1..], None),
        &body,
    )
}
