//! Text and JSON renderers for schema listings and validation reports.
//!
//! Text output is aligned columns for humans; `--format json` serializes the
//! same model structs for scripts.

use anyhow::Result;
use gpkgctl_core::{Domain, DomainKind, FieldDetail, SchemaCatalog, Table};
use serde::Serialize;

use crate::{OutputFormat, RecordReport};

fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

#[derive(Debug, Serialize)]
struct TableSummary<'a> {
    name: &'a str,
    kind: &'a str,
    fields: usize,
    identifier: Option<&'a str>,
    description: Option<&'a str>,
}

pub fn tables(catalog: &SchemaCatalog, format: OutputFormat) -> Result<()> {
    let summaries: Vec<TableSummary> = catalog
        .tables()
        .iter()
        .map(|t| TableSummary {
            name: &t.name,
            kind: t.kind.as_str(),
            fields: t.fields.len(),
            identifier: t.identifier.as_deref(),
            description: t.description.as_deref(),
        })
        .collect();

    match format {
        OutputFormat::Json => emit_json(&summaries),
        OutputFormat::Text => {
            let name_w = col_width("NAME", summaries.iter().map(|s| s.name));
            let kind_w = col_width("KIND", summaries.iter().map(|s| s.kind));
            println!("{:<name_w$}  {:<kind_w$}  {:>6}  IDENTIFIER", "NAME", "KIND", "FIELDS");
            for s in &summaries {
                println!(
                    "{:<name_w$}  {:<kind_w$}  {:>6}  {}",
                    s.name,
                    s.kind,
                    s.fields,
                    dash(s.identifier)
                );
            }
            Ok(())
        }
    }
}

pub fn fields(table: &Table, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => emit_json(&table.fields),
        OutputFormat::Text => {
            let name_w = col_width("NAME", table.fields.iter().map(|f| f.name.as_str()));
            println!(
                "{:<name_w$}  {:<9}  {:>6}  {:<8}  DOMAIN",
                "NAME", "TYPE", "LENGTH", "NULLABLE"
            );
            for f in &table.fields {
                let length = f.length.map(|l| l.to_string());
                println!(
                    "{:<name_w$}  {:<9}  {:>6}  {:<8}  {}",
                    f.name,
                    f.field_type.as_str(),
                    dash(length.as_deref()),
                    yes_no(f.nullable),
                    dash(f.domain.as_deref())
                );
            }
            Ok(())
        }
    }
}

pub fn domains(domains: &[Domain], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => emit_json(&domains),
        OutputFormat::Text => {
            let name_w = col_width("NAME", domains.iter().map(|d| d.name.as_str()));
            println!("{:<name_w$}  {:<6}  SUMMARY", "NAME", "KIND");
            for d in domains {
                println!(
                    "{:<name_w$}  {:<6}  {}",
                    d.name,
                    d.kind.as_str(),
                    kind_summary(&d.kind)
                );
            }
            Ok(())
        }
    }
}

pub fn domain(domain: &Domain, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => emit_json(domain),
        OutputFormat::Text => {
            println!("name:  {}", domain.name);
            println!("kind:  {}", domain.kind.as_str());
            match &domain.kind {
                DomainKind::Coded { values } => {
                    println!();
                    coded_rows(values);
                }
                DomainKind::Range { .. } => println!("range: {}", kind_summary(&domain.kind)),
                DomainKind::Glob { pattern } => println!("pattern: {}", pattern),
            }
            Ok(())
        }
    }
}

pub fn detail(detail: &FieldDetail<'_>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => emit_json(detail),
        OutputFormat::Text => {
            let f = detail.field;
            let length = f.length.map(|l| l.to_string());
            println!("table:     {}", detail.table);
            println!("field:     {}", f.name);
            println!("alias:     {}", dash(f.alias.as_deref()));
            println!("type:      {}", f.field_type.as_str());
            println!("length:    {}", dash(length.as_deref()));
            println!("nullable:  {}", yes_no(f.nullable));
            println!("editable:  {}", yes_no(f.editable));
            println!("default:   {}", dash(f.default.as_deref()));
            match detail.domain {
                Some(d) => println!("domain:    {} ({})", d.name, d.kind.as_str()),
                None => println!("domain:    -"),
            }
            // Only coded-value domains get a code table; a domain-less field
            // ends at the property listing.
            if let Some(values) = detail.coded_values() {
                println!();
                coded_rows(values);
            }
            Ok(())
        }
    }
}

pub fn validation_report(reports: &[RecordReport], total: usize, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => emit_json(&serde_json::json!({
            "records": total,
            "failed": reports.len(),
            "failures": reports,
        })),
        OutputFormat::Text => {
            for report in reports {
                println!("record {}:", report.index);
                for issue in &report.issues {
                    println!("  - {}", issue);
                }
            }
            if reports.is_empty() {
                println!("all {} records conform", total);
            } else {
                println!("{} of {} records failed validation", reports.len(), total);
            }
            Ok(())
        }
    }
}

fn coded_rows(values: &[gpkgctl_core::CodedValue]) {
    let code_w = col_width("CODE", values.iter().map(|v| v.code.as_str()));
    println!("{:<code_w$}  LABEL", "CODE");
    for v in values {
        println!("{:<code_w$}  {}", v.code, v.label);
    }
}

fn kind_summary(kind: &DomainKind) -> String {
    match kind {
        DomainKind::Coded { values } => format!("{} codes", values.len()),
        DomainKind::Range {
            min,
            min_inclusive,
            max,
            max_inclusive,
        } => {
            let open = if *min_inclusive { '[' } else { '(' };
            let close = if *max_inclusive { ']' } else { ')' };
            let lo = min.map_or("-inf".to_string(), |v| v.to_string());
            let hi = max.map_or("+inf".to_string(), |v| v.to_string());
            format!("{}{}, {}{}", open, lo, hi, close)
        }
        DomainKind::Glob { pattern } => format!("matches '{}'", pattern),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn col_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(str::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}
