//! Subcommand implementations for the mailmerge CLI.
//!
//! Every command returns the process exit code on success.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use mailmerge_core::compose::{compose_merge, MergeJob};
use mailmerge_core::config::{load_config, ConfigSource, MailmergeConfig};
use mailmerge_core::dataset::{csv, DataSet};
use mailmerge_core::recipients;
use mailmerge_core::samples;
use mailmerge_core::template::{self, has_unresolved, Field};

/// Read a template from a file, or stdin when the path is `-`.
fn read_template(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading template from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading template {path}"))
}

fn read_dataset(path: &Path) -> Result<DataSet> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading data {}", path.display()))?;
    let dataset = csv::parse(&text).with_context(|| format!("parsing {}", path.display()))?;
    debug!(
        columns = dataset.fields.len(),
        rows = dataset.rows.len(),
        "loaded {}",
        path.display()
    );
    Ok(dataset)
}

fn active_config(path: Option<&Path>) -> Result<MailmergeConfig> {
    let (config, source) = load_config(path)?;
    match source {
        ConfigSource::File(p) => debug!("using config {}", p.display()),
        ConfigSource::Defaults => debug!("using built-in config defaults"),
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Scan — list placeholders
// ---------------------------------------------------------------------------

pub fn cmd_scan(template_path: &str, json: bool) -> Result<i32> {
    let template = read_template(template_path)?;
    let tokens = template::scan(&template);

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else if tokens.is_empty() {
        println!("No placeholders found.");
    } else {
        for t in &tokens {
            println!("{:<24} {}..{}", t.name, t.start, t.end);
        }
    }
    Ok(0)
}

// ---------------------------------------------------------------------------
// Check — unknown placeholders
// ---------------------------------------------------------------------------

pub fn cmd_check(template_path: &str, data: &Path) -> Result<i32> {
    let template = read_template(template_path)?;
    let dataset = read_dataset(data)?;
    let unknown = template::unknown_tokens(&template, &dataset.fields);

    if unknown.is_empty() {
        println!("All placeholders match a column.");
        return Ok(0);
    }
    for t in &unknown {
        println!("unknown field '{}' at {}..{}", t.name, t.start, t.end);
    }
    let columns: Vec<&str> = dataset.fields.iter().map(|f| f.name.as_str()).collect();
    println!("available: {}", columns.join(", "));
    Ok(1)
}

// ---------------------------------------------------------------------------
// Preview — marked template
// ---------------------------------------------------------------------------

pub fn cmd_preview(
    config_path: Option<&Path>,
    template_path: &str,
    data: Option<&Path>,
    field_names: &[String],
    json: bool,
) -> Result<i32> {
    let template = read_template(template_path)?;
    let fields: Vec<Field> = match data {
        Some(path) => read_dataset(path)?.fields,
        None => field_names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(Field::named)
            .collect(),
    };
    let segments = template::render(&template, &fields);

    if json {
        println!("{}", serde_json::to_string_pretty(&segments)?);
    } else {
        let config = active_config(config_path)?;
        print!("{}", template::render_marked(&segments, &config.preview));
    }
    Ok(0)
}

// ---------------------------------------------------------------------------
// Merge — one document per row
// ---------------------------------------------------------------------------

pub fn cmd_merge(
    config_path: Option<&Path>,
    template_path: &str,
    data: &Path,
    subject: Option<&str>,
    to_field: Option<&str>,
    json: bool,
) -> Result<i32> {
    let config = active_config(config_path)?;
    let body = read_template(template_path)?;
    let dataset = read_dataset(data)?;

    let subject = subject.map(str::to_string).or(config.merge.subject.clone());
    let Some(subject) = subject else {
        let docs = dataset.merge(&body);
        let incomplete = docs.iter().filter(|d| has_unresolved(d)).count();
        if incomplete > 0 {
            warn!("{incomplete} of {} documents still contain placeholders", docs.len());
        }
        if json {
            println!("{}", serde_json::to_string_pretty(&docs)?);
        } else {
            print!("{}", docs.join("\n---\n"));
        }
        return Ok(0);
    };

    let job = MergeJob {
        subject,
        body,
        recipient_field: to_field
            .map(str::to_string)
            .unwrap_or(config.merge.recipient_field),
    };
    let messages = compose_merge(&job, &dataset)?;
    for m in messages.iter().filter(|m| !m.unresolved.is_empty()) {
        warn!("{}: unresolved {}", m.to.join(", "), m.unresolved.join(", "));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
    } else {
        let blocks: Vec<String> = messages
            .iter()
            .map(|m| format!("To: {}\nSubject: {}\n\n{}", m.to.join(", "), m.subject, m.body))
            .collect();
        print!("{}", blocks.join("\n---\n"));
    }
    Ok(0)
}

// ---------------------------------------------------------------------------
// Insert — placeholder at offset
// ---------------------------------------------------------------------------

pub fn cmd_insert(template_path: &str, at: usize, field: &str) -> Result<i32> {
    let template = read_template(template_path)?;
    let (out, cursor) = template::insert_field(&template, at, field);
    print!("{out}");
    eprintln!("cursor: {cursor}");
    Ok(0)
}

// ---------------------------------------------------------------------------
// Recipients — strict import validation
// ---------------------------------------------------------------------------

pub fn cmd_recipients_validate(config_path: Option<&Path>, path: &Path) -> Result<i32> {
    let config = active_config(config_path)?;
    let dataset = read_dataset(path)?;
    match recipients::validate(&dataset, &config.schema) {
        Ok(()) => {
            println!(
                "OK: {} recipients, {} columns",
                dataset.non_blank_rows().len(),
                dataset.fields.len()
            );
            Ok(0)
        }
        Err(e) => {
            println!("invalid: {e}");
            Ok(1)
        }
    }
}

pub fn cmd_recipients_template(config_path: Option<&Path>) -> Result<i32> {
    let config = active_config(config_path)?;
    print!("{}", recipients::template_csv(&config.schema));
    Ok(0)
}

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

pub fn cmd_samples(name: Option<&str>) -> Result<i32> {
    let Some(name) = name else {
        for n in samples::names() {
            println!("{n}");
        }
        return Ok(0);
    };
    let body = samples::get(name).with_context(|| {
        format!("no sample named '{name}'. Run `mailmerge samples` to list them")
    })?;
    print!("{body}");
    Ok(0)
}

// ---------------------------------------------------------------------------
// Config — print active settings
// ---------------------------------------------------------------------------

pub fn cmd_config(config_path: Option<&Path>) -> Result<i32> {
    let (config, source) = load_config(config_path)?;
    match source {
        ConfigSource::File(p) => println!("# Loaded from {}", p.display()),
        ConfigSource::Defaults => println!("# Built-in defaults"),
    }
    println!("# Save to .mailmerge/config.toml to customize");
    println!();
    let toml_str = config
        .to_toml()
        .context("failed to serialize config to TOML")?;
    print!("{toml_str}");
    Ok(0)
}
