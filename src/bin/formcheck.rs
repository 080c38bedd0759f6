//! Check a form description file against a rules file.
//!
//! Builds an in-memory document from a TOML form description, binds the
//! configured rule sets, runs a full check, and reports each invalid field.
//! Exits non-zero when any field is invalid.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use form_validator::dom::{Document, NodeId, Selector};
use form_validator::rules::RulesFile;
use form_validator::Validator;

#[derive(Debug, Parser)]
#[command(name = "formcheck")]
#[command(about = "Validate a form description against declarative rule sets")]
#[command(version)]
struct Args {
    /// Form description TOML file
    #[arg(long)]
    form: PathBuf,

    /// Rules TOML file; defaults to default.rules.toml in the rules directory
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Directory searched for the default rules file
    #[arg(long, help = "Directory containing rules TOML files")]
    rules_dir: Option<PathBuf>,

    /// Emit diagnostics as JSON
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    log_level: String,
}

/// Root form description structure (matches TOML).
#[derive(Debug, Deserialize)]
struct FormFile {
    form: Option<FormMeta>,
    #[serde(default)]
    field: Vec<FieldDef>,
}

#[derive(Debug, Deserialize)]
struct FormMeta {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FieldDef {
    name: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    required: bool,
    /// Wrap the field in a `.form-group` container (default true).
    #[serde(default = "default_true")]
    group: bool,
    /// Treat the field as a multi-select widget.
    #[serde(default)]
    multiple: bool,
    #[serde(default)]
    selected: Vec<String>,
    #[serde(default)]
    classes: Vec<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
struct FieldDiagnostic {
    field: String,
    message: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .init();

    let form_text = std::fs::read_to_string(&args.form)
        .with_context(|| format!("reading form file {}", args.form.display()))?;
    let form: FormFile = toml::from_str(&form_text)
        .with_context(|| format!("parsing form file {}", args.form.display()))?;

    let mut validator = Validator::new();
    let patches = match locate_rules(&args) {
        Some(path) => {
            let rules_text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading rules file {}", path.display()))?;
            let rules: RulesFile = toml::from_str(&rules_text)
                .with_context(|| format!("parsing rules file {}", path.display()))?;
            rules.apply(validator.registry_mut())?
        }
        None => {
            log::info!("no rules file found, using the built-in default rule set");
            Vec::new()
        }
    };

    let mut doc = Document::new();
    let form_node = build_form(&mut doc, &form);

    validator.bind(&mut doc, "form", &patches)?;
    let error_count = validator.check(&mut doc, "form", false)?;

    let fields = Selector::parse("input, select")?;
    let diagnostics = collect_diagnostics(&doc, form_node, &fields);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else {
        for d in &diagnostics {
            println!("{}: {}", d.field, d.message);
        }
        println!(
            "{} field(s) checked, {} error(s)",
            form.field.len(),
            error_count
        );
    }

    if error_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Resolve the rules file path: explicit flag, then the default name in the
/// rules directory, then the user config directory.
fn locate_rules(args: &Args) -> Option<PathBuf> {
    if let Some(path) = &args.rules {
        return Some(path.clone());
    }
    let mut candidates = Vec::new();
    if let Some(dir) = &args.rules_dir {
        candidates.push(dir.join("default.rules.toml"));
    }
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("formcheck").join("default.rules.toml"));
    }
    candidates.into_iter().find(|p| p.is_file())
}

/// Materialize the form description as an element tree.
fn build_form(doc: &mut Document, form: &FormFile) -> NodeId {
    let form_node = doc.create_child(doc.root(), "form");
    if let Some(id) = form.form.as_ref().and_then(|m| m.id.as_deref()) {
        doc.set_id(form_node, id);
    }

    for field in &form.field {
        let parent = if field.group {
            let group = doc.create_child(form_node, "div");
            doc.add_class(group, "form-group");
            group
        } else {
            form_node
        };

        let tag = if field.multiple { "select" } else { "input" };
        let element = doc.create_child(parent, tag);
        doc.set_attr(element, "name", &field.name);
        if field.required {
            doc.set_attr(element, "required", "");
        }
        doc.set_value(element, &field.value);
        if field.multiple {
            doc.set_selections(element, field.selected.clone());
        }
        for class in &field.classes {
            doc.add_class(element, class);
        }
    }

    form_node
}

/// Pull rendered error state back out of the document, one entry per field
/// element with a visible tooltip.
fn collect_diagnostics(
    doc: &Document,
    form_node: NodeId,
    fields: &Selector,
) -> Vec<FieldDiagnostic> {
    doc.find(form_node, fields)
        .into_iter()
        .filter_map(|element| {
            let tooltip = doc.tooltip(element)?;
            if !tooltip.visible {
                return None;
            }
            Some(FieldDiagnostic {
                field: doc.attr(element, "name").unwrap_or("<unnamed>").to_string(),
                message: tooltip.title.clone(),
            })
        })
        .collect()
}
