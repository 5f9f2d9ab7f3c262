//! Subcommand implementations.

use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use gridsmith_core::{
    Editor, EditorConfig, FileStore, Project, ProjectSerializer, StyleCompiler,
};
use gridsmith_export::{MarkupConfig, MarkupExporter, StylesheetExporter};

use crate::{CliArgs, CliConfig, Command};

/// Run a parsed command line, writing command output to `out`.
///
/// # Errors
///
/// Returns an error if a project cannot be read or validated, or output
/// cannot be written.
pub fn run(args: CliArgs, out: &mut dyn Write) -> Result<()> {
    let config = CliConfig::from(&args);
    match args.command {
        Command::Validate { file } => validate(&config, file.as_deref(), out),
        Command::Markup {
            file,
            out: path,
            fragment,
            title,
            stylesheet,
        } => {
            let project = load_project(&config, file.as_deref())?;
            let defaults = MarkupConfig::default();
            let exporter = MarkupExporter::new(MarkupConfig {
                title: title.unwrap_or(defaults.title),
                document_shell: !fragment,
                stylesheet_href: stylesheet,
                utility_script: defaults.utility_script,
            });
            if let Some(path) = path {
                return exporter
                    .write_to(&project, &path)
                    .with_context(|| format!("Failed to export markup to {}", path.display()));
            }
            let html = exporter.export(&project)?;
            out.write_all(html.as_bytes())?;
            Ok(())
        }
        Command::Stylesheet { file, out: path } => {
            let project = load_project(&config, file.as_deref())?;
            let exporter = StylesheetExporter::new();
            if let Some(path) = path {
                return exporter
                    .write_to(&project.elements, &path)
                    .with_context(|| format!("Failed to write stylesheet to {}", path.display()));
            }
            out.write_all(exporter.export(&project.elements).as_bytes())?;
            Ok(())
        }
        Command::Classes { file } => {
            let project = load_project(&config, file.as_deref())?;
            let compiler = StyleCompiler::new();
            for element in &project.elements {
                let style = compiler.compile(element);
                writeln!(out, "{}\t{}\t{}", element.id, element.kind, style.class_attr())?;
            }
            Ok(())
        }
        Command::Import { file } => import(&config, &file, out),
    }
}

fn validate(config: &CliConfig, file: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    let project = load_project(config, file)?;
    let source = file.map_or_else(
        || format!("saved project `{}`", config.storage_key),
        |path| path.display().to_string(),
    );
    writeln!(
        out,
        "{source}: valid, {} elements, {} columns, version {}",
        project.elements.len(),
        project.columns,
        project.version
    )?;
    Ok(())
}

fn import(config: &CliConfig, file: &Path, out: &mut dyn Write) -> Result<()> {
    let data_dir = data_dir(config)?;
    let storage = FileStore::new(data_dir)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    let mut editor = Editor::new(
        EditorConfig {
            storage_key: config.storage_key.clone(),
            ..EditorConfig::default()
        },
        Box::new(storage),
    );

    editor
        .open_result(std::fs::read_to_string(file))
        .with_context(|| format!("Failed to import {}", file.display()))?;
    if let Some(e) = editor.take_storage_error() {
        return Err(e).context("Project loaded but could not be saved");
    }
    writeln!(
        out,
        "Imported {} elements into {}",
        editor.elements().len(),
        data_dir.display()
    )?;
    Ok(())
}

fn load_project(config: &CliConfig, file: Option<&Path>) -> Result<Project> {
    if let Some(path) = file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let project = ProjectSerializer::parse(&text)
            .with_context(|| format!("Invalid project file {}", path.display()))?;
        tracing::debug!("Loaded {} from {}", project.elements.len(), path.display());
        return Ok(project);
    }

    let data_dir = data_dir(config)?;
    let storage = FileStore::new(data_dir)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    let serializer = ProjectSerializer::with_key(Box::new(storage), config.storage_key.clone());
    serializer
        .restore()
        .ok_or_else(|| anyhow!("No saved project in {}", data_dir.display()))
}

fn data_dir(config: &CliConfig) -> Result<&Path> {
    config
        .data_dir
        .as_deref()
        .context("No project file given and GRIDSMITH_DATA_DIR is not set")
}
