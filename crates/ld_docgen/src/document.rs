//! Template staging, input-data creation and LuaLaTeX invocation.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use ld_luatable::{DecimalConverter, MarshalOptions};
use ld_reflect::Message;

use crate::error::DocgenError;
use crate::event::GenerateRequest;

const TYPESET_COMMAND: &str = "lualatex";

// -----------------------------------------------------------------------------
// DocumentGenerator

/// Runs the document workflow for one request at a time.
///
/// For a request the generator stages `<template>.tex` from the template
/// directory into a per-request working directory, writes the marshalled
/// input data next to it as `<template>.lua`, invokes LuaLaTeX with the
/// working directory as its current directory, and returns the path of the
/// produced PDF. When a debug directory is configured, the PDF (or, on
/// typesetting failure, the LuaLaTeX log) is copied there as well.
///
/// A marshal error aborts the workflow before anything is typeset.
pub struct DocumentGenerator {
    template_dir: PathBuf,
    work_dir: PathBuf,
    debug_dir: Option<PathBuf>,
}

/// The staged result of a successful generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    /// The produced PDF.
    pub pdf: PathBuf,
    /// The per-request working directory (kept for inspection).
    pub work_dir: PathBuf,
}

impl DocumentGenerator {
    /// Creates a generator staging templates from `template_dir` and working
    /// under `work_dir`.
    pub fn new(template_dir: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            work_dir: work_dir.into(),
            debug_dir: None,
        }
    }

    /// Additionally copies produced PDFs and failure logs to `debug_dir`.
    pub fn with_debug_dir(mut self, debug_dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = Some(debug_dir.into());
        self
    }

    /// Generates the first document of the request.
    pub fn generate(&self, request: &GenerateRequest) -> Result<GeneratedDocument, DocgenError> {
        let document = request.documents.first().ok_or(DocgenError::NoDocument)?;
        let template = document.template();

        let run_dir = self.work_dir.join(&request.request_id);
        let output_dir = run_dir.join("generated");
        create_dir(&output_dir)?;

        let template_file = self.stage_template(template, &run_dir)?;
        self.write_input_data(template, &run_dir, document.message())?;
        self.typeset(&run_dir, &output_dir, &template_file)?;

        let pdf = output_dir.join(format!("{template}.pdf"));
        if let Some(debug_dir) = &self.debug_dir {
            stage_copy(&pdf, &debug_dir.join(format!("{template}.pdf")))?;
        }

        tracing::info!(request_id = %request.request_id, pdf = %pdf.display(), "document generated");
        Ok(GeneratedDocument {
            pdf,
            work_dir: run_dir,
        })
    }

    fn stage_template(&self, template: &str, run_dir: &Path) -> Result<String, DocgenError> {
        let file = format!("{template}.tex");
        let source = self.template_dir.join(&file);
        fs::copy(&source, run_dir.join(&file)).map_err(|source_err| DocgenError::Template {
            path: source,
            source: source_err,
        })?;
        Ok(file)
    }

    /// Writes `<template>.lua`: the marshalled message bound to a local,
    /// returned under the template's key.
    fn write_input_data(
        &self,
        template: &str,
        run_dir: &Path,
        message: &dyn Message,
    ) -> Result<(), DocgenError> {
        let options = MarshalOptions {
            multiline: true,
            user_converters: vec![Arc::new(DecimalConverter)],
            ..MarshalOptions::default()
        };
        let table = options.marshal(message)?;
        let type_name = message.descriptor().name();

        let mut contents = Vec::with_capacity(table.len() + 64);
        contents.extend_from_slice(b"local ");
        contents.extend_from_slice(&table);
        contents.extend_from_slice(format!("\nreturn {{ {template} = {type_name} }}\n").as_bytes());

        let path = run_dir.join(format!("{template}.lua"));
        fs::write(&path, contents).map_err(|source| DocgenError::InputData { path, source })
    }

    fn typeset(
        &self,
        run_dir: &Path,
        output_dir: &Path,
        template_file: &str,
    ) -> Result<(), DocgenError> {
        let status = Command::new(TYPESET_COMMAND)
            .arg(format!("-output-directory={}", output_dir.display()))
            .arg(template_file)
            .current_dir(run_dir)
            .status()
            .map_err(|source| DocgenError::Spawn {
                command: String::from(TYPESET_COMMAND),
                source,
            })?;

        if !status.success() {
            self.stage_failure_log(output_dir, template_file);
            return Err(DocgenError::Typeset {
                command: String::from(TYPESET_COMMAND),
                status,
            });
        }
        Ok(())
    }

    /// Copies the LuaLaTeX log next to the debug directory; best effort, the
    /// typesetting error stays the primary signal.
    fn stage_failure_log(&self, output_dir: &Path, template_file: &str) {
        let Some(debug_dir) = &self.debug_dir else {
            return;
        };
        let log_file = Path::new(template_file).with_extension("log");
        let source = output_dir.join(&log_file);
        if let Err(error) = stage_copy(&source, &debug_dir.join(&log_file)) {
            tracing::warn!(%error, "could not stage typesetting log");
        }
    }
}

fn create_dir(path: &Path) -> Result<(), DocgenError> {
    fs::create_dir_all(path).map_err(|source| DocgenError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn stage_copy(source: &Path, destination: &Path) -> Result<(), DocgenError> {
    if let Some(parent) = destination.parent() {
        create_dir(parent)?;
    }
    fs::copy(source, destination).map_err(|source_err| DocgenError::Output {
        path: source.to_path_buf(),
        source: source_err,
    })?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::fs;

    use super::DocumentGenerator;
    use crate::event::{GenerateRequest, RequestedDocument};
    use crate::schema;

    use ld_reflect::ops::DynamicMessage;

    fn sample_request() -> GenerateRequest {
        let mut recipient = DynamicMessage::new(schema::recipient());
        recipient.set(1, "Max Mustermann");

        let mut invoice = DynamicMessage::new(schema::invoice_v1());
        invoice.set(2, "EUR").set(3, recipient);

        GenerateRequest {
            request_id: String::from("req-7"),
            documents: vec![RequestedDocument::Invoice(invoice)],
        }
    }

    #[test]
    fn stages_template_and_writes_input_data() {
        let root = tempfile::tempdir().unwrap();
        let template_dir = root.path().join("templates");
        fs::create_dir_all(&template_dir).unwrap();
        fs::write(template_dir.join("invoice.tex"), "\\documentclass{article}").unwrap();

        let generator = DocumentGenerator::new(&template_dir, root.path());
        let request = sample_request();

        let run_dir = root.path().join("req-7");
        fs::create_dir_all(run_dir.join("generated")).unwrap();
        let template_file = generator.stage_template("invoice", &run_dir).unwrap();
        assert_eq!(template_file, "invoice.tex");
        assert!(run_dir.join("invoice.tex").exists());

        let RequestedDocument::Invoice(message) = &request.documents[0];
        generator
            .write_input_data("invoice", &run_dir, message)
            .unwrap();

        let written = fs::read_to_string(run_dir.join("invoice.lua")).unwrap();
        assert!(written.starts_with("local InvoiceV1 = {\n"));
        assert!(written.contains("currencyCode = \"EUR\""));
        assert!(written.ends_with("\nreturn { invoice = InvoiceV1 }\n"));
    }

    #[test]
    fn missing_template_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let generator = DocumentGenerator::new(root.path().join("nowhere"), root.path());

        let run_dir = root.path().join("req-7");
        fs::create_dir_all(&run_dir).unwrap();
        assert!(generator.stage_template("invoice", &run_dir).is_err());
    }
}
