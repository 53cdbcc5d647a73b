//! Synchronous invocation of the chosen engine as a child process.
//!
//! One invocation writes the stylesheet and the input document to two fresh
//! temp files, spawns the engine with a processor-specific argument vector,
//! and classifies the captured output by exit status. There is no retry, no
//! timeout, and no state shared between invocations beyond the memoized
//! engine choice.

use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, OnceLock};

use log::{debug, error, info};
use tempfile::NamedTempFile;

use crate::config::{expand_search_path, InvokerConfig, DEFAULT_DIRECTIVE_MARKER};
use crate::document::strip_directive_lines;
use crate::engine::{probe, Engine, ResolvedEngine};
use crate::error::{Error, Result};
use crate::parameters::{build_parameter_args, partition_bindings, ParameterBinding};

/// One transform evaluation: a stylesheet, an input document, and the
/// parameter bindings to pass through. Constructed fresh per evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub stylesheet: String,
    pub document: String,
    pub parameters: Vec<ParameterBinding>,
}

impl InvocationRequest {
    pub fn new(
        stylesheet: impl Into<String>,
        document: impl Into<String>,
        parameters: Vec<ParameterBinding>,
    ) -> Self {
        Self {
            stylesheet: stylesheet.into(),
            document: document.into(),
            parameters,
        }
    }

    /// Builds a request from the raw variable sequence supplied by the
    /// host for one evaluation.
    ///
    /// The reserved variable `input` carries the input document text; every
    /// other variable becomes a stylesheet parameter. A missing `input`
    /// leaves the document empty.
    pub fn from_variables(
        stylesheet: impl Into<String>,
        variables: Vec<ParameterBinding>,
    ) -> Self {
        let (document, parameters) = partition_bindings(variables);

        Self {
            stylesheet: stylesheet.into(),
            document: document.unwrap_or_default(),
            parameters,
        }
    }
}

/// Exit status obtained from the engine process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineExit {
    Code(i32),
    /// The process died without reporting a status, or could not be
    /// launched at all.
    Unknown,
}

impl Display for EngineExit {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineExit::Code(code) => write!(formatter, "{code}"),
            EngineExit::Unknown => formatter.write_str("unknown"),
        }
    }
}

/// Outcome of one transform invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Success {
        output: String,
    },
    Failure {
        exit: EngineExit,
        diagnostics: String,
    },
}

impl TransformOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransformOutcome::Success { .. })
    }

    /// The transform output, if the invocation succeeded.
    pub fn output(&self) -> Option<&str> {
        match self {
            TransformOutcome::Success { output } => Some(output),
            TransformOutcome::Failure { .. } => None,
        }
    }
}

/// Receives failed-evaluation reports.
///
/// The host owns how a failure is surfaced (for instance by writing the
/// diagnostic text into a result pane and re-enabling it for editing); the
/// invoker only guarantees the sink is called once per failed evaluation.
pub trait DiagnosticSink {
    fn evaluation_failed(&self, exit: EngineExit, diagnostics: &str);
}

/// Default sink: reports through the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn evaluation_failed(&self, exit: EngineExit, diagnostics: &str) {
        error!("Transform evaluation failed (exit status {exit}): {diagnostics}");
    }
}

/// Applies a stylesheet to a document by dispatching to an external XSLT
/// processor.
///
/// The engine choice is resolved lazily on first use and memoized for the
/// lifetime of the invoker; it is read-only afterwards, so one invoker may
/// be shared across threads.
pub struct Invoker {
    engine: OnceLock<Option<ResolvedEngine>>,
    search_path: Option<String>,
    directive_marker: String,
    sink: Arc<dyn DiagnosticSink + Send + Sync>,
}

impl Default for Invoker {
    fn default() -> Self {
        Self::new()
    }
}

impl Invoker {
    pub fn new() -> Self {
        Self {
            engine: OnceLock::new(),
            search_path: None,
            directive_marker: DEFAULT_DIRECTIVE_MARKER.to_string(),
            sink: Arc::new(LogSink),
        }
    }

    /// Builds an invoker from a host-supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEngineName`] if the configuration names an
    /// unsupported engine.
    pub fn from_config(config: &InvokerConfig) -> Result<Self> {
        let mut invoker = Self::new();

        if let Some(search_path) = expand_search_path(&config.search_path) {
            invoker = invoker.with_search_path(search_path);
        }

        if let Some(marker) = &config.directive_marker {
            invoker = invoker.with_directive_marker(marker.clone());
        }

        if let Some(name) = &config.engine {
            invoker = invoker.with_engine(Engine::from_name(name)?);
        }

        Ok(invoker)
    }

    /// Pins the engine instead of probing for one. The executable is
    /// resolved by the operating system at spawn time.
    pub fn with_engine(self, engine: Engine) -> Self {
        let resolved = ResolvedEngine {
            kind: engine,
            program: PathBuf::from(engine.command_name()),
        };
        let _ = self.engine.set(Some(resolved));

        self
    }

    /// Overrides the executable search path used for probing. Defaults to
    /// the `PATH` environment variable.
    pub fn with_search_path(mut self, search_path: impl Into<String>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    /// Overrides the host-directive marker stripped from document text.
    pub fn with_directive_marker(mut self, marker: impl Into<String>) -> Self {
        self.directive_marker = marker.into();
        self
    }

    /// Replaces the diagnostic sink notified on failed evaluations.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink + Send + Sync>) -> Self {
        self.sink = sink;
        self
    }

    /// The engine this invoker dispatches to, probing for one on first
    /// call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineNotFound`] when neither supported engine is
    /// installed.
    pub fn engine(&self) -> Result<Engine> {
        Ok(self.resolved_engine()?.kind)
    }

    fn resolved_engine(&self) -> Result<&ResolvedEngine> {
        let resolved = self.engine.get_or_init(|| {
            let path_var = match &self.search_path {
                Some(search_path) => search_path.clone(),
                None => std::env::var("PATH").unwrap_or_default(),
            };

            probe(&path_var)
        });

        resolved.as_ref().ok_or(Error::EngineNotFound)
    }

    /// Runs one transform invocation to completion.
    ///
    /// Blocks until the engine process exits. Returns `Ok` with a
    /// [`TransformOutcome`] whenever an engine was launched (or launching
    /// it failed): a non-zero exit or a spawn failure is a
    /// `Failure` outcome, not an `Err`, and is reported to the diagnostic
    /// sink before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter name is invalid, no engine is
    /// installed, or a temp file cannot be written. The engine is never
    /// spawned in those cases, and an engine probe failure is reported to
    /// the sink before any temp file exists.
    pub fn invoke(&self, request: &InvocationRequest) -> Result<TransformOutcome> {
        let parameter_args = build_parameter_args(&request.parameters)?;

        let engine = match self.resolved_engine() {
            Ok(engine) => engine,
            Err(e) => {
                self.sink
                    .evaluation_failed(EngineExit::Unknown, &e.to_string());
                return Err(e);
            }
        };

        let document = strip_directive_lines(&request.document, &self.directive_marker);

        let stylesheet_file = write_scratch("stylesheet", ".xsl", &request.stylesheet)?;
        let document_file = write_scratch("input document", ".xml", &document)?;

        let args = engine.kind.transform_args(
            &parameter_args,
            stylesheet_file.path(),
            document_file.path(),
        );

        info!(
            "Invoking {} with {} stylesheet parameter(s)",
            engine.kind,
            parameter_args.len()
        );
        debug!("Engine argument vector: {args:?}");

        let outcome = match Command::new(&engine.program).args(&args).output() {
            Ok(output) => {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));

                match output.status.code() {
                    Some(0) => TransformOutcome::Success { output: combined },
                    Some(code) => TransformOutcome::Failure {
                        exit: EngineExit::Code(code),
                        diagnostics: combined,
                    },
                    None => TransformOutcome::Failure {
                        exit: EngineExit::Unknown,
                        diagnostics: combined,
                    },
                }
            }
            Err(e) => TransformOutcome::Failure {
                exit: EngineExit::Unknown,
                diagnostics: e.to_string(),
            },
        };

        if let TransformOutcome::Failure { exit, diagnostics } = &outcome {
            self.sink.evaluation_failed(*exit, diagnostics);
        }

        Ok(outcome)
    }
}

/// Writes text to a fresh uniquely-named temp file that lives until the
/// handle is dropped at the end of the invocation.
fn write_scratch(file_description: &str, suffix: &str, contents: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("xslt-dispatch-")
        .suffix(suffix)
        .tempfile()
        .map_err(|e| {
            Error::io_error(
                file_description.to_string(),
                std::env::temp_dir().to_string_lossy().into_owned(),
                e,
            )
        })?;

    file.write_all(contents.as_bytes()).map_err(|e| {
        Error::io_error(
            file_description.to_string(),
            file.path().to_string_lossy().into_owned(),
            e,
        )
    })?;

    Ok(file)
}
