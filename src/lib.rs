//! XSLT Dispatch Library
//!
//! This crate lets a literate-programming host embed an XSLT stylesheet
//! block, supply an XML input document and parameter bindings, and have the
//! stylesheet applied by an externally installed XSLT processor, capturing
//! the output for substitution back into the document. It never parses or
//! validates XML or XSLT itself; it dispatches to whichever engine is
//! installed.
//!
//! # Key Features
//!
//! - **Engine Discovery**: Probe the search path for `saxon` or `xsltproc`,
//!   in that preference order, memoizing the choice per invoker
//! - **Parameter Passing**: Forward ordered `name=value` bindings, with the
//!   reserved `input` binding carrying the document text itself
//! - **Per-Engine Argument Conventions**: Build the positional argument
//!   vector each processor expects (the two disagree on stylesheet/document
//!   order)
//! - **Failure Capture**: Classify exit status and hand diagnostics to a
//!   pluggable sink instead of failing the host process
//! - **Configuration**: Optional YAML config pinning the engine, the
//!   host-directive marker, or the search path
//!
//! # Examples
//!
//! Evaluating a stylesheet block against the variables supplied by the
//! host for one evaluation:
//!
//! ```no_run
//! use xslt_dispatch::invoker::{InvocationRequest, Invoker, TransformOutcome};
//! use xslt_dispatch::parameters::ParameterBinding;
//!
//! let stylesheet = r#"<xsl:stylesheet version="1.0"
//!     xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
//!   <xsl:template match="/"><xsl:copy-of select="."/></xsl:template>
//! </xsl:stylesheet>"#;
//!
//! let invoker = Invoker::new();
//! let request = InvocationRequest::from_variables(
//!     stylesheet,
//!     vec![
//!         ParameterBinding::new("greeting", "hi"),
//!         ParameterBinding::new("input", "<root><a>1</a></root>"),
//!     ],
//! );
//!
//! match invoker.invoke(&request)? {
//!     TransformOutcome::Success { output } => println!("{output}"),
//!     TransformOutcome::Failure { exit, .. } => eprintln!("engine exited with {exit}"),
//! }
//! # Ok::<(), xslt_dispatch::error::Error>(())
//! ```

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod invoker;
pub mod parameters;
