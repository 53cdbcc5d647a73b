//! Engine selection for external XSLT processors.
//!
//! Two processors are supported, probed for on the search path in a fixed
//! preference order. Their command lines disagree on where the stylesheet
//! and the input document go, so the argument vector is assembled here and
//! nowhere else.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A supported external XSLT processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Saxon,
    Xsltproc,
}

impl Engine {
    /// Probe preference order: first engine found on the search path wins.
    pub const PROBE_ORDER: [Engine; 2] = [Engine::Saxon, Engine::Xsltproc];

    pub fn command_name(self) -> &'static str {
        match self {
            Engine::Saxon => "saxon",
            Engine::Xsltproc => "xsltproc",
        }
    }

    /// Maps a configured engine name to the closed enum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEngineName`] for anything other than the two
    /// supported command names.
    pub fn from_name(name: &str) -> Result<Engine> {
        match name {
            "saxon" => Ok(Engine::Saxon),
            "xsltproc" => Ok(Engine::Xsltproc),
            other => Err(Error::UnknownEngineName(other.to_string())),
        }
    }

    /// Assembles the full argument vector for one transform invocation.
    ///
    /// The positional conventions are incompatible between the engines:
    /// saxon wants the input document before the stylesheet, xsltproc wants
    /// the stylesheet before the input document. Swapping them does not
    /// produce an error from either engine, only wrong or empty output.
    pub fn transform_args(
        self,
        parameter_args: &[String],
        stylesheet_path: &Path,
        document_path: &Path,
    ) -> Vec<String> {
        let stylesheet = stylesheet_path.to_string_lossy().into_owned();
        let document = document_path.to_string_lossy().into_owned();

        let mut args = parameter_args.to_vec();
        match self {
            Engine::Saxon => {
                args.push(document);
                args.push(stylesheet);
            }
            Engine::Xsltproc => {
                args.push(stylesheet);
                args.push(document);
            }
        }

        args
    }
}

impl Display for Engine {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.command_name())
    }
}

/// An engine located on the search path.
///
/// Memoizing the executable path along with the choice keeps later spawns
/// independent of the ambient `PATH` changing under the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEngine {
    pub kind: Engine,
    pub program: PathBuf,
}

/// Probes the colon-separated search path for a supported engine.
///
/// Engines are tried in [`Engine::PROBE_ORDER`]; the first one resolved to
/// an executable file wins. Returns `None` when no engine is installed.
pub fn probe(path_var: &str) -> Option<ResolvedEngine> {
    for engine in Engine::PROBE_ORDER {
        if let Some(program) = resolve_in_path(engine.command_name(), path_var) {
            return Some(ResolvedEngine {
                kind: engine,
                program,
            });
        }
    }

    None
}

/// Locates `name` as an executable regular file in a colon-separated
/// search path.
fn resolve_in_path(name: &str, path_var: &str) -> Option<PathBuf> {
    for dir in path_var.split(':') {
        if dir.is_empty() {
            continue;
        }

        let full_path = Path::new(dir).join(name);

        if full_path.is_file() {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Ok(metadata) = full_path.metadata() {
                    let mode = metadata.permissions().mode();
                    if mode & 0o111 != 0 {
                        return Some(full_path);
                    }
                }
            }

            #[cfg(not(unix))]
            {
                return Some(full_path);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[cfg(unix)]
    fn make_executable(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_from_name_known_engines() {
        assert_eq!(Engine::from_name("saxon").unwrap(), Engine::Saxon);
        assert_eq!(Engine::from_name("xsltproc").unwrap(), Engine::Xsltproc);
    }

    #[test]
    fn test_from_name_unknown_engine() {
        let result = Engine::from_name("xalan");
        assert!(matches!(result, Err(Error::UnknownEngineName(_))));
    }

    #[test]
    fn test_transform_args_orders_are_swapped() {
        let xsl = Path::new("/tmp/transform.xsl");
        let xml = Path::new("/tmp/input.xml");
        let params = vec!["greeting=hi".to_string()];

        let saxon_args = Engine::Saxon.transform_args(&params, xsl, xml);
        let xsltproc_args = Engine::Xsltproc.transform_args(&params, xsl, xml);

        assert_eq!(
            saxon_args,
            vec!["greeting=hi", "/tmp/input.xml", "/tmp/transform.xsl"]
        );
        assert_eq!(
            xsltproc_args,
            vec!["greeting=hi", "/tmp/transform.xsl", "/tmp/input.xml"]
        );

        // The trailing pair must be exactly swapped between the engines.
        assert_eq!(saxon_args[1], xsltproc_args[2]);
        assert_eq!(saxon_args[2], xsltproc_args[1]);
    }

    #[test]
    fn test_transform_args_without_parameters() {
        let xsl = Path::new("t.xsl");
        let xml = Path::new("t.xml");

        let args = Engine::Xsltproc.transform_args(&[], xsl, xml);
        assert_eq!(args, vec!["t.xsl", "t.xml"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_prefers_saxon() {
        let dir = tempfile::tempdir().unwrap();
        make_executable(dir.path(), "saxon");
        make_executable(dir.path(), "xsltproc");

        let resolved = probe(&dir.path().to_string_lossy()).unwrap();
        assert_eq!(resolved.kind, Engine::Saxon);
        assert!(resolved.program.ends_with("saxon"));
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_falls_back_to_xsltproc() {
        let dir = tempfile::tempdir().unwrap();
        make_executable(dir.path(), "xsltproc");

        let resolved = probe(&dir.path().to_string_lossy()).unwrap();
        assert_eq!(resolved.kind, Engine::Xsltproc);
    }

    #[test]
    fn test_probe_empty_search_path() {
        assert!(probe("").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_ignores_non_executable_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("saxon"), "not a program").unwrap();

        assert!(probe(&dir.path().to_string_lossy()).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_in_path_searches_dirs_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        make_executable(second.path(), "xsltproc");

        let path_var = format!(
            "{}:{}",
            first.path().to_string_lossy(),
            second.path().to_string_lossy()
        );

        let found = resolve_in_path("xsltproc", &path_var).unwrap();
        assert!(found.starts_with(second.path()));
    }
}
