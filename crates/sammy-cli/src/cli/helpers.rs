use super::CliError;
use anyhow::Context;
use sammy_core::{CodecOptions, DocumentKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// File kind chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(super) enum KindArg {
    Parameter,
    Input,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Parameter => DocumentKind::Parameter,
            KindArg::Input => DocumentKind::Input,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub(super) enum OptionsError {
    #[error("failed to read codec options '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse codec options '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<OptionsError> for CliError {
    fn from(error: OptionsError) -> Self {
        match error {
            OptionsError::Read { .. } => CliError::Internal(error.into()),
            OptionsError::Parse { .. } => CliError::Usage(error.to_string()),
        }
    }
}

pub(super) fn load_options(path: Option<&Path>) -> Result<CodecOptions, OptionsError> {
    let Some(path) = path else {
        return Ok(CodecOptions::default());
    };
    let source = fs::read_to_string(path).map_err(|source| OptionsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| OptionsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Use `--kind` when given, otherwise the `.par`/`.inp` extension.
pub(super) fn resolve_kind(
    path: &Path,
    explicit: Option<KindArg>,
) -> Result<DocumentKind, CliError> {
    if let Some(kind) = explicit {
        return Ok(kind.into());
    }
    infer_kind(path).ok_or_else(|| {
        CliError::Usage(format!(
            "cannot tell whether '{}' is a parameter or input file; pass --kind parameter|input",
            path.display()
        ))
    })
}

pub(super) fn infer_kind(path: &Path) -> Option<DocumentKind> {
    let extension = path.extension()?.to_str()?;
    if extension.eq_ignore_ascii_case("par") {
        Some(DocumentKind::Parameter)
    } else if extension.eq_ignore_ascii_case("inp") {
        Some(DocumentKind::Input)
    } else {
        None
    }
}

pub(super) fn read_text(path: &Path) -> Result<String, CliError> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    Ok(text)
}

/// Write `text` to `path`, or to stdout when no path is given.
pub(super) fn write_output(path: Option<&Path>, text: &str) -> Result<(), CliError> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create '{}'", parent.display()))?;
            }
            fs::write(path, text)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Install the stderr subscriber; `RUST_LOG` applies unless `--verbose` is set.
pub(super) fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A second call in the same process keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::{OptionsError, infer_kind, load_options};
    use sammy_core::{CodecOptions, DocumentKind, GroupListMode};
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn kind_follows_extension() {
        assert_eq!(infer_kind(Path::new("ta181.par")), Some(DocumentKind::Parameter));
        assert_eq!(infer_kind(Path::new("runs/TA181.INP")), Some(DocumentKind::Input));
        assert_eq!(infer_kind(Path::new("notes.txt")), None);
        assert_eq!(infer_kind(Path::new("noextension")), None);
    }

    #[test]
    fn absent_options_path_gives_defaults() {
        assert_eq!(load_options(None).unwrap(), CodecOptions::default());
    }

    #[test]
    fn options_errors_name_the_stage() {
        let temp = TempDir::new().expect("tempdir should be created");
        let dir = temp.path();

        let missing = dir.join("missing.json");
        assert!(matches!(
            load_options(Some(&missing)),
            Err(OptionsError::Read { .. })
        ));

        let broken = dir.join("broken.json");
        std::fs::write(&broken, "{ \"maxLines\": ").unwrap();
        assert!(matches!(
            load_options(Some(&broken)),
            Err(OptionsError::Parse { .. })
        ));

        let valid = dir.join("valid.json");
        std::fs::write(&valid, r#"{ "isotopeListMode": "standard" }"#).unwrap();
        let options = load_options(Some(&valid)).unwrap();
        assert_eq!(options.isotope_list_mode, GroupListMode::Standard);
    }
}
