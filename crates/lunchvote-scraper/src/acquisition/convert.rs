//! Runs the external document converters.

use crate::error::AcquisitionError;

const INPUT_PLACEHOLDER: &str = "{input}";

/// Paths of the converter binaries.
#[derive(Debug, Clone)]
pub struct ConverterCommands {
    pdftotext: String,
    antiword: String,
}

impl ConverterCommands {
    #[must_use]
    pub fn new(pdftotext: &str, antiword: &str) -> Self {
        Self {
            pdftotext: pdftotext.to_owned(),
            antiword: antiword.to_owned(),
        }
    }

    /// Binaries this configuration depends on.
    #[must_use]
    pub fn programs(&self) -> [&str; 2] {
        [&self.pdftotext, &self.antiword]
    }

    pub(super) async fn pdf_to_text(&self, pdf: &[u8]) -> Result<String, AcquisitionError> {
        run_converter(
            &self.pdftotext,
            &["-enc", "UTF-8", "-nopgbrk", INPUT_PLACEHOLDER, "-"],
            pdf,
            "pdf",
        )
        .await
    }

    pub(super) async fn word_to_text(&self, doc: &[u8]) -> Result<String, AcquisitionError> {
        run_converter(&self.antiword, &["-w", "0", INPUT_PLACEHOLDER], doc, "doc").await
    }
}

impl Default for ConverterCommands {
    fn default() -> Self {
        Self::new("pdftotext", "antiword")
    }
}

/// Writes `input` to a temp file, runs `program` with `args` (where
/// `{input}` is replaced by the file path) and returns its stdout.
///
/// The child is killed if the returned future is dropped, so an acquisition
/// timeout does not leave converters running. The temp file is removed when
/// the guard goes out of scope, on every path.
async fn run_converter(
    program: &str,
    args: &[&str],
    input: &[u8],
    extension: &str,
) -> Result<String, AcquisitionError> {
    let file = tempfile::Builder::new()
        .prefix("lunchvote-")
        .suffix(&format!(".{extension}"))
        .tempfile()?;
    tokio::fs::write(file.path(), input).await?;

    let path_arg = file.path().to_string_lossy().into_owned();
    let output = tokio::process::Command::new(program)
        .args(args.iter().map(|&a| {
            if a == INPUT_PLACEHOLDER {
                path_arg.as_str()
            } else {
                a
            }
        }))
        .kill_on_drop(true)
        .output()
        .await;

    if let Err(e) = file.close() {
        tracing::debug!(path = %path_arg, error = %e, "could not remove converter input");
    }

    let output = output.map_err(|e| AcquisitionError::Conversion {
        command: program.to_owned(),
        reason: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(AcquisitionError::Conversion {
            command: program.to_owned(),
            reason: format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_temp_file_to_converter() {
        let input = "MONTAG\nFrittatensuppe";
        let text = run_converter("cat", &[INPUT_PLACEHOLDER], input.as_bytes(), "txt")
            .await
            .unwrap();
        assert_eq!(text, "MONTAG\nFrittatensuppe");
    }

    #[tokio::test]
    async fn temp_file_is_removed_after_conversion() {
        let printed = run_converter(
            "sh",
            &["-c", "printf %s \"$1\"", "sh", INPUT_PLACEHOLDER],
            b"%PDF-1.4",
            "pdf",
        )
        .await
        .unwrap();
        let path = std::path::Path::new(&printed);
        assert!(path.extension().is_some_and(|ext| ext == "pdf"));
        assert!(path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("lunchvote-")));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn temp_file_is_removed_when_converter_fails() {
        let err = run_converter(
            "sh",
            &["-c", "printf %s \"$1\" >&2; exit 3", "sh", INPUT_PLACEHOLDER],
            b"",
            "doc",
        )
        .await
        .unwrap_err();
        let AcquisitionError::Conversion { reason, .. } = err else {
            panic!("expected conversion error, got {err:?}");
        };
        let path = reason.rsplit(": ").next().unwrap();
        assert!(path.ends_with(".doc"));
        assert!(!std::path::Path::new(path).exists());
    }

    #[tokio::test]
    async fn failing_converter_is_a_conversion_error() {
        let err = run_converter("false", &[INPUT_PLACEHOLDER], b"%PDF-1.4", "pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::Conversion { ref command, .. } if command == "false"));
    }

    #[tokio::test]
    async fn missing_converter_is_a_conversion_error() {
        let err = run_converter("lunchvote-no-such-converter", &[INPUT_PLACEHOLDER], b"", "pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::Conversion { .. }));
    }

    #[test]
    fn default_programs() {
        assert_eq!(ConverterCommands::default().programs(), ["pdftotext", "antiword"]);
    }
}
