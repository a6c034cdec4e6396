use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::traits::Compressor;
use crate::error::{Error, Result};

/// Fixed Ghostscript preset: re-distill for screen viewing.
const PRESET_ARGS: [&str; 6] = [
    "-sDEVICE=pdfwrite",
    "-dCompatibilityLevel=1.4",
    "-dPDFSETTINGS=/screen",
    "-dNOPAUSE",
    "-dQUIET",
    "-dBATCH",
];

/// Compressor backed by a Ghostscript subprocess.
#[derive(Debug, Clone)]
pub struct GhostscriptCompressor {
    binary: PathBuf,
}

impl GhostscriptCompressor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Full argument list for one invocation.
    pub fn args(input: &Path, output: &Path) -> Vec<OsString> {
        let mut output_arg = OsString::from("-sOutputFile=");
        output_arg.push(output);

        PRESET_ARGS
            .into_iter()
            .map(OsString::from)
            .chain([output_arg, input.as_os_str().to_owned()])
            .collect()
    }
}

impl Default for GhostscriptCompressor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_COMPRESSOR_BINARY)
    }
}

#[async_trait]
impl Compressor for GhostscriptCompressor {
    fn name(&self) -> &'static str {
        "ghostscript"
    }

    async fn compress(&self, input: &Path, output: &Path) -> Result<()> {
        debug!(
            "Running {} on {} -> {}",
            self.binary.display(),
            input.display(),
            output.display()
        );

        // kill_on_drop: a timed-out caller drops this future and takes gs down with it
        let result = Command::new(&self.binary)
            .args(Self::args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                Error::ExternalTool(format!(
                    "Error compressing PDF: could not run {}: {e}",
                    self.binary.display()
                ))
            })?;

        if result.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&result.stderr);
        let detail = stderr.lines().map(str::trim).find(|l| !l.is_empty());
        let message = match result.status.code() {
            Some(code) => format!("Ghostscript process exited with code {code}"),
            None => "Ghostscript process terminated by signal".to_string(),
        };

        Err(Error::ExternalTool(match detail {
            Some(detail) => format!("{message}: {detail}"),
            None => message,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_args_follow_fixed_preset() {
        let args = GhostscriptCompressor::args(Path::new("pdf/a.pdf"), Path::new("pdf/.pending-x1.tmp"));
        let args: Vec<String> = args.into_iter().map(|a| a.into_string().unwrap()).collect();

        assert_eq!(args[0], "-sDEVICE=pdfwrite");
        assert!(args.contains(&"-dPDFSETTINGS=/screen".to_string()));
        assert_eq!(args[6], "-sOutputFile=pdf/.pending-x1.tmp");
        assert_eq!(args[7], "pdf/a.pdf");
        assert_eq!(args.len(), 8);
    }

    #[tokio::test]
    async fn test_missing_binary_is_external_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let compressor = GhostscriptCompressor::new(dir.path().join("no-such-gs"));

        let err = compressor
            .compress(&dir.path().join("in.pdf"), &dir.path().join("out.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ExternalTool(_)));
        assert!(err.to_string().contains("could not run"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_external_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        // `false` ignores its arguments and exits with status 1
        let compressor = GhostscriptCompressor::new("false");

        let err = compressor
            .compress(&dir.path().join("in.pdf"), &dir.path().join("out.pdf"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exited with code 1"), "{err}");
    }
}
