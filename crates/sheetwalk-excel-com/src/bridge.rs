//! Subprocess management and JSON IPC for the WINE bridge process.

use std::ffi::OsString;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};

use excel_com_protocol::{Command as BridgeCommand, Request, Response, ResponseData, ResponseResult};

/// Errors from the Excel COM bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Failed to spawn WINE bridge process: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("Bridge process not running")]
    NotRunning,

    #[error("Failed to send command to bridge: {0}")]
    SendFailed(String),

    #[error("Failed to read response from bridge: {0}")]
    ReadFailed(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The bridge ran the command and Excel rejected it. The message is
    /// Excel's own text, e.g. `Exception from HRESULT: 0x800A03EC`.
    #[error("Bridge returned error: {0}")]
    Bridge(String),

    #[error("Unexpected response data")]
    UnexpectedResponse,

    #[error("Response id {actual} does not match request id {expected}")]
    IdMismatch { expected: u64, actual: u64 },

    #[error("Workbook is closed")]
    Closed,

    #[error("WINE not found. Install WINE and ensure 'wine' is in PATH.")]
    WineNotFound,

    #[error("Bridge executable not found at: {0}")]
    BridgeExeNotFound(String),
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Configuration for the Excel COM bridge.
#[derive(Debug, Clone)]
pub struct ExcelBridgeConfig {
    /// Path to the `excel-com-bridge.exe` Windows executable.
    /// If None, will search in common locations relative to the current binary.
    pub bridge_exe_path: Option<PathBuf>,

    /// Path to the WINE executable. Defaults to "wine".
    pub wine_path: PathBuf,

    /// Optional WINEPREFIX to use (for isolating the WINE environment).
    pub wine_prefix: Option<PathBuf>,
}

impl Default for ExcelBridgeConfig {
    fn default() -> Self {
        Self {
            bridge_exe_path: None,
            wine_path: PathBuf::from("wine"),
            wine_prefix: None,
        }
    }
}

impl ExcelBridgeConfig {
    /// Defaults overridden by `SHEETWALK_BRIDGE_EXE`, `SHEETWALK_WINE` and
    /// `WINEPREFIX`
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var_os(key))
    }

    fn from_vars(var: impl Fn(&str) -> Option<OsString>) -> Self {
        let mut config = Self::default();
        if let Some(exe) = var("SHEETWALK_BRIDGE_EXE") {
            config.bridge_exe_path = Some(PathBuf::from(exe));
        }
        if let Some(wine) = var("SHEETWALK_WINE") {
            config.wine_path = PathBuf::from(wine);
        }
        if let Some(prefix) = var("WINEPREFIX") {
            config.wine_prefix = Some(PathBuf::from(prefix));
        }
        config
    }
}

/// The connection to the Excel COM bridge.
///
/// Requests are written one JSON object per line and each waits for its
/// response before returning.
pub struct ExcelBridge {
    child: Option<Child>,
    writer: Box<dyn Write + Send>,
    reader: Box<dyn BufRead + Send>,
    next_id: u64,
    shut_down: bool,
}

impl std::fmt::Debug for ExcelBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExcelBridge")
            .field("pid", &self.child.as_ref().map(Child::id))
            .field("next_id", &self.next_id)
            .field("shut_down", &self.shut_down)
            .finish()
    }
}

impl ExcelBridge {
    /// Start the bridge process and initialize Excel.
    pub fn start(config: ExcelBridgeConfig) -> Result<Self> {
        let exe_path = config.bridge_exe_path.unwrap_or_else(find_bridge_exe);

        if !exe_path.exists() {
            return Err(BridgeError::BridgeExeNotFound(
                exe_path.display().to_string(),
            ));
        }

        let mut cmd = std::process::Command::new(&config.wine_path);

        if let Some(prefix) = &config.wine_prefix {
            cmd.env("WINEPREFIX", prefix);
        }

        cmd.arg(&exe_path);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::inherit()); // Bridge diagnostics go to our stderr

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BridgeError::WineNotFound
            } else {
                BridgeError::SpawnFailed(e)
            }
        })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                return Err(BridgeError::NotRunning);
            }
        };

        tracing::info!(exe = %exe_path.display(), pid = child.id(), "started Excel bridge");

        let mut bridge = Self {
            child: Some(child),
            writer: Box::new(stdin),
            reader: Box::new(BufReader::new(stdout)),
            next_id: 1,
            shut_down: false,
        };

        bridge.send_command(BridgeCommand::Init)?;

        Ok(bridge)
    }

    /// Talk to a bridge over an existing line transport and initialize Excel.
    pub fn with_transport<R, W>(reader: R, writer: W) -> Result<Self>
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        let mut bridge = Self {
            child: None,
            writer: Box::new(writer),
            reader: Box::new(reader),
            next_id: 1,
            shut_down: false,
        };
        bridge.send_command(BridgeCommand::Init)?;
        Ok(bridge)
    }

    /// Send a command to the bridge and wait for the response.
    pub(crate) fn send_command(&mut self, command: BridgeCommand) -> Result<Option<ResponseData>> {
        if self.shut_down {
            return Err(BridgeError::NotRunning);
        }

        let id = self.next_id;
        self.next_id += 1;

        let request = Request { id, command };
        let json = serde_json::to_string(&request)?;
        tracing::trace!(%json, "bridge request");

        writeln!(self.writer, "{json}").map_err(|e| BridgeError::SendFailed(e.to_string()))?;
        self.writer
            .flush()
            .map_err(|e| BridgeError::SendFailed(e.to_string()))?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| BridgeError::ReadFailed(e.to_string()))?;

        if line.is_empty() {
            return Err(BridgeError::NotRunning);
        }

        let response: Response = serde_json::from_str(&line)?;
        if response.id != id {
            return Err(BridgeError::IdMismatch {
                expected: id,
                actual: response.id,
            });
        }

        match response.result {
            ResponseResult::Ok { data } => Ok(data),
            ResponseResult::Error { message } => Err(BridgeError::Bridge(message)),
        }
    }

    /// Shut down the bridge: close all workbooks, quit Excel, and wait for
    /// the process to exit. Calling it again does nothing.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.shut_down {
            return Ok(());
        }
        let result = self.send_command(BridgeCommand::Shutdown);
        self.shut_down = true;

        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
        tracing::info!("Excel bridge shut down");

        result.map(|_| ())
    }
}

impl Drop for ExcelBridge {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Convert a Linux filesystem path to a WINE (Windows) path.
///
/// WINE maps `/` to `Z:\`, so `/home/user/file.xlsx` becomes `Z:\home\user\file.xlsx`.
pub fn linux_to_wine_path(linux_path: &Path) -> String {
    let abs = if linux_path.is_absolute() {
        linux_path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(linux_path)
    };

    format!("Z:{}", abs.display()).replace('/', "\\")
}

/// Attempt to locate the bridge exe relative to the current executable or in common paths.
fn find_bridge_exe() -> PathBuf {
    if let Ok(mut exe) = std::env::current_exe() {
        exe.pop();
        let candidate = exe.join("excel-com-bridge.exe");
        if candidate.exists() {
            return candidate;
        }
    }

    for profile in ["release", "debug"] {
        let candidate = PathBuf::from(format!(
            "target/x86_64-pc-windows-gnu/{profile}/excel-com-bridge.exe"
        ));
        if candidate.exists() {
            return candidate;
        }
    }

    PathBuf::from("excel-com-bridge.exe")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_linux_to_wine_path() {
        assert_eq!(
            linux_to_wine_path(Path::new("/home/user/report.xls")),
            r"Z:\home\user\report.xls"
        );
    }

    #[test]
    fn test_config_from_vars() {
        let config = ExcelBridgeConfig::from_vars(|key| match key {
            "SHEETWALK_WINE" => Some(OsString::from("/opt/wine/bin/wine64")),
            "WINEPREFIX" => Some(OsString::from("/tmp/prefix")),
            _ => None,
        });
        assert_eq!(config.bridge_exe_path, None);
        assert_eq!(config.wine_path, PathBuf::from("/opt/wine/bin/wine64"));
        assert_eq!(config.wine_prefix, Some(PathBuf::from("/tmp/prefix")));
    }

    #[test]
    fn test_missing_exe() {
        let config = ExcelBridgeConfig {
            bridge_exe_path: Some(PathBuf::from("/nonexistent/excel-com-bridge.exe")),
            ..Default::default()
        };
        assert!(matches!(
            ExcelBridge::start(config),
            Err(BridgeError::BridgeExeNotFound(_))
        ));
    }
}
