//! Chrome process management and the `BrowserLauncher` implementation.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use revscout_protocols::browser::{BrowserLauncher, BrowserSession, PageHandle};
use revscout_protocols::error::BrowserError;

use crate::cdp::{CdpClient, DEFAULT_COMMAND_TIMEOUT};
use crate::page::CdpPage;

const STARTUP_ATTEMPTS: u32 = 50;
const STARTUP_POLL: Duration = Duration::from_millis(200);

/// Launch settings.
#[derive(Debug, Clone)]
pub struct ChromeLauncherConfig {
    /// Chrome debugging port.
    pub debug_port: u16,
    pub headless: bool,
    /// Explicit Chrome binary; searched in well-known locations when unset.
    pub chrome_path: Option<PathBuf>,
    /// Profile directory; a temporary one is created when unset.
    pub profile_dir: Option<PathBuf>,
    /// Bound for a single CDP command.
    pub command_timeout: Duration,
    /// Quiet period that counts as network settled.
    pub network_idle: Duration,
}

impl Default for ChromeLauncherConfig {
    fn default() -> Self {
        Self {
            debug_port: 9222,
            headless: true,
            chrome_path: None,
            profile_dir: None,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            network_idle: Duration::from_millis(500),
        }
    }
}

impl ChromeLauncherConfig {
    /// HTTP debugging endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.debug_port)
    }
}

/// Starts or attaches to Chrome and hands out [`ChromeSession`]s.
pub struct ChromeLauncher {
    config: ChromeLauncherConfig,
}

impl ChromeLauncher {
    pub fn new(config: ChromeLauncherConfig) -> Self {
        Self { config }
    }

    /// Find Chrome executable path.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    async fn is_chrome_running(&self) -> bool {
        CdpClient::browser_version(&self.config.endpoint()).await.is_ok()
    }

    /// Launch Chrome with remote debugging enabled.
    async fn launch_chrome(&self) -> Result<(Child, Option<TempDir>), BrowserError> {
        let chrome_path = self
            .config
            .chrome_path
            .clone()
            .or_else(Self::find_chrome)
            .ok_or(BrowserError::ChromeNotFound)?;

        let (profile_dir, temp_profile) = match &self.config.profile_dir {
            Some(dir) => {
                if let Err(e) = std::fs::create_dir_all(dir) {
                    warn!("Failed to create profile directory: {}", e);
                }
                (dir.clone(), None)
            }
            None => {
                let temp = tempfile::Builder::new()
                    .prefix("revscout-profile-")
                    .tempdir()
                    .map_err(|e| BrowserError::LaunchFailed(format!("profile directory: {}", e)))?;
                (temp.path().to_path_buf(), Some(temp))
            }
        };

        info!(
            "Launching {} with profile at {}",
            chrome_path.display(),
            profile_dir.display()
        );

        let mut cmd = Command::new(&chrome_path);
        cmd.arg(format!("--remote-debugging-port={}", self.config.debug_port))
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--metrics-recording-only")
            .arg("about:blank")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        if self.config.headless {
            cmd.arg("--headless=new");
        }

        let child = cmd
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok((child, temp_profile))
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let mut launched = None;

        if self.is_chrome_running().await {
            info!("Chrome already running on port {}", self.config.debug_port);
        } else {
            info!("Chrome not running on port {}, launching...", self.config.debug_port);
            let (mut child, temp_profile) = self.launch_chrome().await?;

            let mut ready = false;
            for _ in 0..STARTUP_ATTEMPTS {
                tokio::time::sleep(STARTUP_POLL).await;
                if self.is_chrome_running().await {
                    ready = true;
                    break;
                }
            }

            if !ready {
                let _ = child.kill().await;
                return Err(BrowserError::LaunchFailed(
                    "Chrome failed to start within timeout".to_string(),
                ));
            }
            launched = Some(LaunchedChrome {
                child,
                _profile: temp_profile,
            });
        }

        let client =
            match CdpClient::connect_with_timeout(&self.config.endpoint(), self.config.command_timeout)
                .await
            {
                Ok(client) => client,
                Err(e) => {
                    if let Some(mut chrome) = launched {
                        let _ = chrome.child.kill().await;
                    }
                    return Err(e.into());
                }
            };

        info!("Connected to Chrome at {}", self.config.endpoint());
        Ok(Box::new(ChromeSession {
            client: Arc::new(client),
            network_idle: self.config.network_idle,
            pages: Mutex::new(Vec::new()),
            launched: Mutex::new(launched),
        }))
    }
}

struct LaunchedChrome {
    child: Child,
    _profile: Option<TempDir>,
}

/// A connected browser. Closing it closes every page it opened and stops
/// Chrome if this session started it.
pub struct ChromeSession {
    client: Arc<CdpClient>,
    network_idle: Duration,
    pages: Mutex<Vec<String>>,
    launched: Mutex<Option<LaunchedChrome>>,
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn new_page(&self) -> Result<Box<dyn PageHandle>, BrowserError> {
        let session = self.client.new_page().await?;
        self.pages.lock().await.push(session.target_id().to_string());
        Ok(Box::new(CdpPage::new(Arc::new(session), self.network_idle)))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        let pages: Vec<String> = self.pages.lock().await.drain(..).collect();
        for target_id in pages {
            if let Err(e) = self.client.close_page(&target_id).await {
                warn!("Failed to close page {}: {}", target_id, e);
            }
        }

        let Some(mut chrome) = self.launched.lock().await.take() else {
            debug!("Leaving externally started Chrome running");
            return Ok(());
        };

        info!("Shutting down Chrome...");
        if let Err(e) = self.client.close_browser().await {
            debug!("Browser.close failed: {}", e);
        }
        match tokio::time::timeout(Duration::from_secs(5), chrome.child.wait()).await {
            Ok(Ok(_)) => Ok(()),
            _ => chrome
                .child
                .kill()
                .await
                .map_err(|e| BrowserError::ActionFailed(format!("failed to stop Chrome: {}", e))),
        }
    }
}
