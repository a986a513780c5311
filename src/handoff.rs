use crate::{Error, Result, config::HandoffConfig};
use serde::{Deserialize, Serialize};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Browsing-context target for hand-off links.
pub const NEW_CONTEXT_TARGET: &str = "_blank";
/// Window features: no `window.opener`, no referrer.
pub const ISOLATION_FEATURES: &str = "noopener,noreferrer";

/// A request to open a link in a new, isolated browsing context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenRequest {
    pub url: String,
    pub target: String,
    pub features: String,
}

impl OpenRequest {
    pub fn isolated(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            target: NEW_CONTEXT_TARGET.to_string(),
            features: ISOLATION_FEATURES.to_string(),
        }
    }
}

/// Host environment capability to open a link.
#[cfg_attr(test, mockall::automock)]
pub trait LinkOpener: Send + Sync {
    fn open(&self, request: &OpenRequest) -> Result<()>;
}

/// Builds messaging deep links for a fixed recipient.
#[derive(Debug, Clone)]
pub struct Handoff {
    host: String,
    recipient: String,
}

impl Handoff {
    pub fn new(config: &HandoffConfig) -> Self {
        Self {
            host: config.host.trim_end_matches('/').to_string(),
            recipient: config.recipient.clone(),
        }
    }

    /// `https://{host}/{recipient}?text={percent-encoded text}`
    pub fn link(&self, text: &str) -> String {
        format!(
            "https://{}/{}?text={}",
            self.host,
            self.recipient,
            urlencoding::encode(text)
        )
    }

    /// Opens the link, ignoring any failure of the host environment.
    pub fn dispatch(&self, opener: &dyn LinkOpener, link: &str) {
        let request = OpenRequest::isolated(link);
        match opener.open(&request) {
            Ok(()) => info!("📨 Hand-off opened for recipient {}", self.recipient),
            Err(e) => warn!("Hand-off could not be opened, ignoring: {}", e),
        }
    }
}

/// Opens links with the platform's default URL handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SystemOpener {
    fn command(url: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl LinkOpener for SystemOpener {
    fn open(&self, request: &OpenRequest) -> Result<()> {
        debug!(
            "Opening {} (target {}, features {})",
            request.url, request.target, request.features
        );
        // The platform handler always opens a fresh context without an opener.
        launch(Self::command(&request.url)).map(|_| ())
    }
}

/// Spawns `command` detached from our stdio and reaps it in the background.
///
/// The returned handle yields the exit status once the child has been waited on.
fn launch(mut command: Command) -> Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| Error::handoff(format!("failed to launch URL handler: {}", e)))?;

    // Reap the handler once it exits so long-lived hosts don't collect zombies.
    thread::Builder::new()
        .name("url-handler-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) => {
                debug!("URL handler exited with {}", status);
                Some(status)
            }
            Err(e) => {
                warn!("Failed to wait for URL handler: {}", e);
                None
            }
        })
        .map_err(|e| Error::handoff(format!("failed to watch URL handler: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn handoff() -> Handoff {
        Handoff::new(&HandoffConfig::default())
    }

    #[test]
    fn test_link_shape() {
        let link = handoff().link("Ciao a tutti");
        assert_eq!(link, "https://wa.me/393343576688?text=Ciao%20a%20tutti");
    }

    #[test]
    fn test_link_encodes_reserved_and_unicode() {
        let link = handoff().link("a&b=c\n📅");
        assert_eq!(
            link,
            "https://wa.me/393343576688?text=a%26b%3Dc%0A%F0%9F%93%85"
        );
    }

    #[test]
    fn test_host_trailing_slash_is_ignored() {
        let handoff = Handoff::new(&HandoffConfig {
            host: "wa.me/".to_string(),
            recipient: "391234".to_string(),
        });
        assert_eq!(handoff.link("x"), "https://wa.me/391234?text=x");
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_reaps_finished_handler() {
        let reaper = launch(Command::new("true")).unwrap();
        let status = reaper.join().unwrap();
        assert!(status.is_some_and(|s| s.success()));
    }

    #[test]
    fn test_launch_missing_handler_is_handoff_error() {
        let err = launch(Command::new("aria-no-such-url-handler")).unwrap_err();
        assert!(matches!(err, Error::Handoff(_)));
    }

    #[test]
    fn test_dispatch_sends_isolated_request() {
        let mut opener = MockLinkOpener::new();
        opener
            .expect_open()
            .withf(|req| {
                req.url == "https://wa.me/393343576688?text=x"
                    && req.target == "_blank"
                    && req.features == "noopener,noreferrer"
            })
            .times(1)
            .returning(|_| Ok(()));

        handoff().dispatch(&opener, "https://wa.me/393343576688?text=x");
    }

    #[test]
    fn test_dispatch_swallows_opener_failure() {
        let mut opener = MockLinkOpener::new();
        opener
            .expect_open()
            .times(1)
            .returning(|_| Err(Error::handoff("popup blocked")));

        handoff().dispatch(&opener, "https://wa.me/393343576688?text=x");
    }
}
