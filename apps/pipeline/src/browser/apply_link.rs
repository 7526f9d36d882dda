#![allow(dead_code)]

//! Apply-link capture.
//!
//! Many postings hide the real application URL behind an "apply" button that
//! opens a new browser window. Capturing it is a stateful UI-automation
//! dance, modeled here as an explicit state machine over the session
//! primitives instead of ad hoc waits: every attempt advances strictly
//! `Navigated → ButtonLocated → Clicked → NewContextDetected → Captured`,
//! and a failure reports the state it died in.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

/// Recorded when no apply link could be captured for a posting.
pub const SENTINEL_CAPTURE_FAILED: &str = "capture failed";

/// A browser-session failure, opaque to the state machine.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SessionError(pub String);

/// Browser-session primitives needed for one capture. Mirrors a WebDriver
/// session: one focused window at a time, handles are opaque strings.
#[async_trait]
pub trait ApplySession: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;
    /// Waits for and locates the apply button; `false` means it never
    /// appeared.
    async fn locate_apply_button(&mut self) -> Result<bool, SessionError>;
    async fn click_apply_button(&mut self) -> Result<(), SessionError>;
    async fn current_window(&mut self) -> Result<String, SessionError>;
    async fn window_handles(&mut self) -> Result<Vec<String>, SessionError>;
    async fn switch_to_window(&mut self, handle: &str) -> Result<(), SessionError>;
    async fn current_url(&mut self) -> Result<String, SessionError>;
    /// Closes the focused window. The caller switches back afterwards.
    async fn close_window(&mut self) -> Result<(), SessionError>;
}

/// Progress of one capture attempt. Advances strictly forward.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CaptureState {
    Navigated,
    ButtonLocated,
    Clicked { prior_windows: Vec<String> },
    NewContextDetected { handle: String },
    Captured { url: String },
}

impl CaptureState {
    fn name(&self) -> &'static str {
        match self {
            CaptureState::Navigated => "navigated",
            CaptureState::ButtonLocated => "button_located",
            CaptureState::Clicked { .. } => "clicked",
            CaptureState::NewContextDetected { .. } => "new_context_detected",
            CaptureState::Captured { .. } => "captured",
        }
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("apply button not found")]
    ButtonNotFound,

    #[error("no new window appeared after clicking apply")]
    NoNewWindow,

    #[error("session error in state '{state}': {source}")]
    Session {
        state: &'static str,
        source: SessionError,
    },
}

fn session_err(state: &'static str) -> impl FnOnce(SessionError) -> CaptureError {
    move |source| CaptureError::Session { state, source }
}

/// Drives one capture attempt through its states and returns the captured
/// URL. On success the session is left focused on the original window.
pub async fn capture_apply_link(
    session: &mut dyn ApplySession,
    posting_url: &str,
) -> Result<String, CaptureError> {
    session
        .navigate(posting_url)
        .await
        .map_err(session_err("navigated"))?;
    let original = session
        .current_window()
        .await
        .map_err(session_err("navigated"))?;

    let mut state = CaptureState::Navigated;
    let captured = loop {
        let here = state.name();
        state = match state {
            CaptureState::Navigated => {
                if !session
                    .locate_apply_button()
                    .await
                    .map_err(session_err(here))?
                {
                    return Err(CaptureError::ButtonNotFound);
                }
                CaptureState::ButtonLocated
            }
            CaptureState::ButtonLocated => {
                let prior_windows = session.window_handles().await.map_err(session_err(here))?;
                session
                    .click_apply_button()
                    .await
                    .map_err(session_err(here))?;
                CaptureState::Clicked { prior_windows }
            }
            CaptureState::Clicked { prior_windows } => {
                let handles = session.window_handles().await.map_err(session_err(here))?;
                match handles.into_iter().find(|h| !prior_windows.contains(h)) {
                    Some(handle) => CaptureState::NewContextDetected { handle },
                    None => return Err(CaptureError::NoNewWindow),
                }
            }
            CaptureState::NewContextDetected { handle } => {
                session
                    .switch_to_window(&handle)
                    .await
                    .map_err(session_err(here))?;
                let url = session.current_url().await.map_err(session_err(here))?;
                session.close_window().await.map_err(session_err(here))?;
                session
                    .switch_to_window(&original)
                    .await
                    .map_err(session_err(here))?;
                CaptureState::Captured { url }
            }
            CaptureState::Captured { url } => break url,
        };
    };

    Ok(captured)
}

/// Captures an apply link for every posting URL, per-item isolated: a failed
/// capture records the sentinel and the batch continues. The result aligns
/// one-to-one with `posting_urls`.
pub async fn add_apply_links(
    session: &mut dyn ApplySession,
    posting_urls: &[String],
) -> Vec<String> {
    let mut links = Vec::with_capacity(posting_urls.len());
    for url in posting_urls {
        match capture_apply_link(session, url).await {
            Ok(link) => links.push(link),
            Err(e) => {
                warn!("apply-link capture failed for {url}: {e}");
                links.push(SENTINEL_CAPTURE_FAILED.to_string());
            }
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted session: one original window, optionally spawns a new
    /// window on click.
    struct FakeSession {
        has_button: bool,
        spawns_window: bool,
        apply_url: String,
        focused: String,
        windows: Vec<String>,
        closed: Vec<String>,
    }

    impl FakeSession {
        fn new(has_button: bool, spawns_window: bool) -> Self {
            Self {
                has_button,
                spawns_window,
                apply_url: "https://careers.example/apply/42".to_string(),
                focused: "w0".to_string(),
                windows: vec!["w0".to_string()],
                closed: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl ApplySession for FakeSession {
        async fn navigate(&mut self, _url: &str) -> Result<(), SessionError> {
            Ok(())
        }

        async fn locate_apply_button(&mut self) -> Result<bool, SessionError> {
            Ok(self.has_button)
        }

        async fn click_apply_button(&mut self) -> Result<(), SessionError> {
            if self.spawns_window {
                self.windows.push("w1".to_string());
            }
            Ok(())
        }

        async fn current_window(&mut self) -> Result<String, SessionError> {
            Ok(self.focused.clone())
        }

        async fn window_handles(&mut self) -> Result<Vec<String>, SessionError> {
            Ok(self.windows.clone())
        }

        async fn switch_to_window(&mut self, handle: &str) -> Result<(), SessionError> {
            if !self.windows.contains(&handle.to_string()) {
                return Err(SessionError(format!("no such window: {handle}")));
            }
            self.focused = handle.to_string();
            Ok(())
        }

        async fn current_url(&mut self) -> Result<String, SessionError> {
            if self.focused == "w1" {
                Ok(self.apply_url.clone())
            } else {
                Ok("https://jobs.example/posting".to_string())
            }
        }

        async fn close_window(&mut self) -> Result<(), SessionError> {
            self.closed.push(self.focused.clone());
            self.windows.retain(|w| w != &self.focused);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_happy_path_captures_new_window_url() {
        let mut session = FakeSession::new(true, true);
        let url = capture_apply_link(&mut session, "https://jobs.example/posting")
            .await
            .unwrap();
        assert_eq!(url, "https://careers.example/apply/42");
        // the new window was closed and focus returned to the original
        assert_eq!(session.closed, vec!["w1"]);
        assert_eq!(session.focused, "w0");
    }

    #[tokio::test]
    async fn test_missing_button_reports_button_not_found() {
        let mut session = FakeSession::new(false, false);
        let err = capture_apply_link(&mut session, "https://jobs.example/p")
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::ButtonNotFound));
    }

    #[tokio::test]
    async fn test_click_without_new_window_reports_no_new_window() {
        let mut session = FakeSession::new(true, false);
        let err = capture_apply_link(&mut session, "https://jobs.example/p")
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::NoNewWindow));
    }

    #[tokio::test]
    async fn test_batch_capture_isolates_failures() {
        let mut session = FakeSession::new(true, true);
        let urls = vec![
            "https://jobs.example/1".to_string(),
            "https://jobs.example/2".to_string(),
        ];
        let links = add_apply_links(&mut session, &urls).await;

        assert_eq!(links.len(), 2);
        assert_eq!(links[0], "https://careers.example/apply/42");
        // second attempt: w1 exists no more, but click spawns it again
        assert_eq!(links[1], "https://careers.example/apply/42");
    }

    #[tokio::test]
    async fn test_batch_capture_writes_sentinel_on_failure() {
        let mut session = FakeSession::new(false, false);
        let urls = vec!["https://jobs.example/1".to_string()];
        let links = add_apply_links(&mut session, &urls).await;
        assert_eq!(links, vec![SENTINEL_CAPTURE_FAILED.to_string()]);
    }
}
