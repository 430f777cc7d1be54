//! Window management system
//!
//! Handles window creation and the title bar, which doubles as the status
//! line and progress indicator while occlusion is sampled.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window},
};
use crate::config::WindowConfig;

/// Status text and progress shown in the title
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleState {
    base: String,
    status: Option<String>,
    progress: Option<f32>,
}

impl TitleState {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            status: None,
            progress: None,
        }
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = if status.is_empty() { None } else { Some(status.to_string()) };
    }

    /// Show progress; 0 hides the indicator
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = if progress > 0.0 { Some(progress.min(1.0)) } else { None };
    }

    /// Format as `"<base> - <status> [42%]"`, omitting absent parts
    pub fn compose(&self) -> String {
        let mut title = self.base.clone();
        if let Some(status) = &self.status {
            title.push_str(" - ");
            title.push_str(status);
        }
        if let Some(progress) = self.progress {
            title.push_str(&format!(" [{:.0}%]", progress * 100.0));
        }
        title
    }
}

/// Shared handle that writes status and progress into the window title
#[derive(Clone)]
pub struct TitleSink {
    window: Arc<Window>,
    state: Rc<RefCell<TitleState>>,
}

impl TitleSink {
    pub fn set_status(&self, status: &str) {
        let mut state = self.state.borrow_mut();
        state.set_status(status);
        self.window.set_title(&state.compose());
    }

    pub fn set_progress(&self, progress: f32) {
        let mut state = self.state.borrow_mut();
        state.set_progress(progress);
        self.window.set_title(&state.compose());
    }
}

/// Manages the application window
pub struct WindowSystem {
    window: Arc<Window>,
    title: Rc<RefCell<TitleState>>,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            title: Rc::new(RefCell::new(TitleState::new(config.title.clone()))),
        })
    }

    /// Get window reference (for RenderContext creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Current inner size in physical pixels
    pub fn inner_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Handle for status and progress updates
    pub fn title_sink(&self) -> TitleSink {
        TitleSink {
            window: Arc::clone(&self.window),
            state: Rc::clone(&self.title),
        }
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_base_only() {
        let state = TitleState::new("aoview");
        assert_eq!(state.compose(), "aoview");
    }

    #[test]
    fn test_title_with_status_and_progress() {
        let mut state = TitleState::new("aoview");
        state.set_status("Computing ambient occlusion...");
        state.set_progress(0.42);
        assert_eq!(state.compose(), "aoview - Computing ambient occlusion... [42%]");
    }

    #[test]
    fn test_zero_progress_hides_indicator() {
        let mut state = TitleState::new("aoview");
        state.set_status("Ambient occlusion ready");
        state.set_progress(0.5);
        state.set_progress(0.0);
        assert_eq!(state.compose(), "aoview - Ambient occlusion ready");
    }

    #[test]
    fn test_empty_status_clears() {
        let mut state = TitleState::new("aoview");
        state.set_status("busy");
        state.set_status("");
        assert_eq!(state.compose(), "aoview");
    }

    #[test]
    fn test_window_error_display() {
        let err = WindowError::CreationFailed("no display".to_string());
        assert_eq!(err.to_string(), "Window creation failed: no display");
    }
}
