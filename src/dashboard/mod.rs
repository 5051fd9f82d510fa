//! Dashboard controller: panel view-state plus the fetch/render
//! orchestration.
//!
//! Display state is an explicit [`PanelView`] and the controller is its
//! only writer, so every render is deterministic and assertable. Control
//! flow is strictly sequential: each fetch completes (or fails) and renders
//! before the next one is issued.
//!
//! Error policy is uniform across all four operations: a failed fetch or
//! decode renders an inline error block into the owning panel and is
//! recorded in the request log by the client. No failure is silent and none
//! aborts the process.

use std::thread;
use std::time::Duration;

use crate::api::Backend;
use crate::render;

// ---------------------------------------------------------------------------
// Panel view-state
// ---------------------------------------------------------------------------

/// The two named page regions the dashboard writes into.
///
/// `panel` holds the status/analysis display, `ia_panel` the AI status and
/// optimize display. Regions support replace and append; the analysis
/// render is append-only.
#[derive(Debug, Clone, Default)]
pub struct PanelView {
    panel: String,
    ia_panel: String,
}

impl PanelView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current markup of the primary panel.
    pub fn panel(&self) -> &str {
        &self.panel
    }

    /// Current markup of the AI panel.
    pub fn ia_panel(&self) -> &str {
        &self.ia_panel
    }

    pub fn replace_panel(&mut self, markup: String) {
        self.panel = markup;
    }

    pub fn append_panel(&mut self, markup: &str) {
        self.panel.push_str(markup);
    }

    pub fn replace_ia_panel(&mut self, markup: String) {
        self.ia_panel = markup;
    }

    pub fn append_ia_panel(&mut self, markup: &str) {
        self.ia_panel.push_str(markup);
    }

    /// Reset both regions to empty (page-load state).
    pub fn clear(&mut self) {
        self.panel.clear();
        self.ia_panel.clear();
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// One-shot request/render controller over a [`Backend`].
///
/// Holds no state between operations beyond the panel contents themselves.
pub struct Dashboard<B: Backend> {
    backend: B,
    view: PanelView,
    reload_delay: Duration,
}

impl<B: Backend> Dashboard<B> {
    pub fn new(backend: B, reload_delay: Duration) -> Self {
        Self {
            backend,
            view: PanelView::new(),
            reload_delay,
        }
    }

    /// The current panel contents.
    pub fn view(&self) -> &PanelView {
        &self.view
    }

    /// Consume the controller, keeping the rendered view.
    pub fn into_view(self) -> PanelView {
        self.view
    }

    /// Full load chain: clear both panels, then status, analysis, AI
    /// status.
    pub fn refresh(&mut self) {
        self.view.clear();
        self.load_status();
    }

    /// Fetch status and render the summary into the primary panel. On
    /// success, triggers the analysis and AI-status loads as sequential
    /// follow-ups; on failure, renders the error and ends the chain.
    pub fn load_status(&mut self) {
        match self.backend.fetch_status() {
            Ok(status) => {
                self.view.replace_panel(render::render_status(&status));
                self.load_analysis();
                self.load_ai_status();
            }
            Err(err) => {
                self.view
                    .append_panel(&render::render_error("Status request", &err));
            }
        }
    }

    /// Fetch analysis and append it to the primary panel.
    pub fn load_analysis(&mut self) {
        match self.backend.fetch_analysis() {
            Ok(report) => self.view.append_panel(&render::render_analysis(&report)),
            Err(err) => {
                self.view
                    .append_panel(&render::render_error("Analysis request", &err));
            }
        }
    }

    /// Fetch AI status and render it (plus the optimize control) into the
    /// AI panel.
    pub fn load_ai_status(&mut self) {
        match self.backend.fetch_ai_status() {
            Ok(report) => self.view.replace_ia_panel(render::render_ai_status(&report)),
            Err(err) => {
                self.view
                    .append_ia_panel(&render::render_error("AI status request", &err));
            }
        }
    }

    /// Run the optimize action: append the transient working notice first
    /// (before the request is issued), then the verbatim result or the
    /// inline error, then reload the whole dashboard after the configured
    /// delay.
    pub fn run_optimization(&mut self) {
        self.view.append_ia_panel(&render::render_working());

        match self.backend.request_optimization() {
            Ok(result) => {
                self.view
                    .append_ia_panel(&render::render_optimize_result(&result));
            }
            Err(err) => {
                self.view
                    .append_ia_panel(&render::render_error("Optimization request", &err));
            }
        }

        if !self.reload_delay.is_zero() {
            thread::sleep(self.reload_delay);
        }
        self.refresh();
    }

    /// Like [`run_optimization`](Self::run_optimization) but without the
    /// reload, for callers that want to present the result before
    /// refreshing (the terminal optimize command).
    pub fn run_optimization_no_reload(&mut self) {
        self.view.append_ia_panel(&render::render_working());

        match self.backend.request_optimization() {
            Ok(result) => {
                self.view
                    .append_ia_panel(&render::render_optimize_result(&result));
            }
            Err(err) => {
                self.view
                    .append_ia_panel(&render::render_error("Optimization request", &err));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
