//! HTML rendering of named views on a dedicated worker thread.
//!
//! `tera` state is owned by exactly one thread. Every render request, no matter
//! which task submits it, is queued to that thread and answered via a oneshot.

mod params;

pub use params::{View, ViewParams};

use std::panic::{self, AssertUnwindSafe};
use std::thread;

use tera::{Context, Tera};
use tokio::sync::{mpsc, oneshot};

pub const DEFAULT_TEMPLATES: &str = "templates/**/*.html";

const RENDER_QUEUE_SIZE: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Template(#[from] tera::Error),

    #[error("Failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Rendering view {0} panicked")]
    Panicked(String),

    #[error("View renderer is no longer running")]
    Unavailable,
}

struct RenderJob {
    view: View,
    responder: oneshot::Sender<Result<String, RenderError>>,
}

/// Handle to the render thread. Clones share the same thread.
#[derive(Clone)]
pub struct ViewRenderer {
    jobs: mpsc::Sender<RenderJob>,
}

impl ViewRenderer {
    /// Move `tera` onto a new render thread.
    ///
    /// The thread exits once every handle has been dropped.
    pub fn new(tera: Tera) -> Result<Self, RenderError> {
        let (jobs, receiver) = mpsc::channel(RENDER_QUEUE_SIZE);

        thread::Builder::new()
            .name("view-renderer".to_string())
            .spawn(move || run_worker(tera, receiver))?;

        Ok(Self { jobs })
    }

    /// Load every template matching `glob` (e.g. `templates/**/*.html`)
    pub fn from_glob(glob: &str) -> Result<Self, RenderError> {
        let tera = Tera::new(glob)?;
        tracing::info!(
            glob = %glob,
            templates = tera.get_template_names().count(),
            "Templates loaded"
        );
        Self::new(tera)
    }

    /// Render `view` to HTML, waiting for the render thread to finish it
    pub async fn render(&self, view: View) -> Result<String, RenderError> {
        let (responder, receiver) = oneshot::channel();

        self.jobs
            .send(RenderJob { view, responder })
            .await
            .map_err(|_| RenderError::Unavailable)?;

        receiver.await.map_err(|_| RenderError::Unavailable)?
    }
}

fn run_worker(tera: Tera, mut receiver: mpsc::Receiver<RenderJob>) {
    tracing::debug!("View renderer started");

    while let Some(RenderJob { view, responder }) = receiver.blocking_recv() {
        let name = view.name().to_string();
        let rendered = panic::catch_unwind(AssertUnwindSafe(|| render_view(&tera, view)))
            .unwrap_or_else(|_| {
                tracing::error!(view = %name, "View render panicked");
                Err(RenderError::Panicked(name))
            });

        if responder.send(rendered).is_err() {
            tracing::debug!("Render caller went away before the result was ready");
        }
    }

    tracing::debug!("View renderer stopped");
}

fn render_view(tera: &Tera, view: View) -> Result<String, RenderError> {
    let (name, params) = view.into_parts();

    let html = match params {
        ViewParams::None => tera.render(&name, &Context::new()),
        ViewParams::Structured(context) => tera.render(&name, &context),
    };

    html.map_err(|e| {
        tracing::warn!(view = %name, error = %e, "Failed to render view");
        RenderError::from(e)
    })
}
