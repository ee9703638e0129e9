use crate::error::NavigationError;
use crate::navigator::{FetchTicket, Navigator, Resolution, fetch};
use crate::source::{DataSource, RecordFile};
use egonet_render::{SvgRenderOptions, render_scene_svg};

/// Headless driver: wires a [`DataSource`] to a [`Navigator`] and runs each request to
/// completion before returning.
///
/// UIs that keep several fetches in flight use the navigator and [`fetch`] directly.
#[derive(Debug)]
pub struct Explorer<S> {
    source: S,
    navigator: Navigator,
}

impl<S: DataSource> Explorer<S> {
    pub fn new(source: S, navigator: Navigator) -> Self {
        Self { source, navigator }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    /// Parses `file` and, on success, shows the person list.
    pub async fn upload(&mut self, file: Option<RecordFile>) -> bool {
        let Some(file) = self.navigator.begin_upload(file) else {
            return false;
        };
        let result = self.source.parse_record_file(&file).await;
        self.navigator.finish_upload(result)
    }

    pub async fn select(&mut self, person_id: &str) -> Result<Resolution, NavigationError> {
        let ticket = self.navigator.select_person(person_id)?;
        Ok(self.run(ticket).await)
    }

    /// `None` when nothing selectable is under the point.
    pub async fn click(&mut self, x: f64, y: f64) -> Option<Resolution> {
        let ticket = self.navigator.click(x, y)?;
        Some(self.run(ticket).await)
    }

    pub async fn retry(&mut self) -> Result<Resolution, NavigationError> {
        let ticket = self.navigator.retry()?;
        Ok(self.run(ticket).await)
    }

    pub fn back(&mut self) -> bool {
        self.navigator.back()
    }

    /// The current Explorer frame as SVG.
    pub fn render_svg(&self, options: &SvgRenderOptions) -> String {
        render_scene_svg(self.navigator.scene(), options)
    }

    async fn run(&mut self, ticket: FetchTicket) -> Resolution {
        let result = fetch(&self.source, &ticket).await;
        self.navigator.resolve(&ticket, result)
    }
}
