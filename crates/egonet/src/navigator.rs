//! Session state and the Upload -> PersonList -> Explorer state machine.
//!
//! The navigator never awaits anything itself. Each selection mints a [`FetchTicket`]; the driver
//! runs [`fetch`] for it and hands the outcome back through [`Navigator::resolve`]. Only the
//! newest ticket is ever applied, so results that arrive out of order cannot overwrite a later
//! selection.

use crate::error::{NavigationError, SourceError};
use crate::source::{DataSource, RecordFile};
use egonet_core::{PersonDetail, RecordSet, Surroundings};
use egonet_render::{Canvas, EgoLayout, LayoutOptions, Scene, layout_ego};
use std::fmt;
use std::sync::Arc;

pub const UPLOAD_LABEL: &str = "Upload GEDCOM File";
pub const UPLOAD_BUSY_LABEL: &str = "Parsing...";
pub const NO_FILE_MESSAGE: &str = "Please select a file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Upload,
    PersonList,
    Explorer,
}

/// The single active session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub view: View,
    pub records: Option<Arc<RecordSet>>,
    pub centered_person_id: Option<String>,
}

/// One selection in flight.
///
/// Carries the record snapshot it was issued against, so a fetch keeps working on the data the
/// user was looking at even if a new file is uploaded meanwhile.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    token: u64,
    person_id: String,
    records: Arc<RecordSet>,
}

impl FetchTicket {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn person_id(&self) -> &str {
        &self.person_id
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }
}

/// Everything needed to draw one Explorer frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub detail: PersonDetail,
    pub surroundings: Surroundings,
}

/// Requests detail and surroundings for the ticket's person concurrently.
pub async fn fetch<S: DataSource>(
    source: &S,
    ticket: &FetchTicket,
) -> Result<FetchOutcome, SourceError> {
    let id = ticket.person_id();
    let records = ticket.records();
    let (detail, surroundings) = futures::future::try_join(
        source.person_detail(id, records),
        source.surroundings(id, records),
    )
    .await?;
    Ok(FetchOutcome {
        detail,
        surroundings,
    })
}

/// What [`Navigator::resolve`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// A newer selection was issued after this ticket; the outcome was dropped.
    Stale,
    Failed,
}

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Shown inline next to the upload control.
    Input(String),
    /// Shown inline next to the upload control.
    Parse(String),
    /// Shown as a blocking alert.
    Fetch(String),
}

impl Notice {
    /// The message without the `Error: ` prefix.
    pub fn message(&self) -> &str {
        match self {
            Notice::Input(msg) | Notice::Parse(msg) | Notice::Fetch(msg) => msg,
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, Notice::Fetch(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Input(msg) => write!(f, "{msg}"),
            Notice::Parse(msg) | Notice::Fetch(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// Display strings for one person card or the detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonCard {
    pub id: String,
    pub name: String,
    pub born: String,
    pub died: String,
}

impl PersonCard {
    fn from_detail(detail: &PersonDetail) -> Self {
        Self {
            id: detail.id.clone(),
            name: detail.display_name().to_string(),
            born: detail.display_birth().to_string(),
            died: detail.display_death().to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Navigator {
    session: Session,
    canvas: Canvas,
    layout_options: LayoutOptions,
    generation: u64,
    pending: Option<FetchTicket>,
    failed_person_id: Option<String>,
    detail: Option<PersonDetail>,
    layout: Option<EgoLayout>,
    scene: Scene,
    notice: Option<Notice>,
    uploading: bool,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Canvas::default(), LayoutOptions::default())
    }
}

impl Navigator {
    pub fn new(canvas: Canvas, layout_options: LayoutOptions) -> Self {
        Self {
            session: Session::default(),
            canvas,
            layout_options,
            generation: 0,
            pending: None,
            failed_person_id: None,
            detail: None,
            layout: None,
            scene: Scene::empty(canvas),
            notice: None,
            uploading: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> View {
        self.session.view
    }

    pub fn records(&self) -> Option<&Arc<RecordSet>> {
        self.session.records.as_ref()
    }

    pub fn centered_person_id(&self) -> Option<&str> {
        self.session.centered_person_id.as_deref()
    }

    pub fn pending(&self) -> Option<&FetchTicket> {
        self.pending.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn layout(&self) -> Option<&EgoLayout> {
        self.layout.as_ref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn upload_enabled(&self) -> bool {
        !self.uploading
    }

    pub fn upload_control_label(&self) -> &'static str {
        if self.uploading {
            UPLOAD_BUSY_LABEL
        } else {
            UPLOAD_LABEL
        }
    }

    /// Starts an upload. Returns the file to parse, or `None` (with an input notice) when no
    /// file was chosen.
    pub fn begin_upload(&mut self, file: Option<RecordFile>) -> Option<RecordFile> {
        let Some(file) = file else {
            self.notice = Some(Notice::Input(NO_FILE_MESSAGE.to_string()));
            return None;
        };
        self.notice = None;
        self.uploading = true;
        tracing::debug!(file = %file.name, "upload started");
        Some(file)
    }

    /// Finishes an upload started with [`Self::begin_upload`].
    ///
    /// Success replaces the whole session and shows the person list; failure keeps the current
    /// view and data and shows a parse notice.
    pub fn finish_upload(&mut self, result: Result<RecordSet, SourceError>) -> bool {
        self.uploading = false;
        match result {
            Ok(records) => {
                self.generation += 1;
                self.pending = None;
                self.failed_person_id = None;
                self.detail = None;
                self.layout = None;
                self.scene.clear();
                self.notice = None;
                self.session = Session {
                    view: View::PersonList,
                    records: Some(Arc::new(records)),
                    centered_person_id: None,
                };
                tracing::info!("record set loaded, showing person list");
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "record file rejected");
                self.notice = Some(Notice::Parse(err.message().to_string()));
                false
            }
        }
    }

    /// Targets `person_id` and returns the ticket to fetch for it.
    ///
    /// Any earlier pending ticket becomes stale. The centered person does not change until the
    /// ticket resolves successfully.
    pub fn select_person(&mut self, person_id: &str) -> Result<FetchTicket, NavigationError> {
        let records = self
            .session
            .records
            .clone()
            .ok_or(NavigationError::NoRecords)?;
        self.generation += 1;
        if let Some(prev) = &self.pending {
            tracing::debug!(
                superseded = %prev.person_id,
                person = person_id,
                "selection superseded"
            );
        }
        let ticket = FetchTicket {
            token: self.generation,
            person_id: person_id.to_string(),
            records,
        };
        self.pending = Some(ticket.clone());
        Ok(ticket)
    }

    /// Selects the person under the point, if the Explorer shows one there.
    pub fn click(&mut self, x: f64, y: f64) -> Option<FetchTicket> {
        if self.session.view != View::Explorer {
            return None;
        }
        let person_id = self.scene.hit_test(x, y)?.to_string();
        self.select_person(&person_id).ok()
    }

    /// Re-issues the most recent selection that failed.
    pub fn retry(&mut self) -> Result<FetchTicket, NavigationError> {
        let person_id = self
            .failed_person_id
            .clone()
            .ok_or(NavigationError::NothingToRetry)?;
        self.select_person(&person_id)
    }

    /// Applies a fetch outcome if `ticket` is still the newest selection.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        result: Result<FetchOutcome, SourceError>,
    ) -> Resolution {
        let current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.token == ticket.token);
        if !current {
            tracing::debug!(
                person = %ticket.person_id,
                token = ticket.token,
                latest = self.generation,
                "discarding stale fetch"
            );
            return Resolution::Stale;
        }
        self.pending = None;

        match result {
            Ok(outcome) => {
                let layout = layout_ego(
                    self.canvas,
                    &outcome.detail.summary(),
                    &outcome.surroundings,
                    &self.layout_options,
                );
                self.scene.redraw(&layout);
                self.layout = Some(layout);
                self.detail = Some(outcome.detail);
                self.failed_person_id = None;
                self.notice = None;
                self.session.centered_person_id = Some(ticket.person_id.clone());
                self.session.view = View::Explorer;
                tracing::debug!(person = %ticket.person_id, "explorer re-centered");
                Resolution::Applied
            }
            Err(err) => {
                tracing::warn!(person = %ticket.person_id, error = %err, "fetch failed");
                self.failed_person_id = Some(ticket.person_id.clone());
                self.notice = Some(Notice::Fetch(err.message().to_string()));
                Resolution::Failed
            }
        }
    }

    /// Leaves the Explorer for the person list, keeping the loaded records.
    pub fn back(&mut self) -> bool {
        if self.session.view != View::Explorer {
            return false;
        }
        self.generation += 1;
        self.pending = None;
        self.failed_person_id = None;
        self.detail = None;
        self.layout = None;
        self.scene.clear();
        self.session.centered_person_id = None;
        self.session.view = View::PersonList;
        tracing::debug!("back to person list");
        true
    }

    /// One card per individual, in file order.
    pub fn person_list(&self) -> Vec<PersonCard> {
        let Some(records) = &self.session.records else {
            return Vec::new();
        };
        records
            .individuals
            .values()
            .map(|p| PersonCard::from_detail(&p.detail()))
            .collect()
    }

    /// The centered person's display fields.
    pub fn detail_panel(&self) -> Option<PersonCard> {
        self.detail.as_ref().map(PersonCard::from_detail)
    }
}
