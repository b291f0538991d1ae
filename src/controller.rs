use std::sync::Arc;

use crate::error::MenuError;
use crate::intake::{Preview, SelectedFile};
use crate::model::Menu;
use crate::render::MenuView;
use crate::service::MenuService;

/// The five regions of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Upload,
    Preview,
    Loading,
    Results,
    Error,
}

/// Top-level region; only one is ever on screen. The preview lives inside `Upload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Upload,
    Loading,
    Results,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    FileSelected,
    Submitting,
    Results,
    Error,
}

/// A file on its way to the analysis service.
#[derive(Debug)]
pub struct PendingUpload {
    file: SelectedFile,
}

impl PendingUpload {
    pub fn file(&self) -> &SelectedFile {
        &self.file
    }

    pub async fn run<S: MenuService + ?Sized>(self, service: &S) -> Result<Menu, MenuError> {
        service.process_menu(self.file).await
    }
}

/// Owns the selected file and decides which panels are visible.
pub struct Controller<S: ?Sized> {
    service: Arc<S>,
    selected: Option<SelectedFile>,
    preview: Option<Preview>,
    section: Section,
    picker_visible: bool,
    state: FlowState,
    /// Set from `begin_submit` until the matching `finish_submit`, whatever
    /// the panels do in between.
    in_flight: bool,
    error: Option<String>,
    results: Option<MenuView>,
}

impl<S: MenuService + ?Sized> Controller<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            selected: None,
            preview: None,
            section: Section::Upload,
            picker_visible: true,
            state: FlowState::Idle,
            in_flight: false,
            error: None,
            results: None,
        }
    }

    pub fn service(&self) -> Arc<S> {
        Arc::clone(&self.service)
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn results(&self) -> Option<&MenuView> {
        self.results.as_ref()
    }

    /// The "choose a file" button inside the upload panel.
    pub fn picker_visible(&self) -> bool {
        self.section == Section::Upload && self.picker_visible
    }

    pub fn is_visible(&self, panel: Panel) -> bool {
        match panel {
            Panel::Upload => self.section == Section::Upload,
            Panel::Preview => self.section == Section::Upload && self.preview.is_some(),
            Panel::Loading => self.section == Section::Loading,
            Panel::Results => self.section == Section::Results,
            Panel::Error => self.section == Section::Error,
        }
    }

    /// File intake. A rejected file is reported on the error panel and the
    /// previous selection, if any, is kept.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), MenuError> {
        if let Err(err) = file.validate() {
            tracing::info!(file = %file.name(), mime = %file.mime(), size = file.size(), %err, "file rejected");
            self.show_error(&err);
            return Err(err);
        }

        tracing::debug!(file = %file.name(), size = file.size(), "file selected");
        self.preview = Some(Preview::of(&file));
        self.selected = Some(file);
        self.section = Section::Upload;
        self.picker_visible = false;
        self.state = FlowState::FileSelected;
        Ok(())
    }

    /// Reports a file that was refused before it could even be read.
    pub fn reject_file(&mut self, err: MenuError) {
        tracing::info!(%err, "file rejected");
        self.show_error(&err);
    }

    /// Hands the selection over for upload and shows the loading panel.
    /// Returns `None` when nothing is selected or an upload is already running.
    pub fn begin_submit(&mut self) -> Option<PendingUpload> {
        if self.in_flight {
            tracing::debug!("upload already in flight, ignoring");
            return None;
        }
        let file = self.selected.take()?;
        self.preview = None;
        self.section = Section::Loading;
        self.state = FlowState::Submitting;
        self.in_flight = true;
        Some(PendingUpload { file })
    }

    /// Applies the outcome of an upload. Whatever finishes last wins.
    pub fn finish_submit(&mut self, outcome: Result<Menu, MenuError>) {
        self.in_flight = false;
        match outcome {
            Ok(menu) => self.show_results(&menu),
            Err(err) => self.show_error(&err),
        }
    }

    pub async fn submit(&mut self) {
        if let Some(pending) = self.begin_submit() {
            let service = self.service();
            let outcome = pending.run(service.as_ref()).await;
            self.finish_submit(outcome);
        }
    }

    fn show_results(&mut self, menu: &Menu) {
        self.results = Some(MenuView::from_menu(menu));
        self.error = None;
        self.section = Section::Results;
        self.state = FlowState::Results;
    }

    fn show_error(&mut self, err: &MenuError) {
        self.error = Some(err.to_string());
        self.section = Section::Error;
        self.state = FlowState::Error;
    }

    /// Cancel from the preview: drop the selection and bring the picker back.
    pub fn soft_reset(&mut self) {
        self.selected = None;
        self.preview = None;
        self.picker_visible = true;
        if self.state == FlowState::FileSelected {
            self.state = FlowState::Idle;
        }
    }

    /// Start over from scratch.
    pub fn full_reset(&mut self) {
        self.selected = None;
        self.preview = None;
        self.picker_visible = true;
        self.error = None;
        self.results = None;
        self.section = Section::Upload;
        self.state = FlowState::Idle;
    }
}
