use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::analysis::{aggregate_stats, sorted_view, SortKey, SortState, SummaryStats};
use crate::api::{FeedbackGateway, ReportGateway};
use crate::export;
use crate::models::{FeedbackRecord, FeedbackSource, NewFeedback, Report};
use crate::ui::state::{Operation, OperationTracker, StateUpdate};

/// Top-level audience of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Admin,
    User,
}

/// Admin tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Upload,
    Reports,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Dashboard, Tab::Upload, Tab::Reports];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Upload => "Upload Feedback",
            Tab::Reports => "Reports",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Focusable rows of the submission form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Text,
    Source,
    CsvPath,
}

/// Text inputs that can capture typing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    FeedbackText,
    CsvPath,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Inline message shown after a user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, text: text.into() }
    }
}

/// Single entry and CSV upload inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionForm {
    pub text: String,
    pub source: FeedbackSource,
    pub csv_path: String,
    pub focus: FormField,
}

impl Default for SubmissionForm {
    fn default() -> Self {
        Self {
            text: String::new(),
            source: FeedbackSource::default(),
            csv_path: String::new(),
            focus: FormField::Text,
        }
    }
}

/// Owns the dashboard state and issues gateway calls.
///
/// Every call runs on a spawned task and reports back through an mpsc channel;
/// only the controller mutates state, in [`DashboardController::apply`].
pub struct DashboardController {
    feedback_gateway: Arc<dyn FeedbackGateway>,
    report_gateway: Arc<dyn ReportGateway>,
    updates_tx: mpsc::UnboundedSender<StateUpdate>,
    updates_rx: mpsc::UnboundedReceiver<StateUpdate>,
    auto_report_threshold: usize,
    reload_queued: bool,

    pub tracker: OperationTracker,
    pub mode: Mode,
    pub tab: Tab,
    pub feedback: Vec<FeedbackRecord>,
    pub feedback_loaded: bool,
    /// Last list failure, cleared by the next successful load
    pub load_error: Option<String>,
    pub sort: SortState,
    pub selected: usize,
    pub pending_delete: Option<i64>,
    pub report: Option<Report>,
    pub report_scroll: u16,
    pub form: SubmissionForm,
    pub email: String,
    pub editing: Option<InputField>,
    pub notice: Option<Notice>,
}

impl DashboardController {
    pub fn new(
        feedback_gateway: Arc<dyn FeedbackGateway>,
        report_gateway: Arc<dyn ReportGateway>,
        auto_report_threshold: usize,
    ) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            feedback_gateway,
            report_gateway,
            updates_tx,
            updates_rx,
            auto_report_threshold,
            reload_queued: false,
            tracker: OperationTracker::new(),
            mode: Mode::Admin,
            tab: Tab::Dashboard,
            feedback: Vec::new(),
            feedback_loaded: false,
            load_error: None,
            sort: SortState::default(),
            selected: 0,
            pending_delete: None,
            report: None,
            report_scroll: 0,
            form: SubmissionForm::default(),
            email: String::new(),
            editing: None,
            notice: None,
        }
    }

    /// Initial fetch of feedback and the latest report
    pub fn mount(&mut self) {
        self.refresh_feedback();
        self.fetch_latest_report();
    }

    fn spawn_operation<F>(&mut self, operation: Operation, task: F) -> bool
    where
        F: Future<Output = StateUpdate> + Send + 'static,
    {
        if !self.tracker.start(operation) {
            debug!("{} already in flight, ignoring request", operation.label());
            return false;
        }
        let tx = self.updates_tx.clone();
        tokio::spawn(async move {
            // The receiver lives as long as the controller.
            let _ = tx.send(task.await);
        });
        true
    }

    // ---- gateway actions -------------------------------------------------

    pub fn refresh_feedback(&mut self) -> bool {
        if self.tracker.is_pending(Operation::LoadFeedback) {
            self.reload_queued = true;
            return false;
        }
        let gateway = self.feedback_gateway.clone();
        self.spawn_operation(Operation::LoadFeedback, async move {
            StateUpdate::FeedbackLoaded(gateway.list_feedback().await.map_err(|e| e.to_string()))
        })
    }

    /// Submit the form's text. Blank text issues no request.
    pub fn submit_feedback(&mut self) -> bool {
        let text = self.form.text.trim().to_string();
        if text.is_empty() {
            self.notice = Some(Notice::error("Please enter feedback text."));
            return false;
        }
        let body = NewFeedback {
            text,
            source: self.form.source,
        };
        let gateway = self.feedback_gateway.clone();
        self.spawn_operation(Operation::SubmitFeedback, async move {
            StateUpdate::FeedbackSubmitted(gateway.create_feedback(&body).await.map_err(|e| e.to_string()))
        })
    }

    /// Ask for confirmation before deleting the selected row
    pub fn request_delete_selected(&mut self) {
        if let Some(id) = self.selected_record().map(|r| r.id) {
            self.pending_delete = Some(id);
        }
    }

    pub fn confirm_delete(&mut self, confirmed: bool) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        if !confirmed {
            return false;
        }
        self.delete_feedback(id)
    }

    pub fn delete_feedback(&mut self, id: i64) -> bool {
        let gateway = self.feedback_gateway.clone();
        self.spawn_operation(Operation::DeleteFeedback, async move {
            StateUpdate::FeedbackDeleted {
                id,
                result: gateway.delete_feedback(id).await.map_err(|e| e.to_string()),
            }
        })
    }

    /// Upload the selected CSV. Only checks that a path was given.
    pub fn upload_csv(&mut self) -> bool {
        let path = self.form.csv_path.trim();
        if path.is_empty() {
            self.notice = Some(Notice::error("Please select a CSV file first."));
            return false;
        }
        let path = PathBuf::from(path);
        let gateway = self.feedback_gateway.clone();
        self.spawn_operation(Operation::UploadCsv, async move {
            StateUpdate::CsvUploaded(gateway.upload_csv(&path).await.map_err(|e| e.to_string()))
        })
    }

    pub fn fetch_latest_report(&mut self) -> bool {
        let gateway = self.report_gateway.clone();
        self.spawn_operation(Operation::LoadReport, async move {
            StateUpdate::ReportLoaded(gateway.latest_report().await.map_err(|e| e.to_string()))
        })
    }

    pub fn generate_report(&mut self) -> bool {
        let gateway = self.report_gateway.clone();
        let started = self.spawn_operation(Operation::GenerateReport, async move {
            StateUpdate::ReportGenerated(gateway.generate_report().await.map_err(|e| e.to_string()))
        });
        if started {
            self.notice = Some(Notice::info("Generating report..."));
        }
        started
    }

    pub fn send_report_email(&mut self) -> bool {
        let email = self.email.trim().to_string();
        if email.is_empty() {
            self.notice = Some(Notice::error("Please enter a valid email address."));
            return false;
        }
        let gateway = self.report_gateway.clone();
        self.spawn_operation(Operation::SendEmail, async move {
            let result = gateway.send_report_email(&email).await.map_err(|e| e.to_string());
            StateUpdate::EmailSent { email, result }
        })
    }

    /// Write the current table order to a CSV file
    pub fn export_view(&mut self, path: &Path) -> anyhow::Result<usize> {
        let result = export::export_to_file(path, &self.sorted_feedback());
        match result {
            Ok(count) => {
                info!("Exported {} rows to {}", count, path.display());
                self.notice = Some(Notice::success(format!("Exported {} rows to {}", count, path.display())));
                Ok(count)
            }
            Err(e) => {
                error!("Export failed: {:#}", e);
                self.notice = Some(Notice::error("Failed to export feedback"));
                Err(e)
            }
        }
    }

    // ---- update handling -------------------------------------------------

    /// Apply every update that has already arrived
    pub fn drain_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.updates_rx.try_recv() {
            self.apply(update);
            applied += 1;
        }
        applied
    }

    /// Wait for the next update and apply it
    pub async fn process_next_update(&mut self) -> bool {
        match self.updates_rx.recv().await {
            Some(update) => {
                self.apply(update);
                true
            }
            None => false,
        }
    }

    pub fn apply(&mut self, update: StateUpdate) {
        let operation = update.operation();
        match update {
            StateUpdate::FeedbackLoaded(Ok(records)) => {
                self.tracker.complete(operation, Ok(format!("{} records", records.len())));
                self.feedback = records;
                self.feedback_loaded = true;
                self.load_error = None;
                self.clamp_selection();
            }
            StateUpdate::FeedbackLoaded(Err(e)) => {
                error!("Error fetching feedback: {}", e);
                self.load_error = Some(e.clone());
                self.tracker.complete(operation, Err(e));
                self.notice = Some(Notice::error("Failed to load feedback"));
            }
            StateUpdate::FeedbackSubmitted(Ok(record)) => {
                self.tracker.complete(operation, Ok(format!("feedback {}", record.id)));
                self.notice = Some(Notice::success("Feedback submitted successfully!"));
                self.form.text.clear();
                let count_before = self.feedback.len();
                self.refresh_feedback();
                if self.auto_report_threshold > 0 && count_before + 1 >= self.auto_report_threshold {
                    info!("Feedback count reached {}, regenerating report", count_before + 1);
                    self.generate_report();
                }
            }
            StateUpdate::FeedbackSubmitted(Err(e)) => {
                error!("Error submitting feedback: {}", e);
                self.tracker.complete(operation, Err(e));
                self.notice = Some(Notice::error("Failed to submit feedback"));
            }
            StateUpdate::FeedbackDeleted { id, result: Ok(()) } => {
                self.tracker.complete(operation, Ok(format!("feedback {}", id)));
                self.notice = Some(Notice::success(format!("Deleted feedback {}", id)));
                self.refresh_feedback();
            }
            StateUpdate::FeedbackDeleted { id, result: Err(e) } => {
                error!("Error deleting feedback {}: {}", id, e);
                self.tracker.complete(operation, Err(e));
                self.notice = Some(Notice::error("Failed to delete feedback. Please try again."));
            }
            StateUpdate::CsvUploaded(Ok(receipt)) => {
                self.tracker.complete(operation, Ok(receipt.message.clone()));
                self.notice = Some(Notice::success(receipt.message));
                self.form.csv_path.clear();
                self.refresh_feedback();
            }
            StateUpdate::CsvUploaded(Err(e)) => {
                error!("Error uploading CSV: {}", e);
                self.tracker.complete(operation, Err(e));
                self.notice = Some(Notice::error("Error uploading CSV file"));
            }
            StateUpdate::ReportLoaded(Ok(report)) => {
                let msg = match &report {
                    Some(r) => format!("report {}", r.id),
                    None => "no report yet".to_string(),
                };
                self.tracker.complete(operation, Ok(msg));
                self.report = report;
                self.report_scroll = 0;
            }
            StateUpdate::ReportLoaded(Err(e)) => {
                warn!("Error fetching latest report: {}", e);
                self.tracker.complete(operation, Err(e));
                self.notice = Some(Notice::error("Failed to load the latest report"));
            }
            StateUpdate::ReportGenerated(Ok(report)) => {
                self.tracker.complete(operation, Ok(format!("report {}", report.id)));
                self.notice = Some(Notice::success("Report generated"));
                self.report = Some(report);
                self.report_scroll = 0;
            }
            StateUpdate::ReportGenerated(Err(e)) => {
                error!("Error generating report: {}", e);
                self.tracker.complete(operation, Err(e));
                self.notice = Some(Notice::error("Error generating report"));
            }
            StateUpdate::EmailSent { email, result: Ok(()) } => {
                self.tracker.complete(operation, Ok(format!("sent to {}", email)));
                self.notice = Some(Notice::success("Email sent successfully"));
            }
            StateUpdate::EmailSent { email, result: Err(e) } => {
                error!("Error sending report to {}: {}", email, e);
                self.tracker.complete(operation, Err(e));
                self.notice = Some(Notice::error("Failed to send email"));
            }
        }

        if operation == Operation::LoadFeedback && self.reload_queued {
            self.reload_queued = false;
            self.refresh_feedback();
        }
    }

    // ---- view model access ----------------------------------------------

    pub fn sorted_feedback(&self) -> Vec<&FeedbackRecord> {
        sorted_view(&self.feedback, &self.sort)
    }

    pub fn selected_record(&self) -> Option<&FeedbackRecord> {
        self.sorted_feedback().get(self.selected).copied()
    }

    pub fn stats(&self) -> SummaryStats {
        aggregate_stats(&self.feedback)
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort.toggle(key);
    }

    pub fn reset_sort(&mut self) {
        self.sort = SortState::default();
    }

    pub fn select_next(&mut self) {
        if !self.feedback.is_empty() {
            self.selected = (self.selected + 1) % self.feedback.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.feedback.is_empty() {
            self.selected = if self.selected == 0 { self.feedback.len() - 1 } else { self.selected - 1 };
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.feedback.len().saturating_sub(1));
    }

    pub fn is_busy(&self, operation: Operation) -> bool {
        self.tracker.is_pending(operation)
    }

    // ---- mode / tabs / inputs --------------------------------------------

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            Mode::Admin => Mode::User,
            Mode::User => Mode::Admin,
        };
        self.editing = None;
        if self.mode == Mode::User && self.form.focus == FormField::CsvPath {
            self.form.focus = FormField::Text;
        }
    }

    pub fn next_tab(&mut self) {
        if self.mode == Mode::Admin {
            self.tab = self.tab.next();
            self.editing = None;
        }
    }

    pub fn previous_tab(&mut self) {
        if self.mode == Mode::Admin {
            self.tab = self.tab.previous();
            self.editing = None;
        }
    }

    /// Form rows available in the current mode
    pub fn form_fields(&self) -> &'static [FormField] {
        match self.mode {
            Mode::Admin => &[FormField::Text, FormField::Source, FormField::CsvPath],
            Mode::User => &[FormField::Text, FormField::Source],
        }
    }

    pub fn focus_next_field(&mut self) {
        let fields = self.form_fields();
        let idx = fields.iter().position(|f| *f == self.form.focus).unwrap_or(0);
        self.form.focus = fields[(idx + 1) % fields.len()];
    }

    pub fn focus_previous_field(&mut self) {
        let fields = self.form_fields();
        let idx = fields.iter().position(|f| *f == self.form.focus).unwrap_or(0);
        self.form.focus = fields[(idx + fields.len() - 1) % fields.len()];
    }

    pub fn input_mut(&mut self, field: InputField) -> &mut String {
        match field {
            InputField::FeedbackText => &mut self.form.text,
            InputField::CsvPath => &mut self.form.csv_path,
            InputField::Email => &mut self.email,
        }
    }

    pub fn start_editing(&mut self, field: InputField) {
        self.editing = Some(field);
    }

    pub fn stop_editing(&mut self) {
        self.editing = None;
    }
}
