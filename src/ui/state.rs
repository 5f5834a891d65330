use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::models::{FeedbackRecord, Report, UploadReceipt};

/// Gateway calls the dashboard can have in flight, at most one of each kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LoadFeedback,
    SubmitFeedback,
    DeleteFeedback,
    UploadCsv,
    LoadReport,
    GenerateReport,
    SendEmail,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::LoadFeedback => "Loading feedback",
            Operation::SubmitFeedback => "Submitting feedback",
            Operation::DeleteFeedback => "Deleting feedback",
            Operation::UploadCsv => "Uploading CSV",
            Operation::LoadReport => "Loading report",
            Operation::GenerateReport => "Generating report",
            Operation::SendEmail => "Sending email",
        }
    }
}

/// Results delivered from spawned gateway tasks back to the controller
#[derive(Debug, Clone)]
pub enum StateUpdate {
    FeedbackLoaded(Result<Vec<FeedbackRecord>, String>),
    FeedbackSubmitted(Result<FeedbackRecord, String>),
    FeedbackDeleted { id: i64, result: Result<(), String> },
    CsvUploaded(Result<UploadReceipt, String>),
    ReportLoaded(Result<Option<Report>, String>),
    ReportGenerated(Result<Report, String>),
    EmailSent { email: String, result: Result<(), String> },
}

impl StateUpdate {
    pub fn operation(&self) -> Operation {
        match self {
            StateUpdate::FeedbackLoaded(_) => Operation::LoadFeedback,
            StateUpdate::FeedbackSubmitted(_) => Operation::SubmitFeedback,
            StateUpdate::FeedbackDeleted { .. } => Operation::DeleteFeedback,
            StateUpdate::CsvUploaded(_) => Operation::UploadCsv,
            StateUpdate::ReportLoaded(_) => Operation::LoadReport,
            StateUpdate::ReportGenerated(_) => Operation::GenerateReport,
            StateUpdate::EmailSent { .. } => Operation::SendEmail,
        }
    }
}

/// Application state for async operations
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Idle,
    Executing { operation: Operation, start_time: DateTime<Utc> },
    Error { message: String },
    Success { message: String },
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log message with timestamp
#[derive(Debug, Clone)]
pub struct LogMessage {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

const MAX_LOG_MESSAGES: usize = 100;

/// Tracks which operations are in flight and keeps a short activity log
#[derive(Debug, Clone)]
pub struct OperationTracker {
    pub current_state: AppState,
    pending: HashMap<Operation, DateTime<Utc>>,
    log_messages: Vec<LogMessage>,
}

impl Default for OperationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationTracker {
    pub fn new() -> Self {
        Self {
            current_state: AppState::Idle,
            pending: HashMap::new(),
            log_messages: Vec::new(),
        }
    }

    /// Mark `operation` as started. Returns false if one is already running.
    pub fn start(&mut self, operation: Operation) -> bool {
        if self.pending.contains_key(&operation) {
            return false;
        }
        let now = Utc::now();
        self.pending.insert(operation, now);
        self.current_state = AppState::Executing {
            operation,
            start_time: now,
        };
        self.add_log_message(LogLevel::Info, &format!("Started: {}", operation.label()));
        true
    }

    pub fn complete(&mut self, operation: Operation, result: Result<String, String>) {
        if self.pending.remove(&operation).is_none() {
            return;
        }
        match result {
            Ok(msg) => {
                self.add_log_message(LogLevel::Success, &format!("Completed: {} - {}", operation.label(), msg));
                self.current_state = AppState::Success { message: msg };
            }
            Err(err) => {
                self.add_log_message(LogLevel::Error, &format!("Failed: {} - {}", operation.label(), err));
                self.current_state = AppState::Error { message: err };
            }
        }
        if let Some((&op, &start_time)) = self.pending.iter().next() {
            self.current_state = AppState::Executing {
                operation: op,
                start_time,
            };
        }
    }

    pub fn is_pending(&self, operation: Operation) -> bool {
        self.pending.contains_key(&operation)
    }

    pub fn has_active_operations(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn add_log_message(&mut self, level: LogLevel, message: &str) {
        self.log_messages.push(LogMessage {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
        });
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    /// Get recent log messages (last N)
    pub fn recent_logs(&self, count: usize) -> &[LogMessage] {
        let start = self.log_messages.len().saturating_sub(count);
        &self.log_messages[start..]
    }

    /// Get the current status text for display
    pub fn status_text(&self) -> String {
        match &self.current_state {
            AppState::Idle => "Ready".to_string(),
            AppState::Executing { operation, start_time } => {
                let duration = Utc::now() - *start_time;
                format!("{}... {}s", operation.label(), duration.num_seconds())
            }
            AppState::Error { message } => format!("Error: {}", message),
            AppState::Success { message } => format!("Success: {}", message),
        }
    }
}
