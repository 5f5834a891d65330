use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::api::{FeedbackClient, ReportClient};
use crate::models::Config;
use crate::ui::controller::{DashboardController, FormField, InputField, Mode, Tab};
use crate::ui::dashboard::{DashboardView, SORT_SHORTCUTS};
use crate::ui::layout::TuiLayout;
use crate::ui::reports::ReportsView;
use crate::ui::submit::SubmitView;
use crate::ui::theme::Palette;
use crate::ui::view::View;

pub const DEFAULT_EXPORT_PATH: &str = "feedback_export.csv";
const MAX_EVENTS_PER_CYCLE: usize = 10;

/// Terminal front end: routes keys to the controller and draws the active view
pub struct DashboardApp {
    pub controller: DashboardController,
    pub palette: Palette,
    pub should_quit: bool,
    pub export_path: PathBuf,
}

impl DashboardApp {
    pub fn new(controller: DashboardController, palette: Palette) -> Self {
        Self {
            controller,
            palette,
            should_quit: false,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }

    /// Admin sees the selected tab, user mode only ever shows the form
    pub fn active_tab(&self) -> Tab {
        match self.controller.mode {
            Mode::Admin => self.controller.tab,
            Mode::User => Tab::Upload,
        }
    }

    fn active_view(&self) -> &'static dyn View {
        match self.active_tab() {
            Tab::Dashboard => &DashboardView,
            Tab::Upload => &SubmitView,
            Tab::Reports => &ReportsView,
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        let layout = TuiLayout::new(f.area());
        let view = self.active_view();

        let (titles, selected, mode_label): (Vec<&'static str>, usize, &str) = match self.controller.mode {
            Mode::Admin => (Tab::ALL.iter().map(Tab::title).collect(), self.controller.tab.index(), "Admin"),
            Mode::User => (vec!["Submit Feedback"], 0, "User"),
        };
        layout.render_tab_bar(f, &titles, selected, mode_label, &self.palette);

        view.render(f, layout.content, &self.controller, &self.palette);

        layout.render_status_bar(
            f,
            &view.key_hints(&self.controller),
            &self.controller.tracker.status_text(),
            &self.palette,
        );
    }

    pub fn handle_key_event(&mut self, key: KeyCode) -> Result<()> {
        if let Some(field) = self.controller.editing {
            self.handle_editing_key(field, key);
            return Ok(());
        }

        if self.controller.pending_delete.is_some() {
            let confirmed = matches!(key, KeyCode::Char('y') | KeyCode::Char('Y'));
            self.controller.confirm_delete(confirmed);
            return Ok(());
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                info!("Quit requested");
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Tab => {
                self.controller.next_tab();
                return Ok(());
            }
            KeyCode::BackTab => {
                self.controller.previous_tab();
                return Ok(());
            }
            KeyCode::Char('m') => {
                self.controller.toggle_mode();
                return Ok(());
            }
            KeyCode::Char('t') => {
                self.palette = self.palette.toggled();
                return Ok(());
            }
            _ => {}
        }

        debug!("Routing key {:?} to {:?}", key, self.active_tab());
        match self.active_tab() {
            Tab::Dashboard => self.handle_dashboard_key(key),
            Tab::Upload => self.handle_form_key(key),
            Tab::Reports => self.handle_reports_key(key),
        }
        Ok(())
    }

    fn handle_editing_key(&mut self, field: InputField, key: KeyCode) {
        match key {
            KeyCode::Esc => self.controller.stop_editing(),
            KeyCode::Enter => {
                self.controller.stop_editing();
                match field {
                    InputField::FeedbackText => {
                        self.controller.submit_feedback();
                    }
                    InputField::CsvPath => {
                        self.controller.upload_csv();
                    }
                    InputField::Email => {
                        self.controller.send_report_email();
                    }
                }
            }
            KeyCode::Backspace => {
                self.controller.input_mut(field).pop();
            }
            KeyCode::Char(c) => self.controller.input_mut(field).push(c),
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Down | KeyCode::Char('j') => self.controller.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.controller.select_previous(),
            KeyCode::Char('0') => self.controller.reset_sort(),
            KeyCode::Char('r') => {
                self.controller.refresh_feedback();
            }
            KeyCode::Char('d') | KeyCode::Delete => self.controller.request_delete_selected(),
            KeyCode::Char('x') => {
                // Failures are already reported as a notice.
                let path = self.export_path.clone();
                let _ = self.controller.export_view(&path);
            }
            KeyCode::Char(c) => {
                if let Some((_, sort_key)) = SORT_SHORTCUTS.iter().find(|(shortcut, _)| *shortcut == c) {
                    self.controller.toggle_sort(*sort_key);
                }
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        let focus = self.controller.form.focus;
        match key {
            KeyCode::Down => self.controller.focus_next_field(),
            KeyCode::Up => self.controller.focus_previous_field(),
            KeyCode::Left if focus == FormField::Source => {
                self.controller.form.source = self.controller.form.source.previous();
            }
            KeyCode::Right if focus == FormField::Source => {
                self.controller.form.source = self.controller.form.source.next();
            }
            KeyCode::Enter => match focus {
                FormField::Text => self.controller.start_editing(InputField::FeedbackText),
                FormField::CsvPath => self.controller.start_editing(InputField::CsvPath),
                FormField::Source => self.controller.form.source = self.controller.form.source.next(),
            },
            KeyCode::Char('s') => {
                self.controller.submit_feedback();
            }
            KeyCode::Char('u') if self.controller.mode == Mode::Admin => {
                self.controller.upload_csv();
            }
            _ => {}
        }
    }

    fn handle_reports_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('g') => {
                self.controller.generate_report();
            }
            KeyCode::Char('r') => {
                self.controller.fetch_latest_report();
            }
            KeyCode::Char('e') => self.controller.start_editing(InputField::Email),
            KeyCode::Down | KeyCode::Char('j') => {
                self.controller.report_scroll = self.controller.report_scroll.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.controller.report_scroll = self.controller.report_scroll.saturating_sub(1);
            }
            KeyCode::PageDown => {
                self.controller.report_scroll = self.controller.report_scroll.saturating_add(10);
            }
            KeyCode::PageUp => {
                self.controller.report_scroll = self.controller.report_scroll.saturating_sub(10);
            }
            KeyCode::Home => self.controller.report_scroll = 0,
            _ => {}
        }
    }
}

/// Run the terminal dashboard until the user quits
pub async fn run_app(config: Config) -> Result<()> {
    let feedback = FeedbackClient::new(&config).context("Failed to build feedback client")?;
    let reports = ReportClient::new(&config).context("Failed to build report client")?;
    let mut controller = DashboardController::new(Arc::new(feedback), Arc::new(reports), config.auto_report_threshold);
    controller.mount();

    let mut app = DashboardApp::new(controller, Palette::for_mode(config.theme));
    info!("Starting dashboard against {}", config.api_url);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut app, &mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(app: &mut DashboardApp, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    loop {
        let mut events_processed = false;
        let mut event_count = 0;

        while event_count < MAX_EVENTS_PER_CYCLE && event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                app.handle_key_event(key_event.code)?;
                events_processed = true;
                event_count += 1;
                if app.should_quit {
                    break;
                }
            }
        }

        if app.should_quit {
            info!("Dashboard closed");
            return Ok(());
        }

        app.controller.drain_updates();
        terminal.draw(|f| app.draw(f))?;

        let delay_ms = if events_processed { 8 } else { 16 };
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
