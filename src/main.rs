use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use feedback_dashboard::analysis::{aggregate_stats, sorted_view, SortDirection, SortKey, SortState};
use feedback_dashboard::api::{ApiClient, FeedbackClient, FeedbackGateway, ReportClient, ReportGateway};
use feedback_dashboard::export;
use feedback_dashboard::models::{Config, FeedbackRecord, FeedbackSource, NewFeedback, ThemeMode};
use feedback_dashboard::ui::components::{format_priority, placeholder_number, placeholder_text, truncate};

#[derive(Parser, Debug)]
#[command(name = "feedback-dashboard", version, about = "Terminal dashboard for prioritized customer feedback")]
struct Cli {
    /// Backend base URL, overrides FEEDBACK_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Color palette for the dashboard
    #[arg(long, global = true)]
    theme: Option<ThemeMode>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive dashboard (default)
    Tui,
    /// Print the feedback table
    List {
        /// Column to sort by, e.g. priority, urgency, created
        #[arg(long)]
        sort: Option<SortKey>,
        #[arg(long)]
        ascending: bool,
    },
    /// Print summary statistics
    Stats,
    /// Print one feedback record
    Show { id: i64 },
    /// Submit a single feedback entry
    Submit {
        text: String,
        #[arg(long, default_value = "web")]
        source: FeedbackSource,
    },
    /// Upload a CSV file with text,source columns
    Upload { path: PathBuf },
    /// Delete a feedback record
    Delete { id: i64 },
    /// Print the latest report
    Report {
        /// Generate a new report first
        #[arg(long)]
        generate: bool,
    },
    /// List every generated report
    Reports,
    /// Email the latest report
    Email { address: String },
    /// Export the feedback table to CSV
    Export {
        path: PathBuf,
        #[arg(long)]
        sort: Option<SortKey>,
    },
    /// Check backend health
    Health,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feedback_dashboard=info"))
}

/// The TUI owns the terminal, so its logs go to a file
fn init_file_logging(path: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    let command = cli.command.unwrap_or(Command::Tui);
    if let Command::Tui = command {
        init_file_logging(&config.log_path)?;
        return feedback_dashboard::ui::run_app(config).await;
    }

    init_stderr_logging();
    if let Err(e) = run_command(command, &config).await {
        error!("Command failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run_command(command: Command, config: &Config) -> Result<()> {
    let feedback = FeedbackClient::new(config)?;
    let reports = ReportClient::new(config)?;

    match command {
        Command::Tui => anyhow::bail!("the dashboard is not a headless command"),
        Command::List { sort, ascending } => {
            let records = feedback.list_feedback().await?;
            let direction = if ascending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            let state = sort.map(|key| SortState::new(key, direction)).unwrap_or_default();
            print_table(&sorted_view(&records, &state));
        }
        Command::Stats => {
            let records = feedback.list_feedback().await?;
            let stats = aggregate_stats(&records);
            println!("Total feedback: {}", stats.total);
            println!("Avg urgency:    {}", stats.display_avg_urgency());
            println!("Avg impact:     {}", stats.display_avg_impact());
        }
        Command::Show { id } => {
            let record = feedback.get_feedback(id).await?;
            print_record(&record);
        }
        Command::Submit { text, source } => {
            let text = text.trim().to_string();
            anyhow::ensure!(!text.is_empty(), "Please enter feedback text.");
            let record = feedback.create_feedback(&NewFeedback { text, source }).await?;
            println!("Feedback submitted successfully! (id {})", record.id);
        }
        Command::Upload { path } => {
            let receipt = feedback.upload_csv(&path).await?;
            println!("{}", receipt.message);
        }
        Command::Delete { id } => {
            feedback.delete_feedback(id).await?;
            println!("Deleted feedback {}", id);
        }
        Command::Report { generate } => {
            let report = if generate {
                Some(reports.generate_report().await?)
            } else {
                reports.latest_report().await?
            };
            match report {
                Some(report) => {
                    println!("# Report {} ({})\n", report.id, report.generated_at.to_rfc3339());
                    println!("{}", report.markdown_report);
                }
                None => println!("No report has been generated yet."),
            }
        }
        Command::Reports => {
            for report in reports.list_reports().await? {
                let first_line = report.markdown_report.lines().next().unwrap_or("");
                println!("{:>5}  {}  {}", report.id, report.generated_at.format("%Y-%m-%d %H:%M"), first_line);
            }
        }
        Command::Email { address } => {
            let address = address.trim();
            anyhow::ensure!(!address.is_empty(), "Please enter a valid email address.");
            reports.send_report_email(address).await?;
            println!("Email sent successfully");
        }
        Command::Export { path, sort } => {
            let records = feedback.list_feedback().await?;
            let state = sort
                .map(|key| SortState::new(key, SortDirection::Descending))
                .unwrap_or_default();
            let count = export::export_to_file(&path, &sorted_view(&records, &state))?;
            info!("Exported {} rows to {}", count, path.display());
            println!("Exported {} rows to {}", count, path.display());
        }
        Command::Health => {
            let api = ApiClient::new(config)?;
            let health = api.health().await?;
            println!("backend:        {}", api.base_url());
            println!("status:         {}", health.status);
            println!("database:       {}", health.database);
            println!("llm configured: {}", health.llm_configured);
            println!("timestamp:      {}", health.timestamp);
        }
    }
    Ok(())
}

fn print_table(records: &[&FeedbackRecord]) {
    println!(
        "{:>5}  {:<40}  {:<8}  {:<13}  {:<16}  {:>3}  {:>3}  {:>8}",
        "ID", "Feedback", "Source", "Sentiment", "Theme", "Urg", "Imp", "Priority"
    );
    for record in records {
        println!(
            "{:>5}  {:<40}  {:<8}  {:<13}  {:<16}  {:>3}  {:>3}  {:>8}",
            record.id,
            truncate(&record.text, 40),
            truncate(&record.source, 8),
            placeholder_text(record.sentiment.map(|s| s.as_str())),
            truncate(placeholder_text(record.theme.as_deref()), 16),
            placeholder_number(record.urgency),
            placeholder_number(record.impact),
            format_priority(record.priority_score),
        );
    }
}

fn print_record(record: &FeedbackRecord) {
    println!("Feedback #{} ({}, {})", record.id, record.source, record.created_at.to_rfc3339());
    println!("{}\n", record.text);
    println!("Sentiment:     {}", placeholder_text(record.sentiment.map(|s| s.as_str())));
    println!("Theme:         {}", placeholder_text(record.theme.as_deref()));
    println!("Summary:       {}", placeholder_text(record.summary.as_deref()));
    println!("Justification: {}", placeholder_text(record.justification.as_deref()));
    println!("Urgency:       {}", placeholder_number(record.urgency));
    println!("Impact:        {}", placeholder_number(record.impact));
    println!("Priority:      {}", format_priority(record.priority_score));
}
