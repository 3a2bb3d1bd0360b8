// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use report_card::config::AppConfig;
use report_card::grading::{self, Marks, Subject};
use report_card::logging;
use report_card::record::StudentRecord;
use report_card::report;

#[derive(Parser)]
#[command(name = "report-card", version, about = "Student report card generator")]
struct Cli {
    /// Config file path (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for saved report cards
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive form (default)
    Tui,

    /// Print total, percentage and grade for a set of marks
    Grade {
        /// Marks for Math,Physics,Urdu,English,Computer (e.g. "90,85,70,88,95")
        #[arg(long)]
        marks: String,
    },

    /// Render one report card PDF
    Render {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        roll: String,

        /// Marks for Math,Physics,Urdu,English,Computer
        #[arg(long)]
        marks: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?.with_output_dir(cli.output_dir);

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => run_ui_mode(&config)?,
        Commands::Grade { marks } => {
            logging::init_stderr(&config.log_filter)?;
            run_grade(&marks)?;
        }
        Commands::Render { name, roll, marks } => {
            logging::init_stderr(&config.log_filter)?;
            run_render(&config, name, roll, &marks)?;
        }
    }

    Ok(())
}

fn run_grade(marks: &str) -> Result<()> {
    let marks = Marks::parse_list(marks).context("Invalid marks")?;
    let summary = grading::compute(&marks);

    for subject in Subject::ALL {
        println!("{:<10} {:>3}", subject.as_str(), marks.get(subject));
    }
    println!("━━━━━━━━━━━━━━");
    println!("Total Marks: {}", summary.total_marks);
    println!("Percentage:  {}%", grading::format_percentage(summary.percentage));
    println!("Grade:       {}", summary.grade);

    Ok(())
}

fn run_render(config: &AppConfig, name: String, roll: String, marks: &str) -> Result<()> {
    let marks = Marks::parse_list(marks).context("Invalid marks")?;
    let record = StudentRecord::new(name, roll, marks);

    let path = report::save_report(&record, &config.output_dir)
        .with_context(|| format!("Failed to save report for {}", record.name))?;

    println!(
        "✓ {} ({} / {}%, grade {})",
        path.display(),
        record.total_marks,
        grading::format_percentage(record.percentage),
        record.grade
    );

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig) -> Result<()> {
    let log_path = logging::init_file(&config.log_filter, &config.output_dir)?;

    println!("🖥️  Loading Student Report Card UI...");
    println!("   Logs: {}\n", log_path.display());

    let mut app = ui::App::new(config.output_dir.clone());
    ui::run_ui(&mut app)?;

    println!("\n✅ Session closed ({} records discarded)", app.session.store().len());

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use web UI: cargo run --bin report-card-server --features server");
    std::process::exit(1);
}
