// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::env;
use std::io;

use warehouse_inventory::{
    expired_report, faker, full_report, logging, parse_date, Config, LoadReport,
    Session, Shell,
};

fn main() -> Result<()> {
    logging::init();

    let config = Config::from_env().context("Invalid INVENTORY_* configuration")?;
    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None | Some("shell") => run_shell(config)?,
        Some("generate") => run_generate(config, args.get(1))?,
        Some("report") => run_report(config)?,
        Some("expired") => run_expired(config, args.get(1))?,
        Some("export-pdf") => run_export_pdf(config)?,
        Some("browse") => run_browse(config)?,
        Some("help") | Some("--help") | Some("-h") => print_usage(),
        Some(other) => {
            print_usage();
            bail!("unknown command '{}'", other);
        }
    }

    Ok(())
}

fn print_usage() {
    println!("warehouse-inventory {}", warehouse_inventory::VERSION);
    println!();
    println!("Usage: warehouse-inventory [COMMAND]");
    println!();
    println!("  shell              Interactive menu (default)");
    println!("  generate [N]       Replace the data file with N fake records");
    println!("  report             Print the full inventory report");
    println!("  expired [DATE]     Print items expired before DATE (default: today)");
    println!("  export-pdf         Write the PDF report");
    println!("  browse             Full-screen record browser");
    println!();
    println!("Environment: INVENTORY_FILE, INVENTORY_PDF, INVENTORY_DUPLICATES, INVENTORY_FAKE_RECORDS, RUST_LOG");
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn open_session(config: Config) -> Result<Session> {
    let path = config.data_file.clone();
    let (session, report) =
        Session::open(config).with_context(|| format!("Failed to load {}", path.display()))?;
    print_skipped(&report);
    Ok(session)
}

fn print_skipped(report: &LoadReport) {
    if report.is_clean() {
        return;
    }
    eprintln!("⚠️  Skipped {} malformed row(s):", report.skipped.len());
    for row in &report.skipped {
        eprintln!("   line {}: {}", row.line, row.reason);
    }
}

fn run_shell(config: Config) -> Result<()> {
    let session = open_session(config)?;
    println!("📦 Loaded {} item(s)", session.inventory().len());

    let stdin = io::stdin();
    let mut shell = Shell::new(session, stdin.lock(), io::stdout());
    shell.run().context("Terminal I/O failed")?;
    Ok(())
}

fn run_generate(config: Config, count: Option<&String>) -> Result<()> {
    let count = match count {
        Some(n) => n
            .parse::<usize>()
            .with_context(|| format!("Record count must be a whole number, got '{}'", n))?,
        None => config.fake_records,
    };

    let inventory = faker::write_fake_inventory(count, &config.data_file, today())
        .with_context(|| format!("Failed to write {}", config.data_file.display()))?;
    println!(
        "✓ Generated {} fake records and saved to {}.",
        inventory.len(),
        config.data_file.display()
    );
    Ok(())
}

fn run_report(config: Config) -> Result<()> {
    let session = open_session(config)?;
    println!("{}", full_report(&session.inventory().list_all(), today()));
    Ok(())
}

fn run_expired(config: Config, as_of: Option<&String>) -> Result<()> {
    let as_of = match as_of {
        Some(text) => parse_date(text).context("Invalid cutoff date")?,
        None => today(),
    };
    let session = open_session(config)?;
    println!("{}", expired_report(&session.inventory().list_all(), as_of));
    Ok(())
}

fn run_export_pdf(config: Config) -> Result<()> {
    let session = open_session(config)?;
    let pages = session
        .export_pdf(Local::now().naive_local())
        .context("PDF export failed")?;
    println!(
        "✓ Report exported to {} ({} page(s)).",
        session.config().pdf_file.display(),
        pages
    );
    Ok(())
}

#[cfg(feature = "tui")]
fn run_browse(config: Config) -> Result<()> {
    let (inventory, report) = warehouse_inventory::load(&config.data_file, config.duplicate_policy)
        .with_context(|| format!("Failed to load {}", config.data_file.display()))?;
    print_skipped(&report);

    let mut app = ui::App::new(inventory.list_all(), today());
    ui::run_ui(&mut app)?;

    println!("\n✅ Browser closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_browse(_config: Config) -> Result<()> {
    eprintln!("❌ Browser not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
