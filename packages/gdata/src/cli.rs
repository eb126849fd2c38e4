//! Command-line interface for the GData client.

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::auth::Credentials;
use crate::config::{
    ClientConfig, SPREADSHEETS_HOST, SPREADSHEETS_SERVICE, WEBMASTER_TOOLS_HOST,
    WEBMASTER_TOOLS_SERVICE,
};
use crate::error::Result;
use crate::http::{create_client, HttpTransport};
use crate::pagination::WalkOptions;
use crate::spreadsheet::{Spreadsheet, DEFAULT_WORKSHEET_ID};
use crate::webmaster::WebmasterTools;

/// GData client - query Webmaster Tools and Spreadsheets feeds.
///
/// Credentials are read from GDATA_EMAIL and GDATA_PASSWORD.
#[derive(Parser)]
#[command(name = "gdata")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all sites on the account.
    Sites,

    /// Show one site.
    Site {
        /// Site URL (e.g., http://www.example.com/)
        site_id: String,
    },

    /// Add a site to the account.
    AddSite {
        /// Site URL
        url: String,
    },

    /// Remove a site from the account.
    DeleteSite {
        /// Site URL
        site_id: String,
    },

    /// Request ownership verification for a site.
    VerifySite {
        /// Site URL
        site_id: String,

        /// Verification method
        #[arg(short, long, value_enum)]
        method: VerificationMethod,
    },

    /// List keywords for a site.
    Keywords {
        /// Site URL
        site_id: String,
    },

    /// List all crawl issues for a site, following every result page.
    CrawlIssues {
        /// Site URL
        site_id: String,
    },

    /// Print the value of a spreadsheet cell.
    Cell {
        /// Spreadsheet key
        key: String,

        /// Cell reference (e.g., R1C1)
        cell: String,

        /// Worksheet number
        #[arg(short, long, default_value_t = DEFAULT_WORKSHEET_ID)]
        worksheet: u32,
    },

    /// Write a value into a spreadsheet cell.
    SetCell {
        /// Spreadsheet key
        key: String,

        /// Cell reference (e.g., R1C1)
        cell: String,

        /// Value to store
        value: String,

        /// Store the value as a formula
        #[arg(short, long)]
        formula: bool,

        /// Worksheet number
        #[arg(short, long, default_value_t = DEFAULT_WORKSHEET_ID)]
        worksheet: u32,
    },
}

/// Site ownership verification methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VerificationMethod {
    Htmlpage,
    Metatag,
}

impl VerificationMethod {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Htmlpage => "htmlpage",
            Self::Metatag => "metatag",
        }
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sites => print_json(&webmaster_tools()?.sites()?),
        Commands::Site { site_id } => print_json(&webmaster_tools()?.site(&site_id)?),
        Commands::AddSite { url } => print_json(&webmaster_tools()?.add_site(&url)?),
        Commands::DeleteSite { site_id } => {
            webmaster_tools()?.delete_site(&site_id)?;
            eprintln!("{} {}", style("Deleted").green().bold(), site_id);
            Ok(())
        }
        Commands::VerifySite { site_id, method } => verify_site_command(&site_id, method),
        Commands::Keywords { site_id } => print_json(&webmaster_tools()?.keywords(&site_id)?),
        Commands::CrawlIssues { site_id } => crawl_issues_command(&site_id),
        Commands::Cell {
            key,
            cell,
            worksheet,
        } => cell_command(&key, &cell, worksheet),
        Commands::SetCell {
            key,
            cell,
            value,
            formula,
            worksheet,
        } => set_cell_command(&key, &cell, &value, formula, worksheet),
    }
}

/// Build a logged-in transport for `service`.
fn login(config: &ClientConfig, host: &str, service: &str) -> Result<HttpTransport> {
    let mut transport = HttpTransport::with_client(create_client(config.timeout)?, host, service);
    transport.authenticate(&Credentials::from(config))?;
    Ok(transport)
}

/// Logged-in Webmaster Tools client configured from the environment.
fn webmaster_tools() -> Result<WebmasterTools<HttpTransport>> {
    let config = ClientConfig::from_env()?;
    let transport = login(&config, WEBMASTER_TOOLS_HOST, WEBMASTER_TOOLS_SERVICE)?;
    Ok(WebmasterTools::new(transport).with_walk_options(WalkOptions {
        max_pages: config.max_pages,
    }))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn verify_site_command(site_id: &str, method: VerificationMethod) -> Result<()> {
    let verified = webmaster_tools()?.verify_site(site_id, method.as_str())?;
    if verified {
        eprintln!("{} {}", style("Verified").green().bold(), site_id);
    } else {
        eprintln!("{} {}", style("Not verified").yellow().bold(), site_id);
    }
    print_json(&verified)
}

fn crawl_issues_command(site_id: &str) -> Result<()> {
    let wt = webmaster_tools()?;

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(format!("Fetching crawl issues for {site_id}..."));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let issues = match wt.crawl_issues(site_id) {
        Ok(issues) => issues,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    eprintln!(
        "{} {} crawl issues",
        style("Found").bold(),
        style(issues.len()).cyan()
    );
    print_json(&issues)
}

fn cell_command(key: &str, cell: &str, worksheet: u32) -> Result<()> {
    // Public sheets are readable without credentials.
    let mut sheet = match ClientConfig::from_env() {
        Ok(config) => Spreadsheet::new(login(&config, SPREADSHEETS_HOST, SPREADSHEETS_SERVICE)?, key),
        Err(_) => Spreadsheet::connect(key)?,
    };
    sheet.set_worksheet_id(worksheet);

    println!("{}", sheet.evaluate_cell(cell)?);
    Ok(())
}

fn set_cell_command(key: &str, cell: &str, value: &str, formula: bool, worksheet: u32) -> Result<()> {
    let config = ClientConfig::from_env()?;
    let mut sheet = Spreadsheet::new(login(&config, SPREADSHEETS_HOST, SPREADSHEETS_SERVICE)?, key);
    sheet.set_worksheet_id(worksheet);

    sheet.add(value, Some(cell), formula)?;
    eprintln!("{} {}", style("Saved").green().bold(), cell);
    Ok(())
}
