//! Google Spreadsheets cell feeds.

use roxmltree::Document;

use crate::config::{
    cells_feed_path, parse_cell_reference, ATOM_NS, SPREADSHEETS_HOST, SPREADSHEETS_NS,
    SPREADSHEETS_SERVICE,
};
use crate::error::{GDataError, Result};
use crate::http::{HttpTransport, Method, Transport};
use crate::xml::{find_children, get_text};

/// Worksheet used until another one is selected.
pub const DEFAULT_WORKSHEET_ID: u32 = 1;

/// Client for the cells of one spreadsheet.
///
/// Reads go to the public feed unless the transport is authenticated; writes
/// always need a session.
pub struct Spreadsheet<T: Transport> {
    transport: T,
    spreadsheet_key: String,
    worksheet_id: u32,
}

impl Spreadsheet<HttpTransport> {
    /// Client over HTTP for the public Spreadsheets host.
    pub fn connect(spreadsheet_key: impl Into<String>) -> Result<Self> {
        Ok(Self::new(
            HttpTransport::new(SPREADSHEETS_HOST, SPREADSHEETS_SERVICE)?,
            spreadsheet_key,
        ))
    }
}

impl<T: Transport> Spreadsheet<T> {
    pub fn new(transport: T, spreadsheet_key: impl Into<String>) -> Self {
        Self {
            transport,
            spreadsheet_key: spreadsheet_key.into(),
            worksheet_id: DEFAULT_WORKSHEET_ID,
        }
    }

    pub fn worksheet_id(&self) -> u32 {
        self.worksheet_id
    }

    pub fn set_worksheet_id(&mut self, worksheet_id: u32) {
        self.worksheet_id = worksheet_id;
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn feed_path(&self, projection: &str) -> String {
        cells_feed_path(
            &self.spreadsheet_key,
            self.worksheet_id,
            self.transport.is_authenticated(),
            projection,
        )
    }

    /// The computed value of `cell` (e.g. `R1C1` or `A1`).
    ///
    /// Returns an empty string when the entry has no text content.
    pub fn evaluate_cell(&self, cell: &str) -> Result<String> {
        let path = format!("{}/{}", self.feed_path("basic"), urlencoding::encode(cell));
        let response = self
            .transport
            .fetch(Method::Get, &path, None)?
            .error_for_status()?;

        let doc = Document::parse(&response.body)?;
        let value = find_children(doc.root_element(), "content")
            .find(|c| c.attribute("type") == Some("text"))
            .map(|c| get_text(c).to_string())
            .unwrap_or_default();
        Ok(value)
    }

    /// Write `data` into the cell given by `to` (`R<row>C<col>`).
    ///
    /// With `formula`, `data` is stored as `=data`.
    ///
    /// # Errors
    /// `InvalidArgument` when `to` is missing or malformed,
    /// `AuthenticationRequired` without a session, `RemoteService` when the
    /// service does not accept the entry.
    pub fn add(&self, data: &str, to: Option<&str>, formula: bool) -> Result<()> {
        let cell = to.ok_or_else(|| {
            GDataError::InvalidArgument("no target cell given, expected R<row>C<col>".into())
        })?;
        let (row, col) = parse_cell_reference(cell)?;

        if !self.transport.is_authenticated() {
            return Err(GDataError::AuthenticationRequired);
        }

        let value = if formula {
            format!("={data}")
        } else {
            data.to_string()
        };
        let entry = cell_entry(row, col, &value);

        let response = self
            .transport
            .fetch(Method::Post, &self.feed_path("full"), Some(&entry))?
            .error_for_status()?;
        tracing::info!(cell, status = response.status, "Cell saved");
        Ok(())
    }
}

/// Atom entry that sets one cell.
fn cell_entry(row: u32, col: u32, value: &str) -> String {
    format!(
        r#"<entry xmlns="{ATOM_NS}" xmlns:gs="{SPREADSHEETS_NS}"><gs:cell row="{row}" col="{col}" inputValue="{}" /></entry>"#,
        quick_xml::escape::escape(value)
    )
}
