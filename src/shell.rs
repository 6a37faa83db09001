// 🐚 Menu shell - numbered menu over any reader/writer pair
//
// The Session owns the Inventory. Every mutation runs on a draft copy which is
// saved to CSV first and only then swapped in, so a failed save leaves memory
// exactly as it was.

use crate::config::Config;
use crate::csv_codec::{self, LoadReport};
use crate::error::{InventoryError, Result};
use crate::pdf;
use crate::record::{parse_date, parse_name, parse_price, parse_quantity, Record, RecordUpdate};
use crate::report;
use crate::store::{DuplicatePolicy, Inventory};
use chrono::{Local, NaiveDateTime};
use std::io::{BufRead, Write};
use tracing::warn;

pub const MENU: &str = "
Warehouse Inventory Management

1. Add Item
2. Remove Item
3. Update Item
4. View All Items
5. Get Full Report
6. Get Expired Items
7. Search for an Item
8. Export Full Report to PDF
q. Exit
";

// ============================================================================
// MENU CHOICE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Remove,
    Update,
    ViewAll,
    FullReport,
    ExpiredItems,
    Search,
    ExportPdf,
    Quit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Add),
            "2" => Some(MenuChoice::Remove),
            "3" => Some(MenuChoice::Update),
            "4" => Some(MenuChoice::ViewAll),
            "5" => Some(MenuChoice::FullReport),
            "6" => Some(MenuChoice::ExpiredItems),
            "7" => Some(MenuChoice::Search),
            "8" => Some(MenuChoice::ExportPdf),
            "q" | "Q" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Owns the live inventory and where it is persisted
#[derive(Debug)]
pub struct Session {
    inventory: Inventory,
    config: Config,
}

impl Session {
    pub fn new(inventory: Inventory, config: Config) -> Self {
        Session { inventory, config }
    }

    /// Load the configured data file (missing file = empty inventory)
    pub fn open(config: Config) -> Result<(Self, LoadReport)> {
        let (inventory, report) =
            csv_codec::load_or_empty(&config.data_file, config.duplicate_policy)?;
        Ok((Session::new(inventory, config), report))
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Apply `change` to a draft, persist the draft, then make it live
    pub fn commit<T>(&mut self, change: impl FnOnce(&mut Inventory) -> Result<T>) -> Result<T> {
        let mut draft = self.inventory.clone();
        let out = change(&mut draft)?;
        csv_codec::save(&draft, &self.config.data_file)?;
        self.inventory = draft;
        Ok(out)
    }

    pub fn export_pdf(&self, generated_at: NaiveDateTime) -> Result<usize> {
        pdf::export(&self.inventory.list_all(), &self.config.pdf_file, generated_at)
    }
}

// ============================================================================
// SHELL
// ============================================================================

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub struct Shell<R, W> {
    session: Session,
    input: R,
    output: W,
    clock: fn() -> NaiveDateTime,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(session: Session, input: R, output: W) -> Self {
        Shell {
            session,
            input,
            output,
            clock: local_now,
        }
    }

    /// Replace the wall clock (expired-items cutoff and PDF timestamp)
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_parts(self) -> (Session, W) {
        (self.session, self.output)
    }

    /// Menu loop until `q` or end of input. Only terminal I/O errors escape.
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.output, "{}", MENU)?;
            let Some(line) = self.prompt("Choose an option: ")? else {
                break;
            };

            match MenuChoice::parse(&line) {
                Some(MenuChoice::Quit) => break,
                Some(choice) => self.dispatch(choice)?,
                None => writeln!(self.output, "Invalid choice. Please try again.")?,
            }
        }
        writeln!(self.output, "Goodbye.")?;
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        let outcome = match choice {
            MenuChoice::Add => self.add_item(),
            MenuChoice::Remove => self.remove_item(),
            MenuChoice::Update => self.update_item(),
            MenuChoice::ViewAll => self.view_all(),
            MenuChoice::FullReport => self.full_report(),
            MenuChoice::ExpiredItems => self.expired_items(),
            MenuChoice::Search => self.search_item(),
            MenuChoice::ExportPdf => self.export_pdf(),
            MenuChoice::Quit => Ok(()),
        };

        match outcome {
            Err(InventoryError::Terminal(e)) => Err(InventoryError::Terminal(e)),
            Err(e) => {
                warn!(?choice, error = %e, "menu action failed");
                writeln!(self.output, "Error: {}", e)?;
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    // ------------------------------------------------------------------------
    // actions
    // ------------------------------------------------------------------------

    fn add_item(&mut self) -> Result<()> {
        let Some(name) = self.prompt_valid("Enter item name: ", parse_name)? else {
            return Ok(());
        };
        // Under Reject, fail before asking for the other fields
        let inventory = self.session.inventory();
        if inventory.policy() == DuplicatePolicy::Reject && inventory.find(&name).is_ok() {
            return Err(InventoryError::Duplicate(name));
        }
        let Some(quantity) = self.prompt_valid("Enter quantity: ", parse_quantity)? else {
            return Ok(());
        };
        let Some(expiration_date) =
            self.prompt_valid("Enter expiration date (YYYY-MM-DD): ", parse_date)?
        else {
            return Ok(());
        };
        let Some(price) = self.prompt_valid("Enter price: ", parse_price)? else {
            return Ok(());
        };

        let record = Record::new(&name, quantity, expiration_date, price)?;
        self.session.commit(|inv| inv.add(record))?;
        writeln!(self.output, "Item '{}' added successfully.", name)?;
        Ok(())
    }

    fn remove_item(&mut self) -> Result<()> {
        let Some(name) = self.prompt("Enter item name to remove: ")? else {
            return Ok(());
        };
        let name = name.trim().to_string();

        self.session.commit(|inv| inv.remove(&name))?;
        writeln!(self.output, "Item '{}' removed successfully.", name)?;
        Ok(())
    }

    fn update_item(&mut self) -> Result<()> {
        let Some(name) = self.prompt("Enter item name to update: ")? else {
            return Ok(());
        };
        let name = name.trim().to_string();
        // Fail before asking for fields
        self.session.inventory().find(&name)?;

        let Some(quantity) = self.prompt_optional(
            "Enter new quantity (leave blank to keep current): ",
            parse_quantity,
        )?
        else {
            return Ok(());
        };
        let Some(expiration_date) = self.prompt_optional(
            "Enter new expiration date (YYYY-MM-DD, leave blank to keep current): ",
            parse_date,
        )?
        else {
            return Ok(());
        };
        let Some(price) = self.prompt_optional(
            "Enter new price (leave blank to keep current): ",
            parse_price,
        )?
        else {
            return Ok(());
        };

        let update = RecordUpdate {
            quantity,
            expiration_date,
            price,
        };
        if update.is_empty() {
            writeln!(self.output, "Nothing to update.")?;
            return Ok(());
        }

        let updated = self
            .session
            .commit(|inv| inv.update(&name, &update).map(Record::clone))?;
        writeln!(self.output, "Item '{}' updated successfully.", name)?;
        writeln!(self.output, "{}", report::render_table("Updated Item", &[updated]))?;
        Ok(())
    }

    fn view_all(&mut self) -> Result<()> {
        let records = self.session.inventory().list_all();
        if records.is_empty() {
            writeln!(self.output, "{}", report::EMPTY_INVENTORY)?;
        } else {
            writeln!(self.output, "{}", serde_json::to_string_pretty(&records)?)?;
        }
        Ok(())
    }

    fn full_report(&mut self) -> Result<()> {
        let today = (self.clock)().date();
        let text = report::full_report(&self.session.inventory().list_all(), today);
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    fn expired_items(&mut self) -> Result<()> {
        let today = (self.clock)().date();
        let text = report::expired_report(&self.session.inventory().list_all(), today);
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    fn search_item(&mut self) -> Result<()> {
        let Some(query) = self.prompt("Enter the name of the item to search for: ")? else {
            return Ok(());
        };
        let query = query.trim().to_string();

        // Exact name first, then fall back to a case-insensitive partial match
        let matches = match self.session.inventory().find(&query) {
            Ok(record) => vec![record.clone()],
            Err(_) => self.session.inventory().search(&query),
        };
        writeln!(self.output, "{}", report::search_report(&query, &matches))?;
        Ok(())
    }

    fn export_pdf(&mut self) -> Result<()> {
        let pages = self.session.export_pdf((self.clock)())?;
        writeln!(
            self.output,
            "Report exported to {} ({} page(s)).",
            self.session.config().pdf_file.display(),
            pages
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // prompting
    // ------------------------------------------------------------------------

    /// One line of input without its newline; `None` at end of input
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Re-prompt until `parse` accepts the input
    fn prompt_valid<T>(&mut self, label: &str, parse: fn(&str) -> Result<T>) -> Result<Option<T>> {
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "{}. Please try again.", e)?,
            }
        }
    }

    /// Like `prompt_valid`, but blank input yields `Some(None)` (keep current)
    fn prompt_optional<T>(
        &mut self,
        label: &str,
        parse: fn(&str) -> Result<T>,
    ) -> Result<Option<Option<T>>> {
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                return Ok(Some(None));
            }
            match parse(&line) {
                Ok(value) => return Ok(Some(Some(value))),
                Err(e) => writeln!(self.output, "{}. Please try again.", e)?,
            }
        }
    }
}
