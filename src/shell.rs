//! Line-oriented interactive session over the controller.
//!
//! Each input line is one command. Commands that change state go through
//! [`Controller::dispatch`]; the screen is redrawn after each of them.
//! Remote failures reach the user only through the error log on stderr.

use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::adapters::chart_svg::render_chart_svg;
use crate::adapters::table_text::render_screen;
use crate::domain::app_state::UiEvent;
use crate::domain::client_config::ChartSize;
use crate::domain::controller::Controller;
use crate::domain::error::StockdeskError;
use crate::domain::record::{RecordId, StockField};
use crate::ports::stock_store_port::StockStorePort;

const PROMPT: &str = "stockdesk> ";

const HELP: &str = "\
commands:
  page N            go to page N
  select [CODE]     choose the chart's trade code (empty clears)
  insert            open the blank insert row
  edit ID           put record ID in edit mode
  set FIELD VALUE   change a draft field (date, trade_code, high, low, open, close, volume)
  save              save the open draft
  cancel            discard the open draft
  delete ID         delete record ID
  refresh           fetch the collection again
  chart [PATH]      write the chart SVG to PATH, or print it
  codes             list trade codes
  show              redraw the table
  help              this text
  quit              leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    Page(usize),
    Select(String),
    Insert,
    Edit(RecordId),
    Set(StockField, String),
    Save,
    Cancel,
    Delete(RecordId),
    Refresh,
    Chart(Option<PathBuf>),
    Codes,
    Show,
    Help,
    Quit,
}

impl ShellCommand {
    /// The UI event this command stands for, if it changes state.
    fn event(&self) -> Option<UiEvent> {
        let event = match self {
            ShellCommand::Page(n) => UiEvent::GoToPage(*n),
            ShellCommand::Select(code) => UiEvent::SelectTradeCode(code.clone()),
            ShellCommand::Insert => UiEvent::BeginInsert,
            ShellCommand::Edit(id) => UiEvent::BeginEdit(*id),
            ShellCommand::Set(field, value) => UiEvent::SetField(*field, value.clone()),
            ShellCommand::Save => UiEvent::Save,
            ShellCommand::Cancel => UiEvent::Cancel,
            ShellCommand::Delete(id) => UiEvent::Delete(*id),
            ShellCommand::Refresh => UiEvent::Refresh,
            _ => return None,
        };
        Some(event)
    }
}

fn parse_id(arg: &str) -> Result<RecordId, String> {
    if arg.is_empty() {
        return Err("missing record id".to_string());
    }
    arg.parse()
        .map_err(|_| format!("'{arg}' is not a record id"))
}

/// Parse one input line. The error is a message for the user.
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    match verb.to_lowercase().as_str() {
        "" => Ok(ShellCommand::Empty),
        "page" => rest
            .parse()
            .map(ShellCommand::Page)
            .map_err(|_| format!("'{rest}' is not a page number")),
        "select" => Ok(ShellCommand::Select(rest.to_string())),
        "insert" => Ok(ShellCommand::Insert),
        "edit" => parse_id(rest).map(ShellCommand::Edit),
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err("usage: set FIELD VALUE".to_string());
            }
            let field: StockField = field.parse()?;
            Ok(ShellCommand::Set(field, value.to_string()))
        }
        "save" => Ok(ShellCommand::Save),
        "cancel" => Ok(ShellCommand::Cancel),
        "delete" => parse_id(rest).map(ShellCommand::Delete),
        "refresh" => Ok(ShellCommand::Refresh),
        "chart" => Ok(ShellCommand::Chart(
            (!rest.is_empty()).then(|| PathBuf::from(rest)),
        )),
        "codes" => Ok(ShellCommand::Codes),
        "show" => Ok(ShellCommand::Show),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

/// Run the session until `quit` or end of input.
pub fn run_shell<R: BufRead, W: Write>(
    store: &dyn StockStorePort,
    chart_size: ChartSize,
    input: R,
    mut out: W,
) -> Result<(), StockdeskError> {
    let mut controller = Controller::new(store).on_loading(|loading| {
        if loading {
            eprintln!("Loading...");
        }
    });
    controller.load();
    write!(out, "{}", render_screen(controller.state()))?;
    write!(out, "{PROMPT}")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(c) => c,
            Err(message) => {
                writeln!(out, "{message}")?;
                write!(out, "{PROMPT}")?;
                out.flush()?;
                continue;
            }
        };

        match &command {
            ShellCommand::Quit => break,
            ShellCommand::Empty => {}
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Show => write!(out, "{}", render_screen(controller.state()))?,
            ShellCommand::Codes => {
                let codes = controller.state().trade_code_options();
                if codes.is_empty() {
                    writeln!(out, "(no trade codes)")?;
                }
                for code in codes {
                    writeln!(out, "{code}")?;
                }
            }
            ShellCommand::Chart(path) => {
                let state = controller.state();
                let svg =
                    render_chart_svg(&state.chart_series(), &state.selected_trade_code, chart_size);
                match path {
                    Some(path) => match fs::write(path, svg) {
                        Ok(()) => writeln!(out, "chart written to {}", path.display())?,
                        Err(e) => writeln!(out, "could not write {}: {e}", path.display())?,
                    },
                    None => write!(out, "{svg}")?,
                }
            }
            other => {
                if let Some(event) = other.event() {
                    controller.dispatch(event);
                    write!(out, "{}", render_screen(controller.state()))?;
                }
            }
        }
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}
