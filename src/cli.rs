//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::chart_svg::render_chart_svg;
use crate::adapters::csv_export::export_to_file;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::http_store_adapter::HttpStockStore;
use crate::adapters::json_import_adapter::read_import_file;
use crate::adapters::table_text::{render_notice, render_screen};
use crate::domain::app_state::UiEvent;
use crate::domain::client_config::{build_client_config, ChartSize, ClientConfig};
use crate::domain::controller::Controller;
use crate::domain::error::StockdeskError;
use crate::domain::import::import_rows;
use crate::domain::record::{Record, RecordId, StockField};
use crate::domain::view;
use crate::ports::stock_store_port::StockStorePort;
use crate::shell::run_shell;

#[derive(Parser, Debug)]
#[command(name = "stockdesk", about = "Browse and edit stock records on a remote store")]
pub struct Cli {
    /// INI file with [api] and [chart] settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Overrides [api] base_url
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

/// The seven editable columns. Unset flags are empty on create and keep the
/// stored value on update.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldArgs {
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub trade_code: Option<String>,
    #[arg(long)]
    pub high: Option<String>,
    #[arg(long)]
    pub low: Option<String>,
    #[arg(long)]
    pub open: Option<String>,
    #[arg(long)]
    pub close: Option<String>,
    #[arg(long)]
    pub volume: Option<String>,
}

impl FieldArgs {
    pub fn get(&self, field: StockField) -> Option<&str> {
        let value = match field {
            StockField::Date => &self.date,
            StockField::TradeCode => &self.trade_code,
            StockField::High => &self.high,
            StockField::Low => &self.low,
            StockField::Open => &self.open,
            StockField::Close => &self.close,
            StockField::Volume => &self.volume,
        };
        value.as_deref()
    }

    /// Edit events for every flag that was given.
    pub fn events(&self) -> Vec<UiEvent> {
        StockField::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|v| UiEvent::SetField(f, v.to_string())))
            .collect()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one page of the record table
    List {
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Print the distinct trade codes
    Codes,
    /// Render the close/volume chart for one trade code as SVG
    Chart {
        #[arg(long)]
        code: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create one record
    Create {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Update one record; all seven fields are sent
    Update {
        #[arg(long)]
        id: RecordId,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete one record
    Delete {
        #[arg(long)]
        id: RecordId,
    },
    /// Create every row of a JSON file, in order
    Import {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Write the records (optionally one trade code) as CSV
    Export {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        code: Option<String>,
    },
    /// Interactive session
    Shell,
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match load_client_config(cli.config.as_ref(), cli.base_url.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let store = match HttpStockStore::new(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    log::debug!("using store at {}", store.base_url());

    match execute(cli.command, &store, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Defaults, then the config file if given, then `--base-url`.
pub fn load_client_config(
    path: Option<&PathBuf>,
    base_url: Option<&str>,
) -> Result<ClientConfig, StockdeskError> {
    let config = match path {
        Some(path) => {
            let adapter =
                FileConfigAdapter::from_file(path).map_err(|e| StockdeskError::ConfigParse {
                    file: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            build_client_config(&adapter)?
        }
        None => ClientConfig::default(),
    };
    match base_url {
        Some(url) => config.with_base_url(url),
        None => Ok(config),
    }
}

pub fn execute(
    command: Command,
    store: &dyn StockStorePort,
    config: &ClientConfig,
) -> Result<(), StockdeskError> {
    match command {
        Command::List { page } => print!("{}", run_list(store, page)?),
        Command::Codes => {
            for code in run_codes(store)? {
                println!("{code}");
            }
        }
        Command::Chart { code, output } => {
            let svg = run_chart(store, &code, config.chart)?;
            match output {
                Some(path) => {
                    fs::write(&path, svg)?;
                    eprintln!("Chart written to {}", path.display());
                }
                None => print!("{svg}"),
            }
        }
        Command::Create { fields } => {
            let record = run_create(store, &fields)?;
            println!("created {}", record.id);
        }
        Command::Update { id, fields } => {
            let record = run_update(store, id, &fields)?;
            println!("updated {}", record.id);
        }
        Command::Delete { id } => {
            run_delete(store, id)?;
            println!("deleted {id}");
        }
        Command::Import { file } => {
            let rows = read_import_file(&file)?;
            eprintln!("Importing {} rows from {}", rows.len(), file.display());
            let created = import_rows(store, &rows)?;
            println!("imported {} records", created.len());
        }
        Command::Export { output, code } => {
            let count = run_export(store, &output, code.as_deref())?;
            println!("exported {count} records to {}", output.display());
        }
        Command::Shell => {
            let stdin = io::stdin();
            run_shell(store, config.chart, stdin.lock(), io::stdout())?;
        }
    }
    Ok(())
}

/// Controller with the collection fetched, or the fetch error.
fn loaded(store: &dyn StockStorePort) -> Result<Controller<'_>, StockdeskError> {
    let mut controller = Controller::new(store);
    controller.load();
    settle(&mut controller)?;
    Ok(controller)
}

fn settle(controller: &mut Controller<'_>) -> Result<(), StockdeskError> {
    match controller.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Validate the open draft, then save it. Nothing is sent when validation fails.
fn save(controller: &mut Controller<'_>) -> Result<Record, StockdeskError> {
    controller.state().session.prepare_save()?;
    controller.dispatch(UiEvent::Save);
    settle(controller)?;
    controller.take_saved().ok_or_else(|| {
        let reason = controller
            .state()
            .notice
            .as_ref()
            .map_or_else(|| "no request was sent".to_string(), render_notice);
        StockdeskError::NotSaved(reason)
    })
}

pub fn run_list(store: &dyn StockStorePort, page: usize) -> Result<String, StockdeskError> {
    let mut controller = loaded(store)?;
    controller.dispatch(UiEvent::GoToPage(page));
    Ok(render_screen(controller.state()))
}

pub fn run_codes(store: &dyn StockStorePort) -> Result<Vec<String>, StockdeskError> {
    let controller = loaded(store)?;
    Ok(controller.state().trade_code_options())
}

pub fn run_chart(
    store: &dyn StockStorePort,
    trade_code: &str,
    size: ChartSize,
) -> Result<String, StockdeskError> {
    let mut controller = loaded(store)?;
    controller.dispatch(UiEvent::SelectTradeCode(trade_code.to_string()));
    let series = controller.state().chart_series();
    log::info!("{} points for {trade_code}", series.len());
    Ok(render_chart_svg(&series, trade_code, size))
}

/// Create one record without fetching the collection first.
pub fn run_create(store: &dyn StockStorePort, fields: &FieldArgs) -> Result<Record, StockdeskError> {
    let mut controller = Controller::new(store);
    controller.dispatch(UiEvent::BeginInsert);
    for event in fields.events() {
        controller.dispatch(event);
    }
    save(&mut controller)
}

pub fn run_update(
    store: &dyn StockStorePort,
    id: RecordId,
    fields: &FieldArgs,
) -> Result<Record, StockdeskError> {
    let mut controller = loaded(store)?;
    if !controller.state().records.contains(id) {
        return Err(StockdeskError::UnknownRecord(id));
    }
    controller.dispatch(UiEvent::BeginEdit(id));
    for event in fields.events() {
        controller.dispatch(event);
    }
    save(&mut controller)
}

pub fn run_delete(store: &dyn StockStorePort, id: RecordId) -> Result<(), StockdeskError> {
    let mut controller = loaded(store)?;
    if !controller.state().records.contains(id) {
        return Err(StockdeskError::UnknownRecord(id));
    }
    controller.dispatch(UiEvent::Delete(id));
    settle(&mut controller)
}

/// Returns the number of rows written.
pub fn run_export(
    store: &dyn StockStorePort,
    output: &std::path::Path,
    trade_code: Option<&str>,
) -> Result<usize, StockdeskError> {
    let controller = loaded(store)?;
    let records = controller.state().records.records();
    let rows: Vec<Record> = match trade_code {
        Some(code) => view::filter_by_trade_code(records, code)
            .into_iter()
            .cloned()
            .collect(),
        None => records.to_vec(),
    };
    export_to_file(output, &rows)?;
    Ok(rows.len())
}
