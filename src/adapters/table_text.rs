//! Plain-text rendering of the table view and page bar.

use std::fmt::Write;

use crate::domain::app_state::{AppState, Notice};
use crate::domain::edit_session::EditSession;
use crate::domain::record::{Record, RecordDraft, StockField};

const NEW_ROW_MARKER: &str = "new";
const EDIT_MARKER: &str = "*";

/// One cell per [`StockField`], plus the row key.
struct Row {
    key: String,
    cells: Vec<String>,
    editing: bool,
}

fn record_row(record: &Record) -> Row {
    Row {
        key: record.id.to_string(),
        cells: StockField::ALL
            .iter()
            .map(|f| record.field(*f).to_string())
            .collect(),
        editing: false,
    }
}

fn draft_row(key: String, draft: &RecordDraft) -> Row {
    Row {
        key,
        cells: StockField::ALL
            .iter()
            .map(|f| format!("[{}]", draft.get(*f)))
            .collect(),
        editing: true,
    }
}

/// Render the current page with the inline draft row, if any.
pub fn render_table(state: &AppState) -> String {
    let mut rows: Vec<Row> = Vec::new();
    if let EditSession::Inserting { draft } = &state.session {
        rows.push(draft_row(NEW_ROW_MARKER.to_string(), draft));
    }
    for record in state.page_rows() {
        match &state.session {
            EditSession::Editing { id, draft } if *id == record.id => {
                rows.push(draft_row(record.id.to_string(), draft));
            }
            _ => rows.push(record_row(record)),
        }
    }

    let mut headers = vec!["Id".to_string()];
    headers.extend(StockField::ALL.iter().map(|f| f.label().to_string()));

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        widths[0] = widths[0].max(row.key.chars().count());
        for (i, cell) in row.cells.iter().enumerate() {
            widths[i + 1] = widths[i + 1].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format_line("  ", &headers, &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format_line("  ", &rule, &widths));
    for row in &rows {
        let marker = if row.editing { EDIT_MARKER } else { " " };
        let mut cells = vec![row.key.clone()];
        cells.extend(row.cells.iter().cloned());
        out.push_str(&format_line(&format!("{marker} "), &cells, &widths));
    }
    if rows.is_empty() {
        out.push_str("  (no records)\n");
    }
    out
}

fn format_line(prefix: &str, cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{c:<width$}", width = *w))
        .collect();
    format!("{prefix}{}\n", padded.join(" | ").trim_end())
}

/// One entry per page; the current page is bracketed.
pub fn render_page_bar(page_count: usize, current_page: usize) -> String {
    (1..=page_count)
        .map(|p| {
            if p == current_page {
                format!("[{p}]")
            } else {
                p.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Alert(message) => format!("ALERT: {message}"),
        Notice::Busy => "busy: a request is already in flight".to_string(),
        Notice::Ignored(message) => format!("note: {message}"),
    }
}

/// Full screen: loading indicator, notice, selection, table and page bar.
pub fn render_screen(state: &AppState) -> String {
    let mut out = String::new();
    if state.loading() {
        out.push_str("Loading...\n");
    }
    if let Some(notice) = &state.notice {
        out.push_str(&render_notice(notice));
        out.push('\n');
    }
    let selected = if state.selected_trade_code.is_empty() {
        "(none)"
    } else {
        state.selected_trade_code.as_str()
    };
    let _ = writeln!(
        out,
        "Trade code: {selected} | {} records | page {} of {}",
        state.records.len(),
        state.current_page,
        state.page_count().max(1)
    );
    out.push_str(&render_table(state));
    let bar = render_page_bar(state.page_count(), state.current_page);
    if !bar.is_empty() {
        out.push_str("Pages: ");
        out.push_str(&bar);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::RecordCollection;
    use crate::domain::record::RecordId;

    fn record(id: u64) -> Record {
        Record {
            id: RecordId(id),
            date: "2020-01-01".into(),
            trade_code: "ABC".into(),
            high: "11".into(),
            low: "9".into(),
            open: "10".into(),
            close: "10".into(),
            volume: "100".into(),
        }
    }

    fn state_with(n: u64) -> AppState {
        AppState {
            records: RecordCollection::from_records((1..=n).map(record).collect()),
            ..AppState::default()
        }
    }

    #[test]
    fn page_bar_lists_every_page() {
        assert_eq!(render_page_bar(3, 2), "1 [2] 3");
        assert_eq!(render_page_bar(0, 1), "");
    }

    #[test]
    fn page_bar_is_not_windowed() {
        let bar = render_page_bar(40, 1);
        assert_eq!(bar.split(' ').count(), 40);
    }

    #[test]
    fn table_has_header_and_rows() {
        let out = render_table(&state_with(2));
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("Trade Code"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn insert_row_rendered_first() {
        let mut state = state_with(1);
        state.session = EditSession::Idle.begin_insert();
        let out = render_table(&state);
        let third = out.lines().nth(2).unwrap();
        assert!(third.starts_with("* new"));
    }

    #[test]
    fn editing_row_shows_draft_values() {
        let mut state = state_with(2);
        state.session = EditSession::Idle
            .begin_edit(&record(2))
            .set_field(StockField::Close, "12.5");
        let out = render_table(&state);
        assert!(out.contains("[12.5]"));
        assert_eq!(out.matches("* ").count(), 1);
    }

    #[test]
    fn empty_collection_message() {
        let out = render_table(&AppState::default());
        assert!(out.contains("(no records)"));
    }

    #[test]
    fn screen_shows_loading_and_alert() {
        let mut state = state_with(1);
        state.in_flight = Some(crate::domain::app_state::RequestKind::Fetch);
        state.notice = Some(Notice::Alert("All fields are required".into()));
        let out = render_screen(&state);
        assert!(out.starts_with("Loading...\n"));
        assert!(out.contains("ALERT: All fields are required"));
        assert!(out.contains("Pages: [1]"));
    }
}
