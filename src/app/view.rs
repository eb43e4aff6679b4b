use lipgloss_extras::prelude::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::style::{BULLET, ELLIPSIS};
use super::{App, Mode};
use crate::email::EmailRecord;
use crate::filter::StatusFilter;
use crate::key::{short_help_line, KeyMap};

/// Width assumed before the terminal reports its size.
const FALLBACK_WIDTH: usize = 100;

/// Lines taken by everything around the table.
const CHROME_LINES: usize = 7;

const ID_WIDTH: usize = 12;
const DATE_WIDTH: usize = 19;
const STATUS_WIDTH: usize = 9;
const MIN_ADDRESS_WIDTH: usize = 12;

impl App {
    pub(super) fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title_line());
        out.push('\n');
        out.push_str(&self.filter_line());
        out.push_str("\n\n");

        match &self.mode {
            Mode::Detail(record) => out.push_str(&self.detail_view(record)),
            Mode::Settings { input } => out.push_str(&self.settings_view(input)),
            Mode::Browse | Mode::Search => {
                out.push_str(&self.table_view());
                out.push('\n');
                out.push_str(&self.pager.view());
            }
        }

        out.push('\n');
        out.push_str(&self.status_line());
        out.push('\n');
        out.push_str(&self.help_view());
        out
    }

    fn title_line(&self) -> String {
        let title = self.styles.title.clone().render("Mail log");
        let spinner = self.spinner.view();
        if spinner.is_empty() {
            title
        } else {
            format!("{} {}", title, spinner)
        }
    }

    fn filter_line(&self) -> String {
        let filter = self.list.filter();
        let label = |text: &str| self.styles.filter_label.clone().render(text);
        let value = |text: &str| self.styles.filter_value.clone().render(text);

        let search = if self.mode == Mode::Search {
            format!(
                "{}{}",
                self.styles
                    .filter_prompt
                    .clone()
                    .render(&filter.search_value),
                self.styles.filter_prompt.clone().render("▏")
            )
        } else if filter.search_value.is_empty() {
            label("-")
        } else {
            value(&filter.search_value)
        };

        format!(
            "{} {}  {} {}  {} {}",
            label(&format!("Search [{}]:", filter.search_field.label())),
            search,
            label(BULLET),
            label("Status:"),
            value(match &filter.status {
                StatusFilter::Any => "any",
                StatusFilter::Code(code) => code,
            }),
            label(&format!("{} Page size: {}", BULLET, self.list.settings().page_size)),
        )
    }

    fn table_view(&self) -> String {
        let records = self.list.records();
        if records.is_empty() {
            let text = if self.list.loading() {
                "Loading…"
            } else {
                "No records"
            };
            return self.styles.no_items.clone().render(text);
        }

        let width = self.content_width();
        let address = address_width(width);
        let mut lines = Vec::with_capacity(records.len() + 1);
        lines.push(self.styles.header.clone().render(&row_text(
            "  ",
            ["ID", "Date", "From", "To", "Status"],
            address,
        )));

        let visible = self.visible_rows(records.len());
        let offset = (self.cursor + 1).saturating_sub(visible);
        for (i, record) in records.iter().enumerate().skip(offset).take(visible) {
            let cells = record_cells(record);
            if i == self.cursor {
                let text = row_text("> ", cells.each_ref().map(String::as_str), address);
                lines.push(self.styles.selected_row.clone().render(&text));
            } else {
                let text = row_text("  ", cells.each_ref().map(String::as_str), address);
                lines.push(self.styles.row.clone().render(&text));
            }
        }
        lines.join("\n")
    }

    fn detail_view(&self, record: &EmailRecord) -> String {
        let mut lines = Vec::new();
        let key_width = record
            .entries()
            .map(|(k, _)| UnicodeWidthStr::width(k))
            .max()
            .unwrap_or(0);
        for (key, value) in record.entries() {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => "-".to_string(),
                other => other.to_string(),
            };
            lines.push(format!(
                "{}  {}",
                self.styles
                    .detail_key
                    .clone()
                    .render(&pad(key, key_width)),
                rendered
            ));
        }
        lines.join("\n")
    }

    fn settings_view(&self, input: &str) -> String {
        let body = format!(
            "Page size: {}{}\n\nRecords per page; empty or zero falls back to the default.",
            self.styles.filter_prompt.clone().render(input),
            self.styles.filter_prompt.clone().render("▏"),
        );
        self.styles.dialog.clone().render(&body)
    }

    fn status_line(&self) -> String {
        if let Some(err) = self.list.error() {
            return self
                .styles
                .error
                .clone()
                .render(&format!("Failed to load emails: {}", err));
        }
        match &self.notice {
            Some(notice) => self.styles.notice.clone().render(notice),
            None => String::new(),
        }
    }

    fn help_view(&self) -> String {
        let style = self.styles.help.clone();
        let separator = format!(" {} ", BULLET);
        match &self.mode {
            Mode::Browse if self.full_help => self
                .browse_keys
                .full_help()
                .into_iter()
                .map(|column| {
                    column
                        .into_iter()
                        .map(|b| format!("{} {}", b.help_key(), b.help_desc()))
                        .collect::<Vec<_>>()
                        .join(separator.as_str())
                })
                .map(|line| style.clone().render(&line))
                .collect::<Vec<_>>()
                .join("\n"),
            Mode::Browse => {
                let pager = short_help_line(&self.pager.keymap);
                let browse = short_help_line(&self.browse_keys);
                style.render(&format!("{} {} {}", pager, BULLET, browse))
            }
            Mode::Search | Mode::Settings { .. } => style.render(&short_help_line(&self.input_keys)),
            Mode::Detail(_) => style.render(&short_help_line(&self.detail_keys)),
        }
    }

    fn content_width(&self) -> usize {
        if self.width == 0 {
            FALLBACK_WIDTH
        } else {
            self.width
        }
    }

    fn visible_rows(&self, total: usize) -> usize {
        if self.height == 0 {
            total
        } else {
            self.height.saturating_sub(CHROME_LINES).max(1)
        }
    }
}

fn record_cells(record: &EmailRecord) -> [String; 5] {
    let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    [
        or_dash(record.id()),
        or_dash(record.timestamp()),
        or_dash(record.mail_from()),
        or_dash(record.mail_to()),
        or_dash(record.status_code()),
    ]
}

fn address_width(total: usize) -> usize {
    let fixed = 2 + ID_WIDTH + DATE_WIDTH + STATUS_WIDTH + 4;
    (total.saturating_sub(fixed) / 2).max(MIN_ADDRESS_WIDTH)
}

fn row_text(marker: &str, cells: [&str; 5], address: usize) -> String {
    let [id, date, from, to, status] = cells;
    format!(
        "{}{} {} {} {} {}",
        marker,
        truncate(id, ID_WIDTH),
        truncate(date, DATE_WIDTH),
        truncate(from, address),
        truncate(to, address),
        truncate(status, STATUS_WIDTH),
    )
}

/// Cuts `s` to `width` display columns, ending in an ellipsis when shortened,
/// and pads it to exactly `width`.
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if UnicodeWidthStr::width(s) <= width {
        return pad(s, width);
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(ELLIPSIS);
    pad(&out, width)
}

fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(w)))
}
