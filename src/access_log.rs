//! One line per served request, timestamped and colorized.

use chrono::{DateTime, Local};
use colored::Colorize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEntry {
    pub method: String,
    pub target: String,
    /// As written on the request line, e.g. `HTTP/1.1`.
    pub version: String,
    pub status: u16,
    /// Body length when known.
    pub size: Option<u64>,
}

impl AccessEntry {
    /// `"GET /path HTTP/1.1" 200 1234`, with `-` for an unknown size.
    pub fn request_line(&self) -> String {
        let size = self
            .size
            .map_or_else(|| "-".to_string(), |size| size.to_string());
        format!(
            "\"{} {} {}\" {} {size}",
            self.method, self.target, self.version, self.status
        )
    }
}

pub fn timestamp(at: DateTime<Local>) -> String {
    at.format("%d/%b/%Y %H:%M:%S").to_string()
}

pub fn print(entry: &AccessEntry) {
    let stamp = format!("[{}]", timestamp(Local::now()));
    println!("{} {}", stamp.bright_blue(), entry.request_line());
}
