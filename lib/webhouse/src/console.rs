use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Local};

pub const CONSOLE_CAPACITY: usize = 50;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Style {
    Plain,
    Sent,
    Received,
    Error,
}

pub trait LogSink {
    fn append(&mut self, text: &str, style: Style);

    fn clear(&mut self) {}
}

#[derive(Clone, Debug)]
pub struct Entry {
    pub at: DateTime<Local>,
    pub text: String,
    pub style: Style,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.at.format("%H:%M:%S"), self.text)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConsoleLog {
    entries: VecDeque<Entry>,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.back()
    }
}

impl LogSink for ConsoleLog {
    fn append(&mut self, text: &str, style: Style) {
        self.entries.push_back(Entry {
            at: Local::now(),
            text: text.to_string(),
            style,
        });

        while self.entries.len() > CONSOLE_CAPACITY {
            self.entries.pop_front();
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_last_entries() {
        let mut log = ConsoleLog::new();

        for index in 0..CONSOLE_CAPACITY + 7 {
            log.append(&format!("line {index}"), Style::Plain);
        }

        assert_eq!(log.len(), CONSOLE_CAPACITY);
        assert_eq!(log.entries().next().unwrap().text, "line 7");
        assert_eq!(
            log.last().unwrap().text,
            format!("line {}", CONSOLE_CAPACITY + 6)
        );
    }

    #[test]
    fn test_clear() {
        let mut log = ConsoleLog::new();
        log.append("CONNECTED", Style::Plain);
        log.append("SENT: {\"TV\":\"ON\"}", Style::Sent);

        assert_eq!(log.last().unwrap().style, Style::Sent);

        log.clear();
        assert!(log.is_empty());
    }
}
