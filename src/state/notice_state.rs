//! NoticeState - User-Visible Messages with Ring Buffer
//!
//! Every notice is also emitted as a tracing event, so nothing shown to the
//! user is missing from the log.

use chrono::{DateTime, Local};

use crate::helpers::BoundedDeque;

/// Notice level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

impl NoticeLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "INFO",
            NoticeLevel::Warn => "WARN",
            NoticeLevel::Error => "ERROR",
        }
    }

    /// Terminal prefix
    pub fn icon(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "✅",
            NoticeLevel::Warn => "⚠️",
            NoticeLevel::Error => "❌",
        }
    }
}

/// A single notice
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.level.icon(), self.message)
    }
}

/// Bounded notice history
#[derive(Debug)]
pub struct NoticeState {
    entries: BoundedDeque<Notice>,
    next_id: u64,
}

impl NoticeState {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: BoundedDeque::new(capacity),
            next_id: 1,
        }
    }

    /// Record a notice and return it
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> Notice {
        let message = message.into();
        match level {
            NoticeLevel::Info => tracing::info!("{}", message),
            NoticeLevel::Warn => tracing::warn!("{}", message),
            NoticeLevel::Error => tracing::error!("{}", message),
        }

        let notice = Notice {
            id: self.next_id,
            level,
            message,
            timestamp: Local::now(),
        };
        self.next_id += 1;
        self.entries.push(notice.clone());
        notice
    }

    pub fn info(&mut self, message: impl Into<String>) -> Notice {
        self.push(NoticeLevel::Info, message)
    }

    pub fn warn(&mut self, message: impl Into<String>) -> Notice {
        self.push(NoticeLevel::Warn, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> Notice {
        self.push(NoticeLevel::Error, message)
    }

    /// Oldest to newest
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &Notice> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&Notice> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for NoticeState {
    fn default() -> Self {
        Self::new(crate::constants::NOTICE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_and_capacity() {
        let mut notices = NoticeState::new(2);
        notices.info("one");
        notices.warn("two");
        let last = notices.error("three");

        assert_eq!(last.id, 3);
        assert_eq!(notices.len(), 2);
        let levels: Vec<NoticeLevel> = notices.entries().map(|n| n.level).collect();
        assert_eq!(levels, vec![NoticeLevel::Warn, NoticeLevel::Error]);
        assert_eq!(last.to_string(), "❌ three");
    }
}
