use crate::libs::messages::Message;
use crate::{msg_info, msg_success, msg_warning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
}

/// A non-blocking notification about the outcome of a remote call.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: Message,
}

impl Notice {
    pub fn success(message: Message) -> Self {
        Notice {
            level: NoticeLevel::Success,
            message,
        }
    }

    pub fn info(message: Message) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message,
        }
    }

    pub fn warning(message: Message) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message,
        }
    }

    pub fn print(&self) {
        match self.level {
            NoticeLevel::Success => msg_success!(self.message),
            NoticeLevel::Info => msg_info!(self.message),
            NoticeLevel::Warning => msg_warning!(self.message),
        }
    }
}
