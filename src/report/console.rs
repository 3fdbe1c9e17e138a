//! Terminal transport - prints frames instead of posting them

use crate::report::{ChatTransport, DeliveryError, MessageId, ReportDestination, Responder};
use async_trait::async_trait;
use console::style;
use std::sync::atomic::{AtomicU64, Ordering};

/// Writes every message to stdout, prefixed with its destination
#[derive(Debug, Default)]
pub struct ConsoleTransport {
    next_id: AtomicU64,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> MessageId {
        MessageId(self.next_id.fetch_add(1, Ordering::SeqCst).to_string())
    }
}

fn label(destination: &ReportDestination) -> String {
    match destination {
        ReportDestination::Channel { id } => format!("#{}", id),
        ReportDestination::Thread { id, .. } => format!("#{} ↳", id),
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn send_message(
        &self,
        destination: &ReportDestination,
        content: &str,
    ) -> Result<MessageId, DeliveryError> {
        println!("{} {}", style(label(destination)).cyan().bold(), content);
        Ok(self.allocate_id())
    }

    async fn start_thread(
        &self,
        channel: &ReportDestination,
        _anchor: &MessageId,
        name: &str,
        _auto_archive_minutes: u32,
    ) -> Result<ReportDestination, DeliveryError> {
        println!(
            "{} {}",
            style(label(channel)).cyan().bold(),
            style(format!("started thread {}", name)).dim()
        );
        Ok(ReportDestination::thread(name, channel.id()))
    }
}

#[async_trait]
impl Responder for ConsoleTransport {
    async fn acknowledge(&self, content: &str) -> Result<MessageId, DeliveryError> {
        println!("{} {}", style(">").green().bold(), content);
        Ok(self.allocate_id())
    }
}
