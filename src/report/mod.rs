//! Report delivery to chat destinations

pub mod chunk;
pub mod console;
pub mod discord;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

pub use chunk::split_frames;
pub use console::ConsoleTransport;
pub use discord::DiscordTransport;

/// Error types for message delivery
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// Where report text goes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportDestination {
    /// A regular channel
    Channel { id: String },
    /// A thread started inside `parent`
    Thread { id: String, parent: String },
}

impl ReportDestination {
    pub fn channel(id: impl Into<String>) -> Self {
        ReportDestination::Channel { id: id.into() }
    }

    pub fn thread(id: impl Into<String>, parent: impl Into<String>) -> Self {
        ReportDestination::Thread {
            id: id.into(),
            parent: parent.into(),
        }
    }

    /// Identifier messages are posted to
    pub fn id(&self) -> &str {
        match self {
            ReportDestination::Channel { id } | ReportDestination::Thread { id, .. } => id,
        }
    }
}

impl fmt::Display for ReportDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportDestination::Channel { id } => write!(f, "channel {}", id),
            ReportDestination::Thread { id, parent } => write!(f, "thread {} (in {})", id, parent),
        }
    }
}

/// Identifier of a posted message
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(pub String);

/// Chat platform operations the bot needs
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Post one message, which must already fit the platform's size limit
    async fn send_message(
        &self,
        destination: &ReportDestination,
        content: &str,
    ) -> Result<MessageId, DeliveryError>;

    /// Start a thread in `channel` anchored on `anchor`
    async fn start_thread(
        &self,
        channel: &ReportDestination,
        anchor: &MessageId,
        name: &str,
        auto_archive_minutes: u32,
    ) -> Result<ReportDestination, DeliveryError>;
}

/// Immediate reply to a command invocation
#[async_trait]
pub trait Responder: Send + Sync {
    async fn acknowledge(&self, content: &str) -> Result<MessageId, DeliveryError>;
}

/// Responder that acknowledges by posting into the invoking channel
pub struct ChannelResponder {
    transport: Arc<dyn ChatTransport>,
    channel: ReportDestination,
}

impl ChannelResponder {
    pub fn new(transport: Arc<dyn ChatTransport>, channel: ReportDestination) -> Self {
        Self { transport, channel }
    }
}

#[async_trait]
impl Responder for ChannelResponder {
    async fn acknowledge(&self, content: &str) -> Result<MessageId, DeliveryError> {
        self.transport.send_message(&self.channel, content).await
    }
}

/// Delivers arbitrarily long text as ordered, size-bounded frames
///
/// Delivery is best effort: a frame that fails to send is logged and the
/// remaining frames are still sent.
#[derive(Clone)]
pub struct ReportSink {
    transport: Arc<dyn ChatTransport>,
    frame_budget: usize,
}

impl ReportSink {
    pub fn new(transport: Arc<dyn ChatTransport>, frame_budget: usize) -> Self {
        Self {
            transport,
            frame_budget,
        }
    }

    pub fn frame_budget(&self) -> usize {
        self.frame_budget
    }

    pub fn transport(&self) -> &Arc<dyn ChatTransport> {
        &self.transport
    }

    /// Deliver `text` to `destination`, returning how many frames were sent
    pub async fn deliver(&self, destination: &ReportDestination, text: &str) -> usize {
        let frames = split_frames(text, self.frame_budget);
        if frames.is_empty() {
            debug!("Skipping blank report for {}", destination);
            return 0;
        }

        let mut delivered = 0;
        for (index, frame) in frames.iter().enumerate() {
            match self.transport.send_message(destination, frame).await {
                Ok(_) => delivered += 1,
                Err(e) => warn!(
                    "Cannot send frame {}/{} to {}: {}",
                    index + 1,
                    frames.len(),
                    destination,
                    e
                ),
            }
        }
        delivered
    }
}
