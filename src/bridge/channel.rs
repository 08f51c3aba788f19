//! Channel adapter: owns the lifecycle of one communication channel.
//!
//! The host opens the channel, the adapter acknowledges with a single
//! `KernelReady` frame, and every subsequent inbound frame is forwarded to
//! the dispatcher with the reply sent back over the same channel. The
//! adapter is stateless beyond the channel handle and the dispatcher.

use std::io::{BufRead, Write};

use uuid::Uuid;

use super::dispatcher::CommandDispatcher;
use super::error::{ChannelError, ChannelResult};
use crate::protocol::envelope::{CommFrame, OutboundFrame};

/// The host-transport seam: anything that can deliver an outbound frame.
pub trait CommChannel {
    /// Deliver one event frame to the front-end.
    fn send(&mut self, frame: &OutboundFrame) -> ChannelResult<()>;
}

/// Adapter binding one channel to one dispatcher.
pub struct ChannelTarget<C: CommChannel> {
    dispatcher: CommandDispatcher,
    channel: Option<C>,
    id: Uuid,
}

impl<C: CommChannel> ChannelTarget<C> {
    /// Create an adapter; no channel is attached until [`open`](Self::open).
    pub fn new(dispatcher: CommandDispatcher) -> Self {
        Self {
            dispatcher,
            channel: None,
            id: Uuid::new_v4(),
        }
    }

    /// Whether a channel has been opened.
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// Attach the channel and acknowledge with exactly one `KernelReady`
    /// frame, sent synchronously before returning.
    pub fn open(&mut self, channel: C) -> ChannelResult<()> {
        let ready = self.dispatcher.is_ready();
        self.channel = Some(channel);
        tracing::debug!(channel = %self.id, "channel opened");
        self.send(&ready)
    }

    /// Forward one decoded inbound frame and send the reply.
    ///
    /// Fails with [`ChannelError::NotOpen`] if no channel was opened; that is
    /// a usage error in the embedding host, not a protocol error.
    pub fn on_message(&mut self, frame: &CommFrame) -> ChannelResult<()> {
        self.ensure_open()?;
        let reply = self.dispatcher.handle(&frame.content.data);
        self.send(&reply)
    }

    /// Forward one raw inbound frame (JSON text) and send the reply.
    pub fn on_raw_message(&mut self, raw: &str) -> ChannelResult<()> {
        self.ensure_open()?;
        let reply = self.dispatcher.handle_frame(raw);
        self.send(&reply)
    }

    /// Consume frames from `reader`, one JSON frame per line, until EOF.
    pub fn serve<R: BufRead>(&mut self, reader: R) -> ChannelResult<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            self.on_raw_message(&line)?;
        }
        Ok(())
    }

    fn ensure_open(&self) -> ChannelResult<()> {
        if self.channel.is_some() {
            Ok(())
        } else {
            Err(ChannelError::NotOpen)
        }
    }

    fn send(&mut self, frame: &OutboundFrame) -> ChannelResult<()> {
        match self.channel.as_mut() {
            Some(channel) => channel.send(frame),
            None => Err(ChannelError::NotOpen),
        }
    }
}

/// JSON-lines transport over any [`Write`]: one frame per line, flushed.
pub struct WriterChannel<W: Write> {
    writer: W,
}

impl<W: Write> WriterChannel<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> CommChannel for WriterChannel<W> {
    fn send(&mut self, frame: &OutboundFrame) -> ChannelResult<()> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
