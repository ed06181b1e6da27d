//! What a decode routine sees.

use wire::{MessageHeader, Packet};

use crate::effects::Effects;

/// Header, traced payload cursor and effect buffer of the message being
/// decoded.
#[derive(Debug)]
pub struct MessageContext<'p> {
    pub header: MessageHeader,
    pub packet: Packet<'p>,
    pub effects: Effects,
}

impl<'p> MessageContext<'p> {
    #[must_use]
    pub fn new(header: MessageHeader, packet: Packet<'p>) -> Self {
        Self {
            header,
            packet,
            effects: Effects::new(),
        }
    }
}
