//! Routine resolution, per-message classification and ordered commit.

use std::num::NonZeroUsize;

use bitstream::BitResult;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use registry::{Handler, VersionRegistry};
use tracing::{debug, trace, warn};
use wire::{FieldTrace, MessageHeader, Packet};

use crate::config::DecoderConfig;
use crate::context::MessageContext;
use crate::effects::{Effect, Effects};
use crate::sink::RecordSink;
use crate::status::{DecodeStatus, DispatchStats};
use crate::store::WorldStateStore;

/// A decode routine for one message layout.
pub type Routine = fn(&mut MessageContext<'_>) -> BitResult<()>;

/// One captured message as handed over by capture ingestion.
#[derive(Debug, Clone, Copy)]
pub struct RawMessage<'a> {
    pub header: MessageHeader,
    pub payload: &'a [u8],
}

impl<'a> RawMessage<'a> {
    #[must_use]
    pub const fn new(header: MessageHeader, payload: &'a [u8]) -> Self {
        Self { header, payload }
    }
}

/// A decoded message whose effects have not been applied yet.
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    pub header: MessageHeader,
    /// Name of the resolved registration, if one resolved.
    pub routine: Option<&'static str>,
    pub trace: FieldTrace,
    pub effects: Effects,
    pub status: DecodeStatus,
}

/// What the caller gets back for a committed message.
#[derive(Debug, Clone)]
pub struct MessageOutcome {
    pub header: MessageHeader,
    pub routine: Option<&'static str>,
    pub trace: FieldTrace,
    pub status: DecodeStatus,
}

/// The stateless half of dispatch: resolves and runs routines.
///
/// Decoding only reads the registry, so one decoder can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct Decoder {
    registry: VersionRegistry<Routine>,
    config: DecoderConfig,
}

impl Decoder {
    #[must_use]
    pub const fn new(registry: VersionRegistry<Routine>, config: DecoderConfig) -> Self {
        Self { registry, config }
    }

    #[must_use]
    pub const fn registry(&self) -> &VersionRegistry<Routine> {
        &self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes one message without touching any shared state.
    #[must_use]
    pub fn decode_detached(&self, header: MessageHeader, payload: &[u8]) -> DecodedMessage {
        let registration = self.registry.resolve(header.code, header.build);
        let (name, routine) = match registration {
            Some(registration) => match registration.handler {
                Handler::Routine(routine) => (registration.name, routine),
                Handler::Removed => return unhandled(header, Some(registration.name)),
            },
            None => return unhandled(header, None),
        };

        let limits = self.config.limits();
        let packet = Packet::new(payload, &limits, self.config.trace_fields);
        let mut ctx = MessageContext::new(header, packet);
        let status = match routine(&mut ctx) {
            Ok(()) => DecodeStatus::from_lengths(
                header.payload_len as usize,
                ctx.packet.consumed_bytes(),
            ),
            Err(error) => DecodeStatus::from_error(error),
        };

        DecodedMessage {
            header,
            routine: Some(name),
            trace: ctx.packet.into_trace(),
            effects: ctx.effects,
            status,
        }
    }
}

fn unhandled(header: MessageHeader, routine: Option<&'static str>) -> DecodedMessage {
    DecodedMessage {
        header,
        routine,
        trace: FieldTrace::disabled(),
        effects: Effects::new(),
        status: DecodeStatus::UnhandledMessage,
    }
}

/// Decodes messages and commits their effects, in capture order, to a
/// [`WorldStateStore`] and a [`RecordSink`].
#[derive(Debug)]
pub struct Dispatcher<S> {
    decoder: Decoder,
    store: WorldStateStore,
    sink: S,
    stats: DispatchStats,
}

impl<S: RecordSink> Dispatcher<S> {
    #[must_use]
    pub fn new(decoder: Decoder, sink: S) -> Self {
        Self {
            decoder,
            store: WorldStateStore::new(),
            sink,
            stats: DispatchStats::default(),
        }
    }

    /// Decodes and commits one message.
    pub fn decode(&mut self, header: MessageHeader, payload: &[u8]) -> MessageOutcome {
        let decoded = self.decoder.decode_detached(header, payload);
        self.commit(decoded)
    }

    /// Applies a detached message's effects, classifies and logs it.
    ///
    /// Effects are applied for every status, so blocks decoded before a
    /// failure persist.
    pub fn commit(&mut self, message: DecodedMessage) -> MessageOutcome {
        let DecodedMessage {
            header,
            routine,
            trace,
            effects,
            status,
        } = message;

        for effect in effects {
            self.apply(header, effect);
        }

        self.stats.record(&status);
        log_status(&header, routine, &status);

        MessageOutcome {
            header,
            routine,
            trace,
            status,
        }
    }

    /// Decodes `messages` on a pool of `workers` threads and commits them
    /// in input order.
    pub fn decode_parallel(
        &mut self,
        messages: &[RawMessage<'_>],
        workers: NonZeroUsize,
    ) -> Vec<MessageOutcome> {
        let decoder = &self.decoder;
        let decode_one = |message: &RawMessage<'_>| {
            decoder.decode_detached(message.header, message.payload)
        };

        let decoded: Vec<DecodedMessage> =
            match ThreadPoolBuilder::new().num_threads(workers.get()).build() {
                Ok(pool) => pool.install(|| messages.par_iter().map(decode_one).collect()),
                Err(error) => {
                    warn!(%error, "worker pool unavailable, decoding on the calling thread");
                    messages.iter().map(decode_one).collect()
                }
            };

        decoded
            .into_iter()
            .map(|message| self.commit(message))
            .collect()
    }

    fn apply(&mut self, header: MessageHeader, effect: Effect) {
        match effect {
            Effect::Upsert { guid, snapshot } => {
                self.store.upsert_entity(guid, *snapshot, header.time);
            }
            Effect::Update { guid, values } => {
                self.store.apply_update(guid, &values);
            }
            Effect::Remove { guid, reason } => {
                self.store.record_removal(guid, reason, header.time);
            }
            Effect::SetMap(map_id) => self.store.ambient_mut().set_current_map(map_id),
            Effect::SetZone(zone_id) => self.store.ambient_mut().set_current_zone(zone_id),
            Effect::SetArea(area_id) => self.store.ambient_mut().set_current_area(area_id),
            Effect::SetPhases(phases) => self.store.ambient_mut().set_current_phases(phases),
            Effect::SetDifficulty(difficulty_id) => {
                self.store.ambient_mut().set_current_difficulty(difficulty_id);
            }
            Effect::Emit(record) => self.sink.emit(record.kind(), record, header.time),
        }
    }

    #[must_use]
    pub const fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    #[must_use]
    pub const fn store(&self) -> &WorldStateStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut WorldStateStore {
        &mut self.store
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[must_use]
    pub const fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Ends the run, returning the store and the sink.
    #[must_use]
    pub fn into_parts(self) -> (WorldStateStore, S) {
        (self.store, self.sink)
    }
}

fn log_status(header: &MessageHeader, routine: Option<&'static str>, status: &DecodeStatus) {
    let code = header.code;
    let build = header.build;
    let number = header.number;
    let name = routine.unwrap_or("?");
    match status {
        DecodeStatus::Ok => trace!(%code, %build, number, name, "committed message"),
        DecodeStatus::UnhandledMessage => {
            debug!(%code, %build, number, name, "unhandled message");
        }
        DecodeStatus::Truncated { .. } | DecodeStatus::Malformed(_) => {
            warn!(%code, %build, number, name, %status, "failed to decode message");
        }
        DecodeStatus::UnderreadPayload { .. } | DecodeStatus::OverreadPayload { .. } => {
            warn!(%code, %build, number, name, %status, "payload length mismatch");
        }
    }
}
