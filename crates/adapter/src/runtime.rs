//! Per-connection engine session.
//!
//! Each TCP client owns one [`ClientSession`]. The session is plain sync code:
//! it takes one inbound line and returns the messages to write back, which
//! keeps the protocol testable without a socket.

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::core::{ConfigError, Engine, EngineConfig};
use crate::engine::{replay, ActionPlan};
use crate::protocol::*;

/// Outbound message produced by a session.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
}

/// At most an ack followed by an observation.
pub type Replies = ArrayVec<OutboundMessage, 2>;

/// One client's engine plus protocol bookkeeping.
#[derive(Debug)]
pub struct ClientSession {
    base: EngineConfig,
    engine: Engine,
    last_seq: Option<u64>,
}

impl ClientSession {
    /// Start a spawned session from the server's engine settings.
    pub fn new(base: EngineConfig) -> Result<Self, ConfigError> {
        let engine = fresh_engine(base)?;
        Ok(Self {
            base,
            engine,
            last_seq: None,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Handle one trimmed, non-empty line.
    pub fn handle_line(&mut self, line: &str) -> Replies {
        let mut out = Replies::new();

        let msg = match parse_message(line) {
            Ok(msg) => msg,
            Err(e) => {
                let seq = extract_seq_best_effort(line).unwrap_or(0);
                debug!(seq, error = %e, "unparseable message");
                out.push(OutboundMessage::Error(create_error(
                    seq,
                    ErrorCode::InvalidMessage,
                    &e.to_string(),
                )));
                return out;
            }
        };

        let seq = msg.seq();
        if self.last_seq.is_some_and(|prev| seq <= prev) {
            out.push(OutboundMessage::Error(create_error(
                seq,
                ErrorCode::InvalidSeq,
                "seq must be strictly increasing",
            )));
            return out;
        }
        self.last_seq = Some(seq);

        match msg {
            ParsedMessage::Reset(reset) => self.handle_reset(reset, &mut out),
            ParsedMessage::Command(cmd) => self.handle_command(cmd, &mut out),
            ParsedMessage::Observe(obs) => out.push(self.observation(obs.seq)),
            ParsedMessage::Unknown(unknown) => out.push(OutboundMessage::Error(create_error(
                unknown.seq,
                ErrorCode::InvalidMessage,
                "unknown message type",
            ))),
        }
        out
    }

    fn handle_reset(&mut self, reset: ResetMessage, out: &mut Replies) {
        let mut config = self.base;
        if let Some(seed) = reset.seed {
            config.seed = seed;
        }
        if let Some(RandomizerName(kind)) = reset.randomizer {
            config.randomizer = kind;
        }
        config.width = reset.width.unwrap_or(config.width);
        config.height = reset.height.unwrap_or(config.height);

        match fresh_engine(config) {
            Ok(engine) => {
                info!(
                    seed = config.seed,
                    randomizer = config.randomizer.as_str(),
                    width = config.width,
                    height = config.height,
                    "session reset"
                );
                self.engine = engine;
                out.push(self.observation(reset.seq));
            }
            Err(e) => out.push(OutboundMessage::Error(create_error(
                reset.seq,
                ErrorCode::InvalidConfig,
                &e.to_string(),
            ))),
        }
    }

    fn handle_command(&mut self, cmd: CommandMessage, out: &mut Replies) {
        let mut plan = ActionPlan::from(cmd.actions.0);
        if cmd.auto_hard_drop {
            plan.ensure_hard_drop();
        }

        match replay(&mut self.engine, &plan) {
            Ok(report) => {
                out.push(OutboundMessage::Ack(create_ack(cmd.seq, &report)));
                out.push(self.observation(cmd.seq));
            }
            Err(e) => out.push(OutboundMessage::Error(create_error(
                cmd.seq,
                e.into(),
                &e.to_string(),
            ))),
        }
    }

    fn observation(&self, seq: u64) -> OutboundMessage {
        OutboundMessage::Observation(build_observation(seq, &self.engine.snapshot()))
    }
}

fn fresh_engine(config: EngineConfig) -> Result<Engine, ConfigError> {
    let mut engine = Engine::new(config)?;
    // A brand-new board always has room for the first piece.
    let spawned = engine.spawn_next();
    debug_assert_eq!(spawned, Ok(true), "empty board refused the first piece");
    Ok(engine)
}
