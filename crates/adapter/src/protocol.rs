//! Protocol module - JSON message types for the engine adapter
//!
//! Line-delimited JSON. Every message carries `type` and `seq`; clients must
//! send strictly increasing `seq` values on a connection.

use serde::{Deserialize, Serialize};

use arrayvec::ArrayVec;

use crate::core::{EngineError, Snapshot};
use crate::engine::ReplayReport;
use crate::types::{Action, RandomizerKind, MAX_PLAN_ACTIONS};

// ============== Client -> Server Messages ==============

/// Start a fresh engine session on this connection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetMessage {
    pub seq: u64,
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub randomizer: Option<RandomizerName>,
    #[serde(default)]
    pub width: Option<u8>,
    #[serde(default)]
    pub height: Option<u8>,
}

/// Replay a list of actions into the session.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandMessage {
    pub seq: u64,
    pub actions: ActionList,
    /// Append `hard_drop` when the list has none.
    #[serde(default)]
    pub auto_hard_drop: bool,
}

/// Request a fresh observation without changing anything.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ObserveMessage {
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RandomizerName(pub RandomizerKind);

impl<'de> Deserialize<'de> for RandomizerName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        RandomizerKind::from_str(s)
            .map(RandomizerName)
            .ok_or_else(|| serde::de::Error::custom("invalid randomizer"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionName(pub Action);

impl<'de> Deserialize<'de> for ActionName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        Action::from_str(s)
            .map(ActionName)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown action {s:?}")))
    }
}

impl Serialize for ActionName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

/// Bounded action list; more than [`MAX_PLAN_ACTIONS`] entries is a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionList(pub ArrayVec<Action, MAX_PLAN_ACTIONS>);

impl<'de> Deserialize<'de> for ActionList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = ActionList;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "an array of action strings")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut out = ArrayVec::<Action, MAX_PLAN_ACTIONS>::new();
                while let Some(ActionName(a)) = seq.next_element::<ActionName>()? {
                    out.try_push(a)
                        .map_err(|_| serde::de::Error::custom("too many actions"))?;
                }
                Ok(ActionList(out))
            }
        }

        deserializer.deserialize_seq(V)
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_message")]
    InvalidMessage,
    #[serde(rename = "invalid_seq")]
    InvalidSeq,
    #[serde(rename = "topped_out")]
    ToppedOut,
    #[serde(rename = "invalid_config")]
    InvalidConfig,
    #[serde(rename = "invalid_state")]
    InvalidState,
}

impl From<EngineError> for ErrorCode {
    fn from(value: EngineError) -> Self {
        match value {
            EngineError::ToppedOut => ErrorCode::ToppedOut,
            EngineError::NoActivePiece | EngineError::PieceInPlay => ErrorCode::InvalidState,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivePieceSnapshot {
    pub kind: &'static str,
    pub rotation: u8,
    pub x: i16,
    pub y: i16,
    pub cells: Vec<[i16; 2]>,
}

/// Full session state
#[derive(Debug, Clone, Serialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub width: u8,
    pub height: u8,
    /// Rows top to bottom; 0 empty, 1..=7 piece palette.
    pub cells: Vec<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<ActivePieceSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ghost_y: Option<i16>,
    pub next: &'static str,
    pub topped_out: bool,
    pub score: u32,
    pub lines_cleared: u32,
    pub level: u32,
    pub pieces_locked: u32,
}

/// Command acknowledgment
#[derive(Debug, Clone, Serialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub applied: u32,
    pub blocked: u32,
    pub locks: u32,
    pub lines_cleared: u32,
    pub topped_out: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub code: ErrorCode,
    pub message: String,
}

// ============== Parsing ==============

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Reset(ResetMessage),
    Command(CommandMessage),
    Observe(ObserveMessage),
    Unknown(UnknownMessage),
}

impl ParsedMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ParsedMessage::Reset(m) => m.seq,
            ParsedMessage::Command(m) => m.seq,
            ParsedMessage::Observe(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "reset")]
        Reset(ResetMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
        #[serde(rename = "observe")]
        Observe(ObserveMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Reset(m)) => Ok(ParsedMessage::Reset(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Ok(InboundMessage::Observe(m)) => Ok(ParsedMessage::Observe(m)),
        Err(e) => {
            // An unrecognized type still gets a reply carrying its seq.
            #[derive(Debug, Deserialize)]
            struct TypeOnly<'a> {
                #[serde(rename = "type")]
                msg_type: Option<&'a str>,
                seq: Option<u64>,
            }
            let head = serde_json::from_str::<TypeOnly>(json)?;
            match head.msg_type {
                Some("reset" | "command" | "observe") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: head.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Pull `"seq": N` out of a line that failed to parse.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Builders ==============

pub fn build_observation(seq: u64, snapshot: &Snapshot) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        width: snapshot.width,
        height: snapshot.height,
        cells: snapshot.rows().map(<[u8]>::to_vec).collect(),
        active: snapshot.active.map(|a| ActivePieceSnapshot {
            kind: a.kind.as_str(),
            rotation: a.rotation,
            x: a.x,
            y: a.y,
            cells: a.cells.iter().map(|&(x, y)| [x, y]).collect(),
        }),
        ghost_y: snapshot.ghost_y,
        next: snapshot.next.as_str(),
        topped_out: snapshot.topped_out,
        score: snapshot.score,
        lines_cleared: snapshot.lines_cleared,
        level: snapshot.level,
        pieces_locked: snapshot.pieces_locked,
    }
}

pub fn create_ack(seq: u64, report: &ReplayReport) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        applied: report.applied,
        blocked: report.blocked,
        locks: report.locks,
        lines_cleared: report.lines_cleared,
        topped_out: report.topped_out,
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        code,
        message: message.to_string(),
    }
}
