//! Adapter module - engine control via TCP socket with JSON protocol
//!
//! This module lets an external move selector (a model harness, a script, a
//! human with netcat) drive board engines over a TCP socket connection.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7777)
//!    and gets its own engine, already holding a spawned piece
//! 2. **Reset**: Optional; starts a fresh engine with new seed/size/randomizer
//! 3. **Commanding**: Client sends action lists, server replays them
//! 4. **Observing**: Client may ask for the current state at any time
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **reset**: `seed`, `randomizer`, `width`, `height`, all optional
//! - **command**: `actions` (at most 32) plus `auto_hard_drop`
//! - **observe**: no payload
//!
//! ## Server → Client
//!
//! - **observation**: Full snapshot (grid, active piece, next, counters)
//! - **ack**: Replay summary, always followed by an observation
//! - **error**: `code` + `message`; the session is left untouched
//!
//! Every message carries a `seq` that must strictly increase per connection.
//!
//! # Environment Variables
//!
//! - `TETRIS_HARNESS_HOST`: Bind address (default: "127.0.0.1")
//! - `TETRIS_HARNESS_PORT`: Port number (default: 7777)
//! - `TETRIS_HARNESS_WIDTH` / `TETRIS_HARNESS_HEIGHT`: Board size (10 x 20)
//! - `TETRIS_HARNESS_RANDOMIZER`: `uniform` or `bag`
//! - `TETRIS_HARNESS_SEED`: Piece sequence seed
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"reset","seq":1,"seed":7}
//! Server -> Client: {"type":"observation","seq":1,"width":10,"height":20,"cells":[[0,...],...],"active":{...},"next":"t",...}
//! Client -> Server: {"type":"command","seq":2,"actions":["left","left","rotate","hard_drop"]}
//! Server -> Client: {"type":"ack","seq":2,"applied":4,"blocked":0,"locks":1,"lines_cleared":0,"topped_out":false}
//! Server -> Client: {"type":"observation","seq":2,...}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7777
//! {"type":"command","seq":1,"actions":["space"]}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use tetris_harness_core as core;
pub use tetris_harness_engine as engine;
pub use tetris_harness_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{ClientSession, OutboundMessage, Replies};
pub use server::*;
