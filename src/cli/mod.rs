//! Serial command-line interface.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      CLI Stack                             │
//! │                                                            │
//! │  ┌───────────┐   ┌──────────┐   ┌──────────────────────┐   │
//! │  │ Transport │──▶│  Codec   │──▶│ Engine (dispatcher)  │   │
//! │  │ (trait)   │   │ (lines)  │   │  → handlers → Rig    │   │
//! │  └───────────┘   └──────────┘   └──────────────────────┘   │
//! │       ▲                                    │               │
//! │       └──────────── one reply line ◀───────┘               │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod args;
pub mod codec;
pub mod engine;
pub mod handlers;
pub mod transport;
