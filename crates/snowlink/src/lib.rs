//! Snowflake-style 64-bit IDs and a reversible Base62 encoding.
//!
//! A [`SnowflakeGenerator`] mints [`SnowflakeId`]s: 41 bits of milliseconds
//! since an epoch, a 10-bit node ID and a 12-bit per-millisecond sequence.
//! IDs from one node are unique as long as its clock does not run backwards,
//! and IDs from distinct nodes never collide. [`Base62Ext::encode`] turns an
//! ID into a short URL-safe token and [`Base62Ext::decode`] reverses it.
//!
//! ```
//! use snowlink::{Base62Ext, NodeId, SkewPolicy, SnowflakeGenerator, SnowflakeId, WallClock};
//!
//! let node_id = NodeId::resolve(Some(7), None).unwrap();
//! let generator = SnowflakeGenerator::new(node_id, WallClock::default());
//!
//! let id = SkewPolicy::default().next_id(&generator).unwrap();
//! let token = id.encode();
//!
//! let back = SnowflakeId::decode(&token).unwrap();
//! assert_eq!(back.parse(), id.parse());
//! assert_eq!(back.node_id(), 7);
//! ```
//!
//! # Features
//!
//! - `parking-lot`: use `parking_lot::Mutex` for generator state (no lock
//!   poisoning, so [`Error::LockPoisoned`] disappears).
//! - `cache-padded`: pad the generator state to a cache line.
//! - `serde`: (de)serialize [`SnowflakeId`] as its raw `u64`.
//! - `tracing`: trace spans around minting and events on clock skew.

mod base62;
mod generator;
mod id;
mod node;
mod time;

pub use crate::base62::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::node::*;
pub use crate::time::*;
