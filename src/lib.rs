//! Compact, time-sortable, unique 64-bit IDs for distributed deployments.
//!
//! Each [`Issuer`] is bound to one node id and combines a coarse timestamp,
//! that node id, and a per-second sequence counter into a single sortable
//! integer. Issuers on distinct nodes never need to coordinate: as long as
//! every node is configured with a distinct node id, their ids cannot
//! collide.
//!
//! ## Quickstart
//!
//! Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! sleet = "0.1"
//! ```
//!
//! Use the library like this:
//!
//! ```
//! use sleet::Issuer;
//!
//! let issuer = Issuer::new(1).unwrap();
//! let id = issuer.next_id();
//! println!("{}", id);
//! ```
//!
//! ## Concurrent use
//!
//! An `Issuer` is thread-safe. `clone` it before moving to another thread;
//! clones share the same issuance state:
//! ```
//! use sleet::Issuer;
//! use std::thread;
//!
//! let issuer = Issuer::new(1).unwrap();
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let thread_issuer = issuer.clone();
//!     children.push(thread::spawn(move || {
//!         println!("{}", thread_issuer.next_id());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```
#![doc(html_root_url = "https://docs.rs/sleet/*")]

mod builder;
mod clock;
mod error;
mod issuer;

pub use crate::issuer::*;
pub use builder::*;
pub use clock::*;
pub use error::*;
