// Copyright 2025 sleet
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

/// Convenience type alias for usage within sleet.
#[cfg(test)]
pub(crate) type BoxDynError = Box<dyn std::error::Error + 'static + Send + Sync>;

/// The error type for this crate. Every variant is raised synchronously at
/// construction; issuance itself never fails.
#[derive(Error, Debug)]
pub enum Error {
    #[error("node id {node_id} is out of range (maximum allowed is {max})")]
    NodeIdOutOfRange { node_id: u16, max: u16 },
    #[error("node id was not provided")]
    NodeIdMissing,
    #[error("invalid bit length configuration: node id ({0}) and sequence ({1}) widths must each be between 1 and 16")]
    InvalidBitLength(u8, u8),
    #[error("epoch {epoch} is ahead of the current time {now} (seconds since the Unix epoch)")]
    EpochAheadOfCurrentTime { epoch: i64, now: i64 },
}
