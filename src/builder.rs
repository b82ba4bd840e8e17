use crate::clock::{Clock, SystemClock};
use crate::error::Error;
use crate::issuer::{
    Internals, Issuer, SharedIssuer, BIT_LEN_NODE_ID, BIT_LEN_SEQUENCE, DEFAULT_EPOCH,
};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

/// A builder for building the [`Issuer`] generator.
///
/// The defaults reproduce the fixed id format: 10 node bits, 12 sequence
/// bits, and [`DEFAULT_EPOCH`]. Widening one field narrows the room left for
/// the others: node bits trade fleet size, sequence bits trade per-second
/// throughput, and both trade against the lifetime of the time field.
pub struct Builder<C = SystemClock> {
    epoch: Option<DateTime<Utc>>,
    node_id: Option<u16>,
    node_bits: u8,
    sequence_bits: u8,
    clock: C,
}

impl Default for Builder<SystemClock> {
    fn default() -> Self {
        Builder::new()
    }
}

impl Builder<SystemClock> {
    /// Construct a new builder for the build of [`Issuer`].
    pub fn new() -> Self {
        Self {
            epoch: None,
            node_id: None,
            node_bits: BIT_LEN_NODE_ID,
            sequence_bits: BIT_LEN_SEQUENCE,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Builder<C> {
    /// Set the node id. Required; there is no usable default, and ids from
    /// different issuers only stay collision-free when every node id in the
    /// fleet is distinct.
    pub fn node_id(mut self, node_id: u16) -> Self {
        self.node_id = Some(node_id);
        self
    }

    /// Set the reference instant subtracted from the clock before encoding.
    /// If the instant is set later than the current time, `finalize` will
    /// fail.
    pub fn epoch(mut self, epoch: DateTime<Utc>) -> Self {
        self.epoch = Some(epoch);
        self
    }

    /// Set the bit length of the node id section.
    pub fn node_bits(mut self, node_bits: u8) -> Self {
        self.node_bits = node_bits;
        self
    }

    /// Set the bit length of the sequence section.
    pub fn sequence_bits(mut self, sequence_bits: u8) -> Self {
        self.sequence_bits = sequence_bits;
        self
    }

    /// Set the clock the issuer reads. Primarily useful for substituting a
    /// simulated clock in tests.
    pub fn clock<D: Clock>(self, clock: D) -> Builder<D> {
        Builder {
            epoch: self.epoch,
            node_id: self.node_id,
            node_bits: self.node_bits,
            sequence_bits: self.sequence_bits,
            clock,
        }
    }

    /// Finish building and create an [`Issuer`] instance.
    /// This method will return an error if the node id is missing or out of
    /// range, or if the configured layout or epoch fails validation.
    pub fn finalize(self) -> Result<Issuer<C>, Error> {
        if !(1..=16).contains(&self.node_bits) || !(1..=16).contains(&self.sequence_bits) {
            return Err(Error::InvalidBitLength(self.node_bits, self.sequence_bits));
        }

        let node_id = self.node_id.ok_or(Error::NodeIdMissing)?;
        let max = ((1u32 << self.node_bits) - 1) as u16;
        if node_id > max {
            return Err(Error::NodeIdOutOfRange { node_id, max });
        }

        let epoch = if let Some(epoch) = self.epoch {
            let epoch = epoch.timestamp();
            let now = Utc::now().timestamp();
            if epoch > now {
                return Err(Error::EpochAheadOfCurrentTime { epoch, now });
            }
            epoch
        } else {
            DEFAULT_EPOCH
        };

        let shared = Arc::new(SharedIssuer {
            epoch,
            node_id,
            node_bits: self.node_bits,
            sequence_bits: self.sequence_bits,
            clock: self.clock,
            internals: Mutex::new(Internals {
                last_tick: 0,
                sequence: 0,
            }),
        });
        Ok(Issuer::new_inner(shared))
    }
}
