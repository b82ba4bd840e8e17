use crate::builder::Builder;
use crate::clock::{Clock, SystemClock};
use crate::error::Error;
use std::{
    cmp::Ordering,
    sync::{Arc, Mutex, PoisonError},
    thread,
    time::Duration,
};

/// bit length of the node id field in the default layout
pub(crate) const BIT_LEN_NODE_ID: u8 = 10;
/// bit length of the sequence field in the default layout
pub(crate) const BIT_LEN_SEQUENCE: u8 = 12;

/// Default reference instant: 2021-08-26T10:18:39Z, in seconds since the
/// Unix epoch. Subtracted from every clock reading before encoding so the
/// time field starts near zero.
pub const DEFAULT_EPOCH: i64 = 1_629_973_119;

/// Interval between clock polls while an issuance call is stalled.
const CLOCK_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Internals of an Issuer. Mutated only under the instance lock.
/// This struct is not exposed to the public.
#[derive(Debug)]
pub(crate) struct Internals {
    pub(crate) last_tick: i64,
    pub(crate) sequence: u16,
}

/// SharedIssuer is shared between the clones of one Issuer.
/// This struct is not exposed to the public.
pub(crate) struct SharedIssuer<C> {
    pub(crate) epoch: i64,
    pub(crate) node_id: u16,
    pub(crate) node_bits: u8,
    pub(crate) sequence_bits: u8,
    pub(crate) clock: C,
    pub(crate) internals: Mutex<Internals>,
}

/// An `Issuer` generates unique, time-sortable 64-bit ids for one node of a
/// distributed deployment. It is thread-safe and can be cloned to be used in
/// multiple threads; clones share the same issuance state.
pub struct Issuer<C = SystemClock>(pub(crate) Arc<SharedIssuer<C>>);

impl Issuer<SystemClock> {
    /// Create a new Issuer with the default layout (10 node bits, 12
    /// sequence bits, [`DEFAULT_EPOCH`]) and the system clock.
    ///
    /// Fails with [`Error::NodeIdOutOfRange`] when `node_id` exceeds 1023.
    /// Ids from different issuers are only collision-free when every issuer
    /// in the fleet carries a distinct node id; assigning those ids is the
    /// caller's responsibility (static configuration, a coordination
    /// service, and so on). For custom configuration see [`builder`].
    ///
    /// [`builder`]: Issuer::builder
    pub fn new(node_id: u16) -> Result<Self, Error> {
        Builder::new().node_id(node_id).finalize()
    }

    /// Create a new [`Builder`] to construct an Issuer.
    pub fn builder() -> Builder<SystemClock> {
        Builder::new()
    }
}

impl<C: Clock> Issuer<C> {
    /// Wrap shared state produced by the builder.
    pub(crate) fn new_inner(shared: Arc<SharedIssuer<C>>) -> Self {
        Self(shared)
    }

    /// Issue the next unique id.
    ///
    /// This call never fails. It may block while the sequence space for the
    /// current second is exhausted, or while the clock has fallen behind the
    /// last recorded tick (for example after an NTP step): in both cases it
    /// polls the clock until the stall clears and only then returns. With
    /// the default layout an instance can issue at most 4096 ids per second
    /// before the call starts waiting.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> u64 {
        let shared = &self.0;
        // A panic cannot happen between the field updates below, so state
        // recovered from a poisoned lock is coherent.
        let mut internals = shared
            .internals
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let max_sequence = ((1u32 << shared.sequence_bits) - 1) as u16;

        let now = loop {
            let now = shared.clock.now_secs();
            match now.cmp(&internals.last_tick) {
                Ordering::Equal => {
                    if internals.sequence < max_sequence {
                        internals.sequence += 1;
                        break now;
                    }
                    // Sequence space for this tick is used up: stall until
                    // the clock moves past it.
                    internals.sequence = 0;
                    let next = self.wait_until_after(internals.last_tick);
                    internals.last_tick = next;
                    break next;
                }
                Ordering::Greater => {
                    internals.sequence = 0;
                    internals.last_tick = now;
                    break now;
                }
                Ordering::Less => {
                    // The clock fell behind the last recorded tick. Wait for
                    // it to catch back up to the high-water mark, then rerun
                    // the case analysis against a fresh reading.
                    self.wait_until_at_least(internals.last_tick);
                }
            }
        };

        ((now - shared.epoch) as u64) << (shared.node_bits + shared.sequence_bits)
            | u64::from(shared.node_id) << shared.sequence_bits
            | u64::from(internals.sequence)
    }

    /// Break an id up into its parts, using this instance's bit widths.
    /// For ids produced with the default layout [`crate::decompose`] is
    /// equivalent.
    pub fn decompose(&self, id: u64) -> DecomposedId {
        let shared = &self.0;
        let sequence_mask = (1u64 << shared.sequence_bits) - 1;
        let node_mask = ((1u64 << shared.node_bits) - 1) << shared.sequence_bits;
        DecomposedId {
            id,
            time: id >> (shared.node_bits + shared.sequence_bits),
            node_id: (id & node_mask) >> shared.sequence_bits,
            sequence: id & sequence_mask,
        }
    }

    /// The node id this issuer was constructed with.
    pub fn node_id(&self) -> u16 {
        self.0.node_id
    }

    /// The reference instant subtracted from the clock before encoding, in
    /// seconds since the Unix epoch.
    pub fn epoch(&self) -> i64 {
        self.0.epoch
    }

    /// Poll the clock until it reports a value strictly greater than `tick`.
    fn wait_until_after(&self, tick: i64) -> i64 {
        let mut now = self.0.clock.now_secs();
        while now <= tick {
            thread::sleep(CLOCK_POLL_INTERVAL);
            now = self.0.clock.now_secs();
        }
        now
    }

    /// Poll the clock until it reports a value of at least `tick`.
    fn wait_until_at_least(&self, tick: i64) {
        while self.0.clock.now_secs() < tick {
            thread::sleep(CLOCK_POLL_INTERVAL);
        }
    }
}

/// Returns a new `Issuer` referencing the same state as `self`.
/// This is used for concurrent use.
impl<C> Clone for Issuer<C> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// DecomposedId is the parts of an issued id.
#[derive(Debug, Clone, Copy)]
pub struct DecomposedId {
    pub id: u64,
    pub time: u64,
    pub node_id: u64,
    pub sequence: u64,
}

/// The mask for the sequence field of the default layout.
const MASK_SEQUENCE: u64 = (1u64 << BIT_LEN_SEQUENCE) - 1;
/// The mask for the node id field of the default layout.
const MASK_NODE_ID: u64 = ((1u64 << BIT_LEN_NODE_ID) - 1) << BIT_LEN_SEQUENCE;

/// Break an id produced with the default layout up into its parts.
///
/// The `time` field is relative to the issuer's epoch; add the epoch back to
/// recover a wall-clock timestamp. For an issuer configured with custom bit
/// widths use [`Issuer::decompose`] instead.
pub fn decompose(id: u64) -> DecomposedId {
    DecomposedId {
        id,
        time: id >> (BIT_LEN_NODE_ID + BIT_LEN_SEQUENCE),
        node_id: (id & MASK_NODE_ID) >> BIT_LEN_SEQUENCE,
        sequence: id & MASK_SEQUENCE,
    }
}
