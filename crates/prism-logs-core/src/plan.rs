//! # Page Plan
//!
//! Offset arithmetic shared by both pagination engines.
//!
//! A plan is fixed the moment the total is first read. Pages are never
//! re-planned, even if the server's total or page contents drift during the
//! retrieval: the loop is bounded by arithmetic, not by empty pages, so a
//! short page can neither stall nor extend it.

/// Length of the first request of a flat listing, only used to learn the total.
pub const PROBE_LENGTH: u64 = 10;

/// Page length for flat `<kind>s/list` queries.
pub const FLAT_PAGE_LENGTH: u64 = 100;

/// Page length for grouped `groups` queries (the server's member cap).
pub const GROUP_PAGE_LENGTH: u64 = 999;

/// Cursors `start, start + step, ...` strictly below `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    start: u64,
    total: u64,
    step: u64,
}

impl PagePlan {
    /// Create a plan. A zero `step` is bumped to 1.
    #[must_use]
    pub const fn new(start: u64, total: u64, step: u64) -> Self {
        Self {
            start,
            total,
            step: if step == 0 { 1 } else { step },
        }
    }

    /// Plan for a flat listing, starting at the server-reported offset.
    #[must_use]
    pub const fn flat(reported_offset: u64, total: u64) -> Self {
        Self::new(reported_offset, total, FLAT_PAGE_LENGTH)
    }

    /// Plan for a grouped listing, always starting at zero.
    #[must_use]
    pub const fn grouped(total: u64) -> Self {
        Self::new(0, total, GROUP_PAGE_LENGTH)
    }

    /// Page length every planned request asks for.
    #[must_use]
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// Total reported by the server when the plan was made.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages the plan will request.
    #[must_use]
    pub const fn len(&self) -> u64 {
        if self.start >= self.total {
            0
        } else {
            (self.total - self.start).div_ceil(self.step)
        }
    }

    /// True when nothing needs to be fetched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the planned cursors in increasing order.
    pub fn cursors(&self) -> impl Iterator<Item = u64> + use<> {
        let (start, total, step) = (self.start, self.total, self.step);
        (start..total).step_by(usize::try_from(step).unwrap_or(usize::MAX))
    }
}
