//! Arena growth negotiation
//!
//! The simulation module owns a single linear memory. When it needs more room
//! it calls back into the host with the total byte size it wants; the host
//! grows the memory by whole pages and answers with the usable size.
//!
//! Growing replaces the backing storage, so any byte view taken before an
//! engine call is stale afterwards. Views are therefore only ever borrowed
//! from the engine between calls (see [`crate::SimulationEngine::arena`]).

/// Size of one linear-memory page (64 KiB).
pub const PAGE_SIZE: usize = 64 * 1024;

/// Outcome of a growth request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthDecision {
    /// Bytes the module asked for (0 means "just tell me the size").
    pub requested: usize,
    /// Usable bytes before the request.
    pub previous_len: usize,
    /// Whole pages the arena must grow by.
    pub pages: usize,
}

impl GrowthDecision {
    /// Usable bytes once the growth has been applied.
    #[inline]
    pub fn resulting_len(&self) -> usize {
        self.previous_len + self.pages * PAGE_SIZE
    }

    #[inline]
    pub fn is_query(&self) -> bool {
        self.requested == 0
    }

    #[inline]
    pub fn grows(&self) -> bool {
        self.pages > 0
    }
}

/// Decide how far the arena grows for a request of `requested` total bytes.
///
/// Requests at or below the current length never grow; memory never shrinks.
pub fn negotiate_growth(previous_len: usize, requested: usize) -> GrowthDecision {
    let pages = if requested == 0 {
        0
    } else {
        requested
            .saturating_sub(previous_len)
            .div_ceil(PAGE_SIZE)
    };

    GrowthDecision {
        requested,
        previous_len,
        pages,
    }
}

/// Round a byte count up to KiB for log output.
#[inline]
pub fn kib(bytes: usize) -> usize {
    (bytes + 1023) >> 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_request_is_a_size_query() {
        let decision = negotiate_growth(3 * PAGE_SIZE, 0);
        assert!(decision.is_query());
        assert!(!decision.grows());
        assert_eq!(decision.resulting_len(), 3 * PAGE_SIZE);
    }

    #[test]
    fn smaller_request_does_not_shrink() {
        let decision = negotiate_growth(4 * PAGE_SIZE, PAGE_SIZE + 17);
        assert_eq!(decision.pages, 0);
        assert_eq!(decision.resulting_len(), 4 * PAGE_SIZE);
    }

    #[test]
    fn rounds_up_to_whole_pages() {
        let decision = negotiate_growth(PAGE_SIZE, PAGE_SIZE + 1);
        assert_eq!(decision.pages, 1);
        assert_eq!(decision.resulting_len(), 2 * PAGE_SIZE);

        let decision = negotiate_growth(PAGE_SIZE, 3 * PAGE_SIZE);
        assert_eq!(decision.pages, 2);
        assert_eq!(decision.resulting_len(), 3 * PAGE_SIZE);
    }

    #[test]
    fn result_is_smallest_page_multiple_covering_request() {
        let mut len = PAGE_SIZE;
        let requests = [
            1usize, 65_535, 65_536, 65_537, 100_000, 131_072, 4_000_000, 12, 4_000_001,
            16 * 1024 * 1024,
        ];
        for &requested in &requests {
            let decision = negotiate_growth(len, requested);
            let result = decision.resulting_len();
            let floor = requested.max(len);

            assert!(result >= floor, "request {requested} -> {result}");
            assert_eq!(result % PAGE_SIZE, 0);
            assert!(result - floor < PAGE_SIZE, "request {requested} overshot");
            assert!(result >= len, "arena shrank");
            len = result;
        }
    }

    #[test]
    fn kib_rounds_up() {
        assert_eq!(kib(0), 0);
        assert_eq!(kib(1), 1);
        assert_eq!(kib(1024), 1);
        assert_eq!(kib(PAGE_SIZE), 64);
    }
}
