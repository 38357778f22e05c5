//! Resolution of the total number of matching products.
//!
//! The catalog may report the total in the response body or in the
//! `x-total-count` header. Without either, the total is inferred from the
//! length of the returned page.

use std::num::NonZeroU32;

use finder_catalog::ProductsPage;
use serde::Serialize;
use tracing::debug;

/// A total reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalSignal {
    Body(u64),
    Header(u64),
}

/// Where a [TotalCount] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TotalSource {
    Body,
    Header,
    /// The page was short, so it was the last one.
    LastPage,
    /// The page was full, so at least one more page is assumed.
    Estimated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TotalCount {
    pub value: u64,
    pub source: TotalSource,
}

impl TotalCount {
    pub fn is_authoritative(&self) -> bool {
        self.source != TotalSource::Estimated
    }
}

/// Pick the total reported by the catalog, body before header.
///
/// A body total of `0` counts as absent.
/// Header values that do not parse as a non negative integer are ignored.
pub fn resolve_signal(body_total: Option<u64>, header: Option<&str>) -> Option<TotalSignal> {
    if let Some(total) = body_total.filter(|total| *total > 0) {
        return Some(TotalSignal::Body(total));
    }
    let header = header?;
    match header.trim().parse::<u64>() {
        Ok(total) => Some(TotalSignal::Header(total)),
        Err(e) => {
            debug!(header, error = %e, "ignoring unparseable total count header");
            None
        },
    }
}

/// Compute the total count of a query.
///
/// A reported total always wins.
/// Otherwise a short page yields the exact count
/// and a full page assumes exactly one more page.
/// The estimate may shrink once later pages are seen.
pub fn estimate_total(
    current_page: NonZeroU32,
    page_size: NonZeroU32,
    returned_count: usize,
    signal: Option<TotalSignal>,
) -> TotalCount {
    match signal {
        Some(TotalSignal::Body(value)) => TotalCount {
            value,
            source: TotalSource::Body,
        },
        Some(TotalSignal::Header(value)) => TotalCount {
            value,
            source: TotalSource::Header,
        },
        None => {
            let page = u64::from(current_page.get());
            let size = u64::from(page_size.get());
            let returned = returned_count as u64;
            if returned < size {
                TotalCount {
                    value: (page - 1) * size + returned,
                    source: TotalSource::LastPage,
                }
            } else {
                TotalCount {
                    value: (page + 1) * size,
                    source: TotalSource::Estimated,
                }
            }
        },
    }
}

/// Resolve the total count for a page received for `current_page`.
pub fn total_for_page(
    current_page: NonZeroU32,
    page_size: NonZeroU32,
    page: &ProductsPage,
) -> TotalCount {
    let signal = resolve_signal(page.products.total, page.total_header.as_deref());
    estimate_total(current_page, page_size, page.products.items.len(), signal)
}

#[cfg(test)]
mod tests {
    use finder_test_utils::fixtures;
    use finder_test_utils::proptest::{page_number_strat, page_size_strat};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn n(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn body_total_wins_over_header() {
        assert_eq!(
            resolve_signal(Some(40), Some("99")),
            Some(TotalSignal::Body(40))
        );
    }

    #[test]
    fn zero_body_total_falls_back_to_header_and_heuristic() {
        let page = fixtures::page_with_total(1, 6, 0);
        assert_eq!(total_for_page(n(1), n(6), &page), TotalCount {
            value: 12,
            source: TotalSource::Estimated,
        });

        let mut page = fixtures::page_with_total(1, 6, 0);
        page.total_header = Some("20".to_string());
        assert_eq!(total_for_page(n(1), n(6), &page), TotalCount {
            value: 20,
            source: TotalSource::Header,
        });

        let page = fixtures::page_with_total(1, 0, 0);
        assert_eq!(total_for_page(n(1), n(6), &page), TotalCount {
            value: 0,
            source: TotalSource::LastPage,
        });
    }

    #[test]
    fn header_total_is_trimmed() {
        assert_eq!(
            resolve_signal(None, Some(" 57 ")),
            Some(TotalSignal::Header(57))
        );
    }

    #[test]
    fn invalid_header_totals_are_ignored() {
        assert_eq!(resolve_signal(None, Some("-3")), None);
        assert_eq!(resolve_signal(None, Some("many")), None);
        assert_eq!(resolve_signal(None, Some("")), None);

        let page = fixtures::page_with_header(1, 6, "lots");
        assert_eq!(total_for_page(n(1), n(6), &page).value, 12);
    }

    #[test]
    fn full_first_page_estimates_one_more_page() {
        let total = estimate_total(n(1), n(6), 6, None);
        assert_eq!(total.value, 12);
        assert!(!total.is_authoritative());
    }

    #[test]
    fn short_page_is_exact() {
        let total = estimate_total(n(2), n(6), 3, None);
        assert_eq!(total.value, 9);
        assert!(total.is_authoritative());
    }

    #[test]
    fn empty_first_page_is_zero() {
        assert_eq!(estimate_total(n(1), n(6), 0, None).value, 0);
    }

    proptest! {
        #[test]
        fn short_pages_count_exactly(
            page in page_number_strat(1_000),
            size in page_size_strat(),
            returned_seed in any::<u32>(),
        ) {
            let returned = (returned_seed % size.get()) as usize;
            let total = estimate_total(page, size, returned, None);
            let expected = u64::from(page.get() - 1) * u64::from(size.get()) + returned as u64;
            prop_assert_eq!(total.value, expected);
            prop_assert_eq!(total.source, TotalSource::LastPage);
        }

        #[test]
        fn full_pages_assume_one_more(page in page_number_strat(1_000), size in page_size_strat()) {
            let total = estimate_total(page, size, size.get() as usize, None);
            prop_assert_eq!(total.value, u64::from(page.get() + 1) * u64::from(size.get()));
            prop_assert!(!total.is_authoritative());
        }

        #[test]
        fn reported_totals_are_used_verbatim(
            page in page_number_strat(1_000),
            size in page_size_strat(),
            returned in 0usize..200,
            reported in any::<u64>(),
        ) {
            let total = estimate_total(page, size, returned, Some(TotalSignal::Header(reported)));
            prop_assert_eq!(total.value, reported);
            prop_assert!(total.is_authoritative());
        }
    }
}
