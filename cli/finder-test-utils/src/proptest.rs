use std::num::NonZeroU32;

use proptest::prelude::*;

/// Page sizes in a range a catalog would plausibly serve.
pub fn page_size_strat() -> impl Strategy<Value = NonZeroU32> {
    (1u32..=100).prop_map(|size| NonZeroU32::new(size).expect("range starts at 1"))
}

/// One based page numbers.
pub fn page_number_strat(max_page: u32) -> impl Strategy<Value = NonZeroU32> {
    (1..=max_page.max(1)).prop_map(|page| NonZeroU32::new(page).expect("range starts at 1"))
}
