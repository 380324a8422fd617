//! Derived product view: select, filter, sort.
//!
//! Pure functions over the conversation log. Nothing here is cached; the
//! view is recomputed whenever the log or the view state changes.

use std::cmp::Ordering;

use dealbot_core::types::{ChatMessage, PlatformFilter, Product, SortBy};

/// Parse a currency-formatted price such as `"₹55,000"` into whole units.
///
/// Leading non-digit characters (currency symbols, `Rs.` prefixes) are
/// skipped and `,` separators ignored; parsing stops at the first other
/// character, so fractional parts are truncated. Returns `None` when the
/// string holds no digits or the value overflows.
pub fn parse_price(raw: &str) -> Option<u64> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let mut value: u64 = 0;
    for c in raw[start..].chars() {
        match c {
            '0'..='9' => {
                let digit = u64::from(c as u8 - b'0');
                value = value.checked_mul(10)?.checked_add(digit)?;
            }
            ',' => {}
            _ => break,
        }
    }
    Some(value)
}

/// Ascending order with unparseable prices after every valid one.
fn ascending(a: Option<u64>, b: Option<u64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compute the product list to display.
///
/// Products are taken from bot messages in arrival order, filtered by
/// platform price presence, then stably sorted by the price the filter
/// selects (flipkart under `Flipkart`, amazon otherwise). Invalid prices
/// sort last in ascending order and first in descending order.
pub fn derive_products(
    messages: &[ChatMessage],
    filter: PlatformFilter,
    sort: SortBy,
) -> Vec<&Product> {
    let candidates = messages
        .iter()
        .filter_map(ChatMessage::product)
        .filter(|p| filter.accepts(p));

    if sort == SortBy::None {
        return candidates.collect();
    }

    let mut keyed: Vec<(Option<u64>, &Product)> = candidates
        .map(|p| (parse_price(filter.sort_price(p)), p))
        .collect();

    // `sort_by` is stable: ties keep arrival order.
    match sort {
        SortBy::PriceAsc => keyed.sort_by(|a, b| ascending(a.0, b.0)),
        SortBy::PriceDesc => keyed.sort_by(|a, b| ascending(b.0, a.0)),
        SortBy::None => {}
    }

    keyed.into_iter().map(|(_, p)| p).collect()
}
