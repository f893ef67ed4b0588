//! Shared identifier and timestamp types used across the crate.

/// Identifier of a node in the lot topology (entrance, junction or slot).
pub type NodeId = String;

/// Identifier of a slot. Slots are graph nodes, so this is a node id.
pub type SlotId = NodeId;

/// Milliseconds since the Unix epoch.
pub type TimestampMs = u128;

/// Orders slot ids by their trailing number when both carry one (`S2` before
/// `S10`), falling back to plain string order.
pub fn natural_slot_order(a: &str, b: &str) -> std::cmp::Ordering {
    fn split(id: &str) -> (&str, Option<u64>) {
        let digits_at = id
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map_or(id.len(), |(i, _)| i);
        let (prefix, digits) = id.split_at(digits_at);
        (prefix, digits.parse().ok())
    }

    let (pa, na) = split(a);
    let (pb, nb) = split(b);
    pa.cmp(pb)
        .then_with(|| match (na, nb) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => std::cmp::Ordering::Equal,
        })
        .then_with(|| a.cmp(b))
}
