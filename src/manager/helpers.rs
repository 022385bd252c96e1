//! Helper functions for request bookkeeping

use uuid::Uuid;

use crate::types::identifiers::RequestId;

/// Length of the random request-id suffix
const SUFFIX_LEN: usize = 6;

/// Build `<agent>-<zero-padded counter>-<random suffix>`
///
/// The counter keeps ids from one agent sortable by issue order; the suffix
/// keeps ids unique across orchestrator instances.
pub(super) fn format_request_id(agent: &str, counter: u64) -> RequestId {
    let suffix = Uuid::new_v4().simple().to_string();
    RequestId::new(format!("{agent}-{counter:06}-{}", &suffix[..SUFFIX_LEN]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_layout() {
        let id = format_request_id("worker", 7);
        let s = id.as_str();
        assert!(s.starts_with("worker-000007-"), "got {s}");
        assert_eq!(s.len(), "worker-000007-".len() + SUFFIX_LEN);
    }

    #[test]
    fn ids_sort_by_counter() {
        let a = format_request_id("x", 9);
        let b = format_request_id("x", 10);
        assert!(a.as_str()[..8] < b.as_str()[..8]);
    }
}
