//! Shared test helpers.

#![allow(dead_code)]

use std::time::Duration;

use zonekit::record::{Record, ToRr, RR};

/// Asserts that a `Result` is `Ok` and unwraps it, failing the test otherwise.
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Asserts that an `Option` is `Some` and unwraps it, failing the test otherwise.
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Builds a generic record for test fixtures.
pub fn rr(name: &str, ttl: u64, record_type: &str, data: &str) -> RR {
    RR {
        name: name.to_string(),
        ttl: Duration::from_secs(ttl),
        record_type: record_type.to_string(),
        data: data.to_string(),
    }
}

/// Flattens a batch of records for order-insensitive comparison.
pub fn flatten_sorted(records: &[Record]) -> Vec<RR> {
    let mut rrs: Vec<RR> = records.iter().map(ToRr::to_rr).collect();
    rrs.sort_by(|a, b| {
        (&a.name, &a.record_type, &a.data).cmp(&(&b.name, &b.record_type, &b.data))
    });
    rrs
}
