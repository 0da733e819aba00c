//! Integration tests for the in-memory provider, exercising the full
//! `ZoneProvider` contract end to end.

mod common;

use std::time::Duration;

use common::{flatten_sorted, rr};
use zonekit::record::{Address, Cname, Record, Txt};
use zonekit::{MemoryProvider, ProviderError, ZoneProvider};

const ZONE: &str = "example.com.";

async fn provider() -> MemoryProvider {
    MemoryProvider::with_zones([ZONE]).await
}

fn a(name: &str, ttl: u64, ip: &str) -> Record {
    Address {
        name: name.to_string(),
        ttl: Duration::from_secs(ttl),
        ip: ip.parse().unwrap(),
    }
    .into()
}

fn txt(name: &str, ttl: u64, text: &str) -> Record {
    Txt {
        name: name.to_string(),
        ttl: Duration::from_secs(ttl),
        text: text.to_string(),
    }
    .into()
}

#[tokio::test]
async fn get_records_on_empty_zone() {
    let p = provider().await;
    let records = require_ok!(p.get_records(ZONE).await);
    assert!(records.is_empty());
}

#[tokio::test]
async fn unknown_zone_fails_everywhere() {
    let p = provider().await;
    for result in [
        p.get_records("missing.test.").await,
        p.append_records("missing.test.", vec![]).await,
        p.set_records("missing.test.", vec![]).await,
        p.delete_records("missing.test.", vec![]).await,
    ] {
        assert!(
            matches!(&result, Err(ProviderError::ZoneNotFound { zone, .. }) if zone == "missing.test."),
            "unexpected result: {result:?}"
        );
    }
}

#[tokio::test]
async fn append_accumulates_without_touching_existing() {
    let p = provider().await;
    require_ok!(p.append_records(ZONE, vec![a("www", 300, "192.0.2.1")]).await);
    require_ok!(p.append_records(ZONE, vec![a("www", 300, "192.0.2.1")]).await);

    // Append never deduplicates; the same record twice means two records.
    let records = require_ok!(p.get_records(ZONE).await);
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn get_returns_typed_records() {
    let p = provider().await;
    require_ok!(
        p.append_records(
            ZONE,
            vec![a("www", 300, "192.0.2.1"), txt("@", 300, "v=spf1 -all")],
        )
        .await
    );

    let records = require_ok!(p.get_records(ZONE).await);
    assert!(records.iter().any(|r| matches!(r, Record::Address(_))));
    assert!(records.iter().any(|r| matches!(r, Record::Txt(_))));
}

#[tokio::test]
async fn unknown_types_round_trip_as_generic() {
    let p = provider().await;
    let naptr = Record::Rr(rr("@", 300, "NAPTR", "100 50 \"s\" \"SIP+D2U\" \"\" x.example.com."));
    require_ok!(p.append_records(ZONE, vec![naptr.clone()]).await);

    let records = require_ok!(p.get_records(ZONE).await);
    assert_eq!(records, vec![naptr]);
}

#[tokio::test]
async fn set_replaces_the_named_rrset() {
    let p = provider().await;
    require_ok!(
        p.append_records(
            ZONE,
            vec![a("www", 300, "192.0.2.1"), a("www", 300, "192.0.2.2")],
        )
        .await
    );

    require_ok!(p.set_records(ZONE, vec![a("www", 300, "192.0.2.3")]).await);

    let records = require_ok!(p.get_records(ZONE).await);
    assert_eq!(
        flatten_sorted(&records),
        vec![rr("www", 300, "A", "192.0.2.3")]
    );
}

#[tokio::test]
async fn set_leaves_other_rrsets_alone() {
    let p = provider().await;
    require_ok!(
        p.append_records(
            ZONE,
            vec![
                a("www", 300, "192.0.2.1"),
                txt("www", 300, "keep-me"),
                a("other", 300, "192.0.2.9"),
            ],
        )
        .await
    );

    require_ok!(p.set_records(ZONE, vec![a("www", 600, "192.0.2.3")]).await);

    let records = require_ok!(p.get_records(ZONE).await);
    let rrs = flatten_sorted(&records);
    assert!(rrs.contains(&rr("www", 300, "TXT", "keep-me")));
    assert!(rrs.contains(&rr("other", 300, "A", "192.0.2.9")));
    assert!(rrs.contains(&rr("www", 600, "A", "192.0.2.3")));
    assert_eq!(rrs.len(), 3);
}

#[tokio::test]
async fn set_keeps_surviving_duplicates() {
    let p = provider().await;
    // Two byte-identical copies, then a batch asking for exactly one.
    require_ok!(
        p.append_records(
            ZONE,
            vec![a("www", 300, "192.0.2.1"), a("www", 300, "192.0.2.1")],
        )
        .await
    );

    require_ok!(p.set_records(ZONE, vec![a("www", 300, "192.0.2.1")]).await);

    let records = require_ok!(p.get_records(ZONE).await);
    assert_eq!(
        flatten_sorted(&records),
        vec![rr("www", 300, "A", "192.0.2.1")]
    );
}

#[tokio::test]
async fn set_is_idempotent() {
    let p = provider().await;
    let batch = vec![a("www", 300, "192.0.2.1"), txt("@", 3600, "hello")];

    require_ok!(p.set_records(ZONE, batch.clone()).await);
    let first = flatten_sorted(&require_ok!(p.get_records(ZONE).await));

    require_ok!(p.set_records(ZONE, batch).await);
    let second = flatten_sorted(&require_ok!(p.get_records(ZONE).await));

    assert_eq!(first, second);
}

#[tokio::test]
async fn set_with_multiple_rrsets_in_one_batch() {
    let p = provider().await;
    require_ok!(
        p.set_records(
            ZONE,
            vec![
                a("www", 300, "192.0.2.1"),
                a("www", 300, "192.0.2.2"),
                Cname {
                    name: "alias".to_string(),
                    ttl: Duration::from_secs(60),
                    target: "www.example.com.".to_string(),
                }
                .into(),
            ],
        )
        .await
    );

    let records = require_ok!(p.get_records(ZONE).await);
    assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn delete_exact_match() {
    let p = provider().await;
    require_ok!(
        p.append_records(
            ZONE,
            vec![a("x", 300, "192.0.2.1"), a("x", 300, "192.0.2.2")],
        )
        .await
    );

    require_ok!(p.delete_records(ZONE, vec![a("x", 300, "192.0.2.2")]).await);

    let records = require_ok!(p.get_records(ZONE).await);
    assert_eq!(
        flatten_sorted(&records),
        vec![rr("x", 300, "A", "192.0.2.1")]
    );
}

#[tokio::test]
async fn delete_wildcards_by_name() {
    let p = provider().await;
    require_ok!(
        p.append_records(
            ZONE,
            vec![
                a("x", 300, "192.0.2.1"),
                txt("x", 600, "hello"),
                a("y", 300, "192.0.2.1"),
            ],
        )
        .await
    );

    // Empty type/data and zero ttl match every record named "x".
    require_ok!(p.delete_records(ZONE, vec![Record::Rr(rr("x", 0, "", ""))]).await);

    let records = require_ok!(p.get_records(ZONE).await);
    assert_eq!(
        flatten_sorted(&records),
        vec![rr("y", 300, "A", "192.0.2.1")]
    );
}

#[tokio::test]
async fn delete_missing_records_is_silent() {
    let p = provider().await;
    require_ok!(p.append_records(ZONE, vec![a("x", 300, "192.0.2.1")]).await);

    let deleted = require_ok!(p.delete_records(ZONE, vec![a("nope", 300, "192.0.2.9")]).await);
    assert!(deleted.is_empty());

    let records = require_ok!(p.get_records(ZONE).await);
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn delete_reports_what_it_removed() {
    let p = provider().await;
    require_ok!(
        p.append_records(
            ZONE,
            vec![a("x", 300, "192.0.2.1"), txt("x", 600, "hello")],
        )
        .await
    );

    // One wildcard selector, two actual deletions reported.
    let deleted = require_ok!(p.delete_records(ZONE, vec![Record::Rr(rr("x", 0, "", ""))]).await);
    assert_eq!(deleted.len(), 2);
}

#[tokio::test]
async fn append_and_set_echo_their_input() {
    let p = provider().await;
    let batch = vec![a("www", 300, "192.0.2.1")];

    let appended = require_ok!(p.append_records(ZONE, batch.clone()).await);
    assert_eq!(appended, batch);

    let set = require_ok!(p.set_records(ZONE, batch.clone()).await);
    assert_eq!(set, batch);

    let deleted = require_ok!(p.delete_records(ZONE, batch.clone()).await);
    assert_eq!(deleted, batch);
}

#[tokio::test]
async fn zone_lister_reports_zones() {
    let p = MemoryProvider::with_zones(["b.example.", "a.example."]).await;
    let lister = require_some!(p.zone_lister());
    let zones = require_ok!(lister.list_zones().await);
    let names: Vec<&str> = zones.iter().map(|z| z.name.as_str()).collect();
    assert_eq!(names, vec!["a.example.", "b.example."]);
}

#[tokio::test]
async fn provider_is_shareable_across_tasks() {
    let p = std::sync::Arc::new(provider().await);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let p = std::sync::Arc::clone(&p);
            tokio::spawn(async move {
                p.append_records(ZONE, vec![a(&format!("w{i}"), 300, "192.0.2.1")])
                    .await
            })
        })
        .collect();
    for handle in handles {
        let result = handle.await.expect("task panicked");
        assert!(result.is_ok(), "append failed: {result:?}");
    }

    let records = require_ok!(p.get_records(ZONE).await);
    assert_eq!(records.len(), 4);
}
