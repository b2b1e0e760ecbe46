use anyhow::Result;
use bdm_couponer::core::ledger::{LEDGER_FILE, TIMESTAMP_FORMAT};
use bdm_couponer::domain::model::{Account, CouponCode, CycleReport};
use bdm_couponer::{Couponer, HttpRedeemer, ListingSource, LocalStorage, RedemptionLedger};
use chrono::NaiveDateTime;
use httpmock::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use tempfile::TempDir;

const LISTING_PATH: &str = "/coupons";
const REDEEM_PATH: &str = "/Coupon/ApplyCouponInWeb";

fn listing_page(codes: &[&str]) -> String {
    let rows: String = codes
        .iter()
        .map(|code| format!("<tr><td><b>{}</b></td><td>Reward</td></tr>", code))
        .collect();

    format!(
        r#"<html><body>
<table class="table table-dark table-striped">
  <thead><tr><th>Coupon</th><th>Reward</th></tr></thead>
  <tbody>
    <tr><td><a href="/ad">Sponsored</a></td><td></td></tr>
    {}
    <tr><td><b>OLD000</b><br><b>Expired</b></td><td>Gone</td></tr>
  </tbody>
</table>
</body></html>"#,
        rows
    )
}

async fn build_couponer(
    server: &MockServer,
    cache_dir: &std::path::Path,
    timeout: Duration,
) -> Result<Couponer<ListingSource, HttpRedeemer, LocalStorage>> {
    let storage = LocalStorage::new(cache_dir);
    let ledger = RedemptionLedger::load(storage, LEDGER_FILE).await;
    let source = ListingSource::new(server.url(LISTING_PATH), timeout)?;
    let redeemer = HttpRedeemer::new(server.url(REDEEM_PATH), timeout)?;

    Ok(Couponer::new(
        source,
        redeemer,
        ledger,
        Account::new("Stormborn", "NA"),
    ))
}

fn read_ledger(cache_dir: &std::path::Path) -> Result<BTreeMap<String, String>> {
    let data = std::fs::read(cache_dir.join(LEDGER_FILE))?;
    Ok(serde_json::from_slice(&data)?)
}

#[tokio::test]
async fn test_redeems_new_codes_and_skips_them_next_cycle() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let cache_dir = temp_dir.path().join("cache");
    let server = MockServer::start_async().await;

    let listing_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(LISTING_PATH);
            then.status(200)
                .header("Content-Type", "text/html")
                .body(listing_page(&["ABC123", "XYZ999"]));
        })
        .await;

    let abc_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(REDEEM_PATH)
                .x_www_form_urlencoded_tuple("userNickname", "Stormborn")
                .x_www_form_urlencoded_tuple("region", "NA")
                .x_www_form_urlencoded_tuple("couponCode", "ABC123");
            then.status(200).json_body(json!({ "resultCode": 0 }));
        })
        .await;

    let xyz_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(REDEEM_PATH)
                .x_www_form_urlencoded_tuple("couponCode", "XYZ999");
            then.status(200).json_body(json!({ "resultCode": -20006 }));
        })
        .await;

    let mut couponer = build_couponer(&server, &cache_dir, Duration::from_secs(5)).await?;

    let first = couponer.run_cycle().await;
    assert_eq!(first.listed, 2);
    assert_eq!(first.success, 1);
    assert_eq!(first.expired, 1);

    let ledger = read_ledger(&cache_dir)?;
    assert_eq!(ledger.len(), 2);
    for code in ["ABC123", "XYZ999"] {
        let timestamp = ledger.get(code).expect("code recorded");
        assert!(NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).is_ok());
    }

    let second = couponer.run_cycle().await;
    assert_eq!(second.skipped, 2);
    assert_eq!(second.submitted(), 0);

    listing_mock.assert_hits_async(2).await;
    abc_mock.assert_hits_async(1).await;
    xyz_mock.assert_hits_async(1).await;

    Ok(())
}

#[tokio::test]
async fn test_ledger_survives_restart() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let cache_dir = temp_dir.path().to_path_buf();
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path(LISTING_PATH);
            then.status(200).body(listing_page(&["USED01"]));
        })
        .await;
    let redeem_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(REDEEM_PATH);
            then.status(200)
                .json_body(json!({ "resultCode": -20007, "resultMsg": "Already used" }));
        })
        .await;

    let mut first_run = build_couponer(&server, &cache_dir, Duration::from_secs(5)).await?;
    assert_eq!(first_run.run_cycle().await.already_used, 1);
    drop(first_run);

    let mut second_run = build_couponer(&server, &cache_dir, Duration::from_secs(5)).await?;
    assert!(second_run
        .ledger()
        .is_redeemed(&CouponCode::new("USED01")));
    assert_eq!(second_run.run_cycle().await.skipped, 1);

    redeem_mock.assert_hits_async(1).await;
    Ok(())
}

#[tokio::test]
async fn test_unknown_result_code_is_retried() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path(LISTING_PATH);
            then.status(200).body(listing_page(&["RETRY1"]));
        })
        .await;
    let redeem_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(REDEEM_PATH);
            then.status(200)
                .json_body(json!({ "resultCode": -30001, "resultMsg": "Maintenance" }));
        })
        .await;

    let mut couponer = build_couponer(&server, temp_dir.path(), Duration::from_secs(5)).await?;

    assert_eq!(couponer.run_cycle().await.failed, 1);
    assert_eq!(couponer.run_cycle().await.failed, 1);

    redeem_mock.assert_hits_async(2).await;
    assert!(couponer.ledger().is_empty());
    assert!(!temp_dir.path().join(LEDGER_FILE).exists());
    Ok(())
}

#[tokio::test]
async fn test_redeem_server_error_is_no_response() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path(LISTING_PATH);
            then.status(200).body(listing_page(&["DOWN01"]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(REDEEM_PATH);
            then.status(502);
        })
        .await;

    let mut couponer = build_couponer(&server, temp_dir.path(), Duration::from_secs(5)).await?;
    let report = couponer.run_cycle().await;

    assert_eq!(report.no_response, 1);
    assert!(couponer.ledger().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_listing_timeout_submits_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;

    let listing_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(LISTING_PATH);
            then.status(200)
                .delay(Duration::from_secs(2))
                .body(listing_page(&["ABC123"]));
        })
        .await;
    let redeem_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(REDEEM_PATH);
            then.status(200).json_body(json!({ "resultCode": 0 }));
        })
        .await;

    let mut couponer =
        build_couponer(&server, temp_dir.path(), Duration::from_millis(200)).await?;
    let report = couponer.run_cycle().await;

    assert_eq!(report.listed, 0);
    assert_eq!(report.submitted(), 0);
    listing_mock.assert_hits_async(1).await;
    redeem_mock.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_listing_server_error_submits_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;

    let listing_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(LISTING_PATH);
            then.status(500).body(listing_page(&["ABC123"]));
        })
        .await;
    let redeem_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(REDEEM_PATH);
            then.status(200).json_body(json!({ "resultCode": 0 }));
        })
        .await;

    let mut couponer = build_couponer(&server, temp_dir.path(), Duration::from_secs(5)).await?;
    let report = couponer.run_cycle().await;

    assert_eq!(report.listed, 0);
    assert_eq!(report.submitted(), 0);
    listing_mock.assert_hits_async(1).await;
    redeem_mock.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_listing_without_table_submits_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path(LISTING_PATH);
            then.status(200).body("<html><body><h1>Down for maintenance</h1></body></html>");
        })
        .await;
    let redeem_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(REDEEM_PATH);
            then.status(200).json_body(json!({ "resultCode": 0 }));
        })
        .await;

    let mut couponer = build_couponer(&server, temp_dir.path(), Duration::from_secs(5)).await?;
    let report = couponer.run_cycle().await;

    assert_eq!(report, CycleReport::default());
    redeem_mock.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_corrupt_ledger_starts_empty() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join(LEDGER_FILE), "not json at all")?;

    let ledger = RedemptionLedger::load(LocalStorage::new(temp_dir.path()), LEDGER_FILE).await;

    assert!(ledger.is_empty());
    Ok(())
}
