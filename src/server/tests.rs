use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::dataset::DatasetLoader;
use crate::server::router;

const VALID_HEADER: &str = "id,date,description,amount,category,source,currency";

fn write_dataset(dir: &Path, name: &str, contents: &str) -> anyhow::Result<()> {
    std::fs::write(dir.join(name), contents)?;
    Ok(())
}

fn service(dir: &TempDir) -> Router {
    router(DatasetLoader::new(dir.path()))
}

/// Four rows over two currencies, covering both filter branches and the
/// summary ordering.
fn seeded_service(dir: &TempDir) -> anyhow::Result<Router> {
    write_dataset(
        dir.path(),
        "ledger.csv",
        &format!(
            "{VALID_HEADER}\n\
             TXAAAA000001,2024-01-10,Salary,500000,Income,Checking,USD\n\
             TXBBBB000002,2024-01-15,Coffee,-350,Food,Checking,USD\n\
             TXCCCC000003,2024-02-01,Hotel,-42000,Travel,Credit,EUR\n\
             TXDDDD000004,2024-02-10,Groceries,-6200,Food,Savings,USD\n"
        ),
    )?;

    Ok(service(dir))
}

async fn get(app: Router, uri: &str) -> anyhow::Result<(StatusCode, Vec<u8>)> {
    let request = Request::builder().uri(uri).body(Body::empty())?;
    let response = app.oneshot(request).await?;
    let status = response.status();
    let body = response.into_body().collect().await?.to_bytes().to_vec();

    Ok((status, body))
}

fn parse_json(body: &[u8]) -> anyhow::Result<Value> {
    Ok(serde_json::from_slice(body)?)
}

#[tokio::test]
async fn test_files_lists_datasets_sorted_by_row_count() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_dataset(
        dir.path(),
        "small.csv",
        &format!("{VALID_HEADER}\nTXAAAA000001,2024-01-01,One,-100,Misc,Checking,USD\n"),
    )?;
    write_dataset(
        dir.path(),
        "large.csv",
        &format!(
            "{VALID_HEADER}\n\
             TXAAAA000001,2024-01-01,One,-100,Misc,Checking,USD\n\
             TXBBBB000002,2024-01-02,Two,-200,Misc,Checking,USD\n"
        ),
    )?;

    let (status, body) = get(service(&dir), "/files").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        parse_json(&body)?,
        json!([
            {"name": "large.csv", "transactions_count": 2},
            {"name": "small.csv", "transactions_count": 1},
        ])
    );

    Ok(())
}

#[tokio::test]
async fn test_files_returns_empty_array_when_directory_missing() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = router(DatasetLoader::new(dir.path().join("nowhere")));

    let (status, body) = get(app, "/files").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse_json(&body)?, json!([]));

    Ok(())
}

#[tokio::test]
async fn test_favicon_responds_no_content() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let (status, body) = get(service(&dir), "/favicon.ico").await?;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_transactions_returns_full_dataset() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = seeded_service(&dir)?;

    let (status, body) = get(app, "/transactions/ledger.csv").await?;

    assert_eq!(status, StatusCode::OK);
    let rows = parse_json(&body)?;
    assert_eq!(rows.as_array().map(Vec::len), Some(4));
    assert_eq!(
        rows[0],
        json!({
            "id": "TXAAAA000001",
            "date": "2024-01-10",
            "description": "Salary",
            "category": "Income",
            "source": "Checking",
            "amount": 500000,
            "currency": "USD",
        })
    );

    Ok(())
}

#[tokio::test]
async fn test_transactions_applies_conjunctive_filters() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = seeded_service(&dir)?;

    let (status, body) =
        get(app, "/transactions/ledger.csv?category=Food&min_amount=-1000").await?;

    assert_eq!(status, StatusCode::OK);
    let rows = parse_json(&body)?;
    assert_eq!(rows.as_array().map(Vec::len), Some(1));
    assert_eq!(rows[0]["id"], "TXBBBB000002");

    Ok(())
}

#[tokio::test]
async fn test_transactions_accepts_repeated_currencies() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = seeded_service(&dir)?;

    let (status, body) =
        get(app, "/transactions/ledger.csv?currencies=EUR&currencies=USD").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse_json(&body)?.as_array().map(Vec::len), Some(4));

    Ok(())
}

#[tokio::test]
async fn test_transactions_no_content_for_zero_row_dataset() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_dataset(dir.path(), "fresh.csv", &format!("{VALID_HEADER}\n"))?;

    let (status, body) = get(service(&dir), "/transactions/fresh.csv").await?;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_transactions_filtered_to_nothing_still_responds_ok() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = seeded_service(&dir)?;

    let (status, body) = get(app, "/transactions/ledger.csv?category=Nonexistent").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse_json(&body)?, json!([]));

    Ok(())
}

#[tokio::test]
async fn test_transactions_rejects_unknown_extension() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let (status, body) = get(service(&dir), "/transactions/ledger.txt").await?;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(parse_json(&body)?, json!({"detail": "Only CSV files are supported."}));

    Ok(())
}

#[tokio::test]
async fn test_transactions_reports_missing_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let (status, body) = get(service(&dir), "/transactions/absent.csv").await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        parse_json(&body)?,
        json!({"detail": "The requested file was not found in the data directory."})
    );

    Ok(())
}

#[tokio::test]
async fn test_missing_columns_produce_structure_detail() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_dataset(dir.path(), "sparse.csv", "id,amount,currency\nTXAAAA000001,-100,USD\n")?;

    let (status, body) = get(service(&dir), "/transactions/sparse.csv").await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        parse_json(&body)?,
        json!({
            "detail": "Invalid CSV structure. Missing required columns: date, description, category, source"
        })
    );

    Ok(())
}

#[tokio::test]
async fn test_integrity_failure_produces_fixed_detail() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_dataset(
        dir.path(),
        "holes.csv",
        &format!("{VALID_HEADER}\nTXAAAA000001,2024-01-01,,-100,Misc,Checking,USD\n"),
    )?;

    let (status, body) = get(service(&dir), "/transactions/holes.csv").await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        parse_json(&body)?,
        json!({"detail": "Data integrity error: one or more rows contain invalid values."})
    );

    Ok(())
}

#[tokio::test]
async fn test_unparseable_dataset_is_internal_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_dataset(
        dir.path(),
        "ragged.csv",
        &format!("{VALID_HEADER}\nTXAAAA000001,2024-01-01,One,-100,Misc,Checking,USD,extra\n"),
    )?;

    let (status, body) = get(service(&dir), "/transactions/ragged.csv").await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        parse_json(&body)?,
        json!({"detail": "An internal error occurred while processing the data."})
    );

    Ok(())
}

#[tokio::test]
async fn test_malformed_amount_bound_is_a_client_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = seeded_service(&dir)?;

    let (status, _body) = get(app, "/transactions/ledger.csv?min_amount=abc").await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_summary_groups_and_orders_currencies() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = seeded_service(&dir)?;

    let (status, body) = get(app, "/summary/ledger.csv").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        parse_json(&body)?,
        json!([
            {"currency": "USD", "total_in": 500000, "total_out": 6550, "balance": 493450},
            {"currency": "EUR", "total_in": 0, "total_out": 42000, "balance": -42000},
        ])
    );

    Ok(())
}

#[tokio::test]
async fn test_summary_ignores_amount_bounds() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = seeded_service(&dir)?;

    let (bounded_status, bounded_body) = get(app.clone(), "/summary/ledger.csv?min_amount=999999").await?;
    let (status, body) = get(app, "/summary/ledger.csv").await?;

    assert_eq!(bounded_status, StatusCode::OK);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse_json(&bounded_body)?, parse_json(&body)?);

    Ok(())
}

#[tokio::test]
async fn test_summary_no_content_for_zero_row_dataset() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_dataset(dir.path(), "fresh.csv", &format!("{VALID_HEADER}\n"))?;

    let (status, body) = get(service(&dir), "/summary/fresh.csv").await?;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_summary_applies_shared_filters() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = seeded_service(&dir)?;

    let (status, body) = get(app, "/summary/ledger.csv?currencies=EUR").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        parse_json(&body)?,
        json!([
            {"currency": "EUR", "total_in": 0, "total_out": 42000, "balance": -42000},
        ])
    );

    Ok(())
}
