use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum_extra::extract::Query;
use tower_http::cors::CorsLayer;
use tracing::{debug, error};

use crate::dataset::{DatasetError, DatasetLoader};
use crate::models::DatasetInfo;
use crate::query::{SummaryFilter, TransactionFilter, summarize};

/// Builds the service router around a loader. The CORS layer is wide open;
/// the browser frontend is served from a different origin.
pub fn router(loader: DatasetLoader) -> Router {
    Router::new()
        .route("/files", get(list_datasets))
        .route("/transactions/{filename}", get(list_transactions))
        .route("/summary/{filename}", get(summarize_dataset))
        .route("/favicon.ico", get(favicon))
        .layer(CorsLayer::very_permissive())
        .with_state(loader)
}

async fn list_datasets(
    State(loader): State<DatasetLoader>,
) -> Result<Json<Vec<DatasetInfo>>, DatasetError> {
    let datasets = run_blocking(move || loader.list()).await?;

    debug!("Listing {} datasets", datasets.len());

    Ok(Json(datasets))
}

async fn list_transactions(
    State(loader): State<DatasetLoader>,
    Path(filename): Path<String>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Response, DatasetError> {
    let dataset = filename.clone();
    let transactions = run_blocking(move || loader.load(&dataset)).await?;

    // The no-content case is decided before filtering: a populated dataset
    // filtered down to nothing still responds 200 with an empty array.
    if transactions.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let total = transactions.len();
    let matched = filter.apply(transactions);
    debug!("Dataset [{filename}] matched {} of {total} transactions", matched.len());

    Ok(Json(matched).into_response())
}

async fn summarize_dataset(
    State(loader): State<DatasetLoader>,
    Path(filename): Path<String>,
    Query(filter): Query<SummaryFilter>,
) -> Result<Response, DatasetError> {
    let dataset = filename.clone();
    let transactions = run_blocking(move || loader.load(&dataset)).await?;

    if transactions.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let matched = TransactionFilter::from(filter).apply(transactions);
    let summaries = summarize(&matched);
    debug!("Dataset [{filename}] grouped into {} currencies", summaries.len());

    Ok(Json(summaries).into_response())
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Runs dataset work on the blocking pool. A join failure, a panic inside
/// the task included, is downgraded to the internal-processing kind so only
/// the five documented failures ever reach a client.
async fn run_blocking<T, F>(work: F) -> Result<T, DatasetError>
where
    F: FnOnce() -> Result<T, DatasetError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result,
        Err(cause) => {
            error!("Blocking dataset task failed: {cause}");
            Err(DatasetError::InternalProcessing)
        }
    }
}
