use axum::{
    extract::{Query, State},
    http::{HeaderMap, Uri},
    response::{AppendHeaders, IntoResponse, Redirect},
    Form, Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::Iterable;
use serde::Serialize;
use tracing::debug;

use super::common::{format_currency, session_cookie_headers, session_from_headers};
use crate::entities::{client, OfferStatus};
use crate::errors::ServiceError;
use crate::services::dashboard::{DashboardData, DashboardFilter, StatusCount};
use crate::services::offers::parse_date;
use crate::services::preferences::DEFAULT_DASHBOARD_COLUMNS;
use crate::AppState;

/// Dashboard payload handed to the renderer.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub offers: Vec<OfferRow>,
    pub totals: TotalsView,
    pub status_summary: Vec<StatusCount>,
    pub columns: Vec<String>,
    pub clients: Vec<ClientOption>,
    pub statuses: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct OfferRow {
    pub id: i32,
    pub offer_number: String,
    pub client: Option<String>,
    pub price: Decimal,
    pub cost: Decimal,
    pub margin: Decimal,
    pub price_display: String,
    pub cost_display: String,
    pub margin_display: String,
    pub created_at: NaiveDate,
    pub valid_until: NaiveDate,
    pub status: OfferStatus,
}

#[derive(Debug, Serialize)]
pub struct TotalsView {
    pub count: u64,
    pub value: Decimal,
    pub cost: Decimal,
    pub margin: Decimal,
    pub value_display: String,
    pub cost_display: String,
    pub margin_display: String,
}

#[derive(Debug, Serialize)]
pub struct ClientOption {
    pub id: i32,
    pub name: String,
}

/// Builds the filter from raw query pairs. `status` repeats for
/// set-membership; unparsable dates and ids impose no constraint, like an
/// empty form field.
fn filter_from_pairs(pairs: &[(String, String)]) -> DashboardFilter {
    let mut filter = DashboardFilter::default();
    for (key, value) in pairs {
        match key.as_str() {
            "status" => match OfferStatus::parse(value.trim()) {
                Some(status) => filter.statuses.push(status),
                None => debug!(value = %value, "ignoring unknown status filter"),
            },
            "created_from" => filter.created_from = parse_date(value),
            "created_to" => filter.created_to = parse_date(value),
            "valid_from" => filter.valid_from = parse_date(value),
            "valid_to" => filter.valid_to = parse_date(value),
            "client_id" => filter.client_id = value.trim().parse::<i32>().ok(),
            _ => {}
        }
    }
    filter
}

fn assemble_view(
    data: DashboardData,
    columns: Vec<String>,
    clients: Vec<client::Model>,
) -> DashboardView {
    let offers = data
        .offers
        .into_iter()
        .map(|row| {
            let margin = row.offer.margin();
            OfferRow {
                id: row.offer.id,
                offer_number: row.offer.offer_number,
                client: row.client.map(|c| c.name),
                price: row.offer.price,
                cost: row.offer.cost,
                margin,
                price_display: format_currency(Some(row.offer.price)),
                cost_display: format_currency(Some(row.offer.cost)),
                margin_display: format_currency(Some(margin)),
                created_at: row.offer.created_at,
                valid_until: row.offer.valid_until,
                status: row.offer.status,
            }
        })
        .collect();

    let totals = TotalsView {
        count: data.totals.count,
        value: data.totals.value,
        cost: data.totals.cost,
        margin: data.totals.margin,
        value_display: format_currency(Some(data.totals.value)),
        cost_display: format_currency(Some(data.totals.cost)),
        margin_display: format_currency(Some(data.totals.margin)),
    };

    DashboardView {
        offers,
        totals,
        status_summary: data.status_summary,
        columns,
        clients: clients
            .into_iter()
            .map(|c| ClientOption {
                id: c.id,
                name: c.name,
            })
            .collect(),
        statuses: OfferStatus::iter().map(|s| s.label()).collect(),
    }
}

/// GET `/` — the filtered, aggregated offer view.
pub async fn show_dashboard(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServiceError> {
    let session = session_from_headers(&headers);
    let filter = filter_from_pairs(&pairs);

    let data = state.services.dashboard.query(&filter).await?;
    let columns = state
        .services
        .preferences
        .get(&session.id, &DEFAULT_DASHBOARD_COLUMNS)
        .await?;
    let clients = state.services.clients.list_clients().await?;

    let view = assemble_view(data, columns, clients);
    Ok((
        AppendHeaders(session_cookie_headers(&session)),
        Json(view),
    ))
}

/// POST `/` — saves the session's column selection and redirects back to the
/// dashboard with the request's query parameters preserved.
pub async fn save_columns(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ServiceError> {
    let session = session_from_headers(&headers);
    let columns: Vec<String> = pairs
        .into_iter()
        .filter(|(key, _)| key == "columns")
        .map(|(_, value)| value)
        .collect();

    state.services.preferences.set(&session.id, &columns).await?;

    let target = match uri.query() {
        Some(query) if !query.is_empty() => format!("/?{}", query),
        _ => "/".to_string(),
    };
    Ok((
        AppendHeaders(session_cookie_headers(&session)),
        Redirect::to(&target),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn filter_composes_present_criteria_only() {
        let filter = filter_from_pairs(&[
            pair("status", "enviada"),
            pair("status", "ganada"),
            pair("created_from", "2024-01-01"),
            pair("client_id", "7"),
            pair("created_to", ""),
            pair("unrelated", "x"),
        ]);
        assert_eq!(filter.statuses, vec![OfferStatus::Sent, OfferStatus::Won]);
        assert_eq!(
            filter.created_from,
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(filter.created_to, None);
        assert_eq!(filter.valid_from, None);
        assert_eq!(filter.client_id, Some(7));
    }

    #[test]
    fn malformed_values_impose_no_constraint() {
        let filter = filter_from_pairs(&[
            pair("created_from", "January 1st"),
            pair("client_id", "acme"),
            pair("status", "bogus"),
        ]);
        assert!(filter.statuses.is_empty());
        assert_eq!(filter.created_from, None);
        assert_eq!(filter.client_id, None);
    }
}
