use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use sea_orm::Iterable;
use serde::Serialize;

use super::clients::ClientView;
use crate::entities::OfferStatus;
use crate::errors::ServiceError;
use crate::services::offers::CreateOfferRequest;
use crate::AppState;

/// Support data for rendering the offer form.
#[derive(Debug, Serialize)]
pub struct OfferFormView {
    pub clients: Vec<ClientView>,
    pub statuses: Vec<String>,
}

/// Failure payload for the form redisplay: the full ordered error list plus
/// every submitted value, so the renderer can retain the user's input.
#[derive(Debug, Serialize)]
pub struct OfferFormErrors {
    pub errors: Vec<String>,
    pub values: CreateOfferRequest,
}

/// GET `/offers/new` — clients and status options for the creation form.
pub async fn offer_form(State(state): State<AppState>) -> Result<Json<OfferFormView>, ServiceError> {
    let clients = state.services.clients.list_clients().await?;
    Ok(Json(OfferFormView {
        clients: clients.into_iter().map(ClientView::from).collect(),
        statuses: OfferStatus::iter().map(|s| s.label()).collect(),
    }))
}

/// POST `/offers/new` — runs the creation workflow; redirects to the
/// dashboard on success, redisplays the form data on validation failure.
pub async fn create_offer(
    State(state): State<AppState>,
    Form(request): Form<CreateOfferRequest>,
) -> Result<Response, ServiceError> {
    match state.services.offers.create_offer(request.clone()).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(ServiceError::ValidationFailed(errors)) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(OfferFormErrors {
                errors,
                values: request,
            }),
        )
            .into_response()),
        Err(other) => Err(other),
    }
}
