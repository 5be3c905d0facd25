use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::entities::client;
use crate::errors::ServiceError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateClientForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ClientView {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
}

impl From<client::Model> for ClientView {
    fn from(model: client::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
        }
    }
}

/// GET `/clients` — all clients ordered by name.
pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientView>>, ServiceError> {
    let clients = state.services.clients.list_clients().await?;
    Ok(Json(clients.into_iter().map(ClientView::from).collect()))
}

/// POST `/clients` — creates a client from form fields; duplicate names are
/// rejected with a validation error.
pub async fn create_client(
    State(state): State<AppState>,
    Form(form): Form<CreateClientForm>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .clients
        .create_client(&form.name, &form.email)
        .await?;
    Ok(Redirect::to("/clients"))
}
