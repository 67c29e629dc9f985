use actix_cors::Cors;
use actix_web::{delete, get, post, put, web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use splitbill::errors::StoreError;
use splitbill::schemas::{EventSummary, NewExpense, Participant};
use splitbill::store::SessionStore;
use splitbill::{balance, export, settlement};

#[derive(Deserialize, Serialize)]
struct EventNameJson {
    name: String,
}

fn store_error_response(err: StoreError) -> HttpResponse {
    match &err {
        StoreError::UnknownEvent(_) => HttpResponse::NotFound().body(err.to_string()),
        StoreError::DuplicateParticipant(_) => HttpResponse::Conflict().body(err.to_string()),
        StoreError::EmptyParticipantName | StoreError::InvalidExpense(_) => {
            HttpResponse::BadRequest().body(err.to_string())
        }
    }
}

#[put("/events/{id}")]
async fn add_event(
    store: web::Data<SessionStore>,
    id: web::Path<String>,
    json: web::Json<EventNameJson>,
) -> HttpResponse {
    let event = store.create_event(id.into_inner(), json.into_inner().name);
    info!(event = %event.id, "event created");
    HttpResponse::Ok().json(event)
}

#[get("/events")]
async fn list_events(store: web::Data<SessionStore>) -> HttpResponse {
    let summaries: Vec<EventSummary> = store.list_events().iter().map(EventSummary::from).collect();
    HttpResponse::Ok().json(summaries)
}

#[get("/events/{id}")]
async fn get_event(store: web::Data<SessionStore>, id: web::Path<String>) -> HttpResponse {
    match store.get_event(&id.into_inner()) {
        Ok(event) => HttpResponse::Ok().json(event),
        Err(err) => store_error_response(err),
    }
}

#[delete("/events/{id}")]
async fn delete_event(store: web::Data<SessionStore>, id: web::Path<String>) -> HttpResponse {
    match store.delete_event(&id.into_inner()) {
        Ok(()) => HttpResponse::Ok().body("Event deleted"),
        Err(err) => store_error_response(err),
    }
}

#[post("/events/{id}/reset")]
async fn reset_event(store: web::Data<SessionStore>, id: web::Path<String>) -> HttpResponse {
    match store.reset_event(&id.into_inner()) {
        Ok(()) => HttpResponse::Ok().body("Event reset"),
        Err(err) => store_error_response(err),
    }
}

#[post("/events/{id}/participants")]
async fn add_participant(
    store: web::Data<SessionStore>,
    id: web::Path<String>,
    json: web::Json<Participant>,
) -> HttpResponse {
    match store.add_participant(&id.into_inner(), json.into_inner()) {
        Ok(()) => HttpResponse::Ok().body("Participant added"),
        Err(err) => {
            warn!(%err, "participant rejected");
            store_error_response(err)
        }
    }
}

#[post("/events/{id}/expenses")]
async fn add_expense(
    store: web::Data<SessionStore>,
    id: web::Path<String>,
    json: web::Json<NewExpense>,
) -> HttpResponse {
    match store.add_expense(&id.into_inner(), json.into_inner()) {
        Ok(expense) => HttpResponse::Ok().json(expense),
        Err(err) => {
            warn!(%err, "expense rejected");
            store_error_response(err)
        }
    }
}

#[get("/events/{id}/balance")]
async fn get_balance(store: web::Data<SessionStore>, id: web::Path<String>) -> HttpResponse {
    let event = match store.get_event(&id.into_inner()) {
        Ok(event) => event,
        Err(err) => return store_error_response(err),
    };
    match balance::compute_balances(&event.participants, &event.expenses) {
        Ok(balances) => HttpResponse::Ok().json(balances),
        Err(err) => HttpResponse::BadRequest().body(err.to_string()),
    }
}

#[get("/events/{id}/settlement")]
async fn get_settlement(store: web::Data<SessionStore>, id: web::Path<String>) -> HttpResponse {
    let event = match store.get_event(&id.into_inner()) {
        Ok(event) => event,
        Err(err) => return store_error_response(err),
    };
    let balances = match balance::compute_balances(&event.participants, &event.expenses) {
        Ok(balances) => balances,
        Err(err) => return HttpResponse::BadRequest().body(err.to_string()),
    };
    match settlement::compute_settlement(&balances) {
        Ok(transfers) => HttpResponse::Ok().json(transfers),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

#[get("/events/{id}/expenses.csv")]
async fn export_event_expenses(store: web::Data<SessionStore>, id: web::Path<String>) -> HttpResponse {
    let event = match store.get_event(&id.into_inner()) {
        Ok(event) => event,
        Err(err) => return store_error_response(err),
    };
    match export::expenses_csv(std::slice::from_ref(&event)) {
        Ok(csv) => HttpResponse::Ok().content_type("text/csv").body(csv),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

#[get("/events/{id}/settlement.csv")]
async fn export_event_settlement(
    store: web::Data<SessionStore>,
    id: web::Path<String>,
) -> HttpResponse {
    let event = match store.get_event(&id.into_inner()) {
        Ok(event) => event,
        Err(err) => return store_error_response(err),
    };
    let balances = match balance::compute_balances(&event.participants, &event.expenses) {
        Ok(balances) => balances,
        Err(err) => return HttpResponse::BadRequest().body(err.to_string()),
    };
    let transfers = match settlement::compute_settlement(&balances) {
        Ok(transfers) => transfers,
        Err(err) => return HttpResponse::InternalServerError().body(err.to_string()),
    };
    match export::settlement_csv(&transfers) {
        Ok(csv) => HttpResponse::Ok().content_type("text/csv").body(csv),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

#[get("/export/expenses.csv")]
async fn export_all_expenses(store: web::Data<SessionStore>) -> HttpResponse {
    match export::expenses_csv(&store.list_events()) {
        Ok(csv) => HttpResponse::Ok().content_type("text/csv").body(csv),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(add_event)
        .service(list_events)
        .service(get_event)
        .service(delete_event)
        .service(reset_event)
        .service(add_participant)
        .service(add_expense)
        .service(get_balance)
        .service(get_settlement)
        .service(export_event_expenses)
        .service(export_event_settlement)
        .service(export_all_expenses);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    info!("Listening on {}", bind_addr);

    let store = web::Data::new(SessionStore::new());
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(store.clone())
            .configure(routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
