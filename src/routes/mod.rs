use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// Liveness endpoint: a fixed descriptor of the service and where the event
/// channel is mounted.
pub async fn status() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Chess Match Server",
        "status": "running",
        "endpoints": {
            "socket": "/ws",
            "health": "/"
        }
    }))
}

/// Configure the HTTP routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").route(web::get().to(crate::websocket::ws_index)))
        .service(web::resource("/").route(web::get().to(status)));
}
