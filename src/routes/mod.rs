// Route exports
pub mod duplicates;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(duplicates::configure),
    );
}
