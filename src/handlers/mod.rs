pub mod auth;
pub mod bids;
pub mod clients;
pub mod projects;
pub mod users;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(
        web::scope("/auth")
            .route("/me", web::get().to(auth::me))
            .route("/complete-profile", web::post().to(auth::complete_profile)),
    );

    // ── Account routes (self only) ──
    cfg.service(
        web::resource("/users/{id}")
            .route(web::put().to(users::update_user))
            .route(web::delete().to(users::delete_user)),
    );

    // ── Freelancer directory ──
    cfg.service(
        web::scope("/freelancers")
            .route("", web::get().to(users::get_freelancers))
            .route("/{id}", web::get().to(users::get_freelancer))
            .route("/{id}/bids", web::get().to(bids::get_freelancer_bids)),
    );

    // ── Client profiles (looked up by account email) ──
    cfg.service(
        web::scope("/clients")
            .route("", web::get().to(clients::get_clients))
            .route("", web::post().to(clients::create_client))
            .route("/{email}", web::get().to(clients::get_client))
            .route("/{email}", web::put().to(clients::update_client))
            .route("/{email}", web::delete().to(clients::delete_client))
            .route("/{email}/stats", web::get().to(clients::get_client_stats)),
    );

    // ── Projects ──
    cfg.service(
        web::scope("/projects")
            .route("", web::get().to(projects::get_open_projects))
            .route("", web::post().to(projects::create_project))
            .route("/client/{client_id}", web::get().to(projects::get_projects_by_client))
            .route("/{id}", web::get().to(projects::get_project))
            .route("/{id}", web::put().to(projects::update_project))
            .route("/{id}/cancel", web::post().to(projects::cancel_project))
            .route("/{id}/complete", web::post().to(projects::complete_project))
            .route("/{id}/bids", web::get().to(bids::get_project_bids))
            .route("/{id}/bids", web::post().to(bids::submit_bid)),
    );

    // ── Bid lifecycle ──
    cfg.service(
        web::scope("/bids")
            .route("/{id}", web::get().to(bids::get_bid))
            .route("/{id}", web::put().to(bids::update_bid))
            .route("/{id}/accept", web::post().to(bids::accept_bid))
            .route("/{id}/reject", web::post().to(bids::reject_bid))
            .route("/{id}/withdraw", web::post().to(bids::withdraw_bid)),
    );
}
