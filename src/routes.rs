use crate::{
    api::{assignment, attendance, balance, catalog, employee, notification, request},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(
        requests_per_min: u32,
    ) -> actix_governor::GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let login_limiter = build_limiter(config.rate_login_per_min);
    let register_limiter = build_limiter(config.rate_register_per_min);
    let refresh_limiter = build_limiter(config.rate_refresh_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    .service(
                        web::resource("/{id}").route(web::get().to(employee::get_employee)),
                    ),
            )
            .service(
                web::scope("/assignments")
                    .service(web::resource("").route(web::post().to(assignment::create)))
                    .service(
                        web::resource("/{id}").route(web::delete().to(assignment::delete)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(web::resource("/sheet").route(web::get().to(attendance::sheet)))
                    .service(
                        web::resource("/{id}/check-out")
                            .route(web::put().to(attendance::check_out)),
                    )
                    .service(web::resource("/{id}").route(web::put().to(attendance::edit))),
            )
            .service(
                web::scope("/requests")
                    .service(
                        web::resource("")
                            .route(web::get().to(request::list)),
                    )
                    .service(web::resource("/leave").route(web::post().to(request::create_leave)))
                    .service(
                        web::resource("/part-time")
                            .route(web::post().to(request::create_part_time)),
                    )
                    .service(
                        web::resource("/remote-work")
                            .route(web::post().to(request::create_remote_work)),
                    )
                    .service(
                        web::resource("/revert-leave")
                            .route(web::post().to(request::create_revert_leave)),
                    )
                    .service(
                        web::resource("/shift-change")
                            .route(web::post().to(request::create_shift_change)),
                    )
                    .service(
                        web::resource("/{id}/recall").route(web::put().to(request::recall)),
                    )
                    .service(
                        web::resource("/{id}/approve").route(web::put().to(request::approve)),
                    )
                    .service(
                        web::resource("/{id}/reject").route(web::put().to(request::reject)),
                    )
                    .service(
                        web::resource("/{id}/confirm").route(web::put().to(request::confirm)),
                    )
                    .service(
                        web::resource("/{id}/decline").route(web::put().to(request::decline)),
                    )
                    .service(web::resource("/{id}").route(web::get().to(request::get))),
            )
            .service(
                web::scope("/balances")
                    .service(web::resource("").route(web::get().to(balance::list))),
            )
            .service(
                web::scope("/notifications")
                    .service(web::resource("").route(web::get().to(notification::list)))
                    .service(
                        web::resource("/{id}/read")
                            .route(web::put().to(notification::mark_read)),
                    ),
            )
            .service(web::resource("/shifts").route(web::get().to(catalog::list_shifts)))
            .service(web::resource("/locations").route(web::get().to(catalog::list_locations)))
            .service(
                web::resource("/leave-types").route(web::get().to(catalog::list_leave_types)),
            ),
    );
}
