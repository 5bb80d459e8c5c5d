use crate::{
    api::{analytics, checkin, course, remediation, session},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(60_000 / requests_per_min as u64)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap_or_else(GovernorConfig::default);
        Governor::new(&cfg)
    }

    let checkin_limiter = Arc::new(build_limiter(config.rate_checkin_per_min));
    let api_limiter = Arc::new(build_limiter(config.rate_api_per_min));

    // Student-facing check-in link
    cfg.service(
        web::resource("/checkin/{course_id}/{session_id}")
            .wrap(checkin_limiter)
            .route(web::get().to(checkin::checkin_page))
            .route(web::post().to(checkin::check_in)),
    );

    // Teacher API
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter)
            .service(
                web::scope("/courses")
                    // /courses
                    .service(
                        web::resource("")
                            .route(web::post().to(course::create_course))
                            .route(web::get().to(course::list_courses)),
                    )
                    // /courses/{id}
                    .service(web::resource("/{course_id}").route(web::get().to(course::get_course)))
                    // /courses/{id}/students
                    .service(
                        web::resource("/{course_id}/students")
                            .route(web::post().to(course::add_student)),
                    )
                    // /courses/{id}/sessions
                    .service(
                        web::resource("/{course_id}/sessions")
                            .route(web::post().to(session::create_session))
                            .route(web::get().to(session::list_sessions)),
                    )
                    // /courses/{id}/analytics
                    .service(
                        web::resource("/{course_id}/analytics")
                            .route(web::get().to(analytics::course_report)),
                    ),
            )
            .service(
                web::scope("/sessions")
                    // /sessions/{id}
                    .service(web::resource("/{session_id}").route(web::get().to(session::get_session)))
                    // /sessions/{id}/activate
                    .service(
                        web::resource("/{session_id}/activate")
                            .route(web::post().to(session::activate_session)),
                    )
                    // /sessions/{id}/deactivate
                    .service(
                        web::resource("/{session_id}/deactivate")
                            .route(web::post().to(session::deactivate_session)),
                    )
                    // /sessions/{id}/attendance
                    .service(
                        web::resource("/{session_id}/attendance")
                            .route(web::get().to(analytics::session_attendance)),
                    ),
            )
            .service(
                web::resource("/remediation").route(web::post().to(remediation::suggest_remediation)),
            ),
    );
}

// TEACHER
//  ├─ POST /api/courses                      roster seeded here
//  ├─ POST /api/courses/{id}/sessions
//  └─ POST /api/sessions/{id}/activate       opens /checkin/{course}/{session}

// STUDENT
//  └─ POST /checkin/{course}/{session}       name + device location
