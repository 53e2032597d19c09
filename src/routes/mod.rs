use crate::middleware::admin_guard;
use actix_csrf::CsrfMiddleware;
use actix_session::SessionExt;
use actix_web::web;
use rand::prelude::StdRng;

pub mod admin;
pub mod public;

/// Public pages, the JSON API and the `/management` scope. The caller wraps
/// the app in the session middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let csrf = admin::csrf_cookie_paths()
        .into_iter()
        .fold(CsrfMiddleware::<StdRng>::new(), |mw, (method, path)| mw.set_cookie(method, path));

    cfg.configure(public::config_api)
        .configure(public::config_pages)
        .service(
            web::scope(admin::MANAGEMENT_PREFIX)
                .wrap(csrf)
                .configure(admin::config_login)
                .service(
                    web::scope("")
                        .guard(actix_web::guard::fn_guard(|ctx| admin_guard(&ctx.get_session())))
                        .configure(admin::config_dashboard),
                )
                // Guarded pages fall through to here when nobody is signed in.
                .default_service(web::to(admin::to_login)),
        );
}
