//! App Router

use salvo::Router;

use crate::{
    auth::middleware::{handler as authenticate, require_admin},
    carts, healthcheck, password_resets, products, sessions, tickets, users,
};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(carts_router())
        .push(products_router())
        .push(tickets_router())
        .push(sessions_router())
        .push(users_router())
        .push(password_resets_router())
}

/// Carts are addressed by id and need no session.
fn carts_router() -> Router {
    Router::with_path("carts")
        .post(carts::create::handler)
        .push(
            Router::with_path("{cart}")
                .get(carts::get::handler)
                .put(carts::replace_items::handler)
                .delete(carts::clear::handler)
                .push(Router::with_path("purge").delete(carts::purge::handler))
                .push(
                    Router::with_path("product/{product}")
                        .post(carts::add_item::handler)
                        .put(carts::update_item::handler)
                        .delete(carts::remove_item::handler),
                ),
        )
}

fn products_router() -> Router {
    Router::with_path("products")
        .get(products::index::handler)
        .push(Router::with_path("{product}").get(products::get::handler))
        .push(
            Router::new()
                .hoop(authenticate)
                .hoop(require_admin)
                .post(products::create::handler)
                .delete(products::bulk_delete::handler)
                .push(
                    Router::with_path("{product}")
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
}

fn tickets_router() -> Router {
    Router::with_path("tickets")
        .hoop(authenticate)
        .push(Router::with_path("checkout").post(tickets::checkout::handler))
        .push(Router::with_path("user/my-tickets").get(tickets::mine::handler))
        .push(Router::with_path("code/{code}").get(tickets::get_by_code::handler))
        .push(
            Router::with_path("admin")
                .hoop(require_admin)
                .push(Router::with_path("all").get(tickets::admin_index::handler))
                .push(Router::with_path("stats").get(tickets::admin_stats::handler)),
        )
        .push(Router::with_path("{ticket}").get(tickets::get::handler))
}

fn sessions_router() -> Router {
    Router::with_path("sessions")
        .push(Router::with_path("register").post(sessions::register::handler))
        .push(Router::with_path("login").post(sessions::login::handler))
        .push(
            Router::with_path("current")
                .hoop(authenticate)
                .get(sessions::current::handler),
        )
}

fn users_router() -> Router {
    Router::with_path("users")
        .hoop(authenticate)
        .hoop(require_admin)
        .get(users::index::handler)
        .push(
            Router::with_path("{user}")
                .get(users::get::handler)
                .put(users::update::handler)
                .delete(users::delete::handler)
                .push(Router::with_path("role").put(users::update_role::handler)),
        )
}

fn password_resets_router() -> Router {
    Router::with_path("password-reset")
        .push(Router::with_path("request").post(password_resets::request::handler))
        .push(Router::with_path("verify/{token}").get(password_resets::verify::handler))
        .push(Router::with_path("reset").post(password_resets::reset::handler))
}
