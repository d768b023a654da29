//! App Router

use salvo::Router;

use crate::{auth, carts, orders, restaurants, users};

/// Public catalogue routes followed by the routes behind bearer authentication.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(public_router())
        .push(authenticated_router())
}

fn public_router() -> Router {
    Router::with_path("restaurants")
        .get(restaurants::index::handler)
        .push(
            Router::with_path("{restaurant}")
                .get(restaurants::get::handler)
                .push(Router::with_path("menu").get(restaurants::menu::index::handler)),
        )
}

fn authenticated_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("users/me")
                .get(users::get::handler)
                .put(users::update::handler)
                .push(Router::with_path("restaurants").get(users::restaurants::handler)),
        )
        .push(
            Router::with_path("restaurants")
                .post(restaurants::create::handler)
                .push(
                    Router::with_path("{restaurant}")
                        .put(restaurants::update::handler)
                        .delete(restaurants::delete::handler)
                        .push(Router::with_path("orders").get(orders::restaurant::handler))
                        .push(
                            Router::with_path("menu")
                                .post(restaurants::menu::create::handler)
                                .push(
                                    Router::with_path("{item}")
                                        .put(restaurants::menu::update::handler)
                                        .delete(restaurants::menu::delete::handler),
                                ),
                        ),
                ),
        )
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .delete(carts::clear::handler)
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .push(
                            Router::with_path("{item}")
                                .put(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("status").put(orders::status::handler)),
                ),
        )
}
