//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, catcher::Catcher, prelude::*};
use uuid::Uuid;

use feast_app::{
    auth::{AuthenticatedUser, MockAuthService},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartLine, CartUuid},
        },
        orders::{
            MockOrdersService,
            models::{Order, OrderLine, OrderStatus, OrderUuid},
        },
        restaurants::{
            MockRestaurantsService,
            models::{Cuisines, MenuItem, MenuItemUuid, Restaurant, RestaurantUuid},
        },
        users::{
            MockUsersService,
            models::{User, UserRole, UserUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// Builds handler state from mocks. Services left unset are fresh mocks, which panic
/// on any call.
#[derive(Default)]
pub(crate) struct StateBuilder {
    users: Option<MockUsersService>,
    restaurants: Option<MockRestaurantsService>,
    carts: Option<MockCartsService>,
    orders: Option<MockOrdersService>,
    auth: Option<MockAuthService>,
}

impl StateBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn users(mut self, users: MockUsersService) -> Self {
        self.users = Some(users);
        self
    }

    pub(crate) fn restaurants(mut self, restaurants: MockRestaurantsService) -> Self {
        self.restaurants = Some(restaurants);
        self
    }

    pub(crate) fn carts(mut self, carts: MockCartsService) -> Self {
        self.carts = Some(carts);
        self
    }

    pub(crate) fn orders(mut self, orders: MockOrdersService) -> Self {
        self.orders = Some(orders);
        self
    }

    pub(crate) fn auth(mut self, auth: MockAuthService) -> Self {
        self.auth = Some(auth);
        self
    }

    pub(crate) fn build(self) -> Arc<State> {
        let app = AppContext {
            users: Arc::new(self.users.unwrap_or_default()),
            restaurants: Arc::new(self.restaurants.unwrap_or_default()),
            carts: Arc::new(self.carts.unwrap_or_default()),
            orders: Arc::new(self.orders.unwrap_or_default()),
            auth: Arc::new(self.auth.unwrap_or_default()),
        };

        State::new(app, true)
    }
}

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_authenticated_user(AuthenticatedUser {
        uuid: TEST_USER_UUID,
        role: UserRole::Customer,
    });

    ctrl.call_next(req, depot, res).await;
}

/// Service for routes behind the auth middleware, authenticated as [`TEST_USER_UUID`].
pub(crate) fn authenticated_service(state: StateBuilder, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state.build()))
            .hoop(inject_user)
            .push(route),
    )
    .catcher(envelope_catcher())
}

/// Service for public routes.
pub(crate) fn public_service(state: StateBuilder, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state.build())).push(route))
        .catcher(envelope_catcher())
}

fn envelope_catcher() -> Catcher {
    Catcher::default().hoop(crate::envelope::catch_errors)
}

pub(crate) fn make_user(uuid: UserUuid) -> User {
    User {
        uuid,
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "9876543210".to_string(),
        address: None,
        role: UserRole::Customer,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_menu_item(restaurant: RestaurantUuid, name: &str, price: u64) -> MenuItem {
    MenuItem {
        uuid: MenuItemUuid::new(),
        restaurant,
        name: name.to_string(),
        price,
        description: None,
        image: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_restaurant(uuid: RestaurantUuid, owner: UserUuid) -> Restaurant {
    Restaurant {
        uuid,
        name: "Dosa Corner".to_string(),
        location: "Indiranagar, Bengaluru".to_string(),
        owner,
        image: None,
        cuisines: Cuisines::from_vec(vec!["South Indian".to_string()]),
        rating: 4.5,
        menu: vec![make_menu_item(uuid, "Masala Dosa", 120)],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(lines: Vec<CartLine>) -> Cart {
    let total_price = lines
        .iter()
        .map(|line| line.price * u64::from(line.quantity))
        .sum();

    Cart {
        uuid: CartUuid::new(),
        user: TEST_USER_UUID,
        restaurant: Some(RestaurantUuid::new()),
        lines,
        total_price,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart_line(menu_item: MenuItemUuid, price: u64, quantity: u32) -> CartLine {
    CartLine {
        menu_item,
        quantity,
        name: Some("Masala Dosa".to_string()),
        price,
        image: None,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, status: OrderStatus) -> Order {
    let menu_item = MenuItemUuid::new();

    Order {
        uuid,
        user: TEST_USER_UUID,
        restaurant: RestaurantUuid::new(),
        lines: vec![OrderLine {
            menu_item,
            name: "Masala Dosa".to_string(),
            price: 120,
            quantity: 2,
        }],
        total_price: 240,
        status,
        delivery_address: Some("12 MG Road".to_string()),
        payment_method: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
