//! Test Helpers

use crate::{
    domain::{
        carts::{CartsService, CartsServiceError, models::Cart},
        orders::{OrdersService, OrdersServiceError, data::CheckoutDetails, models::Order},
        restaurants::{
            RestaurantsService, RestaurantsServiceError,
            data::{NewMenuItem, NewRestaurant},
            models::{Cuisines, MenuItem, MenuItemUuid, Restaurant, RestaurantUuid},
        },
        users::{
            UsersService, UsersServiceError,
            data::NewUser,
            models::{User, UserRole, UserUuid},
        },
    },
    test::TestContext,
};

pub(crate) async fn create_user(
    ctx: &TestContext,
    email: &str,
) -> Result<User, UsersServiceError> {
    ctx.users
        .create_user(NewUser {
            uuid: UserUuid::new(),
            name: "Test User".to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
            address: None,
            role: UserRole::Customer,
        })
        .await
}

pub(crate) async fn create_restaurant(
    ctx: &TestContext,
    owner: UserUuid,
    name: &str,
    menu: &[(&str, u64)],
) -> Result<Restaurant, RestaurantsServiceError> {
    ctx.restaurants
        .create_restaurant(
            owner,
            NewRestaurant {
                uuid: RestaurantUuid::new(),
                name: name.to_string(),
                location: "Indiranagar, Bengaluru".to_string(),
                image: None,
                cuisines: Cuisines::from_vec(vec!["South Indian".to_string()]),
                menu: menu
                    .iter()
                    .map(|(name, price)| NewMenuItem {
                        uuid: MenuItemUuid::new(),
                        name: (*name).to_string(),
                        price: *price,
                        description: None,
                        image: None,
                    })
                    .collect(),
            },
        )
        .await
}

/// A customer plus a restaurant, owned by someone else, serving "Masala Dosa" (120)
/// and "Filter Coffee" (40).
pub(crate) async fn customer_and_restaurant(
    ctx: &TestContext,
) -> Result<(User, Restaurant), Box<dyn std::error::Error>> {
    let owner = create_user(ctx, "owner@example.com").await?;
    let customer = create_user(ctx, "customer@example.com").await?;

    let restaurant = create_restaurant(
        ctx,
        owner.uuid,
        "Dosa Corner",
        &[("Masala Dosa", 120), ("Filter Coffee", 40)],
    )
    .await?;

    Ok((customer, restaurant))
}

pub(crate) fn menu_item(
    restaurant: &Restaurant,
    name: &str,
) -> Result<MenuItem, RestaurantsServiceError> {
    restaurant
        .menu
        .iter()
        .find(|item| item.name == name)
        .cloned()
        .ok_or(RestaurantsServiceError::MenuItemNotFound)
}

pub(crate) async fn add_to_cart(
    ctx: &TestContext,
    user: UserUuid,
    item: MenuItemUuid,
    quantity: u32,
) -> Result<Cart, CartsServiceError> {
    ctx.carts.add_item(user, item, quantity).await
}

pub(crate) async fn checkout(
    ctx: &TestContext,
    user: UserUuid,
) -> Result<Order, OrdersServiceError> {
    ctx.orders
        .create_order(user, CheckoutDetails::default())
        .await
}
