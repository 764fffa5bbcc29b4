//! Test Helpers

use uuid::Uuid;

use crate::{
    domain::{
        carts::{
            CartsService, CartsServiceError,
            data::{NewCart, NewCartItem},
            records::{CartRecord, CartUuid},
        },
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        users::{
            UsersService, UsersServiceError,
            data::NewUser,
            records::{Role, UserRecord, UserUuid},
        },
    },
    test::TestContext,
};

/// Password every helper-registered user signs in with.
pub(crate) const PASSWORD: &str = "correct-horse-battery";

pub(crate) fn new_product(code: &str, price: u64, stock: u32) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        title: format!("Producto {code}"),
        description: "Producto de prueba".to_string(),
        code: code.to_string(),
        price,
        stock,
        category: "general".to_string(),
        status: true,
    }
}

/// Create a product with a unique generated code.
pub(crate) async fn create_product(
    ctx: &TestContext,
    price: u64,
    stock: u32,
) -> Result<ProductRecord, ProductsServiceError> {
    let code = format!("P-{}", Uuid::now_v7().simple());

    ctx.products
        .create_product(new_product(&code, price, stock))
        .await
}

pub(crate) async fn create_cart(ctx: &TestContext) -> Result<CartRecord, CartsServiceError> {
    ctx.carts
        .create_cart(NewCart {
            uuid: CartUuid::new(),
        })
        .await
}

/// A new cart holding exactly `items`.
pub(crate) async fn cart_with(
    ctx: &TestContext,
    items: &[(ProductUuid, i64)],
) -> Result<CartRecord, CartsServiceError> {
    let cart = create_cart(ctx).await?;

    ctx.carts
        .set_items(
            cart.uuid,
            items
                .iter()
                .map(|&(product_uuid, quantity)| NewCartItem {
                    product_uuid,
                    quantity,
                })
                .collect(),
        )
        .await
}

pub(crate) fn new_user(email: &str) -> NewUser {
    NewUser {
        uuid: UserUuid::new(),
        first_name: "Ana".to_string(),
        last_name: "García".to_string(),
        email: email.to_string(),
        age: Some(30),
        password: PASSWORD.to_string(),
        role: Role::User,
    }
}

pub(crate) async fn register_user(
    ctx: &TestContext,
    email: &str,
) -> Result<UserRecord, UsersServiceError> {
    ctx.users.register(new_user(email)).await
}
