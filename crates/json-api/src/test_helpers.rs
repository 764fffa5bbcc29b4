//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use mercado_app::{
    auth::{Identity, MockAuthService},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            records::{CartItemRecord, CartRecord, CartUuid},
        },
        checkout::MockCheckoutService,
        password_resets::MockPasswordResetsService,
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        tickets::{
            MockTicketsService,
            records::{TicketItemRecord, TicketRecord, TicketStatus, TicketUuid},
        },
        users::{
            MockUsersService,
            records::{Role, UserRecord, UserUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_EMAIL: &str = "ana@example.com";

/// One mock per service. Mocks without expectations panic when called.
#[derive(Default)]
pub(crate) struct MockServices {
    pub products: MockProductsService,
    pub carts: MockCartsService,
    pub checkout: MockCheckoutService,
    pub tickets: MockTicketsService,
    pub users: MockUsersService,
    pub auth: MockAuthService,
    pub password_resets: MockPasswordResetsService,
}

impl MockServices {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            checkout: Arc::new(self.checkout),
            tickets: Arc::new(self.tickets),
            users: Arc::new(self.users),
            auth: Arc::new(self.auth),
            password_resets: Arc::new(self.password_resets),
        })
    }
}

pub(crate) fn identity(role: Role) -> Identity {
    Identity {
        user_uuid: TEST_USER_UUID,
        email: TEST_EMAIL.to_string(),
        role,
    }
}

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(identity(Role::User));
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(identity(Role::Admin));
    ctrl.call_next(req, depot, res).await;
}

/// No caller identity.
pub(crate) fn public_service(mocks: MockServices, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

/// Authenticated as a plain user.
pub(crate) fn user_service(mocks: MockServices, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_user)
            .push(route),
    )
}

/// Authenticated as an admin.
pub(crate) fn admin_service(mocks: MockServices, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_admin)
            .push(route),
    )
}

pub(crate) fn make_cart(uuid: CartUuid, items: &[(ProductUuid, u32)]) -> CartRecord {
    CartRecord {
        uuid,
        items: items
            .iter()
            .map(|&(product_uuid, quantity)| CartItemRecord {
                product_uuid,
                quantity,
                created_at: Timestamp::UNIX_EPOCH,
                updated_at: Timestamp::UNIX_EPOCH,
            })
            .collect(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        title: "Yerba".to_string(),
        description: "Yerba mate 1kg".to_string(),
        code: "YERBA-1".to_string(),
        price: 100,
        stock: 5,
        category: "almacen".to_string(),
        status: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_ticket(uuid: TicketUuid, purchaser: &str) -> TicketRecord {
    let product_uuid = ProductUuid::from_uuid(Uuid::max());

    TicketRecord {
        uuid,
        code: "TICKET-1700000000000-0A1B2C3D".to_string(),
        purchase_datetime: Timestamp::UNIX_EPOCH,
        amount: 200,
        purchaser: purchaser.to_string(),
        items: vec![TicketItemRecord {
            product_uuid,
            title: "Yerba".to_string(),
            price: 100,
            quantity: 2,
            subtotal: 200,
        }],
        status: TicketStatus::Completed,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_user(uuid: UserUuid, email: &str, role: Role) -> UserRecord {
    UserRecord {
        uuid,
        first_name: "Ana".to_string(),
        last_name: "Pérez".to_string(),
        email: email.to_string(),
        age: Some(30),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        cart_uuid: Some(CartUuid::from_uuid(Uuid::max())),
        role,
        last_password_change: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
