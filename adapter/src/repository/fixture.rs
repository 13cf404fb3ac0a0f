use kernel::model::{
    id::{LotId, UserId},
    lot::event::CreateLot,
    role::Role,
    user::event::CreateUser,
};
use kernel::repository::{lot::LotRepository, user::UserRepository};

use super::{lot::LotRepositoryImpl, user::UserRepositoryImpl};
use crate::database::ConnectionPool;

pub(crate) fn new_user(email: &str, role: Role) -> CreateUser {
    CreateUser {
        email: email.into(),
        password: "password".into(),
        full_name: "Test User".into(),
        address: "1-2-3 Test Street".into(),
        pin_code: "100001".into(),
        role,
    }
}

pub(crate) fn new_lot(name: &str, price_per_hour: f64, capacity: i64) -> CreateLot {
    CreateLot {
        prime_location_name: name.into(),
        price_per_hour,
        address: "Station Road".into(),
        pin_code: "560001".into(),
        maximum_number_of_spots: capacity,
    }
}

pub(crate) async fn seed_user(db: &ConnectionPool, email: &str) -> UserId {
    UserRepositoryImpl::new(db.clone())
        .create(new_user(email, Role::User))
        .await
        .expect("user should be created")
        .user_id
}

pub(crate) async fn seed_lot(
    db: &ConnectionPool,
    name: &str,
    price_per_hour: f64,
    capacity: i64,
) -> LotId {
    LotRepositoryImpl::new(db.clone())
        .create(new_lot(name, price_per_hour, capacity))
        .await
        .expect("lot should be created")
}
