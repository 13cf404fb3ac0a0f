use crate::model::role::Role;

pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub address: String,
    pub pin_code: String,
    pub role: Role,
}
