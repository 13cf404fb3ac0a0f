use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, EnumString, AsRefStr, Default, PartialEq, Eq)]
pub enum Role {
    Admin,
    #[default]
    User,
}
