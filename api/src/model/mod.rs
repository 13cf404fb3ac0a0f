pub mod auth;
pub mod dashboard;
pub mod lot;
pub mod reservation;
pub mod summary;
pub mod user;

// 空白のみの入力も未入力として扱う
pub(crate) fn not_blank<T: AsRef<str> + ?Sized>(value: &T, _ctx: &()) -> garde::Result {
    if value.as_ref().trim().is_empty() {
        return Err(garde::Error::new("must not be empty"));
    }
    Ok(())
}
