pub mod todo;
pub mod user;

pub(crate) use todo::TodoRecord;
pub(crate) use user::UserRecord;
