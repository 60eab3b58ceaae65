pub mod documents;
pub mod users;

pub mod prelude {
    pub use super::documents::Entity as Documents;
    pub use super::users::Entity as Users;
}
