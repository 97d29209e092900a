pub mod book;
pub mod token;
pub mod user;

pub use book::{Book, MAX_PUBLICATION_YEAR, MIN_PUBLICATION_YEAR, is_valid_publication_year};
pub use token::Token;
pub use user::User;
