mod book;
mod token;
mod user;

pub use book::BookRepository;
pub use token::TokenRepository;
pub use user::UserRepository;
