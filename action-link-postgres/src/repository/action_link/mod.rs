pub mod action_link_repository;

pub use action_link_repository::ActionLinkRepositoryImpl;
