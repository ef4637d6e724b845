pub mod consume_use;
pub mod create;
pub mod find_by_token_hash;
pub mod load;
pub mod load_audits;
pub mod record_verification;
pub mod repo_impl;
pub mod revoke;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::ActionLinkRepositoryImpl;
