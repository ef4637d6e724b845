pub mod invoice_repository;
pub mod quote_repository;

pub use invoice_repository::InvoiceRepositoryImpl;
pub use quote_repository::QuoteRepositoryImpl;
