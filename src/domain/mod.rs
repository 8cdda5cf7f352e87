//! Module that describe domain entities and errors.
mod entities;
mod errors;

pub use entities::check_amount;
pub use entities::AccountType;
pub use entities::Credentials;
pub use entities::GatewayResponse;
pub use entities::PaymentOrigin;
pub use entities::ReferenceNumber;
pub use entities::Transaction;
pub use entities::TransactionState;
pub use entities::ValidTransaction;
pub use entities::UNREADABLE_REQUEST;
pub use errors::*;
