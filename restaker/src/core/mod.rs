pub mod chain;
pub mod history;
pub mod notify;
pub mod signer;
