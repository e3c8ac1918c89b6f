use cosmwasm_std::{OverflowError, StdError, Uint128};
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Price must be greater than zero")]
    InvalidPrice {},

    #[error("Payment of {received} does not match the required amount {expected}")]
    IncorrectPayment { expected: Uint128, received: Uint128 },

    #[error("Sender is not the holder of market item {item_id}")]
    NotItemHolder { item_id: u64 },

    #[error("Token {token_id} is not held by the sender")]
    NotTokenHolder { token_id: u64 },

    #[error("Tokens enter marketplace custody only by listing")]
    MarketplaceRecipient {},

    #[error("Cannot migrate from {previous_contract} to {contract}")]
    InvalidMigration {
        previous_contract: String,
        contract: String,
    },
}
