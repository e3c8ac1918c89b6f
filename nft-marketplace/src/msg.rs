use crate::state::MarketItem;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Empty, Uint128};
use cw721::{NftInfoResponse, NumTokensResponse, OwnerOfResponse, TokensResponse};

#[cw_serde]
pub struct InstantiateMsg {
    /// Defaults to the instantiating address
    pub operator: Option<String>,
    pub denom: String,
    /// Defaults to `DEFAULT_LISTING_FEE`
    pub listing_fee: Option<Uint128>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Operator only. Replaces the fee charged on every listing and relisting.
    SetListingFee { listing_fee: Uint128 },
    /// Mints a new item for the sender and lists it. The listing fee must be
    /// attached as funds.
    ListItem { token_uri: String, price: Uint128 },
    /// Puts an item back on sale. The listing fee must be attached as funds.
    RelistItem { item_id: u64, price: Uint128 },
    /// The item's price must be attached as funds.
    PurchaseItem { item_id: u64 },
    /// Registry level transfer by the current token holder.
    TransferNft { recipient: String, token_id: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(Uint128)]
    ListingFee {},
    #[returns(MarketInfoResponse)]
    MarketInfo {},
    #[returns(MarketItem)]
    MarketItem { item_id: u64 },
    #[returns(Vec<MarketItem>)]
    UnsoldItems {},
    #[returns(Vec<MarketItem>)]
    OwnedItems { owner: String },
    #[returns(Vec<MarketItem>)]
    SellerItems { seller: String },
    // cw721
    #[returns(OwnerOfResponse)]
    OwnerOf { token_id: String },
    #[returns(NftInfoResponse<Empty>)]
    NftInfo { token_id: String },
    #[returns(NumTokensResponse)]
    NumTokens {},
    #[returns(TokensResponse)]
    Tokens { owner: String },
}

#[cw_serde]
pub struct ConfigResponse {
    pub operator: String,
    pub denom: String,
}

#[cw_serde]
pub struct MarketInfoResponse {
    pub item_count: u64,
    pub sold_count: u64,
    pub listing_fee: Uint128,
}

#[cw_serde]
pub struct MigrateMsg {}
