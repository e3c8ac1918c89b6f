use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Config {
    /// The only address allowed to change the listing fee
    pub operator: Addr,
    /// Native denom every fee and payment is made in
    pub denom: String,
}

/// Ledger record for an item that has been listed at least once.
///
/// Field order is part of the persisted layout.
#[cw_serde]
pub struct MarketItem {
    pub item_id: u64,
    /// Whoever most recently listed or relisted the item
    pub seller: Addr,
    /// The marketplace while listed. `None` once a purchase has settled.
    pub holder: Option<Addr>,
    pub price: Uint128,
    pub sold: bool,
}

impl MarketItem {
    pub fn is_held_by(&self, party: &Addr) -> bool {
        self.holder.as_ref() == Some(party)
    }
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const LISTING_FEE: Item<Uint128> = Item::new("listing_fee");
pub const MARKET_ITEMS: Map<u64, MarketItem> = Map::new("market_items");
// highest item id handed out so far
pub const ITEM_COUNT: Item<u64> = Item::new("item_count");
pub const SOLD_COUNT: Item<u64> = Item::new("sold_count");
