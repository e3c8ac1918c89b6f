#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    coins, to_json_binary, Addr, BankMsg, Binary, Deps, DepsMut, Env, Event, MessageInfo, Order,
    Response, StdError, StdResult, Storage, Uint128, Uint64,
};
use cw2::{get_contract_version, set_contract_version};
use cw_utils::{may_pay, nonpayable};

use crate::error::ContractError;
use crate::msg::{
    ConfigResponse, ExecuteMsg, InstantiateMsg, MarketInfoResponse, MigrateMsg, QueryMsg,
};
use crate::registry::{parse_token_id, ItemRegistry, REGISTRY};
use crate::state::{Config, MarketItem, CONFIG, ITEM_COUNT, LISTING_FEE, MARKET_ITEMS, SOLD_COUNT};

// version info for migration info
pub const CONTRACT_NAME: &str = "crates.io:nft-marketplace";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_LISTING_FEE: Uint128 = Uint128::new(25_000);

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.denom.is_empty() {
        return Err(StdError::generic_err("denom must not be empty").into());
    }

    let operator = match msg.operator {
        Some(operator) => deps.api.addr_validate(&operator)?,
        None => info.sender,
    };
    let config = Config {
        operator,
        denom: msg.denom,
    };
    let listing_fee = msg.listing_fee.unwrap_or(DEFAULT_LISTING_FEE);

    CONFIG.save(deps.storage, &config)?;
    LISTING_FEE.save(deps.storage, &listing_fee)?;
    ITEM_COUNT.save(deps.storage, &0)?;
    SOLD_COUNT.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("operator", config.operator)
        .add_attribute("denom", config.denom)
        .add_attribute("listing_fee", listing_fee))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SetListingFee { listing_fee } => {
            execute_set_listing_fee(deps, info, listing_fee)
        }
        ExecuteMsg::ListItem { token_uri, price } => {
            execute_list_item(&REGISTRY, deps, env, info, token_uri, price)
        }
        ExecuteMsg::RelistItem { item_id, price } => {
            execute_relist_item(&REGISTRY, deps, env, info, item_id, price)
        }
        ExecuteMsg::PurchaseItem { item_id } => {
            execute_purchase_item(&REGISTRY, deps, env, info, item_id)
        }
        ExecuteMsg::TransferNft {
            recipient,
            token_id,
        } => execute_transfer_nft(&REGISTRY, deps, env, info, recipient, token_id),
    }
}

pub fn execute_set_listing_fee(
    deps: DepsMut,
    info: MessageInfo,
    listing_fee: Uint128,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {});
    }

    LISTING_FEE.save(deps.storage, &listing_fee)?;

    Ok(Response::new()
        .add_attribute("action", "set_listing_fee")
        .add_attribute("listing_fee", listing_fee))
}

/// Checks that exactly the current listing fee was attached and returns it.
fn check_listing_fee(
    storage: &dyn Storage,
    info: &MessageInfo,
    config: &Config,
) -> Result<Uint128, ContractError> {
    let listing_fee = LISTING_FEE.load(storage)?;
    let paid = may_pay(info, &config.denom)?;
    if paid != listing_fee {
        return Err(ContractError::IncorrectPayment {
            expected: listing_fee,
            received: paid,
        });
    }
    Ok(listing_fee)
}

pub fn execute_list_item<R: ItemRegistry>(
    registry: &R,
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    token_uri: String,
    price: Uint128,
) -> Result<Response, ContractError> {
    if price.is_zero() {
        return Err(ContractError::InvalidPrice {});
    }
    let config = CONFIG.load(deps.storage)?;
    let listing_fee = check_listing_fee(deps.storage, &info, &config)?;

    let marketplace = env.contract.address;
    let item_id = registry.mint(deps.storage, &info.sender)?;
    registry.attach_metadata(deps.storage, item_id, &token_uri)?;

    let item = MarketItem {
        item_id,
        seller: info.sender.clone(),
        holder: Some(marketplace.clone()),
        price,
        sold: false,
    };
    MARKET_ITEMS.save(deps.storage, item_id, &item)?;
    ITEM_COUNT.save(deps.storage, &item_id)?;

    registry.transfer_custody(deps.storage, item_id, &info.sender, &marketplace)?;

    let event = Event::new("market_item_created")
        .add_attribute("item_id", item_id.to_string())
        .add_attribute("seller", item.seller.to_string())
        .add_attribute("holder", marketplace.to_string())
        .add_attribute("price", item.price)
        .add_attribute("sold", item.sold.to_string());

    Ok(Response::new()
        .set_data(to_json_binary(&item_id)?)
        .add_event(event)
        .add_attribute("action", "list_item")
        .add_attribute("item_id", item_id.to_string())
        .add_attribute("token_uri", token_uri)
        .add_attribute("listing_fee", listing_fee))
}

/// Puts an item back on sale. Only the holder recorded on the market item
/// may do this, and unlike a first listing a zero price is accepted.
pub fn execute_relist_item<R: ItemRegistry>(
    registry: &R,
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    item_id: u64,
    price: Uint128,
) -> Result<Response, ContractError> {
    let mut item = MARKET_ITEMS.load(deps.storage, item_id)?;
    if !item.is_held_by(&info.sender) {
        return Err(ContractError::NotItemHolder { item_id });
    }
    let config = CONFIG.load(deps.storage)?;
    let listing_fee = check_listing_fee(deps.storage, &info, &config)?;

    let sold_count = Uint64::new(SOLD_COUNT.load(deps.storage)?).checked_sub(Uint64::new(1))?;

    let marketplace = env.contract.address;
    registry.transfer_custody(deps.storage, item_id, &info.sender, &marketplace)?;

    item.sold = false;
    item.price = price;
    item.seller = info.sender.clone();
    item.holder = Some(marketplace);
    MARKET_ITEMS.save(deps.storage, item_id, &item)?;
    SOLD_COUNT.save(deps.storage, &sold_count.u64())?;

    let event = Event::new("market_item_relisted")
        .add_attribute("item_id", item_id.to_string())
        .add_attribute("seller", info.sender.to_string())
        .add_attribute("price", price);

    Ok(Response::new()
        .add_event(event)
        .add_attribute("action", "relist_item")
        .add_attribute("item_id", item_id.to_string())
        .add_attribute("listing_fee", listing_fee))
}

/// Settles a sale. The operator is paid the current listing fee out of the
/// fees the contract has already collected and the seller receives the whole
/// payment. Bank messages only run after every state change is stored.
pub fn execute_purchase_item<R: ItemRegistry>(
    registry: &R,
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    item_id: u64,
) -> Result<Response, ContractError> {
    let mut item = MARKET_ITEMS.load(deps.storage, item_id)?;
    let config = CONFIG.load(deps.storage)?;

    let payment = may_pay(&info, &config.denom)?;
    if payment != item.price {
        return Err(ContractError::IncorrectPayment {
            expected: item.price,
            received: payment,
        });
    }

    let sold_count = Uint64::new(SOLD_COUNT.load(deps.storage)?).checked_add(Uint64::new(1))?;
    let operator_fee = LISTING_FEE.load(deps.storage)?;

    // an item that already sold is no longer in marketplace custody, so the
    // registry refuses a second purchase
    registry.transfer_custody(deps.storage, item_id, &env.contract.address, &info.sender)?;

    item.sold = true;
    // the holder ends up unassigned rather than the buyer; the buyer's custody
    // is tracked by the registry alone
    item.holder = None;
    MARKET_ITEMS.save(deps.storage, item_id, &item)?;
    SOLD_COUNT.save(deps.storage, &sold_count.u64())?;

    let event = Event::new("market_item_sold")
        .add_attribute("item_id", item_id.to_string())
        .add_attribute("seller", item.seller.to_string())
        .add_attribute("buyer", info.sender.to_string())
        .add_attribute("price", item.price);

    let mut res = Response::new()
        .add_event(event)
        .add_attribute("action", "purchase_item")
        .add_attribute("item_id", item_id.to_string())
        .add_attribute("buyer", info.sender)
        .add_attribute("operator_fee", operator_fee);

    if !operator_fee.is_zero() {
        res = res.add_message(BankMsg::Send {
            to_address: config.operator.to_string(),
            amount: coins(operator_fee.u128(), &config.denom),
        });
    }
    if !payment.is_zero() {
        res = res.add_message(BankMsg::Send {
            to_address: item.seller.to_string(),
            amount: coins(payment.u128(), &config.denom),
        });
    }

    Ok(res)
}

/// Registry transfer between holders. Tokens only enter marketplace custody
/// through a listing, so the contract itself is never a valid recipient.
pub fn execute_transfer_nft<R: ItemRegistry>(
    registry: &R,
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    token_id: String,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let id = parse_token_id(&token_id)?;
    let recipient_addr = deps.api.addr_validate(&recipient)?;
    if recipient_addr == env.contract.address {
        return Err(ContractError::MarketplaceRecipient {});
    }
    registry.transfer_custody(deps.storage, id, &info.sender, &recipient_addr)?;

    Ok(Response::new()
        .add_attribute("action", "transfer_nft")
        .add_attribute("sender", info.sender)
        .add_attribute("recipient", recipient)
        .add_attribute("token_id", token_id))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let previous = get_contract_version(deps.storage)?;
    if previous.contract != CONTRACT_NAME {
        return Err(ContractError::InvalidMigration {
            previous_contract: previous.contract,
            contract: CONTRACT_NAME.to_string(),
        });
    }
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", previous.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::ListingFee {} => to_json_binary(&query_listing_fee(deps)?),
        QueryMsg::MarketInfo {} => to_json_binary(&query_market_info(deps)?),
        QueryMsg::MarketItem { item_id } => {
            to_json_binary(&MARKET_ITEMS.load(deps.storage, item_id)?)
        }
        QueryMsg::UnsoldItems {} => to_json_binary(&query_unsold_items(deps, env)?),
        QueryMsg::OwnedItems { owner } => {
            let owner = deps.api.addr_validate(&owner)?;
            to_json_binary(&query_owned_items(deps, &owner)?)
        }
        QueryMsg::SellerItems { seller } => {
            let seller = deps.api.addr_validate(&seller)?;
            to_json_binary(&query_seller_items(deps, &seller)?)
        }
        QueryMsg::OwnerOf { token_id } => {
            to_json_binary(&REGISTRY.owner_of(deps.storage, parse_token_id(&token_id)?)?)
        }
        QueryMsg::NftInfo { token_id } => {
            to_json_binary(&REGISTRY.nft_info(deps.storage, parse_token_id(&token_id)?)?)
        }
        QueryMsg::NumTokens {} => to_json_binary(&REGISTRY.num_tokens(deps.storage)?),
        QueryMsg::Tokens { owner } => {
            let owner = deps.api.addr_validate(&owner)?;
            to_json_binary(&REGISTRY.tokens(deps.storage, &owner)?)
        }
    }
}

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        operator: config.operator.into_string(),
        denom: config.denom,
    })
}

pub fn query_listing_fee(deps: Deps) -> StdResult<Uint128> {
    LISTING_FEE.load(deps.storage)
}

pub fn query_market_info(deps: Deps) -> StdResult<MarketInfoResponse> {
    Ok(MarketInfoResponse {
        item_count: ITEM_COUNT.load(deps.storage)?,
        sold_count: SOLD_COUNT.load(deps.storage)?,
        listing_fee: LISTING_FEE.load(deps.storage)?,
    })
}

// Full scan over every item ever listed, in ascending id order.
fn collect_items<F>(deps: Deps, keep: F) -> StdResult<Vec<MarketItem>>
where
    F: Fn(&MarketItem) -> bool,
{
    MARKET_ITEMS
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, market_item)| market_item))
        .filter(|item| match item {
            Ok(market_item) => keep(market_item),
            Err(_) => true,
        })
        .collect()
}

pub fn query_unsold_items(deps: Deps, env: Env) -> StdResult<Vec<MarketItem>> {
    let marketplace = env.contract.address;
    collect_items(deps, |item| item.is_held_by(&marketplace))
}

pub fn query_owned_items(deps: Deps, owner: &Addr) -> StdResult<Vec<MarketItem>> {
    collect_items(deps, |item| item.is_held_by(owner))
}

pub fn query_seller_items(deps: Deps, seller: &Addr) -> StdResult<Vec<MarketItem>> {
    collect_items(deps, |item| item.seller == *seller)
}
