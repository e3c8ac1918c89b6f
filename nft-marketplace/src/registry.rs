use cosmwasm_std::{Addr, Empty, Order, StdError, StdResult, Storage, Uint64};
use cw721::{NftInfoResponse, NumTokensResponse, OwnerOfResponse, TokensResponse};
use cw_storage_plus::{Item, Map};

use crate::error::ContractError;

/// Custody capabilities the marketplace ledger needs from the item registry.
///
/// The ledger only ever talks to the registry through this trait, so the
/// storage-backed [`TokenRegistry`] can be swapped for another implementation
/// in tests.
pub trait ItemRegistry {
    /// Allocates the next token id and records `owner` as its holder.
    fn mint(&self, storage: &mut dyn Storage, owner: &Addr) -> Result<u64, ContractError>;

    fn attach_metadata(
        &self,
        storage: &mut dyn Storage,
        token_id: u64,
        token_uri: &str,
    ) -> Result<(), ContractError>;

    /// Moves custody of `token_id` from `from` to `to`. Fails when `from` is
    /// not the current holder.
    fn transfer_custody(
        &self,
        storage: &mut dyn Storage,
        token_id: u64,
        from: &Addr,
        to: &Addr,
    ) -> Result<(), ContractError>;

    fn current_holder(&self, storage: &dyn Storage, token_id: u64) -> StdResult<Addr>;
}

pub struct TokenRegistry<'a> {
    owners: Map<'a, u64, Addr>,
    token_uris: Map<'a, u64, String>,
    token_count: Item<'a, u64>,
}

impl<'a> TokenRegistry<'a> {
    pub const fn new(owners_key: &'a str, token_uris_key: &'a str, count_key: &'a str) -> Self {
        TokenRegistry {
            owners: Map::new(owners_key),
            token_uris: Map::new(token_uris_key),
            token_count: Item::new(count_key),
        }
    }

    pub fn num_tokens(&self, storage: &dyn Storage) -> StdResult<NumTokensResponse> {
        let count = self.token_count.may_load(storage)?.unwrap_or_default();
        Ok(NumTokensResponse { count })
    }

    pub fn owner_of(&self, storage: &dyn Storage, token_id: u64) -> StdResult<OwnerOfResponse> {
        let owner = self.current_holder(storage, token_id)?;
        Ok(OwnerOfResponse {
            owner: owner.into_string(),
            approvals: vec![],
        })
    }

    pub fn nft_info(
        &self,
        storage: &dyn Storage,
        token_id: u64,
    ) -> StdResult<NftInfoResponse<Empty>> {
        // existence is decided by the owner entry, metadata is optional
        self.owners.load(storage, token_id)?;
        Ok(NftInfoResponse {
            token_uri: self.token_uris.may_load(storage, token_id)?,
            extension: Empty {},
        })
    }

    pub fn tokens(&self, storage: &dyn Storage, owner: &Addr) -> StdResult<TokensResponse> {
        let tokens: StdResult<Vec<String>> = self
            .owners
            .range(storage, None, None, Order::Ascending)
            .filter(|item| match item {
                Ok((_, holder)) => holder == owner,
                Err(_) => true,
            })
            .map(|item| item.map(|(token_id, _)| token_id.to_string()))
            .collect();
        Ok(TokensResponse { tokens: tokens? })
    }
}

impl<'a> ItemRegistry for TokenRegistry<'a> {
    fn mint(&self, storage: &mut dyn Storage, owner: &Addr) -> Result<u64, ContractError> {
        let token_id = Uint64::new(self.token_count.may_load(storage)?.unwrap_or_default())
            .checked_add(Uint64::new(1))?
            .u64();
        self.token_count.save(storage, &token_id)?;
        self.owners.save(storage, token_id, owner)?;
        Ok(token_id)
    }

    fn attach_metadata(
        &self,
        storage: &mut dyn Storage,
        token_id: u64,
        token_uri: &str,
    ) -> Result<(), ContractError> {
        self.owners.load(storage, token_id)?;
        self.token_uris
            .save(storage, token_id, &token_uri.to_string())?;
        Ok(())
    }

    fn transfer_custody(
        &self,
        storage: &mut dyn Storage,
        token_id: u64,
        from: &Addr,
        to: &Addr,
    ) -> Result<(), ContractError> {
        let holder = self.owners.load(storage, token_id)?;
        if holder != *from {
            return Err(ContractError::NotTokenHolder { token_id });
        }
        self.owners.save(storage, token_id, to)?;
        Ok(())
    }

    fn current_holder(&self, storage: &dyn Storage, token_id: u64) -> StdResult<Addr> {
        self.owners.load(storage, token_id)
    }
}

pub const REGISTRY: TokenRegistry = TokenRegistry::new(
    "registry_owners",
    "registry_token_uris",
    "registry_token_count",
);

/// cw721 messages carry token ids as strings.
pub fn parse_token_id(token_id: &str) -> StdResult<u64> {
    token_id
        .parse::<u64>()
        .map_err(|err| StdError::parse_err("u64", err))
}
