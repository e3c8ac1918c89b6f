#[cfg(test)]
pub mod tests {
    use crate::contract::{execute, instantiate, migrate, query};
    use crate::msg::{ExecuteMsg, InstantiateMsg, MarketInfoResponse, MigrateMsg, QueryMsg};
    use crate::state::MarketItem;
    use crate::ContractError;
    use cosmwasm_std::{coins, Addr, Empty, Uint128};
    use cw721::{NftInfoResponse, OwnerOfResponse};
    use cw_multi_test::{App, Contract, ContractWrapper, Executor};

    pub fn marketplace_contract() -> Box<dyn Contract<Empty>> {
        let contract = ContractWrapper::new(execute, instantiate, query).with_migrate(migrate);

        Box::new(contract)
    }

    pub const OPERATOR: &str = "operator";
    pub const SELLER: &str = "seller";
    pub const BUYER: &str = "buyer";
    pub const DENOM: &str = "uxion";

    pub fn proper_instantiate(listing_fee: u128) -> (App, Addr, u64) {
        let mut app = App::new(|router, _, storage| {
            for account in [SELLER, BUYER] {
                router
                    .bank
                    .init_balance(storage, &Addr::unchecked(account), coins(1_000, DENOM))
                    .unwrap();
            }
        });
        let code_id = app.store_code(marketplace_contract());

        let msg = InstantiateMsg {
            operator: None,
            denom: DENOM.to_string(),
            listing_fee: Some(Uint128::new(listing_fee)),
        };
        let contract_addr = app
            .instantiate_contract(
                code_id,
                Addr::unchecked(OPERATOR),
                &msg,
                &[],
                "nft-marketplace",
                Some(OPERATOR.to_string()),
            )
            .unwrap();

        (app, contract_addr, code_id)
    }

    fn balance(app: &App, account: impl Into<String>) -> u128 {
        app.wrap().query_balance(account, DENOM).unwrap().amount.u128()
    }

    fn market_info(app: &App, contract_addr: &Addr) -> MarketInfoResponse {
        app.wrap()
            .query_wasm_smart(contract_addr.clone(), &QueryMsg::MarketInfo {})
            .unwrap()
    }

    fn list_item(app: &mut App, contract_addr: &Addr, price: u128, fee: u128) {
        app.execute_contract(
            Addr::unchecked(SELLER),
            contract_addr.clone(),
            &ExecuteMsg::ListItem {
                token_uri: "ipfs://artwork".to_string(),
                price: Uint128::new(price),
            },
            &coins(fee, DENOM),
        )
        .unwrap();
    }

    #[test]
    fn list_and_purchase_settles_balances() {
        let (mut app, contract_addr, _) = proper_instantiate(10);

        list_item(&mut app, &contract_addr, 100, 10);
        assert_eq!(balance(&app, SELLER), 990);
        assert_eq!(balance(&app, contract_addr.clone()), 10);

        let unsold: Vec<MarketItem> = app
            .wrap()
            .query_wasm_smart(contract_addr.clone(), &QueryMsg::UnsoldItems {})
            .unwrap();
        assert_eq!(unsold.len(), 1);
        assert_eq!(unsold[0].item_id, 1);
        assert_eq!(unsold[0].holder, Some(contract_addr.clone()));

        app.execute_contract(
            Addr::unchecked(BUYER),
            contract_addr.clone(),
            &ExecuteMsg::PurchaseItem { item_id: 1 },
            &coins(100, DENOM),
        )
        .unwrap();

        assert_eq!(balance(&app, SELLER), 1_090);
        assert_eq!(balance(&app, BUYER), 900);
        assert_eq!(balance(&app, OPERATOR), 10);
        assert_eq!(balance(&app, contract_addr.clone()), 0);

        let info = market_info(&app, &contract_addr);
        assert_eq!(info.item_count, 1);
        assert_eq!(info.sold_count, 1);

        let item: MarketItem = app
            .wrap()
            .query_wasm_smart(contract_addr.clone(), &QueryMsg::MarketItem { item_id: 1 })
            .unwrap();
        assert!(item.sold);
        assert_eq!(item.holder, None);

        let owner_of: OwnerOfResponse = app
            .wrap()
            .query_wasm_smart(
                contract_addr.clone(),
                &QueryMsg::OwnerOf {
                    token_id: "1".to_string(),
                },
            )
            .unwrap();
        assert_eq!(owner_of.owner, BUYER);

        let nft_info: NftInfoResponse<Empty> = app
            .wrap()
            .query_wasm_smart(
                contract_addr,
                &QueryMsg::NftInfo {
                    token_id: "1".to_string(),
                },
            )
            .unwrap();
        assert_eq!(nft_info.token_uri, Some("ipfs://artwork".to_string()));
    }

    #[test]
    fn failed_operations_are_reverted() {
        let (mut app, contract_addr, _) = proper_instantiate(10);

        let err = app
            .execute_contract(
                Addr::unchecked(SELLER),
                contract_addr.clone(),
                &ExecuteMsg::ListItem {
                    token_uri: "ipfs://free".to_string(),
                    price: Uint128::zero(),
                },
                &coins(10, DENOM),
            )
            .unwrap_err();
        assert_eq!(
            err.root_cause().to_string(),
            ContractError::InvalidPrice {}.to_string()
        );
        assert_eq!(balance(&app, SELLER), 1_000);
        assert_eq!(market_info(&app, &contract_addr).item_count, 0);

        list_item(&mut app, &contract_addr, 100, 10);

        let err = app
            .execute_contract(
                Addr::unchecked(BUYER),
                contract_addr.clone(),
                &ExecuteMsg::PurchaseItem { item_id: 1 },
                &coins(90, DENOM),
            )
            .unwrap_err();
        assert_eq!(
            err.root_cause().to_string(),
            ContractError::IncorrectPayment {
                expected: Uint128::new(100),
                received: Uint128::new(90),
            }
            .to_string()
        );
        assert_eq!(balance(&app, BUYER), 1_000);
        assert_eq!(market_info(&app, &contract_addr).sold_count, 0);
    }

    #[test]
    fn operator_payout_needs_collected_fees() {
        let (mut app, contract_addr, _) = proper_instantiate(10);
        list_item(&mut app, &contract_addr, 100, 10);

        app.execute_contract(
            Addr::unchecked(OPERATOR),
            contract_addr.clone(),
            &ExecuteMsg::SetListingFee {
                listing_fee: Uint128::new(50),
            },
            &[],
        )
        .unwrap();

        // only 10 in collected fees, the 50 payout cannot be covered
        app.execute_contract(
            Addr::unchecked(BUYER),
            contract_addr.clone(),
            &ExecuteMsg::PurchaseItem { item_id: 1 },
            &coins(100, DENOM),
        )
        .unwrap_err();

        assert_eq!(balance(&app, BUYER), 1_000);
        assert_eq!(balance(&app, contract_addr.clone()), 10);
        assert_eq!(market_info(&app, &contract_addr).sold_count, 0);

        let item: MarketItem = app
            .wrap()
            .query_wasm_smart(contract_addr, &QueryMsg::MarketItem { item_id: 1 })
            .unwrap();
        assert!(!item.sold);
    }

    #[test]
    fn buyer_moves_token_through_registry() {
        let (mut app, contract_addr, _) = proper_instantiate(10);
        list_item(&mut app, &contract_addr, 100, 10);
        app.execute_contract(
            Addr::unchecked(BUYER),
            contract_addr.clone(),
            &ExecuteMsg::PurchaseItem { item_id: 1 },
            &coins(100, DENOM),
        )
        .unwrap();

        app.execute_contract(
            Addr::unchecked(BUYER),
            contract_addr.clone(),
            &ExecuteMsg::TransferNft {
                recipient: SELLER.to_string(),
                token_id: "1".to_string(),
            },
            &[],
        )
        .unwrap();

        let owner_of: OwnerOfResponse = app
            .wrap()
            .query_wasm_smart(
                contract_addr.clone(),
                &QueryMsg::OwnerOf {
                    token_id: "1".to_string(),
                },
            )
            .unwrap();
        assert_eq!(owner_of.owner, SELLER);

        // ledger custody never follows the registry
        let owned: Vec<MarketItem> = app
            .wrap()
            .query_wasm_smart(
                contract_addr,
                &QueryMsg::OwnedItems {
                    owner: SELLER.to_string(),
                },
            )
            .unwrap();
        assert!(owned.is_empty());
    }

    #[test]
    fn migrate_keeps_state() {
        let (mut app, contract_addr, code_id) = proper_instantiate(10);
        list_item(&mut app, &contract_addr, 100, 10);

        app.migrate_contract(
            Addr::unchecked(OPERATOR),
            contract_addr.clone(),
            &MigrateMsg {},
            code_id,
        )
        .unwrap();

        let info = market_info(&app, &contract_addr);
        assert_eq!(info.item_count, 1);
        assert_eq!(info.listing_fee, Uint128::new(10));
    }
}
