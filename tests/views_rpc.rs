//! Batch view helper against the mock RPC node.

use serde_json::json;

use keypom_harness::blockchain::{BlockchainError, Contract, RpcClient, ViewContract, U128, U64};
use keypom_harness::harness::{
    query_all_view_functions, query_all_view_functions_concurrent, ViewQuery,
};

mod common;
use common::{install_keypom_views, MockNode};

const UNCONDITIONAL: [&str; 6] = [
    "get_gas_price",
    "get_root_account",
    "get_fees_collected",
    "get_next_drop_id",
    "get_key_total_supply",
    "get_keys",
];

async fn keypom() -> (MockNode, Contract) {
    let (node, url) = MockNode::start().await;
    install_keypom_views(&node);
    let client = RpcClient::new(MockNode::config(&url)).unwrap();
    (node, Contract::new(client, "keypom.test.near"))
}

#[tokio::test]
async fn test_unfiltered_query_hits_six_views() {
    let (node, contract) = keypom().await;

    let views = query_all_view_functions(&contract, &ViewQuery::new())
        .await
        .unwrap();

    assert_eq!(node.view_methods(), UNCONDITIONAL);
    assert_eq!(views.gas_price, U128(100_000_000));
    assert_eq!(views.root_account, "test.near");
    assert_eq!(views.next_drop_id, 1);
    assert!(views.key_balance.is_none());
    assert!(views.drop_information.is_none());
    assert!(views.drop_supply_for_owner.is_none());
    assert!(views.drops_for_owner.is_none());
}

#[tokio::test]
async fn test_drop_filter_over_rpc() {
    let (node, contract) = keypom().await;

    let views = query_all_view_functions(&contract, &ViewQuery::new().drop_id(0))
        .await
        .unwrap();

    let mut expected = vec![
        "get_drop_information",
        "get_key_supply_for_drop",
        "get_keys_for_drop",
        "get_nft_token_ids_for_drop",
    ];
    expected.extend(UNCONDITIONAL);
    assert_eq!(node.view_methods(), expected);

    let drop = views.drop_information.as_ref().unwrap();
    assert_eq!(drop.owner_id, "ali.test.near");
    assert_eq!(drop.required_gas, Some(U64(100_000_000_000_000)));
    assert_eq!(
        views.token_ids_for_drop,
        Some(vec!["token-1".to_string(), "token-2".to_string()])
    );
    assert!(views.key_balance.is_none());
    assert_eq!(
        node.view_args("get_keys_for_drop").unwrap(),
        json!({ "drop_id": 0, "from_index": "0", "limit": 50 })
    );
}

#[tokio::test]
async fn test_concurrent_query_over_rpc() {
    let (node, contract) = keypom().await;
    let query = ViewQuery::new()
        .key("ed25519:8bnqbCpdKdWEVoo2vTF2T5FqpXwxi2HAsDBYHzVs7Tch")
        .drop_id(0)
        .account_id("ali.test.near");

    let views = query_all_view_functions_concurrent(&contract, &query)
        .await
        .unwrap();

    assert_eq!(node.view_methods().len(), 14);
    assert_eq!(views.key_balance, Some(U128(18_762_630_063_718_400_000_000)));
    assert_eq!(views.drop_supply_for_owner, Some(1));
    assert_eq!(views.keys.len(), 1);

    let output = serde_json::to_value(&views).unwrap();
    assert_eq!(output["keySupplyForDrop"], json!(1));
    assert_eq!(output["feesCollected"], json!("0"));
    // The node sends the gas price unquoted; output stays in string form.
    assert_eq!(output["gasPrice"], json!("100000000"));
}

#[tokio::test]
async fn test_missing_view_surfaces_handler_error() {
    let (node, url) = MockNode::start().await;
    node.set_view("get_gas_price", json!("1"));
    let client = RpcClient::new(MockNode::config(&url)).unwrap();
    let contract = Contract::new(client, "keypom.test.near");

    let err = query_all_view_functions(&contract, &ViewQuery::new())
        .await
        .unwrap_err();
    match err {
        BlockchainError::Handler { name, message } => {
            assert_eq!(name, "CONTRACT_EXECUTION_ERROR");
            assert_eq!(message, "MethodNotFound");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(node.view_methods(), vec!["get_gas_price", "get_root_account"]);
}

#[tokio::test]
async fn test_single_view_decodes() {
    let (_node, contract) = keypom().await;
    let supply: U128 = contract
        .view("get_key_total_supply", json!({}))
        .await
        .unwrap();
    assert_eq!(supply, U128(1));
}

#[tokio::test]
async fn test_failover_to_second_endpoint() {
    let (node, url) = MockNode::start().await;
    install_keypom_views(&node);

    let mut config = MockNode::config("http://127.0.0.1:1");
    config.failover_urls.push(url);
    let client = RpcClient::new(config).unwrap();
    let contract = Contract::new(client, "keypom.test.near");

    let next: u64 = contract.view("get_next_drop_id", json!({})).await.unwrap();
    assert_eq!(next, 1);
}
