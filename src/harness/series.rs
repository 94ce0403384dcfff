//! Sequential `create_series` calls against an NFT contract.

use serde_json::json;

use crate::blockchain::contract::CallContract;
use crate::harness::models::TokenMetadata;
use crate::harness::options::{default_call_options, CallOptions};
use crate::harness::{HarnessError, HarnessResult};

/// Create one series per `(metadatas[i], ids[i])` pair, in order.
///
/// Each call attaches `DEFAULT_GAS` and `DEFAULT_DEPOSIT`. A failure stops the
/// loop; series created before it stay on-chain.
pub async fn create_series<A: CallContract>(
    account: &A,
    nft_contract: &str,
    metadatas: &[TokenMetadata],
    ids: &[u64],
) -> HarnessResult<()> {
    create_series_with_options(account, nft_contract, metadatas, ids, default_call_options(None, None))
        .await
}

/// [`create_series`] with explicit gas and deposit.
pub async fn create_series_with_options<A: CallContract>(
    account: &A,
    nft_contract: &str,
    metadatas: &[TokenMetadata],
    ids: &[u64],
    options: CallOptions,
) -> HarnessResult<()> {
    if metadatas.len() != ids.len() {
        return Err(HarnessError::SeriesLengthMismatch {
            metadatas: metadatas.len(),
            ids: ids.len(),
        });
    }

    for (index, (metadata, &mint_id)) in metadatas.iter().zip(ids).enumerate() {
        let args = json!({
            "metadata": metadata,
            "mint_id": mint_id,
        });

        account
            .call(nft_contract, "create_series", args, options)
            .await
            .map_err(|source| HarnessError::SeriesCallFailed {
                index,
                mint_id,
                source,
            })?;

        tracing::info!(
            account = %account.account_id(),
            nft_contract = %nft_contract,
            mint_id,
            "Series created"
        );
    }

    Ok(())
}
