//! Transaction building, signing, and outcome decoding.
//!
//! # Responsibilities
//! - Build function-call transactions against the signer's access key
//! - Sign (ed25519 over sha256 of the borsh encoding) and broadcast
//! - Turn the final execution status into a JSON value or an error

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use borsh::{BorshDeserialize, BorshSerialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::blockchain::client::RpcClient;
use crate::blockchain::keys::{PublicKey, Signature};
use crate::blockchain::types::{
    AccountId, Balance, BlockchainError, BlockchainResult, CallOptions, Gas,
};
use crate::blockchain::wallet::Signer;

/// Borsh discriminant of `FunctionCall` in NEAR's action enum.
const FUNCTION_CALL_TAG: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct FunctionCallAction {
    pub method_name: String,
    pub args: Vec<u8>,
    pub gas: Gas,
    pub deposit: Balance,
}

/// Transaction actions. Only function calls are issued by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FunctionCall(FunctionCallAction),
}

impl BorshSerialize for Action {
    fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Action::FunctionCall(call) => {
                FUNCTION_CALL_TAG.serialize(writer)?;
                call.serialize(writer)
            }
        }
    }
}

impl BorshDeserialize for Action {
    fn deserialize_reader<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        match u8::deserialize_reader(reader)? {
            FUNCTION_CALL_TAG => Ok(Action::FunctionCall(
                FunctionCallAction::deserialize_reader(reader)?,
            )),
            tag => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unsupported action tag {}", tag),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Transaction {
    pub signer_id: AccountId,
    pub public_key: PublicKey,
    pub nonce: u64,
    pub receiver_id: AccountId,
    pub block_hash: [u8; 32],
    pub actions: Vec<Action>,
}

impl Transaction {
    /// sha256 of the borsh encoding; this is what gets signed.
    pub fn hash(&self) -> BlockchainResult<[u8; 32]> {
        let bytes = borsh::to_vec(self).map_err(|e| BlockchainError::Encode {
            what: "transaction".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Sha256::digest(&bytes).into())
    }

    pub fn sign(self, signer: &Signer) -> BlockchainResult<SignedTransaction> {
        let hash = self.hash()?;
        let signature = signer.sign(&hash);
        Ok(SignedTransaction {
            transaction: self,
            signature,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: Signature,
}

impl SignedTransaction {
    /// Check the signature against the transaction's own public key.
    pub fn verify(&self) -> bool {
        match self.transaction.hash() {
            Ok(hash) => self.transaction.public_key.verify(&hash, &self.signature),
            Err(_) => false,
        }
    }

    pub fn to_bytes(&self) -> BlockchainResult<Vec<u8>> {
        borsh::to_vec(self).map_err(|e| BlockchainError::Encode {
            what: "signed transaction".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Decode the `status` of a final execution outcome.
///
/// A `SuccessValue` becomes JSON (`Null` when empty, a string when the bytes are not JSON).
pub fn parse_final_status(method: &str, outcome: &Value) -> BlockchainResult<Value> {
    let status = outcome
        .get("status")
        .ok_or_else(|| BlockchainError::Decode {
            method: method.to_string(),
            reason: "outcome has no status".to_string(),
        })?;

    if let Some(failure) = status.get("Failure") {
        return Err(BlockchainError::ExecutionFailure(failure.to_string()));
    }

    let Some(encoded) = status.get("SuccessValue").and_then(Value::as_str) else {
        return Err(BlockchainError::Rpc(format!(
            "Transaction not finalized: {}",
            status
        )));
    };

    let bytes = BASE64_STANDARD
        .decode(encoded)
        .map_err(|e| BlockchainError::Decode {
            method: method.to_string(),
            reason: e.to_string(),
        })?;

    if bytes.is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())))
}

/// Builds, signs and broadcasts transactions for one signer.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    client: RpcClient,
    signer: Signer,
}

impl TxBuilder {
    pub fn new(client: RpcClient, signer: Signer) -> Self {
        Self { client, signer }
    }

    /// Build and sign a transaction against the access key's current nonce.
    pub async fn build(
        &self,
        receiver_id: &str,
        actions: Vec<Action>,
    ) -> BlockchainResult<SignedTransaction> {
        let access_key = self
            .client
            .view_access_key(self.signer.account_id(), &self.signer.public_key())
            .await?;

        let block_hash: [u8; 32] = bs58::decode(&access_key.block_hash)
            .into_vec()
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| BlockchainError::Decode {
                method: "view_access_key".to_string(),
                reason: format!("invalid block hash '{}'", access_key.block_hash),
            })?;

        let nonce = self.signer.next_nonce(access_key.nonce);

        let tx = Transaction {
            signer_id: self.signer.account_id().to_string(),
            public_key: self.signer.public_key(),
            nonce,
            receiver_id: receiver_id.to_string(),
            block_hash,
            actions,
        };

        tx.sign(&self.signer)
    }

    /// Sign and submit a single function call, returning its decoded result.
    pub async fn function_call(
        &self,
        receiver_id: &str,
        method_name: &str,
        args: &Value,
        options: CallOptions,
    ) -> BlockchainResult<Value> {
        let args = serde_json::to_vec(args).map_err(|e| BlockchainError::Decode {
            method: method_name.to_string(),
            reason: e.to_string(),
        })?;

        let action = Action::FunctionCall(FunctionCallAction {
            method_name: method_name.to_string(),
            args,
            gas: options.gas,
            deposit: options.attached_deposit,
        });

        let signed = self.build(receiver_id, vec![action]).await?;
        tracing::debug!(
            signer = %self.signer.account_id(),
            receiver = %receiver_id,
            method = %method_name,
            nonce = signed.transaction.nonce,
            gas = options.gas,
            deposit = %options.attached_deposit,
            "Broadcasting function call"
        );

        let outcome = self.client.broadcast_tx_commit(&signed.to_bytes()?).await?;
        if let Some(hash) = outcome.pointer("/transaction/hash").and_then(Value::as_str) {
            tracing::debug!(tx_hash = %hash, method = %method_name, "Transaction committed");
        }

        parse_final_status(method_name, &outcome)
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }
}
