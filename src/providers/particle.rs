// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Particle Network account-abstraction RPC integration.
//!
//! ## Flow
//!
//! 1. `particle_aa_getSmartAccount` derives the smart-account address for an
//!    owner address and account contract.
//! 2. `particle_aa_getFeeQuotes` builds the user operation for a transaction
//!    and returns one quote per payment mode, each with its `userOpHash`.
//! 3. The owner signs the `userOpHash` (EIP-191).
//! 4. `particle_aa_sendUserOp` submits the signed operation and returns the
//!    hash of the bundle transaction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy::primitives::{Address, TxHash, B256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Map, Value};

use crate::account::{
    AccountContract, OwnerSigner, SendMode, SmartAccountAdapter, SmartAccountError, BICONOMY_V2,
};
use crate::blockchain::NetworkConfig;
use crate::config::ParticleCredentials;

pub const DEFAULT_AA_RPC_URL: &str = "https://rpc.particle.network/evm-chain";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmartAccountInfo {
    smart_account_address: Address,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeeQuotes {
    #[serde(default)]
    verifying_paymaster_gasless: Option<UserOpBundle>,
    #[serde(default)]
    verifying_paymaster_native: Option<UserOpBundle>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserOpBundle {
    user_op: Map<String, Value>,
    user_op_hash: B256,
}

/// JSON-RPC client for the Particle AA service.
pub struct ParticleAaClient {
    endpoint: url::Url,
    contract: AccountContract,
    http: Client,
    next_id: AtomicU64,
}

impl ParticleAaClient {
    /// Create a client scoped to `network` and authenticated with the project
    /// credentials.
    pub fn new(
        base_url: &str,
        network: &NetworkConfig,
        credentials: &ParticleCredentials,
    ) -> Result<Self, SmartAccountError> {
        let endpoint = build_endpoint(base_url, network, credentials)?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SmartAccountError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            contract: BICONOMY_V2,
            http,
            next_id: AtomicU64::new(1),
        })
    }

    fn account_config(&self, owner: Address) -> Value {
        json!({
            "name": self.contract.name,
            "version": self.contract.version,
            "ownerAddress": owner,
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, SmartAccountError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!(method, id, "Particle AA request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| SmartAccountError::Request(format!("{method}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmartAccountError::Request(format!(
                "{method} returned HTTP {status}: {body}"
            )));
        }

        let body: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| SmartAccountError::InvalidResponse(format!("{method}: {e}")))?;

        unwrap_rpc(method, body)
    }
}

#[async_trait]
impl SmartAccountAdapter for ParticleAaClient {
    async fn get_address(&self, owner: Address) -> Result<Address, SmartAccountError> {
        let accounts: Vec<SmartAccountInfo> = self
            .call(
                "particle_aa_getSmartAccount",
                json!([self.account_config(owner)]),
            )
            .await?;

        let account = accounts
            .into_iter()
            .next()
            .ok_or_else(|| {
                SmartAccountError::InvalidResponse("no smart account returned".to_string())
            })?
            .smart_account_address;

        tracing::info!(owner = %owner, account = %account, "Resolved smart account");
        Ok(account)
    }

    async fn send_transaction(
        &self,
        owner: &OwnerSigner,
        request: TransactionRequest,
        mode: SendMode,
    ) -> Result<TxHash, SmartAccountError> {
        let account = self.account_config(owner.address());
        let tx = transaction_json(&request)?;

        let quotes: FeeQuotes = self
            .call("particle_aa_getFeeQuotes", json!([account, [tx]]))
            .await?;
        let mut bundle = select_quote(quotes, mode)?;

        let signature = owner
            .sign_message(bundle.user_op_hash.as_slice())
            .await
            .map_err(|e| SmartAccountError::Signing(e.to_string()))?;
        bundle.user_op.insert(
            "signature".to_string(),
            Value::String(alloy::hex::encode_prefixed(signature.as_bytes())),
        );

        let tx_hash: TxHash = self
            .call(
                "particle_aa_sendUserOp",
                json!([account, Value::Object(bundle.user_op)]),
            )
            .await?;

        tracing::info!(
            user_op_hash = %bundle.user_op_hash,
            tx_hash = %tx_hash,
            mode = ?mode,
            "User operation submitted"
        );
        Ok(tx_hash)
    }
}

fn build_endpoint(
    base_url: &str,
    network: &NetworkConfig,
    credentials: &ParticleCredentials,
) -> Result<url::Url, SmartAccountError> {
    let mut endpoint = url::Url::parse(base_url)
        .map_err(|e| SmartAccountError::Request(format!("invalid AA RPC URL: {e}")))?;
    endpoint
        .query_pairs_mut()
        .append_pair("chainId", &network.chain_id.to_string())
        .append_pair("projectUuid", &credentials.project_id)
        .append_pair("projectKey", &credentials.client_key);
    Ok(endpoint)
}

fn unwrap_rpc<T>(method: &str, body: RpcResponse<T>) -> Result<T, SmartAccountError> {
    if let Some(err) = body.error {
        return Err(SmartAccountError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    body.result
        .ok_or_else(|| SmartAccountError::InvalidResponse(format!("{method}: missing result")))
}

/// Minimal `{to, value, data}` shape accepted by the fee-quote endpoint.
fn transaction_json(request: &TransactionRequest) -> Result<Value, SmartAccountError> {
    let to = request
        .to
        .and_then(|kind| kind.to().copied())
        .ok_or_else(|| SmartAccountError::Request("transaction has no recipient".to_string()))?;
    let value = request.value.unwrap_or_default();
    let data = request.input.input().cloned().unwrap_or_default();

    Ok(json!({
        "to": to,
        "value": format!("{value:#x}"),
        "data": data,
    }))
}

fn select_quote(quotes: FeeQuotes, mode: SendMode) -> Result<UserOpBundle, SmartAccountError> {
    match mode {
        SendMode::Gasless => quotes.verifying_paymaster_gasless,
        SendMode::Native => quotes.verifying_paymaster_native,
    }
    .ok_or(SmartAccountError::QuoteUnavailable(mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{encode_transfer, BLAST_SEPOLIA, BURN_ADDRESS, USDB_TOKEN};
    use crate::testing::{rpc_requests, rpc_result};
    use alloy::primitives::{Signature, U256};
    use alloy::signers::local::PrivateKeySigner;
    use std::sync::Arc;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ParticleAaClient {
        ParticleAaClient::new(&server.uri(), &BLAST_SEPOLIA, &credentials()).unwrap()
    }

    async fn mock_rpc(server: &MockServer, rpc_method: &str, result: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(rpc_result(result))
            .mount(server)
            .await;
    }

    fn credentials() -> ParticleCredentials {
        ParticleCredentials {
            project_id: "project-1".to_string(),
            client_key: "client-key".to_string(),
            app_id: "app-1".to_string(),
        }
    }

    #[test]
    fn endpoint_carries_chain_and_project() {
        let endpoint = build_endpoint(DEFAULT_AA_RPC_URL, &BLAST_SEPOLIA, &credentials()).unwrap();
        assert_eq!(
            endpoint.as_str(),
            "https://rpc.particle.network/evm-chain?chainId=168587773&projectUuid=project-1&projectKey=client-key"
        );
    }

    #[test]
    fn account_config_uses_biconomy_v2() {
        let client = ParticleAaClient::new(DEFAULT_AA_RPC_URL, &BLAST_SEPOLIA, &credentials()).unwrap();
        let config = client.account_config(BURN_ADDRESS);
        assert_eq!(config["name"], "BICONOMY");
        assert_eq!(config["version"], "2.0.0");
        assert!(config["ownerAddress"]
            .as_str()
            .unwrap()
            .eq_ignore_ascii_case("0x000000000000000000000000000000000000dead"));
    }

    #[test]
    fn native_transfer_serializes_value_as_hex() {
        let request = TransactionRequest::default()
            .to(BURN_ADDRESS)
            .value(U256::from(1_000_000_000_000_000u64));
        let tx = transaction_json(&request).unwrap();
        assert_eq!(tx["value"], "0x38d7ea4c68000");
        assert_eq!(tx["data"], "0x");
    }

    #[test]
    fn token_transfer_serializes_calldata() {
        let request = TransactionRequest::default()
            .to(USDB_TOKEN.address)
            .input(encode_transfer(BURN_ADDRESS, U256::from(1u64)).into());
        let tx = transaction_json(&request).unwrap();
        assert_eq!(tx["value"], "0x0");
        assert!(tx["data"].as_str().unwrap().starts_with("0xa9059cbb"));
    }

    #[test]
    fn transaction_without_recipient_is_rejected() {
        let result = transaction_json(&TransactionRequest::default());
        assert!(matches!(result, Err(SmartAccountError::Request(_))));
    }

    #[test]
    fn quote_selection_follows_send_mode() {
        let raw = json!({
            "verifyingPaymasterGasless": {
                "userOp": { "sender": "0x0000000000000000000000000000000000000001" },
                "userOpHash": format!("0x{}", "11".repeat(32)),
            }
        });
        let quotes: FeeQuotes = serde_json::from_value(raw).unwrap();
        let gasless = select_quote(quotes, SendMode::Gasless).unwrap();
        assert_eq!(gasless.user_op_hash, B256::repeat_byte(0x11));

        let missing = select_quote(FeeQuotes::default(), SendMode::Native);
        assert!(matches!(
            missing,
            Err(SmartAccountError::QuoteUnavailable(SendMode::Native))
        ));
    }

    #[tokio::test]
    async fn get_address_returns_first_smart_account() {
        let server = MockServer::start().await;
        let account = Address::repeat_byte(0x5a);
        mock_rpc(
            &server,
            "particle_aa_getSmartAccount",
            json!([{ "smartAccountAddress": account, "chainId": 168587773 }]),
        )
        .await;

        let owner = Address::repeat_byte(0x42);
        let resolved = client_for(&server).get_address(owner).await.unwrap();
        assert_eq!(resolved, account);

        let requests = rpc_requests(&server, "particle_aa_getSmartAccount").await;
        assert_eq!(requests.len(), 1);
        let config = &requests[0]["params"][0];
        assert_eq!(config["name"], "BICONOMY");
        assert_eq!(config["version"], "2.0.0");
        assert!(config["ownerAddress"]
            .as_str()
            .unwrap()
            .eq_ignore_ascii_case(&owner.to_string()));
    }

    #[tokio::test]
    async fn get_address_rejects_empty_account_list() {
        let server = MockServer::start().await;
        mock_rpc(&server, "particle_aa_getSmartAccount", json!([])).await;

        let err = client_for(&server)
            .get_address(Address::repeat_byte(0x42))
            .await
            .unwrap_err();
        assert!(matches!(err, SmartAccountError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn http_error_status_is_a_request_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_address(Address::repeat_byte(0x42))
            .await
            .unwrap_err();
        let SmartAccountError::Request(message) = &err else {
            panic!("expected request error, got {err:?}");
        };
        assert!(message.contains("503"));
        assert!(message.contains("maintenance"));
    }

    #[tokio::test]
    async fn send_transaction_signs_gasless_quote_and_submits() {
        let server = MockServer::start().await;
        let user_op_hash = B256::repeat_byte(0x11);
        let tx_hash = TxHash::repeat_byte(0x22);
        mock_rpc(
            &server,
            "particle_aa_getFeeQuotes",
            json!({
                "verifyingPaymasterGasless": {
                    "userOp": { "sender": "0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a", "nonce": "0x0" },
                    "userOpHash": user_op_hash,
                },
                "verifyingPaymasterNative": {
                    "userOp": { "sender": "0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a", "nonce": "0x1" },
                    "userOpHash": B256::repeat_byte(0x33),
                }
            }),
        )
        .await;
        mock_rpc(&server, "particle_aa_sendUserOp", json!(tx_hash)).await;

        let signer = PrivateKeySigner::from_bytes(&B256::repeat_byte(0x42)).unwrap();
        let owner_address = signer.address();
        let owner: OwnerSigner = Arc::new(signer);
        let request = TransactionRequest::default()
            .to(BURN_ADDRESS)
            .value(U256::from(1_000_000_000_000_000u64));

        let submitted = client_for(&server)
            .send_transaction(&owner, request, SendMode::Gasless)
            .await
            .unwrap();
        assert_eq!(submitted, tx_hash);

        let quotes = rpc_requests(&server, "particle_aa_getFeeQuotes").await;
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0]["params"][1][0]["value"], "0x38d7ea4c68000");

        let sends = rpc_requests(&server, "particle_aa_sendUserOp").await;
        assert_eq!(sends.len(), 1);
        let user_op = &sends[0]["params"][1];
        // The gasless quote was chosen and left intact apart from the signature.
        assert_eq!(user_op["nonce"], "0x0");

        let signature_hex = user_op["signature"].as_str().unwrap();
        let bytes = alloy::hex::decode(signature_hex).unwrap();
        let signature = Signature::try_from(bytes.as_slice()).unwrap();
        let recovered = signature
            .recover_address_from_msg(user_op_hash.as_slice())
            .unwrap();
        assert_eq!(recovered, owner_address);
    }

    #[tokio::test]
    async fn send_transaction_without_quote_does_not_submit() {
        let server = MockServer::start().await;
        mock_rpc(&server, "particle_aa_getFeeQuotes", json!({})).await;

        let owner: OwnerSigner =
            Arc::new(PrivateKeySigner::from_bytes(&B256::repeat_byte(0x42)).unwrap());
        let request = TransactionRequest::default().to(BURN_ADDRESS);
        let err = client_for(&server)
            .send_transaction(&owner, request, SendMode::Native)
            .await
            .unwrap_err();

        assert!(matches!(err, SmartAccountError::QuoteUnavailable(SendMode::Native)));
        assert!(rpc_requests(&server, "particle_aa_sendUserOp").await.is_empty());
    }

    #[test]
    fn rpc_error_is_surfaced() {
        let body: RpcResponse<Value> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "invalid params" }
        }))
        .unwrap();
        let err = unwrap_rpc("particle_aa_getSmartAccount", body).unwrap_err();
        assert!(matches!(err, SmartAccountError::Rpc { code: -32602, .. }));
    }
}
