// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory capabilities for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{address, Address, TxHash, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::{watch, Notify};
use wiremock::{Request, Respond, ResponseTemplate};

use crate::account::{OwnerSigner, SendMode, SmartAccountAdapter, SmartAccountError};
use crate::auth::{AuthCapability, AuthError, ConnectedUser, IdentityMethod, UserIdentity};
use crate::blockchain::{NetworkConfig, ProviderClient, ProviderError, TxReceipt, BLAST_SEPOLIA};
use crate::notification::Notifications;
use crate::session::{BalanceRefresher, SessionManager, TransactionExecutor};
use crate::state::AppState;

pub const SMART_ACCOUNT: Address = address!("5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a");

/// Wait until the channel value satisfies `f`, failing the test after 5s.
pub async fn wait_for<T: Clone>(rx: &mut watch::Receiver<T>, f: impl FnMut(&T) -> bool) -> T {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(f))
        .await
        .expect("timed out waiting for channel value")
        .expect("channel closed")
        .clone()
}

/// JSON-RPC responder answering with `result`, echoing the request id.
pub fn rpc_result(result: Value) -> impl Respond {
    move |request: &Request| {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": body["id"],
            "result": result,
        }))
    }
}

/// Bodies of the JSON-RPC requests received for `method`, in order.
pub async fn rpc_requests(server: &wiremock::MockServer, method: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
        .filter(|body| body["method"] == method)
        .collect()
}

pub struct FakeAuth {
    signer: PrivateKeySigner,
    rejection: Mutex<Option<String>>,
    last_method: Mutex<Option<IdentityMethod>>,
    last_chain_id: Mutex<Option<u64>>,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self {
            signer: PrivateKeySigner::from_bytes(&B256::repeat_byte(0x42)).unwrap(),
            rejection: Mutex::new(None),
            last_method: Mutex::new(None),
            last_chain_id: Mutex::new(None),
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
        }
    }

    pub fn rejecting(reason: &str) -> Self {
        let auth = Self::new();
        auth.set_rejection(Some(reason));
        auth
    }

    pub fn set_rejection(&self, reason: Option<&str>) {
        *self.rejection.lock().unwrap() = reason.map(str::to_string);
    }

    pub fn connect_calls(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn last_method(&self) -> Option<IdentityMethod> {
        self.last_method.lock().unwrap().clone()
    }

    pub fn last_network_chain_id(&self) -> Option<u64> {
        *self.last_chain_id.lock().unwrap()
    }
}

#[async_trait]
impl AuthCapability for FakeAuth {
    async fn connect(
        &self,
        method: &IdentityMethod,
        network: &NetworkConfig,
    ) -> Result<ConnectedUser, AuthError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        *self.last_method.lock().unwrap() = Some(method.clone());
        *self.last_chain_id.lock().unwrap() = Some(network.chain_id);
        // Let a concurrent caller interleave here.
        tokio::task::yield_now().await;

        if let Some(reason) = self.rejection.lock().unwrap().clone() {
            return Err(AuthError::Rejected(reason));
        }

        let owner: OwnerSigner = Arc::new(self.signer.clone());
        Ok(ConnectedUser {
            identity: UserIdentity {
                uuid: format!("user-{}", self.connect_calls()),
                name: "Alice".to_string(),
                method: method.clone(),
                owner_address: self.signer.address(),
            },
            owner,
        })
    }

    async fn disconnect(&self) -> Result<(), AuthError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakeAccount {
    tx_hash: Mutex<TxHash>,
    address_failure: Mutex<Option<String>>,
    send_failure: Mutex<Option<String>>,
    sent: Mutex<Vec<(TransactionRequest, SendMode)>>,
    address_calls: AtomicUsize,
    send_calls: AtomicUsize,
}

impl FakeAccount {
    pub fn new() -> Self {
        Self {
            tx_hash: Mutex::new(TxHash::repeat_byte(0x01)),
            address_failure: Mutex::new(None),
            send_failure: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            address_calls: AtomicUsize::new(0),
            send_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_tx_hash(&self, hash: TxHash) {
        *self.tx_hash.lock().unwrap() = hash;
    }

    pub fn fail_address(&self, reason: &str) {
        *self.address_failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn fail_send(&self, reason: &str) {
        *self.send_failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn clear_send_failure(&self) {
        *self.send_failure.lock().unwrap() = None;
    }

    pub fn sent(&self) -> Vec<(TransactionRequest, SendMode)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn address_calls(&self) -> usize {
        self.address_calls.load(Ordering::SeqCst)
    }

    pub fn send_calls(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmartAccountAdapter for FakeAccount {
    async fn get_address(&self, _owner: Address) -> Result<Address, SmartAccountError> {
        self.address_calls.fetch_add(1, Ordering::SeqCst);
        match self.address_failure.lock().unwrap().clone() {
            Some(reason) => Err(SmartAccountError::Request(reason)),
            None => Ok(SMART_ACCOUNT),
        }
    }

    async fn send_transaction(
        &self,
        _owner: &OwnerSigner,
        request: TransactionRequest,
        mode: SendMode,
    ) -> Result<TxHash, SmartAccountError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.send_failure.lock().unwrap().clone() {
            return Err(SmartAccountError::Request(reason));
        }
        self.sent.lock().unwrap().push((request, mode));
        Ok(*self.tx_hash.lock().unwrap())
    }
}

pub struct FakeProvider {
    balance: Mutex<Result<U256, String>>,
    balance_gate: Mutex<Option<Arc<Notify>>>,
    receipt_success: Mutex<bool>,
    receipt_failure: Mutex<Option<String>>,
    balance_calls: AtomicUsize,
    receipt_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            balance: Mutex::new(Ok(U256::ZERO)),
            balance_gate: Mutex::new(None),
            receipt_success: Mutex::new(true),
            receipt_failure: Mutex::new(None),
            balance_calls: AtomicUsize::new(0),
            receipt_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_balance(&self, wei: U256) {
        *self.balance.lock().unwrap() = Ok(wei);
    }

    /// Make balance queries wait until the returned gate is notified.
    pub fn hold_balance(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.balance_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn fail_balance(&self, reason: &str) {
        *self.balance.lock().unwrap() = Err(reason.to_string());
    }

    pub fn set_receipt_success(&self, success: bool) {
        *self.receipt_success.lock().unwrap() = success;
    }

    pub fn fail_receipt(&self, reason: &str) {
        *self.receipt_failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn receipt_calls(&self) -> usize {
        self.receipt_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderClient for FakeProvider {
    async fn get_balance(&self, _address: Address) -> Result<U256, ProviderError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.balance_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.balance.lock().unwrap().clone().map_err(ProviderError::Rpc)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ProviderError> {
        self.receipt_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.receipt_failure.lock().unwrap().clone() {
            return Err(ProviderError::Rpc(reason));
        }
        Ok(TxReceipt {
            tx_hash,
            block_number: Some(100),
            success: *self.receipt_success.lock().unwrap(),
        })
    }
}

/// All components wired to fakes.
pub struct Harness {
    pub auth: Arc<FakeAuth>,
    pub account: Arc<FakeAccount>,
    pub provider: Arc<FakeProvider>,
    pub notifications: Notifications,
    pub sessions: Arc<SessionManager>,
    pub refresher: Arc<BalanceRefresher>,
    pub executor: Arc<TransactionExecutor>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_auth(FakeAuth::new())
    }

    pub fn with_auth(auth: FakeAuth) -> Self {
        let auth = Arc::new(auth);
        let account = Arc::new(FakeAccount::new());
        let provider = Arc::new(FakeProvider::new());
        let notifications = Notifications::default();

        let sessions = Arc::new(SessionManager::new(auth.clone(), BLAST_SEPOLIA));
        let refresher = Arc::new(BalanceRefresher::new(
            sessions.clone(),
            account.clone(),
            provider.clone(),
            notifications.clone(),
        ));
        let executor = Arc::new(TransactionExecutor::new(
            sessions.clone(),
            account.clone(),
            provider.clone(),
            notifications.clone(),
        ));

        Self {
            auth,
            account,
            provider,
            notifications,
            sessions,
            refresher,
            executor,
        }
    }

    pub fn state(&self) -> AppState {
        AppState::from_parts(
            self.sessions.clone(),
            self.refresher.clone(),
            self.executor.clone(),
            self.notifications.clone(),
        )
    }
}
