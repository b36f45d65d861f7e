// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scripted in-memory gateway used by unit tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::ProtocolError;
use crate::protocol::{GatewayApi, LoginResponse, OutputStatusRecord};
use crate::session::BearerToken;
use crate::types::{DimmerLevel, OutputId, PowerState};

/// A `set_output` call as seen by the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SetOutputCall {
    pub id: OutputId,
    pub state: PowerState,
    pub timer: Option<u32>,
    pub dimmer: Option<DimmerLevel>,
}

/// Gateway double answering from scripted queues.
///
/// When a queue is empty the mock falls back to a default answer: logins
/// succeed with `token-<n>`, status calls return the configured outputs and
/// commands succeed.
#[derive(Default)]
pub(crate) struct MockGateway {
    token: BearerToken,
    logins: Mutex<VecDeque<Result<LoginResponse, ProtocolError>>>,
    statuses: Mutex<VecDeque<Result<Vec<OutputStatusRecord>, ProtocolError>>>,
    commands: Mutex<VecDeque<Result<(), ProtocolError>>>,
    outputs: Mutex<Vec<OutputStatusRecord>>,
    status_gate: Mutex<Option<Arc<Notify>>>,
    login_calls: AtomicUsize,
    status_calls: AtomicUsize,
    status_tokens: Mutex<Vec<Option<String>>>,
    set_output_calls: Mutex<Vec<SetOutputCall>>,
    group_actions: Mutex<Vec<u32>>,
}

impl MockGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_login(&self, response: Result<LoginResponse, ProtocolError>) {
        self.logins.lock().push_back(response);
    }

    pub(crate) fn push_status(&self, response: Result<Vec<OutputStatusRecord>, ProtocolError>) {
        self.statuses.lock().push_back(response);
    }

    pub(crate) fn push_command(&self, response: Result<(), ProtocolError>) {
        self.commands.lock().push_back(response);
    }

    pub(crate) fn set_outputs(&self, outputs: Vec<OutputStatusRecord>) {
        *self.outputs.lock() = outputs;
    }

    /// Makes every status call wait for a notification before answering.
    pub(crate) fn gate_status(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.status_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn status_tokens(&self) -> Vec<Option<String>> {
        self.status_tokens.lock().clone()
    }

    pub(crate) fn set_output_calls(&self) -> Vec<SetOutputCall> {
        self.set_output_calls.lock().clone()
    }

    pub(crate) fn group_actions(&self) -> Vec<u32> {
        self.group_actions.lock().clone()
    }
}

impl GatewayApi for MockGateway {
    fn bearer_token(&self) -> &BearerToken {
        &self.token
    }

    async fn login(
        &self,
        _username: &str,
        _password: &str,
        _extend_session: bool,
        _lease_secs: u32,
    ) -> Result<LoginResponse, ProtocolError> {
        let n = self.login_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let scripted = self.logins.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(LoginResponse::accepted(format!("token-{n}"))))
    }

    async fn get_output_status(&self) -> Result<Vec<OutputStatusRecord>, ProtocolError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.status_tokens
            .lock()
            .push(self.token.get().map(|t| t.to_string()));

        let gate = self.status_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let scripted = self.statuses.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(self.outputs.lock().clone()))
    }

    async fn set_output(
        &self,
        id: OutputId,
        state: PowerState,
        timer: Option<u32>,
        dimmer: Option<DimmerLevel>,
    ) -> Result<(), ProtocolError> {
        self.set_output_calls.lock().push(SetOutputCall {
            id,
            state,
            timer,
            dimmer,
        });
        let scripted = self.commands.lock().pop_front();
        scripted.unwrap_or(Ok(()))
    }

    async fn do_group_action(&self, id: u32) -> Result<(), ProtocolError> {
        self.group_actions.lock().push(id);
        let scripted = self.commands.lock().pop_front();
        scripted.unwrap_or(Ok(()))
    }
}

pub(crate) fn unauthorized() -> ProtocolError {
    ProtocolError::Api {
        code: 401,
        message: "Unauthorized".to_string(),
    }
}

pub(crate) fn record(id: u32, status: u8, dimmer: u8) -> OutputStatusRecord {
    OutputStatusRecord {
        id: OutputId::new(id),
        status,
        dimmer,
        ctimer: 0,
    }
}
