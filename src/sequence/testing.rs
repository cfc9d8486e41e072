// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory PDU for sequence tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, ProtocolError, Result};
use crate::protocol::Protocol;
use crate::types::OutletNumber;

#[derive(Debug, Clone, Copy)]
enum StateReply {
    Powered(bool),
    Unreachable,
    Cancelled,
}

/// Answers state reads with a fixed reply and records every write.
#[derive(Debug)]
pub(crate) struct FakePdu {
    reply: StateReply,
    fail_writes: bool,
    reads: AtomicUsize,
    cycles: AtomicUsize,
    set_calls: Mutex<Vec<(u32, bool)>>,
}

impl FakePdu {
    fn with_reply(reply: StateReply) -> Self {
        Self {
            reply,
            fail_writes: false,
            reads: AtomicUsize::new(0),
            cycles: AtomicUsize::new(0),
            set_calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn powered(on: bool) -> Self {
        Self::with_reply(StateReply::Powered(on))
    }

    pub(crate) fn unreachable() -> Self {
        Self::with_reply(StateReply::Unreachable)
    }

    pub(crate) fn cancelled() -> Self {
        Self::with_reply(StateReply::Cancelled)
    }

    pub(crate) fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(crate) fn cycles(&self) -> usize {
        self.cycles.load(Ordering::SeqCst)
    }

    pub(crate) fn set_calls(&self) -> Vec<(u32, bool)> {
        self.set_calls.lock().clone()
    }

    pub(crate) fn writes(&self) -> usize {
        self.cycles() + self.set_calls.lock().len()
    }

    fn write_result(&self) -> Result<()> {
        if self.fail_writes {
            Err(ProtocolError::UnexpectedStatus {
                status: 500,
                expected: 204,
                body: String::new(),
            }
            .into())
        } else {
            Ok(())
        }
    }
}

impl Protocol for FakePdu {
    async fn outlet_names(&self, _cancel: &CancellationToken) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn outlet_state(&self, _outlet: OutletNumber, _cancel: &CancellationToken) -> Result<bool> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            StateReply::Powered(on) => Ok(on),
            StateReply::Unreachable => {
                Err(ProtocolError::InvalidAddress("unreachable".to_string()).into())
            }
            StateReply::Cancelled => Err(Error::Cancelled),
        }
    }

    async fn set_outlet_state(
        &self,
        outlet: OutletNumber,
        on: bool,
        _cancel: &CancellationToken,
    ) -> Result<()> {
        self.set_calls.lock().push((outlet.value(), on));
        self.write_result()
    }

    async fn cycle_outlet(&self, _outlet: OutletNumber, _cancel: &CancellationToken) -> Result<()> {
        self.cycles.fetch_add(1, Ordering::SeqCst);
        self.write_result()
    }
}
