//! Utilities to help writing tests.
//!
//! This module is only compiled for test runs.

use std::ops::Deref;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::{bail, Result};
use parking_lot::Mutex;
use tokio::time::{sleep, timeout, Instant};

use crate::context::Context;
use crate::events::{EventEmitter, EventType};
use crate::trust::{TrustProvider, TrustUpdate};

static NEXT_CONTEXT_ID: AtomicU32 = AtomicU32::new(1);

/// A [Context] together with everything it emitted so far.
pub(crate) struct TestContext {
    pub ctx: Context,
    emitter: EventEmitter,
    /// Events received from `emitter`, oldest first.
    events: Mutex<Vec<EventType>>,
}

impl Deref for TestContext {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.ctx
    }
}

impl TestContext {
    pub fn new() -> Self {
        let ctx = Context::new(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed));
        let emitter = ctx.get_event_emitter();
        Self {
            ctx,
            emitter,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Returns all events emitted so far.
    pub fn get_events(&self) -> Vec<EventType> {
        let mut events = self.events.lock();
        while let Some(event) = self.emitter.try_recv() {
            events.push(event.typ);
        }
        events.clone()
    }

    /// Returns the text of all warnings emitted so far.
    pub fn get_warnings(&self) -> Vec<String> {
        self.get_events()
            .into_iter()
            .filter_map(|event| match event {
                EventType::Warning(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    /// Returns the reasons of all inline key rejections emitted so far.
    pub fn get_rejections(&self) -> Vec<String> {
        self.get_events()
            .into_iter()
            .filter_map(|event| match event {
                EventType::InlineKeyRejected { reason, .. } => Some(reason),
                _ => None,
            })
            .collect()
    }

    /// Waits for an event matching `pred`, returns `None` on timeout.
    pub async fn wait_for_event(
        &self,
        wait: Duration,
        pred: impl Fn(&EventType) -> bool,
    ) -> Option<EventType> {
        if let Some(event) = self.get_events().into_iter().find(|event| pred(event)) {
            return Some(event);
        }
        let deadline = Instant::now() + wait;
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let event = timeout(remaining, self.emitter.recv()).await.ok()??;
            self.events.lock().push(event.typ.clone());
            if pred(&event.typ) {
                return Some(event.typ);
            }
        }
    }
}

/// Trust provider remembering every update it is given.
#[derive(Debug, Default)]
pub(crate) struct RecordingTrustProvider {
    updates: Mutex<Vec<TrustUpdate>>,
    fail: bool,
}

impl RecordingTrustProvider {
    /// A provider rejecting every update.
    pub fn failing() -> Self {
        Self {
            updates: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Waits until at least `count` updates arrived or `wait` passed,
    /// returns the updates received.
    pub async fn wait_for_updates(&self, count: usize, wait: Duration) -> Vec<TrustUpdate> {
        let deadline = Instant::now() + wait;
        loop {
            let updates = self.updates.lock().clone();
            if updates.len() >= count || Instant::now() >= deadline {
                return updates;
            }
            sleep(Duration::from_millis(10)).await;
        }
    }
}

impl TrustProvider for RecordingTrustProvider {
    fn update_trust(&self, update: &TrustUpdate) -> Result<()> {
        if self.fail {
            bail!("key store unavailable");
        }
        self.updates.lock().push(update.clone());
        Ok(())
    }
}

/// Base64 encoded public key of alice@example.org.
pub(crate) fn alice_keydata() -> &'static str {
    "xsBNBFzG3j0BCAC6iNhT8zydvCXi8LI/gFnkadMbfmSE/rTJskRRra/utGbLyDta/yTrJgWL7O3y/g4HdDW/dN2z26Y6W13IMzx9gLInn1KQZChtqWAcr/ReUucXcymwcfg1mdkBGk3TSLeLihN6CJx8Wsv8ig+kgAzte4f5rqEEAJVQ9WZHuti7UiYs6oRzqTo06CRe9owVXxzdMf0VDQtf7ZFm9dpzKKbhH7Lu8880iiotQ9/yRCkDGp9fNThsrLdZiK6OIAcIBAqi2rI89aS1dAmnRbktQieCx5izzyYkR1KvVL3gTTllHOzfKVEC2asmtWu2e4se/+O4WMIS1eGrn7GeWVb0Vwc5ABEBAAHNETxhQEBiLmV4YW1wbGUuZGU+wsCJBBABCAAzAhkBBQJcxt5FAhsDBAsJCAcGFQgJCgsCAxYCARYhBI4xxYKBgH3ANh5cufaKrc9mtiMLAAoJEPaKrc9mtiML938H/18F+3Wf9/JaAy/8hCO1v4S2PVBhxaKCokaNFtkfaMRne2l087LscCFPiFNyb4mv6Z3YeK8Xpxlp2sI0ecvdiqLUOGfnxS6tQrj+83EjtIrZ/hXOk1h121QFWH9Zg2VNHtODXjAgdLDC0NWUrclR0ZOqEDQHeo0ibTILdokVfXFN25wakPmGaYJP2y729cb1ve7RzvIvwn+Dddfxo3ao72rBfLi7l4NQ4S0KsY4cw+/6l5bRCKYCP77wZtvCwUvfVVosLdT43agtSiBI49+ayqvZ8OCvSJa61i+v81brTiEy9GBod4eAp45Ibsuemkw+gon4ZOvUXHTjwFB+h63MrozOwE0EXMbePQEIAL/vauf1zK8JgCu3V+G+SOX0iWw5xUlCPX+ERpBbWfwu3uAqn4wYXD3JDE/fVAF668xiV4eTPtlSUd5h0mn+G7uXMMOtkb+20SoEt50f8zw8TrL9t+ZsV11GKZWJpCar5AhXWsn6EEi8I2hLL5vn55ZZmHuGgN4jjmkRl3ToKCLhaXwTBjCJem7N5EH7F75wErEITa55v4Lb4Nfca7vnvtYrI1OA446xa8gHra0SINelTD09/JM/Fw4sWVPBaRZmJK/Tnu79N23No9XBUubmFPv1pNexZsQclicnTpt/BEWhiun7d6lfGB63K1aoHRTR1pcrWvBuALuuz0gqar2zlI0AEQEAAcLAdgQYAQgAIAUCXMbeRQIbDBYhBI4xxYKBgH3ANh5cufaKrc9mtiMLAAoJEPaKrc9mtiMLKSEIAIyLCRO2OyZ0IYRvRPpMn4p7E+7Pfcz/0mSkOy+1hshgJnqivXurm8zwGrwdMqeV4eslKR9H1RUdWGUQJNbtwmmjrt5DHpIhYHl5t3FpCBaGbV20Omo00Q38lBl9MtrmZkZw+ktEk6X+0xCKssMF+2MADkSOIufbR5HrDVB89VZOHCO9DeXvCUUAw2hyJiL/LHmLzJ40zYoTmb+F//f0k0j+tRdbkefyRoCmwG7YGiT+2hnCdgcezswnzah5J3ZKlrg7jOGo1LxtbvNUzxNBbC6S/aNgwm6qxo7xegRhmEl5uZ16zwyj4qz+xkjGy25Of5mWfUDoNw7OT7sjUbHOOMc="
}
