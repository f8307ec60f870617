//! Context module.

use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::constants::{INBOME_VERSION_STR, TRUST_QUEUE_CAPACITY};
use crate::events::{Event, EventEmitter, EventType, Events};
use crate::tools::time;
use crate::trust::{TrustProvider, TrustQueue, TrustWorker};

/// The context for processing received messages of one account.
///
/// Cheap to clone, every clone refers to the same account.
#[derive(Clone, Debug)]
pub struct Context {
    pub(crate) inner: Arc<InnerContext>,
}

impl Deref for Context {
    type Target = InnerContext;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Actual context, expensive to clone.
#[derive(Debug)]
pub struct InnerContext {
    /// ID for this `Context` in the current process.
    pub(crate) id: u32,

    pub(crate) events: Events,

    /// Values set by [`Context::set_config`], defaults are not stored.
    pub(crate) config: RwLock<BTreeMap<Config, String>>,

    /// Trust updates waiting for the trust provider.
    pub(crate) trust_queue: TrustQueue,

    creation_time: i64,
}

impl Context {
    /// Creates a new context.
    ///
    /// `id` identifies the context in emitted events.
    pub fn new(id: u32) -> Context {
        let inner = InnerContext {
            id,
            events: Events::new(),
            config: RwLock::new(BTreeMap::new()),
            trust_queue: TrustQueue::new(TRUST_QUEUE_CAPACITY),
            creation_time: time(),
        };
        Context {
            inner: Arc::new(inner),
        }
    }

    /// Returns the context id.
    pub fn get_id(&self) -> u32 {
        self.id
    }

    /// Emits a single event.
    pub fn emit_event(&self, event: EventType) {
        self.events.emit(Event {
            id: self.id,
            typ: event,
        });
    }

    /// Returns a receiver for emitted events.
    ///
    /// Multiple emitters can be created, but note that in this case each emitted event will
    /// only be received by one of the emitters, not by all of them.
    pub fn get_event_emitter(&self) -> EventEmitter {
        self.events.get_emitter()
    }

    /// Starts handing queued trust updates to `provider`.
    ///
    /// Must be called from within a tokio runtime. Updates queued before the
    /// worker starts are delivered once it runs.
    pub fn start_trust_worker(&self, provider: Arc<dyn TrustProvider>) -> TrustWorker {
        TrustWorker::start(self.clone(), provider)
    }

    /// Returns some information about the context, mostly for debugging.
    pub fn get_info(&self) -> BTreeMap<&'static str, String> {
        let mut res = BTreeMap::new();
        res.insert("inbome_version", INBOME_VERSION_STR.to_string());
        res.insert("id", self.id.to_string());
        res.insert("creation_time", self.creation_time.to_string());
        res.insert("trust_queue_len", self.trust_queue.len().to_string());
        for (key, value) in self.get_all_configs() {
            res.insert(key.into(), value);
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestContext;

    #[test]
    fn test_get_info() {
        let t = TestContext::new();
        let info = t.get_info();
        assert_eq!(info.get("inbome_version"), Some(&INBOME_VERSION_STR.to_string()));
        assert_eq!(info.get("inbome_enabled"), Some(&"1".to_string()));
        assert_eq!(info.get("openpgp_header_enabled"), Some(&"1".to_string()));
        assert_eq!(info.get("trust_queue_len"), Some(&"0".to_string()));
    }

    #[test]
    fn test_emit_event_carries_id() {
        let ctx = Context::new(42);
        let emitter = ctx.get_event_emitter();
        ctx.emit_event(EventType::Info("hi".to_string()));
        let event = emitter.try_recv().unwrap();
        assert_eq!(event.id, 42);
        assert_eq!(ctx.get_id(), 42);
    }
}
