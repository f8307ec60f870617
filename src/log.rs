//! # Logging.

use crate::context::Context;

#[macro_export]
macro_rules! info {
    ($ctx:expr,  $msg:expr) => {
        info!($ctx, $msg,)
    };
    ($ctx:expr, $msg:expr, $($args:expr),* $(,)?) => {{
        let formatted = format!($msg, $($args),*);
        let full = format!("{file}:{line}: {msg}",
                           file = file!(),
                           line = line!(),
                           msg = &formatted);
        $ctx.emit_event($crate::EventType::Info(full));
    }};
}

#[macro_export]
macro_rules! warn {
    ($ctx:expr, $msg:expr) => {
        warn!($ctx, $msg,)
    };
    ($ctx:expr, $msg:expr, $($args:expr),* $(,)?) => {{
        let formatted = format!($msg, $($args),*);
        let full = format!("{file}:{line}: {msg}",
                           file = file!(),
                           line = line!(),
                           msg = &formatted);
        $ctx.emit_event($crate::EventType::Warning(full));
    }};
}

#[macro_export]
macro_rules! error {
    ($ctx:expr, $msg:expr) => {
        error!($ctx, $msg,)
    };
    ($ctx:expr, $msg:expr, $($args:expr),* $(,)?) => {{
        let formatted = format!($msg, $($args),*);
        $ctx.emit_event($crate::EventType::Error(formatted));
    }};
}

pub(crate) trait LogExt<T> {
    /// Emits a warning if the receiver contained an Err value.
    ///
    /// Returns an [`Option<T>`] with the `Ok(_)` value, if any:
    /// - You won't get any warnings about unused results but can still use the value if you need it
    /// - This prevents the same warning from being printed to the log multiple times
    ///
    /// Thanks to the [track_caller](https://blog.rust-lang.org/2020/08/27/Rust-1.46.0.html#track_caller)
    /// feature, the location of the caller is printed to the log, just like with the warn!() macro.
    #[track_caller]
    fn log_err(self, context: &Context) -> Option<T>;
}

impl<T> LogExt<T> for anyhow::Result<T> {
    #[track_caller]
    fn log_err(self, context: &Context) -> Option<T> {
        match self {
            Err(e) => {
                let location = std::panic::Location::caller();
                // We are using Anyhow's .context() and to show the inner error, too, we need the {:#}:
                let full = format!(
                    "{file}:{line}: {e:#}",
                    file = location.file(),
                    line = location.line(),
                    e = e
                );
                // We can't use the warn!() macro here as the file!() and line!() macros
                // don't work well with #[track_caller]
                context.emit_event(crate::EventType::Warning(full));
                None
            }
            Ok(v) => Some(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestContext;
    use anyhow::format_err;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_log_err() {
        let t = TestContext::new();
        let res: anyhow::Result<()> = Err(format_err!("testerror").context("Some context"));
        assert_eq!(res.log_err(&t), None);

        let warning = t.get_warnings().pop().unwrap();
        assert!(warning.contains("log.rs"));
        assert!(warning.ends_with("Some context: testerror"));

        let res: anyhow::Result<u32> = Ok(5);
        assert_eq!(res.log_err(&t), Some(5));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_macros() {
        let t = TestContext::new();
        info!(t, "hello {}", 1);
        warn!(t, "beware {}", "of dogs");
        error!(t, "failed");

        let events = t.get_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], crate::EventType::Info(s) if s.ends_with("hello 1")));
        assert!(matches!(&events[1], crate::EventType::Warning(s) if s.ends_with("beware of dogs")));
        assert_eq!(events[2], crate::EventType::Error("failed".to_string()));
    }
}
