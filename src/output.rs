//! Deferred values resolved by the provisioning engine after apply.
//!
//! An [`Output`] is handed out as soon as a resource is declared; its value
//! only becomes available once the engine resolves the paired
//! [`OutputResolver`]. Clones share the same cell, so aliasing an output onto
//! another resource is a clone rather than a copy of the value.

use std::fmt;

use thiserror::Error;
use tokio::sync::watch;

/// Reasons a deferred value never produced a usable result.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum OutputError {
    /// The resolver was dropped before a value was supplied, typically
    /// because the engine never completed its apply step.
    #[error("output was abandoned before it resolved")]
    Abandoned,
    /// The engine reported a failure for the underlying attribute.
    #[error("output failed to resolve: {0}")]
    Failed(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Slot<T> {
    Pending,
    Known(T),
    Failed(String),
}

/// Handle to a value that the engine resolves later.
pub struct Output<T> {
    rx: watch::Receiver<Slot<T>>,
}

/// Write side of an [`Output`], held by the engine until apply completes.
#[derive(Debug)]
pub struct OutputResolver<T> {
    tx: watch::Sender<Slot<T>>,
}

impl<T: Clone> Output<T> {
    /// Creates an unresolved output together with its resolver.
    #[must_use]
    pub fn pending() -> (OutputResolver<T>, Self) {
        let (tx, rx) = watch::channel(Slot::Pending);
        (OutputResolver { tx }, Self { rx })
    }

    /// Creates an output that is already resolved to `value`.
    #[must_use]
    pub fn known(value: T) -> Self {
        let (resolver, output) = Self::pending();
        resolver.resolve(value);
        output
    }

    /// Returns the value if it has already resolved, without waiting.
    #[must_use]
    pub fn try_value(&self) -> Option<T> {
        match &*self.rx.borrow() {
            Slot::Known(value) => Some(value.clone()),
            Slot::Pending | Slot::Failed(_) => None,
        }
    }

    /// Reports whether the engine has settled this output either way.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(&*self.rx.borrow(), Slot::Pending)
    }

    /// Waits until the engine resolves the output.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Failed`] when the engine rejects the value and
    /// [`OutputError::Abandoned`] when the resolver is dropped first.
    pub async fn value(&self) -> Result<T, OutputError> {
        let mut rx = self.rx.clone();
        let slot = rx
            .wait_for(|slot| !matches!(slot, Slot::Pending))
            .await
            .map_err(|_| OutputError::Abandoned)?;
        match &*slot {
            Slot::Known(value) => Ok(value.clone()),
            Slot::Failed(message) => Err(OutputError::Failed(message.clone())),
            Slot::Pending => Err(OutputError::Abandoned),
        }
    }
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.rx.borrow() {
            Slot::Pending => f.write_str("Output(<pending>)"),
            Slot::Known(value) => f.debug_tuple("Output").field(value).finish(),
            Slot::Failed(message) => write!(f, "Output(<failed: {message}>)"),
        }
    }
}

impl<T> OutputResolver<T> {
    /// Supplies the resolved value to every handle sharing this output.
    pub fn resolve(self, value: T) {
        self.tx.send_replace(Slot::Known(value));
    }

    /// Marks the output as failed with the engine's message.
    pub fn reject(self, message: impl Into<String>) {
        self.tx.send_replace(Slot::Failed(message.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_output_resolves_immediately() {
        let output = Output::known(String::from("vpc-123"));
        assert!(output.is_settled());
        assert_eq!(output.try_value().as_deref(), Some("vpc-123"));
        assert_eq!(output.value().await, Ok(String::from("vpc-123")));
    }

    #[tokio::test]
    async fn clones_observe_late_resolution() {
        let (resolver, output) = Output::<String>::pending();
        let alias = output.clone();
        assert!(!alias.is_settled());
        assert_eq!(alias.try_value(), None);

        let waiter = tokio::spawn(async move { alias.value().await });
        resolver.resolve(String::from("rtb-1"));

        let resolved = waiter
            .await
            .unwrap_or_else(|err| panic!("waiter task panicked: {err}"));
        assert_eq!(resolved, Ok(String::from("rtb-1")));
        assert_eq!(output.try_value().as_deref(), Some("rtb-1"));
    }

    #[tokio::test]
    async fn dropped_resolver_abandons_output() {
        let (resolver, output) = Output::<String>::pending();
        drop(resolver);
        assert_eq!(output.value().await, Err(OutputError::Abandoned));
        assert!(!output.is_settled());
    }

    #[tokio::test]
    async fn rejected_output_reports_failure() {
        let (resolver, output) = Output::<String>::pending();
        resolver.reject("quota exceeded");
        assert_eq!(
            output.value().await,
            Err(OutputError::Failed(String::from("quota exceeded")))
        );
        assert_eq!(output.try_value(), None);
    }

    #[test]
    fn debug_renders_pending_marker() {
        let (_resolver, output) = Output::<String>::pending();
        assert_eq!(format!("{output:?}"), "Output(<pending>)");
    }
}
