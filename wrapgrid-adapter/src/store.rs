use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

/// A callback fired when a store's value changes from outside a suppressed
/// scope. Receives the new value.
pub type ValueChangedCallback = Arc<dyn Fn(i64) + Send + Sync>;

/// The backing state of one scrollbar: a bounded value plus page size and
/// upper bound, with a change notification.
///
/// Value changes notify synchronously. A writer that must not hear its own
/// change back (the anchoring layer pushing a value it just computed) holds a
/// [`SuppressGuard`] across the write; the guard releases on every exit path.
#[derive(Clone, Default)]
pub struct ScrollStore {
    value: Cell<i64>,
    upper: Cell<i64>,
    page_size: Cell<i64>,
    on_value_changed: Option<ValueChangedCallback>,
    suppressed: Cell<usize>,
}

impl ScrollStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> i64 {
        self.value.get()
    }

    pub fn upper(&self) -> i64 {
        self.upper.get()
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.get()
    }

    /// Largest value the store accepts: `upper - page_size`, at least 0.
    pub fn max_value(&self) -> i64 {
        (self.upper.get() - self.page_size.get()).max(0)
    }

    pub fn connect_value_changed(&mut self, f: impl Fn(i64) + Send + Sync + 'static) {
        self.on_value_changed = Some(Arc::new(f));
    }

    /// Sets the value, clamped into `[0, max_value]`. Returns whether it
    /// actually changed; a change notifies.
    pub(crate) fn set_value(&self, value: i64) -> bool {
        let value = value.clamp(0, self.max_value());
        if self.value.get() == value {
            return false;
        }
        self.value.set(value);
        self.notify();
        true
    }

    /// Replaces value and bounds in one step. Notifies only when the value
    /// changed.
    pub(crate) fn configure(&self, value: i64, upper: i64, page_size: i64) {
        let upper = upper.max(0);
        let page_size = page_size.clamp(0, upper);
        let value = value.clamp(0, (upper - page_size).max(0));
        let changed = self.value.get() != value;
        self.upper.set(upper);
        self.page_size.set(page_size);
        self.value.set(value);
        if changed {
            self.notify();
        }
    }

    /// Suppresses change notifications until the returned guard drops.
    pub fn suppress(&self) -> SuppressGuard<'_> {
        self.suppressed.set(self.suppressed.get() + 1);
        SuppressGuard {
            depth: &self.suppressed,
        }
    }

    fn notify(&self) {
        if self.suppressed.get() > 0 {
            return;
        }
        if let Some(cb) = &self.on_value_changed {
            cb(self.value.get());
        }
    }
}

impl fmt::Debug for ScrollStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollStore")
            .field("value", &self.value.get())
            .field("upper", &self.upper.get())
            .field("page_size", &self.page_size.get())
            .field("suppressed", &self.suppressed.get())
            .finish_non_exhaustive()
    }
}

/// Scoped token that keeps a [`ScrollStore`]'s notifications suppressed.
pub struct SuppressGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for SuppressGuard<'_> {
    fn drop(&mut self) {
        let depth = self.depth.get();
        debug_assert!(depth > 0, "suppression depth underflow");
        self.depth.set(depth.saturating_sub(1));
    }
}
