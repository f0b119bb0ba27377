//! Controlled/uncontrolled value ownership.
//!
//! A component either mirrors a value owned by its host (`External`) or
//! keeps its own state (`Internal`). The tag is chosen once at construction;
//! `current()` is the single read path so the two are never mixed.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource<T> {
    External(T),
    Internal(T),
}

impl<T: Clone + PartialEq> ValueSource<T> {
    pub fn controlled(value: T) -> Self {
        ValueSource::External(value)
    }

    pub fn uncontrolled(default: T) -> Self {
        ValueSource::Internal(default)
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, ValueSource::External(_))
    }

    pub fn current(&self) -> &T {
        match self {
            ValueSource::External(value) | ValueSource::Internal(value) => value,
        }
    }

    /// Apply a user-initiated change.
    ///
    /// Internal state adopts `next` immediately. An external value is left
    /// as-is until the host calls `sync`. Returns `Some(next)` when it
    /// differs from the current value, which is the change to report.
    pub fn commit(&mut self, next: T) -> Option<T> {
        if *self.current() == next {
            return None;
        }
        if let ValueSource::Internal(value) = self {
            *value = next.clone();
        }
        Some(next)
    }

    /// Push the host's value. Ignored for uncontrolled sources.
    pub fn sync(&mut self, value: T) {
        if let ValueSource::External(current) = self {
            *current = value;
        }
    }

    /// Overwrite the value regardless of ownership.
    pub fn reset(&mut self, value: T) {
        match self {
            ValueSource::External(current) | ValueSource::Internal(current) => *current = value,
        }
    }
}

impl<T: Default + Clone + PartialEq> Default for ValueSource<T> {
    fn default() -> Self {
        ValueSource::Internal(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_commit_updates_state() {
        let mut v = ValueSource::uncontrolled(None::<String>);
        assert_eq!(v.commit(Some("a".into())), Some(Some("a".into())));
        assert_eq!(v.current(), &Some("a".to_string()));
        assert_eq!(v.commit(Some("a".into())), None);
        v.sync(None);
        assert_eq!(v.current(), &Some("a".to_string()));
    }

    #[test]
    fn external_commit_waits_for_sync() {
        let mut v = ValueSource::controlled(String::from("x"));
        assert!(v.is_controlled());
        assert_eq!(v.commit("y".into()), Some("y".into()));
        assert_eq!(v.current(), "x");
        v.sync("y".into());
        assert_eq!(v.current(), "y");
    }
}
