use std::sync::{PoisonError, RwLock};

/// Where the bearer token lives between navigations.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: String);
    fn clear(&self);
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.filter(|t| !t.trim().is_empty())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: String) {
        let token = Some(token).filter(|t| !t.trim().is_empty());
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear() {
        let store = MemoryTokenStore::default();
        assert_eq!(store.get(), None);
        store.set("t-1".into());
        assert_eq!(store.get().as_deref(), Some("t-1"));
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn blank_tokens_are_absent() {
        assert_eq!(MemoryTokenStore::new(Some("  ".into())).get(), None);
        let store = MemoryTokenStore::new(Some("t".into()));
        store.set(String::new());
        assert_eq!(store.get(), None);
    }
}
