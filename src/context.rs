// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Request-scoped context values.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::Logger;
use crate::tags::TagStore;

/// An immutable request-scoped context.
///
/// A context is a chain of entries. Deriving a context never modifies the original: it returns
/// a new context layered on top of it, and lookups find the most recently derived entry first.
/// Cloning a context is cheap.
///
/// # Examples
///
/// ```
/// use logsplit::Context;
///
/// let ctx = Context::background().with_value("request_id", 42u64);
/// assert_eq!(ctx.value::<u64>("request_id"), Some(&42));
/// assert!(Context::background().value::<u64>("request_id").is_none());
/// ```
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

struct Node {
    parent: Option<Arc<Node>>,
    entry: Entry,
}

enum Entry {
    Tags {
        key: Cow<'static, str>,
        store: TagStore,
    },
    Logger(Logger),
    Value {
        key: Cow<'static, str>,
        value: Arc<dyn Any + Send + Sync>,
    },
}

impl Context {
    /// The empty root context.
    pub fn background() -> Self {
        Self::default()
    }

    fn derive(&self, entry: Entry) -> Context {
        Context {
            head: Some(Arc::new(Node {
                parent: self.head.clone(),
                entry,
            })),
        }
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        let mut next = self.head.as_deref();
        std::iter::from_fn(move || {
            let node = next?;
            next = node.parent.as_deref();
            Some(&node.entry)
        })
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.entries().count()
    }

    /// Derive a context carrying an opaque value under `key`.
    pub fn with_value<T>(&self, key: impl Into<Cow<'static, str>>, value: T) -> Context
    where
        T: Any + Send + Sync,
    {
        self.derive(Entry::Value {
            key: key.into(),
            value: Arc::new(value),
        })
    }

    /// Look up the value most recently stored under `key`.
    ///
    /// Returns `None` if there is no such value, or if it is not a `T`.
    pub fn value<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries().find_map(|entry| match entry {
            Entry::Value { key: k, value } if k == key => Some(value.downcast_ref::<T>()),
            _ => None,
        })?
    }

    /// Derive a context carrying a tag store under `key`.
    pub fn with_tag_store(&self, key: impl Into<Cow<'static, str>>, store: TagStore) -> Context {
        self.derive(Entry::Tags {
            key: key.into(),
            store,
        })
    }

    /// The tag store most recently attached under `key`.
    pub fn tag_store(&self, key: &str) -> Option<&TagStore> {
        self.entries().find_map(|entry| match entry {
            Entry::Tags { key: k, store } if k == key => Some(store),
            _ => None,
        })
    }

    /// Derive a context carrying a reference to `logger`.
    pub fn with_logger(&self, logger: Logger) -> Context {
        self.derive(Entry::Logger(logger))
    }

    /// The logger most recently attached to this context.
    pub fn logger(&self) -> Option<&Logger> {
        self.entries().find_map(|entry| match entry {
            Entry::Logger(logger) => Some(logger),
            _ => None,
        })
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for entry in self.entries() {
            match entry {
                Entry::Tags { key, store } => list.entry(&(key, store)),
                Entry::Logger(_) => list.entry(&"logger"),
                Entry::Value { key, .. } => list.entry(key),
            };
        }
        list.finish()
    }
}
