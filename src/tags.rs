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

//! Request-scoped tags carried by a [`Context`].
//!
//! A tag store is created the first time a tag is added to a context that has none. Contexts
//! derived afterwards share the same store, which is mutated in place under its mutex. Two
//! threads adding the same tag name concurrently race: the last write wins, with no ordering
//! guarantee between them.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use value_bag::OwnedValueBag;
use value_bag::ValueBag;

use crate::Context;

/// The value of a tag.
///
/// Primitives and strings keep their type and can be read back through [`TagValue::as_value`].
/// Anything else that implements [`fmt::Display`] is captured as text with
/// [`TagValue::from_display`].
///
/// Two values are equal when they render identically.
#[derive(Clone)]
pub struct TagValue(Arc<OwnedValueBag>);

impl TagValue {
    /// Capture any displayable value as text.
    pub fn from_display(value: impl fmt::Display) -> Self {
        TagValue::from(value.to_string())
    }

    /// Borrow the underlying value, e.g. to read it back with [`ValueBag::to_i64`].
    pub fn as_value(&self) -> ValueBag<'_> {
        self.0.by_ref()
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_value(), f)
    }
}

impl fmt::Debug for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_value(), f)
    }
}

impl PartialEq for TagValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.to_string() == other.to_string()
    }
}

macro_rules! impl_tag_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for TagValue {
                fn from(value: $ty) -> Self {
                    TagValue(Arc::new(ValueBag::from(value).to_owned()))
                }
            }
        )*
    };
}

impl_tag_value_from!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char
);

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue(Arc::new(ValueBag::from(value).to_owned()))
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::from(value.as_str())
    }
}

/// An owned snapshot of the tags in a context.
///
/// Iteration is in ascending order of tag names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tags(BTreeMap<String, TagValue>);

impl Tags {
    /// The number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a single tag.
    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.0.get(name)
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = (&'a String, &'a TagValue);
    type IntoIter = btree_map::Iter<'a, String, TagValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Renders as `[name:value, name:value]`, or `[]` when there are no tags.
impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}:{value}")?;
        }
        f.write_str("]")
    }
}

/// A shared, mutable tag mapping.
///
/// Cloning the store clones the handle: every clone sees and mutates the same mapping.
#[derive(Clone, Default)]
pub struct TagStore {
    tags: Arc<Mutex<BTreeMap<String, TagValue>>>,
}

impl fmt::Debug for TagStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TagStore").field(&self.snapshot()).finish()
    }
}

impl TagStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // every critical section is a single map operation, so a poisoned map is still consistent
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, TagValue>> {
        self.tags.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take a snapshot of all tags.
    pub fn snapshot(&self) -> Tags {
        Tags(self.lock().clone())
    }

    /// Look up a single tag.
    pub fn get(&self, name: &str) -> Option<TagValue> {
        self.lock().get(name).cloned()
    }

    /// Insert or overwrite a tag, returning the mapping after the write.
    pub fn insert(&self, name: impl Into<String>, value: impl Into<TagValue>) -> Tags {
        let mut tags = self.lock();
        tags.insert(name.into(), value.into());
        Tags(tags.clone())
    }

    /// Remove a tag, returning the mapping after the removal.
    pub fn remove(&self, name: &str) -> Tags {
        let mut tags = self.lock();
        tags.remove(name);
        Tags(tags.clone())
    }

    /// Whether two handles refer to the same mapping.
    pub fn ptr_eq(&self, other: &TagStore) -> bool {
        Arc::ptr_eq(&self.tags, &other.tags)
    }
}

pub(crate) fn all_tags(ctx: &Context, key: &str) -> Tags {
    ctx.tag_store(key)
        .map(TagStore::snapshot)
        .unwrap_or_default()
}

pub(crate) fn get_tag(ctx: &Context, key: &str, name: &str) -> Option<TagValue> {
    ctx.tag_store(key).and_then(|store| store.get(name))
}

pub(crate) fn add_tag(
    ctx: &Context,
    key: &Cow<'static, str>,
    name: &str,
    value: TagValue,
) -> (Tags, Context) {
    if name.is_empty() {
        return (all_tags(ctx, key), ctx.clone());
    }

    // an existing store is mutated in place, so only a new one needs a context entry
    match ctx.tag_store(key) {
        Some(store) => (store.insert(name, value), ctx.clone()),
        None => {
            let store = TagStore::new();
            let tags = store.insert(name, value);
            (tags, ctx.with_tag_store(key.clone(), store))
        }
    }
}

pub(crate) fn remove_tag(ctx: &Context, key: &Cow<'static, str>, name: &str) -> (Tags, Context) {
    if name.is_empty() {
        return (all_tags(ctx, key), ctx.clone());
    }

    match ctx.tag_store(key) {
        Some(store) => (store.remove(name), ctx.clone()),
        None => (Tags::default(), ctx.clone()),
    }
}
