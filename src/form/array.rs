use std::fmt;

/// Identity of a field-array entry, independent of its position.
///
/// Keys are handed out in increasing order and never reused by the
/// controller that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey(u64);

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    pub key: EntryKey,
    pub value: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldArrayError {
    #[error("no entry with key {0}")]
    UnknownKey(EntryKey),
    #[error("list must keep at least {min} entry")]
    Underflow { min: usize },
}

/// Ordered, user-growable list of structurally identical entries.
#[derive(Debug, Clone)]
pub struct FieldArrayController<T> {
    entries: Vec<Entry<T>>,
    zero: T,
    min_len: usize,
    next_key: u64,
}

impl<T: Clone> FieldArrayController<T> {
    /// Creates a controller; a required list starts with one zero-value entry.
    pub fn new(zero: T, required: bool) -> Self {
        Self::with_entries(zero, required, Vec::new())
    }

    pub fn with_entries(zero: T, required: bool, initial: impl IntoIterator<Item = T>) -> Self {
        let mut controller = Self {
            entries: Vec::new(),
            zero,
            min_len: usize::from(required),
            next_key: 0,
        };
        for value in initial {
            controller.append(value);
        }
        while controller.entries.len() < controller.min_len {
            controller.append_zero();
        }
        controller
    }

    pub fn append_zero(&mut self) -> EntryKey {
        self.append(self.zero.clone())
    }

    pub fn zero_value(&self) -> &T {
        &self.zero
    }
}

impl<T> FieldArrayController<T> {
    pub fn append(&mut self, value: T) -> EntryKey {
        let key = EntryKey(self.next_key);
        self.next_key += 1;
        self.entries.push(Entry { key, value });
        key
    }

    pub fn can_remove(&self, key: EntryKey) -> bool {
        self.position(key).is_some() && self.entries.len() > self.min_len
    }

    /// Removes the entry, leaving the list untouched when the key is stale or
    /// the list would drop below its minimum length.
    pub fn remove_at(&mut self, key: EntryKey) -> Result<T, FieldArrayError> {
        let idx = self
            .position(key)
            .ok_or(FieldArrayError::UnknownKey(key))?;
        if self.entries.len() <= self.min_len {
            return Err(FieldArrayError::Underflow { min: self.min_len });
        }
        Ok(self.entries.remove(idx).value)
    }

    pub fn update_at(
        &mut self,
        key: EntryKey,
        update: impl FnOnce(&mut T),
    ) -> Result<(), FieldArrayError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.key == key)
            .ok_or(FieldArrayError::UnknownKey(key))?;
        update(&mut entry.value);
        Ok(())
    }

    /// Moves an entry by `delta` positions. Returns `false` when it would leave
    /// the list bounds.
    pub fn move_entry(&mut self, key: EntryKey, delta: i32) -> Result<bool, FieldArrayError> {
        let idx = self
            .position(key)
            .ok_or(FieldArrayError::UnknownKey(key))?;
        let next = idx as i64 + i64::from(delta);
        if next < 0 || next >= self.entries.len() as i64 || next as usize == idx {
            return Ok(false);
        }
        let entry = self.entries.remove(idx);
        self.entries.insert(next as usize, entry);
        Ok(true)
    }

    pub fn get(&self, key: EntryKey) -> Option<&T> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    pub fn list(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.value)
    }

    pub fn position(&self, key: EntryKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    pub fn key_at(&self, index: usize) -> Option<EntryKey> {
        self.entries.get(index).map(|entry| entry.key)
    }

    pub fn is_required(&self) -> bool {
        self.min_len > 0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
