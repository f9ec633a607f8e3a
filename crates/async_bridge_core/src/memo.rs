/// Memoization cell: keeps a value until its key changes.
///
/// Keys are compared with `PartialEq`, which plays the role of shallow
/// identity comparison over a dependency list.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    cached: Option<(K, V)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { cached: None }
    }
}

impl<K, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    /// Returns the cached value for `key`, running `compute` only if the key differs.
    pub fn get(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> &V {
        if let Some((cached_key, value)) = self.cached.take() {
            if cached_key == key {
                return &self.cached.insert((cached_key, value)).1;
            }
        }
        let value = compute(&key);
        &self.cached.insert((key, value)).1
    }
}
