//! ゴースト状態ストア
//!
//! ディスパッチャーが OnTranslate の対応付けに使う。
//! 永続化はストアの実装側の責務で、このクレートは `read` / `write` と
//! セッション開始/終了の `load` / `unload` のみを要求する。

use std::collections::HashMap;

use crate::error::Error;

/// ゴースト状態ストア
pub trait StateStore {
    /// 値を読む
    fn read(&self, key: &str) -> Option<String>;

    /// 値を書く
    fn write(&mut self, key: &str, value: &str);

    /// セッション開始時に呼ばれる
    fn load(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// セッション終了時に呼ばれる
    fn unload(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// メモリ上の状態ストア
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// 空のストアを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 保持しているエントリー数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空か確認
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn unload(&mut self) -> Result<(), Error> {
        self.entries.clear();
        Ok(())
    }
}

impl<S: StateStore + ?Sized> StateStore for &mut S {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) {
        (**self).write(key, value)
    }

    fn load(&mut self) -> Result<(), Error> {
        (**self).load()
    }

    fn unload(&mut self) -> Result<(), Error> {
        (**self).unload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write() {
        let mut store = MemoryStore::new();
        assert_eq!(store.read("a"), None);
        store.write("a", "1");
        store.write("a", "2");
        assert_eq!(store.read("a").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unload_clears() {
        let mut store = MemoryStore::new();
        store.load().unwrap();
        store.write("a", "1");
        store.unload().unwrap();
        assert!(store.is_empty());
    }
}
