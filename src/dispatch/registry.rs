//! ハンドラーレジストリ

use std::collections::HashMap;
use std::fmt;

use crate::error::HandlerError;
use crate::request::Request;

/// ハンドラーの戻り値
///
/// `Some` は Value (200)、`None` は 204 になる
pub type HandlerResult = Result<Option<String>, HandlerError>;

/// イベントハンドラー
pub trait Handler: Send + Sync {
    /// リクエストを処理して Value を返す
    fn handle(&self, request: &Request) -> HandlerResult;
}

/// 関数からハンドラーを作成
impl<F> Handler for F
where
    F: Fn(&Request) -> HandlerResult + Send + Sync,
{
    fn handle(&self, request: &Request) -> HandlerResult {
        (self)(request)
    }
}

/// ID からハンドラーを引くレジストリ
pub trait Registry {
    /// ID に対応するハンドラーを取得
    fn resolve(&self, id: &str) -> Option<&dyn Handler>;
}

/// ID をキーにした標準のレジストリ
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// 空のレジストリを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 関数をハンドラーとして登録 (ビルダーパターン)
    pub fn with<F>(mut self, id: &str, handler: F) -> Self
    where
        F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(id, handler);
        self
    }

    /// 関数をハンドラーとして登録
    ///
    /// 同じ ID が登録済みの場合は置き換える
    pub fn register<F>(&mut self, id: &str, handler: F)
    where
        F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register_handler(id, handler);
    }

    /// `Handler` 実装を登録
    pub fn register_handler<H: Handler + 'static>(&mut self, id: &str, handler: H) {
        self.handlers.insert(id.to_string(), Box::new(handler));
    }

    /// 登録済みか確認
    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// 登録数
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// 空か確認
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// 登録済みの ID 一覧 (ソート済み)
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Registry for HandlerRegistry {
    fn resolve(&self, id: &str) -> Option<&dyn Handler> {
        self.handlers.get(id).map(|h| h.as_ref())
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_resolve() {
        let registry = HandlerRegistry::new()
            .with("version", |_| Ok(Some("1.0".to_string())))
            .with("OnBoot", |_| Ok(None));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids(), vec!["OnBoot", "version"]);

        let handler = registry.resolve("version").unwrap();
        let result = handler.handle(&Request::get("version")).unwrap();
        assert_eq!(result.as_deref(), Some("1.0"));

        assert!(registry.resolve("OnClose").is_none());
    }

    #[test]
    fn ids_are_case_sensitive() {
        let registry = HandlerRegistry::new().with("version", |_| Ok(None));
        assert!(registry.contains("version"));
        assert!(!registry.contains("Version"));
    }

    struct Fixed(&'static str);

    impl Handler for Fixed {
        fn handle(&self, _request: &Request) -> HandlerResult {
            Ok(Some(self.0.to_string()))
        }
    }

    #[test]
    fn register_trait_handler() {
        let mut registry = HandlerRegistry::new();
        registry.register_handler("name", Fixed("pasta"));
        let result = registry
            .resolve("name")
            .unwrap()
            .handle(&Request::get("name"))
            .unwrap();
        assert_eq!(result.as_deref(), Some("pasta"));
    }

    #[test]
    fn register_replaces() {
        let mut registry = HandlerRegistry::new();
        registry.register("name", |_| Ok(Some("a".to_string())));
        registry.register("name", |_| Ok(Some("b".to_string())));
        assert_eq!(registry.len(), 1);
        let result = registry
            .resolve("name")
            .unwrap()
            .handle(&Request::get("name"))
            .unwrap();
        assert_eq!(result.as_deref(), Some("b"));
    }
}
