//! OnTranslate の対応付け
//!
//! GET に Value を返すたびに、その Value と元イベントの情報を状態ストアに記録する。
//! 後から届く OnTranslate は以下を持つ。
//!
//! - `Reference0`: 以前返した Value
//! - `Reference2`: 元イベントの ID
//! - `Reference3`: 元イベントの Reference を `\x01` で連結したもの
//!
//! `Reference2` で記録を引き、`Reference3` と引数が一致すれば対応付け成功とする。

use crate::request::Request;
use crate::store::StateStore;

use super::registry::HandlerResult;

/// OnTranslate のイベント ID
pub const TRANSLATE_ID: &str = "OnTranslate";

/// 引数を連結する区切り文字
pub const ARGUMENT_SEPARATOR: &str = "\u{1}";

/// 過去に返した Value の記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    /// 元イベントの ID
    pub event: String,
    /// 元イベントの Reference を連結した文字列
    pub arguments: String,
    /// 返した Value
    pub value: String,
}

impl Emission {
    /// リクエストと返した Value から記録を作成
    pub fn from_request(event: &str, request: &Request, value: &str) -> Self {
        Self {
            event: event.to_string(),
            arguments: join_arguments(&request.references()),
            value: value.to_string(),
        }
    }

    /// 元イベントの Reference を分解して取得
    pub fn argument_list(&self) -> Vec<&str> {
        if self.arguments.is_empty() {
            Vec::new()
        } else {
            self.arguments.split(ARGUMENT_SEPARATOR).collect()
        }
    }
}

/// 引数を `\x01` で連結
pub fn join_arguments(arguments: &[&str]) -> String {
    arguments.join(ARGUMENT_SEPARATOR)
}

/// OnTranslate を処理するトランスレーター
///
/// 対応付けに成功した場合のみ呼ばれる
pub trait Translator: Send + Sync {
    /// 以前返したテキストを変換する
    ///
    /// `None` を返すと 204 (変換なし) になる
    fn translate(&self, text: &str, origin: &Emission, request: &Request) -> HandlerResult;
}

/// 状態ストア上の記録
///
/// キーは `<prefix>.<event>.value` と `<prefix>.<event>.arguments`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EmissionLog {
    prefix: String,
}

impl EmissionLog {
    pub(crate) fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    fn key(&self, event: &str, field: &str) -> String {
        format!("{}.{}.{}", self.prefix, event, field)
    }

    /// 記録する
    pub(crate) fn record<S: StateStore + ?Sized>(&self, store: &mut S, emission: &Emission) {
        store.write(&self.key(&emission.event, "value"), &emission.value);
        store.write(&self.key(&emission.event, "arguments"), &emission.arguments);
    }

    /// 元イベントの記録を引く
    pub(crate) fn lookup<S: StateStore + ?Sized>(&self, store: &S, event: &str) -> Option<Emission> {
        let value = store.read(&self.key(event, "value"))?;
        let arguments = store.read(&self.key(event, "arguments")).unwrap_or_default();
        Some(Emission {
            event: event.to_string(),
            arguments,
            value,
        })
    }

    /// OnTranslate リクエストを記録と対応付ける
    ///
    /// `Reference3` がない場合はイベント名だけで対応付ける
    pub(crate) fn correlate<S: StateStore + ?Sized>(
        &self,
        store: &S,
        request: &Request,
    ) -> Option<Emission> {
        let event = request.reference(2).filter(|e| !e.is_empty())?;
        let emission = self.lookup(store, event)?;
        match request.reference(3) {
            Some(arguments) if arguments != emission.arguments => None,
            _ => Some(emission),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn translate_request(text: &str, event: &str, arguments: Option<&str>) -> Request {
        let request = Request::get(TRANSLATE_ID)
            .header("Reference0", text)
            .header("Reference1", "")
            .header("Reference2", event);
        match arguments {
            Some(arguments) => request.header("Reference3", arguments),
            None => request,
        }
    }

    #[test]
    fn join_and_split() {
        assert_eq!(join_arguments(&["0", "1", "face"]), "0\u{1}1\u{1}face");
        let emission = Emission {
            event: "OnMouseDoubleClick".to_string(),
            arguments: "0\u{1}1\u{1}face".to_string(),
            value: "\\0hi\\e".to_string(),
        };
        assert_eq!(emission.argument_list(), vec!["0", "1", "face"]);
    }

    #[test]
    fn empty_arguments() {
        assert_eq!(join_arguments(&[]), "");
        let request = Request::get("OnSurfaceRestore");
        let emission = Emission::from_request("OnSurfaceRestore", &request, "\\0\\s[0]\\e");
        assert!(emission.argument_list().is_empty());
    }

    #[test]
    fn correlate_by_event_and_arguments() {
        let log = EmissionLog::new("shiori.emission");
        let mut store = MemoryStore::new();
        let origin = Request::get("OnMouseDoubleClick").with_references(["0", "1"]);
        let emission = Emission::from_request("OnMouseDoubleClick", &origin, "\\0hi\\e");
        log.record(&mut store, &emission);

        let request = translate_request("\\0hi\\e", "OnMouseDoubleClick", Some("0\u{1}1"));
        assert_eq!(log.correlate(&store, &request), Some(emission.clone()));

        let request = translate_request("\\0hi\\e", "OnMouseDoubleClick", None);
        assert_eq!(log.correlate(&store, &request), Some(emission));
    }

    #[test]
    fn argument_mismatch() {
        let log = EmissionLog::new("shiori.emission");
        let mut store = MemoryStore::new();
        let origin = Request::get("OnMouseDoubleClick").with_references(["0", "1"]);
        log.record(
            &mut store,
            &Emission::from_request("OnMouseDoubleClick", &origin, "\\0hi\\e"),
        );

        let request = translate_request("\\0hi\\e", "OnMouseDoubleClick", Some("0\u{1}2"));
        assert_eq!(log.correlate(&store, &request), None);
    }

    #[test]
    fn unknown_event() {
        let log = EmissionLog::new("shiori.emission");
        let store = MemoryStore::new();
        let request = translate_request("text", "OnBoot", None);
        assert_eq!(log.correlate(&store, &request), None);
        let request = translate_request("text", "", None);
        assert_eq!(log.correlate(&store, &request), None);
    }
}
