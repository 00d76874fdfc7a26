//! Dispatcher のプロパティテスト (dispatch/)

use pbt::{event_id, headers, references, script_value};
use proptest::prelude::*;
use shiori::{
    Dispatcher, DispatcherConfig, Emission, HandlerRegistry, HandlerResult, MemoryStore, Request,
    ShioriHead, Status, Translator, join_arguments,
};

struct Tag;

impl Translator for Tag {
    fn translate(&self, text: &str, origin: &Emission, _request: &Request) -> HandlerResult {
        Ok(Some(format!("{}|{}", origin.event, text)))
    }
}

fn ghost(value: String) -> Dispatcher {
    let registry = HandlerRegistry::new().with("OnTalk", move |_| Ok(Some(value.clone())));
    Dispatcher::new(DispatcherConfig::new("pasta"), registry, MemoryStore::new())
        .with_translator(Tag)
}

// ========================================
// どんな入力でも 4 種類のステータスのいずれか
// ========================================

proptest! {
    #[test]
    fn prop_any_head_gets_a_response(
        line in "[^\r\n]{0,32}",
        hdrs in headers()
    ) {
        let mut raw = format!("{}\r\n", line);
        for (name, value) in &hdrs {
            raw.push_str(&format!("{}: {}\r\n", name, value));
        }
        raw.push_str("\r\n");

        let mut d = ghost("\\0hi\\e".to_string());
        let response = d.respond_str(&raw).unwrap();
        let response = shiori::Response::parse(&response).unwrap();

        prop_assert!(matches!(
            response.status,
            Status::Ok | Status::NoContent | Status::BadRequest | Status::InternalServerError
        ));
        prop_assert_eq!(response.sender(), Some("pasta"));
        prop_assert_eq!(response.charset(), Some("UTF-8"));
        prop_assert_eq!(response.value.is_some(), response.status == Status::Ok);
    }
}

proptest! {
    #[test]
    fn prop_unknown_id_is_no_content(id in event_id(), refs in references()) {
        prop_assume!(id != "OnTalk" && id != "OnTranslate");

        let mut d = ghost("\\0hi\\e".to_string());
        let response = d.dispatch(&Request::notify(&id).with_references(&refs));
        prop_assert_eq!(response.status, Status::NoContent);
        prop_assert_eq!(response.value, None);
    }
}

// ========================================
// OnTranslate の対応付け
// ========================================

proptest! {
    #[test]
    fn prop_translate_matches_previous_value(
        value in script_value(),
        refs in references()
    ) {
        let mut d = ghost(value.clone());
        let origin = d.dispatch(&Request::get("OnTalk").with_references(&refs));
        prop_assert_eq!(origin.get_value(), Some(value.as_str()));
        d.mark_sent();

        let arguments: Vec<&str> = refs.iter().map(String::as_str).collect();
        let request = Request::get("OnTranslate")
            .header("Reference0", &value)
            .header("Reference1", "")
            .header("Reference2", "OnTalk")
            .header("Reference3", &join_arguments(&arguments));
        let expected = format!("OnTalk|{}", value);
        let response = d.dispatch(&request);
        prop_assert_eq!(response.get_value(), Some(expected.as_str()));
    }
}

proptest! {
    #[test]
    fn prop_translate_argument_mismatch(
        value in script_value(),
        refs in references(),
        extra in "[a-z]{1,8}"
    ) {
        let mut d = ghost(value.clone());
        d.dispatch(&Request::get("OnTalk").with_references(&refs));

        let mut arguments: Vec<&str> = refs.iter().map(String::as_str).collect();
        arguments.push(&extra);
        let request = Request::get("OnTranslate")
            .header("Reference0", &value)
            .header("Reference2", "OnTalk")
            .header("Reference3", &join_arguments(&arguments));
        prop_assert_eq!(d.dispatch(&request).status, Status::NoContent);
    }
}
