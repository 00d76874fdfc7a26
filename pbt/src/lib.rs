//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// ヘッダー生成
// ========================================

/// ヘッダー名: 英字で始まり `:` を含まない
pub fn header_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_.-]{0,31}".prop_map(|s| s)
}

/// ヘッダー値: CR/LF を含まない (空文字列も可)
pub fn header_value() -> impl Strategy<Value = String> {
    "[^\r\n]{0,64}".prop_map(|s| s)
}

/// ヘッダー列 (0-10 個)
pub fn headers() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec((header_name(), header_value()), 0..10)
}

// ========================================
// SHIORI 固有の値
// ========================================

/// イベント ID: `On` で始まる英数字
pub fn event_id() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("version".to_string()),
        Just("name".to_string()),
        "On[A-Z][A-Za-z0-9]{0,24}".prop_map(|s| s),
    ]
}

/// Reference 値の列 (0-8 個)
///
/// OnTranslate の区切り文字 `\x01` は含めない
pub fn references() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[^\r\n\u{1}]{0,16}", 0..8)
}

/// `<major>.<minor>` 形式のバージョン
pub fn version() -> impl Strategy<Value = String> {
    (0u32..100, 0u32..100).prop_map(|(major, minor)| format!("{}.{}", major, minor))
}

/// さくらスクリプト風の Value (空でない)
pub fn script_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\\\0\\\\s\\[[0-9]{1,2}\\][^\r\n\\\\]{1,32}\\\\e".prop_map(|s| s),
        "[^\r\n]{1,64}".prop_map(|s| s),
    ]
}
