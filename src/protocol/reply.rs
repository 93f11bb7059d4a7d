// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::Value;

use crate::ops::Output;

/// Written in place of an empty reply; the transport cannot tell a zero-length reply from none.
pub const NONE_REPLY: &str = "None";

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Reply text for an operation's output, or `None` when nothing is written.
pub fn encode(output: Output) -> Option<String> {
    match output {
        Output::Silent => None,
        Output::Text(text) if text.is_empty() => Some(NONE_REPLY.to_owned()),
        Output::Text(text) => Some(text),
        Output::Value(value) if is_empty_value(&value) => Some(NONE_REPLY.to_owned()),
        Output::Value(value) => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{encode, NONE_REPLY};
    use crate::ops::Output;

    #[test]
    fn silence_and_sentinels() {
        assert_eq!(encode(Output::Silent), None);
        assert_eq!(
            encode(Output::Text(String::new())).as_deref(),
            Some(NONE_REPLY)
        );
        for empty in [json!(null), json!([]), json!({}), json!("")] {
            assert_eq!(encode(Output::Value(empty)).as_deref(), Some(NONE_REPLY));
        }
    }

    #[test]
    fn values_are_json_and_text_is_verbatim() {
        assert_eq!(
            encode(Output::Value(json!(false))).as_deref(),
            Some("false")
        );
        assert_eq!(
            encode(Output::Value(json!("Done"))).as_deref(),
            Some("\"Done\"")
        );
        assert_eq!(
            encode(Output::Value(json!({"a": [1]}))).as_deref(),
            Some(r#"{"a":[1]}"#)
        );
        assert_eq!(
            encode(Output::Text("room.ma".to_owned())).as_deref(),
            Some("room.ma")
        );
    }
}
