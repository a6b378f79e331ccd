//! JSON patch model
//!
//! Decision functions describe mutations as RFC 6902 JSON-patch operations.
//! The operation enum from `json_patch` carries a `value` exactly for the
//! operations that need one, and paths are parsed JSON Pointers, so a
//! malformed operation cannot be constructed. Nothing here checks that a path
//! resolves against the admitted object; the API server does that when it
//! applies the patch.

use jsonptr::PointerBuf;
use serde_json::Value;
use thiserror::Error;

pub use json_patch::{
    AddOperation, CopyOperation, MoveOperation, Patch, PatchOperation, RemoveOperation,
    ReplaceOperation, TestOperation,
};

/// Errors building a JSON patch
#[derive(Debug, Error)]
pub enum PatchError {
    /// A path is not a syntactically valid JSON Pointer
    #[error("invalid JSON pointer '{path}': {reason}")]
    InvalidPointer {
        /// The offending path
        path: String,
        /// Parser diagnostic
        reason: String,
    },
}

/// Parse a JSON Pointer such as `/metadata/labels/app`
pub fn parse_pointer(path: &str) -> Result<PointerBuf, PatchError> {
    PointerBuf::parse(path).map_err(|e| PatchError::InvalidPointer {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// Build a pointer from unescaped path segments
///
/// Segments containing `/` or `~` are escaped, so label keys like
/// `app.kubernetes.io/name` can be passed as-is.
pub fn pointer<'a, I>(tokens: I) -> PointerBuf
where
    I: IntoIterator<Item = &'a str>,
{
    PointerBuf::from_tokens(tokens)
}

/// `add` operation at `path`
pub fn add(path: &str, value: Value) -> Result<PatchOperation, PatchError> {
    Ok(PatchOperation::Add(AddOperation {
        path: parse_pointer(path)?,
        value,
    }))
}

/// `remove` operation at `path`
pub fn remove(path: &str) -> Result<PatchOperation, PatchError> {
    Ok(PatchOperation::Remove(RemoveOperation {
        path: parse_pointer(path)?,
    }))
}

/// `replace` operation at `path`
pub fn replace(path: &str, value: Value) -> Result<PatchOperation, PatchError> {
    Ok(PatchOperation::Replace(ReplaceOperation {
        path: parse_pointer(path)?,
        value,
    }))
}

/// `test` operation asserting `path` equals `value`
pub fn test_equals(path: &str, value: Value) -> Result<PatchOperation, PatchError> {
    Ok(PatchOperation::Test(TestOperation {
        path: parse_pointer(path)?,
        value,
    }))
}

/// `move` operation from `from` to `path`
pub fn move_value(from: &str, path: &str) -> Result<PatchOperation, PatchError> {
    Ok(PatchOperation::Move(MoveOperation {
        from: parse_pointer(from)?,
        path: parse_pointer(path)?,
    }))
}

/// `copy` operation from `from` to `path`
pub fn copy_value(from: &str, path: &str) -> Result<PatchOperation, PatchError> {
    Ok(PatchOperation::Copy(CopyOperation {
        from: parse_pointer(from)?,
        path: parse_pointer(path)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =========================================================================
    // Unit Tests
    // =========================================================================

    #[test]
    fn test_invalid_pointer_rejected() {
        let err = add("metadata/labels", json!("x")).unwrap_err();
        assert!(matches!(err, PatchError::InvalidPointer { .. }));
        assert!(err.to_string().contains("metadata/labels"));
    }

    #[test]
    fn test_pointer_escapes_label_keys() {
        let path = pointer(["metadata", "labels", "app.kubernetes.io/name"]);
        assert_eq!(path.as_str(), "/metadata/labels/app.kubernetes.io~1name");
    }

    #[test]
    fn test_wire_shape_of_each_operation() {
        let patch = Patch(vec![
            add("/metadata/labels/a", json!("1")).unwrap(),
            remove("/metadata/labels/b").unwrap(),
            replace("/spec/replicas", json!(3)).unwrap(),
            test_equals("/metadata/name", json!("web")).unwrap(),
            move_value("/metadata/labels/c", "/metadata/labels/d").unwrap(),
            copy_value("/metadata/labels/a", "/metadata/labels/e").unwrap(),
        ]);

        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            value,
            json!([
                {"op": "add", "path": "/metadata/labels/a", "value": "1"},
                {"op": "remove", "path": "/metadata/labels/b"},
                {"op": "replace", "path": "/spec/replicas", "value": 3},
                {"op": "test", "path": "/metadata/name", "value": "web"},
                {"op": "move", "from": "/metadata/labels/c", "path": "/metadata/labels/d"},
                {"op": "copy", "from": "/metadata/labels/a", "path": "/metadata/labels/e"},
            ])
        );
    }

    #[test]
    fn test_patch_serializes_as_json_array() {
        let patch = Patch(vec![add("/metadata/labels/injected", json!("true")).unwrap()]);
        let bytes = serde_json::to_vec(&patch).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"[{"op":"add","path":"/metadata/labels/injected","value":"true"}]"#
        );
    }

    // =========================================================================
    // Story Tests
    // =========================================================================

    /// Story: later operations may depend on earlier ones, so order is kept
    #[test]
    fn story_operations_keep_their_order() {
        let patch = Patch(vec![
            add("/metadata/labels", json!({})).unwrap(),
            add("/metadata/labels/team", json!("payments")).unwrap(),
            replace("/metadata/labels/team", json!("billing")).unwrap(),
        ]);

        let bytes = serde_json::to_vec(&patch).unwrap();
        let round_tripped: Patch = serde_json::from_slice(&bytes).unwrap();
        let paths: Vec<String> = round_tripped
            .0
            .iter()
            .map(|op| match op {
                PatchOperation::Add(a) => format!("add {}", a.path),
                PatchOperation::Replace(r) => format!("replace {}", r.path),
                other => panic!("unexpected op {other:?}"),
            })
            .collect();

        assert_eq!(
            paths,
            vec![
                "add /metadata/labels",
                "add /metadata/labels/team",
                "replace /metadata/labels/team",
            ]
        );
    }
}
