use serde::{Deserialize, Serialize};

/// Outcome of a tool invocation.
///
/// Every tool returns human-readable text for both success and failure; the
/// `success` flag mirrors the `"Error:"` / `"Warning:"` prefix convention so
/// transports do not have to parse the text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub result: String,
}

impl ToolResult {
    pub fn ok(result: impl Into<String>) -> Self {
        Self {
            success: true,
            result: result.into(),
        }
    }

    pub fn error(result: impl Into<String>) -> Self {
        Self {
            success: false,
            result: result.into(),
        }
    }
}

/// Schema advertised for a single tool, in function-call format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub function: FunctionSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A tool invocation request as delivered by the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            function: FunctionCall {
                name: name.into(),
                arguments,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_result_constructors() {
        let ok = ToolResult::ok("done");
        assert!(ok.success);
        assert_eq!(ok.result, "done");

        let err = ToolResult::error("Error: boom");
        assert!(!err.success);
    }

    #[test]
    fn tool_call_round_trips_through_json() {
        let call = ToolCall::new("read_file", json!({"file_name": "notes.txt"}));
        let encoded = serde_json::to_string(&call).unwrap();
        let decoded: ToolCall = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.function.name, "read_file");
        assert_eq!(decoded.function.arguments["file_name"], "notes.txt");
    }
}
