use std::io::{BufRead, Write};

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use vlarm_command::CommandExecutor;

use crate::{protocol::*, Error};

/// MCP server speaking newline-delimited JSON-RPC.
///
/// Messages are handled one at a time, in the order they arrive.
#[derive(Debug)]
pub struct McpServer {
    name: String,
    version: String,
    executor: CommandExecutor,
}

impl McpServer {
    pub fn new(name: impl Into<String>, executor: CommandExecutor) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            executor,
        }
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    /// Serves until `reader` reaches end of file.
    pub fn serve<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<(), Error> {
        info!(name = %self.name, base_url = %self.executor.client().base_url(), "serving on stdio");
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_message(&line) {
                serde_json::to_writer(&mut writer, &response)?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
        }
        info!("input closed");
        Ok(())
    }

    /// Handles one message. Notifications produce no response.
    pub fn handle_message(&self, line: &str) -> Option<Response> {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "failed to parse message");
                return Some(Response::error(
                    Value::Null,
                    ErrorObject::new(PARSE_ERROR, format!("Parse error: {e}")),
                ));
            }
        };
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        if !message.is_object() {
            return Some(Response::error(
                id,
                ErrorObject::new(INVALID_REQUEST, "Invalid request: expected an object"),
            ));
        }
        let request: Request = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                return Some(Response::error(
                    id,
                    ErrorObject::new(INVALID_REQUEST, format!("Invalid request: {e}")),
                ));
            }
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(Response::error(
                id,
                ErrorObject::new(INVALID_REQUEST, "Invalid request: jsonrpc must be \"2.0\""),
            ));
        }

        let Some(id) = request.id else {
            debug!(method = %request.method, "notification");
            return None;
        };
        debug!(method = %request.method, %id, "request");
        Some(match self.dispatch(&request.method, request.params) {
            Ok(result) => Response::result(id, result),
            Err(error) => Response::error(id, error),
        })
    }

    fn dispatch(&self, method: &str, params: Value) -> Result<Value, ErrorObject> {
        match method {
            "initialize" => {
                let params: InitializeParams = parse_params(params)?;
                to_result(InitializeResult {
                    protocol_version: params
                        .protocol_version
                        .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_owned()),
                    capabilities: json!({ "tools": { "listChanged": false } }),
                    server_info: Implementation {
                        name: self.name.clone(),
                        version: self.version.clone(),
                    },
                })
            }
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(parse_params(params)?),
            _ => Err(ErrorObject::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {method}"),
            )),
        }
    }

    fn list_tools(&self) -> Result<Value, ErrorObject> {
        let tools = self
            .executor
            .registry()
            .list()
            .map(|descriptor| {
                Ok(Tool {
                    name: descriptor.name.to_owned(),
                    description: descriptor.description.to_owned(),
                    input_schema: serde_json::to_value(descriptor.input_schema())
                        .map_err(internal_error)?,
                })
            })
            .collect::<Result<Vec<_>, ErrorObject>>()?;
        to_result(ListToolsResult { tools })
    }

    fn call_tool(&self, params: CallToolParams) -> Result<Value, ErrorObject> {
        let outcome = self
            .executor
            .invoke(&params.name, params.arguments)
            .map_err(|e| match e {
                vlarm_command::Error::UnknownCommand(name) => {
                    ErrorObject::new(INVALID_PARAMS, format!("Unknown tool: {name}"))
                }
                e => ErrorObject::new(INVALID_PARAMS, e.to_string()),
            })?;
        to_result(CallToolResult {
            content: vec![Content::Text {
                text: outcome.message().to_owned(),
            }],
            is_error: false,
        })
    }
}

fn parse_params<T: DeserializeOwned + Default>(params: Value) -> Result<T, ErrorObject> {
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params)
        .map_err(|e| ErrorObject::new(INVALID_PARAMS, format!("Invalid params: {e}")))
}

fn to_result<T: serde::Serialize>(value: T) -> Result<Value, ErrorObject> {
    serde_json::to_value(value).map_err(internal_error)
}

fn internal_error(e: serde_json::Error) -> ErrorObject {
    ErrorObject::new(INTERNAL_ERROR, format!("Internal error: {e}"))
}

#[cfg(test)]
mod tests {
    use vlarm_client::PhosphobotClientConfig;

    use super::*;

    fn new_server() -> McpServer {
        let executor = CommandExecutor::try_from_config(PhosphobotClientConfig {
            base_url: vlarm_test::unreachable_url(),
            timeout_secs: 0.5,
            init_timeout_secs: 0.5,
            ..Default::default()
        })
        .unwrap();
        McpServer::new("vlarm", executor)
    }

    fn handle(server: &McpServer, message: Value) -> Option<Response> {
        server.handle_message(&message.to_string())
    }

    #[test]
    fn test_initialize() {
        let server = new_server();
        let response = handle(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2025-03-26",
                    "capabilities": {},
                    "clientInfo": { "name": "host", "version": "1.0" },
                },
            }),
        )
        .unwrap();
        assert_eq!(response.id, json!(1));
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], "vlarm");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);

        let response = handle(
            &server,
            json!({ "jsonrpc": "2.0", "id": 2, "method": "initialize" }),
        )
        .unwrap();
        assert_eq!(
            response.result.unwrap()["protocolVersion"],
            DEFAULT_PROTOCOL_VERSION
        );
    }

    #[test]
    fn test_notification_has_no_response() {
        let server = new_server();
        assert!(handle(
            &server,
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" })
        )
        .is_none());
        assert!(handle(&server, json!({ "jsonrpc": "2.0", "method": "unknown" })).is_none());
    }

    #[test]
    fn test_ping() {
        let server = new_server();
        let response = handle(&server, json!({ "jsonrpc": "2.0", "id": "p", "method": "ping" }))
            .unwrap();
        assert_eq!(response.id, json!("p"));
        assert_eq!(response.result, Some(json!({})));
    }

    #[test]
    fn test_errors() {
        let server = new_server();
        let response = server.handle_message("{not json").unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);

        let response = handle(&server, json!({ "jsonrpc": "2.0", "id": 3 })).unwrap();
        assert_eq!(response.id, json!(3));
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);

        let response = handle(&server, json!({ "jsonrpc": "1.0", "id": 4, "method": "ping" }))
            .unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);

        let response = handle(&server, json!([1, 2])).unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);

        let response = handle(
            &server,
            json!({ "jsonrpc": "2.0", "id": 5, "method": "resources/list" }),
        )
        .unwrap();
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn test_list_tools() {
        let server = new_server();
        let response = handle(
            &server,
            json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" }),
        )
        .unwrap();
        let result = response.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 12);
        assert_eq!(tools[0]["name"], "initialize_bot");
        assert_eq!(tools[11]["name"], "gravity_compensation_off");
        for tool in tools {
            assert_eq!(tool["inputSchema"]["type"], "object");
            assert!(tool["description"].as_str().is_some());
        }
        assert_eq!(
            tools[3]["inputSchema"]["properties"]["source"]["type"],
            "string"
        );
    }

    #[test]
    fn test_call_unknown_tool() {
        let server = new_server();
        let response = handle(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 9,
                "method": "tools/call",
                "params": { "name": "dance", "arguments": {} },
            }),
        )
        .unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert_eq!(error.message, "Unknown tool: dance");
    }

    #[test]
    fn test_call_tool_unreachable_robot() {
        let server = new_server();
        let response = handle(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 10,
                "method": "tools/call",
                "params": { "name": "say_hello" },
            }),
        )
        .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], "Error: Unable to say hello.");
        assert_eq!(result["isError"], false);
    }
}
