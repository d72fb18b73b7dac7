//! 运行时事件分类
//!
//! 事件流中的每条 JSON 消息都被归入一个封闭的事件集合，
//! 无法识别的消息落到 [`AgentEvent::Unrecognized`]，不会中断消费。

use serde_json::Value;

/// 子代理委派所用的工具名
pub const TASK_TOOL: &str = "Task";

static NULL: Value = Value::Null;

#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    SessionStarted {
        session_id: Option<String>,
        model: Option<String>,
    },
    SubagentStarted {
        name: String,
    },
    SubagentEnded {
        name: String,
    },
    AssistantText {
        text: String,
    },
    ToolCall {
        id: Option<String>,
        name: String,
        input: Value,
    },
    ToolResult {
        id: Option<String>,
        is_error: bool,
        content: String,
    },
    Completed,
    /// 终止事件
    Result {
        subtype: Option<String>,
        result: Option<String>,
        cost_usd: Option<f64>,
        is_error: bool,
        session_id: Option<String>,
    },
    Error {
        message: String,
    },
    Unrecognized {
        kind: String,
    },
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// 从消息内容中提取文本
///
/// 接受纯字符串、带类型的内容块数组（text 块按换行拼接）或带 `text` 字段的对象，
/// 其他形态返回空串。
pub fn extract_text(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => map
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

/// assistant / user 消息的内容：优先 `message.content`，其次顶层 `content`
fn message_content(value: &Value) -> &Value {
    value
        .get("message")
        .and_then(|m| m.get("content"))
        .or_else(|| value.get("content"))
        .unwrap_or(&NULL)
}

fn blocks_of<'a>(content: &'a Value, kind: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
    content
        .as_array()
        .into_iter()
        .flatten()
        .filter(move |block| block.get("type").and_then(Value::as_str) == Some(kind))
}

/// 从委派输入或系统事件中取子代理名
pub fn subagent_name(value: &Value) -> String {
    ["subagent_type", "subagent", "agent_name", "name"]
        .iter()
        .find_map(|key| str_field(value, key))
        .unwrap_or_else(|| "unknown".to_string())
}

fn tool_call(id: Option<String>, name: String, input: Value) -> Vec<AgentEvent> {
    let mut events = Vec::new();
    if name == TASK_TOOL {
        events.push(AgentEvent::SubagentStarted {
            name: subagent_name(&input),
        });
    }
    events.push(AgentEvent::ToolCall { id, name, input });
    events
}

fn classify_system(value: &Value) -> Vec<AgentEvent> {
    let subtype = str_field(value, "subtype").unwrap_or_default();
    let event = match subtype.as_str() {
        "init" => AgentEvent::SessionStarted {
            session_id: str_field(value, "session_id"),
            model: str_field(value, "model"),
        },
        "subagent_start" => AgentEvent::SubagentStarted {
            name: subagent_name(value),
        },
        "subagent_end" => AgentEvent::SubagentEnded {
            name: subagent_name(value),
        },
        "completion" => AgentEvent::Completed,
        other => AgentEvent::Unrecognized {
            kind: format!("system:{}", other),
        },
    };
    vec![event]
}

fn classify_assistant(value: &Value) -> Vec<AgentEvent> {
    let content = message_content(value);
    let mut events = Vec::new();

    let text = extract_text(content);
    if !text.is_empty() {
        events.push(AgentEvent::AssistantText { text });
    }

    for block in blocks_of(content, "tool_use") {
        events.extend(tool_call(
            str_field(block, "id"),
            str_field(block, "name").unwrap_or_default(),
            block.get("input").cloned().unwrap_or(Value::Null),
        ));
    }

    if events.is_empty() {
        events.push(AgentEvent::AssistantText {
            text: String::new(),
        });
    }
    events
}

fn tool_result(block: &Value, id_key: &str) -> AgentEvent {
    AgentEvent::ToolResult {
        id: str_field(block, id_key),
        is_error: block
            .get("is_error")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        content: extract_text(block.get("content").unwrap_or(&NULL)),
    }
}

fn classify_user(value: &Value) -> Vec<AgentEvent> {
    let events: Vec<AgentEvent> = blocks_of(message_content(value), "tool_result")
        .map(|block| tool_result(block, "tool_use_id"))
        .collect();

    if events.is_empty() {
        vec![AgentEvent::Unrecognized {
            kind: "user".to_string(),
        }]
    } else {
        events
    }
}

fn error_message(value: &Value) -> String {
    match value.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(error) => str_field(error, "message").unwrap_or_else(|| error.to_string()),
        None => str_field(value, "message").unwrap_or_else(|| "unknown error".to_string()),
    }
}

/// 把一条运行时消息分类为零个或多个事件
pub fn classify(value: &Value) -> Vec<AgentEvent> {
    let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();

    match kind {
        "system" => classify_system(value),
        "assistant" => classify_assistant(value),
        "user" => classify_user(value),
        "tool_call" => tool_call(
            str_field(value, "id"),
            str_field(value, "tool_name")
                .or_else(|| str_field(value, "name"))
                .unwrap_or_default(),
            value.get("input").cloned().unwrap_or(Value::Null),
        ),
        "tool_result" => vec![tool_result(value, "tool_use_id")],
        "result" => vec![AgentEvent::Result {
            subtype: str_field(value, "subtype"),
            result: str_field(value, "result"),
            cost_usd: value.get("total_cost_usd").and_then(Value::as_f64),
            is_error: value
                .get("is_error")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            session_id: str_field(value, "session_id"),
        }],
        "error" => vec![AgentEvent::Error {
            message: error_message(value),
        }],
        "" => vec![AgentEvent::Unrecognized {
            kind: "unknown".to_string(),
        }],
        other => vec![AgentEvent::Unrecognized {
            kind: other.to_string(),
        }],
    }
}
