//! 与托管代理运行时交互：工具集、MCP 工具服务、运行时进程和事件分类

pub mod events;
pub mod mcp;
pub mod runtime;
pub mod tools;
