use crate::agents::ModelTier;
use crate::config::Config;
use anyhow::{Result, ensure};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 未指定公司时 research / connect 的默认目标
pub const DEFAULT_COMPANY: &str = "Imperial Manufacturing Group";

/// MPA Deal Intelligence - 面向大西洋加拿大中型市场的并购情报多代理系统
#[derive(Parser, Debug)]
#[command(name = "mpa-deal-intel")]
#[command(
    about = "Multi-agent M&A deal intelligence for Atlantic Canada. Prospects for transaction signals, researches targets and maps warm introduction paths, saving every sourced finding to the deal datastore."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 所有角色统一的花费上限（美元）
    #[arg(long, global = true)]
    pub budget: Option<f64>,

    /// claude CLI 可执行文件
    #[arg(long, global = true)]
    pub runtime_binary: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// 协调者：--prospect | --research <公司> | --market-map <行业> [省份] | --intro <公司> | --pipeline | 自定义任务
    Orchestrate {
        /// 按关键词路由，直接启动匹配的专职代理
        #[arg(long)]
        direct: bool,

        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// 信号扫描，默认扫描新斯科舍省制造业的卖方信号
    Prospect {
        #[arg(long, value_enum, default_value_t = ModelTier::Sonnet)]
        model: ModelTier,

        task: Option<String>,
    },

    /// 深度调研一家公司
    Research {
        #[arg(default_value = DEFAULT_COMPANY)]
        company: String,
    },

    /// 梳理通往一家公司的引荐路径
    Connect {
        #[arg(default_value = DEFAULT_COMPANY)]
        company: String,
    },

    /// 以 MCP stdio 方式提供数据存储工具，由代理运行时启动
    ServeTools,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<(Config, Command)> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(budget) = self.budget {
            ensure!(
                budget.is_finite() && budget > 0.0,
                "--budget must be a positive amount in USD, got {}",
                budget
            );
            config.budgets.set_all(budget);
        }
        if let Some(runtime_binary) = self.runtime_binary {
            config.agent.runtime_binary = runtime_binary;
        }
        config.verbose = config.verbose || self.verbose;

        Ok((config, self.command))
    }
}

// Include tests
#[cfg(test)]
mod tests;
