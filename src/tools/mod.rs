//! 工具模块集合
//!
//! 包含CLI、文件处理等工具模块，支持main.rs的流程控制。

pub mod cli;
pub mod constants;
pub mod processor;
pub mod utils;

// 重新导出主要的公共接口
pub use cli::{
    AppConfig, build_command, config_from_matches, parse_args, show_completion_info,
    show_startup_info,
};
pub use processor::{RunSummary, check_paths, denoise_file, load_engine_factory, output_summary};
