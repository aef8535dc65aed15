//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// 默认配置值
pub mod defaults {
    /// 默认放大系数（不放大）
    pub const AMPLIFY_FACTOR: f32 = 1.0;

    /// 默认预热秒数（0 表示禁用预热）
    pub const PREFEED_SECONDS: f32 = 0.0;
}

/// 容器格式约束
pub mod formats {
    /// 可读写的容器扩展名（输出必须与输入相同）
    pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav"];
}

/// 项目主页
pub const PROJECT_URL: &str = "https://github.com/DragoonAethis/DenoiseIt";
