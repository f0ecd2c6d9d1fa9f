// src/analysis/mod.rs
// 每个子命令一条独立的处理链，只共享读取、时间解析和绘图这几块
pub mod baseline;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod forest;
pub mod plot;
pub mod relabel;
pub mod source;
pub mod timefmt;
pub mod trainer;
// 公开导出常用类型，方便 main.rs 调用
pub use error::AnalysisError;
pub use plot::{
    render_baseline_png, render_dashboard_png, render_training_png, render_verification_png,
    PlotStyle,
};
