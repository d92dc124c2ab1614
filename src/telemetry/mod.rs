pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use ctx::LogCtx;

pub fn forum() -> LogCtx<ops::forum::Forum> { LogCtx::new(config::logs_are_json()) }
pub fn arxiv() -> LogCtx<ops::arxiv::Arxiv> { LogCtx::new(config::logs_are_json()) }
pub fn youtube() -> LogCtx<ops::youtube::Youtube> { LogCtx::new(config::logs_are_json()) }
