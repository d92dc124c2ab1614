use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Youtube;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Item, RunYtDlp, Delay, SaveList }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Item => "item",
        Phase::RunYtDlp => "run_ytdlp",
        Phase::Delay => "delay",
        Phase::SaveList => "save_list",
    }}
    fn span(&self) -> Span { match self {
        Phase::Item => info_span!("item"),
        Phase::RunYtDlp => info_span!("run_ytdlp"),
        Phase::Delay => info_span!("delay"),
        Phase::SaveList => info_span!("save_list"),
    }}
}

impl OpMarker for Youtube {
    const NAME: &'static str = "youtube";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("youtube") }
}
