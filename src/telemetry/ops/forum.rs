use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Forum;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Item, Fetch, Extract, WriteText, SaveStore }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Item => "item",
        Phase::Fetch => "fetch",
        Phase::Extract => "extract",
        Phase::WriteText => "write_text",
        Phase::SaveStore => "save_store",
    }}
    fn span(&self) -> Span { match self {
        Phase::Item => info_span!("item"),
        Phase::Fetch => info_span!("fetch"),
        Phase::Extract => info_span!("extract"),
        Phase::WriteText => info_span!("write_text"),
        Phase::SaveStore => info_span!("save_store"),
    }}
}

impl OpMarker for Forum {
    const NAME: &'static str = "forum";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("forum") }
}
