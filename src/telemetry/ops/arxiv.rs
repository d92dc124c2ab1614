use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Arxiv;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Item, FetchAbs, DownloadPdf, ExtractPdf, WriteText, SaveStore }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Item => "item",
        Phase::FetchAbs => "fetch_abs",
        Phase::DownloadPdf => "download_pdf",
        Phase::ExtractPdf => "extract_pdf",
        Phase::WriteText => "write_text",
        Phase::SaveStore => "save_store",
    }}
    fn span(&self) -> Span { match self {
        Phase::Item => info_span!("item"),
        Phase::FetchAbs => info_span!("fetch_abs"),
        Phase::DownloadPdf => info_span!("download_pdf"),
        Phase::ExtractPdf => info_span!("extract_pdf"),
        Phase::WriteText => info_span!("write_text"),
        Phase::SaveStore => info_span!("save_store"),
    }}
}

impl OpMarker for Arxiv {
    const NAME: &'static str = "arxiv";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("arxiv") }
}
