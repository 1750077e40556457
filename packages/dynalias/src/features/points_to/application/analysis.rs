//! Analysis selection
//!
//! Picks the dynamic analysis variant from configuration and replays the
//! trace through it.

use super::engine::AliasEngine;
use super::pointee::{PointeeAnalysis, PointeeCollector};
use crate::config::{AnalysisKind, DynAliasConfig};
use crate::errors::Result;
use crate::features::alias_report::AliasReport;
use crate::features::ids::IdLookup;
use crate::features::points_to::ports::{AliasAnalysisView, DynamicAnalysis};
use crate::features::trace::{TraceDispatcher, TraceRecord};
use tracing::info;

/// Run the configured analysis over `records`
pub fn analyze<I>(
    records: I,
    config: &DynAliasConfig,
    ids: Option<&dyn IdLookup>,
) -> Result<Box<dyn DynamicAnalysis>>
where
    I: IntoIterator<Item = Result<TraceRecord>>,
{
    let analysis: Box<dyn DynamicAnalysis> = match config.analysis {
        AnalysisKind::Alias => {
            let report = collect_aliases(records, config, ids)?;
            Box::new(AliasAnalysisView::new(report))
        }
        AnalysisKind::Pointer => Box::new(collect_pointees(records, config)?),
    };
    Ok(analysis)
}

/// Replay `records` through the alias engine
pub fn collect_aliases<I>(
    records: I,
    config: &DynAliasConfig,
    ids: Option<&dyn IdLookup>,
) -> Result<AliasReport>
where
    I: IntoIterator<Item = Result<TraceRecord>>,
{
    info!(analysis = %AnalysisKind::Alias, "starting dynamic analysis");
    let mut engine = AliasEngine::new(config.engine.clone());
    if let Some(ids) = ids {
        engine = engine.with_ids(ids);
    }
    TraceDispatcher::new(config.engine.progress_interval).replay(records, &mut engine)?;
    Ok(engine.finish())
}

/// Replay `records` through the allocator-level pointer analysis
pub fn collect_pointees<I>(records: I, config: &DynAliasConfig) -> Result<PointeeAnalysis>
where
    I: IntoIterator<Item = Result<TraceRecord>>,
{
    info!(analysis = %AnalysisKind::Pointer, "starting dynamic analysis");
    let mut collector = PointeeCollector::new();
    TraceDispatcher::new(config.engine.progress_interval).replay(records, &mut collector)?;
    Ok(collector.finish())
}
