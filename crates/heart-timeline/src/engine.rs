//! End-to-end pipeline over one document.

use heart_core::config::HeartConfig;
use heart_core::models::{attr, EntityId};
use heart_core::traits::ITimexNormalizer;
use heart_core::{AnnotationGraph, HeartResult};
use heart_temporal::{ChronologicalResolver, ContainerBuilder, TimexTable};

use crate::embed::Embedder;
use crate::output::TimelineDocument;

/// Runs DCT anchoring, value normalization, container building, ordering and
/// embedding.
#[derive(Debug, Clone, Default)]
pub struct TimelineEngine {
    config: HeartConfig,
}

impl TimelineEngine {
    pub fn new(config: HeartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HeartConfig {
        &self.config
    }

    /// Project `graph` onto its timeline.
    ///
    /// Without a normalizer the `value` attributes already on the graph are
    /// used as they are and only the DCT sentinel receives `dct`. `dct`
    /// defaults to today's date.
    pub fn process(
        &self,
        graph: &mut AnnotationGraph,
        dct: Option<&str>,
        normalizer: Option<&dyn ITimexNormalizer>,
    ) -> HeartResult<TimelineDocument> {
        let dct = dct
            .map(str::to_string)
            .unwrap_or_else(|| chrono::Local::now().date_naive().format("%Y-%m-%d").to_string());

        let anchored = graph.relate_dct()?;
        graph.sort_by_span();
        match normalizer {
            Some(normalizer) => graph.normalize_timexes(normalizer, &dct)?,
            None => {
                graph.set_attribute(EntityId::DCT, attr::VALUE, dct.as_str())?;
            }
        }

        let mut table = TimexTable::from_graph(graph);
        let containers = ContainerBuilder::new(graph, &self.config.temporal).build(&mut table)?;
        let resolution = ChronologicalResolver::new(graph, &table).resolve(containers);
        let document = Embedder::new(graph, &table, &resolution.containers, &self.config.timeline).embed()?;

        tracing::info!(
            dct = %dct,
            anchored,
            times = document.times.len(),
            entities = document.entities.len(),
            garbage = document.garbage.as_ref().map_or(0, Vec::len),
            degraded = resolution.degraded,
            "timeline built"
        );
        Ok(document)
    }
}
