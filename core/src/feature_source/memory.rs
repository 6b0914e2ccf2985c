use crate::model::EclipseFeature;
use crate::prelude::{FeatureSource, ViewerResult};
use crate::query::{SortOrder, SpatialFilter, SpatialQuery};

/// Feature source over a catalogue held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    features: Vec<EclipseFeature>,
}

impl MemorySource {
    pub fn new(features: Vec<EclipseFeature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[EclipseFeature] {
        &self.features
    }
}

impl FeatureSource for MemorySource {
    fn query(&self, query: &SpatialQuery) -> ViewerResult<Vec<EclipseFeature>> {
        let mut matched: Vec<EclipseFeature> = self
            .features
            .iter()
            .filter(|feature| match query.filter {
                SpatialFilter::All => true,
                SpatialFilter::Intersects(point) => feature.contains(point),
            })
            .cloned()
            .collect();
        match query.order {
            SortOrder::DateDescending => {
                matched.sort_by(|a, b| b.record.date.cmp(&a.record.date))
            }
            SortOrder::DateAscending => matched.sort_by(|a, b| a.record.date.cmp(&b.record.date)),
        }
        Ok(matched)
    }
}
