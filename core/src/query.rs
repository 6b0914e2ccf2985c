use crate::geometry::MapPoint;
use crate::prelude::{ViewerError, ViewerResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpatialFilter {
    All,
    Intersects(MapPoint),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    DateDescending,
    DateAscending,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialQuery {
    pub filter: SpatialFilter,
    pub order: SortOrder,
}

impl SpatialQuery {
    pub fn all() -> Self {
        Self {
            filter: SpatialFilter::All,
            order: SortOrder::DateDescending,
        }
    }

    pub fn at(point: MapPoint) -> Self {
        Self {
            filter: SpatialFilter::Intersects(point),
            order: SortOrder::DateDescending,
        }
    }
}

/// Handle for an issued query; only the newest ticket's response is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryTicket {
    pub sequence: u64,
    pub query: SpatialQuery,
}

#[derive(Debug)]
pub enum QueryOutcome<T> {
    Applied(T),
    Failed(ViewerError),
    Stale,
}

/// Sequences queries so a slow response can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct QueryDispatcher {
    issued: u64,
    pending: Option<u64>,
}

impl QueryDispatcher {
    pub fn new() -> Self {
        Self {
            issued: 0,
            pending: None,
        }
    }

    pub fn issue(&mut self, query: SpatialQuery) -> QueryTicket {
        self.issued += 1;
        self.pending = Some(self.issued);
        QueryTicket {
            sequence: self.issued,
            query,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        self.pending == Some(ticket.sequence)
    }

    /// Resolves a response. Anything but the newest outstanding ticket is stale.
    pub fn complete<T>(&mut self, ticket: &QueryTicket, result: ViewerResult<T>) -> QueryOutcome<T> {
        if !self.is_current(ticket) {
            return QueryOutcome::Stale;
        }
        self.pending = None;
        match result {
            Ok(value) => QueryOutcome::Applied(value),
            Err(err) => QueryOutcome::Failed(err),
        }
    }

    /// Forgets the outstanding ticket so its response is dropped on arrival.
    pub fn abandon(&mut self) {
        self.pending = None;
    }
}
