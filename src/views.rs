// src/views.rs

//! View-layer policy for lists: never show an empty screen.

use serde::Serialize;

use crate::repository::RepoError;

/// Where a view's items came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewData<T> {
    pub source: DataSource,
    pub items: Vec<T>,
}

impl<T> ViewData<T> {
    pub fn live(items: Vec<T>) -> Self {
        Self {
            source: DataSource::Live,
            items,
        }
    }

    pub fn demo(items: Vec<T>) -> Self {
        Self {
            source: DataSource::Demo,
            items,
        }
    }
}

/// Uses the repository result when it has items, otherwise the demo set.
/// A failure is logged under `context` before falling back.
pub fn or_demo<T>(
    result: Result<Vec<T>, RepoError>,
    context: &str,
    demo: impl FnOnce() -> Vec<T>,
) -> ViewData<T> {
    match result {
        Ok(items) if !items.is_empty() => ViewData::live(items),
        Ok(_) => {
            tracing::debug!("No {} yet, showing demo data", context);
            ViewData::demo(demo())
        }
        Err(e) => {
            tracing::error!("Error fetching {}: {}", context, e);
            ViewData::demo(demo())
        }
    }
}

/// Single-value counterpart of [`or_demo`] for summaries.
pub fn value_or_demo<T>(
    result: Result<T, RepoError>,
    context: &str,
    demo: impl FnOnce() -> T,
) -> (DataSource, T) {
    match result {
        Ok(value) => (DataSource::Live, value),
        Err(e) => {
            tracing::error!("Error fetching {}: {}", context, e);
            (DataSource::Demo, demo())
        }
    }
}
