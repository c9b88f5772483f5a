//! Named metric extractors.
//!
//! A [`Metric`] pairs a name with a [`MetricSource`]: either a dotted field
//! path into the record type or a plain function. The choice is made once,
//! when the metric is built, and field paths are validated against the record
//! type at that point, so extraction is a single `match` per item.

use std::fmt;

use crate::error::AnalysisError;

/// A dotted path such as `diff_summary.leaves.similarity_time`, split into
/// segments once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Result<Self, AnalysisError> {
        let segments: Vec<String> = path.split('.').map(str::to_owned).collect();
        if path.is_empty() || segments.iter().any(String::is_empty) {
            return Err(AnalysisError::EmptyPath);
        }
        Ok(FieldPath {
            raw: path.to_owned(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Record types that metrics can read numeric fields from.
pub trait Measured {
    /// Numeric value at `path`, or `None` if absent on this record.
    fn field_value(&self, path: &FieldPath) -> Option<f64>;

    /// Whether `path` names a numeric field of this record type at all.
    fn has_field(path: &FieldPath) -> bool;
}

/// Where a metric's values come from.
pub enum MetricSource<T> {
    Field(FieldPath),
    Computed(fn(&T) -> Option<f64>),
}

impl<T> Clone for MetricSource<T> {
    fn clone(&self) -> Self {
        match self {
            MetricSource::Field(path) => MetricSource::Field(path.clone()),
            MetricSource::Computed(f) => MetricSource::Computed(*f),
        }
    }
}

impl<T> fmt::Debug for MetricSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricSource::Field(path) => f.debug_tuple("Field").field(&path.as_str()).finish(),
            MetricSource::Computed(_) => f.write_str("Computed"),
        }
    }
}

/// A named numeric series over records of type `T`.
#[derive(Debug, Clone)]
pub struct Metric<T> {
    name: String,
    source: MetricSource<T>,
}

impl<T: Measured> Metric<T> {
    /// Metric reading the field at `path`.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::UnknownField`] if `T` has no numeric field at `path`,
    /// [`AnalysisError::EmptyPath`] for an empty path or segment.
    pub fn field(name: impl Into<String>, path: &str) -> Result<Self, AnalysisError> {
        let path = FieldPath::parse(path)?;
        if !T::has_field(&path) {
            return Err(AnalysisError::UnknownField(path.to_string()));
        }
        Ok(Metric {
            name: name.into(),
            source: MetricSource::Field(path),
        })
    }

    /// Metric computed by `extract`. Returning `None` excludes the item.
    pub fn computed(name: impl Into<String>, extract: fn(&T) -> Option<f64>) -> Self {
        Metric {
            name: name.into(),
            source: MetricSource::Computed(extract),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &MetricSource<T> {
        &self.source
    }

    /// Value for one item; non-finite results count as absent.
    pub fn extract(&self, item: &T) -> Option<f64> {
        let value = match &self.source {
            MetricSource::Field(path) => item.field_value(path),
            MetricSource::Computed(extract) => extract(item),
        };
        value.filter(|v| v.is_finite())
    }

    /// Values for all items, skipping absent ones.
    pub fn values<'a, I>(&self, items: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        items.into_iter().filter_map(|item| self.extract(item)).collect()
    }
}

/// Ordered collection of metrics with unique names.
#[derive(Debug, Clone)]
pub struct MetricCatalog<T> {
    metrics: Vec<Metric<T>>,
}

impl<T: Measured> MetricCatalog<T> {
    pub fn new() -> Self {
        MetricCatalog {
            metrics: Vec::new(),
        }
    }

    /// Add `metric`, replacing an earlier metric of the same name in place.
    pub fn with(mut self, metric: Metric<T>) -> Self {
        self.insert(metric);
        self
    }

    pub fn insert(&mut self, metric: Metric<T>) {
        match self.metrics.iter_mut().find(|m| m.name == metric.name) {
            Some(existing) => *existing = metric,
            None => self.metrics.push(metric),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Metric<T>> {
        self.metrics.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Metric<T>> {
        self.metrics.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|m| m.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl<T: Measured> Default for MetricCatalog<T> {
    fn default() -> Self {
        Self::new()
    }
}
