//! Usage metrics aggregation.
//!
//! Pure functions over a snapshot of [`ApiUsageMetric`]s, recomputed on every
//! dashboard refresh. Shares are `f64` fractions in `[0, 1]` and are only
//! rounded for display. Every division guards against a zero denominator and
//! yields `0.0`.

use crate::model::ApiUsageMetric;
use crate::ticket::{HttpMethod, TicketType};

/// Hits one endpoint is expected to see; the activity index is measured
/// against `metrics.len() * ACTIVITY_BASELINE_HITS`.
pub const ACTIVITY_BASELINE_HITS: u64 = 50;

/// Busiest endpoint of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopEndpoint<'a> {
    Metric(&'a ApiUsageMetric),
    /// The snapshot was empty.
    NoData,
}

impl<'a> TopEndpoint<'a> {
    /// Endpoint path, or "no data".
    pub fn label(&self) -> &'a str {
        match *self {
            TopEndpoint::Metric(m) => m.api_endpoint.as_str(),
            TopEndpoint::NoData => "no data",
        }
    }

    pub fn metric(&self) -> Option<&'a ApiUsageMetric> {
        match *self {
            TopEndpoint::Metric(m) => Some(m),
            TopEndpoint::NoData => None,
        }
    }
}

/// One bucket of a distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Share<K> {
    pub key: K,
    pub hit_count: u64,
    /// `hit_count / total_hits`, `0.0` when there were no hits.
    pub share: f64,
}

pub fn total_hits(metrics: &[ApiUsageMetric]) -> u64 {
    metrics.iter().map(|m| m.hit_count).sum()
}

/// Largest single hit count, 0 for an empty snapshot.
pub fn max_hits(metrics: &[ApiUsageMetric]) -> u64 {
    metrics.iter().map(|m| m.hit_count).max().unwrap_or(0)
}

/// Metric with the highest hit count. Ties go to the first one seen.
pub fn top_endpoint(metrics: &[ApiUsageMetric]) -> TopEndpoint<'_> {
    metrics
        .iter()
        .fold(None, |best: Option<&ApiUsageMetric>, m| match best {
            Some(b) if b.hit_count >= m.hit_count => Some(b),
            _ => Some(m),
        })
        .map_or(TopEndpoint::NoData, TopEndpoint::Metric)
}

/// `round(total / (len * 50) * 100)`, 0 for an empty snapshot.
pub fn activity_index(metrics: &[ApiUsageMetric]) -> u64 {
    let baseline = metrics.len() as u64 * ACTIVITY_BASELINE_HITS;
    (ratio(total_hits(metrics), baseline) * 100.0).round() as u64
}

/// `part / whole`, 0 when `whole` is 0.
pub fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Fraction of all hits taken by one metric.
pub fn share_of_total(metric: &ApiUsageMetric, metrics: &[ApiUsageMetric]) -> f64 {
    ratio(metric.hit_count, total_hits(metrics))
}

/// Bar length of one metric relative to the busiest.
pub fn share_of_max(metric: &ApiUsageMetric, metrics: &[ApiUsageMetric]) -> f64 {
    ratio(metric.hit_count, max_hits(metrics))
}

fn distribution<K, F>(metrics: &[ApiUsageMetric], key: F) -> Vec<Share<K>>
where
    K: PartialEq,
    F: Fn(&ApiUsageMetric) -> K,
{
    // Linear lookup keeps first-seen key order; snapshots are small.
    let mut buckets: Vec<(K, u64)> = Vec::new();
    for m in metrics {
        let k = key(m);
        match buckets.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, hits)) => *hits += m.hit_count,
            None => buckets.push((k, m.hit_count)),
        }
    }
    let total = total_hits(metrics);
    buckets
        .into_iter()
        .map(|(key, hit_count)| Share {
            key,
            hit_count,
            share: ratio(hit_count, total),
        })
        .collect()
}

/// Hits per endpoint, in first-seen order.
pub fn distribution_by_endpoint(metrics: &[ApiUsageMetric]) -> Vec<Share<String>> {
    distribution(metrics, |m| m.api_endpoint.clone())
}

/// Hits per ticket type, in first-seen order.
pub fn distribution_by_ticket_type(metrics: &[ApiUsageMetric]) -> Vec<Share<TicketType>> {
    distribution(metrics, |m| m.ticket_type)
}

/// HTTP methods present in the snapshot, in first-seen order.
pub fn distinct_methods(metrics: &[ApiUsageMetric]) -> Vec<HttpMethod> {
    let mut seen = Vec::new();
    for m in metrics {
        if !seen.contains(&m.http_method) {
            seen.push(m.http_method);
        }
    }
    seen
}

/// Everything the dashboard shows for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub endpoint_count: usize,
    pub total_hits: u64,
    pub max_hits: u64,
    pub top_endpoint: Option<ApiUsageMetric>,
    pub activity_index: u64,
    pub methods: Vec<HttpMethod>,
    pub by_endpoint: Vec<Share<String>>,
    pub by_ticket_type: Vec<Share<TicketType>>,
}

impl MetricsSummary {
    pub fn from_metrics(metrics: &[ApiUsageMetric]) -> Self {
        Self {
            endpoint_count: metrics.len(),
            total_hits: total_hits(metrics),
            max_hits: max_hits(metrics),
            top_endpoint: top_endpoint(metrics).metric().cloned(),
            activity_index: activity_index(metrics),
            methods: distinct_methods(metrics),
            by_endpoint: distribution_by_endpoint(metrics),
            by_ticket_type: distribution_by_ticket_type(metrics),
        }
    }
}
