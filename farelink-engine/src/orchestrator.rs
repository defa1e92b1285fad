use crate::filter;
use crate::sort;
use farelink_core::adapter::ProviderAdapter;
use farelink_core::flight::Flight;
use farelink_core::provider::ProviderKind;
use farelink_core::search::{SearchCriteria, SearchMetadata, SearchRequest, SearchResponse};
use farelink_core::CoreResult;
use farelink_providers::ProviderRegistry;
use farelink_store::app_config::ScoringConfig;
use farelink_store::FlightCache;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error};
use uuid::Uuid;

/// Typed per-task result. Fault containment lives in the type; a panic in
/// a provider code path surfaces as a JoinError at the join point.
#[derive(Debug)]
enum FetchOutcome {
    Fetched {
        provider: ProviderKind,
        records: usize,
    },
    Failed {
        provider: ProviderKind,
    },
}

/// The search orchestration engine: cache partition, concurrent fan-out,
/// merge, filter/score, sort, telemetry.
pub struct FlightSearchService {
    registry: ProviderRegistry,
    cache: FlightCache,
    scoring: ScoringConfig,
}

impl FlightSearchService {
    pub fn new(registry: ProviderRegistry, cache: FlightCache, scoring: ScoringConfig) -> Self {
        Self {
            registry,
            cache,
            scoring,
        }
    }

    /// Only request validation can fail this call. Every provider-level
    /// fault is absorbed into the metadata counters.
    pub async fn search(&self, mut request: SearchRequest) -> CoreResult<SearchResponse> {
        let started = Instant::now();

        request.validate()?;
        request.normalize();

        let targets = self.registry.select(&request.airlines);
        let scope = request.cache_scope();

        // Cache-aside partition: hits with records are served as-is,
        // everything else goes to the live fan-out.
        let mut cached_flights = Vec::new();
        let mut missing = Vec::new();
        for adapter in targets {
            let key = FlightCache::key(&request.origin, &scope, adapter.kind().code());
            match self.cache.get_flights(&key).await {
                Some(flights) if !flights.is_empty() => {
                    debug!(provider = %adapter.kind(), records = flights.len(), "serving provider from cache");
                    cached_flights.extend(flights);
                }
                _ => missing.push(adapter),
            }
        }

        let cache_hit = missing.is_empty();
        let (live_flights, succeeded, failed) = if cache_hit {
            (Vec::new(), 0, 0)
        } else {
            self.fetch_missing(&request, &scope, missing).await
        };

        let mut merged = cached_flights;
        merged.extend(live_flights);

        let (mut flights, best_value) =
            filter::apply_filters_and_best(merged, &request, &self.scoring);
        sort::sort_flights(&mut flights, request.sort_key(), request.sort_descending());

        let metadata = SearchMetadata {
            search_id: Uuid::new_v4(),
            total_results: flights.len(),
            providers_queried: succeeded + failed,
            providers_succeeded: succeeded,
            providers_failed: failed,
            search_time_ms: started.elapsed().as_millis() as u64,
            cache_hit,
        };

        Ok(SearchResponse {
            flights,
            search_criteria: SearchCriteria::from(&request),
            metadata,
            best_value,
        })
    }

    /// One task per missing provider; the total wait is bounded by the
    /// slowest adapter's own deadline. Dropping this future aborts every
    /// in-flight task.
    async fn fetch_missing(
        &self,
        request: &SearchRequest,
        scope: &str,
        missing: Vec<Arc<dyn ProviderAdapter>>,
    ) -> (Vec<Flight>, u32, u32) {
        let accumulator = Arc::new(Mutex::new(Vec::new()));
        let succeeded = Arc::new(AtomicU32::new(0));
        let failed = Arc::new(AtomicU32::new(0));

        let mut tasks: JoinSet<FetchOutcome> = JoinSet::new();
        for adapter in missing {
            let request = request.clone();
            let cache = self.cache.clone();
            let key = FlightCache::key(&request.origin, scope, adapter.kind().code());
            let accumulator = accumulator.clone();
            let succeeded = succeeded.clone();
            let failed = failed.clone();

            tasks.spawn(async move {
                let kind = adapter.kind();
                match adapter.fetch(&request).await {
                    Ok(flights) => {
                        let records = flights.len();
                        accumulator.lock().await.extend(flights.iter().cloned());
                        succeeded.fetch_add(1, Ordering::SeqCst);
                        // Best-effort write-back; FlightCache swallows and
                        // logs its own failures.
                        cache.put_flights(&key, &flights).await;
                        FetchOutcome::Fetched {
                            provider: kind,
                            records,
                        }
                    }
                    Err(err) => {
                        error!(provider = %kind, error = %err, "provider fetch failed");
                        failed.fetch_add(1, Ordering::SeqCst);
                        FetchOutcome::Failed { provider: kind }
                    }
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(FetchOutcome::Fetched { provider, records }) => {
                    debug!(%provider, records, "provider fetch complete");
                }
                Ok(FetchOutcome::Failed { provider }) => {
                    debug!(%provider, "provider fetch recorded as failure");
                }
                Err(err) => {
                    error!(error = %err, "provider task aborted");
                    failed.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        let flights = std::mem::take(&mut *accumulator.lock().await);
        (
            flights,
            succeeded.load(Ordering::SeqCst),
            failed.load(Ordering::SeqCst),
        )
    }
}
