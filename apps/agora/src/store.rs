//! # Workspace Store
//!
//! The single owner of the canonical filter/selection state and of the four
//! overview snapshots every view projects from.
//!
//! ## Fetch orchestration
//!
//! Every filter change starts a staged cycle: the two fast overviews
//! (timeline, influence matrix) are issued together and must both settle
//! before `loading` flips off; the two slow overviews (argument evidence,
//! concept clusters) run as independent tasks and publish on their own
//! settlement. A failed request stores its message but never blanks
//! previously-published snapshots — stale data beats an empty screen.
//!
//! ## Generation discipline
//!
//! A new cycle supersedes, never queues. Each cycle carries a monotonically
//! increasing generation; every publish re-checks it under the state lock
//! and a response from a superseded cycle is discarded wholesale. Without
//! this, a slow stale response could overwrite fresher state after the fact.
//!
//! Consumers subscribe for immutable [`WorkspaceSnapshot`]s; nothing ever
//! hands out a reference into shared mutable state.

use crate::client::FetchError;
use agora_core::overview::{
    ArgumentEvidenceOverview, ConceptClusterOverview, InfluenceMatrix, PathRequest, PathResponse,
    TimelineOverview,
};
use agora_core::{FilterPatch, FilterState, SelectionPatch, SelectionState};
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

// =============================================================================
// FETCH COLLABORATOR SEAM
// =============================================================================

/// The external retrieval collaborator the store orchestrates.
///
/// # Extension Point
///
/// The production implementation is the HTTP client; tests drive the store
/// with scripted in-process fakes. Implementors should be stateless with
/// respect to the store — all workspace state lives here.
pub trait OverviewFetcher: Send + Sync + 'static {
    /// Fast: chronological overview.
    fn timeline(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<TimelineOverview, FetchError>> + Send;

    /// Fast: influence matrix overview.
    fn influence_matrix(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<InfluenceMatrix, FetchError>> + Send;

    /// Slow: argument evidence overview.
    fn argument_evidence(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<ArgumentEvidenceOverview, FetchError>> + Send;

    /// Slow: concept cluster overview.
    fn concept_clusters(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<ConceptClusterOverview, FetchError>> + Send;

    /// Path finding is performed server-side; the store only passes through.
    fn compute_path(
        &self,
        request: &PathRequest,
    ) -> impl Future<Output = Result<PathResponse, FetchError>> + Send;
}

/// Forward the fetcher seam through a shared handle, so callers that need to
/// retain the fetcher (tests inspecting recorded calls) can hand the store an
/// `Arc<F>` while keeping their own clone.
impl<F: OverviewFetcher + ?Sized> OverviewFetcher for Arc<F> {
    fn timeline(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<TimelineOverview, FetchError>> + Send {
        (**self).timeline(filters)
    }

    fn influence_matrix(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<InfluenceMatrix, FetchError>> + Send {
        (**self).influence_matrix(filters)
    }

    fn argument_evidence(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<ArgumentEvidenceOverview, FetchError>> + Send {
        (**self).argument_evidence(filters)
    }

    fn concept_clusters(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<ConceptClusterOverview, FetchError>> + Send {
        (**self).concept_clusters(filters)
    }

    fn compute_path(
        &self,
        request: &PathRequest,
    ) -> impl Future<Output = Result<PathResponse, FetchError>> + Send {
        (**self).compute_path(request)
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Where the current fetch cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspacePhase {
    /// No cycle has run yet.
    Idle,
    /// Fast pair in flight.
    Loading,
    /// Fast pair settled, slow pair still in flight.
    PartiallyLoaded,
    /// All four overviews settled.
    Loaded,
    /// At least one request of the current cycle failed.
    Error,
}

/// Immutable view of the workspace published to subscribers.
///
/// Overview snapshots are `Arc`-shared: cloning a workspace snapshot is
/// cheap structural sharing, and a new fetch replaces a snapshot wholesale
/// rather than merging into it.
#[derive(Debug, Clone)]
pub struct WorkspaceSnapshot {
    pub filters: FilterState,
    pub selection: SelectionState,
    pub phase: WorkspacePhase,
    /// True from cycle start until both fast overviews have settled.
    pub loading: bool,
    /// Message of the most recent failure in the current cycle, if any.
    pub error: Option<String>,
    /// Cycle counter; responses from older cycles are never applied.
    pub generation: u64,
    pub timeline: Option<Arc<TimelineOverview>>,
    pub influence: Option<Arc<InfluenceMatrix>>,
    pub evidence: Option<Arc<ArgumentEvidenceOverview>>,
    pub clusters: Option<Arc<ConceptClusterOverview>>,
}

impl Default for WorkspaceSnapshot {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            selection: SelectionState::default(),
            phase: WorkspacePhase::Idle,
            loading: false,
            error: None,
            generation: 0,
            timeline: None,
            influence: None,
            evidence: None,
            clusters: None,
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

struct StoreInner {
    snapshot: WorkspaceSnapshot,
    /// Slow requests of the current cycle that have not settled yet.
    slow_pending: u8,
}

impl StoreInner {
    fn recompute_phase(&mut self) {
        self.snapshot.phase = if self.snapshot.error.is_some() {
            WorkspacePhase::Error
        } else if self.snapshot.loading {
            WorkspacePhase::Loading
        } else if self.slow_pending > 0 {
            WorkspacePhase::PartiallyLoaded
        } else {
            WorkspacePhase::Loaded
        };
    }
}

/// The workspace store. Cheap to clone; all clones share one state.
///
/// Mutation happens only through [`set_filters`](Self::set_filters) /
/// [`update_selection`](Self::update_selection) (and
/// [`refresh`](Self::refresh)); both produce a new normalized value rather
/// than mutating in place. Spawned fetch tasks require a Tokio runtime.
pub struct WorkspaceStore<F> {
    fetcher: Arc<F>,
    inner: Arc<Mutex<StoreInner>>,
    tx: Arc<watch::Sender<WorkspaceSnapshot>>,
}

impl<F> Clone for WorkspaceStore<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            inner: Arc::clone(&self.inner),
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<F: OverviewFetcher> WorkspaceStore<F> {
    /// Create a store in the `Idle` phase. No fetch runs until the first
    /// `set_filters` or `refresh`.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        let snapshot = WorkspaceSnapshot::default();
        let (tx, _rx) = watch::channel(snapshot.clone());
        Self {
            fetcher: Arc::new(fetcher),
            inner: Arc::new(Mutex::new(StoreInner {
                snapshot,
                slow_pending: 0,
            })),
            tx: Arc::new(tx),
        }
    }

    /// Subscribe to workspace snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<WorkspaceSnapshot> {
        self.tx.subscribe()
    }

    /// The current snapshot, cloned out from under the lock.
    #[must_use]
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        lock(&self.inner).snapshot.clone()
    }

    /// Apply a filter patch and start a new fetch cycle. Returns the
    /// generation of that cycle.
    pub fn set_filters(&self, patch: &FilterPatch) -> u64 {
        self.set_filters_with(|prev| patch.apply(prev))
    }

    /// Functional form of `set_filters` for callers that compute the next
    /// state from the previous one.
    pub fn set_filters_with(&self, update: impl FnOnce(&FilterState) -> FilterState) -> u64 {
        let filters = {
            let mut guard = lock(&self.inner);
            let next = update(&guard.snapshot.filters);
            guard.snapshot.filters = next.clone();
            next
        };
        self.begin_cycle(filters)
    }

    /// Apply a selection patch. Selection is a pure client-side concern:
    /// this publishes a snapshot but never fetches.
    pub fn update_selection(&self, patch: &SelectionPatch) {
        let mut guard = lock(&self.inner);
        guard.snapshot.selection = patch.apply(&guard.snapshot.selection);
        let snapshot = guard.snapshot.clone();
        drop(guard);
        let _ = self.tx.send_replace(snapshot);
    }

    /// Re-issue the fetch cycle for the current filters (manual retry).
    pub fn refresh(&self) -> u64 {
        let filters = lock(&self.inner).snapshot.filters.clone();
        self.begin_cycle(filters)
    }

    /// Thin passthrough to the external path-finding service.
    pub async fn compute_path(&self, request: &PathRequest) -> Result<PathResponse, FetchError> {
        self.fetcher.compute_path(request).await
    }

    // =========================================================================
    // FETCH CYCLE
    // =========================================================================

    fn begin_cycle(&self, filters: FilterState) -> u64 {
        let generation = {
            let mut guard = lock(&self.inner);
            guard.snapshot.generation += 1;
            guard.snapshot.loading = true;
            guard.snapshot.error = None;
            guard.slow_pending = 2;
            guard.recompute_phase();
            let snapshot = guard.snapshot.clone();
            drop(guard);
            let _ = self.tx.send_replace(snapshot.clone());
            snapshot.generation
        };

        tracing::debug!(generation, "overview fetch cycle started");

        self.spawn_fast_stage(generation, filters.clone());
        self.spawn_slow_stage(generation, filters);

        generation
    }

    /// Fast pair: issued together, settled together. `loading` flips off
    /// only once both have come back.
    fn spawn_fast_stage(&self, generation: u64, filters: FilterState) {
        let store = self.clone();
        tokio::spawn(async move {
            let (timeline, influence) = tokio::join!(
                store.fetcher.timeline(&filters),
                store.fetcher.influence_matrix(&filters),
            );
            store.apply(generation, |inner| {
                inner.snapshot.loading = false;
                match timeline {
                    Ok(overview) => inner.snapshot.timeline = Some(Arc::new(overview)),
                    Err(e) => record_error(inner, "timeline", &e),
                }
                match influence {
                    Ok(matrix) => inner.snapshot.influence = Some(Arc::new(matrix)),
                    Err(e) => record_error(inner, "influence matrix", &e),
                }
            });
        });
    }

    /// Slow pair: two independent tasks, each publishing on its own
    /// settlement without reopening `loading`. The cluster request is
    /// widened to always include the `concept` kind — clustering is
    /// meaningless without concept nodes.
    fn spawn_slow_stage(&self, generation: u64, filters: FilterState) {
        let store = self.clone();
        let evidence_filters = filters.clone();
        tokio::spawn(async move {
            let result = store.fetcher.argument_evidence(&evidence_filters).await;
            store.apply(generation, |inner| {
                inner.slow_pending = inner.slow_pending.saturating_sub(1);
                match result {
                    Ok(overview) => inner.snapshot.evidence = Some(Arc::new(overview)),
                    Err(e) => record_error(inner, "argument evidence", &e),
                }
            });
        });

        let store = self.clone();
        let cluster_filters = filters.with_node_kind("concept");
        tokio::spawn(async move {
            let result = store.fetcher.concept_clusters(&cluster_filters).await;
            store.apply(generation, |inner| {
                inner.slow_pending = inner.slow_pending.saturating_sub(1);
                match result {
                    Ok(overview) => inner.snapshot.clusters = Some(Arc::new(overview)),
                    Err(e) => record_error(inner, "concept clusters", &e),
                }
            });
        });
    }

    /// Apply a settlement under the lock, but only if its cycle is still
    /// the latest; superseded responses are dropped in their entirety.
    fn apply(&self, generation: u64, settle: impl FnOnce(&mut StoreInner)) {
        let mut guard = lock(&self.inner);
        if guard.snapshot.generation != generation {
            tracing::debug!(
                generation,
                current = guard.snapshot.generation,
                "discarding superseded overview response"
            );
            return;
        }
        settle(&mut guard);
        guard.recompute_phase();
        let snapshot = guard.snapshot.clone();
        drop(guard);
        let _ = self.tx.send_replace(snapshot);
    }
}

/// Capture a request failure without clearing any published snapshot.
fn record_error(inner: &mut StoreInner, what: &str, error: &FetchError) {
    tracing::warn!("{what} overview request failed: {error}");
    inner.snapshot.error = Some(error.to_string());
}

/// Lock helper: a poisoned lock just means a panicking test thread; the
/// state itself is still coherent, so recover the guard.
fn lock(inner: &Mutex<StoreInner>) -> std::sync::MutexGuard<'_, StoreInner> {
    inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// =============================================================================
// TESTS
// =============================================================================
