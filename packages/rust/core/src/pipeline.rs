//! End-to-end reporting run: scope → fetch → normalize → classify →
//! aggregate → render.
//!
//! Stages advance strictly in order; only the fetching stage can take the
//! run to `Failed`. Later-stage errors are programming defects and
//! propagate as hard errors instead of a run status.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::{NaiveDate, Utc};
use tracing::{info, instrument, warn};

use shiftscope_aggregate::{BucketSummary, StopWords, group, summarize};
use shiftscope_classify::{Classification, ClassifySettings, Roster, classify_all};
use shiftscope_fetcher::{FetchOutcome, SearchClient};
use shiftscope_normalize::normalize_all;
use shiftscope_report::{
    render_bucket_artifacts, render_shift_artifact, single_conversation_label,
};
use shiftscope_shared::{
    AppConfig, AreaKey, AreaScope, Artifact, ArtifactKind, BucketKey, Conversation, ReportWindow,
    Result, RunStatus, ShiftscopeError, TeamScope, UnknownAreaPolicy, reference_timezone,
};

use crate::window::last_full_week;

// ---------------------------------------------------------------------------
// Run request & scope
// ---------------------------------------------------------------------------

/// What a caller asks for. Narrowing fields are optional; the default is a
/// full sweep over the last full calendar week.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Target one conversation instead of a window.
    pub conversation_id: Option<String>,
    /// Explicit window start day (requires `end`).
    pub start: Option<NaiveDate>,
    /// Explicit window end day (requires `start`).
    pub end: Option<NaiveDate>,
    /// Restrict rendering to one team.
    pub team: Option<String>,
    /// Restrict rendering to one area.
    pub area: Option<AreaKey>,
    /// Opaque delivery parameters, passed through to the outcome untouched.
    pub delivery: Option<serde_json::Value>,
}

/// Resolved fetch scope. Precedence: conversation id, then explicit window,
/// then the default last-full-week window.
#[derive(Debug, Clone)]
enum FetchScope {
    Single(String),
    Window(ReportWindow),
}

// ---------------------------------------------------------------------------
// Stages, progress, abort
// ---------------------------------------------------------------------------

/// Pipeline stages in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    Fetching,
    Normalizing,
    Classifying,
    Aggregating,
    Rendering,
    Done,
    Failed,
}

impl std::fmt::Display for RunStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStage::Idle => "idle",
            RunStage::Fetching => "fetching",
            RunStage::Normalizing => "normalizing",
            RunStage::Classifying => "classifying",
            RunStage::Aggregating => "aggregating",
            RunStage::Rendering => "rendering",
            RunStage::Done => "done",
            RunStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new stage.
    fn stage(&self, stage: RunStage);
    /// Called when a bucket's artifacts are rendered.
    fn bucket_rendered(&self, name: &str, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, outcome: &RunOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn stage(&self, _stage: RunStage) {}
    fn bucket_rendered(&self, _name: &str, _current: usize, _total: usize) {}
    fn done(&self, _outcome: &RunOutcome) {}
}

/// Cooperative abort handle, checked at stage boundaries. In-flight
/// requests finish before the run stops.
#[derive(Debug, Clone, Default)]
pub struct RunAbort(Arc<AtomicBool>);

impl RunAbort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<()> {
        if self.is_aborted() {
            Err(ShiftscopeError::validation("run aborted"))
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Run outcome
// ---------------------------------------------------------------------------

/// Result of a reporting run.
#[derive(Debug)]
pub struct RunOutcome {
    pub status: RunStatus,
    /// Rendered artifacts; empty for `NoData`, `NoFilesForTarget`, `Failed`.
    pub artifacts: Vec<Artifact>,
    /// Conversations that survived normalization.
    pub conversation_count: usize,
    /// Fetch error message when `status` is `Failed`.
    pub error: Option<String>,
    /// The request's delivery parameters, untouched.
    pub delivery: Option<serde_json::Value>,
    pub elapsed: Duration,
}

impl RunOutcome {
    /// Artifact counts by kind.
    pub fn counts(&self) -> BTreeMap<ArtifactKind, usize> {
        let mut counts = BTreeMap::new();
        for artifact in &self.artifacts {
            *counts.entry(artifact.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn artifact_names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.name.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Render plan
// ---------------------------------------------------------------------------

/// Which buckets a run renders, derived from the request and the
/// eligibility matrix before any fetching.
#[derive(Debug)]
struct RenderPlan {
    team: TeamScope,
    /// Per-area bucket keys in render order.
    area_keys: Vec<BucketKey>,
    /// The team's ALL-area roll-up bucket.
    total_key: BucketKey,
    /// An explicit area request narrows the run to the area buckets alone:
    /// status is judged on them, and neither the ALL-areas pair nor the
    /// end-of-shift document is rendered.
    narrowed_to_area: bool,
}

fn plan_render(
    request: &RunRequest,
    roster: &Roster,
    policy: UnknownAreaPolicy,
) -> Result<RenderPlan> {
    let (team, areas): (TeamScope, Vec<AreaKey>) = match &request.team {
        Some(name) => {
            let spec = roster
                .find(name)
                .ok_or_else(|| ShiftscopeError::config(format!("unknown team: {name}")))?;
            let areas = spec.scoped_areas(request.area)?;
            (TeamScope::Team(spec.name.clone()), areas)
        }
        None => {
            let areas = match request.area {
                Some(area) => vec![area],
                None => {
                    let mut areas = AreaKey::STANDARD.to_vec();
                    // Coerced conversations land in Other; give them a bucket.
                    if policy == UnknownAreaPolicy::Other {
                        areas.push(AreaKey::Other);
                    }
                    areas
                }
            };
            (TeamScope::All, areas)
        }
    };

    Ok(RenderPlan {
        area_keys: areas
            .iter()
            .map(|&a| BucketKey::new(team.clone(), AreaScope::Area(a)))
            .collect(),
        total_key: BucketKey::new(team.clone(), AreaScope::All),
        narrowed_to_area: request.area.is_some(),
        team,
    })
}

// ---------------------------------------------------------------------------
// Scope resolution
// ---------------------------------------------------------------------------

fn resolve_scope(request: &RunRequest, config: &AppConfig) -> Result<FetchScope> {
    let has_window = request.start.is_some() || request.end.is_some();

    if let Some(id) = &request.conversation_id {
        if has_window {
            // Ambiguous: the two scopes imply different fetch strategies.
            return Err(ShiftscopeError::config(
                "conversation id and date range are mutually exclusive",
            ));
        }
        return Ok(FetchScope::Single(id.clone()));
    }

    let tz = reference_timezone(config)?;
    match (request.start, request.end) {
        (Some(start), Some(end)) => Ok(FetchScope::Window(ReportWindow::from_days(tz, start, end)?)),
        (None, None) => Ok(FetchScope::Window(last_full_week(tz, Utc::now())?)),
        _ => Err(ShiftscopeError::config(
            "start and end dates must be given together",
        )),
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run a full reporting pipeline.
#[instrument(skip_all, fields(team = ?request.team, area = ?request.area))]
pub async fn run(
    config: &AppConfig,
    request: &RunRequest,
    client: &SearchClient,
    progress: &dyn ProgressReporter,
    abort: &RunAbort,
) -> Result<RunOutcome> {
    let start_time = Instant::now();
    progress.stage(RunStage::Idle);

    // Configuration errors fail fast, before any fetching.
    let scope = resolve_scope(request, config)?;
    let plan = plan_render(request, &Roster::default(), config.classify.unknown_area_policy)?;
    let stop_words = StopWords::new(&config.classify.extra_stop_words);

    let (label, period) = match &scope {
        FetchScope::Single(id) => (single_conversation_label(id), format!("conversation {id}")),
        FetchScope::Window(window) => (window.file_label(), window.human_label()),
    };

    info!(label = %label, "starting reporting run");

    // --- Fetching ---
    abort.check()?;
    progress.stage(RunStage::Fetching);

    let fetched = match &scope {
        FetchScope::Single(id) => match client.fetch_one(id).await {
            Ok(FetchOutcome::Found(record)) => vec![*record],
            Ok(FetchOutcome::NotFound) => {
                return Ok(failed_outcome(
                    ShiftscopeError::NotFound { id: id.clone() },
                    request,
                    start_time,
                    progress,
                ));
            }
            Err(e) => return Ok(failed_outcome(e, request, start_time, progress)),
        },
        FetchScope::Window(window) => match client.search(window).await {
            Ok(records) => records,
            Err(e) => return Ok(failed_outcome(e, request, start_time, progress)),
        },
    };

    // The team directory enriches classification; losing it degrades to
    // Unclassified, it does not fail the run.
    let team_directory = match client.fetch_teams().await {
        Ok(directory) => directory,
        Err(e) => {
            warn!(error = %e, "team directory unavailable");
            BTreeMap::new()
        }
    };

    // --- Normalizing ---
    abort.check()?;
    progress.stage(RunStage::Normalizing);
    let conversations = normalize_all(&fetched);

    if conversations.is_empty() {
        info!("no conversations in scope");
        let outcome = RunOutcome {
            status: RunStatus::NoData,
            artifacts: Vec::new(),
            conversation_count: 0,
            error: None,
            delivery: request.delivery.clone(),
            elapsed: start_time.elapsed(),
        };
        progress.done(&outcome);
        return Ok(outcome);
    }

    // --- Classifying ---
    abort.check()?;
    progress.stage(RunStage::Classifying);
    let settings = ClassifySettings::from_policy(&config.classify, team_directory);
    let classifications = classify_all(&conversations, &settings);

    // --- Aggregating ---
    abort.check()?;
    progress.stage(RunStage::Aggregating);
    let buckets = group(&conversations, &classifications);

    let summarize_key = |key: &BucketKey| -> BucketSummary {
        let members = buckets.get(key).cloned().unwrap_or_default();
        summarize(
            key.clone(),
            members,
            &conversations,
            &stop_words,
            config.defaults.keyword_limit,
        )
    };

    let area_summaries: Vec<BucketSummary> = plan.area_keys.iter().map(&summarize_key).collect();
    let total_summary = summarize_key(&plan.total_key);

    // Data exists, but none of it reaches the requested target. Judged on
    // the narrowed buckets: the area buckets when an area was named, the
    // team's ALL-area roll-up when only a team was.
    let target_missed = if plan.narrowed_to_area {
        area_summaries.iter().all(|s| s.is_empty())
    } else {
        matches!(plan.team, TeamScope::Team(_)) && total_summary.is_empty()
    };
    if target_missed {
        info!("no conversations for requested target");
        let outcome = RunOutcome {
            status: RunStatus::NoFilesForTarget,
            artifacts: Vec::new(),
            conversation_count: conversations.len(),
            error: None,
            delivery: request.delivery.clone(),
            elapsed: start_time.elapsed(),
        };
        progress.done(&outcome);
        return Ok(outcome);
    }

    // --- Rendering ---
    abort.check()?;
    progress.stage(RunStage::Rendering);

    let mut artifacts = render_artifacts(
        &plan,
        &area_summaries,
        &total_summary,
        &conversations,
        &classifications,
        &scope,
        &label,
        &period,
        config.defaults.example_summaries,
        progress,
    )?;
    artifacts.sort_by(|a, b| a.name.cmp(&b.name));

    progress.stage(RunStage::Done);
    let outcome = RunOutcome {
        status: RunStatus::Success,
        artifacts,
        conversation_count: conversations.len(),
        error: None,
        delivery: request.delivery.clone(),
        elapsed: start_time.elapsed(),
    };
    progress.done(&outcome);

    info!(
        status = %outcome.status,
        artifacts = outcome.artifacts.len(),
        conversations = outcome.conversation_count,
        elapsed_ms = outcome.elapsed.as_millis(),
        "reporting run complete"
    );

    Ok(outcome)
}

#[allow(clippy::too_many_arguments)]
fn render_artifacts(
    plan: &RenderPlan,
    area_summaries: &[BucketSummary],
    total_summary: &BucketSummary,
    conversations: &[Conversation],
    classifications: &[Classification],
    scope: &FetchScope,
    label: &str,
    period: &str,
    example_limit: usize,
    progress: &dyn ProgressReporter,
) -> Result<Vec<Artifact>> {
    let mut artifacts = Vec::new();

    match scope {
        // A single-conversation run renders just the conversation's own
        // area bucket (if any) plus the global roll-up.
        FetchScope::Single(_) => {
            debug_assert_eq!(conversations.len(), 1);
            let mut rendered: Vec<&BucketSummary> = Vec::new();
            if let Some(area) = classifications.first().and_then(|c| c.area) {
                if let Some(summary) = area_summaries
                    .iter()
                    .find(|s| s.key.area == AreaScope::Area(area))
                {
                    rendered.push(summary);
                }
            }
            if !plan.narrowed_to_area {
                rendered.push(total_summary);
            }

            let total = rendered.len();
            for (i, summary) in rendered.into_iter().enumerate() {
                let batch =
                    render_bucket_artifacts(summary, conversations, label, period, example_limit)?;
                progress.bucket_rendered(&summary.key.to_string(), i + 1, total);
                artifacts.extend(batch);
            }
        }
        FetchScope::Window(_) => {
            let total = area_summaries.len() + usize::from(!plan.narrowed_to_area);
            for (i, summary) in area_summaries.iter().enumerate() {
                let batch =
                    render_bucket_artifacts(summary, conversations, label, period, example_limit)?;
                progress.bucket_rendered(&summary.key.to_string(), i + 1, total);
                artifacts.extend(batch);
            }

            if !plan.narrowed_to_area {
                let batch = render_bucket_artifacts(
                    total_summary,
                    conversations,
                    label,
                    period,
                    example_limit,
                )?;
                progress.bucket_rendered(&total_summary.key.to_string(), total, total);
                artifacts.extend(batch);

                let refs: Vec<&BucketSummary> = area_summaries.iter().collect();
                artifacts.push(render_shift_artifact(
                    &plan.team,
                    &refs,
                    total_summary,
                    label,
                    period,
                ));
            }
        }
    }

    Ok(artifacts)
}

fn failed_outcome(
    error: ShiftscopeError,
    request: &RunRequest,
    start_time: Instant,
    progress: &dyn ProgressReporter,
) -> RunOutcome {
    warn!(error = %error, "fetch stage failed");
    progress.stage(RunStage::Failed);
    let outcome = RunOutcome {
        status: RunStatus::Failed,
        artifacts: Vec::new(),
        conversation_count: 0,
        error: Some(error.to_string()),
        delivery: request.delivery.clone(),
        elapsed: start_time.elapsed(),
    };
    progress.done(&outcome);
    outcome
}
