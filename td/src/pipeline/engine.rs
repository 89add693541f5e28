//! Pipeline engine - runs the four stages and checkpoints the result

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{format_amount, HistoryEntry, TripState};
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message};
use crate::search::SearchClient;
use crate::state::{StateError, StateManager};

/// Budget below this gets an advisory instead of a generated itinerary
const LOW_BUDGET_THRESHOLD: f64 = 500.0;

/// Fixed allocation ratios for the budget split
const TRAVEL_RATIO: f64 = 0.4;
const ACCOMMODATION_RATIO: f64 = 0.3;
const ATTRACTIONS_RATIO: f64 = 0.2;
const FOOD_RATIO: f64 = 0.3;

/// Errors from a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Budget must be a positive number.")]
    InvalidBudget,

    #[error("Generation error: {0}")]
    Generation(#[from] LlmError),

    #[error("State error: {0}")]
    State(#[from] StateError),
}

/// One trip-planning request, addressed to a thread
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub thread_id: String,
    pub destination: String,
    pub budget: f64,
    pub dates: String,
    pub preferences: String,
}

/// Runs the pipeline stages and persists checkpoints
pub struct PipelineEngine {
    state: StateManager,
    search: Arc<dyn SearchClient>,
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl PipelineEngine {
    pub fn new(
        state: StateManager,
        search: Arc<dyn SearchClient>,
        llm: Arc<dyn LlmClient>,
        max_tokens: u32,
    ) -> Self {
        Self {
            state,
            search,
            llm,
            max_tokens,
        }
    }

    /// Run the full pipeline for a request.
    ///
    /// Loads prior history from the thread's latest checkpoint, runs the four
    /// stages, appends this turn to history, and checkpoints the final state.
    /// An invalid budget fails the run before any state is persisted.
    pub async fn run(&self, request: &TripRequest) -> Result<TripState, PipelineError> {
        debug!(
            thread_id = %request.thread_id,
            destination = %request.destination,
            budget = request.budget,
            "run: called"
        );

        // Budget validation happens before search: a rejected request must
        // leave no trace in the store.
        if !request.budget.is_finite() || request.budget <= 0.0 {
            debug!(budget = request.budget, "run: invalid budget");
            return Err(PipelineError::InvalidBudget);
        }

        let history = self
            .state
            .latest_checkpoint(&request.thread_id)
            .await?
            .map(|cp| cp.state.history)
            .unwrap_or_default();

        let mut state = TripState::from_request(
            request.destination.clone(),
            request.budget,
            request.dates.clone(),
            request.preferences.clone(),
            history,
        );

        self.web_search(&mut state).await;
        self.allocate_budget(&mut state);
        let skip = self.check_budget(&mut state);

        if !skip {
            self.generate_itinerary(&mut state).await?;
        } else {
            debug!("run: itinerary generation skipped for low budget");
        }

        // Record this turn before checkpointing so the persisted state and
        // the returned state carry the same history.
        state.history.push(HistoryEntry::user(format!(
            "Plan a trip to {} with budget {}, dates {}, preferences {}",
            state.destination,
            format_amount(state.budget),
            state.dates,
            state.preferences
        )));
        state.history.push(HistoryEntry::assistant(state.plan.clone()));

        let ts = self.state.append_checkpoint(&request.thread_id, state.clone()).await?;
        debug!(thread_id = %request.thread_id, %ts, "run: checkpoint appended");

        Ok(state)
    }

    /// Search stage: query the web for options matching the request.
    ///
    /// Search failures degrade rather than abort the run; the error text is
    /// kept in the state so the generation stage can see it.
    async fn web_search(&self, state: &mut TripState) {
        let query = format!(
            "Travel option for {} within budget {} for dates {} with preferences {}",
            state.destination,
            format_amount(state.budget),
            state.dates,
            state.preferences
        );
        debug!(%query, "web_search: called");

        match self.search.search(&query).await {
            Ok(result) => {
                state.search_result = result.to_string();
            }
            Err(e) => {
                warn!(error = %e, "web_search: search failed, continuing without results");
                state.search_result = format!("⚠️ API Error: {e}");
            }
        }
    }

    /// Allocation stage: split the budget over the four fixed categories
    fn allocate_budget(&self, state: &mut TripState) {
        debug!(budget = state.budget, "allocate_budget: called");
        let total = state.budget;
        let mut breakdown = BTreeMap::new();
        breakdown.insert("Travel".to_string(), total * TRAVEL_RATIO);
        breakdown.insert("Accommodation".to_string(), total * ACCOMMODATION_RATIO);
        breakdown.insert("Attractions".to_string(), total * ATTRACTIONS_RATIO);
        breakdown.insert("Food and activities".to_string(), total * FOOD_RATIO);
        state.cost_breakdown = breakdown;
    }

    /// Check stage: low budgets get an advisory and skip generation
    fn check_budget(&self, state: &mut TripState) -> bool {
        debug!(budget = state.budget, "check_budget: called");
        if state.budget < LOW_BUDGET_THRESHOLD {
            state.plan = format!(
                "⚠️ Your budget of ${} seems too low for {}.\n\n\
                 👉 Suggestions:\n\
                 - Consider a closer/cheaper destination.\n\
                 - Shorten your trip (dates: {}).\n\
                 - Stay in hostels or budget stays.\n\
                 - Look for off-season travel deals.",
                format_amount(state.budget),
                state.destination,
                state.dates
            );
            state.search_result = "Skipped due to low budget.".to_string();
            state.skip_itinerary = true;
        } else {
            state.skip_itinerary = false;
        }
        state.skip_itinerary
    }

    /// Generation stage: ask the model for a day-by-day itinerary
    async fn generate_itinerary(&self, state: &mut TripState) -> Result<(), PipelineError> {
        debug!(destination = %state.destination, "generate_itinerary: called");

        let cost_breakdown = serde_json::to_string(&state.cost_breakdown).map_err(LlmError::Json)?;
        let prompt = format!(
            "You are a travel assistant. Based on the details, create a detailed day-by-day itinerary.\n\
             Include travel, accommodation, food, and activities only.\n\
             Destination: {}\n\
             Dates: {}\n\
             Preferences: {}\n\
             Web Search Results: {}\n\
             Budget Breakdown: {}",
            state.destination, state.dates, state.preferences, state.search_result, cost_breakdown
        );

        let request = CompletionRequest {
            system_prompt: "You are a travel assistant.".to_string(),
            messages: vec![Message::user(prompt)],
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(request).await?;
        let content = response
            .content
            .ok_or_else(|| LlmError::InvalidResponse("Empty completion".to_string()))?;

        state.plan = content;
        Ok(())
    }
}
