//! Booth lookup session: stage navigation, data loading and refresh.
//!
//! `SessionState` is a plain serializable value with synchronous
//! transitions. `SessionController` owns one behind a mutex and runs the
//! gateway fetches between `begin_*` and `apply_*`, never holding the lock
//! across an await.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Manager};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::{OrderStatusDescriptor, StatusCatalog};
use crate::gateway::DataGateway;
use crate::identity::BoothIdentity;
use crate::models::{
    ChecklistBundle, ChecklistItem, ChecklistSummary, Notification, Order, OrderBundle,
    OrderSummary,
};
use crate::notifications;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Intro,
    Welcome,
    Options,
    Orders,
    Checklist,
}

impl Stage {
    fn is_data_view(self) -> bool {
        matches!(self, Stage::Orders | Stage::Checklist)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntroStep {
    pub delay: Duration,
    pub progress: u8,
}

/// Intro animation phases, each delay counted from the previous phase.
pub const INTRO_SEQUENCE: [IntroStep; 4] = [
    IntroStep {
        delay: Duration::from_millis(300),
        progress: 1,
    },
    IntroStep {
        delay: Duration::from_millis(900),
        progress: 2,
    },
    IntroStep {
        delay: Duration::from_millis(1000),
        progress: 3,
    },
    IntroStep {
        delay: Duration::from_millis(1300),
        progress: 4,
    },
];

/// Pause after the last intro phase before the welcome screen.
pub const WELCOME_HOLD: Duration = Duration::from_millis(1000);

/// Identifies the fetch a response belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub stage: Stage,
    pub booth_number: String,
    pub force_refresh: bool,
    seq: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    /// Bumped on every controller update; snapshots order by it.
    #[serde(default)]
    pub revision: u64,
    pub stage: Stage,
    pub intro_progress: u8,
    pub booth_number: String,
    pub exhibitor_name: String,
    pub orders: Vec<Order>,
    pub notifications: Vec<Notification>,
    pub checklist_items: Vec<ChecklistItem>,
    pub checklist_section: String,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    fetch_seq: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            revision: 0,
            stage: Stage::Intro,
            intro_progress: 0,
            booth_number: String::new(),
            exhibitor_name: String::new(),
            orders: Vec::new(),
            notifications: Vec::new(),
            checklist_items: Vec::new(),
            checklist_section: String::new(),
            loading: false,
            last_updated: None,
            fetch_seq: 0,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_intro(&mut self, progress: u8) -> bool {
        if self.stage != Stage::Intro || progress <= self.intro_progress {
            return false;
        }
        self.intro_progress = progress.min(INTRO_SEQUENCE.len() as u8);
        true
    }

    pub fn complete_intro(&mut self) -> bool {
        if self.stage != Stage::Intro {
            return false;
        }
        self.intro_progress = INTRO_SEQUENCE.len() as u8;
        self.stage = Stage::Welcome;
        true
    }

    /// Welcome -> options. Blank input is ignored. Entering a different
    /// booth drops the previous booth's data.
    pub fn submit_booth(&mut self, input: &str) -> bool {
        let booth_number = input.trim();
        if self.stage != Stage::Welcome || booth_number.is_empty() {
            return false;
        }
        if booth_number != self.booth_number {
            self.clear_booth_data();
            self.booth_number = booth_number.to_string();
        }
        self.stage = Stage::Options;
        true
    }

    /// Options -> orders or checklist, starting that view's fetch.
    pub fn begin_view(&mut self, stage: Stage) -> Option<FetchTicket> {
        if self.stage != Stage::Options || !stage.is_data_view() || self.booth_number.is_empty() {
            return None;
        }
        self.stage = stage;
        Some(self.issue_ticket(false))
    }

    /// Re-fetch the active view bypassing server caches. Rejected while a
    /// fetch is in flight or outside a data view.
    pub fn begin_refresh(&mut self) -> Option<FetchTicket> {
        if self.loading || self.booth_number.is_empty() || !self.stage.is_data_view() {
            return None;
        }
        Some(self.issue_ticket(true))
    }

    /// Data view -> options, options -> welcome. Any fetch in flight is
    /// abandoned; its response will be stale.
    pub fn go_back(&mut self) -> bool {
        let target = match self.stage {
            Stage::Orders | Stage::Checklist => Stage::Options,
            Stage::Options => Stage::Welcome,
            Stage::Intro | Stage::Welcome => return false,
        };
        self.stage = target;
        self.loading = false;
        true
    }

    /// A response may only land on the stage, booth and fetch it was
    /// requested for.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.stage == ticket.stage
            && self.booth_number == ticket.booth_number
            && self.fetch_seq == ticket.seq
    }

    pub fn apply_orders(&mut self, ticket: &FetchTicket, bundle: OrderBundle) -> bool {
        if ticket.stage != Stage::Orders || !self.is_current(ticket) {
            return false;
        }
        self.notifications = notifications::synthesize(&bundle.orders);
        self.orders = bundle.orders;
        self.exhibitor_name = bundle.exhibitor_name;
        self.last_updated = Some(bundle.last_updated);
        self.loading = false;
        true
    }

    pub fn apply_checklist(&mut self, ticket: &FetchTicket, bundle: ChecklistBundle) -> bool {
        if ticket.stage != Stage::Checklist || !self.is_current(ticket) {
            return false;
        }
        self.checklist_items = bundle.items;
        self.checklist_section = bundle.section;
        self.exhibitor_name = bundle.exhibitor_name;
        self.last_updated = Some(bundle.last_updated);
        self.loading = false;
        true
    }

    fn issue_ticket(&mut self, force_refresh: bool) -> FetchTicket {
        self.fetch_seq += 1;
        self.loading = true;
        FetchTicket {
            stage: self.stage,
            booth_number: self.booth_number.clone(),
            force_refresh,
            seq: self.fetch_seq,
        }
    }

    fn clear_booth_data(&mut self) {
        self.exhibitor_name.clear();
        self.orders.clear();
        self.notifications.clear();
        self.checklist_items.clear();
        self.checklist_section.clear();
        self.last_updated = None;
    }
}

/// Session state plus everything the screens derive from it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub state: SessionState,
    pub identity: Option<BoothIdentity>,
    pub order_statuses: Vec<&'static OrderStatusDescriptor>,
    pub order_summary: OrderSummary,
    pub checklist_summary: ChecklistSummary,
}

impl From<SessionState> for SessionView {
    fn from(state: SessionState) -> Self {
        let identity = (!state.booth_number.is_empty())
            .then(|| BoothIdentity::derive(&state.exhibitor_name, &state.booth_number));
        let order_statuses = state
            .orders
            .iter()
            .map(|order| StatusCatalog::descriptor(&order.status))
            .collect();

        SessionView {
            identity,
            order_statuses,
            order_summary: OrderSummary::from_orders(&state.orders),
            checklist_summary: ChecklistSummary::from_items(&state.checklist_items),
            state,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session state lock poisoned")]
    Poisoned,
}

type Observer = Box<dyn Fn(&SessionState) + Send + Sync>;

pub struct SessionController {
    state: Mutex<SessionState>,
    gateway: DataGateway,
    observer: Option<Observer>,
}

impl SessionController {
    pub fn new(gateway: DataGateway) -> Self {
        Self {
            state: Mutex::new(SessionState::new()),
            gateway,
            observer: None,
        }
    }

    /// Called with a snapshot after every state change, while the state
    /// lock is held. It must not call back into the controller.
    pub fn with_observer(mut self, observer: impl Fn(&SessionState) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn gateway(&self) -> &DataGateway {
        &self.gateway
    }

    pub fn snapshot(&self) -> Result<SessionState, SessionError> {
        let state = self.state.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(state.clone())
    }

    pub fn submit_booth(&self, input: &str) -> Result<SessionState, SessionError> {
        let (accepted, state) = self.update(|s| s.submit_booth(input))?;
        if accepted {
            info!(booth = %state.booth_number, "booth selected");
        }
        Ok(state)
    }

    pub fn go_back(&self) -> Result<SessionState, SessionError> {
        let (_, state) = self.update(SessionState::go_back)?;
        Ok(state)
    }

    pub async fn open_view(&self, stage: Stage) -> Result<SessionState, SessionError> {
        let (ticket, state) = self.update(|s| s.begin_view(stage))?;
        match ticket {
            Some(ticket) => self.run_fetch(ticket).await,
            None => Ok(state),
        }
    }

    pub async fn refresh(&self) -> Result<SessionState, SessionError> {
        let (ticket, state) = self.update(SessionState::begin_refresh)?;
        match ticket {
            Some(ticket) => self.run_fetch(ticket).await,
            None => {
                debug!(loading = state.loading, stage = ?state.stage, "refresh ignored");
                Ok(state)
            }
        }
    }

    /// Step through the intro phases, then land on the welcome stage.
    pub async fn play_intro(&self) -> Result<SessionState, SessionError> {
        for step in INTRO_SEQUENCE {
            tokio::time::sleep(step.delay).await;
            self.update(|s| s.advance_intro(step.progress))?;
        }
        tokio::time::sleep(WELCOME_HOLD).await;
        let (_, state) = self.update(SessionState::complete_intro)?;
        Ok(state)
    }

    async fn run_fetch(&self, ticket: FetchTicket) -> Result<SessionState, SessionError> {
        let applied_state = match ticket.stage {
            Stage::Orders => {
                let bundle = self
                    .gateway
                    .fetch_orders(&ticket.booth_number, ticket.force_refresh)
                    .await;
                self.update(|s| s.apply_orders(&ticket, bundle))?
            }
            _ => {
                let bundle = self
                    .gateway
                    .fetch_checklist(&ticket.booth_number, ticket.force_refresh)
                    .await;
                self.update(|s| s.apply_checklist(&ticket, bundle))?
            }
        };

        let (applied, state) = applied_state;
        if !applied {
            debug!(
                booth = %ticket.booth_number,
                stage = ?ticket.stage,
                "discarding stale response"
            );
        }
        Ok(state)
    }

    fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> Result<(R, SessionState), SessionError> {
        let mut state = self.state.lock().map_err(|_| SessionError::Poisoned)?;
        let result = f(&mut state);
        state.revision += 1;
        let snapshot = state.clone();
        // Notify before unlocking so observers see snapshots in revision order.
        if let Some(observer) = &self.observer {
            observer(&snapshot);
        }
        Ok((result, snapshot))
    }
}

pub trait SessionExt {
    fn session(&self) -> &SessionController;
}

impl SessionExt for AppHandle {
    fn session(&self) -> &SessionController {
        self.state::<SessionController>().inner()
    }
}
