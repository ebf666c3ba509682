use std::future::Future;

use log::{error, info};
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::sync::watch;

use crate::api::HttpGateway;
use crate::config::AppConfig;
use crate::error::{ChooseeError, Result};
use crate::models::place::PlaceTypeDisplay;
use crate::models::session::{NewSession, RankBy};
use crate::models::user::LoggedInUser;
use crate::voting::task::{spawn_controller, Command, ControllerHandle};
use crate::voting::{PollSettings, VotingController, VotingSnapshot};

/// Result of a request running on the runtime, checked once per frame.
pub struct Pending<T> {
    rx: oneshot::Receiver<Result<T>>,
}

impl<T: Send + 'static> Pending<T> {
    pub fn spawn<F>(runtime: &Handle, future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        runtime.spawn(async move {
            let _ = tx.send(future.await);
        });
        Self { rx }
    }

    pub fn poll(&mut self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(ChooseeError::Cancelled)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SubmitPhone,
    Choose { name: String, is_positive: bool },
    Refresh,
    MakeNewChoices,
    CreateSession,
    LookupAddress,
}

pub struct HomeForm {
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    pub radius_miles: String,
    pub place_type: String,
    pub rank_by: RankBy,
    pub voter_count: String,
    pub place_types: Vec<PlaceTypeDisplay>,
    pub message: Option<String>,
}

impl Default for HomeForm {
    fn default() -> Self {
        Self {
            address: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            radius_miles: "5".to_owned(),
            place_type: "restaurant".to_owned(),
            rank_by: RankBy::Prominence,
            voter_count: "2".to_owned(),
            place_types: Vec::new(),
            message: None,
        }
    }
}

impl HomeForm {
    pub fn to_new_session(&self) -> Result<NewSession> {
        let radius_miles = self
            .radius_miles
            .trim()
            .parse::<f64>()
            .map_err(|_| ChooseeError::InvalidInput("Radius must be a number".to_owned()))?;
        let voter_count = self
            .voter_count
            .trim()
            .parse::<u32>()
            .map_err(|_| ChooseeError::InvalidInput("Voter count must be a number".to_owned()))?;
        NewSession::from_form(
            &self.address,
            radius_miles,
            &self.place_type,
            self.rank_by,
            voter_count,
        )
    }

    fn coordinates(&self) -> Result<(f64, f64)> {
        let parse = |raw: &str| raw.trim().parse::<f64>().ok();
        match (parse(&self.latitude), parse(&self.longitude)) {
            (Some(lat), Some(lon)) if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) => {
                Ok((lat, lon))
            }
            _ => Err(ChooseeError::InvalidInput(
                "Enter a latitude and longitude".to_owned(),
            )),
        }
    }
}

pub struct SessionView {
    pub session_id: String,
    pub phone: String,
    pub phone_error: Option<String>,
    handle: ControllerHandle,
    snapshot: watch::Receiver<VotingSnapshot>,
}

impl SessionView {
    pub fn snapshot(&self) -> VotingSnapshot {
        self.snapshot.borrow().clone()
    }
}

pub enum Route {
    Home,
    Session(SessionView),
}

pub struct AppState {
    pub config: AppConfig,
    pub route: Route,
    pub home: HomeForm,
    runtime: Handle,
    gateway: HttpGateway,
    creating: Option<Pending<String>>,
    geocoding: Option<Pending<String>>,
    loading_types: Option<Pending<Vec<PlaceTypeDisplay>>>,
}

impl AppState {
    pub fn new(config: AppConfig, runtime: Handle) -> Self {
        let gateway = HttpGateway::from_config(&config);
        let loading_types = {
            let gateway = gateway.clone();
            Pending::spawn(&runtime, async move { gateway.place_types().await })
        };
        Self {
            config,
            route: Route::Home,
            home: HomeForm::default(),
            runtime,
            gateway,
            creating: None,
            geocoding: None,
            loading_types: Some(loading_types),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.creating.is_some() || self.geocoding.is_some()
    }

    /// Starts a controller for `session_id`. Without a `user` the configured
    /// identity is used, and failing that the view asks for a phone number.
    pub fn open_session(&mut self, session_id: String, user: Option<LoggedInUser>) {
        let controller = VotingController::new(
            self.gateway.clone(),
            session_id.clone(),
            PollSettings::from(&self.config),
        );
        let (handle, snapshot) = {
            let _guard = self.runtime.enter();
            spawn_controller(controller)
        };

        let user = user.or_else(|| {
            self.config
                .user_id
                .clone()
                .map(|user_id| LoggedInUser::Authenticated { user_id })
        });
        if let Some(user) = user {
            handle.send(Command::Login(user));
        }

        info!("Opened session {}", session_id);
        self.route = Route::Session(SessionView {
            session_id,
            phone: String::new(),
            phone_error: None,
            handle,
            snapshot,
        });
    }

    pub fn dispatch(&mut self, action: UiAction) {
        match action {
            UiAction::SubmitPhone => self.submit_phone(),
            UiAction::Choose { name, is_positive } => {
                self.send(Command::Choose { name, is_positive });
            }
            UiAction::Refresh => self.send(Command::Refresh),
            UiAction::MakeNewChoices => self.make_new_choices(),
            UiAction::CreateSession => self.submit_new_session(),
            UiAction::LookupAddress => self.lookup_address(),
        }
    }

    fn send(&self, command: Command) {
        if let Route::Session(view) = &self.route {
            if !view.handle.send(command) {
                error!("Voting controller for {} is gone", view.session_id);
            }
        }
    }

    fn submit_phone(&mut self) {
        let Route::Session(view) = &mut self.route else {
            return;
        };
        match LoggedInUser::from_phone(&view.phone) {
            Ok(user) => {
                view.phone_error = None;
                view.handle.send(Command::Login(user));
            }
            Err(e) => view.phone_error = Some(e.to_string()),
        }
    }

    /// Leaves the session for the new-session screen. Dropping the view
    /// stops its controller.
    pub fn make_new_choices(&mut self) {
        self.route = Route::Home;
    }

    fn submit_new_session(&mut self) {
        match self.home.to_new_session() {
            Ok(new_session) => {
                self.home.message = None;
                let gateway = self.gateway.clone();
                self.creating = Some(Pending::spawn(&self.runtime, async move {
                    gateway.create_session(&new_session).await
                }));
            }
            Err(e) => self.home.message = Some(e.to_string()),
        }
    }

    fn lookup_address(&mut self) {
        match self.home.coordinates() {
            Ok((latitude, longitude)) => {
                let gateway = self.gateway.clone();
                self.geocoding = Some(Pending::spawn(&self.runtime, async move {
                    gateway.reverse_geocode(latitude, longitude).await
                }));
            }
            Err(e) => self.home.message = Some(e.to_string()),
        }
    }

    /// Applies any requests that finished since the last frame.
    pub fn poll_pending(&mut self) {
        if let Some(result) = self.loading_types.as_mut().and_then(Pending::poll) {
            self.loading_types = None;
            match result {
                Ok(types) => self.home.place_types = types,
                Err(e) => error!("Failed to load place types: {}", e),
            }
        }

        if let Some(result) = self.geocoding.as_mut().and_then(Pending::poll) {
            self.geocoding = None;
            match result {
                Ok(address) => self.home.address = address,
                Err(e) => self.home.message = Some(format!("Unable to find address: {}", e)),
            }
        }

        if let Some(result) = self.creating.as_mut().and_then(Pending::poll) {
            self.creating = None;
            match result {
                Ok(session_id) => self.open_session(session_id, None),
                Err(e) => {
                    self.home.message = Some(format!("Error creating session: {}", e));
                }
            }
        }
    }
}
