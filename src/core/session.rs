use crate::domain::model::{AuthSession, User};
use crate::domain::ports::AuthProvider;
use crate::utils::error::{PlannerError, Result};
use std::sync::Mutex;
use tokio::sync::watch;

pub const EMAIL_NOT_CONFIRMED: &str = "Please confirm your email address before signing in";
pub const CONFIRMATION_PENDING: &str = "Please check your email for confirmation link";

/// Who is signed in, passed explicitly to whatever needs to know.
///
/// Created at start-up, filled by [`Session::restore`] or a sign-in, and torn
/// down by [`Session::sign_out`]. Every change of user is published on a
/// watch channel so views can re-render.
pub struct Session<A: AuthProvider> {
    provider: A,
    state: Mutex<State>,
    changes: watch::Sender<Option<User>>,
}

#[derive(Default)]
struct State {
    auth: Option<AuthSession>,
    loading: bool,
    error: Option<String>,
}

impl<A: AuthProvider> Session<A> {
    pub fn new(provider: A) -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            provider,
            state: Mutex::new(State {
                loading: true,
                ..State::default()
            }),
            changes,
        }
    }

    /// Picks up a session persisted by the provider. Ends the loading phase
    /// whatever the outcome.
    pub async fn restore(&self) -> Result<Option<User>> {
        let restored = self.provider.current_session().await;
        let user = match restored {
            Ok(auth) => {
                let user = auth.as_ref().map(|a| a.user.clone());
                self.update(|s| {
                    s.auth = auth;
                    s.loading = false;
                });
                user
            }
            Err(e) => {
                tracing::error!("Could not restore session: {}", e);
                self.update(|s| s.loading = false);
                return Err(e);
            }
        };
        self.publish();
        Ok(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        self.update(|s| s.error = None);

        let auth = match self.provider.sign_in_with_password(email, password).await {
            Ok(auth) => auth,
            Err(e) => return Err(self.fail(e)),
        };

        if !auth.user.is_confirmed() {
            return Err(self.fail(PlannerError::AuthError {
                message: EMAIL_NOT_CONFIRMED.to_string(),
            }));
        }

        let user = auth.user.clone();
        tracing::info!("🔑 Signed in as {}", user.email);
        self.update(|s| {
            s.auth = Some(auth);
            s.loading = false;
        });
        self.publish();
        Ok(user)
    }

    /// Registers a new account. An account still waiting for email
    /// confirmation is not an error, but leaves a message in the error slot.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<User> {
        self.update(|s| s.error = None);

        let outcome = match self.provider.sign_up(email, password).await {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.fail(e)),
        };

        if !outcome.user.is_confirmed() {
            self.update(|s| s.error = Some(CONFIRMATION_PENDING.to_string()));
        }

        if let Some(auth) = outcome.session.filter(|a| a.user.is_confirmed()) {
            self.update(|s| s.auth = Some(auth));
            self.publish();
        }
        Ok(outcome.user)
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.update(|s| s.error = None);

        if let Some(token) = self.access_token() {
            if let Err(e) = self.provider.sign_out(&token).await {
                return Err(self.fail(e));
            }
        }

        tracing::info!("👋 Signed out");
        self.update(|s| s.auth = None);
        self.publish();
        Ok(())
    }

    pub fn user(&self) -> Option<User> {
        self.read(|s| s.auth.as_ref().map(|a| a.user.clone()))
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(|s| s.auth.as_ref().map(|a| a.access_token.clone()))
    }

    pub fn error(&self) -> Option<String> {
        self.read(|s| s.error.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.read(|s| s.loading)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.changes.subscribe()
    }

    fn fail(&self, e: PlannerError) -> PlannerError {
        let message = e.user_friendly_message();
        tracing::error!("Authentication error: {}", message);
        self.update(|s| s.error = Some(message));
        e
    }

    fn publish(&self) {
        self.changes.send_replace(self.user());
    }

    fn update(&self, f: impl FnOnce(&mut State)) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut state);
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        f(&state)
    }
}
