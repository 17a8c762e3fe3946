//! Views of the command line front end.
//!
//! Each command maps to one of the journal's views. Navigation results from
//! the core (`Route`) are reported to the user instead of switching pages.

use anyhow::{bail, Result};
use chrono::{Days, NaiveDate, Utc};
use tokio::sync::broadcast::{error::TryRecvError, Receiver};
use tracing::{debug, warn};

use gratitude_core::auth::{self, SessionEvent};
use gratitude_core::models::EntryForm;
use gratitude_core::{ApiClient, Route};

use crate::render;

pub struct App {
    client: ApiClient,
    events: Receiver<SessionEvent>,
}

impl App {
    pub fn new(client: ApiClient) -> Self {
        let events = client.subscribe();
        Self { client, events }
    }

    fn navigate(&self, route: Route) {
        debug!(%route, "Navigate");
        match route {
            Route::Login => println!("Please sign in: gratitude login"),
            Route::Home => println!("Signed in. Write today's entry with: gratitude add"),
            Route::Entries => println!("Saved. See all entries with: gratitude list"),
            Route::Dashboard => {}
        }
    }

    /// Bounce to the login view when a protected view has no session
    fn require_session(&self, view: Route) -> Result<()> {
        let target = view.resolve(self.client.session().is_authenticated());
        if target != view {
            self.navigate(target);
            bail!("Not signed in");
        }
        Ok(())
    }

    /// Report session changes published while a command ran
    pub fn drain_session_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(SessionEvent::Expired { redirect }) => {
                    println!("Your session has expired.");
                    self.navigate(redirect);
                }
                Ok(SessionEvent::SignedOut { .. }) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Missed session events");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    pub fn login(&self, credential: &str, refresh_token: Option<String>) -> Result<()> {
        let route = Route::Login.resolve(self.client.session().is_authenticated());
        if route != Route::Login {
            println!("Already signed in; replacing the stored session.");
        }
        let route = auth::login(self.client.token_store().as_ref(), credential, refresh_token)?;
        self.navigate(route);
        Ok(())
    }

    pub fn oauth_callback(&self, url: &str) -> Result<()> {
        let route = auth::handle_oauth_callback(url, self.client.token_store().as_ref())?;
        self.navigate(route);
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        let route = self.client.logout()?;
        println!("Signed out.");
        self.navigate(route);
        Ok(())
    }

    pub fn status(&self) {
        let session = self.client.session();
        println!("API: {}", self.client.base_url());
        println!(
            "Signed in: {}{}",
            if session.is_authenticated() { "yes" } else { "no" },
            if session.can_refresh() { " (refresh token stored)" } else { "" }
        );
    }

    pub async fn list(&self) -> Result<()> {
        self.require_session(Route::Entries)?;
        let entries = self.client.list_entries().await?;
        println!("{}", render::entry_list(&entries));
        Ok(())
    }

    pub async fn show(&self, id: &str) -> Result<()> {
        self.require_session(Route::Entries)?;
        let entry = self.client.get_entry(id).await?;
        println!("{}", render::entry_detail(&entry));
        Ok(())
    }

    /// Dashboard: the entry for one day, with neighbours for stepping
    pub async fn day(&self, date: Option<NaiveDate>) -> Result<()> {
        self.require_session(Route::Dashboard)?;
        let date = date.unwrap_or_else(|| Utc::now().date_naive());

        match self.client.get_entry_by_date(date).await? {
            Some(entry) => println!("{}", render::entry_detail(&entry)),
            None => println!("No entry found for {}", date.format("%b %d, %Y")),
        }

        let prev = date.checked_sub_days(Days::new(1));
        let next = date.checked_add_days(Days::new(1));
        if let (Some(prev), Some(next)) = (prev, next) {
            println!("\n< gratitude day {}   gratitude day {} >", prev, next);
        }
        Ok(())
    }

    pub async fn add(&self, form: EntryForm) -> Result<()> {
        self.require_session(Route::Home)?;

        let options = match self.client.value_options().await {
            Ok(options) => options,
            Err(e) => {
                // Same as an empty list: tags go unchecked
                warn!(error = %e, "Failed to fetch general values");
                Default::default()
            }
        };
        let dto = form.validate(&options)?;

        let created = self.client.create_entry(&dto).await?;
        debug!(id = %created.id, "Entry created");
        self.navigate(Route::Entries);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.require_session(Route::Entries)?;
        self.client.delete_entry(id).await?;
        println!("Deleted entry {}", id);
        Ok(())
    }

    pub async fn values(&self) -> Result<()> {
        self.require_session(Route::Home)?;
        let options = self.client.value_options().await?;
        println!("{}", render::value_options(&options));
        Ok(())
    }
}
