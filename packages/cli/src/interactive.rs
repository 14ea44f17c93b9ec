//! Interactive comparison session.
//!
//! Filter edits are published on [`FilterEvents::filters_updated`]. The
//! session forwards them into a channel and re-runs the comparison with
//! the latest combination set before showing the menu again.

use dialoguer::{Confirm, Input, MultiSelect, Password, Select};
use hackathon_survey_analysis::default_manifest;
use hackathon_survey_analysis::request::parse_hackathon_ids;
use hackathon_survey_client::HttpClient;
use hackathon_survey_filters_models::FilterCombination;
use hackathon_survey_hackathon_models::{
    Credentials, HackathonSize, HackathonType, Incentive, Venue,
};
use hackathon_survey_session::{AnalysisController, FilterEvents, SessionStore};
use indicatif::MultiProgress;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;

enum Action {
    AddFilter,
    RemoveFilter,
    LoadPreset,
    SavePreset,
    ChangeHackathons,
    LogIn,
    LogOut,
    Exit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::AddFilter,
        Self::RemoveFilter,
        Self::LoadPreset,
        Self::SavePreset,
        Self::ChangeHackathons,
        Self::LogIn,
        Self::LogOut,
        Self::Exit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::AddFilter => "Add filter combination",
            Self::RemoveFilter => "Remove filter combination",
            Self::LoadPreset => "Load saved filter combination",
            Self::SavePreset => "Save filter combination",
            Self::ChangeHackathons => "Change hackathon selection",
            Self::LogIn => "Log in",
            Self::LogOut => "Log out",
            Self::Exit => "Exit",
        }
    }
}

/// Runs the menu loop until the user exits.
///
/// # Errors
///
/// Returns an error if a prompt fails or the built-in manifest is
/// invalid. Backend failures are reported and the session continues.
pub async fn run(
    multi: &MultiProgress,
    client: HttpClient,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Hackathon Survey Comparison");
    println!();

    let store = SessionStore::new();
    let _login = store.login_changed.subscribe(|logged_in| {
        if *logged_in {
            log::info!("Saved filter combinations are available");
        } else {
            log::info!("Saved filter combinations are unavailable until you log in");
        }
    });
    if let Some(token) = client.token() {
        store.log_in(token);
    }

    let controller = AnalysisController::new(client, default_manifest()?);
    let events = FilterEvents::new();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _updates = events.filters_updated.subscribe(move |filters| {
        if tx.send(filters.clone()).is_err() {
            log::debug!("Session closed, dropping filter update");
        }
    });
    let _saved = events
        .filter_saved
        .subscribe(|filter| log::info!("Saved filter combination '{}'", filter.name));
    let _open = events.filters_open.subscribe(|open| {
        log::debug!("Filter editor {}", if *open { "opened" } else { "closed" });
    });

    let mut hackathon_ids = prompt_hackathons()?;
    let mut filters: Vec<FilterCombination> = Vec::new();
    events.filters_updated.emit(&filters);

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        // Only the latest filter set matters when several updates queued up.
        let mut latest = None;
        while let Ok(update) = rx.try_recv() {
            latest = Some(update);
        }
        if let Some(update) = latest {
            let result =
                crate::show_analysis(multi, &controller, &hackathon_ids, &update, false).await;
            if let Err(e) = result {
                log::warn!("{e}");
            }
        }

        println!();
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::AddFilter => {
                events.filters_open.emit(&true);
                let filter = prompt_filter(filters.len(), store.is_logged_in())?;
                events.filters_open.emit(&false);
                filters.push(filter);
                events.filters_updated.emit(&filters);
            }
            Action::RemoveFilter => {
                let Some(idx) = pick_filter(&filters, "Remove which combination?")? else {
                    continue;
                };
                filters.remove(idx);
                reindex(&mut filters);
                events.filters_updated.emit(&filters);
            }
            Action::LoadPreset => {
                if !require_login(&store) {
                    continue;
                }
                let presets = match controller.source().list_filters().await {
                    Ok(presets) => presets,
                    Err(e) => {
                        println!("Could not load saved filter combinations: {e}");
                        continue;
                    }
                };
                let Some(idx) = pick_filter(&presets, "Load which combination?")? else {
                    continue;
                };
                filters.push(presets[idx].clone());
                reindex(&mut filters);
                events.filters_updated.emit(&filters);
            }
            Action::SavePreset => {
                if !require_login(&store) {
                    continue;
                }
                let Some(idx) = pick_filter(&filters, "Save which combination?")? else {
                    continue;
                };
                match controller.source().save_filter(&filters[idx]).await {
                    Ok(()) => events.filter_saved.emit(&filters[idx]),
                    Err(e) => println!("Could not save filter combination: {e}"),
                }
            }
            Action::ChangeHackathons => {
                hackathon_ids = prompt_hackathons()?;
                events.filters_updated.emit(&filters);
            }
            Action::LogIn => {
                let username: String = Input::new().with_prompt("Username").interact_text()?;
                let password = Password::new().with_prompt("Password").interact()?;
                match controller
                    .source()
                    .login(&Credentials { username, password })
                    .await
                {
                    Ok(token) => store.log_in(token.access_token),
                    Err(e) => println!("Login failed: {e}"),
                }
            }
            Action::LogOut => {
                controller.source().set_token(None);
                store.log_out();
            }
            Action::Exit => break,
        }
    }

    Ok(())
}

fn require_login(store: &SessionStore) -> bool {
    let logged_in = store.is_logged_in();
    if !logged_in {
        println!("Please log in first.");
    }
    logged_in
}

fn prompt_hackathons() -> Result<Vec<String>, dialoguer::Error> {
    loop {
        let raw: String = Input::new()
            .with_prompt("Hackathon ids (comma-separated)")
            .interact_text()?;
        let ids = parse_hackathon_ids(&raw);
        if !ids.is_empty() {
            return Ok(ids);
        }
        println!("Select at least one hackathon.");
    }
}

/// Asks for a combination. The name may be left empty; the next refresh
/// then reports it instead of sending a request.
fn prompt_filter(index: usize, logged_in: bool) -> Result<FilterCombination, dialoguer::Error> {
    let name: String = Input::new()
        .with_prompt("Name")
        .allow_empty(true)
        .interact_text()?;
    let incentives = pick_options("Incentives", &options::<Incentive>())?;
    let venue = pick_options("Venue", &options::<Venue>())?;
    let size = pick_options("Size", &options::<HackathonSize>())?;
    let types = pick_options("Types", &options::<HackathonType>())?;
    let only_own = logged_in
        && Confirm::new()
            .with_prompt("Only your own hackathons?")
            .default(false)
            .interact()?;

    Ok(FilterCombination {
        index: u32::try_from(index).ok(),
        id: None,
        name,
        incentives,
        venue,
        size,
        types,
        only_own,
    })
}

/// The wire values of every variant of `T`, in declaration order.
fn options<T: IntoEnumIterator + ToString>() -> Vec<String> {
    T::iter().map(|variant| variant.to_string()).collect()
}

fn pick_options(prompt: &str, options: &[String]) -> Result<Vec<String>, dialoguer::Error> {
    let picked = MultiSelect::new()
        .with_prompt(format!("{prompt} (none for any)"))
        .items(options)
        .interact()?;
    Ok(picked.into_iter().map(|i| options[i].clone()).collect())
}

fn pick_filter(
    filters: &[FilterCombination],
    prompt: &str,
) -> Result<Option<usize>, dialoguer::Error> {
    if filters.is_empty() {
        println!("There are no filter combinations.");
        return Ok(None);
    }
    let names: Vec<String> = filters.iter().map(display_name).collect();
    Select::new()
        .with_prompt(prompt)
        .items(&names)
        .default(0)
        .interact_opt()
}

fn display_name(filter: &FilterCombination) -> String {
    if filter.name.is_empty() {
        "(unnamed)".to_string()
    } else {
        filter.name.clone()
    }
}

/// Keeps each combination's `index` equal to its position.
fn reindex(filters: &mut [FilterCombination]) {
    for (i, filter) in filters.iter_mut().enumerate() {
        filter.index = u32::try_from(i).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_use_wire_values() {
        assert_eq!(options::<Venue>(), ["in person", "online", "hybrid"]);
        assert_eq!(options::<HackathonType>().len(), 6);
    }

    #[test]
    fn reindex_follows_position() {
        let mut filters = vec![
            FilterCombination {
                index: Some(4),
                ..FilterCombination::named("Online")
            },
            FilterCombination::named("Big"),
        ];

        reindex(&mut filters);

        assert_eq!(filters[0].index, Some(0));
        assert_eq!(filters[1].index, Some(1));
    }

    #[test]
    fn unnamed_combinations_are_labeled() {
        assert_eq!(display_name(&FilterCombination::named("")), "(unnamed)");
        assert_eq!(display_name(&FilterCombination::named("Big")), "Big");
    }
}
