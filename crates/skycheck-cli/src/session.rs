//! Location disambiguation for one "get weather" request.
//!
//! The session walks the user from a free-text name to exactly one location:
//! confirming a single match, picking from the top candidates, narrowing by
//! country/state, or falling back to a zip code. Any invalid input or empty
//! result ends the whole lookup with an error; nothing is retried in place.

use skycheck_core::{AppError, LookupError};
use skycheck_locate::{
    ChannelError, LocationRecord, MultipleMatches, QueryFilters, ResolutionOutcome, ResolverClient,
};
use skycheck_weather::WeatherTarget;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::console::Console;

/// Where a finished lookup points the weather request.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedLocation {
    Record(LocationRecord),
    Zip(u32),
}

impl ResolvedLocation {
    pub fn weather_target(&self) -> WeatherTarget {
        match self {
            Self::Record(record) => WeatherTarget::Coordinates {
                lat: record.coord.lat,
                lon: record.coord.lon,
            },
            Self::Zip(zip) => WeatherTarget::Zip(*zip),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Record(record) => record.summary(),
            Self::Zip(zip) => format!("area code {:05}", zip),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupState {
    Querying,
    AwaitingSelectionOrFilter(MultipleMatches),
    Filtering,
    ConfirmSingle {
        record: LocationRecord,
        display: String,
    },
    AwaitingZipFallback,
    Resolved(ResolvedLocation),
}

/// Disambiguation state for one lookup.
#[derive(Debug)]
pub struct Session {
    filters: QueryFilters,
    state: LookupState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            filters: QueryFilters::default(),
            state: LookupState::Querying,
        }
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    /// The original name plus every filter chosen so far.
    pub fn filters(&self) -> &QueryFilters {
        &self.filters
    }

    /// Drive the state machine until a location is resolved or the lookup aborts.
    pub async fn run<S, C>(
        mut self,
        client: &mut ResolverClient<S>,
        console: &mut C,
    ) -> Result<ResolvedLocation, AppError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        C: Console,
    {
        loop {
            let next = self.step(client, console).await?;
            tracing::debug!(?next, "Lookup state transition");
            if let LookupState::Resolved(location) = next {
                return Ok(location);
            }
            self.state = next;
        }
    }

    /// Perform the work of the current state and return the next one.
    pub async fn step<S, C>(
        &mut self,
        client: &mut ResolverClient<S>,
        console: &mut C,
    ) -> Result<LookupState, AppError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        C: Console,
    {
        let state = std::mem::replace(&mut self.state, LookupState::Querying);
        match state {
            LookupState::Querying => {
                let name = console.ask("City/Town: ")?.trim().to_lowercase();
                self.filters = QueryFilters::by_name(&name);
                let outcome = client.query(&name).await.map_err(channel_failure)?;
                self.after_outcome(outcome)
            }

            LookupState::AwaitingSelectionOrFilter(matches) => {
                console.clear();
                console.show(&format!("! - {} matches found - !", matches.total_count));
                console.show("");
                for line in matches.preview_lines() {
                    console.show(&line);
                }
                console.show("");
                console.show("Select a matching location [#]");
                console.show("/OR/ Type 'filter' to narrow search.");
                console.show("");

                let input = console.ask("Input: ")?;
                let choice = input.trim();
                if is_filter(choice) {
                    return Ok(LookupState::Filtering);
                }
                let selected = choice
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| matches.select(index));
                match selected {
                    Some(record) => Ok(LookupState::Resolved(ResolvedLocation::Record(
                        record.clone(),
                    ))),
                    None => Err(LookupError::InvalidUserSelection(choice.to_string()).into()),
                }
            }

            LookupState::Filtering => {
                console.clear();
                console.show("Follow prompt /OR/ Press 'enter' to skip.");
                console.show("");
                let country = console.ask("Country Code: ")?;
                let state = console.ask("State (abbr.): ")?;

                let mut filters = self.filters.clone();
                if !country.trim().is_empty() {
                    filters = filters.with_country(&country);
                }
                if !state.trim().is_empty() {
                    filters = filters.with_state(&state);
                }
                self.filters = filters.clone();

                let outcome = client.filter_query(filters).await.map_err(channel_failure)?;
                self.after_outcome(outcome)
            }

            LookupState::ConfirmSingle { record, display } => {
                console.clear();
                console.show("! - 1 match found - !");
                console.show("");
                console.show(&display);
                console.show("");
                console.show("Is this location correct? [Y/N]");
                console.show("");

                let input = console.ask("Input: ")?;
                let choice = input.trim();
                if is_yes(choice) {
                    Ok(LookupState::Resolved(ResolvedLocation::Record(record)))
                } else if is_no(choice) {
                    Ok(LookupState::AwaitingZipFallback)
                } else {
                    Err(LookupError::InvalidUserSelection(choice.to_string()).into())
                }
            }

            LookupState::AwaitingZipFallback => {
                console.clear();
                let raw = console.ask("Zip Code: ")?;
                match client.zip_query(&raw).await.map_err(channel_failure)? {
                    Some(zip) => Ok(LookupState::Resolved(ResolvedLocation::Zip(zip))),
                    None => Err(LookupError::InvalidZipFormat(raw).into()),
                }
            }

            LookupState::Resolved(location) => Ok(LookupState::Resolved(location)),
        }
    }

    fn after_outcome(&self, outcome: ResolutionOutcome) -> Result<LookupState, AppError> {
        match outcome {
            ResolutionOutcome::NoMatch => {
                Err(LookupError::NoMatchFound(describe(&self.filters)).into())
            }
            ResolutionOutcome::SingleMatch { record, display } => {
                Ok(LookupState::ConfirmSingle { record, display })
            }
            ResolutionOutcome::MultipleMatches(matches) => {
                Ok(LookupState::AwaitingSelectionOrFilter(matches))
            }
        }
    }
}

fn channel_failure(err: ChannelError) -> AppError {
    tracing::error!("Resolver channel failed: {}", err);
    LookupError::from(err).into()
}

/// `"columbia"`, or `"columbia (US, TX)"` once filters are applied.
fn describe(filters: &QueryFilters) -> String {
    let extras: Vec<&str> = [filters.country_code.as_deref(), filters.state.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if extras.is_empty() {
        filters.name.clone()
    } else {
        format!("{} ({})", filters.name, extras.join(", "))
    }
}

fn is_yes(input: &str) -> bool {
    input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes")
}

fn is_no(input: &str) -> bool {
    input.eq_ignore_ascii_case("n") || input.eq_ignore_ascii_case("no")
}

fn is_filter(input: &str) -> bool {
    ["f", "filter", "filters"]
        .iter()
        .any(|word| input.eq_ignore_ascii_case(word))
}
