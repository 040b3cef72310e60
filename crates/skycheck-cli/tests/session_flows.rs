//! Disambiguation flows against a live resolver over an in-memory channel.

mod common;

use common::{dataset, start_resolver, ScriptedConsole};
use skycheck_cli::{ResolvedLocation, Session};
use skycheck_core::{AppError, LookupError};

async fn lookup(inputs: &[&str]) -> (Result<ResolvedLocation, AppError>, ScriptedConsole) {
    let (mut client, server) = start_resolver(dataset());
    let mut console = ScriptedConsole::new(inputs);

    let result = Session::new().run(&mut client, &mut console).await;

    client.quit().await.unwrap();
    server.await.unwrap();
    (result, console)
}

fn resolved_id(result: Result<ResolvedLocation, AppError>) -> u64 {
    match result {
        Ok(ResolvedLocation::Record(record)) => record.id,
        other => panic!("expected a resolved record, got {:?}", other),
    }
}

fn lookup_error(result: Result<ResolvedLocation, AppError>) -> LookupError {
    match result {
        Err(AppError::Lookup(e)) => e,
        other => panic!("expected a lookup error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_single_match_confirmed() {
    let (result, console) = lookup(&["Springfield", "y"]).await;

    assert_eq!(resolved_id(result), 4250542);
    assert!(console.saw("! - 1 match found - !"));
    assert!(console.saw("Springfield, IL, (US)"));
    assert_eq!(console.prompts, vec!["City/Town: ", "Input: "]);
}

#[tokio::test]
async fn test_select_from_preview() {
    let (result, console) = lookup(&["columbia", "2"]).await;

    assert_eq!(resolved_id(result), 4381982);
    assert!(console.saw("! - 5 matches found - !"));
    assert!(console.saw("[1] Columbia, SC, (US)"));
    assert!(console.saw("[3] Columbia, TX, (US)"));
    assert!(console.saw("..."));
    assert!(!console.saw("[4] Columbia, MD, (US)"));
}

#[tokio::test]
async fn test_two_matches_have_no_truncation_marker() {
    let (result, console) = lookup(&["paris", "1"]).await;

    assert_eq!(resolved_id(result), 2988507);
    assert!(console.saw("! - 2 matches found - !"));
    assert!(console.saw("[1] Paris, (FR)"));
    assert!(!console.saw("..."));
}

#[tokio::test]
async fn test_filter_to_single_then_confirm() {
    let (result, console) = lookup(&["columbia", "filter", "us", "tx", "Y"]).await;

    assert_eq!(resolved_id(result), 4682464);
    assert!(console.saw("Follow prompt /OR/ Press 'enter' to skip."));
    assert!(console.saw("Columbia, TX, (US)"));
}

#[tokio::test]
async fn test_filters_accumulate_across_steps() {
    // Country first, then state on a second pass; the country sticks.
    let (result, console) = lookup(&["columbia", "f", "us", "", "filter", "", "md", "yes"]).await;

    assert_eq!(resolved_id(result), 4352053);
    assert!(console.saw("! - 4 matches found - !"));
}

#[tokio::test]
async fn test_filter_with_no_results_aborts() {
    let (result, _) = lookup(&["columbia", "filter", "", "zz"]).await;

    assert_eq!(lookup_error(result), LookupError::NoMatchFound("columbia (ZZ)".into()));
}

#[tokio::test]
async fn test_unknown_name_aborts() {
    let (result, console) = lookup(&["Nowhereville"]).await;

    let err = lookup_error(result);
    assert_eq!(err, LookupError::NoMatchFound("nowhereville".into()));
    assert_eq!(err.user_message(), "No location matching nowhereville identified.");
    assert_eq!(console.prompts.len(), 1);
}

#[tokio::test]
async fn test_empty_name_matches_nothing() {
    let (result, _) = lookup(&["   "]).await;

    assert_eq!(lookup_error(result), LookupError::NoMatchFound(String::new()));
}

#[tokio::test]
async fn test_non_numeric_selection_is_invalid() {
    let (result, _) = lookup(&["columbia", "second"]).await;

    assert_eq!(lookup_error(result), LookupError::InvalidUserSelection("second".into()));
}

#[tokio::test]
async fn test_selection_outside_preview_is_invalid() {
    let (result, _) = lookup(&["columbia", "4"]).await;
    assert_eq!(lookup_error(result), LookupError::InvalidUserSelection("4".into()));

    let (result, _) = lookup(&["columbia", "0"]).await;
    assert_eq!(lookup_error(result), LookupError::InvalidUserSelection("0".into()));
}

#[tokio::test]
async fn test_selection_beyond_match_count_is_invalid() {
    let (result, _) = lookup(&["paris", "3"]).await;

    assert_eq!(lookup_error(result), LookupError::InvalidUserSelection("3".into()));
}

#[tokio::test]
async fn test_rejected_match_falls_back_to_zip() {
    let (result, console) = lookup(&["springfield", "n", " 02134 "]).await;

    assert_eq!(result.unwrap(), ResolvedLocation::Zip(2134));
    assert_eq!(console.prompts.last().map(String::as_str), Some("Zip Code: "));
}

#[tokio::test]
async fn test_invalid_zip_aborts() {
    let (result, _) = lookup(&["springfield", "N", "abcde"]).await;

    assert_eq!(lookup_error(result), LookupError::InvalidZipFormat("abcde".into()));
}

#[tokio::test]
async fn test_unclear_confirmation_is_invalid() {
    let (result, _) = lookup(&["springfield", "maybe"]).await;

    assert_eq!(lookup_error(result), LookupError::InvalidUserSelection("maybe".into()));
}

#[tokio::test]
async fn test_closed_input_is_io_error() {
    let (result, _) = lookup(&["columbia"]).await;

    match result {
        Err(AppError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("expected io error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_resolver_gone_is_fatal() {
    let (mut client, server) = start_resolver(dataset());
    client.query("paris").await.unwrap();
    // A bare Quit stops the server without touching the client.
    let _ = client.request(&skycheck_locate::Request::Quit).await;
    server.await.unwrap();

    let mut console = ScriptedConsole::new(&["paris"]);
    let err = Session::new().run(&mut client, &mut console).await.unwrap_err();

    assert!(err.is_fatal());
    assert!(matches!(err, AppError::Lookup(LookupError::ChannelFailure(_))));
}
