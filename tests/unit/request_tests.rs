use exec_relay::request::{is_atom, BridgeRequest};
use exec_relay::AppError;

fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn atom_rules() {
    assert!(is_atom("RUN"));
    assert!(is_atom("lower-case.ok_123"));
    assert!(is_atom("/bin/cat"));

    assert!(!is_atom(""));
    assert!(!is_atom("has space"));
    assert!(is_atom("no%problem"));
    assert!(!is_atom("embedded\nnewline"));
    assert!(!is_atom("embedded\rreturn"));
    assert!(!is_atom("marker\u{5}byte"));
    assert!(!is_atom("quo\"ted"));
    assert!(!is_atom("lit{eral"));
    assert!(!is_atom("lit}eral"));
}

#[test]
fn parses_valid_request() {
    let request =
        BridgeRequest::parse(&tokens(&["run", "--fast", "input.txt"])).expect("request parses");

    assert_eq!(request.subcommand, "run");
    assert_eq!(
        request.args,
        vec!["--fast".to_owned(), "input.txt".to_owned()]
    );
}

#[test]
fn parses_request_without_arguments() {
    let request = BridgeRequest::parse(&tokens(&["STATUS"])).expect("request parses");
    assert_eq!(request.subcommand, "STATUS");
    assert!(request.args.is_empty());
}

#[test]
fn rejects_empty_token_sequence() {
    let err = BridgeRequest::parse(&[]).expect_err("must fail");
    match err {
        AppError::MalformedRequest(msg) => assert_eq!(msg, "Missing subcommand."),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_non_atom_subcommand() {
    let err = BridgeRequest::parse(&tokens(&["bad\u{5}cmd", "arg"])).expect_err("must fail");
    match err {
        AppError::InvalidSubcommand(msg) => assert_eq!(msg, "Invalid subcommand."),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_non_atom_argument() {
    let err = BridgeRequest::parse(&tokens(&["run", "ok", "ba{d"])).expect_err("must fail");
    match err {
        AppError::InvalidArgument(msg) => assert_eq!(msg, "Invalid arguments."),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn argument_validation_precedes_lookup() {
    // A bad argument fails even when the subcommand itself is unknown —
    // validation never depends on registry contents.
    let err = BridgeRequest::parse(&tokens(&["nosuch", "ba\"d"])).expect_err("must fail");
    assert!(matches!(err, AppError::InvalidArgument(_)));
}

#[test]
fn unknown_subcommand_error_echoes_uppercased_token() {
    let request = BridgeRequest::parse(&tokens(&["frobnicate"])).expect("request parses");
    match request.unknown_subcommand_error() {
        AppError::UnknownSubcommand(msg) => {
            assert_eq!(msg, "Unknown FROBNICATE subcommand.");
        }
        other => panic!("unexpected error: {other}"),
    }
}
