//! Process launcher behavior.

use exec_relay::bridge::{run_bridge, spawn_backend, wait_for_exit, ExitOutcome};
use exec_relay::reply::Reply;
use exec_relay::AppError;

use super::support::{drain, empty_client, reply_channel, spec, with_timeout};

const MAX_LINE: usize = 1_048_576;

#[tokio::test]
async fn spawn_failure_is_internal_and_leaves_nothing_running() {
    let err = spawn_backend(&spec(&["/nonexistent/backend/binary"]), &[], MAX_LINE)
        .expect_err("must fail");
    assert!(matches!(err, AppError::Internal(_)));
}

#[tokio::test]
async fn request_args_are_appended_to_the_configured_argv() {
    with_timeout(async {
        let backend = spawn_backend(
            &spec(&["/bin/echo", "fixed"]),
            &["extra".to_owned(), "args".to_owned()],
            MAX_LINE,
        )
        .expect("spawn");
        let mut client = empty_client();
        let (reply_tx, mut reply_rx) = reply_channel();

        let (child, _) = run_bridge(backend, &mut client, &reply_tx).await.expect("bridge");
        assert_eq!(wait_for_exit(child).await, ExitOutcome::Success);

        assert_eq!(
            drain(&mut reply_rx),
            vec![Reply::Info("fixed extra args".into())]
        );
    })
    .await;
}

#[tokio::test]
async fn argument_bytes_reach_the_backend_unmangled() {
    with_timeout(async {
        // Tokens with shell-special characters must arrive as single argv
        // entries, not be re-tokenized anywhere on the way.
        let backend = spawn_backend(
            &spec(&["/bin/echo"]),
            &["a=b;c".to_owned(), "$HOME".to_owned()],
            MAX_LINE,
        )
        .expect("spawn");
        let mut client = empty_client();
        let (reply_tx, mut reply_rx) = reply_channel();

        let (child, _) = run_bridge(backend, &mut client, &reply_tx).await.expect("bridge");
        assert_eq!(wait_for_exit(child).await, ExitOutcome::Success);

        assert_eq!(
            drain(&mut reply_rx),
            vec![Reply::Info("a=b;c $HOME".into())]
        );
    })
    .await;
}
