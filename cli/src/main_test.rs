use super::*;
use clap::CommandFactory;

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn parses_login_with_email() {
    let cli = Cli::try_parse_from(["vidhost", "login", "--email", "a@b.com", "--password", "x"]).unwrap();
    let Command::Login(args) = cli.command else {
        panic!("expected login");
    };
    assert_eq!(args.email.as_deref(), Some("a@b.com"));
    assert!(args.username.is_none());
}

#[test]
fn login_rejects_both_identities() {
    let result = Cli::try_parse_from([
        "vidhost", "login", "--username", "ana", "--email", "a@b.com", "--password", "x",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_embed_flags() {
    let cli = Cli::try_parse_from(["vidhost", "videos", "embed", "3", "--autoplay", "--loop", "--no-controls"]).unwrap();
    let Command::Videos(VideosCommand { command: VideosSubcommand::Embed(args) }) = cli.command else {
        panic!("expected videos embed");
    };
    assert_eq!(args.video_id, 3);
    assert!(args.autoplay);
    assert!(args.loop_playback);
    assert!(args.no_controls);
    assert_eq!(args.width, 800);
}

#[test]
fn ensure_maps_false_to_failure() {
    assert!(ensure(true, "x").is_ok());
    assert_eq!(ensure(false, "delete").unwrap_err().to_string(), "delete failed");
}
