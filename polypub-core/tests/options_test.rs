use polypub_core::options::{validate_tag, RunMode, RunOptions};

#[test]
fn test_no_flags_is_dry_run() {
    let mode = RunMode::derive(false, false, false);
    assert!(!mode.publish);
    assert!(mode.dry_run);
}

#[test]
fn test_publish_alone_publishes_with_confirmation() {
    let mode = RunMode::derive(true, false, false);
    assert!(mode.publish);
    assert!(!mode.dry_run);

    let options = RunOptions {
        dry_run: mode.dry_run,
        auto_confirm: false,
        ..RunOptions::new("next")
    };
    assert!(options.needs_confirmation());
}

#[test]
fn test_yes_alone_publishes_without_confirmation() {
    let mode = RunMode::derive(false, true, false);
    assert!(mode.publish);
    assert!(!mode.dry_run);

    let options = RunOptions {
        dry_run: mode.dry_run,
        auto_confirm: true,
        ..RunOptions::new("next")
    };
    assert!(!options.needs_confirmation());
}

#[test]
fn test_dry_run_wins_over_yes() {
    let mode = RunMode::derive(false, true, true);
    assert!(mode.dry_run);
}

#[test]
fn test_clean_tree_required_only_for_real_publish() {
    let mut options = RunOptions::new("latest");
    assert!(!options.requires_clean_tree());

    options.dry_run = false;
    assert!(options.requires_clean_tree());

    options.allow_dirty = true;
    assert!(!options.requires_clean_tree());
}

#[test]
fn test_validate_tag() {
    assert!(validate_tag("alpha").is_ok());
    assert!(validate_tag("next-1.x").is_ok());
    assert!(validate_tag("").is_err());
    assert!(validate_tag("two words").is_err());
    assert!(validate_tag("tab\there").is_err());
    assert!(RunOptions::new(" ").validated().is_err());
}
