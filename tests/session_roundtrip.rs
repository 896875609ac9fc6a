use assert_matches::assert_matches;
use tempfile::tempdir;

use rostrum::config::Config;
use rostrum::context::{DebateContext, SessionError};
use rostrum::roster::Section;
use rostrum::store;

// On-disk session contract: export/import through real files.

fn populated_context() -> DebateContext {
    let mut ctx = DebateContext::new(&Config::default());
    ctx.roster
        .slot_mut(0)
        .set_text(Section::Info, "definitions, framing".into());
    ctx.roster
        .slot_mut(0)
        .set_text(Section::Question1, "source for the statistic?".into());
    ctx.roster
        .slot_mut(5)
        .set_text(Section::Info, "rebuttal: economy".into());
    ctx.ad_vocem[0] = "proposition ad vocem".into();
    ctx.ad_vocem[1] = "opposition ad vocem".into();
    ctx.notepad = "leaning proposition".into();
    ctx.scores = [0, 10, 3, 3, 10, 0, 7, 2];
    ctx
}

#[test]
fn session_file_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("round.json");

    let ctx = populated_context();
    ctx.export_session(&path).unwrap();

    let mut restored = DebateContext::new(&Config::default());
    restored.import_session(&path).unwrap();
    assert_eq!(restored.snapshot(), ctx.snapshot());
}

#[test]
fn exported_file_is_stable() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.json");
    let second = dir.path().join("b.json");

    let ctx = populated_context();
    ctx.export_session(&first).unwrap();
    ctx.export_session(&second).unwrap();
    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn commented_file_imports_like_the_clean_one() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("commented.json");

    let ctx = populated_context();
    let clean = String::from_utf8(store::export(&ctx.snapshot())).unwrap();
    let commented = format!(
        "// judged 2026-08-30, final round\n{}",
        clean.replace("\"notatnik\"", "// notes follow\n  \"notatnik\"")
    );
    std::fs::write(&path, commented).unwrap();

    let mut restored = DebateContext::new(&Config::default());
    restored.import_session(&path).unwrap();
    assert_eq!(restored.snapshot(), ctx.snapshot());
}

#[test]
fn malformed_file_aborts_without_touching_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    // punkty array missing entirely
    std::fs::write(
        &path,
        r#"{"speakers": [], "ad_vocem": ["", ""], "notatnik": ""}"#,
    )
    .unwrap();

    let mut ctx = populated_context();
    let before = ctx.snapshot();
    assert_matches!(ctx.import_session(&path), Err(SessionError::Malformed(_)));
    assert_eq!(ctx.snapshot(), before);
}
